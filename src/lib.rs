// Library for tests to access modules

pub mod config;
pub mod docker_repo;
pub mod models;
pub mod proc_repo;
pub mod routes;
pub mod snapshot;
pub mod speedtest_repo;
pub mod version;
