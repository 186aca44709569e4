// Shared test helpers: fake /proc and /sys trees under a tempdir

use healthdash::proc_repo::ProcRepo;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct FakeHost {
    dir: TempDir,
}

impl FakeHost {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("proc/net")).unwrap();
        std::fs::create_dir_all(dir.path().join("sys/class/thermal")).unwrap();
        Self { dir }
    }

    pub fn proc_path(&self) -> PathBuf {
        self.dir.path().join("proc")
    }

    pub fn sys_path(&self) -> PathBuf {
        self.dir.path().join("sys")
    }

    pub fn write_proc(&self, rel: &str, content: &str) {
        std::fs::write(self.proc_path().join(rel), content).unwrap();
    }

    pub fn add_thermal_zone(&self, dir_name: &str, temp: &str, type_label: Option<&str>) {
        let zone = self.sys_path().join("class/thermal").join(dir_name);
        std::fs::create_dir_all(&zone).unwrap();
        std::fs::write(zone.join("temp"), temp).unwrap();
        if let Some(label) = type_label {
            std::fs::write(zone.join("type"), label).unwrap();
        }
    }

    pub fn repo(&self) -> ProcRepo {
        ProcRepo::new(self.proc_path(), self.sys_path())
    }
}
