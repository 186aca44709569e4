// Network interface model

use serde::{Deserialize, Serialize};

/// Cumulative counters for one interface (loopback excluded).
/// Rates are a dashboard-side concern; only raw totals are reported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub name: String,
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_packets: u64,
    pub tx_packets: u64,
}
