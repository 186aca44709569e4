// Thermal zone model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThermalZone {
    /// Driver-reported zone type, or the sysfs directory name if unreadable.
    pub name: String,
    pub temperature_celsius: f64,
}
