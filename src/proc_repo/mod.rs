// Collectors over the kernel pseudo-filesystems (/proc, /sys).
//
// Every method is total: source unavailable or malformed means a zero or
// empty result plus a log line, never an error to the caller. Base paths
// are configurable so the collectors can be pointed at a bind-mounted
// host root from inside a container.

pub mod cpu;

use std::path::{Path, PathBuf};

use nix::sys::statvfs::statvfs;

use crate::models::{DiskInfo, DiskIoStat, MemoryInfo, NetworkInterface, ThermalZone};

/// Filesystem types that are never backed by a block device.
const PSEUDO_FSTYPES: &[&str] = &[
    "proc", "sysfs", "tmpfs", "devtmpfs", "cgroup", "cgroup2", "devpts", "overlay", "none",
];

pub struct ProcRepo {
    proc_path: PathBuf,
    sys_path: PathBuf,
}

impl ProcRepo {
    pub fn new(proc_path: impl Into<PathBuf>, sys_path: impl Into<PathBuf>) -> Self {
        Self {
            proc_path: proc_path.into(),
            sys_path: sys_path.into(),
        }
    }

    pub fn proc_path(&self) -> &Path {
        &self.proc_path
    }

    pub async fn get_memory_info(&self) -> MemoryInfo {
        let path = self.proc_path.join("meminfo");
        run_collector("get_memory_info", move || {
            let content = std::fs::read_to_string(&path).ok()?;
            Some(parse_meminfo(&content))
        })
        .await
        .unwrap_or_default()
    }

    pub async fn get_disk_info(&self) -> Vec<DiskInfo> {
        let path = self.proc_path.join("mounts");
        run_collector("get_disk_info", move || {
            let content = std::fs::read_to_string(&path).ok()?;
            Some(collect_disk_info(&content))
        })
        .await
        .unwrap_or_default()
    }

    pub async fn get_network_interfaces(&self) -> Vec<NetworkInterface> {
        let path = self.proc_path.join("net/dev");
        run_collector("get_network_interfaces", move || {
            let content = std::fs::read_to_string(&path).ok()?;
            Some(parse_net_dev(&content))
        })
        .await
        .unwrap_or_default()
    }

    pub async fn get_disk_io_stats(&self) -> Vec<DiskIoStat> {
        let path = self.proc_path.join("diskstats");
        run_collector("get_disk_io_stats", move || {
            let content = std::fs::read_to_string(&path).ok()?;
            Some(parse_diskstats(&content))
        })
        .await
        .unwrap_or_default()
    }

    pub async fn get_thermal_zones(&self) -> Vec<ThermalZone> {
        let base = self.sys_path.join("class/thermal");
        run_collector("get_thermal_zones", move || Some(collect_thermal_zones(&base)))
            .await
            .unwrap_or_default()
    }
}

/// Run a blocking read off the async runtime; a join error degrades to
/// None like any other source failure.
async fn run_collector<T, F>(operation: &'static str, f: F) -> Option<T>
where
    T: Send + 'static,
    F: FnOnce() -> Option<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Some(v)) => Some(v),
        Ok(None) => {
            tracing::debug!(operation, "source unavailable");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, operation, "collector task join failed");
            None
        }
    }
}

/// Parse /proc/meminfo. Only MemTotal, MemFree and MemAvailable are
/// recognized; missing keys leave their field at 0.
pub fn parse_meminfo(content: &str) -> MemoryInfo {
    let mut info = MemoryInfo::default();
    for line in content.lines() {
        let mut fields = line.split_whitespace();
        let (Some(key), Some(val)) = (fields.next(), fields.next()) else {
            continue;
        };
        let Ok(val) = val.parse::<u64>() else {
            continue;
        };
        match key {
            "MemTotal:" => info.total_kb = val,
            "MemFree:" => info.free_kb = val,
            "MemAvailable:" => info.available_kb = val,
            _ => {}
        }
    }
    info.used_kb = info.total_kb.saturating_sub(info.free_kb);
    if info.total_kb > 0 {
        info.usage_percent =
            100.0 * (info.total_kb.saturating_sub(info.available_kb)) as f64 / info.total_kb as f64;
    }
    info
}

/// Mount-table entries that survive the pseudo-filesystem and device
/// filters, before space stats are queried.
pub fn parse_mounts(content: &str) -> Vec<String> {
    let mut mounts = Vec::new();
    for line in content.lines() {
        let mut fields = line.split_whitespace();
        let (Some(dev), Some(mount), Some(fstype)) = (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };
        if PSEUDO_FSTYPES.contains(&fstype) {
            continue;
        }
        if !dev.starts_with("/dev/") {
            continue;
        }
        mounts.push(decode_mount_path(mount));
    }
    mounts
}

/// /proc/mounts octal-escapes whitespace in mount points ("\040" for a
/// space); decode before handing the path to statvfs.
fn decode_mount_path(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            let rest = chars.as_str();
            if rest.len() >= 3 && rest.is_char_boundary(3) {
                if let Ok(code) = u8::from_str_radix(&rest[..3], 8) {
                    out.push(code as char);
                    chars = rest[3..].chars();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

fn collect_disk_info(mounts_content: &str) -> Vec<DiskInfo> {
    parse_mounts(mounts_content)
        .into_iter()
        .filter_map(|mount| disk_info_for_mount(&mount))
        .collect()
}

/// Space stats for one mount point; a failed statvfs drops the entry
/// rather than aborting the whole collection.
fn disk_info_for_mount(mount: &str) -> Option<DiskInfo> {
    let st = statvfs(Path::new(mount)).ok()?;
    let frsize = st.fragment_size() as u64;
    let total_kb = st.blocks() * frsize / 1024;
    let free_kb = st.blocks_free() * frsize / 1024;
    let used_kb = total_kb.saturating_sub(free_kb);
    let usage_percent = if total_kb > 0 {
        100.0 * used_kb as f64 / total_kb as f64
    } else {
        0.0
    };
    Some(DiskInfo {
        path: mount.to_string(),
        total_kb,
        used_kb,
        free_kb,
        usage_percent,
    })
}

/// Parse /proc/net/dev. The first two lines are headers; each data line is
/// "name: rx_bytes rx_packets errs drop fifo frame compressed multicast
/// tx_bytes tx_packets ...". Loopback is excluded.
pub fn parse_net_dev(content: &str) -> Vec<NetworkInterface> {
    let mut result = Vec::new();
    for line in content.lines().skip(2) {
        // The kernel may omit the space after the colon, so split on it.
        let Some((name, counters)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        if name.is_empty() || name == "lo" {
            continue;
        }
        let vals: Vec<u64> = counters
            .split_whitespace()
            .map(|f| f.parse().unwrap_or(0))
            .collect();
        if vals.len() < 10 {
            continue;
        }
        result.push(NetworkInterface {
            name: name.to_string(),
            rx_bytes: vals[0],
            rx_packets: vals[1],
            tx_bytes: vals[8],
            tx_packets: vals[9],
        });
    }
    result
}

/// Parse /proc/diskstats, keeping whole physical devices only: loop and
/// ram devices are skipped by name prefix, and any name containing a digit
/// is treated as a partition. The digit rule also drops physical disks
/// with numeric names (nvme0n1, mmcblk0) - a known over-exclusion kept for
/// dashboard compatibility.
pub fn parse_diskstats(content: &str) -> Vec<DiskIoStat> {
    let mut result = Vec::new();
    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        // major minor name reads rd_merged rd_sectors rd_ms writes ...
        if fields.len() < 10 {
            continue;
        }
        let name = fields[2];
        if name.starts_with("loop") || name.starts_with("ram") {
            continue;
        }
        if name.chars().any(|c| c.is_ascii_digit()) {
            continue;
        }
        let counter = |i: usize| fields[i].parse().unwrap_or(0);
        result.push(DiskIoStat {
            name: name.to_string(),
            reads_completed: counter(3),
            read_sectors: counter(5),
            writes_completed: counter(7),
            write_sectors: counter(9),
        });
    }
    result
}

/// Enumerate {sys}/class/thermal/thermal_zone*. A zone whose temp file is
/// unreadable is skipped; an unreadable type file falls back to the
/// directory name. No thermal support at all yields an empty list.
fn collect_thermal_zones(base: &Path) -> Vec<ThermalZone> {
    let Ok(entries) = std::fs::read_dir(base) else {
        return Vec::new();
    };
    let mut result = Vec::new();
    for entry in entries.flatten() {
        let dir_name = entry.file_name().to_string_lossy().into_owned();
        if !dir_name.contains("thermal_zone") {
            continue;
        }
        let zone = entry.path();
        let Some(raw) = std::fs::read_to_string(zone.join("temp"))
            .ok()
            .and_then(|s| s.trim().parse::<i64>().ok())
        else {
            continue;
        };
        let name = std::fs::read_to_string(zone.join("type"))
            .ok()
            .and_then(|s| s.lines().next().map(|l| l.trim().to_string()))
            .filter(|s| !s.is_empty())
            .unwrap_or(dir_name);
        result.push(ThermalZone {
            name,
            temperature_celsius: raw as f64 / 1000.0,
        });
    }
    result.sort_by(|a, b| a.name.cmp(&b.name));
    result
}
