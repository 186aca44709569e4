// Collector tests against a fake /proc and /sys tree

mod common;

use common::FakeHost;
use healthdash::proc_repo::{parse_diskstats, parse_meminfo, parse_mounts, parse_net_dev};

#[test]
fn meminfo_example_values() {
    let content = "MemTotal:       1000000 kB\n\
                   MemFree:         400000 kB\n\
                   MemAvailable:    600000 kB\n\
                   Buffers:          50000 kB\n";
    let info = parse_meminfo(content);
    assert_eq!(info.total_kb, 1_000_000);
    assert_eq!(info.free_kb, 400_000);
    assert_eq!(info.available_kb, 600_000);
    assert_eq!(info.used_kb, 600_000);
    assert!((info.usage_percent - 40.0).abs() < 1e-9);
}

#[test]
fn meminfo_missing_keys_default_to_zero() {
    let info = parse_meminfo("MemTotal:       1000000 kB\n");
    assert_eq!(info.total_kb, 1_000_000);
    assert_eq!(info.free_kb, 0);
    assert_eq!(info.available_kb, 0);
    assert_eq!(info.used_kb, 1_000_000);
    // available missing -> (total - 0)/total
    assert!((info.usage_percent - 100.0).abs() < 1e-9);
}

#[test]
fn meminfo_empty_source_is_all_zero() {
    let info = parse_meminfo("");
    assert_eq!(info.total_kb, 0);
    assert_eq!(info.usage_percent, 0.0);
}

#[tokio::test]
async fn memory_unreadable_source_degrades_to_zero() {
    let host = FakeHost::new();
    // no meminfo written
    let info = host.repo().get_memory_info().await;
    assert_eq!(info.total_kb, 0);
    assert_eq!(info.usage_percent, 0.0);
}

#[test]
fn mounts_filters_pseudo_filesystems_and_non_block_devices() {
    let content = "proc /proc proc rw 0 0\n\
                   sysfs /sys sysfs rw 0 0\n\
                   tmpfs /run tmpfs rw 0 0\n\
                   cgroup2 /sys/fs/cgroup cgroup2 rw 0 0\n\
                   overlay / overlay rw 0 0\n\
                   /dev/sda1 /data ext4 rw 0 0\n\
                   /dev/nvme0n1p2 /home ext4 rw 0 0\n\
                   zram0 /swap swap rw 0 0\n";
    let mounts = parse_mounts(content);
    assert_eq!(mounts, vec!["/data".to_string(), "/home".to_string()]);
}

#[test]
fn mounts_decodes_octal_escaped_spaces() {
    let content = "/dev/sdb1 /mnt/usb\\040drive ext4 rw 0 0\n";
    let mounts = parse_mounts(content);
    assert_eq!(mounts, vec!["/mnt/usb drive".to_string()]);
}

#[tokio::test]
async fn disk_info_surviving_mount_gets_space_stats() {
    let host = FakeHost::new();
    // Claim a /dev/-backed ext4 mount at a directory that actually exists,
    // so the statvfs query succeeds; a missing mount point is dropped.
    let existing = host.proc_path();
    let content = format!(
        "/dev/sda1 {} ext4 rw 0 0\n/dev/sdb1 /nonexistent-mount-point ext4 rw 0 0\n",
        existing.display()
    );
    host.write_proc("mounts", &content);
    let disks = host.repo().get_disk_info().await;
    assert_eq!(disks.len(), 1);
    assert_eq!(disks[0].path, existing.display().to_string());
    assert_eq!(disks[0].used_kb, disks[0].total_kb - disks[0].free_kb);
    if disks[0].total_kb == 0 {
        assert_eq!(disks[0].usage_percent, 0.0);
    }
}

const NET_DEV: &str = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo:  999999    9999    0    0    0     0          0         0   999999    9999    0    0    0     0       0          0
  eth0: 1000000    2000    1    2    0     0          0         0  3000000    4000    0    0    0     0       0          0
 wlan0:      10       1    0    0    0     0          0         0       20       2    0    0    0     0       0          0
";

#[test]
fn net_dev_extracts_counters_and_skips_loopback() {
    let ifaces = parse_net_dev(NET_DEV);
    assert_eq!(ifaces.len(), 2);
    assert_eq!(ifaces[0].name, "eth0");
    assert_eq!(ifaces[0].rx_bytes, 1_000_000);
    assert_eq!(ifaces[0].rx_packets, 2000);
    assert_eq!(ifaces[0].tx_bytes, 3_000_000);
    assert_eq!(ifaces[0].tx_packets, 4000);
    assert_eq!(ifaces[1].name, "wlan0");
}

#[test]
fn net_dev_loopback_excluded_regardless_of_position() {
    let content = "\
h1\nh2\n\
  eth0: 1 2 0 0 0 0 0 0 3 4 0 0 0 0 0 0\n\
    lo: 9 9 0 0 0 0 0 0 9 9 0 0 0 0 0 0\n";
    let ifaces = parse_net_dev(content);
    assert_eq!(ifaces.len(), 1);
    assert!(ifaces.iter().all(|i| i.name != "lo"));
}

#[test]
fn net_dev_handles_missing_space_after_colon() {
    let content = "h1\nh2\nenp3s0:100 5 0 0 0 0 0 0 200 7 0 0 0 0 0 0\n";
    let ifaces = parse_net_dev(content);
    assert_eq!(ifaces.len(), 1);
    assert_eq!(ifaces[0].name, "enp3s0");
    assert_eq!(ifaces[0].rx_bytes, 100);
    assert_eq!(ifaces[0].tx_packets, 7);
}

const DISKSTATS: &str = "\
   8       0 sda 5000 100 80000 900 3000 200 64000 800 0 1000 1700
   8       1 sda1 4000 90 70000 800 2500 150 60000 700 0 900 1500
   7       0 loop0 50 0 400 10 0 0 0 0 0 10 10
   1       0 ram0 10 0 80 2 0 0 0 0 0 2 2
 259       0 nvme0n1 9000 300 150000 1200 7000 400 130000 1100 0 2000 2300
 253       0 vda 100 0 800 20 50 10 400 15 0 30 35
";

#[test]
fn diskstats_keeps_whole_devices_only() {
    let stats = parse_diskstats(DISKSTATS);
    // sda1 (partition), loop0, ram0 and nvme0n1 (digit in name) excluded
    let names: Vec<&str> = stats.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["sda", "vda"]);
    assert_eq!(stats[0].reads_completed, 5000);
    assert_eq!(stats[0].read_sectors, 80_000);
    assert_eq!(stats[0].writes_completed, 3000);
    assert_eq!(stats[0].write_sectors, 64_000);
}

#[test]
fn diskstats_digit_names_excluded() {
    let content = "   8   0 md0 1 0 1 0 1 0 1 0 0 1 1\n   8   0 xvdf 1 0 2 0 3 0 4 0 0 1 1\n";
    let stats = parse_diskstats(content);
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].name, "xvdf");
}

#[tokio::test]
async fn thermal_zones_read_with_type_fallback() {
    let host = FakeHost::new();
    host.add_thermal_zone("thermal_zone0", "45500\n", Some("x86_pkg_temp\n"));
    host.add_thermal_zone("thermal_zone1", "30000\n", None);
    // Not a zone directory; ignored.
    std::fs::create_dir_all(host.sys_path().join("class/thermal/cooling_device0")).unwrap();

    let zones = host.repo().get_thermal_zones().await;
    assert_eq!(zones.len(), 2);
    let pkg = zones.iter().find(|z| z.name == "x86_pkg_temp").unwrap();
    assert!((pkg.temperature_celsius - 45.5).abs() < 1e-9);
    let fallback = zones.iter().find(|z| z.name == "thermal_zone1").unwrap();
    assert!((fallback.temperature_celsius - 30.0).abs() < 1e-9);
}

#[tokio::test]
async fn thermal_enumeration_failure_yields_empty() {
    let host = FakeHost::new();
    std::fs::remove_dir_all(host.sys_path().join("class/thermal")).unwrap();
    assert!(host.repo().get_thermal_zones().await.is_empty());
}

#[tokio::test]
async fn thermal_zone_with_unreadable_temp_is_skipped() {
    let host = FakeHost::new();
    host.add_thermal_zone("thermal_zone0", "not-a-number", Some("broken"));
    host.add_thermal_zone("thermal_zone1", "20000", Some("ok"));
    let zones = host.repo().get_thermal_zones().await;
    assert_eq!(zones.len(), 1);
    assert_eq!(zones[0].name, "ok");
}
