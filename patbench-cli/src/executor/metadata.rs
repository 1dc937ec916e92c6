//! System Metadata Collection
//!
//! Collects the host description stamped into every report: operating
//! system, architecture, CPU model and hardware thread count.
//!
//! The CPU model is read from `/proc/cpuinfo` on Linux and reported as
//! "Unknown" elsewhere.

use patbench_core::available_cores;
use patbench_report::{ReportMeta, SystemInfo};

/// Build report metadata for the running host
pub fn build_report_meta() -> ReportMeta {
    ReportMeta::now(env!("CARGO_PKG_VERSION"), system_info())
}

/// Describe the running host
pub fn system_info() -> SystemInfo {
    SystemInfo {
        os: std::env::consts::OS.to_string(),
        arch: std::env::consts::ARCH.to_string(),
        cpu: get_cpu_model().unwrap_or_else(|| "Unknown".to_string()),
        cpu_cores: available_cores() as u32,
    }
}

/// Get CPU model name from /proc/cpuinfo (Linux only)
fn get_cpu_model() -> Option<String> {
    #[cfg(target_os = "linux")]
    {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| cpu_model_from_cpuinfo(&content))
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}

fn cpu_model_from_cpuinfo(content: &str) -> Option<String> {
    content
        .lines()
        .find(|l| l.starts_with("model name"))
        .and_then(|l| l.split(':').nth(1))
        .map(|s| s.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_model_parse() {
        let cpuinfo = "processor\t: 0\nvendor_id\t: GenuineIntel\nmodel name\t: Test CPU @ 3.00GHz\n";
        assert_eq!(
            cpu_model_from_cpuinfo(cpuinfo).as_deref(),
            Some("Test CPU @ 3.00GHz")
        );
        assert_eq!(cpu_model_from_cpuinfo("processor\t: 0\n"), None);
    }

    #[test]
    fn test_system_info() {
        let info = system_info();
        assert!(info.cpu_cores >= 1);
        assert_eq!(info.os, std::env::consts::OS);
        assert!(!info.cpu.is_empty());
    }
}
