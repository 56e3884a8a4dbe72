//! Process resident-set sampling

/// Current resident set size of this process in bytes
///
/// Reads `VmRSS` from `/proc/self/status`; `None` on platforms without procfs.
#[cfg(target_os = "linux")]
pub fn resident_set_bytes() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_vm_rss(&status)
}

#[cfg(not(target_os = "linux"))]
pub fn resident_set_bytes() -> Option<u64> {
    None
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_vm_rss(status: &str) -> Option<u64> {
    let line = status.lines().find(|line| line.starts_with("VmRSS:"))?;
    let kib: u64 = line
        .trim_start_matches("VmRSS:")
        .split_whitespace()
        .next()?
        .parse()
        .ok()?;
    Some(kib * 1024)
}

/// Signed resident-set growth between two samples
pub fn memory_delta(before: Option<u64>, after: Option<u64>) -> Option<i64> {
    let (before, after) = (before?, after?);
    Some(i64::try_from(after).ok()? - i64::try_from(before).ok()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vm_rss() {
        let status = "Name:\tsearchbench\nVmPeak:\t  20000 kB\nVmRSS:\t   1536 kB\nThreads:\t4\n";
        assert_eq!(parse_vm_rss(status), Some(1536 * 1024));
        assert_eq!(parse_vm_rss("Name:\tx\n"), None);
    }

    #[test]
    fn test_memory_delta() {
        assert_eq!(memory_delta(Some(1000), Some(1500)), Some(500));
        assert_eq!(memory_delta(Some(1500), Some(1000)), Some(-500));
        assert_eq!(memory_delta(None, Some(1000)), None);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_resident_set_available_on_linux() {
        assert!(resident_set_bytes().is_some_and(|bytes| bytes > 0));
    }
}
