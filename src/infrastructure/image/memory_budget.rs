//! Process memory budget used to size the image cache.

use tracing::debug;

/// Budget assumed when the platform does not report available memory.
pub const FALLBACK_MEMORY_BUDGET: u64 = 512 * 1024 * 1024;

const MEMINFO_PATH: &str = "/proc/meminfo";

/// Resolves the memory budget once: the explicit override when set, else
/// what the OS reports as available, else [`FALLBACK_MEMORY_BUDGET`].
#[must_use]
pub fn resolve_memory_budget(override_bytes: Option<u64>) -> u64 {
    if let Some(bytes) = override_bytes {
        debug!(bytes, "Using configured memory budget");
        return bytes;
    }

    match std::fs::read_to_string(MEMINFO_PATH)
        .ok()
        .and_then(|content| parse_mem_available(&content))
    {
        Some(bytes) => {
            debug!(bytes, "Using available system memory as budget");
            bytes
        }
        None => {
            debug!(bytes = FALLBACK_MEMORY_BUDGET, "Using fallback memory budget");
            FALLBACK_MEMORY_BUDGET
        }
    }
}

/// Extracts `MemAvailable` (reported in kB) from a `/proc/meminfo` dump.
fn parse_mem_available(content: &str) -> Option<u64> {
    content.lines().find_map(|line| {
        let rest = line.strip_prefix("MemAvailable:")?;
        let kib = rest.split_whitespace().next()?.parse::<u64>().ok()?;
        kib.checked_mul(1024)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_override_wins() {
        assert_eq!(resolve_memory_budget(Some(4096)), 4096);
    }

    #[test]
    fn test_parse_mem_available() {
        let meminfo = "MemTotal:       16318524 kB\nMemFree:         1203400 kB\nMemAvailable:    8000000 kB\n";
        assert_eq!(parse_mem_available(meminfo), Some(8_000_000 * 1024));
    }

    #[test_case("MemTotal: 10 kB\n" ; "field_absent")]
    #[test_case("MemAvailable: lots kB\n" ; "not_a_number")]
    #[test_case("MemAvailable:\n" ; "no_value")]
    #[test_case("" ; "empty")]
    #[test_case("MemAvailable: 18446744073709551615 kB\n" ; "overflows_bytes")]
    fn test_parse_mem_available_missing(meminfo: &str) {
        assert_eq!(parse_mem_available(meminfo), None);
    }

    #[test]
    fn test_resolved_budget_is_positive() {
        assert!(resolve_memory_budget(None) > 0);
    }
}
