//! RAM-tier detection at startup, using `sysinfo` to read total physical
//! memory. Memoized once into `Environment` so the active tier is stable for
//! the lifetime of an orchestration.

use sysinfo::System;

use crate::domain::RamTier;

pub fn detect_ram_tier() -> RamTier {
    let mut system = System::new();
    system.refresh_memory();
    let total_gib = system.total_memory() / (1024 * 1024 * 1024);
    RamTier::from_total_gib(total_gib)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[serial_test::serial]
    fn detects_some_tier_on_this_host() {
        // Any real host reports a positive memory figure; just assert the
        // call does not panic and returns a valid tier.
        let tier = detect_ram_tier();
        assert!(matches!(
            tier,
            RamTier::Minimal | RamTier::Compact | RamTier::Balanced | RamTier::Performance | RamTier::Advanced
        ));
    }
}
