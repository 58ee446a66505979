use crate::units::format_bytes;
use crate::Collector;
use anyhow::{bail, Result};
use async_trait::async_trait;
use sysinfo::System;

pub struct MemoryCollector {
    system: System,
}

impl MemoryCollector {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }

    /// Formats in-use (total minus available) and total memory.
    fn format(available: u64, total: u64) -> String {
        let in_use = total.saturating_sub(available);
        format!(
            "Memory: {} In-Use, {} Total",
            format_bytes(in_use as f64),
            format_bytes(total as f64)
        )
    }
}

impl Default for MemoryCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Collector for MemoryCollector {
    fn name(&self) -> &str {
        "memory"
    }

    async fn collect(&mut self) -> Result<String> {
        self.system.refresh_memory();
        let total = self.system.total_memory();
        if total == 0 {
            bail!("memory information unavailable");
        }
        Ok(Self::format(self.system.available_memory(), total))
    }

    fn fallback(&self) -> String {
        Self::format(0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_in_use_from_available() {
        let gib = 1024 * 1024 * 1024;
        assert_eq!(
            MemoryCollector::format(gib, 4 * gib),
            "Memory: 3.00GB In-Use, 4.00GB Total"
        );
    }

    #[test]
    fn fallback_is_zeroed() {
        assert_eq!(
            MemoryCollector::new().fallback(),
            "Memory: 0.00KB In-Use, 0.00KB Total"
        );
    }
}
