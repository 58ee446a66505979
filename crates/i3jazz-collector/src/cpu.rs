use crate::Collector;
use anyhow::Result;
use async_trait::async_trait;
use sysinfo::System;

/// Global CPU utilisation since the previous tick.
///
/// `sysinfo` derives usage from the difference between two refreshes, so the
/// first collection only primes the sample and reports zero.
pub struct CpuCollector {
    system: System,
    primed: bool,
}

impl CpuCollector {
    pub fn new() -> Self {
        Self {
            system: System::new(),
            primed: false,
        }
    }

    fn format(usage: f64) -> String {
        format!("CPU: {usage:.2}%")
    }
}

impl Default for CpuCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Collector for CpuCollector {
    fn name(&self) -> &str {
        "cpu"
    }

    async fn collect(&mut self) -> Result<String> {
        self.system.refresh_cpu_all();
        if !self.primed {
            self.primed = true;
            return Ok(Self::format(0.0));
        }
        let usage = f64::from(self.system.global_cpu_usage());
        Ok(Self::format(usage.clamp(0.0, 100.0)))
    }

    fn fallback(&self) -> String {
        Self::format(0.0)
    }
}
