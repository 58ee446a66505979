use crate::Collector;
use anyhow::Result;
use async_trait::async_trait;
use sysinfo::System;

/// One-minute load average.
pub struct LoadCollector;

impl LoadCollector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LoadCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Collector for LoadCollector {
    fn name(&self) -> &str {
        "load"
    }

    async fn collect(&mut self) -> Result<String> {
        let load_avg = System::load_average();
        Ok(format!("Load: {:.2}", load_avg.one))
    }

    fn fallback(&self) -> String {
        "Load: 0.00".to_string()
    }
}
