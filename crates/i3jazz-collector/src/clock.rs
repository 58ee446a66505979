use crate::Collector;
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone};
use std::fmt::Display;

pub const DEFAULT_FORMAT: &str = "%a %Y-%m-%d %H:%M";

/// Local time rendered with a strftime-style format.
pub struct ClockCollector {
    format: String,
}

impl ClockCollector {
    /// # Errors
    ///
    /// Returns an error if `format` contains an unknown specifier.
    pub fn new(format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            bail!("invalid clock format '{format}'");
        }
        Ok(Self { format })
    }

    pub fn render<Tz>(&self, now: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        now.format(&self.format).to_string()
    }
}

#[async_trait]
impl Collector for ClockCollector {
    fn name(&self) -> &str {
        "clock"
    }

    async fn collect(&mut self) -> Result<String> {
        Ok(self.render(&Local::now()))
    }
}
