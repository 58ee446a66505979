use crate::command;
use crate::Collector;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;

/// Raw amixer volume that corresponds to 100%.
const AMIXER_MAX: f64 = 65535.0;

/// Playback volume read through `amixer`.
pub struct VolumeCollector {
    device: String,
    control: String,
}

impl VolumeCollector {
    pub fn new(device: impl Into<String>, control: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            control: control.into(),
        }
    }

    fn format(percent: f64) -> String {
        format!("Volume: {percent:.1}%")
    }
}

impl Default for VolumeCollector {
    fn default() -> Self {
        Self::new("pulse", "Master")
    }
}

/// Extracts the front-left channel volume from `amixer sget` output as a
/// percentage in `[0, 100]`.
pub fn parse_amixer(output: &str) -> Result<f64> {
    let line = output
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("Front Left:"))
        .ok_or_else(|| anyhow!("no 'Front Left' channel in amixer output"))?;

    // "Front Left: Playback 26214 [40%] [on]"
    let raw = line
        .split_whitespace()
        .nth(3)
        .ok_or_else(|| anyhow!("malformed amixer line: {line}"))?;
    let raw: f64 = raw
        .parse()
        .with_context(|| format!("invalid raw volume '{raw}'"))?;

    Ok((raw / AMIXER_MAX * 100.0).clamp(0.0, 100.0))
}

#[async_trait]
impl Collector for VolumeCollector {
    fn name(&self) -> &str {
        "volume"
    }

    async fn collect(&mut self) -> Result<String> {
        let output = command::run(
            "amixer",
            &["-D", self.device.as_str(), "sget", self.control.as_str()],
        )
        .await?;
        Ok(Self::format(parse_amixer(&output)?))
    }

    fn fallback(&self) -> String {
        Self::format(0.0)
    }
}
