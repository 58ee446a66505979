use anyhow::{bail, Context, Result};
use i3jazz_collector::clock::{ClockCollector, DEFAULT_FORMAT};
use i3jazz_collector::cpu::CpuCollector;
use i3jazz_collector::load::LoadCollector;
use i3jazz_collector::memory::MemoryCollector;
use i3jazz_collector::network::NetworkCollector;
use i3jazz_collector::task::TaskCollector;
use i3jazz_collector::track::TrackCollector;
use i3jazz_collector::volume::VolumeCollector;
use i3jazz_collector::Collector;
use i3jazz_common::protocol::{Align, Block, Header, Markup, MinWidth};
use serde::Deserialize;
use std::time::Duration;

use crate::producer::ConfiguredBlock;

#[derive(Debug, Deserialize)]
pub struct AgentConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Upper bound for a single collector call; a timeout counts as a failure.
    #[serde(default = "default_collector_timeout_ms")]
    pub collector_timeout_ms: u64,
    /// Upper bound for a single write to stdout. Unbounded when unset.
    #[serde(default)]
    pub write_timeout_ms: Option<u64>,
    #[serde(default)]
    pub header: HeaderConfig,
    /// Styling applied to every block before per-block overrides.
    #[serde(default = "default_style")]
    pub style: BlockStyle,
    /// Blocks in left-to-right order.
    #[serde(default = "default_blocks")]
    pub blocks: Vec<BlockConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HeaderConfig {
    #[serde(default)]
    pub click_events: bool,
    pub stop_signal: Option<i32>,
    pub cont_signal: Option<i32>,
}

/// Optional block attributes. Unset fields are left off the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BlockStyle {
    pub short_text: Option<String>,
    pub color: Option<String>,
    pub min_width: Option<MinWidth>,
    pub align: Option<Align>,
    pub name: Option<String>,
    pub instance: Option<String>,
    /// Always highlight this block.
    pub urgent: Option<bool>,
    pub separator: Option<bool>,
    pub separator_block_width: Option<u32>,
    pub markup: Option<Markup>,
}

impl BlockStyle {
    /// Returns `self` with every field set in `other` taking precedence.
    pub fn overridden_by(&self, other: &BlockStyle) -> BlockStyle {
        BlockStyle {
            short_text: other.short_text.clone().or_else(|| self.short_text.clone()),
            color: other.color.clone().or_else(|| self.color.clone()),
            min_width: other.min_width.clone().or_else(|| self.min_width.clone()),
            align: other.align.or(self.align),
            name: other.name.clone().or_else(|| self.name.clone()),
            instance: other.instance.clone().or_else(|| self.instance.clone()),
            urgent: other.urgent.or(self.urgent),
            separator: other.separator.or(self.separator),
            separator_block_width: other.separator_block_width.or(self.separator_block_width),
            markup: other.markup.or(self.markup),
        }
    }

    pub fn apply(&self, mut block: Block) -> Block {
        block.short_text = self.short_text.clone();
        block.color = self.color.clone();
        block.min_width = self.min_width.clone();
        block.align = self.align;
        block.name = self.name.clone();
        block.instance = self.instance.clone();
        block.urgent = self.urgent.unwrap_or(false);
        block.separator = self.separator;
        block.separator_block_width = self.separator_block_width;
        block.markup = self.markup;
        block
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlockConfig {
    #[serde(flatten)]
    pub source: SourceConfig,
    #[serde(flatten)]
    pub style: BlockStyle,
}

impl From<SourceConfig> for BlockConfig {
    fn from(source: SourceConfig) -> Self {
        Self {
            source,
            style: BlockStyle::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    Network {
        #[serde(default = "default_interface")]
        interface: String,
    },
    Memory,
    Load,
    Cpu,
    Volume {
        #[serde(default = "default_mixer_device")]
        device: String,
        #[serde(default = "default_mixer_control")]
        control: String,
    },
    Track {
        /// Render playerctl failures as block text instead of leaving it empty.
        #[serde(default)]
        show_errors: bool,
    },
    Task,
    Clock {
        #[serde(default = "default_clock_format")]
        format: String,
    },
}

impl SourceConfig {
    fn build(&self, interval: Duration) -> Result<Box<dyn Collector>> {
        Ok(match self {
            SourceConfig::Network { interface } => {
                Box::new(NetworkCollector::new(interface.clone(), interval))
            }
            SourceConfig::Memory => Box::new(MemoryCollector::new()),
            SourceConfig::Load => Box::new(LoadCollector::new()),
            SourceConfig::Cpu => Box::new(CpuCollector::new()),
            SourceConfig::Volume { device, control } => {
                Box::new(VolumeCollector::new(device.clone(), control.clone()))
            }
            SourceConfig::Track { show_errors } => Box::new(TrackCollector::new(*show_errors)),
            SourceConfig::Task => Box::new(TaskCollector::new()),
            SourceConfig::Clock { format } => Box::new(ClockCollector::new(format.clone())?),
        })
    }
}

fn default_interval_secs() -> u64 {
    3
}

fn default_collector_timeout_ms() -> u64 {
    2000
}

fn default_interface() -> String {
    "eno1".to_string()
}

fn default_mixer_device() -> String {
    "pulse".to_string()
}

fn default_mixer_control() -> String {
    "Master".to_string()
}

fn default_clock_format() -> String {
    DEFAULT_FORMAT.to_string()
}

fn default_style() -> BlockStyle {
    BlockStyle {
        color: Some("#888888".to_string()),
        separator: Some(true),
        ..BlockStyle::default()
    }
}

fn default_blocks() -> Vec<BlockConfig> {
    vec![
        SourceConfig::Network {
            interface: default_interface(),
        }
        .into(),
        SourceConfig::Memory.into(),
        SourceConfig::Load.into(),
        SourceConfig::Cpu.into(),
        SourceConfig::Volume {
            device: default_mixer_device(),
            control: default_mixer_control(),
        }
        .into(),
        SourceConfig::Track { show_errors: false }.into(),
        SourceConfig::Task.into(),
        SourceConfig::Clock {
            format: default_clock_format(),
        }
        .into(),
    ]
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            collector_timeout_ms: default_collector_timeout_ms(),
            write_timeout_ms: None,
            header: HeaderConfig::default(),
            style: default_style(),
            blocks: default_blocks(),
        }
    }
}

impl AgentConfig {
    pub fn load(path: &str) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?;
        Self::parse(&content).with_context(|| format!("invalid config {path}"))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            bail!("interval_secs must be greater than zero");
        }
        if self.collector_timeout_ms == 0 {
            bail!("collector_timeout_ms must be greater than zero");
        }
        if self.write_timeout_ms == Some(0) {
            bail!("write_timeout_ms must be greater than zero");
        }
        if self.blocks.is_empty() {
            bail!("at least one block must be configured");
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn collector_timeout(&self) -> Duration {
        Duration::from_millis(self.collector_timeout_ms)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout_ms.map(Duration::from_millis)
    }

    pub fn header(&self) -> Header {
        Header {
            version: 1,
            stop_signal: self.header.stop_signal,
            cont_signal: self.header.cont_signal,
            click_events: self.header.click_events,
        }
    }

    /// Instantiates one collector per configured block, in order.
    pub fn build_blocks(&self) -> Result<Vec<ConfiguredBlock>> {
        let interval = self.interval();
        self.blocks
            .iter()
            .enumerate()
            .map(|(i, block)| {
                let collector = block
                    .source
                    .build(interval)
                    .with_context(|| format!("block #{} ({:?})", i + 1, block.source))?;
                Ok(ConfiguredBlock::new(
                    collector,
                    self.style.overridden_by(&block.style),
                ))
            })
            .collect()
    }
}
