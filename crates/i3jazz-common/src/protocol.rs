use serde::{Deserialize, Serialize};

/// The header sent once at the start of the stream.
///
/// # Examples
///
/// ```
/// use i3jazz_common::protocol::Header;
///
/// let header = Header::new(1);
/// assert_eq!(serde_json::to_string(&header).unwrap(), r#"{"version":1}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_signal: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cont_signal: Option<i32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub click_events: bool,
}

impl Header {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            stop_signal: None,
            cont_signal: None,
            click_events: false,
        }
    }
}

/// Minimum block width, either in pixels or as the width of a sample string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MinWidth {
    Pixels(u32),
    Text(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Markup {
    None,
    Pango,
}

/// One segment of a status line.
///
/// Only `full_text` is always serialised. `separator` is tri-state because the
/// bar draws a separator when the field is absent, so `Some(false)` has to
/// reach the wire.
///
/// # Examples
///
/// ```
/// use i3jazz_common::protocol::Block;
///
/// let block = Block::new("Load: 0.42").color("#888888").separator(true);
/// let json = serde_json::to_string(&block).unwrap();
/// assert_eq!(json, r##"{"full_text":"Load: 0.42","color":"#888888","separator":true}"##);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub full_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<MinWidth>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub urgent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separator_block_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<Markup>,
}

impl Block {
    pub fn new(full_text: impl Into<String>) -> Self {
        Self {
            full_text: full_text.into(),
            ..Self::default()
        }
    }

    pub fn short_text(mut self, text: impl Into<String>) -> Self {
        self.short_text = Some(text.into());
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn min_width(mut self, min_width: MinWidth) -> Self {
        self.min_width = Some(min_width);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    /// Sets the name/instance pair the bar echoes back in click events.
    pub fn named(mut self, name: impl Into<String>, instance: Option<String>) -> Self {
        self.name = Some(name.into());
        self.instance = instance;
        self
    }

    pub fn urgent(mut self, urgent: bool) -> Self {
        self.urgent = urgent;
        self
    }

    pub fn separator(mut self, separator: bool) -> Self {
        self.separator = Some(separator);
        self
    }

    pub fn separator_block_width(mut self, width: u32) -> Self {
        self.separator_block_width = Some(width);
        self
    }

    pub fn markup(mut self, markup: Markup) -> Self {
        self.markup = Some(markup);
        self
    }
}

/// The full content of the bar at one instant, in left-to-right order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusLine(pub Vec<Block>);

impl StatusLine {
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn push(&mut self, block: Block) {
        self.0.push(block);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Block>> for StatusLine {
    fn from(blocks: Vec<Block>) -> Self {
        Self(blocks)
    }
}

impl FromIterator<Block> for StatusLine {
    fn from_iter<I: IntoIterator<Item = Block>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}
