use crate::command;
use crate::Collector;
use anyhow::Result;
use async_trait::async_trait;

const METADATA_FORMAT: &str = "{{ xesam:artist }} - {{ xesam:title }}";

/// Currently playing track as reported by `playerctl`.
///
/// With `show_errors` the failure message is rendered as the block text;
/// otherwise the block is left empty.
pub struct TrackCollector {
    show_errors: bool,
}

impl TrackCollector {
    pub fn new(show_errors: bool) -> Self {
        Self { show_errors }
    }
}

#[async_trait]
impl Collector for TrackCollector {
    fn name(&self) -> &str {
        "track"
    }

    async fn collect(&mut self) -> Result<String> {
        let outcome = command::run("playerctl", &["metadata", "-f", METADATA_FORMAT]).await;
        render(outcome, self.show_errors)
    }
}

/// Maps a `playerctl` invocation to block text.
fn render(outcome: Result<String>, show_errors: bool) -> Result<String> {
    match outcome {
        Ok(out) => Ok(out.trim().to_string()),
        Err(e) if show_errors => Ok(format!("{e:#}")),
        Err(e) => Err(e),
    }
}
