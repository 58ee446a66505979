use crate::command;
use crate::Collector;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

const PREFIX: &str = "Most urgent task: ";

#[derive(Debug, Deserialize)]
struct TaskEntry {
    description: String,
    status: String,
    #[serde(default)]
    urgency: f64,
}

/// Highest-urgency open task from Taskwarrior.
pub struct TaskCollector;

impl TaskCollector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TaskCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks the description of the most urgent task that is neither completed
/// nor deleted from `task export` JSON.
pub fn most_urgent(export: &str) -> Result<String> {
    let tasks: Vec<TaskEntry> =
        serde_json::from_str(export).context("invalid task export JSON")?;

    tasks
        .into_iter()
        .filter(|t| t.status != "completed" && t.status != "deleted")
        .max_by(|a, b| a.urgency.total_cmp(&b.urgency))
        .map(|t| t.description)
        .ok_or_else(|| anyhow!("no open tasks"))
}

#[async_trait]
impl Collector for TaskCollector {
    fn name(&self) -> &str {
        "task"
    }

    async fn collect(&mut self) -> Result<String> {
        let export = command::run("task", &["export"]).await?;
        Ok(format!("{PREFIX}{}", most_urgent(&export)?))
    }

    fn fallback(&self) -> String {
        PREFIX.to_string()
    }
}
