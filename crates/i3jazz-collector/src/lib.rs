//! Metric collectors for the i3jazz status bar.
//!
//! Each [`Collector`] produces the display text for one block. Collectors are
//! invoked once per tick by the agent's producer loop; a failed collection is
//! replaced by the collector's [`Collector::fallback`] text so one broken
//! source never blanks the rest of the bar.

pub mod clock;
pub mod cpu;
pub mod delta;
pub mod load;
pub mod memory;
pub mod network;
pub mod task;
pub mod track;
pub mod units;
pub mod volume;

mod command;

use anyhow::Result;
use async_trait::async_trait;

/// A source of display text for one status-bar block.
///
/// Implementations own whatever state they need between ticks (previous
/// counter samples, a `sysinfo` handle). They are driven from a single task,
/// so `collect` takes `&mut self` and needs no locking.
#[async_trait]
pub trait Collector: Send {
    /// Returns the collector name (e.g., `"cpu"`, `"network"`), used for logging.
    fn name(&self) -> &str;

    /// Produces the block text for the current tick.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying system API or command fails.
    async fn collect(&mut self) -> Result<String>;

    /// Text shown when `collect` fails or times out.
    fn fallback(&self) -> String {
        String::new()
    }
}
