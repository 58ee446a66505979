//! Single-slot conduit between the producer and the encoder.
//!
//! At most one status line waits in the slot while the encoder writes the
//! previous one; a producer that finishes a tick early blocks on `send`.

use crate::protocol::StatusLine;
use tokio::sync::mpsc;

/// Number of status lines that may be queued ahead of the encoder.
pub const HANDOFF_CAPACITY: usize = 1;

pub type LineSender = mpsc::Sender<StatusLine>;
pub type LineReceiver = mpsc::Receiver<StatusLine>;

/// Creates a connected producer/encoder pair.
///
/// Dropping every [`LineSender`] ends the stream; the encoder then closes the
/// top-level array.
pub fn handoff() -> (LineSender, LineReceiver) {
    mpsc::channel(HANDOFF_CAPACITY)
}
