//! Wire types and the streaming encoder for the i3bar JSON protocol.
//!
//! A [`protocol::Header`] is written once, followed by an unbounded array of
//! [`protocol::StatusLine`]s received through the [`handoff`] channel.

pub mod encoder;
pub mod error;
pub mod handoff;
pub mod protocol;

pub use encoder::{encode, StreamEncoder};
pub use error::EncodeError;
pub use handoff::{handoff, LineReceiver, LineSender};
pub use protocol::{Align, Block, Header, Markup, MinWidth, StatusLine};
