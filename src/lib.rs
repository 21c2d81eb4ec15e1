//! Remote control for an mplayer instance that accepts line based text
//! commands over TCP.

pub mod command;
pub mod connection;
pub mod error;
pub mod interrupt;
pub mod listing;

pub use command::Command;
pub use connection::{Connection, ConnectionTarget};
pub use error::{Error, Result};
pub use listing::{print_channels, Channel, ChannelListing};
