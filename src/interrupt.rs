//! Ctrl-C handling for the blocking listing read.
//!
//! The handler shuts down the read half of the socket, so a `read` blocked on
//! it returns end of file and the listing can tell that apart from the player
//! hanging up by checking [`requested`].

use std::net::{Shutdown, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::trace;

use crate::connection::Connection;
use crate::error::Result;

static REQUESTED: AtomicBool = AtomicBool::new(false);

pub fn requested() -> bool {
    REQUESTED.load(Ordering::SeqCst)
}

/// Marks the listing as interrupted and wakes any read blocked on `stream`.
pub fn request(stream: &TcpStream) {
    REQUESTED.store(true, Ordering::SeqCst);
    if let Err(err) = stream.shutdown(Shutdown::Read) {
        trace!("Shutdown on interrupt: {}", err);
    }
}

/// Routes Ctrl-C to [`request`] for this connection. Only one handler may be
/// installed per process.
pub fn install(connection: &Connection) -> Result<()> {
    let stream = connection.try_clone_stream()?;
    ctrlc::set_handler(move || request(&stream))?;
    Ok(())
}
