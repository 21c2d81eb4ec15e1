use std::fmt;
use std::io::prelude::*;
use std::net::{Shutdown, TcpStream};

use tracing::{debug, trace};

use crate::command::Command;
use crate::error::{Error, Result};
use crate::listing::ChannelListing;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 12454;

/// Where the player listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub host: String,
    pub port: u16,
}

impl ConnectionTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        ConnectionTarget {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for ConnectionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// One open connection to the player. The socket is shut down when this is dropped.
pub struct Connection {
    stream: TcpStream,
}

impl Connection {
    pub fn new(target: &ConnectionTarget) -> Result<Self> {
        debug!("Connecting to {}", target);
        let stream = TcpStream::connect((target.host.as_str(), target.port)).map_err(|source| {
            Error::Connect {
                target: target.clone(),
                source,
            }
        })?;
        debug!("Connected to {}", target);
        Ok(Connection { stream })
    }

    pub fn from_stream(stream: TcpStream) -> Self {
        Connection { stream }
    }

    /// A second handle on the socket, used to wake a blocked read.
    pub fn try_clone_stream(&self) -> Result<TcpStream> {
        Ok(self.stream.try_clone()?)
    }

    pub fn send(&mut self, command: &Command) -> Result<()> {
        debug!("Sending `{}`", command);
        self.stream.write_all(command.line().as_bytes())?;
        self.stream.flush()?;
        Ok(())
    }

    /// Requests the channel list and returns a lazy reader over the reply.
    pub fn list_channels(&mut self) -> Result<ChannelListing<&mut Self>> {
        self.send(&Command::ListChannels)?;
        Ok(ChannelListing::new(self))
    }
}

impl Read for Connection {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        // the peer may already have gone away
        if let Err(err) = self.stream.shutdown(Shutdown::Both) {
            trace!("Shutdown: {}", err);
        }
        debug!("Connection closed");
    }
}
