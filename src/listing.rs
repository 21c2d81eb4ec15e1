//! Streaming reader for the reply to `mplayer streams`.

use std::fmt;
use std::io::prelude::*;
use std::io::ErrorKind;

use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::interrupt;

/// Line that terminates the channel listing. Never a channel itself.
pub const END_MARKER: &str = "__END__";

const CHUNK_SIZE: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub index: usize,
    pub name: String,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.index, self.name)
    }
}

/// Bytes received from the socket that have not been split into lines yet.
///
/// A read may end in the middle of a line; the tail is kept until the rest arrives.
#[derive(Debug, Default)]
pub struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    pub fn extend(&mut self, bytes: &[u8]) {
        self.pending.extend_from_slice(bytes);
    }

    /// Removes and returns the next complete line, without its `\n` or `\r\n`.
    pub fn next_line(&mut self) -> Option<Vec<u8>> {
        let end = self.pending.iter().position(|&byte| byte == b'\n')?;
        let mut line: Vec<u8> = self.pending.drain(..=end).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(line)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingChunk,
    Scanning,
    Done,
}

/// Lazily yields channels as their lines arrive, numbered from zero.
///
/// Stops at [`END_MARKER`] without reading any further. A reader that hits
/// end of file first yields [`Error::Truncated`].
pub struct ChannelListing<R> {
    reader: R,
    buffer: LineBuffer,
    next_index: usize,
    state: State,
}

impl<R: Read> ChannelListing<R> {
    /// `reader` must be positioned right after the listing request was sent.
    pub fn new(reader: R) -> Self {
        ChannelListing {
            reader,
            buffer: LineBuffer::default(),
            next_index: 0,
            state: State::AwaitingChunk,
        }
    }

    fn read_chunk(&mut self) -> Result<()> {
        let mut chunk = [0; CHUNK_SIZE];
        let len = loop {
            match self.reader.read(&mut chunk) {
                Ok(0) => return Err(self.end_of_stream()),
                Ok(len) => break len,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(err.into()),
            }
        };
        trace!("Received {} bytes", len);
        self.buffer.extend(&chunk[..len]);
        Ok(())
    }

    // Ctrl-C shuts the socket down for reading, so it also ends up here.
    fn end_of_stream(&self) -> Error {
        if interrupt::requested() {
            warn!("Listing interrupted after {} channels", self.next_index);
            return Error::Interrupted;
        }
        if !self.buffer.is_empty() {
            debug!("Dropping unterminated line at end of stream");
        }
        Error::Truncated {
            received: self.next_index,
        }
    }

    fn fail(&mut self, err: Error) -> Option<Result<Channel>> {
        self.state = State::Done;
        Some(Err(err))
    }
}

impl<R: Read> Iterator for ChannelListing<R> {
    type Item = Result<Channel>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.state {
                State::Done => return None,
                State::AwaitingChunk => {
                    if let Err(err) = self.read_chunk() {
                        return self.fail(err);
                    }
                    self.state = State::Scanning;
                }
                State::Scanning => {
                    let Some(line) = self.buffer.next_line() else {
                        self.state = State::AwaitingChunk;
                        continue;
                    };
                    if line == END_MARKER.as_bytes() {
                        debug!("End of listing after {} channels", self.next_index);
                        self.state = State::Done;
                        return None;
                    }
                    let channel = Channel {
                        index: self.next_index,
                        name: String::from_utf8_lossy(&line).into_owned(),
                    };
                    self.next_index += 1;
                    return Some(Ok(channel));
                }
            }
        }
    }
}

/// Writes each channel as `<index>: <name>` as soon as it is received.
/// Returns how many were written.
pub fn print_channels<I, W>(channels: I, out: &mut W) -> Result<usize>
where
    I: IntoIterator<Item = Result<Channel>>,
    W: Write,
{
    let mut count = 0;
    for channel in channels {
        writeln!(out, "{}", channel?)?;
        out.flush()?;
        count += 1;
    }
    Ok(count)
}
