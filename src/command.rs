use std::fmt;

/// A single request understood by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ListChannels,
    TogglePlayPause,
    Stop,
    PlayStream { index: u32 },
}

impl Command {
    /// The exact bytes written to the socket, newline included.
    pub fn line(&self) -> String {
        format!("{}\n", self)
    }

    /// Only the channel listing is answered; everything else is fire-and-forget.
    pub fn expects_response(&self) -> bool {
        matches!(self, Command::ListChannels)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::ListChannels => write!(f, "mplayer streams"),
            Command::TogglePlayPause => write!(f, "mplayer pauseplay"),
            Command::Stop => write!(f, "mplayer stop"),
            Command::PlayStream { index } => write!(f, "mplayer play {}", index),
        }
    }
}
