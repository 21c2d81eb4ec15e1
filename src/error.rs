use crate::connection::ConnectionTarget;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Could not connect to {target}")]
    Connect {
        target: ConnectionTarget,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Connection closed by player after {received} channels, before the end of the listing")]
    Truncated { received: usize },
    #[error("Interrupted by user")]
    Interrupted,
    #[error("Could not install the Ctrl-C handler")]
    Handler(#[from] ctrlc::Error),
}
