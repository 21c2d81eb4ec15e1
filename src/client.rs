use anyhow::{Context, Result};
use clap::{ArgAction, ArgGroup, Parser};
use tracing::{info, Level};

use mplayer_remote::connection::{DEFAULT_HOST, DEFAULT_PORT};
use mplayer_remote::{interrupt, print_channels, Command, Connection, ConnectionTarget, Error};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    override_usage = "mplayer_remote [-o host] [-p port] -s | -P | -S NUMBER | -O"
)]
#[command(group(
    ArgGroup::new("action")
        .required(true)
        .args(["show", "playpause", "playstream", "stop"])
))]
struct Args {
    /// Use HOST instead of localhost
    #[arg(short = 'o', long, value_name = "HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Use PORT instead of 12454
    #[arg(short, long, value_name = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Shows a list of channels
    #[arg(short, long)]
    show: bool,

    /// Toggle between play and pause
    #[arg(short = 'P', long)]
    playpause: bool,

    /// Plays stream NUMBER (see the -s option to get the number)
    #[arg(short = 'S', long, value_name = "NUMBER")]
    playstream: Option<u32>,

    /// Stops playback
    #[arg(short = 'O', long)]
    stop: bool,

    /// Log more to stderr, repeat for more detail
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn target(&self) -> ConnectionTarget {
        ConnectionTarget::new(self.host.as_str(), self.port)
    }

    // clap guarantees exactly one of these is set
    fn action(&self) -> Command {
        if let Some(index) = self.playstream {
            Command::PlayStream { index }
        } else if self.playpause {
            Command::TogglePlayPause
        } else if self.stop {
            Command::Stop
        } else {
            Command::ListChannels
        }
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(connection: &mut Connection, command: Command) -> mplayer_remote::Result<()> {
    if !command.expects_response() {
        return connection.send(&command);
    }
    interrupt::install(connection)?;
    let listing = connection.list_channels()?;
    let count = print_channels(listing, &mut std::io::stdout().lock())?;
    info!("Listed {} channels", count);
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let target = args.target();
    let command = args.action();

    let mut connection = Connection::new(&target)?;
    match run(&mut connection, command) {
        Err(Error::Interrupted) => {
            println!("Aborted by user invocation");
            Ok(())
        }
        result => result.with_context(|| format!("`{}` to {} failed", command, target)),
    }
}
