use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use mplayer_remote::{print_channels, Command, Connection, ConnectionTarget, Error};

const READ_TIMEOUT: Duration = Duration::from_secs(10);

struct FakePlayer {
    target: ConnectionTarget,
    handle: JoinHandle<String>,
}

impl FakePlayer {
    /// Accepts one client and returns everything it sent.
    fn receive_only() -> Self {
        Self::spawn(|_| {})
    }

    /// Accepts one client, waits for its request line, then writes `chunks`
    /// one at a time. With `close` the socket is closed straight after.
    fn reply(chunks: &'static [&'static str], close: bool) -> Self {
        Self::spawn(move |socket| {
            for chunk in chunks {
                socket.write_all(chunk.as_bytes()).unwrap();
                socket.flush().unwrap();
                thread::sleep(Duration::from_millis(20));
            }
            if close {
                socket.shutdown(std::net::Shutdown::Write).unwrap();
            }
        })
    }

    fn spawn<F>(respond: F) -> Self
    where
        F: FnOnce(&mut TcpStream) + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let (mut socket, _addr) = listener.accept().unwrap();
            let mut reader = BufReader::new(socket.try_clone().unwrap());
            let mut received = String::new();
            reader.read_line(&mut received).unwrap();
            respond(&mut socket);
            // whatever else arrives before the client closes
            let _ = reader.read_to_string(&mut received);
            received
        });
        FakePlayer {
            target: ConnectionTarget::new("127.0.0.1", port),
            handle,
        }
    }

    fn connect(&self) -> Connection {
        let stream = TcpStream::connect(("127.0.0.1", self.target.port)).unwrap();
        stream.set_read_timeout(Some(READ_TIMEOUT)).unwrap();
        Connection::from_stream(stream)
    }

    fn received(self) -> String {
        self.handle.join().unwrap()
    }
}

fn list(connection: &mut Connection) -> (Result<usize, Error>, String) {
    let mut out = Vec::new();
    let result = connection
        .list_channels()
        .and_then(|listing| print_channels(listing, &mut out));
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn fire_and_forget_commands() {
    let cases = [
        (Command::TogglePlayPause, "mplayer pauseplay\n"),
        (Command::Stop, "mplayer stop\n"),
        (Command::PlayStream { index: 3 }, "mplayer play 3\n"),
    ];
    for (command, expected) in cases {
        let player = FakePlayer::receive_only();
        let mut connection = Connection::new(&player.target).unwrap();
        connection.send(&command).unwrap();
        drop(connection);
        assert_eq!(player.received(), expected);
    }
}

#[test]
fn listing_in_one_chunk() {
    let player = FakePlayer::reply(&["foo\nbar\n__END__\n"], false);
    let mut connection = player.connect();
    let (result, output) = list(&mut connection);
    drop(connection);
    assert_eq!(result.unwrap(), 2);
    assert_eq!(output, "0: foo\n1: bar\n");
    assert_eq!(player.received(), "mplayer streams\n");
}

#[test]
fn listing_across_chunks() {
    let player = FakePlayer::reply(&["foo\n", "bar\n__END__\n"], false);
    let mut connection = player.connect();
    let (result, output) = list(&mut connection);
    drop(connection);
    assert_eq!(result.unwrap(), 2);
    assert_eq!(output, "0: foo\n1: bar\n");
    player.received();
}

#[test]
fn listing_with_split_line() {
    let player = FakePlayer::reply(&["fo", "o\nbar\n__END__\n"], false);
    let mut connection = player.connect();
    let (result, output) = list(&mut connection);
    drop(connection);
    assert_eq!(result.unwrap(), 2);
    assert_eq!(output, "0: foo\n1: bar\n");
    player.received();
}

#[test]
fn listing_closed_early() {
    let player = FakePlayer::reply(&["foo\n"], true);
    let mut connection = player.connect();
    let (result, output) = list(&mut connection);
    drop(connection);
    assert!(matches!(result, Err(Error::Truncated { received: 1 })));
    assert_eq!(output, "0: foo\n");
    player.received();
}

#[test]
fn connection_refused() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let target = ConnectionTarget::new("127.0.0.1", port);
    match Connection::new(&target) {
        Err(Error::Connect { target: failed, .. }) => assert_eq!(failed, target),
        Err(err) => panic!("unexpected error: {}", err),
        Ok(_) => panic!("connected to a closed port"),
    }
}

#[test]
fn unknown_host() {
    let target = ConnectionTarget::new("no-such-host.invalid", 12454);
    assert!(matches!(
        Connection::new(&target),
        Err(Error::Connect { .. })
    ));
}
