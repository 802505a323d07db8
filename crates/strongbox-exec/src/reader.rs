//! Background reader forwarding a child's stdout line by line.

use std::io::{self, BufRead, BufReader, Read};
use std::thread;

use crossbeam_channel::{unbounded, Receiver};

pub(crate) enum ReadEvent {
    /// One line, without its terminator.
    Line(String),
    Eof,
    Failed(io::Error),
}

/// Spawn a thread that reads `source` until end of stream or error.
///
/// The thread ends on its own once the stream closes or the receiver is dropped.
pub(crate) fn spawn_line_reader(
    name: &str,
    source: impl Read + Send + 'static,
) -> io::Result<Receiver<ReadEvent>> {
    let (sender, receiver) = unbounded();

    thread::Builder::new()
        .name(format!("exec-{name}-stdout"))
        .spawn(move || {
            let mut reader = BufReader::new(source);

            loop {
                let mut line = String::new();
                let event = match reader.read_line(&mut line) {
                    Ok(0) => ReadEvent::Eof,
                    Ok(_) => {
                        if line.ends_with('\n') {
                            line.pop();
                        }
                        ReadEvent::Line(line)
                    }
                    Err(error) => ReadEvent::Failed(error),
                };

                let last = !matches!(event, ReadEvent::Line(_));
                if sender.send(event).is_err() || last {
                    break;
                }
            }
        })?;

    Ok(receiver)
}
