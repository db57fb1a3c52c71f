use once_cell::sync::Lazy;
use std::io::{self, BufRead, BufReader, Read};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

/// What a caller got back from the terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Text(String),
    Eof,
    TimedOut,
}

/// Reads lines on one background thread and hands them out in order.
///
/// A caller that gives up on a timeout does not strand a blocked reader:
/// the line typed afterwards stays queued for the next caller.
pub struct LineReader {
    lines: Mutex<Receiver<Option<String>>>,
}

impl LineReader {
    pub fn spawn<R: Read + Send + 'static>(source: R) -> Self {
        let (sender, receiver) = mpsc::channel();

        thread::spawn(move || {
            let mut reader = BufReader::new(source);
            loop {
                let mut line = String::new();
                let next = match reader.read_line(&mut line) {
                    Ok(0) => None,
                    Ok(_) => Some(line),
                    Err(e) => {
                        log::debug!("stopped reading input: {}", e);
                        None
                    }
                };
                let done = next.is_none();
                if sender.send(next).is_err() || done {
                    break;
                }
            }
        });

        Self {
            lines: Mutex::new(receiver),
        }
    }

    /// Next line without its trailing newline. `None` waits indefinitely.
    pub fn read_line(&self, timeout: Option<Duration>) -> Line {
        let lines = self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let received = match timeout {
            Some(timeout) => lines.recv_timeout(timeout),
            None => lines.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };

        match received {
            Ok(Some(line)) => Line::Text(line.trim_end_matches(['\n', '\r']).to_string()),
            Ok(None) | Err(RecvTimeoutError::Disconnected) => Line::Eof,
            Err(RecvTimeoutError::Timeout) => Line::TimedOut,
        }
    }
}

static STDIN: Lazy<LineReader> = Lazy::new(|| LineReader::spawn(io::stdin()));

/// Shared by the chat loop and the confirmation prompt.
pub fn stdin_lines() -> &'static LineReader {
    &STDIN
}
