use std::io::BufRead;

use crossbeam::channel::Sender;
use tracing::debug;

use crate::config::{Config, InputMode};
use crate::types::RunError;

use super::RawToken;

/// First stage: turns the configured input mode into an ordered, finite
/// token sequence. Does no key work itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Producer {
    /// One whitespace-trimmed token.
    Single(String),
    /// N empty tokens, each requesting a fresh key downstream.
    Generate(usize),
    /// One trimmed token per line read from the input stream.
    Batch,
}

impl Producer {
    pub fn new(config: &Config) -> Self {
        match &config.input {
            InputMode::Single(value) => Producer::Single(value.clone()),
            InputMode::Generate(count) => Producer::Generate(*count),
            InputMode::Batch => Producer::Batch,
        }
    }

    /// Emit every token in order, then drop the sender to close the stream.
    ///
    /// Runs on the coordinator's thread: each send blocks until the
    /// transformer takes the token. In batch mode any read failure,
    /// ordinary end-of-stream included, ends the sequence; blank lines are
    /// still emitted.
    pub fn drive<R: BufRead>(self, mut input: R, tx: Sender<RawToken>) -> Result<(), RunError> {
        match self {
            Producer::Single(value) => {
                send(&tx, value.trim().to_string())?;
            }
            Producer::Generate(count) => {
                for _ in 0..count {
                    send(&tx, RawToken::new())?;
                }
            }
            Producer::Batch => {
                let mut line = String::new();
                loop {
                    line.clear();
                    match input.read_line(&mut line) {
                        // A line is only complete with its newline; EOF on a
                        // partial line ends the stream like any other read
                        // failure.
                        Ok(_) if line.ends_with('\n') => {
                            send(&tx, line.trim().to_string())?;
                        }
                        Ok(_) | Err(_) => break,
                    }
                }
                debug!("input stream ended");
            }
        }
        Ok(())
    }
}

fn send(tx: &Sender<RawToken>, token: RawToken) -> Result<(), RunError> {
    tx.send(token)
        .map_err(|_| RunError::Pipeline("token channel closed before end of input"))
}
