//! Three-stage streaming pipeline: producer → transformer → sink.
//!
//! Stages hand items over zero-capacity channels, so no stage ever gets
//! more than one item ahead of its consumer. A stage signals end-of-stream
//! by dropping its sender; the next stage observes the closed channel once
//! it has drained what was in flight.

pub mod producer;
pub mod sink;
pub mod transformer;

use std::io::{BufRead, Write};
use std::thread;

use crossbeam::channel::bounded;
use tracing::debug;

use crate::config::{Config, Operation, OutputFormat};
use crate::keys::{Bip38Key, KeyBackend, PrivateKey};
use crate::types::RunError;

pub use producer::Producer;
pub use sink::{CsvSink, DetailSink};
pub use transformer::{DecryptWorker, EncryptWorker};

/// Raw token handed from producer to transformer. Empty means "generate a
/// fresh key"; anything else is parsed.
pub type RawToken = String;

/// Completed unit flowing from transformer to sink. Both halves exist by
/// construction; a partially transformed item never reaches the sink.
#[derive(Debug, Clone)]
pub struct KeyRecord {
    pub private: PrivateKey,
    pub bip38: Bip38Key,
}

/// Wire the configured stages together and run the stream to completion.
///
/// The transformer and sink each get a dedicated worker thread; the
/// producer runs inline on the caller's thread, so producing the next token
/// blocks until the transformer is ready for it. The sink's done token is
/// the completion signal; worker errors surface through the scoped joins.
pub fn run_pipeline<R, W, B>(config: &Config, input: R, output: W, backend: B) -> Result<(), RunError>
where
    R: BufRead,
    W: Write + Send,
    B: KeyBackend + Send,
{
    let (token_tx, token_rx) = bounded::<RawToken>(0);
    let (record_tx, record_rx) = bounded::<KeyRecord>(0);
    let (done_tx, done_rx) = bounded::<()>(0);

    thread::scope(|scope| {
        let transformer = match config.operation {
            Operation::Encrypt => {
                let worker = EncryptWorker::new(config, backend);
                scope.spawn(move || worker.run(token_rx, record_tx))
            }
            Operation::Decrypt => {
                let worker = DecryptWorker::new(config, backend);
                scope.spawn(move || worker.run(token_rx, record_tx))
            }
        };

        let sink = match config.output {
            OutputFormat::Csv => {
                let sink = CsvSink::new(output);
                scope.spawn(move || sink.run(record_rx, done_tx))
            }
            OutputFormat::Detail => {
                let sink = DetailSink::new(output);
                scope.spawn(move || sink.run(record_rx, done_tx))
            }
        };

        let fed = Producer::new(config).drive(input, token_tx);
        debug!("producer finished, pipeline draining");

        // The sink sends once its input is closed and exhausted. If a stage
        // died early its sender is simply gone; the joins report the cause.
        let _ = done_rx.recv();
        debug!("sink signaled completion");

        let transformed = transformer
            .join()
            .map_err(|_| RunError::Pipeline("transformer thread panicked"))?;
        let flushed = sink
            .join()
            .map_err(|_| RunError::Pipeline("sink thread panicked"))?;

        transformed?;
        flushed?;
        fed
    })
}
