use std::io::Write;

use crossbeam::channel::{Receiver, Sender};

use crate::types::RunError;

use super::KeyRecord;

/// Tabular sink: header first, one comma-separated line per record.
pub struct CsvSink<W> {
    out: W,
}

impl<W: Write> CsvSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Consume records in arrival order, then send the done token.
    pub fn run(mut self, rx: Receiver<KeyRecord>, done: Sender<()>) -> Result<(), RunError> {
        // Header goes out before the first record, even for an empty run.
        writeln!(self.out, "Public Key,BIP38 Key")?;
        while let Ok(record) = rx.recv() {
            writeln!(self.out, "{},{}", record.private.public_key(), record.bip38)?;
        }
        self.out.flush()?;
        let _ = done.send(());
        Ok(())
    }
}

/// Detailed sink: one delimited, labeled block per record.
pub struct DetailSink<W> {
    out: W,
}

impl<W: Write> DetailSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn run(mut self, rx: Receiver<KeyRecord>, done: Sender<()>) -> Result<(), RunError> {
        while let Ok(record) = rx.recv() {
            let private = &record.private;
            writeln!(self.out, "---")?;
            writeln!(self.out, "Address:    {}", private.address())?;
            writeln!(self.out, "PublicHex:  {}", private.public_key())?;
            writeln!(self.out, "Private:    {}", private)?;
            writeln!(self.out, "PrivateHex: {}", hex::encode(private.to_bytes()))?;
            writeln!(self.out, "Bip38:      {}", record.bip38)?;
            writeln!(self.out, "Bip38Hex:   {}", hex::encode(record.bip38.to_bytes()))?;
            writeln!(self.out, "...")?;
        }
        self.out.flush()?;
        let _ = done.send(());
        Ok(())
    }
}
