use std::fmt;

/// Direction of the transform stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Encrypt,
    Decrypt,
}

/// Source of raw tokens for the producer stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    /// One token supplied on the command line.
    Single(String),
    /// N empty tokens, each asking the transformer for a fresh key.
    Generate(usize),
    /// Newline-delimited tokens from the input stream.
    Batch,
}

/// Output rendering selected for the sink stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Header line plus one comma-separated line per record.
    #[default]
    Csv,
    /// Multi-line labeled block per record.
    Detail,
}

/// Immutable run configuration, built once before the pipeline starts and
/// shared read-only with every stage constructor.
#[derive(Clone)]
pub struct Config {
    pub operation: Operation,
    pub input: InputMode,
    pub output: OutputFormat,
    pub passphrase: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("operation", &self.operation)
            .field("input", &self.input)
            .field("output", &self.output)
            .field("passphrase", &"<redacted>")
            .finish()
    }
}
