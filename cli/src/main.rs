//! BIP38 encryption tool: encrypt and decrypt Bitcoin private keys under a
//! passphrase, streaming one record at a time.

use std::env;
use std::io;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use bip38_core::config::{Config, InputMode, Operation, OutputFormat};
use bip38_core::keys::Secp256k1Backend;
use bip38_core::pipeline::run_pipeline;

/// Environment variable supplying the passphrase when not prompting.
const PASS_ENV: &str = "BIP38_PASS";

const AFTER_HELP: &str = "\
Environment:
  BIP38_PASS    Passphrase to use when --ask-pass is not given.

Examples:
  bip38tool encrypt -p 5KJvsngHeMpm884wtkJNzQGaCErckhHJBGFsvd3VyK5qMZXj3hS

  BIP38_PASS=secret bip38tool encrypt new

  cat keyfile | BIP38_PASS=secret bip38tool encrypt batch

  The keyfile is a list of private keys one per line in hex or base58
  format. Lines that fail to parse are reported on stderr and skipped;
  the run still exits 0 even if every line was skipped.

  BIP38_PASS=secret bip38tool decrypt 6PRQ7ivF6rFMn1wc7z6w1ZfFsKh4EAY1mhF3gCYkw8PLRMwfZNVqeqmW3F
";

#[derive(Parser)]
#[command(name = "bip38tool", version, about = "BIP38 encryption tool", after_help = AFTER_HELP)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encrypt a private key under a passphrase
    Encrypt(ModeArgs),
    /// Decrypt a BIP38 key back into a private key
    Decrypt(ModeArgs),
}

#[derive(Args)]
struct ModeArgs {
    /// Key to process, or the literal word `new` or `batch`
    #[arg(value_name = "PRIVATEKEY|new|batch")]
    input: Option<String>,

    /// Number of new keys to generate (with `new`)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    count: u32,

    /// Output in CSV format (the default)
    #[arg(short, long, conflicts_with = "detail")]
    csv: bool,

    /// Output in Detail format
    #[arg(short, long)]
    detail: bool,

    /// Ask for the passphrase instead of using the environment variable
    #[arg(short = 'p', long)]
    ask_pass: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let (operation, args) = match cli.command {
        Command::Encrypt(args) => (Operation::Encrypt, args),
        Command::Decrypt(args) => (Operation::Decrypt, args),
    };

    let input = input_mode(&args, operation)?;
    let batch = input == InputMode::Batch;
    let passphrase = resolve_passphrase(args.ask_pass, batch)?;
    let output = match (args.csv, args.detail) {
        (false, true) => OutputFormat::Detail,
        _ => OutputFormat::Csv,
    };

    let config = Config {
        operation,
        input,
        output,
        passphrase,
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_pipeline(&config, stdin.lock(), stdout, Secp256k1Backend)
        .context("pipeline failed")?;
    Ok(())
}

/// Map the positional argument onto an input mode.
fn input_mode(args: &ModeArgs, operation: Operation) -> Result<InputMode> {
    match args.input.as_deref() {
        Some("batch") => Ok(InputMode::Batch),
        Some("new") if operation == Operation::Encrypt => {
            Ok(InputMode::Generate(args.count as usize))
        }
        Some("new") => bail!("`new` only makes sense with encrypt"),
        Some(key) => Ok(InputMode::Single(key.to_string())),
        None => bail!("missing private key (or `new`/`batch` mode)"),
    }
}

/// Resolve the passphrase from the prompt or the environment.
///
/// Batch mode owns stdin for key material, so prompting is disabled there
/// and the environment variable is the only source.
fn resolve_passphrase(ask: bool, batch: bool) -> Result<String> {
    if ask && !batch {
        let pass = rpassword::prompt_password("Enter Passphrase:")
            .context("failed to read passphrase")?;
        let repeat = rpassword::prompt_password("Verify Passphrase:")
            .context("failed to read passphrase")?;
        if pass != repeat {
            bail!("passphrase does not match");
        }
        return Ok(pass);
    }
    match env::var(PASS_ENV) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => bail!("environment variable {PASS_ENV} not found"),
    }
}
