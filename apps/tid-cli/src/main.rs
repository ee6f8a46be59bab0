use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use thiserror::Error;
use tid::config::{ConfigError, KeyringConfig};
use tid::{inspect, Mode, TagLength, Tid, TidCodec, TidError};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "tid-cli", about = "Generate and verify tagged 128-bit identifiers")]
struct Cli {
    /// Keyring TOML file.
    #[arg(long, env = "TID_KEYRING", global = true)]
    keyring: Option<PathBuf>,
    /// Print results as JSON.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate identifiers for a type label.
    Generate {
        /// Type label the identifiers are bound to.
        #[arg(long = "type")]
        type_label: String,
        /// Generation mode; falls back to the keyring file default, then
        /// "random".
        #[arg(long, value_parser = parse_mode)]
        mode: Option<Mode>,
        /// Verification tag length in bytes (1 or 2); falls back to the
        /// keyring file default, then 1.
        #[arg(long, value_parser = parse_tag_length)]
        tag_length: Option<TagLength>,
        /// Number of identifiers to generate.
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Decode an identifier and verify it against a type label.
    ///
    /// Exits nonzero when the identifier is rejected.
    Decode {
        /// Expected type label.
        #[arg(long = "type")]
        type_label: String,
        /// Identifier in canonical or compact hex form.
        tid: String,
    },
    /// Print the unauthenticated structural fields of an identifier.
    Inspect {
        /// Identifier in canonical or compact hex form.
        tid: String,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("a keyring is required (--keyring or TID_KEYRING)")]
    MissingKeyring,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Tid(#[from] TidError),
    #[error("output encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

fn parse_mode(input: &str) -> Result<Mode, String> {
    input.parse().map_err(|e: TidError| e.to_string())
}

fn parse_tag_length(input: &str) -> Result<TagLength, String> {
    let value: u8 = input
        .parse()
        .map_err(|_| "tag length must be 1 or 2".to_string())?;
    TagLength::try_from(value).map_err(|e| e.to_string())
}

fn load_config(path: Option<&PathBuf>) -> Result<KeyringConfig, CliError> {
    let path = path.ok_or(CliError::MissingKeyring)?;
    debug!("loading keyring from {}", path.display());
    Ok(KeyringConfig::load(path)?)
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    match cli.command {
        Command::Generate {
            type_label,
            mode,
            tag_length,
            count,
        } => {
            let config = load_config(cli.keyring.as_ref())?;
            let mode = mode.or(config.default_mode).unwrap_or(Mode::Random);
            let tag_length = match tag_length {
                Some(t) => t,
                None => config.default_tag_length()?.unwrap_or(TagLength::One),
            };
            let codec = TidCodec::new(config.build_keyring()?);

            let mut generated = Vec::with_capacity(count);
            for _ in 0..count {
                generated.push(codec.generate(type_label.as_bytes(), mode, tag_length)?);
            }
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&generated)?);
            } else {
                for tid in &generated {
                    println!("{tid}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Decode { type_label, tid } => {
            let config = load_config(cli.keyring.as_ref())?;
            let codec = TidCodec::new(config.build_keyring()?);
            let parsed: Tid = tid.parse()?;
            let info = codec.decode(&parsed, type_label.as_bytes())?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                println!("valid_tag:    {}", info.valid_tag);
                println!("type_matches: {}", info.type_matches);
                println!("timestamp_ms: {}", info.timestamp_ms);
                println!("secret_index: {}", info.secret_index);
                println!("mode:         {}", info.mode);
                println!("version:      {}", info.version);
            }
            if info.valid_tag && info.type_matches {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Inspect { tid } => {
            let parsed: Tid = tid.parse()?;
            let structure = inspect(&parsed);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&structure)?);
            } else {
                println!("tag_length:   {}", structure.tag_length);
                println!("secret_index: {}", structure.secret_index);
                println!("version:      {}", structure.version);
                println!("mode:         {}", structure.mode);
                println!("timestamp_ms: {}", structure.timestamp_ms);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
