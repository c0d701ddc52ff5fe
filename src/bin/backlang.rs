//! backlang CLI
//!
//! Encode, decode, and run reversed-line `.bck` files.

use anyhow::{Context, Result};
use backlang::error::display_name;
use backlang::naming::{self, CollisionPolicy};
use backlang::{Decoder, Dispatcher, Encoder, LanguageRegistry};
use clap::{ArgAction, Parser, Subcommand};
use std::ffi::OsString;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "backlang")]
#[command(version)]
#[command(about = "Reverse a file's lines, and run reversed scripts")]
#[command(after_help = "ENVIRONMENT:\n    RUST_LOG=debug    Enable debug logging")]
struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode FILE into FILE.bck
    Encode {
        /// File to encode
        file: PathBuf,
    },

    /// Decode a .bck file next to itself
    Decode {
        /// Encoded file (must end in .bck)
        file: PathBuf,

        /// Overwrite an existing output without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Decode a .bck file and execute it with the detected interpreter
    Run {
        /// Encoded script (must end in .bck)
        file: PathBuf,

        /// Arguments passed to the script
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<OsString>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Encode { file } => encode(&file),
        Commands::Decode { file, force } => decode(&file, force),
        Commands::Run { file, args } => run(&file, args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            exit_code(&err)
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<backlang::Error>() {
        Some(e) if e.is_usage() => ExitCode::from(2),
        _ => ExitCode::FAILURE,
    }
}

fn encode(file: &Path) -> Result<()> {
    let output = Encoder::new().encode_file(file)?;
    println!("Encoded '{}' → '{}'", display_name(file), display_name(&output));
    Ok(())
}

fn decode(file: &Path, force: bool) -> Result<()> {
    require_encoded(file, "decode")?;

    let decoder = Decoder::new();
    let decoded = decoder.decode_source(file)?;

    let target = naming::decoded_path(file);
    let policy = if force || !target.exists() || prompt_overwrite(&target)? {
        CollisionPolicy::Overwrite
    } else {
        CollisionPolicy::Rename
    };
    let output = naming::resolve_output(&target, policy);

    decoder.write_decoded(&output, &decoded)?;
    println!("Decoded '{}' → '{}'", display_name(file), display_name(&output));
    Ok(())
}

fn run(file: &Path, args: Vec<OsString>) -> Result<()> {
    require_encoded(file, "run")?;

    let decoder = Decoder::new();
    let decoded = decoder.decode_source(file)?;
    let output = naming::resolve_output(&naming::decoded_path(file), CollisionPolicy::Rename);
    decoder.write_decoded(&output, &decoded)?;
    println!("Decoded '{}' → '{}'", display_name(file), display_name(&output));

    let registry = LanguageRegistry::default();
    let language = registry.detect_file(&output)?;
    println!("Detected {}, running with {}...", language.name, language.command);

    Dispatcher::new().with_args(args).run(language, &output)?;
    Ok(())
}

fn require_encoded(file: &Path, command: &str) -> backlang::Result<()> {
    if naming::has_encoded_suffix(file) {
        Ok(())
    } else {
        Err(backlang::Error::InvalidFormat {
            command: command.to_string(),
        })
    }
}

/// Ask on stdout, read one line from stdin. EOF counts as "no".
fn prompt_overwrite(target: &Path) -> Result<bool> {
    print!("File '{}' exists. Overwrite? (y/n): ", display_name(target));
    io::stdout().flush().context("Failed to write prompt")?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read answer")?;

    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
