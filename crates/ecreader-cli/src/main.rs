use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ecreader_core::mpr::ModuleBody;
use ecreader_core::{DecodeOptions, MprFile};
use glob::glob;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ecreader")]
#[command(version)]
#[command(
    about = "Decoder for EC-Lab .mpr modular files (settings, data, log, loop modules).",
    long_about = None,
    after_help = "Examples:\n  ecreader mpr decode run.mpr -o run.json\n  ecreader mpr decode run.mpr --stdout --pretty\n  ecreader mpr info run.mpr"
)]
struct Cli {
    /// Enable debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on .mpr inputs.
    Mpr {
        #[command(subcommand)]
        command: MprCommands,
    },
}

#[derive(Subcommand, Debug)]
enum MprCommands {
    /// Decode a file and write its modules as a versioned JSON document.
    #[command(
        after_help = "Examples:\n  ecreader mpr decode run.mpr -o run.json\n  ecreader mpr decode 'runs/*_C01.mpr' --stdout"
    )]
    Decode {
        /// Path to a .mpr file (a glob pattern must match exactly one file)
        input: PathBuf,

        /// Output document path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        output: Option<PathBuf>,

        /// Write JSON document to stdout
        #[arg(long, conflicts_with = "output")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Text encoding of strings inside the file
        #[arg(long, default_value = ecreader_core::DEFAULT_ENCODING)]
        encoding: String,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
    /// Print a per-module summary.
    Info {
        /// Path to a .mpr file (a glob pattern must match exactly one file)
        input: PathBuf,

        /// Text encoding of strings inside the file
        #[arg(long, default_value = ecreader_core::DEFAULT_ENCODING)]
        encoding: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Mpr { command } => match command {
            MprCommands::Decode {
                input,
                output,
                stdout,
                pretty,
                compact,
                encoding,
                quiet,
            } => cmd_mpr_decode(input, output, stdout, pretty, compact, &encoding, quiet),
            MprCommands::Info { input, encoding } => cmd_mpr_info(input, &encoding),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_mpr_decode(
    input: PathBuf,
    output: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    encoding: &str,
    quiet: bool,
) -> Result<(), CliError> {
    let options = resolve_options(encoding)?;
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let input_abs = fs::canonicalize(&resolved_input)
        .with_context(|| format!("Failed to resolve input path: {}", resolved_input.display()))?;
    let output = if stdout {
        None
    } else {
        Some(output.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--output or --stdout".to_string()),
            )
        })?)
    };

    if let Some(output_path) = output.as_ref() {
        let output_dir = output_path
            .parent()
            .map(|parent| {
                if parent.as_os_str().is_empty() {
                    fs::canonicalize(".")
                } else {
                    fs::canonicalize(parent)
                }
            })
            .transpose()
            .with_context(|| format!("Failed to resolve output path: {}", output_path.display()))?;
        if let Some(output_dir) = output_dir {
            let output_target = output_dir.join(
                output_path
                    .file_name()
                    .ok_or_else(|| anyhow::anyhow!("Invalid output path"))?,
            );
            if output_target == input_abs {
                return Err(CliError::new(
                    format!(
                        "output path must differ from input: {}",
                        output_path.display()
                    ),
                    Some("choose a different output path".to_string()),
                ));
            }
        }
    }

    debug!(
        input = %resolved_input.display(),
        encoding = options.encoding.name(),
        "decoding input"
    );
    let document = decode(&resolved_input, &options)?;
    let json = serialize_document(&document, pretty, compact)?;

    let Some(output) = output else {
        print!("{}", json);
        return Ok(());
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }

    fs::write(&output, json)
        .with_context(|| format!("Failed to write output: {}", output.display()))?;

    if !quiet {
        eprintln!(
            "OK: {} modules decoded -> {}",
            document.modules.len(),
            output.display()
        );
    }
    Ok(())
}

fn cmd_mpr_info(input: PathBuf, encoding: &str) -> Result<(), CliError> {
    let options = resolve_options(encoding)?;
    let resolved_input = resolve_input_path(&input)?;
    validate_input_file(&resolved_input)?;
    let document = decode(&resolved_input, &options)?;

    for (index, module) in document.modules.iter().enumerate() {
        let header = &module.header;
        let summary = match &module.body {
            ModuleBody::Settings(settings) => format!(
                "technique {} ({} parameter sequences)",
                settings.technique,
                settings.params.len()
            ),
            ModuleBody::Data(data) => format!(
                "{} rows x {} columns [{}]",
                data.rows.len(),
                data.schema.len(),
                data.column_names().join(", ")
            ),
            ModuleBody::Log(log) => match log.started_at() {
                Some(started) => format!("started {}", started),
                None => "no start time".to_string(),
            },
            ModuleBody::Loop(loops) => format!("{} loop indices", loops.indices.len()),
        };
        println!(
            "{:>2} {} v{} {} bytes: {}",
            index,
            header.short_name.trim_end(),
            header.version,
            header.length,
            summary
        );
    }
    Ok(())
}

fn decode(input: &PathBuf, options: &DecodeOptions) -> Result<MprFile, CliError> {
    ecreader_core::decode_mpr_file_with(input, options)
        .context("MPR decoding failed")
        .map_err(|err| {
            CliError::new(
                format!("{:#}", err),
                Some("the file may be truncated or from an unsupported EC-Lab version".to_string()),
            )
        })
}

fn resolve_options(encoding: &str) -> Result<DecodeOptions, CliError> {
    DecodeOptions::from_label(encoding).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some("use a WHATWG label such as windows-1252 or utf-8".to_string()),
        )
    })
}

fn serialize_document(document: &MprFile, pretty: bool, compact: bool) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(document)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(document)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("use a .mpr file".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("use a .mpr file".to_string()),
        ));
    }
    let ext = input
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != "mpr" {
        return Err(CliError::new(
            format!("unsupported input format '{}'", input.display()),
            Some("expected a .mpr file".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern; expected a .mpr file".to_string()),
        ));
    }
    if matches.len() > 1 {
        let hint = "pass a single .mpr file, or run once per file".to_string();
        let mut message = format!(
            "multiple files match pattern '{}' ({} matches)",
            pattern,
            matches.len()
        );
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>();
        message.push_str("; matches: ");
        message.push_str(&listed.join(", "));
        if matches.len() > 3 {
            message.push_str(", ...");
        }
        return Err(CliError::new(message, Some(hint)));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
