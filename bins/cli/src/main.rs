//! CLI binary entrypoint.

mod commands;
mod error;
mod format;

use clap::{ArgAction, Parser, Subcommand};
use commands::{
    BuildErrorInput, ValidateInput, run_catalog_list, run_catalog_show, run_config_show,
    run_error_build, run_info, run_validate,
};
use error::{CliError, ExitCode};
use format::{OutputArgs, OutputMode, envelope_output};
use request_guard_config::{GuardConfig, LogConfig, load_guard_config_std_env};
use request_guard_host::init_tracing;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "rguard",
    version,
    about = "Request validation and error catalog CLI",
    long_about = None
)]
struct Cli {
    #[command(flatten)]
    output: OutputArgs,

    /// Config file (JSON/TOML). Environment overrides still apply.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (repeatable).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show build and version details.
    Info,
    /// Inspect the error catalog.
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Structured error commands.
    Error {
        #[command(subcommand)]
        command: ErrorCommands,
    },
    /// Validate arguments against an operation signature file.
    Validate {
        /// Signature file (JSON/TOML).
        #[arg(long)]
        signature: PathBuf,
        /// Arguments as a JSON object.
        #[arg(long, conflicts_with = "stdin")]
        args_json: Option<String>,
        /// Read the arguments object from stdin.
        #[arg(long)]
        stdin: bool,
    },
    /// Config-related commands.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Debug, Subcommand)]
enum CatalogCommands {
    /// List every catalog entry.
    List {
        /// Catalog file; defaults to the configured or built-in catalog.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
    /// Show one catalog entry.
    Show {
        /// Error code.
        code: String,
        /// Catalog file; defaults to the configured or built-in catalog.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
enum ErrorCommands {
    /// Build and render a structured error.
    Build {
        /// Error code.
        code: String,
        /// Module raising the error; defaults to the configured module.
        #[arg(long)]
        module: Option<String>,
        /// Dynamic content value (JSON, or plain text). Repeat in placeholder order.
        #[arg(long = "arg")]
        args: Vec<String>,
        /// Catalog file; defaults to the configured or built-in catalog.
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration.
    Show,
}

pub(crate) struct CliOutput {
    stdout: String,
    stderr: String,
    exit_code: ExitCode,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    let mode = OutputMode::from_args(&cli.output);

    let result = match load_guard_config_std_env(cli.config.as_deref()) {
        Ok(config) => {
            init_logging(&config.log, cli.verbose);
            run(&cli.command, mode, &config)
        },
        Err(error) => Ok(envelope_output(mode, &error)),
    };

    match result {
        Ok(output) => match write_output(&output) {
            Ok(()) => std::process::ExitCode::from(output.exit_code.as_u8()),
            Err(error) => exit_with_error(&error),
        },
        Err(error) => exit_with_error(&error),
    }
}

fn init_logging(log: &LogConfig, verbose: u8) {
    let mut log = log.clone();
    for _ in 0..verbose {
        log.level = log.level.more_verbose();
    }
    if let Err(error) = init_tracing(&log) {
        let _ = writeln!(io::stderr(), "warning: {error}");
    }
}

fn exit_with_error(error: &CliError) -> std::process::ExitCode {
    let _ = writeln!(io::stderr(), "error: {error}");
    std::process::ExitCode::from(error.exit_code().as_u8())
}

fn run(command: &Commands, mode: OutputMode, config: &GuardConfig) -> Result<CliOutput, CliError> {
    tracing::debug!(?command, "running command");
    match command {
        Commands::Info => run_info(mode),
        Commands::Catalog { command } => match command {
            CatalogCommands::List { catalog } => run_catalog_list(mode, config, catalog.as_deref()),
            CatalogCommands::Show { code, catalog } => {
                run_catalog_show(mode, config, catalog.as_deref(), code)
            },
        },
        Commands::Error { command } => match command {
            ErrorCommands::Build {
                code,
                module,
                args,
                catalog,
            } => run_error_build(
                mode,
                config,
                BuildErrorInput {
                    code,
                    module: module.as_deref(),
                    args,
                    catalog: catalog.as_deref(),
                },
            ),
        },
        Commands::Validate {
            signature,
            args_json,
            stdin,
        } => run_validate(
            mode,
            config,
            ValidateInput {
                signature: signature.as_path(),
                args_json: args_json.as_deref(),
                from_stdin: *stdin,
            },
        ),
        Commands::Config { command } => match command {
            ConfigCommands::Show => run_config_show(mode, config),
        },
    }
}

fn write_output(output: &CliOutput) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    stdout.write_all(output.stdout.as_bytes())?;

    if !output.stderr.is_empty() {
        let mut stderr = io::stderr();
        stderr.write_all(output.stderr.as_bytes())?;
        stderr.flush()?;
    }

    Ok(())
}
