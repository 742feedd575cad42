//! Config commands.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, envelope_output};
use request_guard_config::{GuardConfig, to_pretty_json, to_pretty_toml};

/// Run `config show`: JSON in JSON mode, TOML otherwise.
pub fn run_config_show(mode: OutputMode, config: &GuardConfig) -> Result<CliOutput, CliError> {
    let rendered = if mode.is_json() {
        to_pretty_json(config)
    } else {
        to_pretty_toml(config)
    };

    Ok(match rendered {
        Ok(stdout) => CliOutput {
            stdout,
            stderr: String::new(),
            exit_code: ExitCode::Ok,
        },
        Err(error) => envelope_output(mode, &error),
    })
}
