//! Info command handler.

use crate::CliOutput;
use crate::error::{CliError, ExitCode};
use crate::format::{OutputMode, to_json_line};
use request_guard_api::api_crate_version;
use request_guard_config::config_crate_version;
use request_guard_host::host_crate_version;
use request_guard_shared::shared_crate_version;

struct BuildInfo {
    name: &'static str,
    version: &'static str,
    api: &'static str,
    config: &'static str,
    host: &'static str,
    shared: &'static str,
    profile: &'static str,
}

const fn build_info() -> BuildInfo {
    BuildInfo {
        name: env!("CARGO_BIN_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        api: api_crate_version(),
        config: config_crate_version(),
        host: host_crate_version(),
        shared: shared_crate_version(),
        profile: if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
    }
}

/// Run the info command.
pub fn run_info(mode: OutputMode) -> Result<CliOutput, CliError> {
    let build = build_info();

    let stdout = if mode.is_json() {
        format_info_json(&build)?
    } else {
        format_info_text(&build)
    };

    Ok(CliOutput {
        stdout,
        stderr: String::new(),
        exit_code: ExitCode::Ok,
    })
}

fn format_info_text(build: &BuildInfo) -> String {
    format!(
        "status: ok\nname: {}\nversion: {}\napi: {}\nconfig: {}\nhost: {}\nshared: {}\nprofile: {}\n",
        build.name,
        build.version,
        build.api,
        build.config,
        build.host,
        build.shared,
        build.profile,
    )
}

fn format_info_json(build: &BuildInfo) -> Result<String, CliError> {
    let payload = serde_json::json!({
        "status": "ok",
        "build": {
            "name": build.name,
            "version": build.version,
            "apiVersion": build.api,
            "configVersion": build.config,
            "hostVersion": build.host,
            "sharedVersion": build.shared,
            "profile": build.profile,
        }
    });
    to_json_line(&payload)
}
