// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Resolve | Edit | Info | Clients | Serve | Options
//! ```

use std::process::ExitCode;

use p4_workspace::cli::global::GlobalOptions;
use p4_workspace::cli::{self, Command};
use p4_workspace::cmd::config::{run_inis_command, run_options_command};
use p4_workspace::cmd::query::{run_clients_command, run_info_command};
use p4_workspace::cmd::serve::run_serve_command;
use p4_workspace::cmd::workspace::{run_edit_command, run_resolve_command};
use p4_workspace::config::loader::ConfigLoader;
use p4_workspace::config::{Config, ENV_PREFIX, LOCAL_CONFIG_FILE};
use p4_workspace::logging::{LogConfig, LogReason, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            return ExitCode::SUCCESS;
        }
        Some(Command::Inis) => {
            run_inis_command(&build_config_loader(&cli.global).format_loaded_files());
            return ExitCode::SUCCESS;
        }
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            return ExitCode::FAILURE;
        }
        Some(_) => {}
    }

    let config = match load_config(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_config = build_log_config(&config);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing::debug!(
        reason = LogReason::Config.as_str(),
        options = ?config.format_options(),
        "configuration loaded"
    );

    dispatch_command(&cli, &config).await
}

fn build_log_config(config: &Config) -> LogConfig {
    LogConfig::builder()
        .with_console_level(config.log.level)
        .with_file_level(config.log.file_level)
        .maybe_with_log_file(config.log.file().map(|p| p.display().to_string()))
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: &Config) -> ExitCode {
    let json = cli.global.json;
    let result = match &cli.command {
        Some(Command::Options) => run_options_command(config, json),
        Some(Command::Resolve(args)) => run_resolve_command(args, config, json).await,
        Some(Command::Edit(args)) => run_edit_command(args, config, json).await,
        Some(Command::Info(args)) => run_info_command(args, config, json).await,
        Some(Command::Clients(args)) => run_clients_command(args, config, json).await,
        Some(Command::Serve(args)) => run_serve_command(args, config).await,
        Some(Command::Version | Command::Inis) | None => Ok(()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional(LOCAL_CONFIG_FILE);
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader.with_env_prefix(ENV_PREFIX)
}

fn load_config(global: &GlobalOptions) -> p4_workspace::error::Result<Config> {
    global
        .to_config_overrides()
        .iter()
        .try_fold(build_config_loader(global), |loader, option| {
            loader.set_from_str(option)
        })?
        .build()
}
