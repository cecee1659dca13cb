// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.

mod run;
mod secrets;
mod validate;
mod version;

pub use run::run;
pub use secrets::{gen_secret, hash_password};
pub use validate::validate;
pub use version::version;

use crate::cli::{Cli, Commands, LogFormat};
use crate::error::BinResult;
use crate::logging::init_logging;

/// Executes the appropriate command based on CLI arguments.
pub async fn execute(cli: Cli) -> BinResult<()> {
    match cli.effective_command() {
        Commands::Run(args) => run::run(&cli, args).await,
        Commands::Validate(args) => {
            init_cli_logging(&cli)?;
            validate::validate(&cli, args)
        }
        Commands::HashPassword(args) => {
            init_cli_logging(&cli)?;
            secrets::hash_password(&cli, args)
        }
        Commands::GenSecret(args) => {
            init_cli_logging(&cli)?;
            secrets::gen_secret(&cli, args)
        }
        Commands::Version => version::version(&cli),
    }
}

// `run` installs logging itself once the configuration is loaded.
fn init_cli_logging(cli: &Cli) -> BinResult<()> {
    init_logging(
        cli.effective_log_level("warn"),
        cli.effective_log_format(LogFormat::Compact),
    )
}
