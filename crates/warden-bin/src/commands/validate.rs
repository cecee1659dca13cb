// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `validate` command.

use anyhow::Context;
use warden_config::{ConfigError, WardenConfig};

use crate::cli::{Cli, OutputFormat, ValidateArgs};
use crate::error::{BinError, BinResult};

/// Recommended minimum secret length in bytes.
const MIN_SECRET_LEN: usize = 32;

/// Validates the configuration file and prints a summary.
pub fn validate(cli: &Cli, args: ValidateArgs) -> BinResult<()> {
    let config_path = &cli.config;

    if !config_path.exists() {
        return Err(BinError::config(
            config_path,
            ConfigError::file_not_found(config_path),
        ));
    }

    let config =
        warden_config::load_config(config_path).map_err(|e| BinError::config(config_path, e))?;

    let warnings = collect_warnings(&config);
    let tokens = &config.security.tokens;

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", config_path.display());
            println!();
            println!("Summary:");
            println!("  Listen:       {}", config.server.socket_addr());
            println!("  Base path:    {}", config.server.base_path);
            println!("  Access TTL:   {}h", tokens.access_ttl_hours);
            println!("  Refresh TTL:  {}h", tokens.refresh_ttl_hours);
            println!("  Permissions:  {}", config.directory.permissions.len());
            println!("  Roles:        {}", config.directory.roles.len());
            println!("  Accounts:     {}", config.directory.accounts.len());
            println!("  Links:        {}", config.directory.links.len());

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                let rendered = serde_json::to_string_pretty(&config.redacted())
                    .context("failed to render config")?;
                println!();
                println!("Parsed configuration:");
                println!("{}", rendered);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "summary": {
                    "listen": config.server.socket_addr().to_string(),
                    "base_path": config.server.base_path,
                    "access_ttl_hours": tokens.access_ttl_hours,
                    "refresh_ttl_hours": tokens.refresh_ttl_hours,
                    "permissions": config.directory.permissions.len(),
                    "roles": config.directory.roles.len(),
                    "accounts": config.directory.accounts.len(),
                    "links": config.directory.links.len(),
                },
                "warnings": warnings,
                "config": if args.show_config { Some(config.redacted()) } else { None },
            });
            let rendered = serde_json::to_string_pretty(&output)
                .context("failed to render output")?;
            println!("{}", rendered);
        }
    }

    if args.strict && !warnings.is_empty() {
        return Err(BinError::StrictWarnings {
            count: warnings.len(),
        });
    }

    Ok(())
}

/// Returns non-fatal issues worth fixing before deployment.
fn collect_warnings(config: &WardenConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let tokens = &config.security.tokens;

    for (name, secret) in [
        ("access_secret", &tokens.access_secret),
        ("refresh_secret", &tokens.refresh_secret),
    ] {
        if let Some(secret) = secret {
            if secret.expose().len() < MIN_SECRET_LEN {
                warnings.push(format!(
                    "security.tokens.{} is shorter than {} bytes",
                    name, MIN_SECRET_LEN
                ));
            }
        }
    }

    let accounts = &config.directory.accounts;
    if accounts.is_empty() {
        warnings.push("No accounts seeded; nobody can log in".to_string());
    } else if !accounts.iter().any(|a| a.superuser || a.roles.iter().any(|r| r.eq_ignore_ascii_case("admin"))) {
        warnings.push("No superuser or admin account seeded".to_string());
    }

    let cors = &config.server.cors;
    if cors.allow_credentials && cors.allowed_origins.iter().any(|o| o == "*") {
        warnings.push("CORS allow_credentials is ignored with a wildcard origin".to_string());
    }

    warnings
}
