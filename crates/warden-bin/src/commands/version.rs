// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `version` command.

use crate::cli::Cli;
use crate::error::BinResult;

/// Displays version information.
pub fn version(_cli: &Cli) -> BinResult<()> {
    println!("warden - HTTP authentication and authorization server");
    println!();
    println!("Version Information:");
    println!("  warden-bin:    {}", crate::VERSION);
    println!("  warden-core:   {}", warden_core::VERSION);
    println!("  warden-api:    {}", warden_api::VERSION);
    println!("  warden-config: {}", warden_config::VERSION);
    println!();
    println!("Token Signing:");
    println!("  Algorithm:    {:?}", warden_api::auth::SIGNING_ALGORITHM);
    println!("  Accepted:     {:?}", warden_api::auth::ACCEPTED_ALGORITHMS);
    println!();
    println!("Build Information:");
    println!("  Target:       {}", std::env::consts::ARCH);
    println!("  OS:           {}", std::env::consts::OS);
    println!();
    println!("License: PolyForm Noncommercial License 1.0.0");
    println!("Copyright (c) 2025 Sylvex. All rights reserved.");

    Ok(())
}
