// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Warden - token authentication and role/permission authorization server.
//!
//! Main binary entry point.

use anyhow::anyhow;
use warden_bin::{commands, BinError, Cli};

fn main() {
    let cli = Cli::parse_args();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("warden-worker")
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => BinError::from(anyhow!("failed to start async runtime: {}", e)).exit(),
    };

    if let Err(e) = runtime.block_on(commands::execute(cli)) {
        e.exit();
    }
}
