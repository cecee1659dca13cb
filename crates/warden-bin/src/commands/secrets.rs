// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `hash-password` and `gen-secret` commands.

use std::io::{self, Read};

use anyhow::Context;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::cli::{Cli, GenSecretArgs, HashPasswordArgs};
use crate::error::{BinError, BinResult};

/// Smallest accepted secret length in bytes.
const MIN_SECRET_BYTES: usize = 32;

/// Prints the argon2 PHC hash of a password.
pub fn hash_password(_cli: &Cli, args: HashPasswordArgs) -> BinResult<()> {
    let password = if args.stdin {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .context("failed to read password from stdin")?;
        input.trim_end_matches(['\r', '\n']).to_string()
    } else {
        args.password
            .ok_or_else(|| BinError::usage("no password provided; pass one or use --stdin"))?
    };

    if password.is_empty() {
        return Err(BinError::usage("password cannot be empty"));
    }

    let hash = warden_api::auth::password::hash_password(&password)
        .context("failed to hash password")?;
    println!("{}", hash);
    Ok(())
}

/// Prints one random secret, or an access/refresh pair.
pub fn gen_secret(_cli: &Cli, args: GenSecretArgs) -> BinResult<()> {
    if args.bytes < MIN_SECRET_BYTES {
        return Err(BinError::usage(format!(
            "secrets must be at least {} bytes",
            MIN_SECRET_BYTES
        )));
    }

    if args.pair {
        println!("WARDEN_ACCESS_SECRET={}", random_secret(args.bytes));
        println!("WARDEN_REFRESH_SECRET={}", random_secret(args.bytes));
    } else {
        println!("{}", random_secret(args.bytes));
    }
    Ok(())
}

/// Returns `bytes` random bytes from the OS, base64url encoded.
pub fn random_secret(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_secret() {
        let a = random_secret(48);
        let b = random_secret(48);
        assert_ne!(a, b);
        assert_eq!(URL_SAFE_NO_PAD.decode(&a).unwrap().len(), 48);
    }

    #[test]
    fn test_gen_secret_rejects_short() {
        let cli = <Cli as clap::Parser>::parse_from(["warden"]);
        let args = GenSecretArgs {
            bytes: 8,
            pair: false,
        };
        assert!(matches!(gen_secret(&cli, args), Err(BinError::Usage(_))));
    }
}
