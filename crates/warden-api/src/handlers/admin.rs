// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Admin-only handlers.

use axum::Json;

use crate::extractors::Auth;
use crate::response::PingResponse;

/// GET {base}/admin/ping
///
/// Reachable only through the admin role guard.
pub async fn ping(Auth(ctx): Auth) -> Json<PingResponse> {
    tracing::debug!(account_id = %ctx.account_id, "Admin ping");
    Json(PingResponse {
        message: "pong".to_string(),
        account_id: ctx.account_id,
    })
}
