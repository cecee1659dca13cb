// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Custom extractors for API handlers.

use axum::{
    extract::{FromRequest, FromRequestParts, Path},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;
use warden_core::{Subject, SubjectKind};

use crate::auth::AuthContext;
use crate::error::ApiError;

// =============================================================================
// Auth Extractor
// =============================================================================

/// Extractor for authenticated requests.
///
/// Reads the [`AuthContext`] inserted by [`AuthLayer`](crate::middleware::AuthLayer).
/// Rejects with 401 when the route was not authenticated.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(Auth(ctx): Auth) -> impl IntoResponse {
///     format!("Hello, {}", ctx.email)
/// }
/// ```
pub struct Auth(pub AuthContext);

impl<S> FromRequestParts<S> for Auth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(Auth)
            .ok_or_else(|| ApiError::unauthorized("no authentication context"))
    }
}

// =============================================================================
// Validated JSON Extractor
// =============================================================================

/// JSON body extractor whose rejection is an [`ApiError`].
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(
        req: axum::http::Request<axum::body::Body>,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("invalid JSON: {}", e.body_text())))?;

        Ok(ValidatedJson(value))
    }
}

// =============================================================================
// Subject Permission Path Extractor
// =============================================================================

/// `{kind}/{id}/{permission}` path segments of a model-permission route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectPermissionPath {
    /// The addressed subject.
    pub subject: Subject,
    /// The requested permission name.
    pub permission: String,
}

impl<S> FromRequestParts<S> for SubjectPermissionPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((kind, id, permission)) =
            Path::<(String, String, String)>::from_request_parts(parts, state)
                .await
                .map_err(|e| ApiError::bad_request(format!("invalid path: {}", e.body_text())))?;

        parse_subject_path(&kind, &id, permission)
    }
}

fn parse_subject_path(
    kind: &str,
    id: &str,
    permission: String,
) -> Result<SubjectPermissionPath, ApiError> {
    let kind: SubjectKind = kind
        .parse()
        .map_err(|e| ApiError::bad_request(format!("{}", e)))?;
    let id = Uuid::parse_str(id)
        .map_err(|_| ApiError::bad_request(format!("invalid subject id '{}'", id)))?;
    if permission.is_empty() {
        return Err(ApiError::bad_request("permission name cannot be empty"));
    }

    Ok(SubjectPermissionPath {
        subject: Subject::from_parts(kind, id),
        permission,
    })
}

// =============================================================================
// Tests
// =============================================================================
