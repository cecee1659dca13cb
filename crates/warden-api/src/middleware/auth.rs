// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication middleware.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, Request},
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::auth::AuthGate;

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer that authenticates every non-public request.
///
/// On success the resulting [`AuthContext`](crate::auth::AuthContext) is
/// inserted into the request extensions. On failure the request is answered
/// with the error response and never reaches the inner service.
#[derive(Clone)]
pub struct AuthLayer {
    gate: Arc<AuthGate>,
    public_paths: Arc<HashSet<String>>,
}

impl AuthLayer {
    /// Creates a new auth layer with no public paths.
    pub fn new(gate: Arc<AuthGate>) -> Self {
        Self {
            gate,
            public_paths: Arc::new(HashSet::new()),
        }
    }

    /// Sets paths that skip authentication.
    ///
    /// A trailing `*` matches any path with that prefix.
    pub fn with_public_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.public_paths = Arc::new(paths.into_iter().map(Into::into).collect());
        self
    }

    /// Uses the health probe and the login/refresh endpoints under `base_path`.
    pub fn with_default_public_paths(self, base_path: &str) -> Self {
        let base = base_path.trim_end_matches('/');
        self.with_public_paths([
            "/health".to_string(),
            format!("{}/auth/login", base),
            format!("{}/auth/refresh", base),
        ])
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            gate: self.gate.clone(),
            public_paths: self.public_paths.clone(),
        }
    }
}

// =============================================================================
// AuthMiddleware
// =============================================================================

/// Middleware created by [`AuthLayer`].
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    gate: Arc<AuthGate>,
    public_paths: Arc<HashSet<String>>,
}

impl<S> AuthMiddleware<S> {
    fn is_public_path(&self, path: &str) -> bool {
        if self.public_paths.contains(path) {
            return true;
        }

        self.public_paths
            .iter()
            .filter_map(|p| p.strip_suffix('*'))
            .any(|prefix| path.starts_with(prefix))
    }
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let gate = self.gate.clone();
        let is_public = self.is_public_path(req.uri().path());
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if is_public {
                return inner.call(req).await;
            }

            let result = gate
                .authenticate(req.headers().get(header::AUTHORIZATION))
                .await;

            match result {
                Ok(ctx) => {
                    req.extensions_mut().insert(ctx);
                    inner.call(req).await
                }
                Err(e) => {
                    tracing::debug!(
                        path = %req.uri().path(),
                        error = %e,
                        "Authentication failed"
                    );
                    Ok(e.into_response())
                }
            }
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
