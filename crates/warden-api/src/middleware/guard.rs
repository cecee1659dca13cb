// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role, permission and superuser guards.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};
use warden_core::Subject;

use crate::auth::{AuthContext, AuthGate};
use crate::error::{ApiError, ApiResult};

// =============================================================================
// Guard
// =============================================================================

/// The check a [`GuardLayer`] applies.
#[derive(Debug, Clone)]
pub enum Guard {
    /// Any of these role names, ignoring case.
    Role(Arc<[String]>),
    /// A named permission on a fixed subject.
    Permission {
        /// The guarded subject.
        subject: Subject,
        /// Permission name, resolved through the catalog.
        permission: Arc<str>,
    },
    /// Superusers only.
    Superuser,
}

impl Guard {
    async fn check(&self, gate: &AuthGate, ctx: &AuthContext) -> ApiResult<()> {
        match self {
            Guard::Role(allowed) => gate.require_role(ctx, &allowed[..]),
            Guard::Permission {
                subject,
                permission,
            } => gate.require_permission(ctx, subject, permission).await,
            Guard::Superuser => gate.require_superuser(ctx),
        }
    }
}

// =============================================================================
// GuardLayer
// =============================================================================

/// Layer enforcing a [`Guard`] on an authenticated route.
///
/// Must run inside [`AuthLayer`](super::AuthLayer). Requests without an
/// authentication context are rejected as unauthorized.
#[derive(Clone)]
pub struct GuardLayer {
    gate: Arc<AuthGate>,
    guard: Guard,
}

impl GuardLayer {
    /// Creates a layer for an arbitrary guard.
    pub fn new(gate: Arc<AuthGate>, guard: Guard) -> Self {
        Self { gate, guard }
    }

    /// Requires any of the given roles.
    pub fn role<I, R>(gate: Arc<AuthGate>, allowed: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<String>,
    {
        let allowed: Vec<String> = allowed.into_iter().map(Into::into).collect();
        Self::new(gate, Guard::Role(allowed.into()))
    }

    /// Requires a named permission on `subject`.
    pub fn permission(gate: Arc<AuthGate>, subject: Subject, permission: &str) -> Self {
        Self::new(
            gate,
            Guard::Permission {
                subject,
                permission: permission.into(),
            },
        )
    }

    /// Requires a superuser.
    pub fn superuser(gate: Arc<AuthGate>) -> Self {
        Self::new(gate, Guard::Superuser)
    }

    /// Returns the guard.
    pub fn guard(&self) -> &Guard {
        &self.guard
    }
}

impl<S> Layer<S> for GuardLayer {
    type Service = GuardMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        GuardMiddleware {
            inner,
            gate: self.gate.clone(),
            guard: self.guard.clone(),
        }
    }
}

// =============================================================================
// GuardMiddleware
// =============================================================================

/// Middleware created by [`GuardLayer`].
#[derive(Clone)]
pub struct GuardMiddleware<S> {
    inner: S,
    gate: Arc<AuthGate>,
    guard: Guard,
}

impl<S> Service<Request<Body>> for GuardMiddleware<S>
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

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let gate = self.gate.clone();
        let guard = self.guard.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let Some(ctx) = req.extensions().get::<AuthContext>().cloned() else {
                tracing::warn!(path = %req.uri().path(), "No auth context found, denying access");
                return Ok(ApiError::unauthorized("no authentication context").into_response());
            };

            match guard.check(&gate, &ctx).await {
                Ok(()) => inner.call(req).await,
                Err(e) => Ok(e.into_response()),
            }
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
