// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Directory store errors.
//!
//! A "not found" result is never an error: lookups return `Ok(None)` or an
//! empty collection. [`StoreError`] is reserved for failures of the backing
//! store itself, which callers must treat as internal errors and fail closed.

use thiserror::Error;

/// Failure of a directory store lookup.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("Store unavailable: {message}")]
    Unavailable {
        /// Error message.
        message: String,
    },

    /// A query against the store failed.
    #[error("Store query failed: {message}")]
    Query {
        /// Error message.
        message: String,
        /// Underlying error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Stored data violates an invariant, e.g. a dangling reference.
    #[error("Inconsistent store data: {message}")]
    Inconsistent {
        /// Error message.
        message: String,
    },

    /// A uniqueness constraint would be violated.
    #[error("Duplicate {entity}: {key}")]
    Duplicate {
        /// Entity type.
        entity: &'static str,
        /// The duplicated key.
        key: String,
    },
}

impl StoreError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a query error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a query error with a source.
    pub fn query_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Query {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates an inconsistency error.
    pub fn inconsistent(message: impl Into<String>) -> Self {
        Self::Inconsistent {
            message: message.into(),
        }
    }

    /// Creates a duplicate error.
    pub fn duplicate(entity: &'static str, key: impl Into<String>) -> Self {
        Self::Duplicate {
            entity,
            key: key.into(),
        }
    }

    /// Returns the error type as a string for logging.
    pub fn error_type(&self) -> &'static str {
        match self {
            StoreError::Unavailable { .. } => "unavailable",
            StoreError::Query { .. } => "query",
            StoreError::Inconsistent { .. } => "inconsistent",
            StoreError::Duplicate { .. } => "duplicate",
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
