// Copyright 2025 the Squadron Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for quadtree operations.

use thiserror::Error;

/// Errors reported by [`QuadTree`](crate::QuadTree) operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuadTreeError {
    /// No entry with the given payload is stored where its area says it should be.
    ///
    /// This is a caller bug: the entry was never inserted, was already removed, or
    /// its area changed since it was inserted.
    #[error("no entry with this payload at the node its area maps to")]
    EntryNotFound,

    /// An argument cannot be indexed, such as a rectangle with non-finite edges.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the argument.
        reason: &'static str,
    },
}

/// Result alias for quadtree operations.
pub type QuadTreeResult<T> = Result<T, QuadTreeError>;
