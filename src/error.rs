// Copyright (c) 2025 Casabook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// Failures surfaced by the recurrence core and the transaction store.
///
/// Every variant is returned synchronously to the caller before or instead of a
/// partial write; the core never retries internally.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input rejected before any store interaction.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Recurrence parameters generate zero occurrences. Nothing was written.
    #[error("recurrence parameters generate no occurrences")]
    EmptySeries,

    /// Wraps any failure from the underlying store. The interrupted batch was
    /// rolled back as a whole.
    #[error("transaction store unavailable")]
    StoreUnavailable(#[from] rusqlite::Error),
}
