// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for catalog loading and plan matching.

use thiserror::Error;

/// Result type for planrec-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a catalog or matching a query
#[derive(Error, Debug)]
pub enum Error {
    /// The catalog source could not be read or does not describe valid plans.
    #[error("failed to load catalog from {source_name}: {reason}")]
    Load { source_name: String, reason: String },

    /// There are no plans to match against.
    #[error("catalog contains no plans")]
    EmptyCatalog,

    /// Query and catalog feature vectors have different lengths.
    #[error("feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A user query value is out of range.
    #[error("invalid query value for {field}: {value}")]
    InvalidQuery { field: &'static str, value: f64 },
}

impl Error {
    pub(crate) fn load(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Load {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }
}
