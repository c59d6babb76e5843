// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use thiserror::Error;

/// A stored record field that could not be read. Loaders log these and
/// degrade the record instead of failing the whole report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("{kind} {id}: invalid date '{value}'")]
    InvalidDate {
        kind: &'static str,
        id: String,
        value: String,
    },
    #[error("{kind} {id}: invalid amount '{value}'")]
    InvalidAmount {
        kind: &'static str,
        id: String,
        value: String,
    },
}
