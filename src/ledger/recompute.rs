// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::summary::build_daily_summaries;
use crate::models::{DailySummary, LedgerInput, SummaryFilter};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Hash of everything the daily ledger depends on. Visibility and account
/// ordering are display concerns and are left out.
pub fn content_key(input: &LedgerInput, filter: &SummaryFilter) -> u64 {
    let mut h = DefaultHasher::new();
    input.hash(&mut h);
    filter.start.hash(&mut h);
    filter.end.hash(&mut h);
    filter.max_days.hash(&mut h);
    h.finish()
}

/// Last computed ledger, recomputed only when the inputs change. Meant for
/// long-lived callers that redraw the ledger repeatedly; one-shot commands
/// call `build_daily_summaries` directly.
#[derive(Debug, Default)]
pub struct SummaryCache {
    key: Option<u64>,
    summaries: Vec<DailySummary>,
    computations: usize,
}

impl SummaryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_compute(&mut self, input: &LedgerInput, filter: &SummaryFilter) -> &[DailySummary] {
        let key = content_key(input, filter);
        if self.key != Some(key) {
            self.summaries = build_daily_summaries(input, filter);
            self.key = Some(key);
            self.computations += 1;
        } else {
            log::debug!("daily summary unchanged, reusing {} rows", self.summaries.len());
        }
        &self.summaries
    }

    pub fn invalidate(&mut self) {
        self.key = None;
    }

    /// Number of full recomputations performed so far.
    pub fn computations(&self) -> usize {
        self.computations
    }
}
