// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use chrono::NaiveDate;

pub const DEFAULT_MAX_DAYS: usize = 90;

/// Every calendar day from `start` to `end` inclusive, ascending, at most
/// `max_days` entries. A reversed range is empty.
pub fn expand(start: NaiveDate, end: NaiveDate, max_days: usize) -> Result<Vec<NaiveDate>> {
    if end < start || max_days == 0 {
        return Ok(Vec::new());
    }
    let span = (end - start).num_days() as usize + 1;
    let mut dates = Vec::with_capacity(span.min(max_days));
    let mut current = start;
    loop {
        dates.push(current);
        if current >= end || dates.len() >= max_days {
            break;
        }
        current = current
            .succ_opt()
            .ok_or_else(|| anyhow!("date range runs past {}", current))?;
    }
    if span > max_days {
        log::warn!(
            "date range {}..{} spans {} days, truncated to {}",
            start,
            end,
            span,
            max_days
        );
    }
    Ok(dates)
}

/// Window the month picker selects: `days` days starting on `first`.
pub fn window_from(first: NaiveDate, days: usize) -> NaiveDate {
    let extra = days.saturating_sub(1) as u64;
    first
        .checked_add_days(chrono::Days::new(extra))
        .unwrap_or(NaiveDate::MAX)
}
