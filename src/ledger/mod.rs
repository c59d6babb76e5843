// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Daily account ledger: per-day inflow, outflow and running balance of
//! every account, derived from expenses, income and transfers.

pub mod aggregate;
pub mod dashboard;
pub mod ordering;
pub mod range;
pub mod recompute;
pub mod summary;

pub use aggregate::{AccountResolver, AccountTimeline, aggregate_account_day};
pub use ordering::order_accounts;
pub use recompute::SummaryCache;
pub use summary::{build_daily_summaries, try_build_daily_summaries};
