// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::aggregate::{AccountResolver, AccountTimeline};
use super::range;
use crate::models::{DailySummary, LedgerInput, SummaryFilter};
use anyhow::{Result, anyhow};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Daily ledger for the filter's date range, most recent date first.
///
/// Never fails: if the computation errors out, the error is logged and the
/// ledger is empty.
pub fn build_daily_summaries(input: &LedgerInput, filter: &SummaryFilter) -> Vec<DailySummary> {
    match try_build_daily_summaries(input, filter) {
        Ok(v) => v,
        Err(err) => {
            log::error!(
                "daily summary for {}..{} failed: {:#}",
                filter.start,
                filter.end,
                err
            );
            Vec::new()
        }
    }
}

pub fn try_build_daily_summaries(
    input: &LedgerInput,
    filter: &SummaryFilter,
) -> Result<Vec<DailySummary>> {
    log::debug!(
        "computing daily summary {}..{}: {} accounts, {} expenses, {} income, {} transfers",
        filter.start,
        filter.end,
        input.accounts.len(),
        input.expenses.len(),
        input.income.len(),
        input.transfers.len()
    );
    let dates = range::expand(filter.start, filter.end, filter.max_days)?;
    let resolver = AccountResolver::new(&input.accounts);
    let mut timelines: Vec<AccountTimeline> = resolver
        .accounts()
        .iter()
        .zip(resolver.movements(input))
        .map(|(acc, movements)| AccountTimeline::new(acc.initial_balance, movements))
        .collect();

    let mut summaries = Vec::with_capacity(dates.len());
    for date in dates {
        let mut accounts = BTreeMap::new();
        let mut total = Decimal::ZERO;
        for (acc, timeline) in resolver.accounts().iter().zip(timelines.iter_mut()) {
            let day = timeline.advance_to(date)?;
            total = total
                .checked_add(day.final_balance)
                .ok_or_else(|| anyhow!("total balance overflow on {}", date))?;
            accounts.insert(acc.id.clone(), day);
        }
        summaries.push(DailySummary {
            date,
            accounts,
            total_daily_balance: total,
        });
    }

    summaries.sort_by(|a, b| b.date.cmp(&a.date));
    log::debug!("daily summary ready: {} days", summaries.len());
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, Expense, Income, Transfer};
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn checking_scenario() -> LedgerInput {
        LedgerInput {
            accounts: vec![Account {
                id: "a1".into(),
                name: "Checking".into(),
                initial_balance: Decimal::from(1000),
            }],
            expenses: vec![Expense {
                id: "e1".into(),
                date: d(5),
                due_date: None,
                amount: Decimal::from(200),
                account_id: None,
                payment_method: "Checking".into(),
                category: "Rent".into(),
                description: String::new(),
                installment: None,
                is_credit_card: false,
                paid: true,
            }],
            income: vec![Income {
                id: "i1".into(),
                date: d(3),
                amount: Decimal::from(500),
                account_id: None,
                account: "Checking".into(),
                source: "Salary".into(),
                notes: None,
            }],
            transfers: vec![],
        }
    }

    #[test]
    fn single_account_scenario() {
        let input = checking_scenario();
        let out = build_daily_summaries(&input, &SummaryFilter::new(d(1), d(10)));
        assert_eq!(out.len(), 10);
        assert_eq!(out[0].date, d(10));
        assert_eq!(out[9].date, d(1));
        for s in &out {
            let expected = match s.date.format("%d").to_string().as_str() {
                "01" | "02" => 1000,
                "03" | "04" => 1500,
                _ => 1300,
            };
            assert_eq!(s.accounts["a1"].final_balance, Decimal::from(expected), "{}", s.date);
            assert_eq!(s.total_daily_balance, s.accounts["a1"].final_balance);
        }
    }

    #[test]
    fn transfer_moves_money_without_creating_it() {
        let input = LedgerInput {
            accounts: vec![
                Account {
                    id: "a1".into(),
                    name: "Checking".into(),
                    initial_balance: Decimal::from(1000),
                },
                Account {
                    id: "a2".into(),
                    name: "Savings".into(),
                    initial_balance: Decimal::ZERO,
                },
            ],
            transfers: vec![Transfer {
                id: "t1".into(),
                date: d(2),
                amount: Decimal::from(300),
                from_account: "a1".into(),
                to_account: "a2".into(),
                description: Some("monthly savings".into()),
            }],
            ..Default::default()
        };
        let out = build_daily_summaries(&input, &SummaryFilter::new(d(1), d(5)));
        for s in &out {
            assert_eq!(s.total_daily_balance, Decimal::from(1000));
            if s.date >= d(2) {
                assert_eq!(s.accounts["a1"].final_balance, Decimal::from(700));
                assert_eq!(s.accounts["a2"].final_balance, Decimal::from(300));
            } else {
                assert_eq!(s.accounts["a1"].final_balance, Decimal::from(1000));
                assert_eq!(s.accounts["a2"].final_balance, Decimal::ZERO);
            }
        }
        let day2 = out.iter().find(|s| s.date == d(2)).unwrap();
        assert_eq!(day2.accounts["a1"].daily_expenses, Decimal::from(300));
        assert_eq!(day2.accounts["a2"].daily_income, Decimal::from(300));
        assert_eq!(day2.accounts["a1"].daily_income, Decimal::ZERO);
    }

    #[test]
    fn history_before_range_is_carried_in() {
        let input = checking_scenario();
        let out = build_daily_summaries(&input, &SummaryFilter::new(d(6), d(7)));
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|s| s.accounts["a1"].final_balance == Decimal::from(1300)));
        assert!(out.iter().all(|s| s.accounts["a1"].daily_expenses.is_zero()));
    }

    #[test]
    fn reversed_range_yields_empty_ledger() {
        let input = checking_scenario();
        assert!(build_daily_summaries(&input, &SummaryFilter::new(d(10), d(1))).is_empty());
    }

    #[test]
    fn failures_fall_back_to_empty() {
        let input = LedgerInput {
            accounts: vec![Account {
                id: "a1".into(),
                name: "Checking".into(),
                initial_balance: Decimal::MAX,
            }],
            income: vec![Income {
                id: "i1".into(),
                date: d(1),
                amount: Decimal::MAX,
                account_id: Some("a1".into()),
                account: String::new(),
                source: String::new(),
                notes: None,
            }],
            ..Default::default()
        };
        let filter = SummaryFilter::new(d(1), d(2));
        assert!(try_build_daily_summaries(&input, &filter).is_err());
        assert!(build_daily_summaries(&input, &filter).is_empty());
    }

    #[test]
    fn recomputing_is_deterministic() {
        let input = checking_scenario();
        let filter = SummaryFilter::new(d(1), d(10));
        let a = serde_json::to_string(&build_daily_summaries(&input, &filter)).unwrap();
        let b = serde_json::to_string(&build_daily_summaries(&input, &filter)).unwrap();
        assert_eq!(a, b);
    }
}
