// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Account, AccountSort, DailySummary, SortDirection, SummaryFilter};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Visible accounts in display order. Ties keep the input order.
pub fn order_accounts<'a>(
    accounts: &'a [Account],
    summaries: &[DailySummary],
    filter: &SummaryFilter,
) -> Vec<&'a Account> {
    let mut visible: Vec<&Account> = accounts.iter().filter(|a| filter.is_visible(&a.id)).collect();

    let cmp: Box<dyn Fn(&&Account, &&Account) -> Ordering + '_> = match filter.sort_by {
        AccountSort::Name => Box::new(|a: &&Account, b: &&Account| {
            a.name.to_lowercase().cmp(&b.name.to_lowercase())
        }),
        AccountSort::InitialBalance => {
            Box::new(|a: &&Account, b: &&Account| a.initial_balance.cmp(&b.initial_balance))
        }
        AccountSort::FinalBalance => {
            let latest = summaries.iter().max_by_key(|s| s.date);
            let balance = move |id: &str| {
                latest
                    .and_then(|s| s.accounts.get(id))
                    .map(|d| d.final_balance)
                    .unwrap_or(Decimal::ZERO)
            };
            Box::new(move |a: &&Account, b: &&Account| {
                balance(a.id.as_str()).cmp(&balance(b.id.as_str()))
            })
        }
        AccountSort::Activity => {
            let mut activity: HashMap<&str, Decimal> = HashMap::new();
            for s in summaries {
                for (id, day) in &s.accounts {
                    *activity.entry(id.as_str()).or_insert(Decimal::ZERO) +=
                        day.daily_income + day.daily_expenses;
                }
            }
            Box::new(move |a: &&Account, b: &&Account| {
                let av = activity.get(a.id.as_str()).copied().unwrap_or(Decimal::ZERO);
                let bv = activity.get(b.id.as_str()).copied().unwrap_or(Decimal::ZERO);
                av.cmp(&bv)
            })
        }
        AccountSort::Custom => {
            let order = if filter.custom_order.is_empty() {
                &filter.visible_accounts
            } else {
                &filter.custom_order
            };
            let position = move |id: &str| order.iter().position(|o| o == id).unwrap_or(usize::MAX);
            Box::new(move |a: &&Account, b: &&Account| {
                position(a.id.as_str()).cmp(&position(b.id.as_str()))
            })
        }
    };

    match filter.direction {
        SortDirection::Asc => visible.sort_by(|a, b| cmp(a, b)),
        SortDirection::Desc => visible.sort_by(|a, b| cmp(b, a)),
    }
    visible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountDay;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn account(id: &str, name: &str, initial: i64) -> Account {
        Account {
            id: id.into(),
            name: name.into(),
            initial_balance: Decimal::from(initial),
        }
    }

    fn accounts() -> Vec<Account> {
        vec![
            account("a1", "wallet", 50),
            account("a2", "Checking", 1000),
            account("a3", "Savings", 400),
        ]
    }

    fn day(date: u32, figures: &[(&str, i64, i64, i64)]) -> DailySummary {
        let mut map = BTreeMap::new();
        for (id, inc, exp, bal) in figures {
            map.insert(
                id.to_string(),
                AccountDay {
                    daily_income: Decimal::from(*inc),
                    daily_expenses: Decimal::from(*exp),
                    final_balance: Decimal::from(*bal),
                },
            );
        }
        DailySummary {
            date: NaiveDate::from_ymd_opt(2024, 1, date).unwrap(),
            total_daily_balance: map.values().map(|d| d.final_balance).sum(),
            accounts: map,
        }
    }

    fn filter(sort_by: AccountSort, direction: SortDirection) -> SummaryFilter {
        let mut f = SummaryFilter::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        );
        f.sort_by = sort_by;
        f.direction = direction;
        f
    }

    fn ids(v: Vec<&Account>) -> Vec<&str> {
        v.into_iter().map(|a| a.id.as_str()).collect()
    }

    #[test]
    fn by_name_ignores_case() {
        let accs = accounts();
        let out = order_accounts(&accs, &[], &filter(AccountSort::Name, SortDirection::Asc));
        assert_eq!(ids(out), vec!["a2", "a3", "a1"]);
        let out = order_accounts(&accs, &[], &filter(AccountSort::Name, SortDirection::Desc));
        assert_eq!(ids(out), vec!["a1", "a3", "a2"]);
    }

    #[test]
    fn by_initial_balance() {
        let accs = accounts();
        let out = order_accounts(
            &accs,
            &[],
            &filter(AccountSort::InitialBalance, SortDirection::Desc),
        );
        assert_eq!(ids(out), vec!["a2", "a3", "a1"]);
    }

    #[test]
    fn by_latest_final_balance() {
        let accs = accounts();
        let summaries = vec![
            day(2, &[("a1", 0, 0, 900), ("a2", 0, 0, 10), ("a3", 0, 0, 500)]),
            day(1, &[("a1", 0, 0, 0), ("a2", 0, 0, 2000), ("a3", 0, 0, 0)]),
        ];
        let out = order_accounts(
            &accs,
            &summaries,
            &filter(AccountSort::FinalBalance, SortDirection::Desc),
        );
        assert_eq!(ids(out), vec!["a1", "a3", "a2"]);
    }

    #[test]
    fn by_activity_over_range() {
        let accs = accounts();
        let summaries = vec![
            day(2, &[("a1", 5, 5, 0), ("a2", 0, 100, 0), ("a3", 0, 0, 0)]),
            day(1, &[("a1", 1, 0, 0), ("a2", 0, 0, 0), ("a3", 30, 0, 0)]),
        ];
        let out = order_accounts(
            &accs,
            &summaries,
            &filter(AccountSort::Activity, SortDirection::Asc),
        );
        assert_eq!(ids(out), vec!["a1", "a3", "a2"]);
    }

    #[test]
    fn custom_order_puts_unlisted_last() {
        let accs = accounts();
        let mut f = filter(AccountSort::Custom, SortDirection::Asc);
        f.custom_order = vec!["a3".into(), "a1".into()];
        let out = order_accounts(&accs, &[], &f);
        assert_eq!(ids(out), vec!["a3", "a1", "a2"]);
    }

    #[test]
    fn hidden_accounts_are_dropped() {
        let accs = accounts();
        let mut f = filter(AccountSort::Custom, SortDirection::Asc);
        f.visible_accounts = vec!["a3".into(), "a2".into()];
        let out = order_accounts(&accs, &[], &f);
        assert_eq!(ids(out), vec!["a3", "a2"]);
    }
}
