// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-account daily figures.
//!
//! Every record is first resolved to the account it moves money in or out
//! of. Transfers name accounts by id. Expenses and income carry an
//! `account_id` when they were recorded through this tool; older records
//! only have the account's display name, which is matched exactly.

use crate::models::{Account, AccountDay, Expense, Income, LedgerInput, Transfer};
use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movement {
    pub date: NaiveDate,
    pub direction: Direction,
    pub amount: Decimal,
}

pub struct AccountResolver<'a> {
    accounts: Vec<&'a Account>,
    by_id: HashMap<&'a str, usize>,
    by_name: HashMap<&'a str, usize>,
}

impl<'a> AccountResolver<'a> {
    /// Duplicate ids keep the first account.
    pub fn new(accounts: &'a [Account]) -> Self {
        let mut out = Vec::with_capacity(accounts.len());
        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();
        for account in accounts {
            if by_id.contains_key(account.id.as_str()) {
                log::warn!("duplicate account id {} ignored", account.id);
                continue;
            }
            let idx = out.len();
            by_id.insert(account.id.as_str(), idx);
            by_name.entry(account.name.as_str()).or_insert(idx);
            out.push(account);
        }
        Self {
            accounts: out,
            by_id,
            by_name,
        }
    }

    pub fn accounts(&self) -> &[&'a Account] {
        &self.accounts
    }

    pub fn by_id(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    fn by_name(&self, name: &str) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.by_name.get(name).copied()
    }

    pub fn expense_account(&self, e: &Expense) -> Option<usize> {
        e.account_id
            .as_deref()
            .and_then(|id| self.by_id(id))
            .or_else(|| self.by_name(&e.payment_method))
    }

    pub fn income_account(&self, i: &Income) -> Option<usize> {
        i.account_id
            .as_deref()
            .and_then(|id| self.by_id(id))
            .or_else(|| {
                if i.account.is_empty() {
                    self.by_name(&i.source)
                } else {
                    self.by_name(&i.account)
                }
            })
    }

    /// Movements of every account, indexed like `accounts()`, sorted by date.
    pub fn movements(&self, input: &LedgerInput) -> Vec<Vec<Movement>> {
        let mut out = vec![Vec::new(); self.accounts.len()];
        let mut unresolved = 0usize;
        for e in &input.expenses {
            match self.expense_account(e) {
                Some(idx) => out[idx].push(Movement {
                    date: e.effective_date(),
                    direction: Direction::Out,
                    amount: e.amount,
                }),
                None => unresolved += 1,
            }
        }
        for i in &input.income {
            match self.income_account(i) {
                Some(idx) => out[idx].push(Movement {
                    date: i.date,
                    direction: Direction::In,
                    amount: i.amount,
                }),
                None => unresolved += 1,
            }
        }
        for t in &input.transfers {
            let from = self.by_id(&t.from_account);
            let to = self.by_id(&t.to_account);
            if let Some(idx) = from {
                out[idx].push(Movement {
                    date: t.date,
                    direction: Direction::Out,
                    amount: t.amount,
                });
            }
            if let Some(idx) = to {
                out[idx].push(Movement {
                    date: t.date,
                    direction: Direction::In,
                    amount: t.amount,
                });
            }
            if from.is_none() || to.is_none() {
                unresolved += 1;
            }
        }
        if unresolved > 0 {
            log::debug!("{} records reference no known account", unresolved);
        }
        for list in &mut out {
            list.sort_by_key(|m| m.date);
        }
        out
    }
}

/// Sum that reports overflow instead of panicking.
pub(crate) fn checked_sum<I>(amounts: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, a| acc.checked_add(a))
}

/// Daily figures of one account on one date, summed over the full history.
pub fn aggregate_account_day(
    date: NaiveDate,
    account: &Account,
    input: &LedgerInput,
) -> Result<AccountDay> {
    let resolver = AccountResolver::new(&input.accounts);
    let owns = |idx: Option<usize>| {
        idx.map(|i| resolver.accounts()[i].id == account.id)
            .unwrap_or(false)
    };
    let overflow = || anyhow!("balance overflow for account {} on {}", account.id, date);

    let expenses: Vec<&Expense> = input
        .expenses
        .iter()
        .filter(|e| owns(resolver.expense_account(e)))
        .collect();
    let income: Vec<&Income> = input
        .income
        .iter()
        .filter(|i| owns(resolver.income_account(i)))
        .collect();
    let transfers_out: Vec<&Transfer> = input
        .transfers
        .iter()
        .filter(|t| t.from_account == account.id)
        .collect();
    let transfers_in: Vec<&Transfer> = input
        .transfers
        .iter()
        .filter(|t| t.to_account == account.id)
        .collect();

    let daily_expenses = checked_sum(
        expenses
            .iter()
            .filter(|e| e.effective_date() == date)
            .map(|e| e.amount)
            .chain(transfers_out.iter().filter(|t| t.date == date).map(|t| t.amount)),
    )
    .ok_or_else(overflow)?;
    let daily_income = checked_sum(
        income
            .iter()
            .filter(|i| i.date == date)
            .map(|i| i.amount)
            .chain(transfers_in.iter().filter(|t| t.date == date).map(|t| t.amount)),
    )
    .ok_or_else(overflow)?;

    let inflow = checked_sum(
        income
            .iter()
            .filter(|i| i.date <= date)
            .map(|i| i.amount)
            .chain(transfers_in.iter().filter(|t| t.date <= date).map(|t| t.amount)),
    )
    .ok_or_else(overflow)?;
    let outflow = checked_sum(
        expenses
            .iter()
            .filter(|e| e.effective_date() <= date)
            .map(|e| e.amount)
            .chain(transfers_out.iter().filter(|t| t.date <= date).map(|t| t.amount)),
    )
    .ok_or_else(overflow)?;
    let final_balance = account
        .initial_balance
        .checked_add(inflow)
        .and_then(|b| b.checked_sub(outflow))
        .ok_or_else(overflow)?;

    Ok(AccountDay {
        daily_income,
        daily_expenses,
        final_balance,
    })
}

/// Forward scan over one account's movements. Dates passed to
/// [`AccountTimeline::advance_to`] must not decrease.
pub struct AccountTimeline {
    balance: Decimal,
    movements: Vec<Movement>,
    cursor: usize,
}

impl AccountTimeline {
    pub fn new(initial_balance: Decimal, mut movements: Vec<Movement>) -> Self {
        movements.sort_by_key(|m| m.date);
        Self {
            balance: initial_balance,
            movements,
            cursor: 0,
        }
    }

    pub fn advance_to(&mut self, date: NaiveDate) -> Result<AccountDay> {
        let mut day = AccountDay::default();
        while let Some(m) = self.movements.get(self.cursor) {
            if m.date > date {
                break;
            }
            let next = match m.direction {
                Direction::In => self.balance.checked_add(m.amount),
                Direction::Out => self.balance.checked_sub(m.amount),
            };
            self.balance = next.ok_or_else(|| anyhow!("balance overflow on {}", m.date))?;
            if m.date == date {
                match m.direction {
                    Direction::In => day.daily_income += m.amount,
                    Direction::Out => day.daily_expenses += m.amount,
                }
            }
            self.cursor += 1;
        }
        day.final_balance = self.balance;
        Ok(day)
    }
}
