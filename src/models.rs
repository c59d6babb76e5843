// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub initial_balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(CategoryKind::Income),
            "expense" => Some(CategoryKind::Expense),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub kind: CategoryKind,
}

/// Position of an expense inside a purchase paid over several months.
/// Sibling records share `group`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Installment {
    pub group: String,
    pub number: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    pub date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub amount: Decimal,
    pub account_id: Option<String>,
    /// Account name as typed by the user. Only consulted when `account_id` is absent.
    pub payment_method: String,
    pub category: String,
    pub description: String,
    pub installment: Option<Installment>,
    pub is_credit_card: bool,
    pub paid: bool,
}

impl Expense {
    /// Date the expense hits the account: the due date when there is one.
    pub fn effective_date(&self) -> NaiveDate {
        self.due_date.unwrap_or(self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Income {
    pub id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub account_id: Option<String>,
    pub account: String,
    pub source: String,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transfer {
    pub id: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub from_account: String,
    pub to_account: String,
    pub description: Option<String>,
}

/// The four record streams the daily ledger is computed from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerInput {
    pub accounts: Vec<Account>,
    pub expenses: Vec<Expense>,
    pub income: Vec<Income>,
    pub transfers: Vec<Transfer>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDay {
    pub daily_income: Decimal,
    pub daily_expenses: Decimal,
    pub final_balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub accounts: BTreeMap<String, AccountDay>,
    pub total_daily_balance: Decimal,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountSort {
    #[default]
    Name,
    InitialBalance,
    FinalBalance,
    Activity,
    Custom,
}

impl AccountSort {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Some(AccountSort::Name),
            "balance" | "initial-balance" => Some(AccountSort::InitialBalance),
            "final-balance" => Some(AccountSort::FinalBalance),
            "activity" => Some(AccountSort::Activity),
            "custom" => Some(AccountSort::Custom),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountSort::Name => "name",
            AccountSort::InitialBalance => "balance",
            AccountSort::FinalBalance => "final-balance",
            AccountSort::Activity => "activity",
            AccountSort::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SummaryFilter {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Account ids to display. Empty means all.
    pub visible_accounts: Vec<String>,
    pub sort_by: AccountSort,
    pub direction: SortDirection,
    /// Account ids in user-chosen order, used by `AccountSort::Custom`.
    pub custom_order: Vec<String>,
    pub max_days: usize,
}

impl SummaryFilter {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            visible_accounts: Vec::new(),
            sort_by: AccountSort::default(),
            direction: SortDirection::default(),
            custom_order: Vec::new(),
            max_days: crate::ledger::range::DEFAULT_MAX_DAYS,
        }
    }

    pub fn is_visible(&self, account_id: &str) -> bool {
        self.visible_accounts.is_empty() || self.visible_accounts.iter().any(|a| a == account_id)
    }
}
