// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::aggregate::checked_sum;
use crate::models::LedgerInput;
use crate::utils::month_start;
use anyhow::{Result, anyhow};
use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

pub const TREND_MONTHS: u32 = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub month: String,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub current: MonthTotals,
    pub unpaid_expenses: Decimal,
    pub expenses_by_category: Vec<(String, Decimal)>,
    pub trend: Vec<MonthTotals>,
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

fn month_totals(input: &LedgerInput, month: NaiveDate) -> Result<MonthTotals> {
    let label = month.format("%Y-%m").to_string();
    let overflow = || anyhow!("totals overflow in {}", label);
    let total_expenses = checked_sum(
        input
            .expenses
            .iter()
            .filter(|e| same_month(e.effective_date(), month))
            .map(|e| e.amount),
    )
    .ok_or_else(overflow)?;
    let total_income = checked_sum(
        input
            .income
            .iter()
            .filter(|i| same_month(i.date, month))
            .map(|i| i.amount),
    )
    .ok_or_else(overflow)?;
    let balance = total_income
        .checked_sub(total_expenses)
        .ok_or_else(overflow)?;
    Ok(MonthTotals {
        month: label,
        total_income,
        total_expenses,
        balance,
    })
}

/// Monthly overview. Expenses count in the month of their due date;
/// transfers are movements between own accounts and are left out.
pub fn dashboard(input: &LedgerInput, month: NaiveDate) -> Result<Dashboard> {
    let month = month_start(month);

    let unpaid_expenses = checked_sum(input.expenses.iter().filter(|e| !e.paid).map(|e| e.amount))
        .ok_or_else(|| anyhow!("unpaid expenses overflow"))?;

    let mut by_cat: HashMap<String, Decimal> = HashMap::new();
    for e in input
        .expenses
        .iter()
        .filter(|e| same_month(e.effective_date(), month))
    {
        let cat = if e.category.trim().is_empty() {
            "(uncategorized)".to_string()
        } else {
            e.category.clone()
        };
        let slot = by_cat.entry(cat).or_insert(Decimal::ZERO);
        *slot = slot
            .checked_add(e.amount)
            .ok_or_else(|| anyhow!("category '{}' overflow", e.category))?;
    }
    let mut expenses_by_category: Vec<(String, Decimal)> = by_cat.into_iter().collect();
    expenses_by_category.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let trend = (0..TREND_MONTHS)
        .rev()
        .filter_map(|back| month.checked_sub_months(Months::new(back)))
        .map(|m| month_totals(input, m))
        .collect::<Result<Vec<_>>>()?;

    Ok(Dashboard {
        current: month_totals(input, month)?,
        unpaid_expenses,
        expenses_by_category,
        trend,
    })
}
