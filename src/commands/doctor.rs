// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::db;
use crate::ledger::AccountResolver;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub issue: &'static str,
    pub detail: String,
}

fn push(out: &mut Vec<Finding>, issue: &'static str, detail: String) {
    out.push(Finding { issue, detail });
}

/// Everything that makes a record count for the wrong account, or for none.
pub fn findings(conn: &Connection) -> Result<Vec<Finding>> {
    let accounts = db::load_accounts(conn)?;
    let expenses = db::load_expenses(conn)?;
    let income = db::load_income(conn)?;
    let transfers = db::load_transfers(conn)?;
    let resolver = AccountResolver::new(&accounts.records);
    let mut out = Vec::new();

    // 1) Unreadable stored values
    for issue in accounts
        .issues
        .iter()
        .chain(&expenses.issues)
        .chain(&income.issues)
        .chain(&transfers.issues)
    {
        push(&mut out, "unreadable_value", issue.to_string());
    }

    // 2) Expenses: dangling ids, name matching, no account at all
    for e in &expenses.records {
        if let Some(id) = e.account_id.as_deref() {
            if resolver.by_id(id).is_some() {
                continue;
            }
            push(&mut out, "dangling_account_id", format!("expense {} -> {}", e.id, id));
        }
        match resolver.expense_account(e) {
            Some(_) => push(
                &mut out,
                "legacy_name_match",
                format!("expense {} -> '{}'", e.id, e.payment_method),
            ),
            None => push(
                &mut out,
                "unknown_account",
                format!("expense {} -> '{}'", e.id, e.payment_method),
            ),
        }
    }

    // 3) Income, where the source stands in for an empty account name
    for i in &income.records {
        if let Some(id) = i.account_id.as_deref() {
            if resolver.by_id(id).is_some() {
                continue;
            }
            push(&mut out, "dangling_account_id", format!("income {} -> {}", i.id, id));
        }
        let name = if i.account.is_empty() { &i.source } else { &i.account };
        let issue = match resolver.income_account(i) {
            Some(_) => "legacy_name_match",
            None => "unknown_account",
        };
        push(&mut out, issue, format!("income {} -> '{}'", i.id, name));
    }

    // 4) Transfers only ever reference ids
    for t in &transfers.records {
        for id in [&t.from_account, &t.to_account] {
            if resolver.by_id(id).is_none() {
                push(&mut out, "transfer_unknown_account", format!("transfer {} -> {}", t.id, id));
            }
        }
    }

    log::debug!("doctor found {} issues", out.len());
    Ok(out)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows: Vec<Vec<String>> = findings(conn)?
        .into_iter()
        .map(|f| vec![f.issue.to_string(), f.detail])
        .collect();
    if rows.is_empty() {
        println!("✅ doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
