// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::aggregate_account_day;
use crate::utils::{fmt_money, id_for_account, maybe_print_json, new_id, parse_decimal, pretty_table};
use anyhow::{Context, Result, bail};
use chrono::Local;
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            if name.is_empty() {
                bail!("Account name cannot be empty");
            }
            let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
            conn.execute(
                "INSERT INTO accounts(id, name, initial_balance) VALUES (?1, ?2, ?3)",
                params![new_id(), name, balance.to_string()],
            )?;
            println!("Added account '{}' (initial balance {})", name, fmt_money(&balance));
        }
        Some(("list", sub)) => {
            let rows = balances(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
                let data = rows
                    .into_iter()
                    .map(|r| vec![r.name, r.initial_balance, r.balance])
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["Name", "Initial", "Balance today"], data)
                );
            }
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let id = id_for_account(conn, name)?;
            let refs = references(conn, &id, name)?;
            if refs > 0 {
                bail!(
                    "Account '{}' is used by {} records; remove or move them first",
                    name,
                    refs
                );
            }
            conn.execute("DELETE FROM accounts WHERE id=?1", params![id])?;
            println!("Removed account '{}'", name);
        }
        Some(("rename", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let to = sub.get_one::<String>("to").unwrap().trim();
            let linked = rename(conn, name, to)?;
            println!("Renamed account '{}' to '{}'", name, to);
            if linked > 0 {
                println!("Linked {} records that referred to '{}' by name", linked, name);
            }
        }
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct AccountRow {
    pub name: String,
    pub initial_balance: String,
    pub balance: String,
}

pub fn balances(conn: &Connection) -> Result<Vec<AccountRow>> {
    let input = crate::db::load_input(conn)?;
    let today = Local::now().date_naive();
    let mut rows = Vec::with_capacity(input.accounts.len());
    for acc in &input.accounts {
        let day = aggregate_account_day(today, acc, &input)
            .with_context(|| format!("Balance of account '{}' is out of range", acc.name))?;
        rows.push(AccountRow {
            name: acc.name.clone(),
            initial_balance: fmt_money(&acc.initial_balance),
            balance: fmt_money(&day.final_balance),
        });
    }
    rows.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(rows)
}

fn references(conn: &Connection, id: &str, name: &str) -> Result<i64> {
    let n: i64 = conn.query_row(
        "SELECT
            (SELECT COUNT(*) FROM expenses
              WHERE account_id=?1 OR (account_id IS NULL AND payment_method=?2))
          + (SELECT COUNT(*) FROM income
              WHERE account_id=?1 OR (account_id IS NULL AND (account=?2 OR (account='' AND source=?2))))
          + (SELECT COUNT(*) FROM transfers WHERE from_account=?1 OR to_account=?1)",
        params![id, name],
        |r| r.get(0),
    )?;
    Ok(n)
}

/// Renames an account and pins rows that still address it by the old name
/// to its id, so they keep counting for it. Returns the number of rows pinned.
pub fn rename(conn: &Connection, name: &str, to: &str) -> Result<usize> {
    if to.is_empty() {
        bail!("Account name cannot be empty");
    }
    let id = id_for_account(conn, name)?;
    let tx = conn.unchecked_transaction()?;
    let mut linked = tx.execute(
        "UPDATE expenses SET account_id=?1 WHERE account_id IS NULL AND payment_method=?2",
        params![id, name],
    )?;
    linked += tx.execute(
        "UPDATE income SET account_id=?1
         WHERE account_id IS NULL AND (account=?2 OR (account='' AND source=?2))",
        params![id, name],
    )?;
    tx.execute("UPDATE accounts SET name=?1 WHERE id=?2", params![to, id])?;
    tx.commit()?;
    Ok(linked)
}
