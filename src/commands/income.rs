// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{id_for_account, maybe_print_json, new_id, parse_amount, parse_date, pretty_table};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let date = parse_date(sub.get_one::<String>("date").unwrap())?;
            let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
            let account = sub.get_one::<String>("account").unwrap().trim();
            let account_id = id_for_account(conn, account)?;
            let source = sub
                .get_one::<String>("source")
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            let notes = sub.get_one::<String>("notes").map(|s| s.trim().to_string());
            conn.execute(
                "INSERT INTO income(id, date, amount, account_id, account, source, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    new_id(),
                    date.to_string(),
                    amount.to_string(),
                    account_id,
                    account,
                    source,
                    notes
                ],
            )?;
            println!("Recorded income {} on {} (acct: {})", amount, date, account);
        }
        Some(("list", sub)) => {
            let data = query_rows(conn, sub)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .into_iter()
                    .map(|r| vec![r.id, r.date, r.account, r.source, r.amount, r.notes])
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Date", "Account", "Source", "Amount", "Notes"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let n = conn.execute("DELETE FROM income WHERE id=?1", params![id])?;
            if n == 0 {
                bail!("Income '{}' not found", id);
            }
            println!("Removed income {}", id);
        }
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct IncomeRow {
    pub id: String,
    pub date: String,
    pub account: String,
    pub source: String,
    pub amount: String,
    pub notes: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<IncomeRow>> {
    // Rows without an account id name it directly, or through the source when
    // the account field was left empty
    let mut sql = String::from(
        "SELECT i.id, i.date, COALESCE(a.name, NULLIF(i.account, ''), i.source), i.source,
                COALESCE(i.amount, '0'), COALESCE(i.notes, '')
         FROM income i LEFT JOIN accounts a ON i.account_id=a.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(i.date,1,7)=?");
        params_vec.push(month.trim().into());
    }
    if let Some(acct) = sub.get_one::<String>("account") {
        sql.push_str(" AND COALESCE(a.name, NULLIF(i.account, ''), i.source)=?");
        params_vec.push(acct.trim().into());
    }
    sql.push_str(" ORDER BY i.date DESC, i.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(IncomeRow {
            id: r.get(0)?,
            date: r.get(1)?,
            account: r.get(2)?,
            source: r.get(3)?,
            amount: r.get(4)?,
            notes: r.get(5)?,
        });
    }
    Ok(data)
}
