// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{id_for_account, maybe_print_json, new_id, parse_amount, parse_date, pretty_table};
use anyhow::{Result, bail};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let date = parse_date(sub.get_one::<String>("date").unwrap())?;
            let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
            let from = sub.get_one::<String>("from").unwrap().trim();
            let to = sub.get_one::<String>("to").unwrap().trim();
            let description = sub.get_one::<String>("description").map(|s| s.trim());
            let id = record(conn, date, amount, from, to, description)?;
            println!("Recorded transfer {} of {} from '{}' to '{}'", id, amount, from, to);
        }
        Some(("list", sub)) => {
            let data = query_rows(conn, sub)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .into_iter()
                    .map(|r| vec![r.id, r.date, r.from, r.to, r.amount, r.description])
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Date", "From", "To", "Amount", "Description"], rows)
                );
            }
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let n = conn.execute("DELETE FROM transfers WHERE id=?1", params![id])?;
            if n == 0 {
                bail!("Transfer '{}' not found", id);
            }
            println!("Removed transfer {}", id);
        }
        _ => {}
    }
    Ok(())
}

/// Stores a transfer between two existing accounts, referenced by id.
pub fn record(
    conn: &Connection,
    date: NaiveDate,
    amount: Decimal,
    from: &str,
    to: &str,
    description: Option<&str>,
) -> Result<String> {
    if amount <= Decimal::ZERO {
        bail!("Transfer amount must be positive");
    }
    let from_id = id_for_account(conn, from)?;
    let to_id = id_for_account(conn, to)?;
    if from_id == to_id {
        bail!("Cannot transfer from '{}' to itself", from);
    }
    let id = new_id();
    conn.execute(
        "INSERT INTO transfers(id, date, amount, from_account, to_account, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, date.to_string(), amount.to_string(), from_id, to_id, description],
    )?;
    Ok(id)
}

#[derive(Serialize)]
pub struct TransferRow {
    pub id: String,
    pub date: String,
    pub from: String,
    pub to: String,
    pub amount: String,
    pub description: String,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<TransferRow>> {
    // Unknown account ids are shown raw so they stay visible
    let mut sql = String::from(
        "SELECT t.id, t.date, COALESCE(f.name, t.from_account), COALESCE(d.name, t.to_account),
                COALESCE(t.amount, '0'), COALESCE(t.description, '')
         FROM transfers t
         LEFT JOIN accounts f ON t.from_account=f.id
         LEFT JOIN accounts d ON t.to_account=d.id
         WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(t.date,1,7)=?");
        params_vec.push(month.trim().into());
    }
    if let Some(acct) = sub.get_one::<String>("account") {
        sql.push_str(" AND (f.name=? OR d.name=?)");
        params_vec.push(acct.trim().into());
        params_vec.push(acct.trim().into());
    }
    sql.push_str(" ORDER BY t.date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;
    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        data.push(TransferRow {
            id: r.get(0)?,
            date: r.get(1)?,
            from: r.get(2)?,
            to: r.get(3)?,
            amount: r.get(4)?,
            description: r.get(5)?,
        });
    }
    Ok(data)
}
