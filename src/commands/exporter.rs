// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::summary::ledger_view;
use anyhow::{Result, bail};
use rusqlite::Connection;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => export_summary(conn, sub),
        _ => Ok(()),
    }
}

fn export_summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    if fmt != "csv" && fmt != "json" {
        bail!("Unknown format: {} (use csv|json)", fmt);
    }

    let view = ledger_view(conn, sub)?;
    let rows = view.rows();

    if fmt == "csv" {
        let mut wtr = csv::Writer::from_path(out)?;
        wtr.write_record([
            "date",
            "account",
            "daily_income",
            "daily_expenses",
            "final_balance",
            "total_daily_balance",
        ])?;
        for row in &rows {
            for cell in &row.accounts {
                wtr.write_record([
                    row.date.as_str(),
                    cell.account.as_str(),
                    cell.daily_income.as_str(),
                    cell.daily_expenses.as_str(),
                    cell.final_balance.as_str(),
                    row.total_daily_balance.as_str(),
                ])?;
            }
        }
        wtr.flush()?;
    } else {
        std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
    }
    log::info!("exported {} ledger days to {}", rows.len(), out);
    println!("Exported daily summary to {}", out);
    Ok(())
}
