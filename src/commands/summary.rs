// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::commands::settings;
use crate::ledger::dashboard::dashboard;
use crate::ledger::range::window_from;
use crate::ledger::{build_daily_summaries, order_accounts};
use crate::models::{Account, AccountSort, DailySummary, SortDirection, SummaryFilter};
use crate::utils::{
    fmt_money, id_for_account, maybe_print_json, month_start, parse_date, parse_month,
    pretty_table,
};
use anyhow::{Result, anyhow};
use chrono::Local;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("daily", sub)) => daily(conn, sub),
        Some(("dashboard", sub)) => show_dashboard(conn, sub),
        _ => Ok(()),
    }
}

/// Daily ledger restricted to the visible accounts, in display order.
pub struct LedgerView {
    pub filter: SummaryFilter,
    pub columns: Vec<Account>,
    pub summaries: Vec<DailySummary>,
}

#[derive(Debug, Serialize)]
pub struct AccountCell {
    pub account: String,
    pub daily_income: String,
    pub daily_expenses: String,
    pub final_balance: String,
}

#[derive(Debug, Serialize)]
pub struct LedgerRow {
    pub date: String,
    pub accounts: Vec<AccountCell>,
    pub total_daily_balance: String,
}

impl LedgerView {
    pub fn rows(&self) -> Vec<LedgerRow> {
        self.summaries
            .iter()
            .map(|s| LedgerRow {
                date: s.date.to_string(),
                accounts: self
                    .columns
                    .iter()
                    .map(|acc| {
                        let day = s.accounts.get(&acc.id).cloned().unwrap_or_default();
                        AccountCell {
                            account: acc.name.clone(),
                            daily_income: fmt_money(&day.daily_income),
                            daily_expenses: fmt_money(&day.daily_expenses),
                            final_balance: fmt_money(&day.final_balance),
                        }
                    })
                    .collect(),
                total_daily_balance: fmt_money(&s.total_daily_balance),
            })
            .collect()
    }
}

/// Filter from `--from/--to/--month/--account/--sort/--desc`, with the
/// stored settings filling in what the flags leave out.
pub fn filter_from_args(conn: &Connection, sub: &clap::ArgMatches) -> Result<SummaryFilter> {
    let max_days = settings::summary_max_days(conn)?;
    let start = match (sub.get_one::<String>("from"), sub.get_one::<String>("month")) {
        (Some(from), _) => parse_date(from)?,
        (None, Some(month)) => parse_month(month)?,
        (None, None) => month_start(Local::now().date_naive()),
    };
    let end = match sub.get_one::<String>("to") {
        Some(to) => parse_date(to)?,
        None => window_from(start, max_days),
    };

    let mut filter = SummaryFilter::new(start, end);
    filter.max_days = max_days;
    filter.sort_by = match sub.get_one::<String>("sort") {
        Some(s) => AccountSort::parse(s).ok_or_else(|| anyhow!("Unknown account order '{}'", s))?,
        None => settings::summary_sort(conn)?,
    };
    if sub.get_flag("desc") {
        filter.direction = SortDirection::Desc;
    }
    if let Some(names) = sub.get_many::<String>("account") {
        for name in names {
            let id = id_for_account(conn, name)?;
            if !filter.visible_accounts.contains(&id) {
                filter.visible_accounts.push(id);
            }
        }
    }
    filter.custom_order = filter.visible_accounts.clone();
    Ok(filter)
}

pub fn ledger_view(conn: &Connection, sub: &clap::ArgMatches) -> Result<LedgerView> {
    let filter = filter_from_args(conn, sub)?;
    let input = crate::db::load_input(conn)?;
    let summaries = build_daily_summaries(&input, &filter);
    let columns = order_accounts(&input.accounts, &summaries, &filter)
        .into_iter()
        .cloned()
        .collect();
    Ok(LedgerView {
        filter,
        columns,
        summaries,
    })
}

fn daily(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let view = ledger_view(conn, sub)?;
    let rows = view.rows();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rows)? {
        return Ok(());
    }

    let mut headers: Vec<String> = vec!["Date".into()];
    for acc in &view.columns {
        headers.push(format!("{} in", acc.name));
        headers.push(format!("{} out", acc.name));
        headers.push(format!("{} balance", acc.name));
    }
    headers.push("Total".into());
    let header_refs: Vec<&str> = headers.iter().map(|h| h.as_str()).collect();

    let data = rows
        .into_iter()
        .map(|r| {
            let mut line = vec![r.date];
            for cell in r.accounts {
                line.push(cell.daily_income);
                line.push(cell.daily_expenses);
                line.push(cell.final_balance);
            }
            line.push(r.total_daily_balance);
            line
        })
        .collect();
    println!("{}", pretty_table(&header_refs, data));
    Ok(())
}

fn show_dashboard(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let month = match sub.get_one::<String>("month") {
        Some(m) => parse_month(m)?,
        None => month_start(Local::now().date_naive()),
    };
    let input = crate::db::load_input(conn)?;
    let dash = dashboard(&input, month)?;
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &dash)? {
        return Ok(());
    }

    println!(
        "{}",
        pretty_table(
            &["Month", "Income", "Expenses", "Balance", "Unpaid (all time)"],
            vec![vec![
                dash.current.month.clone(),
                fmt_money(&dash.current.total_income),
                fmt_money(&dash.current.total_expenses),
                fmt_money(&dash.current.balance),
                fmt_money(&dash.unpaid_expenses),
            ]],
        )
    );
    if !dash.expenses_by_category.is_empty() {
        let rows = dash
            .expenses_by_category
            .iter()
            .map(|(cat, amt)| vec![cat.clone(), fmt_money(amt)])
            .collect();
        println!("{}", pretty_table(&["Category", "Spent"], rows));
    }
    let trend = dash
        .trend
        .iter()
        .map(|t| {
            vec![
                t.month.clone(),
                fmt_money(&t.total_income),
                fmt_money(&t.total_expenses),
                fmt_money(&t.balance),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Month", "Income", "Expenses", "Balance"], trend)
    );
    Ok(())
}
