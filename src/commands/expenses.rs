// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Expense, Installment};
use crate::utils::{
    add_months, id_for_account, id_for_category, maybe_print_json, new_id, parse_amount,
    parse_date, pretty_table,
};
use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("pay", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let n = conn.execute("UPDATE expenses SET paid=1 WHERE id=?1", params![id])?;
            if n == 0 {
                bail!("Expense '{}' not found", id);
            }
            println!("Marked expense {} as paid", id);
        }
        Some(("rm", sub)) => {
            let id = sub.get_one::<String>("id").unwrap().trim();
            let n = remove(conn, id, sub.get_flag("group"))?;
            println!("Removed {} expense record(s)", n);
        }
        _ => {}
    }
    Ok(())
}

/// An expense as entered, before it is split into installments.
#[derive(Debug, Clone)]
pub struct ExpenseDraft {
    pub date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub amount: Decimal,
    pub account_id: String,
    pub account_name: String,
    pub category: String,
    pub description: String,
    pub is_credit_card: bool,
    pub paid: bool,
}

/// Records to store for a draft. With `installments` set, the amount is
/// split into that many monthly records sharing one group id, the first due
/// on the draft's due date (or purchase date). Shares are cut down to the
/// cent and the last installment takes the rest, so no record is negative
/// and the records add up to the amount entered.
pub fn materialize(draft: &ExpenseDraft, installments: Option<u32>) -> Result<Vec<Expense>> {
    let single = |due_date| Expense {
        id: new_id(),
        date: draft.date,
        due_date,
        amount: draft.amount,
        account_id: Some(draft.account_id.clone()),
        payment_method: draft.account_name.clone(),
        category: draft.category.clone(),
        description: draft.description.clone(),
        installment: None,
        is_credit_card: draft.is_credit_card,
        paid: draft.paid,
    };
    let n = match installments {
        None => return Ok(vec![single(draft.due_date)]),
        Some(0) => bail!("Number of installments must be at least 1"),
        Some(n) => n,
    };

    let group = new_id();
    let first_due = draft.due_date.unwrap_or(draft.date);
    let share = (draft.amount / Decimal::from(n)).round_dp_with_strategy(2, RoundingStrategy::ToZero);
    let last = draft.amount - share * Decimal::from(n - 1);

    (0..n)
        .map(|i| -> Result<Expense> {
            let due = add_months(first_due, i)
                .ok_or_else(|| anyhow!("Installment {} falls outside the calendar", i + 1))?;
            let mut e = single(Some(due));
            e.amount = if i + 1 == n { last } else { share };
            e.installment = Some(Installment {
                group: group.clone(),
                number: i + 1,
                total: n,
            });
            Ok(e)
        })
        .collect()
}

pub fn insert(conn: &Connection, e: &Expense) -> Result<()> {
    let (group, number, total) = match &e.installment {
        Some(i) => (Some(i.group.as_str()), Some(i.number), Some(i.total)),
        None => (None, None, None),
    };
    conn.execute(
        "INSERT INTO expenses(id, date, due_date, amount, account_id, payment_method, category,
                              description, installment_group, installment_number,
                              total_installments, is_credit_card, paid)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            e.id,
            e.date.to_string(),
            e.due_date.map(|d| d.to_string()),
            e.amount.to_string(),
            e.account_id,
            e.payment_method,
            e.category,
            e.description,
            group,
            number,
            total,
            e.is_credit_card,
            e.paid
        ],
    )?;
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let date = parse_date(sub.get_one::<String>("date").unwrap())?;
    let due_date = match sub.get_one::<String>("due") {
        Some(s) => Some(parse_date(s)?),
        None => None,
    };
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let account_name = sub.get_one::<String>("account").unwrap().trim().to_string();
    let account_id = id_for_account(conn, &account_name)?;
    let category = match sub.get_one::<String>("category").map(|s| s.trim()) {
        Some(c) if !c.is_empty() => {
            id_for_category(conn, c)?;
            c.to_string()
        }
        _ => String::new(),
    };
    let draft = ExpenseDraft {
        date,
        due_date,
        amount,
        account_id,
        account_name: account_name.clone(),
        category,
        description: sub
            .get_one::<String>("description")
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        is_credit_card: sub.get_flag("credit-card"),
        paid: sub.get_flag("paid"),
    };

    let records = materialize(&draft, sub.get_one::<u32>("installments").copied())?;
    let tx = conn.unchecked_transaction()?;
    for e in &records {
        insert(&tx, e)?;
    }
    tx.commit()?;

    if records.len() > 1 {
        println!(
            "Recorded {} in {} installments from {} (acct: {})",
            amount,
            records.len(),
            records[0].effective_date(),
            account_name
        );
    } else {
        println!("Recorded expense {} on {} (acct: {})", amount, date, account_name);
    }
    Ok(())
}

/// Deletes one expense, or with `whole_group` every installment of its purchase.
pub fn remove(conn: &Connection, id: &str, whole_group: bool) -> Result<usize> {
    let group: Option<Option<String>> = conn
        .query_row(
            "SELECT installment_group FROM expenses WHERE id=?1",
            params![id],
            |r| r.get(0),
        )
        .optional()?;
    let n = match group {
        None => bail!("Expense '{}' not found", id),
        Some(Some(g)) if whole_group => {
            conn.execute("DELETE FROM expenses WHERE installment_group=?1", params![g])?
        }
        Some(_) => conn.execute("DELETE FROM expenses WHERE id=?1", params![id])?,
    };
    Ok(n)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let data = query_rows(conn, sub)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.date.clone(),
                    r.due_date.clone(),
                    r.account.clone(),
                    r.category.clone(),
                    r.description.clone(),
                    r.amount.clone(),
                    r.installment.clone(),
                    if r.paid { "yes".into() } else { "no".into() },
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "ID",
                    "Date",
                    "Due",
                    "Account",
                    "Category",
                    "Description",
                    "Amount",
                    "Inst.",
                    "Paid"
                ],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct ExpenseRow {
    pub id: String,
    pub date: String,
    pub due_date: String,
    pub account: String,
    pub category: String,
    pub description: String,
    pub amount: String,
    pub installment: String,
    pub paid: bool,
}

pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<ExpenseRow>> {
    let mut sql = String::from(
        "SELECT e.id, e.date, COALESCE(e.due_date, ''), COALESCE(a.name, e.payment_method),
                e.category, e.description, COALESCE(e.amount, '0'), e.installment_number,
                e.total_installments, e.paid
         FROM expenses e LEFT JOIN accounts a ON e.account_id=a.id WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();

    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(COALESCE(NULLIF(e.due_date,''), e.date),1,7)=?");
        params_vec.push(month.trim().into());
    }
    if let Some(acct) = sub.get_one::<String>("account") {
        sql.push_str(" AND COALESCE(a.name, e.payment_method)=?");
        params_vec.push(acct.trim().into());
    }
    if let Some(cat) = sub.get_one::<String>("category") {
        sql.push_str(" AND e.category=?");
        params_vec.push(cat.trim().into());
    }
    if sub.get_flag("unpaid") {
        sql.push_str(" AND e.paid=0");
    }
    sql.push_str(" ORDER BY COALESCE(NULLIF(e.due_date,''), e.date) DESC, e.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let number: Option<i64> = r.get(7)?;
        let total: Option<i64> = r.get(8)?;
        let installment = match (number, total) {
            (Some(n), Some(t)) => format!("{}/{}", n, t),
            _ => String::new(),
        };
        data.push(ExpenseRow {
            id: r.get(0)?,
            date: r.get(1)?,
            due_date: r.get(2)?,
            account: r.get(3)?,
            category: r.get(4)?,
            description: r.get(5)?,
            amount: r.get(6)?,
            installment,
            paid: r.get::<_, i64>(9)? != 0,
        });
    }
    Ok(data)
}
