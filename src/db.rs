// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::RecordError;
use crate::models::{Account, Expense, Income, Installment, LedgerInput, Transfer};
use crate::utils::{parse_stored_amount, parse_stored_date};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use rusqlite::types::Value;
use rust_decimal::Decimal;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Cashtrail", "cashtrail"));

pub const DB_ENV: &str = "CASHTRAIL_DB";

pub fn db_path() -> Result<PathBuf> {
    if let Some(p) = std::env::var_os(DB_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(p));
    }
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("cashtrail.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&conn)?;
    log::debug!("database ready at {}", path.display());
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS accounts(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        initial_balance TEXT NOT NULL DEFAULT '0',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS categories(
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL UNIQUE,
        kind TEXT NOT NULL CHECK(kind IN ('income','expense'))
    );

    -- account_id is NULL for rows that only know the account by name
    CREATE TABLE IF NOT EXISTS expenses(
        id TEXT PRIMARY KEY,
        date TEXT NOT NULL,
        due_date TEXT,
        amount TEXT,
        account_id TEXT,
        payment_method TEXT NOT NULL DEFAULT '',
        category TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT '',
        installment_group TEXT,
        installment_number INTEGER,
        total_installments INTEGER,
        is_credit_card INTEGER NOT NULL DEFAULT 0,
        paid INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
    CREATE INDEX IF NOT EXISTS idx_expenses_group ON expenses(installment_group);

    CREATE TABLE IF NOT EXISTS income(
        id TEXT PRIMARY KEY,
        date TEXT NOT NULL,
        amount TEXT,
        account_id TEXT,
        account TEXT NOT NULL DEFAULT '',
        source TEXT NOT NULL DEFAULT '',
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_income_date ON income(date);

    CREATE TABLE IF NOT EXISTS transfers(
        id TEXT PRIMARY KEY,
        date TEXT NOT NULL,
        amount TEXT,
        from_account TEXT NOT NULL,
        to_account TEXT NOT NULL,
        description TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_transfers_date ON transfers(date);
    "#,
    )?;
    Ok(())
}

/// Rows read back from storage plus the fields that had to be degraded.
#[derive(Debug)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub issues: Vec<RecordError>,
}

impl<T> Loaded<T> {
    fn new() -> Self {
        Self {
            records: Vec::new(),
            issues: Vec::new(),
        }
    }

    fn log_issues(&self) {
        for issue in &self.issues {
            log::warn!("{}", issue);
        }
    }
}

/// Text form of a loosely typed column; external writers may store numbers.
fn value_text(v: Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) => Some(f.to_string()),
        Value::Text(s) => Some(s),
        Value::Blob(_) => Some(String::from("<blob>")),
    }
}

pub fn load_accounts(conn: &Connection) -> Result<Loaded<Account>> {
    let mut out = Loaded::new();
    let mut stmt =
        conn.prepare("SELECT id, name, initial_balance FROM accounts ORDER BY created_at, name")?;
    let mut rows = stmt.query([])?;
    while let Some(r) = rows.next()? {
        let id: String = r.get(0)?;
        let name: String = r.get(1)?;
        let raw = value_text(r.get(2)?).unwrap_or_default();
        let initial_balance = if raw.trim().is_empty() {
            Decimal::ZERO
        } else {
            match raw.trim().parse::<Decimal>() {
                Ok(d) => d,
                Err(_) => {
                    out.issues.push(RecordError::InvalidAmount {
                        kind: "account",
                        id: id.clone(),
                        value: raw.clone(),
                    });
                    Decimal::ZERO
                }
            }
        };
        out.records.push(Account {
            id,
            name,
            initial_balance,
        });
    }
    Ok(out)
}

pub fn load_expenses(conn: &Connection) -> Result<Loaded<Expense>> {
    let mut out = Loaded::new();
    let mut stmt = conn.prepare(
        "SELECT id, date, due_date, amount, account_id, payment_method, category, description,
                installment_group, installment_number, total_installments, is_credit_card, paid
         FROM expenses ORDER BY date, id",
    )?;
    let mut rows = stmt.query([])?;
    while let Some(r) = rows.next()? {
        let id: String = r.get(0)?;
        let date_raw = value_text(r.get(1)?).unwrap_or_default();
        let date = match parse_stored_date("expense", &id, &date_raw) {
            Ok(d) => d,
            Err(e) => {
                out.issues.push(e);
                continue;
            }
        };
        // A broken due date is ignored; the purchase date still places the expense
        let due_date = match value_text(r.get(2)?).filter(|s| !s.trim().is_empty()) {
            Some(raw) => match parse_stored_date("expense", &id, &raw) {
                Ok(d) => Some(d),
                Err(e) => {
                    out.issues.push(e);
                    None
                }
            },
            None => None,
        };
        let amount = match parse_stored_amount("expense", &id, value_text(r.get(3)?).as_deref()) {
            Ok(a) => a,
            Err(e) => {
                out.issues.push(e);
                Decimal::ZERO
            }
        };
        let group: Option<String> = r.get(8)?;
        let number: Option<i64> = r.get(9)?;
        let total: Option<i64> = r.get(10)?;
        let installment = group.map(|group| Installment {
            group,
            number: number.and_then(|n| u32::try_from(n).ok()).unwrap_or(1),
            total: total.and_then(|n| u32::try_from(n).ok()).unwrap_or(1),
        });
        out.records.push(Expense {
            id,
            date,
            due_date,
            amount,
            account_id: r.get(4)?,
            payment_method: r.get(5)?,
            category: r.get(6)?,
            description: r.get(7)?,
            installment,
            is_credit_card: r.get::<_, i64>(11)? != 0,
            paid: r.get::<_, i64>(12)? != 0,
        });
    }
    Ok(out)
}

pub fn load_income(conn: &Connection) -> Result<Loaded<Income>> {
    let mut out = Loaded::new();
    let mut stmt = conn.prepare(
        "SELECT id, date, amount, account_id, account, source, notes FROM income ORDER BY date, id",
    )?;
    let mut rows = stmt.query([])?;
    while let Some(r) = rows.next()? {
        let id: String = r.get(0)?;
        let date_raw = value_text(r.get(1)?).unwrap_or_default();
        let date = match parse_stored_date("income", &id, &date_raw) {
            Ok(d) => d,
            Err(e) => {
                out.issues.push(e);
                continue;
            }
        };
        let amount = match parse_stored_amount("income", &id, value_text(r.get(2)?).as_deref()) {
            Ok(a) => a,
            Err(e) => {
                out.issues.push(e);
                Decimal::ZERO
            }
        };
        out.records.push(Income {
            id,
            date,
            amount,
            account_id: r.get(3)?,
            account: r.get(4)?,
            source: r.get(5)?,
            notes: r.get(6)?,
        });
    }
    Ok(out)
}

pub fn load_transfers(conn: &Connection) -> Result<Loaded<Transfer>> {
    let mut out = Loaded::new();
    let mut stmt = conn.prepare(
        "SELECT id, date, amount, from_account, to_account, description FROM transfers ORDER BY date, id",
    )?;
    let mut rows = stmt.query([])?;
    while let Some(r) = rows.next()? {
        let id: String = r.get(0)?;
        let date_raw = value_text(r.get(1)?).unwrap_or_default();
        let date = match parse_stored_date("transfer", &id, &date_raw) {
            Ok(d) => d,
            Err(e) => {
                out.issues.push(e);
                continue;
            }
        };
        let amount = match parse_stored_amount("transfer", &id, value_text(r.get(2)?).as_deref())
        {
            Ok(a) => a,
            Err(e) => {
                out.issues.push(e);
                Decimal::ZERO
            }
        };
        out.records.push(Transfer {
            id,
            date,
            amount,
            from_account: r.get(3)?,
            to_account: r.get(4)?,
            description: r.get(5)?,
        });
    }
    Ok(out)
}

/// All four streams, with degraded rows logged.
pub fn load_input(conn: &Connection) -> Result<LedgerInput> {
    let accounts = load_accounts(conn)?;
    let expenses = load_expenses(conn)?;
    let income = load_income(conn)?;
    let transfers = load_transfers(conn)?;
    accounts.log_issues();
    expenses.log_issues();
    income.log_issues();
    transfers.log_issues();
    Ok(LedgerInput {
        accounts: accounts.records,
        expenses: expenses.records,
        income: income.records,
        transfers: transfers.records,
    })
}
