// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::RecordError;
use anyhow::{Context, Result};
use chrono::{Datelike, Months, NaiveDate};
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// First day of a `YYYY-MM` month.
pub fn parse_month(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))
}

/// Amount typed by the user: must be a positive number. A decimal comma is accepted.
pub fn parse_amount(s: &str) -> Result<Decimal> {
    let raw = s.trim();
    let d = raw
        .parse::<Decimal>()
        .or_else(|_| raw.replace(',', ".").parse::<Decimal>())
        .with_context(|| format!("Invalid amount '{}'", s))?;
    if d <= Decimal::ZERO {
        anyhow::bail!("Amount must be positive, got '{}'", s);
    }
    Ok(d)
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

static DMY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4})$").expect("valid regex"));
static ISO_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})[T ]").expect("valid regex"));

/// Date read back from storage. Accepts ISO dates, `DD/MM/YYYY` and ISO
/// timestamps (date part only).
pub fn parse_stored_date(
    kind: &'static str,
    id: &str,
    raw: &str,
) -> std::result::Result<NaiveDate, RecordError> {
    let s = raw.trim();
    let err = || RecordError::InvalidDate {
        kind,
        id: id.to_string(),
        value: raw.to_string(),
    };
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Some(c) = DMY.captures(s) {
        let day: u32 = c[1].parse().map_err(|_| err())?;
        let month: u32 = c[2].parse().map_err(|_| err())?;
        let year: i32 = c[3].parse().map_err(|_| err())?;
        return NaiveDate::from_ymd_opt(year, month, day).ok_or_else(err);
    }
    if let Some(c) = ISO_PREFIX.captures(s) {
        return NaiveDate::parse_from_str(&c[1], "%Y-%m-%d").map_err(|_| err());
    }
    Err(err())
}

/// Amount read back from storage as a magnitude. A missing value is zero.
pub fn parse_stored_amount(
    kind: &'static str,
    id: &str,
    raw: Option<&str>,
) -> std::result::Result<Decimal, RecordError> {
    let s = match raw.map(str::trim) {
        None | Some("") => return Ok(Decimal::ZERO),
        Some(s) => s,
    };
    s.parse::<Decimal>()
        .or_else(|_| s.replace(',', ".").parse::<Decimal>())
        .or_else(|_| Decimal::from_scientific(s))
        .map(|d| d.abs())
        .map_err(|_| RecordError::InvalidAmount {
            kind,
            id: id.to_string(),
            value: s.to_string(),
        })
}

/// Same day of month, `n` months later. Days past the end of the target
/// month are clamped to its last day.
pub fn add_months(date: NaiveDate, n: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(n))
}

pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn id_for_account(conn: &Connection, name: &str) -> Result<String> {
    let mut stmt = conn.prepare("SELECT id FROM accounts WHERE name=?1")?;
    let id: String = stmt
        .query_row(params![name.trim()], |r| r.get(0))
        .with_context(|| format!("Account '{}' not found", name.trim()))?;
    Ok(id)
}

pub fn id_for_category(conn: &Connection, name: &str) -> Result<String> {
    let mut stmt = conn.prepare("SELECT id FROM categories WHERE name=?1")?;
    let id: String = stmt
        .query_row(params![name.trim()], |r| r.get(0))
        .with_context(|| format!("Category '{}' not found", name.trim()))?;
    Ok(id)
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
            r.get(0)
        })
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // Arrays stream one element per line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn stored_dates_accept_known_formats() {
        assert_eq!(parse_stored_date("expense", "e1", "2024-01-05"), Ok(d(2024, 1, 5)));
        assert_eq!(parse_stored_date("expense", "e1", "05/01/2024"), Ok(d(2024, 1, 5)));
        assert_eq!(
            parse_stored_date("expense", "e1", "2024-01-05T10:00:00Z"),
            Ok(d(2024, 1, 5))
        );
        assert!(parse_stored_date("expense", "e1", "31/02/2024").is_err());
        assert!(parse_stored_date("expense", "e1", "yesterday").is_err());
    }

    #[test]
    fn stored_amounts_degrade_to_magnitudes() {
        assert_eq!(parse_stored_amount("income", "i1", None), Ok(Decimal::ZERO));
        assert_eq!(parse_stored_amount("income", "i1", Some("  ")), Ok(Decimal::ZERO));
        assert_eq!(
            parse_stored_amount("income", "i1", Some("-12.50")),
            Ok(Decimal::new(1250, 2))
        );
        assert_eq!(
            parse_stored_amount("income", "i1", Some("12,50")),
            Ok(Decimal::new(1250, 2))
        );
        assert!(matches!(
            parse_stored_amount("income", "i1", Some("abc")),
            Err(RecordError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn add_months_clamps_to_month_end() {
        assert_eq!(add_months(d(2024, 1, 31), 1), Some(d(2024, 2, 29)));
        assert_eq!(add_months(d(2023, 1, 31), 1), Some(d(2023, 2, 28)));
        assert_eq!(add_months(d(2024, 11, 15), 2), Some(d(2025, 1, 15)));
    }

    #[test]
    fn user_amounts_must_be_positive() {
        assert_eq!(parse_amount("10,5").unwrap(), Decimal::new(105, 1));
        assert!(parse_amount("0").is_err());
        assert!(parse_amount("-3").is_err());
    }
}
