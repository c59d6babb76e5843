// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::ledger::range::DEFAULT_MAX_DAYS;
use crate::models::AccountSort;
use crate::utils::{get_setting, pretty_table, set_setting};
use anyhow::{Context, Result, bail};
use rusqlite::Connection;

pub const SUMMARY_MAX_DAYS: &str = "summary_max_days";
pub const SUMMARY_SORT: &str = "summary_sort";

const KNOWN: [(&str, &str); 2] = [
    (SUMMARY_MAX_DAYS, "Longest date range the daily ledger covers"),
    (SUMMARY_SORT, "Default account order: name|balance|final-balance|activity|custom"),
];

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("get", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            println!("{}", current(conn, key)?);
        }
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap().trim();
            let value = sub.get_one::<String>("value").unwrap().trim();
            let value = validate(key, value)?;
            set_setting(conn, key, &value)?;
            println!("{} = {}", key, value);
        }
        Some(("list", _)) => {
            let mut rows = Vec::new();
            for (key, help) in KNOWN {
                rows.push(vec![key.to_string(), current(conn, key)?, help.to_string()]);
            }
            println!("{}", pretty_table(&["Key", "Value", "Meaning"], rows));
        }
        _ => {}
    }
    Ok(())
}

fn default_for(key: &str) -> Result<String> {
    match key {
        SUMMARY_MAX_DAYS => Ok(DEFAULT_MAX_DAYS.to_string()),
        SUMMARY_SORT => Ok(AccountSort::default().as_str().to_string()),
        _ => bail!("Unknown setting '{}'", key),
    }
}

/// Stored value, or the default when unset.
pub fn current(conn: &Connection, key: &str) -> Result<String> {
    let default = default_for(key)?;
    Ok(get_setting(conn, key)?.unwrap_or(default))
}

/// Normalized form of `value`, or an error if `key` can't hold it.
pub fn validate(key: &str, value: &str) -> Result<String> {
    match key {
        SUMMARY_MAX_DAYS => {
            let n: usize = value
                .parse()
                .with_context(|| format!("{} must be a whole number of days", key))?;
            if n == 0 {
                bail!("{} must be at least 1", key);
            }
            Ok(n.to_string())
        }
        SUMMARY_SORT => match AccountSort::parse(value) {
            Some(s) => Ok(s.as_str().to_string()),
            None => bail!("Unknown account order '{}'", value),
        },
        _ => bail!("Unknown setting '{}'", key),
    }
}

pub fn summary_max_days(conn: &Connection) -> Result<usize> {
    let raw = current(conn, SUMMARY_MAX_DAYS)?;
    validate(SUMMARY_MAX_DAYS, &raw)?
        .parse()
        .with_context(|| format!("Invalid {} '{}'", SUMMARY_MAX_DAYS, raw))
}

pub fn summary_sort(conn: &Connection) -> Result<AccountSort> {
    let raw = current(conn, SUMMARY_SORT)?;
    AccountSort::parse(&raw).with_context(|| format!("Invalid {} '{}'", SUMMARY_SORT, raw))
}
