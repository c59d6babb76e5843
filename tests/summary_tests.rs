// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashtrail::commands::{settings, summary};
use cashtrail::models::{AccountSort, SortDirection};
use cashtrail::{cli, db};
use chrono::NaiveDate;
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO accounts(id, name, initial_balance, created_at) VALUES
            ('a1', 'Checking', '100', '2024-01-01 00:00:00'),
            ('a2', 'brokerage', '900', '2024-01-02 00:00:00'),
            ('a3', 'Cash', '10', '2024-01-03 00:00:00');
        INSERT INTO expenses(id, date, due_date, amount, account_id, payment_method) VALUES
            ('e1', '2024-02-01', '2024-02-03', '30', 'a1', 'Checking'),
            ('e2', '2024-02-02', NULL, '5', 'a1', 'Checking');
        INSERT INTO income(id, date, amount, account_id, source) VALUES
            ('i1', '2024-02-02', '1', 'a3', 'Gift');
        "#,
    )
    .unwrap();
    conn
}

fn daily_matches(args: &[&str]) -> clap::ArgMatches {
    let mut argv = vec!["cashtrail", "summary", "daily"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("summary", s)) => match s.subcommand() {
            Some(("daily", d)) => d.clone(),
            _ => panic!("no daily subcommand"),
        },
        _ => panic!("no summary subcommand"),
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn month_window_uses_configured_length() {
    let conn = setup();
    settings::handle(
        &conn,
        match cli::build_cli()
            .get_matches_from(["cashtrail", "settings", "set", "--key", "summary_max_days", "--value", "5"])
            .subcommand()
        {
            Some(("settings", s)) => s,
            _ => panic!("no settings subcommand"),
        },
    )
    .unwrap();

    let filter = summary::filter_from_args(&conn, &daily_matches(&["--month", "2024-02"])).unwrap();
    assert_eq!(filter.start, d(2024, 2, 1));
    assert_eq!(filter.end, d(2024, 2, 5));
    assert_eq!(filter.max_days, 5);
    assert_eq!(filter.sort_by, AccountSort::Name);

    // An explicit range longer than the cap is cut to the cap
    let view = summary::ledger_view(
        &conn,
        &daily_matches(&["--from", "2024-02-01", "--to", "2024-03-31"]),
    )
    .unwrap();
    assert_eq!(view.summaries.len(), 5);
    assert_eq!(view.summaries[0].date, d(2024, 2, 5));
}

#[test]
fn columns_follow_sort_and_visibility() {
    let conn = setup();
    let names = |args: &[&str]| -> Vec<String> {
        summary::ledger_view(&conn, &daily_matches(args))
            .unwrap()
            .columns
            .into_iter()
            .map(|a| a.name)
            .collect()
    };

    let base = ["--from", "2024-02-01", "--to", "2024-02-04"];
    assert_eq!(names(&base), vec!["brokerage", "Cash", "Checking"]);

    let mut by_balance = base.to_vec();
    by_balance.extend(["--sort", "balance", "--desc"]);
    assert_eq!(names(&by_balance), vec!["brokerage", "Checking", "Cash"]);

    let mut by_activity = base.to_vec();
    by_activity.extend(["--sort", "activity", "--desc"]);
    assert_eq!(names(&by_activity)[0], "Checking");

    let mut custom = base.to_vec();
    custom.extend(["--sort", "custom", "--account", "Checking", "--account", "Cash"]);
    assert_eq!(names(&custom), vec!["Checking", "Cash"]);
}

#[test]
fn hidden_accounts_still_count_toward_total() {
    let conn = setup();
    let view = summary::ledger_view(
        &conn,
        &daily_matches(&["--from", "2024-02-03", "--to", "2024-02-03", "--account", "Cash"]),
    )
    .unwrap();
    assert_eq!(view.filter.direction, SortDirection::Asc);
    let rows = view.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].accounts.len(), 1);
    assert_eq!(rows[0].accounts[0].final_balance, "11.00");
    // 65 + 900 + 11
    assert_eq!(rows[0].total_daily_balance, "976.00");
}

#[test]
fn unknown_account_in_filter_is_an_error() {
    let conn = setup();
    assert!(summary::filter_from_args(&conn, &daily_matches(&["--account", "Vault"])).is_err());
}
