// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use cashtrail::{cli, commands, db};
use rusqlite::Connection;

fn exec(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["cashtrail"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("account", sub)) => commands::accounts::handle(conn, sub),
        Some(("category", sub)) => commands::categories::handle(conn, sub),
        Some(("expense", sub)) => commands::expenses::handle(conn, sub),
        other => panic!("unexpected subcommand {:?}", other.map(|(n, _)| n)),
    }
}

fn list(conn: &Connection, args: &[&str]) -> Vec<commands::expenses::ExpenseRow> {
    let mut argv = vec!["cashtrail", "expense", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("expense", exp_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = exp_m.subcommand() {
            return commands::expenses::query_rows(conn, list_m).unwrap();
        }
    }
    panic!("no expense list subcommand");
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    exec(&conn, &["account", "add", "--name", "Card"]).unwrap();
    exec(&conn, &["category", "add", "--name", "Electronics"]).unwrap();
    conn
}

#[test]
fn installments_are_stored_as_monthly_records() {
    let conn = setup();
    exec(
        &conn,
        &[
            "expense", "add", "--date", "2024-01-31", "--amount", "100", "--account", "Card",
            "--category", "Electronics", "--installments", "3", "--credit-card",
        ],
    )
    .unwrap();

    let rows = list(&conn, &[]);
    assert_eq!(rows.len(), 3);
    // Most recent due date first
    let dues: Vec<&str> = rows.iter().map(|r| r.due_date.as_str()).collect();
    assert_eq!(dues, vec!["2024-03-31", "2024-02-29", "2024-01-31"]);
    let inst: Vec<&str> = rows.iter().map(|r| r.installment.as_str()).collect();
    assert_eq!(inst, vec!["3/3", "2/3", "1/3"]);
    assert_eq!(rows[0].amount, "33.34");
    assert_eq!(rows[1].amount, "33.33");
    assert!(rows.iter().all(|r| r.account == "Card" && !r.paid));

    let loaded = db::load_expenses(&conn).unwrap();
    assert!(loaded.issues.is_empty());
    let groups: std::collections::HashSet<String> = loaded
        .records
        .iter()
        .map(|e| e.installment.as_ref().unwrap().group.clone())
        .collect();
    assert_eq!(groups.len(), 1);
    assert!(loaded.records.iter().all(|e| e.is_credit_card));
}

#[test]
fn list_filters_by_month_and_limit() {
    let conn = setup();
    exec(
        &conn,
        &[
            "expense", "add", "--date", "2024-01-15", "--amount", "90", "--account", "Card",
            "--installments", "3",
        ],
    )
    .unwrap();
    exec(&conn, &["expense", "add", "--date", "2024-02-01", "--amount", "5", "--account", "Card"])
        .unwrap();

    let feb = list(&conn, &["--month", "2024-02"]);
    assert_eq!(feb.len(), 2);
    assert_eq!(list(&conn, &["--limit", "2"]).len(), 2);
    assert_eq!(list(&conn, &["--account", "Nobody"]).len(), 0);
}

#[test]
fn pay_and_remove_whole_group() {
    let conn = setup();
    exec(
        &conn,
        &[
            "expense", "add", "--date", "2024-01-10", "--amount", "60", "--account", "Card",
            "--installments", "2",
        ],
    )
    .unwrap();
    exec(&conn, &["expense", "add", "--date", "2024-01-12", "--amount", "7", "--account", "Card"])
        .unwrap();

    let rows = list(&conn, &[]);
    let single = rows.iter().find(|r| r.installment.is_empty()).unwrap().id.clone();
    let first_installment = rows.iter().find(|r| r.installment == "1/2").unwrap().id.clone();

    exec(&conn, &["expense", "pay", "--id", &single]).unwrap();
    assert_eq!(list(&conn, &["--unpaid"]).len(), 2);

    exec(&conn, &["expense", "rm", "--id", &first_installment, "--group"]).unwrap();
    let left = list(&conn, &[]);
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, single);
    assert!(left[0].paid);

    assert!(exec(&conn, &["expense", "pay", "--id", "missing"]).is_err());
    assert!(exec(&conn, &["expense", "rm", "--id", "missing"]).is_err());
}

#[test]
fn add_rejects_unknown_account_and_category() {
    let conn = setup();
    assert!(
        exec(&conn, &["expense", "add", "--date", "2024-01-10", "--amount", "1", "--account", "Cash"])
            .is_err()
    );
    assert!(
        exec(
            &conn,
            &[
                "expense", "add", "--date", "2024-01-10", "--amount", "1", "--account", "Card",
                "--category", "Travel",
            ],
        )
        .is_err()
    );
    assert!(
        exec(&conn, &["expense", "add", "--date", "2024-01-10", "--amount", "0", "--account", "Card"])
            .is_err()
    );
    assert!(list(&conn, &[]).is_empty());
}

#[test]
fn categories_keep_their_kind() {
    let conn = setup();
    exec(&conn, &["category", "add", "--name", "Salary", "--kind", "income"]).unwrap();
    let cats = commands::categories::list(&conn).unwrap();
    let kinds: Vec<(&str, &str)> = cats.iter().map(|c| (c.name.as_str(), c.kind.as_str())).collect();
    assert_eq!(kinds, vec![("Electronics", "expense"), ("Salary", "income")]);
    assert!(exec(&conn, &["category", "add", "--name", "Salary"]).is_err());
}

#[test]
fn stored_installments_add_up_after_reload() {
    let conn = setup();
    for (amount, n) in [("10", "60"), ("1", "120")] {
        exec(
            &conn,
            &[
                "expense", "add", "--date", "2024-01-15", "--amount", amount, "--account", "Card",
                "--installments", n,
            ],
        )
        .unwrap();
    }

    let loaded = db::load_expenses(&conn).unwrap();
    assert!(loaded.issues.is_empty());
    let raw_negative: i64 = conn
        .query_row("SELECT COUNT(*) FROM expenses WHERE amount LIKE '-%'", [], |r| r.get(0))
        .unwrap();
    assert_eq!(raw_negative, 0);

    let mut totals = std::collections::HashMap::new();
    for e in &loaded.records {
        let inst = e.installment.as_ref().unwrap();
        *totals.entry(inst.total).or_insert(rust_decimal::Decimal::ZERO) += e.amount;
    }
    assert_eq!(totals[&60], rust_decimal::Decimal::from(10));
    assert_eq!(totals[&120], rust_decimal::Decimal::ONE);
}
