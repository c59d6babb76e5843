// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, CategoryKind};
use crate::utils::{new_id, pretty_table};
use anyhow::{Result, anyhow};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let kind_raw = sub.get_one::<String>("kind").unwrap();
            let kind = CategoryKind::parse(kind_raw)
                .ok_or_else(|| anyhow!("Unknown category kind '{}'", kind_raw))?;
            conn.execute(
                "INSERT INTO categories(id, name, kind) VALUES (?1, ?2, ?3)",
                params![new_id(), name, kind.as_str()],
            )?;
            println!("Added {} category '{}'", kind.as_str(), name);
        }
        Some(("list", _)) => {
            let data = list(conn)?
                .into_iter()
                .map(|c| vec![c.name, c.kind.as_str().to_string()])
                .collect();
            println!("{}", pretty_table(&["Category", "Kind"], data));
        }
        Some(("rm", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            conn.execute("DELETE FROM categories WHERE name=?1", params![name])?;
            println!("Removed category '{}'", name);
        }
        _ => {}
    }
    Ok(())
}

pub fn list(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt = conn.prepare("SELECT id, name, kind FROM categories ORDER BY kind, name")?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(r) = rows.next()? {
        let kind_raw: String = r.get(2)?;
        out.push(Category {
            id: r.get(0)?,
            name: r.get(1)?,
            kind: CategoryKind::parse(&kind_raw)
                .ok_or_else(|| anyhow!("Unknown category kind '{}'", kind_raw))?,
        });
    }
    Ok(out)
}
