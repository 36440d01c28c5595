// Copyright (c) 2025 Casabook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{Category, TransactionKind};
use crate::utils::{maybe_print_json, parse_kind, pretty_table};
use anyhow::{bail, Result};
use rusqlite::{params, Connection, OptionalExtension};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let kind = parse_kind(sub.get_one::<String>("kind").unwrap())?;
    let icon = sub.get_one::<String>("icon").map(|s| s.to_string());
    let color = sub.get_one::<String>("color").map(|s| s.to_string());
    conn.execute(
        "INSERT INTO categories(name, kind, icon, color) VALUES (?1, ?2, ?3, ?4)",
        params![name, kind.as_str(), icon, color],
    )?;
    println!("Added {} category '{}'", kind.as_str(), name);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = all_categories(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|c| {
                vec![
                    c.name.clone(),
                    c.kind.as_str().to_string(),
                    c.icon.clone().unwrap_or_default(),
                    c.color.clone().unwrap_or_default(),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Category", "Kind", "Icon", "Color"], rows));
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let cat_id: Option<i64> = conn
        .query_row(
            "SELECT id FROM categories WHERE name=?1",
            params![name],
            |r| r.get(0),
        )
        .optional()?;
    let Some(cat_id) = cat_id else {
        bail!("Category '{}' not found", name);
    };

    // Refuse removal while any transaction still references the category.
    let in_use: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM transactions WHERE category_id=?1 LIMIT 1",
            params![cat_id],
            |r| r.get(0),
        )
        .optional()?;
    if in_use.is_some() {
        bail!("Category '{}' is in use and cannot be removed", name);
    }

    conn.execute("DELETE FROM categories WHERE id=?1", params![cat_id])?;
    println!("Removed category '{}'", name);
    Ok(())
}

pub fn all_categories(conn: &Connection) -> Result<Vec<Category>> {
    let mut stmt =
        conn.prepare("SELECT id, name, kind, icon, color FROM categories ORDER BY name")?;
    let rows = stmt.query_map([], |r| {
        let kind_s: String = r.get(2)?;
        let kind = TransactionKind::parse(&kind_s).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                rusqlite::types::Type::Text,
                format!("unknown category kind '{}'", kind_s).into(),
            )
        })?;
        Ok(Category {
            id: r.get(0)?,
            name: r.get(1)?,
            kind,
            icon: r.get(3)?,
            color: r.get(4)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}
