// Copyright (c) 2025 Casabook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{id_for_category, maybe_print_json, parse_date, parse_decimal, pretty_table};
use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("fund", sub)) => fund(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let target = parse_decimal(sub.get_one::<String>("target").unwrap())?;
    if target <= Decimal::ZERO {
        bail!("Target must be positive, got {}", target);
    }
    let category_id = match sub.get_one::<String>("category") {
        Some(cat) => Some(id_for_category(conn, cat)?),
        None => None,
    };
    let deadline = match sub.get_one::<String>("deadline") {
        Some(d) => Some(parse_date(d)?.to_string()),
        None => None,
    };
    conn.execute(
        "INSERT INTO goals(name, target_amount, category_id, deadline) VALUES (?1,?2,?3,?4)",
        params![name, target.to_string(), category_id, deadline],
    )?;
    println!("Added goal '{}' with target {}", name, target);
    Ok(())
}

fn fund(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    if amount <= Decimal::ZERO {
        bail!("Amount must be positive, got {}", amount);
    }

    let current_s: Option<String> = conn
        .query_row(
            "SELECT current_amount FROM goals WHERE name=?1",
            params![name],
            |r| r.get(0),
        )
        .optional()?;
    let Some(current_s) = current_s else {
        bail!("Goal '{}' not found", name);
    };
    let current = current_s
        .parse::<Decimal>()
        .with_context(|| format!("Invalid saved amount '{}' for goal {}", current_s, name))?;
    let new_amount = current + amount;

    conn.execute(
        "UPDATE goals SET current_amount=?1 WHERE name=?2",
        params![new_amount.to_string(), name],
    )?;
    println!("Funded '{}' with {} (saved {})", name, amount, new_amount);
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap();
    let changed = conn.execute("DELETE FROM goals WHERE name=?1", params![name])?;
    if changed == 0 {
        bail!("Goal '{}' not found", name);
    }
    println!("Removed goal '{}'", name);
    Ok(())
}

#[derive(Serialize)]
pub struct GoalRow {
    pub name: String,
    pub target: String,
    pub saved: String,
    pub progress: String,
    pub deadline: String,
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = goal_rows(conn)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|g| {
                vec![
                    g.name.clone(),
                    g.target.clone(),
                    g.saved.clone(),
                    g.progress.clone(),
                    g.deadline.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Goal", "Target", "Saved", "Progress", "Deadline"], rows)
        );
    }
    Ok(())
}

pub fn goal_rows(conn: &Connection) -> Result<Vec<GoalRow>> {
    let mut stmt = conn.prepare(
        "SELECT name, target_amount, current_amount, deadline FROM goals ORDER BY name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, Option<String>>(3)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (name, target_s, saved_s, deadline) = row?;
        let target = target_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid target '{}' for goal {}", target_s, name))?;
        let saved = saved_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid saved amount '{}' for goal {}", saved_s, name))?;
        let progress = if target.is_zero() {
            Decimal::ZERO
        } else {
            saved * Decimal::from(100) / target
        };
        data.push(GoalRow {
            name,
            target: format!("{:.2}", target),
            saved: format!("{:.2}", saved),
            progress: format!("{:.1}%", progress),
            deadline: deadline.unwrap_or_default(),
        });
    }
    Ok(data)
}
