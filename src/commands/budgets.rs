// Copyright (c) 2025 Casabook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{id_for_category, maybe_print_json, parse_decimal, parse_month, pretty_table};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("report", sub)) => report(conn, sub)?,
        Some(("rm", sub)) => rm(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let cat = sub.get_one::<String>("category").unwrap();
    let limit = parse_decimal(sub.get_one::<String>("limit").unwrap())?;
    let cat_id = id_for_category(conn, cat)?;
    conn.execute(
        "INSERT INTO budgets(category_id, monthly_limit) VALUES (?1,?2)
         ON CONFLICT(category_id) DO UPDATE SET monthly_limit=excluded.monthly_limit",
        params![cat_id, limit.to_string()],
    )?;
    println!("Budget for {} = {} per month", cat, limit);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let mut stmt = conn.prepare(
        "SELECT c.name, b.monthly_limit FROM budgets b JOIN categories c ON b.category_id=c.id ORDER BY c.name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((r.get::<_, String>(0)?, r.get::<_, String>(1)?))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (c, l) = row?;
        data.push(vec![c, l]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Category", "Monthly limit"], data));
    }
    Ok(())
}

fn rm(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let cat = sub.get_one::<String>("category").unwrap();
    let cat_id = id_for_category(conn, cat)?;
    conn.execute("DELETE FROM budgets WHERE category_id=?1", params![cat_id])?;
    println!("Removed budget for {}", cat);
    Ok(())
}

#[derive(Serialize)]
pub struct BudgetStatusRow {
    pub category: String,
    pub monthly_limit: String,
    pub spent: String,
    pub remaining: String,
}

fn report(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;
    let data = budget_status(conn, &month)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.category.clone(),
                    r.monthly_limit.clone(),
                    r.spent.clone(),
                    r.remaining.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Limit", "Spent", "Remaining"], rows)
        );
    }
    Ok(())
}

/// Limit vs expense total for every budgeted category in a month. Income never
/// counts against a budget.
pub fn budget_status(conn: &Connection, month: &str) -> Result<Vec<BudgetStatusRow>> {
    let mut stmt = conn.prepare(
        "SELECT b.category_id, c.name, b.monthly_limit
         FROM budgets b JOIN categories c ON b.category_id=c.id ORDER BY c.name",
    )?;
    let budgets = stmt.query_map([], |r| {
        Ok((
            r.get::<_, i64>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;

    let mut data = Vec::new();
    for b in budgets {
        let (cat_id, cat_name, limit_s) = b?;
        let limit = limit_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid budget limit '{}' for {}", limit_s, cat_name))?;

        let mut tstmt = conn.prepare(
            "SELECT amount FROM transactions
             WHERE category_id=?1 AND kind='expense' AND substr(date,1,7)=?2",
        )?;
        let mut cur = tstmt.query(params![cat_id, month])?;
        let mut spent = Decimal::ZERO;
        while let Some(r) = cur.next()? {
            let amt_s: String = r.get(0)?;
            let amt = amt_s
                .parse::<Decimal>()
                .with_context(|| format!("Invalid amount '{}' in transactions", amt_s))?;
            spent += amt;
        }

        data.push(BudgetStatusRow {
            category: cat_name,
            monthly_limit: format!("{:.2}", limit),
            spent: format!("{:.2}", spent),
            remaining: format!("{:.2}", limit - spent),
        });
    }
    Ok(data)
}
