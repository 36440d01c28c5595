// Copyright (c) 2025 Casabook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::{maybe_print_json, parse_month, pretty_table};
use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("cashflow", sub)) => cashflow(conn, sub)?,
        Some(("spend-by-category", sub)) => spend_by_category(conn, sub)?,
        Some(("recurring", sub)) => recurring(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn cashflow(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let months: usize = *sub.get_one::<usize>("months").unwrap_or(&12);

    let mut stmt = conn.prepare(
        "SELECT substr(date,1,7) AS month, amount, kind FROM transactions ORDER BY date DESC",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
        ))
    })?;

    use std::collections::BTreeMap;
    let mut map: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for row in rows {
        let (m, amt_s, kind) = row?;
        let amt = amt_s
            .parse::<Decimal>()
            .with_context(|| format!("Invalid amount '{}' in {}", amt_s, m))?;
        let entry = map.entry(m).or_insert((Decimal::ZERO, Decimal::ZERO));
        if kind == "income" {
            entry.0 += amt;
        } else {
            entry.1 += amt;
        }
    }

    let mut data = Vec::new();
    for (m, (inc, exp)) in map.iter().rev().take(months) {
        data.push(vec![
            m.clone(),
            format!("{:.2}", inc),
            format!("{:.2}", exp),
            format!("{:.2}", inc - exp),
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(&["Month", "Income", "Expense", "Net"], data)
        );
    }
    Ok(())
}

fn spend_by_category(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let month = parse_month(sub.get_one::<String>("month").unwrap())?;

    let mut stmt = conn.prepare(
        "SELECT c.name, printf('%.2f', SUM(t.amount)) AS spent
         FROM transactions t LEFT JOIN categories c ON t.category_id=c.id
         WHERE substr(t.date,1,7)=?1 AND t.kind='expense'
         GROUP BY c.name ORDER BY SUM(t.amount) DESC",
    )?;
    let rows = stmt.query_map([&month], |r| {
        Ok((r.get::<_, Option<String>>(0)?, r.get::<_, String>(1)?))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (cat, spent) = row?;
        data.push(vec![cat.unwrap_or("(uncategorized)".into()), spent]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!("{}", pretty_table(&["Category", "Spent"], data));
    }
    Ok(())
}

fn recurring(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let today = chrono::Utc::now().date_naive().to_string();

    let mut stmt = conn.prepare(
        "SELECT series_id, description, amount, kind,
                COUNT(*) AS total,
                SUM(date >= ?1) AS remaining,
                MIN(CASE WHEN date >= ?1 THEN date END) AS next_due
         FROM transactions WHERE series_id IS NOT NULL
         GROUP BY series_id ORDER BY description",
    )?;
    let rows = stmt.query_map(params![today], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, i64>(4)?,
            r.get::<_, i64>(5)?,
            r.get::<_, Option<String>>(6)?,
        ))
    })?;
    let mut data = Vec::new();
    for row in rows {
        let (series, desc, amount, kind, total, remaining, next_due) = row?;
        data.push(vec![
            desc,
            amount,
            kind,
            next_due.unwrap_or_else(|| "(ended)".into()),
            format!("{}/{}", remaining, total),
            series,
        ]);
    }
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        println!(
            "{}",
            pretty_table(
                &["Description", "Amount", "Kind", "Next due", "Remaining", "Series"],
                data
            )
        );
    }
    Ok(())
}
