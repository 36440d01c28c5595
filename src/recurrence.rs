// Copyright (c) 2025 Casabook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::{
    DeletionScope, NewTransaction, RecurrenceFrequency, RecurringIntent, Transaction,
};
use crate::store::TransactionStore;

/// Series generated without an explicit end date stop this many years after the
/// start date. Fixed policy, no configuration surface.
pub const DEFAULT_HORIZON_YEARS: u32 = 5;

/// Returned by [`expand_series`]: the new series plus the id of its first
/// occurrence, which the caller uses for immediate feedback.
#[derive(Debug, Clone)]
pub struct SeriesReceipt {
    pub series_id: String,
    pub representative_id: i64,
}

/// Dates of every occurrence of a monthly series starting at `start`, bounded
/// by `end` (or the default horizon). Occurrence `i` is `start + i` calendar
/// months, so a day-of-month that overflows a shorter month clamps to that
/// month's last day without shifting later occurrences (Jan 31 -> Feb 28/29 ->
/// Mar 31).
pub fn occurrence_dates(
    start: NaiveDate,
    end: Option<NaiveDate>,
) -> Result<Vec<NaiveDate>, CoreError> {
    let horizon = match end {
        Some(d) => d,
        None => start
            .checked_add_months(Months::new(12 * DEFAULT_HORIZON_YEARS))
            .ok_or_else(|| CoreError::Validation("start date out of calendar range".into()))?,
    };

    let mut dates = Vec::new();
    let mut step = 0u32;
    while let Some(date) = start.checked_add_months(Months::new(step)) {
        if date > horizon {
            break;
        }
        dates.push(date);
        step += 1;
    }
    if dates.is_empty() {
        return Err(CoreError::EmptySeries);
    }
    Ok(dates)
}

/// Expands one recurring intent into a materialized monthly series, persisted
/// as a single atomic batch. Either the whole series lands in the store or
/// nothing does.
pub fn expand_series(
    store: &mut dyn TransactionStore,
    intent: &RecurringIntent,
) -> Result<SeriesReceipt, CoreError> {
    if intent.amount <= Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "amount must be positive, got {}",
            intent.amount
        )));
    }

    let dates = occurrence_dates(intent.start_date, intent.end_date)?;
    let series_id = Uuid::new_v4().to_string();
    let records: Vec<NewTransaction> = dates
        .into_iter()
        .map(|date| NewTransaction {
            date,
            description: intent.description.clone(),
            amount: intent.amount,
            kind: intent.kind,
            category_id: intent.category_id,
            is_recurring: true,
            recurrence_frequency: Some(RecurrenceFrequency::Monthly),
            series_id: Some(series_id.clone()),
        })
        .collect();

    let ids = store.batch_create(&records)?;
    let representative_id = ids.first().copied().ok_or(CoreError::EmptySeries)?;
    Ok(SeriesReceipt {
        series_id,
        representative_id,
    })
}

/// Deletes `target` and, depending on `scope`, its series siblings. Returns
/// the number of deleted records.
///
/// A record without a series is never treated as part of a group: any scope
/// downgrades to deleting just the target. Likewise, if the series query turns
/// up no members (data inconsistency), the explicitly selected record is still
/// deleted rather than failing the operation. Multi-record scopes are one
/// atomic batch.
pub fn resolve_deletion_scope(
    store: &mut dyn TransactionStore,
    target: &Transaction,
    scope: DeletionScope,
) -> Result<usize, CoreError> {
    let Some(series_id) = target.series_id.as_deref() else {
        store.delete_one(target.id)?;
        return Ok(1);
    };
    if scope == DeletionScope::One {
        store.delete_one(target.id)?;
        return Ok(1);
    }

    let mut members = store.query_by_series_id(series_id)?;
    if members.is_empty() {
        store.delete_one(target.id)?;
        return Ok(1);
    }
    members.sort_by_key(|t| t.date);

    let ids: Vec<i64> = if scope == DeletionScope::All {
        members.iter().map(|t| t.id).collect()
    } else {
        // Future: inclusive of the target's own date.
        members
            .iter()
            .filter(|t| t.date >= target.date)
            .map(|t| t.id)
            .collect()
    };
    if ids.is_empty() {
        store.delete_one(target.id)?;
        return Ok(1);
    }

    store.batch_delete(&ids)?;
    Ok(ids.len())
}
