// Copyright (c) 2025 Casabook contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<TransactionKind> {
        match s {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceFrequency {
    Monthly,
}

impl RecurrenceFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceFrequency::Monthly => "monthly",
        }
    }

    pub fn parse(s: &str) -> Option<RecurrenceFrequency> {
        match s {
            "monthly" => Some(RecurrenceFrequency::Monthly),
            _ => None,
        }
    }
}

/// Breadth of a deletion request relative to a target occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionScope {
    One,
    Future,
    All,
}

impl DeletionScope {
    pub fn parse(s: &str) -> Option<DeletionScope> {
        match s {
            "one" => Some(DeletionScope::One),
            "future" => Some(DeletionScope::Future),
            "all" => Some(DeletionScope::All),
            _ => None,
        }
    }
}

/// A persisted transaction. Records produced from one recurring intent share a
/// `series_id` and differ only in `date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category_id: Option<i64>,
    pub is_recurring: bool,
    pub recurrence_frequency: Option<RecurrenceFrequency>,
    pub series_id: Option<String>,
}

/// A transaction not yet persisted; the store assigns the id on creation.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category_id: Option<i64>,
    pub is_recurring: bool,
    pub recurrence_frequency: Option<RecurrenceFrequency>,
    pub series_id: Option<String>,
}

/// One user-entered recurring transaction intent, before expansion.
#[derive(Debug, Clone)]
pub struct RecurringIntent {
    pub description: String,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub category_id: Option<i64>,
    pub start_date: NaiveDate,
    /// Bounds the generated series; `None` means the default horizon.
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub kind: TransactionKind,
    pub icon: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Budget {
    pub id: i64,
    pub category_id: i64,
    pub monthly_limit: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    pub id: i64,
    pub name: String,
    pub target_amount: Decimal,
    pub current_amount: Decimal,
    pub category_id: Option<i64>,
    pub deadline: Option<NaiveDate>,
}
