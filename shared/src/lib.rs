use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the three fixed transaction classifications.
///
/// Persisted as lowercase text; any other stored value is treated as a
/// read error by the storage layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    /// Money coming in
    Income,
    /// Money spent
    Expense,
    /// Money set aside
    Savings,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Income => "income",
            CategoryKind::Expense => "expense",
            CategoryKind::Savings => "savings",
        }
    }

    /// Parse the persisted representation. Returns `None` for anything
    /// outside the three known kinds.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "income" => Some(CategoryKind::Income),
            "expense" => Some(CategoryKind::Expense),
            "savings" => Some(CategoryKind::Savings),
            _ => None,
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction classification, seeded with exactly one row per kind
/// when the database is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    /// Display name, unique across all categories
    pub name: String,
    pub kind: CategoryKind,
}

/// Input shape for adding a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub kind: CategoryKind,
}

/// A user-defined grouping under a category. Names are free-form and
/// not unique; several subcategories may share a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
}

/// Input shape for adding a subcategory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSubcategory {
    pub name: String,
    pub category_id: i64,
}

/// A single recorded monetary event tied to a category and subcategory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub category_id: i64,
    pub subcategory_id: i64,
    /// Amount as a positive magnitude; the category kind determines
    /// whether it counts toward income, expenses, or savings
    pub amount: f64,
    pub description: Option<String>,
    /// Moment the transaction happened (RFC 3339 in storage)
    pub date: DateTime<Utc>,
}

/// Input shape for recording a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub category_id: i64,
    pub subcategory_id: i64,
    pub amount: f64,
    pub description: Option<String>,
    /// Uses the current time when not provided
    pub date: Option<DateTime<Utc>>,
}

/// Input shape for the income/expense/savings entry points, which fix
/// the category themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    pub subcategory_id: i64,
    pub amount: f64,
    pub description: Option<String>,
    /// Uses the current time when not provided
    pub date: Option<DateTime<Utc>>,
}

/// Derived totals-and-balance view computed on demand from all
/// transactions. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub total_savings: f64,
    /// `total_income - total_expense - total_savings`
    pub balance: f64,
}

impl FinancialSummary {
    pub fn new(total_income: f64, total_expense: f64, total_savings: f64) -> Self {
        Self {
            total_income,
            total_expense,
            total_savings,
            balance: total_income - total_expense - total_savings,
        }
    }
}

/// Validation result for entry form input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryValidation {
    pub is_valid: bool,
    pub errors: Vec<EntryValidationError>,
}

/// Specific validation errors for entry forms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntryValidationError {
    EmptyDescription,
    DescriptionTooLong(usize),
    InvalidAmount(String),
    AmountNotPositive,
    AmountPrecisionTooHigh,
}
