use crate::model::{Amount, EntryKind};
use crate::store::Document;
use crate::Result;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A transaction's reference to its taxonomy leaf.
///
/// New entries are always written with `Handle`. `Index` and `Name` remain
/// readable because historical documents addressed subcategories by position
/// within the category or by raw name; those references are weak and may
/// dangle after a taxonomy edit.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubcategoryRef {
    Handle(Uuid),
    Index(usize),
    Name(String),
}

/// A single income or expense transaction.
///
/// Created by the UI layer, persisted to the remote store, and re-read by the
/// sync driver. Holds only a weak reference to its taxonomy leaf; the
/// taxonomy can change independently after the entry is written.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub id: String,
    pub kind: EntryKind,
    pub category_name: String,
    pub subcategory: SubcategoryRef,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub amount: Amount,
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Creates a new transaction with a client-minted id and the current time.
    pub fn new(
        kind: EntryKind,
        category_name: impl Into<String>,
        subcategory: SubcategoryRef,
        title: impl Into<String>,
        description: impl Into<String>,
        amount: Amount,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            category_name: category_name.into(),
            subcategory,
            title: title.into(),
            description: description.into(),
            amount,
            timestamp: Utc::now(),
        }
    }

    pub fn to_document(&self) -> Result<Document> {
        to_document(self)
    }

    pub fn from_document(document: Document) -> Result<Self> {
        from_document(document, "transaction")
    }
}

pub(crate) fn to_document<T: Serialize>(entry: &T) -> Result<Document> {
    let value = serde_json::to_value(entry).context("Failed to serialize ledger entry")?;
    match value {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(anyhow::anyhow!("Expected an object, got {other:?}").into()),
    }
}

pub(crate) fn from_document<T: for<'de> Deserialize<'de>>(
    document: Document,
    what: &str,
) -> Result<T> {
    serde_json::from_value(serde_json::Value::Object(document))
        .with_context(|| format!("Failed to deserialize {what} document"))
        .map_err(Into::into)
}
