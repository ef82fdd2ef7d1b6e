use crate::model::entry::{from_document, to_document};
use crate::model::{Amount, EntryKind, SubcategoryRef};
use crate::store::Document;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A savings goal.
///
/// Shaped like a transaction but with a target amount, recurrence and
/// reminder settings, and a list of linked transaction ids. The linkage is
/// many-to-many and resolved lazily by re-querying the store for each
/// referenced transaction id.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Goal {
    pub id: String,
    pub kind: EntryKind,
    pub category_name: String,
    pub subcategory: SubcategoryRef,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub target_amount: Amount,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub recurring: bool,
    #[serde(default)]
    pub reminder: bool,
    #[serde(default)]
    pub reminder_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub transaction_ids: Vec<String>,
}

impl Goal {
    /// Creates a new goal with a client-minted id and the current time.
    pub fn new(
        kind: EntryKind,
        category_name: impl Into<String>,
        subcategory: SubcategoryRef,
        title: impl Into<String>,
        target_amount: Amount,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            category_name: category_name.into(),
            subcategory,
            title: title.into(),
            description: String::new(),
            target_amount,
            timestamp: Utc::now(),
            recurring: false,
            reminder: false,
            reminder_date: None,
            transaction_ids: Vec::new(),
        }
    }

    pub fn to_document(&self) -> Result<Document> {
        to_document(self)
    }

    pub fn from_document(document: Document) -> Result<Self> {
        from_document(document, "goal")
    }
}
