//! Implements the `DocumentStore` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this crate so
//! that an embedding application can run top-to-bottom without a real remote
//! store.

use crate::config::Paths;
use crate::store::{Document, DocumentStore};
use crate::Result;
use anyhow::anyhow;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::mpsc;

/// Capacity of each subscriber channel. A slow consumer drops notifications
/// rather than blocking writers.
const SUBSCRIBER_CAPACITY: usize = 16;

/// An implementation of the `DocumentStore` trait that holds all documents in
/// memory. Documents are keyed by their full path, `collection/id` for
/// collection members.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
    fail_reads: AtomicBool,
}

#[derive(Default)]
struct Inner {
    documents: BTreeMap<String, Document>,
    subscribers: Vec<(String, mpsc::Sender<Vec<Document>>)>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with a realistic taxonomy and a small ledger
    /// for the given user.
    pub fn seeded(user_id: &str) -> Self {
        let store = Self::new();
        let paths = Paths::for_user(user_id);
        {
            let mut inner = store.inner.lock().expect("store mutex poisoned");
            inner
                .documents
                .insert(paths.taxonomy.clone(), seed_taxonomy());
            for doc in seed_transactions() {
                let id = doc
                    .get("id")
                    .and_then(Value::as_str)
                    .expect("seed transaction without id")
                    .to_string();
                inner
                    .documents
                    .insert(format!("{}/{id}", paths.transactions), doc);
            }
        }
        store
    }

    /// When set, read operations fail until cleared. Lets tests exercise the
    /// retained-snapshot behavior of the sync driver.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_reads(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow!("simulated remote store failure").into());
        }
        Ok(())
    }

    fn collection_members(inner: &Inner, path: &str) -> Vec<Document> {
        let prefix = format!("{path}/");
        inner
            .documents
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .map(|(_, doc)| doc.clone())
            .collect()
    }

    /// Sends the full collection contents to every live subscriber of the
    /// collection containing `changed_path`.
    fn notify(inner: &mut Inner, changed_path: &str) {
        let mut kept = Vec::with_capacity(inner.subscribers.len());
        for (collection, sender) in inner.subscribers.drain(..) {
            if changed_path.starts_with(&format!("{collection}/")) {
                let members = {
                    let prefix = format!("{collection}/");
                    inner
                        .documents
                        .range(prefix.clone()..)
                        .take_while(|(key, _)| key.starts_with(&prefix))
                        .map(|(_, doc)| doc.clone())
                        .collect()
                };
                match sender.try_send(members) {
                    Ok(()) | Err(mpsc::error::TrySendError::Full(_)) => {
                        kept.push((collection, sender));
                    }
                    // Receiver dropped: the subscription is over.
                    Err(mpsc::error::TrySendError::Closed(_)) => {}
                }
            } else {
                kept.push((collection, sender));
            }
        }
        inner.subscribers = kept;
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn read_document(&self, path: &str) -> Result<Option<Document>> {
        self.check_reads()?;
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.documents.get(path).cloned())
    }

    async fn write_document(&self, path: &str, document: Document) -> Result<()> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.documents.insert(path.to_string(), document);
        Self::notify(&mut inner, path);
        Ok(())
    }

    async fn delete_document(&self, path: &str) -> Result<()> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        inner.documents.remove(path);
        Self::notify(&mut inner, path);
        Ok(())
    }

    async fn query_collection(
        &self,
        path: &str,
        order_by: &str,
        limit: usize,
    ) -> Result<Vec<Document>> {
        self.check_reads()?;
        let inner = self.inner.lock().expect("store mutex poisoned");
        let mut members = Self::collection_members(&inner, path);
        members.sort_by(|a, b| compare_field(a.get(order_by), b.get(order_by)));
        members.truncate(limit);
        Ok(members)
    }

    async fn query_by_id_set(&self, path: &str, ids: &[String]) -> Result<Vec<Document>> {
        self.check_reads()?;
        let inner = self.inner.lock().expect("store mutex poisoned");
        let members = Self::collection_members(&inner, path);
        Ok(members
            .into_iter()
            .filter(|doc| {
                doc.get("id")
                    .and_then(Value::as_str)
                    .is_some_and(|id| ids.iter().any(|wanted| wanted == id))
            })
            .collect())
    }

    async fn subscribe(&self, path: &str) -> Result<mpsc::Receiver<Vec<Document>>> {
        let (sender, receiver) = mpsc::channel(SUBSCRIBER_CAPACITY);
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        // Deliver the current contents immediately so the subscriber does not
        // wait for the first change.
        let members = Self::collection_members(&inner, path);
        let _ = sender.try_send(members);
        inner.subscribers.push((path.to_string(), sender));
        Ok(receiver)
    }
}

/// Orders two field values: numbers numerically, everything else by its
/// string form.
fn compare_field(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .unwrap_or_default()
            .total_cmp(&y.as_f64().unwrap_or_default()),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (x, y) => {
            let xs = x.map(Value::to_string).unwrap_or_default();
            let ys = y.map(Value::to_string).unwrap_or_default();
            xs.cmp(&ys)
        }
    }
}

/// Seed taxonomy document.
fn seed_taxonomy() -> Document {
    let value = json!({
        "Expenses": {
            "Transportation": {"Fuel": true, "Insurance": false},
            "Food": {"Groceries": true, "Restaurants": true},
            "Home": {"Rent": true, "Utilities": true}
        },
        "Income": {
            "Work": {"Salary": true, "Bonus": false},
            "Other": {"Misc": false}
        }
    });
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

/// Seed transaction documents.
fn seed_transactions() -> Vec<Document> {
    let values = [
        json!({
            "id": "f3a1c8e2-7b4d-4e9f-a2c6-1d8e5b3f7a90",
            "kind": "Expenses",
            "category_name": "Food",
            "subcategory": "Groceries",
            "title": "Whole Foods Market",
            "description": "",
            "amount": "-87.43",
            "timestamp": "2025-10-20T17:15:30Z"
        }),
        json!({
            "id": "0b9d4f6a-2e1c-48d7-b5a3-9c7e2f4d6b18",
            "kind": "Expenses",
            "category_name": "Transportation",
            "subcategory": 1,
            "title": "Shell Gas Station",
            "description": "",
            "amount": "-52.30",
            "timestamp": "2025-10-18T14:22:45Z"
        }),
        json!({
            "id": "7c2e5a9b-4f8d-41c3-9e6b-3a1d8f5c2e74",
            "kind": "Income",
            "category_name": "Work",
            "subcategory": "Salary",
            "title": "Paycheck",
            "description": "October salary",
            "amount": "3250.00",
            "timestamp": "2025-10-15T08:00:00Z"
        }),
    ];
    values
        .into_iter()
        .map(|value| match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        })
        .collect()
}
