//! Write-side calls for ledger entries.
//!
//! These are thin wrappers over the store's full-document writes. The sync
//! driver never awaits them, so a just-written entry becomes visible to
//! snapshot consumers only on the next successful poll tick; that staleness
//! window is bounded by the poll period.

use crate::config::Config;
use crate::model::{Goal, Transaction};
use crate::store::{DocumentStore, WriteRequest};
use crate::{config::Paths, Result};
use std::sync::Arc;
use tracing::debug;

/// Issues ledger writes against the remote store for one user.
#[derive(Clone)]
pub struct LedgerWriter {
    store: Arc<dyn DocumentStore>,
    paths: Paths,
}

impl LedgerWriter {
    pub fn new(store: Arc<dyn DocumentStore>, config: &Config) -> Self {
        Self {
            store,
            paths: config.paths().clone(),
        }
    }

    /// Persists a new transaction. The id was minted client-side by
    /// `Transaction::new`.
    pub async fn add_transaction(&self, transaction: &Transaction) -> Result<()> {
        debug!("Adding transaction {}", transaction.id);
        self.write_transaction(transaction).await
    }

    /// Overwrites an existing transaction.
    pub async fn update_transaction(&self, transaction: &Transaction) -> Result<()> {
        debug!("Updating transaction {}", transaction.id);
        self.write_transaction(transaction).await
    }

    pub async fn delete_transaction(&self, id: &str) -> Result<()> {
        debug!("Deleting transaction {id}");
        self.store
            .delete_document(&format!("{}/{id}", self.paths.transactions))
            .await
    }

    pub async fn add_goal(&self, goal: &Goal) -> Result<()> {
        debug!("Adding goal {}", goal.id);
        self.write_goal(goal).await
    }

    pub async fn update_goal(&self, goal: &Goal) -> Result<()> {
        debug!("Updating goal {}", goal.id);
        self.write_goal(goal).await
    }

    pub async fn delete_goal(&self, id: &str) -> Result<()> {
        debug!("Deleting goal {id}");
        self.store
            .delete_document(&format!("{}/{id}", self.paths.goals))
            .await
    }

    /// Sends a deferred write produced by a validation operation, such as
    /// `lookup::add_subcategory`.
    pub async fn apply(&self, request: WriteRequest) -> Result<()> {
        debug!("Applying write request for {}", request.path);
        self.store
            .write_document(&request.path, request.document)
            .await
    }

    async fn write_transaction(&self, transaction: &Transaction) -> Result<()> {
        let path = format!("{}/{}", self.paths.transactions, transaction.id);
        self.store
            .write_document(&path, transaction.to_document()?)
            .await
    }

    async fn write_goal(&self, goal: &Goal) -> Result<()> {
        let path = format!("{}/{}", self.paths.goals, goal.id);
        self.store.write_document(&path, goal.to_document()?).await
    }
}
