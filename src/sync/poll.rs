//! The fetch-and-replace loops behind `SyncDriver`.
//!
//! Each poll stream cycles Idle → Fetching → Applying (or Failed) → Idle on
//! a fixed period. A successful fetch replaces the whole snapshot; a failed
//! fetch logs, keeps the previous snapshot, and waits for the next tick —
//! no backoff, no retry budget. The sequential await gives the
//! one-outstanding-fetch guarantee per stream.

use crate::codec;
use crate::model::{Goal, Taxonomy, Transaction};
use crate::store::{Document, DocumentStore};
use crate::sync::Snapshot;
use crate::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, trace, warn};

pub(super) async fn run_taxonomy_stream(
    store: Arc<dyn DocumentStore>,
    path: String,
    period: Duration,
    sender: watch::Sender<Snapshot<Taxonomy>>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut generation = 0u64;
    loop {
        interval.tick().await;
        trace!("Fetching taxonomy from {path}");
        match fetch_taxonomy(store.as_ref(), &path).await {
            Ok(taxonomy) => {
                generation += 1;
                debug!("Applying taxonomy snapshot generation {generation}");
                sender.send_replace(Snapshot::with(generation, taxonomy));
            }
            Err(e) => warn!("Taxonomy fetch failed; keeping previous snapshot: {e}"),
        }
    }
}

/// A missing taxonomy document is a new user, not an error: the snapshot is
/// an empty taxonomy.
async fn fetch_taxonomy(store: &dyn DocumentStore, path: &str) -> Result<Taxonomy> {
    match store.read_document(path).await? {
        Some(document) => codec::parse(&document),
        None => Ok(Taxonomy::default()),
    }
}

pub(super) async fn run_transaction_stream(
    store: Arc<dyn DocumentStore>,
    path: String,
    period: Duration,
    query_limit: usize,
    sender: watch::Sender<Snapshot<Vec<Transaction>>>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut generation = 0u64;
    loop {
        interval.tick().await;
        trace!("Fetching transactions from {path}");
        match store.query_collection(&path, "timestamp", query_limit).await {
            Ok(documents) => {
                generation += 1;
                let transactions = parse_entries(documents, Transaction::from_document);
                debug!(
                    "Applying transaction snapshot generation {generation} ({} entries)",
                    transactions.len()
                );
                sender.send_replace(Snapshot::with(generation, transactions));
            }
            Err(e) => warn!("Transaction fetch failed; keeping previous snapshot: {e}"),
        }
    }
}

/// The goals stream rides the store's push subscription instead of a timer.
/// Every notification carries the full collection, so application is still a
/// wholesale replace.
pub(super) async fn run_goal_stream(
    store: Arc<dyn DocumentStore>,
    path: String,
    sender: watch::Sender<Snapshot<Vec<Goal>>>,
) {
    let mut receiver = match store.subscribe(&path).await {
        Ok(receiver) => receiver,
        Err(e) => {
            warn!("Goal subscription failed; goals will not sync: {e}");
            return;
        }
    };
    let mut generation = 0u64;
    while let Some(documents) = receiver.recv().await {
        generation += 1;
        let goals = parse_entries(documents, Goal::from_document);
        debug!(
            "Applying goal snapshot generation {generation} ({} entries)",
            goals.len()
        );
        sender.send_replace(Snapshot::with(generation, goals));
    }
    warn!("Goal subscription ended");
}

/// Parses collection documents, dropping (and logging) any that are
/// unreadable rather than failing the whole snapshot.
fn parse_entries<T>(documents: Vec<Document>, parse: impl Fn(Document) -> Result<T>) -> Vec<T> {
    documents
        .into_iter()
        .filter_map(|document| match parse(document) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable ledger document: {e}");
                None
            }
        })
        .collect()
}
