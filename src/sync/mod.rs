//! Keeps local read-models fresh against the remote store.
//!
//! One poll stream per data kind (taxonomy, transactions), each a
//! cooperative fetch-and-replace loop on a fixed period. Goals use the
//! store's push subscription instead of polling. Consumers subscribe to
//! snapshot handles rather than running their own timers.

mod poll;

use crate::config::Config;
use crate::model::{Goal, Taxonomy, Transaction};
use crate::store::DocumentStore;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// An immutable, wholesale-replaced view of one data kind.
///
/// `data` is `None` until the first successful fetch. The generation
/// increments on every successful replacement, whether or not the payload
/// changed.
#[derive(Debug, Clone, Default)]
pub struct Snapshot<T> {
    generation: u64,
    data: Option<T>,
}

impl<T> Snapshot<T> {
    fn with(generation: u64, data: T) -> Self {
        Self {
            generation,
            data: Some(data),
        }
    }

    /// How many successful replacements this stream has applied.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The current payload, `None` before the first successful fetch.
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }
}

/// Process-wide owner of the poll streams for one user.
///
/// `start` spawns the streams; `stop` (or drop) tears them down. An
/// in-flight fetch is not cancelled by teardown — it completes and its
/// result is discarded harmlessly.
pub struct SyncDriver {
    tasks: Vec<JoinHandle<()>>,
    taxonomy: watch::Receiver<Snapshot<Taxonomy>>,
    transactions: watch::Receiver<Snapshot<Vec<Transaction>>>,
    goals: watch::Receiver<Snapshot<Vec<Goal>>>,
}

impl SyncDriver {
    /// Spawns the taxonomy and transaction poll streams and the goal
    /// subscription stream.
    pub fn start(store: Arc<dyn DocumentStore>, config: &Config) -> Self {
        let paths = config.paths().clone();

        let (taxonomy_sender, taxonomy) = watch::channel(Snapshot::default());
        let (transactions_sender, transactions) = watch::channel(Snapshot::default());
        let (goals_sender, goals) = watch::channel(Snapshot::default());

        let tasks = vec![
            tokio::spawn(poll::run_taxonomy_stream(
                store.clone(),
                paths.taxonomy.clone(),
                config.taxonomy_poll_period(),
                taxonomy_sender,
            )),
            tokio::spawn(poll::run_transaction_stream(
                store.clone(),
                paths.transactions.clone(),
                config.ledger_poll_period(),
                config.ledger_query_limit(),
                transactions_sender,
            )),
            tokio::spawn(poll::run_goal_stream(
                store,
                paths.goals,
                goals_sender,
            )),
        ];

        Self {
            tasks,
            taxonomy,
            transactions,
            goals,
        }
    }

    /// A handle observing the most recent taxonomy snapshot.
    pub fn taxonomy(&self) -> watch::Receiver<Snapshot<Taxonomy>> {
        self.taxonomy.clone()
    }

    /// A handle observing the most recent transaction ledger snapshot.
    pub fn transactions(&self) -> watch::Receiver<Snapshot<Vec<Transaction>>> {
        self.transactions.clone()
    }

    /// A handle observing the most recent goals snapshot.
    pub fn goals(&self) -> watch::Receiver<Snapshot<Vec<Goal>>> {
        self.goals.clone()
    }

    /// Tears down the streams. Existing snapshot handles keep their last
    /// observed value but stop updating.
    pub fn stop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

impl Drop for SyncDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
