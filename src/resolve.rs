//! Resolves the weak references ledger entries hold into the current
//! taxonomy snapshot, and goal-to-transaction links into ledger entries.

use crate::model::{SubcategoryRef, Taxonomy, Transaction};
use crate::store::DocumentStore;
use crate::Result;
use std::collections::HashMap;
use tracing::warn;

/// Shown wherever a ledger entry's taxonomy reference cannot be resolved.
/// Display and export paths must never fail merely because a taxonomy edit
/// made a historical reference dangle.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Document stores cap the size of an in-set filter; batches sent to
/// `query_by_id_set` must not exceed this.
pub const ID_SET_QUERY_MAX: usize = 30;

/// Resolves a ledger entry's subcategory reference to a display name.
///
/// Returns [`UNCATEGORIZED`] — never an error — when the taxonomy has not
/// loaded yet, the category is missing, or the reference dangles.
pub fn resolve_subcategory_name(
    taxonomy: Option<&Taxonomy>,
    category_name: &str,
    reference: &SubcategoryRef,
) -> String {
    let Some(taxonomy) = taxonomy else {
        return UNCATEGORIZED.to_string();
    };
    let resolved = match reference {
        SubcategoryRef::Handle(handle) => taxonomy
            .find_by_handle(*handle)
            .map(|(_, subcategory)| subcategory.name().to_string()),
        SubcategoryRef::Index(index) => taxonomy
            .categories()
            .iter()
            .find(|category| category.name() == category_name)
            .and_then(|category| category.subcategories().get(*index))
            .map(|subcategory| subcategory.name().to_string()),
        SubcategoryRef::Name(name) => taxonomy
            .categories()
            .iter()
            .filter(|category| category.name() == category_name)
            .flat_map(|category| category.subcategories())
            .find(|subcategory| subcategory.name() == name.as_str())
            .map(|subcategory| subcategory.name().to_string()),
    };
    resolved.unwrap_or_else(|| UNCATEGORIZED.to_string())
}

/// Fetches the transactions a goal links to by id.
///
/// The id list is chunked into batches of at most [`ID_SET_QUERY_MAX`]
/// before querying the store, and the merged result preserves the order of
/// `ids`. Ids the store no longer has are skipped silently; documents that
/// fail to deserialize are logged and skipped.
pub async fn resolve_linked_entries(
    store: &dyn DocumentStore,
    path: &str,
    ids: &[String],
) -> Result<Vec<Transaction>> {
    let mut by_id: HashMap<String, Transaction> = HashMap::with_capacity(ids.len());
    for chunk in ids.chunks(ID_SET_QUERY_MAX) {
        let documents = store.query_by_id_set(path, chunk).await?;
        for document in documents {
            match Transaction::from_document(document) {
                Ok(transaction) => {
                    by_id.insert(transaction.id.clone(), transaction);
                }
                Err(e) => warn!("Skipping unreadable linked transaction: {e}"),
            }
        }
    }
    Ok(ids
        .iter()
        .filter_map(|id| by_id.get(id).cloned())
        .collect())
}
