//! Lookup and validation over a taxonomy snapshot.
//!
//! These operations are read-only except for [`add_subcategory`], which
//! returns a fresh taxonomy plus the deferred write request for it; the
//! snapshot handed in is never mutated in place.

use crate::model::{Category, EntryKind, Subcategory, Taxonomy};
use crate::store::WriteRequest;
use crate::{codec, Error, Result};
use tracing::info;

/// Receives user-visible notices. The UI layer is the real implementation;
/// [`LogNotices`] serves embedders without one.
pub trait NoticeSink {
    fn notify(&self, message: &str);
}

/// A `NoticeSink` that writes notices to the log.
#[derive(Default, Debug, Clone, Copy)]
pub struct LogNotices;

impl NoticeSink for LogNotices {
    fn notify(&self, message: &str) {
        info!("notice: {message}");
    }
}

/// True iff some category with exactly this name holds a subcategory with
/// exactly this name. Both comparisons are case-sensitive, unlike
/// [`is_static`]; historical documents depend on the asymmetry.
pub fn exists(taxonomy: &Taxonomy, category_name: &str, subcategory_name: &str) -> bool {
    taxonomy
        .categories()
        .iter()
        .filter(|category| category.name() == category_name)
        .any(|category| {
            category
                .subcategories()
                .iter()
                .any(|subcategory| subcategory.name() == subcategory_name)
        })
}

/// Whether the named subcategory is a built-in. Matches category and
/// subcategory names case-insensitively and returns `false`, not an error,
/// when there is no match.
pub fn is_static(taxonomy: &Taxonomy, category_name: &str, subcategory_name: &str) -> bool {
    let category_lower = category_name.to_lowercase();
    let subcategory_lower = subcategory_name.to_lowercase();
    taxonomy
        .categories()
        .iter()
        .filter(|category| category.name().to_lowercase() == category_lower)
        .flat_map(|category| category.subcategories())
        .find(|subcategory| subcategory.name().to_lowercase() == subcategory_lower)
        .map(Subcategory::is_static)
        .unwrap_or(false)
}

/// Finds every subcategory whose name contains `query`, case-insensitively.
///
/// Each hit is returned as a copy of its category trimmed to that single
/// subcategory, so a category with two hits yields two entries. An empty
/// result fires the not-found notice on `notices`; a blank query returns
/// nothing and stays silent.
pub fn search(taxonomy: &Taxonomy, query: &str, notices: &dyn NoticeSink) -> Vec<Category> {
    if query.trim().is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    let mut results = Vec::new();
    for category in taxonomy.categories() {
        for subcategory in category.subcategories() {
            if subcategory.name().to_lowercase().contains(&needle) {
                results.push(Category::new(
                    category.kind(),
                    category.name(),
                    vec![subcategory.clone()],
                ));
            }
        }
    }
    if results.is_empty() {
        notices.notify(&format!("Subcategory \"{query}\" not found."));
    }
    results
}

/// Strips every character outside `[A-Za-z0-9]` from a proposed subcategory
/// name. The result may be empty; callers must treat an empty result as
/// unsubmittable.
pub fn sanitize_subcategory_name(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Adds a user-defined subcategory to the named category.
///
/// Fails with `DuplicateSubcategory` if [`exists`] already matches, and with
/// `CategoryNotFound` if the kind/category pairing is absent. On success,
/// returns the updated taxonomy and the full-document write request for it.
/// The write is last-writer-wins; there is no version check against
/// concurrent remote writers.
pub fn add_subcategory(
    taxonomy: &Taxonomy,
    kind: EntryKind,
    category_name: &str,
    name: &str,
    taxonomy_path: &str,
) -> Result<(Taxonomy, WriteRequest)> {
    if exists(taxonomy, category_name, name) {
        return Err(Error::DuplicateSubcategory {
            category: category_name.to_string(),
            name: name.to_string(),
        });
    }
    let mut updated = taxonomy.clone();
    let category = updated
        .category_mut(kind, category_name)
        .ok_or_else(|| Error::CategoryNotFound {
            kind,
            name: category_name.to_string(),
        })?;
    category.push_subcategory(Subcategory::new(name, false));
    let document = codec::serialize(&updated);
    Ok((
        updated,
        WriteRequest {
            path: taxonomy_path.to_string(),
            document,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records notices for assertion.
    #[derive(Default)]
    struct RecordingNotices {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingNotices {
        fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap().clone()
        }
    }

    impl NoticeSink for RecordingNotices {
        fn notify(&self, message: &str) {
            self.messages.lock().unwrap().push(message.to_string());
        }
    }

    fn fixture() -> Taxonomy {
        let raw = match json!({
            "Expenses": {
                "Transportation": {"Insurance": false, "Fuel": true},
                "Gifts": {"Tuition": true}
            },
            "Income": {
                "Other": {"Misc": false}
            }
        }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        codec::parse(&raw).unwrap()
    }

    #[test]
    fn exists_is_case_sensitive() {
        let taxonomy = fixture();
        assert!(exists(&taxonomy, "Gifts", "Tuition"));
        assert!(!exists(&taxonomy, "Gifts", "tuition"));
        assert!(!exists(&taxonomy, "gifts", "Tuition"));
    }

    #[test]
    fn is_static_is_case_insensitive() {
        let taxonomy = fixture();
        assert!(is_static(&taxonomy, "gifts", "tuition"));
        assert!(is_static(&taxonomy, "GIFTS", "TUITION"));
        assert!(!is_static(&taxonomy, "Transportation", "Insurance"));
        // No match is false, not an error.
        assert!(!is_static(&taxonomy, "Gifts", "Parking"));
    }

    #[test]
    fn search_returns_trimmed_category_copies() {
        let taxonomy = fixture();
        let notices = RecordingNotices::default();
        let results = search(&taxonomy, "Insurance", &notices);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name(), "Transportation");
        assert_eq!(results[0].subcategories().len(), 1);
        assert_eq!(results[0].subcategories()[0].name(), "Insurance");
        assert!(notices.messages().is_empty());
    }

    #[test]
    fn search_matches_substrings_case_insensitively() {
        let taxonomy = fixture();
        let notices = RecordingNotices::default();
        let results = search(&taxonomy, "uit", &notices);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].subcategories()[0].name(), "Tuition");
    }

    #[test]
    fn search_with_no_match_fires_the_notice() {
        let taxonomy = fixture();
        let notices = RecordingNotices::default();
        let results = search(&taxonomy, "zzz", &notices);
        assert!(results.is_empty());
        assert_eq!(notices.messages(), vec!["Subcategory \"zzz\" not found."]);
    }

    #[test]
    fn search_with_blank_query_is_silent() {
        let taxonomy = fixture();
        let notices = RecordingNotices::default();
        assert!(search(&taxonomy, "", &notices).is_empty());
        assert!(search(&taxonomy, "   ", &notices).is_empty());
        assert!(notices.messages().is_empty());
    }

    #[test]
    fn search_emits_one_copy_per_matching_subcategory() {
        let raw = match json!({
            "Expenses": {
                "Transportation": {"Car Insurance": false, "Bike Insurance": false}
            }
        }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let taxonomy = codec::parse(&raw).unwrap();
        let notices = RecordingNotices::default();
        let results = search(&taxonomy, "insurance", &notices);
        assert_eq!(results.len(), 2);
        assert!(results
            .iter()
            .all(|category| category.subcategories().len() == 1));
    }

    #[test]
    fn sanitize_strips_non_alphanumerics() {
        assert_eq!(sanitize_subcategory_name("Road-side Fees!"), "RoadsideFees");
        assert_eq!(sanitize_subcategory_name("401k"), "401k");
        assert_eq!(sanitize_subcategory_name("  $$$  "), "");
    }

    #[test]
    fn add_subcategory_appends_and_serializes() {
        let taxonomy = fixture();
        let (updated, request) = add_subcategory(
            &taxonomy,
            EntryKind::Expenses,
            "Transportation",
            "Parking",
            "users/u1/categories",
        )
        .unwrap();

        let category = updated
            .category(EntryKind::Expenses, "Transportation")
            .unwrap();
        let added = category.subcategories().last().unwrap();
        assert_eq!(added.name(), "Parking");
        assert!(!added.is_static());

        assert_eq!(request.path, "users/u1/categories");
        assert_eq!(
            request.document["Expenses"]["Transportation"]["Parking"],
            serde_json::Value::Bool(false)
        );
        // The input snapshot is untouched.
        assert!(!exists(&taxonomy, "Transportation", "Parking"));
    }

    #[test]
    fn add_subcategory_rejects_duplicates_without_mutating() {
        let taxonomy = fixture();
        let err = add_subcategory(
            &taxonomy,
            EntryKind::Expenses,
            "Transportation",
            "Insurance",
            "users/u1/categories",
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateSubcategory { .. }));
        assert_eq!(
            taxonomy
                .category(EntryKind::Expenses, "Transportation")
                .unwrap()
                .subcategories()
                .len(),
            2
        );
    }

    #[test]
    fn add_subcategory_requires_the_kind_category_pairing() {
        let taxonomy = fixture();
        let err = add_subcategory(
            &taxonomy,
            EntryKind::Income,
            "Transportation",
            "Parking",
            "users/u1/categories",
        )
        .unwrap_err();
        assert!(matches!(err, Error::CategoryNotFound { .. }));
    }

    #[test]
    fn parse_then_search_end_to_end() {
        let raw = match json!({"Income": {"Other": {"Misc": false}}}) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        };
        let taxonomy = codec::parse(&raw).unwrap();
        assert_eq!(taxonomy.categories().len(), 1);
        assert_eq!(taxonomy.categories()[0].name(), "Other");
        assert_eq!(taxonomy.categories()[0].kind(), EntryKind::Income);

        let notices = RecordingNotices::default();
        let hits = search(&taxonomy, "Misc", &notices);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].subcategories()[0].name(), "Misc");
        assert!(notices.messages().is_empty());

        // "Other" is a category name, not a subcategory name.
        let misses = search(&taxonomy, "Other", &notices);
        assert!(misses.is_empty());
        assert_eq!(notices.messages(), vec!["Subcategory \"Other\" not found."]);
    }
}
