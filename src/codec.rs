//! Converts between the persisted taxonomy document and the in-memory model.
//!
//! The persisted form is one nested object per user:
//! `{ [Kind]: { [CategoryName]: { [SubcategoryName]: isStatic } } }`.
//! Key order is the document's native order and is preserved through a
//! parse/serialize round trip.

use crate::model::{Category, EntryKind, Subcategory, Taxonomy};
use crate::store::Document;
use crate::{Error, Result};
use serde_json::Value;
use std::str::FromStr;

/// Parses a raw taxonomy document into the ordered category model.
///
/// Kinds, categories and subcategories are visited in the document's key
/// order. The boolean leaf becomes the subcategory's static flag. Any level
/// that is not the expected shape fails with `Error::MalformedTaxonomy`.
pub fn parse(raw: &Document) -> Result<Taxonomy> {
    let mut categories = Vec::new();
    for (kind_key, kind_value) in raw {
        let kind = EntryKind::from_str(kind_key)
            .map_err(|_| Error::MalformedTaxonomy(format!("unknown entry kind '{kind_key}'")))?;
        let Value::Object(category_map) = kind_value else {
            return Err(Error::MalformedTaxonomy(format!(
                "expected an object of categories under '{kind_key}'"
            )));
        };
        for (category_name, subcategory_value) in category_map {
            let Value::Object(subcategory_map) = subcategory_value else {
                return Err(Error::MalformedTaxonomy(format!(
                    "expected an object of subcategories under '{kind_key}/{category_name}'"
                )));
            };
            let mut subcategories = Vec::with_capacity(subcategory_map.len());
            for (subcategory_name, flag) in subcategory_map {
                let Value::Bool(is_static) = flag else {
                    return Err(Error::MalformedTaxonomy(format!(
                        "expected a boolean at '{kind_key}/{category_name}/{subcategory_name}'"
                    )));
                };
                subcategories.push(Subcategory::new(subcategory_name, *is_static));
            }
            categories.push(Category::new(kind, category_name, subcategories));
        }
    }
    Ok(Taxonomy::new(categories))
}

/// Serializes the category model back into the persisted nested-object form.
/// Structural inverse of [`parse`].
pub fn serialize(taxonomy: &Taxonomy) -> Document {
    let mut root = Document::new();
    for category in taxonomy.categories() {
        let kind_entry = root
            .entry(category.kind().to_string())
            .or_insert_with(|| Value::Object(Document::new()));
        if let Value::Object(kind_map) = kind_entry {
            let mut subcategory_map = Document::new();
            for subcategory in category.subcategories() {
                subcategory_map.insert(
                    subcategory.name().to_string(),
                    Value::Bool(subcategory.is_static()),
                );
            }
            kind_map.insert(
                category.name().to_string(),
                Value::Object(subcategory_map),
            );
        }
    }
    root
}
