use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Namespace for deriving durable subcategory handles. Handles are UUIDv5
/// values over `kind/category/subcategory`, so the same taxonomy node keeps
/// the same handle across wholesale snapshot replacement.
const SUBCATEGORY_NAMESPACE: Uuid = uuid::uuid!("4e1b8f3a-92c6-47d5-b0ae-6c3f82d17e59");

/// Top-level grouping of the taxonomy. Constrained to income and expenses.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Income,
    #[default]
    Expenses,
}

serde_plain::derive_display_from_serialize!(EntryKind);
serde_plain::derive_fromstr_from_deserialize!(EntryKind);

/// Leaf taxonomy node. Static subcategories are built in and non-removable;
/// dynamic ones were added by the user.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Subcategory {
    name: String,
    is_static: bool,
}

impl Subcategory {
    pub fn new(name: impl Into<String>, is_static: bool) -> Self {
        Self {
            name: name.into(),
            is_static,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }
}

/// Named grouping of subcategories within an `EntryKind`. Category names are
/// unique within a kind; the same name may appear under both kinds.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Category {
    kind: EntryKind,
    name: String,
    subcategories: Vec<Subcategory>,
}

impl Category {
    pub fn new(kind: EntryKind, name: impl Into<String>, subcategories: Vec<Subcategory>) -> Self {
        Self {
            kind,
            name: name.into(),
            subcategories,
        }
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subcategories(&self) -> &[Subcategory] {
        &self.subcategories
    }

    pub(crate) fn push_subcategory(&mut self, subcategory: Subcategory) {
        self.subcategories.push(subcategory);
    }

    /// The durable handle of a subcategory belonging to this category.
    pub fn handle_of(&self, subcategory: &Subcategory) -> Uuid {
        subcategory_handle(self.kind, &self.name, subcategory.name())
    }
}

/// Derives the durable, collision-free handle for a taxonomy leaf. Ledger
/// entries store this handle rather than a name or positional index.
pub fn subcategory_handle(kind: EntryKind, category_name: &str, subcategory_name: &str) -> Uuid {
    let path = format!("{kind}/{category_name}/{subcategory_name}");
    Uuid::new_v5(&SUBCATEGORY_NAMESPACE, path.as_bytes())
}

/// The full category taxonomy: an ordered collection of categories as they
/// appear in the persisted document. Replaced wholesale on every successful
/// poll tick; consumers treat a `Taxonomy` as immutable.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Taxonomy {
    categories: Vec<Category>,
}

impl Taxonomy {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Finds a category by kind and exact name.
    pub fn category(&self, kind: EntryKind, name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.kind() == kind && c.name() == name)
    }

    pub(crate) fn category_mut(&mut self, kind: EntryKind, name: &str) -> Option<&mut Category> {
        self.categories
            .iter_mut()
            .find(|c| c.kind() == kind && c.name() == name)
    }

    /// Finds a taxonomy leaf by its durable handle. The handle index is
    /// recomputed against the current snapshot, so a renamed or deleted
    /// subcategory simply stops resolving.
    pub fn find_by_handle(&self, handle: Uuid) -> Option<(&Category, &Subcategory)> {
        for category in &self.categories {
            for subcategory in category.subcategories() {
                if category.handle_of(subcategory) == handle {
                    return Some((category, subcategory));
                }
            }
        }
        None
    }
}
