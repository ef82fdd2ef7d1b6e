//! Types that represent the core data model, such as `Taxonomy` and `Transaction`.
mod amount;
mod entry;
mod goal;
mod taxonomy;

pub use amount::{Amount, AmountError};
pub use entry::{SubcategoryRef, Transaction};
pub use goal::Goal;
pub use taxonomy::{subcategory_handle, Category, EntryKind, Subcategory, Taxonomy};
