// src/specifications/mod.rs
//
// Query specifications
//
// A specification shapes one read: which rows (filter / order / limit) and
// which columns. It never touches the store and never sees SQL text beyond
// identifiers, so the generic repository stays free of per-table knowledge.
// New read use cases get a new specification type, not a repository change.

pub mod last_n_by_id;
pub mod last_n_by_key;
pub mod recent_list;

pub use last_n_by_id::LastNByIdDesc;
pub use last_n_by_key::LastNByKey;
pub use recent_list::RecentList;

use crate::repositories::query::SelectQuery;

pub trait FindSpecification: Send + Sync {
    /// Attach this specification's filters, ordering and limit.
    fn apply(&self, query: SelectQuery) -> SelectQuery;

    /// Requested projection; empty means the record's default readable set.
    fn fields(&self) -> Vec<String>;
}
