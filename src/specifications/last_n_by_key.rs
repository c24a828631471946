// src/specifications/last_n_by_key.rs

use rusqlite::types::Value;

use super::FindSpecification;
use crate::repositories::columns::ALL_FIELDS;
use crate::repositories::query::{Direction, SelectQuery};

/// The N newest rows whose `column` equals `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct LastNByKey {
    id_field: String,
    column: String,
    value: Value,
    limit: u64,
}

impl LastNByKey {
    pub fn new(
        id_field: impl Into<String>,
        column: impl Into<String>,
        value: impl Into<Value>,
        limit: u64,
    ) -> Self {
        Self {
            id_field: id_field.into(),
            column: column.into(),
            value: value.into(),
            limit,
        }
    }
}

impl FindSpecification for LastNByKey {
    fn apply(&self, query: SelectQuery) -> SelectQuery {
        query
            .filter_eq(self.column.clone(), self.value.clone())
            .order_by(self.id_field.clone(), Direction::Desc)
            .limit(self.limit)
    }

    fn fields(&self) -> Vec<String> {
        vec![ALL_FIELDS.to_string()]
    }
}
