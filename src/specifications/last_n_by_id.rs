// src/specifications/last_n_by_id.rs

use super::FindSpecification;
use crate::repositories::query::{Direction, SelectQuery};

/// The N most recently assigned identities, newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastNByIdDesc {
    id_field: String,
    limit: u64,
    fields: Vec<String>,
}

impl LastNByIdDesc {
    pub fn new<I, S>(id_field: impl Into<String>, limit: u64, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id_field: id_field.into(),
            limit,
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl FindSpecification for LastNByIdDesc {
    fn apply(&self, query: SelectQuery) -> SelectQuery {
        query
            .order_by(self.id_field.clone(), Direction::Desc)
            .limit(self.limit)
    }

    fn fields(&self) -> Vec<String> {
        self.fields.clone()
    }
}
