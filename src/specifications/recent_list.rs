// src/specifications/recent_list.rs

use super::FindSpecification;
use crate::repositories::columns::ALL_FIELDS;
use crate::repositories::query::{Direction, SelectQuery};

/// Up to N rows, newest first by a record-specific recency column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentList {
    order_column: String,
    limit: u64,
}

impl RecentList {
    pub fn new(order_column: impl Into<String>, limit: u64) -> Self {
        Self {
            order_column: order_column.into(),
            limit,
        }
    }
}

impl FindSpecification for RecentList {
    fn apply(&self, query: SelectQuery) -> SelectQuery {
        query
            .order_by(self.order_column.clone(), Direction::Desc)
            .limit(self.limit)
    }

    fn fields(&self) -> Vec<String> {
        vec![ALL_FIELDS.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::query::PlaceholderStyle;

    #[test]
    fn test_orders_by_recency_column() {
        let spec = RecentList::new("inserted_at", 20);
        let (sql, _) = spec
            .apply(SelectQuery::new("osdr_items").columns(["id"]))
            .to_sql(PlaceholderStyle::Question)
            .unwrap();
        assert_eq!(
            sql,
            "SELECT id FROM osdr_items ORDER BY inserted_at DESC LIMIT 20"
        );
    }
}
