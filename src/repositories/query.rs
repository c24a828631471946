// src/repositories/query.rs
//
// Declarative statement shapes
//
// PRINCIPLES:
// - Queries are plain values: columns, filters, ordering, limit
// - No free-form SQL fragments from callers, only identifiers and bound values
// - Placeholder syntax is an explicit parameter, never global state

use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// How bound parameters are spelled in generated SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    /// `?`
    #[default]
    Question,
    /// `?1`, `?2`, ...
    Numbered,
    /// `$1`, `$2`, ...
    Dollar,
}

impl PlaceholderStyle {
    /// `index` is 1-based.
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            PlaceholderStyle::Question => "?".to_string(),
            PlaceholderStyle::Numbered => format!("?{}", index),
            PlaceholderStyle::Dollar => format!("${}", index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

/// Row filters a specification may attach. Closed on purpose.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq { column: String, value: Value },
    IsNull { column: String },
}

/// Check that `name` is a plain (optionally qualified or wildcard) column reference.
pub(crate) fn validate_identifier(name: &str) -> AppResult<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && !name.ends_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.' || c == '*');

    if valid {
        Ok(())
    } else {
        Err(AppError::QueryBuild(format!("invalid identifier '{}'", name)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    table: String,
    alias: Option<String>,
    columns: Vec<String>,
    filters: Vec<Filter>,
    order_by: Vec<OrderBy>,
    limit: Option<u64>,
}

impl SelectQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            alias: None,
            columns: Vec::new(),
            filters: Vec::new(),
            order_by: Vec::new(),
            limit: None,
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        self.alias = if alias.is_empty() { None } else { Some(alias) };
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn filter_eq(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq {
            column: column.into(),
            value: value.into(),
        });
        self
    }

    pub fn filter_null(mut self, column: impl Into<String>) -> Self {
        self.filters.push(Filter::IsNull { column: column.into() });
        self
    }

    pub fn order_by(mut self, column: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push(OrderBy {
            column: column.into(),
            direction,
        });
        self
    }

    /// Replaces any previous limit.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn ordering(&self) -> &[OrderBy] {
        &self.order_by
    }

    pub fn row_limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn to_sql(&self, style: PlaceholderStyle) -> AppResult<(String, Vec<Value>)> {
        validate_identifier(&self.table)?;
        if self.columns.is_empty() {
            return Err(AppError::QueryBuild(format!(
                "select from '{}' has no columns",
                self.table
            )));
        }
        for column in &self.columns {
            validate_identifier(column)?;
        }

        let mut sql = format!("SELECT {} FROM {}", self.columns.join(", "), self.table);
        if let Some(alias) = &self.alias {
            validate_identifier(alias)?;
            sql.push_str(" AS ");
            sql.push_str(alias);
        }

        let mut args = Vec::new();
        if !self.filters.is_empty() {
            let mut clauses = Vec::with_capacity(self.filters.len());
            for filter in &self.filters {
                match filter {
                    Filter::Eq { column, value } => {
                        validate_identifier(column)?;
                        args.push(value.clone());
                        clauses.push(format!("{} = {}", column, style.placeholder(args.len())));
                    }
                    Filter::IsNull { column } => {
                        validate_identifier(column)?;
                        clauses.push(format!("{} IS NULL", column));
                    }
                }
            }
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        if !self.order_by.is_empty() {
            let mut terms = Vec::with_capacity(self.order_by.len());
            for order in &self.order_by {
                validate_identifier(&order.column)?;
                terms.push(format!("{} {}", order.column, order.direction.as_sql()));
            }
            sql.push_str(" ORDER BY ");
            sql.push_str(&terms.join(", "));
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        Ok((sql, args))
    }
}

/// One cell of an insert row.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertValue {
    Bound(Value),
    /// Let the store assign a fresh identity. Rendered as `NULL`, which SQLite
    /// turns into the next rowid for an `INTEGER PRIMARY KEY` column.
    GenerateIdentity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertQuery {
    table: String,
    columns: Vec<String>,
    rows: Vec<Vec<InsertValue>>,
    suffixes: Vec<String>,
}

impl InsertQuery {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: Vec::new(),
            rows: Vec::new(),
            suffixes: Vec::new(),
        }
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn row(mut self, values: Vec<InsertValue>) -> Self {
        self.rows.push(values);
        self
    }

    /// Trailing clause, e.g. an `ON CONFLICT` clause built by `Columns`.
    pub fn suffix(mut self, clause: impl Into<String>) -> Self {
        let clause = clause.into();
        if !clause.is_empty() {
            self.suffixes.push(clause);
        }
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn to_sql(&self, style: PlaceholderStyle) -> AppResult<(String, Vec<Value>)> {
        validate_identifier(&self.table)?;
        if self.columns.is_empty() {
            return Err(AppError::QueryBuild(format!(
                "insert into '{}' has no columns",
                self.table
            )));
        }
        for column in &self.columns {
            validate_identifier(column)?;
        }
        if self.rows.is_empty() {
            return Err(AppError::QueryBuild(format!(
                "insert into '{}' has no rows",
                self.table
            )));
        }

        let mut args = Vec::new();
        let mut tuples = Vec::with_capacity(self.rows.len());
        for (index, row) in self.rows.iter().enumerate() {
            if row.len() != self.columns.len() {
                return Err(AppError::QueryBuild(format!(
                    "row {} of insert into '{}' has {} values, expected {}",
                    index,
                    self.table,
                    row.len(),
                    self.columns.len()
                )));
            }

            let cells: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    InsertValue::GenerateIdentity => "NULL".to_string(),
                    InsertValue::Bound(value) => {
                        args.push(value.clone());
                        style.placeholder(args.len())
                    }
                })
                .collect();
            tuples.push(format!("({})", cells.join(", ")));
        }

        let mut sql = format!(
            "INSERT INTO {} ({}) VALUES {}",
            self.table,
            self.columns.join(", "),
            tuples.join(", ")
        );
        for suffix in &self.suffixes {
            sql.push(' ');
            sql.push_str(suffix);
        }

        Ok((sql, args))
    }
}
