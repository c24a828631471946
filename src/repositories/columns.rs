// src/repositories/columns.rs
//
// Per-table column metadata.
//
// One `Columns` value describes a record type: what can be read, what can be
// written, the identity column, an optional natural key and an optional
// last-modified column. It is the only place that knows column names; the
// generic repository asks it for every list and clause it needs.

/// Wildcard accepted in a projection request.
pub const ALL_FIELDS: &str = "*";

/// Store-side "current time" in the same RFC 3339 shape the client writes.
pub const SQL_NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Columns {
    readable: &'static [&'static str],
    writable: &'static [&'static str],
    alias: &'static str,
    id_field: &'static str,
    natural_key: Option<&'static str>,
    last_modified: Option<&'static str>,
}

impl Columns {
    pub const fn new(
        readable: &'static [&'static str],
        writable: &'static [&'static str],
        alias: &'static str,
        id_field: &'static str,
    ) -> Self {
        Self {
            readable,
            writable,
            alias,
            id_field,
            natural_key: None,
            last_modified: None,
        }
    }

    /// Alternate conflict target for upserts.
    pub const fn with_natural_key(mut self, column: &'static str) -> Self {
        self.natural_key = Some(column);
        self
    }

    /// Column forced to the store's clock whenever a conflict updates the row.
    pub const fn with_last_modified(mut self, column: &'static str) -> Self {
        self.last_modified = Some(column);
        self
    }

    pub fn id_field(&self) -> &'static str {
        self.id_field
    }

    pub fn alias(&self) -> &'static str {
        self.alias
    }

    pub fn natural_key(&self) -> Option<&'static str> {
        self.natural_key
    }

    pub fn last_modified(&self) -> Option<&'static str> {
        self.last_modified
    }

    pub fn readable(&self) -> &'static [&'static str] {
        self.readable
    }

    /// Writable columns in declaration order, identity excluded.
    pub fn for_insert(&self) -> Vec<&'static str> {
        self.writable
            .iter()
            .copied()
            .filter(|column| *column != self.id_field)
            .collect()
    }

    /// Expand a projection request into concrete column references.
    ///
    /// - `[]` or `"*"` → every readable column
    /// - `"<alias>.*"` → every readable column qualified with the alias
    /// - anything else is passed through untouched
    pub fn for_select(&self, requested: &[String]) -> Vec<String> {
        if requested.is_empty() {
            return self.readable.iter().map(|c| c.to_string()).collect();
        }

        let aliased_all = format!("{}.{}", self.alias, ALL_FIELDS);
        let mut fields = Vec::with_capacity(self.readable.len().max(requested.len()));
        for field in requested {
            if field == ALL_FIELDS {
                fields.extend(self.readable.iter().map(|c| c.to_string()));
            } else if !self.alias.is_empty() && *field == aliased_all {
                fields.extend(
                    self.readable
                        .iter()
                        .map(|c| format!("{}.{}", self.alias, c)),
                );
            } else {
                fields.push(field.clone());
            }
        }
        fields
    }

    /// `col = excluded.col` for every writable column except the identity;
    /// the last-modified column, if any, is set from the store clock instead.
    fn assignments(&self) -> Vec<String> {
        let mut statements = Vec::with_capacity(self.writable.len());
        let mut touch = None;

        for column in self.for_insert() {
            if Some(column) == self.last_modified {
                touch = Some(column);
                continue;
            }
            statements.push(format!("{} = excluded.{}", column, column));
        }

        if let Some(column) = touch {
            statements.push(format!("{} = {}", column, SQL_NOW));
        }
        statements
    }

    /// Upsert clause targeting the identity column.
    pub fn on_conflict(&self) -> String {
        self.on_conflict_for(self.id_field)
    }

    /// Upsert clause targeting `target`. Degrades to `DO NOTHING` when there
    /// is nothing to update, and to an empty string without a target.
    pub fn on_conflict_for(&self, target: &str) -> String {
        if target.is_empty() {
            return String::new();
        }

        let statements = self.assignments();
        if statements.is_empty() {
            return format!("ON CONFLICT ({}) DO NOTHING", target);
        }

        format!(
            "ON CONFLICT ({}) DO UPDATE SET {}",
            target,
            statements.join(", ")
        )
    }
}
