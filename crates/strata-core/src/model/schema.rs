//! Database records: tables, columns and relationships.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a table definition was recovered from.
///
/// SQL and Prisma definitions are generally more complete than ORM-derived ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "framework")]
pub enum TableSource {
    Sql,
    Prisma,
    Orm(String),
}

impl TableSource {
    /// Completeness rank used when two definitions share a name.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Sql | Self::Prisma => 2,
            Self::Orm(_) => 1,
        }
    }
}

/// A column. `data_type` is the raw token as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: String,
    pub is_nullable: bool,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub foreign_table: Option<String>,
    pub foreign_column: Option<String>,
    pub default_value: Option<String>,
    pub max_length: Option<u32>,
}

impl Column {
    /// A nullable, key-less column.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            is_nullable: true,
            is_primary_key: false,
            is_foreign_key: false,
            foreign_table: None,
            foreign_column: None,
            default_value: None,
            max_length: None,
        }
    }

    /// Mark as primary key. Primary keys are never nullable.
    pub fn mark_primary(&mut self) {
        self.is_primary_key = true;
        self.is_nullable = false;
    }

    pub fn mark_foreign(&mut self, table: impl Into<String>, column: Option<String>) {
        self.is_foreign_key = true;
        self.foreign_table = Some(table.into());
        self.foreign_column = column;
    }
}

/// A table recovered from DDL or a model declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,

    /// Model / entity name when derived from an ORM or Prisma.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub model: Option<String>,

    pub columns: Vec<Column>,

    pub primary_keys: Vec<String>,

    /// Column name to `table.column` (or bare `table` when the column is unknown).
    pub foreign_keys: BTreeMap<String, String>,

    pub source: TableSource,

    /// Path of the declaring file.
    pub module: String,

    /// 1-based line of the declaration.
    pub line: usize,
}

impl Table {
    pub fn new(
        name: impl Into<String>,
        source: TableSource,
        module: impl Into<String>,
        line: usize,
    ) -> Self {
        Self {
            name: name.into(),
            model: None,
            columns: Vec::new(),
            primary_keys: Vec::new(),
            foreign_keys: BTreeMap::new(),
            source,
            module: module.into(),
            line,
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.name == name)
    }

    /// Add a column, keeping the key maps in step with its flags.
    pub fn push_column(&mut self, column: Column) {
        if column.is_primary_key && !self.primary_keys.contains(&column.name) {
            self.primary_keys.push(column.name.clone());
        }
        if let Some(target) = &column.foreign_table {
            let reference = match &column.foreign_column {
                Some(col) => format!("{}.{}", target, col),
                None => target.clone(),
            };
            self.foreign_keys.insert(column.name.clone(), reference);
        }
        self.columns.push(column);
    }

    /// Mark an existing column as part of the primary key.
    pub fn set_primary_key(&mut self, name: &str) {
        if let Some(col) = self.column_mut(name) {
            col.mark_primary();
        }
        if !self.primary_keys.iter().any(|k| k == name) {
            self.primary_keys.push(name.to_string());
        }
    }

    /// Record a foreign key on a column, marking the column when present.
    pub fn set_foreign_key(&mut self, name: &str, table: &str, column: Option<&str>) {
        if let Some(col) = self.column_mut(name) {
            col.mark_foreign(table, column.map(str::to_string));
        }
        let reference = match column {
            Some(c) => format!("{}.{}", table, c),
            None => table.to_string(),
        };
        self.foreign_keys.insert(name.to_string(), reference);
    }
}

/// A relationship declaration between two models or tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Declaring keyword as written (`ForeignKey`, `hasMany`, `@ManyToOne`, ...).
    pub kind: String,

    /// Declaring model or table.
    pub from: String,

    /// Referenced model or table.
    pub to: String,

    /// Field carrying the relationship, when named.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub field: Option<String>,

    pub module: String,

    pub line: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_column_tracks_keys() {
        let mut table = Table::new("orders", TableSource::Sql, "schema.sql", 1);
        let mut id = Column::new("id", "INT");
        id.mark_primary();
        let mut user = Column::new("user_id", "INT");
        user.mark_foreign("users", Some("id".to_string()));

        table.push_column(id);
        table.push_column(user);

        assert_eq!(table.primary_keys, vec!["id"]);
        assert_eq!(table.foreign_keys.get("user_id").map(String::as_str), Some("users.id"));
        assert!(!table.column("id").unwrap().is_nullable);
    }

    #[test]
    fn test_set_primary_key_after_the_fact() {
        let mut table = Table::new("t", TableSource::Sql, "a.sql", 1);
        table.push_column(Column::new("a", "INT"));
        table.set_primary_key("a");
        table.set_primary_key("a");
        assert_eq!(table.primary_keys, vec!["a"]);
        assert!(table.column("a").unwrap().is_primary_key);
    }

    #[test]
    fn test_source_rank() {
        assert!(TableSource::Sql.rank() > TableSource::Orm("Django".into()).rank());
        assert_eq!(TableSource::Sql.rank(), TableSource::Prisma.rank());
    }
}
