use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{cell, not_detected};
use crate::aggregate::RepositoryModel;
use crate::model::{Relationship, Table, TableSource};

/// Contents of `database_analysis.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseAnalysis {
    pub tables: BTreeMap<String, Table>,
    pub relationships: Vec<Relationship>,
}

impl DatabaseAnalysis {
    pub fn from_model(model: &RepositoryModel) -> Self {
        Self {
            tables: model.tables.clone(),
            relationships: model.relationships.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.relationships.is_empty()
    }

    /// Markdown data dictionary, one section per table.
    pub fn data_dictionary(&self) -> String {
        let mut md = String::from("# Data Dictionary\n\n");

        if self.tables.is_empty() {
            md.push_str(&not_detected("tables"));
        }

        for table in self.tables.values() {
            md.push_str(&format!("## Table: {}\n\n", table.name));
            let source = match &table.source {
                TableSource::Sql => "SQL DDL".to_string(),
                TableSource::Prisma => "Prisma schema".to_string(),
                TableSource::Orm(framework) => format!("{} model", framework),
            };
            md.push_str(&format!("Defined in `{}:{}` ({})", table.module, table.line, source));
            if let Some(model) = &table.model {
                md.push_str(&format!(", model `{}`", model));
            }
            md.push_str("\n\n");

            if table.columns.is_empty() {
                md.push_str(&not_detected("columns"));
                continue;
            }

            md.push_str("| Column | Type | Nullable | PK | FK | Default | Max Length |\n");
            md.push_str("|--------|------|----------|----|----|---------|------------|\n");
            for col in &table.columns {
                let data_type = match (&col.foreign_table, col.is_foreign_key) {
                    (Some(target), true) => format!("{} -> {}", col.data_type, target),
                    _ => col.data_type.clone(),
                };
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} | {} | {} |\n",
                    col.name,
                    cell(&data_type),
                    yes_no(col.is_nullable),
                    yes_no(col.is_primary_key),
                    yes_no(col.is_foreign_key),
                    cell(col.default_value.as_deref().unwrap_or("")),
                    col.max_length.map(|l| l.to_string()).unwrap_or_default()
                ));
            }
            md.push('\n');
        }

        md.push_str("## Relationships\n\n");
        if self.relationships.is_empty() {
            md.push_str(&not_detected("model relationships"));
        } else {
            md.push_str("| From | Kind | To | Field | Location |\n");
            md.push_str("|------|------|----|-------|----------|\n");
            for rel in &self.relationships {
                md.push_str(&format!(
                    "| {} | {} | {} | {} | `{}:{}` |\n",
                    rel.from,
                    cell(&rel.kind),
                    rel.to,
                    rel.field.as_deref().unwrap_or(""),
                    rel.module,
                    rel.line
                ));
            }
            md.push('\n');
        }

        md
    }

    /// Mermaid `erDiagram` body. Foreign keys become `||--o{` edges.
    pub fn erd(&self) -> String {
        let mut lines = vec!["erDiagram".to_string()];

        for table in self.tables.values().filter(|t| !t.columns.is_empty()) {
            lines.push(format!("    {} {{", mermaid_identifier(&table.name)));
            for col in &table.columns {
                let mut keys = Vec::new();
                if col.is_primary_key {
                    keys.push("PK");
                }
                if col.is_foreign_key {
                    keys.push("FK");
                }
                let mut line = format!(
                    "        {} {}",
                    mermaid_identifier(&col.data_type),
                    mermaid_identifier(&col.name)
                );
                if !keys.is_empty() {
                    line.push(' ');
                    line.push_str(&keys.join(", "));
                }
                lines.push(line);
            }
            lines.push("    }".to_string());
        }

        for table in self.tables.values() {
            for (column, reference) in &table.foreign_keys {
                let (target, label) = match reference.split_once('.') {
                    Some((target, target_col)) => (target, format!("{} -> {}", column, target_col)),
                    None => (reference.as_str(), column.clone()),
                };
                lines.push(format!(
                    "    {} ||--o{{ {} : \"{}\"",
                    mermaid_identifier(&table.name),
                    mermaid_identifier(target),
                    label.replace('"', "'")
                ));
            }
        }

        lines.join("\n")
    }

    /// The ERD wrapped in a Markdown document.
    pub fn erd_markdown(&self) -> String {
        let mut md = String::from("# Entity Relationship Diagram\n\n");
        if self.tables.is_empty() {
            md.push_str(&not_detected("tables"));
            return md;
        }
        md.push_str("```mermaid\n");
        md.push_str(&self.erd());
        md.push_str("\n```\n");
        md
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// Reduce a name or type to characters Mermaid accepts in identifiers.
pub fn mermaid_identifier(raw: &str) -> String {
    let id: String = raw
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
        .collect();
    let id = id.trim_matches('_').to_string();
    if id.is_empty() {
        "unnamed".to_string()
    } else {
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    fn sample() -> DatabaseAnalysis {
        let mut users = Table::new("users", TableSource::Sql, "schema.sql", 1);
        let mut id = Column::new("id", "INT");
        id.mark_primary();
        users.push_column(id);
        let mut email = Column::new("email", "VARCHAR");
        email.is_nullable = false;
        email.max_length = Some(255);
        users.push_column(email);

        let mut orders = Table::new("orders", TableSource::Orm("Django".to_string()), "shop/models.py", 4);
        orders.push_column(Column::new("total", "DECIMAL(10,2)"));
        let mut user_id = Column::new("user_id", "INT");
        user_id.mark_foreign("users", Some("id".to_string()));
        orders.push_column(user_id);

        let mut tables = BTreeMap::new();
        tables.insert(users.name.clone(), users);
        tables.insert(orders.name.clone(), orders);
        DatabaseAnalysis {
            tables,
            relationships: Vec::new(),
        }
    }

    #[test]
    fn test_data_dictionary() {
        let md = sample().data_dictionary();
        assert!(md.contains("## Table: users"));
        assert!(md.contains("| email | VARCHAR | no | no | no |  | 255 |"));
        assert!(md.contains("| user_id | INT -> users | yes | no | yes |  |  |"));
        assert!(md.contains("(Django model)"));
        assert!(md.contains("_No model relationships detected._"));
    }

    #[test]
    fn test_erd() {
        let erd = sample().erd();
        assert!(erd.starts_with("erDiagram\n"));
        assert!(erd.contains("        INT id PK"));
        assert!(erd.contains("        DECIMAL_10_2 total"));
        assert!(erd.contains("    orders ||--o{ users : \"user_id -> id\""));
    }

    #[test]
    fn test_empty_database_sections() {
        let empty = DatabaseAnalysis::default();
        assert!(empty.is_empty());
        assert!(empty.data_dictionary().contains("_No tables detected._"));
        assert!(empty.erd_markdown().contains("_No tables detected._"));
    }
}
