//! Tables and relationships from Prisma schemas.

use regex::Regex;
use std::collections::BTreeMap;

use super::text::{compile, count_lines_before, strip_quotes};
use crate::model::{Column, Relationship, Table, TableSource};
use crate::patterns::schema::{
    PRISMA_COMPOSITE_ID, PRISMA_DB_LENGTH, PRISMA_DEFAULT, PRISMA_FIELD, PRISMA_MAP,
    PRISMA_MODEL, PRISMA_RELATION, PRISMA_RELATION_FIELDS, PRISMA_RELATION_REFERENCES,
};

pub struct PrismaExtractor {
    model: Option<Regex>,
    field: Option<Regex>,
    default: Option<Regex>,
    db_length: Option<Regex>,
    relation: Option<Regex>,
    relation_fields: Option<Regex>,
    relation_references: Option<Regex>,
    composite_id: Option<Regex>,
    map: Option<Regex>,
}

impl Default for PrismaExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// A relation field's `fields:`/`references:` pair, applied once every
/// scalar column of the model is known.
struct PendingForeignKey {
    column: String,
    target: String,
    target_column: Option<String>,
}

impl PrismaExtractor {
    pub fn new() -> Self {
        Self {
            model: compile(PRISMA_MODEL),
            field: compile(PRISMA_FIELD),
            default: compile(PRISMA_DEFAULT),
            db_length: compile(PRISMA_DB_LENGTH),
            relation: compile(PRISMA_RELATION),
            relation_fields: compile(PRISMA_RELATION_FIELDS),
            relation_references: compile(PRISMA_RELATION_REFERENCES),
            composite_id: compile(PRISMA_COMPOSITE_ID),
            map: compile(PRISMA_MAP),
        }
    }

    /// Tables and model-to-model relationships of one schema file.
    pub fn extract(&self, rel: &str, content: &str) -> (Vec<Table>, Vec<Relationship>) {
        let Some(model_re) = &self.model else {
            return (Vec::new(), Vec::new());
        };

        // Model name to table name, so relation targets resolve to tables.
        let table_names: BTreeMap<String, String> = model_re
            .captures_iter(content)
            .filter_map(|cap| {
                let name = cap.name("name")?.as_str().to_string();
                let body = cap.name("body").map(|m| m.as_str()).unwrap_or("");
                let table = self.mapped_name(body).unwrap_or_else(|| name.clone());
                Some((name, table))
            })
            .collect();

        let mut tables = Vec::new();
        let mut relationships = Vec::new();

        for cap in model_re.captures_iter(content) {
            let (Some(whole), Some(name), Some(body)) =
                (cap.get(0), cap.name("name"), cap.name("body"))
            else {
                continue;
            };
            let model = name.as_str();
            let table_name = table_names
                .get(model)
                .cloned()
                .unwrap_or_else(|| model.to_string());

            let mut table = Table::new(
                table_name,
                TableSource::Prisma,
                rel,
                count_lines_before(content, whole.start()),
            );
            table.model = Some(model.to_string());

            let mut pending = Vec::new();
            let mut offset = body.start();

            for raw_line in body.as_str().split('\n') {
                let line_offset = offset;
                offset += raw_line.len() + 1;

                let line = raw_line.split("//").next().unwrap_or("").trim();
                if line.is_empty() {
                    continue;
                }
                if line.starts_with("@@") {
                    self.apply_block_attribute(&mut table, line);
                    continue;
                }

                let Some(field) = self.field.as_ref().and_then(|re| re.captures(line)) else {
                    continue;
                };
                let (Some(field_name), Some(field_type)) = (field.name("name"), field.name("type"))
                else {
                    continue;
                };
                let modifier = field.name("modifier").map(|m| m.as_str()).unwrap_or("");
                let attrs = field.name("attrs").map(|m| m.as_str()).unwrap_or("");

                if let Some(target_table) = table_names.get(field_type.as_str()) {
                    let relation = self.relation.as_ref().and_then(|re| re.captures(attrs));
                    relationships.push(Relationship {
                        kind: if relation.is_some() {
                            "@relation".to_string()
                        } else {
                            "relation".to_string()
                        },
                        from: model.to_string(),
                        to: field_type.as_str().to_string(),
                        field: Some(field_name.as_str().to_string()),
                        module: rel.to_string(),
                        line: count_lines_before(content, line_offset),
                    });

                    if let Some(args) = relation.as_ref().and_then(|c| c.name("args")) {
                        let columns = self.list(&self.relation_fields, args.as_str());
                        let references = self.list(&self.relation_references, args.as_str());
                        for (i, column) in columns.into_iter().enumerate() {
                            pending.push(PendingForeignKey {
                                column,
                                target: target_table.clone(),
                                target_column: references.get(i).cloned(),
                            });
                        }
                    }
                    continue;
                }

                let mut column = Column::new(field_name.as_str(), field_type.as_str());
                column.is_nullable = modifier == "?";
                column.default_value = self
                    .default
                    .as_ref()
                    .and_then(|re| re.captures(attrs))
                    .and_then(|c| c.name("value"))
                    .map(|v| strip_quotes(v.as_str()).to_string());
                column.max_length = self
                    .db_length
                    .as_ref()
                    .and_then(|re| re.captures(attrs))
                    .and_then(|c| c.name("len"))
                    .and_then(|len| len.as_str().parse().ok());
                if has_attribute(attrs, "@id") {
                    column.mark_primary();
                }
                table.push_column(column);
            }

            for fk in pending {
                table.set_foreign_key(&fk.column, &fk.target, fk.target_column.as_deref());
            }

            tables.push(table);
        }

        (tables, relationships)
    }

    fn apply_block_attribute(&self, table: &mut Table, line: &str) {
        if line.starts_with("@@id") {
            for column in self.list(&self.composite_id, line) {
                table.set_primary_key(&column);
            }
        }
    }

    fn mapped_name(&self, body: &str) -> Option<String> {
        self.map
            .as_ref()?
            .captures(body)?
            .name("name")
            .map(|m| m.as_str().to_string())
    }

    fn list(&self, re: &Option<Regex>, text: &str) -> Vec<String> {
        re.as_ref()
            .and_then(|re| re.captures(text))
            .and_then(|c| c.name("list"))
            .map(|list| {
                list.as_str()
                    .split(',')
                    .map(strip_quotes)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// `@id` as a whole attribute, not a prefix of `@idx` or similar.
fn has_attribute(attrs: &str, attribute: &str) -> bool {
    attrs.match_indices(attribute).any(|(i, _)| {
        attrs[i + attribute.len()..]
            .chars()
            .next()
            .map(|c| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(true)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"datasource db {
  provider = "postgresql"
  url      = env("DATABASE_URL")
}

model User {
  id    Int     @id @default(autoincrement())
  email String  @unique @db.VarChar(255)
  name  String?
  posts Post[]

  @@map("users")
}

model Post {
  id       Int    @id @default(autoincrement())
  title    String @default("untitled")
  author   User   @relation(fields: [authorId], references: [id])
  authorId Int
}

model Tag {
  postId Int
  label  String
  @@id([postId, label])
}
"#;

    #[test]
    fn test_models_become_tables() {
        let (tables, _) = PrismaExtractor::new().extract("prisma/schema.prisma", SCHEMA);
        let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["users", "Post", "Tag"]);

        let users = &tables[0];
        assert_eq!(users.model.as_deref(), Some("User"));
        assert_eq!(users.line, 6);
        assert_eq!(users.primary_keys, vec!["id"]);
        assert_eq!(users.column("id").unwrap().default_value.as_deref(), Some("autoincrement()"));
        let email = users.column("email").unwrap();
        assert_eq!(email.max_length, Some(255));
        assert!(!email.is_nullable);
        assert!(users.column("name").unwrap().is_nullable);
        assert!(users.column("posts").is_none());
    }

    #[test]
    fn test_relations_and_foreign_keys() {
        let (tables, relationships) = PrismaExtractor::new().extract("schema.prisma", SCHEMA);

        let post = &tables[1];
        assert!(post.column("author").is_none());
        let author_id = post.column("authorId").unwrap();
        assert!(author_id.is_foreign_key);
        assert_eq!(author_id.foreign_table.as_deref(), Some("users"));
        assert_eq!(author_id.foreign_column.as_deref(), Some("id"));
        assert_eq!(post.column("title").unwrap().default_value.as_deref(), Some("untitled"));

        assert_eq!(relationships.len(), 2);
        assert_eq!(relationships[0].kind, "relation");
        assert_eq!(relationships[0].from, "User");
        assert_eq!(relationships[0].to, "Post");
        assert_eq!(relationships[1].kind, "@relation");
        assert_eq!(relationships[1].field.as_deref(), Some("author"));
        assert_eq!(relationships[1].line, 18);
    }

    #[test]
    fn test_composite_id() {
        let (tables, _) = PrismaExtractor::new().extract("schema.prisma", SCHEMA);
        let tag = &tables[2];
        assert_eq!(tag.primary_keys, vec!["postId", "label"]);
        assert!(!tag.column("label").unwrap().is_nullable);
    }

    #[test]
    fn test_unterminated_model_is_ignored() {
        let (tables, relationships) =
            PrismaExtractor::new().extract("schema.prisma", "model Broken {\n  id Int @id\n");
        assert!(tables.is_empty());
        assert!(relationships.is_empty());
    }
}
