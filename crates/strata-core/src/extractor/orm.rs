//! Tables and relationships from ORM model declarations.
//!
//! Like routes, frameworks are chosen per file by signature substrings. A
//! file that matches no signature runs every framework of the language, and
//! tables that come out of that fallback without a single column are dropped.

use regex::Regex;
use std::collections::BTreeSet;

use super::text::{
    compile, count_lines_before, find_block_end, line_starts, split_top_level, strip_generics,
    strip_quotes,
};
use crate::model::{Column, Language, Relationship, Table, TableSource};
use crate::patterns::schema::{
    DJANGO_DB_TABLE, DJANGO_FIELD, DJANGO_MODEL, GORM_MODEL, GORM_TABLE_NAME, JPA_ENTITY,
    JPA_FIELD, JPA_RELATION, JPA_TABLE_NAME, MONGOOSE_FIELD, MONGOOSE_MODEL, MONGOOSE_REF,
    MONGOOSE_SCHEMA, SEQUELIZE_ASSOCIATION, SEQUELIZE_DEFINE, SEQUELIZE_FIELD, SEQUELIZE_INIT,
    SEQUELIZE_TABLE_NAME, SQLALCHEMY_COLUMN, SQLALCHEMY_FOREIGN_KEY, SQLALCHEMY_MODEL,
    SQLALCHEMY_RELATIONSHIP, SQLALCHEMY_TABLENAME, TYPEORM_COLUMN, TYPEORM_ENTITY,
    TYPEORM_RELATION,
};
use crate::patterns::OrmFramework;

/// Tables and relationships found in one file.
#[derive(Debug, Default)]
pub struct OrmModels {
    pub tables: Vec<Table>,
    pub relationships: Vec<Relationship>,
}

impl OrmModels {
    fn relate(&mut self, kind: &str, from: &str, to: &str, field: Option<&str>, rel: &str, line: usize) {
        self.relationships.push(Relationship {
            kind: kind.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            field: field.map(str::to_string),
            module: rel.to_string(),
            line,
        });
    }
}

struct OrmPatterns {
    django_model: Option<Regex>,
    django_field: Option<Regex>,
    django_db_table: Option<Regex>,
    sqlalchemy_model: Option<Regex>,
    sqlalchemy_tablename: Option<Regex>,
    sqlalchemy_column: Option<Regex>,
    sqlalchemy_relationship: Option<Regex>,
    sqlalchemy_foreign_key: Option<Regex>,
    sequelize_define: Option<Regex>,
    sequelize_init: Option<Regex>,
    sequelize_table_name: Option<Regex>,
    sequelize_field: Option<Regex>,
    sequelize_association: Option<Regex>,
    mongoose_schema: Option<Regex>,
    mongoose_model: Option<Regex>,
    mongoose_field: Option<Regex>,
    mongoose_ref: Option<Regex>,
    typeorm_entity: Option<Regex>,
    typeorm_column: Option<Regex>,
    typeorm_relation: Option<Regex>,
    jpa_entity: Option<Regex>,
    jpa_table_name: Option<Regex>,
    jpa_field: Option<Regex>,
    jpa_relation: Option<Regex>,
    gorm_model: Option<Regex>,
    gorm_table_name: Option<Regex>,
}

impl OrmPatterns {
    fn compile() -> Self {
        Self {
            django_model: compile(DJANGO_MODEL),
            django_field: compile(DJANGO_FIELD),
            django_db_table: compile(DJANGO_DB_TABLE),
            sqlalchemy_model: compile(SQLALCHEMY_MODEL),
            sqlalchemy_tablename: compile(SQLALCHEMY_TABLENAME),
            sqlalchemy_column: compile(SQLALCHEMY_COLUMN),
            sqlalchemy_relationship: compile(SQLALCHEMY_RELATIONSHIP),
            sqlalchemy_foreign_key: compile(SQLALCHEMY_FOREIGN_KEY),
            sequelize_define: compile(SEQUELIZE_DEFINE),
            sequelize_init: compile(SEQUELIZE_INIT),
            sequelize_table_name: compile(SEQUELIZE_TABLE_NAME),
            sequelize_field: compile(SEQUELIZE_FIELD),
            sequelize_association: compile(SEQUELIZE_ASSOCIATION),
            mongoose_schema: compile(MONGOOSE_SCHEMA),
            mongoose_model: compile(MONGOOSE_MODEL),
            mongoose_field: compile(MONGOOSE_FIELD),
            mongoose_ref: compile(MONGOOSE_REF),
            typeorm_entity: compile(TYPEORM_ENTITY),
            typeorm_column: compile(TYPEORM_COLUMN),
            typeorm_relation: compile(TYPEORM_RELATION),
            jpa_entity: compile(JPA_ENTITY),
            jpa_table_name: compile(JPA_TABLE_NAME),
            jpa_field: compile(JPA_FIELD),
            jpa_relation: compile(JPA_RELATION),
            gorm_model: compile(GORM_MODEL),
            gorm_table_name: compile(GORM_TABLE_NAME),
        }
    }
}

/// ORM model extractor for one language, compiled once.
pub struct OrmExtractor {
    frameworks: &'static [OrmFramework],
    patterns: OrmPatterns,
}

impl OrmExtractor {
    pub fn new(language: Language) -> Self {
        Self {
            frameworks: OrmFramework::for_language(language),
            patterns: OrmPatterns::compile(),
        }
    }

    /// Frameworks whose signatures appear in `content`.
    pub fn recognized(&self, content: &str) -> Vec<OrmFramework> {
        self.frameworks
            .iter()
            .copied()
            .filter(|f| f.signatures().iter().any(|s| content.contains(s)))
            .collect()
    }

    pub fn extract(&self, rel: &str, content: &str) -> OrmModels {
        let recognized = self.recognized(content);
        let fallback = recognized.is_empty();
        let active = if fallback {
            self.frameworks.to_vec()
        } else {
            recognized
        };

        let mut out = OrmModels::default();
        for framework in active {
            match framework {
                OrmFramework::Django => self.django(rel, content, &mut out),
                OrmFramework::SqlAlchemy => self.sqlalchemy(rel, content, &mut out),
                OrmFramework::Sequelize => self.sequelize(rel, content, &mut out),
                OrmFramework::Mongoose => self.mongoose(rel, content, &mut out),
                OrmFramework::TypeOrm => self.typeorm(rel, content, &mut out),
                OrmFramework::Jpa => self.jpa(rel, content, &mut out),
                OrmFramework::Gorm => self.gorm(rel, content, &mut out),
            }
        }

        if fallback {
            out.tables.retain(|t| !t.columns.is_empty());
        }
        out
    }

    // =========================================================================
    // PYTHON
    // =========================================================================

    fn django(&self, rel: &str, content: &str, out: &mut OrmModels) {
        let p = &self.patterns;
        let (Some(model_re), Some(field_re)) = (&p.django_model, &p.django_field) else {
            return;
        };
        let app = django_app_label(rel);

        for cap in model_re.captures_iter(content) {
            let (Some(whole), Some(name)) = (cap.get(0), cap.name("name")) else {
                continue;
            };
            let model = name.as_str();
            let (body_start, body) = python_block(content, whole.start());

            let table_name = capture(&p.django_db_table, body, "name")
                .unwrap_or_else(|| django_table(app.as_deref(), model));
            let mut table = Table::new(
                table_name,
                TableSource::Orm(OrmFramework::Django.name().to_string()),
                rel,
                count_lines_before(content, whole.start()),
            );
            table.model = Some(model.to_string());

            for field in field_re.captures_iter(body) {
                let (Some(at), Some(field_name), Some(kind)) =
                    (field.get(0), field.name("name"), field.name("type"))
                else {
                    continue;
                };
                let field_name = field_name.as_str();
                let kind = kind.as_str();
                let args = field.name("args").map(|m| m.as_str()).unwrap_or("");
                let line = count_lines_before(content, body_start + at.start());

                if matches!(kind, "ForeignKey" | "OneToOneField" | "ManyToManyField") {
                    let target = positional_args(args)
                        .into_iter()
                        .next()
                        .map(|t| strip_quotes(&t).to_string())
                        .unwrap_or_default();
                    let (target_app, target_model) = match target.rsplit_once('.') {
                        Some((app_part, model_part)) => (Some(app_part.to_string()), model_part),
                        None => (app.clone(), target.as_str()),
                    };
                    let target_model = if target_model == "self" {
                        model
                    } else {
                        target_model
                    };
                    if target_model.is_empty() {
                        continue;
                    }
                    out.relate(kind, model, target_model, Some(field_name), rel, line);

                    if kind != "ManyToManyField" {
                        let mut column = Column::new(format!("{}_id", field_name), kind);
                        column.is_nullable = keyword_arg(args, "null").as_deref() == Some("True");
                        column.mark_foreign(
                            django_table(target_app.as_deref(), target_model),
                            Some("id".to_string()),
                        );
                        table.push_column(column);
                    }
                    continue;
                }

                let mut column = Column::new(field_name, kind);
                column.is_nullable = keyword_arg(args, "null").as_deref() == Some("True");
                column.max_length = keyword_arg(args, "max_length").and_then(|v| v.parse().ok());
                column.default_value = keyword_arg(args, "default").map(|v| strip_quotes(&v).to_string());
                if keyword_arg(args, "primary_key").as_deref() == Some("True") {
                    column.mark_primary();
                }
                table.push_column(column);
            }

            // Models without an explicit key get Django's implicit `id`.
            if table.primary_keys.is_empty() {
                let mut id = Column::new("id", "AutoField");
                id.mark_primary();
                table.columns.insert(0, id);
                table.primary_keys.push("id".to_string());
            }

            out.tables.push(table);
        }
    }

    fn sqlalchemy(&self, rel: &str, content: &str, out: &mut OrmModels) {
        let p = &self.patterns;
        let (Some(model_re), Some(column_re)) = (&p.sqlalchemy_model, &p.sqlalchemy_column) else {
            return;
        };

        for cap in model_re.captures_iter(content) {
            let (Some(whole), Some(name)) = (cap.get(0), cap.name("name")) else {
                continue;
            };
            let bases = cap.name("bases").map(|m| m.as_str()).unwrap_or("");
            if !(bases.contains("Base") || bases.contains("Model")) {
                continue;
            }
            let model = name.as_str();
            let (body_start, body) = python_block(content, whole.start());

            let table_name =
                capture(&p.sqlalchemy_tablename, body, "name").unwrap_or_else(|| snake_case(model));
            let mut table = Table::new(
                table_name.clone(),
                TableSource::Orm(OrmFramework::SqlAlchemy.name().to_string()),
                rel,
                count_lines_before(content, whole.start()),
            );
            table.model = Some(model.to_string());

            for col in column_re.captures_iter(body) {
                let (Some(at), Some(col_name)) = (col.get(0), col.name("name")) else {
                    continue;
                };
                let args = col.name("args").map(|m| m.as_str()).unwrap_or("");
                let line = count_lines_before(content, body_start + at.start());

                let type_arg = positional_args(args).into_iter().find(|a| {
                    !a.starts_with("ForeignKey") && !a.starts_with('"') && !a.starts_with('\'')
                });
                let (data_type, max_length) = match type_arg {
                    Some(arg) => split_type(&arg),
                    None => (mapped_annotation(at.as_str()).unwrap_or_default(), None),
                };

                let mut column = Column::new(col_name.as_str(), data_type);
                column.max_length = max_length;
                if keyword_arg(args, "nullable").as_deref() == Some("False") {
                    column.is_nullable = false;
                }
                column.default_value = keyword_arg(args, "default")
                    .or_else(|| keyword_arg(args, "server_default"))
                    .map(|v| strip_quotes(&v).to_string());
                if keyword_arg(args, "primary_key").as_deref() == Some("True") {
                    column.mark_primary();
                }

                if let Some(fk) = p.sqlalchemy_foreign_key.as_ref().and_then(|re| re.captures(args)) {
                    if let (Some(target), Some(target_col)) = (fk.name("table"), fk.name("col")) {
                        column.mark_foreign(target.as_str(), Some(target_col.as_str().to_string()));
                        out.relate("ForeignKey", &table_name, target.as_str(), Some(col_name.as_str()), rel, line);
                    }
                }

                table.push_column(column);
            }

            if let Some(re) = &p.sqlalchemy_relationship {
                for relation in re.captures_iter(body) {
                    let (Some(at), Some(field), Some(target)) =
                        (relation.get(0), relation.name("field"), relation.name("target"))
                    else {
                        continue;
                    };
                    let line = count_lines_before(content, body_start + at.start());
                    out.relate("relationship", model, target.as_str(), Some(field.as_str()), rel, line);
                }
            }

            out.tables.push(table);
        }
    }

    // =========================================================================
    // JAVASCRIPT / TYPESCRIPT
    // =========================================================================

    fn sequelize(&self, rel: &str, content: &str, out: &mut OrmModels) {
        let p = &self.patterns;
        let Some(field_re) = &p.sequelize_field else {
            return;
        };

        for re in [&p.sequelize_define, &p.sequelize_init].into_iter().flatten() {
            for cap in re.captures_iter(content) {
                let (Some(whole), Some(name)) = (cap.get(0), cap.name("name")) else {
                    continue;
                };
                let open = whole.end() - 1;
                let Some(close) = matching_close(content, open) else {
                    continue;
                };
                let body = &content[open + 1..close];

                let call_open = whole.start() + whole.as_str().find('(').unwrap_or(0);
                let call_close = matching_close(content, call_open).unwrap_or(content.len());
                let options = content.get(close..call_close).unwrap_or("");

                let model = name.as_str();
                let table_name = capture(&p.sequelize_table_name, options, "name")
                    .unwrap_or_else(|| model.to_string());
                let mut table = Table::new(
                    table_name,
                    TableSource::Orm(OrmFramework::Sequelize.name().to_string()),
                    rel,
                    count_lines_before(content, whole.start()),
                );
                table.model = Some(model.to_string());

                for field in field_re.captures_iter(body) {
                    let (Some(at), Some(field_name), Some(kind)) =
                        (field.get(0), field.name("name"), field.name("type"))
                    else {
                        continue;
                    };
                    if brace_depth(body, at.start()) != 0 {
                        continue;
                    }

                    let mut column = Column::new(field_name.as_str(), kind.as_str());
                    column.max_length = field.name("len").and_then(|l| l.as_str().parse().ok());

                    if let Some(options) = value_object(body, field_name.end()) {
                        if keyword_arg(options, "allowNull").as_deref() == Some("false") {
                            column.is_nullable = false;
                        }
                        column.default_value =
                            keyword_arg(options, "defaultValue").map(|v| strip_quotes(&v).to_string());
                        if keyword_arg(options, "primaryKey").as_deref() == Some("true") {
                            column.mark_primary();
                        }
                        if let Some(references) = keyword_arg(options, "references") {
                            let inner = references.trim_start_matches('{').trim_end_matches('}');
                            if let Some(target) = keyword_arg(inner, "model") {
                                let key = keyword_arg(inner, "key").map(|k| strip_quotes(&k).to_string());
                                column.mark_foreign(strip_quotes(&target), key);
                            }
                        }
                    }

                    table.push_column(column);
                }

                out.tables.push(table);
            }
        }

        if let Some(re) = &p.sequelize_association {
            for cap in re.captures_iter(content) {
                let (Some(at), Some(from), Some(kind), Some(to)) =
                    (cap.get(0), cap.name("from"), cap.name("kind"), cap.name("to"))
                else {
                    continue;
                };
                let line = count_lines_before(content, at.start());
                out.relate(kind.as_str(), from.as_str(), to.as_str(), None, rel, line);
            }
        }
    }

    fn mongoose(&self, rel: &str, content: &str, out: &mut OrmModels) {
        let p = &self.patterns;
        let (Some(schema_re), Some(field_re)) = (&p.mongoose_schema, &p.mongoose_field) else {
            return;
        };

        for cap in schema_re.captures_iter(content) {
            let (Some(whole), Some(var)) = (cap.get(0), cap.name("var")) else {
                continue;
            };
            let open = whole.end() - 1;
            let Some(close) = matching_close(content, open) else {
                continue;
            };
            let body_start = open + 1;
            let body = &content[body_start..close];

            let model = p
                .mongoose_model
                .as_ref()
                .and_then(|re| {
                    re.captures_iter(content)
                        .find(|m| m.name("var").map(|v| v.as_str()) == Some(var.as_str()))
                        .and_then(|m| m.name("name").map(|n| n.as_str().to_string()))
                })
                .unwrap_or_else(|| model_from_schema_var(var.as_str()));

            let mut table = Table::new(
                pluralize(&model.to_lowercase()),
                TableSource::Orm(OrmFramework::Mongoose.name().to_string()),
                rel,
                count_lines_before(content, whole.start()),
            );
            table.model = Some(model.clone());

            let mut id = Column::new("_id", "ObjectId");
            id.mark_primary();
            table.push_column(id);

            for field in field_re.captures_iter(body) {
                let (Some(at), Some(field_name), Some(kind)) =
                    (field.get(0), field.name("name"), field.name("type"))
                else {
                    continue;
                };
                if brace_depth(body, at.start()) != 0 {
                    continue;
                }

                let mut column = Column::new(field_name.as_str(), kind.as_str());
                if let Some(options) = value_object(body, field_name.end()) {
                    if keyword_arg(options, "required").as_deref() == Some("true") {
                        column.is_nullable = false;
                    }
                    column.default_value =
                        keyword_arg(options, "default").map(|v| strip_quotes(&v).to_string());
                    if let Some(target) = keyword_arg(options, "ref") {
                        let target = strip_quotes(&target);
                        column.mark_foreign(pluralize(&target.to_lowercase()), Some("_id".to_string()));
                    }
                }
                table.push_column(column);
            }

            if let Some(re) = &p.mongoose_ref {
                for relation in re.captures_iter(body) {
                    let (Some(at), Some(field), Some(target)) =
                        (relation.get(0), relation.name("field"), relation.name("target"))
                    else {
                        continue;
                    };
                    if brace_depth(body, at.start()) != 0 {
                        continue;
                    }
                    let line = count_lines_before(content, body_start + at.start());
                    out.relate("ref", &model, target.as_str(), Some(field.as_str()), rel, line);
                }
            }

            out.tables.push(table);
        }
    }

    fn typeorm(&self, rel: &str, content: &str, out: &mut OrmModels) {
        let p = &self.patterns;
        let Some(entity_re) = &p.typeorm_entity else {
            return;
        };

        for cap in entity_re.captures_iter(content) {
            let (Some(whole), Some(name)) = (cap.get(0), cap.name("name")) else {
                continue;
            };
            let Some((body_start, body)) = brace_body(content, whole.end()) else {
                continue;
            };
            let model = name.as_str();
            let table_name = cap
                .name("table")
                .map(|t| t.as_str().to_string())
                .unwrap_or_else(|| snake_case(model));

            let mut table = Table::new(
                table_name,
                TableSource::Orm(OrmFramework::TypeOrm.name().to_string()),
                rel,
                count_lines_before(content, whole.start()),
            );
            table.model = Some(model.to_string());

            if let Some(column_re) = &p.typeorm_column {
                for col in column_re.captures_iter(body) {
                    let (Some(decorator), Some(col_name), Some(ts_type)) =
                        (col.name("decorator"), col.name("name"), col.name("type"))
                    else {
                        continue;
                    };
                    let args = col.name("args").map(|m| m.as_str()).unwrap_or("");
                    let options = args.trim().trim_start_matches('{').trim_end_matches('}');

                    let data_type = keyword_arg(options, "type")
                        .or_else(|| {
                            positional_args(args)
                                .into_iter()
                                .find(|a| a.starts_with('\'') || a.starts_with('"'))
                        })
                        .map(|t| strip_quotes(&t).to_string())
                        .unwrap_or_else(|| ts_type.as_str().to_string());

                    let mut column = Column::new(col_name.as_str(), data_type);
                    column.is_nullable = keyword_arg(options, "nullable").as_deref() == Some("true");
                    column.max_length = keyword_arg(options, "length").and_then(|v| v.parse().ok());
                    column.default_value =
                        keyword_arg(options, "default").map(|v| strip_quotes(&v).to_string());
                    if decorator.as_str().starts_with("Primary") {
                        column.mark_primary();
                    }
                    table.push_column(column);
                }
            }

            if let Some(relation_re) = &p.typeorm_relation {
                for relation in relation_re.captures_iter(body) {
                    let (Some(at), Some(kind), Some(target), Some(field)) = (
                        relation.get(0),
                        relation.name("kind"),
                        relation.name("target"),
                        relation.name("field"),
                    ) else {
                        continue;
                    };
                    let line = count_lines_before(content, body_start + at.start());
                    let kind = format!("@{}", kind.as_str());
                    out.relate(&kind, model, target.as_str(), Some(field.as_str()), rel, line);

                    if kind == "@ManyToOne" {
                        table.set_foreign_key(
                            &format!("{}Id", field.as_str()),
                            &snake_case(target.as_str()),
                            Some("id"),
                        );
                    }
                }
            }

            out.tables.push(table);
        }
    }

    // =========================================================================
    // JAVA / GO
    // =========================================================================

    fn jpa(&self, rel: &str, content: &str, out: &mut OrmModels) {
        let p = &self.patterns;
        let (Some(entity_re), Some(field_re)) = (&p.jpa_entity, &p.jpa_field) else {
            return;
        };

        for cap in entity_re.captures_iter(content) {
            let (Some(whole), Some(name)) = (cap.get(0), cap.name("name")) else {
                continue;
            };
            let Some((body_start, body)) = brace_body(content, whole.end()) else {
                continue;
            };
            let model = name.as_str();
            let between = cap.name("between").map(|m| m.as_str()).unwrap_or("");
            let table_name =
                capture(&p.jpa_table_name, between, "name").unwrap_or_else(|| model.to_string());

            let mut table = Table::new(
                table_name,
                TableSource::Orm(OrmFramework::Jpa.name().to_string()),
                rel,
                count_lines_before(content, whole.start()),
            );
            table.model = Some(model.to_string());

            for field in field_re.captures_iter(body) {
                let (Some(at), Some(java_type), Some(field_name)) =
                    (field.get(0), field.name("type"), field.name("name"))
                else {
                    continue;
                };
                let annotations = field.name("annotations").map(|m| m.as_str()).unwrap_or("");
                if annotations.contains("@Transient") {
                    continue;
                }
                let java_type = java_type.as_str();
                let field_name = field_name.as_str();
                let line = count_lines_before(content, body_start + at.start());

                let relation = p
                    .jpa_relation
                    .as_ref()
                    .and_then(|re| re.captures(annotations))
                    .and_then(|c| c.name("kind"))
                    .map(|k| k.as_str());

                if let Some(kind) = relation {
                    let target = generic_argument(java_type).unwrap_or_else(|| strip_generics(java_type));
                    out.relate(&format!("@{}", kind), model, &target, Some(field_name), rel, line);

                    if matches!(kind, "ManyToOne" | "OneToOne") {
                        let join = annotation_args(annotations, "JoinColumn");
                        let column_name = join
                            .as_deref()
                            .and_then(|a| keyword_arg(a, "name"))
                            .map(|n| strip_quotes(&n).to_string())
                            .unwrap_or_else(|| format!("{}_id", field_name));
                        let mut column = Column::new(column_name, target.clone());
                        if join.as_deref().and_then(|a| keyword_arg(a, "nullable")).as_deref()
                            == Some("false")
                        {
                            column.is_nullable = false;
                        }
                        column.mark_foreign(target, Some("id".to_string()));
                        table.push_column(column);
                    }
                    continue;
                }

                let column_args = annotation_args(annotations, "Column");
                let column_name = column_args
                    .as_deref()
                    .and_then(|a| keyword_arg(a, "name"))
                    .map(|n| strip_quotes(&n).to_string())
                    .unwrap_or_else(|| field_name.to_string());

                let mut column = Column::new(column_name, java_type);
                if let Some(args) = column_args.as_deref() {
                    column.max_length = keyword_arg(args, "length").and_then(|v| v.parse().ok());
                    if keyword_arg(args, "nullable").as_deref() == Some("false") {
                        column.is_nullable = false;
                    }
                }
                if has_annotation(annotations, "Id") {
                    column.mark_primary();
                }
                table.push_column(column);
            }

            out.tables.push(table);
        }
    }

    fn gorm(&self, rel: &str, content: &str, out: &mut OrmModels) {
        let p = &self.patterns;
        let Some(model_re) = &p.gorm_model else {
            return;
        };

        let structs: BTreeSet<&str> = model_re
            .captures_iter(content)
            .filter_map(|c| c.name("name").map(|m| m.as_str()))
            .collect();

        for cap in model_re.captures_iter(content) {
            let (Some(whole), Some(name), Some(body)) = (cap.get(0), cap.name("name"), cap.name("body"))
            else {
                continue;
            };
            let body_text = body.as_str();
            if !(body_text.contains("gorm.Model") || body_text.contains("gorm:\"")) {
                continue;
            }
            let model = name.as_str();

            let table_name = p
                .gorm_table_name
                .as_ref()
                .and_then(|re| {
                    re.captures_iter(content)
                        .find(|c| c.name("model").map(|m| m.as_str()) == Some(model))
                        .and_then(|c| c.name("name").map(|n| n.as_str().to_string()))
                })
                .unwrap_or_else(|| pluralize(&snake_case(model)));

            let mut table = Table::new(
                table_name,
                TableSource::Orm(OrmFramework::Gorm.name().to_string()),
                rel,
                count_lines_before(content, whole.start()),
            );
            table.model = Some(model.to_string());

            let field_names: BTreeSet<&str> = body_text
                .lines()
                .filter_map(|l| l.split_whitespace().next())
                .collect();

            let mut offset = body.start();
            for raw_line in body_text.split('\n') {
                let line_offset = offset;
                offset += raw_line.len() + 1;

                let line = raw_line.split("//").next().unwrap_or("").trim();
                if line == "gorm.Model" {
                    for column in gorm_model_columns() {
                        table.push_column(column);
                    }
                    continue;
                }

                let mut tokens = line.split_whitespace();
                let (Some(field_name), Some(go_type)) = (tokens.next(), tokens.next()) else {
                    continue;
                };
                if go_type.starts_with('`') {
                    continue;
                }

                let target = go_type.trim_start_matches("[]").trim_start_matches('*');
                let is_slice = go_type.starts_with("[]");
                let exported = target.starts_with(|c: char| c.is_uppercase()) && !target.contains('.');
                if structs.contains(target) || (is_slice && exported) {
                    let id_field = format!("{}ID", field_name);
                    let kind = if is_slice {
                        "has_many"
                    } else if field_names.contains(id_field.as_str()) {
                        "belongs_to"
                    } else {
                        "has_one"
                    };
                    let line_no = count_lines_before(content, line_offset);
                    out.relate(kind, model, target, Some(field_name), rel, line_no);
                    if kind == "belongs_to" {
                        table.set_foreign_key(
                            &snake_case(&id_field),
                            &pluralize(&snake_case(target)),
                            Some("id"),
                        );
                    }
                    continue;
                }

                let settings = gorm_settings(line);
                let setting = |key: &str| {
                    settings
                        .iter()
                        .find(|(k, _)| k.eq_ignore_ascii_case(key))
                        .map(|(_, v)| v.as_str())
                };

                let column_name = setting("column")
                    .map(str::to_string)
                    .unwrap_or_else(|| snake_case(field_name));
                let data_type = setting("type").unwrap_or(go_type).to_string();

                let mut column = Column::new(column_name, data_type);
                column.max_length = setting("size").and_then(|v| v.parse().ok());
                column.default_value = setting("default").map(|v| strip_quotes(v).to_string());
                if setting("not null").is_some() {
                    column.is_nullable = false;
                }
                if setting("primaryKey").is_some()
                    || setting("primary_key").is_some()
                    || field_name == "ID"
                {
                    column.mark_primary();
                }
                table.push_column(column);
            }

            out.tables.push(table);
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn capture(re: &Option<Regex>, text: &str, group: &str) -> Option<String> {
    re.as_ref()?
        .captures(text)?
        .name(group)
        .map(|m| m.as_str().to_string())
}

/// Offset and text of the indented block opened by the line containing `decl_start`.
fn python_block(content: &str, decl_start: usize) -> (usize, &str) {
    let lines: Vec<&str> = content.split('\n').collect();
    let starts = line_starts(content);
    let idx = count_lines_before(content, decl_start) - 1;
    let end_idx = find_block_end(&lines, idx, true);

    let from = starts.get(idx).copied().unwrap_or(0);
    let to = starts.get(end_idx + 1).copied().unwrap_or(content.len());
    (from, &content[from..to])
}

/// Offset and inner text of the first `{...}` block at or after `from`.
fn brace_body(content: &str, from: usize) -> Option<(usize, &str)> {
    let open = from + content.get(from..)?.find('{')?;
    let close = matching_close(content, open).unwrap_or(content.len());
    Some((open + 1, &content[open + 1..close]))
}

/// Offset of the bracket closing the one at `open`, skipping quoted text.
fn matching_close(s: &str, open: usize) -> Option<usize> {
    let opener = s.get(open..)?.chars().next()?;
    let closer = match opener {
        '{' => '}',
        '(' => ')',
        '[' => ']',
        _ => return None,
    };

    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, ch) in s[open..].char_indices() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            c if c == opener => depth += 1,
            c if c == closer => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Curly-brace nesting depth at `pos` within `body`.
fn brace_depth(body: &str, pos: usize) -> i32 {
    let end = pos.min(body.len());
    body.get(..end)
        .map(|prefix| {
            prefix.chars().fold(0, |depth, ch| match ch {
                '{' => depth + 1,
                '}' => depth - 1,
                _ => depth,
            })
        })
        .unwrap_or(0)
}

/// Inner text of an object literal value following `key:` at `after_key`.
/// Array-wrapped objects (`[{ ... }]`) are looked through.
fn value_object(body: &str, after_key: usize) -> Option<&str> {
    let rest = body.get(after_key..)?;
    let value_start = rest.find(|c: char| !(c.is_whitespace() || c == ':'))?;
    let mut open = after_key + value_start;

    if body[open..].starts_with('[') {
        let inner = body[open + 1..].find(|c: char| !c.is_whitespace())?;
        open = open + 1 + inner;
    }
    if !body[open..].starts_with('{') {
        return None;
    }
    let close = matching_close(body, open)?;
    Some(&body[open + 1..close])
}

/// Value of `key=...` or `key: ...` in a top-level argument list.
fn keyword_arg(args: &str, key: &str) -> Option<String> {
    split_top_level(args, ',').into_iter().find_map(|part| {
        let split = part.find(|c: char| c == '=' || c == ':')?;
        let (k, v) = part.split_at(split);
        (k.trim() == key).then(|| v[1..].trim().to_string())
    })
}

fn is_keyword_part(part: &str) -> bool {
    part.split_once(|c: char| c == '=' || c == ':')
        .map(|(k, _)| {
            let k = k.trim();
            !k.is_empty() && k.chars().all(|c| c.is_alphanumeric() || c == '_')
        })
        .unwrap_or(false)
}

fn positional_args(args: &str) -> Vec<String> {
    split_top_level(args, ',')
        .into_iter()
        .filter(|part| !is_keyword_part(part))
        .collect()
}

/// `db.String(120)` becomes (`String`, `Some(120)`).
fn split_type(arg: &str) -> (String, Option<u32>) {
    let (head, len) = match arg.split_once('(') {
        Some((head, rest)) => (
            head,
            rest.trim_end_matches(')')
                .split(',')
                .next()
                .and_then(|n| n.trim().parse().ok()),
        ),
        None => (arg, None),
    };
    let name = head.rsplit('.').next().unwrap_or(head).trim().to_string();
    (name, len)
}

/// `id: Mapped[int] = mapped_column(...)` yields `int`.
fn mapped_annotation(declaration: &str) -> Option<String> {
    let head = &declaration[..declaration.find('=')?];
    let (_, annotation) = head.split_once(':')?;
    let annotation = annotation.trim();
    let inner = annotation
        .strip_prefix("Mapped[")
        .and_then(|a| a.strip_suffix(']'))
        .unwrap_or(annotation);
    (!inner.is_empty()).then(|| inner.to_string())
}

/// Argument text of `@Name(...)` in an annotation run.
fn annotation_args(annotations: &str, name: &str) -> Option<String> {
    let marker = format!("@{}(", name);
    let start = annotations.find(&marker)? + marker.len() - 1;
    let close = matching_close(annotations, start)?;
    Some(annotations[start + 1..close].to_string())
}

fn has_annotation(annotations: &str, name: &str) -> bool {
    let marker = format!("@{}", name);
    annotations.match_indices(&marker).any(|(i, _)| {
        annotations[i + marker.len()..]
            .chars()
            .next()
            .map(|c| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(true)
    })
}

/// `List<Order>` yields `Order`.
fn generic_argument(java_type: &str) -> Option<String> {
    let open = java_type.find('<')?;
    let close = java_type.rfind('>')?;
    let inner = java_type.get(open + 1..close)?.trim();
    (!inner.is_empty()).then(|| inner.rsplit(',').next().unwrap_or(inner).trim().to_string())
}

/// `key:value` pairs and bare flags of a field's `gorm:"..."` tag.
fn gorm_settings(line: &str) -> Vec<(String, String)> {
    let Some(start) = line.find("gorm:\"") else {
        return Vec::new();
    };
    let rest = &line[start + 6..];
    let tag = rest.split('"').next().unwrap_or("");

    tag.split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match s.split_once(':') {
            Some((k, v)) => (k.trim().to_string(), v.trim().to_string()),
            None => (s.to_string(), String::new()),
        })
        .collect()
}

fn gorm_model_columns() -> Vec<Column> {
    let mut id = Column::new("id", "uint");
    id.mark_primary();
    vec![
        id,
        Column::new("created_at", "time.Time"),
        Column::new("updated_at", "time.Time"),
        Column::new("deleted_at", "gorm.DeletedAt"),
    ]
}

/// Django app label: the package holding `models.py` or a `models/` package.
fn django_app_label(rel: &str) -> Option<String> {
    let mut parts: Vec<&str> = rel.split('/').collect();
    parts.pop();
    if parts.last() == Some(&"models") {
        parts.pop();
    }
    parts.last().map(|s| s.to_lowercase())
}

fn django_table(app: Option<&str>, model: &str) -> String {
    match app {
        Some(app) if !app.is_empty() => format!("{}_{}", app, model.to_lowercase()),
        _ => model.to_lowercase(),
    }
}

/// `userSchema` yields `User`.
fn model_from_schema_var(var: &str) -> String {
    let base = var
        .strip_suffix("Schema")
        .or_else(|| var.strip_suffix("schema"))
        .filter(|b| !b.is_empty())
        .unwrap_or(var);
    let mut chars = base.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `UserProfile` yields `user_profile`, `HTTPServer` yields `http_server`.
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let boundary = match i.checked_sub(1).map(|j| chars[j]) {
                Some(prev) if prev.is_lowercase() || prev.is_ascii_digit() => true,
                Some(prev) if prev.is_uppercase() => {
                    chars.get(i + 1).map(|n| n.is_lowercase()).unwrap_or(false)
                }
                _ => false,
            };
            if boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// English plural used by ORMs that derive table names from model names.
pub fn pluralize(word: &str) -> String {
    if word.ends_with('s') || word.ends_with('x') || word.ends_with("ch") || word.ends_with("sh") {
        return format!("{}es", word);
    }
    if let Some(stem) = word.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{}ies", stem);
        }
    }
    format!("{}s", word)
}
