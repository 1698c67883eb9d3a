//! Tables from SQL DDL scripts.

use regex::Regex;

use super::text::{compile, count_lines_before, strip_quotes};
use crate::model::{Column, Table, TableSource};
use crate::patterns::schema::{
    SQL_ALTER_FOREIGN_KEY, SQL_COLUMN, SQL_CONSTRAINT_ITEM, SQL_CREATE_TABLE, SQL_DEFAULT,
    SQL_FOREIGN_KEY, SQL_INLINE_PRIMARY, SQL_INLINE_REFERENCES, SQL_NAMED_INDEX, SQL_NOT_NULL,
    SQL_PRIMARY_KEY,
};

pub struct SqlExtractor {
    create_table: Option<Regex>,
    column: Option<Regex>,
    primary_key: Option<Regex>,
    foreign_key: Option<Regex>,
    inline_references: Option<Regex>,
    default: Option<Regex>,
    not_null: Option<Regex>,
    inline_primary: Option<Regex>,
    alter_foreign_key: Option<Regex>,
    constraint_item: Option<Regex>,
    named_index: Option<Regex>,
}

impl Default for SqlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SqlExtractor {
    pub fn new() -> Self {
        Self {
            create_table: compile(SQL_CREATE_TABLE),
            column: compile(SQL_COLUMN),
            primary_key: compile(SQL_PRIMARY_KEY),
            foreign_key: compile(SQL_FOREIGN_KEY),
            inline_references: compile(SQL_INLINE_REFERENCES),
            default: compile(SQL_DEFAULT),
            not_null: compile(SQL_NOT_NULL),
            inline_primary: compile(SQL_INLINE_PRIMARY),
            alter_foreign_key: compile(SQL_ALTER_FOREIGN_KEY),
            constraint_item: compile(SQL_CONSTRAINT_ITEM),
            named_index: compile(SQL_NAMED_INDEX),
        }
    }

    /// Tables declared in one script, in declaration order.
    ///
    /// `ALTER TABLE ... ADD FOREIGN KEY` statements apply to tables created
    /// earlier in the same script.
    pub fn extract(&self, rel: &str, content: &str) -> Vec<Table> {
        let Some(create_table) = &self.create_table else {
            return Vec::new();
        };

        // Offsets in `masked` line up with `content`.
        let masked = mask_comments(content);
        let mut tables = Vec::new();

        for cap in create_table.captures_iter(&masked) {
            let (Some(whole), Some(name)) = (cap.get(0), cap.name("name")) else {
                continue;
            };

            let body_start = whole.end();
            let body_end = closing_paren(&masked, body_start).unwrap_or(masked.len());
            let body = &masked[body_start..body_end];

            let mut table = Table::new(
                bare_name(name.as_str()),
                TableSource::Sql,
                rel,
                count_lines_before(content, whole.start()),
            );

            for item in split_definitions(body) {
                if self.is_constraint(&item) {
                    self.apply_constraint(&mut table, &item);
                } else if let Some(column) = self.parse_column(&item) {
                    table.push_column(column);
                }
            }

            tracing::debug!("{}: table {} ({} columns)", rel, table.name, table.columns.len());
            tables.push(table);
        }

        self.apply_alter_statements(&masked, &mut tables);
        tables
    }

    fn parse_column(&self, item: &str) -> Option<Column> {
        let cap = self.column.as_ref()?.captures(item)?;
        let name = cap.name("name")?.as_str();
        let data_type = cap.name("type")?.as_str();
        let rest = cap.name("rest").map(|m| m.as_str()).unwrap_or("");

        let mut column = Column::new(name, data_type);

        column.max_length = cap
            .name("len")
            .and_then(|len| len.as_str().split(',').next())
            .and_then(|first| first.trim().parse().ok());

        if self.matches(&self.not_null, rest) {
            column.is_nullable = false;
        }

        if let Some(value) = self
            .default
            .as_ref()
            .and_then(|re| re.captures(rest))
            .and_then(|c| c.name("value"))
        {
            column.default_value = Some(strip_quotes(value.as_str()).to_string());
        }

        if self.matches(&self.inline_primary, rest) {
            column.mark_primary();
        }

        if let Some(refs) = self
            .inline_references
            .as_ref()
            .and_then(|re| re.captures(rest))
        {
            if let Some(target) = refs.name("table") {
                let target_column = refs.name("col").map(|c| c.as_str().to_string());
                column.mark_foreign(bare_name(target.as_str()), target_column);
            }
        }

        Some(column)
    }

    fn apply_constraint(&self, table: &mut Table, item: &str) {
        if let Some(cap) = self.primary_key.as_ref().and_then(|re| re.captures(item)) {
            if let Some(cols) = cap.name("cols") {
                for col in column_list(cols.as_str()) {
                    table.set_primary_key(&col);
                }
            }
        }

        if let Some(cap) = self.foreign_key.as_ref().and_then(|re| re.captures(item)) {
            apply_foreign_key(
                table,
                cap.name("cols").map(|m| m.as_str()),
                cap.name("table").map(|m| m.as_str()),
                cap.name("refcols").map(|m| m.as_str()),
            );
        }
    }

    fn apply_alter_statements(&self, masked: &str, tables: &mut [Table]) {
        let Some(alter) = &self.alter_foreign_key else {
            return;
        };

        for cap in alter.captures_iter(masked) {
            let Some(name) = cap.name("table").map(|m| bare_name(m.as_str())) else {
                continue;
            };
            // Later definitions of a name win, so alter the last one.
            match tables.iter_mut().rev().find(|t| t.name == name) {
                Some(table) => apply_foreign_key(
                    table,
                    cap.name("cols").map(|m| m.as_str()),
                    cap.name("ref").map(|m| m.as_str()),
                    cap.name("refcols").map(|m| m.as_str()),
                ),
                None => tracing::debug!("ALTER TABLE on {} not created in this script", name),
            }
        }
    }

    /// Constraint, index or table option rather than a column definition.
    fn is_constraint(&self, item: &str) -> bool {
        if self.matches(&self.constraint_item, item) {
            return true;
        }
        self.named_index
            .as_ref()
            .and_then(|re| re.captures(item))
            .and_then(|cap| cap.name("cols"))
            .map(|cols| is_column_list(cols.as_str()))
            .unwrap_or(false)
    }

    fn matches(&self, re: &Option<Regex>, text: &str) -> bool {
        re.as_ref().map(|re| re.is_match(text)).unwrap_or(false)
    }
}

fn apply_foreign_key(
    table: &mut Table,
    cols: Option<&str>,
    target: Option<&str>,
    refcols: Option<&str>,
) {
    let (Some(cols), Some(target)) = (cols, target) else {
        return;
    };
    let target = bare_name(target);
    let refs = refcols.map(column_list).unwrap_or_default();

    for (i, col) in column_list(cols).iter().enumerate() {
        table.set_foreign_key(col, &target, refs.get(i).map(String::as_str));
    }
}

/// Last dotted segment with identifier quoting removed: `"public"."users"` is `users`.
fn bare_name(name: &str) -> String {
    let last = name.rsplit('.').next().unwrap_or(name);
    strip_quotes(last).to_string()
}

fn column_list(cols: &str) -> Vec<String> {
    cols.split(',')
        .map(strip_quotes)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// `email, name(10)` is a column list; `100` or `10,2` is a type length.
fn is_column_list(cols: &str) -> bool {
    cols.split(',').all(|col| {
        col.trim()
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || matches!(c, '_' | '`' | '"' | '['))
    })
}

/// Replace `--` and `/* */` comments with spaces, keeping newlines and byte offsets.
fn mask_comments(content: &str) -> String {
    fn blank(out: &mut String, ch: char) {
        if ch == '\n' {
            out.push('\n');
        } else {
            out.extend(std::iter::repeat(' ').take(ch.len_utf8()));
        }
    }

    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut quote: Option<char> = None;

    while let Some(ch) = chars.next() {
        if let Some(q) = quote {
            out.push(ch);
            if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '\'' | '"' | '`' => {
                quote = Some(ch);
                out.push(ch);
            }
            '-' if chars.peek() == Some(&'-') => {
                out.push(' ');
                while let Some(&next) = chars.peek() {
                    if next == '\n' {
                        break;
                    }
                    chars.next();
                    blank(&mut out, next);
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                out.push(' ');
                if let Some(star) = chars.next() {
                    blank(&mut out, star);
                }
                let mut prev = '\0';
                for next in chars.by_ref() {
                    blank(&mut out, next);
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            _ => out.push(ch),
        }
    }

    out
}

/// Offset of the `)` closing a parenthesis opened just before `from`.
fn closing_paren(s: &str, from: usize) -> Option<usize> {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;

    for (i, ch) in s.get(from..)?.char_indices() {
        if let Some(q) = quote {
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(from + i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split a table body on top-level commas, ignoring commas in parentheses
/// and quoted literals.
fn split_definitions(body: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut depth = 0i32;
    let mut quote: Option<char> = None;

    for ch in body.chars() {
        if let Some(q) = quote {
            current.push(ch);
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '\'' | '"' | '`' => quote = Some(ch),
            '(' => depth += 1,
            ')' => depth = (depth - 1).max(0),
            ',' if depth == 0 => {
                items.push(std::mem::take(&mut current));
                continue;
            }
            _ => {}
        }
        current.push(ch);
    }
    items.push(current);

    items
        .into_iter()
        .map(|item| item.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|item| !item.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_ddl() {
        let sql = "CREATE TABLE users (id INT PRIMARY KEY, email VARCHAR(255) NOT NULL)";
        let tables = SqlExtractor::new().extract("schema.sql", sql);

        assert_eq!(tables.len(), 1);
        let users = &tables[0];
        assert_eq!(users.name, "users");
        assert_eq!(users.columns.len(), 2);

        let id = users.column("id").unwrap();
        assert!(id.is_primary_key);
        assert!(!id.is_nullable);
        assert_eq!(id.data_type, "INT");

        let email = users.column("email").unwrap();
        assert!(!email.is_nullable);
        assert!(!email.is_primary_key);
        assert_eq!(email.max_length, Some(255));
        assert_eq!(users.primary_keys, vec!["id"]);
    }

    #[test]
    fn test_table_level_constraints_and_comments() {
        let sql = r#"-- orders, one per checkout
CREATE TABLE IF NOT EXISTS `orders` (
    `id` BIGINT NOT NULL, -- surrogate, (not natural)
    user_id INT REFERENCES users(id),
    total DECIMAL(10,2) DEFAULT '0.00',
    status VARCHAR(20) DEFAULT 'new' NOT NULL,
    /* composite, just in case */
    PRIMARY KEY (`id`),
    CONSTRAINT fk_coupon FOREIGN KEY (coupon_id) REFERENCES coupons (code)
);
"#;
        let tables = SqlExtractor::new().extract("db/orders.sql", sql);
        assert_eq!(tables.len(), 1);
        let orders = &tables[0];
        assert_eq!(orders.name, "orders");
        assert_eq!(orders.line, 2);
        assert_eq!(
            orders.columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["id", "user_id", "total", "status"]
        );

        assert!(orders.column("id").unwrap().is_primary_key);
        let user_id = orders.column("user_id").unwrap();
        assert!(user_id.is_foreign_key);
        assert_eq!(user_id.foreign_table.as_deref(), Some("users"));
        assert_eq!(user_id.foreign_column.as_deref(), Some("id"));

        let total = orders.column("total").unwrap();
        assert_eq!(total.max_length, Some(10));
        assert_eq!(total.default_value.as_deref(), Some("0.00"));
        assert_eq!(orders.column("status").unwrap().default_value.as_deref(), Some("new"));

        assert_eq!(
            orders.foreign_keys.get("coupon_id").map(String::as_str),
            Some("coupons.code")
        );
    }

    #[test]
    fn test_columns_named_like_keywords() {
        let sql = "CREATE TABLE settings (key VARCHAR(100) PRIMARY KEY, value TEXT, period INT, check_in DATE)";
        let tables = SqlExtractor::new().extract("schema.sql", sql);
        let settings = &tables[0];
        assert_eq!(
            settings.columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["key", "value", "period", "check_in"]
        );
        assert_eq!(settings.primary_keys, vec!["key"]);
        assert_eq!(settings.column("key").unwrap().max_length, Some(100));
    }

    #[test]
    fn test_index_and_check_items_are_not_columns() {
        let sql = r#"CREATE TABLE accounts (
    id INT NOT NULL,
    email VARCHAR(255),
    `unique` BOOLEAN,
    PRIMARY KEY (id),
    UNIQUE KEY uq_email (email),
    KEY idx_email (email(20)),
    INDEX (`unique`),
    UNIQUE (email),
    CHECK (id > 0),
    CONSTRAINT positive CHECK (id > 0)
)"#;
        let tables = SqlExtractor::new().extract("accounts.sql", sql);
        let accounts = &tables[0];
        assert_eq!(
            accounts.columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
            vec!["id", "email", "unique"]
        );
        assert_eq!(accounts.primary_keys, vec!["id"]);
    }

    #[test]
    fn test_alter_table_foreign_key() {
        let sql = r#"CREATE TABLE posts (id SERIAL PRIMARY KEY, author_id INT);
ALTER TABLE ONLY public.posts ADD CONSTRAINT posts_author FOREIGN KEY (author_id) REFERENCES public.users(id);
ALTER TABLE missing ADD FOREIGN KEY (x) REFERENCES y(z);
"#;
        let tables = SqlExtractor::new().extract("migrate.sql", sql);
        let author = tables[0].column("author_id").unwrap();
        assert!(author.is_foreign_key);
        assert_eq!(author.foreign_table.as_deref(), Some("users"));
    }

    #[test]
    fn test_truncated_ddl_never_panics() {
        let extractor = SqlExtractor::new();
        let tables = extractor.extract("bad.sql", "CREATE TABLE t (a INT, b VARCHAR(");
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].column("a").map(|c| c.data_type.as_str()), Some("INT"));

        assert!(extractor.extract("empty.sql", "").is_empty());
        assert!(extractor.extract("odd.sql", "/* unterminated CREATE TABLE x (").is_empty());
    }

    #[test]
    fn test_mask_comments_keeps_offsets() {
        let sql = "a -- é\nb /* x\ny */ c 'it''s -- not'";
        let masked = mask_comments(sql);
        assert_eq!(masked.len(), sql.len());
        assert_eq!(masked.matches('\n').count(), 2);
        assert!(masked.contains("'it''s -- not'"));
        assert!(!masked.contains('é'));
    }
}
