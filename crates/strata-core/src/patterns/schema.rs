//! Schema patterns: SQL DDL, Prisma and ORM model declarations.

use crate::model::Language;

// =============================================================================
// SQL
// =============================================================================

/// `CREATE TABLE` header up to and including the opening parenthesis.
pub const SQL_CREATE_TABLE: &str = r#"(?i)\bCREATE\s+(?:(?:GLOBAL\s+|LOCAL\s+)?(?:TEMPORARY|TEMP)\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(?P<name>(?:[`"\[]?\w+[`"\]]?\.)?[`"\[]?\w+[`"\]]?)\s*\("#;

/// One column definition inside a table body.
pub const SQL_COLUMN: &str = r#"(?s)^[`"\[]?(?P<name>\w+)[`"\]]?\s+(?P<type>[A-Za-z_]\w*(?:\s+(?:VARYING|PRECISION|UNSIGNED|varying|precision|unsigned))?)(?:\s*\((?P<len>[^)]*)\))?(?P<rest>.*)$"#;

pub const SQL_PRIMARY_KEY: &str = r#"(?i)PRIMARY\s+KEY\s*\((?P<cols>[^)]+)\)"#;

pub const SQL_FOREIGN_KEY: &str = r#"(?i)FOREIGN\s+KEY\s*\((?P<cols>[^)]+)\)\s*REFERENCES\s+(?P<table>[`"\[]?[\w.]+[`"\]]?)\s*(?:\((?P<refcols>[^)]+)\))?"#;

pub const SQL_INLINE_REFERENCES: &str = r#"(?i)\bREFERENCES\s+(?P<table>[`"\[]?[\w.]+[`"\]]?)\s*(?:\(\s*[`"\[]?(?P<col>\w+)[`"\]]?\s*\))?"#;

pub const SQL_DEFAULT: &str = r#"(?i)\bDEFAULT\s+(?P<value>'(?:[^']|'')*'|"[^"]*"|\([^)]*\)|[^\s,]+)"#;

pub const SQL_NOT_NULL: &str = r#"(?i)\bNOT\s+NULL\b"#;

pub const SQL_INLINE_PRIMARY: &str = r#"(?i)\bPRIMARY\s+KEY\b"#;

/// `ALTER TABLE x ADD [CONSTRAINT c] FOREIGN KEY (...) REFERENCES y(...)`.
pub const SQL_ALTER_FOREIGN_KEY: &str = r#"(?is)\bALTER\s+TABLE\s+(?:ONLY\s+)?(?:IF\s+EXISTS\s+)?(?P<table>[`"\[]?[\w.]+[`"\]]?)\s+ADD\s+(?:CONSTRAINT\s+[`"\[]?\w+[`"\]]?\s+)?FOREIGN\s+KEY\s*\((?P<cols>[^)]+)\)\s*REFERENCES\s+(?P<ref>[`"\[]?[\w.]+[`"\]]?)\s*(?:\((?P<refcols>[^)]+)\))?"#;

/// Body items that are constraints, indexes or table options rather than
/// columns. Only multi-word forms count, so a column may be named `key`.
pub const SQL_CONSTRAINT_ITEM: &str = r#"(?i)^(?:CONSTRAINT\s|PRIMARY\s+KEY\b|FOREIGN\s+KEY\b|CHECK\s*\(|(?:UNIQUE|KEY|INDEX|FULLTEXT|SPATIAL)\s*\(|(?:UNIQUE|FULLTEXT|SPATIAL)\s+(?:KEY|INDEX)\b|EXCLUDE\s+(?:USING\b|\()|PERIOD\s+FOR\b|LIKE\s+[`"\[]?[\w.]+[`"\]]?(?:\s+(?:INCLUDING|EXCLUDING)\s+\w+)*$)"#;

/// Named index such as `KEY idx_email (email)`. A column like
/// `key VARCHAR(100)` has the same shape, so the parenthesized list must
/// hold column names rather than a length.
pub const SQL_NAMED_INDEX: &str = r#"(?i)^(?:KEY|INDEX|UNIQUE)\s+[`"\[]?\w+[`"\]]?\s*\((?P<cols>[^)]*)\)"#;

// =============================================================================
// PRISMA
// =============================================================================

pub const PRISMA_MODEL: &str = r#"(?m)^[ \t]*model\s+(?P<name>\w+)\s*\{(?P<body>[^}]*)\}"#;

pub const PRISMA_FIELD: &str = r#"^(?P<name>\w+)\s+(?P<type>\w+)(?P<modifier>\[\]|\?)?(?P<attrs>.*)$"#;

pub const PRISMA_DEFAULT: &str = r#"@default\((?P<value>(?:[^()]|\([^()]*\))*)\)"#;

pub const PRISMA_DB_LENGTH: &str = r#"@db\.\w+\(\s*(?P<len>\d+)"#;

pub const PRISMA_RELATION: &str = r#"@relation\((?P<args>[^)]*)\)"#;

pub const PRISMA_RELATION_FIELDS: &str = r#"fields\s*:\s*\[(?P<list>[^\]]*)\]"#;

pub const PRISMA_RELATION_REFERENCES: &str = r#"references\s*:\s*\[(?P<list>[^\]]*)\]"#;

pub const PRISMA_COMPOSITE_ID: &str = r#"@@id\(\s*(?:fields\s*:\s*)?\[(?P<list>[^\]]*)\]"#;

pub const PRISMA_MAP: &str = r#"@@map\(\s*"(?P<name>[^"]+)""#;

// =============================================================================
// ORM
// =============================================================================

/// ORM family a model pattern set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrmFramework {
    SqlAlchemy,
    Django,
    Sequelize,
    Mongoose,
    TypeOrm,
    Jpa,
    Gorm,
}

impl OrmFramework {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SqlAlchemy => "SQLAlchemy",
            Self::Django => "Django",
            Self::Sequelize => "Sequelize",
            Self::Mongoose => "Mongoose",
            Self::TypeOrm => "TypeORM",
            Self::Jpa => "JPA",
            Self::Gorm => "GORM",
        }
    }

    pub fn signatures(&self) -> &'static [&'static str] {
        match self {
            Self::SqlAlchemy => &[
                "from sqlalchemy",
                "import sqlalchemy",
                "declarative_base",
                "DeclarativeBase",
                "flask_sqlalchemy",
                "db.Model",
            ],
            Self::Django => &["from django.db import models", "models.Model"],
            Self::Sequelize => &["sequelize", "Sequelize", "DataTypes"],
            Self::Mongoose => &["mongoose", "new Schema"],
            Self::TypeOrm => &["typeorm", "@Entity("],
            Self::Jpa => &["javax.persistence", "jakarta.persistence", "@Entity"],
            Self::Gorm => &["gorm.io/gorm", "jinzhu/gorm", "gorm.Model", "gorm:\""],
        }
    }

    /// Frameworks tried for a language. The generic languages try them all.
    pub fn for_language(language: Language) -> &'static [OrmFramework] {
        match language {
            Language::Python => &[Self::SqlAlchemy, Self::Django],
            Language::JavaScript | Language::TypeScript => {
                &[Self::Sequelize, Self::Mongoose, Self::TypeOrm]
            }
            Language::Java => &[Self::Jpa],
            Language::Go => &[Self::Gorm],
            Language::CSharp | Language::Php | Language::Ruby | Language::Unknown => &[
                Self::SqlAlchemy,
                Self::Django,
                Self::Sequelize,
                Self::Mongoose,
                Self::TypeOrm,
                Self::Jpa,
                Self::Gorm,
            ],
        }
    }
}

/// Django: `class X(models.Model):`
pub const DJANGO_MODEL: &str = r#"(?m)^class\s+(?P<name>\w+)\s*\([^)]*models\.Model[^)]*\)\s*:"#;

/// Django: `name = models.CharField(max_length=100, null=True)`
pub const DJANGO_FIELD: &str = r#"(?m)^[ \t]+(?P<name>\w+)\s*=\s*models\.(?P<type>\w+)\s*\((?P<args>[^)]*)\)"#;

/// `class Meta: db_table = "shop_items"`
pub const DJANGO_DB_TABLE: &str = r#"\bdb_table\s*=\s*['"](?P<name>[^'"]+)['"]"#;

/// SQLAlchemy: `class X(Base):` / `class X(db.Model):`
pub const SQLALCHEMY_MODEL: &str = r#"(?m)^class\s+(?P<name>\w+)\s*\((?P<bases>[^)]*)\)\s*:"#;

pub const SQLALCHEMY_TABLENAME: &str = r#"__tablename__\s*=\s*['"](?P<name>[^'"]+)['"]"#;

/// `id = Column(Integer, primary_key=True)` and `db.Column(...)`, `mapped_column(...)`.
pub const SQLALCHEMY_COLUMN: &str = r#"(?m)^[ \t]+(?P<name>\w+)\s*(?::\s*[^=\n]+)?=\s*(?:db\.|sa\.)?(?:Column|mapped_column)\s*\((?P<args>[^\n]*)\)"#;

pub const SQLALCHEMY_RELATIONSHIP: &str = r#"(?m)^[ \t]+(?P<field>\w+)\s*(?::\s*[^=\n]+)?=\s*(?:db\.|sa\.)?relationship\s*\(\s*['"]?(?P<target>\w+)"#;

pub const SQLALCHEMY_FOREIGN_KEY: &str = r#"ForeignKey\s*\(\s*['"](?P<table>\w+)\.(?P<col>\w+)['"]"#;

/// Sequelize: `sequelize.define('User', { ... })`
pub const SEQUELIZE_DEFINE: &str = r#"\.define\s*\(\s*['"](?P<name>\w+)['"]\s*,\s*\{"#;

/// Sequelize: `User.init({ ... })`
pub const SEQUELIZE_INIT: &str = r#"\b(?P<name>[A-Z]\w*)\.init\s*\(\s*\{"#;

pub const SEQUELIZE_TABLE_NAME: &str = r#"tableName\s*:\s*['"](?P<name>[^'"]+)['"]"#;

/// `email: { type: DataTypes.STRING(255), allowNull: false }` or `email: DataTypes.STRING`.
pub const SEQUELIZE_FIELD: &str = r#"(?m)^[ \t]*(?P<name>\w+)\s*:\s*(?:\{[^}]*?\btype\s*:\s*)?(?:DataTypes|Sequelize)\.(?P<type>\w+)(?:\s*\(\s*(?P<len>\d+))?"#;

pub const SEQUELIZE_ASSOCIATION: &str = r#"\b(?P<from>[A-Z]\w*)\.(?P<kind>belongsTo|hasMany|hasOne|belongsToMany)\s*\(\s*(?:models\.)?(?P<to>[A-Z]\w*)"#;

/// Mongoose: `const userSchema = new Schema({` / `new mongoose.Schema({`
pub const MONGOOSE_SCHEMA: &str = r#"\b(?P<var>\w+)\s*=\s*new\s+(?:mongoose\.)?Schema\s*\(\s*\{"#;

/// `mongoose.model('User', userSchema)`
pub const MONGOOSE_MODEL: &str = r#"\bmodel\s*(?:<[^>]*>)?\s*\(\s*['"](?P<name>\w+)['"]\s*,\s*(?P<var>\w+)"#;

pub const MONGOOSE_FIELD: &str = r#"(?m)^[ \t]*(?P<name>\w+)\s*:\s*(?:\{[^}]*?\btype\s*:\s*)?\[?\s*(?:(?:mongoose\.)?Schema\.Types\.)?(?P<type>String|Number|Date|Boolean|Buffer|ObjectId|Mixed|Array|Map|Decimal128)\b"#;

pub const MONGOOSE_REF: &str = r#"(?m)^[ \t]*(?P<field>\w+)\s*:\s*\[?\s*\{[^}]*?\bref\s*:\s*['"](?P<target>\w+)['"]"#;

/// TypeORM: `@Entity('users') export class User {`
pub const TYPEORM_ENTITY: &str = r#"@Entity\s*\(\s*(?:['"](?P<table>[^'"]+)['"])?[^)]*\)\s*(?:export\s+)?(?:default\s+)?class\s+(?P<name>\w+)"#;

/// `@Column(...) name: string;` and primary / generated column variants.
pub const TYPEORM_COLUMN: &str = r#"@(?P<decorator>PrimaryGeneratedColumn|PrimaryColumn|Column|CreateDateColumn|UpdateDateColumn)\s*\((?P<args>[^)]*)\)\s*(?P<name>\w+)[?!]?\s*:\s*(?P<type>[\w\[\]<>]+)"#;

pub const TYPEORM_RELATION: &str = r#"@(?P<kind>OneToOne|OneToMany|ManyToOne|ManyToMany)\s*\(\s*\(\s*\)\s*=>\s*(?P<target>\w+)[^)]*\)[^\n]*\n?\s*(?:@\w+\([^)]*\)\s*)*(?P<field>\w+)[?!]?\s*:"#;

/// JPA: `@Entity ... @Table(name = "users") ... class User`
pub const JPA_ENTITY: &str = r#"@Entity\b(?P<between>(?s:.*?))\bclass\s+(?P<name>\w+)"#;

pub const JPA_TABLE_NAME: &str = r#"@Table\s*\(\s*name\s*=\s*"(?P<name>[^"]+)""#;

/// A field with its annotation run: `@Id @Column(length = 50) private String code;`
pub const JPA_FIELD: &str = r#"(?P<annotations>(?:@\w+(?:\([^)]*\))?\s*)*)(?:private|protected|public)\s+(?P<type>[\w.<>]+)\s+(?P<name>\w+)\s*(?:=[^;]*)?;"#;

pub const JPA_RELATION: &str = r#"@(?P<kind>OneToOne|OneToMany|ManyToOne|ManyToMany)\b"#;

/// GORM: `type User struct { gorm.Model ... }` with gorm tags.
pub const GORM_MODEL: &str = r#"(?m)^type\s+(?P<name>\w+)\s+struct\s*\{(?P<body>[^}]*)\}"#;

pub const GORM_TABLE_NAME: &str = r#"func\s*\(\s*\w*\s*\*?(?P<model>\w+)\s*\)\s*TableName\s*\(\s*\)\s*string\s*\{\s*return\s*"(?P<name>[^"]+)""#;
