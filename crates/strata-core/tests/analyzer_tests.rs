use std::fs;
use std::path::Path;

use strata_core::model::{HttpMethod, Language};
use strata_core::{Analyzer, ApiAnalysis, ArtifactStore, CodeAnalysis, Config, DatabaseAnalysis, FileStore};
use tempfile::TempDir;

fn write(root: &Path, rel: &str, contents: impl AsRef<[u8]>) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn analyzer() -> Analyzer {
    Analyzer::new(Config::default())
}

fn python_fixture() -> TempDir {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "app/views.py",
        r#"from flask import Flask
from app.services import UserService

app = Flask(__name__)

@app.route('/users', methods=['GET', 'POST'])
def users():
    if len(name) > 40:
        raise ValueError("name too long")
    return UserService().list()
"#,
    );
    write(
        temp.path(),
        "app/services.py",
        "class UserService(BaseModel):\n    def list(self):\n        return []\n",
    );
    write(
        temp.path(),
        "db/schema.sql",
        "CREATE TABLE users (id INT PRIMARY KEY, email VARCHAR(255) NOT NULL);\n",
    );
    write(temp.path(), "node_modules/pkg/index.py", "class Hidden:\n    pass\n");
    write(temp.path(), "vendor/lib/helpers.py", "def hidden():\n    pass\n");
    temp
}

#[test]
fn test_excluded_directories_never_become_modules() {
    let temp = python_fixture();
    let model = analyzer().analyze(temp.path()).unwrap();

    let paths: Vec<&str> = model.modules.keys().map(String::as_str).collect();
    assert_eq!(paths, vec!["app/services.py", "app/views.py"]);
}

#[test]
fn test_full_pipeline_is_idempotent() {
    let temp = python_fixture();
    let out = TempDir::new().unwrap();

    let first = analyzer().analyze(temp.path()).unwrap();
    let second = analyzer().analyze(temp.path()).unwrap();
    assert_eq!(first, second);

    let run = |dir: &str, model: &strata_core::RepositoryModel| {
        let store = FileStore::new(out.path().join(dir));
        let code = store.save_json("code.json", &CodeAnalysis::from_model(model)).unwrap();
        let db = store.save_json("db.json", &DatabaseAnalysis::from_model(model)).unwrap();
        let api = store.save_json("api.json", &ApiAnalysis::from_model(model)).unwrap();
        (fs::read(code).unwrap(), fs::read(db).unwrap(), fs::read(api).unwrap())
    };
    assert_eq!(run("first", &first), run("second", &second));
}

#[test]
fn test_module_dependencies_resolve_across_files() {
    let temp = python_fixture();
    let model = analyzer().analyze(temp.path()).unwrap();

    let views = &model.modules["app/views.py"];
    assert!(views.dependencies.contains("app/services.py"));
    assert!(!views.dependencies.contains("app/views.py"));
}

#[test]
fn test_same_endpoint_from_two_frameworks_is_recorded_once() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "routes/users.js",
        r#"const express = require('express');
const router = express.Router();

router.get('/users', listUsers);
"#,
    );
    write(
        temp.path(),
        "src/users.controller.ts",
        r#"import { Controller, Get } from '@nestjs/common';

@Controller('users')
export class UsersController {
  @Get()
  findAll() {}
}
"#,
    );

    let model = analyzer().analyze(temp.path()).unwrap();
    assert_eq!(model.profile.language, Language::JavaScript);

    let gets: Vec<_> = model
        .endpoints
        .iter()
        .filter(|e| e.method == HttpMethod::Get && e.path == "/users")
        .collect();
    assert_eq!(gets.len(), 1);
    assert_eq!(gets[0].module, "routes/users.js");
}

#[test]
fn test_language_tie_resolves_by_priority() {
    let temp = TempDir::new().unwrap();
    write(temp.path(), "a.py", "x = 1\n");
    write(temp.path(), "b.py", "y = 2\n");
    write(temp.path(), "main.go", "package main\n");
    write(temp.path(), "util.go", "package main\n");

    for _ in 0..3 {
        let model = analyzer().analyze(temp.path()).unwrap();
        assert_eq!(model.profile.language, Language::Python);
    }
}

#[test]
fn test_ddl_columns() {
    let temp = python_fixture();
    let model = analyzer().analyze(temp.path()).unwrap();

    let users = &model.tables["users"];
    assert_eq!(users.columns.len(), 2);

    let id = users.column("id").unwrap();
    assert!(id.is_primary_key);
    assert!(!id.is_nullable);

    let email = users.column("email").unwrap();
    assert!(!email.is_nullable);
    assert_eq!(email.max_length, Some(255));
}

#[test]
fn test_service_extending_model_carries_both_flags() {
    let temp = python_fixture();
    let model = analyzer().analyze(temp.path()).unwrap();

    let class = &model.modules["app/services.py"].classes[0];
    assert_eq!(class.name, "UserService");
    assert!(class.is_service);
    assert!(class.is_model);
    assert!(!class.is_handler);

    let report = CodeAnalysis::from_model(&model);
    assert_eq!(report.summary.services, 1);
    assert_eq!(report.summary.models, 1);
}

#[test]
fn test_routes_and_rules_are_recovered() {
    let temp = python_fixture();
    let model = analyzer().analyze(temp.path()).unwrap();

    let routes: Vec<(HttpMethod, &str)> =
        model.endpoints.iter().map(|e| (e.method, e.path.as_str())).collect();
    assert_eq!(routes, vec![(HttpMethod::Get, "/users"), (HttpMethod::Post, "/users")]);
    assert!(model.business_rules.iter().any(|r| r.module == "app/views.py"));
}

#[test]
fn test_malformed_inputs_never_abort_the_run() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "app.py",
        b"def broken(:\n    s = 'unterminated\n\xff\xfe\n@app.route('/us".as_slice(),
    );
    write(temp.path(), "models.py", "class Order(models.Model:\n    total = models.DecimalField(max_digits=");
    write(temp.path(), "schema.sql", "CREATE TABLE t (a INT, b VARCHAR(");
    write(temp.path(), "openapi.json", "{");
    write(temp.path(), "package.json", "{ not json");

    let model = analyzer().analyze(temp.path()).unwrap();

    assert!(model.modules.contains_key("app.py"));
    assert!(model.modules.contains_key("models.py"));
    assert!(model.warnings.iter().any(|w| w.path == "openapi.json"));
    assert!(model.warnings.iter().any(|w| w.path == "package.json"));
    assert!(!model.truncated);
}

#[test]
fn test_empty_repository_has_nothing_to_report() {
    let temp = TempDir::new().unwrap();
    let model = analyzer().analyze(temp.path()).unwrap();

    assert_eq!(model.profile.language, Language::Unknown);
    assert!(model.modules.is_empty());
    assert!(DatabaseAnalysis::from_model(&model).is_empty());
    assert!(ApiAnalysis::from_model(&model).is_empty());
}
