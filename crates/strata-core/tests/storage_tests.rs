use std::fs;

use strata_core::config::{
    API_ANALYSIS_FILE, CODE_ANALYSIS_FILE, DATABASE_ANALYSIS_FILE, REQUIREMENTS_FILE,
};
use strata_core::{
    Analyzer, ApiAnalysis, ArtifactStore, CodeAnalysis, Config, DatabaseAnalysis, FileStore,
    RequirementsDoc,
};
use tempfile::TempDir;

fn analyzed_repo() -> (TempDir, strata_core::RepositoryModel) {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("server.js"),
        r#"const express = require('express');
const app = express();

app.get('/orders', listOrders);
app.post('/orders', createOrder);
"#,
    )
    .unwrap();
    fs::write(
        temp.path().join("schema.sql"),
        "CREATE TABLE orders (id INT PRIMARY KEY, total DECIMAL(10,2));\n",
    )
    .unwrap();
    let model = Analyzer::new(Config::default()).analyze(temp.path()).unwrap();
    (temp, model)
}

#[test]
fn test_save_and_load_analyses() {
    let (_repo, model) = analyzed_repo();
    let out = TempDir::new().unwrap();
    let store = FileStore::new(out.path().join("analysis"));

    let code = CodeAnalysis::from_model(&model);
    let database = DatabaseAnalysis::from_model(&model);
    let api = ApiAnalysis::from_model(&model);
    store.save_json(CODE_ANALYSIS_FILE, &code).unwrap();
    store.save_json(DATABASE_ANALYSIS_FILE, &database).unwrap();
    store.save_json(API_ANALYSIS_FILE, &api).unwrap();

    assert_eq!(store.load_code_analysis().unwrap(), Some(code));
    assert_eq!(store.load_database_analysis().unwrap(), Some(database));
    assert_eq!(store.load_api_analysis().unwrap(), Some(api));
}

#[test]
fn test_requirements_from_partial_artifacts() {
    let (_repo, model) = analyzed_repo();
    let out = TempDir::new().unwrap();
    let store = FileStore::new(out.path());

    store
        .save_json(API_ANALYSIS_FILE, &ApiAnalysis::from_model(&model))
        .unwrap();

    let doc = RequirementsDoc::new(
        store.load_code_analysis().unwrap(),
        store.load_database_analysis().unwrap(),
        store.load_api_analysis().unwrap(),
    );
    assert!(doc.has_inputs());

    let path = store.save_markdown(REQUIREMENTS_FILE, &doc.to_markdown()).unwrap();
    let md = fs::read_to_string(path).unwrap();
    assert!(md.contains("### 2.1 `/orders` module"));
    assert!(md.contains("`GET /orders`"));
    assert!(md.contains("`POST /orders`"));
    assert!(md.contains("_No code analysis detected._"));
    assert!(md.contains("_No tables detected._"));
}

#[test]
fn test_markdown_reports_for_model() {
    let (_repo, model) = analyzed_repo();

    let database = DatabaseAnalysis::from_model(&model);
    assert!(database.data_dictionary().contains("| total | DECIMAL | yes | no | no |  | 10 |"));
    assert!(database.erd_markdown().contains("```mermaid\nerDiagram\n"));

    let api = ApiAnalysis::from_model(&model).to_markdown();
    assert!(api.contains("## /orders"));
    assert!(api.contains("| GET | `/orders` |"));
}
