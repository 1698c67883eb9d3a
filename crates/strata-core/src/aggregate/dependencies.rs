//! Approximate module dependency resolution.
//!
//! An import references a module when the normalized import is a substring
//! of the module's extension-less path, or the other way round. This is a
//! deliberately loose match: false positives are accepted.

use std::collections::{BTreeMap, BTreeSet};

use crate::model::Module;

const RELATIVE_PREFIXES: &[&str] = &["./", "../", "@/", "~/"];

/// Normalize a raw import target into a `/`-separated fragment.
///
/// `app.models` becomes `app/models`, `../lib/db.js` becomes `lib/db`.
pub fn normalize_import(raw: &str) -> String {
    let mut import = raw.trim().trim_matches(|c| matches!(c, '"' | '\'' | '`' | '<' | '>'));

    loop {
        match RELATIVE_PREFIXES.iter().find(|p| import.starts_with(*p)) {
            Some(prefix) => import = &import[prefix.len()..],
            None => break,
        }
    }
    import = import.trim_start_matches('.');

    let mut normalized = if import.contains('/') {
        strip_extension(import).to_string()
    } else {
        import.replace(['.', '\\'], "/")
    };
    normalized = normalized.trim_matches('/').to_string();
    normalized
}

fn strip_extension(path: &str) -> &str {
    match path.rsplit_once('.') {
        Some((stem, ext)) if !ext.contains('/') && !stem.is_empty() => stem,
        _ => path,
    }
}

/// Whether an import plausibly references the module at `module_path`.
pub fn import_matches(import: &str, module_path: &str) -> bool {
    let module = strip_extension(module_path);
    if import.is_empty() || module.is_empty() {
        return false;
    }
    module.contains(import) || import.contains(module)
}

/// Fill every module's `dependencies` from its imports.
pub fn resolve_dependencies(modules: &mut BTreeMap<String, Module>) {
    let paths: Vec<String> = modules.keys().cloned().collect();

    let resolved: Vec<(String, BTreeSet<String>)> = modules
        .values()
        .map(|module| {
            let imports: Vec<String> = module
                .imports
                .iter()
                .map(|i| normalize_import(i))
                .filter(|i| !i.is_empty())
                .collect();

            let deps = paths
                .iter()
                .filter(|path| **path != module.path)
                .filter(|path| imports.iter().any(|import| import_matches(import, path)))
                .cloned()
                .collect();
            (module.path.clone(), deps)
        })
        .collect();

    let mut edges = 0;
    for (path, deps) in resolved {
        edges += deps.len();
        if let Some(module) = modules.get_mut(&path) {
            module.dependencies = deps;
        }
    }
    tracing::debug!("Resolved {} dependency edges", edges);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_import() {
        assert_eq!(normalize_import("app.models"), "app/models");
        assert_eq!(normalize_import("'../lib/db.js'"), "lib/db");
        assert_eq!(normalize_import("./utils"), "utils");
        assert_eq!(normalize_import("..services"), "services");
        assert_eq!(normalize_import("@/components/Button.vue"), "components/Button");
        assert_eq!(normalize_import("com.example.service.UserService"), "com/example/service/UserService");
        assert_eq!(normalize_import("."), "");
    }

    #[test]
    fn test_match_is_substring_either_way() {
        assert!(import_matches("app/models", "app/models.py"));
        assert!(import_matches("lib/db", "src/lib/db.js"));
        assert!(import_matches("src/lib/db/index", "lib/db.js"));
        assert!(!import_matches("users", "src/orders.js"));
        assert!(!import_matches("", "src/orders.js"));
    }

    #[test]
    fn test_resolve_dependencies() {
        let mut modules = BTreeMap::new();
        let mut views = Module::new("app/views.py", "h1");
        views.imports = vec!["app.models".to_string(), "django.http".to_string()];
        modules.insert(views.path.clone(), views);
        modules.insert("app/models.py".to_string(), Module::new("app/models.py", "h2"));

        resolve_dependencies(&mut modules);

        let deps: Vec<&str> = modules["app/views.py"]
            .dependencies
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(deps, vec!["app/models.py"]);
        assert!(modules["app/models.py"].dependencies.is_empty());
    }
}
