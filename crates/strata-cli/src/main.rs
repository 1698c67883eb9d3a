use clap::{ArgGroup, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use strata_core::config::{
    API_ANALYSIS_FILE, API_DOC_FILE, CODE_ANALYSIS_FILE, DATABASE_ANALYSIS_FILE, DATA_DICTIONARY_FILE,
    ERD_FILE, REQUIREMENTS_FILE, STRUCTURE_REPORT_FILE,
};
use strata_core::{
    recommend, AnalysisError, Analyzer, ApiAnalysis, ArtifactStore, CodeAnalysis, Config,
    DatabaseAnalysis, FileStore, ProjectRequirements, RepositoryModel, RequirementsDoc,
};

/// Exit status for a missing or invalid input path.
const EXIT_BAD_INPUT: u8 = 1;
/// Exit status when no artifacts of the requested kind were found.
const EXIT_NOTHING_FOUND: u8 = 2;

#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Recover modules, routes, tables and business rules from an unbuilt repository", long_about = None)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract modules, classes, functions and business rule candidates
    Code {
        /// Repository to analyze
        path: PathBuf,
        /// Output directory (defaults to the configured one)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract tables, columns and model relationships
    Database {
        path: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Extract HTTP endpoints and external API calls
    Api {
        path: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Run every facet and write the requirements document
    All {
        path: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Stitch previously written analyses into a requirements document
    Requirements {
        /// Directory holding the JSON analyses
        analysis_dir: PathBuf,
        /// Output directory (defaults to the analysis directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Rank technology stacks for a set of project requirements
    #[command(group(ArgGroup::new("input").required(true).args(["requirements", "infer"])))]
    Advise {
        /// Requirements JSON file
        requirements: Option<PathBuf>,
        /// Infer requirements from the repository at this path instead
        #[arg(long, value_name = "PATH")]
        infer: Option<PathBuf>,
        /// Print the ranking as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the default configuration
    Config,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Facet {
    Code,
    Database,
    Api,
    All,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_BAD_INPUT);
        }
    };

    match cli.command {
        Commands::Code { path, output } => run_facet(config, Facet::Code, &path, output),
        Commands::Database { path, output } => run_facet(config, Facet::Database, &path, output),
        Commands::Api { path, output } => run_facet(config, Facet::Api, &path, output),
        Commands::All { path, output } => run_facet(config, Facet::All, &path, output),
        Commands::Requirements { analysis_dir, output } => run_requirements(&analysis_dir, output),
        Commands::Advise {
            requirements,
            infer,
            json,
        } => run_advise(config, requirements, infer, json),
        Commands::Config => {
            print!("{}", Config::default_config_string());
            ExitCode::SUCCESS
        }
    }
}

/// Filter used when `RUST_LOG` is unset. Covers the library and this binary.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "strata_core=debug,strata=debug"
    } else {
        "strata_core=info,strata=info"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the analyzer behind a spinner and log recovered-failure warnings.
fn analyze(config: Config, path: &Path) -> Result<RepositoryModel, AnalysisError> {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(80));

    let analyzer = Analyzer::new(config);
    let result = analyzer.analyze_with_progress(path, |file| {
        pb.set_message(format!("Scanning {}", file.rel));
    });
    pb.finish_and_clear();

    let model = result?;
    for warning in &model.warnings {
        tracing::warn!("{}: {}", warning.path, warning.message);
    }
    if model.truncated {
        tracing::warn!("Analysis deadline reached, results are partial");
    }
    Ok(model)
}

fn run_facet(config: Config, facet: Facet, path: &Path, output: Option<PathBuf>) -> ExitCode {
    let mut store = FileStore::with_config(&config.output);
    if let Some(dir) = output {
        store = store.in_dir(dir);
    }

    let model = match analyze(config, path) {
        Ok(model) => model,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_BAD_INPUT);
        }
    };

    println!(
        "Analyzed {} ({}, {})",
        model.profile.name,
        model.profile.language,
        model.profile.architecture.label()
    );

    match write_facets(&store, facet, &model) {
        Ok(0) => {
            tracing::info!("No artifacts found in {}", path.display());
            ExitCode::from(EXIT_NOTHING_FOUND)
        }
        Ok(_) => {
            println!("Results written to {}", store.dir().display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Write the artifacts for `facet`, returning how many facets had data.
fn write_facets(
    store: &FileStore,
    facet: Facet,
    model: &RepositoryModel,
) -> Result<usize, strata_core::StorageError> {
    let mut found = 0;
    let mut code = None;
    let mut database = None;
    let mut api = None;

    if matches!(facet, Facet::Code | Facet::All) {
        let analysis = CodeAnalysis::from_model(model);
        if analysis.modules.is_empty() {
            println!("  code: no source modules found");
        } else {
            store.save_json(CODE_ANALYSIS_FILE, &analysis)?;
            store.save_markdown(STRUCTURE_REPORT_FILE, &analysis.to_markdown())?;
            println!(
                "  code: {} modules, {} functions, {} classes, {} rule candidates",
                analysis.summary.modules,
                analysis.summary.functions,
                analysis.summary.classes,
                analysis.summary.business_rules
            );
            found += 1;
            code = Some(analysis);
        }
    }

    if matches!(facet, Facet::Database | Facet::All) {
        let analysis = DatabaseAnalysis::from_model(model);
        if analysis.tables.is_empty() {
            println!("  database: no tables found");
        } else {
            store.save_json(DATABASE_ANALYSIS_FILE, &analysis)?;
            store.save_markdown(DATA_DICTIONARY_FILE, &analysis.data_dictionary())?;
            store.save_markdown(ERD_FILE, &analysis.erd_markdown())?;
            println!(
                "  database: {} tables, {} relationships",
                analysis.tables.len(),
                analysis.relationships.len()
            );
            found += 1;
            database = Some(analysis);
        }
    }

    if matches!(facet, Facet::Api | Facet::All) {
        let analysis = ApiAnalysis::from_model(model);
        if analysis.is_empty() {
            println!("  api: no endpoints or external APIs found");
        } else {
            store.save_json(API_ANALYSIS_FILE, &analysis)?;
            store.save_markdown(API_DOC_FILE, &analysis.to_markdown())?;
            println!(
                "  api: {} endpoints, {} external APIs",
                analysis.endpoints.len(),
                analysis.external_apis.len()
            );
            found += 1;
            api = Some(analysis);
        }
    }

    if facet == Facet::All && found > 0 {
        let doc = RequirementsDoc::new(code, database, api);
        store.save_markdown(REQUIREMENTS_FILE, &doc.to_markdown())?;
    }

    Ok(found)
}

fn run_requirements(analysis_dir: &Path, output: Option<PathBuf>) -> ExitCode {
    if !analysis_dir.is_dir() {
        eprintln!("Error: Not a directory: {}", analysis_dir.display());
        return ExitCode::from(EXIT_BAD_INPUT);
    }

    let source = FileStore::new(analysis_dir);
    let loaded = source.load_code_analysis().and_then(|code| {
        let database = source.load_database_analysis()?;
        let api = source.load_api_analysis()?;
        Ok(RequirementsDoc::new(code, database, api))
    });
    let doc = match loaded {
        Ok(doc) => doc,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if !doc.has_inputs() {
        tracing::info!("No analysis JSON found in {}", analysis_dir.display());
        return ExitCode::from(EXIT_NOTHING_FOUND);
    }

    let target = FileStore::new(output.unwrap_or_else(|| analysis_dir.to_path_buf()));
    match target.save_markdown(REQUIREMENTS_FILE, &doc.to_markdown()) {
        Ok(path) => {
            println!("Requirements document written to {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_advise(
    config: Config,
    requirements: Option<PathBuf>,
    infer: Option<PathBuf>,
    json: bool,
) -> ExitCode {
    let req = match (requirements, infer) {
        (_, Some(path)) => match analyze(config, &path) {
            Ok(model) => ProjectRequirements::infer(&model),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_BAD_INPUT);
            }
        },
        (Some(file), None) => match load_requirements(&file) {
            Ok(req) => req,
            Err(message) => {
                eprintln!("Error: {}", message);
                return ExitCode::from(EXIT_BAD_INPUT);
            }
        },
        (None, None) => {
            eprintln!("Error: pass a requirements file or --infer <PATH>");
            return ExitCode::from(EXIT_BAD_INPUT);
        }
    };

    let recommendation = recommend(&req);
    if json {
        match serde_json::to_string_pretty(&recommendation) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        print!("{}", recommendation.to_markdown());
    }
    ExitCode::SUCCESS
}

fn load_requirements(path: &Path) -> Result<ProjectRequirements, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    serde_json::from_str(&content).map_err(|e| format!("Invalid requirements in {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_advise_requires_input() {
        assert!(Cli::try_parse_from(["strata", "advise"]).is_err());
        assert!(Cli::try_parse_from(["strata", "advise", "req.json"]).is_ok());
        assert!(Cli::try_parse_from(["strata", "advise", "--infer", "."]).is_ok());
    }

    #[test]
    fn test_default_filter_covers_cli_target() {
        for verbose in [false, true] {
            let directives = default_filter(verbose);
            assert!(EnvFilter::try_new(directives).is_ok());
            assert!(directives.split(',').any(|d| d.starts_with("strata=")));
        }
        assert!(default_filter(true).contains("strata=debug"));
        assert!(default_filter(false).contains("strata=info"));
    }

    #[test]
    fn test_output_flag() {
        let cli = Cli::try_parse_from(["strata", "api", "repo", "-o", "out"]).unwrap();
        match cli.command {
            Commands::Api { path, output } => {
                assert_eq!(path, PathBuf::from("repo"));
                assert_eq!(output, Some(PathBuf::from("out")));
            }
            _ => panic!("expected api command"),
        }
    }
}
