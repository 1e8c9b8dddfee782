mod catalog;
mod config;
mod errors;
mod extract;
mod matching;
mod report;
mod state;
mod store;

use anyhow::Result;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::CourseCatalog;
use crate::config::Config;
use crate::errors::AppError;
use crate::extract::UploadedDocument;
use crate::matching::pipeline;
use crate::matching::skills::SkillRegistry;
use crate::report::MatchReport;
use crate::state::AppState;
use crate::store::UserStore;

const USAGE: &str = "\
Usage:
  skillsift match <jd-file> <resume-file>...
  skillsift register <username> <password>
  skillsift analyze <username> <password> <jd-file> <resume-file> [report-file]
  skillsift history <username> <password>
  skillsift profile <username> <password> <image-url>";

fn main() -> Result<()> {
    // Load configuration first (fails fast on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkillSift v{}", env!("CARGO_PKG_VERSION"));

    // Compile the static skill registry
    let registry = SkillRegistry::builtin();
    info!(
        "Skill registry compiled: {} canonical skill(s)",
        registry.skill_count()
    );

    // Load the course catalog sources in priority order
    let catalog = CourseCatalog::load(&config.catalog_sources)?;
    info!("Course catalog loaded: {} course(s)", catalog.total_courses());

    // Load the user/history store (corrupt files are quarantined inside)
    let mut store = UserStore::load(&config.store_path)?;
    info!("User store loaded: {} account(s)", store.account_count());

    let state = AppState {
        config,
        registry,
        catalog,
    };

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&state, &mut store, &args) {
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
    Ok(())
}

/// Dispatches one command. Every failure comes back as an `AppError` whose
/// `user_message` is safe to print.
fn run(state: &AppState, store: &mut UserStore, args: &[String]) -> Result<(), AppError> {
    let command = args.first().map(String::as_str);
    match command {
        Some("match") if args.len() >= 3 => {
            let job_description = read_text(&args[1])?;
            let documents = args[2..]
                .iter()
                .map(|path| read_document(path))
                .collect::<Result<Vec<_>, _>>()?;
            let outcome = pipeline::match_batch(state, &job_description, &documents)?;
            print_json(&outcome)
        }
        Some("register") if args.len() == 3 => {
            store.register(&args[1], &args[2])?;
            println!("Registered '{}'", args[1]);
            Ok(())
        }
        Some("analyze") if args.len() == 5 || args.len() == 6 => {
            let session = store.login(&args[1], &args[2])?;
            let job_description = read_text(&args[3])?;
            let document = read_document(&args[4])?;
            let outcome =
                pipeline::analyze_resume(state, store, &session, &document, &job_description)?;
            if let Some(report_path) = args.get(5) {
                let markup = MatchReport::from_analysis(&session.username, &outcome).markup();
                std::fs::write(report_path, markup)?;
                info!("Report markup written to {report_path}");
            }
            print_json(&outcome)
        }
        Some("history") if args.len() == 3 => {
            let session = store.login(&args[1], &args[2])?;
            print_json(&store.history(&session)?)
        }
        Some("profile") if args.len() == 4 => {
            let session = store.login(&args[1], &args[2])?;
            store.set_profile_image(&session, Some(args[3].clone()))?;
            println!("Profile image updated for '{}'", session.username);
            Ok(())
        }
        _ => Err(AppError::Validation(USAGE.to_string())),
    }
}

fn read_text(path: &str) -> Result<String, AppError> {
    Ok(std::fs::read_to_string(path)?)
}

fn read_document(path: &str) -> Result<UploadedDocument, AppError> {
    let file_name = Path::new(path)
        .file_name()
        .ok_or_else(|| AppError::Validation(format!("'{path}' is not a file")))?
        .to_string_lossy()
        .into_owned();
    Ok(UploadedDocument::new(file_name, std::fs::read(path)?))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Could not serialize output: {e}")))?;
    println!("{json}");
    Ok(())
}
