use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::build::ShipBuild;
use crate::config::AppConfig;
use crate::data::validate::validate_catalog;
use crate::data::Catalog;
use crate::ledger::{write_csv, XpLedger};
use crate::parallel::{replay_histories, WorkerPool};
use crate::server;

const USAGE: &str = "usage: hotac <serve|build|ledger|available|validate|audit>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Build,
    Ledger,
    Available,
    Validate,
    Audit,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("build") => Some(Command::Build),
        Some("ledger") => Some(Command::Ledger),
        Some("available") => Some(Command::Available),
        Some("validate") => Some(Command::Validate),
        Some("audit") => Some(Command::Audit),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    let config = AppConfig::from_env();
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(&config),
        Some(Command::Build) => handle_build(args, &config),
        Some(Command::Ledger) => handle_ledger(args, &config),
        Some(Command::Available) => handle_available(args, &config),
        Some(Command::Validate) => handle_validate(args, &config),
        Some(Command::Audit) => handle_audit(args, &config),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn handle_serve(config: &AppConfig) -> i32 {
    match server::run_server(config) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_build(args: &[String], config: &AppConfig) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: hotac build <history.json>");
        return 2;
    };
    let Some((catalog, ledger)) = load_history(config, path) else {
        return 1;
    };
    match ShipBuild::from_history(catalog, ledger.items().iter().cloned()) {
        Ok(build) => print_json(&build.summary()),
        Err(err) => {
            eprintln!("replay failed: {err}");
            1
        }
    }
}

fn handle_ledger(args: &[String], config: &AppConfig) -> i32 {
    let Some(path) = args.get(2) else {
        eprintln!("usage: hotac ledger <history.json> [--csv]");
        return 2;
    };
    let as_csv = args.iter().skip(3).any(|arg| arg == "--csv");
    let Some((catalog, ledger)) = load_history(config, path) else {
        return 1;
    };

    if as_csv {
        match write_csv(&ledger, &catalog, io::stdout().lock()) {
            Ok(()) => 0,
            Err(err) => {
                eprintln!("failed to write ledger csv: {err}");
                1
            }
        }
    } else {
        print_json(&serde_json::json!({
            "entries": ledger.labelled(&catalog),
            "total_xp": ledger.total_xp(&catalog),
        }))
    }
}

fn handle_available(args: &[String], config: &AppConfig) -> i32 {
    let (Some(path), Some(slot)) = (args.get(2), args.get(3)) else {
        eprintln!("usage: hotac available <history.json> <slot-type>");
        return 2;
    };
    let Some((catalog, ledger)) = load_history(config, path) else {
        return 1;
    };
    match ShipBuild::from_history(catalog, ledger.items().iter().cloned()) {
        Ok(build) => print_json(&build.available_to_buy(slot)),
        Err(err) => {
            eprintln!("replay failed: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String], config: &AppConfig) -> i32 {
    let dir = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.data_dir.clone());

    let catalog = match Catalog::load_dir(&dir) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("validation failed: {err}");
            return 1;
        }
    };

    let report = validate_catalog(&catalog);
    for diagnostic in &report.diagnostics {
        eprintln!("- {diagnostic}");
    }
    if report.has_errors() {
        eprintln!("validation failed: {} issue(s)", report.diagnostics.len());
        1
    } else {
        println!("validation passed: {}", dir.display());
        0
    }
}

fn handle_audit(args: &[String], config: &AppConfig) -> i32 {
    let Some(dir) = args.get(2) else {
        eprintln!("usage: hotac audit <history-dir> [--workers N]");
        return 2;
    };
    let workers = match parse_workers(&args[3..]) {
        Ok(workers) => workers,
        Err(message) => {
            eprintln!("{message}");
            return 2;
        }
    };

    let catalog = match Catalog::load_dir(&config.data_dir) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("failed to load catalog: {err}");
            return 1;
        }
    };
    let paths = match history_files(Path::new(dir)) {
        Ok(paths) => paths,
        Err(err) => {
            eprintln!("failed to read {dir}: {err}");
            return 1;
        }
    };

    let mut histories = Vec::with_capacity(paths.len());
    let mut load_errors = Vec::with_capacity(paths.len());
    for path in &paths {
        match XpLedger::load_file(path) {
            Ok(ledger) => {
                histories.push(ledger.items().to_vec());
                load_errors.push(None);
            }
            Err(err) => {
                histories.push(Vec::new());
                load_errors.push(Some(err.to_string()));
            }
        }
    }

    let results = replay_histories(&catalog, histories, &WorkerPool::with_workers(workers));
    let mut failures = 0usize;
    let mut rows = Vec::with_capacity(paths.len());
    for ((path, load_error), result) in paths.iter().zip(load_errors).zip(results) {
        let file = path.display().to_string();
        let row = match (load_error, result) {
            (Some(error), _) => {
                failures += 1;
                serde_json::json!({"file": file, "error": error})
            }
            (None, Err(err)) => {
                failures += 1;
                serde_json::json!({"file": file, "error": err.to_string()})
            }
            (None, Ok(summary)) => serde_json::json!({
                "file": file,
                "ship": summary.ship_id,
                "pilot_skill": summary.pilot_skill,
                "total_xp": summary.total_xp,
                "disabled": summary.disabled.len(),
            }),
        };
        rows.push(row);
    }

    let code = print_json(&rows);
    if code == 0 && failures > 0 {
        eprintln!("audit: {failures} of {} histories failed", paths.len());
        return 1;
    }
    code
}

fn parse_workers(rest: &[String]) -> Result<usize, String> {
    match rest {
        [] => Ok(0),
        [flag, value] if flag == "--workers" => value
            .parse::<usize>()
            .map_err(|_| format!("invalid worker count '{value}'")),
        _ => Err("usage: hotac audit <history-dir> [--workers N]".to_string()),
    }
}

/// `*.json` files directly inside `dir`, sorted by path.
fn history_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn load_history(config: &AppConfig, path: &str) -> Option<(Arc<Catalog>, XpLedger)> {
    let catalog = match Catalog::load_dir(&config.data_dir) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("failed to load catalog: {err}");
            return None;
        }
    };
    match XpLedger::load_file(path) {
        Ok(ledger) => Some((catalog, ledger)),
        Err(err) => {
            eprintln!("failed to read history '{path}': {err}");
            None
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> i32 {
    match serde_json::to_string_pretty(value) {
        Ok(payload) => {
            println!("{payload}");
            0
        }
        Err(err) => {
            eprintln!("failed to serialize output: {err}");
            1
        }
    }
}
