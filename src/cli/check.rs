use super::Cli;
use clap::CommandFactory;
use colored::control;
use log::{debug, info};
use pyflint::config::{self, GLOBALS};
use pyflint::{CheckResult, Linter, OptionValue, Reporter, ResolvedConfig, apply_fixes, engine};
use rayon::prelude::*;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Fixes can expose further fixable problems; stop after this many rounds.
const MAX_FIX_PASSES: usize = 10;

enum FileResult {
    Checked {
        path: PathBuf,
        result: CheckResult,
        fixed: usize,
    },
    Failed {
        path: PathBuf,
        error: String,
    },
}

/// Expand directories into the Python files below them.
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        let pattern = path.join("**").join("*.py");
        let pattern = pattern.to_string_lossy();
        let entries = glob::glob(&pattern).map_err(|e| format!("invalid pattern {pattern}: {e}"))?;
        let mut found: Vec<PathBuf> = entries.filter_map(Result::ok).collect();
        found.sort();
        debug!("{} Python file(s) under {}", found.len(), path.display());
        files.extend(found);
    }
    Ok(files)
}

/// File configuration with command-line overrides on top.
fn load_config(cli: &Cli, search_dir: &Path) -> Result<ResolvedConfig, String> {
    let path = match &cli.config {
        Some(path) => Some(path.clone()),
        None => {
            let dir = search_dir
                .canonicalize()
                .unwrap_or_else(|_| search_dir.to_path_buf());
            config::find_config_file(&dir)
        }
    };
    let mut config = match path {
        Some(path) => {
            info!("using config {}", path.display());
            ResolvedConfig::from_file(&path).map_err(|e| e.to_string())?
        }
        None => ResolvedConfig::new(),
    };

    let codes = |codes: &[String]| {
        OptionValue::List(codes.iter().cloned().map(OptionValue::String).collect())
    };
    if let Some(select) = &cli.select {
        config.set(GLOBALS, "select", codes(select));
    }
    if let Some(extend_select) = &cli.extend_select {
        config.set(GLOBALS, "extend-select", codes(extend_select));
    }
    if let Some(ignore) = &cli.ignore {
        config.set(GLOBALS, "ignore", codes(ignore));
    }
    if let Some(line_length) = cli.line_length {
        config.set(GLOBALS, "line-length", OptionValue::Integer(i64::from(line_length)));
    }
    Ok(config)
}

/// Check `source`, applying fixes until none apply. Returns the final
/// source, its diagnostics and the number of fixes applied.
fn fix_source(linter: &Linter, source: String) -> Result<(String, CheckResult, usize), String> {
    let mut source = source;
    let mut fixed = 0;
    for _ in 0..MAX_FIX_PASSES {
        let result = linter.check(&source).map_err(|e| e.to_string())?;
        let (new_source, applied) = apply_fixes(&source, &result.diagnostics);
        if applied == 0 {
            return Ok((source, result, fixed));
        }
        source = new_source;
        fixed += applied;
    }
    let result = linter.check(&source).map_err(|e| e.to_string())?;
    Ok((source, result, fixed))
}

fn check_file(path: &Path, linter: &Linter, fix: bool) -> FileResult {
    let failed = |error: String| FileResult::Failed {
        path: path.to_path_buf(),
        error,
    };
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => return failed(e.to_string()),
    };

    if !fix {
        return match linter.check(&source) {
            Ok(result) => FileResult::Checked {
                path: path.to_path_buf(),
                result,
                fixed: 0,
            },
            Err(e) => failed(e.to_string()),
        };
    }

    match fix_source(linter, source) {
        Ok((fixed_source, result, fixed)) => {
            if fixed > 0 {
                if let Err(e) = std::fs::write(path, fixed_source) {
                    return failed(e.to_string());
                }
            }
            FileResult::Checked {
                path: path.to_path_buf(),
                result,
                fixed,
            }
        }
        Err(error) => failed(error),
    }
}

fn exit_code(cli: &Cli, diagnostics: usize) -> ExitCode {
    if diagnostics > 0 && !cli.exit_zero {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

pub fn run_check(cli: Cli) -> ExitCode {
    // 1. Detect stdin mode and read content if applicable
    let stdin_mode = cli.files.len() == 1 && cli.files[0].as_os_str() == "-";
    let stdin_content = if stdin_mode {
        let mut content = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut content) {
            eprintln!("Error reading from stdin: {e}");
            return ExitCode::from(2);
        }
        Some(content)
    } else {
        None
    };

    // 2. Resolve the files to check (file mode only)
    let files = if stdin_content.is_none() {
        if cli.files.is_empty() {
            let _ = Cli::command().print_help();
            eprintln!();
            return ExitCode::from(2);
        }
        match collect_files(&cli.files) {
            Ok(files) => files,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::from(2);
            }
        }
    } else {
        Vec::new()
    };

    // 3. Load configuration, searching upwards from the first path
    let search_dir = match cli.files.first() {
        Some(path) if path.is_dir() => path.clone(),
        Some(path) if !stdin_mode => path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
        _ => PathBuf::from("."),
    };
    let config = match load_config(&cli, &search_dir) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    // 4. Configure color output
    if cli.color {
        control::set_override(true);
    } else if cli.no_color {
        control::set_override(false);
    }
    let reporter = Reporter::new(cli.format.into()).with_fix_markers(!cli.fix);

    // 5. Build the linter
    if let Err(e) = engine::initialize() {
        eprintln!("Error: {e}");
        return ExitCode::from(2);
    }
    let linter = match engine::linter(&config) {
        Ok(linter) => linter,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    // 6. Branch: stdin mode vs file mode
    if let Some(content) = stdin_content {
        let stdin_path = Path::new("-");
        if cli.fix {
            return match fix_source(&linter, content) {
                Ok((fixed_source, result, _)) => {
                    print!("{fixed_source}");
                    exit_code(&cli, result.diagnostics.len())
                }
                Err(e) => {
                    eprintln!("Error: {e}");
                    ExitCode::from(2)
                }
            };
        }
        return match linter.check(&content) {
            Ok(result) => {
                reporter.report(&result.diagnostics, stdin_path);
                let fixable = result.diagnostics.iter().filter(|d| d.fix().is_some()).count();
                reporter.summary(result.diagnostics.len(), fixable, result.suppressed);
                exit_code(&cli, result.diagnostics.len())
            }
            Err(e) => {
                eprintln!("Error: {e}");
                ExitCode::from(2)
            }
        };
    }

    info!("checking {} file(s)", files.len());
    let results: Vec<FileResult> = files
        .par_iter()
        .map(|path| check_file(path, &linter, cli.fix))
        .collect();

    // Report sequentially, in path order
    let mut total = 0;
    let mut fixable = 0;
    let mut suppressed = 0;
    let mut has_fatal_error = false;
    for result in results {
        match result {
            FileResult::Checked {
                path,
                result,
                fixed,
            } => {
                if fixed > 0 {
                    eprintln!("Fixed {fixed} error(s) in {}", path.display());
                }
                reporter.report(&result.diagnostics, &path);
                total += result.diagnostics.len();
                fixable += result.diagnostics.iter().filter(|d| d.fix().is_some()).count();
                suppressed += result.suppressed;
            }
            FileResult::Failed { path, error } => {
                eprintln!("Error checking {}: {error}", path.display());
                has_fatal_error = true;
            }
        }
    }
    reporter.summary(total, fixable, suppressed);

    if has_fatal_error {
        return ExitCode::from(2);
    }
    exit_code(&cli, total)
}
