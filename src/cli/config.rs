use clap::Subcommand;
use pyflint::config::{self, ResolvedConfig};
use pyflint::{Settings, options};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate a pyflint.toml listing every option at its default
    Init {
        /// Output path for the configuration file
        #[arg(short, long, default_value = "pyflint.toml")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration that applies in the current directory
    Show {
        /// Path to the configuration file (default: search upwards)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Validate a configuration file against the known options and rules
    Validate {
        /// Path to the configuration file to validate
        #[arg(short, long, default_value = "pyflint.toml")]
        config: PathBuf,
    },
}

pub fn run_config(command: &ConfigCommands) -> ExitCode {
    match command {
        ConfigCommands::Init { output, force } => run_init(output, *force),
        ConfigCommands::Show { config } => run_show(config.as_deref()),
        ConfigCommands::Validate { config } => run_validate(config),
    }
}

fn run_init(output: &Path, force: bool) -> ExitCode {
    if output.exists() && !force {
        eprintln!(
            "Error: {} already exists. Use --force to overwrite.",
            output.display()
        );
        return ExitCode::from(2);
    }

    match fs::write(output, options::default_config_template()) {
        Ok(()) => {
            eprintln!("Created {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error writing {}: {}", output.display(), e);
            ExitCode::from(2)
        }
    }
}

fn run_show(config_path: Option<&Path>) -> ExitCode {
    let path = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => config::find_config_file(Path::new(".")),
    };
    let resolved = match &path {
        Some(path) => match ResolvedConfig::from_file(path) {
            Ok(resolved) => resolved,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::from(2);
            }
        },
        None => ResolvedConfig::new(),
    };

    match &path {
        Some(path) => eprintln!("# {}", path.display()),
        None => eprintln!("# no configuration file found; defaults apply"),
    }
    match resolved.to_toml_string() {
        Ok(text) => {
            print!("{text}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    if !config_path.exists() {
        eprintln!("Error: {} not found", config_path.display());
        return ExitCode::from(2);
    }

    let resolved = match ResolvedConfig::from_file(config_path) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };
    let codes = pyflint::docs::all_rule_codes();
    let mut errors = pyflint::settings::validate(&resolved, &codes);
    if errors.is_empty() {
        if let Err(error) = Settings::from_resolved(&resolved, &codes) {
            errors.push(error);
        }
    }
    if errors.is_empty() {
        eprintln!("{}: OK", config_path.display());
        return ExitCode::SUCCESS;
    }

    eprintln!("{}:", config_path.display());
    for error in &errors {
        eprintln!("  - {error}");
    }
    eprintln!("\nFound {} error(s)", errors.len());
    ExitCode::from(1)
}
