mod console;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::builder::FalseyValueParser;
use clap::{Args, Parser, Subcommand};
use envspec_core::{
    ChangeReport, SchemaDocument, check_env, infer_document, reconcile, validate_document,
};
use envspec_files::{
    CONFIG_FILE, FilesError, GITIGNORE_FILE, ProjectConfig, ProtectOutcome, backup_file,
    load_schema, load_schema_value, protect, read_env, render_env, save_schema, write_env,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::console::{Console, confirm};

#[derive(Debug, Parser)]
#[command(name = "envspec", version)]
#[command(about = "Schema-driven .env generation and validation")]
struct Cli {
    /// Schema file (default: envspec.json, or `schema_file` in .envspec.yml).
    #[arg(long, global = true)]
    schema: Option<PathBuf>,
    /// Show full error chains and debug logs.
    #[arg(
        long,
        global = true,
        env = "ENVSPEC_DEBUG",
        value_parser = FalseyValueParser::new()
    )]
    debug: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an empty schema, or infer one from an existing env file.
    Init(InitArgs),
    /// Generate or update the env file from the schema.
    Create(CreateArgs),
    /// Check the env file against the schema.
    Validate(ValidateArgs),
    /// Check the schema file itself for structural errors.
    SchemaValidate,
    /// Make sure .gitignore keeps env files and backups out of git.
    Protect,
}

#[derive(Debug, Args)]
struct InitArgs {
    /// Infer variables from an existing env file.
    #[arg(long)]
    from_env: bool,
    /// Env file to infer from (default: .env).
    #[arg(long, requires = "from_env")]
    env_file: Option<PathBuf>,
    /// Mark every inferred variable as required.
    #[arg(long, requires = "from_env")]
    required: bool,
}

#[derive(Debug, Args)]
struct CreateArgs {
    /// Env file to write (default: .env).
    #[arg(long)]
    output: Option<PathBuf>,
    /// Regenerate the file from scratch, discarding existing values.
    #[arg(long)]
    overwrite: bool,
    /// Skip the overwrite confirmation.
    #[arg(long, requires = "overwrite")]
    force: bool,
    /// Fill new variables with schema examples instead of placeholders.
    #[arg(long)]
    example: bool,
    /// Show what would change without writing anything.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Env file to check (default: .env).
    #[arg(long)]
    file: Option<PathBuf>,
}

/// Paths and options resolved from `.envspec.yml` and command-line flags.
#[derive(Debug)]
struct Settings {
    schema_path: PathBuf,
    env_path: PathBuf,
    protected_entries: Vec<String>,
}

impl Settings {
    fn resolve(schema: Option<PathBuf>) -> Result<Self> {
        let config = ProjectConfig::load_or_default(".")
            .with_context(|| format!("Failed to read {CONFIG_FILE}"))?;
        Ok(Self {
            schema_path: schema.unwrap_or(config.schema_file),
            env_path: config.env_file,
            protected_entries: config.protected_entries,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);
    let console = Console::new(cli.debug);

    match run(cli, &console) {
        Ok(code) => code,
        Err(err) => {
            console.fail(&err);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli, console: &Console) -> Result<ExitCode> {
    let settings = Settings::resolve(cli.schema)?;
    debug!(?settings, "resolved settings");

    match cli.command {
        Command::Init(args) => run_init(&settings, args, console),
        Command::Create(args) => run_create(&settings, args, console),
        Command::Validate(args) => run_validate(&settings, args, console),
        Command::SchemaValidate => run_schema_validate(&settings, console),
        Command::Protect => run_protect(&settings, console),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn run_init(settings: &Settings, args: InitArgs, console: &Console) -> Result<ExitCode> {
    let schema_path = &settings.schema_path;
    if schema_path.exists() {
        return Err(FilesError::AlreadyExists(schema_path.clone()))
            .context("Failed to initialize schema");
    }

    let doc = if args.from_env {
        let env_path = args.env_file.unwrap_or_else(|| settings.env_path.clone());
        let doc = infer_from_env(&env_path, args.required)?;
        console.success(&format!(
            "✔ Inferred {} variables from {}",
            doc.vars.len(),
            env_path.display()
        ));
        doc
    } else {
        SchemaDocument::new()
    };

    save_schema(schema_path, &doc)
        .with_context(|| format!("Failed to write {}", schema_path.display()))?;
    console.success(&format!("✔ {} initialized", schema_path.display()));
    Ok(ExitCode::SUCCESS)
}

fn infer_from_env(env_path: &Path, required: bool) -> Result<SchemaDocument> {
    let env = read_env(env_path)
        .with_context(|| format!("Failed to read {}", env_path.display()))?
        .ok_or_else(|| FilesError::NotFound(env_path.to_path_buf()))
        .context("Failed to infer schema")?;
    infer_document(&env, required).context("Failed to infer schema")
}

fn run_create(settings: &Settings, args: CreateArgs, console: &Console) -> Result<ExitCode> {
    let schema = require_schema(&settings.schema_path, |path| load_schema(path))?;
    let env_path = args.output.unwrap_or_else(|| settings.env_path.clone());
    let existing = read_env(&env_path)
        .with_context(|| format!("Failed to read {}", env_path.display()))?;

    if existing.is_some() && args.overwrite {
        if !args.force {
            let proceed = confirm(&format!(
                "⚠ This will overwrite {}. A backup will be created first. Continue?",
                env_path.display()
            ))
            .context("Failed to read confirmation")?;
            if !proceed {
                console.info("Aborted. No changes made.");
                return Ok(ExitCode::SUCCESS);
            }
        }
        if !args.dry_run {
            let backup = backup_file(&env_path).context("Failed to back up env file")?;
            console.success(&format!("✔ Backup created → {}", backup.display()));
        }
    }

    let base = if args.overwrite {
        None
    } else {
        existing.as_ref()
    };
    let run = reconcile(&schema.vars, base, args.example);

    let show_preserved = existing.is_some() && !args.overwrite;
    for line in summary_lines(&run.changes, show_preserved) {
        console.info(&line);
    }
    if !run.changes.invalid.is_empty() {
        console.warn(&format!(
            "⚠ {} variables have values that do not match the schema: {}",
            run.changes.invalid.len(),
            run.changes.invalid.join(", ")
        ));
    }

    if args.dry_run {
        console.info(&format!("Dry run: {} not written", env_path.display()));
        print!("{}", render_env(&run.result));
        return Ok(ExitCode::SUCCESS);
    }

    write_env(&env_path, &run.result)
        .with_context(|| format!("Failed to write {}", env_path.display()))?;
    console.success(&format!("✔ {} generated", env_path.display()));
    Ok(ExitCode::SUCCESS)
}

fn run_validate(settings: &Settings, args: ValidateArgs, console: &Console) -> Result<ExitCode> {
    let schema = require_schema(&settings.schema_path, |path| load_schema(path))?;
    let env_path = args.file.unwrap_or_else(|| settings.env_path.clone());
    let Some(env) =
        read_env(&env_path).with_context(|| format!("Failed to read {}", env_path.display()))?
    else {
        bail!("{} not found. Run `envspec create` first.", env_path.display());
    };

    let report = check_env(&schema.vars, &env);

    if !report.warnings.is_empty() {
        console.warn(&format!("⚠ {} warning(s):", report.warnings.len()));
        for warning in &report.warnings {
            console.bullet(&warning.to_string());
        }
    }

    if report.has_errors() {
        console.error("✖ Validation failed:");
        for error in &report.errors {
            console.bullet(&error.to_string());
        }
        return Ok(ExitCode::FAILURE);
    }

    console.success("✔ Environment variables are valid");
    Ok(ExitCode::SUCCESS)
}

fn run_schema_validate(settings: &Settings, console: &Console) -> Result<ExitCode> {
    let raw = require_schema(&settings.schema_path, |path| load_schema_value(path))?;
    let errors = validate_document(&raw);

    if !errors.is_empty() {
        console.error("✖ Schema validation failed:");
        for error in &errors {
            console.bullet(&error.to_string());
        }
        return Ok(ExitCode::FAILURE);
    }

    console.success(&format!(
        "✔ {} is valid",
        settings.schema_path.display()
    ));
    Ok(ExitCode::SUCCESS)
}

fn run_protect(settings: &Settings, console: &Console) -> Result<ExitCode> {
    let outcome = protect(GITIGNORE_FILE, &settings.protected_entries)
        .with_context(|| format!("Failed to update {GITIGNORE_FILE}"))?;

    match outcome {
        ProtectOutcome::Created => {
            console.success(&format!("✔ Created {GITIGNORE_FILE} with env protection"))
        }
        ProtectOutcome::AlreadyProtected => {
            console.info(&format!("✔ Env files already protected in {GITIGNORE_FILE}"))
        }
        ProtectOutcome::Appended => {
            console.success(&format!("✔ Added env protection to {GITIGNORE_FILE}"))
        }
    }
    Ok(ExitCode::SUCCESS)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Loads the schema with `load`, turning a missing file into a hint.
fn require_schema<T>(
    path: &Path,
    load: impl FnOnce(&Path) -> envspec_files::Result<T>,
) -> Result<T> {
    match load(path) {
        Ok(value) => Ok(value),
        Err(FilesError::NotFound(_)) => {
            bail!("{} not found. Run `envspec init` first.", path.display())
        }
        Err(err) => Err(err).with_context(|| format!("Failed to load {}", path.display())),
    }
}

fn summary_lines(changes: &ChangeReport, show_preserved: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if show_preserved {
        lines.push(format!(
            "✔ Preserved {} existing values",
            changes.preserved.len()
        ));
        if changes.is_noop() {
            lines.push("✔ No missing variables".to_string());
        }
    }
    if !changes.added.is_empty() {
        lines.push(format!(
            "➕ Added {} missing variables: {}",
            changes.added.len(),
            changes.added.join(", ")
        ));
    }
    lines
}
