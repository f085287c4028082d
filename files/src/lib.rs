//! File handling for `envspec` projects.
//!
//! Everything here touches disk so that `envspec-core` does not have to:
//!
//! - [`load_schema`] / [`load_schema_value`] / [`save_schema`] — the
//!   `envspec.json` schema file.
//! - [`read_env`] / [`write_env`] — `.env` files, parsed into an
//!   [`EnvMapping`](envspec_core::EnvMapping) and rendered back.
//! - [`backup_file`] — timestamped copy before a destructive write.
//! - [`protect`] — `.gitignore` entries for env files and backups.
//! - [`ProjectConfig`] — optional `.envspec.yml` overrides.
//!
//! # Quick start
//!
//! ```no_run
//! use envspec_files::{ProjectConfig, load_schema, read_env};
//!
//! let config = ProjectConfig::load_or_default(".").unwrap();
//! let schema = load_schema(&config.schema_file).unwrap();
//! let env = read_env(&config.env_file).unwrap().unwrap_or_default();
//! let run = envspec_core::reconcile(&schema.vars, Some(&env), false);
//! println!("{} variables missing", run.changes.added.len());
//! ```

mod backup;
mod config;
mod env_file;
mod error;
mod gitignore;
mod schema_file;

pub use backup::{BACKUP_SUFFIX, backup_file, backup_path};
pub use config::{CONFIG_FILE, ProjectConfig};
pub use env_file::{ENV_FILE, parse_env_str, read_env, render_env, write_env};
pub use error::{FilesError, Result};
pub use gitignore::{
    DEFAULT_PROTECTED_ENTRIES, GITIGNORE_FILE, PROTECT_HEADER, ProtectOutcome, append_block,
    is_protected, new_gitignore, protect,
};
pub use schema_file::{SCHEMA_FILE, load_schema, load_schema_value, save_schema};
