//! Keeping environment files out of version control.
//!
//! [`protect`] makes sure a `.gitignore` lists the env files and their
//! backups, creating or appending to it as needed. The text helpers are
//! separate so they can be checked without touching disk.

use std::path::Path;

use crate::error::Result;

/// Default `.gitignore` file name.
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Header line written above the protected entries.
pub const PROTECT_HEADER: &str = "# Environment variables";

/// Entries added to `.gitignore` when none are configured.
pub const DEFAULT_PROTECTED_ENTRIES: [&str; 3] = [".env", ".env.local", ".env.*.backup"];

/// What [`protect`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectOutcome {
    /// No `.gitignore` existed; one was created.
    Created,
    /// At least one entry was already listed; nothing changed.
    AlreadyProtected,
    /// The entries were appended to an existing file.
    Appended,
}

/// Whether any protected entry already appears as a whole line.
pub fn is_protected(content: &str, entries: &[String]) -> bool {
    content
        .lines()
        .any(|line| entries.iter().any(|entry| line == entry))
}

/// Contents of a fresh `.gitignore`.
pub fn new_gitignore(entries: &[String]) -> String {
    let mut out = String::from(PROTECT_HEADER);
    out.push('\n');
    for entry in entries {
        out.push_str(entry);
        out.push('\n');
    }
    out
}

/// Existing contents with the protected block appended.
///
/// A blank line separates the block from what was there, and a newline is
/// inserted first if the file did not end with one.
///
/// # Examples
///
/// ```
/// use envspec_files::append_block;
///
/// let entries = vec![".env".to_string()];
/// assert_eq!(
///     append_block("target", &entries),
///     "target\n\n# Environment variables\n.env\n"
/// );
/// ```
pub fn append_block(existing: &str, entries: &[String]) -> String {
    let mut out = existing.to_string();
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&new_gitignore(entries));
    out
}

/// Ensures `path` lists the protected entries.
///
/// # Errors
///
/// Returns [`FilesError::IoError`](crate::FilesError::IoError) if the file
/// cannot be read or written.
pub fn protect(path: impl AsRef<Path>, entries: &[String]) -> Result<ProtectOutcome> {
    let path = path.as_ref();
    if !path.exists() {
        std::fs::write(path, new_gitignore(entries))?;
        return Ok(ProtectOutcome::Created);
    }

    let content = std::fs::read_to_string(path)?;
    if is_protected(&content, entries) {
        return Ok(ProtectOutcome::AlreadyProtected);
    }

    std::fs::write(path, append_block(&content, entries))?;
    Ok(ProtectOutcome::Appended)
}
