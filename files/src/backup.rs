//! Timestamped backups of files about to be overwritten.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::info;

use crate::error::{FilesError, Result};

/// Suffix appended to every backup file name.
pub const BACKUP_SUFFIX: &str = "backup";

/// Builds the backup path for `path` at a given instant.
///
/// The timestamp is the ISO-8601 form with `:` and `.` replaced by `-`,
/// so backups sort chronologically and are valid file names everywhere.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use envspec_files::backup_path;
///
/// let at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
/// assert_eq!(
///     backup_path(".env", at).to_str(),
///     Some(".env.2024-05-01T09-30-00-000Z.backup")
/// );
/// ```
pub fn backup_path(path: impl AsRef<Path>, at: DateTime<Utc>) -> PathBuf {
    let stamp = at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    let mut name = path.as_ref().as_os_str().to_owned();
    name.push(format!(".{stamp}.{BACKUP_SUFFIX}"));
    PathBuf::from(name)
}

/// Copies `path` to a timestamped sibling and returns the backup's path.
///
/// # Errors
///
/// Returns [`FilesError::NotFound`] if there is nothing to back up, or
/// [`FilesError::IoError`] if the copy fails.
pub fn backup_file(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FilesError::NotFound(path.to_path_buf()));
    }
    let target = backup_path(path, Utc::now());
    std::fs::copy(path, &target)?;
    info!(from = %path.display(), to = %target.display(), "created backup");
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_copies_contents() {
        let dir = tempfile::tempdir().unwrap();
        let env = dir.path().join(".env");
        std::fs::write(&env, "A=1\n").unwrap();

        let backup = backup_file(&env).unwrap();
        assert_eq!(std::fs::read_to_string(&backup).unwrap(), "A=1\n");
        assert_eq!(std::fs::read_to_string(&env).unwrap(), "A=1\n");

        let name = backup.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".env."));
        assert!(name.ends_with(".backup"));
    }

    #[test]
    fn test_backup_of_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = backup_file(dir.path().join(".env")).unwrap_err();
        assert!(matches!(err, FilesError::NotFound(_)));
    }
}
