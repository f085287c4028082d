//! Reading and writing `.env` files.
//!
//! The parser understands the common dotenv subset: `KEY=value` lines,
//! blank lines, `#` comments, an optional `export ` prefix, matching
//! single/double/backtick quotes, and trailing ` #` comments on unquoted
//! values. Variable references like `${HOME}` are kept verbatim; nothing
//! is interpolated.
//!
//! # Example
//!
//! ```
//! use envspec_files::{parse_env_str, render_env};
//!
//! let env = parse_env_str("# db\nexport PORT=5432\nNAME=\"my app\" \nEMPTY=\n");
//! assert_eq!(env["PORT"], "5432");
//! assert_eq!(env["NAME"], "my app");
//! assert_eq!(env["EMPTY"], "");
//!
//! assert_eq!(render_env(&env), "PORT=5432\nNAME=my app\nEMPTY=\n");
//! ```

use std::path::Path;

use envspec_core::EnvMapping;
use tracing::debug;

use crate::error::Result;

/// Default `.env` file name, relative to the project directory.
pub const ENV_FILE: &str = ".env";

/// Parses `.env` text into a mapping, in file order.
///
/// Lines without `=` or with an invalid key are skipped. When a key
/// repeats, the last value wins and the first position is kept.
pub fn parse_env_str(content: &str) -> EnvMapping {
    let mut env = EnvMapping::new();

    for (index, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").map(str::trim_start).unwrap_or(line);

        let Some((key, raw_value)) = line.split_once('=') else {
            debug!(line = index + 1, "skipping line without '='");
            continue;
        };
        let key = key.trim();
        if !is_valid_key(key) {
            debug!(line = index + 1, key, "skipping line with invalid key");
            continue;
        }

        env.insert(key.to_string(), parse_value(raw_value));
    }

    env
}

fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

fn parse_value(raw: &str) -> String {
    let value = raw.trim();

    for quote in ['"', '\'', '`'] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            let inner = &value[1..value.len() - 1];
            return if quote == '"' {
                unescape(inner)
            } else {
                inner.to_string()
            };
        }
    }

    match value.find(" #") {
        Some(pos) => value[..pos].trim_end().to_string(),
        None => value.to_string(),
    }
}

/// Undoes the escapes [`render_value`] writes inside double quotes.
fn unescape(inner: &str) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Reads and parses a `.env` file.
///
/// Returns `Ok(None)` when the file does not exist.
///
/// # Errors
///
/// Returns [`FilesError::IoError`](crate::FilesError::IoError) if the file
/// exists but cannot be read.
pub fn read_env(path: impl AsRef<Path>) -> Result<Option<EnvMapping>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    let env = parse_env_str(&content);
    debug!(path = %path.display(), vars = env.len(), "parsed env file");
    Ok(Some(env))
}

/// Renders a mapping as `.env` text, one `KEY=value` line per entry.
///
/// Values are written as-is unless they would not survive a re-read
/// (embedded newlines, surrounding whitespace, a ` #` sequence, or a
/// leading quote character), in which case they are double-quoted with
/// `\`, `"` and newlines escaped.
pub fn render_env(env: &EnvMapping) -> String {
    let mut out = String::new();
    for (key, value) in env {
        out.push_str(key);
        out.push('=');
        out.push_str(&render_value(value));
        out.push('\n');
    }
    out
}

fn render_value(value: &str) -> String {
    let needs_quotes = value.contains('\n')
        || value.trim() != value
        || value.contains(" #")
        || value.starts_with(['"', '\'', '`']);
    if !needs_quotes {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Writes a mapping to a `.env` file, replacing its contents.
///
/// # Errors
///
/// Returns [`FilesError::IoError`](crate::FilesError::IoError) if the file
/// cannot be written.
pub fn write_env(path: impl AsRef<Path>, env: &EnvMapping) -> Result<()> {
    std::fs::write(path.as_ref(), render_env(env))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_junk() {
        let env = parse_env_str("# comment\n\nnot a pair\n=nokey\nBAD KEY=1\nOK=1\n");
        assert_eq!(env.len(), 1);
        assert_eq!(env["OK"], "1");
    }

    #[test]
    fn test_parse_keeps_json_and_equals_signs() {
        let env = parse_env_str("DB={\"host\":\"x\"}\nURL=postgres://u:p@h/db?a=b\nLIST=[1, 2]\n");
        assert_eq!(env["DB"], r#"{"host":"x"}"#);
        assert_eq!(env["URL"], "postgres://u:p@h/db?a=b");
        assert_eq!(env["LIST"], "[1, 2]");
    }

    #[test]
    fn test_parse_quotes_and_inline_comments() {
        let env = parse_env_str(
            "A='single # kept'\nB=\"line\\nbreak\"\nC=value # note\nD=a#b\nE=${HOME}/x\n",
        );
        assert_eq!(env["A"], "single # kept");
        assert_eq!(env["B"], "line\nbreak");
        assert_eq!(env["C"], "value");
        assert_eq!(env["D"], "a#b");
        assert_eq!(env["E"], "${HOME}/x");
    }

    #[test]
    fn test_parse_last_duplicate_wins() {
        let env = parse_env_str("A=1\nB=2\nA=3\r\n");
        let pairs: Vec<_> = env.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        assert_eq!(pairs, vec![("A", "3"), ("B", "2")]);
    }

    #[test]
    fn test_render_round_trips_awkward_values() {
        let mut env = EnvMapping::new();
        env.insert("PAD".into(), " 80 ".into());
        env.insert("MULTI".into(), "a\nb".into());
        env.insert("HASH".into(), "x # y".into());
        env.insert("PLAIN".into(), "<your_port of type 'number'>".into());

        let rendered = render_env(&env);
        assert_eq!(parse_env_str(&rendered), env);
        assert!(rendered.contains("PLAIN=<your_port of type 'number'>\n"));
    }

    #[test]
    fn test_render_quotes_values_that_look_quoted() {
        let mut env = EnvMapping::new();
        env.insert("SINGLE".into(), "'a'".into());
        env.insert("DOUBLE".into(), "\"b\"".into());
        env.insert("TICK".into(), "`c`".into());
        env.insert("SLASH".into(), "\"x\\y\"".into());

        let rendered = render_env(&env);
        assert_eq!(
            rendered,
            "SINGLE=\"'a'\"\nDOUBLE=\"\\\"b\\\"\"\nTICK=\"`c`\"\nSLASH=\"\\\"x\\\\y\\\"\"\n"
        );
        assert_eq!(parse_env_str(&rendered), env);
        assert_eq!(parse_env_str(&render_env(&parse_env_str(&rendered))), env);
    }

    #[test]
    fn test_parse_double_quote_escapes() {
        let env = parse_env_str(concat!(
            r#"A="say \"hi\"""#,
            "\n",
            r#"B="c:\\tmp""#,
            "\n",
            r#"C="keep \t""#,
            "\n",
        ));
        assert_eq!(env["A"], r#"say "hi""#);
        assert_eq!(env["B"], r"c:\tmp");
        assert_eq!(env["C"], r"keep \t");
    }

    #[test]
    fn test_read_env_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_env(dir.path().join(ENV_FILE)).unwrap(), None);
    }
}
