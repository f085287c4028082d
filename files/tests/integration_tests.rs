use std::path::Path;

use envspec_core::{TypeTag, check_env, infer_document, reconcile, validate_document};
use envspec_files::{
    ENV_FILE, SCHEMA_FILE, backup_file, load_schema, load_schema_value, read_env, save_schema,
    write_env,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

const SAMPLE_ENV: &str = "\
# service
PORT=8080
DEBUG=true
HOSTS=api,web
FLAGS=[true, false]
DB={\"host\":\"localhost\"}
API_KEY=sk-123
ACCOUNT_ID=0012345
";

// ---------------------------------------------------------------------------
// Schema inference from a real file
// ---------------------------------------------------------------------------

#[test]
fn test_inferred_schema_round_trips_and_validates() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), ENV_FILE, SAMPLE_ENV);

    let env = read_env(dir.path().join(ENV_FILE)).unwrap().unwrap();
    let doc = infer_document(&env, false).unwrap();
    save_schema(dir.path().join(SCHEMA_FILE), &doc).unwrap();

    let raw = load_schema_value(dir.path().join(SCHEMA_FILE)).unwrap();
    assert!(validate_document(&raw).is_empty());

    let loaded = load_schema(dir.path().join(SCHEMA_FILE)).unwrap();
    let types: Vec<_> = loaded.vars.values().map(|spec| spec.var_type).collect();
    assert_eq!(
        types,
        vec![
            TypeTag::Number,
            TypeTag::Boolean,
            TypeTag::Array,
            TypeTag::Array,
            TypeTag::Object,
            TypeTag::String,
            TypeTag::String,
        ]
    );
    assert_eq!(loaded.vars["FLAGS"].item_type, Some(TypeTag::Boolean));

    let report = check_env(&loaded.vars, &env);
    assert!(report.is_clean(), "unexpected findings: {report:?}");
}

// ---------------------------------------------------------------------------
// Reconcile and write
// ---------------------------------------------------------------------------

#[test]
fn test_reconcile_writes_complete_env_and_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        SCHEMA_FILE,
        r#"{
  "$schemaVersion": 1,
  "vars": {
    "PORT": {"type": "number", "required": true, "example": 3000, "description": "port"},
    "NAME": {"type": "string", "example": "demo", "description": "name"},
    "TAGS": {"type": "array", "itemType": "string", "delimiter": ",", "example": ["a"], "description": ""}
  }
}"#,
    );
    write(dir.path(), ENV_FILE, "PORT=abc\nSTRAY=1\n");

    let schema = load_schema(dir.path().join(SCHEMA_FILE)).unwrap();
    let env_path = dir.path().join(ENV_FILE);
    let existing = read_env(&env_path).unwrap();

    let run = reconcile(&schema.vars, existing.as_ref(), true);
    assert_eq!(run.changes.preserved, vec!["PORT"]);
    assert_eq!(run.changes.invalid, vec!["PORT"]);
    assert_eq!(run.changes.added, vec!["NAME", "TAGS"]);

    write_env(&env_path, &run.result).unwrap();
    assert_eq!(
        std::fs::read_to_string(&env_path).unwrap(),
        "PORT=abc\nNAME=demo\nTAGS=[\"a\"]\n"
    );

    let reread = read_env(&env_path).unwrap();
    let second = reconcile(&schema.vars, reread.as_ref(), true);
    assert!(second.changes.added.is_empty());
    assert_eq!(second.result, run.result);
}

#[test]
fn test_backup_preserves_original_before_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let env_path = dir.path().join(ENV_FILE);
    write(dir.path(), ENV_FILE, "SECRET=keep-me\n");

    let backup = backup_file(&env_path).unwrap();
    write(dir.path(), ENV_FILE, "SECRET=\n");

    let saved = read_env(&backup).unwrap().unwrap();
    assert_eq!(saved["SECRET"], "keep-me");
}
