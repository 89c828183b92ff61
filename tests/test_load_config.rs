use std::env;
use std::fs::write;
use tempfile::NamedTempFile;

use serial_test::serial;

use oss_publish::config::{
    Config, ENV_ACCESS_KEY_ID, ENV_ACCESS_KEY_SECRET, ENV_BUCKET, ENV_REGION, Options,
};
use oss_publish::load_config::load_options;

fn options_with_prefix(prefix: &str) -> Options {
    Options {
        access_key_id: Some("ak".to_string()),
        access_key_secret: Some("sk".to_string()),
        bucket: Some("bucket".to_string()),
        region: Some("oss-cn-hangzhou".to_string()),
        prefix: prefix.to_string(),
        ..Options::default()
    }
}

#[test]
fn prefix_without_separator_gets_one_appended() {
    let config = Config::from_options(options_with_prefix("v1")).expect("Options should normalize");
    assert_eq!(config.prefix, "v1/");
}

#[test]
fn prefix_with_separator_is_unchanged() {
    let config =
        Config::from_options(options_with_prefix("v1/")).expect("Options should normalize");
    assert_eq!(config.prefix, "v1/");
}

#[test]
fn boolean_flags_default_independently() {
    let config = Config::from_options(options_with_prefix("v1")).expect("Options should normalize");
    assert!(config.enable_log, "Logging is on by default");
    assert!(!config.ignore_error, "Errors surface by default");
    assert!(config.remove_mode, "Remove mode is on by default");
    assert!(!config.delete_all, "Purge is off by default");
    assert!(config.exclude.is_none(), "No exclusion by default");
}

#[test]
fn delete_mode_is_the_source_name_for_remove_mode() {
    let mut options = options_with_prefix("v1");
    options.delete_mode = Some(false);
    let config = Config::from_options(options).expect("Options should normalize");
    assert!(!config.remove_mode);
}

#[test]
fn empty_exclude_pattern_means_no_exclusion() {
    let mut options = options_with_prefix("v1");
    options.exclude = Some(String::new());
    let config = Config::from_options(options).expect("Options should normalize");
    assert!(config.exclude.is_none());
}

#[test]
fn invalid_exclude_pattern_is_a_construction_fault() {
    let mut options = options_with_prefix("v1");
    options.exclude = Some("[".to_string());
    let err = Config::from_options(options).unwrap_err();
    assert!(
        err.to_string().contains("exclude"),
        "Error should name the exclude option, got: {err}"
    );
}

/// Credentials absent from the options fall back to the named env vars.
#[test]
#[serial]
fn credentials_fall_back_to_environment() {
    env::set_var(ENV_ACCESS_KEY_ID, "env-key-id");
    env::set_var(ENV_ACCESS_KEY_SECRET, "env-key-secret");
    env::set_var(ENV_BUCKET, "env-bucket");
    env::set_var(ENV_REGION, "oss-eu-west-1");

    let options = Options {
        prefix: "v1".to_string(),
        ..Options::default()
    };
    let config = Config::from_options(options).expect("Options should normalize");
    assert_eq!(config.auth.access_key_id, "env-key-id");
    assert_eq!(config.auth.access_key_secret, "env-key-secret");
    assert_eq!(config.auth.bucket, "env-bucket");
    assert_eq!(config.auth.region, "oss-eu-west-1");

    env::remove_var(ENV_ACCESS_KEY_ID);
    env::remove_var(ENV_ACCESS_KEY_SECRET);
    env::remove_var(ENV_BUCKET);
    env::remove_var(ENV_REGION);
}

#[test]
#[serial]
fn explicit_credentials_take_precedence_over_environment() {
    env::set_var(ENV_BUCKET, "env-bucket");

    let config =
        Config::from_options(options_with_prefix("v1")).expect("Options should normalize");
    assert_eq!(config.auth.bucket, "bucket");

    env::remove_var(ENV_BUCKET);
}

/// Neither options nor environment supplying credentials is not an error
/// here; it surfaces later as an authentication failure from the provider.
#[test]
#[serial]
fn missing_credentials_are_not_validated_at_construction() {
    env::remove_var(ENV_ACCESS_KEY_ID);
    env::remove_var(ENV_ACCESS_KEY_SECRET);
    env::remove_var(ENV_BUCKET);
    env::remove_var(ENV_REGION);

    let options = Options {
        prefix: "v1".to_string(),
        ..Options::default()
    };
    let config = Config::from_options(options).expect("Options should still normalize");
    assert!(config.auth.access_key_id.is_empty());
    assert!(config.auth.bucket.is_empty());
}

#[test]
fn load_options_parses_a_full_yaml_file() {
    let options_yaml = r#"
access_key_id: "ak"
access_key_secret: "sk"
bucket: "assets-bucket"
region: "oss-cn-hangzhou"
prefix: v1
exclude: '\.map$'
delete_mode: false
delete_all: true
"#;
    let options_file = NamedTempFile::new().expect("temp file");
    write(options_file.path(), options_yaml).unwrap();

    let options = load_options(options_file.path()).expect("Options should load");
    assert_eq!(options.bucket.as_deref(), Some("assets-bucket"));
    assert_eq!(options.prefix, "v1");
    assert_eq!(options.exclude.as_deref(), Some(r"\.map$"));
    assert_eq!(options.delete_mode, Some(false));
    assert_eq!(options.delete_all, Some(true));
    assert_eq!(options.ignore_error, None);

    let config = Config::from_options(options).expect("Loaded options should normalize");
    assert_eq!(config.prefix, "v1/");
    assert!(!config.remove_mode);
    assert!(config.delete_all);
}

/// `prefix` is the one required key; a file without it must not load.
#[test]
fn load_options_rejects_a_file_without_prefix() {
    let options_file = NamedTempFile::new().expect("temp file");
    write(options_file.path(), b"bucket: assets-bucket\n").unwrap();

    let err = load_options(options_file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("prefix") || msg.contains("parse"),
        "Missing prefix should fail parsing, got: {msg}"
    );
}

#[test]
fn load_options_errors_for_an_unreadable_file() {
    let err = load_options("/definitely/not/here.yaml").unwrap_err();
    assert!(
        err.to_string().contains("Failed to read options file"),
        "Got: {err}"
    );
}

#[test]
fn load_options_errors_for_invalid_yaml() {
    let options_file = NamedTempFile::new().expect("temp file");
    write(options_file.path(), b"not-yaml: [:::").unwrap();

    let err = load_options(options_file.path()).unwrap_err();
    let msg = err.to_string();
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}
