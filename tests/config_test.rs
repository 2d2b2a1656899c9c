// tests/config_test.rs
use semrel::config::{find_config_file, load_config, Config, CONFIG_FILE_NAME};
use serial_test::serial;
use std::io::Write;
use std::path::Path;
use tempfile::{NamedTempFile, TempDir};

/// Run `f` with the working directory switched to `dir`
fn in_dir<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
    let previous = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir).unwrap();
    let result = f();
    std::env::set_current_dir(previous).unwrap();
    result
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
tag_format = "release-{version}"
commit_parser = "angular"
add_partial_tags = true
exclude_commit_patterns = ["chore\\(deps\\)"]

[commit_parser_options]
minor_tags = ["feat", "feature"]

[[branches]]
name = "beta"
match = "beta/.+"
prerelease = true
prerelease_token = "beta"

[[branches]]
name = "main"
match = "main"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path())).unwrap();
    assert_eq!(config.tag_format, "release-{version}");
    assert!(config.add_partial_tags);
    assert_eq!(config.branches.len(), 2);
    assert_eq!(config.branches[0].name, "beta");
    assert_eq!(config.branches[1].prerelease_token, "rc");

    let settings = config.validate().unwrap();
    assert_eq!(settings.parser.name(), "angular");
    assert!(settings.branches[0].matches("beta/2.0"));
    assert!(!settings.branches[1].matches("beta/2.0"));
}

#[test]
fn test_unknown_parser_option_is_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"[commit_parser_options]\nminor_tagz = [\"feat\"]\n")
        .unwrap();
    temp_file.flush().unwrap();

    let config = load_config(Some(temp_file.path())).unwrap();
    let err = config.validate().unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_malformed_file_is_configuration_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"tag_format = [unclosed").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path())).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_misspelled_key_is_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"major_on_zer0 = false\n").unwrap();
    temp_file.flush().unwrap();

    let err = load_config(Some(temp_file.path())).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("major_on_zer0"));
}

#[test]
fn test_misspelled_branch_key_is_rejected() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file
        .write_all(b"[[branches]]\nname = \"main\"\nmatch = \"main\"\nprerelase = true\n")
        .unwrap();
    temp_file.flush().unwrap();

    assert!(load_config(Some(temp_file.path())).unwrap_err().is_configuration());
}

#[test]
fn test_missing_explicit_file_is_error() {
    let dir = TempDir::new().unwrap();
    let err = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
#[serial]
fn test_local_file_is_found() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(CONFIG_FILE_NAME),
        "tag_format = \"{version}\"\nremote = \"upstream\"\n",
    )
    .unwrap();

    let config = in_dir(dir.path(), || load_config(None)).unwrap();
    assert_eq!(config.tag_format, "{version}");
    assert_eq!(config.remote, "upstream");
}

#[test]
#[serial]
fn test_explicit_path_wins_over_local_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(CONFIG_FILE_NAME), "remote = \"local\"\n").unwrap();
    let explicit = dir.path().join("other.toml");
    std::fs::write(&explicit, "remote = \"explicit\"\n").unwrap();

    let found = in_dir(dir.path(), || find_config_file(Some(&explicit)));
    assert_eq!(found, Some(explicit.clone()));
    let config = in_dir(dir.path(), || load_config(Some(&explicit))).unwrap();
    assert_eq!(config.remote, "explicit");
}

#[test]
fn test_default_values() {
    let config = Config::default();
    assert_eq!(config.tag_format, "v{version}");
    assert_eq!(config.commit_parser, "conventional");
    assert!(config.major_on_zero);
    assert!(config.allow_zero_version);
    assert!(!config.add_partial_tags);
    assert_eq!(config.remote, "origin");
    assert_eq!(config.branches.len(), 1);
    assert_eq!(config.branches[0].pattern, "(main|master)");
}
