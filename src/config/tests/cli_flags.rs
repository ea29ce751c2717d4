//! Tests for loading configuration from command-line flags.

use std::ffi::OsString;

use ortho_config::OrthoConfig;
use rstest::rstest;

use crate::InsightConfig;

fn load_with_args(cli_args: &[&str]) -> InsightConfig {
    let temp_dir = tempfile::TempDir::new().expect("temp dir should be created");
    let home = temp_dir.path().to_string_lossy().to_string();
    let _guard = env_lock::lock_env([
        ("REPOPULSE_REPO", None::<&str>),
        ("REPOPULSE_RAW_CONTENT_URL", None::<&str>),
        ("REPOPULSE_FEATURE", None::<&str>),
        ("HOME", Some(home.as_str())),
        ("XDG_CONFIG_HOME", Some(home.as_str())),
    ]);

    let mut args = vec![OsString::from("repopulse")];
    args.extend(cli_args.iter().map(OsString::from));
    InsightConfig::load_from_iter(args).expect("config should load")
}

#[rstest]
fn short_flags_reach_their_own_fields() {
    let config = load_with_args(&["-r", "octocat/hello", "-w", "http://mirror.local", "-f", "3"]);

    assert_eq!(config.repo.as_deref(), Some("octocat/hello"));
    assert_eq!(config.raw_content_url, "http://mirror.local");
    assert_eq!(config.feature, Some(3));
}

#[rstest]
fn long_flags_override_defaults() {
    let config = load_with_args(&["--raw-content-url", "http://mirror.local", "--repo", "a/b"]);

    assert_eq!(config.raw_content_url, "http://mirror.local");
    assert_eq!(config.repo.as_deref(), Some("a/b"));
    assert_eq!(config.bind, crate::config::DEFAULT_BIND);
}
