//! Tests for credential resolution and derived settings.

use std::time::Duration;

use rstest::rstest;

use crate::InsightConfig;

#[rstest]
fn configured_github_token_wins_over_environment() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", Some("env-token"))]);
    let config = InsightConfig {
        github_token: Some("configured".to_owned()),
        ..Default::default()
    };

    assert_eq!(config.resolve_github_token().as_deref(), Some("configured"));
}

#[rstest]
fn github_token_falls_back_to_conventional_variable() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", Some("env-token"))]);
    let config = InsightConfig::default();

    assert_eq!(config.resolve_github_token().as_deref(), Some("env-token"));
}

#[rstest]
fn missing_github_token_is_none() {
    let _guard = env_lock::lock_env([("GITHUB_TOKEN", None::<&str>)]);
    let config = InsightConfig {
        github_token: Some("   ".to_owned()),
        ..Default::default()
    };

    assert!(
        config.resolve_github_token().is_none(),
        "blank tokens should count as missing"
    );
}

#[rstest]
fn ai_key_falls_back_to_groq_variable() {
    let _guard = env_lock::lock_env([("GROQ_API_KEY", Some("gsk-env"))]);
    let config = InsightConfig::default();

    assert_eq!(config.resolve_ai_api_key().as_deref(), Some("gsk-env"));
}

#[rstest]
fn missing_ai_key_is_none() {
    let _guard = env_lock::lock_env([("GROQ_API_KEY", None::<&str>)]);
    let config = InsightConfig::default();

    assert!(config.resolve_ai_api_key().is_none());
}

#[rstest]
#[case(0, 1)]
#[case(1, 1)]
#[case(60, 60)]
fn poll_interval_is_at_least_one_second(#[case] configured: u64, #[case] expected: u64) {
    let config = InsightConfig {
        poll_interval_seconds: configured,
        ..Default::default()
    };

    assert_eq!(config.poll_interval(), Duration::from_secs(expected));
}

#[rstest]
fn notification_log_uses_configured_path() {
    let config = InsightConfig {
        notifications_path: "state/events.json".to_owned(),
        ..Default::default()
    };

    assert_eq!(config.notification_log().path().as_str(), "state/events.json");
}
