//! Configuration file to running settings.

use std::fs;
use std::time::Duration;

use anora_config::{AnoraConfig, EndpointSource, ResolvedEndpoint, persist_endpoint};
use anora_engine::{AppSettings, select_backend};

const SAMPLE: &str = r#"# anora settings
[app]
reduced_motion = true

[animation]
command_text = "ssh example.shop"
type_speed_ms = 20

[form]
success_display_ms = 1000
"#;

#[test]
fn config_file_drives_app_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, SAMPLE).unwrap();

    let config = AnoraConfig::load_from(&path).unwrap();
    let settings = AppSettings::from_config(Some(&config));
    assert!(settings.ui.reduced_motion);
    assert_eq!(settings.animation.command_text, "ssh example.shop");
    assert_eq!(settings.animation.type_speed, Duration::from_millis(20));
    assert_eq!(settings.form.success_display, Duration::from_secs(1));
    assert_eq!(
        settings.animation.intro_text,
        AppSettings::default().animation.intro_text
    );
}

#[test]
fn persisted_endpoint_is_picked_up_and_settings_survive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, SAMPLE).unwrap();

    persist_endpoint(&path, "https://happy-animal-123.convex.cloud/").unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("# anora settings"));

    let config = AnoraConfig::load_from(&path).unwrap();
    assert_eq!(
        config.convex_url(),
        Some("https://happy-animal-123.convex.cloud")
    );
    assert!(config.ui_options().reduced_motion);

    let endpoint = ResolvedEndpoint::from_candidates(None, config.convex_url(), None);
    assert_eq!(endpoint.source, EndpointSource::ConfigFile);
    let backend = select_backend(&endpoint, config.request_timeout()).unwrap();
    assert_eq!(
        backend.describe(),
        "convex (https://happy-animal-123.convex.cloud)"
    );
}

#[test]
fn broken_config_is_an_error_not_a_panic() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[app\nascii_only = yes").unwrap();

    let err = AnoraConfig::load_from(&path).unwrap_err();
    assert_eq!(err.path(), Some(path.as_path()));
    assert!(persist_endpoint(&path, "https://happy-animal-123.convex.cloud").is_err());
}

#[test]
fn environment_beats_config_file_and_build_time() {
    let endpoint = ResolvedEndpoint::from_candidates(
        Some("https://env.convex.cloud"),
        Some("https://file.convex.cloud"),
        Some("https://build.convex.cloud"),
    );
    assert_eq!(endpoint.url, "https://env.convex.cloud");
    assert_eq!(endpoint.source, EndpointSource::Environment);

    let unset = ResolvedEndpoint::from_candidates(Some(" "), None, None);
    assert!(!unset.is_configured());
    let backend = select_backend(&unset, None).unwrap();
    assert_eq!(backend.describe(), "console");
}
