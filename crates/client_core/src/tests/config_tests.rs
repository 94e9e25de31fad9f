use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_match_admin_screens() {
    let settings = Settings::default();
    assert_eq!(settings.page_size, 20);
    assert_eq!(settings.near_bottom_threshold_px, 80.0);
    assert_eq!(settings.request_timeout, None);
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r#"
base_url = "https://api.skillswap.example"
session_cookie = "sid=abc"
page_size = 50
request_timeout_secs = 15
"#,
    )
    .expect("parse");

    assert_eq!(settings.base_url, "https://api.skillswap.example");
    assert_eq!(settings.session_cookie.as_deref(), Some("sid=abc"));
    assert_eq!(settings.page_size, 50);
    assert_eq!(settings.request_timeout, Some(Duration::from_secs(15)));
}

#[test]
fn malformed_file_is_an_error() {
    let mut settings = Settings::default();
    assert!(apply_file(&mut settings, "page_size = \"many\"").is_err());
}

#[test]
fn env_overrides_file_values() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "base_url = \"http://file\"").expect("parse");
    apply_env(
        &mut settings,
        lookup_from(&[
            ("HUB_BASE_URL", "http://env"),
            ("HUB_PAGE_SIZE", "10"),
            ("HUB_NEAR_BOTTOM_THRESHOLD", "120"),
        ]),
    );

    assert_eq!(settings.base_url, "http://env");
    assert_eq!(settings.page_size, 10);
    assert_eq!(settings.near_bottom_threshold_px, 120.0);
}

#[test]
fn unparseable_env_values_are_ignored() {
    let mut settings = Settings::default();
    apply_env(
        &mut settings,
        lookup_from(&[("HUB_PAGE_SIZE", "lots"), ("HUB_REQUEST_TIMEOUT_SECS", "-1")]),
    );

    assert_eq!(settings.page_size, 20);
    assert_eq!(settings.request_timeout, None);
}

#[test]
fn explicit_missing_config_file_is_an_error() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("hub_missing_{suffix}.toml"));

    assert!(load_settings(Some(path.as_path())).is_err());
}

#[test]
fn explicit_config_file_is_loaded() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let path = env::temp_dir().join(format!("hub_config_{suffix}.toml"));
    fs::write(&path, "near_bottom_threshold_px = 64.0\n").expect("write config");

    let settings = load_settings(Some(path.as_path())).expect("load");
    assert_eq!(settings.near_bottom_threshold_px, 64.0);

    fs::remove_file(path).expect("cleanup");
}

#[test]
fn resources_parse_from_cli_names() {
    assert_eq!("help-support".parse::<Resource>(), Ok(Resource::HelpSupport));
    assert_eq!("Reports".parse::<Resource>(), Ok(Resource::Reports));
    assert_eq!(Resource::Applications.items_field(), "applications");
    assert!("coins".parse::<Resource>().is_err());
}
