use super::{load_settings_from, prepare_base_url, Settings};

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

#[test]
fn trims_trailing_slash_from_base_url() {
    assert_eq!(
        prepare_base_url(" http://127.0.0.1:8080/ ").expect("valid"),
        "http://127.0.0.1:8080"
    );
    assert_eq!(
        prepare_base_url("https://museum.example/api/").expect("valid"),
        "https://museum.example/api"
    );
}

#[test]
fn blank_base_url_falls_back_to_default() {
    assert_eq!(prepare_base_url("   ").expect("default"), Settings::default().base_url);
}

#[test]
fn rejects_non_http_base_url() {
    assert!(prepare_base_url("ftp://museum.example").is_err());
    assert!(prepare_base_url("not a url").is_err());
}

#[test]
fn file_values_override_defaults_and_env_overrides_file() {
    let mut settings = Settings::default();
    settings.apply_file(
        r#"
base_url = "http://file-host:9000"
login_page = "/signin.html"
switch_account_delay_ms = "50"
"#,
    );
    assert_eq!(settings.base_url, "http://file-host:9000");
    assert_eq!(settings.login_page, "/signin.html");
    assert_eq!(settings.switch_account_delay_ms, 50);

    let env_values: HashMap<&str, &str> = HashMap::from([
        ("PORTAL_BASE_URL", "http://env-host:1"),
        ("APP__BASE_URL", "http://app-host:2"),
        ("APP__SWITCH_ACCOUNT_DELAY_MS", "not-a-number"),
    ]);
    settings.apply_env(|key| env_values.get(key).map(|v| v.to_string()));
    assert_eq!(settings.base_url, "http://app-host:2");
    assert_eq!(settings.switch_account_delay_ms, 50);
    assert_eq!(settings.landing_page, "/index.html");
}

#[test]
fn unreadable_file_keeps_defaults() {
    let mut settings = Settings::default();
    settings.apply_file("base_url = [1, 2]");
    assert_eq!(settings.base_url, Settings::default().base_url);
}

#[test]
fn loads_settings_from_file_path() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("portal_client_config_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("portal.toml");
    fs::write(&path, "default_avatar = \"/img/none.png\"\n").expect("write settings");

    let settings = load_settings_from(&path);
    assert_eq!(settings.default_avatar, "/img/none.png");

    fs::remove_dir_all(temp_root).expect("cleanup");
}
