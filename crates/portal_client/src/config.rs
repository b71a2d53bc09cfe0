use std::{collections::HashMap, fs, path::Path, time::Duration};

use anyhow::{anyhow, Context};
use serde::Deserialize;
use url::Url;

pub const SETTINGS_FILE: &str = "portal.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub base_url: String,
    pub login_page: String,
    pub landing_page: String,
    pub default_avatar: String,
    pub switch_account_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".into(),
            login_page: "/login.html".into(),
            landing_page: "/index.html".into(),
            default_avatar: "/images/default-avatar.png".into(),
            switch_account_delay_ms: 500,
        }
    }
}

impl Settings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn switch_account_delay(&self) -> Duration {
        Duration::from_millis(self.switch_account_delay_ms)
    }

    fn apply_file(&mut self, raw: &str) {
        let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(raw) else {
            tracing::warn!("ignoring unreadable {SETTINGS_FILE}");
            return;
        };
        if let Some(v) = file_cfg.get("base_url") {
            self.base_url = v.clone();
        }
        if let Some(v) = file_cfg.get("login_page") {
            self.login_page = v.clone();
        }
        if let Some(v) = file_cfg.get("landing_page") {
            self.landing_page = v.clone();
        }
        if let Some(v) = file_cfg.get("default_avatar") {
            self.default_avatar = v.clone();
        }
        if let Some(v) = file_cfg.get("switch_account_delay_ms") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.switch_account_delay_ms = parsed;
            }
        }
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("PORTAL_BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("APP__BASE_URL") {
            self.base_url = v;
        }
        if let Some(v) = lookup("PORTAL_LOGIN_PAGE") {
            self.login_page = v;
        }
        if let Some(v) = lookup("PORTAL_LANDING_PAGE") {
            self.landing_page = v;
        }
        if let Some(v) = lookup("PORTAL_DEFAULT_AVATAR") {
            self.default_avatar = v;
        }
        if let Some(v) = lookup("APP__SWITCH_ACCOUNT_DELAY_MS") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.switch_account_delay_ms = parsed;
            }
        }
    }
}

/// Defaults, then `portal.toml` in the working directory, then environment.
pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE))
}

pub fn load_settings_from(path: &Path) -> Settings {
    let mut settings = Settings::default();
    if let Ok(raw) = fs::read_to_string(path) {
        settings.apply_file(&raw);
    }
    settings.apply_env(|key| std::env::var(key).ok());
    settings
}

/// Trims the configured backend address and rejects anything that is not an
/// absolute http(s) URL. The result never ends with `/`.
pub fn prepare_base_url(raw_base_url: &str) -> anyhow::Result<String> {
    let trimmed = raw_base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(Settings::default().base_url);
    }

    let parsed = Url::parse(trimmed)
        .with_context(|| format!("invalid backend base url '{raw_base_url}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(anyhow!(
            "backend base url '{raw_base_url}' must use http or https"
        ));
    }
    if parsed.cannot_be_a_base() || parsed.host_str().is_none() {
        return Err(anyhow!("backend base url '{raw_base_url}' has no host"));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
