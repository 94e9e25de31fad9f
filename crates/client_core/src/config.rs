use std::{fmt, fs, path::Path, str::FromStr, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use shared::protocol::DEFAULT_PAGE_SIZE;
use tracing::warn;

use crate::scroll::DEFAULT_NEAR_BOTTOM_THRESHOLD_PX;

pub const DEFAULT_CONFIG_FILE: &str = "hub.toml";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    pub session_cookie: Option<String>,
    pub page_size: u32,
    pub near_bottom_threshold_px: f64,
    pub request_timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            session_cookie: None,
            page_size: DEFAULT_PAGE_SIZE,
            near_bottom_threshold_px: DEFAULT_NEAR_BOTTOM_THRESHOLD_PX,
            request_timeout: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    session_cookie: Option<String>,
    page_size: Option<u32>,
    near_bottom_threshold_px: Option<f64>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then the TOML file, then `HUB_*` environment variables.
///
/// An explicitly named file must exist; the default `hub.toml` is optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let raw = match path {
        Some(path) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("failed to read config file '{}'", path.display()))?,
        ),
        None => fs::read_to_string(DEFAULT_CONFIG_FILE).ok(),
    };
    if let Some(raw) = raw {
        apply_file(&mut settings, &raw)?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw).context("invalid config file")?;

    if let Some(v) = file_cfg.base_url {
        settings.base_url = v;
    }
    if let Some(v) = file_cfg.session_cookie {
        settings.session_cookie = Some(v);
    }
    if let Some(v) = file_cfg.page_size {
        settings.page_size = v.max(1);
    }
    if let Some(v) = file_cfg.near_bottom_threshold_px {
        settings.near_bottom_threshold_px = v;
    }
    if let Some(v) = file_cfg.request_timeout_secs {
        settings.request_timeout = Some(Duration::from_secs(v));
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("HUB_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = lookup("HUB_SESSION_COOKIE") {
        settings.session_cookie = Some(v);
    }
    if let Some(v) = parsed_env::<u32>(&lookup, "HUB_PAGE_SIZE") {
        settings.page_size = v.max(1);
    }
    if let Some(v) = parsed_env::<f64>(&lookup, "HUB_NEAR_BOTTOM_THRESHOLD") {
        settings.near_bottom_threshold_px = v;
    }
    if let Some(v) = parsed_env::<u64>(&lookup, "HUB_REQUEST_TIMEOUT_SECS") {
        settings.request_timeout = Some(Duration::from_secs(v));
    }
}

fn parsed_env<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(%key, value = %raw, "ignoring unparseable environment override");
            None
        }
    }
}

/// Admin list screens the backend exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    HelpSupport,
    Reports,
    Applications,
}

impl Resource {
    pub fn path(self) -> &'static str {
        match self {
            Self::HelpSupport => "/api/admin/help-support",
            Self::Reports => "/api/admin/reports",
            Self::Applications => "/api/admin/recruitment/applications",
        }
    }

    pub fn items_field(self) -> &'static str {
        match self {
            Self::HelpSupport => "messages",
            Self::Reports => "reports",
            Self::Applications => "applications",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::HelpSupport => "help-support",
            Self::Reports => "reports",
            Self::Applications => "applications",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "help-support" | "support" | "messages" => Ok(Self::HelpSupport),
            "reports" => Ok(Self::Reports),
            "applications" | "recruitment" => Ok(Self::Applications),
            other => Err(format!(
                "unknown resource '{other}', expected help-support, reports or applications"
            )),
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
