use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use super::platform;

pub const ENV_SHEETS_URL: &str = "GOOGLE_SHEETS_URL";
pub const ENV_SHEETS_API_KEY: &str = "GOOGLE_SHEETS_API_KEY";
pub const ENV_API_BASE_URL: &str = "ECBOARD_API_BASE_URL";

/// Photos shipped with the dashboard for the current ballot.
const BUILTIN_PHOTOS: [(&str, &str); 21] = [
    ("PRAVEEN KUMAR JHA", "/candidates/PRAVEEN_KUMAR_JHA.png"),
    ("ALKESH PARASHAR", "/candidates/ALKESH_PARASHAR.png"),
    ("ASHISH BANSAL (ZINNIA)", "/candidates/ASHISH_BANSAL_(ZINNIA).png"),
    ("ASHISH BANSAL (ORCHID)", "/candidates/ASHISH_BANSAL_(ORCHID).png"),
    ("JYOTI VERMA", "/candidates/JYOTI_VERMA.png"),
    ("KAVITA GUPTA", "/candidates/KAVITA_GUPTA.png"),
    ("RAHUL KUMAR", "/candidates/RAHUL_KUMAR.png"),
    ("SUNIL KUMAR DWIVEDI", "/candidates/SUNIL_KUMAR_DWIVEDI.png"),
    ("SURESH KUMAR VERMA", "/candidates/SURESH_KUMAR_VERMA.png"),
    ("VAISHALI SINHA", "/candidates/VAISHALI_SINHA.png"),
    ("VIDIT SRIVASTAVA", "/candidates/VIDIT_SRIVASTAVA.png"),
    ("VIKRAM SINGH GURJAR", "/candidates/VIKRAM_SINGH_GURJAR.png"),
    ("VINAY KUMAR SEHRAWAT", "/candidates/VINAY_SEHRAWAT.png"),
    ("VINOD KUMAR SINGH", "/candidates/VINOD_KUMAR_SINGH.png"),
    ("VIPIN KUMAR SINGH", "/candidates/VIPIN_KUMAR_SINGH.png"),
    ("AMIT KUMAR", "/candidates/AMIT_KUMAR.png"),
    ("ARUN KUMAR", "/candidates/ARUN_KUMAR.png"),
    ("MAHESH BHATI", "/candidates/MAHESH_BHATI.png"),
    ("NITIN ANAND", "/candidates/NITIN_ANAND.png"),
    ("VIJAY KUMAR SHARMA", "/candidates/VIJAY_KUMAR_SHARMA.png"),
    ("ANIT BHATI", "/candidates/ANIT_BHATI.png"),
];

fn default_photos() -> BTreeMap<String, String> {
    BUILTIN_PHOTOS
        .iter()
        .map(|(name, path)| (name.to_string(), path.to_string()))
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub http: HttpConfig,
    /// Candidate name -> photo path. Matched by `photos::PhotoDirectory`.
    /// A `[photos]` section replaces the built-in table.
    #[serde(default = "default_photos")]
    pub photos: BTreeMap<String, String>,
}

/// Where the dashboard gets its rows from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    /// Ranked JSON from the ecboard daemon (or any compatible endpoint).
    #[default]
    Endpoint,
    /// Read the spreadsheet directly through the Sheets v4 values API.
    Sheets,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default)]
    pub mode: SourceMode,
    /// Base URL of the data endpoint. Empty means `data_path` is used as-is.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_data_path")]
    pub data_path: String,
    /// Full spreadsheet URL as copied from the browser; the id is extracted from it.
    #[serde(default = "default_spreadsheet_url")]
    pub spreadsheet_url: String,
    #[serde(default = "default_range")]
    pub range: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_rotation_secs")]
    pub rotation_secs: u64,
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::default(),
            api_base_url: default_api_base_url(),
            data_path: default_data_path(),
            spreadsheet_url: default_spreadsheet_url(),
            range: default_range(),
            api_key: String::new(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            rotation_secs: default_rotation_secs(),
            refresh_secs: default_refresh_secs(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_api_base_url() -> String {
    format!("http://{}:{}", default_bind_address(), default_port())
}

fn default_data_path() -> String {
    "/api/google-sheets-data".to_string()
}

fn default_spreadsheet_url() -> String {
    String::new()
}

fn default_range() -> String {
    "Display!A2:K".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_rotation_secs() -> u64 {
    10
}

fn default_refresh_secs() -> u64 {
    60
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

impl SourceConfig {
    /// Full URL of the ranked-candidates endpoint.
    pub fn data_url(&self) -> String {
        build_api_url(&self.api_base_url, &self.data_path)
    }

    pub fn spreadsheet_id(&self) -> Option<&str> {
        spreadsheet_id(&self.spreadsheet_url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

impl ScheduleConfig {
    pub fn rotation_period(&self) -> Duration {
        Duration::from_secs(self.rotation_secs.max(1))
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_secs.max(1))
    }
}

impl Config {
    /// Load `config.toml`, writing defaults on first run, then apply
    /// environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        let mut config = if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            config
        } else {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }

    /// Blank variables are ignored so an empty export cannot wipe the file's value.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_SHEETS_URL) {
            self.source.spreadsheet_url = url;
        }
        if let Some(key) = get(ENV_SHEETS_API_KEY) {
            self.source.api_key = key;
        }
        if let Some(base) = get(ENV_API_BASE_URL) {
            self.source.api_base_url = base;
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            schedule: ScheduleConfig::default(),
            http: HttpConfig::default(),
            photos: default_photos(),
        }
    }
}

/// Extract the spreadsheet id from a Google Sheets URL (`.../d/<id>/...`).
pub fn spreadsheet_id(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("/d/")?;
    let end = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(rest.len());
    let id = &rest[..end];
    (!id.is_empty()).then_some(id)
}

/// Join an optional base URL and a path.
pub fn build_api_url(base: &str, path: &str) -> String {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        return path;
    }
    format!("{}{}", base, path)
}
