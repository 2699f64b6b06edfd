use std::time::Duration;

use serde::{Deserialize, Serialize};

const DEFAULT_ACTIVITY_TABLE: &str = "Activity List";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 15;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum AppProfile {
    Dev,
    Prod,
}

impl AppProfile {
    pub fn from_env(value: Option<String>) -> Self {
        match value.as_deref() {
            Some("prod") | Some("production") => Self::Prod,
            _ => Self::Dev,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`. Without it the console
    /// runs against the bundled fixtures.
    pub supabase_url: Option<String>,
    pub anon_key: Option<String>,
    pub table: String,
    pub profile: AppProfile,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase_url: None,
            anon_key: None,
            table: DEFAULT_ACTIVITY_TABLE.to_string(),
            profile: AppProfile::Dev,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        crate::config::load_dotenv();

        Self::from_lookup(read_env)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup("BAL_SUPABASE_URL").filter(|value| !value.trim().is_empty()) {
            config.supabase_url = Some(url.trim().to_string());
        }

        if let Some(key) = lookup("BAL_SUPABASE_ANON_KEY").filter(|value| !value.trim().is_empty()) {
            config.anon_key = Some(key.trim().to_string());
        }

        if let Some(table) = lookup("BAL_ACTIVITY_TABLE").filter(|value| !value.trim().is_empty()) {
            config.table = table.trim().to_string();
        }

        config.profile = AppProfile::from_env(lookup("BAL_PROFILE"));

        if let Some(secs) =
            lookup("BAL_REQUEST_TIMEOUT_SECS").and_then(|value| value.parse::<u64>().ok())
        {
            config.request_timeout = Duration::from_secs(secs.max(1));
        }

        config
    }

    pub fn uses_fixtures(&self) -> bool {
        self.supabase_url.is_none()
    }
}

fn read_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .or_else(|| option_env_from_build(key).map(|s| s.to_string()))
}

fn option_env_from_build(key: &str) -> Option<&'static str> {
    match key {
        "BAL_SUPABASE_URL" => option_env!("BAL_SUPABASE_URL"),
        "BAL_SUPABASE_ANON_KEY" => option_env!("BAL_SUPABASE_ANON_KEY"),
        "BAL_ACTIVITY_TABLE" => option_env!("BAL_ACTIVITY_TABLE"),
        "BAL_PROFILE" => option_env!("BAL_PROFILE"),
        "BAL_REQUEST_TIMEOUT_SECS" => option_env!("BAL_REQUEST_TIMEOUT_SECS"),
        _ => None,
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv() {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            tracing::warn!("failed to load .env: {err}");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[inline]
pub fn load_dotenv() {}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_to_fixtures() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert!(config.uses_fixtures());
        assert_eq!(config.table, "Activity List");
        assert_eq!(config.profile, AppProfile::Dev);
        assert_eq!(config.request_timeout, Duration::from_secs(15));
    }

    #[test]
    fn reads_backend_settings() {
        let config = AppConfig::from_lookup(lookup(&[
            ("BAL_SUPABASE_URL", " https://demo.supabase.co "),
            ("BAL_SUPABASE_ANON_KEY", "anon"),
            ("BAL_ACTIVITY_TABLE", "Activities"),
            ("BAL_PROFILE", "production"),
            ("BAL_REQUEST_TIMEOUT_SECS", "0"),
        ]));
        assert_eq!(config.supabase_url.as_deref(), Some("https://demo.supabase.co"));
        assert_eq!(config.anon_key.as_deref(), Some("anon"));
        assert_eq!(config.table, "Activities");
        assert_eq!(config.profile, AppProfile::Prod);
        assert_eq!(config.request_timeout, Duration::from_secs(1));
    }

    #[test]
    fn blank_url_keeps_fixtures() {
        let config = AppConfig::from_lookup(lookup(&[("BAL_SUPABASE_URL", "  ")]));
        assert!(config.uses_fixtures());
    }
}
