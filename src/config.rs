// config.rs
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_REFINE_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

#[derive(Clone, Debug)]
pub struct Config {
    /// Upstream credential. Left as `None` so each proxy call can report it.
    pub google_api_key: Option<String>,
    pub api_base: String,
    pub refine_model: String,
    pub bind_addr: String,
    pub studio_url: String,
    pub theme_file: PathBuf,
    pub console: bool,
    pub log_config: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_addr = non_empty("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let studio_url = non_empty("STUDIO_API_URL")
            .unwrap_or_else(|| format!("http://{}", bind_addr))
            .trim_end_matches('/')
            .to_string();

        Config {
            google_api_key: non_empty("GOOGLE_API_KEY"),
            api_base: non_empty("GOOGLE_API_BASE")
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            refine_model: non_empty("REFINE_MODEL").unwrap_or_else(|| DEFAULT_REFINE_MODEL.to_string()),
            bind_addr,
            studio_url,
            theme_file: non_empty("THEME_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".poster-studio/prefs.json")),
            console: non_empty("POSTER_CONSOLE")
                .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
                .unwrap_or(false),
            log_config: non_empty("LOG_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("log4rs.yaml")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]);
        assert_eq!(config.google_api_key, None);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.refine_model, "gemini-2.0-flash");
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.studio_url, "http://127.0.0.1:8080");
        assert!(!config.console);
    }

    #[test]
    fn empty_credential_counts_as_missing() {
        let config = config_from(&[("GOOGLE_API_KEY", "   ")]);
        assert_eq!(config.google_api_key, None);
    }

    #[test]
    fn overrides_are_trimmed() {
        let config = config_from(&[
            ("GOOGLE_API_KEY", "secret"),
            ("GOOGLE_API_BASE", "http://localhost:9000/v1beta/"),
            ("BIND_ADDR", "0.0.0.0:3000"),
            ("POSTER_CONSOLE", "true"),
        ]);
        assert_eq!(config.google_api_key.as_deref(), Some("secret"));
        assert_eq!(config.api_base, "http://localhost:9000/v1beta");
        assert_eq!(config.studio_url, "http://0.0.0.0:3000");
        assert!(config.console);
    }
}
