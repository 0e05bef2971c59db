use std::env;

/// Label used for every message the service sends back.
pub const DEFAULT_ASSISTANT_NAME: &str = "Megha";

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_url: String,
    pub storage_path: String,
    pub db_path: String,
    pub assistant_name: String,
}

impl AppConfig {
    /// Point the client at a different service, e.g. from `--url`.
    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        let host = "127.0.0.1";
        let port = "5000";
        let storage_path = env::var("MEGHA_STORAGE_PATH").unwrap_or("./".to_string());
        let db_path = format!("{}/db", storage_path.trim_end_matches('/'));
        let api_url = env::var("MEGHA_API_URL")
            .unwrap_or(format!("http://{}:{}", host, port))
            .trim_end_matches('/')
            .to_string();
        let assistant_name = env::var("MEGHA_ASSISTANT_NAME")
            .unwrap_or_else(|_| DEFAULT_ASSISTANT_NAME.to_string());

        Self {
            api_url,
            storage_path,
            db_path,
            assistant_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        // SAFETY: tests touching the environment are serialized
        unsafe {
            env::remove_var("MEGHA_API_URL");
            env::remove_var("MEGHA_STORAGE_PATH");
            env::remove_var("MEGHA_ASSISTANT_NAME");
        }
    }

    #[test]
    #[serial]
    fn it_uses_defaults_without_env() {
        clear_env();
        let config = AppConfig::default();
        assert_eq!(config.api_url, "http://127.0.0.1:5000");
        assert_eq!(config.storage_path, "./");
        assert_eq!(config.db_path, "./db");
        assert_eq!(config.assistant_name, "Megha");
    }

    #[test]
    #[serial]
    fn it_reads_env_overrides() {
        clear_env();
        unsafe {
            env::set_var("MEGHA_API_URL", "http://chat.example.com/");
            env::set_var("MEGHA_STORAGE_PATH", "/tmp/megha/");
            env::set_var("MEGHA_ASSISTANT_NAME", "Asha");
        }
        let config = AppConfig::default();
        clear_env();

        assert_eq!(config.api_url, "http://chat.example.com");
        assert_eq!(config.storage_path, "/tmp/megha/");
        assert_eq!(config.db_path, "/tmp/megha/db");
        assert_eq!(config.assistant_name, "Asha");
    }

    #[test]
    #[serial]
    fn it_overrides_api_url() {
        clear_env();
        let config = AppConfig::default().with_api_url("http://localhost:8080/");
        assert_eq!(config.api_url, "http://localhost:8080");
    }
}
