use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_BASE: &str = "https://app.kaburlumedia.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub list: ListConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub default_page_size: u32,
    pub page_size_options: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Role claim the dashboard requires; anything else gets the restricted shell
    pub required_role: String,
    pub config_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides; the browser-era variable is still honoured
        if let Ok(v) = env::var("KAB_API_BASE").or_else(|_| env::var("NEXT_PUBLIC_API_BASE")) {
            let trimmed = v.trim().trim_end_matches('/');
            if !trimmed.is_empty() {
                self.api.base_url = trimmed.to_string();
            }
        }
        if let Ok(v) = env::var("KAB_API_TIMEOUT_SECS") {
            self.api.timeout_secs = v.parse().unwrap_or(self.api.timeout_secs);
        }
        if let Ok(v) = env::var("KAB_API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // List overrides
        if let Ok(v) = env::var("KAB_DEFAULT_PAGE_SIZE") {
            self.list.default_page_size = v.parse().unwrap_or(self.list.default_page_size);
        }

        // Session overrides
        if let Ok(v) = env::var("KAB_REQUIRED_ROLE") {
            if !v.trim().is_empty() {
                self.session.required_role = v.trim().to_uppercase();
            }
        }
        if let Ok(v) = env::var("KAB_CONFIG_DIR") {
            self.session.config_dir = Some(PathBuf::from(v));
        }

        self
    }

    fn base(environment: Environment, timeout_secs: u64, request_logging: bool) -> Self {
        Self {
            environment,
            api: ApiConfig {
                base_url: DEFAULT_API_BASE.to_string(),
                timeout_secs,
                user_agent: format!("kab/{}", env!("CARGO_PKG_VERSION")),
                enable_request_logging: request_logging,
            },
            list: ListConfig {
                default_page_size: 10,
                page_size_options: vec![10, 20, 50],
            },
            session: SessionConfig {
                required_role: "SUPER_ADMIN".to_string(),
                config_dir: None,
            },
        }
    }

    fn development() -> Self {
        Self::base(Environment::Development, 30, true)
    }

    fn staging() -> Self {
        Self::base(Environment::Staging, 15, true)
    }

    fn production() -> Self {
        Self::base(Environment::Production, 10, false)
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}
