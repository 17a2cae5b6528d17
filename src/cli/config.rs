use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use crate::api::ApiClient;
use crate::cli::utils::output_record;
use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::session::{restricted_view, AuthSession, FileSessionStore, GuardOutcome, SessionGuard, SessionStore};

/// `KAB_CONFIG_DIR`, else `~/.config/kaburlu/admin`
pub fn get_config_dir(config: &AppConfig) -> anyhow::Result<PathBuf> {
    let config_dir = match &config.session.config_dir {
        Some(dir) => dir.clone(),
        None => {
            let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
            PathBuf::from(home).join(".config").join("kaburlu").join("admin")
        }
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Everything a command needs before the session guard has run.
pub struct Context {
    pub config: &'static AppConfig,
    pub output: OutputFormat,
    pub config_dir: PathBuf,
    pub store: FileSessionStore,
}

impl Context {
    pub fn new(config: &'static AppConfig, output: OutputFormat) -> anyhow::Result<Self> {
        let config_dir = get_config_dir(config)?;
        let store = FileSessionStore::in_dir(&config_dir);
        Ok(Self { config, output, config_dir, store })
    }

    /// Client with no bearer token attached
    pub fn anonymous_client(&self) -> anyhow::Result<ApiClient> {
        Ok(ApiClient::from_config(self.config)?)
    }

    /// Run the session guard. A signed-in user without the required role
    /// gets their profile (ids removed) and an error.
    pub fn authorize(&self) -> anyhow::Result<Admin> {
        let guard = SessionGuard::from_config(self.config);
        match guard.check_store(&self.store)? {
            GuardOutcome::Unauthenticated => {
                Err(anyhow::anyhow!("Not signed in. Run `kab auth login` first"))
            }
            GuardOutcome::Unauthorized(profile) => {
                output_record(&self.output, "user", &restricted_view(&profile))?;
                Err(anyhow::anyhow!(
                    "Access restricted: the {} role is required",
                    guard.required_role()
                ))
            }
            GuardOutcome::Authorized(session) => {
                let client = self.anonymous_client()?.with_session(&session);
                Ok(Admin {
                    client,
                    session,
                    output: self.output.clone(),
                    page_size: self.config.list.default_page_size,
                    page_sizes: self.config.list.page_size_options.clone(),
                    config_dir: self.config_dir.clone(),
                })
            }
        }
    }

    pub fn current_session(&self) -> anyhow::Result<Option<AuthSession>> {
        Ok(self.store.load()?)
    }
}

/// A context that passed the session guard.
pub struct Admin {
    pub client: ApiClient,
    pub session: AuthSession,
    pub output: OutputFormat,
    pub page_size: u32,
    /// Sizes `--page-size` may pick from
    pub page_sizes: Vec<u32>,
    pub config_dir: PathBuf,
}

impl Admin {
    fn draft_path(&self, tenant_id: &str, domain_id: &str) -> PathBuf {
        self.config_dir
            .join("drafts")
            .join(format!("settings-{}-{}.json", tenant_id, domain_id))
    }

    /// Locally staged settings document for a domain, if any.
    pub fn load_settings_draft(&self, tenant_id: &str, domain_id: &str) -> anyhow::Result<Option<Value>> {
        let path = self.draft_path(tenant_id, domain_id);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    pub fn save_settings_draft(&self, tenant_id: &str, domain_id: &str, document: &Value) -> anyhow::Result<PathBuf> {
        let path = self.draft_path(tenant_id, domain_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(document)?)?;
        Ok(path)
    }

    pub fn clear_settings_draft(&self, tenant_id: &str, domain_id: &str) -> anyhow::Result<()> {
        let path = self.draft_path(tenant_id, domain_id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
