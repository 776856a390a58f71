//! Shared application state and the per-session registry.

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::HeaderMap;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use kate_core::{Error, Result, SessionState, StageCredentials};
use kate_semantha::{CachedSemantha, SemanthaApi, SemanthaClient};
use kate_stage::{SnowflakeStage, StageStore};

/// Header carrying the dashboard session id. Requests without it share the
/// `"default"` session.
pub const SESSION_HEADER: &str = "x-session-id";

/// Builds a stage store for a concrete credential record.
pub type StageFactory =
    Arc<dyn Fn(StageCredentials) -> Result<Arc<dyn StageStore>> + Send + Sync>;

/// One `SessionState` per session id, created on first access.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    inner: Arc<RwLock<HashMap<String, Arc<Mutex<SessionState>>>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the session for `id`, creating it with default state if absent.
    pub async fn session(&self, id: &str) -> Arc<Mutex<SessionState>> {
        if let Some(session) = self.inner.read().await.get(id) {
            return session.clone();
        }
        let mut guard = self.inner.write().await;
        guard
            .entry(id.to_string())
            .or_insert_with(|| {
                info!(session_id = %id, "creating session");
                Arc::new(Mutex::new(SessionState::new()))
            })
            .clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

/// Process-wide state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub semantha: Arc<dyn SemanthaApi>,
    pub sessions: SessionRegistry,
    pub stage_factory: StageFactory,
    /// Shared default stage account, if configured at startup.
    pub default_credentials: Option<StageCredentials>,
    /// Secret unlocking the default stage account.
    pub default_secret: Option<String>,
}

impl AppState {
    /// Build the production state from environment variables.
    pub fn from_env() -> Result<Self> {
        let semantha = CachedSemantha::new(SemanthaClient::from_env()?);
        Ok(Self {
            semantha: Arc::new(semantha),
            sessions: SessionRegistry::new(),
            stage_factory: Arc::new(|credentials| {
                Ok(Arc::new(SnowflakeStage::new(credentials)?) as Arc<dyn StageStore>)
            }),
            default_credentials: default_credentials_from_env(),
            default_secret: std::env::var("KATE_DEFAULT_STAGE_SECRET").ok(),
        })
    }

    /// State for tests: injected clients, no default stage account.
    pub fn for_tests(
        semantha: Arc<dyn SemanthaApi>,
        stage_factory: StageFactory,
    ) -> Self {
        Self {
            semantha,
            sessions: SessionRegistry::new(),
            stage_factory,
            default_credentials: None,
            default_secret: None,
        }
    }

    /// Stage store for the session's active credentials.
    ///
    /// The shared default account wins while it is enabled; otherwise the
    /// session's own record is used and must be complete.
    pub fn stage_for(&self, session: &SessionState) -> Result<Arc<dyn StageStore>> {
        let credentials = if session.default_credentials_enabled {
            match &self.default_credentials {
                Some(defaults) => defaults.clone(),
                None => session.stage_credentials.clone(),
            }
        } else {
            session.stage_credentials.clone()
        };
        if !credentials.is_complete() {
            return Err(Error::InvalidInput(
                "stage credentials are incomplete".to_string(),
            ));
        }
        (self.stage_factory)(credentials)
    }
}

/// Load the `KATE_SNOWFLAKE_*` default account; any missing variable means
/// no default account is offered.
fn default_credentials_from_env() -> Option<StageCredentials> {
    let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
    Some(StageCredentials {
        account: var("KATE_SNOWFLAKE_ACCOUNT")?,
        user: var("KATE_SNOWFLAKE_USER")?,
        password: var("KATE_SNOWFLAKE_PASSWORD")?,
        role: var("KATE_SNOWFLAKE_ROLE")?,
        warehouse: var("KATE_SNOWFLAKE_WAREHOUSE")?,
        database: var("KATE_SNOWFLAKE_DATABASE")?,
        schema: var("KATE_SNOWFLAKE_SCHEMA")?,
        stage: var("KATE_SNOWFLAKE_STAGE")?,
    })
}

/// Session id from the request headers.
pub fn session_id(headers: &HeaderMap) -> String {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("default")
        .to_string()
}
