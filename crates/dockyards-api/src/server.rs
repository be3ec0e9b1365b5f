// crates/dockyards-api/src/server.rs
// ============================================================================
// Module: Dockyards API Server
// Description: Startup wiring and the HTTP listener.
// Purpose: Turn a validated configuration into a serving router.
// Dependencies: axum, tokio, dockyards-config, dockyards-core,
//               dockyards-store-sqlite
// ============================================================================

//! ## Overview
//! Startup validates the configuration, opens the configured object store,
//! ensures the global namespace exists, loads or generates the signing keys,
//! and builds the router. Generated keys and a disabled sign-up are reported
//! as security audit events.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use axum::Router;
use dockyards_config::DockyardsConfig;
use dockyards_config::StoreType;
use dockyards_core::Client;
use dockyards_core::FEATURE_USER_SIGN_UP;
use dockyards_core::FeatureSpec;
use dockyards_core::InMemoryObjectStore;
use dockyards_core::Namespace;
use dockyards_core::NamespaceSpec;
use dockyards_core::ObjectMeta;
use dockyards_core::ObjectStore;
use dockyards_core::StoreError;
use dockyards_store_sqlite::SqliteObjectStore;

use crate::audit::AuditSink;
use crate::audit::SecurityAuditEvent;
use crate::audit::sink_from_config;
use crate::routes::router;
use crate::state::ApiSettings;
use crate::state::ApiState;
use crate::tokens::TokenService;
use crate::validation::unknown_user_hash;

// ============================================================================
// SECTION: Server
// ============================================================================

/// Dockyards API server instance.
pub struct ApiServer {
    /// Validated configuration.
    config: DockyardsConfig,
    /// Shared handler state.
    state: ApiState,
}

impl ApiServer {
    /// Builds a server from configuration, opening the configured store.
    ///
    /// # Errors
    ///
    /// Returns [`ApiServerError`] when the configuration is invalid or the
    /// store, audit sink, or signing keys cannot be initialized.
    pub async fn from_config(config: DockyardsConfig) -> Result<Self, ApiServerError> {
        config.validate().map_err(|err| ApiServerError::Config(err.to_string()))?;
        let store = build_object_store(&config)?;
        let audit = sink_from_config(&config.audit).map_err(|err| ApiServerError::Init(err.to_string()))?;
        Self::assemble(config, store, audit).await
    }

    /// Builds a server over an existing store.
    ///
    /// # Errors
    ///
    /// Returns [`ApiServerError`] when the configuration is invalid or
    /// bootstrap fails.
    pub async fn with_store(
        config: DockyardsConfig,
        store: Arc<dyn ObjectStore>,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, ApiServerError> {
        config.validate().map_err(|err| ApiServerError::Config(err.to_string()))?;
        Self::assemble(config, store, audit).await
    }

    /// Returns the shared handler state.
    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }

    /// Returns the complete router.
    #[must_use]
    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Serves HTTP until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`ApiServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ApiServerError> {
        let addr = self.config.server.bind_addr().map_err(|err| ApiServerError::Config(err.to_string()))?;
        let app = self.router();
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|_| ApiServerError::Transport("http bind failed".to_string()))?;
        axum::serve(listener, app).await.map_err(|_| ApiServerError::Transport("http server failed".to_string()))
    }

    /// Bootstraps the global namespace and signing keys.
    async fn assemble(
        config: DockyardsConfig,
        store: Arc<dyn ObjectStore>,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, ApiServerError> {
        let client = Client::new(store);
        ensure_namespace(&client, &config.global_namespace).await?;
        let (tokens, generated) = TokenService::bootstrap(
            &client,
            &config.global_namespace,
            config.auth.access_token_ttl(),
            config.auth.refresh_token_ttl(),
        )
        .await
        .map_err(|err| ApiServerError::Init(err.to_string()))?;
        for kind in generated {
            audit.record_security(&SecurityAuditEvent::new(
                "signing_key_generated",
                Some(format!("generated {} signing key", kind.label())),
            ));
        }
        report_sign_up(&client, &config.global_namespace, audit.as_ref()).await?;

        let unknown_user_hash = unknown_user_hash(config.auth.bcrypt_cost)
            .await
            .map_err(|err| ApiServerError::Init(err.to_string()))?;
        let settings = ApiSettings {
            global_namespace: config.global_namespace.clone(),
            max_replicas: config.limits.max_replicas,
            bcrypt_cost: config.auth.bcrypt_cost,
            unknown_user_hash,
            max_body_bytes: config.server.max_body_bytes,
        };
        let state = ApiState {
            client,
            tokens: Arc::new(tokens),
            audit,
            settings: Arc::new(settings),
        };
        Ok(Self {
            config,
            state,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Opens the configured object store.
fn build_object_store(config: &DockyardsConfig) -> Result<Arc<dyn ObjectStore>, ApiServerError> {
    let store: Arc<dyn ObjectStore> = match config.store.store_type {
        StoreType::Memory => Arc::new(InMemoryObjectStore::new()),
        StoreType::Sqlite => {
            let sqlite_config = config
                .store
                .sqlite()
                .ok_or_else(|| ApiServerError::Config("sqlite store requires path".to_string()))?;
            let store =
                SqliteObjectStore::new(&sqlite_config).map_err(|err| ApiServerError::Init(err.to_string()))?;
            Arc::new(store)
        }
    };
    Ok(store)
}

/// Creates the namespace unless it already exists.
async fn ensure_namespace(client: &Client, name: &str) -> Result<(), ApiServerError> {
    let namespace = Namespace::new(ObjectMeta::named(name), NamespaceSpec::default());
    match client.create(&namespace).await {
        Ok(_) | Err(StoreError::AlreadyExists(_)) => Ok(()),
        Err(err) => Err(ApiServerError::Init(err.to_string())),
    }
}

/// Emits a notice when public sign-up is disabled.
async fn report_sign_up(client: &Client, namespace: &str, audit: &dyn AuditSink) -> Result<(), ApiServerError> {
    let feature = client
        .get::<FeatureSpec>(Some(namespace), FEATURE_USER_SIGN_UP)
        .await
        .map_err(|err| ApiServerError::Init(err.to_string()))?;
    if feature.is_none() {
        audit.record_security(&SecurityAuditEvent::new(
            "sign_up_disabled",
            Some(format!("feature {FEATURE_USER_SIGN_UP} is absent from {namespace}")),
        ));
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// API server errors.
#[derive(Debug, thiserror::Error)]
pub enum ApiServerError {
    /// Configuration errors.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization errors.
    #[error("init error: {0}")]
    Init(String),
    /// Transport errors.
    #[error("transport error: {0}")]
    Transport(String),
}
