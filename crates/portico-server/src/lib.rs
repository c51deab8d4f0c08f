mod cors;
mod error_mapper;
mod extract;
mod health;
mod internal;
mod parameters;
mod session;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post};
use portico_auth::{SessionAuthority, SessionStore};
use portico_config::Config;
use tower_http::trace::TraceLayer;

pub use error_mapper::{ApiError, ErrorMapper};
pub use extract::{ExtractJson, ExtractPath};
pub use parameters::{ParameterRejection, collect_parameters};
pub use session::SessionInfo;

/// Session capacity used when no `[auth]` section is configured
const DEFAULT_SESSION_CAPACITY: u64 = 10_000;

/// Idle session timeout used when no `[auth]` section is configured
const DEFAULT_SESSION_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(60 * 60);

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

/// Builder for [`Server`]
///
/// Hosting code may supply its own session store, a different session
/// authority for the error mapper, and extra resource routes. Extra
/// routes share the error mapping hook.
pub struct ServerBuilder {
    config: Config,
    sessions: Option<SessionStore>,
    authority: Option<Arc<dyn SessionAuthority>>,
    routes: Router,
    listen_address: Option<SocketAddr>,
}

impl Server {
    /// Build the server from configuration with default collaborators
    pub fn new(config: Config) -> Self {
        Self::builder(config).build()
    }

    pub fn builder(config: Config) -> ServerBuilder {
        ServerBuilder {
            config,
            sessions: None,
            authority: None,
            routes: Router::new(),
            listen_address: None,
        }
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}

impl ServerBuilder {
    /// Use an existing session store instead of one built from config
    #[must_use]
    pub fn sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = Some(sessions);
        self
    }

    /// Invalidate sessions through `authority` instead of the session store
    #[must_use]
    pub fn session_authority(mut self, authority: Arc<dyn SessionAuthority>) -> Self {
        self.authority = Some(authority);
        self
    }

    /// Merge additional routes under the error mapping hook
    #[must_use]
    pub fn routes(mut self, routes: Router) -> Self {
        self.routes = self.routes.merge(routes);
        self
    }

    /// Override the configured listen address
    #[must_use]
    pub fn listen_address(mut self, listen_address: SocketAddr) -> Self {
        self.listen_address = Some(listen_address);
        self
    }

    pub fn build(self) -> Server {
        let Self {
            config,
            sessions,
            authority,
            routes,
            listen_address,
        } = self;

        let listen_address = listen_address.unwrap_or_else(|| config.server.listen_address());

        let sessions = sessions.unwrap_or_else(|| match config.auth {
            Some(ref auth) => SessionStore::new(auth.session_timeout(), auth.session_capacity),
            None => SessionStore::new(DEFAULT_SESSION_TIMEOUT, DEFAULT_SESSION_CAPACITY),
        });

        let authority = authority.unwrap_or_else(|| Arc::new(sessions.clone()) as Arc<dyn SessionAuthority>);
        let mapper = Arc::new(ErrorMapper::new(authority));

        let mut app = routes
            .route("/api/session", get(session::session_handler).with_state(sessions.clone()))
            .fallback(error_mapper::not_found_handler);

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, get(health::health_handler));
        }

        // Internal session registration
        if let Some(ref auth_config) = config.auth
            && auth_config.enabled
        {
            let internal_state = internal::InternalState {
                sessions,
                gateway_secret: auth_config.gateway_secret.clone(),
            };
            app = app
                .route(
                    "/internal/sessions",
                    post(internal::register_session_handler).with_state(internal_state.clone()),
                )
                .route(
                    "/internal/sessions/{token}",
                    delete(internal::revoke_session_handler).with_state(internal_state),
                );
        }

        // JSON 405 for known paths; registered once every route is in place
        app = app.method_not_allowed_fallback(error_mapper::method_not_allowed_handler);

        // Apply middleware layers (innermost first)

        // Error mapping (innermost, sees every handler's raised errors)
        let form_body_limit = config.server.form_body_limit;
        app = app.layer(axum::middleware::from_fn(move |req, next| {
            let mapper = Arc::clone(&mapper);
            async move { error_mapper::error_mapping_middleware(mapper, form_body_limit, req, next).await }
        }));

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        // CORS
        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        Server {
            router: app,
            listen_address,
        }
    }
}
