//! Exam gateway service: main entry point.
//!
//! Serves the registration API, stored photos, and the frontend build from a
//! single HTTP listener.

use crate::domain::{GatewayConfig, GatewayError};
use crate::handlers::{meta, register, AppState};
use crate::middleware::{create_cors_layer, TracingLayer};
use crate::ports::{Clock, RegistrationStore, SystemClock};
use crate::registration::RegistrationService;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

/// Exam gateway service state
pub struct ExamGatewayService {
    config: GatewayConfig,
    registrations: Arc<RegistrationService>,
}

impl ExamGatewayService {
    /// Create a new gateway service
    pub fn new(
        config: GatewayConfig,
        store: Arc<dyn RegistrationStore>,
    ) -> Result<Self, GatewayError> {
        Self::with_clock(config, store, Arc::new(SystemClock))
    }

    /// Create a gateway service with an explicit time source
    pub fn with_clock(
        config: GatewayConfig,
        store: Arc<dyn RegistrationStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, GatewayError> {
        config
            .validate()
            .map_err(|e| GatewayError::Config(e.to_string()))?;

        let registrations = Arc::new(RegistrationService::new(&config, store, clock));

        Ok(Self {
            config,
            registrations,
        })
    }

    /// Build the HTTP router
    pub fn router(&self) -> Router {
        let state = AppState {
            registrations: Arc::clone(&self.registrations),
        };

        let api = Router::new()
            .route("/api/subjects", get(meta::subjects))
            .route("/api/health", get(meta::health))
            .route("/api/register", post(register::register))
            .layer(DefaultBodyLimit::max(self.config.limits.max_request_size))
            .with_state(state);

        let assets = &self.config.assets;
        let frontend =
            ServeDir::new(&assets.public_dir).fallback(ServeFile::new(assets.index_path()));

        let middleware = ServiceBuilder::new()
            .layer(create_cors_layer(&self.config.cors))
            .layer(TracingLayer::new());

        api.nest_service("/uploads", ServeDir::new(&self.config.uploads.dir))
            .fallback_service(frontend)
            .layer(middleware)
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!(
            addr = %addr,
            upload_dir = %self.config.uploads.dir.display(),
            public_dir = %self.config.assets.public_dir.display(),
            "Starting exam registration gateway"
        );

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Exam registration gateway stopped");
        Ok(())
    }

    /// Bind the configured address and serve until `shutdown` resolves
    pub async fn run<F>(&self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| GatewayError::Bind(format!("{}: {}", addr, e)))?;
        self.serve(listener, shutdown).await
    }
}
