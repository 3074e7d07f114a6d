//! HTTP edge with deferred startup.
//!
//! `new()` wires state, `start()` binds the listener, `serve()` accepts
//! requests until the shutdown future resolves and then drains.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use axum::Router;
use dmx_gatekeeper_core::models::{Lab, LabCommand, LabWorkflow};
use dmx_gatekeeper_core::Resource;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::auth::{require_scopes, Authenticator};
use super::config::{NetworkConfig, TlsConfig};
use super::handlers::{
    delete_resource, get_all_resources, get_resource, health_handler, liveness_handler,
    post_resource, put_resource, readiness_handler, AppState,
};
use super::middleware::{build_http_layers, track_in_flight};
use super::shutdown::ShutdownController;
use crate::config::AuthConfig;
use crate::service::{FoundationService, ResourceService};
use crate::traits::{LoggingBroker, ResourceBroker};

/// One foundation service per resource type.
#[derive(Clone)]
pub struct ResourceServices {
    pub labs: Arc<dyn ResourceService<Lab>>,
    pub lab_commands: Arc<dyn ResourceService<LabCommand>>,
    pub lab_workflows: Arc<dyn ResourceService<LabWorkflow>>,
}

impl ResourceServices {
    /// Builds all three services over one broker serving every resource type.
    #[must_use]
    pub fn from_brokers<B, L>(broker: &Arc<B>, logging: &Arc<L>) -> Self
    where
        B: ResourceBroker<Lab> + ResourceBroker<LabCommand> + ResourceBroker<LabWorkflow> + 'static,
        L: LoggingBroker + 'static,
    {
        Self {
            labs: Arc::new(FoundationService::<Lab, B, L>::new(
                Arc::clone(broker),
                Arc::clone(logging),
            )),
            lab_commands: Arc::new(FoundationService::<LabCommand, B, L>::new(
                Arc::clone(broker),
                Arc::clone(logging),
            )),
            lab_workflows: Arc::new(FoundationService::<LabWorkflow, B, L>::new(
                Arc::clone(broker),
                Arc::clone(logging),
            )),
        }
    }
}

/// Routes for one resource collection, e.g. `/api/labs` and `/api/labs/{id}`.
fn resource_routes<R: Resource>(collection: &str) -> Router<AppState>
where
    Arc<dyn ResourceService<R>>: FromRef<AppState>,
{
    Router::new()
        .route(
            collection,
            post(post_resource::<R>)
                .get(get_all_resources::<R>)
                .put(put_resource::<R>),
        )
        .route(
            &format!("{collection}/{{id}}"),
            get(get_resource::<R>).delete(delete_resource::<R>),
        )
}

/// Assembles the full router.
///
/// Health probes sit outside the auth layer; every `/api` route requires a
/// token satisfying the method's scope policy.
pub fn build_router(state: AppState, auth: Arc<Authenticator>, config: &NetworkConfig) -> Router {
    let api = Router::new()
        .merge(resource_routes::<Lab>("/api/labs"))
        .merge(resource_routes::<LabCommand>("/api/labcommands"))
        .merge(resource_routes::<LabWorkflow>("/api/labworkflows"))
        .route_layer(from_fn_with_state(auth, require_scopes));

    Router::new()
        .route("/health", get(health_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .merge(api)
        .layer(from_fn_with_state(
            Arc::clone(&state.shutdown),
            track_in_flight,
        ))
        .layer(build_http_layers(config))
        .with_state(state)
}

/// Owns the listener and the state shared with handlers.
pub struct NetworkModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    state: AppState,
    auth: Arc<Authenticator>,
}

impl NetworkModule {
    /// Wires state without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig, auth: AuthConfig, services: ResourceServices) -> Self {
        let state = AppState {
            labs: services.labs,
            lab_commands: services.lab_commands,
            lab_workflows: services.lab_workflows,
            shutdown: Arc::new(ShutdownController::new()),
            start_time: Instant::now(),
        };
        Self {
            config,
            listener: None,
            state,
            auth: Arc::new(Authenticator::new(auth)),
        }
    }

    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.state.shutdown)
    }

    pub fn build_router(&self) -> Router {
        build_router(self.state.clone(), Arc::clone(&self.auth), &self.config)
    }

    /// Binds the listener. Returns the bound port, which differs from the
    /// configured one when port 0 asks the OS to choose.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves until `shutdown` resolves, then drains in-flight requests for
    /// up to `drain_timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error on a fatal I/O error or if TLS material cannot load.
    ///
    /// # Panics
    ///
    /// Panics if `start()` was not called before `serve()`.
    pub async fn serve(
        mut self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let listener = self
            .listener
            .take()
            .expect("start() must be called before serve()");
        let router = self.build_router();
        let controller = self.shutdown_controller();

        controller.set_ready();

        if let Some(tls) = &self.config.tls {
            serve_tls(listener, router, tls, shutdown).await?;
        } else {
            info!("Serving plain HTTP connections");
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown)
                .await?;
        }

        controller.trigger_shutdown();
        if controller.wait_for_drain(self.config.drain_timeout).await {
            info!("All in-flight requests drained");
        } else {
            warn!(
                in_flight = controller.in_flight_count(),
                "Drain timeout expired with in-flight requests remaining"
            );
        }
        Ok(())
    }
}

/// Serves HTTPS via `axum-server`, reusing the pre-bound listener.
async fn serve_tls(
    listener: TcpListener,
    router: Router,
    tls: &TlsConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    let rustls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load TLS certificates: {e}"))?;

    let addr = listener.local_addr()?;
    let std_listener = listener.into_std()?;
    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();

    tokio::spawn(async move {
        shutdown.await;
        shutdown_handle.graceful_shutdown(None);
    });

    info!("Serving TLS connections on {}", addr);

    axum_server::from_tcp_rustls(std_listener, rustls_config)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use dmx_gatekeeper_core::TransportError;
    use serde_json::Value;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::network::auth::tests::{auth_config, bearer};
    use crate::test_support::{new_lab, stored_lab, stub_services, Behavior};

    fn router(labs: Behavior<Lab>, auth: AuthConfig) -> Router {
        NetworkModule::new(NetworkConfig::default(), auth, stub_services(labs)).build_router()
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn health_needs_no_token() {
        let app = router(Behavior::Succeed(stored_lab()), auth_config());
        let (status, body) = send(app, request(Method::GET, "/health", None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "starting");
    }

    #[tokio::test]
    async fn api_without_token_is_unauthorized() {
        let app = router(Behavior::Succeed(stored_lab()), auth_config());
        let (status, _) = send(app, request(Method::GET, "/api/labs", None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn write_with_read_scope_is_forbidden() {
        let app = router(Behavior::Succeed(stored_lab()), auth_config());
        let body = serde_json::to_value(new_lab()).unwrap();
        let token = bearer("Labs.Read");
        let (status, _) =
            send(app, request(Method::POST, "/api/labs", Some(&token), Some(body))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn post_returns_created_resource() {
        let stored = stored_lab();
        let app = router(Behavior::Succeed(stored.clone()), auth_config());
        let body = serde_json::to_value(new_lab()).unwrap();
        let token = bearer("Labs.ReadWrite");

        let (status, body) =
            send(app, request(Method::POST, "/api/labs", Some(&token), Some(body))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(serde_json::from_value::<Lab>(body).unwrap(), stored);
    }

    #[tokio::test]
    async fn invalid_lab_is_bad_request_with_field_errors() {
        let app = router(Behavior::Succeed(stored_lab()), auth_config());
        let mut lab = new_lab();
        lab.name = String::new();
        let token = bearer("Labs.ReadWrite");

        let (status, body) = send(
            app,
            request(Method::POST, "/api/labs", Some(&token), Some(serde_json::to_value(lab).unwrap())),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["category"], "validation");
        assert_eq!(body["errors"]["Name"][0], "Name is required");
    }

    #[tokio::test]
    async fn null_name_and_missing_status_reach_validation() {
        let app = router(Behavior::Succeed(stored_lab()), auth_config());
        let mut body = serde_json::to_value(new_lab()).unwrap();
        body["Name"] = Value::Null;
        body.as_object_mut().unwrap().remove("Status");
        let token = bearer("Labs.ReadWrite");

        let (status, body) =
            send(app, request(Method::POST, "/api/labs", Some(&token), Some(body))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["category"], "validation");
        assert_eq!(body["errors"]["Name"][0], "Name is required");
        assert!(body["errors"]["Status"].is_array());
    }

    #[tokio::test]
    async fn downstream_not_found_is_not_found() {
        let app = router(
            Behavior::Fail(TransportError::NotFound {
                message: "no such lab".into(),
            }),
            auth_config(),
        );
        let uri = format!("/api/labs/{}", Uuid::new_v4());
        let token = bearer("Labs.Read");

        let (status, body) = send(app, request(Method::GET, &uri, Some(&token), None)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["category"], "dependency_validation");
    }

    #[tokio::test]
    async fn downstream_auth_failure_is_internal_error() {
        let app = router(
            Behavior::Fail(TransportError::Unauthorized {
                message: String::new(),
            }),
            auth_config(),
        );
        let token = bearer("Labs.Read");

        let (status, body) =
            send(app, request(Method::GET, "/api/labs", Some(&token), None)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["category"], "dependency");
    }

    #[tokio::test]
    async fn anonymous_mode_serves_without_token() {
        let auth = AuthConfig {
            allow_anonymous: true,
            ..AuthConfig::default()
        };
        let app = router(Behavior::Succeed(stored_lab()), auth);

        let uri = format!("/api/labcommands/{}", Uuid::new_v4());
        let (status, body) = send(app, request(Method::DELETE, &uri, None, None)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["Id"].is_string());
    }

    #[tokio::test]
    async fn start_binds_to_os_assigned_port() {
        let mut module = NetworkModule::new(
            NetworkConfig {
                host: "127.0.0.1".to_string(),
                ..NetworkConfig::default()
            },
            auth_config(),
            stub_services(Behavior::Succeed(stored_lab())),
        );
        let port = module.start().await.unwrap();
        assert!(port > 0);
        assert!(module.listener.is_some());
    }

    #[tokio::test]
    async fn serve_drains_and_stops_after_shutdown() {
        let mut module = NetworkModule::new(
            NetworkConfig {
                host: "127.0.0.1".to_string(),
                ..NetworkConfig::default()
            },
            auth_config(),
            stub_services(Behavior::Succeed(stored_lab())),
        );
        module.start().await.unwrap();
        let controller = module.shutdown_controller();

        module.serve(async {}).await.unwrap();

        assert_eq!(controller.health_state(), crate::network::HealthState::Stopped);
    }

    #[tokio::test]
    #[should_panic(expected = "start() must be called before serve()")]
    async fn serve_panics_without_start() {
        let module = NetworkModule::new(
            NetworkConfig::default(),
            auth_config(),
            stub_services(Behavior::Succeed(stored_lab())),
        );
        let _ = module.serve(std::future::pending::<()>()).await;
    }
}
