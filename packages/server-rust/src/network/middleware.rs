//! Transport-level HTTP middleware.
//!
//! Layers listed first are outermost: they see the request first on the way
//! in and the response last on the way out.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::HeaderName;
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{MakeSpan, TraceLayer};
use tracing::Span;

use super::config::NetworkConfig;
use super::shutdown::ShutdownController;

type HttpLayers = tower::layer::util::Stack<
    PropagateRequestIdLayer,
    tower::layer::util::Stack<
        TimeoutLayer,
        tower::layer::util::Stack<
            CorsLayer,
            tower::layer::util::Stack<
                CompressionLayer,
                tower::layer::util::Stack<
                    TraceLayer<
                        tower_http::classify::SharedClassifier<
                            tower_http::classify::ServerErrorsAsFailures,
                        >,
                        RequestSpan,
                    >,
                    tower::layer::util::Stack<
                        SetRequestIdLayer<MakeRequestUuid>,
                        tower::layer::util::Identity,
                    >,
                >,
            >,
        >,
    >,
>;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Opens one span per gatekeeper request carrying its request id, so the
/// classified-error events logged inside a handler can be joined with the
/// caller's `X-Request-Id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "gatekeeper_request",
            method = %request.method(),
            path = %request.uri().path(),
            request_id,
        )
    }
}

/// Builds the transport middleware stack, outermost first: request id
/// assignment, the [`RequestSpan`] trace, gzip, CORS for the four API
/// methods, a 408 once `request_timeout` elapses, and request id echo.
#[must_use]
pub fn build_http_layers(config: &NetworkConfig) -> HttpLayers {
    let x_request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
        .layer(TraceLayer::new_for_http().make_span_with(RequestSpan))
        .layer(CompressionLayer::new())
        .layer(build_cors_layer(&config.cors_origins))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(PropagateRequestIdLayer::new(x_request_id))
        .into_inner()
}

fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Holds an in-flight guard for the lifetime of each request so shutdown
/// can wait for the downstream calls still running.
pub async fn track_in_flight(
    State(shutdown): State<Arc<ShutdownController>>,
    request: Request,
    next: Next,
) -> Response {
    let _guard = shutdown.in_flight_guard();
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::time::Duration;

    use axum::body::Body;
    use axum::routing::get;
    use axum::Router;
    use parking_lot::Mutex;
    use tower::ServiceExt;

    use super::*;

    #[test]
    fn layers_build_with_defaults_and_custom_timeout() {
        let _defaults = build_http_layers(&NetworkConfig::default());
        let _custom = build_http_layers(&NetworkConfig {
            request_timeout: Duration::from_secs(5),
            ..NetworkConfig::default()
        });
    }

    #[test]
    fn cors_accepts_wildcard_and_explicit_origins() {
        let _any = build_cors_layer(&["*".to_string()]);
        let _list = build_cors_layer(&[
            "http://localhost:3000".to_string(),
            "https://dmx.example.net".to_string(),
        ]);
    }

    #[tokio::test]
    async fn request_id_is_assigned_and_echoed() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(build_http_layers(&NetworkConfig::default()));

        let response = app
            .oneshot(axum::http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().contains_key("x-request-id"));
    }

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn request_span_records_the_request_id() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let request = axum::http::Request::builder()
                .method(Method::POST)
                .uri("/api/labs")
                .header(REQUEST_ID_HEADER, "req-42")
                .body(())
                .unwrap();
            let span = RequestSpan.make_span(&request);
            span.in_scope(|| tracing::info!("inside"));
        });

        let output = String::from_utf8(capture.0.lock().clone()).unwrap();
        assert!(output.contains("gatekeeper_request"), "{output}");
        assert!(output.contains("request_id=\"req-42\""), "{output}");
        assert!(output.contains("path=/api/labs"), "{output}");
    }

    #[tokio::test]
    async fn in_flight_guard_is_held_during_the_request() {
        let shutdown = Arc::new(ShutdownController::new());
        let observed = Arc::clone(&shutdown);
        let app = Router::new()
            .route(
                "/",
                get(move || {
                    let observed = Arc::clone(&observed);
                    async move { observed.in_flight_count().to_string() }
                }),
            )
            .layer(axum::middleware::from_fn_with_state(
                Arc::clone(&shutdown),
                track_in_flight,
            ));

        let response = app
            .oneshot(axum::http::Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"1");
        assert_eq!(shutdown.in_flight_count(), 0);
    }
}
