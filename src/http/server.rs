//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with every endpoint
//! - Wrap each endpoint in the middleware stack (request ID, access log)
//! - Wire up transport layers (timeouts, CORS)
//! - Run the accept loop until shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::extract::Request;
use axum::routing::{get, MethodRouter};
use axum::Router;
use tower_http::timeout::{RequestBodyTimeoutLayer, TimeoutLayer};

use crate::config::Config;
use crate::http::cors::cors_layer;
use crate::http::handlers;
use crate::http::middleware::{AccessLogMiddleware, Handler, MiddlewareStack, RequestIdMiddleware};
use crate::http::request::RequestMeta;
use crate::lifecycle::ShutdownSignal;
use crate::net::connection::{self, TransportTimeouts};
use crate::net::Listener;
use crate::store::Store;

/// Pause after a failed accept before trying again.
const ACCEPT_ERROR_PAUSE: Duration = Duration::from_millis(100);

/// HTTP server bound to a store.
pub struct HttpServer {
    router: Router,
    store: Store,
    timeouts: TransportTimeouts,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &Config, store: Store) -> Self {
        let timeouts = TransportTimeouts::default();
        let router = Self::build_router(config, &timeouts);
        Self {
            router,
            store,
            timeouts,
        }
    }

    fn middleware_stack() -> MiddlewareStack {
        MiddlewareStack::new()
            .with(RequestIdMiddleware)
            .with(AccessLogMiddleware)
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &Config, timeouts: &TransportTimeouts) -> Router {
        let stack = Self::middleware_stack();

        let routes = Router::new()
            .route("/info", endpoint(&stack, handlers::info))
            .route("/healthz", endpoint(&stack, handlers::healthz))
            .route("/readyz", endpoint(&stack, handlers::readyz));

        with_transport_timeouts(routes, timeouts).layer(cors_layer(&config.allowed_origins))
    }

    /// Run the server, accepting connections until `shutdown` fires.
    ///
    /// Connections already accepted are not waited for.
    pub async fn run(&self, listener: Listener, mut shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        loop {
            tokio::select! {
                biased;

                _ = shutdown.recv() => break,

                accepted = listener.accept() => match accepted {
                    Ok((stream, remote)) => {
                        tokio::spawn(connection::serve(
                            stream,
                            remote,
                            self.router.clone(),
                            self.timeouts,
                        ));
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "Accept failed");
                        tokio::time::sleep(ACCEPT_ERROR_PAUSE).await;
                    }
                },
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router serving every request.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Give the store back once serving is over.
    pub fn into_store(self) -> Store {
        self.store
    }
}

/// Bound the time to read a request body and to produce a response.
#[allow(deprecated)]
pub(crate) fn with_transport_timeouts(router: Router, timeouts: &TransportTimeouts) -> Router {
    router
        .layer(TimeoutLayer::new(timeouts.write))
        .layer(RequestBodyTimeoutLayer::new(timeouts.read))
}

/// GET route running `handler` behind the middleware stack.
fn endpoint<H: Handler>(stack: &MiddlewareStack, handler: H) -> MethodRouter {
    let chain: Arc<dyn Handler> = stack.wrap(Arc::new(handler));
    get(move |req: Request| chain.call(req, RequestMeta::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::request::X_REQUEST_ID;
    use crate::store::StoreConfig;
    use axum::body::Body;
    use axum::http::{header, Method, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    fn server() -> HttpServer {
        let store = Store::connect_lazy(StoreConfig::new("postgres://postgres@127.0.0.1:1/test")).unwrap();
        HttpServer::new(&Config::default(), store)
    }

    async fn send(router: Router, req: Request) -> Response {
        router.oneshot(req).await.unwrap()
    }

    fn get_request(uri: &str) -> Request {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn info_endpoint() {
        let response = send(server().router(), get_request("/info")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(X_REQUEST_ID));
        assert_eq!(
            body_string(response).await,
            r#"{"data":"i am simple REST API service"}"#
        );
    }

    #[tokio::test]
    async fn health_endpoints() {
        let router = server().router();

        let response = send(router.clone(), get_request("/healthz")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"data":{"status":"healthy"}}"#);

        let response = send(router, get_request("/readyz")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"data":{"status":"ready"}}"#);
    }

    #[tokio::test]
    async fn request_ids_differ() {
        let router = server().router();
        let a = send(router.clone(), get_request("/healthz")).await;
        let b = send(router, get_request("/healthz")).await;
        assert_ne!(a.headers()[X_REQUEST_ID], b.headers()[X_REQUEST_ID]);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let response = send(server().router(), get_request("/accounts/1")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn wrong_method_is_rejected() {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/info")
            .body(Body::empty())
            .unwrap();
        let response = send(server().router(), req).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn preflight_from_allowed_origin() {
        let req = Request::builder()
            .method(Method::OPTIONS)
            .uri("/info")
            .header(header::ORIGIN, "http://localhost:3000")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap();
        let response = send(server().router(), req).await;

        assert!(response.status().is_success());
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn foreign_origin_gets_no_cors_headers() {
        let req = Request::builder()
            .uri("/info")
            .header(header::ORIGIN, "https://evil.example")
            .body(Body::empty())
            .unwrap();
        let response = send(server().router(), req).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn run_returns_on_shutdown() {
        let shutdown = crate::lifecycle::Shutdown::new();
        let listener = Listener::bind(std::net::SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();

        let signal = shutdown.signal();
        let task = tokio::spawn(async move {
            let server = server();
            server.run(listener, signal).await
        });
        shutdown.trigger();

        let result = tokio::time::timeout(Duration::from_secs(5), task).await;
        assert!(result.unwrap().unwrap().is_ok());
    }
}
