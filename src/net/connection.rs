//! Per-connection serving and lifecycle tracking.
//!
//! # Responsibilities
//! - Generate unique connection IDs for tracing
//! - Drive one HTTP/1.1 connection through the router
//! - Attach the peer address to every request
//! - Close keep-alive connections that stay idle too long
//!
//! A connection is idle when no request is in flight. The idle clock
//! restarts whenever a request starts or finishes.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ConnectInfo;
use axum::Router;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::TcpStream;
use tokio::time::{sleep_until, Instant};
use tower::ServiceExt;

/// Global atomic counter for connection IDs.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Fixed transport timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportTimeouts {
    /// Time allowed to receive request headers.
    pub read_header: Duration,
    /// Time allowed to receive the request body.
    pub read: Duration,
    /// Time allowed to produce the response.
    pub write: Duration,
    /// Keep-alive connections with nothing in flight are closed after this.
    pub idle: Duration,
}

impl Default for TransportTimeouts {
    fn default() -> Self {
        Self {
            read_header: Duration::from_secs(5),
            read: Duration::from_secs(10),
            write: Duration::from_secs(10),
            idle: Duration::from_secs(120),
        }
    }
}

/// In-flight request count and last activity of one connection.
#[derive(Debug, Clone)]
pub struct Activity {
    inner: Arc<ActivityInner>,
}

#[derive(Debug)]
struct ActivityInner {
    started: Instant,
    in_flight: AtomicUsize,
    /// Milliseconds since `started` of the last request start or finish.
    last_ms: AtomicU64,
}

impl Activity {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ActivityInner {
                started: Instant::now(),
                in_flight: AtomicUsize::new(0),
                last_ms: AtomicU64::new(0),
            }),
        }
    }

    fn touch(&self) {
        let elapsed = self.inner.started.elapsed().as_millis();
        self.inner
            .last_ms
            .store(u64::try_from(elapsed).unwrap_or(u64::MAX), Ordering::Relaxed);
    }

    /// Mark a request as started. Dropping the guard marks it finished.
    pub fn begin(&self) -> InFlightGuard {
        self.inner.in_flight.fetch_add(1, Ordering::SeqCst);
        self.touch();
        InFlightGuard {
            activity: self.clone(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// When the connection becomes idle for `idle`, assuming nothing changes.
    pub fn idle_deadline(&self, idle: Duration) -> Instant {
        let last = Duration::from_millis(self.inner.last_ms.load(Ordering::Relaxed));
        self.inner.started + last + idle
    }

    /// Next moment the idle watchdog should look at this connection.
    pub fn next_check(&self, idle: Duration) -> Instant {
        if self.in_flight() > 0 {
            Instant::now() + idle
        } else {
            self.idle_deadline(idle)
        }
    }

    /// Whether the connection has been idle for at least `idle`.
    pub fn is_idle(&self, idle: Duration) -> bool {
        self.in_flight() == 0 && Instant::now() >= self.idle_deadline(idle)
    }
}

impl Default for Activity {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard held while a request is in flight.
#[derive(Debug)]
pub struct InFlightGuard {
    activity: Activity,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.activity.inner.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.activity.touch();
    }
}

/// Serve one accepted connection until the peer goes away, an error
/// occurs, or the connection idles out.
pub async fn serve(stream: TcpStream, remote: SocketAddr, router: Router, timeouts: TransportTimeouts) {
    let id = ConnectionId::new();
    let activity = Activity::new();

    let service_activity = activity.clone();
    let service = hyper::service::service_fn(move |mut req: hyper::Request<Incoming>| {
        let router = router.clone();
        let guard = service_activity.begin();
        req.extensions_mut().insert(ConnectInfo(remote));
        async move {
            let response = router.oneshot(req).await;
            drop(guard);
            response
        }
    });

    let conn = http1::Builder::new()
        .timer(TokioTimer::new())
        .header_read_timeout(timeouts.read_header)
        .keep_alive(true)
        .serve_connection(TokioIo::new(stream), service);
    tokio::pin!(conn);

    loop {
        tokio::select! {
            result = conn.as_mut() => {
                if let Err(err) = result {
                    tracing::debug!(connection_id = %id, error = %err, "Connection error");
                }
                break;
            }
            _ = sleep_until(activity.next_check(timeouts.idle)) => {
                if activity.is_idle(timeouts.idle) {
                    tracing::debug!(connection_id = %id, peer_addr = %remote, "Closing idle connection");
                    conn.as_mut().graceful_shutdown();
                    if let Err(err) = conn.as_mut().await {
                        tracing::debug!(connection_id = %id, error = %err, "Connection error");
                    }
                    break;
                }
            }
        }
    }

    tracing::trace!(connection_id = %id, "Connection closed");
}
