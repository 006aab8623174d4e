use poem::http::StatusCode;
use poem::{Endpoint, IntoResponse, Middleware, Request, Response};
use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::config::AppSettings;

const GENERAL_MESSAGE: &str = "Too many requests from this IP, please try again later.";
const AUTH_MESSAGE: &str = "Too many authentication attempts, please try again later.";

/// Which budget a request draws from. The auth families get a much smaller
/// one to slow down credential stuffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    General,
    Auth,
}

impl Family {
    pub fn of_path(path: &str) -> Family {
        if path.starts_with("/api/auth") || path.starts_with("/api/admin-auth") {
            Family::Auth
        } else {
            Family::General
        }
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
    pub max_auth_requests: u32,
}

impl RateLimitConfig {
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self {
            window: Duration::from_secs(settings.rate_limit_window_secs),
            max_requests: settings.rate_limit_max_requests,
            max_auth_requests: settings.rate_limit_max_auth_requests,
        }
    }
}

struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window per-IP request counter
///
/// An explicit injected collaborator rather than process-global state: main
/// builds one from settings and hands it to the middleware, and tests build
/// their own with tiny windows.
pub struct RateLimiter {
    config: RateLimitConfig,
    buckets: Mutex<HashMap<(IpAddr, Family), Window>>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Whether this request fits in the IP's current window.
    pub fn check(&self, ip: IpAddr, family: Family) -> bool {
        self.check_at(ip, family, Instant::now())
    }

    fn check_at(&self, ip: IpAddr, family: Family, now: Instant) -> bool {
        let limit = match family {
            Family::General => self.config.max_requests,
            Family::Auth => self.config.max_auth_requests,
        };

        let mut buckets = self.buckets.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let window = buckets.entry((ip, family)).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.config.window {
            window.started = now;
            window.count = 0;
        }

        if window.count >= limit {
            false
        } else {
            window.count += 1;
            true
        }
    }
}

/// Poem middleware applying a shared `RateLimiter` ahead of routing
pub struct RateLimit(pub Arc<RateLimiter>);

impl<E: Endpoint> Middleware<E> for RateLimit {
    type Output = RateLimitEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        RateLimitEndpoint {
            inner: ep,
            limiter: self.0.clone(),
        }
    }
}

pub struct RateLimitEndpoint<E> {
    inner: E,
    limiter: Arc<RateLimiter>,
}

impl<E: Endpoint> Endpoint for RateLimitEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> poem::Result<Self::Output> {
        let family = Family::of_path(req.uri().path());
        let ip = client_ip(&req).unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

        if !self.limiter.check(ip, family) {
            tracing::warn!("Rate limit exceeded for {} ({:?})", ip, family);
            let message = match family {
                Family::General => GENERAL_MESSAGE,
                Family::Auth => AUTH_MESSAGE,
            };
            let body = serde_json::json!({ "success": false, "message": message });
            return Ok(Response::builder()
                .status(StatusCode::TOO_MANY_REQUESTS)
                .content_type("application/json")
                .body(body.to_string()));
        }

        self.inner.call(req).await.map(IntoResponse::into_response)
    }
}

/// Client IP resolution: proxy headers first, then the socket address.
fn client_ip(req: &Request) -> Option<IpAddr> {
    // X-Forwarded-For (proxy/load balancer)
    if let Some(forwarded) = req.header("X-Forwarded-For") {
        if let Some(ip) = forwarded.split(',').next() {
            if let Ok(ip) = ip.trim().parse() {
                return Some(ip);
            }
        }
    }

    // X-Real-IP (nginx)
    if let Some(real_ip) = req.header("X-Real-IP") {
        if let Ok(ip) = real_ip.parse() {
            return Some(ip);
        }
    }

    req.remote_addr().as_socket_addr().map(|addr| addr.ip())
}
