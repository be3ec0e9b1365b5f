// crates/dockyards-api/src/audit.rs
// ============================================================================
// Module: Dockyards Audit Logging
// Description: Structured audit events for API request handling.
// Purpose: Emit redacted JSON-line audit logs without hard dependencies.
// Dependencies: axum, serde, serde_json, sha2, dockyards-config
// ============================================================================

//! ## Overview
//! This module defines audit event payloads and sinks for the API server.
//! Events are JSON lines so deployments can route them to their preferred
//! logging pipeline. Bearer tokens are never logged; authentication events
//! carry a SHA-256 fingerprint instead.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Instant;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use axum::extract::MatchedPath;
use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::Response;
use dockyards_config::AuditConfig;
use dockyards_config::AuditSinkType;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

use crate::auth::AuthenticatedSubject;
use crate::state::ApiState;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header carrying a caller-provided request identifier.
const REQUEST_ID_HEADER: &str = "x-request-id";
/// Longest request identifier copied into audit events.
const MAX_REQUEST_ID_LENGTH: usize = 128;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Request audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct RequestAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Request identifier when provided.
    pub request_id: Option<String>,
    /// HTTP method.
    pub method: String,
    /// Matched route template.
    pub route: String,
    /// Response status code.
    pub status: u16,
    /// Handling latency in milliseconds.
    pub latency_ms: u128,
    /// Authenticated user name when known.
    pub subject: Option<String>,
    /// Organization path parameter when the route is tenant-scoped.
    pub organization: Option<String>,
}

/// Authentication decision audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct AuthnAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// `allow` or `deny`.
    pub decision: &'static str,
    /// Token kind the route expects.
    pub token_kind: &'static str,
    /// Resolved user name on allow.
    pub subject: Option<String>,
    /// Bearer token fingerprint (sha256).
    pub token_fingerprint: Option<String>,
    /// Failure reason on deny.
    pub reason: Option<String>,
}

impl AuthnAuditEvent {
    /// Builds an allow event.
    #[must_use]
    pub fn allowed(token_kind: &'static str, subject: &str, fingerprint: Option<String>) -> Self {
        Self {
            event: "api_authn",
            timestamp_ms: now_ms(),
            decision: "allow",
            token_kind,
            subject: Some(subject.to_string()),
            token_fingerprint: fingerprint,
            reason: None,
        }
    }

    /// Builds a deny event.
    #[must_use]
    pub fn denied(token_kind: &'static str, fingerprint: Option<String>, reason: &str) -> Self {
        Self {
            event: "api_authn",
            timestamp_ms: now_ms(),
            decision: "deny",
            token_kind,
            subject: None,
            token_fingerprint: fingerprint,
            reason: Some(reason.to_string()),
        }
    }
}

/// Security posture audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Security event kind.
    pub kind: String,
    /// Optional message.
    pub message: Option<String>,
}

impl SecurityAuditEvent {
    /// Creates a security event with a consistent timestamp.
    #[must_use]
    pub fn new(kind: impl Into<String>, message: Option<String>) -> Self {
        Self {
            event: "api_security",
            timestamp_ms: now_ms(),
            kind: kind.into(),
            message,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for API events.
pub trait AuditSink: Send + Sync {
    /// Record a request event.
    fn record_request(&self, event: &RequestAuditEvent);
    /// Record an authentication decision.
    fn record_authn(&self, _event: &AuthnAuditEvent) {}
    /// Record a security posture event.
    fn record_security(&self, _event: &SecurityAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record_request(&self, event: &RequestAuditEvent) {
        write_stderr(event);
    }

    fn record_authn(&self, event: &AuthnAuditEvent) {
        write_stderr(event);
    }

    fn record_security(&self, event: &SecurityAuditEvent) {
        write_stderr(event);
    }
}

/// Audit sink that appends JSON lines to a file.
pub struct FileAuditSink {
    /// Open append-only log file.
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Opens (or creates) the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns [`io::Error`] when the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized event.
    fn append(&self, event: &impl Serialize) {
        let Ok(mut line) = serde_json::to_vec(event) else {
            return;
        };
        line.push(b'\n');
        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(&line);
        }
    }
}

impl AuditSink for FileAuditSink {
    fn record_request(&self, event: &RequestAuditEvent) {
        self.append(event);
    }

    fn record_authn(&self, event: &AuthnAuditEvent) {
        self.append(event);
    }

    fn record_security(&self, event: &SecurityAuditEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_request(&self, _event: &RequestAuditEvent) {}
}

/// Builds the configured audit sink.
///
/// # Errors
///
/// Returns [`io::Error`] when a file sink cannot be opened.
pub fn sink_from_config(config: &AuditConfig) -> io::Result<Arc<dyn AuditSink>> {
    Ok(match config.sink {
        AuditSinkType::Stderr => Arc::new(StderrAuditSink),
        AuditSinkType::None => Arc::new(NoopAuditSink),
        AuditSinkType::File => {
            let path = config.path.as_deref().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "file audit sink requires a path")
            })?;
            Arc::new(FileAuditSink::new(Path::new(path))?)
        }
    })
}

// ============================================================================
// SECTION: Middleware
// ============================================================================

/// Records one [`RequestAuditEvent`] per routed request.
pub async fn record_requests(
    State(state): State<ApiState>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| request.uri().path().to_string(), |path| path.as_str().to_string());
    let organization = organization_segment(request.uri().path());
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| value.len() <= MAX_REQUEST_ID_LENGTH)
        .map(str::to_string);
    let response = next.run(request).await;
    let subject = response.extensions().get::<AuthenticatedSubject>().map(|subject| subject.0.clone());
    state.audit.record_request(&RequestAuditEvent {
        event: "api_request",
        timestamp_ms: now_ms(),
        request_id,
        method,
        route,
        status: response.status().as_u16(),
        latency_ms: started.elapsed().as_millis(),
        subject,
        organization,
    });
    response
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the SHA-256 fingerprint of a bearer token as lowercase hex.
#[must_use]
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex
}

/// Extracts `{org}` from `/v1/orgs/{org}/...` paths.
fn organization_segment(path: &str) -> Option<String> {
    let mut segments = path.trim_start_matches('/').split('/');
    match (segments.next(), segments.next(), segments.next()) {
        (Some("v1"), Some("orgs"), Some(org)) if !org.is_empty() => Some(org.to_string()),
        _ => None,
    }
}

/// Milliseconds since the unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

/// Writes one event to stderr.
#[allow(clippy::print_stderr, reason = "Stderr is the audit sink.")]
fn write_stderr(event: &impl Serialize) {
    if let Ok(payload) = serde_json::to_string(event) {
        eprintln!("{payload}");
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
