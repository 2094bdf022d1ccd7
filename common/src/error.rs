use std::backtrace::Backtrace;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Message served to clients when an untyped authority failure must not leak
/// its cause over the wire.
pub const INTERNAL_SERVER_ERROR_MSG: &str = "The certificate authority encountered an Internal \
                                             Server Error. Please see the certificate authority \
                                             logs for more info.";

/// Returns whether backtrace capture into the log sink is enabled for this
/// process. Gated on `STEPDEBUG=1`, read once.
pub fn stack_traces_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var("STEPDEBUG").is_ok_and(|v| v == "1"))
}

/// The closed set of error kinds the admin surface emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminErrorKind {
    BadRequest,
    Unauthorized,
    NotFound,
    ServerInternal,

    /// An untyped cause. Renders as a 500 with empty `type`, `detail` and
    /// `message` fields unless a message was attached explicitly.
    Undefined,
}

impl AdminErrorKind {
    pub fn status(&self) -> u16 {
        match self {
            AdminErrorKind::BadRequest => 400,
            AdminErrorKind::Unauthorized => 401,
            AdminErrorKind::NotFound => 404,
            AdminErrorKind::ServerInternal | AdminErrorKind::Undefined => 500,
        }
    }

    /// The symbolic `type` field of the problem document.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdminErrorKind::BadRequest => "badRequest",
            AdminErrorKind::Unauthorized => "unauthorized",
            AdminErrorKind::NotFound => "notFound",
            AdminErrorKind::ServerInternal => "serverInternal",
            AdminErrorKind::Undefined => "",
        }
    }

    /// The stable user-facing `detail` phrase of the problem document.
    pub fn detail(&self) -> &'static str {
        match self {
            AdminErrorKind::BadRequest => "bad request",
            AdminErrorKind::ServerInternal => "the server experienced an internal error",
            AdminErrorKind::Unauthorized | AdminErrorKind::NotFound | AdminErrorKind::Undefined => {
                ""
            }
        }
    }
}

impl fmt::Display for AdminErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rich admin-surface error: a kind, a per-site message, an optional cause
/// and, when `STEPDEBUG=1`, a backtrace captured at construction. The wire
/// projection is [`ProblemDocument`]; the cause and backtrace only ever reach
/// the log sink.
#[derive(Debug)]
pub struct AdminError {
    kind: AdminErrorKind,
    message: String,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
    backtrace: Option<Backtrace>,
}

impl AdminError {
    pub fn new(kind: AdminErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
            backtrace: stack_traces_enabled().then(Backtrace::force_capture),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(AdminErrorKind::BadRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(AdminErrorKind::NotFound, message)
    }

    pub fn server_internal(message: impl Into<String>) -> Self {
        Self::new(AdminErrorKind::ServerInternal, message)
    }

    /// Derives an error from an untyped causal chain. A cause that is itself
    /// an [`AdminError`] passes through unchanged, keeping its kind and
    /// status; anything else becomes the opaque `Undefined` envelope with
    /// the cause retained for logging.
    pub fn from_cause(err: anyhow::Error) -> Self {
        match err.downcast::<AdminError>() {
            Ok(admin) => admin,
            Err(err) => Self {
                kind: AdminErrorKind::Undefined,
                message: String::new(),
                source: Some(err.into()),
                backtrace: stack_traces_enabled().then(Backtrace::force_capture),
            },
        }
    }

    /// Wraps an untyped error with a kind and a context message, producing
    /// `"<context>: <cause>"`. A typed [`AdminError`] cause passes through
    /// unchanged; an opaque one gains the context and becomes
    /// `serverInternal`.
    pub fn wrap(kind: AdminErrorKind, err: anyhow::Error, context: impl fmt::Display) -> Self {
        match err.downcast::<AdminError>() {
            Ok(admin) => admin.with_context(context),
            Err(err) => Self {
                kind,
                message: format!("{context}: {err:#}"),
                source: Some(err.into()),
                backtrace: stack_traces_enabled().then(Backtrace::force_capture),
            },
        }
    }

    /// [`AdminError::wrap`] with the `serverInternal` kind.
    pub fn wrap_internal(err: anyhow::Error, context: impl fmt::Display) -> Self {
        Self::wrap(AdminErrorKind::ServerInternal, err, context)
    }

    /// Wraps an untyped authority failure behind the canonical internal
    /// server error message, hiding the cause from the wire. Typed admin
    /// errors pass through.
    pub fn internal_server_error(err: anyhow::Error) -> Self {
        match err.downcast::<AdminError>() {
            Ok(admin) => admin,
            Err(err) => Self {
                kind: AdminErrorKind::Undefined,
                message: INTERNAL_SERVER_ERROR_MSG.to_string(),
                source: Some(err.into()),
                backtrace: stack_traces_enabled().then(Backtrace::force_capture),
            },
        }
    }

    /// Attaches request context to an opaque error, upgrading it to
    /// `serverInternal` with `"<context>: <cause>"`. Errors that already
    /// carry a kind pass through unchanged.
    pub fn with_context(self, context: impl fmt::Display) -> Self {
        if self.kind != AdminErrorKind::Undefined {
            return self;
        }
        let message = match &self.source {
            Some(source) => format!("{context}: {source}"),
            None => context.to_string(),
        };
        Self {
            kind: AdminErrorKind::ServerInternal,
            message,
            ..self
        }
    }

    pub fn kind(&self) -> AdminErrorKind {
        self.kind
    }

    pub fn status(&self) -> u16 {
        self.kind.status()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn backtrace(&self) -> Option<&Backtrace> {
        self.backtrace.as_ref()
    }

    /// The wire projection of this error.
    pub fn to_problem(&self) -> ProblemDocument {
        ProblemDocument {
            kind: self.kind.as_str().to_string(),
            status: self.kind.status(),
            detail: self.kind.detail().to_string(),
            message: self.message.clone(),
        }
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            return f.write_str(&self.message);
        }
        match &self.source {
            Some(source) => write!(f, "{source}"),
            None => f.write_str(self.kind.detail()),
        }
    }
}

impl std::error::Error for AdminError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.source {
            Some(source) => Some(source.as_ref()),
            None => None,
        }
    }
}

/// The problem document every failing admin response carries in its body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ProblemDocument {
    /// Short symbolic error kind, e.g. `badRequest` or `serverInternal`.
    #[serde(rename = "type")]
    pub kind: String,

    /// The HTTP status code, duplicated from the response header.
    pub status: u16,

    /// Stable user-facing phrase associated with the kind.
    pub detail: String,

    /// Context-specific description; may quote underlying causes.
    pub message: String,
}

/// An ACME-family problem, emitted with the `application/problem+json`
/// content type. Produced by the ACME engine; the admin surface only knows
/// how to render it.
#[derive(Debug, Clone, Error, Serialize, Deserialize, ToSchema)]
#[error("{detail}")]
pub struct AcmeProblem {
    /// Problem type URN, e.g. `urn:ietf:params:acme:error:malformed`.
    #[serde(rename = "type")]
    pub kind: String,

    pub detail: String,

    pub status: u16,
}
