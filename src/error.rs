use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, warn};

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("cluster {0:?} not found")]
    ClusterNotFound(String),

    #[error("snapshot {uuid:?} not found for cluster {cluster:?}")]
    SnapshotNotFound { cluster: String, uuid: String },

    #[error("history row {row} out of range ({len} entries)")]
    HistoryRowOutOfRange { row: usize, len: usize },

    #[error("pod {namespace}/{name} not found in snapshot")]
    PodNotFound { namespace: String, name: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}: {message}")]
    Upstream {
        url: String,
        status: u16,
        message: String,
    },

    #[error("decoding response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed timestamp {value:?} in history entry {uuid:?}: {source}")]
    MalformedTimestamp {
        uuid: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("navigation superseded by a newer request")]
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Transport,
    MalformedData,
    Superseded,
}

impl DashboardError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DashboardError::ClusterNotFound(_)
            | DashboardError::SnapshotNotFound { .. }
            | DashboardError::HistoryRowOutOfRange { .. }
            | DashboardError::PodNotFound { .. } => ErrorKind::NotFound,
            DashboardError::Transport { .. } | DashboardError::Upstream { .. } => {
                ErrorKind::Transport
            }
            DashboardError::Decode { .. } | DashboardError::MalformedTimestamp { .. } => {
                ErrorKind::MalformedData
            }
            DashboardError::Superseded => ErrorKind::Superseded,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Transport | ErrorKind::MalformedData => StatusCode::BAD_GATEWAY,
            ErrorKind::Superseded => StatusCode::CONFLICT,
        }
    }
}

/// Body shape shared with the dashboard's error-message extraction:
/// the front end reads `message`, falling back to `error`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub error: ErrorKind,
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self.kind() {
            ErrorKind::NotFound | ErrorKind::Superseded => warn!("{}", self),
            ErrorKind::Transport | ErrorKind::MalformedData => error!("{}", self),
        }
        let body = ErrorBody {
            message: self.to_string(),
            error: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}

/// Pulls a human message out of an error response body.
///
/// `message` wins over `error`. A 400 may carry a list of constraint
/// violations, in which case the first one's `message` is used. When the
/// extracted value is itself an object, its own `message` is used.
pub fn extract_message(status: u16, body: &Value) -> Option<String> {
    let mut message = body
        .get("message")
        .filter(|v| is_truthy(v))
        .or_else(|| body.get("error").filter(|v| is_truthy(v)));

    if message.is_none() && status == 400 {
        message = body
            .get(0)
            .and_then(|first| first.get("message"))
            .filter(|v| is_truthy(v));
    }

    let message = match message? {
        Value::Object(inner) => inner.get("message")?,
        other => other,
    };

    match message {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
