use std::fmt;
use std::path::PathBuf;

/// Engine-level errors used across remap SDK crates.
///
/// Contract rule: this type lives in `remap-core` and can be re-exported by runtimes.
#[derive(Debug)]
pub enum EngineError {
    // ---- Core / config (SDK-level) ----
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    InvalidConfig {
        path: PathBuf,
        msg: String,
    },

    // ---- Runtime-facing (backend) ----
    /// Backend stage/resource allocation failed while (re)building the pipeline.
    ResourceCreate(String),

    /// The host's cancellation signal was observed before an expensive
    /// (re)build or during rendering. No partially-constructed stages remain
    /// when this is returned.
    Cancelled,

    // ---- Fallback ----
    Other(String),
}

impl EngineError {
    pub fn other<T: Into<String>>(s: T) -> Self {
        EngineError::Other(s.into())
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Io { path, source } => {
                write!(f, "io error at {}: {}", path.display(), source)
            }
            EngineError::Json { path, source } => {
                write!(f, "json parse error at {}: {}", path.display(), source)
            }
            EngineError::InvalidConfig { path, msg } => {
                write!(f, "invalid config at {}: {}", path.display(), msg)
            }

            EngineError::ResourceCreate(msg) => write!(f, "stage creation failed: {msg}"),
            EngineError::Cancelled => write!(f, "cancelled by host"),

            EngineError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Io { source, .. } => Some(source),
            EngineError::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}
