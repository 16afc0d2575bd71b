use crate::wire::Command;

/// A transport-level failure, already normalized: the transport layer maps
/// whatever its underlying mechanism throws into this one shape so nothing
/// transport-specific leaks to callers.
#[derive(Debug, thiserror::Error)]
#[error("{message} ({code})")]
pub struct TransportError {
    pub message: String,
    pub code: String,
    #[source]
    pub cause: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            cause: None,
        }
    }

    pub fn with_cause(
        code: impl Into<String>,
        message: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            cause: Some(Box::new(cause)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The command exceeded its deadline. Recoverable; the caller may retry.
    /// Carries the original command for diagnostics.
    #[error("command timed out: {command}")]
    Timeout { command: Command },

    /// The peer reported an error. Recoverable depending on the code.
    #[error("transport failure for {command}: {source}")]
    Transport {
        command: Command,
        #[source]
        source: TransportError,
    },
}

impl BridgeError {
    /// The command that failed, for diagnostics.
    pub fn command(&self) -> &Command {
        match self {
            BridgeError::Timeout { command } => command,
            BridgeError::Transport { command, .. } => command,
        }
    }

    /// Peer-reported error code, if this is a transport failure.
    pub fn code(&self) -> Option<&str> {
        match self {
            BridgeError::Timeout { .. } => None,
            BridgeError::Transport { source, .. } => Some(&source.code),
        }
    }
}

/// Fatal handshake outcomes. Never retried; initialization must abort.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("peer protocol version {peer} is older than minimum supported {min_supported}")]
    TooOld { peer: i64, min_supported: i64 },

    #[error("peer protocol version {peer} is newer than maximum supported {max_supported}")]
    TooNew { peer: i64, max_supported: i64 },

    #[error("protocol handshake failed: {0}")]
    Handshake(#[from] BridgeError),

    #[error("malformed protocol report: {0}")]
    MalformedReport(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("window not found: {0}")]
    NotFound(String),

    #[error("window already exists: {0}")]
    AlreadyExists(String),

    #[error("window destroyed: {0}")]
    Destroyed(String),

    #[error("platform error: {0}")]
    Platform(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SnapError {
    #[error("no snap binding for follower: {0}")]
    NotBound(String),

    #[error("invalid snap params: {0}")]
    InvalidParams(String),
}

#[derive(Debug, thiserror::Error)]
pub enum EffectError {
    #[error("effect buffer already exists: {window_id}/{layer_id}")]
    AlreadyExists { window_id: String, layer_id: i32 },

    #[error("effect buffer not found: {window_id}/{layer_id}")]
    NotFound { window_id: String, layer_id: i32 },
}

/// Failures a native service reports back over the wire. Codes mirror the
/// wire protocol so controllers can branch on them.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("unknown service: {0}")]
    UnknownService(String),

    #[error("unknown {service} command: {command}")]
    UnknownCommand { service: String, command: String },

    #[error("windowId required")]
    MissingWindowId,

    #[error("invalid params: {0}")]
    InvalidParams(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),
}

impl ServiceError {
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::UnknownService(_) => "UNKNOWN_SERVICE",
            ServiceError::UnknownCommand { .. } => "UNKNOWN_COMMAND",
            ServiceError::MissingWindowId => "MISSING_ID",
            ServiceError::InvalidParams(_) => "INVALID_PARAMS",
            ServiceError::NotFound(_) => "NOT_FOUND",
            ServiceError::AlreadyExists(_) => "ALREADY_EXISTS",
        }
    }
}

impl From<RegistryError> for ServiceError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(id) | RegistryError::Destroyed(id) => {
                ServiceError::NotFound(id)
            }
            RegistryError::AlreadyExists(id) => ServiceError::AlreadyExists(id),
            RegistryError::Platform(msg) => ServiceError::InvalidParams(msg),
        }
    }
}

impl From<SnapError> for ServiceError {
    fn from(err: SnapError) -> Self {
        match err {
            SnapError::NotBound(id) => ServiceError::NotFound(id),
            SnapError::InvalidParams(msg) => ServiceError::InvalidParams(msg),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EaselError {
    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Snap(#[from] SnapError),

    #[error(transparent)]
    Effect(#[from] EffectError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("unsupported feature: {0}")]
    Unsupported(String),

    #[error("{0}")]
    Other(String),
}
