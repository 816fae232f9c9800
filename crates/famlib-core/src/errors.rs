use famlib_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using FamlibError
pub type Result<T> = std::result::Result<T, FamlibError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by the library maps to exactly one kind, and every
/// kind maps to a stable `ERR_*` code that callers (CLI, HTTP wrappers, tests)
/// can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Caller input
    InvalidInput,
    NotFound,
    AlreadyExists,

    // Version store domain
    /// Artifact archive cannot be opened, or its descriptive document is not well-formed
    MalformedArtifact,
    /// Canonical content hash already published (carries the existing version)
    DuplicateContent,
    /// Snapshot is missing required fields or has duplicate keys
    InvalidSnapshot,
    /// Lost a publish race on the family's current-version pointer
    ConcurrencyConflict,
    /// Hash chain or pointer invariant broken in persisted history
    IntegrityViolation,
    /// Operation observed its cancellation token
    Cancelled,

    // Ambient
    Configuration,
    Io,
    Serialization,
    Persistence,
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::MalformedArtifact => "ERR_MALFORMED_ARTIFACT",
            ExErrorKind::DuplicateContent => "ERR_DUPLICATE_CONTENT",
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            ExErrorKind::ConcurrencyConflict => "ERR_CONCURRENCY_CONFLICT",
            ExErrorKind::IntegrityViolation => "ERR_INTEGRITY_VIOLATION",
            ExErrorKind::Cancelled => "ERR_CANCELLED",
            ExErrorKind::Configuration => "ERR_CONFIGURATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether a caller may retry the same request after re-reading state
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExErrorKind::ConcurrencyConflict)
    }
}

/// Canonical structured error type
///
/// Carries the classification (`kind`) for programmatic handling plus
/// optional context for debugging: the operation, the family concerned, a
/// version number and correlation ids.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    version: Option<u32>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            version: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the family (or other entity) id concerned
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add a version number (for `DuplicateContent`, the existing version)
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn version(&self) -> Option<u32> {
        self.version
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (family_id: {})", entity_id)?;
        }
        if let Some(version) = self.version {
            write!(f, " (version: {})", version)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain failures raised by the pure core (canonicalizer, snapshot model,
/// differ, configuration)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FamlibError {
    /// Family not found in the store
    #[error("Family not found: {family_id}")]
    FamilyNotFound { family_id: String },

    /// Family name already registered
    #[error("Family already exists: {name}")]
    FamilyAlreadyExists { name: String },

    /// Version not found in a family's chain
    #[error("Version {version} not found for family {family_id}")]
    VersionNotFound { family_id: String, version: u32 },

    /// Artifact archive could not be read
    #[error("Malformed artifact: {reason}")]
    MalformedArtifact { reason: String },

    /// Snapshot failed structural validation
    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    /// Canonical hash already published
    #[error("Content {hash} already published as version {existing_version} of family {family_id}")]
    DuplicateContent {
        family_id: String,
        existing_version: u32,
        hash: String,
    },

    /// The family's pointer moved between read and write
    #[error("Concurrent publish on family {family_id}: expected current version {expected}, found {actual}")]
    ConcurrencyConflict {
        family_id: String,
        expected: u32,
        actual: u32,
    },

    /// Invalid input (blank name, malformed identifier, ...)
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Configuration value rejected
    #[error("Invalid configuration: {reason}")]
    Configuration { reason: String },

    /// JSON / TOML encoding or decoding
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<serde_json::Error> for FamlibError {
    fn from(err: serde_json::Error) -> Self {
        FamlibError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion into the canonical error facility
impl From<FamlibError> for ExError {
    fn from(err: FamlibError) -> Self {
        match err {
            FamlibError::FamilyNotFound { family_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(family_id)
                .with_message("Family not found"),
            FamlibError::FamilyAlreadyExists { name } => ExError::new(ExErrorKind::AlreadyExists)
                .with_message(format!("Family name '{}' is already registered", name)),
            FamlibError::VersionNotFound { family_id, version } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_entity_id(family_id)
                    .with_version(version)
                    .with_message("Version not found")
            }
            FamlibError::MalformedArtifact { reason } => {
                ExError::new(ExErrorKind::MalformedArtifact).with_message(reason)
            }
            FamlibError::InvalidSnapshot { reason } => {
                ExError::new(ExErrorKind::InvalidSnapshot).with_message(reason)
            }
            FamlibError::DuplicateContent {
                family_id,
                existing_version,
                hash,
            } => ExError::new(ExErrorKind::DuplicateContent)
                .with_entity_id(family_id)
                .with_version(existing_version)
                .with_message(format!("Content {} is already published", hash)),
            FamlibError::ConcurrencyConflict {
                family_id,
                expected,
                actual,
            } => ExError::new(ExErrorKind::ConcurrencyConflict)
                .with_entity_id(family_id)
                .with_version(actual)
                .with_message(format!(
                    "Expected current version {} but found {}",
                    expected, actual
                )),
            FamlibError::InvalidInput { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }
            FamlibError::Configuration { reason } => {
                ExError::new(ExErrorKind::Configuration).with_message(reason)
            }
            FamlibError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            FamlibError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Build the error returned when an operation observes its cancellation token
pub fn cancelled(op: &str) -> ExError {
    ExError::new(ExErrorKind::Cancelled)
        .with_op(op)
        .with_message("operation cancelled")
}
