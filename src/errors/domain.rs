use thiserror::Error;

/// Error type for store and service operations
///
/// This is a hybrid error type that separates:
/// - Infrastructure errors (Database, Transaction, Parse, Crypto) - shared by all stores
/// - Domain errors (Auth, Patient, Record) - specific to each component
///
/// This error type is NOT exposed via the API. Endpoints must explicitly
/// convert it to `ApiError`.
#[derive(Error, Debug)]
pub enum ServiceError {
    // ============================================================
    // Infrastructure Errors (shared by all stores)
    // ============================================================

    /// Database query or operation failed
    #[error("Database error: {operation} failed: {source}")]
    Database {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    /// Database transaction failed
    #[error("Transaction error: {operation} failed: {source}")]
    Transaction {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    /// Failed to serialize or parse a value (JSON, CSV, etc.)
    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse {
        value_type: String,
        message: String,
    },

    /// Cryptographic operation failed (hashing, token signing)
    #[error("Crypto error: {operation} failed: {message}")]
    Crypto {
        operation: String,
        message: String,
    },

    // ============================================================
    // Domain-Specific Errors (one per component)
    // ============================================================

    /// Credential store and access control errors
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Patient registry errors
    #[error(transparent)]
    Patient(#[from] PatientError),

    /// Medical record ledger errors
    #[error(transparent)]
    Record(#[from] RecordError),
}

impl ServiceError {
    /// Create a database error with context
    pub fn database(operation: impl Into<String>, source: sea_orm::DbErr) -> Self {
        Self::Database {
            operation: operation.into(),
            source,
        }
    }

    /// Create a transaction error with context
    pub fn transaction(operation: impl Into<String>, source: sea_orm::DbErr) -> Self {
        Self::Transaction {
            operation: operation.into(),
            source,
        }
    }

    /// Create a parse error with context
    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }

    /// Create a crypto error with context
    pub fn crypto(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Crypto {
            operation: operation.into(),
            message: message.into(),
        }
    }
}

/// Credential store and access control errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    /// A required field is absent or empty
    #[error("All required fields must be provided")]
    MissingFields,

    /// Email does not match the accepted address pattern
    #[error("Invalid email format")]
    InvalidEmail,

    /// Password shorter than the configured minimum
    #[error("Password must be at least {min_length} characters long")]
    WeakPassword { min_length: usize },

    /// Role outside the fixed allowed set
    #[error("Invalid role: {0}")]
    InvalidRole(String),

    /// Username already exists
    #[error("Username already exists")]
    DuplicateUsername,

    /// Email already registered (case-insensitive)
    #[error("Email already registered")]
    DuplicateEmail,

    /// Unknown email or wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account exists but has been deactivated
    #[error("Account is inactive. Please contact administrator")]
    AccountInactive,

    /// Invalid or malformed token
    #[error("Invalid or malformed token")]
    InvalidToken,

    /// Token has expired
    #[error("Token has expired")]
    ExpiredToken,

    /// Token subject no longer resolves to a user
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// Authenticated but role not in the allowed set for this operation
    #[error("Access denied. This action requires one of the following roles: {required}")]
    Forbidden { required: String },
}

/// Patient registry errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PatientError {
    /// A required field is absent or empty
    #[error("All required fields must be provided")]
    MissingFields,

    /// Age outside the accepted range
    #[error("Age must be between {min} and {max}")]
    InvalidAge { min: i64, max: i64 },

    /// Trimmed name shorter than 2 characters
    #[error("Name must be at least 2 characters long")]
    InvalidName,

    /// Trimmed contact shorter than 9 characters
    #[error("Contact number must be at least 9 digits")]
    InvalidContact,

    /// No active patient with this id (or, for restore, no soft-deleted one)
    #[error("Patient not found")]
    NotFound(i32),
}

/// Medical record ledger errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecordError {
    /// Diagnosis is required and must be non-empty
    #[error("Diagnosis is required")]
    MissingDiagnosis,
}
