use poem_openapi::Object;

/// Response model for health check endpoint
#[derive(Object, Debug)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,

    /// Name of the service
    pub service: String,

    /// Timestamp of the health check (ISO 8601 format)
    pub timestamp: String,
}

/// Standardized error response model
#[derive(Object, Debug)]
pub struct ErrorResponse {
    /// Error type or category
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Simple confirmation response
#[derive(Object, Debug)]
pub struct MessageResponse {
    /// Success message
    pub message: String,
}

/// Derived pagination metadata, never stored
#[derive(Object, Debug, PartialEq, Eq)]
pub struct PaginationMeta {
    /// Current page (1-based)
    pub page: u64,

    /// Number of items per page
    pub per_page: u64,

    /// Total number of pages
    pub total_pages: u64,

    /// Total number of matching items
    pub total_items: u64,

    /// Whether a next page exists
    pub has_next: bool,

    /// Whether a previous page exists
    pub has_prev: bool,
}
