use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Pricing configuration error: {0}")]
    PricingConfig(#[from] PricingConfigError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Timed out: {0}")]
    Timeout(String),
}

impl DomainError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn external(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }
}

/// Rejections raised while building the pricing reference tables.
///
/// These only surface at startup; a table that builds successfully can no
/// longer produce any of them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingConfigError {
    #[error("service catalog is empty")]
    EmptyCatalog,

    #[error("service type '{0}' is declared more than once")]
    DuplicateService(String),

    #[error("service type '{service_type}' must be written in normalized form '{expected}'")]
    UnnormalizedServiceType {
        service_type: String,
        expected: String,
    },

    #[error("service '{service_type}' has a negative {field}")]
    NegativeAmount {
        service_type: String,
        field: &'static str,
    },

    #[error("service '{service_type}' has a negative multiplier for region {region}")]
    NegativeMultiplier { service_type: String, region: String },

    #[error("postcode range '{0}' is not of the form <start>-<end>")]
    MalformedRange(String),

    #[error("postcode range {start}-{end} ends before it starts")]
    InvertedRange { start: u32, end: u32 },

    #[error("postcode range {first} overlaps {second}")]
    OverlappingRanges { first: String, second: String },
}

pub type Result<T> = std::result::Result<T, DomainError>;
