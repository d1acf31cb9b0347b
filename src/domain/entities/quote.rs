use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entities::region::Region;

pub const CURRENCY: &str = "AUD";

/// Inputs of a single quotation, as received from the agent tool or the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub service_type: String,
    pub postcode: String,
    #[serde(default)]
    pub area_size: Option<Decimal>,
    #[serde(default)]
    pub item_count: Option<u32>,
}

impl QuoteRequest {
    pub fn new(service_type: impl Into<String>, postcode: impl Into<String>) -> Self {
        Self {
            service_type: service_type.into(),
            postcode: postcode.into(),
            area_size: None,
            item_count: None,
        }
    }

    pub fn with_area(mut self, area_size: Decimal) -> Self {
        self.area_size = Some(area_size);
        self
    }

    pub fn with_items(mut self, item_count: u32) -> Self {
        self.item_count = Some(item_count);
        self
    }
}

/// A successful quotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub service_type: String,
    pub region: Region,
    pub base_price: Decimal,
    pub variable_cost: Decimal,
    pub regional_multiplier: Decimal,
    pub final_price: Decimal,
}

/// Why a quotation could not be produced. Every variant is deterministic for
/// a given input and catalog.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuoteError {
    #[error("Service type '{service_type}' not found. Available services: {}", .known.join(", "))]
    UnknownServiceType {
        service_type: String,
        known: Vec<String>,
    },

    #[error("Invalid postcode '{postcode}' or region not supported")]
    UnresolvableRegion { postcode: String },

    #[error("Service '{service_type}' is not available in {region}")]
    ServiceUnavailableInRegion { service_type: String, region: Region },

    #[error("Price for '{service_type}' in {region} is out of range; check the area size or item count")]
    AmountOutOfRange { service_type: String, region: Region },
}

impl QuoteError {
    /// The region, when the failure happened after it was resolved.
    pub fn region(&self) -> Option<&Region> {
        match self {
            Self::ServiceUnavailableInRegion { region, .. }
            | Self::AmountOutOfRange { region, .. } => Some(region),
            Self::UnknownServiceType { .. } | Self::UnresolvableRegion { .. } => None,
        }
    }
}

/// Serializable outcome handed back to callers.
///
/// Successful quotes carry every priced field; failures carry only
/// `available`, `error` and, once resolved, `region`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Region>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub base_price: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub variable_cost: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub regional_multiplier: Option<Decimal>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub final_price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Quote> for QuoteResult {
    fn from(quote: Quote) -> Self {
        Self {
            available: true,
            service_type: Some(quote.service_type),
            region: Some(quote.region),
            base_price: Some(quote.base_price),
            variable_cost: Some(quote.variable_cost),
            regional_multiplier: Some(quote.regional_multiplier),
            final_price: Some(quote.final_price),
            currency: Some(CURRENCY.to_string()),
            error: None,
        }
    }
}

impl From<QuoteError> for QuoteResult {
    fn from(err: QuoteError) -> Self {
        Self {
            available: false,
            service_type: None,
            region: err.region().cloned(),
            base_price: None,
            variable_cost: None,
            regional_multiplier: None,
            final_price: None,
            currency: None,
            error: Some(err.to_string()),
        }
    }
}

impl From<Result<Quote, QuoteError>> for QuoteResult {
    fn from(result: Result<Quote, QuoteError>) -> Self {
        match result {
            Ok(quote) => quote.into(),
            Err(err) => err.into(),
        }
    }
}
