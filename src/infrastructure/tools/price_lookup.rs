use rig::completion::ToolDefinition;
use rig::tool::Tool;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::application::QuotationEngine;
use crate::domain::QuoteRequest;
use crate::infrastructure::config::PriceLookupToolConfig;

#[derive(Debug, thiserror::Error)]
#[error("Price lookup error: {0}")]
pub struct PriceLookupError(#[from] serde_json::Error);

#[derive(Debug, Deserialize, Serialize)]
pub struct PriceLookupArgs {
    pub service_type: String,
    pub postcode: String,
    #[serde(default)]
    pub area_size: Option<Decimal>,
    #[serde(default)]
    pub item_count: Option<u32>,
}

impl From<PriceLookupArgs> for QuoteRequest {
    fn from(args: PriceLookupArgs) -> Self {
        Self {
            service_type: args.service_type,
            postcode: args.postcode,
            area_size: args.area_size,
            item_count: args.item_count,
        }
    }
}

/// Quotes a service at a postcode. Unavailable quotes are a normal answer,
/// returned to the model as `available: false` with an explanation.
pub struct PriceLookupTool {
    engine: Arc<QuotationEngine>,
    config: PriceLookupToolConfig,
}

impl PriceLookupTool {
    pub fn new(engine: Arc<QuotationEngine>, config: PriceLookupToolConfig) -> Self {
        Self { engine, config }
    }
}

impl Tool for PriceLookupTool {
    const NAME: &'static str = "price_lookup_tool";

    type Error = PriceLookupError;
    type Args = PriceLookupArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        let services: Vec<&str> = self.engine.catalog().service_types().collect();

        ToolDefinition {
            name: Self::NAME.to_string(),
            description: self.config.description.clone(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "service_type": {
                        "type": "string",
                        "description": format!("Service to quote. One of: {}", services.join(", "))
                    },
                    "postcode": {
                        "type": "string",
                        "description": "Customer's 4-digit Australian postcode"
                    },
                    "area_size": {
                        "type": "number",
                        "description": "Area in square metres, for services priced per area"
                    },
                    "item_count": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "Number of items, for services priced per item"
                    }
                },
                "required": ["service_type", "postcode"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        let result = self.engine.quote(&args.into());
        tracing::debug!(available = result.available, "price_lookup_tool called");

        Ok(serde_json::to_string_pretty(&result)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::QuoteResult;

    fn tool() -> PriceLookupTool {
        PriceLookupTool::new(
            Arc::new(QuotationEngine::standard()),
            PriceLookupToolConfig::default(),
        )
    }

    async fn lookup(args: serde_json::Value) -> QuoteResult {
        let args: PriceLookupArgs = serde_json::from_value(args).unwrap();
        let output = tool().call(args).await.unwrap();
        serde_json::from_str(&output).unwrap()
    }

    #[tokio::test]
    async fn test_quote_from_model_arguments() {
        let result = lookup(json!({
            "service_type": "Carpet Cleaning",
            "postcode": "3000",
            "area_size": 10
        }))
        .await;

        assert!(result.available);
        assert_eq!(result.service_type.as_deref(), Some("carpet_cleaning"));
        // (150 + 10 * 5) * 1.05
        assert_eq!(result.final_price, Some(Decimal::from(210)));
        assert_eq!(result.currency.as_deref(), Some("AUD"));
    }

    #[tokio::test]
    async fn test_unavailable_region_is_not_a_tool_error() {
        let result = lookup(json!({
            "service_type": "tile_cleaning",
            "postcode": "6000"
        }))
        .await;

        assert!(!result.available);
        assert_eq!(result.region.as_ref().map(|r| r.as_str()), Some("WA"));
        assert!(result.final_price.is_none());
    }

    #[tokio::test]
    async fn test_definition_lists_services() {
        let definition = tool().definition(String::new()).await;

        assert_eq!(definition.name, "price_lookup_tool");
        let description = definition.parameters["properties"]["service_type"]["description"]
            .as_str()
            .unwrap()
            .to_string();
        assert!(description.contains("carpet_cleaning, upholstery_cleaning, tile_cleaning"));
    }
}
