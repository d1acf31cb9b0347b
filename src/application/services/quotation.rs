use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, instrument};

use crate::domain::{
    normalize_service_type, PostcodeRegionTable, Quote, QuoteError, QuoteRequest, QuoteResult,
    Region, ServiceCatalog, ServiceCatalogEntry, VariableCostBasis,
};

/// Regional price quotation over a fixed catalog and postcode table.
///
/// The engine holds no mutable state; share it behind an `Arc` and call it
/// from any number of tasks.
#[derive(Debug, Clone)]
pub struct QuotationEngine {
    catalog: ServiceCatalog,
    postcodes: PostcodeRegionTable,
}

impl QuotationEngine {
    pub fn new(catalog: ServiceCatalog, postcodes: PostcodeRegionTable) -> Self {
        Self { catalog, postcodes }
    }

    pub fn standard() -> Self {
        Self::new(ServiceCatalog::standard(), PostcodeRegionTable::standard())
    }

    pub fn catalog(&self) -> &ServiceCatalog {
        &self.catalog
    }

    pub fn postcodes(&self) -> &PostcodeRegionTable {
        &self.postcodes
    }

    pub fn resolve_region(&self, postcode: &str) -> Option<&Region> {
        self.postcodes.resolve_region(postcode)
    }

    /// Quotes a request, folding every failure into an unavailable result.
    #[instrument(skip(self, request), fields(service_type = %request.service_type, postcode = %request.postcode))]
    pub fn quote(&self, request: &QuoteRequest) -> QuoteResult {
        let result = self.try_quote(request);
        match &result {
            Ok(quote) => debug!(
                region = %quote.region,
                final_price = %quote.final_price,
                "quote computed"
            ),
            Err(e) => debug!(error = %e, "quote unavailable"),
        }
        result.into()
    }

    pub fn try_quote(&self, request: &QuoteRequest) -> Result<Quote, QuoteError> {
        let service_type = normalize_service_type(&request.service_type);

        let entry = self
            .catalog
            .get(&service_type)
            .ok_or_else(|| QuoteError::UnknownServiceType {
                service_type: service_type.clone(),
                known: self.catalog.service_types().map(str::to_string).collect(),
            })?;

        let region = self
            .postcodes
            .resolve_region(&request.postcode)
            .ok_or_else(|| QuoteError::UnresolvableRegion {
                postcode: request.postcode.clone(),
            })?;

        let availability =
            entry
                .availability_in(region)
                .ok_or_else(|| QuoteError::ServiceUnavailableInRegion {
                    service_type: service_type.clone(),
                    region: region.clone(),
                })?;

        let out_of_range = || QuoteError::AmountOutOfRange {
            service_type: service_type.clone(),
            region: region.clone(),
        };
        let variable_cost = variable_cost(entry, request).ok_or_else(out_of_range)?;
        let mut final_price = entry
            .base_price
            .checked_add(variable_cost)
            .and_then(|subtotal| subtotal.checked_mul(availability.multiplier))
            .ok_or_else(out_of_range)?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        // always two places, so 250 reads as 250.00
        final_price.rescale(2);

        Ok(Quote {
            service_type,
            region: region.clone(),
            base_price: entry.base_price,
            variable_cost,
            regional_multiplier: availability.multiplier,
            final_price,
        })
    }
}

impl Default for QuotationEngine {
    fn default() -> Self {
        Self::standard()
    }
}

/// Variable cost for the entry's basis. Inputs for the other basis, and
/// zero or negative quantities, contribute nothing. `None` on overflow.
fn variable_cost(entry: &ServiceCatalogEntry, request: &QuoteRequest) -> Option<Decimal> {
    let quantity = match entry.variable_cost_basis {
        VariableCostBasis::PerArea => request.area_size.filter(|a| *a > Decimal::ZERO),
        VariableCostBasis::PerItem => request
            .item_count
            .filter(|n| *n > 0)
            .map(Decimal::from),
        VariableCostBasis::None => None,
    };

    match quantity {
        Some(q) => entry.variable_rate.checked_mul(q),
        None => Some(Decimal::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> QuotationEngine {
        QuotationEngine::standard()
    }

    #[test]
    fn test_carpet_with_area() {
        let quote = engine()
            .try_quote(&QuoteRequest::new("carpet_cleaning", "2500").with_area(Decimal::from(20)))
            .unwrap();

        assert_eq!(quote.region.as_str(), "NSW");
        assert_eq!(quote.base_price, Decimal::from(150));
        assert_eq!(quote.variable_cost, Decimal::from(100));
        assert_eq!(quote.regional_multiplier, Decimal::ONE);
        assert_eq!(quote.final_price, Decimal::new(25000, 2));
        assert_eq!(quote.final_price.to_string(), "250.00");
    }

    #[test]
    fn test_upholstery_with_items_and_multiplier() {
        let quote = engine()
            .try_quote(&QuoteRequest::new("upholstery_cleaning", "3500").with_items(3))
            .unwrap();

        assert_eq!(quote.variable_cost, Decimal::from(120));
        assert_eq!(quote.regional_multiplier, Decimal::new(105, 2));
        assert_eq!(quote.final_price, Decimal::new(21000, 2));
    }

    #[test]
    fn test_wrong_basis_input_is_ignored() {
        let engine = engine();

        let carpet = engine
            .try_quote(&QuoteRequest::new("carpet_cleaning", "2000").with_items(4))
            .unwrap();
        assert_eq!(carpet.variable_cost, Decimal::ZERO);
        assert_eq!(carpet.final_price, Decimal::from(150));

        let upholstery = engine
            .try_quote(&QuoteRequest::new("upholstery_cleaning", "2000").with_area(Decimal::from(30)))
            .unwrap();
        assert_eq!(upholstery.variable_cost, Decimal::ZERO);
        assert_eq!(upholstery.final_price, Decimal::from(80));
    }

    #[test]
    fn test_non_positive_area_contributes_nothing() {
        let engine = engine();

        for area in [Decimal::ZERO, Decimal::from(-10)] {
            let quote = engine
                .try_quote(&QuoteRequest::new("carpet_cleaning", "2000").with_area(area))
                .unwrap();
            assert_eq!(quote.variable_cost, Decimal::ZERO);
        }
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        // (150 + 3.1 * 5) * 0.95 = 157.225
        let quote = engine()
            .try_quote(&QuoteRequest::new("carpet_cleaning", "4000").with_area(Decimal::new(31, 1)))
            .unwrap();

        assert_eq!(quote.final_price, Decimal::new(15723, 2));
        assert_eq!(quote.final_price.scale(), 2);
    }

    #[test]
    fn test_failure_order() {
        let engine = engine();

        // unknown service wins over a bad postcode
        let err = engine
            .try_quote(&QuoteRequest::new("pool_cleaning", "abc"))
            .unwrap_err();
        assert!(matches!(err, QuoteError::UnknownServiceType { .. }));

        let err = engine
            .try_quote(&QuoteRequest::new("tile_cleaning", "9999"))
            .unwrap_err();
        assert_eq!(
            err,
            QuoteError::UnresolvableRegion {
                postcode: "9999".into()
            }
        );
    }

    #[test]
    fn test_overflow_is_reported_not_panicking() {
        let result = engine().quote(
            &QuoteRequest::new("carpet_cleaning", "2000").with_area(Decimal::MAX),
        );

        assert!(!result.available);
        assert!(result.error.unwrap().contains("out of range"));
    }
}
