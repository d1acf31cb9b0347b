use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::domain::entities::region::Region;
use crate::domain::errors::PricingConfigError;

/// Which optional quote input drives the variable cost term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableCostBasis {
    PerArea,
    PerItem,
    None,
}

impl VariableCostBasis {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PerArea => "per_area",
            Self::PerItem => "per_item",
            Self::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionAvailability {
    pub available: bool,
    #[serde(with = "rust_decimal::serde::float")]
    pub multiplier: Decimal,
}

impl RegionAvailability {
    pub fn available(multiplier: Decimal) -> Self {
        Self {
            available: true,
            multiplier,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            multiplier: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceCatalogEntry {
    pub service_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_price: Decimal,
    pub variable_cost_basis: VariableCostBasis,
    #[serde(with = "rust_decimal::serde::float", default)]
    pub variable_rate: Decimal,
    #[serde(default)]
    pub regions: BTreeMap<Region, RegionAvailability>,
}

impl ServiceCatalogEntry {
    /// Availability of this service in `region`; a region the entry does not
    /// list is never available.
    pub fn availability_in(&self, region: &Region) -> Option<&RegionAvailability> {
        self.regions.get(region).filter(|r| r.available)
    }

    fn validate(&self) -> Result<(), PricingConfigError> {
        let expected = normalize_service_type(&self.service_type);
        if expected != self.service_type {
            return Err(PricingConfigError::UnnormalizedServiceType {
                service_type: self.service_type.clone(),
                expected,
            });
        }

        let negative = |field| PricingConfigError::NegativeAmount {
            service_type: self.service_type.clone(),
            field,
        };
        if self.base_price.is_sign_negative() {
            return Err(negative("base_price"));
        }
        if self.variable_rate.is_sign_negative() {
            return Err(negative("variable_rate"));
        }

        if let Some((region, _)) = self
            .regions
            .iter()
            .find(|(_, a)| a.multiplier.is_sign_negative())
        {
            return Err(PricingConfigError::NegativeMultiplier {
                service_type: self.service_type.clone(),
                region: region.to_string(),
            });
        }

        Ok(())
    }
}

/// Lowercases and replaces spaces with underscores, so "Carpet Cleaning"
/// and "carpet cleaning" both become `carpet_cleaning`.
pub fn normalize_service_type(service_type: &str) -> String {
    service_type.to_lowercase().replace(' ', "_")
}

/// Service catalog in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ServiceCatalog {
    entries: Vec<ServiceCatalogEntry>,
}

impl ServiceCatalog {
    pub fn new(entries: Vec<ServiceCatalogEntry>) -> Result<Self, PricingConfigError> {
        if entries.is_empty() {
            return Err(PricingConfigError::EmptyCatalog);
        }

        let mut seen = HashSet::new();
        for entry in &entries {
            entry.validate()?;
            if !seen.insert(entry.service_type.as_str()) {
                return Err(PricingConfigError::DuplicateService(
                    entry.service_type.clone(),
                ));
            }
        }

        Ok(Self { entries })
    }

    /// Carpet, upholstery and tile cleaning across the five mainland states.
    pub fn standard() -> Self {
        let regions = |wa: RegionAvailability| {
            BTreeMap::from([
                (Region::new("NSW"), RegionAvailability::available(Decimal::ONE)),
                (
                    Region::new("VIC"),
                    RegionAvailability::available(Decimal::new(105, 2)),
                ),
                (
                    Region::new("QLD"),
                    RegionAvailability::available(Decimal::new(95, 2)),
                ),
                (Region::new("WA"), wa),
                (Region::new("SA"), RegionAvailability::available(Decimal::ONE)),
            ])
        };
        let wa = RegionAvailability::available(Decimal::new(11, 1));

        Self {
            entries: vec![
                ServiceCatalogEntry {
                    service_type: "carpet_cleaning".into(),
                    base_price: Decimal::new(150, 0),
                    variable_cost_basis: VariableCostBasis::PerArea,
                    variable_rate: Decimal::new(5, 0),
                    regions: regions(wa),
                },
                ServiceCatalogEntry {
                    service_type: "upholstery_cleaning".into(),
                    base_price: Decimal::new(80, 0),
                    variable_cost_basis: VariableCostBasis::PerItem,
                    variable_rate: Decimal::new(40, 0),
                    regions: regions(wa),
                },
                ServiceCatalogEntry {
                    service_type: "tile_cleaning".into(),
                    base_price: Decimal::new(200, 0),
                    variable_cost_basis: VariableCostBasis::PerArea,
                    variable_rate: Decimal::new(8, 0),
                    regions: regions(RegionAvailability::unavailable()),
                },
            ],
        }
    }

    pub fn get(&self, service_type: &str) -> Option<&ServiceCatalogEntry> {
        self.entries.iter().find(|e| e.service_type == service_type)
    }

    pub fn entries(&self) -> &[ServiceCatalogEntry] {
        &self.entries
    }

    pub fn service_types(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.service_type.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(service_type: &str) -> ServiceCatalogEntry {
        ServiceCatalogEntry {
            service_type: service_type.into(),
            base_price: Decimal::new(100, 0),
            variable_cost_basis: VariableCostBasis::None,
            variable_rate: Decimal::ZERO,
            regions: BTreeMap::new(),
        }
    }

    #[test]
    fn test_normalize_service_type() {
        assert_eq!(normalize_service_type("Carpet Cleaning"), "carpet_cleaning");
        assert_eq!(normalize_service_type("carpet cleaning"), "carpet_cleaning");
        assert_eq!(normalize_service_type("carpet_cleaning"), "carpet_cleaning");
        assert_eq!(normalize_service_type("TILE  CLEANING"), "tile__cleaning");
    }

    #[test]
    fn test_standard_catalog_is_valid() {
        let standard = ServiceCatalog::standard();
        let rebuilt = ServiceCatalog::new(standard.entries().to_vec()).unwrap();

        assert_eq!(
            rebuilt.service_types().collect::<Vec<_>>(),
            vec!["carpet_cleaning", "upholstery_cleaning", "tile_cleaning"]
        );
    }

    #[test]
    fn test_unlisted_region_is_unavailable() {
        let catalog = ServiceCatalog::standard();
        let tile = catalog.get("tile_cleaning").unwrap();

        assert!(tile.availability_in(&Region::new("WA")).is_none());
        assert!(tile.availability_in(&Region::new("TAS")).is_none());
        assert!(tile.availability_in(&Region::new("NSW")).is_some());
    }

    #[test]
    fn test_rejects_duplicates_and_bad_keys() {
        assert_eq!(
            ServiceCatalog::new(vec![entry("oven_cleaning"), entry("oven_cleaning")]),
            Err(PricingConfigError::DuplicateService("oven_cleaning".into()))
        );
        assert!(matches!(
            ServiceCatalog::new(vec![entry("Oven Cleaning")]),
            Err(PricingConfigError::UnnormalizedServiceType { .. })
        ));
        assert_eq!(ServiceCatalog::new(vec![]), Err(PricingConfigError::EmptyCatalog));
    }

    #[test]
    fn test_rejects_negative_amounts() {
        let mut bad = entry("oven_cleaning");
        bad.base_price = Decimal::new(-1, 0);
        assert!(matches!(
            ServiceCatalog::new(vec![bad]),
            Err(PricingConfigError::NegativeAmount { field: "base_price", .. })
        ));

        let mut bad = entry("oven_cleaning");
        bad.regions.insert(
            Region::new("NSW"),
            RegionAvailability::available(Decimal::new(-5, 1)),
        );
        assert!(matches!(
            ServiceCatalog::new(vec![bad]),
            Err(PricingConfigError::NegativeMultiplier { .. })
        ));
    }
}
