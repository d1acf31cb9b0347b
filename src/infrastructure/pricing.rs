use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::application::QuotationEngine;
use crate::domain::{
    PostcodeRange, PostcodeRegionTable, PricingConfigError, ServiceCatalog, ServiceCatalogEntry,
};
use crate::infrastructure::config::{read_yaml, ConfigError};

#[derive(Debug, Error)]
pub enum PricingLoadError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("pricing file `{0}` not found")]
    Missing(PathBuf),
    #[error("invalid pricing tables: {0}")]
    Invalid(#[from] PricingConfigError),
}

/// On-disk layout of `pricing.yaml`.
#[derive(Debug, Deserialize)]
pub struct PricingFile {
    pub services: Vec<ServiceCatalogEntry>,
    pub postcode_regions: Vec<PostcodeRegionSpec>,
}

#[derive(Debug, Deserialize)]
pub struct PostcodeRegionSpec {
    /// `"<start>-<end>"`, both ends inclusive.
    pub range: String,
    pub region: String,
}

impl PricingFile {
    pub fn into_engine(self) -> Result<QuotationEngine, PricingConfigError> {
        let catalog = ServiceCatalog::new(self.services)?;
        let ranges = self
            .postcode_regions
            .into_iter()
            .map(|spec| PostcodeRange::parse(&spec.range, spec.region.as_str()))
            .collect::<Result<Vec<_>, _>>()?;
        let postcodes = PostcodeRegionTable::new(ranges)?;

        Ok(QuotationEngine::new(catalog, postcodes))
    }
}

/// Builds the quotation engine from `path`, or the built-in tables when no
/// pricing file is configured. A configured file that is missing or invalid
/// is a startup error.
pub fn load_quotation_engine(path: Option<&Path>) -> Result<QuotationEngine, PricingLoadError> {
    let Some(path) = path else {
        tracing::info!("using built-in pricing tables");
        return Ok(QuotationEngine::standard());
    };

    let file: PricingFile =
        read_yaml(path)?.ok_or_else(|| PricingLoadError::Missing(path.to_path_buf()))?;
    let engine = file.into_engine()?;

    tracing::info!(
        path = %path.display(),
        services = engine.catalog().entries().len(),
        ranges = engine.postcodes().ranges().len(),
        "pricing tables loaded"
    );
    Ok(engine)
}
