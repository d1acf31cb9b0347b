use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::PricingConfigError;

/// Geographic pricing region, e.g. a state or territory code.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Region {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// Inclusive postcode interval mapped to a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostcodeRange {
    pub start: u32,
    pub end: u32,
    pub region: Region,
}

impl PostcodeRange {
    pub fn new(start: u32, end: u32, region: impl Into<Region>) -> Result<Self, PricingConfigError> {
        if start > end {
            return Err(PricingConfigError::InvertedRange { start, end });
        }
        Ok(Self {
            start,
            end,
            region: region.into(),
        })
    }

    /// Parses the `"<start>-<end>"` form used in pricing files.
    pub fn parse(range: &str, region: impl Into<Region>) -> Result<Self, PricingConfigError> {
        let (start, end) = range
            .split_once('-')
            .ok_or_else(|| PricingConfigError::MalformedRange(range.to_string()))?;
        let bound = |s: &str| {
            u32::from_str(s.trim()).map_err(|_| PricingConfigError::MalformedRange(range.to_string()))
        };
        Self::new(bound(start)?, bound(end)?, region)
    }

    pub fn contains(&self, postcode: u32) -> bool {
        self.start <= postcode && postcode <= self.end
    }

    fn overlaps(&self, other: &PostcodeRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for PostcodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ({})", self.start, self.end, self.region)
    }
}

/// Postcode-to-region lookup table.
///
/// Ranges keep their declaration order. Construction rejects overlapping
/// ranges, so at most one range can ever contain a given postcode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PostcodeRegionTable {
    ranges: Vec<PostcodeRange>,
}

impl PostcodeRegionTable {
    pub fn new(ranges: Vec<PostcodeRange>) -> Result<Self, PricingConfigError> {
        let mut sorted: Vec<&PostcodeRange> = ranges.iter().collect();
        sorted.sort_by_key(|r| (r.start, r.end));

        if let Some(pair) = sorted.windows(2).find(|w| w[0].overlaps(w[1])) {
            return Err(PricingConfigError::OverlappingRanges {
                first: pair[0].to_string(),
                second: pair[1].to_string(),
            });
        }

        Ok(Self { ranges })
    }

    /// Australian state ranges served by default.
    pub fn standard() -> Self {
        let range = |start, end, region| PostcodeRange {
            start,
            end,
            region: Region::new(region),
        };
        Self {
            ranges: vec![
                range(2000, 2999, "NSW"),
                range(3000, 3999, "VIC"),
                range(4000, 4999, "QLD"),
                range(5000, 5999, "SA"),
                range(6000, 6999, "WA"),
            ],
        }
    }

    pub fn ranges(&self) -> &[PostcodeRange] {
        &self.ranges
    }

    /// Resolves a raw postcode to its region.
    ///
    /// Input that does not parse as an unsigned integer, or that falls
    /// outside every range, resolves to `None`.
    pub fn resolve_region(&self, postcode: &str) -> Option<&Region> {
        let value: u32 = postcode.trim().parse().ok()?;
        self.ranges
            .iter()
            .find(|r| r.contains(value))
            .map(|r| &r.region)
    }
}
