// Immutable, validated view of the catalog handed to the pipeline.

use std::path::PathBuf;

use cargos_core::{LocalityGroup, Occupation};
use serde::{Deserialize, Serialize};

/// What the pipeline does with an occupation label it cannot resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownOccupationPolicy {
    /// Price the row as the configured default occupation.
    #[default]
    Default,
    /// Leave the row unpriced and flag it for manual review.
    Review,
}

/// A gender-neutral occupation label and its two concrete occupations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenderVariant {
    /// Label as it appears without the neutral marker, e.g. `CAJERO`.
    pub base: String,
    pub male: String,
    pub female: String,
}

/// Quantity adjustments applied after prices are resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessRules {
    /// Occupations whose people always get `tie_quantity` of `tie_garment`.
    pub tie_occupations: Vec<String>,
    pub tie_garment: String,
    pub tie_quantity: u32,
    /// Garments never ordered more than once per person.
    pub single_unit_garments: Vec<String>,
}

impl Default for BusinessRules {
    fn default() -> Self {
        Self {
            tie_occupations: Vec::new(),
            tie_garment: "CORBATA".into(),
            tie_quantity: 2,
            single_unit_garments: vec!["SACO".into()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigSnapshot {
    pub occupations: Vec<Occupation>,
    pub default_occupation: String,
    /// Group for stores that are neither Tarapoto nor San Isidro.
    pub default_locality: LocalityGroup,
    pub unknown_occupation: UnknownOccupationPolicy,
    pub gender_variants: Vec<GenderVariant>,
    pub rules: BusinessRules,
    /// Column table override as (position, composite id), sorted by position.
    pub columns: Option<Vec<(usize, String)>>,
    /// File the snapshot was loaded from, if any.
    pub source: Option<PathBuf>,
}

impl ConfigSnapshot {
    /// Look up an occupation by exact key.
    pub fn occupation(&self, key: &str) -> Option<&Occupation> {
        self.occupations.iter().find(|o| o.key == key)
    }

    pub fn active_occupations(&self) -> impl Iterator<Item = &Occupation> {
        self.occupations.iter().filter(|o| o.active)
    }
}
