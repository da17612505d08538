use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use cargos_core::{
    normalize_garment, GarmentDefinition, LocalityGroup, Money, Occupation, Orientation,
    PriceMatrix, SizeTier,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::snapshot::{BusinessRules, ConfigSnapshot, GenderVariant, UnknownOccupationPolicy};

// ---------------------------------------------------------------------------
// File format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    #[serde(default)]
    pub occupations: Vec<OccupationEntry>,
    #[serde(default = "default_occupation")]
    pub default_occupation: String,
    #[serde(default = "default_local_group")]
    pub default_local_group: String,
    #[serde(default)]
    pub unknown_occupation: UnknownOccupationPolicy,
    #[serde(default)]
    pub gender_variants: Vec<GenderVariant>,
    #[serde(default)]
    pub rules: BusinessRules,
    /// Column position (as a string key) to composite identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<BTreeMap<String, String>>,
}

fn default_occupation() -> String {
    "MOZO".into()
}

fn default_local_group() -> String {
    "OTHER".into()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccupationEntry {
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub prendas: Vec<PrendaEntry>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrendaEntry {
    pub prenda_type: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default = "default_true")]
    pub has_sizes: bool,
    #[serde(default)]
    pub garment_type: Orientation,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub default_quantity: u32,
    #[serde(default)]
    pub is_primary: bool,

    pub price_sml_other: Option<Money>,
    pub price_sml_tarapoto: Option<Money>,
    pub price_sml_san_isidro: Option<Money>,
    pub price_xl_other: Option<Money>,
    pub price_xl_tarapoto: Option<Money>,
    pub price_xl_san_isidro: Option<Money>,
    pub price_xxl_other: Option<Money>,
    pub price_xxl_tarapoto: Option<Money>,
    pub price_xxl_san_isidro: Option<Money>,
}

impl PrendaEntry {
    /// Every price field with its matrix coordinates and field name.
    fn price_fields(&self) -> [(SizeTier, LocalityGroup, &'static str, Option<Money>); 9] {
        use LocalityGroup::{Other, SanIsidro, Tarapoto};
        use SizeTier::{Sml, Xl, Xxl};
        [
            (Sml, Other, "price_sml_other", self.price_sml_other),
            (Sml, Tarapoto, "price_sml_tarapoto", self.price_sml_tarapoto),
            (Sml, SanIsidro, "price_sml_san_isidro", self.price_sml_san_isidro),
            (Xl, Other, "price_xl_other", self.price_xl_other),
            (Xl, Tarapoto, "price_xl_tarapoto", self.price_xl_tarapoto),
            (Xl, SanIsidro, "price_xl_san_isidro", self.price_xl_san_isidro),
            (Xxl, Other, "price_xxl_other", self.price_xxl_other),
            (Xxl, Tarapoto, "price_xxl_tarapoto", self.price_xxl_tarapoto),
            (Xxl, SanIsidro, "price_xxl_san_isidro", self.price_xxl_san_isidro),
        ]
    }

    fn matrix(&self) -> PriceMatrix {
        let mut matrix = PriceMatrix::new();
        for (tier, group, _, price) in self.price_fields() {
            matrix.set(tier, group, price);
        }
        matrix
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl CatalogFile {
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let catalog: CatalogFile =
            serde_json::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let catalog: CatalogFile =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read a catalog file; `.toml` files are TOML, everything else JSON.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        let is_toml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml(&contents)
        } else {
            Self::from_json(&contents)
        }
    }

    /// Check the whole catalog and report every problem at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        let mut names = HashSet::new();

        for (i, occ) in self.occupations.iter().enumerate() {
            let label = if occ.name.trim().is_empty() {
                format!("occupations[{i}]")
            } else {
                format!("occupation '{}'", occ.name.trim())
            };

            if occ.name.trim().is_empty() {
                errors.push(format!("{label}: name is empty"));
            } else if !names.insert(canonical_key(&occ.name)) {
                errors.push(format!("{label}: defined more than once"));
            }
            if occ.display_name.trim().is_empty() {
                errors.push(format!("{label}: display_name is empty"));
            }
            if occ.synonyms.iter().all(|s| s.trim().is_empty()) {
                errors.push(format!("{label}: at least one synonym is required"));
            }
            if occ.prendas.is_empty() {
                errors.push(format!("{label}: at least one prenda is required"));
            }

            let mut garments = HashSet::new();
            for (j, prenda) in occ.prendas.iter().enumerate() {
                let garment = normalize_garment(&prenda.prenda_type);
                if garment.is_empty() {
                    errors.push(format!("{label}: prendas[{j}] has an empty prenda_type"));
                } else if !garments.insert(garment.clone()) {
                    errors.push(format!(
                        "{label}: prenda '{}' is garment {garment}, listed more than once",
                        prenda.prenda_type.trim()
                    ));
                }
                for (_, _, field, price) in prenda.price_fields() {
                    if price.is_some_and(Money::is_negative) {
                        errors.push(format!(
                            "{label}: prenda '{}' {field} is negative",
                            prenda.prenda_type.trim()
                        ));
                    }
                }
            }
        }

        if !names.contains(&canonical_key(&self.default_occupation)) {
            errors.push(format!(
                "default_occupation '{}' is not a defined occupation",
                self.default_occupation
            ));
        }

        if LocalityGroup::parse_key(&self.default_local_group).is_none() {
            errors.push(format!(
                "default_local_group '{}' must be OTHER, TARAPOTO or SAN_ISIDRO",
                self.default_local_group
            ));
        }

        for variant in &self.gender_variants {
            for target in [&variant.male, &variant.female] {
                if !names.contains(&canonical_key(target)) {
                    errors.push(format!(
                        "gender variant '{}': occupation '{target}' is not defined",
                        variant.base
                    ));
                }
            }
        }

        if let Some(columns) = &self.columns {
            for (position, id) in columns {
                if position.trim().parse::<usize>().is_err() {
                    errors.push(format!("columns: '{position}' is not a column position"));
                }
                if id.trim().is_empty() {
                    errors.push(format!("columns: position {position} has an empty identifier"));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Build the immutable snapshot the pipeline runs against.
    pub fn into_snapshot(self) -> Result<ConfigSnapshot, ConfigError> {
        self.validate()?;

        let default_locality = LocalityGroup::parse_key(&self.default_local_group)
            .unwrap_or_default();

        let columns = match self.columns {
            Some(map) => {
                let mut table = Vec::with_capacity(map.len());
                for (position, id) in map {
                    let position = position
                        .trim()
                        .parse::<usize>()
                        .map_err(|e| ConfigError::Parse(format!("columns: {e}")))?;
                    table.push((position, id.trim().to_uppercase()));
                }
                table.sort_by_key(|(p, _)| *p);
                Some(table)
            }
            None => None,
        };

        let occupations = self
            .occupations
            .into_iter()
            .map(|entry| Occupation {
                key: canonical_key(&entry.name),
                display_name: entry.display_name.trim().to_string(),
                synonyms: entry
                    .synonyms
                    .iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
                garments: entry
                    .prendas
                    .iter()
                    .map(|p| GarmentDefinition {
                        garment_type: normalize_garment(&p.prenda_type),
                        display_name: p.display_name.trim().to_string(),
                        has_sizes: p.has_sizes,
                        orientation: p.garment_type,
                        prices: p.matrix(),
                        required: p.is_required,
                        default_quantity: p.default_quantity,
                        primary: p.is_primary,
                    })
                    .collect(),
                active: entry.is_active,
                description: entry.description,
            })
            .collect();

        Ok(ConfigSnapshot {
            occupations,
            default_occupation: canonical_key(&self.default_occupation),
            default_locality,
            unknown_occupation: self.unknown_occupation,
            gender_variants: self.gender_variants,
            rules: self.rules,
            columns,
            source: None,
        })
    }
}

fn canonical_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_JSON: &str = r#"{
        "default_occupation": "MOZO",
        "occupations": [
            {
                "name": "MOZO",
                "display_name": "Mozo",
                "synonyms": ["MOZO", "MESERO"],
                "prendas": [
                    {
                        "prenda_type": "CAMISA",
                        "display_name": "Camisa",
                        "is_primary": true,
                        "price_sml_other": 25.0,
                        "price_xl_other": 27.5,
                        "price_sml_tarapoto": 0.0
                    },
                    {
                        "prenda_type": "pantalon",
                        "garment_type": "LOWER",
                        "price_sml_other": 30
                    }
                ]
            }
        ]
    }"#;

    const VALID_TOML: &str = r#"
default_occupation = "delivery"
unknown_occupation = "review"

[rules]
tie_occupations = ["DELIVERY"]

[columns]
9 = "DELIVERY_POLO"

[[occupations]]
name = "DELIVERY"
display_name = "Delivery"
synonyms = ["MOTORIZADO"]

[[occupations.prendas]]
prenda_type = "POLO"
price_sml_other = 18.5
"#;

    #[test]
    fn parse_valid_json() {
        let catalog = CatalogFile::from_json(VALID_JSON).unwrap();
        assert_eq!(catalog.occupations.len(), 1);
        assert_eq!(catalog.default_local_group, "OTHER");
        assert_eq!(catalog.unknown_occupation, UnknownOccupationPolicy::Default);
        assert_eq!(catalog.rules.tie_garment, "CORBATA");
        assert_eq!(catalog.rules.single_unit_garments, vec!["SACO".to_string()]);
    }

    #[test]
    fn snapshot_keeps_explicit_zero_and_empty_cells_apart() {
        let snapshot = CatalogFile::from_json(VALID_JSON).unwrap().into_snapshot().unwrap();
        let mozo = snapshot.occupation("MOZO").unwrap();
        let camisa = mozo.garment("CAMISA").unwrap();
        assert!(camisa.primary);
        assert_eq!(camisa.prices.get(SizeTier::Sml, LocalityGroup::Other), Some(Money::from_cents(2500)));
        assert_eq!(camisa.prices.get(SizeTier::Xl, LocalityGroup::Other), Some(Money::from_cents(2750)));
        assert_eq!(camisa.prices.get(SizeTier::Sml, LocalityGroup::Tarapoto), Some(Money::ZERO));
        assert_eq!(camisa.prices.get(SizeTier::Xxl, LocalityGroup::Other), None);

        let pantalon = mozo.garment("PANTALON").unwrap();
        assert_eq!(pantalon.orientation, Orientation::Lower);
        assert!(pantalon.has_sizes);
    }

    #[test]
    fn parse_valid_toml() {
        let snapshot = CatalogFile::from_toml(VALID_TOML).unwrap().into_snapshot().unwrap();
        assert_eq!(snapshot.default_occupation, "DELIVERY");
        assert_eq!(snapshot.unknown_occupation, UnknownOccupationPolicy::Review);
        assert_eq!(snapshot.rules.tie_occupations, vec!["DELIVERY".to_string()]);
        assert_eq!(snapshot.rules.tie_quantity, 2);
        assert_eq!(snapshot.columns, Some(vec![(9, "DELIVERY_POLO".to_string())]));
    }

    #[test]
    fn validation_errors_are_collected() {
        let input = r#"{
            "default_occupation": "NOPE",
            "default_local_group": "LIMA",
            "occupations": [
                { "name": "", "display_name": "", "synonyms": [], "prendas": [] },
                {
                    "name": "CAJERO",
                    "display_name": "Cajero",
                    "synonyms": ["CAJA"],
                    "prendas": [ { "prenda_type": " ", "price_sml_other": -1.0 } ]
                }
            ]
        }"#;
        match CatalogFile::from_json(input) {
            Err(ConfigError::Validation(errors)) => {
                let joined = errors.join("\n");
                assert!(joined.contains("name is empty"), "{joined}");
                assert!(joined.contains("display_name is empty"), "{joined}");
                assert!(joined.contains("at least one synonym"), "{joined}");
                assert!(joined.contains("at least one prenda"), "{joined}");
                assert!(joined.contains("empty prenda_type"), "{joined}");
                assert!(joined.contains("price_sml_other is negative"), "{joined}");
                assert!(joined.contains("default_occupation 'NOPE'"), "{joined}");
                assert!(joined.contains("default_local_group 'LIMA'"), "{joined}");
            }
            other => panic!("expected validation errors, got {other:?}"),
        }
    }

    #[test]
    fn prenda_types_share_the_column_normalizer() {
        let input = r#"{
            "occupations": [
                { "name": "MOZO", "display_name": "Mozo", "synonyms": ["MOZO"],
                  "prendas": [
                    { "prenda_type": "Pantalón", "price_sml_other": 40.0 },
                    { "prenda_type": "CAMISAS", "price_sml_other": 25.0 },
                    { "prenda_type": "SACO_H", "price_sml_other": 60.0 }
                  ] }
            ]
        }"#;
        let snapshot = CatalogFile::from_json(input).unwrap().into_snapshot().unwrap();
        let mozo = snapshot.occupation("MOZO").unwrap();
        let types: Vec<&str> = mozo.garments.iter().map(|g| g.garment_type.as_str()).collect();
        assert_eq!(types, vec!["PANTALON", "CAMISA", "SACO"]);
    }

    #[test]
    fn prendas_normalizing_to_one_garment_are_rejected() {
        let input = r#"{
            "occupations": [
                { "name": "MOZO", "display_name": "Mozo", "synonyms": ["MOZO"],
                  "prendas": [ { "prenda_type": "PANTALON" }, { "prenda_type": "Pantalones" } ] }
            ]
        }"#;
        let err = CatalogFile::from_json(input).unwrap_err();
        assert!(err.to_string().contains("'Pantalones' is garment PANTALON"), "{err}");
    }

    #[test]
    fn non_finite_prices_are_parse_errors() {
        for value in ["nan", "inf", "-inf"] {
            let input = VALID_TOML.replace("price_sml_other = 18.5", &format!("price_sml_other = {value}"));
            match CatalogFile::from_toml(&input) {
                Err(ConfigError::Parse(message)) => {
                    assert!(message.contains("finite amount"), "{value}: {message}")
                }
                other => panic!("{value}: expected a parse error, got {other:?}"),
            }
        }
    }

    #[test]
    fn gender_variant_targets_must_exist() {
        let input = r#"{
            "default_occupation": "CAJERO",
            "gender_variants": [ { "base": "CAJERO", "male": "CAJERO", "female": "CAJERA" } ],
            "occupations": [
                { "name": "CAJERO", "display_name": "Cajero", "synonyms": ["CAJA"],
                  "prendas": [ { "prenda_type": "CAMISA" } ] }
            ]
        }"#;
        let err = CatalogFile::from_json(input).unwrap_err();
        assert!(err.to_string().contains("'CAJERA' is not defined"), "{err}");
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            CatalogFile::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("catalog.toml");
        std::fs::write(&toml_path, VALID_TOML).unwrap();
        assert_eq!(CatalogFile::load(&toml_path).unwrap().default_occupation, "delivery");

        let json_path = dir.path().join("catalog.json");
        std::fs::write(&json_path, VALID_JSON).unwrap();
        assert_eq!(CatalogFile::load(&json_path).unwrap().occupations[0].name, "MOZO");

        assert!(matches!(
            CatalogFile::load(&dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
