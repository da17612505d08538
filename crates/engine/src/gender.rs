// Gender-neutral occupation labels ("CAJERO(A)") resolved from the garments ordered.

use std::collections::HashMap;

use cargos_config::GenderVariant;
use serde::Serialize;

use crate::error::EngineError;
use crate::occupation::{has_neutral_marker, normalize_label, OccupationResolver, Resolution};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Detect gender from the composite identifiers of ordered columns.
///
/// CAMISA or SACO_H means male, BLUSA or SACO_M means female.
/// Both or neither is undetermined.
pub fn detect_gender<'a>(composites: impl IntoIterator<Item = &'a str>) -> Option<Gender> {
    let mut male = false;
    let mut female = false;
    for composite in composites {
        let upper = composite.to_uppercase();
        let segments: Vec<&str> = upper
            .split(|c: char| c == '_' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .collect();
        for (i, segment) in segments.iter().enumerate() {
            let next = segments.get(i + 1).copied();
            match (*segment, next) {
                ("CAMISA", _) | ("SACO", Some("H")) => male = true,
                ("BLUSA", _) | ("SACO", Some("M")) => female = true,
                _ => {}
            }
        }
    }
    match (male, female) {
        (true, false) => Some(Gender::Male),
        (false, true) => Some(Gender::Female),
        _ => None,
    }
}

/// Outcome of resolving a neutral label against its variant pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenderedMatch {
    pub key: String,
    /// `None` when the garments did not settle it and the male variant was used.
    pub gender: Option<Gender>,
}

#[derive(Debug, Clone, Default)]
pub struct GenderResolver {
    /// Normalized base label -> (male key, female key).
    pairs: HashMap<String, (String, String)>,
}

impl GenderResolver {
    /// Resolve every variant's targets through the occupation index.
    pub fn build(variants: &[GenderVariant], occupations: &OccupationResolver) -> Result<Self, EngineError> {
        let mut pairs = HashMap::new();
        for variant in variants {
            let resolve = |target: &str| match occupations.resolve(target) {
                Resolution::Known(key) => Ok(key),
                Resolution::Unknown => Err(EngineError::UnknownVariantOccupation {
                    base: variant.base.clone(),
                    target: target.to_string(),
                }),
            };
            let male = resolve(&variant.male)?;
            let female = resolve(&variant.female)?;
            pairs.insert(normalize_label(&variant.base), (male, female));
        }
        Ok(Self { pairs })
    }

    /// Applies only to labels carrying a neutral marker whose base has a variant pair.
    pub fn resolve<'a>(
        &self,
        raw_label: &str,
        composites: impl IntoIterator<Item = &'a str>,
    ) -> Option<GenderedMatch> {
        if !has_neutral_marker(raw_label) {
            return None;
        }
        let (male, female) = self.pairs.get(&normalize_label(raw_label))?;
        let gender = detect_gender(composites);
        let key = match gender {
            Some(Gender::Female) => female.clone(),
            Some(Gender::Male) | None => male.clone(),
        };
        Some(GenderedMatch { key, gender })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cargos_core::{GarmentDefinition, Occupation, PriceMatrix};

    fn occupation(key: &str) -> Occupation {
        Occupation {
            key: key.into(),
            display_name: key.into(),
            synonyms: vec![],
            garments: vec![GarmentDefinition::new("CAMISA", PriceMatrix::new())],
            active: true,
            description: String::new(),
        }
    }

    fn resolver() -> GenderResolver {
        let index = OccupationResolver::build(&[occupation("CAJA (HOMBRE)"), occupation("CAJA (MUJER)")]).unwrap();
        GenderResolver::build(
            &[GenderVariant {
                base: "CAJERO".into(),
                male: "CAJA (HOMBRE)".into(),
                female: "caja (mujer)".into(),
            }],
            &index,
        )
        .unwrap()
    }

    #[test]
    fn detects_from_composites() {
        assert_eq!(detect_gender(["SALON_CAMISA", "DELIVERY_GORRA"]), Some(Gender::Male));
        assert_eq!(detect_gender(["CAJERO_BLUSA"]), Some(Gender::Female));
        assert_eq!(detect_gender(["CAJA_SACO_M"]), Some(Gender::Female));
        assert_eq!(detect_gender(["CAJA_SACO_H"]), Some(Gender::Male));
        assert_eq!(detect_gender(["SALON_CAMISA", "SALON_BLUSA"]), None);
        assert_eq!(detect_gender(["DELIVERY_POLO"]), None);
        assert_eq!(detect_gender(Vec::<&str>::new()), None);
    }

    #[test]
    fn neutral_label_picks_variant() {
        let r = resolver();
        assert_eq!(
            r.resolve("Cajero(a)", ["CAJERO_BLUSA"]),
            Some(GenderedMatch { key: "CAJA (MUJER)".into(), gender: Some(Gender::Female) })
        );
        assert_eq!(
            r.resolve("CAJERO (A)", ["CAJERO_CAMISA"]),
            Some(GenderedMatch { key: "CAJA (HOMBRE)".into(), gender: Some(Gender::Male) })
        );
    }

    #[test]
    fn undetermined_falls_back_to_male() {
        let r = resolver();
        assert_eq!(
            r.resolve("CAJERO(A)", ["BAR_POLO"]),
            Some(GenderedMatch { key: "CAJA (HOMBRE)".into(), gender: None })
        );
    }

    #[test]
    fn labels_without_marker_are_left_alone() {
        let r = resolver();
        assert_eq!(r.resolve("CAJERO", ["CAJERO_BLUSA"]), None);
        assert_eq!(r.resolve("MOZO(A)", ["SALON_CAMISA"]), None);
    }

    #[test]
    fn unknown_variant_target_fails() {
        let index = OccupationResolver::build(&[occupation("MOZO")]).unwrap();
        let err = GenderResolver::build(
            &[GenderVariant { base: "MOZO".into(), male: "MOZO".into(), female: "MOZA".into() }],
            &index,
        )
        .unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownVariantOccupation { base: "MOZO".into(), target: "MOZA".into() }
        );
    }
}
