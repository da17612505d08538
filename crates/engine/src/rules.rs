// Quantity adjustments from the catalog's `rules` table.

use std::fmt;

use cargos_config::BusinessRules;
use cargos_core::{normalize_garment, LocalityGroup};
use serde::Serialize;

use crate::occupation::normalize_label;
use crate::price::NormalizedGarmentEntry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum AppliedRule {
    TieAdded { garment: String, quantity: u32 },
    TieAdjusted { garment: String, from: u32, to: u32 },
    SingleUnitCapped { garment: String, from: u32 },
}

impl fmt::Display for AppliedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TieAdded { garment, quantity } => write!(f, "added {quantity} {garment}"),
            Self::TieAdjusted { garment, from, to } => {
                write!(f, "adjusted {garment} quantity from {from} to {to}")
            }
            Self::SingleUnitCapped { garment, from } => {
                write!(f, "capped {garment} quantity from {from} to 1")
            }
        }
    }
}

/// Apply the rules to one person's entries in place.
pub fn apply(
    rules: &BusinessRules,
    occupation_key: &str,
    locality: LocalityGroup,
    entries: &mut Vec<NormalizedGarmentEntry>,
) -> Vec<AppliedRule> {
    let mut applied = Vec::new();
    let occupation = normalize_label(occupation_key);
    let tie_garment = normalize_garment(&rules.tie_garment);

    let wants_tie = !tie_garment.is_empty()
        && rules
            .tie_occupations
            .iter()
            .any(|o| normalize_label(o) == occupation);

    if wants_tie {
        let mut found = false;
        for entry in entries.iter_mut().filter(|e| e.garment_type == tie_garment) {
            found = true;
            if entry.quantity != rules.tie_quantity {
                applied.push(AppliedRule::TieAdjusted {
                    garment: tie_garment.clone(),
                    from: entry.quantity,
                    to: rules.tie_quantity,
                });
                entry.quantity = rules.tie_quantity;
            }
        }
        if !found && rules.tie_quantity > 0 {
            entries.push(NormalizedGarmentEntry {
                composite: tie_garment.clone(),
                garment_type: tie_garment.clone(),
                quantity: rules.tie_quantity,
                size: None,
                tier: cargos_core::SizeTier::Sml,
                locality,
            });
            applied.push(AppliedRule::TieAdded {
                garment: tie_garment.clone(),
                quantity: rules.tie_quantity,
            });
        }
    }

    let single_unit: Vec<String> = rules
        .single_unit_garments
        .iter()
        .map(|g| normalize_garment(g))
        .collect();
    for entry in entries.iter_mut() {
        if entry.quantity > 1 && single_unit.contains(&entry.garment_type) {
            applied.push(AppliedRule::SingleUnitCapped {
                garment: entry.garment_type.clone(),
                from: entry.quantity,
            });
            entry.quantity = 1;
        }
    }

    for rule in &applied {
        log::info!("business rule for {occupation_key}: {rule}");
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use cargos_core::SizeTier;

    fn entry(garment: &str, quantity: u32) -> NormalizedGarmentEntry {
        NormalizedGarmentEntry {
            composite: format!("X_{garment}"),
            garment_type: garment.into(),
            quantity,
            size: Some("M".into()),
            tier: SizeTier::Sml,
            locality: LocalityGroup::Other,
        }
    }

    fn rules() -> BusinessRules {
        BusinessRules {
            tie_occupations: vec!["Staff Administrativo (Hombre)".into()],
            ..BusinessRules::default()
        }
    }

    #[test]
    fn tie_added_for_listed_occupation() {
        let mut entries = vec![entry("CAMISA", 3)];
        let applied = apply(&rules(), "STAFF ADMINISTRATIVO (HOMBRE)", LocalityGroup::Other, &mut entries);
        assert_eq!(applied, vec![AppliedRule::TieAdded { garment: "CORBATA".into(), quantity: 2 }]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].garment_type, "CORBATA");
        assert_eq!(entries[1].quantity, 2);
        assert_eq!(entries[1].size, None);
    }

    #[test]
    fn tie_quantity_forced() {
        let mut entries = vec![entry("CORBATA", 5)];
        let applied = apply(&rules(), "STAFF ADMINISTRATIVO (HOMBRE)", LocalityGroup::Other, &mut entries);
        assert_eq!(applied, vec![AppliedRule::TieAdjusted { garment: "CORBATA".into(), from: 5, to: 2 }]);
        assert_eq!(entries[0].quantity, 2);
    }

    #[test]
    fn other_occupations_get_no_tie() {
        let mut entries = vec![entry("CAMISA", 1)];
        assert!(apply(&rules(), "MOZO", LocalityGroup::Other, &mut entries).is_empty());
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn saco_is_capped_at_one() {
        let mut entries = vec![entry("SACO", 3), entry("CAMISA", 3)];
        let applied = apply(&rules(), "MOZO", LocalityGroup::Other, &mut entries);
        assert_eq!(applied, vec![AppliedRule::SingleUnitCapped { garment: "SACO".into(), from: 3 }]);
        assert_eq!(entries[0].quantity, 1);
        assert_eq!(entries[1].quantity, 3);
    }
}
