use crate::garment::GarmentDefinition;

/// A job role with its synonyms and orderable garments.
#[derive(Debug, Clone, PartialEq)]
pub struct Occupation {
    /// Canonical uppercase key, e.g. `CAJA (HOMBRE)`.
    pub key: String,
    pub display_name: String,
    pub synonyms: Vec<String>,
    pub garments: Vec<GarmentDefinition>,
    pub active: bool,
    pub description: String,
}

impl Occupation {
    pub fn garment(&self, garment_type: &str) -> Option<&GarmentDefinition> {
        self.garments
            .iter()
            .find(|g| g.garment_type.eq_ignore_ascii_case(garment_type))
    }

    pub fn primary_garment(&self) -> Option<&GarmentDefinition> {
        self.garments.iter().find(|g| g.primary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::garment::PriceMatrix;

    #[test]
    fn garment_lookup_ignores_case() {
        let mut polo = GarmentDefinition::new("POLO", PriceMatrix::new());
        polo.primary = true;
        let occ = Occupation {
            key: "DELIVERY".into(),
            display_name: "Delivery".into(),
            synonyms: vec!["MOTORIZADO".into()],
            garments: vec![GarmentDefinition::new("GORRA", PriceMatrix::new()), polo],
            active: true,
            description: String::new(),
        };
        assert!(occ.garment("polo").is_some());
        assert!(occ.garment("CASACA").is_none());
        assert_eq!(occ.primary_garment().map(|g| g.garment_type.as_str()), Some("POLO"));
    }
}
