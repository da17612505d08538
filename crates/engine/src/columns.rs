// Fixed column position -> composite OCCUPATION_GARMENT identifier.

use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;

use cargos_config::ConfigSnapshot;

use crate::error::EngineError;

/// Standard request layout, columns J..AH.
pub const STANDARD_COLUMNS: [(usize, &str); 25] = [
    (9, "SALON_CAMISA"),
    (10, "SALON_BLUSA"),
    (11, "SALON_MANDILON"),
    (12, "SALON_ANDARIN"),
    (13, "DELIVERY_POLO"),
    (14, "DELIVERY_CASACA"),
    (15, "DELIVERY_GORRA"),
    (16, "PACKER_POLO"),
    (17, "PACKER_GORRA"),
    (18, "BAR_CAMISA"),
    (19, "BAR_BLUSA"),
    (20, "BAR_POLO"),
    (21, "BAR_PECHERA"),
    (22, "CAJERO_CAMISA"),
    (23, "CAJERO_BLUSA"),
    (24, "SEGURIDAD_CAMISA"),
    (25, "SEGURIDAD_BLUSA"),
    (26, "SEGURIDAD_SACO"),
    (27, "ANFITRION_CAMISA"),
    (28, "ANFITRION_CASACA"),
    (29, "PRODUCCION_CHAQUETA"),
    (30, "PRODUCCION_POLO"),
    (31, "PRODUCCION_PANTALON"),
    (32, "PRODUCCION_PECHERA"),
    (33, "PRODUCCION_GARIBALDI"),
];

#[derive(Debug, Clone)]
pub struct ColumnMapper {
    by_position: BTreeMap<usize, String>,
}

impl ColumnMapper {
    pub fn standard() -> Self {
        Self {
            by_position: STANDARD_COLUMNS
                .iter()
                .map(|(p, id)| (*p, id.to_string()))
                .collect(),
        }
    }

    /// Build from a custom table. Composite identifiers must be unique.
    pub fn from_entries<I, S>(entries: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (usize, S)>,
        S: Into<String>,
    {
        let mut by_position = BTreeMap::new();
        let mut seen: HashMap<String, usize> = HashMap::new();
        for (position, id) in entries {
            let id = id.into().trim().to_uppercase();
            if let Some(&first) = seen.get(&id) {
                return Err(EngineError::DuplicateComposite {
                    id,
                    first: first.min(position),
                    second: first.max(position),
                });
            }
            seen.insert(id.clone(), position);
            by_position.insert(position, id);
        }
        Ok(Self { by_position })
    }

    /// The catalog's `columns` override, or the standard table.
    pub fn from_snapshot(snapshot: &ConfigSnapshot) -> Result<Self, EngineError> {
        match &snapshot.columns {
            Some(table) => Self::from_entries(table.iter().map(|(p, id)| (*p, id.as_str()))),
            None => Ok(Self::standard()),
        }
    }

    pub fn resolve(&self, position: usize) -> Result<&str, EngineError> {
        self.by_position
            .get(&position)
            .map(String::as_str)
            .ok_or(EngineError::UnmappedColumn { position })
    }

    /// First to last mapped position.
    pub fn span(&self) -> Option<RangeInclusive<usize>> {
        let first = *self.by_position.keys().next()?;
        let last = *self.by_position.keys().next_back()?;
        Some(first..=last)
    }

    /// Positions the workbook reader must scan: the request's `uniform`
    /// block widened to cover every mapped position. Quantities inside the
    /// block but outside the table still reach [`resolve`](Self::resolve)
    /// and fail there.
    pub fn scan_range(&self, uniform: RangeInclusive<usize>) -> RangeInclusive<usize> {
        match self.span() {
            Some(span) => (*uniform.start()).min(*span.start())..=(*uniform.end()).max(*span.end()),
            None => uniform,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (usize, &str)> {
        self.by_position.iter().map(|(p, id)| (*p, id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }
}

impl Default for ColumnMapper {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_covers_j_to_ah() {
        let mapper = ColumnMapper::standard();
        assert_eq!(mapper.len(), 25);
        assert_eq!(mapper.span(), Some(9..=33));
        assert_eq!(mapper.resolve(9).unwrap(), "SALON_CAMISA");
        assert_eq!(mapper.resolve(13).unwrap(), "DELIVERY_POLO");
        assert_eq!(mapper.resolve(33).unwrap(), "PRODUCCION_GARIBALDI");
    }

    #[test]
    fn standard_composites_are_unique() {
        let ids: Vec<_> = STANDARD_COLUMNS.iter().map(|(p, id)| (*p, *id)).collect();
        assert!(ColumnMapper::from_entries(ids).is_ok());
    }

    #[test]
    fn positions_outside_the_table_are_unmapped() {
        let mapper = ColumnMapper::standard();
        assert_eq!(mapper.resolve(8), Err(EngineError::UnmappedColumn { position: 8 }));
        assert_eq!(mapper.resolve(34), Err(EngineError::UnmappedColumn { position: 34 }));
    }

    #[test]
    fn duplicate_composite_is_rejected() {
        let err = ColumnMapper::from_entries([(9, "SALON_CAMISA"), (12, "salon_camisa ")]).unwrap_err();
        assert_eq!(
            err,
            EngineError::DuplicateComposite {
                id: "SALON_CAMISA".into(),
                first: 9,
                second: 12
            }
        );
    }

    #[test]
    fn scan_range_covers_request_block_and_table() {
        let narrow = ColumnMapper::from_entries([(9, "A_POLO"), (20, "A_GORRA")]).unwrap();
        assert_eq!(narrow.scan_range(9..=33), 9..=33);
        assert_eq!(narrow.resolve(25), Err(EngineError::UnmappedColumn { position: 25 }));

        let wide = ColumnMapper::from_entries([(5, "A_POLO"), (40, "A_GORRA")]).unwrap();
        assert_eq!(wide.scan_range(9..=33), 5..=40);
        assert_eq!(ColumnMapper::standard().scan_range(9..=33), 9..=33);
    }

    #[test]
    fn custom_table_with_gap_reports_gap() {
        let mapper = ColumnMapper::from_entries([(9, "A_POLO"), (11, "A_GORRA")]).unwrap();
        assert_eq!(mapper.span(), Some(9..=11));
        assert!(mapper.resolve(10).is_err());
    }
}
