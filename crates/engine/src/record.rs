// Raw row + catalog snapshot -> priced person record.

use std::collections::HashMap;

use cargos_config::{ConfigSnapshot, UnknownOccupationPolicy};
use cargos_core::{
    normalize_garment, title_case, LocalityGroup, Occupation, Orientation, RawRow, SizeTier,
};
use serde::Serialize;

use crate::columns::ColumnMapper;
use crate::error::EngineError;
use crate::gender::{Gender, GenderResolver};
use crate::occupation::{OccupationResolver, Resolution};
use crate::price::{
    calculate_total, price_for, MissingReason, NormalizedGarmentEntry, PersonTotal, PriceLookup,
    PricedGarmentEntry,
};
use crate::rules::{self, AppliedRule};

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OccupationOutcome {
    /// The label matched a key or synonym.
    Recognized,
    /// A neutral label resolved through its gender pair; `None` means undetermined.
    Gendered { gender: Option<Gender> },
    /// Unknown label priced as the default occupation.
    Fallback,
    /// Unknown label left unpriced for manual review.
    Review,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    FullyPriced,
    PartiallyPriced,
    Review,
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonRecord {
    pub row_number: usize,
    pub full_name: String,
    pub document_id: String,
    pub raw_occupation: String,
    /// Resolved occupation key; `None` when left for review.
    pub occupation: Option<String>,
    /// Catalog display name, or the raw label when unresolved.
    pub occupation_display: String,
    pub outcome: OccupationOutcome,
    pub store: String,
    pub locality: LocalityGroup,
    pub entries: Vec<PricedGarmentEntry>,
    pub total: PersonTotal,
    pub juegos: u32,
    pub rules: Vec<AppliedRule>,
}

impl PersonRecord {
    pub fn status(&self) -> RecordStatus {
        if self.needs_review() {
            RecordStatus::Review
        } else if self.total.is_partial() {
            RecordStatus::PartiallyPriced
        } else {
            RecordStatus::FullyPriced
        }
    }

    pub fn needs_review(&self) -> bool {
        matches!(
            self.outcome,
            OccupationOutcome::Review | OccupationOutcome::Gendered { gender: None }
        )
    }

    /// The label did not match the catalog (fallback or review).
    pub fn is_unrecognized(&self) -> bool {
        matches!(self.outcome, OccupationOutcome::Fallback | OccupationOutcome::Review)
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Indexes built once per snapshot; prices rows against it.
#[derive(Debug)]
pub struct Pipeline<'a> {
    snapshot: &'a ConfigSnapshot,
    columns: ColumnMapper,
    occupations: OccupationResolver,
    genders: GenderResolver,
    default_key: String,
}

impl<'a> Pipeline<'a> {
    /// Build every index up front. Any integrity fault fails here, before a row is read.
    pub fn new(snapshot: &'a ConfigSnapshot) -> Result<Self, EngineError> {
        let columns = ColumnMapper::from_snapshot(snapshot)?;
        let occupations = OccupationResolver::build(&snapshot.occupations)?;
        let default_key = match occupations.resolve(&snapshot.default_occupation) {
            Resolution::Known(key) => key,
            Resolution::Unknown => {
                return Err(EngineError::UnknownDefaultOccupation(
                    snapshot.default_occupation.clone(),
                ))
            }
        };
        let genders = GenderResolver::build(&snapshot.gender_variants, &occupations)?;
        Ok(Self {
            snapshot,
            columns,
            occupations,
            genders,
            default_key,
        })
    }

    pub fn columns(&self) -> &ColumnMapper {
        &self.columns
    }

    pub fn resolver(&self) -> &OccupationResolver {
        &self.occupations
    }

    pub fn snapshot(&self) -> &ConfigSnapshot {
        self.snapshot
    }

    /// Locality group for a store, using the catalog default for unnamed regions.
    pub fn locality_for(&self, store: &str) -> LocalityGroup {
        match LocalityGroup::from_store(store) {
            LocalityGroup::Other => self.snapshot.default_locality,
            group => group,
        }
    }

    /// Price one request row. Only a column-table fault is an error; every
    /// other problem is carried on the record.
    pub fn price_row(&self, row: &RawRow, store: &str) -> Result<PersonRecord, EngineError> {
        let locality = self.locality_for(store);

        let mut ordered: Vec<(&str, u32)> = Vec::with_capacity(row.uniform.len());
        for cell in row.uniform.iter().filter(|c| c.quantity > 0) {
            ordered.push((self.columns.resolve(cell.position)?, cell.quantity));
        }

        let (key, outcome) = self.resolve_occupation(row, &ordered);
        let occupation = key.as_deref().and_then(|k| self.snapshot.occupation(k));

        let mut entries: Vec<NormalizedGarmentEntry> = ordered
            .iter()
            .map(|(composite, quantity)| {
                let garment_type = normalize_garment(composite);
                let orientation = orientation_of(occupation, &garment_type);
                let size = orientation
                    .select_size(row.upper_size.as_deref(), row.lower_size.as_deref())
                    .map(str::to_string);
                let one_size = occupation
                    .and_then(|o| o.garment(&garment_type))
                    .is_some_and(|g| !g.has_sizes);
                let tier = match size.as_deref() {
                    Some(size) if !one_size => SizeTier::from_size(size),
                    _ => SizeTier::Sml,
                };
                NormalizedGarmentEntry {
                    composite: composite.to_string(),
                    garment_type,
                    quantity: *quantity,
                    size,
                    tier,
                    locality,
                }
            })
            .collect();

        let applied = match &key {
            Some(k) => rules::apply(&self.snapshot.rules, k, locality, &mut entries),
            None => Vec::new(),
        };

        let priced: Vec<PricedGarmentEntry> = entries
            .into_iter()
            .map(|entry| {
                let definition = occupation.and_then(|o| o.garment(&entry.garment_type));
                let label = definition
                    .map(|g| g.label())
                    .unwrap_or_else(|| title_case(&entry.garment_type));
                let has_sizes = definition.map_or(true, |g| g.has_sizes);
                let price = match occupation {
                    Some(o) => price_for(o, &entry.garment_type, entry.tier, entry.locality),
                    None => PriceLookup::NotFound(MissingReason::OccupationUnresolved),
                };
                PricedGarmentEntry::new(entry, label, has_sizes, price)
            })
            .collect();

        let total = calculate_total(&priced);
        let primary = occupation
            .and_then(Occupation::primary_garment)
            .map(|g| g.garment_type.as_str());
        let juegos = count_sets(primary, &priced);

        for missing in &total.missing {
            log::warn!("row {} ({}): price missing for {missing}", row.row_number, row.full_name);
        }
        log::debug!(
            "row {} ({}): {} -> {:?}, total {}{}, juegos {}",
            row.row_number,
            row.full_name,
            row.occupation_label,
            key,
            total.amount,
            if total.is_partial() { " (partial)" } else { "" },
            juegos
        );

        Ok(PersonRecord {
            row_number: row.row_number,
            full_name: row.full_name.clone(),
            document_id: row.document_id.clone(),
            raw_occupation: row.occupation_label.clone(),
            occupation_display: occupation
                .map(|o| {
                    if o.display_name.is_empty() {
                        o.key.clone()
                    } else {
                        o.display_name.clone()
                    }
                })
                .unwrap_or_else(|| row.occupation_label.trim().to_string()),
            occupation: key,
            outcome,
            store: store.to_string(),
            locality,
            entries: priced,
            total,
            juegos,
            rules: applied,
        })
    }

    fn resolve_occupation(&self, row: &RawRow, ordered: &[(&str, u32)]) -> (Option<String>, OccupationOutcome) {
        let label = row.occupation_label.as_str();

        if let Some(matched) = self.genders.resolve(label, ordered.iter().map(|(c, _)| *c)) {
            match matched.gender {
                Some(_) => log::info!("row {}: '{label}' resolved to {}", row.row_number, matched.key),
                None => log::warn!(
                    "row {}: gender undetermined for '{label}', using {}",
                    row.row_number,
                    matched.key
                ),
            }
            return (Some(matched.key), OccupationOutcome::Gendered { gender: matched.gender });
        }

        match self.occupations.resolve(label) {
            Resolution::Known(key) => (Some(key), OccupationOutcome::Recognized),
            Resolution::Unknown => match self.snapshot.unknown_occupation {
                UnknownOccupationPolicy::Default => {
                    log::warn!(
                        "row {}: occupation '{label}' not recognized, using {}",
                        row.row_number,
                        self.default_key
                    );
                    (Some(self.default_key.clone()), OccupationOutcome::Fallback)
                }
                UnknownOccupationPolicy::Review => {
                    log::warn!("row {}: occupation '{label}' not recognized, flagged for review", row.row_number);
                    (None, OccupationOutcome::Review)
                }
            },
        }
    }
}

fn orientation_of(occupation: Option<&Occupation>, garment_type: &str) -> Orientation {
    match occupation.and_then(|o| o.garment(garment_type)) {
        Some(g) => g.orientation,
        None if garment_type.contains("PANTALON") => Orientation::Lower,
        None => Orientation::Upper,
    }
}

/// Number of sets: the primary garment's quantity when ordered, otherwise
/// the most common quantity among the rest (ties go to the larger).
pub fn count_sets(primary: Option<&str>, entries: &[PricedGarmentEntry]) -> u32 {
    if let Some(primary) = primary {
        let ordered = entries
            .iter()
            .find(|e| e.entry.garment_type == primary && e.entry.quantity > 0);
        if let Some(e) = ordered {
            return e.entry.quantity;
        }
    }

    let mut counts: HashMap<u32, usize> = HashMap::new();
    for e in entries {
        if e.entry.quantity > 0 && Some(e.entry.garment_type.as_str()) != primary {
            *counts.entry(e.entry.quantity).or_insert(0) += 1;
        }
    }
    counts
        .into_iter()
        .max_by_key(|&(quantity, count)| (count, quantity))
        .map(|(quantity, _)| quantity)
        .unwrap_or(0)
}
