use std::fmt;

use cargos_core::{LocalityGroup, Money, Occupation, SizeTier};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingReason {
    /// The occupation has no garment of this type.
    GarmentNotConfigured,
    /// The garment exists but the catalog left this size/locality cell empty.
    MatrixCellEmpty,
    /// The row's occupation was left for review, so nothing was priced.
    OccupationUnresolved,
    /// The line or running total exceeds the representable amount.
    AmountOverflow,
}

impl fmt::Display for MissingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GarmentNotConfigured => write!(f, "garment not configured for occupation"),
            Self::MatrixCellEmpty => write!(f, "no price for this size and locality"),
            Self::OccupationUnresolved => write!(f, "occupation not resolved"),
            Self::AmountOverflow => write!(f, "amount too large to total"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum PriceLookup {
    Found(Money),
    NotFound(MissingReason),
}

impl PriceLookup {
    pub fn price(self) -> Option<Money> {
        match self {
            Self::Found(price) => Some(price),
            Self::NotFound(_) => None,
        }
    }
}

/// Unit price for one garment of an occupation.
pub fn price_for(
    occupation: &Occupation,
    garment_type: &str,
    tier: SizeTier,
    group: LocalityGroup,
) -> PriceLookup {
    match occupation.garment(garment_type) {
        None => PriceLookup::NotFound(MissingReason::GarmentNotConfigured),
        Some(garment) => match garment.prices.get(tier, group) {
            Some(price) => PriceLookup::Found(price),
            None => PriceLookup::NotFound(MissingReason::MatrixCellEmpty),
        },
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// A garment quantity taken from a uniform column, ready to price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedGarmentEntry {
    pub composite: String,
    pub garment_type: String,
    pub quantity: u32,
    /// Size written on the row for this garment's orientation.
    pub size: Option<String>,
    pub tier: SizeTier,
    pub locality: LocalityGroup,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedGarmentEntry {
    #[serde(flatten)]
    pub entry: NormalizedGarmentEntry,
    /// Display label from the catalog, or the title-cased garment type.
    pub label: String,
    pub has_sizes: bool,
    pub price: PriceLookup,
    /// `unit × quantity`; absent when the price is.
    pub line_total: Option<Money>,
}

impl PricedGarmentEntry {
    pub fn new(entry: NormalizedGarmentEntry, label: String, has_sizes: bool, price: PriceLookup) -> Self {
        let (price, line_total) = match price {
            PriceLookup::Found(unit) => match unit.times(entry.quantity) {
                Some(line) => (price, Some(line)),
                None => (PriceLookup::NotFound(MissingReason::AmountOverflow), None),
            },
            PriceLookup::NotFound(_) => (price, None),
        };
        Self {
            entry,
            label,
            has_sizes,
            price,
            line_total,
        }
    }
}

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingPrice {
    pub garment_type: String,
    pub tier: SizeTier,
    pub locality: LocalityGroup,
    pub reason: MissingReason,
}

impl fmt::Display for MissingPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{} / {}]: {}", self.garment_type, self.tier, self.locality, self.reason)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PersonTotal {
    /// Sum over the entries that have a price.
    pub amount: Money,
    pub missing: Vec<MissingPrice>,
}

impl PersonTotal {
    /// True when at least one ordered garment had no price.
    pub fn is_partial(&self) -> bool {
        !self.missing.is_empty()
    }
}

/// Sum line totals and list every entry that could not be priced.
pub fn calculate_total(entries: &[PricedGarmentEntry]) -> PersonTotal {
    let mut total = PersonTotal::default();
    for priced in entries.iter().filter(|p| p.entry.quantity > 0) {
        let reason = match (priced.price, priced.line_total) {
            (PriceLookup::Found(_), Some(line)) => match total.amount.checked_add(line) {
                Some(sum) => {
                    total.amount = sum;
                    continue;
                }
                None => MissingReason::AmountOverflow,
            },
            (PriceLookup::Found(_), None) => MissingReason::AmountOverflow,
            (PriceLookup::NotFound(reason), _) => reason,
        };
        total.missing.push(MissingPrice {
            garment_type: priced.entry.garment_type.clone(),
            tier: priced.entry.tier,
            locality: priced.entry.locality,
            reason,
        });
    }
    total
}
