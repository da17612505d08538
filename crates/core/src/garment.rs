use serde::{Deserialize, Serialize};

use crate::locality::LocalityGroup;
use crate::money::Money;
use crate::size::SizeTier;

/// Which size column on the request row a garment reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Orientation {
    /// Shirts, polos, jackets, aprons, caps.
    #[default]
    Upper,
    /// Trousers.
    Lower,
}

impl Orientation {
    /// Select the size value for a garment of this orientation.
    /// LOWER garments fall back to the upper size when the row has no lower size.
    pub fn select_size<'a>(self, upper: Option<&'a str>, lower: Option<&'a str>) -> Option<&'a str> {
        let present = |s: Option<&'a str>| s.map(str::trim).filter(|s| !s.is_empty());
        match self {
            Orientation::Upper => present(upper),
            Orientation::Lower => present(lower).or_else(|| present(upper)),
        }
    }
}

/// 3×3 price grid: size tier × locality group. Empty cells are prices the
/// catalog never defined, which is not the same thing as a price of zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceMatrix {
    cells: [[Option<Money>; 3]; 3],
}

impl PriceMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// A matrix with the same price in every cell.
    pub fn uniform(price: Money) -> Self {
        Self {
            cells: [[Some(price); 3]; 3],
        }
    }

    pub fn with(mut self, tier: SizeTier, group: LocalityGroup, price: Money) -> Self {
        self.set(tier, group, Some(price));
        self
    }

    pub fn set(&mut self, tier: SizeTier, group: LocalityGroup, price: Option<Money>) {
        self.cells[tier.index()][group.index()] = price;
    }

    pub fn get(&self, tier: SizeTier, group: LocalityGroup) -> Option<Money> {
        self.cells[tier.index()][group.index()]
    }

    /// Every cell in tier-major order.
    pub fn iter(&self) -> impl Iterator<Item = (SizeTier, LocalityGroup, Option<Money>)> + '_ {
        SizeTier::ALL.into_iter().flat_map(move |tier| {
            LocalityGroup::ALL
                .into_iter()
                .map(move |group| (tier, group, self.get(tier, group)))
        })
    }
}

/// A garment an occupation can order, with its prices.
#[derive(Debug, Clone, PartialEq)]
pub struct GarmentDefinition {
    /// Canonical token, e.g. `POLO`.
    pub garment_type: String,
    pub display_name: String,
    pub has_sizes: bool,
    pub orientation: Orientation,
    pub prices: PriceMatrix,
    pub required: bool,
    pub default_quantity: u32,
    /// The garment that counts the sets a person receives.
    pub primary: bool,
}

impl GarmentDefinition {
    pub fn new(garment_type: impl Into<String>, prices: PriceMatrix) -> Self {
        Self {
            garment_type: garment_type.into(),
            display_name: String::new(),
            has_sizes: true,
            orientation: Orientation::Upper,
            prices,
            required: false,
            default_quantity: 0,
            primary: false,
        }
    }

    /// Display name, or the title-cased type when the catalog left it blank.
    pub fn label(&self) -> String {
        if self.display_name.trim().is_empty() {
            crate::title_case(&self.garment_type)
        } else {
            self.display_name.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lower_falls_back_to_upper_size() {
        assert_eq!(Orientation::Lower.select_size(Some("M"), Some("32")), Some("32"));
        assert_eq!(Orientation::Lower.select_size(Some("M"), None), Some("M"));
        assert_eq!(Orientation::Lower.select_size(Some("M"), Some("  ")), Some("M"));
        assert_eq!(Orientation::Upper.select_size(Some("L"), Some("32")), Some("L"));
        assert_eq!(Orientation::Upper.select_size(None, Some("32")), None);
    }

    #[test]
    fn matrix_cells_are_independent() {
        let m = PriceMatrix::new()
            .with(SizeTier::Sml, LocalityGroup::Other, Money::from_cents(2500))
            .with(SizeTier::Xxl, LocalityGroup::SanIsidro, Money::from_cents(3000));
        assert_eq!(m.get(SizeTier::Sml, LocalityGroup::Other), Some(Money::from_cents(2500)));
        assert_eq!(m.get(SizeTier::Xxl, LocalityGroup::SanIsidro), Some(Money::from_cents(3000)));
        assert_eq!(m.get(SizeTier::Xl, LocalityGroup::Other), None);
        assert_eq!(m.iter().filter(|(_, _, p)| p.is_some()).count(), 2);
    }

    #[test]
    fn label_falls_back_to_type() {
        let mut g = GarmentDefinition::new("POLO_MANGA_CORTA", PriceMatrix::new());
        assert_eq!(g.label(), "Polo Manga Corta");
        g.display_name = "Polo manga corta".into();
        assert_eq!(g.label(), "Polo manga corta");
    }
}
