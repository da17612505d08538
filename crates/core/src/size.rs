use serde::{Deserialize, Serialize};

/// Price tier a raw size value collapses into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeTier {
    /// S, M and L share one price.
    #[serde(rename = "S/M/L")]
    Sml,
    #[serde(rename = "XL")]
    Xl,
    #[serde(rename = "XXL")]
    Xxl,
}

impl SizeTier {
    pub const ALL: [SizeTier; 3] = [SizeTier::Sml, SizeTier::Xl, SizeTier::Xxl];

    /// Resolve the tier for a size written on the request row.
    ///
    /// Only the extra-large letter sizes get their own tier. Everything else,
    /// including numeric trouser sizes and blanks, prices as S/M/L.
    pub fn from_size(raw: &str) -> SizeTier {
        let compact: String = raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect();
        match compact.as_str() {
            "XL" => SizeTier::Xl,
            "XXL" | "2XL" | "XXXL" | "3XL" => SizeTier::Xxl,
            _ => SizeTier::Sml,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SizeTier::Sml => "S/M/L",
            SizeTier::Xl => "XL",
            SizeTier::Xxl => "XXL",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            SizeTier::Sml => 0,
            SizeTier::Xl => 1,
            SizeTier::Xxl => 2,
        }
    }
}

impl std::fmt::Display for SizeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_sizes() {
        assert_eq!(SizeTier::from_size("S"), SizeTier::Sml);
        assert_eq!(SizeTier::from_size("m"), SizeTier::Sml);
        assert_eq!(SizeTier::from_size(" L "), SizeTier::Sml);
        assert_eq!(SizeTier::from_size("xl"), SizeTier::Xl);
        assert_eq!(SizeTier::from_size("XXL"), SizeTier::Xxl);
        assert_eq!(SizeTier::from_size("2XL"), SizeTier::Xxl);
    }

    #[test]
    fn other_values_price_as_sml() {
        assert_eq!(SizeTier::from_size("32"), SizeTier::Sml);
        assert_eq!(SizeTier::from_size(""), SizeTier::Sml);
        assert_eq!(SizeTier::from_size("UNICA"), SizeTier::Sml);
    }
}
