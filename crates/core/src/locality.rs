use serde::{Deserialize, Serialize};

/// Pricing region bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocalityGroup {
    #[default]
    Other,
    Tarapoto,
    SanIsidro,
}

impl LocalityGroup {
    pub const ALL: [LocalityGroup; 3] = [
        LocalityGroup::Other,
        LocalityGroup::Tarapoto,
        LocalityGroup::SanIsidro,
    ];

    /// Derive the group from a store name ("TIENDA SAN ISIDRO", "Tarapoto Plaza").
    /// Anything that is not explicitly Tarapoto or San Isidro prices as OTHER.
    pub fn from_store(store: &str) -> LocalityGroup {
        let normalized = normalize(store);
        if normalized.contains("TARAPOTO") {
            LocalityGroup::Tarapoto
        } else if normalized.contains("SAN ISIDRO") {
            LocalityGroup::SanIsidro
        } else {
            LocalityGroup::Other
        }
    }

    /// Parse a catalog key such as `"SAN_ISIDRO"` or `"san isidro"`.
    pub fn parse_key(key: &str) -> Option<LocalityGroup> {
        match normalize(key).as_str() {
            "OTHER" => Some(LocalityGroup::Other),
            "TARAPOTO" => Some(LocalityGroup::Tarapoto),
            "SAN ISIDRO" => Some(LocalityGroup::SanIsidro),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            LocalityGroup::Other => "OTHER",
            LocalityGroup::Tarapoto => "TARAPOTO",
            LocalityGroup::SanIsidro => "SAN_ISIDRO",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            LocalityGroup::Other => 0,
            LocalityGroup::Tarapoto => 1,
            LocalityGroup::SanIsidro => 2,
        }
    }
}

impl std::fmt::Display for LocalityGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

fn normalize(s: &str) -> String {
    s.to_uppercase()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_names_collapse_to_groups() {
        assert_eq!(LocalityGroup::from_store("TARAPOTO"), LocalityGroup::Tarapoto);
        assert_eq!(LocalityGroup::from_store("Plaza Tarapoto"), LocalityGroup::Tarapoto);
        assert_eq!(LocalityGroup::from_store("VILLA SAN  ISIDRO"), LocalityGroup::SanIsidro);
        assert_eq!(LocalityGroup::from_store("san_isidro"), LocalityGroup::SanIsidro);
        assert_eq!(LocalityGroup::from_store("MIRAFLORES"), LocalityGroup::Other);
        assert_eq!(LocalityGroup::from_store("SAN MIGUEL"), LocalityGroup::Other);
        assert_eq!(LocalityGroup::from_store(""), LocalityGroup::Other);
    }

    #[test]
    fn parse_catalog_keys() {
        assert_eq!(LocalityGroup::parse_key("SAN_ISIDRO"), Some(LocalityGroup::SanIsidro));
        assert_eq!(LocalityGroup::parse_key("other"), Some(LocalityGroup::Other));
        assert_eq!(LocalityGroup::parse_key("LIMA"), None);
    }
}
