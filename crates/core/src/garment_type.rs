// Composite column identifier -> canonical garment type.

use crate::fold_accents;

/// Trailing segments that qualify a garment rather than name it.
fn is_modifier(segment: &str) -> bool {
    matches!(segment, "H" | "M" | "MANGA" | "CORTA" | "LARGA")
        || segment.chars().all(|c| c.is_ascii_digit())
}

/// Spelling variants seen in older request sheets.
fn legacy_spelling(token: &str) -> Option<&'static str> {
    Some(match token {
        "CAMISAS" => "CAMISA",
        "BLUSAS" => "BLUSA",
        "POLOS" => "POLO",
        "PANTALONES" => "PANTALON",
        "MANDILONES" => "MANDILON",
        "CASACAS" => "CASACA",
        "GORRAS" => "GORRA",
        "PECHERAS" => "PECHERA",
        "CHAQUETAS" => "CHAQUETA",
        "CORBATAS" => "CORBATA",
        "SACOS" => "SACO",
        "ANDARINES" => "ANDARIN",
        _ => return None,
    })
}

/// Canonical garment type for a column identifier.
///
/// `DELIVERY_POLO` -> `POLO`, `CAJA_SACO_H` -> `SACO`, `Pantalón` -> `PANTALON`.
/// Applying it twice gives the same result as applying it once.
pub fn normalize(identifier: &str) -> String {
    let upper = fold_accents(&identifier.trim().to_uppercase());
    let segments: Vec<&str> = upper
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();

    let token = match segments.as_slice() {
        [] => return String::new(),
        [single] => *single,
        [.., last] => segments
            .iter()
            .rev()
            .find(|s| !is_modifier(s))
            .copied()
            .unwrap_or(*last),
    };

    legacy_spelling(token).unwrap_or(token).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn composite_takes_trailing_garment() {
        assert_eq!(normalize("DELIVERY_POLO"), "POLO");
        assert_eq!(normalize("LIMA_ICA_SALON_CAMISA"), "CAMISA");
        assert_eq!(normalize("PRODUCCION_PANTALON"), "PANTALON");
    }

    #[test]
    fn variant_modifiers_are_skipped() {
        assert_eq!(normalize("CAJA_SACO_H"), "SACO");
        assert_eq!(normalize("CAJA_SACO_M"), "SACO");
        assert_eq!(normalize("BAR_POLO_MANGA_CORTA"), "POLO");
        assert_eq!(normalize("SALON_CAMISA_2"), "CAMISA");
        assert_eq!(normalize("SACO H"), "SACO");
    }

    #[test]
    fn legacy_tokens() {
        assert_eq!(normalize("Pantalón"), "PANTALON");
        assert_eq!(normalize("camisas"), "CAMISA");
        assert_eq!(normalize("gorro"), "GORRO");
        assert_eq!(normalize("polo"), "POLO");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn all_modifiers_keep_last_segment() {
        assert_eq!(normalize("MANGA_CORTA"), "CORTA");
        assert_eq!(normalize("H"), "H");
    }

    proptest! {
        #[test]
        fn idempotent(s in "[A-Za-z_ ÁÉÍÓÚÑáéíóúñ0-9]{0,24}") {
            let once = normalize(&s);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn composite_yields_second_segment(x in "[A-Z]{1,8}", y in "[A-Z]{3,10}") {
            prop_assume!(normalize(&y) == y && !is_modifier(&y));
            prop_assert_eq!(normalize(&format!("{x}_{y}")), y);
        }
    }
}
