//! `cargos-core`: domain types shared by every crate in the workspace.
//!
//! Plain data: no IO, no logging. Catalog parsing lives in `cargos-config`,
//! pipeline logic in `cargos-engine`.

pub mod garment;
pub mod garment_type;
pub mod locality;
pub mod money;
pub mod occupation;
pub mod row;
pub mod size;

pub use garment::{GarmentDefinition, Orientation, PriceMatrix};
pub use garment_type::normalize as normalize_garment;
pub use locality::LocalityGroup;
pub use money::Money;
pub use occupation::Occupation;
pub use row::{RawRow, UniformCell};
pub use size::SizeTier;

/// Replace Spanish accented letters with their plain forms (`Ó` -> `O`, `ñ` -> `n`).
pub fn fold_accents(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'Á' | 'À' | 'Ä' | 'Â' => 'A',
            'É' | 'È' | 'Ë' | 'Ê' => 'E',
            'Í' | 'Ì' | 'Ï' | 'Î' => 'I',
            'Ó' | 'Ò' | 'Ö' | 'Ô' => 'O',
            'Ú' | 'Ù' | 'Ü' | 'Û' => 'U',
            'Ñ' => 'N',
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// 0-based column index to spreadsheet letters (9 -> "J", 33 -> "AH").
pub fn column_letter(position: usize) -> String {
    let mut n = position + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8_lossy(&letters).into_owned()
}

/// "POLO_MANGA_CORTA" -> "Polo Manga Corta"
pub fn title_case(token: &str) -> String {
    token
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let rest: String = chars.flat_map(char::to_lowercase).collect();
                    format!("{}{}", first.to_uppercase(), rest)
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_splits_underscores() {
        assert_eq!(title_case("POLO_MANGA_CORTA"), "Polo Manga Corta");
        assert_eq!(title_case("pantalon"), "Pantalon");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(9), "J");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(33), "AH");
    }

    #[test]
    fn fold_accents_keeps_case() {
        assert_eq!(fold_accents("PANTALÓN"), "PANTALON");
        assert_eq!(fold_accents("Acompañante"), "Acompanante");
        assert_eq!(fold_accents("MOZO"), "MOZO");
    }
}
