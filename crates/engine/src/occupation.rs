// Raw occupation label -> canonical occupation key.

use std::collections::HashMap;

use cargos_core::{fold_accents, Occupation};

use crate::error::EngineError;

/// Parenthesized markers that say "either gender" and carry no meaning for lookup.
const NEUTRAL_MARKERS: [&str; 6] = ["A", "O", "O/A", "A/O", "HOMBRE/MUJER", "MUJER/HOMBRE"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Known(String),
    Unknown,
}

/// Inverted index from every normalized key and synonym to its occupation.
#[derive(Debug, Clone, Default)]
pub struct OccupationResolver {
    index: HashMap<String, String>,
}

impl OccupationResolver {
    /// Index active occupations. A synonym claimed by two occupations is fatal.
    pub fn build(occupations: &[Occupation]) -> Result<Self, EngineError> {
        let mut index: HashMap<String, String> = HashMap::new();
        for occ in occupations.iter().filter(|o| o.active) {
            let labels = std::iter::once(occ.key.as_str()).chain(occ.synonyms.iter().map(String::as_str));
            for label in labels {
                let normalized = normalize_label(label);
                if normalized.is_empty() {
                    continue;
                }
                match index.get(&normalized) {
                    Some(owner) if owner != &occ.key => {
                        return Err(EngineError::DuplicateSynonym {
                            synonym: normalized,
                            first: owner.clone(),
                            second: occ.key.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        index.insert(normalized, occ.key.clone());
                    }
                }
            }
        }
        log::debug!("occupation index built with {} labels", index.len());
        Ok(Self { index })
    }

    pub fn resolve(&self, raw: &str) -> Resolution {
        match self.index.get(&normalize_label(raw)) {
            Some(key) => Resolution::Known(key.clone()),
            None => Resolution::Unknown,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Canonical lookup form of an occupation label.
///
/// `"Cajero(a)"`, `"CAJERO (A)"` and `"cajero"` all give `"CAJERO"`;
/// `"caja ( hombre )"` gives `"CAJA (HOMBRE)"`.
pub fn normalize_label(raw: &str) -> String {
    split_label(raw).0
}

/// Whether the label carries a gender-neutral marker such as `(A)`.
pub fn has_neutral_marker(raw: &str) -> bool {
    split_label(raw).1
}

fn split_label(raw: &str) -> (String, bool) {
    let folded = fold_accents(&raw.to_uppercase());
    let mut out = String::with_capacity(folded.len() + 4);
    let mut neutral = false;
    let mut rest = folded.as_str();

    while let Some(open) = rest.find('(') {
        out.push_str(&rest[..open]);
        out.push(' ');
        let after = &rest[open + 1..];
        match after.find(')') {
            Some(close) => {
                let group = canonical_group(&after[..close]);
                if NEUTRAL_MARKERS.contains(&group.as_str()) {
                    neutral = true;
                } else {
                    out.push('(');
                    out.push_str(&group);
                    out.push(')');
                }
                out.push(' ');
                rest = &after[close + 1..];
            }
            None => {
                // Unbalanced: keep the text, drop the stray paren.
                out.push_str(after);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    (collapse_whitespace(&out), neutral)
}

fn canonical_group(inner: &str) -> String {
    inner
        .split('/')
        .map(collapse_whitespace)
        .collect::<Vec<_>>()
        .join("/")
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
