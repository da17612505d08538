use std::fmt;

use cargos_core::column_letter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A uniform column position has no entry in the column table.
    UnmappedColumn { position: usize },
    /// Two column positions map to the same composite identifier.
    DuplicateComposite { id: String, first: usize, second: usize },
    /// The same normalized synonym is claimed by two occupations.
    DuplicateSynonym { synonym: String, first: String, second: String },
    /// `default_occupation` does not resolve to an active occupation.
    UnknownDefaultOccupation(String),
    /// A gender variant points at an occupation that does not resolve.
    UnknownVariantOccupation { base: String, target: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnmappedColumn { position } => {
                write!(
                    f,
                    "column {} (position {position}) has no entry in the column table",
                    column_letter(*position)
                )
            }
            Self::DuplicateComposite { id, first, second } => {
                write!(f, "composite '{id}' is mapped by both position {first} and {second}")
            }
            Self::DuplicateSynonym { synonym, first, second } => {
                write!(f, "synonym '{synonym}' is claimed by both '{first}' and '{second}'")
            }
            Self::UnknownDefaultOccupation(name) => {
                write!(f, "default occupation '{name}' is not an active occupation")
            }
            Self::UnknownVariantOccupation { base, target } => {
                write!(f, "gender variant '{base}': occupation '{target}' does not resolve")
            }
        }
    }
}

impl std::error::Error for EngineError {}
