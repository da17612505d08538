//! `cargos-engine`: uniform-order pricing pipeline.
//!
//! Pure engine crate: receives raw rows and an immutable catalog snapshot,
//! returns priced person records. No CLI, workbook or document dependencies.

pub mod columns;
pub mod error;
pub mod gender;
pub mod occupation;
pub mod price;
pub mod record;
pub mod report;
pub mod rules;

pub use columns::ColumnMapper;
pub use error::EngineError;
pub use cargos_core::normalize_garment;
pub use occupation::{OccupationResolver, Resolution};
pub use price::{calculate_total, price_for, MissingReason, PersonTotal, PriceLookup};
pub use record::{OccupationOutcome, PersonRecord, Pipeline};
pub use report::{BatchReport, BatchSummary};
