//! Placeholder values for the AUTORIZACION and CARGO documents.

use chrono::{Datelike, NaiveDate};

use cargos_engine::price::PricedGarmentEntry;
use cargos_engine::PersonRecord;
use cargos_io::RenderContext;

const MONTHS: [&str; 12] = [
    "enero",
    "febrero",
    "marzo",
    "abril",
    "mayo",
    "junio",
    "julio",
    "agosto",
    "septiembre",
    "octubre",
    "noviembre",
    "diciembre",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateKind {
    Autorizacion,
    Cargo,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 2] = [TemplateKind::Autorizacion, TemplateKind::Cargo];

    /// Prefix of the output file names.
    pub fn name(self) -> &'static str {
        match self {
            Self::Autorizacion => "AUTORIZACION",
            Self::Cargo => "CARGO",
        }
    }
}

pub fn month_name(date: NaiveDate) -> &'static str {
    MONTHS[date.month0() as usize]
}

/// One line per garment: `Polo TALLA M x2`, size left out for one-size garments.
pub fn garment_line(entry: &PricedGarmentEntry) -> String {
    let mut line = entry.label.clone();
    if entry.has_sizes {
        if let Some(size) = entry.entry.size.as_deref() {
            line.push_str(" TALLA ");
            line.push_str(size);
        }
    }
    line.push_str(&format!(" x{}", entry.entry.quantity));
    line
}

pub fn build(kind: TemplateKind, record: &PersonRecord, date: NaiveDate) -> RenderContext {
    let dia = format!("{:02}", date.day());
    let mes = format!("{:02}", date.month());
    let mes_string = month_name(date);
    let anho = date.year().to_string();

    let fecha = match kind {
        TemplateKind::Autorizacion => format!("{dia} / {mes} / {anho}"),
        TemplateKind::Cargo => format!("{dia} de {mes_string} de {anho}"),
    };

    let prendas: Vec<String> = record.entries.iter().map(garment_line).collect();

    let mut ctx = RenderContext::new();
    ctx.insert("dia", dia);
    ctx.insert("mes", mes);
    ctx.insert("mes_string", mes_string);
    ctx.insert("anho", anho);
    ctx.insert("fecha", fecha);
    ctx.insert("local", record.store.as_str());
    ctx.insert("cargo", record.raw_occupation.as_str());
    ctx.insert("nombre", record.full_name.as_str());
    ctx.insert("identificacion", record.document_id.as_str());
    ctx.insert("monto", record.total.amount.soles());
    ctx.insert("juegos", record.juegos.to_string());
    ctx.insert("prendas", prendas.join("\n"));
    ctx
}

#[cfg(test)]
mod tests {
    use super::*;
    use cargos_core::{LocalityGroup, Money, SizeTier};
    use cargos_engine::price::{NormalizedGarmentEntry, PersonTotal, PriceLookup};
    use cargos_engine::OccupationOutcome;

    fn entry(label: &str, has_sizes: bool, size: Option<&str>, quantity: u32, cents: i64) -> PricedGarmentEntry {
        PricedGarmentEntry::new(
            NormalizedGarmentEntry {
                composite: label.to_uppercase(),
                garment_type: label.to_uppercase(),
                quantity,
                size: size.map(str::to_string),
                tier: SizeTier::Sml,
                locality: LocalityGroup::Tarapoto,
            },
            label.to_string(),
            has_sizes,
            PriceLookup::Found(Money::from_cents(cents)),
        )
    }

    fn record() -> PersonRecord {
        let entries = vec![entry("Polo", true, Some("M"), 2, 2500), entry("Gorra", false, Some("M"), 1, 800)];
        PersonRecord {
            row_number: 9,
            full_name: "PEREZ JUAN".into(),
            document_id: "40404040".into(),
            raw_occupation: "Mozo".into(),
            occupation: Some("MOZO".into()),
            occupation_display: "Mozo".into(),
            outcome: OccupationOutcome::Recognized,
            store: "TARAPOTO".into(),
            locality: LocalityGroup::Tarapoto,
            total: PersonTotal {
                amount: Money::from_cents(5800),
                missing: Vec::new(),
            },
            entries,
            juegos: 2,
            rules: Vec::new(),
        }
    }

    #[test]
    fn autorizacion_uses_numeric_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        let ctx = build(TemplateKind::Autorizacion, &record(), date);
        assert_eq!(ctx.get("fecha"), Some("07 / 03 / 2025"));
        assert_eq!(ctx.get("mes"), Some("03"));
        assert_eq!(ctx.get("monto"), Some("S/ 58.00"));
        assert_eq!(ctx.get("juegos"), Some("2"));
        assert_eq!(ctx.get("local"), Some("TARAPOTO"));
        assert_eq!(ctx.get("identificacion"), Some("40404040"));
    }

    #[test]
    fn cargo_spells_the_month() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 24).unwrap();
        let ctx = build(TemplateKind::Cargo, &record(), date);
        assert_eq!(ctx.get("fecha"), Some("24 de diciembre de 2025"));
        assert_eq!(ctx.get("mes_string"), Some("diciembre"));
        assert_eq!(ctx.get("prendas"), Some("Polo TALLA M x2\nGorra x1"));
    }

    #[test]
    fn sized_garment_without_size_has_no_talla() {
        assert_eq!(garment_line(&entry("Pantalon", true, None, 1, 0)), "Pantalon x1");
    }
}
