/// One person's line from a request sheet, before any resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    /// 1-based spreadsheet row, for reports.
    pub row_number: usize,
    pub full_name: String,
    pub document_id: String,
    /// Occupation exactly as typed ("Cajero (a)", "MOZO").
    pub occupation_label: String,
    pub upper_size: Option<String>,
    pub lower_size: Option<String>,
    /// Quantities found in the uniform column range, in column order.
    pub uniform: Vec<UniformCell>,
}

/// A quantity read from a fixed uniform column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformCell {
    /// 0-based column index (J = 9).
    pub position: usize,
    pub quantity: u32,
}
