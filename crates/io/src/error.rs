use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum WorkbookError {
    /// The file could not be opened as a spreadsheet.
    Open { path: PathBuf, message: String },
    /// The workbook has no worksheets.
    NoSheets(PathBuf),
    /// A worksheet could not be read.
    Sheet { sheet: String, message: String },
}

impl fmt::Display for WorkbookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open { path, message } => {
                write!(f, "cannot open workbook {}: {message}", path.display())
            }
            Self::NoSheets(path) => write!(f, "workbook {} contains no sheets", path.display()),
            Self::Sheet { sheet, message } => write!(f, "cannot read sheet '{sheet}': {message}"),
        }
    }
}

impl std::error::Error for WorkbookError {}

#[derive(Debug)]
pub enum RenderError {
    /// Template missing, unreadable or not a Word package.
    Template { path: PathBuf, message: String },
    /// Rendered package could not be written.
    Write { path: PathBuf, message: String },
    /// The placeholder pattern did not compile.
    Pattern(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Template { path, message } => {
                write!(f, "template {}: {message}", path.display())
            }
            Self::Write { path, message } => write!(f, "cannot write {}: {message}", path.display()),
            Self::Pattern(message) => write!(f, "invalid placeholder pattern: {message}"),
        }
    }
}

impl std::error::Error for RenderError {}

#[derive(Debug)]
pub enum DocumentMergeError {
    /// Nothing to combine.
    EmptyInput,
    /// A source could not be opened as a Word package.
    Open { path: PathBuf, message: String },
    /// A source has no `word/document.xml`.
    MissingPart { path: PathBuf, part: String },
    /// A source's main part has no `w:body`.
    MissingBody { path: PathBuf },
    /// A source's main part is not well-formed XML.
    Xml { path: PathBuf, message: String },
    /// The combined package could not be written.
    Write { path: PathBuf, message: String },
}

impl fmt::Display for DocumentMergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "no documents to combine"),
            Self::Open { path, message } => write!(f, "cannot open {}: {message}", path.display()),
            Self::MissingPart { path, part } => write!(f, "{} has no {part}", path.display()),
            Self::MissingBody { path } => write!(f, "{} has no document body", path.display()),
            Self::Xml { path, message } => write!(f, "{}: malformed XML: {message}", path.display()),
            Self::Write { path, message } => write!(f, "cannot write {}: {message}", path.display()),
        }
    }
}

impl std::error::Error for DocumentMergeError {}
