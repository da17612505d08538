// File I/O: request workbooks in, Word documents out

pub mod docx;
pub mod error;
pub mod workbook;

pub use docx::compose::combine;
pub use docx::render::{DocumentRenderer, PlaceholderRenderer, RenderContext};
pub use error::{DocumentMergeError, RenderError, WorkbookError};
pub use workbook::{read_workbook, RequestWorkbook, SheetMetadata, StoreSheet};
