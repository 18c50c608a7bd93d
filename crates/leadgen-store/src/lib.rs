pub mod error;
pub mod export;
pub mod store;

pub use error::{ExportError, StoreError};
pub use export::{render_workbook, EXPORT_FILE_NAME};
pub use store::LeadStore;
