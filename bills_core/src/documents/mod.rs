pub mod filename;
pub mod models;
pub mod repository;
pub mod store;

pub use filename::sanitize_file_name;
pub use models::{Document, DocumentDownload, DocumentPatch, DocumentUpload, DocumentView};
pub use repository::{DocumentRepository, DocumentRepositoryTrait};
pub use store::DocumentStore;
