pub mod ai;
pub mod backend;
pub mod catalog;
pub mod documents;

pub use ai::{AiService, GenerativeModel, ModelConfig, OpenAiCompatibleModel};
pub use backend::{Backend, HttpBackend, RecordQuery};
pub use catalog::CatalogService;
pub use documents::{DocumentFile, DocumentService};
