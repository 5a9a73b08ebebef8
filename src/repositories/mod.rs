pub mod api_document;

pub use api_document::{
    generate_id, ApiDocumentRepository, DocumentListQuery, DocumentSortColumn, ListDirection,
    Pagination, StoredFileRef,
};
