pub mod ai;
pub mod auth;
pub mod catalog;
pub mod common;
pub mod documents;

pub use ai::{detect_anomalies, discover_apis};
pub use auth::{login, LoginRequest};
pub use catalog::{
    list_catalog, list_companies, CatalogFacets, CatalogParams, CatalogResponse,
    CompanyListResponse,
};
pub use common::{split_list, DocumentListParams};
pub use documents::{
    get_document_file, list_documents, upload_document, DocumentListResponse, FileParams,
    UploadDocumentForm,
};
