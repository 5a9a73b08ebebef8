pub mod api_document;

pub use api_document::Entity as ApiDocumentEntity;
