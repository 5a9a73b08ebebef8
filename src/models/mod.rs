pub mod ai;
pub mod api_document;
pub mod catalog;
pub mod company;

pub use ai::*;
pub use api_document::*;
pub use catalog::*;
pub use company::*;
