pub mod category;
pub mod document;
pub mod document_tag;
pub mod tag;
pub mod user;
