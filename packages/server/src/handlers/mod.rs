pub mod auth;
pub mod dashboard;
pub mod document;
pub mod taxonomy;
pub mod upload;
