//! Document domain: category/tag resolution, the listing query engine and the
//! create/delete/attach commands. Every entry point takes the owning user id
//! explicitly; nothing here reads ambient session state.

pub mod expiry;
pub mod query;
pub mod resolver;
pub mod service;

pub use expiry::{ExpiryStatus, ExpiryWindow};
pub use query::DocumentQuery;
pub use resolver::TaxonomyResolver;
pub use service::DocumentService;
