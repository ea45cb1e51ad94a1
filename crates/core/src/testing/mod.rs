//! Testing utilities and mock implementations.
//!
//! Provides a mock catalog backend so lookup and library behavior can be
//! tested without network access.

mod mock_catalog;

pub use mock_catalog::{MockCatalogBackend, RecordedQuery};
