// src/api/mod.rs

//! Domain clients, one per backend surface. Each method follows the same
//! shape: validate inputs locally, resolve the base URL (failing as a
//! network error plus `server_unavailable` when unconfigured), issue the
//! request, map known statuses to typed errors, and map the wire payload
//! into its domain type.

pub mod auth;
pub mod catalog;
pub mod courses;
pub mod lessons;
pub mod profile;

pub use auth::AuthApi;
pub use catalog::{CatalogApi, SearchParams};
pub use courses::CoursesApi;
pub use lessons::LessonsApi;
pub use profile::ProfileApi;
