//! Administrative HTTP surface
//!
//! The admin server exposes list views (filters, search, pagination,
//! ordering), CRUD, bulk actions, and CSV/JSON import & export over the
//! content store. There is no public-facing write path; this API is the only
//! mutation surface besides the CLI.

pub mod actions;
pub mod api;
pub mod export;
pub mod import;
pub mod server;

pub use server::{AdminServer, AppState, ServerError};
