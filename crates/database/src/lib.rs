//! # Fleetbook Database Crate
//!
//! The record store. Everything that persists vessels, voyages, crew, banks,
//! visits, catches and user accounts lives behind the [`FleetStore`] trait.
//!
//! ## Architectural Principles
//!
//! - **Adapter:** This crate encapsulates all database-specific logic. The rest
//!   of the application sees typed entities and `DbError`, never SQL.
//! - **Two backends, one contract:** `DbRepository` talks to PostgreSQL through
//!   a `sqlx` connection pool; `MemoryStore` keeps the same tables in process
//!   memory for tests and throwaway demos.
//! - **Atomic writes:** every create is one statement (or one locked critical
//!   section) that either stores the whole record or nothing.
//!
//! ## Public API
//!
//! - `open_store`: builds the backend selected in the settings.
//! - `connect` / `run_migrations`: PostgreSQL pool and schema management.
//! - `FleetStore`, `DbRepository`, `MemoryStore`, `DbError`.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, open_store, run_migrations};
pub use error::DbError;
pub use memory::MemoryStore;
pub use repository::DbRepository;
pub use store::FleetStore;
