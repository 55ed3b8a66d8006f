//! # Tend Core Library
//!
//! Core logic for the Tend focus tracker: a local, single-user focus
//! session engine with on-device persistence. The `tend` CLI is a thin
//! presentation layer over this crate.
//!
//! ## Architecture
//!
//! - **Focus Engine**: a state machine (Idle -> Active -> Ending -> Idle)
//!   that counts focus and break seconds. The caller ticks it once per
//!   second, usually through [`SessionRunner`]
//! - **Storage**: a key-value persistence port with SQLite and in-memory
//!   adapters, and TOML-based configuration
//! - **Archive**: pure aggregation over completed sessions
//!
//! ## Key Components
//!
//! - [`FocusEngine`]: Session state machine, categories and todos
//! - [`SessionRunner`]: Owning task that ticks an active session
//! - [`Database`]: SQLite-backed [`KeyValueStore`]
//! - [`Config`]: Application configuration management

pub mod archive;
pub mod categories;
pub mod error;
pub mod events;
pub mod focus;
pub mod storage;
pub mod todo;

pub use archive::ArchiveSummary;
pub use categories::CategoryList;
pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::Event;
pub use focus::{FocusEngine, FocusMode, FocusSession, SessionPhase, SessionRunner, SessionSummary};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
pub use todo::{Todo, TodoStore};
