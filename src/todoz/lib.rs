//! # Todoz Architecture
//!
//! Todoz gives checkbox todos in markdown files a stable identity. A todo line
//! such as `- [ ] buy milk` is tagged on save as `-%13% [ ] buy milk`, and record
//! 13 is mirrored into a persistent store so todos can be listed, searched and
//! deleted across documents. Checking a todo off (`[d]`) removes both the line
//! and the record on the next save.
//!
//! Todoz is a **UI-agnostic library** with a thin CLI host. The editor (or the
//! CLI standing in for it) only ever hands over lines and takes lines back.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs, print.rs, diagnostic.rs)      │
//! │  - Parses arguments, reads and writes documents             │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Context object: store handle + configuration             │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - handle (document pass), create, delete, load, search     │
//! │  - Built on line (classifier), resolver and view            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DataStore trait with transactions                        │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## A Write Pass
//!
//! 1. Every line is classified ([`line::classify`]) into a [`line::LineKind`].
//! 2. The resolver ([`resolver::decide`]) maps kind and mode to a decision.
//! 3. All decisions are carried out in one store transaction: new todos get an
//!    id and a record, edited ones update their record, done ones are deleted.
//! 4. The replacement lines go back to the host. If the store failed, the host
//!    gets an error instead and its document stays as it was.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never writes to stdout/stderr and never exits the
//! process. Diagnostics are emitted through `tracing`; installing a subscriber is
//! the host's business.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each command
//! - [`line`]: Line classifier and todo surface syntax
//! - [`resolver`]: Status/deletion decisions per line
//! - [`view`]: Aggregation document over all records
//! - [`store`]: Storage abstraction and implementations
//! - [`ids`]: Identifier allocator
//! - [`model`]: Core data types (`TodoId`, `TodoRecord`, `Mode`)
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod ids;
pub mod line;
pub mod model;
pub mod resolver;
pub mod store;
pub mod view;
