//! Core domain types, errors, and notifications for `cairn`.
//!
//! ## Key Components
//!
//! - **`errors`**: the primary `Error` enum and `Result` alias shared by every
//!   crate in the workspace.
//! - **`types`**: node, edge, activity and ingestion shapes, plus validated id
//!   newtypes.
//! - **`events`**: the node change listener registry driven by graph
//!   operations.
//! - **`constants`**: environment variable names and file names.

pub mod constants;
pub mod errors;
pub mod events;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result},
    events::{NodeEvent, NodeEventListener, NodeEventListeners},
    types::*,
};
