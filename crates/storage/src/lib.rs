//! Local graph storage for cairn
//!
//! Nodes, edges, activity and ingestion progress are kept as typed records
//! over a primitive [`KvSubstrate`](substrate::KvSubstrate):
//!
//! - [`codec`] maps each record kind to its key format and value shape
//! - [`store::RecordStore`] is the only caller of the substrate and enforces
//!   the record contract
//! - [`graph::GraphOps`] implements the node and edge operations, keeping
//!   every derived index consistent with one write per operation
//! - [`backend::LocalBackend`] exposes all of it through [`StorageApi`]

pub mod backend;
pub mod codec;
pub mod graph;
pub mod iter;
pub mod store;
pub mod substrate;

pub use backend::{BlobFile, BlobIndexInput, LocalBackend, NodeIterate, StorageApi};
pub use graph::GraphOps;
pub use iter::NodeIterator;
pub use store::{RecordStore, RemovalCriteria};
pub use substrate::{FileSubstrate, KvSubstrate, MemorySubstrate, SubstrateStatsSnapshot};
