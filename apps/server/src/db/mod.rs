//! Database layer - repositories and data access

pub mod mappings;
pub mod terminology;
pub mod traits;

pub use mappings::MappingRepository;
pub use terminology::TerminologyRepository;
pub use traits::{MappingStore, TerminologyStore};
