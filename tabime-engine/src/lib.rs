pub mod error;
pub mod registry;
pub mod table;

pub use error::TableError;
pub use registry::{TableLocations, TableRegistry};
pub use table::{Candidate as TableCandidate, MatchMode, PhraseTable, TableDb, TableEntry};
