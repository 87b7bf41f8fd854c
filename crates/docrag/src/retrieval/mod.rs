//! Query-time retrieval

mod expansion;
mod search;

pub use expansion::QueryExpander;
pub use search::Retriever;
