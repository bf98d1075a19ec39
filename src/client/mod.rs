pub mod http;
pub mod traits;

pub use http::SupermemoryClient;
pub use traits::{
    AddParams, MemoryClient, MetadataValue, SearchParams, SearchResponse, TemporalFilters,
};
