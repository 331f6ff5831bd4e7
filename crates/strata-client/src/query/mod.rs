//! Query assembly and serialization.
//!
//! - `params` - the per-call parameter bag and its fixed merge order
//! - `encode` - the bracket-nested query-string encoder

pub mod encode;
mod params;

pub use encode::{encode, to_query_value};
pub use params::{CachePolicy, PaginationParams, RequestParameters};
