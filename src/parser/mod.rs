pub mod query;

pub use query::{SearchQuery, parse_search_query};
