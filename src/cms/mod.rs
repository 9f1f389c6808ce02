pub mod client;
pub mod query;
pub mod relation;

pub use client::CmsClient;
pub use query::QueryOptions;
pub use relation::{parse_repeatable, relation_keys, sort_rows, Key, Relation};
