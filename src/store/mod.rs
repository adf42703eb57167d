/// Record store
///
/// Plain CRUD access to the relational store. Each submodule owns one table;
/// relations are explicit foreign-key ids and "related records" is always an
/// explicit query, never object-graph navigation. Connections are checked
/// out of the pool per query and released on drop.

pub mod books;
pub mod reviews;
pub mod users;
