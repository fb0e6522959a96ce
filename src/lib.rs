//! basequery - embedded base-query engine for published document sites
//!
//! Documents may embed a declarative query block describing a filter over a
//! site's content entries plus one or more named views (table, cards, list).
//! This crate parses those blocks, compiles as much of each filter as
//! possible into a predicate the backing content store can execute, and
//! interprets the remainder against in-memory entries.

pub mod compiler;
pub mod expr;
pub mod query;
pub mod runtime;
pub mod store;
pub mod view;
