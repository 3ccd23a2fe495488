//! Node link parsing
//!
//! Decodes single `vmess://`, `ss://` and `trojan://` links into
//! [`ParsedNode`](crate::models::ParsedNode) values. Every other scheme is
//! reported as unparsed.

pub mod explodes;

pub use explodes::{explode, ParseError};
