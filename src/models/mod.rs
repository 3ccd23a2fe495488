//! Core data models for the application
//!
//! This module contains the primary data structures used throughout the application,
//! separated from the logic that operates on them.
//!
//! # Usage
//!
//! ```rust
//! use sublinks::models::{ParsedNode, ProxyType};
//! use sublinks::parser::explode;
//!
//! let node = explode("trojan://secret@example.com:8443#Tokyo").unwrap();
//! assert_eq!(node.proxy_type(), ProxyType::Trojan);
//! assert_eq!(node.remark(), Some("Tokyo"));
//! assert!(matches!(node, ParsedNode::Trojan(_)));
//! ```

mod app_state;
mod client_type;
mod proxy;

pub use app_state::{AppState, InitError};
pub use client_type::ClientType;
pub use proxy::*;
