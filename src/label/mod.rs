//! Label decoding.
//!
//! # Data Flow
//! ```text
//! item labels (traefik.<plane>.<kind>.<name>.<field...> = value)
//!     → decoder.rs (walk keys, fill typed fields)
//!     → Configuration fragment (http + tcp sections)
//! ```
//!
//! # Design Decisions
//! - Labels outside `traefik.http.` / `traefik.tcp.` are ignored
//! - Field segments are case-insensitive; element names keep their case
//! - Unknown fields are errors so typos surface instead of vanishing

pub mod decoder;

use std::collections::BTreeMap;

use thiserror::Error;

use crate::dynamic::Configuration;

pub use decoder::DottedLabelDecoder;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("field not found, node: {0}")]
    UnknownKey(String),

    #[error("invalid value {value:?} for {key}: expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

/// Turns an item's labels into a configuration fragment.
pub trait LabelDecoder: Send + Sync + std::fmt::Debug {
    fn decode(&self, labels: &BTreeMap<String, String>) -> Result<Configuration, DecodeError>;
}
