//! Response shaping for tool output
//!
//! Tool results are JSON text. List responses go through the [`ResponseOptimizer`],
//! which truncates long free text, removes noisy fields and attaches pagination
//! metadata, keeping payloads small enough for an LLM context window.

pub mod entity;
pub mod field_filter;
pub mod optimizer;
pub mod truncation;

pub use entity::{EntityConfig, entity_config};
pub use field_filter::FieldFilter;
pub use optimizer::{PaginatedResponse, PaginationMetadata, ResponseOptimizer};
pub use truncation::{MAX_FIELD_LENGTH, TRUNCATION_SUFFIX, TextTruncator};
