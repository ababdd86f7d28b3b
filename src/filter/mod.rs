//! Filter module for selecting objects from a state tree by address.
//!
//! This module provides:
//! - The relevance test between a target address and a resource instance
//! - Module scoping, where a module target narrows the modules searched
//! - Deduplication across patterns by canonical address
//! - Stable, human-friendly result ordering
//! - A thread-safe parse cache for repeated patterns

mod cache;
mod matcher;
mod result;
mod state_filter;

pub use cache::{CacheStats, ParserConfig, TargetParser};
pub use matcher::relevant;
pub use result::{FilterResult, FilterValue};
pub use state_filter::{FilterConfig, StateFilter};
