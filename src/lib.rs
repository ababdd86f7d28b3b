//! # State Filter (statefilter)
//!
//! Address-based filtering over infrastructure state snapshots with support for:
//! - Module instance, resource and resource instance patterns
//! - Module-agnostic resource patterns that match in every module
//! - Module scoping, optionally including nested module instances
//! - Deduplicated, deterministically ordered results
//! - Thread-safe pattern parse caching
//!
//! ## Example
//!
//! ```rust
//! use statefilter::addrs::AbsResourceInstance;
//! use statefilter::state::{InstanceObject, State};
//! use statefilter::StateFilter;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut state = State::new();
//! for addr in ["aws_instance.web", "module.app[0].aws_instance.web", "module.app[1].aws_s3_bucket.logs"] {
//!     let addr: AbsResourceInstance = addr.parse()?;
//!     state.set_resource_instance_current(&addr, Some(InstanceObject::new("{}")));
//! }
//!
//! let filter = StateFilter::new(&state);
//!
//! // Unqualified resource patterns match in every module
//! let results = filter.filter(&["aws_instance.web"])?;
//! assert_eq!(results.len(), 2);
//!
//! // Module patterns return the module itself plus its resources
//! let results = filter.filter(&["module.app[1]"])?;
//! assert_eq!(results[0].address, "module.app[1]");
//! assert_eq!(results[1].address, "module.app[1].aws_s3_bucket.logs");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod addrs;
pub mod error;
pub mod filter;
pub mod list;
pub mod state;

pub use error::{FilterError, Result};
pub use filter::{
    CacheStats, FilterConfig, FilterResult, FilterValue, ParserConfig, StateFilter, TargetParser,
};
pub use list::{list_resource_addresses, select_resource_addresses};
pub use state::State;
