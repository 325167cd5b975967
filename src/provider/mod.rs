//! Catalog provider core.
//!
//! # Data Flow
//! ```text
//! RegistryItem[]
//!     → filter.rs (enabled? constraints? healthy?)
//!     → LabelDecoder (labels → fragment)
//!     → tcp.rs  (default service + endpoint) → routers.rs (TCP wiring)
//!     → http.rs (default service + endpoint) → routers.rs (default rule)
//!     → GlobalConfiguration (node-name-id → fragment)
//!     → merge.rs → Configuration
//! ```
//!
//! # Design Decisions
//! - One pass is pure and synchronous; nothing survives between passes
//! - A failing item is skipped and reported, never fails the pass
//! - Collaborators (decoder, constraints, merge) sit behind traits

pub mod builder;
pub mod endpoint;
pub mod error;
pub mod filter;
pub mod http;
pub mod merge;
pub mod routers;
pub mod tcp;
pub mod template;

pub use builder::{BuildReport, Provider, SkippedItem};
pub use error::{ProviderError, SkipReason};
pub use merge::{ConfigurationMerger, DefaultMerger};
pub use template::{RuleModel, RuleTemplate, TemplateError, DEFAULT_RULE};
