//! Import block formatting.
//!
//! This module contains the core formatting logic organized into submodules:
//! - [`groups`]: Resolves user-declared group orders into a total ordering
//! - [`classify`]: Assigns records to groups by pattern, with memoized lookup
//! - [`merge`]: Collapses records per (module, kind) and applies exclusions
//! - [`sort`]: Orders merged records within each group
//! - [`render`]: Produces formatted lines per group and assembles the block
//! - [`aligner`]: Pads lines so `from` keywords align per group
//! - [`splice`]: Replaces the located range, detecting no-ops

pub mod aligner;
pub mod classify;
pub mod groups;
pub mod merge;
pub mod render;
pub mod sort;
pub mod splice;

pub use aligner::align_from;
pub use classify::{is_priority, Classifier};
pub use groups::{resolve_groups, resolve_orders, ResolvedGroup, MAX_SANE_ORDER};
pub use merge::{apply_exclusions, merge_records, Exclusions};
pub use render::{render_block, render_group, FormattedGroup, RenderOptions};
pub use sort::{sort_group, sort_specifiers};
pub use splice::{splice, SpliceResult};
