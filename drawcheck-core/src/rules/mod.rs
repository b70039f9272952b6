// Main rules module - delegates to semantic sub-modules
// - engine.rs: RuleRunner, the per-document evaluation loop
// - catalog.rs: named rule sets and the immutable registry
// - library.rs: the built-in AED and ASME Y14 predicates
// - keyword.rs / pattern.rs: text presence checks
// - layout.rs: position and geometry heuristics
// - consistency.rs: cross-field checks

pub mod catalog;
pub mod consistency;
pub mod engine;
pub mod keyword;
pub mod layout;
pub mod library;
pub mod pattern;

pub use catalog::{RuleCatalog, RuleSet};
pub use engine::{RuleRunner, RuleTiming};
pub use library::{RuleLibrary, AED, ASME_Y14};

use crate::error::RuleError;
use crate::types::TextBlock;
use crate::verdict::Check;

/// One independent acceptance criterion for a drawing.
///
/// Implementations are pure: they read the blocks, never mutate them, and
/// keep no state between calls. Anything that goes wrong is returned as a
/// [`RuleError`] and the runner turns it into an errored verdict.
pub trait DrawingRule: Send + Sync {
    /// Declared identifier, e.g. `check_nsn_present`
    fn id(&self) -> &str;
    /// Human-readable name used as the verdict's identity in reports
    fn name(&self) -> &str;
    fn check(&self, blocks: &[TextBlock]) -> Result<Check, RuleError>;
}
