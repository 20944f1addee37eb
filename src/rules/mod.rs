//! Built-in rules
//!
//! Each rule lives in its own module: a descriptor carrying the example
//! corpus, a visitor, and a test module that checks the rule against its
//! own corpus. The corpus examples double as the rule's documentation.

mod explicit_init;
mod fallthrough;
mod force_cast;
mod force_try;
mod redundant_extension;

pub use explicit_init::ExplicitInitRule;
pub use fallthrough::FallthroughRule;
pub use force_cast::ForceCastRule;
pub use force_try::ForceTryRule;
pub use redundant_extension::RedundantExtensionRule;

use crate::visitor::Rule;
use std::sync::Arc;

/// All bundled rules, in registration order
pub fn builtin_rules() -> Vec<Arc<dyn Rule>> {
    vec![
        Arc::new(ForceCastRule::new()),
        Arc::new(ForceTryRule::new()),
        Arc::new(FallthroughRule::new()),
        Arc::new(RedundantExtensionRule::new()),
        Arc::new(ExplicitInitRule::new()),
    ]
}
