//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod ignore_state;
mod section;
mod template_value;

pub use ignore_state::IgnoreState;
pub use section::{TemplatingSection, ENV_SECTION, OPTS_KEY, SUITE_VARIABLES};
pub use template_value::TemplateValue;
