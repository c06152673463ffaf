//! Domain Services
//!
//! Pure business logic services that operate on domain entities.
//! These services have no I/O dependencies and are easily testable.

pub mod literal;
mod merger;
mod override_parser;
mod projector;
pub mod substitution;

pub use literal::{evaluate, parse_literal, LiteralError};
pub use merger::{
    detect_templating, environment_layer, merge, MergeResult, MergeSpec, OverrideInfo,
};
pub use override_parser::{
    parse_opt_conf_keys, shell_split, simplify_opts, OptConfKey, OverrideExpr, OverrideParser,
};
pub use projector::{
    apply_standard_variables, has_orig_host_marker, project, EnvExport, Projection,
    ProjectionContext, CYLC_VERSION, ORIG_HOST_MARKER, ROSE_ORIG_HOST, ROSE_SITE, ROSE_VERSION,
};
