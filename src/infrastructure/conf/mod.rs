//! Reader and writer for the `rose-suite.conf` file syntax.

mod dumper;
mod loader;

pub use dumper::dump_conf;
pub use loader::{load_conf, parse_conf};
