//! Property tests for suiteconf.
//!
//! Properties use randomized input generation to explore edge cases and
//! protect invariants like "later layers win" and "round-trips".
//!
//! Run with: `cargo test --test properties`

#[path = "properties/literal.rs"]
mod literal;

#[path = "properties/merge.rs"]
mod merge;

#[path = "properties/opts.rs"]
mod opts;

#[path = "properties/persistence.rs"]
mod persistence;
