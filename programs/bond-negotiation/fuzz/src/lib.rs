//! Property-based fuzz testing library for the bond negotiation program
//!
//! Drives the program's lifecycle, sign-off and chat helpers through an
//! in-memory ledger and checks bond invariants after every instruction.
//!
//! # Usage
//!
//! ```bash
//! # Run all property-based tests
//! cargo test --release
//!
//! # Run the fuzz test runner
//! cargo run --release
//!
//! # Run with more iterations
//! PROPTEST_CASES=10000 cargo test --release
//! ```

pub mod arbitrary;
pub mod invariants;
pub mod scenarios;

pub use arbitrary::*;
pub use invariants::*;
pub use scenarios::*;

// Include fuzz targets as test modules
#[cfg(test)]
#[path = "../fuzz_targets/lifecycle.rs"]
mod lifecycle_tests;

#[cfg(test)]
#[path = "../fuzz_targets/signoff.rs"]
mod signoff_tests;

#[cfg(test)]
#[path = "../fuzz_targets/holder_selection.rs"]
mod holder_selection_tests;

#[cfg(test)]
#[path = "../fuzz_targets/chat.rs"]
mod chat_tests;

#[cfg(test)]
#[path = "../fuzz_targets/negotiation_scenarios.rs"]
mod negotiation_scenarios_tests;
