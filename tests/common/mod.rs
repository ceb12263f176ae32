//! Common test utilities for quran-etl integration tests

#[allow(dead_code)]
pub mod fixtures;
#[allow(dead_code)]
pub mod upstream;

#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use upstream::*;
