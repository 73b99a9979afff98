// furrow/src/flow/mod.rs

//! `Flow<TData, Err>`: construction, hook registration, and execution.

pub mod definition;
pub mod execution;
pub mod hooks;

pub use definition::Flow;
