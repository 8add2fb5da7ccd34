#![warn(missing_debug_implementations, rust_2018_idioms, missing_docs)]
#![doc = include_str!("../README.md")]
//! ## Feature flags
#![doc = document_features::document_features!()]

pub mod codec;
/// Module containing the APIs for the JVM class file format.
pub mod jvm;
pub(crate) mod macros;
pub mod validation;

#[cfg(test)]
mod tests;
