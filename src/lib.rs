#![warn(
    clippy::pedantic,
    future_incompatible,
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    rust_2021_compatibility
)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]

//! `typesig` parses, decomposes, composes, renders and erases JVM-style type and method
//! signatures, including generics, wildcards, captures, intersections and member types.
//!
//! ```
//! use typesig::types::signature::{decompose, render};
//!
//! let method = "<T:Ljava.lang.Number;>(TT;I)Ljava.util.List<TT;>;^Ljava.io.IOException;";
//! assert_eq!(decompose::parameter_types(method)?, ["TT;", "I"]);
//! assert_eq!(render::display_string("[[I")?, "int[][]");
//! # Ok::<(), typesig::types::signature::MalformedSignature>(())
//! ```
//! ## Features
#![doc = document_features::document_features!()]

pub(crate) mod macros;
pub mod types;

/// Test utilities
#[cfg(test)]
pub mod tests;
