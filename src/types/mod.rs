//! Module containing the APIs for the signature type system.
pub mod base_type;
pub mod signature;
