//! Request and response data types

pub mod comparison;
