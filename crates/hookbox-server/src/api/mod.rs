// ABOUTME: API module containing all HTTP handler functions for hookbox.
// ABOUTME: Organized into sub-modules for the record resource and the inference proxy.

pub mod inference;
pub mod records;
