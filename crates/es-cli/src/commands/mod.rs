//! CLI command implementations

pub(crate) mod catalog;
pub(crate) mod common;
pub(crate) mod delete;
pub(crate) mod import;
pub(crate) mod status;
pub(crate) mod sync;
