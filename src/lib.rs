pub mod archive;
pub mod classify;
pub mod commands;
pub mod convert;
pub mod error;
pub mod metadata;
