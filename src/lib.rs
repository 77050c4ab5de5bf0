pub mod config;
pub mod convert;
pub mod error;
pub mod graph;
pub mod layout;
pub mod output;
pub mod parse;
pub mod source;
pub mod trivial;
pub mod validate;
pub mod verify;
