//! Terminal front end.
//!
//! - [`repl`]: maps typed commands and messages onto session operations
//! - [`view`]: renders transcript entries, control labels and errors

pub mod repl;
pub mod view;

pub use repl::{Command, Flow, Repl};
