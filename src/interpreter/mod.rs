//! Sandboxed tree-walking interpreter
//!
//! - [`value`]: runtime value representation
//! - [`errors`]: runtime error types
//! - [`builtins`]: pure built-in functions
//! - [`methods`]: methods on built-in types
//! - [`modules`]: the sandboxed module registry
//! - [`engine`]: the step-recording executor

pub mod builtins;
pub mod engine;
pub mod errors;
pub mod methods;
pub mod modules;
pub mod value;
