//! # Introduction
//!
//! pystep executes a Python-like teaching language inside a sandbox,
//! recording one [`snapshot::ExecutionStep`] per module-level statement.
//! The recorded timeline is then navigated forward and backward through a
//! [`timeline::Timeline`], so a learner can replay their program one line
//! at a time without re-running anything.
//!
//! ## Execution pipeline
//!
//! ```text
//! Source → Validator → Lexer → Parser → AST → Executor → Steps → Timeline
//! ```
//!
//! 1. [`validator`] — rejects unsafe constructs before anything runs:
//!    imports, `del`, `global`/`nonlocal`, and calls to a fixed set of
//!    forbidden function names.
//! 2. [`parser`] — indentation-aware tokeniser and recursive descent parser.
//! 3. [`sandbox`] — the import allow/deny lists, builtin profiles, and the
//!    operation governor that aborts runaway loops.
//! 4. [`interpreter`] — walks the AST and records a step after each
//!    module-level statement, with post-state variable snapshots.
//! 5. [`timeline`] — the read-only cursor over the recorded steps.
//! 6. [`testing`] — replays a program against scripted stdin and compares
//!    transcripts, for the task catalog's test cases.
//!
//! ## Supported language subset
//!
//! Types: `int`, `float`, `str`, `bool`, `None`, `list`, `tuple`, `dict`,
//! `set`. Control flow: `if/elif/else`, `while`, `for`, `break`,
//! `continue`, `def`, `class`, `return`. Imports are limited to the module
//! allow-list and only on the replay path; the interactive path rejects
//! them statically.

pub mod interpreter;
pub mod parser;
pub mod sandbox;
pub mod snapshot;
pub mod testing;
pub mod timeline;
pub mod validator;
