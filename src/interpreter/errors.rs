//! Runtime errors
//!
//! Every failure a running program can hit, formatted the way the Python
//! originals read so learners see familiar messages. Each variant carries the
//! source location of the statement that was executing when it arose.

use crate::parser::ast::SourceLocation;
use crate::parser::parser::ParseError;
use crate::sandbox::PolicyError;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// Source failed to parse before execution began
    Syntax {
        message: String,
        location: SourceLocation,
    },
    NameError {
        name: String,
        location: SourceLocation,
    },
    TypeError {
        message: String,
        location: SourceLocation,
    },
    ValueError {
        message: String,
        location: SourceLocation,
    },
    ZeroDivision {
        location: SourceLocation,
    },
    /// Integer arithmetic left the machine-word range
    Overflow {
        location: SourceLocation,
    },
    IndexError {
        location: SourceLocation,
    },
    KeyError {
        key: String,
        location: SourceLocation,
    },
    AttributeError {
        type_name: String,
        attribute: String,
        location: SourceLocation,
    },
    ArgumentCountMismatch {
        name: String,
        expected: usize,
        given: usize,
        location: SourceLocation,
    },
    /// Import guard denied a module
    ImportDenied {
        name: String,
        location: SourceLocation,
    },
    /// Import guard denied a dotted member
    MemberDenied {
        name: String,
        location: SourceLocation,
    },
    /// Module is on the allow-list but the registry has no implementation
    ModuleUnavailable {
        name: String,
        location: SourceLocation,
    },
    /// Operation governor exceeded its ceiling
    OperationCeiling {
        ceiling: u64,
        location: SourceLocation,
    },
    /// Wall-clock deadline passed (test runner only)
    Timeout {
        location: SourceLocation,
    },
    /// `input()` called after the scripted input was exhausted
    EndOfInput {
        location: SourceLocation,
    },
    /// Call stack grew past the depth cap
    RecursionLimit {
        location: SourceLocation,
    },
    /// Legal syntax the interpreter does not execute
    Unsupported {
        message: String,
        location: SourceLocation,
    },
}

impl RuntimeError {
    pub fn location(&self) -> SourceLocation {
        match self {
            RuntimeError::Syntax { location, .. }
            | RuntimeError::NameError { location, .. }
            | RuntimeError::TypeError { location, .. }
            | RuntimeError::ValueError { location, .. }
            | RuntimeError::ZeroDivision { location }
            | RuntimeError::Overflow { location }
            | RuntimeError::IndexError { location }
            | RuntimeError::KeyError { location, .. }
            | RuntimeError::AttributeError { location, .. }
            | RuntimeError::ArgumentCountMismatch { location, .. }
            | RuntimeError::ImportDenied { location, .. }
            | RuntimeError::MemberDenied { location, .. }
            | RuntimeError::ModuleUnavailable { location, .. }
            | RuntimeError::OperationCeiling { location, .. }
            | RuntimeError::Timeout { location }
            | RuntimeError::EndOfInput { location }
            | RuntimeError::RecursionLimit { location }
            | RuntimeError::Unsupported { location, .. } => *location,
        }
    }

    /// Whether this failure aborts the whole run rather than surfacing as a
    /// learner-visible exception step
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RuntimeError::OperationCeiling { .. } | RuntimeError::Timeout { .. }
        )
    }

    pub fn at(err: PolicyError, location: SourceLocation) -> RuntimeError {
        match err {
            PolicyError::ImportDenied { name } => RuntimeError::ImportDenied { name, location },
            PolicyError::MemberDenied { name } => RuntimeError::MemberDenied { name, location },
            PolicyError::OperationCeiling { ceiling } => {
                RuntimeError::OperationCeiling { ceiling, location }
            }
        }
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::Syntax { message, .. } => write!(f, "SyntaxError: {}", message),
            RuntimeError::NameError { name, .. } => {
                write!(f, "NameError: name '{}' is not defined", name)
            }
            RuntimeError::TypeError { message, .. } => write!(f, "TypeError: {}", message),
            RuntimeError::ValueError { message, .. } => write!(f, "ValueError: {}", message),
            RuntimeError::ZeroDivision { .. } => {
                write!(f, "ZeroDivisionError: division by zero")
            }
            RuntimeError::Overflow { .. } => {
                write!(f, "OverflowError: result too large to represent")
            }
            RuntimeError::IndexError { .. } => {
                write!(f, "IndexError: index out of range")
            }
            RuntimeError::KeyError { key, .. } => write!(f, "KeyError: {}", key),
            RuntimeError::AttributeError {
                type_name,
                attribute,
                ..
            } => write!(
                f,
                "AttributeError: '{}' object has no attribute '{}'",
                type_name, attribute
            ),
            RuntimeError::ArgumentCountMismatch {
                name,
                expected,
                given,
                ..
            } => write!(
                f,
                "TypeError: {}() takes {} arguments but {} were given",
                name, expected, given
            ),
            RuntimeError::ImportDenied { name, .. } => {
                write!(f, "ImportError: import of module '{}' is denied", name)
            }
            RuntimeError::MemberDenied { name, .. } => {
                write!(f, "ImportError: import of '{}' is denied", name)
            }
            RuntimeError::ModuleUnavailable { name, .. } => {
                write!(f, "ImportError: module '{}' is not available", name)
            }
            RuntimeError::OperationCeiling { ceiling, .. } => write!(
                f,
                "operation ceiling exceeded ({}): possible unbounded loop",
                ceiling
            ),
            RuntimeError::Timeout { .. } => write!(f, "execution timed out"),
            RuntimeError::EndOfInput { .. } => {
                write!(f, "EOFError: no more input available")
            }
            RuntimeError::RecursionLimit { .. } => {
                write!(f, "RecursionError: maximum recursion depth exceeded")
            }
            RuntimeError::Unsupported { message, .. } => {
                write!(f, "NotImplementedError: {}", message)
            }
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<ParseError> for RuntimeError {
    fn from(err: ParseError) -> Self {
        RuntimeError::Syntax {
            message: err.message,
            location: err.location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(line: usize) -> SourceLocation {
        SourceLocation { line, column: 1 }
    }

    #[test]
    fn test_display_matches_python_phrasing() {
        let err = RuntimeError::NameError {
            name: "total".to_string(),
            location: loc(3),
        };
        assert_eq!(err.to_string(), "NameError: name 'total' is not defined");

        let err = RuntimeError::ZeroDivision { location: loc(1) };
        assert_eq!(err.to_string(), "ZeroDivisionError: division by zero");
    }

    #[test]
    fn test_fatal_classification() {
        assert!(RuntimeError::OperationCeiling {
            ceiling: 10_000,
            location: loc(1)
        }
        .is_fatal());
        assert!(!RuntimeError::ZeroDivision { location: loc(1) }.is_fatal());
    }

    #[test]
    fn test_policy_error_conversion() {
        let err = RuntimeError::at(
            PolicyError::ImportDenied {
                name: "os".to_string(),
            },
            loc(2),
        );
        assert_eq!(err.location().line, 2);
        assert!(err.to_string().contains("'os'"));
    }
}
