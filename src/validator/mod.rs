//! Static validation of submitted source
//!
//! The validator parses the program and walks every node once, rejecting
//! constructs the sandbox refuses to run: import statements, `del`,
//! `global`/`nonlocal`, and calls to a fixed set of forbidden function names.
//! Name matching is purely syntactic (direct names and attribute names); it
//! performs no alias resolution, so a forbidden callable smuggled through an
//! intermediate binding is not caught here. The runtime sandbox is the second
//! line of defense for imports.
//!
//! Validation never returns an error through `Result`: every finding is a
//! [`Diagnostic`] and the caller decides what to do with them. Warnings never
//! block execution.

use crate::parser::ast::{Expr, Program, Stmt};
use crate::parser::parser::Parser;
use rustc_hash::FxHashSet;
use std::fmt;

/// Function names that must never be callable from learner code
pub const FORBIDDEN_FUNCTIONS: &[&str] = &[
    "eval",
    "exec",
    "compile",
    "open",
    "input",
    "__import__",
    "getattr",
    "setattr",
    "delattr",
    "globals",
    "locals",
    "vars",
    "dir",
];

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// One line-numbered finding produced by validation
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub line: Option<usize>,
    pub message: String,
    pub severity: Severity,
}

impl Diagnostic {
    fn error(line: usize, message: impl Into<String>) -> Self {
        Diagnostic {
            line: Some(line),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    fn warning(line: Option<usize>, message: impl Into<String>) -> Self {
        Diagnostic {
            line,
            message: message.into(),
            severity: Severity::Warning,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        match self.line {
            Some(line) => write!(f, "line {}: {}: {}", line, kind, self.message),
            None => write!(f, "{}: {}", kind, self.message),
        }
    }
}

/// Outcome of validating one source program
#[derive(Debug, Clone)]
pub struct Validation {
    pub is_valid: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl Validation {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }
}

/// Static validator for learner programs
#[derive(Debug, Default)]
pub struct StaticValidator;

impl StaticValidator {
    pub fn new() -> Self {
        StaticValidator
    }

    /// Validate source text. `is_valid` is true iff no error-severity
    /// diagnostic was produced; warnings never block execution.
    pub fn validate(&self, source: &str) -> Validation {
        let mut diagnostics = Vec::new();

        let program = match Parser::new(source).and_then(|mut p| p.parse_program()) {
            Ok(program) => program,
            Err(err) => {
                diagnostics.push(Diagnostic::error(err.location.line, err.message));
                return Validation {
                    is_valid: false,
                    diagnostics,
                };
            }
        };

        for stmt in &program.body {
            Self::check_stmt(stmt, &mut diagnostics);
        }
        Self::check_bindings(&program, &mut diagnostics);

        let is_valid = !diagnostics.iter().any(|d| d.severity == Severity::Error);
        tracing::debug!(
            valid = is_valid,
            diagnostics = diagnostics.len(),
            "static validation finished"
        );
        Validation {
            is_valid,
            diagnostics,
        }
    }

    fn check_stmt(stmt: &Stmt, diagnostics: &mut Vec<Diagnostic>) {
        let line = stmt.location().line;
        match stmt {
            Stmt::Import { .. } => {
                diagnostics.push(Diagnostic::error(line, "import statements are not allowed"));
            }
            Stmt::ImportFrom { .. } => {
                diagnostics.push(Diagnostic::error(line, "from-import statements are not allowed"));
            }
            Stmt::Delete { target, .. } => {
                diagnostics.push(Diagnostic::error(line, "the del statement is not allowed"));
                Self::check_expr(target, diagnostics);
            }
            Stmt::Global { .. } => {
                diagnostics.push(Diagnostic::error(line, "the global statement is not allowed"));
            }
            Stmt::Nonlocal { .. } => {
                diagnostics.push(Diagnostic::error(line, "the nonlocal statement is not allowed"));
            }
            Stmt::Assign { target, value, .. } => {
                Self::check_expr(target, diagnostics);
                Self::check_expr(value, diagnostics);
            }
            Stmt::AugAssign { target, value, .. } => {
                Self::check_expr(target, diagnostics);
                Self::check_expr(value, diagnostics);
            }
            Stmt::ExprStatement { expr, .. } => Self::check_expr(expr, diagnostics),
            Stmt::If {
                branches,
                else_body,
                ..
            } => {
                for branch in branches {
                    Self::check_expr(&branch.condition, diagnostics);
                    for stmt in &branch.body {
                        Self::check_stmt(stmt, diagnostics);
                    }
                }
                if let Some(body) = else_body {
                    for stmt in body {
                        Self::check_stmt(stmt, diagnostics);
                    }
                }
            }
            Stmt::While { condition, body, .. } => {
                Self::check_expr(condition, diagnostics);
                for stmt in body {
                    Self::check_stmt(stmt, diagnostics);
                }
            }
            Stmt::For { iterable, body, .. } => {
                Self::check_expr(iterable, diagnostics);
                for stmt in body {
                    Self::check_stmt(stmt, diagnostics);
                }
            }
            Stmt::FunctionDef { body, .. } | Stmt::ClassDef { body, .. } => {
                for stmt in body {
                    Self::check_stmt(stmt, diagnostics);
                }
            }
            Stmt::Return { expr, .. } => {
                if let Some(expr) = expr {
                    Self::check_expr(expr, diagnostics);
                }
            }
            Stmt::Break { .. } | Stmt::Continue { .. } | Stmt::Pass { .. } => {}
        }
    }

    fn check_expr(expr: &Expr, diagnostics: &mut Vec<Diagnostic>) {
        match expr {
            Expr::Call { callee, args, location } => {
                // Resolve the callee's syntactic name: a direct name or the
                // final attribute of an attribute access
                let name = match callee.as_ref() {
                    Expr::Name(name, _) => Some(name.as_str()),
                    Expr::Attribute { name, .. } => Some(name.as_str()),
                    _ => None,
                };
                if let Some(name) = name {
                    if FORBIDDEN_FUNCTIONS.contains(&name) {
                        diagnostics.push(Diagnostic::error(
                            location.line,
                            format!("call to '{}' is not allowed", name),
                        ));
                    }
                }
                Self::check_expr(callee, diagnostics);
                for arg in args {
                    Self::check_expr(arg, diagnostics);
                }
            }
            Expr::BinaryOp { left, right, .. } => {
                Self::check_expr(left, diagnostics);
                Self::check_expr(right, diagnostics);
            }
            Expr::UnaryOp { operand, .. } => Self::check_expr(operand, diagnostics),
            Expr::Attribute { object, .. } => Self::check_expr(object, diagnostics),
            Expr::Index { object, index, .. } => {
                Self::check_expr(object, diagnostics);
                Self::check_expr(index, diagnostics);
            }
            Expr::ListDisplay { items, .. }
            | Expr::TupleDisplay { items, .. }
            | Expr::SetDisplay { items, .. } => {
                for item in items {
                    Self::check_expr(item, diagnostics);
                }
            }
            Expr::DictDisplay { entries, .. } => {
                for (key, value) in entries {
                    Self::check_expr(key, diagnostics);
                    Self::check_expr(value, diagnostics);
                }
            }
            Expr::IntLiteral(..)
            | Expr::FloatLiteral(..)
            | Expr::StringLiteral(..)
            | Expr::BoolLiteral(..)
            | Expr::NoneLiteral(..)
            | Expr::Name(..) => {}
        }
    }

    /// Best-effort secondary pass over top-level bindings. Only ever emits
    /// warnings; is_valid is unaffected by anything found here.
    fn check_bindings(program: &Program, diagnostics: &mut Vec<Diagnostic>) {
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for stmt in &program.body {
            if let Stmt::FunctionDef { name, location, .. } | Stmt::ClassDef { name, location, .. } =
                stmt
            {
                if !seen.insert(name.as_str()) {
                    diagnostics.push(Diagnostic::warning(
                        Some(location.line),
                        format!("'{}' is defined more than once", name),
                    ));
                }
            }
            if let Stmt::Assign {
                target: Expr::Name(name, _),
                location,
                ..
            } = stmt
            {
                if crate::sandbox::INTERACTIVE_BUILTINS.contains(&name.as_str()) {
                    diagnostics.push(Diagnostic::warning(
                        Some(location.line),
                        format!("assignment shadows the built-in '{}'", name),
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_program() {
        let validation = StaticValidator::new().validate("a = 2\nb = 3\nprint(a + b)\n");
        assert!(validation.is_valid);
        assert!(validation.errors().next().is_none());
    }

    #[test]
    fn test_import_rejected_with_line() {
        let validation = StaticValidator::new().validate("import os\n");
        assert!(!validation.is_valid);
        let errors: Vec<_> = validation.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, Some(1));
    }

    #[test]
    fn test_forbidden_call_rejected_with_line() {
        let validation = StaticValidator::new().validate("x = 1\neval('2 + 2')\n");
        assert!(!validation.is_valid);
        let errors: Vec<_> = validation.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, Some(2));
        assert!(errors[0].message.contains("eval"));
    }

    #[test]
    fn test_forbidden_attribute_call() {
        let validation = StaticValidator::new().validate("helper.open('file')\n");
        assert!(!validation.is_valid);
    }

    #[test]
    fn test_aliasing_is_not_caught() {
        // Documented limitation: purely syntactic detection
        let validation = StaticValidator::new().validate("f = compile\n");
        assert!(validation.is_valid);
    }

    #[test]
    fn test_syntax_error_single_diagnostic() {
        let validation = StaticValidator::new().validate("if x\n    y = 1\n");
        assert!(!validation.is_valid);
        assert_eq!(validation.diagnostics.len(), 1);
        assert_eq!(validation.diagnostics[0].severity, Severity::Error);
        assert!(validation.diagnostics[0].line.is_some());
    }

    #[test]
    fn test_warnings_do_not_block() {
        let source = "def f():\n    return 1\ndef f():\n    return 2\n";
        let validation = StaticValidator::new().validate(source);
        assert!(validation.is_valid);
        assert!(validation.warnings().next().is_some());
    }

    #[test]
    fn test_forbidden_call_inside_function_body() {
        let source = "def f():\n    exec('x = 1')\n";
        let validation = StaticValidator::new().validate(source);
        assert!(!validation.is_valid);
        assert_eq!(validation.errors().next().unwrap().line, Some(2));
    }

    #[test]
    fn test_del_and_global_rejected() {
        let validation = StaticValidator::new().validate("x = 1\ndel x\nglobal y\n");
        assert!(!validation.is_valid);
        assert_eq!(validation.errors().count(), 2);
    }
}
