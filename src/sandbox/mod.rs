//! Sandbox policy: what a running learner program may reach
//!
//! Three concerns live here, all consumed by the executor and the test
//! runner:
//!
//! - [`SandboxPolicy`]: allow/deny sets for importable modules and dotted
//!   members. Module checks accept dotted descendants of an allowed module;
//!   member checks are exact-match only, because a submodule can expose
//!   dangerous functionality even under a permitted parent package.
//! - [`BuiltinProfile`]: the explicit allow-list of built-in callables. The
//!   `Interactive` profile (step executor) includes the type and class
//!   machinery; the `Strict` profile (test runner) is narrower but adds
//!   `input` for scripted stdin.
//! - [`OperationGovernor`]: the counter-and-ceiling mechanism that aborts
//!   runaway loops. This is the primary defense against unbounded execution;
//!   the test runner's wall-clock deadline is a secondary one.
//!
//! Nothing here is process-global. Each run owns its own governor and import
//! guard, so sequential runs are trivially isolated.

use rustc_hash::FxHashSet;
use std::fmt;

/// Top-level modules importable by learner code
pub const ALLOWED_MODULES: &[&str] = &[
    // Math
    "math",
    "cmath",
    "decimal",
    "fractions",
    "statistics",
    // Data handling
    "random",
    "itertools",
    "functools",
    "operator",
    "collections",
    "heapq",
    "bisect",
    // Strings and text
    "re",
    "string",
    "textwrap",
    // Date and time
    "datetime",
    "time",
    "calendar",
    // Serialization
    "json",
    // Object copying
    "copy",
    // Data types
    "enum",
    "dataclasses",
];

/// Dotted members importable through `from X import Y`
pub const ALLOWED_MEMBERS: &[&str] = &[
    "random.randint",
    "random.choice",
    "random.shuffle",
    "random.sample",
    "datetime.datetime",
    "datetime.date",
    "datetime.time",
    "collections.defaultdict",
    "collections.Counter",
    "collections.deque",
    "itertools.combinations",
    "itertools.permutations",
    "itertools.product",
    "math.pi",
    "math.e",
];

/// Modules that are always denied, even as descendants of allowed names
pub const FORBIDDEN_MODULES: &[&str] = &[
    "os",
    "sys",
    "subprocess",
    "socket",
    "urllib",
    "requests",
    "pickle",
    "marshal",
    "shelve",
    "dbm",
    "importlib",
    "__builtin__",
    "builtins",
    "ctypes",
    "multiprocessing",
    "threading",
    "tempfile",
    "shutil",
    "glob",
    "pathlib",
    "io",
    "codecs",
    "locale",
];

/// Built-ins reachable from the interactive step executor. Includes the
/// class/type machinery so learner programs can define and inspect classes.
pub const INTERACTIVE_BUILTINS: &[&str] = &[
    "abs", "all", "any", "bin", "bool", "chr", "dict", "divmod", "enumerate", "filter", "float",
    "hex", "int", "isinstance", "len", "list", "map", "max", "min", "oct", "ord", "pow", "print",
    "range", "repr", "reversed", "round", "set", "sorted", "str", "sum", "tuple", "type", "zip",
];

/// Built-ins reachable from the test runner. Narrower than the interactive
/// profile (no type introspection), but `input` is present because test
/// cases feed scripted stdin.
pub const STRICT_BUILTINS: &[&str] = &[
    "print", "input", "len", "range", "int", "float", "str", "list", "dict", "set", "tuple",
    "bool", "abs", "max", "min", "sum", "sorted", "reversed", "enumerate", "zip", "map", "filter",
];

/// Default operation ceiling for one run
pub const DEFAULT_MAX_OPERATIONS: u64 = 10_000;

/// Which builtin allow-list a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinProfile {
    Interactive,
    Strict,
}

impl BuiltinProfile {
    /// Whether `name` is a reachable builtin under this profile
    pub fn allows(&self, name: &str) -> bool {
        match self {
            BuiltinProfile::Interactive => INTERACTIVE_BUILTINS.contains(&name),
            BuiltinProfile::Strict => STRICT_BUILTINS.contains(&name),
        }
    }
}

/// Errors raised by policy enforcement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// Top-level module denied by the import guard
    ImportDenied { name: String },
    /// `from X import Y` member not on the member allow-list
    MemberDenied { name: String },
    /// Operation counter exceeded its ceiling
    OperationCeiling { ceiling: u64 },
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyError::ImportDenied { name } => {
                write!(f, "import of module '{}' is denied", name)
            }
            PolicyError::MemberDenied { name } => {
                write!(f, "import of '{}' is denied", name)
            }
            PolicyError::OperationCeiling { ceiling } => {
                write!(
                    f,
                    "operation ceiling exceeded ({}): possible unbounded loop",
                    ceiling
                )
            }
        }
    }
}

impl std::error::Error for PolicyError {}

/// Allow/deny rules governing imports during a run
#[derive(Debug, Clone)]
pub struct SandboxPolicy {
    allowed_modules: FxHashSet<&'static str>,
    allowed_members: FxHashSet<&'static str>,
    forbidden_modules: FxHashSet<&'static str>,
    pub max_operations: u64,
}

impl Default for SandboxPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl SandboxPolicy {
    pub fn new() -> Self {
        SandboxPolicy {
            allowed_modules: ALLOWED_MODULES.iter().copied().collect(),
            allowed_members: ALLOWED_MEMBERS.iter().copied().collect(),
            forbidden_modules: FORBIDDEN_MODULES.iter().copied().collect(),
            max_operations: DEFAULT_MAX_OPERATIONS,
        }
    }

    /// Exact allow wins, then exact forbid, then dotted descendants of an
    /// allowed module; everything else is denied.
    pub fn is_module_allowed(&self, name: &str) -> bool {
        if self.allowed_modules.contains(name) {
            return true;
        }
        if self.forbidden_modules.contains(name) {
            return false;
        }
        self.allowed_modules
            .iter()
            .any(|allowed| name.starts_with(allowed) && name[allowed.len()..].starts_with('.'))
    }

    /// Exact membership only; no prefix matching for dotted members
    pub fn is_member_allowed(&self, qualified_name: &str) -> bool {
        self.allowed_members.contains(qualified_name)
    }
}

/// Guarded import hook: checks names against the policy before the module
/// registry is consulted, and records successful imports for audit.
#[derive(Debug, Default)]
pub struct ImportGuard {
    imported: Vec<String>,
}

impl ImportGuard {
    pub fn new() -> Self {
        ImportGuard::default()
    }

    /// Check a plain `import X` against the policy
    pub fn check_import(&self, policy: &SandboxPolicy, module: &str) -> Result<(), PolicyError> {
        if !policy.is_module_allowed(module) {
            return Err(PolicyError::ImportDenied {
                name: module.to_string(),
            });
        }
        Ok(())
    }

    /// Check a `from X import a, b` against the policy
    pub fn check_import_from(
        &self,
        policy: &SandboxPolicy,
        module: &str,
        names: &[String],
    ) -> Result<(), PolicyError> {
        self.check_import(policy, module)?;
        for name in names {
            let qualified = format!("{}.{}", module, name);
            if !policy.is_member_allowed(&qualified) {
                return Err(PolicyError::MemberDenied { name: qualified });
            }
        }
        Ok(())
    }

    /// Record a successful import for later audit
    pub fn record(&mut self, module: &str) {
        if !self.imported.iter().any(|m| m == module) {
            self.imported.push(module.to_string());
        }
    }

    /// Modules successfully imported during the run, in import order
    pub fn imported_modules(&self) -> &[String] {
        &self.imported
    }
}

/// Monotonic counter with a fixed ceiling, ticked on every observed
/// execution event. Exceeding the ceiling fails the run fatally.
#[derive(Debug, Clone)]
pub struct OperationGovernor {
    count: u64,
    ceiling: u64,
}

impl OperationGovernor {
    pub fn new(ceiling: u64) -> Self {
        OperationGovernor { count: 0, ceiling }
    }

    pub fn tick(&mut self) -> Result<(), PolicyError> {
        self.count += 1;
        if self.count > self.ceiling {
            return Err(PolicyError::OperationCeiling {
                ceiling: self.ceiling,
            });
        }
        Ok(())
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_allowed_module() {
        let policy = SandboxPolicy::new();
        assert!(policy.is_module_allowed("math"));
        assert!(policy.is_module_allowed("random"));
    }

    #[test]
    fn test_forbidden_module() {
        let policy = SandboxPolicy::new();
        assert!(!policy.is_module_allowed("os"));
        assert!(!policy.is_module_allowed("subprocess"));
        assert!(!policy.is_module_allowed("unknown_module"));
    }

    #[test]
    fn test_dotted_descendant_of_allowed() {
        let policy = SandboxPolicy::new();
        assert!(policy.is_module_allowed("collections.abc"));
        // Prefix without a dot boundary must not match
        assert!(!policy.is_module_allowed("mathematics"));
    }

    #[test]
    fn test_member_allowed_exact_only() {
        let policy = SandboxPolicy::new();
        assert!(policy.is_member_allowed("math.pi"));
        assert!(!policy.is_member_allowed("math.sqrt"));
        assert!(!policy.is_member_allowed("math"));
    }

    #[test]
    fn test_import_guard_denies_and_records() {
        let policy = SandboxPolicy::new();
        let mut guard = ImportGuard::new();

        assert!(guard.check_import(&policy, "os").is_err());
        assert!(guard.check_import(&policy, "math").is_ok());

        guard.record("math");
        guard.record("math");
        assert_eq!(guard.imported_modules(), &["math".to_string()]);
    }

    #[test]
    fn test_import_from_member_check() {
        let policy = SandboxPolicy::new();
        let guard = ImportGuard::new();

        assert!(guard
            .check_import_from(&policy, "math", &["pi".to_string()])
            .is_ok());
        let err = guard
            .check_import_from(&policy, "math", &["sqrt".to_string()])
            .unwrap_err();
        assert_eq!(
            err,
            PolicyError::MemberDenied {
                name: "math.sqrt".to_string()
            }
        );
    }

    #[test]
    fn test_governor_ceiling() {
        let mut governor = OperationGovernor::new(3);
        assert!(governor.tick().is_ok());
        assert!(governor.tick().is_ok());
        assert!(governor.tick().is_ok());
        assert!(governor.tick().is_err());

        governor.reset();
        assert!(governor.tick().is_ok());
    }

    #[test]
    fn test_builtin_profiles() {
        assert!(BuiltinProfile::Interactive.allows("isinstance"));
        assert!(!BuiltinProfile::Strict.allows("isinstance"));
        assert!(BuiltinProfile::Strict.allows("input"));
        assert!(!BuiltinProfile::Interactive.allows("input"));
        assert!(!BuiltinProfile::Interactive.allows("open"));
    }
}
