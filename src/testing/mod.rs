//! Scripted replay of learner programs against expected output
//!
//! [`TestRunner`] executes a program once per [`TestCase`], feeding the
//! case's input lines to `input()` and comparing the captured transcript
//! against the expected text. Every case gets a fresh executor, so state
//! from one case can never leak into the next, and each case runs under its
//! own wall-clock deadline on top of the operation governor.
//!
//! [`TaskCatalog`] is the JSON-backed catalog of practice tasks, grouped by
//! theme, that supplies the cases.

use crate::interpreter::engine::{InputScript, StepExecutor};
use crate::sandbox::SandboxPolicy;
use serde::Deserialize;
use std::time::Duration;

/// Per-case wall-clock deadline
pub const DEFAULT_CASE_TIMEOUT: Duration = Duration::from_secs(5);

/// One scripted run: stdin lines in, expected transcript out
#[derive(Debug, Clone, Deserialize)]
pub struct TestCase {
    #[serde(default)]
    pub inputs: Vec<String>,
    pub expected_output: String,
    #[serde(default)]
    pub description: String,
}

/// One practice task with its test cases
#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cases: Vec<TestCase>,
}

/// A theme grouping related tasks
#[derive(Debug, Clone, Deserialize)]
pub struct Theme {
    pub name: String,
    pub tasks: Vec<Task>,
}

/// The full catalog, loaded from JSON
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskCatalog {
    pub themes: Vec<Theme>,
}

impl TaskCatalog {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn find_task(&self, theme_name: &str, task_name: &str) -> Option<&Task> {
        self.themes
            .iter()
            .find(|theme| theme.name == theme_name)?
            .tasks
            .iter()
            .find(|task| task.name == task_name)
    }
}

/// Outcome of one case
#[derive(Debug, Clone)]
pub struct CaseResult {
    /// 1-based case position
    pub case_number: usize,
    pub passed: bool,
    /// The stdin lines the case was fed, for display alongside the verdict
    pub inputs: Vec<String>,
    pub expected: String,
    /// What the program actually printed (possibly partial on error)
    pub actual: String,
    /// Error text when the run did not complete
    pub error: Option<String>,
}

/// Aggregated outcome of one program against one case list
#[derive(Debug, Clone, Default)]
pub struct TestReport {
    pub results: Vec<CaseResult>,
}

impl TestReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    /// Whether every case passed (an empty case list counts as success)
    pub fn success(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }
}

/// Replays a program against scripted cases
#[derive(Debug)]
pub struct TestRunner {
    policy: SandboxPolicy,
    case_timeout: Duration,
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRunner {
    pub fn new() -> Self {
        Self::with_policy(SandboxPolicy::new())
    }

    pub fn with_policy(policy: SandboxPolicy) -> Self {
        TestRunner {
            policy,
            case_timeout: DEFAULT_CASE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, case_timeout: Duration) -> Self {
        self.case_timeout = case_timeout;
        self
    }

    /// Run `source` once per case and compare transcripts. Comparison
    /// ignores leading and trailing whitespace on both sides.
    pub fn run_tests(&self, source: &str, cases: &[TestCase]) -> TestReport {
        let mut report = TestReport::default();
        for (index, case) in cases.iter().enumerate() {
            // A fresh executor per case keeps runs fully isolated
            let mut executor = StepExecutor::strict(self.policy.clone());
            let input = InputScript::new(case.inputs.clone());
            let outcome = executor.exec(source, input, Some(self.case_timeout));

            let actual = executor.output().trim().to_string();
            let expected = case.expected_output.trim().to_string();
            let error = outcome.err().map(|e| e.to_string());
            let passed = error.is_none() && actual == expected;

            tracing::debug!(case = index + 1, passed, "case finished");
            report.results.push(CaseResult {
                case_number: index + 1,
                passed,
                inputs: case.inputs.clone(),
                expected,
                actual,
                error,
            });
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case(inputs: &[&str], expected: &str) -> TestCase {
        TestCase {
            inputs: inputs.iter().map(|s| s.to_string()).collect(),
            expected_output: expected.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_passing_cases() {
        let source = "n = int(input())\nprint(n * 2)\n";
        let report = TestRunner::new().run_tests(
            source,
            &[case(&["3"], "6"), case(&["10"], "20")],
        );
        assert!(report.success());
        assert_eq!(report.passed(), 2);
    }

    #[test]
    fn test_failing_case_keeps_actual_output() {
        let source = "n = int(input())\nprint(n + 1)\n";
        let report = TestRunner::new().run_tests(source, &[case(&["3"], "6")]);
        assert!(!report.success());
        assert_eq!(report.results[0].inputs, vec!["3".to_string()]);
        assert_eq!(report.results[0].actual, "4");
        assert_eq!(report.results[0].expected, "6");
        assert!(report.results[0].error.is_none());
    }

    #[test]
    fn test_runtime_error_fails_case() {
        let source = "n = int(input())\nprint(n / 0)\n";
        let report = TestRunner::new().run_tests(source, &[case(&["3"], "1")]);
        assert!(!report.success());
        assert!(report.results[0]
            .error
            .as_deref()
            .unwrap()
            .contains("division by zero"));
    }

    #[test]
    fn test_cases_are_isolated() {
        // Each case replays the program from scratch with its own input
        let source = "total = int(input())\ntotal = total + int(input())\nprint(total)\n";
        let report = TestRunner::new().run_tests(
            source,
            &[case(&["1", "2"], "3"), case(&["10", "20"], "30")],
        );
        assert!(report.success());
    }

    #[test]
    fn test_multiline_output_comparison_trims_edges() {
        let source = "print(1)\nprint(2)\n";
        let report = TestRunner::new().run_tests(source, &[case(&[], "1\n2\n")]);
        assert!(report.success());
    }

    #[test]
    fn test_wall_clock_timeout() {
        let mut policy = SandboxPolicy::new();
        // Raise the operation ceiling so the deadline fires first
        policy.max_operations = u64::MAX;
        let runner =
            TestRunner::with_policy(policy).with_timeout(Duration::from_millis(50));
        let report = runner.run_tests("while True:\n    pass\n", &[case(&[], "")]);
        assert!(!report.success());
        assert!(report.results[0]
            .error
            .as_deref()
            .unwrap()
            .contains("timed out"));
    }

    #[test]
    fn test_catalog_parsing_and_lookup() {
        let json = r#"{
            "themes": [
                {
                    "name": "arithmetic",
                    "tasks": [
                        {
                            "name": "doubling",
                            "description": "Read a number, print its double.",
                            "cases": [
                                {"inputs": ["4"], "expected_output": "8"}
                            ]
                        }
                    ]
                }
            ]
        }"#;
        let catalog = TaskCatalog::from_json(json).unwrap();
        let task = catalog.find_task("arithmetic", "doubling").unwrap();
        assert_eq!(task.cases.len(), 1);
        assert_eq!(task.cases[0].inputs, vec!["4".to_string()]);
        assert!(catalog.find_task("arithmetic", "missing").is_none());
    }

    #[test]
    fn test_catalog_case_runs_end_to_end() {
        let json = r#"{"themes":[{"name":"t","tasks":[{"name":"double","cases":[{"inputs":["4"],"expected_output":"8"}]}]}]}"#;
        let catalog = TaskCatalog::from_json(json).unwrap();
        let task = catalog.find_task("t", "double").unwrap();
        let report = TestRunner::new().run_tests("n = int(input())\nprint(n * 2)\n", &task.cases);
        assert!(report.success());
    }
}
