// Integration tests for the replay path and the test runner

use pystep::interpreter::engine::{InputScript, StepExecutor};
use pystep::sandbox::SandboxPolicy;
use pystep::testing::{TaskCatalog, TestCase, TestRunner};
use std::time::Duration;

fn case(inputs: &[&str], expected: &str) -> TestCase {
    TestCase {
        inputs: inputs.iter().map(|s| s.to_string()).collect(),
        expected_output: expected.to_string(),
        description: String::new(),
    }
}

#[test]
fn test_doubling_task() {
    let source = "n = int(input())\nprint(n * 2)\n";
    let report = TestRunner::new().run_tests(
        source,
        &[case(&["2"], "4"), case(&["0"], "0"), case(&["-3"], "-6")],
    );
    assert!(report.success());
    assert_eq!(report.passed(), 3);
    assert_eq!(report.total(), 3);
}

#[test]
fn test_multi_input_program() {
    let source = "\
a = int(input())
b = int(input())
if a > b:
    print(a)
else:
    print(b)
";
    let report = TestRunner::new().run_tests(
        source,
        &[case(&["3", "7"], "7"), case(&["9", "2"], "9")],
    );
    assert!(report.success());
}

#[test]
fn test_partial_failure_reports_each_case() {
    // Wrong for negative numbers on purpose
    let source = "n = int(input())\nprint(n * n)\n";
    let report = TestRunner::new().run_tests(
        source,
        &[case(&["3"], "9"), case(&["-2"], "-4")],
    );
    assert!(!report.success());
    assert_eq!(report.passed(), 1);
    assert!(report.results[0].passed);
    assert!(!report.results[1].passed);
    // The failing case carries the inputs that produced it
    assert_eq!(report.results[1].inputs, vec!["-2".to_string()]);
    assert_eq!(report.results[1].actual, "4");
}

#[test]
fn test_input_exhaustion_is_a_case_failure() {
    let source = "a = input()\nb = input()\nprint(a + b)\n";
    let report = TestRunner::new().run_tests(source, &[case(&["only-one"], "x")]);
    assert!(!report.success());
    assert!(report.results[0]
        .error
        .as_deref()
        .unwrap()
        .contains("no more input"));
}

#[test]
fn test_cases_never_share_state() {
    let source = "n = int(input())\nprint(n + 1)\n";
    let report = TestRunner::new().run_tests(
        source,
        &[case(&["1"], "2"), case(&["1"], "2"), case(&["1"], "2")],
    );
    assert!(report.success());
}

#[test]
fn test_runaway_program_times_out_per_case() {
    let mut policy = SandboxPolicy::new();
    policy.max_operations = u64::MAX;
    let runner = TestRunner::with_policy(policy).with_timeout(Duration::from_millis(100));

    let report = runner.run_tests(
        "i = 0\nwhile True:\n    i = i + 1\n",
        &[case(&[], ""), case(&[], "")],
    );
    assert_eq!(report.passed(), 0);
    for result in &report.results {
        assert!(result.error.as_deref().unwrap().contains("timed out"));
    }
}

#[test]
fn test_catalog_driven_replay() {
    let json = r#"{
        "themes": [
            {
                "name": "loops",
                "tasks": [
                    {
                        "name": "countdown",
                        "description": "Print n down to 1.",
                        "cases": [
                            {"inputs": ["3"], "expected_output": "3\n2\n1"},
                            {"inputs": ["1"], "expected_output": "1"}
                        ]
                    }
                ]
            }
        ]
    }"#;
    let catalog = TaskCatalog::from_json(json).unwrap();
    let task = catalog.find_task("loops", "countdown").unwrap();

    let source = "\
n = int(input())
while n > 0:
    print(n)
    n = n - 1
";
    let report = TestRunner::new().run_tests(source, &task.cases);
    assert!(report.success(), "{:?}", report.results);
}

#[test]
fn test_replay_path_skips_step_recording() {
    let mut executor = StepExecutor::strict(SandboxPolicy::new());
    executor
        .exec(
            "x = 1\nfor i in range(10):\n    x = x * 2\nprint(x)\n",
            InputScript::default(),
            None,
        )
        .unwrap();
    assert!(executor.steps().is_empty());
    assert_eq!(executor.output(), "1024\n");
}

#[test]
fn test_strict_profile_rejects_type_introspection() {
    let mut executor = StepExecutor::strict(SandboxPolicy::new());
    let err = executor
        .exec("print(isinstance(1, int))\n", InputScript::default(), None)
        .unwrap_err();
    assert!(err.to_string().contains("isinstance"));
}
