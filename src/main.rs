// pystep: sandboxed step-recording interpreter for a Python-like teaching language

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use pystep::interpreter::engine::{ExecState, StepExecutor};
use pystep::testing::{TaskCatalog, TestRunner};
use pystep::timeline::Timeline;
use pystep::validator::StaticValidator;

fn usage(program_name: &str) {
    eprintln!("Usage:");
    eprintln!("  {} run <file.py>                          step through a program", program_name);
    eprintln!("  {} check <file.py>                        validate without running", program_name);
    eprintln!("  {} test <file.py> <catalog.json> <theme> <task>", program_name);
    eprintln!("                                            replay against a task's cases");
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("pystep");

    if args.len() < 3 {
        usage(program_name);
        return ExitCode::FAILURE;
    }

    let command = args[1].as_str();
    let file = &args[2];
    if !Path::new(file).exists() {
        eprintln!("Error: file '{}' not found", file);
        return ExitCode::FAILURE;
    }
    let source = match fs::read_to_string(file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error reading '{}': {}", file, err);
            return ExitCode::FAILURE;
        }
    };

    match command {
        "run" => run_command(&source),
        "check" => check_command(&source),
        "test" => {
            if args.len() != 6 {
                usage(program_name);
                return ExitCode::FAILURE;
            }
            test_command(&source, &args[3], &args[4], &args[5])
        }
        other => {
            eprintln!("Error: unknown command '{}'", other);
            usage(program_name);
            ExitCode::FAILURE
        }
    }
}

/// Execute the program and print its timeline step by step
fn run_command(source: &str) -> ExitCode {
    let mut executor = StepExecutor::new();

    // False means validation rejected the program before it could start
    if !executor.run(source) {
        match executor.validation().filter(|v| !v.is_valid) {
            Some(validation) => {
                for diagnostic in &validation.diagnostics {
                    eprintln!("{}", diagnostic);
                }
            }
            None => {
                if let Some(error) = executor.last_error() {
                    eprintln!("Error: {}", error);
                }
            }
        }
        return ExitCode::FAILURE;
    }

    if let Some(validation) = executor.validation() {
        for warning in validation.warnings() {
            eprintln!("{}", warning);
        }
    }

    let state = executor.state();
    let mut timeline = Timeline::new(executor.into_steps());
    while let Some(step) = timeline.advance() {
        println!(
            "step {:>4}  line {:>3}  {}",
            step.step_number, step.line_number, step.source_line
        );
        if !step.output.is_empty() {
            println!("           output: {}", step.output);
        }
        if let Some(error) = &step.error {
            println!("           {}", error);
        }
        for (name, value) in &step.variables {
            println!("           {} = {}", name, value);
        }
    }

    if state == ExecState::Completed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Validate only; print every diagnostic
fn check_command(source: &str) -> ExitCode {
    let validation = StaticValidator::new().validate(source);
    for diagnostic in &validation.diagnostics {
        println!("{}", diagnostic);
    }
    if validation.is_valid {
        println!("ok");
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Replay the program against one task's cases from the catalog
fn test_command(source: &str, catalog_path: &str, theme: &str, task_name: &str) -> ExitCode {
    let catalog_text = match fs::read_to_string(catalog_path) {
        Ok(text) => text,
        Err(err) => {
            eprintln!("Error reading '{}': {}", catalog_path, err);
            return ExitCode::FAILURE;
        }
    };
    let catalog = match TaskCatalog::from_json(&catalog_text) {
        Ok(catalog) => catalog,
        Err(err) => {
            eprintln!("Error parsing '{}': {}", catalog_path, err);
            return ExitCode::FAILURE;
        }
    };
    let task = match catalog.find_task(theme, task_name) {
        Some(task) => task,
        None => {
            eprintln!("Error: task '{}/{}' not found in catalog", theme, task_name);
            return ExitCode::FAILURE;
        }
    };

    let report = TestRunner::new().run_tests(source, &task.cases);
    for result in &report.results {
        if result.passed {
            println!("case {}: pass", result.case_number);
        } else {
            println!("case {}: FAIL", result.case_number);
            match &result.error {
                Some(error) => println!("  {}", error),
                None => {
                    println!("  expected: {:?}", result.expected);
                    println!("  actual:   {:?}", result.actual);
                }
            }
        }
    }
    println!("{}/{} cases passed", report.passed(), report.total());

    if report.success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
