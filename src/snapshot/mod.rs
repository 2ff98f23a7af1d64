//! Execution steps and output capture
//!
//! An [`ExecutionStep`] is one frame of the recorded timeline: the line that
//! ran, a rendered snapshot of every module-level variable after it ran, and
//! the print output that line produced. Steps are immutable once recorded;
//! the navigator only ever reads them.
//!
//! Variable snapshots go through [`RenderableValue::capture`], which
//! classifies each value as a scalar, a collection, or an opaque placeholder.
//! Functions, classes, and modules are deliberately rendered as placeholders
//! so a step never retains a handle into the interpreter's live state.

use crate::interpreter::value::Value;
use std::fmt;

/// Why a step was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// A statement or loop-header check on this line completed normally
    Line,
    /// Execution of this line raised; the step carries the error text
    Exception,
}

/// A variable's value as captured into a step
#[derive(Debug, Clone, PartialEq)]
pub enum RenderableValue {
    /// None, bool, int, float, or str, copied whole
    Scalar(Value),
    /// list, tuple, dict, or set, deep-copied at capture time
    Collection(Value),
    /// Anything else, reduced to a display placeholder
    Opaque(String),
}

impl RenderableValue {
    /// Classify and copy one runtime value. The returned value shares no
    /// mutable state with the interpreter.
    pub fn capture(value: &Value) -> RenderableValue {
        if value.is_scalar() {
            RenderableValue::Scalar(value.clone())
        } else if value.is_collection() {
            RenderableValue::Collection(deep_copy(value))
        } else {
            RenderableValue::Opaque(value.py_repr())
        }
    }

    /// The rendered text shown in the variables pane
    pub fn render(&self) -> String {
        match self {
            RenderableValue::Scalar(v) | RenderableValue::Collection(v) => v.py_repr(),
            RenderableValue::Opaque(text) => text.clone(),
        }
    }
}

impl fmt::Display for RenderableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Recursively copy a collection so later mutation cannot reach the snapshot.
/// Opaque elements nested inside collections become placeholders too.
fn deep_copy(value: &Value) -> Value {
    match value {
        Value::List(items) => Value::List(items.iter().map(deep_copy).collect()),
        Value::Tuple(items) => Value::Tuple(items.iter().map(deep_copy).collect()),
        Value::Set(items) => Value::Set(items.iter().map(deep_copy).collect()),
        Value::Dict(entries) => Value::Dict(
            entries
                .iter()
                .map(|(k, v)| (deep_copy(k), deep_copy(v)))
                .collect(),
        ),
        v if v.is_scalar() => v.clone(),
        Value::Range(a, b, c) => Value::Range(*a, *b, *c),
        other => Value::Str(other.py_repr()),
    }
}

/// One recorded frame of a program run
#[derive(Debug, Clone)]
pub struct ExecutionStep {
    /// 0-based, gapless position in the timeline
    pub step_number: usize,
    /// 1-based source line the step describes
    pub line_number: usize,
    /// Text of that source line, trimmed of trailing whitespace
    pub source_line: String,
    /// Name/rendered-value pairs for every visible module-level variable,
    /// in definition order
    pub variables: Vec<(String, RenderableValue)>,
    pub event: StepEvent,
    /// Name of the function being stepped, or `None` at module level
    pub function_name: Option<String>,
    /// Error text when `event` is [`StepEvent::Exception`]
    pub error: Option<String>,
    /// Print output this step produced (most recent print on the line)
    pub output: String,
}

impl ExecutionStep {
    /// Look up one captured variable by name
    pub fn variable(&self, name: &str) -> Option<&RenderableValue> {
        self.variables
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }
}

/// Captured program output for one run.
///
/// Two views coexist: `contents` accumulates the whole transcript (the test
/// runner compares against it), while `take_fragment` hands out only the most
/// recent print since the last take (the step recorder attaches it to the
/// step for the producing line).
#[derive(Debug, Default)]
pub struct OutputBuffer {
    captured: String,
    last_render: Option<String>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        OutputBuffer::default()
    }

    /// Record one print call's rendered line (no trailing newline)
    pub fn print(&mut self, text: &str) {
        self.captured.push_str(text);
        self.captured.push('\n');
        self.last_render = Some(text.to_string());
    }

    /// Output produced since the last take; empty when nothing printed.
    /// When several prints ran, only the most recent one is returned.
    pub fn take_fragment(&mut self) -> String {
        self.last_render.take().unwrap_or_default()
    }

    /// The full transcript so far
    pub fn contents(&self) -> &str {
        &self.captured
    }

    pub fn clear(&mut self) {
        self.captured.clear();
        self.last_render = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_classification() {
        assert!(matches!(
            RenderableValue::capture(&Value::Int(1)),
            RenderableValue::Scalar(_)
        ));
        assert!(matches!(
            RenderableValue::capture(&Value::List(vec![])),
            RenderableValue::Collection(_)
        ));
        let opaque = RenderableValue::capture(&Value::Builtin("len"));
        assert_eq!(opaque, RenderableValue::Opaque("<built-in function len>".to_string()));
    }

    #[test]
    fn test_capture_copies_collections() {
        let mut live = vec![Value::Int(1)];
        let captured = RenderableValue::capture(&Value::List(live.clone()));
        live.push(Value::Int(2));
        assert_eq!(captured.render(), "[1]");
    }

    #[test]
    fn test_nested_opaque_becomes_placeholder() {
        let value = Value::List(vec![Value::Builtin("len")]);
        let captured = RenderableValue::capture(&value);
        assert_eq!(captured.render(), "['<built-in function len>']");
    }

    #[test]
    fn test_output_buffer_views() {
        let mut buffer = OutputBuffer::new();
        buffer.print("1");
        buffer.print("2");
        // Fragment keeps only the most recent print
        assert_eq!(buffer.take_fragment(), "2");
        assert_eq!(buffer.take_fragment(), "");
        // Transcript keeps everything
        assert_eq!(buffer.contents(), "1\n2\n");
    }

    #[test]
    fn test_step_variable_lookup() {
        let step = ExecutionStep {
            step_number: 1,
            line_number: 1,
            source_line: "x = 1".to_string(),
            variables: vec![("x".to_string(), RenderableValue::Scalar(Value::Int(1)))],
            event: StepEvent::Line,
            function_name: None,
            error: None,
            output: String::new(),
        };
        assert_eq!(step.variable("x").unwrap().render(), "1");
        assert!(step.variable("y").is_none());
    }
}
