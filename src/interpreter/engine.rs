//! Step-recording execution engine
//!
//! [`StepExecutor`] walks the syntax tree directly. Two entry points exist:
//!
//! - [`StepExecutor::run`] is the interactive path: validate, parse, execute
//!   with step recording on, and keep the whole timeline for the navigator.
//!   Any failure becomes one trailing exception step so learners see where
//!   the program died.
//! - [`StepExecutor::exec`] is the replay path used by the test runner:
//!   scripted stdin, a wall-clock deadline, the strict builtin profile, and
//!   no step recording.
//!
//! Steps are recorded only for the module frame. A statement inside a
//! function body never produces a step of its own; its effects surface in
//! the snapshot taken after the module-level statement that called it.
//! Simple statements record after they execute, so the captured variables
//! are post-state and print output lands on the line that produced it. Loop
//! headers record once per condition check (including the final false one),
//! `for` headers once per binding plus once on exhaustion, and `if` headers
//! once after branch selection.

use crate::interpreter::builtins::{
    call_builtin, compare_values, iter_value, numeric_add, numeric_pow,
};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::methods::apply_method;
use crate::interpreter::modules::{call_module_function, load_module};
use crate::interpreter::value::{ClassObject, FunctionObject, InstanceObject, Value};
use crate::parser::ast::{BinOp, Expr, SourceLocation, Stmt, UnOp};
use crate::parser::parser::Parser;
use crate::sandbox::{
    BuiltinProfile, ImportGuard, OperationGovernor, SandboxPolicy, INTERACTIVE_BUILTINS,
    STRICT_BUILTINS,
};
use crate::snapshot::{ExecutionStep, OutputBuffer, RenderableValue, StepEvent};
use crate::validator::{StaticValidator, Validation};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Ceiling on recorded steps for one interactive run. Execution continues
/// past it under the operation governor; recording stops.
pub const DEFAULT_MAX_STEPS: usize = 1_000;

/// Call-stack depth cap
pub const MAX_CALL_DEPTH: usize = 64;

/// Lifecycle of one executor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecState {
    Idle,
    Validating,
    Parsing,
    Running,
    Completed,
    Failed,
}

/// Scripted stdin for the replay path
#[derive(Debug, Clone, Default)]
pub struct InputScript {
    lines: Vec<String>,
    position: usize,
}

impl InputScript {
    pub fn new(lines: Vec<String>) -> Self {
        InputScript { lines, position: 0 }
    }

    fn next_line(&mut self) -> Option<String> {
        let line = self.lines.get(self.position).cloned();
        if line.is_some() {
            self.position += 1;
        }
        line
    }
}

/// Statement-level control flow
enum Flow {
    Normal,
    Break(SourceLocation),
    Continue(SourceLocation),
    Return(Value),
}

/// One namespace, iteration in definition order
#[derive(Debug, Default)]
struct Namespace {
    values: FxHashMap<String, Value>,
    order: Vec<String>,
}

impl Namespace {
    fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    fn set(&mut self, name: &str, value: Value) {
        if !self.values.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.values.insert(name.to_string(), value);
    }

    fn iter_ordered(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.order
            .iter()
            .filter_map(|name| self.values.get(name).map(|v| (name, v)))
    }
}

#[derive(Debug)]
struct Frame {
    name: String,
    locals: Namespace,
}

impl Frame {
    fn new(name: impl Into<String>) -> Self {
        Frame {
            name: name.into(),
            locals: Namespace::default(),
        }
    }
}

/// The tree-walking executor
pub struct StepExecutor {
    policy: SandboxPolicy,
    profile: BuiltinProfile,
    max_steps: usize,
    max_call_depth: usize,
    on_step: Option<Box<dyn FnMut(&ExecutionStep)>>,
    governor: OperationGovernor,
    guard: ImportGuard,
    frames: Vec<Frame>,
    steps: Vec<ExecutionStep>,
    output: OutputBuffer,
    input: InputScript,
    deadline: Option<Instant>,
    recording: bool,
    state: ExecState,
    last_error: Option<String>,
    validation: Option<Validation>,
    source_lines: Vec<String>,
    failed_in: Option<String>,
}

impl Default for StepExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl StepExecutor {
    /// Interactive executor: full builtin profile, step recording on
    pub fn new() -> Self {
        Self::with_profile(SandboxPolicy::new(), BuiltinProfile::Interactive)
    }

    /// Replay executor: strict builtin profile, step recording off
    pub fn strict(policy: SandboxPolicy) -> Self {
        Self::with_profile(policy, BuiltinProfile::Strict)
    }

    fn with_profile(policy: SandboxPolicy, profile: BuiltinProfile) -> Self {
        let ceiling = policy.max_operations;
        StepExecutor {
            policy,
            profile,
            max_steps: DEFAULT_MAX_STEPS,
            max_call_depth: MAX_CALL_DEPTH,
            on_step: None,
            governor: OperationGovernor::new(ceiling),
            guard: ImportGuard::new(),
            frames: vec![Frame::new("<module>")],
            steps: Vec::new(),
            output: OutputBuffer::new(),
            input: InputScript::default(),
            deadline: None,
            recording: false,
            state: ExecState::Idle,
            last_error: None,
            validation: None,
            source_lines: Vec::new(),
            failed_in: None,
        }
    }

    /// Cap on recorded steps; execution continues past it
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Cap on the call-frame depth
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    /// Observer called synchronously once per recorded step, in order
    pub fn on_step(mut self, callback: impl FnMut(&ExecutionStep) + 'static) -> Self {
        self.on_step = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> ExecState {
        self.state
    }

    pub fn steps(&self) -> &[ExecutionStep] {
        &self.steps
    }

    pub fn into_steps(self) -> Vec<ExecutionStep> {
        self.steps
    }

    /// Full transcript of everything the program printed
    pub fn output(&self) -> &str {
        self.output.contents()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Validation findings from the most recent `run`
    pub fn validation(&self) -> Option<&Validation> {
        self.validation.as_ref()
    }

    /// Modules the program successfully imported, in import order
    pub fn imported_modules(&self) -> &[String] {
        self.guard.imported_modules()
    }

    /// Discard all per-run state; the policy and profile survive
    pub fn reset(&mut self) {
        self.governor.reset();
        self.guard = ImportGuard::new();
        self.frames = vec![Frame::new("<module>")];
        self.steps.clear();
        self.output.clear();
        self.input = InputScript::default();
        self.deadline = None;
        self.recording = false;
        self.state = ExecState::Idle;
        self.last_error = None;
        self.validation = None;
        self.source_lines.clear();
        self.failed_in = None;
    }

    /// Interactive path: validate, then execute with step recording.
    /// Returns whether execution started: false only when static validation
    /// rejected the program. A runtime fault still counts as started — the
    /// steps up to the fault remain navigable and `state` reports `Failed`.
    pub fn run(&mut self, source: &str) -> bool {
        self.reset();

        self.state = ExecState::Validating;
        let validation = StaticValidator::new().validate(source);
        if !validation.is_valid {
            self.last_error = validation.errors().next().map(|d| d.to_string());
            self.validation = Some(validation);
            self.state = ExecState::Failed;
            return false;
        }
        self.validation = Some(validation);

        self.state = ExecState::Parsing;
        let program = match Parser::new(source).and_then(|mut p| p.parse_program()) {
            Ok(program) => program,
            Err(err) => {
                self.last_error = Some(err.to_string());
                self.state = ExecState::Failed;
                return false;
            }
        };

        self.source_lines = source.lines().map(|l| l.trim_end().to_string()).collect();
        self.recording = true;
        self.state = ExecState::Running;
        tracing::debug!(lines = self.source_lines.len(), "run started");

        match self.exec_body(&program.body) {
            Ok(()) => {
                self.state = ExecState::Completed;
                tracing::debug!(
                    steps = self.steps.len(),
                    operations = self.governor.count(),
                    "run completed"
                );
                true
            }
            Err(err) => {
                if self.recording {
                    self.record_exception(&err);
                }
                self.last_error = Some(err.to_string());
                self.state = ExecState::Failed;
                tracing::debug!(error = %err, "run failed");
                true
            }
        }
    }

    /// Replay path: parse and execute without validation or step recording,
    /// feeding `input` to `input()` and aborting at `timeout`.
    pub fn exec(
        &mut self,
        source: &str,
        input: InputScript,
        timeout: Option<Duration>,
    ) -> Result<(), RuntimeError> {
        self.reset();
        self.input = input;
        self.deadline = timeout.map(|t| Instant::now() + t);

        self.state = ExecState::Parsing;
        let program = Parser::new(source)
            .and_then(|mut p| p.parse_program())
            .map_err(RuntimeError::from)?;

        self.source_lines = source.lines().map(|l| l.trim_end().to_string()).collect();
        self.state = ExecState::Running;

        match self.exec_body(&program.body) {
            Ok(()) => {
                self.state = ExecState::Completed;
                Ok(())
            }
            Err(err) => {
                self.last_error = Some(err.to_string());
                self.state = ExecState::Failed;
                Err(err)
            }
        }
    }

    /// Execute the module body and reject flow that escapes it
    fn exec_body(&mut self, body: &[Stmt]) -> Result<(), RuntimeError> {
        match self.exec_block(body)? {
            Flow::Normal => Ok(()),
            Flow::Break(location) => Err(RuntimeError::Syntax {
                message: "'break' outside loop".to_string(),
                location,
            }),
            Flow::Continue(location) => Err(RuntimeError::Syntax {
                message: "'continue' not properly in loop".to_string(),
                location,
            }),
            // Return is rejected at the statement; it cannot reach here
            Flow::Return(_) => Ok(()),
        }
    }

    fn exec_block(&mut self, body: &[Stmt]) -> Result<Flow, RuntimeError> {
        for stmt in body {
            match self.exec_stmt(stmt)? {
                Flow::Normal => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> Result<Flow, RuntimeError> {
        let location = stmt.location();
        self.governor
            .tick()
            .map_err(|e| RuntimeError::at(e, location))?;
        self.check_deadline(location)?;

        match stmt {
            Stmt::Assign { target, value, location } => {
                let value = self.eval_expr(value)?;
                self.assign_to_place(target, value)?;
                self.record_line_step(location.line)?;
                Ok(Flow::Normal)
            }
            Stmt::AugAssign {
                target,
                op,
                value,
                location,
            } => {
                let current = self.eval_expr(target)?;
                let rhs = self.eval_expr(value)?;
                let updated = apply_binop(*op, &current, &rhs, *location)?;
                self.assign_to_place(target, updated)?;
                self.record_line_step(location.line)?;
                Ok(Flow::Normal)
            }
            Stmt::ExprStatement { expr, location } => {
                self.eval_expr(expr)?;
                self.record_line_step(location.line)?;
                Ok(Flow::Normal)
            }
            Stmt::If {
                branches,
                else_body,
                location,
            } => {
                let mut chosen: Option<&[Stmt]> = None;
                for branch in branches {
                    if self.eval_expr(&branch.condition)?.is_truthy() {
                        chosen = Some(&branch.body);
                        break;
                    }
                }
                self.record_line_step(location.line)?;
                match chosen.or(else_body.as_deref()) {
                    Some(body) => self.exec_block(body),
                    None => Ok(Flow::Normal),
                }
            }
            Stmt::While {
                condition,
                body,
                location,
            } => {
                loop {
                    self.governor
                        .tick()
                        .map_err(|e| RuntimeError::at(e, *location))?;
                    self.check_deadline(*location)?;
                    let keep_going = self.eval_expr(condition)?.is_truthy();
                    self.record_line_step(location.line)?;
                    if !keep_going {
                        break;
                    }
                    match self.exec_block(body)? {
                        Flow::Normal | Flow::Continue(_) => {}
                        Flow::Break(_) => break,
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            }
            Stmt::For {
                target,
                iterable,
                body,
                location,
            } => {
                let value = self.eval_expr(iterable)?;
                // Ranges iterate lazily so the governor gets to tick long
                // before a huge span could ever be materialized
                if let Value::Range(start, stop, step) = value {
                    return self.exec_range_for(target, start, stop, step, body, *location);
                }
                let items = iter_value(&value, *location)?;
                let mut broke = false;
                for item in items {
                    self.governor
                        .tick()
                        .map_err(|e| RuntimeError::at(e, *location))?;
                    self.check_deadline(*location)?;
                    self.current_frame_mut().locals.set(target, item);
                    self.record_line_step(location.line)?;
                    match self.exec_block(body)? {
                        Flow::Normal | Flow::Continue(_) => {}
                        Flow::Break(_) => {
                            broke = true;
                            break;
                        }
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                // Exhaustion check mirrors the failed while-condition step
                if !broke {
                    self.record_line_step(location.line)?;
                }
                Ok(Flow::Normal)
            }
            Stmt::FunctionDef {
                name,
                params,
                body,
                location,
            } => {
                let function = Rc::new(FunctionObject {
                    name: name.clone(),
                    params: params.clone(),
                    body: body.clone(),
                    location: *location,
                });
                self.current_frame_mut()
                    .locals
                    .set(name, Value::Function(function));
                self.record_line_step(location.line)?;
                Ok(Flow::Normal)
            }
            Stmt::ClassDef { name, body, location } => {
                let class = self.build_class(name, body)?;
                self.current_frame_mut()
                    .locals
                    .set(name, Value::Class(Rc::new(class)));
                self.record_line_step(location.line)?;
                Ok(Flow::Normal)
            }
            Stmt::Return { expr, location } => {
                if self.frames.len() == 1 {
                    return Err(RuntimeError::Syntax {
                        message: "'return' outside function".to_string(),
                        location: *location,
                    });
                }
                let value = match expr {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::None,
                };
                Ok(Flow::Return(value))
            }
            Stmt::Break { location } => Ok(Flow::Break(*location)),
            Stmt::Continue { location } => Ok(Flow::Continue(*location)),
            Stmt::Pass { location } => {
                self.record_line_step(location.line)?;
                Ok(Flow::Normal)
            }
            Stmt::Import { module, location } => {
                self.guard
                    .check_import(&self.policy, module)
                    .map_err(|e| RuntimeError::at(e, *location))?;
                let loaded = load_module(module, *location)?;
                self.guard.record(module);
                tracing::debug!(module = %module, "import allowed");
                self.current_frame_mut()
                    .locals
                    .set(module, Value::Module(loaded));
                self.record_line_step(location.line)?;
                Ok(Flow::Normal)
            }
            Stmt::ImportFrom {
                module,
                names,
                location,
            } => {
                self.guard
                    .check_import_from(&self.policy, module, names)
                    .map_err(|e| RuntimeError::at(e, *location))?;
                let loaded = load_module(module, *location)?;
                self.guard.record(module);
                for name in names {
                    let member = loaded.members.get(name).cloned().ok_or_else(|| {
                        RuntimeError::AttributeError {
                            type_name: "module".to_string(),
                            attribute: name.clone(),
                            location: *location,
                        }
                    })?;
                    self.current_frame_mut().locals.set(name, member);
                }
                self.record_line_step(location.line)?;
                Ok(Flow::Normal)
            }
            Stmt::Delete { location, .. } => Err(RuntimeError::Unsupported {
                message: "the del statement is not supported".to_string(),
                location: *location,
            }),
            Stmt::Global { location, .. } => Err(RuntimeError::Unsupported {
                message: "the global statement is not supported".to_string(),
                location: *location,
            }),
            Stmt::Nonlocal { location, .. } => Err(RuntimeError::Unsupported {
                message: "the nonlocal statement is not supported".to_string(),
                location: *location,
            }),
        }
    }

    fn build_class(&mut self, name: &str, body: &[Stmt]) -> Result<ClassObject, RuntimeError> {
        let mut methods: FxHashMap<String, Rc<FunctionObject>> = FxHashMap::default();
        let mut class_attrs: FxHashMap<String, Value> = FxHashMap::default();
        for stmt in body {
            match stmt {
                Stmt::FunctionDef {
                    name: method_name,
                    params,
                    body,
                    location,
                } => {
                    methods.insert(
                        method_name.clone(),
                        Rc::new(FunctionObject {
                            name: format!("{}.{}", name, method_name),
                            params: params.clone(),
                            body: body.clone(),
                            location: *location,
                        }),
                    );
                }
                Stmt::Assign {
                    target: Expr::Name(attr, _),
                    value,
                    ..
                } => {
                    let value = self.eval_expr(value)?;
                    class_attrs.insert(attr.clone(), value);
                }
                Stmt::Pass { .. } => {}
                other => {
                    return Err(RuntimeError::Unsupported {
                        message: "unsupported statement in class body".to_string(),
                        location: other.location(),
                    });
                }
            }
        }
        Ok(ClassObject {
            name: name.to_string(),
            methods,
            class_attrs,
        })
    }

    // ---- expression evaluation ----

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::IntLiteral(n, _) => Ok(Value::Int(*n)),
            Expr::FloatLiteral(x, _) => Ok(Value::Float(*x)),
            Expr::StringLiteral(s, _) => Ok(Value::Str(s.clone())),
            Expr::BoolLiteral(b, _) => Ok(Value::Bool(*b)),
            Expr::NoneLiteral(_) => Ok(Value::None),
            Expr::Name(name, location) => self.lookup_name(name, *location),
            Expr::ListDisplay { items, .. } => {
                Ok(Value::List(self.eval_all(items)?))
            }
            Expr::TupleDisplay { items, .. } => {
                Ok(Value::Tuple(self.eval_all(items)?))
            }
            Expr::SetDisplay { items, .. } => {
                let mut unique: Vec<Value> = Vec::new();
                for item in self.eval_all(items)? {
                    if !unique.contains(&item) {
                        unique.push(item);
                    }
                }
                Ok(Value::Set(unique))
            }
            Expr::DictDisplay { entries, .. } => {
                let mut result: Vec<(Value, Value)> = Vec::new();
                for (key_expr, value_expr) in entries {
                    let key = self.eval_expr(key_expr)?;
                    let value = self.eval_expr(value_expr)?;
                    match result.iter_mut().find(|(k, _)| *k == key) {
                        Some((_, v)) => *v = value,
                        None => result.push((key, value)),
                    }
                }
                Ok(Value::Dict(result))
            }
            Expr::BinaryOp {
                op,
                left,
                right,
                location,
            } => self.eval_binary(*op, left, right, *location),
            Expr::UnaryOp {
                op,
                operand,
                location,
            } => {
                let value = self.eval_expr(operand)?;
                match op {
                    UnOp::Not => Ok(Value::Bool(!value.is_truthy())),
                    UnOp::Neg => match value {
                        Value::Int(n) => Ok(Value::Int(-n)),
                        Value::Float(x) => Ok(Value::Float(-x)),
                        Value::Bool(b) => Ok(Value::Int(-(b as i64))),
                        other => Err(RuntimeError::TypeError {
                            message: format!(
                                "bad operand type for unary -: '{}'",
                                other.type_name()
                            ),
                            location: *location,
                        }),
                    },
                    UnOp::Pos => match value {
                        Value::Int(_) | Value::Float(_) => Ok(value),
                        Value::Bool(b) => Ok(Value::Int(b as i64)),
                        other => Err(RuntimeError::TypeError {
                            message: format!(
                                "bad operand type for unary +: '{}'",
                                other.type_name()
                            ),
                            location: *location,
                        }),
                    },
                }
            }
            Expr::Call {
                callee,
                args,
                location,
            } => {
                if let Expr::Attribute { object, name, .. } = callee.as_ref() {
                    let arg_values = self.eval_all(args)?;
                    return self.call_method(object, name, arg_values, *location);
                }
                let callee_value = self.eval_expr(callee)?;
                let arg_values = self.eval_all(args)?;
                self.call_value(callee_value, arg_values, *location)
            }
            Expr::Attribute {
                object,
                name,
                location,
            } => {
                let object = self.eval_expr(object)?;
                self.attribute_value(&object, name, *location)
            }
            Expr::Index {
                object,
                index,
                location,
            } => {
                let object = self.eval_expr(object)?;
                let index = self.eval_expr(index)?;
                index_value(&object, &index, *location)
            }
        }
    }

    fn eval_all(&mut self, exprs: &[Expr]) -> Result<Vec<Value>, RuntimeError> {
        exprs.iter().map(|e| self.eval_expr(e)).collect()
    }

    fn lookup_name(&self, name: &str, location: SourceLocation) -> Result<Value, RuntimeError> {
        if let Some(value) = self.current_frame().locals.get(name) {
            return Ok(value.clone());
        }
        if self.frames.len() > 1 {
            if let Some(value) = self.frames[0].locals.get(name) {
                return Ok(value.clone());
            }
        }
        if let Some(static_name) = self.builtin_static_name(name) {
            return Ok(Value::Builtin(static_name));
        }
        Err(RuntimeError::NameError {
            name: name.to_string(),
            location,
        })
    }

    fn builtin_static_name(&self, name: &str) -> Option<&'static str> {
        let table = match self.profile {
            BuiltinProfile::Interactive => INTERACTIVE_BUILTINS,
            BuiltinProfile::Strict => STRICT_BUILTINS,
        };
        table.iter().copied().find(|candidate| *candidate == name)
    }

    fn eval_binary(
        &mut self,
        op: BinOp,
        left: &Expr,
        right: &Expr,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        // Short-circuiting operators return the deciding operand, as Python does
        match op {
            BinOp::And => {
                let left = self.eval_expr(left)?;
                if !left.is_truthy() {
                    return Ok(left);
                }
                return self.eval_expr(right);
            }
            BinOp::Or => {
                let left = self.eval_expr(left)?;
                if left.is_truthy() {
                    return Ok(left);
                }
                return self.eval_expr(right);
            }
            _ => {}
        }
        let left = self.eval_expr(left)?;
        let right = self.eval_expr(right)?;
        apply_binop(op, &left, &right, location)
    }

    fn attribute_value(
        &self,
        object: &Value,
        name: &str,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match object {
            Value::Module(module) => {
                module
                    .members
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::AttributeError {
                        type_name: "module".to_string(),
                        attribute: name.to_string(),
                        location,
                    })
            }
            Value::Instance(instance) => {
                let borrowed = instance.borrow();
                if let Some(value) = borrowed.attrs.get(name) {
                    return Ok(value.clone());
                }
                if borrowed.class.methods.contains_key(name) {
                    return Err(RuntimeError::Unsupported {
                        message: format!(
                            "method '{}' must be called, not referenced",
                            name
                        ),
                        location,
                    });
                }
                Err(RuntimeError::AttributeError {
                    type_name: borrowed.class.name.clone(),
                    attribute: name.to_string(),
                    location,
                })
            }
            Value::Class(class) => {
                class
                    .class_attrs
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::AttributeError {
                        type_name: class.name.clone(),
                        attribute: name.to_string(),
                        location,
                    })
            }
            other => Err(RuntimeError::AttributeError {
                type_name: other.type_name().to_string(),
                attribute: name.to_string(),
                location,
            }),
        }
    }

    // ---- calls ----

    fn call_value(
        &mut self,
        callee: Value,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match callee {
            Value::Function(function) => self.call_function(&function, args, location),
            Value::Builtin(name) => self.call_builtin_named(name, args, location),
            Value::Class(class) => self.instantiate(class, args, location),
            other => Err(RuntimeError::TypeError {
                message: format!("'{}' object is not callable", other.type_name()),
                location,
            }),
        }
    }

    /// `for` over a range, one binding at a time. Mirrors the list path but
    /// never builds the element vector, so the operation ceiling is the
    /// effective bound on huge spans.
    fn exec_range_for(
        &mut self,
        target: &str,
        start: i64,
        stop: i64,
        step: i64,
        body: &[Stmt],
        location: SourceLocation,
    ) -> Result<Flow, RuntimeError> {
        let mut current = start;
        let mut broke = false;
        while (step > 0 && current < stop) || (step < 0 && current > stop) {
            self.governor
                .tick()
                .map_err(|e| RuntimeError::at(e, location))?;
            self.check_deadline(location)?;
            self.current_frame_mut().locals.set(target, Value::Int(current));
            self.record_line_step(location.line)?;
            match self.exec_block(body)? {
                Flow::Normal | Flow::Continue(_) => {}
                Flow::Break(_) => {
                    broke = true;
                    break;
                }
                flow @ Flow::Return(_) => return Ok(flow),
            }
            current = match current.checked_add(step) {
                Some(next) => next,
                None => break,
            };
        }
        // Exhaustion check mirrors the failed while-condition step
        if !broke {
            self.record_line_step(location.line)?;
        }
        Ok(Flow::Normal)
    }

    fn call_function(
        &mut self,
        function: &Rc<FunctionObject>,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        if self.frames.len() >= self.max_call_depth {
            return Err(RuntimeError::RecursionLimit { location });
        }
        if args.len() != function.params.len() {
            return Err(RuntimeError::ArgumentCountMismatch {
                name: function.name.clone(),
                expected: function.params.len(),
                given: args.len(),
                location,
            });
        }
        let mut frame = Frame::new(function.name.clone());
        for (param, arg) in function.params.iter().zip(args) {
            frame.locals.set(param, arg);
        }
        self.frames.push(frame);
        let result = self.exec_block(&function.body);
        self.frames.pop();
        match result {
            Ok(Flow::Return(value)) => Ok(value),
            Ok(_) => Ok(Value::None),
            Err(err) => {
                if self.failed_in.is_none() {
                    self.failed_in = Some(function.name.clone());
                }
                Err(err)
            }
        }
    }

    fn instantiate(
        &mut self,
        class: Rc<ClassObject>,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let instance = Rc::new(RefCell::new(InstanceObject {
            class: class.clone(),
            attrs: class.class_attrs.clone(),
        }));
        if let Some(init) = class.methods.get("__init__").cloned() {
            let mut full_args = vec![Value::Instance(instance.clone())];
            full_args.extend(args);
            self.call_function(&init, full_args, location)?;
        } else if !args.is_empty() {
            return Err(RuntimeError::ArgumentCountMismatch {
                name: class.name.clone(),
                expected: 0,
                given: args.len(),
                location,
            });
        }
        Ok(Value::Instance(instance))
    }

    fn call_method(
        &mut self,
        object: &Expr,
        method: &str,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let object_value = self.eval_expr(object)?;
        match object_value {
            Value::Module(module) => {
                let member = module.members.get(method).cloned().ok_or_else(|| {
                    RuntimeError::AttributeError {
                        type_name: "module".to_string(),
                        attribute: method.to_string(),
                        location,
                    }
                })?;
                self.call_value(member, args, location)
            }
            Value::Instance(instance) => {
                let bound = instance.borrow().class.methods.get(method).cloned();
                if let Some(function) = bound {
                    let mut full_args = vec![Value::Instance(instance.clone())];
                    full_args.extend(args);
                    return self.call_function(&function, full_args, location);
                }
                let attr = instance.borrow().attrs.get(method).cloned();
                match attr {
                    Some(value) => self.call_value(value, args, location),
                    None => Err(RuntimeError::AttributeError {
                        type_name: instance.borrow().class.name.clone(),
                        attribute: method.to_string(),
                        location,
                    }),
                }
            }
            mut receiver => {
                let (result, mutated) = apply_method(&mut receiver, method, &args, location)?;
                if mutated {
                    self.assign_to_place(object, receiver)?;
                }
                Ok(result)
            }
        }
    }

    fn call_builtin_named(
        &mut self,
        name: &'static str,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match name {
            "print" => {
                let rendered: Vec<String> = args.iter().map(Value::py_str).collect();
                self.output.print(&rendered.join(" "));
                Ok(Value::None)
            }
            "input" => {
                // The prompt, if any, is not echoed to the transcript
                self.input
                    .next_line()
                    .map(Value::Str)
                    .ok_or(RuntimeError::EndOfInput { location })
            }
            "map" | "filter" => {
                if args.len() != 2 {
                    return Err(RuntimeError::ArgumentCountMismatch {
                        name: name.to_string(),
                        expected: 2,
                        given: args.len(),
                        location,
                    });
                }
                let function = args[0].clone();
                let items = iter_value(&args[1], location)?;
                let mut results = Vec::with_capacity(items.len());
                for item in items {
                    let mapped = self.call_value(function.clone(), vec![item.clone()], location)?;
                    if name == "map" {
                        results.push(mapped);
                    } else if mapped.is_truthy() {
                        results.push(item);
                    }
                }
                Ok(Value::List(results))
            }
            dotted if dotted.contains('.') => call_module_function(dotted, &args, location),
            _ => call_builtin(name, &args, location),
        }
    }

    // ---- assignment places ----

    fn assign_to_place(&mut self, target: &Expr, value: Value) -> Result<(), RuntimeError> {
        match target {
            Expr::Name(name, _) => {
                self.current_frame_mut().locals.set(name, value);
                Ok(())
            }
            Expr::Index {
                object,
                index,
                location,
            } => {
                let index_value = self.eval_expr(index)?;
                let mut container = self.eval_expr(object)?;
                set_index(&mut container, &index_value, value, *location)?;
                self.assign_to_place(object, container)
            }
            Expr::Attribute {
                object,
                name,
                location,
            } => {
                let object_value = self.eval_expr(object)?;
                match object_value {
                    Value::Instance(instance) => {
                        instance.borrow_mut().attrs.insert(name.clone(), value);
                        Ok(())
                    }
                    other => Err(RuntimeError::AttributeError {
                        type_name: other.type_name().to_string(),
                        attribute: name.clone(),
                        location: *location,
                    }),
                }
            }
            other => Err(RuntimeError::TypeError {
                message: "cannot assign to this expression".to_string(),
                location: other.location(),
            }),
        }
    }

    // ---- step recording ----

    fn record_line_step(&mut self, line: usize) -> Result<(), RuntimeError> {
        if !self.recording || self.frames.len() != 1 {
            return Ok(());
        }
        if self.steps.len() >= self.max_steps {
            // The timeline is full; the governor still bounds execution
            self.recording = false;
            tracing::debug!(limit = self.max_steps, "step ceiling reached, recording stopped");
            return Ok(());
        }
        let step = ExecutionStep {
            step_number: self.steps.len(),
            line_number: line,
            source_line: self.source_line(line),
            variables: self.capture_variables(),
            event: StepEvent::Line,
            function_name: None,
            error: None,
            output: self.output.take_fragment(),
        };
        self.steps.push(step);
        self.notify_step();
        Ok(())
    }

    fn record_exception(&mut self, err: &RuntimeError) {
        let line = err.location().line;
        let step = ExecutionStep {
            step_number: self.steps.len(),
            line_number: line,
            source_line: self.source_line(line),
            variables: self.capture_variables(),
            event: StepEvent::Exception,
            function_name: self.failed_in.clone(),
            error: Some(err.to_string()),
            output: self.output.take_fragment(),
        };
        self.steps.push(step);
        self.notify_step();
    }

    fn notify_step(&mut self) {
        if let Some(callback) = self.on_step.as_mut() {
            if let Some(step) = self.steps.last() {
                callback(step);
            }
        }
    }

    fn capture_variables(&self) -> Vec<(String, RenderableValue)> {
        self.frames[0]
            .locals
            .iter_ordered()
            .filter(|(name, value)| {
                !name.starts_with("__") && !matches!(value, Value::Module(_))
            })
            .map(|(name, value)| (name.clone(), RenderableValue::capture(value)))
            .collect()
    }

    fn source_line(&self, line: usize) -> String {
        self.source_lines
            .get(line.saturating_sub(1))
            .cloned()
            .unwrap_or_default()
    }

    fn check_deadline(&self, location: SourceLocation) -> Result<(), RuntimeError> {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(RuntimeError::Timeout { location });
            }
        }
        Ok(())
    }

    fn current_frame(&self) -> &Frame {
        self.frames.last().expect("frame stack is never empty")
    }

    fn current_frame_mut(&mut self) -> &mut Frame {
        self.frames.last_mut().expect("frame stack is never empty")
    }
}

// ---- operators and subscripts ----

fn apply_binop(
    op: BinOp,
    left: &Value,
    right: &Value,
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    let type_error = |symbol: &str| RuntimeError::TypeError {
        message: format!(
            "unsupported operand type(s) for {}: '{}' and '{}'",
            symbol,
            left.type_name(),
            right.type_name()
        ),
        location,
    };
    match op {
        BinOp::Add => match (left, right) {
            (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{}{}", a, b))),
            (Value::List(a), Value::List(b)) => {
                let mut joined = a.clone();
                joined.extend(b.iter().cloned());
                Ok(Value::List(joined))
            }
            (Value::Tuple(a), Value::Tuple(b)) => {
                let mut joined = a.clone();
                joined.extend(b.iter().cloned());
                Ok(Value::Tuple(joined))
            }
            _ => numeric_add(left, right, location),
        },
        BinOp::Sub => match (left, right) {
            (Value::Int(a), Value::Int(b)) => a
                .checked_sub(*b)
                .map(Value::Int)
                .ok_or(RuntimeError::Overflow { location }),
            _ => match (left.as_float(), right.as_float()) {
                (Some(a), Some(b)) => Ok(Value::Float(a - b)),
                _ => Err(type_error("-")),
            },
        },
        BinOp::Mul => match (left, right) {
            (Value::Int(a), Value::Int(b)) => a
                .checked_mul(*b)
                .map(Value::Int)
                .ok_or(RuntimeError::Overflow { location }),
            (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s)) => {
                Ok(Value::Str(s.repeat((*n).max(0) as usize)))
            }
            (Value::List(items), Value::Int(n)) | (Value::Int(n), Value::List(items)) => {
                let mut repeated = Vec::new();
                for _ in 0..(*n).max(0) {
                    repeated.extend(items.iter().cloned());
                }
                Ok(Value::List(repeated))
            }
            _ => match (left.as_float(), right.as_float()) {
                (Some(a), Some(b)) => Ok(Value::Float(a * b)),
                _ => Err(type_error("*")),
            },
        },
        BinOp::Div => match (left.as_float(), right.as_float()) {
            (Some(_), Some(b)) if b == 0.0 => Err(RuntimeError::ZeroDivision { location }),
            (Some(a), Some(b)) => Ok(Value::Float(a / b)),
            _ => Err(type_error("/")),
        },
        BinOp::FloorDiv => match (left, right) {
            (Value::Int(_), Value::Int(0)) => Err(RuntimeError::ZeroDivision { location }),
            (Value::Int(a), Value::Int(b)) => floor_div(*a, *b)
                .map(Value::Int)
                .ok_or(RuntimeError::Overflow { location }),
            _ => match (left.as_float(), right.as_float()) {
                (Some(_), Some(b)) if b == 0.0 => Err(RuntimeError::ZeroDivision { location }),
                (Some(a), Some(b)) => Ok(Value::Float((a / b).floor())),
                _ => Err(type_error("//")),
            },
        },
        BinOp::Mod => match (left, right) {
            (Value::Int(_), Value::Int(0)) => Err(RuntimeError::ZeroDivision { location }),
            (Value::Int(a), Value::Int(b)) => floor_mod(*a, *b)
                .map(Value::Int)
                .ok_or(RuntimeError::Overflow { location }),
            _ => match (left.as_float(), right.as_float()) {
                (Some(_), Some(b)) if b == 0.0 => Err(RuntimeError::ZeroDivision { location }),
                (Some(a), Some(b)) => Ok(Value::Float(a - (a / b).floor() * b)),
                _ => Err(type_error("%")),
            },
        },
        BinOp::Pow => numeric_pow(left, right, location),
        BinOp::Eq => Ok(Value::Bool(left == right)),
        BinOp::Ne => Ok(Value::Bool(left != right)),
        BinOp::Lt => Ok(Value::Bool(
            compare_values(left, right, location)? == Ordering::Less,
        )),
        BinOp::Le => Ok(Value::Bool(
            compare_values(left, right, location)? != Ordering::Greater,
        )),
        BinOp::Gt => Ok(Value::Bool(
            compare_values(left, right, location)? == Ordering::Greater,
        )),
        BinOp::Ge => Ok(Value::Bool(
            compare_values(left, right, location)? != Ordering::Less,
        )),
        BinOp::In => membership(left, right, location).map(Value::Bool),
        BinOp::NotIn => membership(left, right, location).map(|found| Value::Bool(!found)),
        // Short-circuit operators never reach here
        BinOp::And | BinOp::Or => unreachable!("logical operators are evaluated lazily"),
    }
}

/// Python floor division: rounds toward negative infinity. `None` when the
/// quotient leaves the i64 range (i64::MIN // -1); callers rule out b == 0.
fn floor_div(a: i64, b: i64) -> Option<i64> {
    let quotient = a.checked_div(b)?;
    if a % b != 0 && (a < 0) != (b < 0) {
        quotient.checked_sub(1)
    } else {
        Some(quotient)
    }
}

fn floor_mod(a: i64, b: i64) -> Option<i64> {
    // Any multiple of 1 or -1 divides exactly
    if b == 1 || b == -1 {
        return Some(0);
    }
    floor_div(a, b)?.checked_mul(b).and_then(|p| a.checked_sub(p))
}

fn membership(
    needle: &Value,
    haystack: &Value,
    location: SourceLocation,
) -> Result<bool, RuntimeError> {
    match haystack {
        Value::Str(s) => match needle {
            Value::Str(sub) => Ok(s.contains(sub.as_str())),
            other => Err(RuntimeError::TypeError {
                message: format!(
                    "'in <string>' requires string as left operand, not {}",
                    other.type_name()
                ),
                location,
            }),
        },
        Value::Dict(entries) => Ok(entries.iter().any(|(k, _)| k == needle)),
        _ => Ok(iter_value(haystack, location)?.contains(needle)),
    }
}

fn index_value(
    object: &Value,
    index: &Value,
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    match object {
        Value::List(items) | Value::Tuple(items) => {
            let position = sequence_index(items.len(), index, location)?;
            Ok(items[position].clone())
        }
        Value::Str(s) => {
            let chars: Vec<char> = s.chars().collect();
            let position = sequence_index(chars.len(), index, location)?;
            Ok(Value::Str(chars[position].to_string()))
        }
        Value::Dict(entries) => entries
            .iter()
            .find(|(k, _)| k == index)
            .map(|(_, v)| v.clone())
            .ok_or_else(|| RuntimeError::KeyError {
                key: index.py_repr(),
                location,
            }),
        other => Err(RuntimeError::TypeError {
            message: format!("'{}' object is not subscriptable", other.type_name()),
            location,
        }),
    }
}

fn sequence_index(
    len: usize,
    index: &Value,
    location: SourceLocation,
) -> Result<usize, RuntimeError> {
    let raw = index.as_int().ok_or_else(|| RuntimeError::TypeError {
        message: format!("indices must be integers, not {}", index.type_name()),
        location,
    })?;
    let adjusted = if raw < 0 { raw + len as i64 } else { raw };
    if adjusted < 0 || adjusted >= len as i64 {
        return Err(RuntimeError::IndexError { location });
    }
    Ok(adjusted as usize)
}

fn set_index(
    container: &mut Value,
    index: &Value,
    value: Value,
    location: SourceLocation,
) -> Result<(), RuntimeError> {
    match container {
        Value::List(items) => {
            let position = sequence_index(items.len(), index, location)?;
            items[position] = value;
            Ok(())
        }
        Value::Dict(entries) => {
            match entries.iter_mut().find(|(k, _)| k == index) {
                Some((_, v)) => *v = value,
                None => entries.push((index.clone(), value)),
            }
            Ok(())
        }
        other => Err(RuntimeError::TypeError {
            message: format!(
                "'{}' object does not support item assignment",
                other.type_name()
            ),
            location,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_source(source: &str) -> StepExecutor {
        let mut executor = StepExecutor::new();
        executor.run(source);
        executor
    }

    #[test]
    fn test_three_line_program_records_three_steps() {
        let executor = run_source("a = 2\nb = 3\nprint(a + b)\n");
        assert_eq!(executor.state(), ExecState::Completed);
        assert_eq!(executor.steps().len(), 3);
        assert_eq!(executor.steps()[2].output, "5");
        assert_eq!(executor.steps()[2].line_number, 3);
    }

    #[test]
    fn test_steps_are_gapless_and_zero_based() {
        let executor = run_source("x = 1\ny = 2\nz = x + y\n");
        for (i, step) in executor.steps().iter().enumerate() {
            assert_eq!(step.step_number, i);
        }
    }

    #[test]
    fn test_snapshot_is_post_state() {
        let executor = run_source("items = [1]\nitems.append(2)\n");
        let steps = executor.steps();
        assert_eq!(steps[0].variable("items").unwrap().render(), "[1]");
        assert_eq!(steps[1].variable("items").unwrap().render(), "[1, 2]");
    }

    #[test]
    fn test_snapshots_are_frozen_copies() {
        let executor = run_source("items = [1]\nitems.append(2)\nitems.append(3)\n");
        // Earlier steps keep the value as it was, later mutation notwithstanding
        assert_eq!(
            executor.steps()[0].variable("items").unwrap().render(),
            "[1]"
        );
        assert_eq!(
            executor.steps()[2].variable("items").unwrap().render(),
            "[1, 2, 3]"
        );
    }

    #[test]
    fn test_while_headers_record_per_check() {
        let executor = run_source("i = 0\nwhile i < 2:\n    i = i + 1\n");
        // assign, check(true), body, check(true), body, check(false)
        assert_eq!(executor.steps().len(), 6);
        let header_steps: Vec<_> = executor
            .steps()
            .iter()
            .filter(|s| s.line_number == 2)
            .collect();
        assert_eq!(header_steps.len(), 3);
    }

    #[test]
    fn test_for_loop_steps() {
        let executor = run_source("total = 0\nfor n in range(3):\n    total = total + n\n");
        assert_eq!(executor.state(), ExecState::Completed);
        // assign + 3x(binding, body) + exhaustion
        assert_eq!(executor.steps().len(), 8);
        let last = executor.steps().last().unwrap();
        assert_eq!(last.variable("total").unwrap().render(), "3");
    }

    #[test]
    fn test_function_bodies_do_not_record() {
        let source = "def double(n):\n    m = n * 2\n    return m\nresult = double(4)\n";
        let executor = run_source(source);
        assert_eq!(executor.state(), ExecState::Completed);
        // def + assignment; nothing from inside the function body
        assert_eq!(executor.steps().len(), 2);
        assert_eq!(
            executor.steps()[1].variable("result").unwrap().render(),
            "8"
        );
        assert!(executor.steps().iter().all(|s| s.line_number != 2));
    }

    #[test]
    fn test_runtime_error_records_exception_step() {
        let executor = run_source("x = 1\ny = x / 0\n");
        assert_eq!(executor.state(), ExecState::Failed);
        let last = executor.steps().last().unwrap();
        assert_eq!(last.event, StepEvent::Exception);
        assert_eq!(last.line_number, 2);
        assert!(last
            .error
            .as_deref()
            .unwrap()
            .contains("division by zero"));
        // The pre-error step survives
        assert_eq!(executor.steps()[0].variable("x").unwrap().render(), "1");
    }

    #[test]
    fn test_validation_failure_produces_no_steps() {
        let mut executor = StepExecutor::new();
        assert!(!executor.run("import os\n"));
        assert_eq!(executor.state(), ExecState::Failed);
        assert!(executor.steps().is_empty());
        assert!(executor.last_error().is_some());
    }

    #[test]
    fn test_unbounded_loop_hits_operation_ceiling() {
        let executor = run_source("while True:\n    pass\n");
        assert_eq!(executor.state(), ExecState::Failed);
        assert!(executor
            .last_error()
            .unwrap()
            .contains("operation ceiling exceeded"));
    }

    #[test]
    fn test_run_is_repeatable() {
        let mut executor = StepExecutor::new();
        executor.run("x = 1\n");
        let first = executor.steps().len();
        executor.run("x = 1\n");
        assert_eq!(executor.steps().len(), first);
        assert_eq!(executor.state(), ExecState::Completed);
    }

    #[test]
    fn test_runs_are_isolated() {
        let mut executor = StepExecutor::new();
        executor.run("x = 1\n");
        // The second run starts (validation passes) but faults on the stale name
        assert!(executor.run("print(x)\n"));
        assert_eq!(executor.state(), ExecState::Failed);
        assert!(executor.last_error().unwrap().contains("NameError"));
    }

    #[test]
    fn test_run_reports_started_for_runtime_faults() {
        let mut executor = StepExecutor::new();
        assert!(executor.run("x = 1\ny = x / 0\n"));
        assert_eq!(executor.state(), ExecState::Failed);
        // Only validation failures report not-started
        assert!(!executor.run("import os\n"));
    }

    #[test]
    fn test_if_elif_else() {
        let executor = run_source("x = 5\nif x < 0:\n    sign = -1\nelif x == 0:\n    sign = 0\nelse:\n    sign = 1\nprint(sign)\n");
        assert_eq!(executor.state(), ExecState::Completed);
        assert_eq!(executor.output(), "1\n");
        // assign, header, branch body, print
        assert_eq!(executor.steps().len(), 4);
    }

    #[test]
    fn test_most_recent_print_only_per_step() {
        let source = "def noisy():\n    print(\"a\")\n    print(\"b\")\nnoisy()\n";
        let executor = run_source(source);
        // The call statement's step keeps only the last print
        assert_eq!(executor.steps()[1].output, "b");
        // The transcript keeps both
        assert_eq!(executor.output(), "a\nb\n");
    }

    #[test]
    fn test_import_allowed_on_replay_path() {
        // The validator rejects imports interactively; the replay path runs
        // them under the import guard instead
        let mut executor = StepExecutor::strict(SandboxPolicy::new());
        executor
            .exec(
                "import math\nprint(math.sqrt(16))\n",
                InputScript::default(),
                None,
            )
            .unwrap();
        assert_eq!(executor.output(), "4.0\n");
        assert_eq!(executor.imported_modules(), &["math".to_string()]);
    }

    #[test]
    fn test_from_import_member_checks() {
        let mut executor = StepExecutor::strict(SandboxPolicy::new());
        executor
            .exec(
                "from math import pi\nprint(pi > 3)\n",
                InputScript::default(),
                None,
            )
            .unwrap();
        assert_eq!(executor.output(), "True\n");

        let mut executor = StepExecutor::strict(SandboxPolicy::new());
        let err = executor
            .exec("from math import sqrt\n", InputScript::default(), None)
            .unwrap_err();
        assert!(matches!(err, RuntimeError::MemberDenied { .. }));
    }

    #[test]
    fn test_forbidden_import_denied_at_runtime() {
        let mut executor = StepExecutor::strict(SandboxPolicy::new());
        let err = executor
            .exec("import os\n", InputScript::default(), None)
            .unwrap_err();
        assert!(matches!(err, RuntimeError::ImportDenied { .. }));
    }

    #[test]
    fn test_class_definition_and_instance() {
        let source = "class Point:\n    def __init__(self, x, y):\n        self.x = x\n        self.y = y\n    def total(self):\n        return self.x + self.y\np = Point(2, 3)\nprint(p.total())\n";
        let executor = run_source(source);
        assert_eq!(executor.state(), ExecState::Completed);
        assert_eq!(executor.output(), "5\n");
    }

    #[test]
    fn test_recursion_limit() {
        let executor = run_source("def f(n):\n    return f(n + 1)\nf(0)\n");
        assert_eq!(executor.state(), ExecState::Failed);
        assert!(executor.last_error().unwrap().contains("recursion"));
    }

    #[test]
    fn test_exec_with_scripted_input() {
        let mut executor = StepExecutor::strict(SandboxPolicy::new());
        let input = InputScript::new(vec!["7".to_string()]);
        executor
            .exec("n = int(input())\nprint(n * 2)\n", input, None)
            .unwrap();
        assert_eq!(executor.output(), "14\n");
        assert!(executor.steps().is_empty());
    }

    #[test]
    fn test_exec_exhausted_input() {
        let mut executor = StepExecutor::strict(SandboxPolicy::new());
        let err = executor
            .exec("a = input()\nb = input()\n", InputScript::new(vec!["x".to_string()]), None)
            .unwrap_err();
        assert!(matches!(err, RuntimeError::EndOfInput { .. }));
    }

    #[test]
    fn test_input_unavailable_interactively() {
        let executor = run_source("x = 1\n");
        assert_eq!(executor.state(), ExecState::Completed);
        // input is rejected by the validator before execution starts
        let mut executor = StepExecutor::new();
        assert!(!executor.run("n = input()\n"));
        assert!(executor.last_error().unwrap().contains("input"));
    }

    #[test]
    fn test_nested_index_assignment() {
        let executor = run_source("grid = [[0, 0], [0, 0]]\ngrid[1][0] = 5\nprint(grid)\n");
        assert_eq!(executor.output(), "[[0, 0], [5, 0]]\n");
    }

    #[test]
    fn test_floor_div_and_mod_signs() {
        let executor = run_source("print(-7 // 2)\nprint(-7 % 2)\nprint(7 // -2)\n");
        assert_eq!(executor.output(), "-4\n1\n-4\n");
    }

    #[test]
    fn test_break_and_continue() {
        let source = "total = 0\nfor n in range(10):\n    if n == 3:\n        continue\n    if n == 5:\n        break\n    total = total + n\nprint(total)\n";
        let executor = run_source(source);
        // 0 + 1 + 2 + 4
        assert_eq!(executor.output(), "7\n");
    }

    #[test]
    fn test_string_formatting_of_floats() {
        let executor = run_source("x = 4 / 2\nprint(x)\n");
        assert_eq!(executor.output(), "2.0\n");
    }

    #[test]
    fn test_step_callback_sees_each_step_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut executor = StepExecutor::new().on_step(move |step| {
            sink.borrow_mut().push(step.step_number);
        });
        assert!(executor.run("a = 1\nb = 2\nc = 3\n"));
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_step_ceiling_stops_recording_not_execution() {
        let mut executor = StepExecutor::new().with_max_steps(2);
        assert!(executor.run("a = 1\nb = 2\nc = 3\nprint(a + b + c)\n"));
        assert_eq!(executor.steps().len(), 2);
        assert_eq!(executor.output(), "6\n");
    }

    #[test]
    fn test_call_depth_is_configurable() {
        let mut executor = StepExecutor::new().with_max_call_depth(4);
        assert!(executor.run(
            "def f(n):\n    if n == 0:\n        return 0\n    return f(n - 1)\nf(10)\n"
        ));
        assert_eq!(executor.state(), ExecState::Failed);
        assert!(executor.last_error().unwrap().contains("recursion"));
    }

    #[test]
    fn test_integer_overflow_is_a_runtime_fault() {
        let executor = run_source("x = 9223372036854775807\ny = x + 1\n");
        assert_eq!(executor.state(), ExecState::Failed);
        assert!(executor.last_error().unwrap().contains("OverflowError"));
        let last = executor.steps().last().unwrap();
        assert_eq!(last.event, StepEvent::Exception);
    }

    #[test]
    fn test_power_overflow_is_a_runtime_fault() {
        let executor = run_source("x = 10 ** 30\n");
        assert_eq!(executor.state(), ExecState::Failed);
        assert!(executor.last_error().unwrap().contains("OverflowError"));

        // Degenerate bases stay exact no matter the exponent
        let executor = run_source("print(1 ** 123456789012)\nprint((-1) ** 3)\n");
        assert_eq!(executor.state(), ExecState::Completed);
        assert_eq!(executor.output(), "1\n-1\n");
    }

    #[test]
    fn test_huge_range_loop_returns_control() {
        // The span never materializes; the governor stops the loop
        let executor = run_source("for i in range(1000000000000):\n    pass\n");
        assert_eq!(executor.state(), ExecState::Failed);
        assert!(executor
            .last_error()
            .unwrap()
            .contains("operation ceiling exceeded"));
    }
}
