//! Runtime value representation
//!
//! [`Value`] is a tagged enum covering every runtime value in the teaching
//! language. Scalars and the built-in collections are stored by value, so
//! cloning a `Value` yields an independent copy one level deep (collection
//! elements that are themselves reference types share their referent, the
//! same shallow-copy rule Python's `list.copy()` follows). Functions,
//! classes, instances, and modules are reference types behind `Rc`.

use crate::parser::ast::{SourceLocation, Stmt};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// A user-defined function
#[derive(Debug)]
pub struct FunctionObject {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
    pub location: SourceLocation,
}

/// A user-defined class: methods plus class-level attribute defaults
#[derive(Debug)]
pub struct ClassObject {
    pub name: String,
    pub methods: FxHashMap<String, Rc<FunctionObject>>,
    pub class_attrs: FxHashMap<String, Value>,
}

/// An instance of a user-defined class
#[derive(Debug)]
pub struct InstanceObject {
    pub class: Rc<ClassObject>,
    pub attrs: FxHashMap<String, Value>,
}

/// A sandboxed module exposed through the import guard
#[derive(Debug)]
pub struct ModuleObject {
    pub name: String,
    pub members: FxHashMap<String, Value>,
}

/// Runtime values
#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    /// Insertion-ordered key/value pairs, as Python dicts are
    Dict(Vec<(Value, Value)>),
    Set(Vec<Value>),
    /// Lazy integer range (start, stop, step); step is never zero
    Range(i64, i64, i64),
    Function(Rc<FunctionObject>),
    /// A builtin callable, identified by name and gated by the profile
    Builtin(&'static str),
    Class(Rc<ClassObject>),
    Instance(Rc<RefCell<InstanceObject>>),
    Module(Rc<ModuleObject>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                *a as f64 == *b
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| {
                        b.iter().any(|(bk, bv)| bk == k && bv == v)
                    })
            }
            (Value::Set(a), Value::Set(b)) => {
                a.len() == b.len() && a.iter().all(|item| b.contains(item))
            }
            (Value::Range(a, b, c), Value::Range(d, e, f)) => (a, b, c) == (d, e, f),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            (Value::Module(a), Value::Module(b)) => a.name == b.name,
            _ => false,
        }
    }
}

impl Value {
    /// The type name learners see in messages and opaque snapshots
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
            Value::Set(_) => "set",
            Value::Range(..) => "range",
            Value::Function(_) => "function",
            Value::Builtin(_) => "builtin_function_or_method",
            Value::Class(_) => "type",
            Value::Instance(_) => "object",
            Value::Module(_) => "module",
        }
    }

    /// Python truthiness
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) | Value::Tuple(items) | Value::Set(items) => !items.is_empty(),
            Value::Dict(entries) => !entries.is_empty(),
            Value::Range(start, stop, step) => range_len(*start, *stop, *step) > 0,
            _ => true,
        }
    }

    /// Whether this is one of the by-value scalar types
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::None | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_)
        )
    }

    /// Whether this is one of the by-value collection types
    pub fn is_collection(&self) -> bool {
        matches!(
            self,
            Value::List(_) | Value::Tuple(_) | Value::Dict(_) | Value::Set(_)
        )
    }

    /// `str()`: what print shows
    pub fn py_str(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            _ => self.py_repr(),
        }
    }

    /// `repr()`: what nested values and the variables pane show
    pub fn py_repr(&self) -> String {
        match self {
            Value::None => "None".to_string(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(x) => format_float(*x),
            Value::Str(s) => format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'")),
            Value::List(items) => {
                let inner: Vec<String> = items.iter().map(|v| v.py_repr()).collect();
                format!("[{}]", inner.join(", "))
            }
            Value::Tuple(items) => {
                let inner: Vec<String> = items.iter().map(|v| v.py_repr()).collect();
                if items.len() == 1 {
                    format!("({},)", inner[0])
                } else {
                    format!("({})", inner.join(", "))
                }
            }
            Value::Dict(entries) => {
                let inner: Vec<String> = entries
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k.py_repr(), v.py_repr()))
                    .collect();
                format!("{{{}}}", inner.join(", "))
            }
            Value::Set(items) => {
                if items.is_empty() {
                    "set()".to_string()
                } else {
                    let inner: Vec<String> = items.iter().map(|v| v.py_repr()).collect();
                    format!("{{{}}}", inner.join(", "))
                }
            }
            Value::Range(start, stop, step) => {
                if *step == 1 {
                    format!("range({}, {})", start, stop)
                } else {
                    format!("range({}, {}, {})", start, stop, step)
                }
            }
            Value::Function(f) => format!("<function {}>", f.name),
            Value::Builtin(name) => format!("<built-in function {}>", name),
            Value::Class(c) => format!("<class '{}'>", c.name),
            Value::Instance(i) => format!("<{} object>", i.borrow().class.name),
            Value::Module(m) => format!("<module '{}'>", m.name),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Int(n) => Some(*n as f64),
            Value::Bool(b) => Some(*b as i64 as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Number of elements a range yields
pub fn range_len(start: i64, stop: i64, step: i64) -> i64 {
    // Widen so spans near the i64 extremes cannot wrap; lengths past
    // i64::MAX saturate
    let (start, stop, step) = (i128::from(start), i128::from(stop), i128::from(step));
    let len = if step > 0 {
        ((stop - start).max(0) + step - 1) / step
    } else {
        ((start - stop).max(0) + (-step) - 1) / (-step)
    };
    i64::try_from(len).unwrap_or(i64::MAX)
}

/// Python-style float formatting: integral floats keep one decimal place
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        "nan".to_string()
    } else if x.is_infinite() {
        if x > 0.0 { "inf".to_string() } else { "-inf".to_string() }
    } else if x == x.trunc() && x.abs() < 1e16 {
        format!("{:.1}", x)
    } else {
        format!("{}", x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::None.is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Str(String::new()).is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
        assert!(Value::Int(-1).is_truthy());
        assert!(Value::List(vec![Value::None]).is_truthy());
    }

    #[test]
    fn test_repr() {
        assert_eq!(Value::Int(3).py_repr(), "3");
        assert_eq!(Value::Float(2.0).py_repr(), "2.0");
        assert_eq!(Value::Bool(true).py_repr(), "True");
        assert_eq!(Value::Str("hi".to_string()).py_repr(), "'hi'");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Str("a".to_string())]).py_repr(),
            "[1, 'a']"
        );
        assert_eq!(
            Value::Tuple(vec![Value::Int(1)]).py_repr(),
            "(1,)"
        );
        assert_eq!(Value::Set(vec![]).py_repr(), "set()");
    }

    #[test]
    fn test_str_vs_repr() {
        assert_eq!(Value::Str("hi".to_string()).py_str(), "hi");
        assert_eq!(Value::Int(7).py_str(), "7");
    }

    #[test]
    fn test_numeric_equality_across_types() {
        assert_eq!(Value::Int(2), Value::Float(2.0));
        assert_ne!(Value::Int(2), Value::Float(2.5));
    }

    #[test]
    fn test_clone_is_independent_copy() {
        let original = Value::List(vec![Value::Int(1)]);
        let copy = original.clone();
        if let (Value::List(mut a), Value::List(b)) = (original, copy.clone()) {
            a.push(Value::Int(2));
            assert_eq!(b.len(), 1);
        }
        assert_eq!(copy, Value::List(vec![Value::Int(1)]));
    }

    #[test]
    fn test_range_len() {
        assert_eq!(range_len(0, 5, 1), 5);
        assert_eq!(range_len(0, 5, 2), 3);
        assert_eq!(range_len(5, 0, -1), 5);
        assert_eq!(range_len(5, 5, 1), 0);
    }
}
