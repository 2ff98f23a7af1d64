//! Sandboxed module registry
//!
//! The policy decides which module names are importable; this registry
//! decides which of those names actually resolve to an implementation. A
//! module that passes the policy but has no entry here fails with
//! `ModuleUnavailable`, so an over-broad allow-list can never conjure up
//! capability the interpreter does not provide.
//!
//! Module functions are `Value::Builtin` values with dotted names
//! ("math.sqrt"); the engine routes dotted builtin calls back to
//! [`call_module_function`].

use crate::interpreter::errors::RuntimeError;
use crate::interpreter::value::{ModuleObject, Value};
use crate::parser::ast::SourceLocation;
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Build the module named `name`, or report it unavailable
pub fn load_module(name: &str, location: SourceLocation) -> Result<Rc<ModuleObject>, RuntimeError> {
    match name {
        "math" => Ok(Rc::new(math_module())),
        "string" => Ok(Rc::new(string_module())),
        _ => Err(RuntimeError::ModuleUnavailable {
            name: name.to_string(),
            location,
        }),
    }
}

fn math_module() -> ModuleObject {
    let mut members: FxHashMap<String, Value> = FxHashMap::default();
    members.insert("pi".to_string(), Value::Float(std::f64::consts::PI));
    members.insert("e".to_string(), Value::Float(std::f64::consts::E));
    let functions: &[(&str, &'static str)] = &[
        ("sqrt", "math.sqrt"),
        ("floor", "math.floor"),
        ("ceil", "math.ceil"),
        ("fabs", "math.fabs"),
        ("pow", "math.pow"),
        ("log", "math.log"),
        ("exp", "math.exp"),
    ];
    for (short, dotted) in functions {
        members.insert(short.to_string(), Value::Builtin(dotted));
    }
    ModuleObject {
        name: "math".to_string(),
        members,
    }
}

fn string_module() -> ModuleObject {
    let mut members: FxHashMap<String, Value> = FxHashMap::default();
    let constants: &[(&str, &str)] = &[
        ("ascii_lowercase", "abcdefghijklmnopqrstuvwxyz"),
        ("ascii_uppercase", "ABCDEFGHIJKLMNOPQRSTUVWXYZ"),
        (
            "ascii_letters",
            "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ",
        ),
        ("digits", "0123456789"),
        ("hexdigits", "0123456789abcdefABCDEF"),
        ("punctuation", "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~"),
        ("whitespace", " \t\n\r\x0b\x0c"),
    ];
    for (name, text) in constants {
        members.insert(name.to_string(), Value::Str(text.to_string()));
    }
    ModuleObject {
        name: "string".to_string(),
        members,
    }
}

fn want_float(name: &str, args: &[Value], location: SourceLocation) -> Result<f64, RuntimeError> {
    match args {
        [v] => v.as_float().ok_or(RuntimeError::TypeError {
            message: format!("{}() argument must be a number", name),
            location,
        }),
        _ => Err(RuntimeError::TypeError {
            message: format!("{}() takes exactly one argument", name),
            location,
        }),
    }
}

/// Dispatch a dotted module-function call
pub fn call_module_function(
    name: &str,
    args: &[Value],
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    match name {
        "math.sqrt" => {
            let x = want_float(name, args, location)?;
            if x < 0.0 {
                return Err(RuntimeError::ValueError {
                    message: "math domain error".to_string(),
                    location,
                });
            }
            Ok(Value::Float(x.sqrt()))
        }
        "math.floor" => Ok(Value::Int(want_float(name, args, location)?.floor() as i64)),
        "math.ceil" => Ok(Value::Int(want_float(name, args, location)?.ceil() as i64)),
        "math.fabs" => Ok(Value::Float(want_float(name, args, location)?.abs())),
        "math.log" => {
            let x = want_float(name, args, location)?;
            if x <= 0.0 {
                return Err(RuntimeError::ValueError {
                    message: "math domain error".to_string(),
                    location,
                });
            }
            Ok(Value::Float(x.ln()))
        }
        "math.exp" => Ok(Value::Float(want_float(name, args, location)?.exp())),
        "math.pow" => match args {
            [a, b] => match (a.as_float(), b.as_float()) {
                (Some(x), Some(y)) => Ok(Value::Float(x.powf(y))),
                _ => Err(RuntimeError::TypeError {
                    message: "math.pow() arguments must be numbers".to_string(),
                    location,
                }),
            },
            _ => Err(RuntimeError::TypeError {
                message: "math.pow() takes exactly two arguments".to_string(),
                location,
            }),
        },
        other => Err(RuntimeError::NameError {
            name: other.to_string(),
            location,
        }),
    }
}
