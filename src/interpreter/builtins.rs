//! Built-in callables
//!
//! Pure builtins live here as one dispatch table over [`Value`]. The four
//! builtins that need interpreter state are handled in the engine instead:
//! `print` and `input` touch the output buffer and input script, and `map`
//! and `filter` invoke user functions through the call machinery.
//!
//! Whether a builtin name is reachable at all is the profile's decision
//! (checked at name resolution); by the time dispatch happens the name has
//! already passed the allow-list.

use crate::interpreter::errors::RuntimeError;
use crate::interpreter::value::{range_len, Value};
use crate::parser::ast::SourceLocation;
use std::cmp::Ordering;

/// Largest range a builtin will expand into a concrete list. The `for` loop
/// walks ranges lazily and is not bound by this.
pub(crate) const RANGE_MATERIALIZE_LIMIT: i64 = 10_000_000;

/// Expand an iterable value into its element sequence. Strings yield
/// one-character strings, dicts yield their keys in insertion order.
pub(crate) fn iter_value(
    value: &Value,
    location: SourceLocation,
) -> Result<Vec<Value>, RuntimeError> {
    match value {
        Value::List(items) | Value::Tuple(items) | Value::Set(items) => Ok(items.clone()),
        Value::Dict(entries) => Ok(entries.iter().map(|(k, _)| k.clone()).collect()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
        Value::Range(start, stop, step) => {
            if range_len(*start, *stop, *step) > RANGE_MATERIALIZE_LIMIT {
                return Err(RuntimeError::Overflow { location });
            }
            let mut items = Vec::new();
            let mut current = *start;
            while (*step > 0 && current < *stop) || (*step < 0 && current > *stop) {
                items.push(Value::Int(current));
                match current.checked_add(*step) {
                    Some(next) => current = next,
                    None => break,
                }
            }
            Ok(items)
        }
        other => Err(RuntimeError::TypeError {
            message: format!("'{}' object is not iterable", other.type_name()),
            location,
        }),
    }
}

/// Total order over comparable values; mixed or unordered types raise
/// TypeError the way Python 3 does.
pub(crate) fn compare_values(
    a: &Value,
    b: &Value,
    location: SourceLocation,
) -> Result<Ordering, RuntimeError> {
    match (a, b) {
        (Value::Bool(_) | Value::Int(_) | Value::Float(_), Value::Bool(_) | Value::Int(_) | Value::Float(_)) => {
            let (x, y) = (a.as_float().unwrap(), b.as_float().unwrap());
            x.partial_cmp(&y).ok_or(RuntimeError::ValueError {
                message: "cannot order nan".to_string(),
                location,
            })
        }
        (Value::Str(x), Value::Str(y)) => Ok(x.cmp(y)),
        (Value::List(x), Value::List(y)) | (Value::Tuple(x), Value::Tuple(y)) => {
            for (xi, yi) in x.iter().zip(y.iter()) {
                match compare_values(xi, yi, location)? {
                    Ordering::Equal => continue,
                    other => return Ok(other),
                }
            }
            Ok(x.len().cmp(&y.len()))
        }
        _ => Err(RuntimeError::TypeError {
            message: format!(
                "'<' not supported between instances of '{}' and '{}'",
                a.type_name(),
                b.type_name()
            ),
            location,
        }),
    }
}

fn arity(
    name: &str,
    args: &[Value],
    min: usize,
    max: usize,
    location: SourceLocation,
) -> Result<(), RuntimeError> {
    if args.len() < min || args.len() > max {
        return Err(RuntimeError::ArgumentCountMismatch {
            name: name.to_string(),
            expected: max,
            given: args.len(),
            location,
        });
    }
    Ok(())
}

fn want_int(name: &str, value: &Value, location: SourceLocation) -> Result<i64, RuntimeError> {
    value.as_int().ok_or_else(|| RuntimeError::TypeError {
        message: format!(
            "{}() argument must be an integer, not '{}'",
            name,
            value.type_name()
        ),
        location,
    })
}

/// Dispatch one pure builtin call
pub fn call_builtin(
    name: &str,
    args: &[Value],
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    match name {
        "abs" => {
            arity(name, args, 1, 1, location)?;
            match &args[0] {
                Value::Int(n) => Ok(Value::Int(n.abs())),
                Value::Float(x) => Ok(Value::Float(x.abs())),
                Value::Bool(b) => Ok(Value::Int(*b as i64)),
                other => Err(RuntimeError::TypeError {
                    message: format!("bad operand type for abs(): '{}'", other.type_name()),
                    location,
                }),
            }
        }
        "all" => {
            arity(name, args, 1, 1, location)?;
            let items = iter_value(&args[0], location)?;
            Ok(Value::Bool(items.iter().all(|v| v.is_truthy())))
        }
        "any" => {
            arity(name, args, 1, 1, location)?;
            let items = iter_value(&args[0], location)?;
            Ok(Value::Bool(items.iter().any(|v| v.is_truthy())))
        }
        "bin" => {
            arity(name, args, 1, 1, location)?;
            let n = want_int(name, &args[0], location)?;
            Ok(Value::Str(if n < 0 {
                format!("-0b{:b}", -n)
            } else {
                format!("0b{:b}", n)
            }))
        }
        "hex" => {
            arity(name, args, 1, 1, location)?;
            let n = want_int(name, &args[0], location)?;
            Ok(Value::Str(if n < 0 {
                format!("-0x{:x}", -n)
            } else {
                format!("0x{:x}", n)
            }))
        }
        "oct" => {
            arity(name, args, 1, 1, location)?;
            let n = want_int(name, &args[0], location)?;
            Ok(Value::Str(if n < 0 {
                format!("-0o{:o}", -n)
            } else {
                format!("0o{:o}", n)
            }))
        }
        "bool" => {
            arity(name, args, 0, 1, location)?;
            Ok(Value::Bool(args.first().map_or(false, Value::is_truthy)))
        }
        "chr" => {
            arity(name, args, 1, 1, location)?;
            let n = want_int(name, &args[0], location)?;
            let c = u32::try_from(n)
                .ok()
                .and_then(char::from_u32)
                .ok_or(RuntimeError::ValueError {
                    message: "chr() arg not in range".to_string(),
                    location,
                })?;
            Ok(Value::Str(c.to_string()))
        }
        "ord" => {
            arity(name, args, 1, 1, location)?;
            match &args[0] {
                Value::Str(s) if s.chars().count() == 1 => {
                    Ok(Value::Int(s.chars().next().unwrap() as i64))
                }
                _ => Err(RuntimeError::TypeError {
                    message: "ord() expected a character".to_string(),
                    location,
                }),
            }
        }
        "dict" => {
            arity(name, args, 0, 1, location)?;
            match args.first() {
                None => Ok(Value::Dict(Vec::new())),
                Some(Value::Dict(entries)) => Ok(Value::Dict(entries.clone())),
                Some(other) => Err(RuntimeError::TypeError {
                    message: format!("cannot convert '{}' to dict", other.type_name()),
                    location,
                }),
            }
        }
        "divmod" => {
            arity(name, args, 2, 2, location)?;
            match (args[0].as_int(), args[1].as_int()) {
                (Some(_), Some(0)) => Err(RuntimeError::ZeroDivision { location }),
                (Some(a), Some(b)) => Ok(Value::Tuple(vec![
                    Value::Int(a.div_euclid(b)),
                    Value::Int(a.rem_euclid(b)),
                ])),
                _ => Err(RuntimeError::TypeError {
                    message: "divmod() requires integer arguments".to_string(),
                    location,
                }),
            }
        }
        "enumerate" => {
            arity(name, args, 1, 2, location)?;
            let start = match args.get(1) {
                Some(v) => want_int(name, v, location)?,
                None => 0,
            };
            let items = iter_value(&args[0], location)?;
            Ok(Value::List(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| Value::Tuple(vec![Value::Int(start + i as i64), v]))
                    .collect(),
            ))
        }
        "float" => {
            arity(name, args, 0, 1, location)?;
            match args.first() {
                None => Ok(Value::Float(0.0)),
                Some(v) => match v {
                    Value::Str(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| {
                        RuntimeError::ValueError {
                            message: format!("could not convert string to float: '{}'", s),
                            location,
                        }
                    }),
                    _ => v.as_float().map(Value::Float).ok_or(RuntimeError::TypeError {
                        message: format!("float() argument must be a number, not '{}'", v.type_name()),
                        location,
                    }),
                },
            }
        }
        "int" => {
            arity(name, args, 0, 1, location)?;
            match args.first() {
                None => Ok(Value::Int(0)),
                Some(Value::Float(x)) => Ok(Value::Int(x.trunc() as i64)),
                Some(Value::Str(s)) => s.trim().parse::<i64>().map(Value::Int).map_err(|_| {
                    RuntimeError::ValueError {
                        message: format!("invalid literal for int() with base 10: '{}'", s),
                        location,
                    }
                }),
                Some(v) => v.as_int().map(Value::Int).ok_or(RuntimeError::TypeError {
                    message: format!("int() argument must be a number, not '{}'", v.type_name()),
                    location,
                }),
            }
        }
        "isinstance" => {
            arity(name, args, 2, 2, location)?;
            check_isinstance(&args[0], &args[1], location)
        }
        "len" => {
            arity(name, args, 1, 1, location)?;
            match &args[0] {
                Value::Str(s) => Ok(Value::Int(s.chars().count() as i64)),
                Value::List(items) | Value::Tuple(items) | Value::Set(items) => {
                    Ok(Value::Int(items.len() as i64))
                }
                Value::Dict(entries) => Ok(Value::Int(entries.len() as i64)),
                Value::Range(start, stop, step) => Ok(Value::Int(range_len(*start, *stop, *step))),
                other => Err(RuntimeError::TypeError {
                    message: format!("object of type '{}' has no len()", other.type_name()),
                    location,
                }),
            }
        }
        "list" => {
            arity(name, args, 0, 1, location)?;
            match args.first() {
                None => Ok(Value::List(Vec::new())),
                Some(v) => Ok(Value::List(iter_value(v, location)?)),
            }
        }
        "tuple" => {
            arity(name, args, 0, 1, location)?;
            match args.first() {
                None => Ok(Value::Tuple(Vec::new())),
                Some(v) => Ok(Value::Tuple(iter_value(v, location)?)),
            }
        }
        "set" => {
            arity(name, args, 0, 1, location)?;
            match args.first() {
                None => Ok(Value::Set(Vec::new())),
                Some(v) => {
                    let mut items: Vec<Value> = Vec::new();
                    for item in iter_value(v, location)? {
                        if !items.contains(&item) {
                            items.push(item);
                        }
                    }
                    Ok(Value::Set(items))
                }
            }
        }
        "max" | "min" => {
            if args.is_empty() {
                return Err(RuntimeError::ArgumentCountMismatch {
                    name: name.to_string(),
                    expected: 1,
                    given: 0,
                    location,
                });
            }
            let items = if args.len() == 1 {
                iter_value(&args[0], location)?
            } else {
                args.to_vec()
            };
            if items.is_empty() {
                return Err(RuntimeError::ValueError {
                    message: format!("{}() arg is an empty sequence", name),
                    location,
                });
            }
            let mut best = items[0].clone();
            for item in &items[1..] {
                let ordering = compare_values(item, &best, location)?;
                let better = if name == "max" {
                    ordering == Ordering::Greater
                } else {
                    ordering == Ordering::Less
                };
                if better {
                    best = item.clone();
                }
            }
            Ok(best)
        }
        "pow" => {
            arity(name, args, 2, 3, location)?;
            match args.get(2) {
                Some(m) => {
                    let (base, exp, modulus) = (
                        want_int(name, &args[0], location)?,
                        want_int(name, &args[1], location)?,
                        want_int(name, m, location)?,
                    );
                    if exp < 0 {
                        return Err(RuntimeError::ValueError {
                            message: "pow() 2nd argument cannot be negative when 3rd argument is specified"
                                .to_string(),
                            location,
                        });
                    }
                    if modulus == 0 {
                        return Err(RuntimeError::ZeroDivision { location });
                    }
                    // Intermediates fit in i128: both factors stay below |modulus|
                    let modulus = i128::from(modulus);
                    let mut result: i128 = 1;
                    let mut base = i128::from(base).rem_euclid(modulus);
                    let mut exp = exp;
                    while exp > 0 {
                        if exp & 1 == 1 {
                            result = (result * base).rem_euclid(modulus);
                        }
                        base = (base * base).rem_euclid(modulus);
                        exp >>= 1;
                    }
                    Ok(Value::Int(result as i64))
                }
                None => numeric_pow(&args[0], &args[1], location),
            }
        }
        "range" => {
            arity(name, args, 1, 3, location)?;
            let bounds: Vec<i64> = args
                .iter()
                .map(|v| want_int(name, v, location))
                .collect::<Result<_, _>>()?;
            let (start, stop, step) = match bounds.as_slice() {
                [stop] => (0, *stop, 1),
                [start, stop] => (*start, *stop, 1),
                [start, stop, step] => (*start, *stop, *step),
                _ => unreachable!(),
            };
            if step == 0 {
                return Err(RuntimeError::ValueError {
                    message: "range() arg 3 must not be zero".to_string(),
                    location,
                });
            }
            Ok(Value::Range(start, stop, step))
        }
        "repr" => {
            arity(name, args, 1, 1, location)?;
            Ok(Value::Str(args[0].py_repr()))
        }
        "str" => {
            arity(name, args, 0, 1, location)?;
            Ok(Value::Str(
                args.first().map_or(String::new(), Value::py_str),
            ))
        }
        "reversed" => {
            arity(name, args, 1, 1, location)?;
            let mut items = iter_value(&args[0], location)?;
            items.reverse();
            Ok(Value::List(items))
        }
        "round" => {
            arity(name, args, 1, 2, location)?;
            let x = args[0].as_float().ok_or(RuntimeError::TypeError {
                message: format!(
                    "type {} doesn't define __round__ method",
                    args[0].type_name()
                ),
                location,
            })?;
            match args.get(1) {
                None => Ok(Value::Int(round_half_even(x) as i64)),
                Some(nd) => {
                    let digits = want_int(name, nd, location)?;
                    let factor = 10f64.powi(digits as i32);
                    Ok(Value::Float(round_half_even(x * factor) / factor))
                }
            }
        }
        "sorted" => {
            arity(name, args, 1, 1, location)?;
            let mut items = iter_value(&args[0], location)?;
            // Propagate the first comparison failure instead of sorting past it
            let mut failure = None;
            items.sort_by(|a, b| match compare_values(a, b, location) {
                Ok(ordering) => ordering,
                Err(err) => {
                    failure.get_or_insert(err);
                    Ordering::Equal
                }
            });
            match failure {
                Some(err) => Err(err),
                None => Ok(Value::List(items)),
            }
        }
        "sum" => {
            arity(name, args, 1, 2, location)?;
            let mut total = args.get(1).cloned().unwrap_or(Value::Int(0));
            for item in iter_value(&args[0], location)? {
                total = numeric_add(&total, &item, location)?;
            }
            Ok(total)
        }
        "type" => {
            arity(name, args, 1, 1, location)?;
            let rendered = match &args[0] {
                Value::Instance(i) => format!("<class '{}'>", i.borrow().class.name),
                other => format!("<class '{}'>", other.type_name()),
            };
            Ok(Value::Str(rendered))
        }
        "zip" => {
            let sequences: Vec<Vec<Value>> = args
                .iter()
                .map(|v| iter_value(v, location))
                .collect::<Result<_, _>>()?;
            let shortest = sequences.iter().map(Vec::len).min().unwrap_or(0);
            Ok(Value::List(
                (0..shortest)
                    .map(|i| Value::Tuple(sequences.iter().map(|s| s[i].clone()).collect()))
                    .collect(),
            ))
        }
        other => Err(RuntimeError::NameError {
            name: other.to_string(),
            location,
        }),
    }
}

fn check_isinstance(
    value: &Value,
    class: &Value,
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    match class {
        // Type constructors double as the class argument: isinstance(x, int)
        Value::Builtin(type_name) => {
            let matches = match *type_name {
                "int" => matches!(value, Value::Int(_)),
                "float" => matches!(value, Value::Float(_)),
                "str" => matches!(value, Value::Str(_)),
                "bool" => matches!(value, Value::Bool(_)),
                "list" => matches!(value, Value::List(_)),
                "tuple" => matches!(value, Value::Tuple(_)),
                "dict" => matches!(value, Value::Dict(_)),
                "set" => matches!(value, Value::Set(_)),
                "range" => matches!(value, Value::Range(..)),
                _ => {
                    return Err(RuntimeError::TypeError {
                        message: "isinstance() arg 2 must be a type".to_string(),
                        location,
                    })
                }
            };
            Ok(Value::Bool(matches))
        }
        Value::Class(class) => Ok(Value::Bool(match value {
            Value::Instance(i) => std::rc::Rc::ptr_eq(&i.borrow().class, class),
            _ => false,
        })),
        Value::Tuple(classes) => {
            for c in classes {
                if let Value::Bool(true) = check_isinstance(value, c, location)? {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        _ => Err(RuntimeError::TypeError {
            message: "isinstance() arg 2 must be a type".to_string(),
            location,
        }),
    }
}

pub(crate) fn numeric_add(
    a: &Value,
    b: &Value,
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => x
            .checked_add(*y)
            .map(Value::Int)
            .ok_or(RuntimeError::Overflow { location }),
        _ => match (a.as_float(), b.as_float()) {
            (Some(x), Some(y)) => Ok(Value::Float(x + y)),
            _ => Err(RuntimeError::TypeError {
                message: format!(
                    "unsupported operand type(s) for +: '{}' and '{}'",
                    a.type_name(),
                    b.type_name()
                ),
                location,
            }),
        },
    }
}

pub(crate) fn numeric_pow(
    a: &Value,
    b: &Value,
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    match (a, b) {
        // Bases whose powers never grow sidestep the exponent-width check
        (Value::Int(0), Value::Int(y)) if *y > 0 => Ok(Value::Int(0)),
        (Value::Int(1), Value::Int(y)) if *y >= 0 => Ok(Value::Int(1)),
        (Value::Int(-1), Value::Int(y)) if *y >= 0 => {
            Ok(Value::Int(if y % 2 == 0 { 1 } else { -1 }))
        }
        (Value::Int(x), Value::Int(y)) if *y >= 0 => {
            let exp = u32::try_from(*y).map_err(|_| RuntimeError::Overflow { location })?;
            x.checked_pow(exp)
                .map(Value::Int)
                .ok_or(RuntimeError::Overflow { location })
        }
        _ => match (a.as_float(), b.as_float()) {
            (Some(x), Some(y)) => Ok(Value::Float(x.powf(y))),
            _ => Err(RuntimeError::TypeError {
                message: format!(
                    "unsupported operand type(s) for **: '{}' and '{}'",
                    a.type_name(),
                    b.type_name()
                ),
                location,
            }),
        },
    }
}

/// Python's round(): ties go to the even neighbor
fn round_half_even(x: f64) -> f64 {
    let floor = x.floor();
    let fraction = x - floor;
    if (fraction - 0.5).abs() < f64::EPSILON {
        if (floor as i64) % 2 == 0 {
            floor
        } else {
            floor + 1.0
        }
    } else {
        x.round()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation { line: 1, column: 1 }
    }

    fn call(name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        call_builtin(name, &args, loc())
    }

    #[test]
    fn test_len() {
        assert_eq!(
            call("len", vec![Value::Str("abc".to_string())]).unwrap(),
            Value::Int(3)
        );
        assert_eq!(
            call("len", vec![Value::Range(0, 10, 2)]).unwrap(),
            Value::Int(5)
        );
        assert!(call("len", vec![Value::Int(3)]).is_err());
    }

    #[test]
    fn test_int_conversion() {
        assert_eq!(
            call("int", vec![Value::Str("  42 ".to_string())]).unwrap(),
            Value::Int(42)
        );
        assert_eq!(call("int", vec![Value::Float(3.9)]).unwrap(), Value::Int(3));
        let err = call("int", vec![Value::Str("abc".to_string())]).unwrap_err();
        assert!(err
            .to_string()
            .contains("invalid literal for int() with base 10: 'abc'"));
    }

    #[test]
    fn test_range_and_iteration() {
        let range = call("range", vec![Value::Int(3)]).unwrap();
        assert_eq!(range, Value::Range(0, 3, 1));
        assert_eq!(
            iter_value(&range, loc()).unwrap(),
            vec![Value::Int(0), Value::Int(1), Value::Int(2)]
        );
        assert!(call("range", vec![Value::Int(0), Value::Int(5), Value::Int(0)]).is_err());
    }

    #[test]
    fn test_max_min_sum() {
        let items = Value::List(vec![Value::Int(3), Value::Int(1), Value::Int(2)]);
        assert_eq!(call("max", vec![items.clone()]).unwrap(), Value::Int(3));
        assert_eq!(call("min", vec![items.clone()]).unwrap(), Value::Int(1));
        assert_eq!(call("sum", vec![items]).unwrap(), Value::Int(6));
        assert!(call("max", vec![Value::List(vec![])]).is_err());
    }

    #[test]
    fn test_sorted_mixed_types_raises() {
        let items = Value::List(vec![Value::Int(1), Value::Str("a".to_string())]);
        assert!(call("sorted", vec![items]).is_err());
    }

    #[test]
    fn test_isinstance_builtin_types() {
        assert_eq!(
            call("isinstance", vec![Value::Int(1), Value::Builtin("int")]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            call("isinstance", vec![Value::Int(1), Value::Builtin("str")]).unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(call("round", vec![Value::Float(2.5)]).unwrap(), Value::Int(2));
        assert_eq!(call("round", vec![Value::Float(3.5)]).unwrap(), Value::Int(4));
        assert_eq!(call("round", vec![Value::Float(2.4)]).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_enumerate_and_zip() {
        let items = Value::List(vec![Value::Str("a".to_string()), Value::Str("b".to_string())]);
        let enumerated = call("enumerate", vec![items.clone()]).unwrap();
        assert_eq!(
            enumerated,
            Value::List(vec![
                Value::Tuple(vec![Value::Int(0), Value::Str("a".to_string())]),
                Value::Tuple(vec![Value::Int(1), Value::Str("b".to_string())]),
            ])
        );

        let numbers = Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let zipped = call("zip", vec![items, numbers]).unwrap();
        if let Value::List(pairs) = zipped {
            assert_eq!(pairs.len(), 2);
        } else {
            panic!("zip did not return a list");
        }
    }

    #[test]
    fn test_divmod_and_pow() {
        assert_eq!(
            call("divmod", vec![Value::Int(7), Value::Int(2)]).unwrap(),
            Value::Tuple(vec![Value::Int(3), Value::Int(1)])
        );
        assert_eq!(
            call("pow", vec![Value::Int(2), Value::Int(10)]).unwrap(),
            Value::Int(1024)
        );
        assert_eq!(
            call("pow", vec![Value::Int(2), Value::Int(10), Value::Int(1000)]).unwrap(),
            Value::Int(24)
        );
    }

    #[test]
    fn test_set_deduplicates() {
        let items = Value::List(vec![Value::Int(1), Value::Int(1), Value::Int(2)]);
        assert_eq!(
            call("set", vec![items]).unwrap(),
            Value::Set(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn test_integer_arithmetic_overflows_are_errors() {
        let err = numeric_add(&Value::Int(i64::MAX), &Value::Int(1), loc()).unwrap_err();
        assert!(err.to_string().contains("OverflowError"));

        let err = numeric_pow(&Value::Int(10), &Value::Int(30), loc()).unwrap_err();
        assert!(err.to_string().contains("OverflowError"));

        // Degenerate bases are exact for any exponent
        assert_eq!(
            numeric_pow(&Value::Int(1), &Value::Int(i64::MAX), loc()).unwrap(),
            Value::Int(1)
        );
        assert_eq!(
            numeric_pow(&Value::Int(-1), &Value::Int(i64::MAX), loc()).unwrap(),
            Value::Int(-1)
        );
    }

    #[test]
    fn test_huge_range_never_materializes() {
        let err = iter_value(&Value::Range(0, i64::MAX, 1), loc()).unwrap_err();
        assert!(err.to_string().contains("OverflowError"));

        let spanning = Value::Range(i64::MIN / 2, i64::MAX / 2, 1);
        assert!(iter_value(&spanning, loc()).is_err());
    }
}
