//! Methods on built-in types
//!
//! Collections are plain Rust values, so a mutating method cannot reach
//! through a reference the way CPython objects do. [`apply_method`] instead
//! works on a scratch copy and reports whether it mutated; the engine writes
//! the copy back to the originating place when it did. Non-mutating methods
//! (every `str` method, `dict.get`, `set.union`, ...) skip the write-back.

use crate::interpreter::builtins::{compare_values, iter_value};
use crate::interpreter::errors::RuntimeError;
use crate::interpreter::value::Value;
use crate::parser::ast::SourceLocation;
use std::cmp::Ordering;

fn arity(
    type_name: &str,
    method: &str,
    args: &[Value],
    min: usize,
    max: usize,
    location: SourceLocation,
) -> Result<(), RuntimeError> {
    if args.len() < min || args.len() > max {
        return Err(RuntimeError::TypeError {
            message: format!(
                "{}.{}() takes at most {} arguments ({} given)",
                type_name,
                method,
                max,
                args.len()
            ),
            location,
        });
    }
    Ok(())
}

/// Apply `method` to `value`, returning the call result and whether the
/// receiver was mutated in place.
pub(crate) fn apply_method(
    value: &mut Value,
    method: &str,
    args: &[Value],
    location: SourceLocation,
) -> Result<(Value, bool), RuntimeError> {
    match value {
        Value::List(_) => list_method(value, method, args, location),
        Value::Dict(_) => dict_method(value, method, args, location),
        Value::Set(_) => set_method(value, method, args, location),
        Value::Str(s) => {
            let result = str_method(s, method, args, location)?;
            Ok((result, false))
        }
        Value::Tuple(items) => match method {
            "count" => {
                arity("tuple", method, args, 1, 1, location)?;
                let n = items.iter().filter(|v| **v == args[0]).count();
                Ok((Value::Int(n as i64), false))
            }
            "index" => {
                arity("tuple", method, args, 1, 1, location)?;
                match items.iter().position(|v| *v == args[0]) {
                    Some(i) => Ok((Value::Int(i as i64), false)),
                    None => Err(RuntimeError::ValueError {
                        message: "tuple.index(x): x not in tuple".to_string(),
                        location,
                    }),
                }
            }
            _ => no_such_method(value, method, location),
        },
        _ => no_such_method(value, method, location),
    }
}

fn no_such_method(
    value: &Value,
    method: &str,
    location: SourceLocation,
) -> Result<(Value, bool), RuntimeError> {
    Err(RuntimeError::AttributeError {
        type_name: value.type_name().to_string(),
        attribute: method.to_string(),
        location,
    })
}

fn list_index(
    items: &[Value],
    raw: i64,
    location: SourceLocation,
) -> Result<usize, RuntimeError> {
    let len = items.len() as i64;
    let index = if raw < 0 { raw + len } else { raw };
    if index < 0 || index >= len {
        return Err(RuntimeError::IndexError { location });
    }
    Ok(index as usize)
}

fn list_method(
    value: &mut Value,
    method: &str,
    args: &[Value],
    location: SourceLocation,
) -> Result<(Value, bool), RuntimeError> {
    let Value::List(items) = value else {
        unreachable!()
    };
    match method {
        "append" => {
            arity("list", method, args, 1, 1, location)?;
            items.push(args[0].clone());
            Ok((Value::None, true))
        }
        "extend" => {
            arity("list", method, args, 1, 1, location)?;
            items.extend(iter_value(&args[0], location)?);
            Ok((Value::None, true))
        }
        "insert" => {
            arity("list", method, args, 2, 2, location)?;
            let raw = args[0].as_int().ok_or(RuntimeError::TypeError {
                message: "list.insert() index must be an integer".to_string(),
                location,
            })?;
            let position = raw.clamp(0, items.len() as i64) as usize;
            items.insert(position, args[1].clone());
            Ok((Value::None, true))
        }
        "pop" => {
            arity("list", method, args, 0, 1, location)?;
            if items.is_empty() {
                return Err(RuntimeError::IndexError { location });
            }
            let index = match args.first() {
                Some(v) => {
                    let raw = v.as_int().ok_or(RuntimeError::TypeError {
                        message: "list.pop() index must be an integer".to_string(),
                        location,
                    })?;
                    list_index(items, raw, location)?
                }
                None => items.len() - 1,
            };
            Ok((items.remove(index), true))
        }
        "remove" => {
            arity("list", method, args, 1, 1, location)?;
            match items.iter().position(|v| *v == args[0]) {
                Some(i) => {
                    items.remove(i);
                    Ok((Value::None, true))
                }
                None => Err(RuntimeError::ValueError {
                    message: "list.remove(x): x not in list".to_string(),
                    location,
                }),
            }
        }
        "index" => {
            arity("list", method, args, 1, 1, location)?;
            match items.iter().position(|v| *v == args[0]) {
                Some(i) => Ok((Value::Int(i as i64), false)),
                None => Err(RuntimeError::ValueError {
                    message: "list.index(x): x not in list".to_string(),
                    location,
                }),
            }
        }
        "count" => {
            arity("list", method, args, 1, 1, location)?;
            let n = items.iter().filter(|v| **v == args[0]).count();
            Ok((Value::Int(n as i64), false))
        }
        "sort" => {
            arity("list", method, args, 0, 0, location)?;
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
                None => Ok((Value::None, true)),
            }
        }
        "reverse" => {
            arity("list", method, args, 0, 0, location)?;
            items.reverse();
            Ok((Value::None, true))
        }
        "clear" => {
            arity("list", method, args, 0, 0, location)?;
            items.clear();
            Ok((Value::None, true))
        }
        "copy" => {
            arity("list", method, args, 0, 0, location)?;
            Ok((Value::List(items.clone()), false))
        }
        _ => no_such_method(value, method, location),
    }
}

fn dict_method(
    value: &mut Value,
    method: &str,
    args: &[Value],
    location: SourceLocation,
) -> Result<(Value, bool), RuntimeError> {
    let Value::Dict(entries) = value else {
        unreachable!()
    };
    match method {
        "get" => {
            arity("dict", method, args, 1, 2, location)?;
            let found = entries.iter().find(|(k, _)| *k == args[0]);
            Ok((
                match found {
                    Some((_, v)) => v.clone(),
                    None => args.get(1).cloned().unwrap_or(Value::None),
                },
                false,
            ))
        }
        "keys" => {
            arity("dict", method, args, 0, 0, location)?;
            Ok((
                Value::List(entries.iter().map(|(k, _)| k.clone()).collect()),
                false,
            ))
        }
        "values" => {
            arity("dict", method, args, 0, 0, location)?;
            Ok((
                Value::List(entries.iter().map(|(_, v)| v.clone()).collect()),
                false,
            ))
        }
        "items" => {
            arity("dict", method, args, 0, 0, location)?;
            Ok((
                Value::List(
                    entries
                        .iter()
                        .map(|(k, v)| Value::Tuple(vec![k.clone(), v.clone()]))
                        .collect(),
                ),
                false,
            ))
        }
        "pop" => {
            arity("dict", method, args, 1, 2, location)?;
            match entries.iter().position(|(k, _)| *k == args[0]) {
                Some(i) => {
                    let (_, v) = entries.remove(i);
                    Ok((v, true))
                }
                None => match args.get(1) {
                    Some(default) => Ok((default.clone(), false)),
                    None => Err(RuntimeError::KeyError {
                        key: args[0].py_repr(),
                        location,
                    }),
                },
            }
        }
        "update" => {
            arity("dict", method, args, 1, 1, location)?;
            let Value::Dict(other) = &args[0] else {
                return Err(RuntimeError::TypeError {
                    message: "dict.update() argument must be a dict".to_string(),
                    location,
                });
            };
            for (key, new_value) in other {
                match entries.iter_mut().find(|(k, _)| k == key) {
                    Some((_, v)) => *v = new_value.clone(),
                    None => entries.push((key.clone(), new_value.clone())),
                }
            }
            Ok((Value::None, true))
        }
        "clear" => {
            arity("dict", method, args, 0, 0, location)?;
            entries.clear();
            Ok((Value::None, true))
        }
        "copy" => {
            arity("dict", method, args, 0, 0, location)?;
            Ok((Value::Dict(entries.clone()), false))
        }
        _ => no_such_method(value, method, location),
    }
}

fn set_method(
    value: &mut Value,
    method: &str,
    args: &[Value],
    location: SourceLocation,
) -> Result<(Value, bool), RuntimeError> {
    let Value::Set(items) = value else {
        unreachable!()
    };
    match method {
        "add" => {
            arity("set", method, args, 1, 1, location)?;
            if !items.contains(&args[0]) {
                items.push(args[0].clone());
            }
            Ok((Value::None, true))
        }
        "remove" => {
            arity("set", method, args, 1, 1, location)?;
            match items.iter().position(|v| *v == args[0]) {
                Some(i) => {
                    items.remove(i);
                    Ok((Value::None, true))
                }
                None => Err(RuntimeError::KeyError {
                    key: args[0].py_repr(),
                    location,
                }),
            }
        }
        "discard" => {
            arity("set", method, args, 1, 1, location)?;
            if let Some(i) = items.iter().position(|v| *v == args[0]) {
                items.remove(i);
            }
            Ok((Value::None, true))
        }
        "union" => {
            arity("set", method, args, 1, 1, location)?;
            let mut combined = items.clone();
            for item in iter_value(&args[0], location)? {
                if !combined.contains(&item) {
                    combined.push(item);
                }
            }
            Ok((Value::Set(combined), false))
        }
        "intersection" => {
            arity("set", method, args, 1, 1, location)?;
            let other = iter_value(&args[0], location)?;
            Ok((
                Value::Set(
                    items
                        .iter()
                        .filter(|v| other.contains(v))
                        .cloned()
                        .collect(),
                ),
                false,
            ))
        }
        "difference" => {
            arity("set", method, args, 1, 1, location)?;
            let other = iter_value(&args[0], location)?;
            Ok((
                Value::Set(
                    items
                        .iter()
                        .filter(|v| !other.contains(v))
                        .cloned()
                        .collect(),
                ),
                false,
            ))
        }
        _ => no_such_method(value, method, location),
    }
}

fn str_method(
    s: &str,
    method: &str,
    args: &[Value],
    location: SourceLocation,
) -> Result<Value, RuntimeError> {
    let want_str = |v: &Value| -> Result<String, RuntimeError> {
        v.as_str().map(str::to_string).ok_or(RuntimeError::TypeError {
            message: format!("str.{}() argument must be a string", method),
            location,
        })
    };
    match method {
        "upper" => {
            arity("str", method, args, 0, 0, location)?;
            Ok(Value::Str(s.to_uppercase()))
        }
        "lower" => {
            arity("str", method, args, 0, 0, location)?;
            Ok(Value::Str(s.to_lowercase()))
        }
        "capitalize" => {
            arity("str", method, args, 0, 0, location)?;
            let mut chars = s.chars();
            Ok(Value::Str(match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }))
        }
        "strip" => {
            arity("str", method, args, 0, 0, location)?;
            Ok(Value::Str(s.trim().to_string()))
        }
        "lstrip" => {
            arity("str", method, args, 0, 0, location)?;
            Ok(Value::Str(s.trim_start().to_string()))
        }
        "rstrip" => {
            arity("str", method, args, 0, 0, location)?;
            Ok(Value::Str(s.trim_end().to_string()))
        }
        "split" => {
            arity("str", method, args, 0, 1, location)?;
            let parts: Vec<Value> = match args.first() {
                None => s
                    .split_whitespace()
                    .map(|p| Value::Str(p.to_string()))
                    .collect(),
                Some(sep) => {
                    let sep = want_str(sep)?;
                    if sep.is_empty() {
                        return Err(RuntimeError::ValueError {
                            message: "empty separator".to_string(),
                            location,
                        });
                    }
                    s.split(sep.as_str())
                        .map(|p| Value::Str(p.to_string()))
                        .collect()
                }
            };
            Ok(Value::List(parts))
        }
        "join" => {
            arity("str", method, args, 1, 1, location)?;
            let parts = iter_value(&args[0], location)?;
            let rendered: Result<Vec<String>, RuntimeError> = parts
                .iter()
                .map(|v| {
                    v.as_str().map(str::to_string).ok_or(RuntimeError::TypeError {
                        message: format!(
                            "sequence item: expected str instance, {} found",
                            v.type_name()
                        ),
                        location,
                    })
                })
                .collect();
            Ok(Value::Str(rendered?.join(s)))
        }
        "replace" => {
            arity("str", method, args, 2, 2, location)?;
            let from = want_str(&args[0])?;
            let to = want_str(&args[1])?;
            Ok(Value::Str(s.replace(&from, &to)))
        }
        "find" => {
            arity("str", method, args, 1, 1, location)?;
            let needle = want_str(&args[0])?;
            Ok(Value::Int(match s.find(&needle) {
                Some(byte_index) => s[..byte_index].chars().count() as i64,
                None => -1,
            }))
        }
        "count" => {
            arity("str", method, args, 1, 1, location)?;
            let needle = want_str(&args[0])?;
            if needle.is_empty() {
                return Ok(Value::Int(s.chars().count() as i64 + 1));
            }
            Ok(Value::Int(s.matches(&needle).count() as i64))
        }
        "startswith" => {
            arity("str", method, args, 1, 1, location)?;
            Ok(Value::Bool(s.starts_with(&want_str(&args[0])?)))
        }
        "endswith" => {
            arity("str", method, args, 1, 1, location)?;
            Ok(Value::Bool(s.ends_with(&want_str(&args[0])?)))
        }
        "isdigit" => {
            arity("str", method, args, 0, 0, location)?;
            Ok(Value::Bool(
                !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()),
            ))
        }
        "isalpha" => {
            arity("str", method, args, 0, 0, location)?;
            Ok(Value::Bool(!s.is_empty() && s.chars().all(char::is_alphabetic)))
        }
        "isalnum" => {
            arity("str", method, args, 0, 0, location)?;
            Ok(Value::Bool(
                !s.is_empty() && s.chars().all(char::is_alphanumeric),
            ))
        }
        "isspace" => {
            arity("str", method, args, 0, 0, location)?;
            Ok(Value::Bool(!s.is_empty() && s.chars().all(char::is_whitespace)))
        }
        _ => Err(RuntimeError::AttributeError {
            type_name: "str".to_string(),
            attribute: method.to_string(),
            location,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation { line: 1, column: 1 }
    }

    #[test]
    fn test_list_append_reports_mutation() {
        let mut value = Value::List(vec![Value::Int(1)]);
        let (result, mutated) = apply_method(&mut value, "append", &[Value::Int(2)], loc()).unwrap();
        assert_eq!(result, Value::None);
        assert!(mutated);
        assert_eq!(value, Value::List(vec![Value::Int(1), Value::Int(2)]));
    }

    #[test]
    fn test_list_pop_and_remove_errors() {
        let mut empty = Value::List(vec![]);
        assert!(apply_method(&mut empty, "pop", &[], loc()).is_err());

        let mut value = Value::List(vec![Value::Int(1)]);
        let err = apply_method(&mut value, "remove", &[Value::Int(9)], loc()).unwrap_err();
        assert!(err.to_string().contains("not in list"));
    }

    #[test]
    fn test_dict_get_and_pop() {
        let mut value = Value::Dict(vec![(Value::Str("a".to_string()), Value::Int(1))]);
        let (result, mutated) =
            apply_method(&mut value, "get", &[Value::Str("a".to_string())], loc()).unwrap();
        assert_eq!(result, Value::Int(1));
        assert!(!mutated);

        let (result, _) = apply_method(
            &mut value,
            "get",
            &[Value::Str("b".to_string()), Value::Int(0)],
            loc(),
        )
        .unwrap();
        assert_eq!(result, Value::Int(0));

        let (popped, mutated) =
            apply_method(&mut value, "pop", &[Value::Str("a".to_string())], loc()).unwrap();
        assert_eq!(popped, Value::Int(1));
        assert!(mutated);
        assert_eq!(value, Value::Dict(vec![]));
    }

    #[test]
    fn test_str_methods_do_not_mutate() {
        let mut value = Value::Str("  Hello  ".to_string());
        let (result, mutated) = apply_method(&mut value, "strip", &[], loc()).unwrap();
        assert_eq!(result, Value::Str("Hello".to_string()));
        assert!(!mutated);
        assert_eq!(value, Value::Str("  Hello  ".to_string()));
    }

    #[test]
    fn test_str_split_and_join() {
        let mut value = Value::Str("a,b,c".to_string());
        let (parts, _) =
            apply_method(&mut value, "split", &[Value::Str(",".to_string())], loc()).unwrap();
        assert_eq!(
            parts,
            Value::List(vec![
                Value::Str("a".to_string()),
                Value::Str("b".to_string()),
                Value::Str("c".to_string()),
            ])
        );

        let mut sep = Value::Str("-".to_string());
        let (joined, _) = apply_method(&mut sep, "join", &[parts], loc()).unwrap();
        assert_eq!(joined, Value::Str("a-b-c".to_string()));
    }

    #[test]
    fn test_set_operations() {
        let mut value = Value::Set(vec![Value::Int(1), Value::Int(2)]);
        apply_method(&mut value, "add", &[Value::Int(2)], loc()).unwrap();
        assert_eq!(value, Value::Set(vec![Value::Int(1), Value::Int(2)]));

        let (union, mutated) = apply_method(
            &mut value,
            "union",
            &[Value::Set(vec![Value::Int(3)])],
            loc(),
        )
        .unwrap();
        assert!(!mutated);
        assert_eq!(
            union,
            Value::Set(vec![Value::Int(1), Value::Int(2), Value::Int(3)])
        );
    }
}
