//! Pure evaluator for parsed path expressions.

use std::cmp::Ordering;

use serde_json::Value;

use super::ast::{Aggregate, BinaryOp, Expr, Method};
use super::{EvalError, PathOptions};
use crate::value::{kind_name, loose_cmp, loose_eq, truthy, Num};

pub(crate) fn evaluate(expr: &Expr, document: &Value, options: PathOptions) -> Result<Value, EvalError> {
    Evaluator {
        root: document,
        options,
        in_predicate: false,
    }
    .eval(expr, None)
}

struct Evaluator<'a> {
    root: &'a Value,
    options: PathOptions,
    /// Set while a closure predicate runs; missing data then aborts the
    /// predicate instead of reading as `null`.
    in_predicate: bool,
}

impl Evaluator<'_> {
    /// `it` is the element bound by the innermost closure, if any.
    fn eval(&self, expr: &Expr, it: Option<&Value>) -> Result<Value, EvalError> {
        match expr {
            Expr::Root => Ok(self.root.clone()),
            Expr::It => Ok(it.unwrap_or(self.root).clone()),
            Expr::Literal(value) => Ok(value.clone()),
            Expr::FieldAccess { target, name } => {
                let target = self.eval(target, it)?;
                self.field(target, name)
            }
            Expr::Index { target, indices } => {
                let target = self.eval(target, it)?;
                self.index(&target, indices)
            }
            Expr::Filter {
                target,
                predicate,
                first,
            } => {
                let items = elements(self.eval(target, it)?);
                if *first {
                    for item in items {
                        if self.test(predicate, &item)? {
                            return Ok(item);
                        }
                    }
                    return Err(EvalError::NoMatch);
                }
                let mut kept = Vec::new();
                for item in items {
                    if self.test(predicate, &item)? {
                        kept.push(item);
                    }
                }
                Ok(Value::Array(kept))
            }
            Expr::Project { target, mapping } => elements(self.eval(target, it)?)
                .iter()
                .map(|item| self.eval(mapping, Some(item)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Expr::Aggregate { target, function } => aggregate(*function, self.eval(target, it)?),
            Expr::MethodCall {
                target,
                method,
                args,
            } => {
                let target = self.eval(target, it)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg, it))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(call_method(*method, &target, &args))
            }
            Expr::BinaryOp { op, lhs, rhs } => match op {
                BinaryOp::And => {
                    let left = truthy(&self.eval(lhs, it)?);
                    Ok(Value::Bool(left && truthy(&self.eval(rhs, it)?)))
                }
                BinaryOp::Or => {
                    let left = truthy(&self.eval(lhs, it)?);
                    Ok(Value::Bool(left || truthy(&self.eval(rhs, it)?)))
                }
                _ => {
                    let left = self.eval(lhs, it)?;
                    let right = self.eval(rhs, it)?;
                    Ok(apply(*op, left, right))
                }
            },
            Expr::Not(inner) => Ok(Value::Bool(!truthy(&self.eval(inner, it)?))),
            Expr::Neg(inner) => Ok(match Num::from_value(&self.eval(inner, it)?) {
                Some(Num::Int(int)) => int
                    .checked_neg()
                    .map_or_else(|| Num::Float(-(int as f64)).into_value(), Value::from),
                Some(Num::Float(float)) => Num::Float(-float).into_value(),
                None => Value::Null,
            }),
        }
    }

    /// Run a closure predicate against one element. Anything that goes
    /// wrong inside the predicate, including a reference to a member the
    /// element lacks, is a non-match, except missing data in strict mode.
    /// A member that is present and `null` compares normally.
    fn test(&self, predicate: &Expr, item: &Value) -> Result<bool, EvalError> {
        let scoped = Evaluator {
            root: self.root,
            options: self.options,
            in_predicate: true,
        };
        match scoped.eval(predicate, Some(item)) {
            Ok(value) => Ok(truthy(&value)),
            Err(error) if self.options.strict && error.is_missing_data() => Err(error),
            Err(_) => Ok(false),
        }
    }

    fn missing(&self, error: EvalError) -> Result<Value, EvalError> {
        if self.options.strict || self.in_predicate {
            Err(error)
        } else {
            Ok(Value::Null)
        }
    }

    fn field(&self, target: Value, name: &str) -> Result<Value, EvalError> {
        match target {
            Value::Object(mut members) => match members.remove(name) {
                Some(value) => Ok(value),
                None => self.missing(EvalError::MissingField {
                    field: name.to_string(),
                }),
            },
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.field(item, name))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Null => Ok(Value::Null),
            _ => self.missing(EvalError::MissingField {
                field: name.to_string(),
            }),
        }
    }

    fn index(&self, target: &Value, indices: &[i64]) -> Result<Value, EvalError> {
        let mut picked = indices
            .iter()
            .map(|&index| self.pick(target, index))
            .collect::<Result<Vec<_>, _>>()?;
        if picked.len() == 1 {
            return Ok(picked.pop().unwrap_or(Value::Null));
        }
        Ok(Value::Array(picked))
    }

    fn pick(&self, target: &Value, index: i64) -> Result<Value, EvalError> {
        match target {
            Value::Array(items) => match resolve_index(index, items.len()) {
                Some(at) => Ok(items[at].clone()),
                None => self.missing(EvalError::IndexOutOfRange {
                    index,
                    len: items.len(),
                }),
            },
            Value::String(text) => {
                let chars: Vec<char> = text.chars().collect();
                match resolve_index(index, chars.len()) {
                    Some(at) => Ok(Value::String(chars[at].to_string())),
                    None => self.missing(EvalError::IndexOutOfRange {
                        index,
                        len: chars.len(),
                    }),
                }
            }
            Value::Null => Ok(Value::Null),
            other => self.missing(EvalError::NotIndexable {
                kind: kind_name(other),
            }),
        }
    }
}

fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let resolved = if index < 0 { len + index } else { index };
    if (0..len).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

/// The sequence a closure or aggregate iterates: arrays as-is, `null` as
/// empty, anything else as a single element.
fn elements(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

fn aggregate(function: Aggregate, target: Value) -> Result<Value, EvalError> {
    match function {
        Aggregate::Size => match &target {
            Value::Array(items) => Ok(Value::from(items.len())),
            Value::String(text) => Ok(Value::from(text.chars().count())),
            Value::Object(members) => Ok(Value::from(members.len())),
            other => Err(EvalError::TypeMismatch {
                operation: "size",
                kind: kind_name(other),
            }),
        },
        Aggregate::ToArray => Ok(match target {
            Value::Array(_) | Value::Null => target,
            other => Value::Array(vec![other]),
        }),
        Aggregate::Sum => sum(elements(target)),
        Aggregate::Max => extreme(elements(target), Ordering::Greater, "max"),
        Aggregate::Min => extreme(elements(target), Ordering::Less, "min"),
    }
}

/// Sum of the non-null numbers; `null` for an empty input.
fn sum(items: Vec<Value>) -> Result<Value, EvalError> {
    let mut total: Option<Num> = None;
    for item in items.iter().filter(|item| !item.is_null()) {
        let number = Num::from_value(item).ok_or(EvalError::TypeMismatch {
            operation: "sum",
            kind: kind_name(item),
        })?;
        total = Some(match total {
            None => number,
            Some(acc) => arith(BinaryOp::Add, acc, number).unwrap_or(Num::Float(f64::NAN)),
        });
    }
    Ok(total.map_or(Value::Null, Num::into_value))
}

/// Largest (`Greater`) or smallest (`Less`) non-null value. Numbers and
/// strings are comparable among themselves only.
fn extreme(items: Vec<Value>, keep: Ordering, operation: &'static str) -> Result<Value, EvalError> {
    let mut best: Option<Value> = None;
    for item in items.into_iter().filter(|item| !item.is_null()) {
        if !(item.is_number() || item.is_string()) {
            return Err(EvalError::TypeMismatch {
                operation,
                kind: kind_name(&item),
            });
        }
        best = match best {
            None => Some(item),
            Some(current) => match loose_cmp(&item, &current) {
                Some(ordering) if ordering == keep => Some(item),
                Some(_) => Some(current),
                None => {
                    return Err(EvalError::TypeMismatch {
                        operation,
                        kind: "a mix of strings and numbers",
                    })
                }
            },
        };
    }
    Ok(best.unwrap_or(Value::Null))
}

fn call_method(method: Method, target: &Value, args: &[Value]) -> Value {
    let arg = args.first();
    match (method, target) {
        (Method::Contains, Value::String(text)) => match arg {
            Some(Value::String(needle)) => Value::Bool(text.contains(needle.as_str())),
            _ => Value::Bool(false),
        },
        (Method::Contains, Value::Array(items)) => {
            Value::Bool(arg.is_some_and(|needle| items.iter().any(|item| loose_eq(item, needle))))
        }
        (Method::StartsWith, Value::String(text)) => match arg {
            Some(Value::String(prefix)) => Value::Bool(text.starts_with(prefix.as_str())),
            _ => Value::Bool(false),
        },
        (Method::EndsWith, Value::String(text)) => match arg {
            Some(Value::String(suffix)) => Value::Bool(text.ends_with(suffix.as_str())),
            _ => Value::Bool(false),
        },
        (Method::Length, Value::String(text)) => Value::from(text.chars().count()),
        (Method::Length, Value::Array(items)) => Value::from(items.len()),
        (Method::ToUpperCase, Value::String(text)) => Value::String(text.to_uppercase()),
        (Method::ToLowerCase, Value::String(text)) => Value::String(text.to_lowercase()),
        _ => Value::Null,
    }
}

fn apply(op: BinaryOp, left: Value, right: Value) -> Value {
    let ordered = |accept: fn(Ordering) -> bool| {
        Value::Bool(loose_cmp(&left, &right).is_some_and(accept))
    };
    match op {
        BinaryOp::Eq => Value::Bool(loose_eq(&left, &right)),
        BinaryOp::Ne => Value::Bool(!loose_eq(&left, &right)),
        BinaryOp::Lt => ordered(Ordering::is_lt),
        BinaryOp::Le => ordered(Ordering::is_le),
        BinaryOp::Gt => ordered(Ordering::is_gt),
        BinaryOp::Ge => ordered(Ordering::is_ge),
        BinaryOp::And => Value::Bool(truthy(&left) && truthy(&right)),
        BinaryOp::Or => Value::Bool(truthy(&left) || truthy(&right)),
        BinaryOp::Add => match (left, right) {
            (Value::String(mut text), other) => {
                text.push_str(&display(&other));
                Value::String(text)
            }
            (other, Value::String(text)) => Value::String(display(&other) + &text),
            (Value::Array(mut items), Value::Array(more)) => {
                items.extend(more);
                Value::Array(items)
            }
            (left, right) => numeric(op, &left, &right),
        },
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => numeric(op, &left, &right),
    }
}

fn numeric(op: BinaryOp, left: &Value, right: &Value) -> Value {
    match (Num::from_value(left), Num::from_value(right)) {
        (Some(a), Some(b)) => arith(op, a, b).map_or(Value::Null, Num::into_value),
        _ => Value::Null,
    }
}

/// Integer arithmetic stays integral while it is exact; everything else
/// falls back to `f64`. Division or remainder by zero has no result.
fn arith(op: BinaryOp, a: Num, b: Num) -> Option<Num> {
    if let (Num::Int(x), Num::Int(y)) = (a, b) {
        let exact = match op {
            BinaryOp::Add => x.checked_add(y),
            BinaryOp::Sub => x.checked_sub(y),
            BinaryOp::Mul => x.checked_mul(y),
            BinaryOp::Mod => x.checked_rem(y),
            BinaryOp::Div if y != 0 && x.checked_rem(y) == Some(0) => x.checked_div(y),
            _ => None,
        };
        if let Some(result) = exact {
            return Some(Num::Int(result));
        }
    }

    let (x, y) = (a.as_f64(), b.as_f64());
    let result = match op {
        BinaryOp::Add => x + y,
        BinaryOp::Sub => x - y,
        BinaryOp::Mul => x * y,
        BinaryOp::Div if y != 0.0 => x / y,
        BinaryOp::Mod if y != 0.0 => x % y,
        _ => return None,
    };
    Some(Num::Float(result))
}

fn display(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::{evaluate as eval_path, JsonPath, PathError};
    use super::*;

    fn users() -> Value {
        json!([
            {"id": 1, "name": "João da Silva", "age": 30, "salary": 1234.5678},
            {"id": 2, "name": "Maria Joaquina", "endereco": {"rua": "Rua dos bobos", "numero": 0},
             "age": 25, "salary": 2500},
            {"id": 3, "name": "Ana Júlia", "age": 20,
             "filhos": [{"name": "Zezinho"}, {"name": "Luizinho"}]}
        ])
    }

    fn eval(document: &Value, path: &str) -> Value {
        eval_path(document, path, PathOptions::default()).unwrap()
    }

    fn eval_err(document: &Value, path: &str, options: PathOptions) -> EvalError {
        match eval_path(document, path, options).unwrap_err() {
            PathError::Eval { error, .. } => error,
            other => panic!("expected evaluation error, got {other}"),
        }
    }

    #[test]
    fn root_paths_return_document() {
        let doc = users();
        assert_eq!(eval(&doc, "$"), doc);
        assert_eq!(eval(&doc, ""), doc);
        assert_eq!(eval(&doc, "$.size()"), json!(3));
    }

    #[test]
    fn field_on_object() {
        let user = users()[1].clone();
        assert_eq!(eval(&user, "id"), json!(2));
        assert_eq!(eval(&user, "endereco.rua"), json!("Rua dos bobos"));
        assert_eq!(eval(&user, "missing"), Value::Null);
        assert_eq!(eval(&user, "missing.deeper"), Value::Null);
    }

    #[test]
    fn scatter_preserves_length_and_order() {
        let doc = users();
        assert_eq!(eval(&doc, "name"), json!(["João da Silva", "Maria Joaquina", "Ana Júlia"]));
        assert_eq!(eval(&doc, "salary"), json!([1234.5678, 2500, null]));
        assert_eq!(eval(&doc, "age[1]"), json!(25));
    }

    #[test]
    fn scatter_is_recursive_through_nested_arrays() {
        let doc = users();
        assert_eq!(
            eval(&doc, "filhos.name"),
            json!([null, null, ["Zezinho", "Luizinho"]])
        );
        assert_eq!(eval(&doc[2], "filhos.name"), json!(["Zezinho", "Luizinho"]));
        assert_eq!(eval(&doc[2], "filhos[1].name"), json!("Luizinho"));
    }

    #[test]
    fn negative_and_multiple_indexes() {
        let doc = json!([10, 20, 30]);
        assert_eq!(eval(&doc, "$[-1]"), json!(30));
        assert_eq!(eval(&doc, "$[-3]"), json!(10));
        assert_eq!(eval(&doc, "$[0, 2]"), json!([10, 30]));
        assert_eq!(eval(&doc, "$[3]"), Value::Null);
        assert_eq!(eval(&doc, "$[-4]"), Value::Null);
    }

    #[test]
    fn find_all_and_size() {
        let doc = users();
        assert_eq!(eval(&doc, "age.findAll{it <= 25}.size()"), json!(2));
        assert_eq!(eval(&doc, "age.findAll{it <= 25 && it > 20}.size()"), json!(1));
        assert_eq!(
            eval(&doc, "findAll{it.age <= 25 && it.age > 20}.name"),
            json!(["Maria Joaquina"])
        );
        assert_eq!(eval(&doc, "findAll{it.age <= 25}[0].name"), json!("Maria Joaquina"));
        assert_eq!(eval(&doc, "findAll{it.age <= 25}[-1].name"), json!("Ana Júlia"));
    }

    #[test]
    fn find_returns_first_match_or_no_match() {
        let doc = users();
        assert_eq!(eval(&doc, "find{it.age <= 25}.name"), json!("Maria Joaquina"));
        assert_eq!(
            eval_err(&doc, "find{it.age > 100}", PathOptions::default()),
            EvalError::NoMatch
        );
        assert_eq!(eval(&doc, "findAll{it.age > 100}"), json!([]));
    }

    #[test]
    fn string_methods_in_predicates() {
        let doc = users();
        assert_eq!(
            eval(&doc, "findAll{it.name.contains('n')}.name"),
            json!(["Maria Joaquina", "Ana Júlia"])
        );
        assert_eq!(
            eval(&doc, "findAll{it.name.length() > 10}.name"),
            json!(["João da Silva", "Maria Joaquina"])
        );
        assert_eq!(
            eval(&doc, "name.findAll{it.startsWith('Maria')}"),
            json!(["Maria Joaquina"])
        );
        assert_eq!(eval(&doc, "name.findAll{it.endsWith('ia')}"), json!(["Ana Júlia"]));
    }

    #[test]
    fn collect_maps_every_element() {
        let doc = users();
        assert_eq!(
            eval(&doc, "name.collect{it.toUpperCase()}"),
            json!(["JOÃO DA SILVA", "MARIA JOAQUINA", "ANA JÚLIA"])
        );
        assert_eq!(eval(&doc, "age.collect{it * 2}"), json!([60, 50, 40]));
        assert_eq!(
            eval(&doc, "name.findAll{it.startsWith('Maria')}.collect{it.toUpperCase()}.toArray()"),
            json!(["MARIA JOAQUINA"])
        );
    }

    #[test]
    fn collect_upper_case_is_idempotent() {
        let doc = users();
        let once = eval(&doc, "name.collect{it.toUpperCase()}");
        let twice = eval(&doc, "name.collect{it.toUpperCase()}.collect{it.toUpperCase()}");
        assert_eq!(once, twice);
    }

    #[test]
    fn aggregates_skip_nulls() {
        let doc = users();
        assert_eq!(eval(&doc, "id.max()"), json!(3));
        assert_eq!(eval(&doc, "id.min()"), json!(1));
        assert_eq!(eval(&doc, "salary.min()"), json!(1234.5678));
        assert_eq!(eval(&doc, "salary.max()"), json!(2500));

        let with_nulls = eval(&doc, "salary.sum()").as_f64().unwrap();
        let filtered = eval(&doc, "salary.findAll{it != null}.sum()").as_f64().unwrap();
        assert!((with_nulls - 3734.5678).abs() < 0.001);
        assert!((filtered - with_nulls).abs() < f64::EPSILON);
    }

    #[test]
    fn aggregates_of_empty_input_are_null() {
        let doc = json!({"values": [null, null]});
        assert_eq!(eval(&doc, "values.sum()"), Value::Null);
        assert_eq!(eval(&doc, "values.max()"), Value::Null);
        assert_eq!(eval(&doc, "values.size()"), json!(2));
    }

    #[test]
    fn integer_sum_stays_integral() {
        let doc = json!([1, 2, 3]);
        assert_eq!(eval(&doc, "$.sum()"), json!(6));
        assert!(eval(&doc, "$.sum()").is_i64());
    }

    #[test]
    fn aggregates_reject_non_numbers() {
        let doc = json!([1, {"a": 1}]);
        assert_eq!(
            eval_err(&doc, "$.sum()", PathOptions::default()),
            EvalError::TypeMismatch {
                operation: "sum",
                kind: "object"
            }
        );
        assert!(matches!(
            eval_err(&json!([1, "a"]), "$.max()", PathOptions::default()),
            EvalError::TypeMismatch { operation: "max", .. }
        ));
        assert!(matches!(
            eval_err(&json!(5), "$.size()", PathOptions::default()),
            EvalError::TypeMismatch { operation: "size", .. }
        ));
    }

    #[test]
    fn predicates_on_missing_fields_do_not_match() {
        let doc = users();
        assert_eq!(eval(&doc, "findAll{it.salary > 2000}.id"), json!([2]));
        assert_eq!(eval(&doc, "findAll{it.nope.contains('x')}"), json!([]));
        assert_eq!(eval(&doc, "findAll{it.name > 3}"), json!([]));
        assert_eq!(eval(&doc, "findAll{it.name.size() > 100}"), json!([]));
    }

    #[test]
    fn null_checks_in_predicates() {
        let doc = users();
        assert_eq!(eval(&doc, "findAll{it.endereco != null}.id"), json!([2]));
        assert_eq!(eval(&doc, "salary.findAll{it != null}"), json!([1234.5678, 2500]));
        assert_eq!(eval(&doc, "salary.findAll{it == null}"), json!([null]));

        let present_null = json!([{"id": 1, "salary": null}, {"id": 2, "salary": 10}]);
        assert_eq!(eval(&present_null, "findAll{it.salary == null}.id"), json!([1]));
        assert_eq!(eval(&present_null, "findAll{!it.salary}.id"), json!([1]));
    }

    #[test]
    fn elements_missing_a_referenced_field_never_match() {
        let doc = json!([{"id": 1, "salary": 1234.5678}, {"id": 2, "salary": 2500}, {"id": 3}]);
        assert_eq!(eval(&doc, "findAll{it.nope != 'x'}.id"), json!([]));
        assert_eq!(eval(&doc, "findAll{it.salary != 2500}.id"), json!([1]));
        assert_eq!(eval(&doc, "findAll{it.salary == null}.id"), json!([]));
        assert_eq!(eval(&doc, "findAll{!(it.salary > 2000)}.id"), json!([1]));
        assert_eq!(eval(&users(), "findAll{!it.filhos}.id"), json!([]));
        assert_eq!(eval(&doc, "find{it.salary != 2500}.id"), json!(1));
    }

    #[test]
    fn missing_index_inside_predicate_never_matches() {
        let doc = json!([{"id": 1, "tags": ["a"]}, {"id": 2, "tags": []}]);
        assert_eq!(eval(&doc, "findAll{it.tags[0] != 'b'}.id"), json!([1]));
    }

    #[test]
    fn nested_filters_exclude_per_element() {
        let doc = json!([
            {"id": 1, "kids": [{"age": 3}, {"name": "x"}]},
            {"id": 2, "kids": [{"name": "y"}]}
        ]);
        assert_eq!(eval(&doc, "findAll{it.kids.findAll{it.age != 9}.size() > 0}.id"), json!([1]));
    }

    #[test]
    fn arithmetic() {
        let doc = json!({"n": 7, "f": 1.5, "s": "ab"});
        assert_eq!(eval(&doc, "$.collect{it.n + 1}"), json!([8]));
        assert_eq!(eval(&doc, "$.collect{it.n / 2}"), json!([3.5]));
        assert_eq!(eval(&doc, "$.collect{it.n / 7}"), json!([1]));
        assert_eq!(eval(&doc, "$.collect{it.n % 4}"), json!([3]));
        assert_eq!(eval(&doc, "$.collect{it.n - it.f}"), json!([5.5]));
        assert_eq!(eval(&doc, "$.collect{-it.n}"), json!([-7]));
        assert_eq!(eval(&doc, "$.collect{it.s + it.n}"), json!(["ab7"]));
        assert_eq!(eval(&doc, "$.collect{it.n / 0}"), json!([null]));
        assert_eq!(eval(&doc, "$.collect{it.s * 2}"), json!([null]));
    }

    #[test]
    fn strict_mode_reports_missing_fields() {
        let doc = users();
        let strict = PathOptions::strict();
        assert_eq!(
            eval_err(&doc[0], "endereco", strict),
            EvalError::MissingField {
                field: "endereco".to_string()
            }
        );
        assert_eq!(
            eval_err(&doc, "salary", strict),
            EvalError::MissingField {
                field: "salary".to_string()
            }
        );
        assert_eq!(
            eval_err(&doc, "$[5]", strict),
            EvalError::IndexOutOfRange { index: 5, len: 3 }
        );
        assert_eq!(
            eval_err(&doc, "findAll{it.salary > 2000}", strict),
            EvalError::MissingField {
                field: "salary".to_string()
            }
        );
        assert_eq!(
            eval_err(&json!({"id": 1}), "id[0]", strict),
            EvalError::NotIndexable { kind: "integer" }
        );
    }

    #[test]
    fn strict_mode_still_treats_type_errors_as_non_matches() {
        let doc = users();
        let value = eval_path(&doc, "findAll{it.name > 3}", PathOptions::strict()).unwrap();
        assert_eq!(value, json!([]));
    }

    #[test]
    fn compiled_path_is_reusable() {
        let path = JsonPath::parse("findAll{it.age >= 25}.name").unwrap();
        assert_eq!(path.source(), "findAll{it.age >= 25}.name");
        let first = path.evaluate(&users()).unwrap();
        let second = path.evaluate(&json!([{"age": 40, "name": "X"}])).unwrap();
        assert_eq!(first, json!(["João da Silva", "Maria Joaquina"]));
        assert_eq!(second, json!(["X"]));
    }
}
