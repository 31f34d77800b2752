//! Helpers over the dynamic `Value` tree: truthiness, text rendering, and the
//! "never alias the caller's tree" deep-clone discipline operators rely on.

use crate::Value;

/// The tag of a `Value`, used by operators that branch on shape (`count`,
/// the `sort`/`maxby`/`minby` comparison rule, `format`'s numeric coercion).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Array,
    Object,
}

/// Classifies a `Value`, distinguishing `Integer` from `Float` the way the
/// data model requires even though `serde_json::Number` doesn't carry that
/// tag directly.
pub fn value_kind(value: &Value) -> ValueKind {
    match value {
        Value::Null => ValueKind::Null,
        Value::Bool(_) => ValueKind::Bool,
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                ValueKind::Integer
            } else {
                ValueKind::Float
            }
        }
        Value::String(_) => ValueKind::String,
        Value::Array(_) => ValueKind::Array,
        Value::Object(_) => ValueKind::Object,
    }
}

/// Truthiness: `Null`→false; `Bool`→self; `String`→non-empty
/// after trim; numeric→`|x|>ε`; `Array`/`Object`→non-empty; else true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.trim().is_empty(),
        Value::Number(n) => n.as_f64().map(|f| f.abs() > f64::EPSILON).unwrap_or(false),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// `ToText`: the textual rendering used for inline substitution and for
/// coercing non-numeric/non-date operands in `format`.
pub fn to_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => if *b { "True" } else { "False" }.to_string(),
        Value::Number(n) => format_number_invariant(n),
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string(value).unwrap_or_default()
        }
    }
}

/// Invariant-decimal rendering with no trailing zeros beyond the input's own
/// precision: `12.50` prints as `12.5`, `12` prints as `12`.
fn format_number_invariant(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    let f = n.as_f64().unwrap_or(0.0);
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        let mut s = format!("{f}");
        if s.contains('.') {
            while s.ends_with('0') {
                s.pop();
            }
            if s.ends_with('.') {
                s.pop();
            }
        }
        s
    }
}

/// Deep-clones a value. `serde_json::Value` owns its subtrees outright (no
/// shared `Rc` backing), so a deep clone is just `Value::clone` — this
/// wrapper exists so every call site that must not alias the caller's tree
/// (operator results, cloned loop-body subtrees) says so explicitly rather
/// than relying on an implicit `.clone()`.
pub fn deep_clone(value: &Value) -> Value {
    value.clone()
}
