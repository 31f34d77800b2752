//! The pipe operator table: `sort`, `take`, `first`, `last`, `nth`, `at`,
//! `maxby`, `minby`, `get`/`pick`, `count`, `if`, `format`.

use super::ast::OperatorCall;
use super::error::PathError;
use super::resolver::resolve_segments;
use chrono::DateTime;
use dxt_types::{is_truthy, to_text, Value};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::OnceLock;

type OperatorFn = fn(&Value, &[String]) -> Result<Value, PathError>;

fn registry() -> &'static HashMap<&'static str, OperatorFn> {
    static REGISTRY: OnceLock<HashMap<&'static str, OperatorFn>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut m: HashMap<&'static str, OperatorFn> = HashMap::new();
        m.insert("sort", op_sort);
        m.insert("take", op_take);
        m.insert("first", op_first);
        m.insert("last", op_last);
        m.insert("nth", op_nth);
        m.insert("at", op_at);
        m.insert("maxby", op_maxby);
        m.insert("minby", op_minby);
        m.insert("get", op_get);
        m.insert("pick", op_get);
        m.insert("count", op_count);
        m.insert("if", op_if);
        m.insert("format", op_format);
        m
    })
}

/// Applies one operator call to `input`, returning the next pipeline value.
pub fn apply(call: &OperatorCall, input: &Value) -> Result<Value, PathError> {
    let f = registry()
        .get(call.name.as_str())
        .ok_or_else(|| PathError::UnsupportedOperator(call.name.clone()))?;
    f(input, &call.args)
}

fn as_items(v: &Value) -> Vec<Value> {
    match v {
        Value::Array(items) => items.clone(),
        Value::Null => Vec::new(),
        other => vec![other.clone()],
    }
}

fn project<'a>(item: &'a Value, key: &str) -> &'a Value {
    use super::parser::parse_path_head;
    match parse_path_head(key) {
        Ok(super::ast::PathHead::Relative(segments)) => resolve_segments(item, &segments),
        _ => item,
    }
}

/// Ordering used by `sort`/`maxby`/`minby`: `Null` sorts before any non-null value; two
/// numbers compare as exact decimals; two strings that both parse as RFC
/// 3339 timestamps compare chronologically; otherwise case-insensitive
/// textual comparison.
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }
    if let (Some(na), Some(nb)) = (decimal_of(a), decimal_of(b)) {
        return na.cmp(&nb);
    }
    let ta = to_text(a);
    let tb = to_text(b);
    if let (Ok(da), Ok(db)) = (
        DateTime::parse_from_rfc3339(&ta),
        DateTime::parse_from_rfc3339(&tb),
    ) {
        return da.cmp(&db);
    }
    ta.to_lowercase().cmp(&tb.to_lowercase())
}

fn decimal_of(v: &Value) -> Option<Decimal> {
    match v {
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

fn op_sort(input: &Value, args: &[String]) -> Result<Value, PathError> {
    let key = args.first().map(|s| s.as_str());
    let descending = args
        .get(1)
        .map(|s| s.eq_ignore_ascii_case("desc"))
        .unwrap_or(false);
    let mut items = as_items(input);
    // Always sort ascending first, then reverse the whole vec for desc:
    // reversing the comparator instead would keep tied keys in ascending
    // order, so desc wouldn't be the literal reverse of asc for ties.
    items.sort_by(|a, b| {
        let (pa, pb) = match key {
            Some(k) if !k.is_empty() => (project(a, k).clone(), project(b, k).clone()),
            _ => (a.clone(), b.clone()),
        };
        compare_values(&pa, &pb)
    });
    if descending {
        items.reverse();
    }
    Ok(Value::Array(items))
}

fn parse_count(args: &[String], op: &str) -> Result<usize, PathError> {
    args.first()
        .ok_or_else(|| PathError::OpArg {
            operator: op.to_string(),
            message: "expected a numeric argument".to_string(),
        })
        .and_then(|s| {
            s.trim().parse::<usize>().map_err(|_| PathError::OpArg {
                operator: op.to_string(),
                message: format!("'{s}' is not a non-negative integer"),
            })
        })
}

fn parse_signed(args: &[String], op: &str) -> Result<i64, PathError> {
    args.first()
        .ok_or_else(|| PathError::OpArg {
            operator: op.to_string(),
            message: "expected an integer argument".to_string(),
        })
        .and_then(|s| {
            s.trim().parse::<i64>().map_err(|_| PathError::OpArg {
                operator: op.to_string(),
                message: format!("'{s}' is not an integer"),
            })
        })
}

fn op_take(input: &Value, args: &[String]) -> Result<Value, PathError> {
    // `take:N` with N<=0 yields an empty Array; negative or
    // non-integer N still needs parsing, so read it signed first.
    let n = parse_signed(args, "take")?;
    let items = as_items(input);
    if n <= 0 {
        return Ok(Value::Array(Vec::new()));
    }
    Ok(Value::Array(items.into_iter().take(n as usize).collect()))
}

fn op_first(input: &Value, _args: &[String]) -> Result<Value, PathError> {
    Ok(as_items(input).into_iter().next().unwrap_or(Value::Null))
}

fn op_last(input: &Value, _args: &[String]) -> Result<Value, PathError> {
    Ok(as_items(input).into_iter().last().unwrap_or(Value::Null))
}

/// `nth:N` — 1-based: element at index `N-1`, `Null` if out of
/// range (including `N<=0`).
fn op_nth(input: &Value, args: &[String]) -> Result<Value, PathError> {
    let n = parse_signed(args, "nth")?;
    if n <= 0 {
        return Ok(Value::Null);
    }
    Ok(as_items(input).into_iter().nth((n - 1) as usize).unwrap_or(Value::Null))
}

/// `at:i` — 0-based; a negative `i` counts from the end.
fn op_at(input: &Value, args: &[String]) -> Result<Value, PathError> {
    let i = parse_signed(args, "at")?;
    let items = as_items(input);
    let idx = if i < 0 {
        let from_end = (-i) as usize;
        if from_end > items.len() {
            return Ok(Value::Null);
        }
        items.len() - from_end
    } else {
        i as usize
    };
    Ok(items.into_iter().nth(idx).unwrap_or(Value::Null))
}

fn op_maxby(input: &Value, args: &[String]) -> Result<Value, PathError> {
    extremum_by(input, args, Ordering::Greater)
}

fn op_minby(input: &Value, args: &[String]) -> Result<Value, PathError> {
    extremum_by(input, args, Ordering::Less)
}

fn extremum_by(input: &Value, args: &[String], wanted: Ordering) -> Result<Value, PathError> {
    let key = args.first().map(|s| s.as_str());
    let items = as_items(input);
    let mut best: Option<Value> = None;
    for item in items {
        let better = match &best {
            None => true,
            Some(current) => {
                let (pi, pc) = match key {
                    Some(k) if !k.is_empty() => (project(&item, k).clone(), project(current, k).clone()),
                    _ => (item.clone(), current.clone()),
                };
                compare_values(&pi, &pc) == wanted
            }
        };
        if better {
            best = Some(item);
        }
    }
    Ok(best.unwrap_or(Value::Null))
}

fn op_get(input: &Value, args: &[String]) -> Result<Value, PathError> {
    let key = args.first().ok_or_else(|| PathError::OpArg {
        operator: "get".to_string(),
        message: "expected a path argument".to_string(),
    })?;
    Ok(project(input, key).clone())
}

/// `count`: `Array.len`, `Object.len`, `String.len` (UTF-16
/// code units, matching .NET's invariant-culture string length), `0` for
/// `Null`, else `1`.
fn op_count(input: &Value, _args: &[String]) -> Result<Value, PathError> {
    let n = match input {
        Value::Null => 0,
        Value::Array(items) => items.len(),
        Value::Object(map) => map.len(),
        Value::String(s) => s.encode_utf16().count(),
        _ => 1,
    };
    Ok(Value::from(n as u64))
}

fn op_if(input: &Value, args: &[String]) -> Result<Value, PathError> {
    let when_true = args.first().map(|s| s.as_str()).unwrap_or("");
    let when_false = args.get(1).map(|s| s.as_str()).unwrap_or("");
    Ok(Value::String(
        if is_truthy(input) { when_true } else { when_false }.to_string(),
    ))
}

fn op_format(input: &Value, args: &[String]) -> Result<Value, PathError> {
    let kind = args.first().map(|s| s.to_lowercase()).unwrap_or_default();
    // Rejoining preserves patterns like `HH:mm:ss` that themselves contain
    // the pipeline's `:` separator.
    let pattern = args[1..].join(":");
    // Coercion failures (operand isn't numeric/date-shaped) degrade to the
    // plain textual rendering rather than raising — only an
    // unrecognised `kind` itself is a hard *OpArg* error.
    let text = match kind.as_str() {
        "number" => format_number(input, &pattern).unwrap_or_else(|_| to_text(input)),
        "percent" => {
            format_scaled(input, &pattern, Decimal::from(100), "%").unwrap_or_else(|_| to_text(input))
        }
        "permille" => format_scaled(input, &pattern, Decimal::from(1000), "\u{2030}")
            .unwrap_or_else(|_| to_text(input)),
        "date" | "datetime" | "time" => {
            format_temporal(input, &pattern).unwrap_or_else(|_| to_text(input))
        }
        other => {
            return Err(PathError::OpArg {
                operator: "format".to_string(),
                message: format!("unknown format kind '{other}'"),
            });
        }
    };
    Ok(Value::String(text))
}

fn decimal_operand(input: &Value, op: &str) -> Result<Decimal, PathError> {
    let text = to_text(input);
    Decimal::from_str(text.trim()).map_err(|_| PathError::OpArg {
        operator: op.to_string(),
        message: format!("'{text}' is not numeric"),
    })
}

/// `number`/`numeric`: a trailing `%` or `‰` marker in the pattern itself
/// (not just the `percent`/`permille` kinds) scales the operand and
/// appends the matching suffix ("`%` multiplies by 100, `‰` by
/// 1000; exact output characters preserved").
fn format_number(input: &Value, pattern: &str) -> Result<String, PathError> {
    let dec = decimal_operand(input, "format")?;
    if let Some(body) = pattern.strip_suffix('%') {
        return Ok(format!("{}%", apply_numeric_pattern(dec * Decimal::from(100), body)));
    }
    if let Some(body) = pattern.strip_suffix('\u{2030}') {
        return Ok(format!(
            "{}\u{2030}",
            apply_numeric_pattern(dec * Decimal::from(1000), body)
        ));
    }
    Ok(apply_numeric_pattern(dec, pattern))
}

fn format_scaled(input: &Value, pattern: &str, factor: Decimal, suffix: &str) -> Result<String, PathError> {
    let dec = decimal_operand(input, "format")? * factor;
    Ok(format!("{}{}", apply_numeric_pattern(dec, pattern), suffix))
}

/// A minimal invariant-culture-style numeric pattern: digits before the
/// decimal point in the pattern set the minimum integer digits (zero
/// padded), digits after it set the fixed fraction digit count, and a
/// `,` in the integer part of the pattern requests thousands grouping.
fn apply_numeric_pattern(value: Decimal, pattern: &str) -> String {
    if pattern.trim().is_empty() {
        return value.normalize().to_string();
    }
    let (int_pattern, frac_pattern) = match pattern.split_once('.') {
        Some((i, f)) => (i, f),
        None => (pattern, ""),
    };
    let scale = frac_pattern.len() as u32;
    let rounded = value.round_dp(scale);
    let grouped = int_pattern.contains(',');
    let min_int_digits = int_pattern.chars().filter(|c| *c == '0').count();

    let sign = if rounded.is_sign_negative() { "-" } else { "" };
    let abs = rounded.abs();
    let as_string = format!("{abs:.*}", scale as usize);
    let (int_part, frac_part) = match as_string.split_once('.') {
        Some((i, f)) => (i.to_string(), f.to_string()),
        None => (as_string, String::new()),
    };
    let int_part = if int_part.len() < min_int_digits {
        format!("{:0>width$}", int_part, width = min_int_digits)
    } else {
        int_part
    };
    let int_part = if grouped { group_thousands(&int_part) } else { int_part };

    if scale == 0 {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}.{frac_part}")
    }
}

fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() + bytes.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        let remaining = bytes.len() - i;
        if i != 0 && remaining % 3 == 0 {
            out.push(b',' as u8);
        }
        out.push(*b);
    }
    String::from_utf8(out).unwrap_or_else(|_| digits.to_string())
}

fn format_temporal(input: &Value, pattern: &str) -> Result<String, PathError> {
    let text = to_text(input);
    let parsed = DateTime::parse_from_rfc3339(text.trim()).map_err(|_| PathError::OpArg {
        operator: "format".to_string(),
        message: format!("'{text}' is not an RFC 3339 timestamp"),
    })?;
    let strftime_pattern = translate_date_pattern(pattern);
    Ok(parsed.format(&strftime_pattern).to_string())
}

/// Translates a handful of .NET/invariant-culture style tokens into
/// `chrono` strftime directives. Unrecognized characters pass through
/// unchanged, so literal separators like `-`/`:`/` ` survive untouched.
///
/// Does a single left-to-right pass rather than chained `.replace()` calls:
/// a chain would re-scan its own output (e.g. the `%M` produced for `mm`
/// contains an `M` that a later `.replace('M', "%-m")` pass would mangle
/// into `%%-m`), so each token is matched and consumed exactly once.
fn translate_date_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut rest = pattern;
    while !rest.is_empty() {
        let (replacement, len) = if rest.starts_with("yyyy") {
            ("%Y", 4)
        } else if rest.starts_with("yy") {
            ("%y", 2)
        } else if rest.starts_with("MM") {
            ("%m", 2)
        } else if rest.starts_with("dd") {
            ("%d", 2)
        } else if rest.starts_with("HH") {
            ("%H", 2)
        } else if rest.starts_with("mm") {
            ("%M", 2)
        } else if rest.starts_with("ss") {
            ("%S", 2)
        } else if rest.starts_with('M') {
            // The non-zero-padded month, e.g. `M月` → `5月` rather than `05月`.
            ("%-m", 1)
        } else {
            let ch = rest.chars().next().expect("rest is non-empty");
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
            continue;
        };
        out.push_str(replacement);
        rest = &rest[len..];
    }
    out
}
