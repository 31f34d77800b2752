//! `PathResolver` evaluates a parsed path against a context
//! chain (`resolve`) or against an arbitrary value with no scope walk
//! (`resolve_from`, used by operators projecting into array items).

use super::ast::{PathHead, PathSegment};
use dxt_types::{TemplateContext, Value};

/// Traverses `start` by `segments`, with no scope walk: object lookup is
/// case-sensitive and exact, array indices are zero-based, and any
/// out-of-range or missing step returns `Null`.
pub fn resolve_segments<'a>(start: &'a Value, segments: &[PathSegment]) -> &'a Value {
    static NULL: Value = Value::Null;
    let mut current = start;
    for segment in segments {
        let next = match segment {
            PathSegment::Key(k) => current.as_object().and_then(|o| o.get(k)),
            PathSegment::Index(i) => {
                if *i < 0 {
                    None
                } else {
                    current.as_array().and_then(|a| a.get(*i as usize))
                }
            }
        };
        match next {
            Some(v) => current = v,
            None => return &NULL,
        }
    }
    current
}

/// Pure traversal of `path` starting at `start`, no scope walk. Used by
/// operators like `sort:key` and `get:path` that project within a specific
/// value rather than resolving against the ambient context.
pub fn resolve_from<'a>(start: &'a Value, head: &PathHead) -> &'a Value {
    match head {
        PathHead::CurrentContext => start,
        PathHead::Root | PathHead::RootPath(_) => {
            // `$`/`$.` have no meaning relative to an arbitrary operand; the
            // root frame is only reachable through the ambient context, so a
            // bare value projection treats them as a no-op on `start`.
            start
        }
        PathHead::Relative(segments) => resolve_segments(start, segments),
    }
}

/// Resolves a path head against a context chain: try `context.current`
/// first, then walk `context.parent`, finally try `context.root`. Returns
/// the first non-null resolution, else `Null`.
pub fn resolve<'a>(head: &PathHead, context: &'a TemplateContext) -> &'a Value {
    match head {
        PathHead::CurrentContext => context.current(),
        PathHead::Root => context.root_value(),
        PathHead::RootPath(segments) => resolve_segments(context.root_value(), segments),
        PathHead::Relative(segments) => {
            let from_current = resolve_segments(context.current(), segments);
            if !from_current.is_null() {
                return from_current;
            }
            let mut scope = context.parent();
            while let Some(frame) = scope {
                let candidate = resolve_segments(frame.current(), segments);
                if !candidate.is_null() {
                    return candidate;
                }
                scope = frame.parent();
            }
            let from_root = resolve_segments(context.root_value(), segments);
            from_root
        }
    }
}
