//! AST for path expressions and pipe-chained pipelines.

/// One segment of a dotted/indexed path: an object key or an array index.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    Key(String),
    Index(i64),
}

/// The head of a path expression, before any segments are applied.
#[derive(Debug, Clone, PartialEq)]
pub enum PathHead {
    /// `.` — the current scope's value.
    CurrentContext,
    /// `$` — the document root, no further segments.
    Root,
    /// `$.<rest>` — resolve `<rest>` starting at the document root.
    RootPath(Vec<PathSegment>),
    /// A bare dotted/indexed path, resolved with the scope walk.
    Relative(Vec<PathSegment>),
}

/// A single pipe-chained operator: `name(:arg)*`, name matched
/// case-insensitively, args taken verbatim (already split on `:`).
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorCall {
    pub name: String,
    pub args: Vec<String>,
}

/// A full expression: a path head followed by zero or more operators
/// applied left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub head: PathHead,
    pub operators: Vec<OperatorCall>,
}
