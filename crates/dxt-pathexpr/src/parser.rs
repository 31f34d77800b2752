//! A small `nom`-based parser for the path grammar, plus the plain
//! string-splitting pipeline/operator parser.

use super::ast::{OperatorCall, PathHead, PathSegment, Pipeline};
use super::error::PathError;
use nom::{
    IResult, Parser,
    bytes::complete::{char as char_tag, tag, take_while1},
    character::complete::char,
    combinator::{eof, opt},
    multi::many0,
    sequence::{delimited, preceded},
};

#[derive(Debug, Clone)]
enum RawSegment<'a> {
    Dot(&'a str),
    Bracket(&'a str),
}

fn name_chars(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !".[]|{}:".contains(c))(input)
}

fn dot_segment(input: &str) -> IResult<&str, RawSegment<'_>> {
    let (input, name) = preceded(char('.'), name_chars)(input)?;
    Ok((input, RawSegment::Dot(name)))
}

fn bracket_segment(input: &str) -> IResult<&str, RawSegment<'_>> {
    let (input, inner) = delimited(
        char_tag("["),
        take_while1(|c: char| c != ']'),
        char_tag("]"),
    )
    .parse(input)?;
    Ok((input, RawSegment::Bracket(inner)))
}

fn segment(input: &str) -> IResult<&str, RawSegment<'_>> {
    nom::branch::alt((dot_segment, bracket_segment)).parse(input)
}

fn relative_path(input: &str) -> IResult<&str, (&str, Vec<RawSegment<'_>>)> {
    let (input, head) = name_chars(input)?;
    let (input, rest) = many0(segment).parse(input)?;
    Ok((input, (head, rest)))
}

fn to_segments(head: &str, rest: Vec<RawSegment<'_>>) -> Result<Vec<PathSegment>, PathError> {
    let mut segments = Vec::with_capacity(rest.len() + 1);
    if !head.trim().is_empty() {
        segments.push(PathSegment::Key(head.trim().to_string()));
    }
    for raw in rest {
        match raw {
            RawSegment::Dot(name) => {
                let name = name.trim();
                if !name.is_empty() {
                    segments.push(PathSegment::Key(name.to_string()));
                }
            }
            RawSegment::Bracket(digits) => {
                let idx: i64 = digits.trim().parse().map_err(|_| {
                    PathError::InvalidPath(
                        digits.to_string(),
                        "bracket segment must be an integer index".to_string(),
                    )
                })?;
                segments.push(PathSegment::Index(idx));
            }
        }
    }
    Ok(segments)
}

/// Parses the head of a path expression (everything up to the first `|`,
/// already trimmed by the caller).
pub fn parse_path_head(input: &str) -> Result<PathHead, PathError> {
    let trimmed = input.trim();
    if trimmed == "." {
        return Ok(PathHead::CurrentContext);
    }
    if trimmed == "$" {
        return Ok(PathHead::Root);
    }
    if let Some(rest) = trimmed.strip_prefix("$.") {
        let (remainder, (head, segs)) = relative_path(rest).map_err(|e| {
            PathError::InvalidPath(input.to_string(), format!("malformed path: {e}"))
        })?;
        eof::<_, nom::error::Error<&str>>(remainder).map_err(|_| {
            PathError::InvalidPath(
                input.to_string(),
                format!("unexpected trailing input '{remainder}'"),
            )
        })?;
        return Ok(PathHead::RootPath(to_segments(head, segs)?));
    }
    let (remainder, (head, segs)) = relative_path(trimmed).map_err(|e| {
        PathError::InvalidPath(input.to_string(), format!("malformed path: {e}"))
    })?;
    eof::<_, nom::error::Error<&str>>(remainder).map_err(|_| {
        PathError::InvalidPath(
            input.to_string(),
            format!("unexpected trailing input '{remainder}'"),
        )
    })?;
    Ok(PathHead::Relative(to_segments(head, segs)?))
}

fn parse_operator(segment: &str) -> OperatorCall {
    let mut parts = segment.split(':');
    let name = parts.next().unwrap_or("").trim().to_lowercase();
    let args = parts.map(|s| s.to_string()).collect();
    OperatorCall { name, args }
}

/// Parses a full expression: `head ('|' op)*`. Empty pipe segments are
/// discarded.
pub fn parse_expression(expr: &str) -> Result<Pipeline, PathError> {
    let mut segments = expr.split('|').map(|s| s.trim()).filter(|s| !s.is_empty());
    let head_str = segments.next().unwrap_or("");
    let head = parse_path_head(head_str)?;
    let operators = segments.map(parse_operator).collect();
    Ok(Pipeline { head, operators })
}

// Silence unused-import noise from the `opt` combinator kept for parsers
// that may need optional whitespace handling as the grammar grows.
#[allow(dead_code)]
fn _unused(input: &str) -> IResult<&str, Option<char>> {
    opt(tag(" ")).parse(input).map(|(i, _)| (i, None))
}
