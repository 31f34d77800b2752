//! `ExpressionEvaluator`: resolves a pipeline's head path, then threads the
//! result through its operators left to right.

use super::ast::Pipeline;
use super::error::PathError;
use super::operators;
use super::parser::parse_expression;
use super::resolver::resolve;
use dxt_types::{TemplateContext, Value};

/// Parses and evaluates a full `{...}`-body expression against `context`.
pub fn evaluate(expr: &str, context: &TemplateContext) -> Result<Value, PathError> {
    let pipeline = parse_expression(expr)?;
    evaluate_pipeline(&pipeline, context)
}

/// Evaluates an already-parsed pipeline.
pub fn evaluate_pipeline(pipeline: &Pipeline, context: &TemplateContext) -> Result<Value, PathError> {
    let mut current = resolve(&pipeline.head, context).clone();
    for call in &pipeline.operators {
        current = operators::apply(call, &current)?;
    }
    Ok(current)
}
