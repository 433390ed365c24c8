//! JSON persistence for expressions, stages, pipelines and programs.
//!
//! Documents produced here round-trip exactly: parsing a document and writing
//! it back yields the same JSON. Unknown expression kinds, operation names and
//! stage names are rejected with `FlowError::UnknownName`; objects carrying
//! fields outside their kind's field set are rejected as invalid parameters.

use serde_json::{Map, Value as JsonValue};

use common_error::{FlowError, FlowResult};
use tidyflow_core::Value;

use crate::expr::{Expr, OpName};
use crate::plan::{Pipeline, Program};
use crate::stage::Stage;

pub use crate::expr::op_lookup;

const STAGE_KIND: &str = "stage";

fn as_object<'a>(json: &'a JsonValue, what: &str) -> FlowResult<&'a Map<String, JsonValue>> {
    json.as_object()
        .ok_or_else(|| FlowError::invalid_parameter(format!("{what} must be a JSON object")))
}

fn field<'a>(obj: &'a Map<String, JsonValue>, key: &str, what: &str) -> FlowResult<&'a JsonValue> {
    obj.get(key)
        .ok_or_else(|| FlowError::invalid_parameter(format!("{what} requires '{key}'")))
}

fn text_field<'a>(obj: &'a Map<String, JsonValue>, key: &str, what: &str) -> FlowResult<&'a str> {
    field(obj, key, what)?
        .as_str()
        .ok_or_else(|| FlowError::invalid_parameter(format!("{what} '{key}' must be a string")))
}

/// Reject keys outside `allowed`, so a document cannot lose fields on reload.
fn check_keys<'a, I>(obj: &Map<String, JsonValue>, allowed: I, what: &str) -> FlowResult<()>
where
    I: IntoIterator<Item = &'a str> + Clone,
{
    match obj
        .keys()
        .find(|key| !allowed.clone().into_iter().any(|a| a == key.as_str()))
    {
        Some(key) => Err(FlowError::invalid_parameter(format!(
            "{what} does not accept field '{key}'"
        ))),
        None => Ok(()),
    }
}

fn child(obj: &Map<String, JsonValue>, key: &str) -> FlowResult<Box<Expr>> {
    json_to_expr(field(obj, key, "expression")?).map(Box::new)
}

/// Convert an expression to JSON.
pub fn expr_to_json(expr: &Expr) -> FlowResult<JsonValue> {
    Ok(serde_json::to_value(expr)?)
}

/// Rebuild an expression from JSON.
pub fn json_to_expr(json: &JsonValue) -> FlowResult<Expr> {
    let obj = as_object(json, "expression")?;
    let Some(kind) = obj.get("kind").and_then(JsonValue::as_str) else {
        return Err(FlowError::unknown_name("expression requires a 'kind'"));
    };
    let allowed: &[&str] = match kind {
        "constant" => &["kind", "constant"],
        "value" => &["kind", "value"],
        "unary" => &["kind", "op", "child"],
        "binary" => &["kind", "op", "left", "right"],
        "ternary" => &["kind", "op", "left", "middle", "right"],
        other => {
            return Err(FlowError::unknown_name(format!(
                "unknown expression kind '{other}'"
            )))
        }
    };
    check_keys(obj, allowed.iter().copied(), &format!("{kind} expression"))?;
    match kind {
        "constant" => {
            let constant: Value = serde_json::from_value(field(obj, "constant", kind)?.clone())?;
            Ok(Expr::Constant { constant })
        }
        "value" => {
            let value = text_field(obj, "value", kind)?;
            Ok(Expr::column(value))
        }
        "unary" | "binary" | "ternary" => {
            let name = text_field(obj, "op", kind)?;
            match (kind, op_lookup(name)?) {
                ("unary", OpName::Unary(op)) => Ok(Expr::Unary {
                    op,
                    child: child(obj, "child")?,
                }),
                ("binary", OpName::Binary(op)) => Ok(Expr::Binary {
                    op,
                    left: child(obj, "left")?,
                    right: child(obj, "right")?,
                }),
                ("ternary", OpName::Ternary(op)) => Ok(Expr::Ternary {
                    op,
                    left: child(obj, "left")?,
                    middle: child(obj, "middle")?,
                    right: child(obj, "right")?,
                }),
                (_, found) => Err(FlowError::unknown_name(format!(
                    "operation '{name}' takes {} operand(s), not a {kind} expression",
                    found.arity()
                ))),
            }
        }
        other => Err(FlowError::unknown_name(format!(
            "unknown expression kind '{other}'"
        ))),
    }
}

/// Convert a stage to JSON, tagged with `"kind": "stage"`.
pub fn stage_to_json(stage: &Stage) -> FlowResult<JsonValue> {
    let mut json = serde_json::to_value(stage)?;
    if let JsonValue::Object(map) = &mut json {
        map.insert("kind".to_string(), JsonValue::from(STAGE_KIND));
    }
    Ok(json)
}

/// Rebuild a stage from JSON, validating its parameters.
pub fn json_to_stage(json: &JsonValue) -> FlowResult<Stage> {
    let obj = as_object(json, "stage")?;
    if obj.get("kind").and_then(JsonValue::as_str) != Some(STAGE_KIND) {
        return Err(FlowError::unknown_name(
            "JSON does not describe a stage (kind must be \"stage\")",
        ));
    }
    let name = obj.get("name").and_then(JsonValue::as_str).unwrap_or("");
    if !Stage::NAMES.contains(&name) {
        return Err(FlowError::unknown_name(format!("unknown stage '{name}'")));
    }
    // Surface expression errors with their own names before serde sees them.
    if let Some(op) = obj.get("op") {
        json_to_expr(op)?;
    }
    let mut fields = obj.clone();
    fields.remove("kind");
    let stage: Stage = serde_json::from_value(JsonValue::Object(fields))?;
    // Every field is written back, so the written keys are the accepted ones.
    let written = serde_json::to_value(&stage)?;
    if let JsonValue::Object(known) = &written {
        let allowed = known.keys().map(String::as_str).chain(["kind"]);
        check_keys(obj, allowed, &format!("{name} stage"))?;
    }
    stage.validate()?;
    Ok(stage)
}

/// Convert a pipeline to a JSON array of stages.
pub fn pipeline_to_json(pipeline: &Pipeline) -> FlowResult<JsonValue> {
    pipeline
        .stages()
        .iter()
        .map(stage_to_json)
        .collect::<FlowResult<Vec<_>>>()
        .map(JsonValue::Array)
}

/// Rebuild a pipeline from a JSON array of stages.
pub fn json_to_pipeline(json: &JsonValue) -> FlowResult<Pipeline> {
    let items = json
        .as_array()
        .ok_or_else(|| FlowError::invalid_parameter("pipeline must be a JSON array"))?;
    items
        .iter()
        .map(json_to_stage)
        .collect::<FlowResult<Vec<_>>>()
        .map(Pipeline::new)
}

/// Convert a program to a JSON array of pipelines.
pub fn program_to_json(program: &Program) -> FlowResult<JsonValue> {
    program
        .pipelines()
        .iter()
        .map(pipeline_to_json)
        .collect::<FlowResult<Vec<_>>>()
        .map(JsonValue::Array)
}

/// Rebuild a program from a JSON array of pipelines.
pub fn json_to_program(json: &JsonValue) -> FlowResult<Program> {
    let items = json
        .as_array()
        .ok_or_else(|| FlowError::invalid_parameter("program must be a JSON array"))?;
    items
        .iter()
        .map(json_to_pipeline)
        .collect::<FlowResult<Vec<_>>>()
        .map(Program::new)
}

/// Parse a saved program document.
pub fn program_from_str(text: &str) -> FlowResult<Program> {
    let json: JsonValue = serde_json::from_str(text)?;
    json_to_program(&json)
}

/// Write a program as a compact JSON document.
pub fn program_to_string(program: &Program) -> FlowResult<String> {
    Ok(program_to_json(program)?.to_string())
}
