//! Built-in arithmetic tools.
//!
//! Each tool reads integer operands `a` and `b`, stores the answer under
//! `result` in the Bag and returns it. Division by zero and integer overflow
//! are reported to the model as text and leave the Bag untouched.
//!
//! ```rust
//! use agentics::tools::ToolRegistry;
//!
//! let registry = ToolRegistry::with_builtins();
//! assert!(registry.contains("divide"));
//! ```

use super::arguments::ToolArguments;
use super::registry::ToolRegistry;
use super::tool::ToolContext;
use super::types::{ToolDeclaration, ToolParameter};
use crate::error::Result;

/// Bag key the arithmetic tools write to.
pub const RESULT_KEY: &str = "result";

const DIVISION_BY_ZERO: &str = "Error: Division by zero";
const INTEGER_OVERFLOW: &str = "Error: integer overflow";

fn operands(args: &ToolArguments) -> Result<(i64, i64)> {
    Ok((args.get_i64("a")?, args.get_i64("b")?))
}

fn record(ctx: &ToolContext, value: Option<i64>) -> serde_json::Value {
    match value {
        Some(value) => {
            ctx.bag.set(RESULT_KEY, value);
            serde_json::json!(value)
        }
        None => serde_json::json!(INTEGER_OVERFLOW),
    }
}

pub async fn add(args: ToolArguments, ctx: ToolContext) -> Result<serde_json::Value> {
    let (a, b) = operands(&args)?;
    Ok(record(&ctx, a.checked_add(b)))
}

pub async fn subtract(args: ToolArguments, ctx: ToolContext) -> Result<serde_json::Value> {
    let (a, b) = operands(&args)?;
    Ok(record(&ctx, a.checked_sub(b)))
}

pub async fn multiply(args: ToolArguments, ctx: ToolContext) -> Result<serde_json::Value> {
    let (a, b) = operands(&args)?;
    Ok(record(&ctx, a.checked_mul(b)))
}

/// Integer division (truncating).
pub async fn divide(args: ToolArguments, ctx: ToolContext) -> Result<serde_json::Value> {
    let (a, b) = operands(&args)?;
    if b == 0 {
        return Ok(serde_json::json!(DIVISION_BY_ZERO));
    }
    Ok(record(&ctx, a.checked_div(b)))
}

pub(crate) fn register_arithmetic(registry: &mut ToolRegistry) {
    registry
        .register("add", add)
        .register("subtract", subtract)
        .register("multiply", multiply)
        .register("divide", divide);
}

/// Declaration for one of the arithmetic tools, with `a`/`b` integer operands.
pub fn arithmetic_declaration(name: &str, description: &str) -> ToolDeclaration {
    ToolDeclaration {
        name: name.to_string(),
        description: description.to_string(),
        parameters: vec![
            ToolParameter::new("a", "integer"),
            ToolParameter::new("b", "integer"),
        ],
    }
}
