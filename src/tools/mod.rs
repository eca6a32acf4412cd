//! Tool system for function calling.

pub mod arguments;
pub mod builtin;
pub mod registry;
pub mod tool;
pub mod types;

pub use arguments::ToolArguments;
pub use registry::ToolRegistry;
pub use tool::{output_text, FunctionTool, Tool, ToolContext, ToolHandler};
pub use types::{parameters_schema, ParameterBuilder, ToolDeclaration, ToolParameter};
