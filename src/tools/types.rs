//! Tool declaration types: parameter lists and their JSON Schema form.

use serde::{Deserialize, Serialize};

/// A single named, typed tool parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolParameter {
    pub name: String,
    /// JSON Schema type name (`integer`, `number`, `string`, `boolean`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            description: None,
        }
    }
}

/// What a tool advertises to the model: `{name, description, parameters}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    #[serde(default, alias = "params")]
    pub parameters: Vec<ToolParameter>,
}

impl ToolDeclaration {
    /// JSON Schema object describing the parameters.
    pub fn schema(&self) -> serde_json::Value {
        parameters_schema(&self.parameters)
    }
}

/// Render a parameter list as a JSON Schema object.
pub fn parameters_schema(parameters: &[ToolParameter]) -> serde_json::Value {
    let mut properties = serde_json::Map::new();
    for param in parameters {
        let mut prop = serde_json::json!({ "type": param.kind });
        if let Some(ref description) = param.description {
            prop["description"] = description.clone().into();
        }
        properties.insert(param.name.clone(), prop);
    }
    serde_json::json!({
        "type": "object",
        "properties": properties,
    })
}

/// Builder for parameter lists.
#[derive(Debug, Default)]
pub struct ParameterBuilder {
    parameters: Vec<ToolParameter>,
}

impl ParameterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(mut self, name: impl Into<String>, kind: &str, description: impl Into<String>) -> Self {
        self.parameters.push(ToolParameter {
            name: name.into(),
            kind: kind.to_string(),
            description: Some(description.into()),
        });
        self
    }

    /// Add an integer parameter.
    pub fn integer(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.push(name, "integer", description)
    }

    /// Add a number parameter.
    pub fn number(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.push(name, "number", description)
    }

    /// Add a string parameter.
    pub fn string(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.push(name, "string", description)
    }

    /// Add a boolean parameter.
    pub fn boolean(self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.push(name, "boolean", description)
    }

    pub fn build(self) -> Vec<ToolParameter> {
        self.parameters
    }
}
