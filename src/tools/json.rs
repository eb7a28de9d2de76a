use serde_json::Value;

use crate::models::{ToolRequest, ToolResponse};

pub fn process(request: &ToolRequest) -> ToolResponse {
    // Validation happens for every mode; formatting works on the parsed value.
    let value: Value = match serde_json::from_str(&request.input) {
        Ok(value) => value,
        Err(e) => return ToolResponse::err(format!("Invalid JSON: {}", e)),
    };

    match super::mode(request, "format") {
        "format" | "prettify" => match serde_json::to_string_pretty(&value) {
            Ok(formatted) => ToolResponse::ok(formatted),
            Err(e) => ToolResponse::err(format!("Error formatting JSON: {}", e)),
        },
        "minify" => match serde_json::to_string(&value) {
            Ok(minified) => ToolResponse::ok(minified),
            Err(e) => ToolResponse::err(format!("Error minifying JSON: {}", e)),
        },
        "validate" => ToolResponse::ok("Valid JSON"),
        other => super::unsupported_mode(other),
    }
}
