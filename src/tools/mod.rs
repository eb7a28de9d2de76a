mod base64;
mod html;
mod json;
mod protobuf;
mod unicode;
mod url;

use crate::models::{ToolRequest, ToolResponse};
use serde_json::Value;

/// Run the processor for `tool_id`. All tool-level failures (bad input,
/// unsupported mode) come back as soft errors inside the response; callers
/// are expected to have checked the catalog before dispatching.
pub fn process(tool_id: &str, request: &ToolRequest) -> ToolResponse {
    match tool_id {
        "base64" => base64::process(request),
        "json" => json::process(request),
        "url" => url::process(request),
        "html" => html::process(request),
        "unicode" => unicode::process(request),
        "protobuf" => protobuf::process(request),
        other => ToolResponse::err(format!("Unsupported tool: {}", other)),
    }
}

/// Mode cycle for each tool, in UI order. The first entry is the default
/// the processor assumes when the request carries no mode setting.
pub fn modes(tool_id: &str) -> &'static [&'static str] {
    match tool_id {
        "base64" => &["encode", "decode", "url-encode", "url-decode"],
        "json" => &["format", "minify", "validate"],
        "url" => &["encode", "decode", "encode-component", "decode-component"],
        "html" => &["encode", "decode"],
        "unicode" => &["encode", "decode", "info"],
        "protobuf" => &["format", "minify"],
        _ => &[],
    }
}

fn mode<'a>(request: &'a ToolRequest, default: &'a str) -> &'a str {
    request
        .settings
        .get("mode")
        .and_then(Value::as_str)
        .unwrap_or(default)
}

fn unsupported_mode(mode: &str) -> ToolResponse {
    ToolResponse::err(format!("Unsupported mode: {}", mode))
}

#[cfg(test)]
pub(crate) fn request(input: &str, mode: Option<&str>) -> ToolRequest {
    let mut settings = serde_json::Map::new();
    if let Some(mode) = mode {
        settings.insert("mode".to_string(), Value::String(mode.to_string()));
    }
    ToolRequest {
        input: input.to_string(),
        settings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ToolCatalog;

    #[test]
    fn every_catalog_tool_dispatches() {
        for tool in ToolCatalog::builtin().all() {
            let response = process(&tool.id, &request("", None));
            let err = response.error.unwrap_or_default();
            assert!(
                !err.starts_with("Unsupported tool"),
                "catalog tool {} has no processor",
                tool.id
            );
        }
    }

    #[test]
    fn every_catalog_tool_has_modes() {
        for tool in ToolCatalog::builtin().all() {
            assert!(!modes(&tool.id).is_empty(), "no modes for {}", tool.id);
        }
        assert!(modes("nonexistent").is_empty());
    }

    #[test]
    fn unknown_tool_is_a_soft_error() {
        let response = process("nonexistent", &request("x", None));
        assert_eq!(response.error.as_deref(), Some("Unsupported tool: nonexistent"));
        assert!(response.output.is_empty());
    }

    #[test]
    fn first_mode_matches_processor_default() {
        // Processing with no mode setting must behave like the first listed
        // mode, otherwise the UI's mode cycle starts out lying.
        for tool in ToolCatalog::builtin().all() {
            let default = modes(&tool.id)[0];
            let input = if tool.id == "json" { "{}" } else { "abc" };
            let implicit = process(&tool.id, &request(input, None));
            let explicit = process(&tool.id, &request(input, Some(default)));
            assert_eq!(implicit.output, explicit.output, "tool {}", tool.id);
        }
    }
}
