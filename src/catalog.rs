use crate::models::{Tool, ToolCategory};

/// The built-in tool catalog. Entries are immutable for the lifetime of the
/// server; clients fetch them once and key per-tool state by id.
#[derive(Debug, Clone)]
pub struct ToolCatalog {
    tools: Vec<Tool>,
}

impl ToolCatalog {
    pub fn builtin() -> Self {
        let tools = vec![
            Tool {
                id: "base64".to_string(),
                name: "Base64 Encoder/Decoder".to_string(),
                description: "Encode and decode Base64 strings".to_string(),
                category: ToolCategory::Encoding,
                icon: "base64".to_string(),
                features: strings(&["encode", "decode", "url-safe", "multiline"]),
            },
            Tool {
                id: "json".to_string(),
                name: "JSON Formatter/Validator".to_string(),
                description: "Format and validate JSON data".to_string(),
                category: ToolCategory::Formatting,
                icon: "json".to_string(),
                features: strings(&["format", "validate", "minify", "prettify"]),
            },
            Tool {
                id: "url".to_string(),
                name: "URL Encoder/Decoder".to_string(),
                description: "Encode and decode URL parameters".to_string(),
                category: ToolCategory::Encoding,
                icon: "url".to_string(),
                features: strings(&["encode", "decode", "component", "full-url"]),
            },
            Tool {
                id: "html".to_string(),
                name: "HTML Encoder/Decoder".to_string(),
                description: "Encode and decode HTML entities".to_string(),
                category: ToolCategory::Encoding,
                icon: "html".to_string(),
                features: strings(&["encode", "decode", "entities", "escape"]),
            },
            Tool {
                id: "unicode".to_string(),
                name: "Unicode Encoder/Decoder".to_string(),
                description: "Encode and decode Unicode characters".to_string(),
                category: ToolCategory::Encoding,
                icon: "unicode".to_string(),
                features: strings(&["encode", "decode", "normalize", "categories"]),
            },
            Tool {
                id: "protobuf".to_string(),
                name: "Protobuf Debug String Formatter".to_string(),
                description: "Format protobuf debug strings".to_string(),
                category: ToolCategory::Protocol,
                icon: "protobuf".to_string(),
                features: strings(&["format", "minify"]),
            },
        ];

        Self { tools }
    }

    pub fn all(&self) -> &[Tool] {
        &self.tools
    }

    pub fn get(&self, id: &str) -> Option<&Tool> {
        self.tools.iter().find(|tool| tool.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
