use crate::models::{ToolRequest, ToolResponse};

pub fn process(request: &ToolRequest) -> ToolResponse {
    let input = request.input.as_str();
    match super::mode(request, "encode") {
        // Form-style: space travels as '+'.
        "encode" => ToolResponse::ok(urlencoding::encode(input).replace("%20", "+")),
        "decode" => decode(&input.replace('+', " ")),
        // Strict percent-encoding for path/component use.
        "encode-component" => ToolResponse::ok(urlencoding::encode(input).into_owned()),
        "decode-component" => decode(input),
        other => super::unsupported_mode(other),
    }
}

fn decode(input: &str) -> ToolResponse {
    match urlencoding::decode(input) {
        Ok(decoded) => ToolResponse::ok(decoded.into_owned()),
        Err(e) => ToolResponse::err(format!("Invalid URL encoding: {}", e)),
    }
}
