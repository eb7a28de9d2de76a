use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine;

use crate::models::{ToolRequest, ToolResponse};

pub fn process(request: &ToolRequest) -> ToolResponse {
    match super::mode(request, "encode") {
        "encode" => ToolResponse::ok(STANDARD.encode(request.input.as_bytes())),
        "decode" => decode(&request.input, &STANDARD, "Invalid base64 string"),
        "url-encode" => ToolResponse::ok(URL_SAFE.encode(request.input.as_bytes())),
        "url-decode" => decode(&request.input, &URL_SAFE, "Invalid base64 URL string"),
        other => super::unsupported_mode(other),
    }
}

fn decode(
    input: &str,
    engine: &impl Engine,
    label: &str,
) -> ToolResponse {
    let bytes = match engine.decode(input) {
        Ok(bytes) => bytes,
        Err(e) => return ToolResponse::err(format!("{}: {}", label, e)),
    };

    match String::from_utf8(bytes) {
        Ok(text) => ToolResponse::ok(text),
        Err(_) => ToolResponse::err(format!("{}: decoded data is not valid UTF-8", label)),
    }
}
