use crate::models::{ToolRequest, ToolResponse};

pub fn process(request: &ToolRequest) -> ToolResponse {
    let input = request.input.as_str();
    match super::mode(request, "encode") {
        "encode" => ToolResponse::ok(html_escape::encode_safe(input).into_owned()),
        "decode" => ToolResponse::ok(html_escape::decode_html_entities(input).into_owned()),
        other => super::unsupported_mode(other),
    }
}
