use std::fmt::Write as _;

use crate::models::{ToolRequest, ToolResponse};

pub fn process(request: &ToolRequest) -> ToolResponse {
    let input = request.input.as_str();
    match super::mode(request, "encode") {
        "encode" => ToolResponse::ok(encode(input)),
        "decode" => ToolResponse::ok(decode(input)),
        "info" => ToolResponse::ok(info(input)),
        other => super::unsupported_mode(other),
    }
}

/// Escape everything above U+007F as `\uXXXX`; ASCII passes through.
/// Code points beyond U+FFFF print all their hex digits, so astral chars
/// do not survive a decode round-trip (decode reads exactly four digits).
fn encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if (c as u32) > 0x7f {
            let _ = write!(out, "\\u{:04x}", c as u32);
        } else {
            out.push(c);
        }
    }
    out
}

/// Substitute `\uXXXX` escapes (exactly four hex digits). Malformed
/// sequences pass through untouched rather than failing the whole input.
fn decode(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '\\' && i + 6 <= chars.len() && chars[i + 1] == 'u' {
            let hex: String = chars[i + 2..i + 6].iter().collect();
            if let Some(c) = u32::from_str_radix(&hex, 16)
                .ok()
                .and_then(char::from_u32)
            {
                out.push(c);
                i += 6;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}

fn info(input: &str) -> String {
    input
        .chars()
        .map(|c| format!("'{}' (U+{:04X})", c, c as u32))
        .collect::<Vec<_>>()
        .join("\n")
}
