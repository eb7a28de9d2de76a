use crate::models::{ToolRequest, ToolResponse};

pub fn process(request: &ToolRequest) -> ToolResponse {
    let tokens = match tokenize(&request.input) {
        Ok(tokens) => tokens,
        Err(e) => return ToolResponse::err(e),
    };

    match super::mode(request, "format") {
        "format" => match render(&tokens, true) {
            Ok(formatted) => ToolResponse::ok(formatted),
            Err(e) => ToolResponse::err(e),
        },
        "minify" => match render(&tokens, false) {
            Ok(minified) => ToolResponse::ok(minified),
            Err(e) => ToolResponse::err(e),
        },
        other => super::unsupported_mode(other),
    }
}

#[derive(Debug, PartialEq)]
enum Token {
    Open,
    Close,
    Word(String),
}

/// Split a debug string into words and braces. Quoted string values stay
/// one word, including any braces or whitespace inside them.
fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut in_string = false;
    let mut escaped = false;

    for c in input.chars() {
        if in_string {
            word.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                word.push(c);
                in_string = true;
            }
            '{' | '}' => {
                flush(&mut tokens, &mut word);
                tokens.push(if c == '{' { Token::Open } else { Token::Close });
            }
            c if c.is_whitespace() => flush(&mut tokens, &mut word),
            c => word.push(c),
        }
    }

    if in_string {
        return Err("Unterminated string literal".to_string());
    }
    flush(&mut tokens, &mut word);
    Ok(tokens)
}

fn flush(tokens: &mut Vec<Token>, word: &mut String) {
    if !word.is_empty() {
        tokens.push(Token::Word(std::mem::take(word)));
    }
}

fn render(tokens: &[Token], pretty: bool) -> Result<String, String> {
    let mut lines: Vec<(usize, String)> = Vec::new();
    let mut depth: usize = 0;
    let mut i = 0;

    while i < tokens.len() {
        match &tokens[i] {
            Token::Word(word) => {
                // `key: value` pairs and `key {` openers fold onto one line.
                match tokens.get(i + 1) {
                    Some(Token::Word(value)) if word.ends_with(':') => {
                        lines.push((depth, format!("{} {}", word, value)));
                        i += 2;
                    }
                    Some(Token::Open) => {
                        lines.push((depth, format!("{} {{", word)));
                        depth += 1;
                        i += 2;
                    }
                    _ => {
                        lines.push((depth, word.clone()));
                        i += 1;
                    }
                }
            }
            Token::Open => {
                lines.push((depth, "{".to_string()));
                depth += 1;
                i += 1;
            }
            Token::Close => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| "Unbalanced braces: unexpected '}'".to_string())?;
                lines.push((depth, "}".to_string()));
                i += 1;
            }
        }
    }

    if depth != 0 {
        return Err("Unbalanced braces: missing '}'".to_string());
    }

    let rendered = if pretty {
        lines
            .iter()
            .map(|(depth, line)| format!("{}{}", "  ".repeat(*depth), line))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        lines
            .iter()
            .map(|(_, line)| line.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    };

    Ok(rendered)
}
