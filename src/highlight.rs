/// Lightweight YAML syntax highlighting for the compose viewer
///
/// Not a YAML parser: each line is split into keys, quoted strings,
/// literals and comments with a few lexical rules, which is all the viewer
/// needs to colour a compose file. Concatenating the token texts always
/// gives back the input unchanged.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Key,
    String,
    Literal,
    Comment,
    Plain,
}

impl TokenKind {
    /// CSS-style class used by `to_markup`
    pub fn class(&self) -> &'static str {
        match self {
            TokenKind::Key => "yaml-key",
            TokenKind::String => "yaml-string",
            TokenKind::Literal => "yaml-literal",
            TokenKind::Comment => "yaml-comment",
            TokenKind::Plain => "yaml-plain",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

/// Split a YAML document into highlight tokens
pub fn highlight(yaml: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (index, line) in yaml.split('\n').enumerate() {
        if index > 0 {
            push(&mut tokens, TokenKind::Plain, "\n");
        }
        highlight_line(line, &mut tokens);
    }
    tokens
}

/// Render tokens as HTML-ish markup with one `<span>` per coloured token
pub fn to_markup(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens {
        match token.kind {
            TokenKind::Plain => out.push_str(&escape(&token.text)),
            kind => {
                out.push_str(&format!(
                    "<span class=\"{}\">{}</span>",
                    kind.class(),
                    escape(&token.text)
                ));
            }
        }
    }
    out
}

fn highlight_line(line: &str, tokens: &mut Vec<Token>) {
    let (code, comment) = split_comment(line);

    let body = code.trim_start();
    let (indent, body) = code.split_at(code.len() - body.len());
    push(tokens, TokenKind::Plain, indent);

    // Sequence marker
    let body = match body.strip_prefix("- ") {
        Some(rest) => {
            push(tokens, TokenKind::Plain, "- ");
            rest
        }
        None => body,
    };

    let key_len = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.'))
        .unwrap_or(body.len());
    let after_key = &body[key_len..];
    let is_key = key_len > 0
        && after_key.starts_with(':')
        && after_key[1..].chars().next().map_or(true, char::is_whitespace);

    let value = if is_key {
        push(tokens, TokenKind::Key, &body[..=key_len]);
        &body[key_len + 1..]
    } else {
        body
    };

    highlight_value(value, tokens);
    push(tokens, TokenKind::Comment, comment);
}

fn highlight_value(mut rest: &str, tokens: &mut Vec<Token>) {
    while let Some(ch) = rest.chars().next() {
        let (kind, len) = if ch == '"' || ch == '\'' {
            let len = rest[1..].find(ch).map_or(rest.len(), |i| i + 2);
            (TokenKind::String, len)
        } else if ch.is_whitespace() {
            let len = rest.find(|c: char| !c.is_whitespace()).unwrap_or(rest.len());
            (TokenKind::Plain, len)
        } else {
            let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let kind = if is_literal(&rest[..len]) {
                TokenKind::Literal
            } else {
                TokenKind::Plain
            };
            (kind, len)
        };

        push(tokens, kind, &rest[..len]);
        rest = &rest[len..];
    }
}

/// Split off a trailing `# comment`. A `#` only starts a comment at the
/// beginning of the line or after whitespace, and never inside quotes.
fn split_comment(line: &str) -> (&str, &str) {
    let mut quote: Option<char> = None;
    let mut previous: Option<char> = None;

    for (index, ch) in line.char_indices() {
        match quote {
            Some(q) if ch == q => quote = None,
            Some(_) => {}
            None if ch == '"' || ch == '\'' => quote = Some(ch),
            None if ch == '#' && previous.map_or(true, char::is_whitespace) => {
                return line.split_at(index);
            }
            None => {}
        }
        previous = Some(ch);
    }

    (line, "")
}

fn is_literal(word: &str) -> bool {
    matches!(word, "true" | "false" | "null")
        || (!word.is_empty() && word.chars().all(|c| c.is_ascii_digit()))
}

/// Append text, merging runs of plain text into one token
fn push(tokens: &mut Vec<Token>, kind: TokenKind, text: &str) {
    if text.is_empty() {
        return;
    }
    if kind == TokenKind::Plain {
        if let Some(last) = tokens.last_mut().filter(|t| t.kind == TokenKind::Plain) {
            last.text.push_str(text);
            return;
        }
    }
    tokens.push(Token {
        kind,
        text: text.to_string(),
    });
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}
