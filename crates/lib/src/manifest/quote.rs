//! Token quoting for module files.

/// Whether `s` must be quoted to survive as a single token.
pub fn must_quote(s: &str) -> bool {
  if s.is_empty() || s.contains("//") || s.contains("/*") {
    return true;
  }
  s.chars().any(|c| match c {
    ' ' | '"' | '\'' | '`' => true,
    '(' | ')' | '[' | ']' | '{' | '}' | ',' => s.len() > 1,
    c => c.is_whitespace() || c.is_control(),
  })
}

/// Quote `s` only when it cannot be written as a bare token.
pub fn auto_quote(s: &str) -> String {
  if !must_quote(s) {
    return s.to_string();
  }

  let mut quoted = String::with_capacity(s.len() + 2);
  quoted.push('"');
  for c in s.chars() {
    match c {
      '"' => quoted.push_str("\\\""),
      '\\' => quoted.push_str("\\\\"),
      '\n' => quoted.push_str("\\n"),
      '\r' => quoted.push_str("\\r"),
      '\t' => quoted.push_str("\\t"),
      c if c.is_control() && (c as u32) < 0x80 => quoted.push_str(&format!("\\x{:02x}", c as u32)),
      c => quoted.push(c),
    }
  }
  quoted.push('"');
  quoted
}

/// Decode a raw token: double-quoted strings are unescaped, backquoted
/// strings are taken literally, anything else is returned as-is.
pub fn unquote(token: &str) -> Result<String, String> {
  if let Some(raw) = token.strip_prefix('`') {
    return raw
      .strip_suffix('`')
      .map(str::to_string)
      .ok_or_else(|| format!("unterminated raw string {}", token));
  }

  let Some(inner) = token.strip_prefix('"') else {
    return Ok(token.to_string());
  };
  let inner = inner
    .strip_suffix('"')
    .ok_or_else(|| format!("unterminated quoted string {}", token))?;

  let mut out = String::with_capacity(inner.len());
  let mut chars = inner.chars();
  while let Some(c) = chars.next() {
    if c != '\\' {
      out.push(c);
      continue;
    }
    match chars.next() {
      Some('n') => out.push('\n'),
      Some('r') => out.push('\r'),
      Some('t') => out.push('\t'),
      Some('\\') => out.push('\\'),
      Some('"') => out.push('"'),
      Some('\'') => out.push('\''),
      Some('x') => {
        let hex: String = chars.by_ref().take(2).collect();
        let value = u8::from_str_radix(&hex, 16).map_err(|_| format!("invalid \\x escape in {}", token))?;
        out.push(char::from(value));
      }
      Some(other) => return Err(format!("invalid escape \\{} in {}", other, token)),
      None => return Err(format!("trailing backslash in {}", token)),
    }
  }
  Ok(out)
}
