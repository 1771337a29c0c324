//! Flattening of list literals embedded in list items.
//!
//! Upstream data sometimes carries a sub-list serialized as text in the last
//! slot of a list, e.g. `['c', 'd']`. Only that slot is inspected, and only
//! one shape is understood: a bracketed, comma-separated sequence of quoted
//! strings or numbers. Anything else stays a plain item. Numbers come out in
//! their evaluated form, so `1e3` reads `1000.0`.

/// Flatten a list literal found in the last item, if any.
///
/// ```
/// use odfill::odf::template::normalize_nested_items;
/// let raw = vec!["a".to_string(), "b".to_string(), "['c', 'd']".to_string()];
/// assert_eq!(normalize_nested_items(&raw), ["a", "b", "c", "d"]);
/// ```
pub fn normalize_nested_items<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let Some((last, head)) = raw.split_last() else {
        return Vec::new();
    };

    let mut items: Vec<String> = head.iter().map(|s| s.as_ref().to_string()).collect();
    match parse_list_literal(last.as_ref()) {
        Some(nested) => items.extend(nested),
        None => items.push(last.as_ref().to_string()),
    }
    items
}

/// Parse `[elem, elem, ...]` where each element is a quoted string or a
/// number. Returns `None` for any other input.
pub fn parse_list_literal(text: &str) -> Option<Vec<String>> {
    let inner = text.trim().strip_prefix('[')?.strip_suffix(']')?;
    let mut cursor = Cursor {
        chars: inner.chars().collect(),
        pos: 0,
    };

    let mut out = Vec::new();
    loop {
        cursor.skip_whitespace();
        if cursor.at_end() {
            return Some(out);
        }
        out.push(cursor.element()?);
        cursor.skip_whitespace();
        match cursor.next() {
            None => return Some(out),
            Some(',') => {},
            Some(_) => return None,
        }
    }
}

struct Cursor {
    chars: Vec<char>,
    pos: usize,
}

impl Cursor {
    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn element(&mut self) -> Option<String> {
        match self.peek()? {
            quote @ ('\'' | '"') => {
                self.pos += 1;
                self.quoted(quote)
            },
            c if c.is_ascii_digit() || c == '-' || c == '+' || c == '.' => self.number(),
            _ => None,
        }
    }

    fn quoted(&mut self, quote: char) -> Option<String> {
        let mut value = String::new();
        loop {
            match self.next()? {
                c if c == quote => return Some(value),
                '\\' => value.push(match self.next()? {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                }),
                c => value.push(c),
            }
        }
    }

    fn number(&mut self) -> Option<String> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
        {
            self.pos += 1;
        }
        let literal: String = self.chars[start..self.pos].iter().collect();
        canonical_number(&literal)
    }
}

/// Render a numeric literal the way it prints once evaluated: integers
/// without sign noise (`+3` is `3`), floats in shortest round-trip form
/// with a mandatory fraction (`1e3` is `1000.0`, `.5` is `0.5`) and an
/// exponent outside `1e-4..1e16` (`1e+20`, `1e-05`).
fn canonical_number(literal: &str) -> Option<String> {
    if !literal.contains(['.', 'e', 'E']) {
        return match literal.parse::<i128>() {
            Ok(n) => Some(n.to_string()),
            Err(_) => literal.trim_start_matches(['+', '-']).parse::<u128>().ok().map(|_| literal.to_string()),
        };
    }

    let value = literal.parse::<f64>().ok()?;
    let magnitude = value.abs();
    if value.is_finite() && (magnitude == 0.0 || (1e-4..1e16).contains(&magnitude)) {
        let text = value.to_string();
        return Some(if text.contains('.') { text } else { format!("{text}.0") });
    }
    if !value.is_finite() {
        return Some(if value.is_nan() { "nan" } else if value > 0.0 { "inf" } else { "-inf" }.to_string());
    }

    let text = format!("{value:e}");
    let (mantissa, exponent) = text.split_once('e')?;
    let exponent: i32 = exponent.parse().ok()?;
    let sign = if exponent < 0 { '-' } else { '+' };
    Some(format!("{mantissa}e{sign}{:02}", exponent.unsigned_abs()))
}
