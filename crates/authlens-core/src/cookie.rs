use std::collections::HashMap;

/// One parsed `Set-Cookie` header value
///
/// `attrs` maps lower-cased attribute names to their trimmed values;
/// boolean attributes (`Secure`, `HttpOnly`) map to the empty string.
#[derive(Debug, Clone, Default)]
pub struct ParsedCookie {
    pub name: String,
    pub value: String,
    pub attrs: HashMap<String, String>,
}

impl ParsedCookie {
    /// Parse one raw `Set-Cookie` header value. Segments are split on `;`
    /// and trimmed; the first non-empty segment is `name=value` (or a bare
    /// name), the rest are attributes.
    pub fn parse(raw: &str) -> Self {
        let mut cookie = ParsedCookie::default();
        let mut first = true;

        for segment in raw.split(';') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            if first {
                first = false;
                match segment.split_once('=') {
                    Some((name, value)) => {
                        cookie.name = name.trim().to_owned();
                        cookie.value = value.trim().to_owned();
                    }
                    None => cookie.name = segment.to_owned(),
                }
            } else {
                match segment.split_once('=') {
                    Some((key, value)) => {
                        cookie
                            .attrs
                            .insert(key.trim().to_lowercase(), value.trim().to_owned());
                    }
                    None => {
                        cookie.attrs.insert(segment.to_lowercase(), String::new());
                    }
                }
            }
        }

        cookie
    }

    pub fn has_attr(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }

    /// Heuristic session-cookie classification: a cookie with neither
    /// `Expires` nor `Max-Age` is a session cookie by default, and names
    /// containing `sid`, `sess`, or `session` are treated as session-like
    /// even when an expiry is set.
    pub fn is_session_like(&self) -> bool {
        if !self.has_attr("expires") && !self.has_attr("max-age") {
            return true;
        }

        let name = self.name.to_lowercase();
        name.contains("sid") || name.contains("sess") || name.contains("session")
    }
}
