use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use std::ops::Range;

/// Endpoint classification for a request URL
///
/// Classification is case-insensitive substring search, not structural path
/// parsing; real-world authorization servers sit behind arbitrary API
/// prefixes. A URL matching both the authorize and token substrings (such
/// as `/oauth/authorize/token-callback`) classifies as `Authorize`, never
/// `Token`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Authorize,
    Token,
    Other,
}

impl EndpointKind {
    /// Classify a URL as an OAuth authorize request, token endpoint
    /// request, or neither
    pub fn classify(url: &str) -> Self {
        if contains_ignore_case(url, "/oauth/authorize") || contains_ignore_case(url, "/authorize")
        {
            EndpointKind::Authorize
        } else if contains_ignore_case(url, "/oauth/token") || contains_ignore_case(url, "/token") {
            EndpointKind::Token
        } else {
            EndpointKind::Other
        }
    }
}

lazy_static! {
    static ref AUTH_ENDPOINT_PATTERN: Regex = Regex::new(
        r"(?i)/(oauth/authorize|authorize|oauth2/authorize|token|oauth/token|userinfo)\b"
    )
    .unwrap();
    static ref AUTH_PARAM_PATTERN: Regex =
        Regex::new(r"(?i)[?&#](code|state|id_token|access_token)=").unwrap();
    static ref WELL_KNOWN_PATTERN: Regex =
        Regex::new(r"(?i)\.well-known/(openid-configuration|jwks\.json)").unwrap();
}

/// Whether a URL carries any OAuth/OIDC signal at all (endpoints, flow
/// parameters, or discovery documents). Used to warn when a trace contains
/// nothing worth analyzing; findings never depend on it.
pub fn is_auth_url(url: &str) -> bool {
    AUTH_ENDPOINT_PATTERN.is_match(url)
        || AUTH_PARAM_PATTERN.is_match(url)
        || WELL_KNOWN_PATTERN.is_match(url)
}

/// Decoded parameters from the query segment: the substring between the
/// first `?` and the first `#` after it (or the end of the string)
pub fn query_params(url: &str) -> HashMap<String, String> {
    match query_range(url) {
        Some(range) => parse_params(&url[range]),
        None => HashMap::new(),
    }
}

/// Decoded parameters from the fragment segment: the substring after the
/// first `#`
pub fn fragment_params(url: &str) -> HashMap<String, String> {
    match fragment_range(url) {
        Some(range) => parse_params(&url[range]),
        None => HashMap::new(),
    }
}

fn query_range(url: &str) -> Option<Range<usize>> {
    let q = url.find('?')?;
    let end = url[q..].find('#').map_or(url.len(), |h| q + h);
    Some(q + 1..end)
}

fn fragment_range(url: &str) -> Option<Range<usize>> {
    let h = url.find('#')?;
    if h + 1 >= url.len() {
        return None;
    }
    Some(h + 1..url.len())
}

fn parse_params(segment: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    for token in segment.split('&') {
        match token.split_once('=') {
            Some((key, value)) => {
                out.insert(percent_decode(key), percent_decode(value));
            }
            None => {
                if !token.is_empty() {
                    out.insert(percent_decode(token), String::new());
                }
            }
        }
    }
    out
}

/// Percent-decode a query/fragment token: `+` becomes space, `%XY` with two
/// hex digits becomes that byte, anything malformed passes through
/// literally. Byte sequences that do not form valid UTF-8 are replaced
/// lossily.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                let hi = (bytes[i + 1] as char).to_digit(16);
                let lo = (bytes[i + 2] as char).to_digit(16);
                if let (Some(hi), Some(lo)) = (hi, lo) {
                    out.push((hi * 16 + lo) as u8);
                    i += 3;
                } else {
                    out.push(b'%');
                    i += 1;
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}
