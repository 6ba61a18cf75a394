use crate::url::percent_decode;

/// Parameters whose values never belong in a shared report
const SENSITIVE_KEYS: &[&str] = &[
    "code",
    "access_token",
    "id_token",
    "refresh_token",
    "client_secret",
    "assertion",
];

/// Replace the values of sensitive query/fragment parameters with
/// `<redacted len=N>` (N = decoded value length), leaving every other byte
/// of the URL untouched. URLs without query or fragment come back unchanged.
pub fn redact_url(url: &str) -> String {
    let (head, fragment) = match url.split_once('#') {
        Some((head, fragment)) => (head, Some(fragment)),
        None => (url, None),
    };
    let (base, query) = match head.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (head, None),
    };

    if query.is_none() && fragment.is_none() {
        return url.to_owned();
    }

    let mut out = String::with_capacity(url.len());
    out.push_str(base);
    if let Some(query) = query {
        out.push('?');
        out.push_str(&redact_segment(query));
    }
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(&redact_segment(fragment));
    }
    out
}

fn redact_segment(segment: &str) -> String {
    let tokens: Vec<String> = segment
        .split('&')
        .map(|token| match token.split_once('=') {
            Some((key, value)) if SENSITIVE_KEYS.contains(&percent_decode(key).as_str()) => {
                format!(
                    "{}=<redacted len={}>",
                    key,
                    percent_decode(value).chars().count()
                )
            }
            _ => token.to_owned(),
        })
        .collect();
    tokens.join("&")
}
