use authlens_core::cookie::ParsedCookie;
use authlens_core::redact::redact_url;
use authlens_core::trace::TraceEvent;
use authlens_core::url;

use super::findings::{Confidence, Finding, Severity};
use super::flow::FlowState;

/// Per-event rules: token leakage into the URL and insecure Set-Cookie
/// attributes. Evaluated for every event with a usable URL, in trace order.
pub struct EventRules;

impl EventRules {
    /// Evaluate all per-event rules for one event. With `redact_evidence`
    /// set, sensitive parameter values are scrubbed from URL evidence
    /// before it lands in a finding.
    pub fn evaluate(event: &TraceEvent, redact_evidence: bool) -> Vec<Finding> {
        let mut findings = Vec::new();
        let Some(raw_url) = event.url() else {
            return findings;
        };

        let query = url::query_params(raw_url);
        let fragment = url::fragment_params(raw_url);
        let evidence_url = if redact_evidence {
            redact_url(raw_url)
        } else {
            raw_url.to_owned()
        };

        if query.contains_key("access_token")
            || query.contains_key("id_token")
            || query.contains_key("refresh_token")
        {
            findings.push(Finding {
                id: "TOKEN_IN_QUERY".to_string(),
                severity: Severity::High,
                confidence: Some(Confidence::High),
                title: "Token appears in URL query string".to_string(),
                why: Some("URLs are logged and can leak via referrer headers.".to_string()),
                fix: "Do not put tokens in URLs. Use Authorization header or secure cookies."
                    .to_string(),
                evidence: vec![evidence_url.clone()],
            });
        }

        if fragment.contains_key("access_token") || fragment.contains_key("id_token") {
            findings.push(Finding {
                id: "TOKEN_IN_FRAGMENT".to_string(),
                severity: Severity::Med,
                confidence: Some(Confidence::Med),
                title: "Token appears in URL fragment".to_string(),
                why: Some("Fragments can be exposed to browser history or extensions.".to_string()),
                fix: "Avoid implicit/hybrid flows; use Authorization Code + PKCE.".to_string(),
                evidence: vec![evidence_url],
            });
        }

        // Each Set-Cookie header value is judged on its own; one response
        // can yield several cookie findings.
        if let Some(headers) = &event.response_headers {
            for raw_cookie in headers.values("set-cookie") {
                findings.extend(Self::evaluate_set_cookie(raw_cookie));
            }
        }

        findings
    }

    fn evaluate_set_cookie(raw: &str) -> Vec<Finding> {
        let mut findings = Vec::new();
        let cookie = ParsedCookie::parse(raw);

        let secure = cookie.has_attr("secure");
        let httponly = cookie.has_attr("httponly");
        let samesite_none = cookie
            .attrs
            .get("samesite")
            .is_some_and(|v| v.eq_ignore_ascii_case("none"));

        if cookie.is_session_like() {
            if !secure {
                findings.push(Finding {
                    id: "COOKIE_MISSING_SECURE".to_string(),
                    severity: Severity::Med,
                    confidence: Some(Confidence::Med),
                    title: "Session cookie missing Secure".to_string(),
                    why: Some(
                        "Session cookies without Secure can be sent over HTTP.".to_string(),
                    ),
                    fix: "Mark session cookies Secure (and serve over HTTPS).".to_string(),
                    evidence: vec![raw.to_owned()],
                });
            }
            if !httponly {
                findings.push(Finding {
                    id: "COOKIE_MISSING_HTTPONLY".to_string(),
                    severity: Severity::Med,
                    confidence: Some(Confidence::Med),
                    title: "Session cookie missing HttpOnly".to_string(),
                    why: Some("Missing HttpOnly increases risk of XSS token theft.".to_string()),
                    fix: "Mark session cookies HttpOnly to reduce XSS token theft risk."
                        .to_string(),
                    evidence: vec![raw.to_owned()],
                });
            }
        }

        if samesite_none && !secure {
            findings.push(Finding {
                id: "SAMESITE_NONE_WITHOUT_SECURE".to_string(),
                severity: Severity::High,
                confidence: Some(Confidence::High),
                title: "SameSite=None cookie without Secure".to_string(),
                why: Some("Browsers reject SameSite=None cookies without Secure.".to_string()),
                fix: "Chrome requires Secure when SameSite=None. Add Secure or change SameSite."
                    .to_string(),
                evidence: vec![raw.to_owned()],
            });
        }

        findings
    }
}

/// Aggregate rules: pure functions of the final flow state, evaluated once
/// after the full pass, in a fixed order.
pub struct FlowRules;

impl FlowRules {
    pub fn evaluate(state: &FlowState) -> Vec<Finding> {
        let mut findings = Vec::new();

        if state.callback_has_code && !state.callback_has_state {
            findings.push(Finding {
                id: "STATE_MISSING".to_string(),
                severity: Severity::High,
                confidence: Some(Confidence::High),
                title: "Callback has code but no state".to_string(),
                why: Some("State is required to prevent CSRF and code injection.".to_string()),
                fix: "Always include and validate state to prevent CSRF/code injection."
                    .to_string(),
                evidence: vec![],
            });
        }

        if state.callback_state_mismatch {
            findings.push(Finding {
                id: "STATE_MISMATCH".to_string(),
                severity: Severity::High,
                confidence: Some(Confidence::High),
                title: "Callback state does not match authorize state".to_string(),
                why: Some("Mismatched state indicates possible request forgery.".to_string()),
                fix: "Reject callbacks with unexpected state values.".to_string(),
                evidence: vec![],
            });
        }

        if state.oidc_authorize && !state.authorize_has_nonce {
            findings.push(Finding {
                id: "NONCE_MISSING".to_string(),
                severity: Severity::High,
                confidence: Some(Confidence::High),
                title: "Authorize request missing nonce".to_string(),
                why: Some("OIDC requires nonce to prevent token replay.".to_string()),
                fix: "Include a nonce for OIDC flows and validate it in the ID token.".to_string(),
                evidence: vec![],
            });
        }

        // At most one of PKCE_MISSING / PKCE_NOT_S256 fires per trace
        if state.saw_authorize && !state.pkce_seen {
            findings.push(Finding {
                id: "PKCE_MISSING".to_string(),
                severity: Severity::High,
                confidence: Some(Confidence::High),
                title: "Authorize request missing PKCE code_challenge".to_string(),
                why: Some(
                    "PKCE mitigates code interception attacks for public clients.".to_string(),
                ),
                fix: "For public clients, require Authorization Code + PKCE and validate \
                      code_verifier at token exchange."
                    .to_string(),
                evidence: vec![],
            });
        } else if state.saw_authorize && state.pkce_seen && !state.pkce_is_s256 {
            findings.push(Finding {
                id: "PKCE_NOT_S256".to_string(),
                severity: Severity::Med,
                confidence: Some(Confidence::Med),
                title: "PKCE code_challenge_method is not S256".to_string(),
                why: Some("S256 is the recommended PKCE method.".to_string()),
                fix: "Prefer S256 for PKCE. Avoid 'plain' except in constrained environments."
                    .to_string(),
                evidence: vec![],
            });
        }

        if state.saw_authorize && !state.saw_token_endpoint {
            findings.push(Finding {
                id: "AUTHORIZE_BUT_NO_TOKEN".to_string(),
                severity: Severity::Low,
                confidence: Some(Confidence::Low),
                title: "Authorize flow detected but token exchange not observed".to_string(),
                why: Some(
                    "Missing token exchange may indicate failed flow or sampling gaps."
                        .to_string(),
                ),
                fix: "If using Authorization Code flow, ensure the client exchanges the code at \
                      the token endpoint."
                    .to_string(),
                evidence: vec![],
            });
        }

        if state.saw_token_endpoint && state.token_body_observed && !state.token_has_code_verifier
        {
            findings.push(Finding {
                id: "PKCE_VERIFIER_MISSING".to_string(),
                severity: Severity::Med,
                confidence: Some(Confidence::Med),
                title: "Token request missing code_verifier".to_string(),
                why: Some("Missing code_verifier prevents PKCE validation.".to_string()),
                fix: "Include code_verifier in token requests for Authorization Code + PKCE."
                    .to_string(),
                evidence: vec![],
            });
        }

        findings
    }
}
