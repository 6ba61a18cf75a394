use authlens_core::trace::TraceEvent;
use authlens_core::url::{self, EndpointKind};
use std::collections::HashMap;

/// Accumulated OAuth/OIDC flow state across one forward pass of a trace
///
/// Mutation semantics matter here: boolean flags are monotonic (they only
/// ever turn true, except `pkce_is_s256` which starts true and only ever
/// turns false), the two state optionals are set at most once, and
/// `callback_state_mismatch` is sticky. Events must be observed strictly in
/// trace order.
#[derive(Debug, Clone)]
pub struct FlowState {
    pub saw_authorize: bool,
    pub saw_token_endpoint: bool,
    pub pkce_seen: bool,
    pub pkce_is_s256: bool,
    /// First `state` value seen on an authorize request (set once)
    pub authorize_state: Option<String>,
    /// First `state` value seen on any request (set once; query wins over
    /// fragment within one event)
    pub callback_state: Option<String>,
    pub callback_has_code: bool,
    pub callback_has_state: bool,
    pub callback_state_mismatch: bool,
    pub oidc_authorize: bool,
    pub authorize_has_nonce: bool,
    pub token_body_observed: bool,
    pub token_has_code_verifier: bool,
}

impl Default for FlowState {
    fn default() -> Self {
        Self {
            saw_authorize: false,
            saw_token_endpoint: false,
            pkce_seen: false,
            pkce_is_s256: true,
            authorize_state: None,
            callback_state: None,
            callback_has_code: false,
            callback_has_state: false,
            callback_state_mismatch: false,
            oidc_authorize: false,
            authorize_has_nonce: false,
            token_body_observed: false,
            token_has_code_verifier: false,
        }
    }
}

impl FlowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the flow state. Events without a usable URL are
    /// ignored.
    pub fn observe(&mut self, event: &TraceEvent) {
        let Some(url) = event.url() else {
            return;
        };

        let query = url::query_params(url);
        let fragment = url::fragment_params(url);

        match EndpointKind::classify(url) {
            EndpointKind::Authorize => self.observe_authorize(&query),
            EndpointKind::Token => self.observe_token_endpoint(event),
            EndpointKind::Other => {}
        }

        // Callback signals are tracked for every event, including the
        // authorize request itself (its own state seeds callback_state).
        self.observe_callback_params(&query, &fragment);
    }

    fn observe_authorize(&mut self, query: &HashMap<String, String>) {
        self.saw_authorize = true;

        if self.authorize_state.is_none()
            && let Some(state) = query.get("state")
        {
            self.authorize_state = Some(state.clone());
        }

        if query.contains_key("code_challenge") {
            self.pkce_seen = true;
        }
        if let Some(method) = query.get("code_challenge_method")
            && !method.eq_ignore_ascii_case("s256")
        {
            self.pkce_is_s256 = false;
        }

        if query.contains_key("nonce") {
            self.authorize_has_nonce = true;
        }

        let response_type_oidc = query
            .get("response_type")
            .is_some_and(|v| v.to_ascii_lowercase().contains("id_token"));
        let scope_oidc = query
            .get("scope")
            .is_some_and(|v| v.to_ascii_lowercase().contains("openid"));
        if response_type_oidc || scope_oidc {
            self.oidc_authorize = true;
        }
    }

    fn observe_token_endpoint(&mut self, event: &TraceEvent) {
        self.saw_token_endpoint = true;

        if let Some(keys) = &event.request_body_keys {
            self.token_body_observed = true;
            if keys.iter().any(|k| k.eq_ignore_ascii_case("code_verifier")) {
                self.token_has_code_verifier = true;
            }
        }
    }

    fn observe_callback_params(
        &mut self,
        query: &HashMap<String, String>,
        fragment: &HashMap<String, String>,
    ) {
        if query.contains_key("code") || fragment.contains_key("code") {
            self.callback_has_code = true;
        }

        if let Some(state) = query.get("state").or_else(|| fragment.get("state")) {
            self.callback_has_state = true;
            if self.callback_state.is_none() {
                self.callback_state = Some(state.clone());
            }
            if let (Some(authorize), Some(callback)) =
                (&self.authorize_state, &self.callback_state)
                && authorize != callback
            {
                self.callback_state_mismatch = true;
            }
        }
    }
}
