use serde::{Deserialize, Serialize};

/// One detected issue with severity, rationale, remediation, and evidence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
    pub fix: String,
    /// Raw strings supporting the finding (offending URL or Set-Cookie
    /// value); empty for aggregate findings
    pub evidence: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Med,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Med => "MED",
            Severity::Low => "LOW",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    High,
    Med,
    Low,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), r#""HIGH""#);
        assert_eq!(serde_json::to_string(&Severity::Med).unwrap(), r#""MED""#);
        assert_eq!(serde_json::to_string(&Severity::Low).unwrap(), r#""LOW""#);
    }

    #[test]
    fn test_optional_fields_omitted() {
        let finding = Finding {
            id: "X".to_string(),
            severity: Severity::Low,
            confidence: None,
            title: "t".to_string(),
            why: None,
            fix: "f".to_string(),
            evidence: vec![],
        };

        let json = serde_json::to_string(&finding).unwrap();
        assert!(!json.contains("confidence"));
        assert!(!json.contains("why"));
        assert!(json.contains(r#""evidence":[]"#));
    }
}
