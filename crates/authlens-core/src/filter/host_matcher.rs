use glob::Pattern;

/// A hostname pattern scoping which trace events get analyzed
#[derive(Debug, Clone)]
pub enum HostPattern {
    /// Bare domain: matches the host itself and any subdomain
    /// (`example.com` matches both `example.com` and `api.example.com`)
    Suffix(String),
    /// Glob pattern (e.g. `*.example.com`, `api-?.test`)
    Glob(Pattern),
}

impl HostPattern {
    /// Parse a pattern string. Anything containing `*` or `?` is a glob;
    /// everything else matches as a domain suffix. Matching is
    /// case-insensitive either way.
    pub fn parse(pattern: &str) -> crate::Result<Self> {
        if pattern.contains('*') || pattern.contains('?') {
            let glob_pattern = Pattern::new(&pattern.to_lowercase()).map_err(|e| {
                crate::Error::InvalidPattern(format!("Invalid host pattern '{}': {}", pattern, e))
            })?;
            Ok(HostPattern::Glob(glob_pattern))
        } else {
            Ok(HostPattern::Suffix(pattern.to_lowercase()))
        }
    }

    /// Check whether a hostname matches this pattern
    pub fn matches(&self, hostname: &str) -> bool {
        let hostname = hostname.to_lowercase();
        match self {
            HostPattern::Suffix(domain) => {
                hostname == *domain || hostname.ends_with(&format!(".{}", domain))
            }
            HostPattern::Glob(pattern) => pattern.matches(&hostname),
        }
    }
}
