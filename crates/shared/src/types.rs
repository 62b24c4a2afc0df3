//! Common types used across the WKD router

// =============================================================================
// Domain Set
// =============================================================================

/// Ordered list of root domains the router serves.
///
/// Parsed from a comma-separated configuration value. Entries are trimmed and
/// blank entries dropped; order and duplicates are preserved, so the first
/// entry is always the default domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainSet(Vec<String>);

impl DomainSet {
    /// Parse a comma-separated domain list
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// The first configured domain, used in place of loopback hostnames
    pub fn default_domain(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Find the root domain a hostname belongs to
    ///
    /// Returns the first configured domain that either equals the hostname or
    /// is a dot-separated suffix of it.
    pub fn find_root(&self, hostname: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|domain| {
                hostname == domain.as_str()
                    || hostname
                        .strip_suffix(domain.as_str())
                        .is_some_and(|rest| rest.ends_with('.'))
            })
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

// =============================================================================
// Tests
// =============================================================================
