//! Web Key Directory lookups
//!
//! A WKD client asks either for a domain's policy document or for a single
//! user's key ("hu" lookup, keyed by the hashed local part). Both are served
//! by the fixed upstream key-discovery service under a per-domain path:
//!
//! ```text
//! <base>/.well-known/openpgpkey/<domain>/policy
//! <base>/.well-known/openpgpkey/<domain>/hu/<hash>?l=<local-part>
//! ```

use url::Url;

use crate::error::WkdError;

/// Upstream key-discovery service all WKD lookups are forwarded to
pub const UPSTREAM_BASE_URL: &str = "https://api.protonmail.ch";

/// Hostname prefix of the WKD "advanced" method (openpgpkey.<domain>)
pub const OPENPGPKEY_SUBDOMAIN_PREFIX: &str = "openpgpkey.";

/// Path prefix of the WKD "direct" method
pub const WELL_KNOWN_PATH_PREFIX: &str = "/.well-known/openpgpkey/";

/// Path segment after which the lookup segments start in the direct method
pub const OPENPGPKEY_SEGMENT: &str = "openpgpkey";

/// Lookup key that selects the policy document
pub const POLICY_KEYWORD: &str = "policy";

/// Query parameter carrying the plaintext local part
pub const LOCAL_PART_PARAM: &str = "l";

/// What a key-discovery request is asking for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyLookup {
    /// The domain's policy document
    Policy,
    /// A user's key by hashed local part
    Hu { hash: String, local_part: String },
}

impl KeyLookup {
    /// Classify a lookup key
    ///
    /// The policy keyword never needs a local part; anything else is an hu
    /// lookup and requires a non-empty one.
    pub fn new(lookup_key: &str, local_part: Option<&str>) -> Result<Self, WkdError> {
        if lookup_key == POLICY_KEYWORD {
            return Ok(Self::Policy);
        }

        match local_part {
            Some(local_part) if !local_part.is_empty() => Ok(Self::Hu {
                hash: lookup_key.to_string(),
                local_part: local_part.to_string(),
            }),
            _ => Err(WkdError::MissingLocalPart),
        }
    }

    /// Build the upstream URL for this lookup under `root_domain`
    pub fn upstream_url(&self, base: &str, root_domain: &str) -> Result<Url, WkdError> {
        let base = base.trim_end_matches('/');

        match self {
            Self::Policy => Ok(Url::parse(&format!(
                "{base}/.well-known/openpgpkey/{root_domain}/policy"
            ))?),
            Self::Hu { hash, local_part } => {
                let mut url = Url::parse(&format!(
                    "{base}/.well-known/openpgpkey/{root_domain}/hu/{hash}"
                ))?;
                url.query_pairs_mut()
                    .append_pair(LOCAL_PART_PARAM, local_part);
                Ok(url)
            }
        }
    }

    pub fn is_policy(&self) -> bool {
        matches!(self, Self::Policy)
    }
}
