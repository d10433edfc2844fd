//! Diagnostic analysis
//!
//! Turns a completed [`RunResult`] into a verdict. The pipeline is pure and
//! runs in four stages:
//!
//! 1. [`StatusIndex::build`] folds the probe results into per-signal slots
//! 2. [`derive_tokens`] applies the rule list in order and dedupes
//! 3. [`expand_tokens`] looks each token up in the static table
//! 4. [`compute_scores`] reduces the details to the two readiness scores

#[cfg(test)]
mod comprehensive_tests;
pub mod score;
pub mod status_index;
pub mod table;
pub mod tokens;

pub use score::{compute_scores, MAX_SCORE, NOT_APPLICABLE};
pub use status_index::StatusIndex;
pub use table::{expand_token, expand_tokens, TokenColor, TokenDetail};
pub use tokens::{dedupe, derive_tokens};

use crate::models::RunResult;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Stable diagnosis identifier such as `ipv4_only` or `avoids_ipv6`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DiagnosticToken(Cow<'static, str>);

impl DiagnosticToken {
    pub const NO_ADDRESS: Self = Self::from_static("no_address");
    pub const IPV4_NO_ADDRESS: Self = Self::from_static("ipv4:no_address");
    pub const IPV6_NO_ADDRESS: Self = Self::from_static("ipv6:no_address");
    pub const IPV4_ONLY: Self = Self::from_static("ipv4_only");
    pub const IPV4_ONLY_DS_GOOD: Self = Self::from_static("ipv4_only:ds_good");
    pub const IPV4_ONLY_DS_SLOW: Self = Self::from_static("ipv4_only:ds_slow");
    pub const IPV4_ONLY_DS_TIMEOUT: Self = Self::from_static("ipv4_only:ds_timeout");
    pub const IPV6_ONLY: Self = Self::from_static("ipv6_only");
    pub const AVOIDS_IPV6: Self = Self::from_static("avoids_ipv6");
    pub const DUALSTACK_SAFE: Self = Self::from_static("dualstack:safe");
    pub const DUALSTACK_UNSAFE: Self = Self::from_static("dualstack:unsafe");
    pub const V6NS_OK: Self = Self::from_static("v6ns:ok");
    pub const V6NS_BAD: Self = Self::from_static("v6ns:bad");
    pub const IPV6_MTU: Self = Self::from_static("IPv6 MTU");
    pub const NEEDS_IPV6: Self = Self::from_static("needs_ipv6");
    pub const TEREDO: Self = Self::from_static("teredo");
    pub const SIX_TO_FOUR: Self = Self::from_static("6to4");

    pub const fn from_static(token: &'static str) -> Self {
        Self(Cow::Borrowed(token))
    }

    pub fn new<S: Into<String>>(token: S) -> Self {
        Self(Cow::Owned(token.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiagnosticToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for DiagnosticToken {
    fn from(token: &'static str) -> Self {
        Self::from_static(token)
    }
}

impl From<String> for DiagnosticToken {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

impl AsRef<str> for DiagnosticToken {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Final verdict for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Expanded tokens sorted by identifier
    pub tokens: Vec<TokenDetail>,
    /// Dual-stack readiness, 0..=10 or -1
    pub score_transition: i32,
    /// IPv6-only readiness, 0..=10 or -1
    pub score_strict: i32,
    /// ipv4_dns, ipv6_dns, ds-as-ipv4, ds-as-ipv6
    pub mini_primary: String,
    /// ipv6_mtu, dns_v6_resolver
    pub mini_secondary: String,
}

impl Analysis {
    pub fn has_token(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t.token.as_str() == token)
    }

    pub fn token_names(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.token.as_str()).collect()
    }
}

/// Analyze a completed run
pub fn analyze(run: &RunResult) -> Analysis {
    let index = StatusIndex::build(run);
    let mini_primary = index.mini_primary();
    let mini_secondary = index.mini_secondary();

    let tokens = dedupe(derive_tokens(&index, &mini_primary));
    let details = expand_tokens(&tokens);
    let (score_transition, score_strict) = compute_scores(&details);

    Analysis {
        tokens: details,
        score_transition,
        score_strict,
        mini_primary,
        mini_secondary,
    }
}
