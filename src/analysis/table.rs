//! Static token table and expansion

use super::DiagnosticToken;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Presentation class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenColor {
    Green,
    Red,
    Blue,
    Orange,
    /// Unrecognized token
    Yellow,
}

impl TokenColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenColor::Green => "GREEN",
            TokenColor::Red => "RED",
            TokenColor::Blue => "BLUE",
            TokenColor::Orange => "ORANGE",
            TokenColor::Yellow => "YELLOW",
        }
    }
}

impl fmt::Display for TokenColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token with its scores, color, message and optional link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDetail {
    pub token: DiagnosticToken,
    pub score_transition: i32,
    pub score_strict: i32,
    pub color: TokenColor,
    pub message: Cow<'static, str>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub more_info: Option<Cow<'static, str>>,
}

struct Entry {
    token: &'static str,
    transition: i32,
    strict: i32,
    color: TokenColor,
    message: &'static str,
    more_info: Option<&'static str>,
}

const fn entry(
    token: &'static str,
    transition: i32,
    strict: i32,
    color: TokenColor,
    message: &'static str,
    more_info: Option<&'static str>,
) -> Entry {
    Entry { token, transition, strict, color, message, more_info }
}

use TokenColor::{Blue, Green, Orange, Red};

static TABLE: &[Entry] = &[
    entry("6to4", 7, 7, Blue,
        "You appear to be using a public 6to4 gateway; performance may suffer. Native IPv6 is preferred.",
        Some("faq_6to4.html")),
    entry("teredo", 7, 7, Blue,
        "Your IPv6 connection appears to be using Teredo, a public IPv4/IPv6 gateway; quality may suffer.",
        None),
    entry("teredo-v4pref", 10, 7, Blue,
        "Your IPv6 connection uses Teredo as a last resort; IPv4 will be preferred on dual-stack sites.",
        None),
    entry("teredo-minimum", 10, 0, Blue,
        "Your IPv6 connection uses Teredo and only works to literal IPs; not useful for browsing IPv6 sites.",
        Some("faq_teredo_minimum.html")),
    entry("IPv6 MTU", 1, 1, Red,
        "IPv6 works but large packets fail; check MTU and allow ICMPv6 Packet Too Big.",
        None),
    entry("dualstack:ipv4_preferred", 10, 10, Green,
        "Dual-stack reachable; browser prefers IPv4.",
        None),
    entry("dualstack:ipv6_preferred", 10, 10, Green,
        "Dual-stack reachable; browser prefers IPv6.",
        None),
    entry("dualstack:slow", 7, 7, Blue,
        "Dual-stack reachable but browser slows down when both families are offered.",
        None),
    entry("ipv4_only", 10, 0, Blue,
        "You appear to be able to browse the IPv4 Internet only. You will not be able to reach IPv6-only sites.",
        None),
    entry("ipv4_only:ds_good", 10, 0, Blue,
        "When a publisher offers both IPv4 and IPv6, your browser takes IPv4 without delay.",
        None),
    entry("ipv4_only:ds_slow", 5, 0, Red,
        "When a publisher offers both IPv4 and IPv6, your browser is slower than IPv4-only sites.",
        None),
    entry("ipv4_only:ds_timeout", 5, 0, Red,
        "When a publisher offers both IPv4 and IPv6, your browser times out trying to connect.",
        None),
    entry("ipv4_slow", 5, 10, Red,
        "Connections to IPv4 are slow, but functional.",
        None),
    entry("ipv6_only", 0, 10, Blue,
        "You appear to be able to browse the IPv6 Internet only. You have no access to IPv4.",
        None),
    entry("ipv6_slow", 10, 5, Red,
        "Connections to IPv6 are slow, but functional.",
        None),
    entry("ipv6_timeout", 10, 0, Red,
        "Connections to IPv6-only sites are timing out.",
        None),
    entry("ipv6:nodns", 10, 0, Red,
        "IPv6 connections work, but DNS lookups do not use IPv6 (no AAAA).",
        Some("faq_broken_aaaa.html")),
    entry("broken_ipv6", 0, 0, Red,
        "You appear to have IPv6 configured, but it completely fails for IPv6 sites.",
        None),
    entry("webfilter:blocked", -1, -1, Orange,
        "Tests appear blocked by a firewall or browser filter; critical tests failed.",
        Some("faq_browser_plugins.html")),
    entry("webfilter:dsboth", 10, 10, Orange,
        "Dual-stack tests appear blocked by a browser or network filter.",
        Some("faq_browser_plugins.html")),
    entry("webfilter:addons", 10, 10, Orange,
        "Browser blocked test URLs; alternate methods may be incomplete.",
        Some("faq_browser_plugins.html")),
    entry("webfilter:firefox", 10, 10, Orange,
        "Likely a Firefox add-on (e.g., NoScript/AdBlock) blocked tests.",
        Some("faq_firefox_plugins.html")),
    entry("v6ns:ok", 10, 10, Green,
        "Your DNS server appears to have IPv6 Internet access.",
        None),
    entry("v6ns:bad", 10, 9, Blue,
        "Your DNS server appears to have no IPv6 Internet access or is not configured to use it.",
        Some("faq_v6ns_bad.html")),
    entry("ip_timeout:firefox", 10, 10, Red,
        "Firefox add-on likely caused IP-based tests to fail.",
        Some("faq_firefox_plugins.html")),
    entry("ipv4:no_address", 10, 10, Blue,
        "No IPv4 address detected.",
        None),
    entry("ipv6:no_address", 10, 10, Red,
        "No IPv6 address detected.",
        Some("faq_no_ipv6.html")),
    entry("no_address", 10, 10, Red,
        "IP addresses could not be detected due to interference from browser add-ons.",
        None),
    entry("dualstack:safe", 10, 10, Green,
        "Good news! Your current configuration will continue to work as sites enable IPv6.",
        None),
    entry("needs_ipv6", 10, 10, Blue,
        "To ensure the best Internet performance and connectivity, ask your ISP about native IPv6.",
        Some("faq_no_ipv6.html")),
    entry("dualstack:unsafe", 10, 10, Red,
        "Our tests show dual-stack readiness is unsafe; IPv6 may cause problems.",
        None),
    entry("dualstack:mtu", 10, 10, Red,
        "MTU issues detected; IPv6-only sites may fail or load slowly.",
        None),
    entry("proxy_via", 10, 10, Orange,
        "A proxy was detected; tests reflect the proxy, not the local host.",
        None),
    entry("proxy_via_dumb", 10, 10, Orange,
        "A proxy was detected; tests reflect the proxy, not the local host.",
        None),
    entry("broken", 0, 0, Blue,
        "We have suggestions to help you fix your system.",
        None),
    entry("avoids_ipv6", 10, 10, Orange,
        "Browser has working IPv6 but is avoiding using it; this is concerning.",
        Some("faq_avoids_ipv6.html")),
];

fn lookup(token: &str) -> Option<&'static Entry> {
    TABLE.iter().find(|e| e.token == token)
}

/// Every token the table knows about, in table order
pub fn known_tokens() -> impl Iterator<Item = DiagnosticToken> {
    TABLE.iter().map(|e| DiagnosticToken::from_static(e.token))
}

/// Expand one token; unknown tokens get a neutral yellow entry
pub fn expand_token(token: &DiagnosticToken) -> TokenDetail {
    match lookup(token.as_str()) {
        Some(e) => TokenDetail {
            token: token.clone(),
            score_transition: e.transition,
            score_strict: e.strict,
            color: e.color,
            message: Cow::Borrowed(e.message),
            more_info: e.more_info.map(Cow::Borrowed),
        },
        None => TokenDetail {
            token: token.clone(),
            score_transition: 10,
            score_strict: 10,
            color: TokenColor::Yellow,
            message: Cow::Owned(format!("(unknown result code: {})", token)),
            more_info: None,
        },
    }
}

/// Expand and sort by token identifier
pub fn expand_tokens(tokens: &[DiagnosticToken]) -> Vec<TokenDetail> {
    let mut details: Vec<TokenDetail> = tokens.iter().map(expand_token).collect();
    details.sort_by(|a, b| a.token.cmp(&b.token));
    details
}
