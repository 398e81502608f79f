//! Scroll cursor token and time-to-live

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Server-issued scroll cursor
///
/// Opaque; sent back to the server exactly as received.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScrollId(String);

impl ScrollId {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScrollId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Invalid time-to-live notation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid scroll ttl '{0}': expected a positive integer with unit ms, s, m, h or d")]
pub struct TtlParseError(pub String);

/// How long the server keeps the cursor alive between requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTtl(Duration);

impl ScrollTtl {
    pub fn new(duration: Duration) -> Self {
        Self(duration)
    }

    pub fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    pub fn duration(&self) -> Duration {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Render in the endpoint's time-unit notation, largest exact unit first
    pub fn as_param(&self) -> String {
        let ms = self.0.as_millis();
        if ms == 0 || ms % 1000 != 0 {
            return format!("{}ms", ms);
        }
        let secs = ms / 1000;
        for (unit, size) in [("d", 86_400u128), ("h", 3_600), ("m", 60)] {
            if secs % size == 0 {
                return format!("{}{}", secs / size, unit);
            }
        }
        format!("{}s", secs)
    }
}

impl Default for ScrollTtl {
    fn default() -> Self {
        Self::from_secs(60)
    }
}

impl fmt::Display for ScrollTtl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_param())
    }
}

impl FromStr for ScrollTtl {
    type Err = TtlParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let split = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| TtlParseError(s.to_string()))?;
        let (digits, unit) = trimmed.split_at(split);
        let n: u64 = digits.parse().map_err(|_| TtlParseError(s.to_string()))?;
        let millis_per_unit: u64 = match unit {
            "ms" => 1,
            "s" => 1_000,
            "m" => 60_000,
            "h" => 3_600_000,
            "d" => 86_400_000,
            _ => return Err(TtlParseError(s.to_string())),
        };
        match n.checked_mul(millis_per_unit) {
            Some(ms) if ms > 0 => Ok(Self(Duration::from_millis(ms))),
            _ => Err(TtlParseError(s.to_string())),
        }
    }
}

/// A live cursor plus the ttl negotiated when it was opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollContext {
    id: ScrollId,
    ttl: ScrollTtl,
}

impl ScrollContext {
    pub fn new(id: ScrollId, ttl: ScrollTtl) -> Self {
        Self { id, ttl }
    }

    pub fn id(&self) -> &ScrollId {
        &self.id
    }

    pub fn ttl(&self) -> ScrollTtl {
        self.ttl
    }

    /// Replace the token with the one from the latest page
    pub fn advance(&mut self, id: ScrollId) {
        self.id = id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_param_units() {
        assert_eq!(ScrollTtl::from_secs(60).as_param(), "1m");
        assert_eq!(ScrollTtl::from_secs(90).as_param(), "90s");
        assert_eq!(ScrollTtl::from_secs(7_200).as_param(), "2h");
        assert_eq!(ScrollTtl::from_secs(86_400).as_param(), "1d");
        assert_eq!(ScrollTtl::new(Duration::from_millis(1_500)).as_param(), "1500ms");
    }

    #[test]
    fn test_ttl_parse() {
        assert_eq!("1m".parse::<ScrollTtl>().unwrap(), ScrollTtl::from_secs(60));
        assert_eq!("30s".parse::<ScrollTtl>().unwrap(), ScrollTtl::from_secs(30));
        assert_eq!(
            "250ms".parse::<ScrollTtl>().unwrap(),
            ScrollTtl::new(Duration::from_millis(250))
        );
        assert_eq!(" 2h ".parse::<ScrollTtl>().unwrap(), ScrollTtl::from_secs(7_200));
    }

    #[test]
    fn test_ttl_parse_rejects() {
        for bad in ["", "m", "10", "5y", "0s", "-1m", "1.5m"] {
            assert!(bad.parse::<ScrollTtl>().is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn test_ttl_roundtrip_through_param() {
        let ttl: ScrollTtl = "45m".parse().unwrap();
        assert_eq!(ttl.as_param().parse::<ScrollTtl>().unwrap(), ttl);
    }

    #[test]
    fn test_context_advance() {
        let mut ctx = ScrollContext::new(ScrollId::new("a"), ScrollTtl::default());
        ctx.advance(ScrollId::new("b"));
        assert_eq!(ctx.id().as_str(), "b");
        assert_eq!(ctx.ttl(), ScrollTtl::from_secs(60));
    }
}
