use serde::{Deserialize, Serialize};
use std::fmt;

/// External platforms an account can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Github,
    Bluesky,
    Youtube,
    Devpad,
    Reddit,
    Twitter,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Github => "github",
            Platform::Bluesky => "bluesky",
            Platform::Youtube => "youtube",
            Platform::Devpad => "devpad",
            Platform::Reddit => "reddit",
            Platform::Twitter => "twitter",
        }
    }

    /// Platforms whose per-account refresh is dispatched as a background
    /// task rather than run inline.
    pub fn is_cooperative(&self) -> bool {
        matches!(self, Platform::Github | Platform::Reddit)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPlatform(pub String);

impl fmt::Display for UnknownPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown platform: {}", self.0)
    }
}
impl std::error::Error for UnknownPlatform {}

impl std::str::FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(Platform::Github),
            "bluesky" => Ok(Platform::Bluesky),
            "youtube" => Ok(Platform::Youtube),
            "devpad" => Ok(Platform::Devpad),
            "reddit" => Ok(Platform::Reddit),
            "twitter" => Ok(Platform::Twitter),
            other => Err(UnknownPlatform(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooperative_platforms() {
        assert!(Platform::Github.is_cooperative());
        assert!(Platform::Reddit.is_cooperative());
        assert!(!Platform::Twitter.is_cooperative());
        assert!(!Platform::Bluesky.is_cooperative());
    }
}
