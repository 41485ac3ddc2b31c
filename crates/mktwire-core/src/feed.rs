//! Feed kinds and their vendor service mapping.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category of normalized content carried by a subscription.
///
/// The feed kind selects the normalization rule set and the storage
/// subdirectory for persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    /// Real-time tick data (prices, volumes, sizes).
    Market,
    /// Headlines and story bodies, including nested analytics.
    News,
    /// Social/sentiment feeds (score, velocity, free text).
    Social,
    /// Unrecognized feeds persisted verbatim for auditing.
    Raw,
}

impl FeedKind {
    /// Default vendor service for subscriptions of this kind.
    ///
    /// Topics may override this by carrying an explicit `//ns/svc` prefix.
    pub fn service(&self) -> &'static str {
        match self {
            Self::Market => "//blp/mktdata",
            Self::News => "//blp/mktnews-content",
            // Sentiment topics ride on the market data service.
            Self::Social => "//blp/mktdata",
            Self::Raw => "//blp/mktdata",
        }
    }

    /// Storage subdirectory name for persisted records of this kind.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::News => "news",
            Self::Social => "social",
            Self::Raw => "raw",
        }
    }

    /// All feed kinds, in a stable order.
    pub fn all() -> [FeedKind; 4] {
        [Self::Market, Self::News, Self::Social, Self::Raw]
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

impl FromStr for FeedKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "market" => Ok(Self::Market),
            "news" => Ok(Self::News),
            "social" => Ok(Self::Social),
            "raw" => Ok(Self::Raw),
            other => Err(CoreError::InvalidFeedKind(other.to_string())),
        }
    }
}
