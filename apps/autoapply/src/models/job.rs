use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::null_as_default;

/// A job posting as returned by a search. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub requirements: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job_type: String,
    /// Source board as reported by the backend, e.g. "LinkedIn".
    pub platform: String,
    #[serde(default)]
    pub salary_range: Option<String>,
    /// 0–100, present only once a matching pass has run for this user/job pair.
    #[serde(default)]
    pub compatibility_score: Option<u8>,
    #[serde(default)]
    pub posted_date: Option<DateTime<Utc>>,
}

impl JobPosting {
    pub fn score_tier(&self) -> ScoreTier {
        ScoreTier::from_score(self.compatibility_score)
    }

    pub fn is_on(&self, platform: Platform) -> bool {
        self.platform.eq_ignore_ascii_case(platform.as_str())
    }
}

/// The job boards a search can be narrowed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    LinkedIn,
    Indeed,
    Wellfound,
}

impl Platform {
    /// Query-string value sent to the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::LinkedIn => "linkedin",
            Platform::Indeed => "indeed",
            Platform::Wellfound => "wellfound",
        }
    }
}

/// Platform constraint for a search. `All` sends no constraint at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PlatformFilter {
    #[default]
    All,
    Only(Platform),
}

impl PlatformFilter {
    pub fn platform(&self) -> Option<Platform> {
        match self {
            PlatformFilter::All => None,
            PlatformFilter::Only(p) => Some(*p),
        }
    }
}

impl FromStr for PlatformFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(PlatformFilter::All),
            "linkedin" => Ok(PlatformFilter::Only(Platform::LinkedIn)),
            "indeed" => Ok(PlatformFilter::Only(Platform::Indeed)),
            "wellfound" => Ok(PlatformFilter::Only(Platform::Wellfound)),
            other => Err(format!(
                "unknown platform '{other}' (expected all, linkedin, indeed or wellfound)"
            )),
        }
    }
}

impl fmt::Display for PlatformFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformFilter::All => f.write_str("all"),
            PlatformFilter::Only(p) => f.write_str(p.as_str()),
        }
    }
}

/// Display tier derived from a compatibility score.
///
/// * `Strong`: score of 80 or more
/// * `Moderate`: 60 to 79
/// * `Neutral`: below 60, or no score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreTier {
    Strong,
    Moderate,
    Neutral,
}

impl ScoreTier {
    pub fn from_score(score: Option<u8>) -> Self {
        match score {
            Some(s) if s >= 80 => ScoreTier::Strong,
            Some(s) if s >= 60 => ScoreTier::Moderate,
            _ => ScoreTier::Neutral,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreTier::Strong => "strong match",
            ScoreTier::Moderate => "moderate match",
            ScoreTier::Neutral => "neutral",
        }
    }
}
