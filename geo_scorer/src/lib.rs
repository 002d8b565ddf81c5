pub mod ai;
pub mod config;
pub mod error;
pub mod fakes;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod scraper;
pub mod utils;

use serde::Serialize;

pub use config::Config;
pub use error::{FetchStage, GeoError, GeoResult};
pub use pipeline::GeoPipeline;

/// Number of ranked recommendations every analysis carries.
pub const IMPROVEMENT_COUNT: usize = 10;

/// Validated result of one GEO analysis run.
///
/// Built only by [`parser::parse_and_validate`]; fields are read-only once
/// constructed.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct GeoAnalysis {
    score: i64,
    diagnostic: String,
    improvements: Vec<GeoImprovement>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct GeoImprovement {
    pub text: String,
    /// Current state of the criterion, 0 (worst) to 10 (perfect).
    pub score: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Excellent,
    Good,
    NeedsImprovement,
}

impl GeoAnalysis {
    pub(crate) fn new(score: i64, diagnostic: String, improvements: Vec<GeoImprovement>) -> Self {
        Self {
            score,
            diagnostic,
            improvements,
        }
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    /// Narrative explanation; `**bold**` markers are kept verbatim.
    pub fn diagnostic(&self) -> &str {
        &self.diagnostic
    }

    /// Recommendations in the priority order the model emitted them.
    pub fn improvements(&self) -> &[GeoImprovement] {
        &self.improvements
    }

    pub fn tier(&self) -> ScoreTier {
        match self.score {
            s if s >= 80 => ScoreTier::Excellent,
            s if s >= 60 => ScoreTier::Good,
            _ => ScoreTier::NeedsImprovement,
        }
    }
}

impl ScoreTier {
    pub fn label(&self) -> &'static str {
        match self {
            ScoreTier::Excellent => "Excellent",
            ScoreTier::Good => "Good",
            ScoreTier::NeedsImprovement => "Needs Improvement",
        }
    }
}
