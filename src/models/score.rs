use crate::error::ScoringError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Profile,
    Video,
    Coding,
    CulturalFit,
    Managerial,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Profile => "profile",
            Phase::Video => "video",
            Phase::Coding => "coding",
            Phase::CulturalFit => "cultural_fit",
            Phase::Managerial => "managerial",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized score of one assessment phase and the sub-scores behind it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseScore {
    pub phase: Phase,
    pub score: f64,
    pub breakdown: BTreeMap<&'static str, f64>,
}

impl PhaseScore {
    pub fn new(phase: Phase, score: f64) -> Self {
        Self {
            phase,
            score: score.clamp(0.0, 1.0),
            breakdown: BTreeMap::new(),
        }
    }

    pub fn with_component(mut self, name: &'static str, value: f64) -> Self {
        self.breakdown.insert(name, value);
        self
    }

    pub fn component(&self, name: &str) -> Option<f64> {
        self.breakdown.get(name).copied()
    }
}

/// What the aggregator sees of a phase: a usable score, with the failure
/// reason attached when the phase degraded to zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseOutcome {
    pub phase: Phase,
    pub score: f64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub breakdown: BTreeMap<&'static str, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PhaseOutcome {
    pub fn from_result(phase: Phase, result: Result<PhaseScore, ScoringError>) -> Self {
        match result {
            Ok(score) => Self {
                phase,
                score: score.score,
                breakdown: score.breakdown,
                error: None,
            },
            Err(err) => {
                tracing::warn!(phase = %phase, error = %err, "phase degraded to zero");
                Self {
                    phase,
                    score: 0.0,
                    breakdown: BTreeMap::new(),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Phase weights of the final score. They always sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub profile: f64,
    pub video: f64,
    pub coding: f64,
    pub managerial: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            profile: 0.2,
            video: 0.3,
            coding: 0.4,
            managerial: 0.1,
        }
    }
}

impl ScoringWeights {
    pub fn new(profile: f64, video: f64, coding: f64, managerial: f64) -> Result<Self, String> {
        let weights = Self {
            profile,
            video,
            coding,
            managerial,
        };
        weights.check()?;
        Ok(weights)
    }

    pub fn check(&self) -> Result<(), String> {
        let all = [
            ("profile", self.profile),
            ("video", self.video),
            ("coding", self.coding),
            ("managerial", self.managerial),
        ];
        for (name, w) in all {
            if !w.is_finite() || !(0.0..=1.0).contains(&w) {
                return Err(format!("{} weight must be within [0, 1], got {}", name, w));
            }
        }
        let sum: f64 = all.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(format!("weights must sum to 1.0, got {}", sum));
        }
        if self.managerial >= 1.0 {
            return Err("managerial weight must be below 1.0".to_string());
        }
        Ok(())
    }

    /// Weights for profile, video and coding rescaled to sum to 1.0 when the
    /// managerial round did not take place.
    pub fn without_managerial(&self) -> (f64, f64, f64) {
        let rest = 1.0 - self.managerial;
        (self.profile / rest, self.video / rest, self.coding / rest)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CulturalFitWeights {
    pub value_alignment: f64,
    pub communication_style: f64,
    pub team_collaboration: f64,
    pub adaptability: f64,
}

impl CulturalFitWeights {
    /// Every weight must be finite and non-negative, with a positive total.
    pub fn check(&self) -> Result<(), String> {
        let all = [
            ("value_alignment", self.value_alignment),
            ("communication_style", self.communication_style),
            ("team_collaboration", self.team_collaboration),
            ("adaptability", self.adaptability),
        ];
        for (name, w) in all {
            if !w.is_finite() || w < 0.0 {
                return Err(format!("{} weight must be a non-negative number, got {}", name, w));
            }
        }
        let sum: f64 = all.iter().map(|(_, w)| w).sum();
        if sum <= 0.0 {
            return Err("cultural fit weights must have a positive sum".to_string());
        }
        Ok(())
    }
}

impl Default for CulturalFitWeights {
    fn default() -> Self {
        Self {
            value_alignment: 0.4,
            communication_style: 0.2,
            team_collaboration: 0.3,
            adaptability: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assessment {
    #[serde(rename = "Excellent")]
    Excellent,
    #[serde(rename = "Strong")]
    Strong,
    #[serde(rename = "Good")]
    Good,
    #[serde(rename = "Average")]
    Average,
    #[serde(rename = "Below Average")]
    BelowAverage,
}

impl Assessment {
    /// Lower bounds are inclusive.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.85 {
            Assessment::Excellent
        } else if score >= 0.75 {
            Assessment::Strong
        } else if score >= 0.65 {
            Assessment::Good
        } else if score >= 0.50 {
            Assessment::Average
        } else {
            Assessment::BelowAverage
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Assessment::Excellent => "Excellent",
            Assessment::Strong => "Strong",
            Assessment::Good => "Good",
            Assessment::Average => "Average",
            Assessment::BelowAverage => "Below Average",
        }
    }
}

impl fmt::Display for Assessment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalScore {
    pub profile_score: f64,
    pub video_score: f64,
    pub coding_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub managerial_score: Option<f64>,
    pub weights_applied: ScoringWeights,
    pub overall_candidate_score: f64,
    pub assessment: Assessment,
}
