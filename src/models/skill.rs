use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillSource {
    Github,
    Resume,
    Linkedin,
    CodingChallenge,
    VideoInterview,
    Manual,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SkillRecord {
    #[validate(length(min = 1, message = "Skill name cannot be empty"))]
    pub name: String,
    #[validate(range(min = 0.0, max = 1.0))]
    pub score: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence: f64,
    pub source: SkillSource,
    pub assessed_at: DateTime<Utc>,
}

impl SkillRecord {
    pub fn new(name: impl Into<String>, confidence: f64, source: SkillSource) -> Self {
        Self {
            name: name.into(),
            score: confidence,
            confidence,
            source,
            assessed_at: Utc::now(),
        }
    }

    /// GitHub evidence carries no confidence of its own; it is estimated from
    /// how often the skill is named in the evidence text.
    pub fn from_github_evidence(name: impl Into<String>, evidence: &str) -> Self {
        let name = name.into();
        let needle = name.to_lowercase();
        let hits = if needle.is_empty() {
            0
        } else {
            evidence.to_lowercase().matches(needle.as_str()).count()
        };
        let confidence = (hits as f64 / 10.0).clamp(0.1, 1.0);
        Self::new(name, confidence, SkillSource::Github)
    }

    pub fn key(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

/// A candidate's skill assertion as consumed by the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CandidateSkill {
    pub skill: String,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 1.0))]
    pub confidence: f64,
}

/// All skill assessments of one candidate, one record per (skill, source).
#[derive(Debug, Clone, Default)]
pub struct SkillProfile {
    records: HashMap<(String, SkillSource), SkillRecord>,
}

impl SkillProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the record, replacing an earlier assessment of the same skill
    /// from the same source. Returns the replaced record.
    pub fn assess(&mut self, record: SkillRecord) -> Option<SkillRecord> {
        self.records.insert((record.key(), record.source), record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &SkillRecord> {
        self.records.values()
    }

    pub fn get(&self, skill: &str, source: SkillSource) -> Option<&SkillRecord> {
        self.records.get(&(skill.trim().to_lowercase(), source))
    }

    /// Collapses sources to the strongest confidence per skill, sorted by name.
    pub fn candidate_skills(&self) -> Vec<CandidateSkill> {
        let mut best: HashMap<String, &SkillRecord> = HashMap::new();
        for record in self.records.values() {
            best.entry(record.key())
                .and_modify(|current| {
                    if record.confidence > current.confidence {
                        *current = record;
                    }
                })
                .or_insert(record);
        }
        let mut skills: Vec<CandidateSkill> = best
            .into_values()
            .map(|r| CandidateSkill {
                skill: r.name.clone(),
                confidence: r.confidence,
            })
            .collect();
        skills.sort_by(|a, b| a.skill.to_lowercase().cmp(&b.skill.to_lowercase()));
        skills
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Importance {
    Essential,
    Preferred,
    Mentioned,
}

/// A single skill extracted from a job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSkill {
    pub skill: String,
    #[serde(default)]
    pub context: String,
}

impl JobSkill {
    pub fn new(skill: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            skill: skill.into(),
            context: context.into(),
        }
    }
}

/// Job requirements grouped by importance tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobSkills {
    #[serde(default)]
    pub essential_skills: Vec<JobSkill>,
    #[serde(default)]
    pub preferred_skills: Vec<JobSkill>,
    #[serde(default)]
    pub mentioned_skills: Vec<JobSkill>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSkillRequirement {
    pub name: String,
    pub importance: Importance,
    pub context: String,
}

impl JobSkills {
    pub fn requirements(&self) -> Vec<JobSkillRequirement> {
        let tiers = [
            (Importance::Essential, &self.essential_skills),
            (Importance::Preferred, &self.preferred_skills),
            (Importance::Mentioned, &self.mentioned_skills),
        ];
        tiers
            .into_iter()
            .flat_map(|(importance, skills)| {
                skills.iter().map(move |s| JobSkillRequirement {
                    name: s.skill.clone(),
                    importance,
                    context: s.context.clone(),
                })
            })
            .collect()
    }
}
