use crate::models::skill::{CandidateSkill, JobSkill, JobSkills};
use serde::Serialize;
use std::collections::HashMap;

/// Share of the overall match carried by essential skills. Fixed.
pub const ESSENTIAL_TIER_WEIGHT: f64 = 0.7;
/// Share of the overall match carried by preferred skills. Fixed.
pub const PREFERRED_TIER_WEIGHT: f64 = 0.3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillMatch {
    pub skill: String,
    pub confidence: f64,
    pub job_context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillGap {
    pub skill: String,
    pub job_context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub essential_match_score: f64,
    pub preferred_match_score: f64,
    pub overall_match_score: f64,
    pub essential_matches: Vec<SkillMatch>,
    pub essential_gaps: Vec<SkillGap>,
    pub preferred_matches: Vec<SkillMatch>,
    pub preferred_gaps: Vec<SkillGap>,
}

/// Compares a candidate's skills with a job's essential and preferred
/// requirements. Skill names compare case-insensitively; an empty tier counts
/// as fully matched.
pub fn match_candidate_to_job(candidate_skills: &[CandidateSkill], job_skills: &JobSkills) -> MatchResult {
    let index: HashMap<String, f64> = candidate_skills
        .iter()
        .map(|s| (normalize(&s.skill), s.confidence))
        .collect();

    let (essential_matches, essential_gaps) = classify(&index, &job_skills.essential_skills);
    let (preferred_matches, preferred_gaps) = classify(&index, &job_skills.preferred_skills);

    let essential_match_score = tier_score(essential_matches.len(), job_skills.essential_skills.len());
    let preferred_match_score = tier_score(preferred_matches.len(), job_skills.preferred_skills.len());
    let overall_match_score =
        essential_match_score * ESSENTIAL_TIER_WEIGHT + preferred_match_score * PREFERRED_TIER_WEIGHT;

    tracing::debug!(
        essential = essential_match_score,
        preferred = preferred_match_score,
        overall = overall_match_score,
        "skill match computed"
    );

    MatchResult {
        essential_match_score,
        preferred_match_score,
        overall_match_score,
        essential_matches,
        essential_gaps,
        preferred_matches,
        preferred_gaps,
    }
}

fn normalize(skill: &str) -> String {
    skill.trim().to_lowercase()
}

fn classify(index: &HashMap<String, f64>, required: &[JobSkill]) -> (Vec<SkillMatch>, Vec<SkillGap>) {
    let mut matches = Vec::new();
    let mut gaps = Vec::new();
    for item in required {
        match index.get(&normalize(&item.skill)) {
            Some(&confidence) => matches.push(SkillMatch {
                skill: item.skill.clone(),
                confidence,
                job_context: item.context.clone(),
            }),
            None => gaps.push(SkillGap {
                skill: item.skill.clone(),
                job_context: item.context.clone(),
            }),
        }
    }
    (matches, gaps)
}

fn tier_score(matched: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        matched as f64 / total as f64
    }
}
