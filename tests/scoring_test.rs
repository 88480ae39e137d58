use recruitment_scoring::config::ScoringConfig;
use recruitment_scoring::models::analysis::{CodeAnalysis, ManagerialAnalysis, VideoAnalysis};
use recruitment_scoring::models::score::{Assessment, ScoringWeights};
use recruitment_scoring::services::scoring_service::ScoringService;
use recruitment_scoring::services::skill_matcher::match_candidate_to_job;
use recruitment_scoring::models::skill::{CandidateSkill, JobSkill, JobSkills};
use tokio_test::{assert_err, assert_ok};

const GRID: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

#[test]
fn final_score_stays_in_unit_interval() {
    let service = ScoringService::default();
    let w = ScoringWeights::default();
    for p in GRID {
        for v in GRID {
            for c in GRID {
                for m in GRID {
                    let result = service.calculate_final_candidate_score(p, v, c, Some(m));
                    let expected = p * w.profile + v * w.video + c * w.coding + m * w.managerial;
                    assert!((result.overall_candidate_score - expected).abs() < 1e-12);
                    assert!((0.0..=1.0 + 1e-12).contains(&result.overall_candidate_score));
                }
            }
        }
    }
}

#[test]
fn absent_managerial_equals_zero_managerial_rescaled() {
    let service = ScoringService::default();
    for (p, v, c) in [(0.1, 0.2, 0.3), (1.0, 0.0, 0.5), (0.9, 0.9, 0.9)] {
        let none = service.calculate_final_candidate_score(p, v, c, None);
        let zero = service.calculate_final_candidate_score(p, v, c, Some(0.0));
        assert!((none.overall_candidate_score - zero.overall_candidate_score / 0.9).abs() < 1e-12);
    }
}

#[test]
fn assessment_thresholds_are_inclusive() {
    let cases = [
        (0.85, Assessment::Excellent),
        (0.75, Assessment::Strong),
        (0.65, Assessment::Good),
        (0.50, Assessment::Average),
        (0.49, Assessment::BelowAverage),
    ];
    for (score, label) in cases {
        assert_eq!(Assessment::from_score(score), label, "score {}", score);
    }
    assert_eq!(Assessment::BelowAverage.to_string(), "Below Average");
}

#[test]
fn calculators_accept_empty_analyses() {
    let service = ScoringService::default();
    let video = assert_ok!(service.video_score(&VideoAnalysis::default()));
    let managerial = assert_ok!(service.managerial_score(&ManagerialAnalysis::default()));
    let profile = assert_ok!(service.profile_score(None, None, None));
    assert_eq!(video.score, 0.0);
    assert_eq!(managerial.score, 0.0);
    assert_eq!(profile.score, 0.0);
}

#[test]
fn infinite_test_rate_is_rejected() {
    let service = ScoringService::default();
    assert_err!(service.coding_score(&CodeAnalysis::default(), f64::INFINITY));
}

#[test]
fn custom_weights_shift_the_result() {
    let config = ScoringConfig {
        weights: assert_ok!(ScoringWeights::new(0.0, 0.0, 1.0, 0.0)),
        ..ScoringConfig::default()
    };
    let service = ScoringService::new(&config);
    let result = service.calculate_final_candidate_score(0.0, 0.0, 0.7, None);
    assert!((result.overall_candidate_score - 0.7).abs() < 1e-12);
    assert_eq!(result.assessment, Assessment::Good);
}

#[test]
fn skill_match_weights_essential_over_preferred() {
    let job = JobSkills {
        essential_skills: vec![JobSkill::new("Python", "5+ years"), JobSkill::new("SQL", "")],
        preferred_skills: vec![JobSkill::new("Docker", "")],
        mentioned_skills: vec![JobSkill::new("Git", "")],
    };
    let candidate = vec![
        CandidateSkill { skill: "python".to_string(), confidence: 0.9 },
        CandidateSkill { skill: "Git".to_string(), confidence: 1.0 },
    ];

    let result = match_candidate_to_job(&candidate, &job);

    assert_eq!(result.essential_match_score, 0.5);
    assert_eq!(result.preferred_match_score, 0.0);
    assert!((result.overall_match_score - 0.35).abs() < 1e-12);
    assert_eq!(result.essential_gaps[0].skill, "SQL");
    assert_eq!(result.preferred_gaps[0].skill, "Docker");
}
