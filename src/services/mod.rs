pub mod ai_service;
pub mod evaluation_service;
pub mod github_service;
pub mod grading_service;
pub mod judge_service;
pub mod scoring_service;
pub mod skill_matcher;
