pub mod attempt_locks;
pub mod attempt_service;
pub mod grading_service;
pub mod question_service;
pub mod scoring_service;
