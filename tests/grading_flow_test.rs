mod common;

use common::{choices, multiple_choice, payload, seed_ten_point_test, state};
use exam_backend::config::DuplicateAnswerPolicy;
use exam_backend::error::{Error, ErrorKind};
use exam_backend::models::question::AnswerValue;
use exam_backend::models::test_result::TestResultFilter;
use exam_backend::AppState;
use uuid::Uuid;

#[tokio::test]
async fn partial_attempt_scores_answered_questions_against_full_test() {
    let state = state();
    let test = seed_ten_point_test(&state).await;
    let attempts = &state.attempt_service;

    let attempt = attempts
        .start_attempt(test.test.id, Uuid::new_v4())
        .await
        .unwrap();
    assert!(attempt.completed_at.is_none());
    assert_eq!(attempt.score, None);
    assert_eq!(attempt.max_score, None);

    let first = attempts
        .submit_answer(attempt.id, test.questions[0].id, choices(&["C", "A"]))
        .await
        .unwrap();
    assert!(first.is_correct);
    assert_eq!(first.points_earned, 5);

    let second = attempts
        .submit_answer(
            attempt.id,
            test.questions[1].id,
            AnswerValue::Text("Paris".into()),
        )
        .await
        .unwrap();
    assert_eq!(second.points_earned, 3);

    let done = attempts.complete_attempt(attempt.id).await.unwrap();
    assert_eq!(done.score, Some(8));
    assert_eq!(done.max_score, Some(10));
    assert!(done.completed_at.is_some());
    assert!(done.completed_at >= Some(done.started_at));
}

#[tokio::test]
async fn incomplete_selection_earns_nothing() {
    let state = state();
    let test = seed_ten_point_test(&state).await;
    let attempt = state
        .attempt_service
        .start_attempt(test.test.id, Uuid::new_v4())
        .await
        .unwrap();

    let answer = state
        .attempt_service
        .submit_answer(attempt.id, test.questions[0].id, choices(&["A"]))
        .await
        .unwrap();
    assert!(!answer.is_correct);
    assert_eq!(answer.points_earned, 0);
}

#[tokio::test]
async fn attempt_without_answers_completes_with_zero() {
    let state = state();
    let test = seed_ten_point_test(&state).await;
    let attempt = state
        .attempt_service
        .start_attempt(test.test.id, Uuid::new_v4())
        .await
        .unwrap();

    let done = state
        .attempt_service
        .complete_attempt(attempt.id)
        .await
        .unwrap();
    assert_eq!(done.score, Some(0));
    assert_eq!(done.max_score, Some(10));
}

#[tokio::test]
async fn completing_twice_yields_the_same_totals() {
    let state = state();
    let test = seed_ten_point_test(&state).await;
    let attempts = &state.attempt_service;
    let attempt = attempts
        .start_attempt(test.test.id, Uuid::new_v4())
        .await
        .unwrap();
    attempts
        .submit_answer(attempt.id, test.questions[2].id, AnswerValue::Flag(false))
        .await
        .unwrap();

    let first = attempts.complete_attempt(attempt.id).await.unwrap();
    let second = attempts.complete_attempt(attempt.id).await.unwrap();
    assert_eq!(first.score, Some(2));
    assert_eq!((first.score, first.max_score), (second.score, second.max_score));
    assert!(second.completed_at >= first.completed_at);
}

#[tokio::test]
async fn answers_after_completion_count_on_recompletion() {
    let state = state();
    let test = seed_ten_point_test(&state).await;
    let attempts = &state.attempt_service;
    let attempt = attempts
        .start_attempt(test.test.id, Uuid::new_v4())
        .await
        .unwrap();

    attempts.complete_attempt(attempt.id).await.unwrap();
    attempts
        .submit_answer(
            attempt.id,
            test.questions[1].id,
            AnswerValue::Text("Paris".into()),
        )
        .await
        .unwrap();
    let done = attempts.complete_attempt(attempt.id).await.unwrap();
    assert_eq!(done.score, Some(3));
}

#[tokio::test]
async fn get_attempt_returns_recorded_answers() {
    let state = state();
    let test = seed_ten_point_test(&state).await;
    let attempts = &state.attempt_service;
    let attempt = attempts
        .start_attempt(test.test.id, Uuid::new_v4())
        .await
        .unwrap();
    attempts
        .submit_answer(attempt.id, test.questions[0].id, choices(&["B"]))
        .await
        .unwrap();

    let details = attempts.get_attempt(attempt.id).await.unwrap();
    assert_eq!(details.result.id, attempt.id);
    assert_eq!(details.answers.len(), 1);
    assert_eq!(details.answers[0].answer_content, choices(&["B"]));
    assert!(!details.answers[0].is_correct);
}

#[tokio::test]
async fn missing_references_are_reported() {
    let state = state();
    let test = seed_ten_point_test(&state).await;
    let attempts = &state.attempt_service;

    let missing_attempt = Uuid::new_v4();
    let err = attempts.complete_attempt(missing_attempt).await.unwrap_err();
    assert!(matches!(err, Error::AttemptNotFound(id) if id == missing_attempt));
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let attempt = attempts
        .start_attempt(test.test.id, Uuid::new_v4())
        .await
        .unwrap();
    let missing_question = Uuid::new_v4();
    let err = attempts
        .submit_answer(attempt.id, missing_question, AnswerValue::Flag(true))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::QuestionNotFound(id) if id == missing_question));

    let err = attempts
        .start_attempt(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::TestNotFound(_)));
}

#[tokio::test]
async fn wrong_shape_is_a_validation_failure_and_is_not_stored() {
    let state = state();
    let test = seed_ten_point_test(&state).await;
    let attempts = &state.attempt_service;
    let attempt = attempts
        .start_attempt(test.test.id, Uuid::new_v4())
        .await
        .unwrap();

    let err = attempts
        .submit_answer(
            attempt.id,
            test.questions[2].id,
            AnswerValue::Text("false".into()),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(attempts
        .get_attempt(attempt.id)
        .await
        .unwrap()
        .answers
        .is_empty());
}

#[tokio::test]
async fn question_from_another_test_is_refused() {
    let state = state();
    let test = seed_ten_point_test(&state).await;
    let other = state
        .question_service
        .create_test(
            payload("Other", vec![multiple_choice("Pick A", &["A", "B"], &["A"], 1)]),
            Uuid::new_v4(),
        )
        .await
        .unwrap();
    let attempt = state
        .attempt_service
        .start_attempt(test.test.id, Uuid::new_v4())
        .await
        .unwrap();

    let err = state
        .attempt_service
        .submit_answer(attempt.id, other.questions[0].id, choices(&["A"]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::QuestionNotInTest { .. }));
}

#[tokio::test]
async fn resubmission_is_counted_twice_by_default() {
    let state = state();
    let test = seed_ten_point_test(&state).await;
    let attempts = &state.attempt_service;
    let attempt = attempts
        .start_attempt(test.test.id, Uuid::new_v4())
        .await
        .unwrap();

    for _ in 0..2 {
        attempts
            .submit_answer(attempt.id, test.questions[0].id, choices(&["A", "C"]))
            .await
            .unwrap();
    }
    let done = attempts.complete_attempt(attempt.id).await.unwrap();
    assert_eq!(done.score, Some(10));
    assert_eq!(done.max_score, Some(10));
}

#[tokio::test]
async fn reject_policy_keeps_the_first_answer_only() {
    let state = AppState::in_memory(DuplicateAnswerPolicy::Reject);
    let test = seed_ten_point_test(&state).await;
    let attempts = &state.attempt_service;
    let attempt = attempts
        .start_attempt(test.test.id, Uuid::new_v4())
        .await
        .unwrap();

    attempts
        .submit_answer(attempt.id, test.questions[0].id, choices(&["A", "C"]))
        .await
        .unwrap();
    let err = attempts
        .submit_answer(attempt.id, test.questions[0].id, choices(&["A", "C"]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let done = attempts.complete_attempt(attempt.id).await.unwrap();
    assert_eq!(done.score, Some(5));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn completion_racing_submissions_sees_whole_answers_only() {
    let state = state();
    let test = seed_ten_point_test(&state).await;
    let attempt = state
        .attempt_service
        .start_attempt(test.test.id, Uuid::new_v4())
        .await
        .unwrap();

    let attempt_id = attempt.id;
    let question_id = test.questions[2].id;
    let mut submissions = Vec::new();
    let mut completions = Vec::new();
    for _ in 0..8 {
        let svc = state.attempt_service.clone();
        submissions.push(tokio::spawn(async move {
            svc.submit_answer(attempt_id, question_id, AnswerValue::Flag(false))
                .await
        }));
        let svc = state.attempt_service.clone();
        completions.push(tokio::spawn(async move {
            svc.complete_attempt(attempt_id).await
        }));
    }
    for handle in submissions {
        handle.await.unwrap().unwrap();
    }
    for handle in completions {
        let done = handle.await.unwrap().unwrap();
        let score = done.score.unwrap();
        assert!(score % 2 == 0 && score <= 16, "partial tally {score}");
        assert_eq!(done.max_score, Some(10));
    }

    let done = state
        .attempt_service
        .complete_attempt(attempt_id)
        .await
        .unwrap();
    assert_eq!(done.score, Some(16));
    let details = state.attempt_service.get_attempt(attempt_id).await.unwrap();
    assert_eq!(details.answers.len(), 8);
}

#[tokio::test]
async fn attempts_are_listed_by_user_and_test() {
    let state = state();
    let test = seed_ten_point_test(&state).await;
    let student = Uuid::new_v4();
    let attempts = &state.attempt_service;

    let first = attempts.start_attempt(test.test.id, student).await.unwrap();
    let second = attempts.start_attempt(test.test.id, student).await.unwrap();
    attempts
        .start_attempt(test.test.id, Uuid::new_v4())
        .await
        .unwrap();

    let mine = attempts
        .list_attempts(&TestResultFilter {
            user_id: Some(student),
            test_id: None,
        })
        .await
        .unwrap();
    let ids: Vec<Uuid> = mine.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let all = attempts
        .list_attempts(&TestResultFilter {
            user_id: None,
            test_id: Some(test.test.id),
        })
        .await
        .unwrap();
    assert_eq!(all.len(), 3);
}
