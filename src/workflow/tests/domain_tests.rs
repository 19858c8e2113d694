//! Domain-focused tests for deliveries, reviews, and parsing.

use crate::auth::domain::UserId;
use crate::workflow::domain::{
    DeliveryDraft, DeliveryId, Review, ReviewVerdict, TaskId, TaskPriority, TaskStatus,
    TaskTitle, WorkflowDomainError,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

#[fixture]
fn clock() -> DefaultClock {
    DefaultClock
}

#[rstest]
#[case(TaskStatus::Created, "created")]
#[case(TaskStatus::Assigned, "assigned")]
#[case(TaskStatus::InProgress, "in_progress")]
#[case(TaskStatus::PendingQa, "pending_qa")]
#[case(TaskStatus::InReview, "in_review")]
#[case(TaskStatus::ChangesRequested, "changes_requested")]
#[case(TaskStatus::Completed, "completed")]
fn task_status_round_trips_storage_strings(#[case] status: TaskStatus, #[case] storage: &str) {
    assert_eq!(status.as_str(), storage);
    assert_eq!(TaskStatus::try_from(storage), Ok(status));
}

#[rstest]
fn task_status_parsing_ignores_case_and_padding() {
    assert_eq!(
        TaskStatus::try_from("  PENDING_QA  "),
        Ok(TaskStatus::PendingQa)
    );
}

#[rstest]
fn task_status_parsing_rejects_unknown_values() {
    assert!(TaskStatus::try_from("archived").is_err());
}

#[rstest]
#[case(TaskPriority::Low, "low")]
#[case(TaskPriority::Medium, "medium")]
#[case(TaskPriority::High, "high")]
#[case(TaskPriority::Critical, "critical")]
fn task_priority_round_trips_storage_strings(
    #[case] priority: TaskPriority,
    #[case] storage: &str,
) {
    assert_eq!(priority.as_str(), storage);
    assert_eq!(TaskPriority::try_from(storage), Ok(priority));
}

#[rstest]
fn task_priority_defaults_to_medium() {
    assert_eq!(TaskPriority::default(), TaskPriority::Medium);
}

#[rstest]
fn task_title_is_trimmed() {
    let title = TaskTitle::new("  Colour pass  ").expect("valid title");
    assert_eq!(title.as_str(), "Colour pass");
}

#[rstest]
fn task_title_rejects_blank_values() {
    assert_eq!(TaskTitle::new(" "), Err(WorkflowDomainError::EmptyTitle));
}

#[rstest]
fn task_title_rejects_oversized_values() {
    let oversized = "x".repeat(256);
    assert_eq!(
        TaskTitle::new(oversized),
        Err(WorkflowDomainError::TitleTooLong { maximum: 255 })
    );
}

#[rstest]
fn delivery_draft_trims_summary_and_collapses_blank_methodology(clock: DefaultClock) {
    let draft = DeliveryDraft::new(
        TaskId::new(),
        "  First cut  ",
        Some("   ".to_owned()),
        &clock,
    )
    .expect("valid draft");

    assert_eq!(draft.summary(), "First cut");
    assert!(draft.methodology().is_none());
}

#[rstest]
fn delivery_draft_rejects_blank_summaries(clock: DefaultClock) {
    let result = DeliveryDraft::new(TaskId::new(), "   ", None, &clock);
    assert_eq!(result, Err(WorkflowDomainError::EmptySummary));
}

#[rstest]
fn delivery_draft_promotion_keeps_identity(clock: DefaultClock) {
    let task_id = TaskId::new();
    let draft =
        DeliveryDraft::new(task_id, "First cut", Some("Premiere".to_owned()), &clock)
            .expect("valid draft");
    let draft_id = draft.id();

    let delivery = draft.into_delivery(3);

    assert_eq!(delivery.id(), draft_id);
    assert_eq!(delivery.task_id(), task_id);
    assert_eq!(delivery.version(), 3);
    assert_eq!(delivery.methodology(), Some("Premiere"));
}

#[rstest]
#[case(ReviewVerdict::Approve, "approve")]
#[case(ReviewVerdict::RequestChanges, "request_changes")]
fn review_verdict_round_trips_storage_strings(
    #[case] verdict: ReviewVerdict,
    #[case] storage: &str,
) {
    assert_eq!(verdict.as_str(), storage);
    assert_eq!(ReviewVerdict::try_from(storage), Ok(verdict));
}

#[rstest]
fn approve_review_accepts_missing_feedback(clock: DefaultClock) {
    let review = Review::new(
        DeliveryId::new(),
        UserId::new(),
        ReviewVerdict::Approve,
        None,
        &clock,
    )
    .expect("approve without feedback is valid");

    assert_eq!(review.verdict(), ReviewVerdict::Approve);
    assert!(review.feedback().is_none());
}

#[rstest]
#[case(None)]
#[case(Some("   ".to_owned()))]
fn change_request_review_requires_feedback(
    clock: DefaultClock,
    #[case] feedback: Option<String>,
) {
    let result = Review::new(
        DeliveryId::new(),
        UserId::new(),
        ReviewVerdict::RequestChanges,
        feedback,
        &clock,
    );

    assert_eq!(result, Err(WorkflowDomainError::FeedbackRequired));
}

#[rstest]
fn change_request_review_trims_feedback(clock: DefaultClock) {
    let review = Review::new(
        DeliveryId::new(),
        UserId::new(),
        ReviewVerdict::RequestChanges,
        Some("  Fix the audio sync  ".to_owned()),
        &clock,
    )
    .expect("feedback was given");

    assert_eq!(review.feedback(), Some("Fix the audio sync"));
}
