//! The full delivery-review pipeline over in-memory adapters.

use super::helpers::{state, workshop};
use bottega::api::AppState;
use bottega::workflow::domain::{ReviewVerdict, TaskStatus};
use bottega::workflow::services::{
    ReviewDeliveryRequest, SubmitDeliveryRequest, TaskLifecycleError,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pipeline_runs_from_creation_to_completion(state: AppState) -> Result<(), eyre::Report> {
    let shop = workshop(&state).await?;
    let task = shop.task_in_progress(&state).await?;

    let (delivery, moved) = state
        .lifecycle()
        .submit_delivery(SubmitDeliveryRequest::new(
            task.id(),
            shop.executor.id(),
            "First full render",
        ))
        .await?;
    assert_eq!(delivery.version(), 1);
    assert_eq!(moved.status(), TaskStatus::PendingQa);

    let outcome = state
        .lifecycle()
        .review_delivery(ReviewDeliveryRequest::new(
            delivery.id(),
            shop.qa.id(),
            "approve",
        ))
        .await?;
    assert_eq!(outcome.review().verdict(), ReviewVerdict::Approve);
    assert_eq!(outcome.task().status(), TaskStatus::Completed);
    assert!(outcome.task().completed_at().is_some());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rework_loop_bumps_the_delivery_version(state: AppState) -> Result<(), eyre::Report> {
    let shop = workshop(&state).await?;
    let task = shop.task_in_progress(&state).await?;

    let (first, _) = state
        .lifecycle()
        .submit_delivery(SubmitDeliveryRequest::new(
            task.id(),
            shop.executor.id(),
            "First cut",
        ))
        .await?;
    let rejected = state
        .lifecycle()
        .review_delivery(
            ReviewDeliveryRequest::new(first.id(), shop.qa.id(), "request_changes")
                .with_feedback("Audio is out of sync"),
        )
        .await?;
    assert_eq!(rejected.task().status(), TaskStatus::ChangesRequested);

    state
        .lifecycle()
        .change_status(task.id(), shop.executor.id(), "in_progress")
        .await?;
    let (second, _) = state
        .lifecycle()
        .submit_delivery(SubmitDeliveryRequest::new(
            task.id(),
            shop.executor.id(),
            "Second cut",
        ))
        .await?;
    assert_eq!(second.version(), 2);

    // The superseded delivery can no longer be reviewed.
    let stale = state
        .lifecycle()
        .review_delivery(ReviewDeliveryRequest::new(
            first.id(),
            shop.qa.id(),
            "approve",
        ))
        .await;
    assert!(matches!(
        stale,
        Err(TaskLifecycleError::StaleDelivery { latest: 2, .. })
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn verdicts_are_qa_only(state: AppState) -> Result<(), eyre::Report> {
    let shop = workshop(&state).await?;
    let task = shop.task_in_progress(&state).await?;
    let (delivery, _) = state
        .lifecycle()
        .submit_delivery(SubmitDeliveryRequest::new(
            task.id(),
            shop.executor.id(),
            "First cut",
        ))
        .await?;

    let result = state
        .lifecycle()
        .review_delivery(ReviewDeliveryRequest::new(
            delivery.id(),
            shop.organizer.id(),
            "approve",
        ))
        .await;
    assert!(matches!(
        result,
        Err(TaskLifecycleError::RoleDenied { .. })
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deliveries_list_newest_first_with_reviews(state: AppState) -> Result<(), eyre::Report> {
    let shop = workshop(&state).await?;
    let task = shop.task_in_progress(&state).await?;

    let (first, _) = state
        .lifecycle()
        .submit_delivery(SubmitDeliveryRequest::new(
            task.id(),
            shop.executor.id(),
            "First cut",
        ))
        .await?;
    state
        .lifecycle()
        .review_delivery(
            ReviewDeliveryRequest::new(first.id(), shop.qa.id(), "request_changes")
                .with_feedback("Fix colours"),
        )
        .await?;
    state
        .lifecycle()
        .change_status(task.id(), shop.executor.id(), "in_progress")
        .await?;
    state
        .lifecycle()
        .submit_delivery(SubmitDeliveryRequest::new(
            task.id(),
            shop.executor.id(),
            "Second cut",
        ))
        .await?;

    let listing = state
        .lifecycle()
        .list_deliveries(task.id(), shop.qa.id())
        .await?;
    assert_eq!(listing.len(), 2);
    let newest = listing.first().ok_or_else(|| eyre::eyre!("missing entry"))?;
    assert_eq!(newest.delivery().version(), 2);
    assert!(newest.review().is_none());
    let oldest = listing.last().ok_or_else(|| eyre::eyre!("missing entry"))?;
    assert_eq!(oldest.delivery().version(), 1);
    assert!(oldest.review().is_some());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn feedback_is_required_to_request_changes(state: AppState) -> Result<(), eyre::Report> {
    let shop = workshop(&state).await?;
    let task = shop.task_in_progress(&state).await?;
    let (delivery, _) = state
        .lifecycle()
        .submit_delivery(SubmitDeliveryRequest::new(
            task.id(),
            shop.executor.id(),
            "First cut",
        ))
        .await?;

    let result = state
        .lifecycle()
        .review_delivery(ReviewDeliveryRequest::new(
            delivery.id(),
            shop.qa.id(),
            "request_changes",
        ))
        .await;
    assert!(matches!(result, Err(TaskLifecycleError::Domain(_))));
    Ok(())
}
