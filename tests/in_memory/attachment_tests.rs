//! Attachments over a live delivery-review pipeline.

use super::helpers::{register_user, state, workshop};
use bottega::api::AppState;
use bottega::attachment::services::{AddAttachmentRequest, AttachmentLibraryError};
use bottega::workflow::services::{ReviewDeliveryRequest, SubmitDeliveryRequest};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bundle_collects_all_three_contexts(state: AppState) -> Result<(), eyre::Report> {
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
    let outcome = state
        .lifecycle()
        .review_delivery(
            ReviewDeliveryRequest::new(delivery.id(), shop.qa.id(), "request_changes")
                .with_feedback("Compare against the brief"),
        )
        .await?;

    state
        .library()
        .add(
            AddAttachmentRequest::new(
                "request",
                task.id().into_inner(),
                "document",
                "https://files.example.com/brief.pdf",
                shop.organizer.id(),
            )
            .with_file_name("brief.pdf"),
        )
        .await?;
    state
        .library()
        .add(AddAttachmentRequest::new(
            "delivery",
            delivery.id().into_inner(),
            "link",
            "https://files.example.com/render",
            shop.executor.id(),
        ))
        .await?;
    state
        .library()
        .add(AddAttachmentRequest::new(
            "review",
            outcome.review().id().into_inner(),
            "image",
            "https://files.example.com/annotated.png",
            shop.qa.id(),
        ))
        .await?;

    let bundle = state
        .library()
        .list_for_task(task.id(), shop.executor.id())
        .await?;
    assert_eq!(bundle.request().len(), 1);
    assert_eq!(bundle.delivery().len(), 1);
    assert_eq!(bundle.review().len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn outsiders_cannot_attach_or_list(state: AppState) -> Result<(), eyre::Report> {
    let shop = workshop(&state).await?;
    let task = shop.task_in_progress(&state).await?;
    let outsider = register_user(&state, "Olly Outsider", "olly@example.com").await?;

    let add = state
        .library()
        .add(AddAttachmentRequest::new(
            "request",
            task.id().into_inner(),
            "link",
            "https://example.com/notes",
            outsider.id(),
        ))
        .await;
    assert!(matches!(
        add,
        Err(AttachmentLibraryError::NotAProjectMember(_))
    ));

    let list = state.library().list_for_task(task.id(), outsider.id()).await;
    assert!(matches!(list, Err(AttachmentLibraryError::TaskNotFound(_))));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn organizer_may_remove_another_members_upload(state: AppState) -> Result<(), eyre::Report> {
    let shop = workshop(&state).await?;
    let task = shop.task_in_progress(&state).await?;

    let attachment = state
        .library()
        .add(AddAttachmentRequest::new(
            "request",
            task.id().into_inner(),
            "link",
            "https://example.com/notes",
            shop.executor.id(),
        ))
        .await?;

    let denied = state
        .library()
        .remove(attachment.id(), shop.qa.id())
        .await;
    assert!(matches!(
        denied,
        Err(AttachmentLibraryError::RemovalDenied(_))
    ));

    state
        .library()
        .remove(attachment.id(), shop.organizer.id())
        .await?;
    let bundle = state
        .library()
        .list_for_task(task.id(), shop.organizer.id())
        .await?;
    assert!(bundle.request().is_empty());
    Ok(())
}
