//! PostgreSQL integration tests for the attachment repository.

use super::helpers::{BoxError, TestDatabase, checkout};
use bottega::attachment::{
    adapters::postgres::PostgresAttachmentRepository,
    domain::{Attachment, AttachmentContext, AttachmentUrl, NewAttachmentData, ResourceType},
    ports::{AttachmentRepository, AttachmentRepositoryError},
};
use bottega::auth::{
    adapters::postgres::PostgresAuthRepository,
    domain::{EmailAddress, PasswordHash, User, UserId},
    ports::AuthRepository,
};
use mockable::DefaultClock;
use uuid::Uuid;

async fn stored_uploader(db: &TestDatabase) -> Result<UserId, BoxError> {
    let repo = PostgresAuthRepository::new(db.pool());
    let user = User::new(
        "Uma Uploader",
        EmailAddress::new("uma@example.com")?,
        PasswordHash::derive("correct horse battery")?,
        None,
        &DefaultClock,
    )?;
    repo.store_user(&user).await?;
    Ok(user.id())
}

fn sample_attachment(
    context: AttachmentContext,
    parent_id: Uuid,
    uploaded_by: UserId,
) -> Result<Attachment, BoxError> {
    Ok(Attachment::new(
        NewAttachmentData {
            context,
            parent_id,
            resource_type: ResourceType::Image,
            url: AttachmentUrl::new("https://cdn.example.com/frame-0120.png")?,
            file_name: Some("frame-0120.png".to_owned()),
            uploaded_by,
        },
        &DefaultClock,
    ))
}

#[tokio::test(flavor = "multi_thread")]
async fn attachments_round_trip() -> Result<(), BoxError> {
    let Some(db) = checkout().await? else {
        return Ok(());
    };
    let uploader = stored_uploader(&db).await?;
    let repo = PostgresAttachmentRepository::new(db.pool());

    let attachment = sample_attachment(AttachmentContext::Request, Uuid::new_v4(), uploader)?;
    repo.store(&attachment).await?;

    let found = repo
        .find_by_id(attachment.id())
        .await?
        .ok_or("attachment should be stored")?;
    assert_eq!(found.url().as_str(), "https://cdn.example.com/frame-0120.png");
    assert_eq!(found.file_name(), Some("frame-0120.png"));
    assert_eq!(found.uploaded_by(), uploader);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn listing_filters_by_context_and_parent() -> Result<(), BoxError> {
    let Some(db) = checkout().await? else {
        return Ok(());
    };
    let uploader = stored_uploader(&db).await?;
    let repo = PostgresAttachmentRepository::new(db.pool());

    let parent = Uuid::new_v4();
    let other_parent = Uuid::new_v4();
    repo.store(&sample_attachment(
        AttachmentContext::Request,
        parent,
        uploader,
    )?)
    .await?;
    repo.store(&sample_attachment(
        AttachmentContext::Delivery,
        parent,
        uploader,
    )?)
    .await?;
    repo.store(&sample_attachment(
        AttachmentContext::Request,
        other_parent,
        uploader,
    )?)
    .await?;

    let listed = repo
        .list_for_parents(AttachmentContext::Request, &[parent])
        .await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(
        listed.first().map(Attachment::parent_id),
        Some(parent),
        "only the requested context and parent should match"
    );
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_an_unknown_attachment_reports_not_found() -> Result<(), BoxError> {
    let Some(db) = checkout().await? else {
        return Ok(());
    };
    let uploader = stored_uploader(&db).await?;
    let repo = PostgresAttachmentRepository::new(db.pool());

    let unstored = sample_attachment(AttachmentContext::Review, Uuid::new_v4(), uploader)?;
    let result = repo.delete(unstored.id()).await;
    assert!(matches!(
        result,
        Err(AttachmentRepositoryError::AttachmentNotFound(_))
    ));
    Ok(())
}
