//! Attachment handlers.

use super::{SummaryMap, resolve_summaries};
use crate::api::{error::ApiError, extract::CurrentUser, state::AppState};
use crate::attachment::{
    domain::{Attachment, AttachmentId},
    services::AddAttachmentRequest,
};
use crate::auth::domain::UserId;
use crate::workflow::domain::TaskId;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub(crate) struct AddAttachmentBody {
    context: String,
    parent_id: Uuid,
    resource_type: String,
    url: String,
    file_name: Option<String>,
}

/// Attachment payload with the uploader embed resolved.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct AttachmentPayload {
    id: Uuid,
    context: &'static str,
    parent_id: Uuid,
    resource_type: &'static str,
    url: String,
    file_name: Option<String>,
    uploaded_at: DateTime<Utc>,
    uploaded_by: Option<super::UserSummary>,
}

impl AttachmentPayload {
    fn from_parts(attachment: &Attachment, summaries: &SummaryMap) -> Self {
        Self {
            id: attachment.id().into_inner(),
            context: attachment.context().as_str(),
            parent_id: attachment.parent_id(),
            resource_type: attachment.resource_type().as_str(),
            url: attachment.url().as_str().to_owned(),
            file_name: attachment.file_name().map(ToOwned::to_owned),
            uploaded_at: attachment.uploaded_at(),
            uploaded_by: summaries.get(&attachment.uploaded_by()).cloned(),
        }
    }
}

/// The attachment bundle of one task, grouped by context.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct BundlePayload {
    request: Vec<AttachmentPayload>,
    delivery: Vec<AttachmentPayload>,
    review: Vec<AttachmentPayload>,
}

pub(crate) async fn add_attachment(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(body): Json<AddAttachmentBody>,
) -> Result<(StatusCode, Json<AttachmentPayload>), ApiError> {
    let mut request = AddAttachmentRequest::new(
        body.context,
        body.parent_id,
        body.resource_type,
        body.url,
        caller.user().id(),
    );
    if let Some(file_name) = body.file_name {
        request = request.with_file_name(file_name);
    }

    let attachment = state.library().add(request).await?;
    tracing::info!(
        attachment = %attachment.id(),
        context = attachment.context().as_str(),
        "attachment added"
    );
    let summaries =
        resolve_summaries(&state, std::iter::once(attachment.uploaded_by())).await?;
    Ok((
        StatusCode::CREATED,
        Json(AttachmentPayload::from_parts(&attachment, &summaries)),
    ))
}

pub(crate) async fn list_task_attachments(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<BundlePayload>, ApiError> {
    let bundle = state
        .library()
        .list_for_task(TaskId::from_uuid(id), caller.user().id())
        .await?;
    let uploader_ids: Vec<UserId> = bundle
        .request()
        .iter()
        .chain(bundle.delivery())
        .chain(bundle.review())
        .map(Attachment::uploaded_by)
        .collect();
    let summaries = resolve_summaries(&state, uploader_ids).await?;
    let to_payloads = |attachments: &[Attachment]| {
        attachments
            .iter()
            .map(|attachment| AttachmentPayload::from_parts(attachment, &summaries))
            .collect()
    };
    Ok(Json(BundlePayload {
        request: to_payloads(bundle.request()),
        delivery: to_payloads(bundle.delivery()),
        review: to_payloads(bundle.review()),
    }))
}

pub(crate) async fn delete_attachment(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let attachment_id = AttachmentId::from_uuid(id);
    state
        .library()
        .remove(attachment_id, caller.user().id())
        .await?;
    tracing::info!(attachment = %attachment_id, "attachment removed");
    Ok(StatusCode::NO_CONTENT)
}
