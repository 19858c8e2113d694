//! Delivery submission and review handlers.

use super::{SummaryMap, TaskPayload, resolve_summaries};
use crate::api::{error::ApiError, extract::CurrentUser, state::AppState};
use crate::auth::domain::UserId;
use crate::workflow::{
    domain::{Delivery, DeliveryId, Review, TaskId},
    services::{ReviewDeliveryRequest, SubmitDeliveryRequest},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitDeliveryBody {
    task_id: Uuid,
    summary: String,
    methodology: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewBody {
    verdict: String,
    feedback: Option<String>,
}

/// Review embed inside a delivery payload.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ReviewPayload {
    id: Uuid,
    delivery_id: Uuid,
    verdict: &'static str,
    feedback: Option<String>,
    reviewed_at: DateTime<Utc>,
    reviewer: Option<super::UserSummary>,
}

impl ReviewPayload {
    fn from_parts(review: &Review, summaries: &SummaryMap) -> Self {
        Self {
            id: review.id().into_inner(),
            delivery_id: review.delivery_id().into_inner(),
            verdict: review.verdict().as_str(),
            feedback: review.feedback().map(ToOwned::to_owned),
            reviewed_at: review.reviewed_at(),
            reviewer: summaries.get(&review.reviewer_id()).cloned(),
        }
    }
}

/// Delivery payload, optionally carrying the verdict rendered on it.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct DeliveryPayload {
    id: Uuid,
    task_id: Uuid,
    version: u32,
    summary: String,
    methodology: Option<String>,
    submitted_at: DateTime<Utc>,
    review: Option<ReviewPayload>,
}

impl DeliveryPayload {
    fn from_parts(delivery: &Delivery, review: Option<ReviewPayload>) -> Self {
        Self {
            id: delivery.id().into_inner(),
            task_id: delivery.task_id().into_inner(),
            version: delivery.version(),
            summary: delivery.summary().to_owned(),
            methodology: delivery.methodology().map(ToOwned::to_owned),
            submitted_at: delivery.submitted_at(),
            review,
        }
    }
}

/// A submitted delivery together with the task it moved.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SubmissionPayload {
    delivery: DeliveryPayload,
    task: TaskPayload,
}

/// A rendered verdict together with the task it moved.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct VerdictPayload {
    review: ReviewPayload,
    task: TaskPayload,
}

pub(crate) async fn submit_delivery(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(body): Json<SubmitDeliveryBody>,
) -> Result<(StatusCode, Json<SubmissionPayload>), ApiError> {
    let mut request = SubmitDeliveryRequest::new(
        TaskId::from_uuid(body.task_id),
        caller.user().id(),
        body.summary,
    );
    if let Some(methodology) = body.methodology {
        request = request.with_methodology(methodology);
    }

    let (delivery, task) = state.lifecycle().submit_delivery(request).await?;
    tracing::info!(
        delivery = %delivery.id(),
        task = %task.id(),
        version = delivery.version(),
        "delivery submitted"
    );
    let payload = SubmissionPayload {
        delivery: DeliveryPayload::from_parts(&delivery, None),
        task: TaskPayload::resolve(&state, &task).await?,
    };
    Ok((StatusCode::CREATED, Json(payload)))
}

pub(crate) async fn list_deliveries(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<DeliveryPayload>>, ApiError> {
    let entries = state
        .lifecycle()
        .list_deliveries(TaskId::from_uuid(id), caller.user().id())
        .await?;
    let reviewer_ids: Vec<UserId> = entries
        .iter()
        .filter_map(|entry| entry.review().map(Review::reviewer_id))
        .collect();
    let summaries = resolve_summaries(&state, reviewer_ids).await?;
    Ok(Json(
        entries
            .iter()
            .map(|entry| {
                let review = entry
                    .review()
                    .map(|review| ReviewPayload::from_parts(review, &summaries));
                DeliveryPayload::from_parts(entry.delivery(), review)
            })
            .collect(),
    ))
}

pub(crate) async fn review_delivery(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<ReviewBody>,
) -> Result<(StatusCode, Json<VerdictPayload>), ApiError> {
    let mut request =
        ReviewDeliveryRequest::new(DeliveryId::from_uuid(id), caller.user().id(), body.verdict);
    if let Some(feedback) = body.feedback {
        request = request.with_feedback(feedback);
    }

    let outcome = state.lifecycle().review_delivery(request).await?;
    tracing::info!(
        review = %outcome.review().id(),
        task = %outcome.task().id(),
        verdict = outcome.review().verdict().as_str(),
        "verdict rendered"
    );
    let summaries =
        resolve_summaries(&state, std::iter::once(outcome.review().reviewer_id())).await?;
    let payload = VerdictPayload {
        review: ReviewPayload::from_parts(outcome.review(), &summaries),
        task: TaskPayload::resolve(&state, outcome.task()).await?,
    };
    Ok((StatusCode::CREATED, Json(payload)))
}
