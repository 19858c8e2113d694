//! `PostgreSQL` repository implementation for the workflow context.

use super::{
    models::{DeliveryRow, NewDeliveryRow, NewReviewRow, NewTaskRow, ReviewRow, TaskRow},
    schema::{qa_reviews, task_deliveries, tasks},
};
use crate::auth::domain::UserId;
use crate::project::domain::ProjectId;
use crate::workflow::{
    domain::{
        Delivery, DeliveryDraft, DeliveryId, PersistedDeliveryData, PersistedReviewData,
        PersistedTaskData, Review, ReviewId, ReviewVerdict, Task, TaskId, TaskPriority,
        TaskStatus, TaskTitle,
    },
    ports::{WorkflowRepository, WorkflowRepositoryError, WorkflowRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by workflow adapters.
pub type WorkflowPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed workflow repository.
#[derive(Debug, Clone)]
pub struct PostgresWorkflowRepository {
    pool: WorkflowPgPool,
}

impl PostgresWorkflowRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: WorkflowPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> WorkflowRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> WorkflowRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(WorkflowRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(WorkflowRepositoryError::persistence)?
    }
}

impl From<DieselError> for WorkflowRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl WorkflowRepository for PostgresWorkflowRepository {
    async fn store_task(&self, task: &Task) -> WorkflowRepositoryResult<()> {
        let task_id = task.id();
        let new_row = task_to_new_row(task);

        self.run_blocking(move |connection| {
            diesel::insert_into(tasks::table)
                .values(&new_row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                        WorkflowRepositoryError::DuplicateTask(task_id)
                    }
                    _ => WorkflowRepositoryError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update_task(&self, task: &Task) -> WorkflowRepositoryResult<()> {
        let task_id = task.id();
        let new_row = task_to_new_row(task);

        self.run_blocking(move |connection| {
            let affected = update_task_row(connection, task_id, &new_row)?;
            if affected == 0 {
                return Err(WorkflowRepositoryError::TaskNotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn delete_task(&self, id: TaskId) -> WorkflowRepositoryResult<()> {
        self.run_blocking(move |connection| {
            let affected = diesel::delete(tasks::table.filter(tasks::id.eq(id.into_inner())))
                .execute(connection)
                .map_err(WorkflowRepositoryError::persistence)?;
            if affected == 0 {
                return Err(WorkflowRepositoryError::TaskNotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn find_task(&self, id: TaskId) -> WorkflowRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.into_inner()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(WorkflowRepositoryError::persistence)?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_tasks_for_project(
        &self,
        project_id: ProjectId,
    ) -> WorkflowRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::project_id.eq(project_id.into_inner()))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(WorkflowRepositoryError::persistence)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn store_delivery(
        &self,
        draft: DeliveryDraft,
        task: &Task,
    ) -> WorkflowRepositoryResult<Delivery> {
        let task_id = task.id();
        let task_row = task_to_new_row(task);

        self.run_blocking(move |connection| {
            connection.transaction::<_, WorkflowRepositoryError, _>(|tx_conn| {
                let affected = update_task_row(tx_conn, task_id, &task_row)?;
                if affected == 0 {
                    return Err(WorkflowRepositoryError::TaskNotFound(task_id));
                }

                let highest: Option<i32> = task_deliveries::table
                    .filter(task_deliveries::task_id.eq(draft.task_id().into_inner()))
                    .select(diesel::dsl::max(task_deliveries::version))
                    .get_result(tx_conn)?;
                let version = version_from_db(highest.unwrap_or(0))? + 1;
                let delivery = draft.into_delivery(version);

                let new_row = delivery_to_new_row(&delivery)?;
                diesel::insert_into(task_deliveries::table)
                    .values(&new_row)
                    .execute(tx_conn)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(
                            DatabaseErrorKind::UniqueViolation,
                            _,
                        ) => WorkflowRepositoryError::DeliveryVersionConflict(task_id),
                        _ => WorkflowRepositoryError::persistence(err),
                    })?;
                Ok(delivery)
            })
        })
        .await
    }

    async fn find_delivery(&self, id: DeliveryId) -> WorkflowRepositoryResult<Option<Delivery>> {
        self.run_blocking(move |connection| {
            let row = task_deliveries::table
                .filter(task_deliveries::id.eq(id.into_inner()))
                .select(DeliveryRow::as_select())
                .first::<DeliveryRow>(connection)
                .optional()
                .map_err(WorkflowRepositoryError::persistence)?;
            row.map(row_to_delivery).transpose()
        })
        .await
    }

    async fn list_deliveries(&self, task_id: TaskId) -> WorkflowRepositoryResult<Vec<Delivery>> {
        self.run_blocking(move |connection| {
            let rows = task_deliveries::table
                .filter(task_deliveries::task_id.eq(task_id.into_inner()))
                .order(task_deliveries::version.desc())
                .select(DeliveryRow::as_select())
                .load::<DeliveryRow>(connection)
                .map_err(WorkflowRepositoryError::persistence)?;
            rows.into_iter().map(row_to_delivery).collect()
        })
        .await
    }

    async fn latest_delivery_version(
        &self,
        task_id: TaskId,
    ) -> WorkflowRepositoryResult<Option<u32>> {
        self.run_blocking(move |connection| {
            let highest: Option<i32> = task_deliveries::table
                .filter(task_deliveries::task_id.eq(task_id.into_inner()))
                .select(diesel::dsl::max(task_deliveries::version))
                .get_result(connection)
                .map_err(WorkflowRepositoryError::persistence)?;
            highest.map(version_from_db).transpose()
        })
        .await
    }

    async fn store_review(&self, review: &Review, task: &Task) -> WorkflowRepositoryResult<()> {
        let task_id = task.id();
        let delivery_id = review.delivery_id();
        let task_row = task_to_new_row(task);
        let new_row = review_to_new_row(review);

        self.run_blocking(move |connection| {
            connection.transaction::<_, WorkflowRepositoryError, _>(|tx_conn| {
                diesel::insert_into(qa_reviews::table)
                    .values(&new_row)
                    .execute(tx_conn)
                    .map_err(|err| match err {
                        DieselError::DatabaseError(
                            DatabaseErrorKind::UniqueViolation,
                            _,
                        ) => WorkflowRepositoryError::DuplicateReview(delivery_id),
                        _ => WorkflowRepositoryError::persistence(err),
                    })?;

                let affected = update_task_row(tx_conn, task_id, &task_row)?;
                if affected == 0 {
                    return Err(WorkflowRepositoryError::TaskNotFound(task_id));
                }
                Ok(())
            })
        })
        .await
    }

    async fn find_review(&self, id: ReviewId) -> WorkflowRepositoryResult<Option<Review>> {
        self.run_blocking(move |connection| {
            let row = qa_reviews::table
                .filter(qa_reviews::id.eq(id.into_inner()))
                .select(ReviewRow::as_select())
                .first::<ReviewRow>(connection)
                .optional()
                .map_err(WorkflowRepositoryError::persistence)?;
            row.map(row_to_review).transpose()
        })
        .await
    }

    async fn find_review_for_delivery(
        &self,
        delivery_id: DeliveryId,
    ) -> WorkflowRepositoryResult<Option<Review>> {
        self.run_blocking(move |connection| {
            let row = qa_reviews::table
                .filter(qa_reviews::delivery_id.eq(delivery_id.into_inner()))
                .select(ReviewRow::as_select())
                .first::<ReviewRow>(connection)
                .optional()
                .map_err(WorkflowRepositoryError::persistence)?;
            row.map(row_to_review).transpose()
        })
        .await
    }

    async fn list_reviews_for_deliveries(
        &self,
        delivery_ids: &[DeliveryId],
    ) -> WorkflowRepositoryResult<Vec<Review>> {
        let lookup: Vec<Uuid> = delivery_ids.iter().map(|id| id.into_inner()).collect();
        self.run_blocking(move |connection| {
            let rows = qa_reviews::table
                .filter(qa_reviews::delivery_id.eq_any(&lookup))
                .select(ReviewRow::as_select())
                .load::<ReviewRow>(connection)
                .map_err(WorkflowRepositoryError::persistence)?;
            rows.into_iter().map(row_to_review).collect()
        })
        .await
    }
}

/// Writes every mutable task column, returning the affected row count.
fn update_task_row(
    connection: &mut PgConnection,
    task_id: TaskId,
    row: &NewTaskRow,
) -> WorkflowRepositoryResult<usize> {
    diesel::update(tasks::table.filter(tasks::id.eq(task_id.into_inner())))
        .set((
            tasks::executor_id.eq(row.executor_id),
            tasks::reviewer_id.eq(row.reviewer_id),
            tasks::title.eq(&row.title),
            tasks::description.eq(&row.description),
            tasks::priority.eq(&row.priority),
            tasks::status.eq(&row.status),
            tasks::due_at.eq(row.due_at),
            tasks::completed_at.eq(row.completed_at),
            tasks::updated_at.eq(row.updated_at),
        ))
        .execute(connection)
        .map_err(WorkflowRepositoryError::persistence)
}

fn task_to_new_row(task: &Task) -> NewTaskRow {
    NewTaskRow {
        id: task.id().into_inner(),
        project_id: task.project_id().into_inner(),
        requester_id: task.requester_id().into_inner(),
        executor_id: task.executor_id().map(UserId::into_inner),
        reviewer_id: task.reviewer_id().map(UserId::into_inner),
        title: task.title().as_str().to_owned(),
        description: task.description().map(ToOwned::to_owned),
        priority: task.priority().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        due_at: task.due_at(),
        completed_at: task.completed_at(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

fn row_to_task(row: TaskRow) -> WorkflowRepositoryResult<Task> {
    let data = PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        requester_id: UserId::from_uuid(row.requester_id),
        executor_id: row.executor_id.map(UserId::from_uuid),
        reviewer_id: row.reviewer_id.map(UserId::from_uuid),
        title: TaskTitle::new(row.title).map_err(WorkflowRepositoryError::persistence)?,
        description: row.description,
        priority: TaskPriority::try_from(row.priority.as_str())
            .map_err(WorkflowRepositoryError::persistence)?,
        status: TaskStatus::try_from(row.status.as_str())
            .map_err(WorkflowRepositoryError::persistence)?,
        due_at: row.due_at,
        completed_at: row.completed_at,
        created_at: row.created_at,
        updated_at: row.updated_at,
    };
    Ok(Task::from_persisted(data))
}

fn delivery_to_new_row(delivery: &Delivery) -> WorkflowRepositoryResult<NewDeliveryRow> {
    Ok(NewDeliveryRow {
        id: delivery.id().into_inner(),
        task_id: delivery.task_id().into_inner(),
        version: version_to_db(delivery.version())?,
        summary: delivery.summary().to_owned(),
        methodology: delivery.methodology().map(ToOwned::to_owned),
        submitted_at: delivery.submitted_at(),
    })
}

fn row_to_delivery(row: DeliveryRow) -> WorkflowRepositoryResult<Delivery> {
    let data = PersistedDeliveryData {
        id: DeliveryId::from_uuid(row.id),
        task_id: TaskId::from_uuid(row.task_id),
        version: version_from_db(row.version)?,
        summary: row.summary,
        methodology: row.methodology,
        submitted_at: row.submitted_at,
    };
    Ok(Delivery::from_persisted(data))
}

fn review_to_new_row(review: &Review) -> NewReviewRow {
    NewReviewRow {
        id: review.id().into_inner(),
        delivery_id: review.delivery_id().into_inner(),
        reviewer_id: review.reviewer_id().into_inner(),
        verdict: review.verdict().as_str().to_owned(),
        feedback: review.feedback().map(ToOwned::to_owned),
        reviewed_at: review.reviewed_at(),
    }
}

fn row_to_review(row: ReviewRow) -> WorkflowRepositoryResult<Review> {
    let data = PersistedReviewData {
        id: ReviewId::from_uuid(row.id),
        delivery_id: DeliveryId::from_uuid(row.delivery_id),
        reviewer_id: UserId::from_uuid(row.reviewer_id),
        verdict: ReviewVerdict::try_from(row.verdict.as_str())
            .map_err(WorkflowRepositoryError::persistence)?,
        feedback: row.feedback,
        reviewed_at: row.reviewed_at,
    };
    Ok(Review::from_persisted(data))
}

fn version_to_db(version: u32) -> WorkflowRepositoryResult<i32> {
    i32::try_from(version).map_err(WorkflowRepositoryError::persistence)
}

fn version_from_db(version: i32) -> WorkflowRepositoryResult<u32> {
    u32::try_from(version).map_err(WorkflowRepositoryError::persistence)
}
