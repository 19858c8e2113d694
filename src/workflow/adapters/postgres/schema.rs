//! Diesel schema definitions for workflow tables.

diesel::table! {
    /// Tasks table.
    tasks (id) {
        /// Task UUID primary key.
        id -> Uuid,
        /// Owning project UUID.
        project_id -> Uuid,
        /// Requesting member UUID.
        requester_id -> Uuid,
        /// Assigned executor UUID, if any.
        executor_id -> Nullable<Uuid>,
        /// Assigned reviewer UUID, if any.
        reviewer_id -> Nullable<Uuid>,
        /// Task title.
        #[max_length = 255]
        title -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Urgency storage string.
        #[max_length = 20]
        priority -> Varchar,
        /// Lifecycle status storage string.
        #[max_length = 20]
        status -> Varchar,
        /// Due timestamp, if any.
        due_at -> Nullable<Timestamptz>,
        /// Completion timestamp, if any.
        completed_at -> Nullable<Timestamptz>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Latest lifecycle timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Delivery records, versioned per task.
    task_deliveries (id) {
        /// Delivery UUID primary key.
        id -> Uuid,
        /// Owning task UUID.
        task_id -> Uuid,
        /// Per-task version number; `(task_id, version)` is unique.
        version -> Int4,
        /// Summary text.
        summary -> Text,
        /// Optional methodology notes.
        methodology -> Nullable<Text>,
        /// Submission timestamp.
        submitted_at -> Timestamptz,
    }
}

diesel::table! {
    /// QA review records; `delivery_id` is unique.
    qa_reviews (id) {
        /// Review UUID primary key.
        id -> Uuid,
        /// Reviewed delivery UUID.
        delivery_id -> Uuid,
        /// Reviewer user UUID.
        reviewer_id -> Uuid,
        /// Verdict storage string.
        #[max_length = 20]
        verdict -> Varchar,
        /// Optional feedback text.
        feedback -> Nullable<Text>,
        /// Review timestamp.
        reviewed_at -> Timestamptz,
    }
}

diesel::joinable!(task_deliveries -> tasks (task_id));
diesel::joinable!(qa_reviews -> task_deliveries (delivery_id));
diesel::allow_tables_to_appear_in_same_query!(tasks, task_deliveries, qa_reviews);
