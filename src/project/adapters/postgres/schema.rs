//! Diesel schema definitions for project tables.

diesel::table! {
    /// Projects table.
    projects (id) {
        /// Project UUID primary key.
        id -> Uuid,
        /// Display name.
        #[max_length = 255]
        name -> Varchar,
        /// Optional free-form description.
        description -> Nullable<Text>,
        /// Lifecycle status storage string.
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Project roster table.
    project_members (id) {
        /// Roster entry UUID primary key.
        id -> Uuid,
        /// Owning project UUID.
        project_id -> Uuid,
        /// Member user UUID.
        user_id -> Uuid,
        /// Role storage string.
        #[max_length = 20]
        role -> Varchar,
    }
}

diesel::joinable!(project_members -> projects (project_id));
diesel::allow_tables_to_appear_in_same_query!(projects, project_members);
