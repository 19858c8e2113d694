//! Diesel schema definitions for the attachments table.

diesel::table! {
    /// Polymorphic attachments table; `(context, parent_id)` names the
    /// parent row.
    attachments (id) {
        /// Attachment UUID primary key.
        id -> Uuid,
        /// Context tag storage string.
        #[max_length = 20]
        context -> Varchar,
        /// Parent UUID under the context.
        parent_id -> Uuid,
        /// Resource type storage string.
        #[max_length = 20]
        resource_type -> Varchar,
        /// Attachment URL.
        #[max_length = 500]
        url -> Varchar,
        /// Original file name, if any.
        #[max_length = 255]
        file_name -> Nullable<Varchar>,
        /// Uploading user UUID.
        uploaded_by -> Uuid,
        /// Upload timestamp.
        uploaded_at -> Timestamptz,
    }
}
