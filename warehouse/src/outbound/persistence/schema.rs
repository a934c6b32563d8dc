//! Diesel table definitions for the star schema.
//!
//! These definitions must match `warehouse/migrations` exactly. When a
//! migration changes a table, update the matching block here (or regenerate
//! with `diesel print-schema`).

diesel::table! {
    /// Learning element types (text, video, test, ...).
    dim_element_types (type_id) {
        type_id -> Int4,
        type_name -> Varchar,
        description -> Text,
    }
}

diesel::table! {
    /// Two-level topic tree; `parent_topic_id` is null at the top level.
    dim_topics (topic_id) {
        topic_id -> Int4,
        topic_name -> Varchar,
        description -> Text,
        parent_topic_id -> Nullable<Int4>,
    }
}

diesel::table! {
    dim_students (student_id) {
        student_id -> Int4,
        first_name -> Varchar,
        last_name -> Varchar,
        email -> Varchar,
        registration_date -> Timestamp,
        last_login -> Timestamp,
    }
}

diesel::table! {
    dim_courses (course_id) {
        course_id -> Int4,
        course_name -> Varchar,
        description -> Text,
        creation_date -> Timestamp,
        is_active -> Bool,
    }
}

diesel::table! {
    dim_modules (module_id) {
        module_id -> Int4,
        course_id -> Int4,
        module_name -> Varchar,
        module_order -> Int4,
    }
}

diesel::table! {
    dim_lessons (lesson_id) {
        lesson_id -> Int4,
        module_id -> Int4,
        lesson_name -> Varchar,
        lesson_order -> Int4,
        topic_id -> Int4,
    }
}

diesel::table! {
    dim_learning_elements (element_id) {
        element_id -> Int4,
        lesson_id -> Int4,
        element_type_id -> Int4,
        difficulty_level -> Int4,
        element_order -> Int4,
        title -> Varchar,
        is_required -> Bool,
        content_url -> Text,
    }
}

diesel::table! {
    /// One row per (student, course) enrolment.
    dim_course_registrations (registration_id) {
        registration_id -> Int4,
        student_id -> Int4,
        course_id -> Int4,
        registration_date -> Timestamp,
        completion_date -> Nullable<Timestamp>,
        is_active -> Bool,
    }
}

diesel::table! {
    /// Calendar dimension keyed by the date itself.
    dim_dates (full_date) {
        full_date -> Date,
        day_of_week -> Int4,
        day_name -> Varchar,
        day_of_month -> Int4,
        day_of_year -> Int4,
        week_of_year -> Int4,
        month_number -> Int4,
        month_name -> Varchar,
        quarter -> Int4,
        year -> Int4,
        is_weekend -> Bool,
    }
}

diesel::table! {
    /// Completed interactions with learning elements.
    fact_student_progress (progress_id) {
        progress_id -> Int4,
        student_id -> Int4,
        course_id -> Int4,
        module_id -> Int4,
        lesson_id -> Int4,
        element_id -> Int4,
        start_time -> Timestamp,
        end_time -> Timestamp,
        duration_seconds -> Int8,
        score -> Nullable<Float8>,
        is_completed -> Bool,
        is_required -> Bool,
    }
}

diesel::joinable!(dim_modules -> dim_courses (course_id));
diesel::joinable!(dim_lessons -> dim_modules (module_id));
diesel::joinable!(dim_lessons -> dim_topics (topic_id));
diesel::joinable!(dim_learning_elements -> dim_lessons (lesson_id));
diesel::joinable!(dim_learning_elements -> dim_element_types (element_type_id));
diesel::joinable!(dim_course_registrations -> dim_students (student_id));
diesel::joinable!(dim_course_registrations -> dim_courses (course_id));

diesel::allow_tables_to_appear_in_same_query!(
    dim_element_types,
    dim_topics,
    dim_students,
    dim_courses,
    dim_modules,
    dim_lessons,
    dim_learning_elements,
    dim_course_registrations,
    dim_dates,
    fact_student_progress,
);
