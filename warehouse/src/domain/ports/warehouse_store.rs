//! Port abstraction for persisting star-schema rows.
//!
//! The store allocates identities on insert and enforces the uniqueness
//! constraints the seeder relies on: element type name, student e-mail,
//! (student, course) registration pairs, top-level topic name and
//! (topic name, parent) for subtopics. Violations surface as
//! [`WarehouseStoreError::Conflict`] rather than being pre-checked by callers.

use async_trait::async_trait;
use lms_data::{
    CalendarDate, CourseElement, CourseSeed, ElementTypeSeed, LearningElementSeed, LessonSeed,
    ModuleSeed, ProgressFactSeed, RegistrationSeed, StudentSeed, TopicSeed,
};
use serde::Serialize;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by warehouse store adapters.
    pub enum WarehouseStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "warehouse store connection failed: {message}",
        /// A uniqueness constraint rejected the row.
        Conflict { message: String } => "warehouse store uniqueness conflict: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "warehouse store query failed: {message}",
    }
}

impl WarehouseStoreError {
    /// Whether the caller may discard the attempted row and continue.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Row counts for every table in the schema.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    /// Rows in `dim_element_types`.
    pub element_types: u64,
    /// Rows in `dim_topics`.
    pub topics: u64,
    /// Rows in `dim_students`.
    pub students: u64,
    /// Rows in `dim_courses`.
    pub courses: u64,
    /// Rows in `dim_modules`.
    pub modules: u64,
    /// Rows in `dim_lessons`.
    pub lessons: u64,
    /// Rows in `dim_learning_elements`.
    pub learning_elements: u64,
    /// Rows in `dim_course_registrations`.
    pub registrations: u64,
    /// Rows in `dim_dates`.
    pub calendar_dates: u64,
    /// Rows in `fact_student_progress`.
    pub progress_facts: u64,
}

/// Port for reading and writing the learning-management star schema.
///
/// Each single-row insert commits on its own and returns the allocated id.
/// Batch inserts are atomic: either every row lands or none do.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WarehouseStore: Send + Sync {
    /// Remove every row from every table, children before parents, and
    /// restart identity sequences.
    async fn truncate_all(&self) -> Result<(), WarehouseStoreError>;

    /// Insert an element type and return its id.
    async fn insert_element_type(
        &self,
        element_type: &ElementTypeSeed,
    ) -> Result<i32, WarehouseStoreError>;

    /// Look up a topic by name within `parent_topic_id` (`None` for the top
    /// level).
    async fn find_topic(
        &self,
        topic_name: &str,
        parent_topic_id: Option<i32>,
    ) -> Result<Option<i32>, WarehouseStoreError>;

    /// Insert a topic under `parent_topic_id` and return its id.
    async fn insert_topic(
        &self,
        topic: &TopicSeed,
        parent_topic_id: Option<i32>,
    ) -> Result<i32, WarehouseStoreError>;

    /// Return the ids of every topic, top-level and subtopic alike.
    async fn topic_ids(&self) -> Result<Vec<i32>, WarehouseStoreError>;

    /// Insert a student and return its id.
    async fn insert_student(&self, student: &StudentSeed) -> Result<i32, WarehouseStoreError>;

    /// Insert a course and return its id.
    async fn insert_course(&self, course: &CourseSeed) -> Result<i32, WarehouseStoreError>;

    /// Insert a module and return its id.
    async fn insert_module(&self, module: &ModuleSeed) -> Result<i32, WarehouseStoreError>;

    /// Insert a lesson and return its id.
    async fn insert_lesson(&self, lesson: &LessonSeed) -> Result<i32, WarehouseStoreError>;

    /// Insert a learning element and return its id.
    async fn insert_learning_element(
        &self,
        element: &LearningElementSeed,
    ) -> Result<i32, WarehouseStoreError>;

    /// Insert a course registration and return its id.
    ///
    /// A duplicate (student, course) pair yields
    /// [`WarehouseStoreError::Conflict`].
    async fn insert_registration(
        &self,
        registration: &RegistrationSeed,
    ) -> Result<i32, WarehouseStoreError>;

    /// Insert calendar rows in one transaction and return the count written.
    async fn insert_calendar_dates(
        &self,
        dates: &[CalendarDate],
    ) -> Result<usize, WarehouseStoreError>;

    /// Return every learning element of a course, resolved through lesson and
    /// module, together with its type name.
    async fn course_elements(
        &self,
        course_id: i32,
    ) -> Result<Vec<CourseElement>, WarehouseStoreError>;

    /// Insert progress facts in one transaction and return the count written.
    async fn insert_progress_facts(
        &self,
        facts: &[ProgressFactSeed],
    ) -> Result<usize, WarehouseStoreError>;

    /// Count the rows of every table.
    async fn table_counts(&self) -> Result<TableCounts, WarehouseStoreError>;
}
