//! PostgreSQL-backed warehouse store.
//!
//! This adapter implements the `WarehouseStore` port with Diesel over a `bb8`
//! pool. Single-row inserts autocommit and return the allocated id; batch
//! inserts and truncation each run inside one transaction.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use lms_data::{
    CalendarDate, CourseElement, CourseSeed, ElementTypeSeed, LearningElementSeed, LessonSeed,
    ModuleSeed, ProgressFactSeed, RegistrationSeed, StudentSeed, TopicSeed,
};
use tracing::debug;

use crate::domain::ports::{TableCounts, WarehouseStore, WarehouseStoreError};

use super::models::{
    CourseElementRow, NewCalendarDateRow, NewCourseRow, NewElementTypeRow, NewLearningElementRow,
    NewLessonRow, NewModuleRow, NewProgressFactRow, NewRegistrationRow, NewStudentRow,
    NewTopicRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{
    dim_course_registrations, dim_courses, dim_dates, dim_element_types, dim_learning_elements,
    dim_lessons, dim_modules, dim_students, dim_topics, fact_student_progress,
};

/// Tables in truncation order: children before parents.
const TRUNCATION_ORDER: [&str; 10] = [
    "fact_student_progress",
    "dim_course_registrations",
    "dim_learning_elements",
    "dim_lessons",
    "dim_modules",
    "dim_courses",
    "dim_students",
    "dim_topics",
    "dim_element_types",
    "dim_dates",
];

/// Rows per multi-row `INSERT`, keeping bind parameters well under
/// PostgreSQL's 65,535 limit.
const BATCH_SIZE: usize = 1000;

/// Diesel-backed implementation of the warehouse store.
#[derive(Clone)]
pub struct DieselWarehouseStore {
    pool: DbPool,
}

impl DieselWarehouseStore {
    /// Create a new store over the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use warehouse::outbound::persistence::{DbPool, DieselWarehouseStore, PoolConfig};
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/lms_warehouse")).await?;
    /// let store = DieselWarehouseStore::new(pool);
    /// # let _ = store;
    /// # Ok(())
    /// # }
    /// ```
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to store connection errors.
fn map_pool_error(error: PoolError) -> WarehouseStoreError {
    WarehouseStoreError::connection(error.into_message())
}

/// Map Diesel errors to store errors, singling out unique violations.
fn map_diesel_error(error: DieselError) -> WarehouseStoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            error = %error,
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => WarehouseStoreError::query("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            WarehouseStoreError::conflict(
                info.constraint_name()
                    .map_or_else(|| info.message().to_owned(), str::to_owned),
            )
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            WarehouseStoreError::connection(info.message())
        }
        DieselError::DatabaseError(_, info) => WarehouseStoreError::query(info.message()),
        other => WarehouseStoreError::query(other.to_string()),
    }
}

fn to_count(rows: i64) -> u64 {
    u64::try_from(rows).unwrap_or_default()
}

macro_rules! count_rows {
    ($conn:expr, $table:path) => {
        $table
            .count()
            .get_result::<i64>(&mut *$conn)
            .await
            .map(to_count)
            .map_err(map_diesel_error)?
    };
}

#[async_trait]
impl WarehouseStore for DieselWarehouseStore {
    async fn truncate_all(&self) -> Result<(), WarehouseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                for table in TRUNCATION_ORDER {
                    diesel::sql_query(format!("TRUNCATE TABLE {table} RESTART IDENTITY CASCADE"))
                        .execute(conn)
                        .await?;
                }
                Ok::<_, DieselError>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn insert_element_type(
        &self,
        element_type: &ElementTypeSeed,
    ) -> Result<i32, WarehouseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(dim_element_types::table)
            .values(NewElementTypeRow::from(element_type))
            .returning(dim_element_types::type_id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn find_topic(
        &self,
        topic_name: &str,
        parent_topic_id: Option<i32>,
    ) -> Result<Option<i32>, WarehouseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let by_name = dim_topics::table
            .select(dim_topics::topic_id)
            .filter(dim_topics::topic_name.eq(topic_name))
            .into_boxed();
        let query = match parent_topic_id {
            Some(parent) => by_name.filter(dim_topics::parent_topic_id.eq(parent)),
            None => by_name.filter(dim_topics::parent_topic_id.is_null()),
        };
        query
            .first::<i32>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)
    }

    async fn insert_topic(
        &self,
        topic: &TopicSeed,
        parent_topic_id: Option<i32>,
    ) -> Result<i32, WarehouseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(dim_topics::table)
            .values(NewTopicRow::new(topic, parent_topic_id))
            .returning(dim_topics::topic_id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn topic_ids(&self) -> Result<Vec<i32>, WarehouseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        dim_topics::table
            .select(dim_topics::topic_id)
            .order(dim_topics::topic_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn insert_student(&self, student: &StudentSeed) -> Result<i32, WarehouseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(dim_students::table)
            .values(NewStudentRow::from(student))
            .returning(dim_students::student_id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn insert_course(&self, course: &CourseSeed) -> Result<i32, WarehouseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(dim_courses::table)
            .values(NewCourseRow::from(course))
            .returning(dim_courses::course_id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn insert_module(&self, module: &ModuleSeed) -> Result<i32, WarehouseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(dim_modules::table)
            .values(NewModuleRow::from(module))
            .returning(dim_modules::module_id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn insert_lesson(&self, lesson: &LessonSeed) -> Result<i32, WarehouseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(dim_lessons::table)
            .values(NewLessonRow::from(lesson))
            .returning(dim_lessons::lesson_id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn insert_learning_element(
        &self,
        element: &LearningElementSeed,
    ) -> Result<i32, WarehouseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(dim_learning_elements::table)
            .values(NewLearningElementRow::from(element))
            .returning(dim_learning_elements::element_id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn insert_registration(
        &self,
        registration: &RegistrationSeed,
    ) -> Result<i32, WarehouseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(dim_course_registrations::table)
            .values(NewRegistrationRow::from(registration))
            .returning(dim_course_registrations::registration_id)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn insert_calendar_dates(
        &self,
        dates: &[CalendarDate],
    ) -> Result<usize, WarehouseStoreError> {
        let rows: Vec<NewCalendarDateRow<'_>> = dates.iter().map(NewCalendarDateRow::from).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let mut inserted = 0;
                for chunk in rows.chunks(BATCH_SIZE) {
                    inserted += diesel::insert_into(dim_dates::table)
                        .values(chunk)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, DieselError>(inserted)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn course_elements(
        &self,
        course_id: i32,
    ) -> Result<Vec<CourseElement>, WarehouseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = dim_learning_elements::table
            .inner_join(dim_lessons::table.inner_join(dim_modules::table))
            .inner_join(dim_element_types::table)
            .filter(dim_modules::course_id.eq(course_id))
            .select((
                dim_learning_elements::element_id,
                dim_learning_elements::lesson_id,
                dim_lessons::module_id,
                dim_learning_elements::difficulty_level,
                dim_element_types::type_name,
            ))
            .order(dim_learning_elements::element_id)
            .load::<CourseElementRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows
            .into_iter()
            .map(|row| CourseElement {
                element_id: row.element_id,
                lesson_id: row.lesson_id,
                module_id: row.module_id,
                difficulty_level: row.difficulty_level,
                element_type_name: row.type_name,
            })
            .collect())
    }

    async fn insert_progress_facts(
        &self,
        facts: &[ProgressFactSeed],
    ) -> Result<usize, WarehouseStoreError> {
        let rows: Vec<NewProgressFactRow> = facts.iter().map(NewProgressFactRow::from).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let mut inserted = 0;
                for chunk in rows.chunks(BATCH_SIZE) {
                    inserted += diesel::insert_into(fact_student_progress::table)
                        .values(chunk)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, DieselError>(inserted)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn table_counts(&self) -> Result<TableCounts, WarehouseStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let conn = &mut conn;
        Ok(TableCounts {
            element_types: count_rows!(conn, dim_element_types::table),
            topics: count_rows!(conn, dim_topics::table),
            students: count_rows!(conn, dim_students::table),
            courses: count_rows!(conn, dim_courses::table),
            modules: count_rows!(conn, dim_modules::table),
            lessons: count_rows!(conn, dim_lessons::table),
            learning_elements: count_rows!(conn, dim_learning_elements::table),
            registrations: count_rows!(conn, dim_course_registrations::table),
            calendar_dates: count_rows!(conn, dim_dates::table),
            progress_facts: count_rows!(conn, fact_student_progress::table),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for warehouse store error mapping.
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let error = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(error, WarehouseStoreError::Connection { .. }));
        assert!(error.to_string().contains("connection refused"));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let error = map_diesel_error(DieselError::NotFound);

        assert!(matches!(error, WarehouseStoreError::Query { .. }));
        assert!(error.to_string().contains("record not found"));
    }

    #[rstest]
    fn unique_violation_maps_to_conflict() {
        let error = map_diesel_error(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        ));

        assert!(error.is_conflict());
        assert!(error.to_string().contains("duplicate key"));
    }

    #[rstest]
    fn truncation_removes_children_first() {
        let position = |table: &str| TRUNCATION_ORDER.iter().position(|t| *t == table);
        assert!(position("fact_student_progress") < position("dim_course_registrations"));
        assert!(position("dim_learning_elements") < position("dim_lessons"));
        assert!(position("dim_lessons") < position("dim_modules"));
        assert!(position("dim_modules") < position("dim_courses"));
        assert!(position("dim_lessons") < position("dim_topics"));
        assert!(position("dim_learning_elements") < position("dim_element_types"));
    }
}
