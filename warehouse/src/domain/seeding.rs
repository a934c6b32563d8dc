//! Warehouse seeding orchestration.
//!
//! Runs the generation phases in dependency order against a
//! [`WarehouseStore`]. Planning is delegated to `lms-data`; this service owns
//! id threading between phases, the duplicate-registration skip policy, and
//! run-level logging.

use std::sync::Arc;

use lms_data::{
    COURSES, ELEMENT_TYPES, EnrolledRegistration, GenerationContext, GenerationError,
    HADOOP_SUBTOPICS, HADOOP_TOPIC, OTHER_TOPICS, TopicSeed, generate_course, generate_students,
    plan_elements, plan_lessons, plan_modules, plan_progress, plan_registrations,
    warehouse_calendar,
};
use mockable::Clock;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::ports::{TableCounts, WarehouseStore, WarehouseStoreError};

/// Parameters of a full seeding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedingOptions {
    /// RNG seed; identical seeds and clocks reproduce identical data.
    pub seed: u64,
    /// Number of students to generate.
    pub student_count: usize,
}

/// Summary of a completed seeding run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedingReport {
    /// RNG seed the run used.
    pub seed: u64,
    /// Students requested.
    pub student_count: usize,
    /// Registrations discarded because the (student, course) pair existed.
    pub skipped_registrations: usize,
    /// Rows present in each table once the run finished.
    pub tables: TableCounts,
}

/// Registrations persisted by [`WarehouseSeeder::seed_registrations`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationOutcome {
    /// Registrations the store accepted, in insertion order.
    pub created: Vec<EnrolledRegistration>,
    /// Attempts rejected as duplicates.
    pub skipped: usize,
}

/// Errors that abort a seeding run.
#[derive(Debug, Error)]
pub enum SeedingError {
    /// The store failed with a non-recoverable error.
    #[error("warehouse store error: {0}")]
    Store(#[from] WarehouseStoreError),
    /// Row planning failed.
    #[error("data generation failed: {0}")]
    Generation(#[from] GenerationError),
}

/// Service that populates the warehouse from an empty state.
#[derive(Clone)]
pub struct WarehouseSeeder<S> {
    store: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<S> WarehouseSeeder<S> {
    /// Create a seeder over `store`; `clock` supplies the run's "now".
    pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Build a generation context for `seed`, anchored at the clock's
    /// current UTC time.
    #[must_use]
    pub fn context(&self, seed: u64) -> GenerationContext {
        GenerationContext::new(seed, self.clock.utc().naive_utc())
    }
}

impl<S> WarehouseSeeder<S>
where
    S: WarehouseStore,
{
    /// Truncate then run every phase in dependency order.
    ///
    /// Completed phases stay committed when a later phase fails.
    ///
    /// # Errors
    ///
    /// Returns [`SeedingError`] on the first store or generation failure
    /// other than a duplicate registration.
    pub async fn run(&self, options: SeedingOptions) -> Result<SeedingReport, SeedingError> {
        let result = self.run_phases(options).await;
        if let Err(error) = &result {
            warn!(seed = options.seed, %error, "warehouse seeding aborted");
        }
        result
    }

    async fn run_phases(&self, options: SeedingOptions) -> Result<SeedingReport, SeedingError> {
        let mut ctx = self.context(options.seed);
        info!(
            seed = options.seed,
            student_count = options.student_count,
            now = %ctx.now(),
            "warehouse seeding started"
        );

        self.reset().await?;
        let element_type_ids = self.seed_element_types().await?;
        let topic_ids = self.seed_topics().await?;
        let student_ids = self.seed_students(&mut ctx, options.student_count).await?;
        let course_ids = self.seed_courses(&mut ctx).await?;
        let module_ids = self.seed_modules(&mut ctx, &course_ids).await?;
        let lesson_ids = self.seed_lessons(&mut ctx, &module_ids, &topic_ids).await?;
        self.seed_learning_elements(&mut ctx, &lesson_ids, &element_type_ids)
            .await?;
        let registrations = self
            .seed_registrations(&mut ctx, &student_ids, &course_ids)
            .await?;
        self.seed_calendar().await?;
        self.seed_progress_facts(&mut ctx, &registrations.created)
            .await?;

        let tables = self.store.table_counts().await?;
        info!(?tables, "warehouse seeding finished");

        Ok(SeedingReport {
            seed: options.seed,
            student_count: options.student_count,
            skipped_registrations: registrations.skipped,
            tables,
        })
    }

    /// Remove all existing rows.
    ///
    /// # Errors
    ///
    /// Returns [`SeedingError::Store`] when truncation fails.
    pub async fn reset(&self) -> Result<(), SeedingError> {
        self.store.truncate_all().await?;
        info!("warehouse tables truncated");
        Ok(())
    }

    /// Insert the fixed element types and return their ids.
    ///
    /// # Errors
    ///
    /// Returns [`SeedingError::Store`] when an insert fails.
    pub async fn seed_element_types(&self) -> Result<Vec<i32>, SeedingError> {
        let mut ids = Vec::with_capacity(ELEMENT_TYPES.len());
        for element_type in &ELEMENT_TYPES {
            ids.push(self.store.insert_element_type(element_type).await?);
        }
        info!(count = ids.len(), "element types seeded");
        Ok(ids)
    }

    /// Return the id of `topic` under `parent_topic_id`, inserting it only
    /// when absent.
    ///
    /// # Errors
    ///
    /// Returns [`SeedingError::Store`] when the lookup or insert fails.
    pub async fn get_or_create_topic(
        &self,
        topic: &TopicSeed,
        parent_topic_id: Option<i32>,
    ) -> Result<i32, SeedingError> {
        if let Some(id) = self
            .store
            .find_topic(topic.topic_name, parent_topic_id)
            .await?
        {
            return Ok(id);
        }

        match self.store.insert_topic(topic, parent_topic_id).await {
            Ok(id) => Ok(id),
            // Lost a race with another writer; the row now exists.
            Err(error) if error.is_conflict() => self
                .store
                .find_topic(topic.topic_name, parent_topic_id)
                .await?
                .ok_or_else(|| SeedingError::Store(error)),
            Err(error) => Err(error.into()),
        }
    }

    /// Ensure the topic tree exists and return every topic id in the store.
    ///
    /// Safe to repeat without truncation: existing topics are reused.
    ///
    /// # Errors
    ///
    /// Returns [`SeedingError::Store`] when a lookup or insert fails.
    pub async fn seed_topics(&self) -> Result<Vec<i32>, SeedingError> {
        let hadoop_id = self.get_or_create_topic(&HADOOP_TOPIC, None).await?;
        for subtopic in &HADOOP_SUBTOPICS {
            self.get_or_create_topic(subtopic, Some(hadoop_id)).await?;
        }
        for topic in &OTHER_TOPICS {
            self.get_or_create_topic(topic, None).await?;
        }

        let topic_ids = self.store.topic_ids().await?;
        info!(count = topic_ids.len(), "topics seeded");
        Ok(topic_ids)
    }

    /// Generate and insert `count` students, returning their ids.
    ///
    /// # Errors
    ///
    /// Returns [`SeedingError::Generation`] when unique e-mails run out, or
    /// [`SeedingError::Store`] when an insert fails.
    pub async fn seed_students(
        &self,
        ctx: &mut GenerationContext,
        count: usize,
    ) -> Result<Vec<i32>, SeedingError> {
        let students = generate_students(ctx, count)?;
        let mut ids = Vec::with_capacity(students.len());
        for student in &students {
            ids.push(self.store.insert_student(student).await?);
        }
        info!(count = ids.len(), "students seeded");
        Ok(ids)
    }

    /// Insert the curated courses, returning their ids.
    ///
    /// # Errors
    ///
    /// Returns [`SeedingError::Store`] when an insert fails.
    pub async fn seed_courses(&self, ctx: &mut GenerationContext) -> Result<Vec<i32>, SeedingError> {
        let mut ids = Vec::with_capacity(COURSES.len());
        for template in &COURSES {
            let course = generate_course(ctx, template);
            ids.push(self.store.insert_course(&course).await?);
        }
        info!(count = ids.len(), "courses seeded");
        Ok(ids)
    }

    /// Insert three to five modules per course, returning their ids.
    ///
    /// # Errors
    ///
    /// Returns [`SeedingError::Store`] when an insert fails.
    pub async fn seed_modules(
        &self,
        ctx: &mut GenerationContext,
        course_ids: &[i32],
    ) -> Result<Vec<i32>, SeedingError> {
        let mut ids = Vec::new();
        for &course_id in course_ids {
            for module in plan_modules(ctx, course_id) {
                ids.push(self.store.insert_module(&module).await?);
            }
        }
        info!(count = ids.len(), "modules seeded");
        Ok(ids)
    }

    /// Insert three to eight lessons per module, each with a random topic,
    /// returning their ids.
    ///
    /// # Errors
    ///
    /// Returns [`SeedingError::Generation`] when `topic_ids` is empty, or
    /// [`SeedingError::Store`] when an insert fails.
    pub async fn seed_lessons(
        &self,
        ctx: &mut GenerationContext,
        module_ids: &[i32],
        topic_ids: &[i32],
    ) -> Result<Vec<i32>, SeedingError> {
        let mut ids = Vec::new();
        for &module_id in module_ids {
            for lesson in plan_lessons(ctx, module_id, topic_ids)? {
                ids.push(self.store.insert_lesson(&lesson).await?);
            }
        }
        info!(count = ids.len(), "lessons seeded");
        Ok(ids)
    }

    /// Insert three to ten learning elements per lesson and return how many
    /// were created.
    ///
    /// # Errors
    ///
    /// Returns [`SeedingError::Generation`] when `element_type_ids` is empty,
    /// or [`SeedingError::Store`] when an insert fails.
    pub async fn seed_learning_elements(
        &self,
        ctx: &mut GenerationContext,
        lesson_ids: &[i32],
        element_type_ids: &[i32],
    ) -> Result<usize, SeedingError> {
        let mut count = 0;
        for &lesson_id in lesson_ids {
            for element in plan_elements(ctx, lesson_id, element_type_ids)? {
                self.store.insert_learning_element(&element).await?;
                count += 1;
            }
        }
        info!(count, "learning elements seeded");
        Ok(count)
    }

    /// Register every student for one to three distinct courses.
    ///
    /// A duplicate (student, course) pair is skipped once and never retried.
    ///
    /// # Errors
    ///
    /// Returns [`SeedingError::Store`] for any store failure other than a
    /// uniqueness conflict.
    pub async fn seed_registrations(
        &self,
        ctx: &mut GenerationContext,
        student_ids: &[i32],
        course_ids: &[i32],
    ) -> Result<RegistrationOutcome, SeedingError> {
        let mut outcome = RegistrationOutcome::default();
        for &student_id in student_ids {
            for registration in plan_registrations(ctx, student_id, course_ids) {
                match self.store.insert_registration(&registration).await {
                    Ok(_) => outcome.created.push(EnrolledRegistration {
                        student_id: registration.student_id,
                        course_id: registration.course_id,
                        registration_date: registration.registration_date,
                    }),
                    Err(error) if error.is_conflict() => {
                        debug!(
                            student_id,
                            course_id = registration.course_id,
                            %error,
                            "duplicate registration skipped"
                        );
                        outcome.skipped += 1;
                    }
                    Err(error) => return Err(error.into()),
                }
            }
        }
        info!(
            created = outcome.created.len(),
            skipped = outcome.skipped,
            "registrations seeded"
        );
        Ok(outcome)
    }

    /// Insert the 2020-2023 calendar and return the number of days written.
    ///
    /// # Errors
    ///
    /// Returns [`SeedingError::Store`] when the batch insert fails.
    pub async fn seed_calendar(&self) -> Result<usize, SeedingError> {
        let dates: Vec<_> = warehouse_calendar().collect();
        let count = self.store.insert_calendar_dates(&dates).await?;
        info!(count, "calendar seeded");
        Ok(count)
    }

    /// Insert completed progress facts for each registration and return how
    /// many were created.
    ///
    /// # Errors
    ///
    /// Returns [`SeedingError::Store`] when an element lookup or batch insert
    /// fails.
    pub async fn seed_progress_facts(
        &self,
        ctx: &mut GenerationContext,
        registrations: &[EnrolledRegistration],
    ) -> Result<usize, SeedingError> {
        let mut count = 0;
        for registration in registrations {
            let elements = self.store.course_elements(registration.course_id).await?;
            let facts = plan_progress(ctx, registration, &elements);
            if facts.is_empty() {
                debug!(
                    student_id = registration.student_id,
                    course_id = registration.course_id,
                    "course has no learning elements; no progress recorded"
                );
                continue;
            }
            count += self.store.insert_progress_facts(&facts).await?;
        }
        info!(count, "progress facts seeded");
        Ok(count)
    }
}

#[cfg(test)]
#[path = "seeding_tests.rs"]
mod tests;
