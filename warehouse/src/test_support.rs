//! Test utilities for the warehouse crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use lms_data::{
    CalendarDate, CourseElement, CourseSeed, ElementTypeSeed, LearningElementSeed, LessonSeed,
    ModuleSeed, ProgressFactSeed, RegistrationSeed, StudentSeed, TopicSeed,
};
use mockable::Clock;

use crate::domain::ports::{TableCounts, WarehouseStore, WarehouseStoreError};

/// Clock frozen at a fixed UTC instant.
#[derive(Debug, Clone, Copy)]
pub struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl FixtureClock {
    /// Freeze the clock at `utc_now`.
    #[must_use]
    pub const fn new(utc_now: DateTime<Utc>) -> Self {
        Self { utc_now }
    }
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

/// A topic row held by [`InMemoryWarehouseStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTopic {
    /// Allocated id.
    pub topic_id: i32,
    /// Topic name.
    pub topic_name: String,
    /// Parent topic, `None` at the top level.
    pub parent_topic_id: Option<i32>,
}

#[derive(Debug, Default)]
struct State {
    element_types: Vec<(i32, ElementTypeSeed)>,
    topics: Vec<StoredTopic>,
    students: Vec<(i32, StudentSeed)>,
    courses: Vec<(i32, CourseSeed)>,
    modules: Vec<(i32, ModuleSeed)>,
    lessons: Vec<(i32, LessonSeed)>,
    elements: Vec<(i32, LearningElementSeed)>,
    registrations: Vec<(i32, RegistrationSeed)>,
    dates: Vec<CalendarDate>,
    facts: Vec<ProgressFactSeed>,
}

/// Allocate the next serial id for a table holding `len` rows.
fn next_id(len: usize) -> Result<i32, WarehouseStoreError> {
    i32::try_from(len)
        .ok()
        .and_then(|count| count.checked_add(1))
        .ok_or_else(|| WarehouseStoreError::query("identity sequence exhausted"))
}

fn missing(table: &str, id: i32) -> WarehouseStoreError {
    WarehouseStoreError::query(format!("foreign key violation: no row {id} in {table}"))
}

fn has_id<T>(rows: &[(i32, T)], id: i32) -> bool {
    rows.iter().any(|(row_id, _)| *row_id == id)
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

impl State {
    fn check_fact(&self, fact: &ProgressFactSeed) -> Result<(), WarehouseStoreError> {
        let checks = [
            (has_id(&self.students, fact.student_id), "dim_students", fact.student_id),
            (has_id(&self.courses, fact.course_id), "dim_courses", fact.course_id),
            (has_id(&self.modules, fact.module_id), "dim_modules", fact.module_id),
            (has_id(&self.lessons, fact.lesson_id), "dim_lessons", fact.lesson_id),
            (
                has_id(&self.elements, fact.element_id),
                "dim_learning_elements",
                fact.element_id,
            ),
        ];
        if let Some((_, table, id)) = checks.into_iter().find(|(present, _, _)| !present) {
            return Err(missing(table, id));
        }
        if fact.end_time < fact.start_time {
            return Err(WarehouseStoreError::query(
                "check violation: fact_student_progress_end_after_start",
            ));
        }
        Ok(())
    }
}

/// In-memory [`WarehouseStore`] enforcing the same uniqueness and foreign key
/// constraints as the PostgreSQL schema.
#[derive(Debug, Default)]
pub struct InMemoryWarehouseStore {
    state: Mutex<State>,
}

impl InMemoryWarehouseStore {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|err| err.into_inner())
    }

    /// Snapshot of the topic rows.
    pub fn topics(&self) -> Vec<StoredTopic> {
        self.state().topics.clone()
    }

    /// Snapshot of the student rows with their ids.
    pub fn students(&self) -> Vec<(i32, StudentSeed)> {
        self.state().students.clone()
    }

    /// Ids of every course row.
    pub fn course_ids(&self) -> Vec<i32> {
        self.state().courses.iter().map(|(id, _)| *id).collect()
    }

    /// Snapshot of the registration rows with their ids.
    pub fn registrations(&self) -> Vec<(i32, RegistrationSeed)> {
        self.state().registrations.clone()
    }

    /// Snapshot of the calendar rows.
    pub fn calendar_dates(&self) -> Vec<CalendarDate> {
        self.state().dates.clone()
    }

    /// Snapshot of the progress facts.
    pub fn progress_facts(&self) -> Vec<ProgressFactSeed> {
        self.state().facts.clone()
    }
}

#[async_trait]
impl WarehouseStore for InMemoryWarehouseStore {
    async fn truncate_all(&self) -> Result<(), WarehouseStoreError> {
        *self.state() = State::default();
        Ok(())
    }

    async fn insert_element_type(
        &self,
        element_type: &ElementTypeSeed,
    ) -> Result<i32, WarehouseStoreError> {
        let mut state = self.state();
        if state
            .element_types
            .iter()
            .any(|(_, row)| row.type_name == element_type.type_name)
        {
            return Err(WarehouseStoreError::conflict("dim_element_types_type_name_key"));
        }
        let id = next_id(state.element_types.len())?;
        state.element_types.push((id, *element_type));
        Ok(id)
    }

    async fn find_topic(
        &self,
        topic_name: &str,
        parent_topic_id: Option<i32>,
    ) -> Result<Option<i32>, WarehouseStoreError> {
        Ok(self
            .state()
            .topics
            .iter()
            .find(|row| row.topic_name == topic_name && row.parent_topic_id == parent_topic_id)
            .map(|row| row.topic_id))
    }

    async fn insert_topic(
        &self,
        topic: &TopicSeed,
        parent_topic_id: Option<i32>,
    ) -> Result<i32, WarehouseStoreError> {
        let mut state = self.state();
        if let Some(parent) = parent_topic_id {
            if !state.topics.iter().any(|row| row.topic_id == parent) {
                return Err(missing("dim_topics", parent));
            }
        }
        if state
            .topics
            .iter()
            .any(|row| row.topic_name == topic.topic_name && row.parent_topic_id == parent_topic_id)
        {
            return Err(WarehouseStoreError::conflict("dim_topics_name_key"));
        }
        let topic_id = next_id(state.topics.len())?;
        state.topics.push(StoredTopic {
            topic_id,
            topic_name: topic.topic_name.to_owned(),
            parent_topic_id,
        });
        Ok(topic_id)
    }

    async fn topic_ids(&self) -> Result<Vec<i32>, WarehouseStoreError> {
        Ok(self.state().topics.iter().map(|row| row.topic_id).collect())
    }

    async fn insert_student(&self, student: &StudentSeed) -> Result<i32, WarehouseStoreError> {
        let mut state = self.state();
        if state
            .students
            .iter()
            .any(|(_, row)| row.email == student.email)
        {
            return Err(WarehouseStoreError::conflict("dim_students_email_key"));
        }
        let id = next_id(state.students.len())?;
        state.students.push((id, student.clone()));
        Ok(id)
    }

    async fn insert_course(&self, course: &CourseSeed) -> Result<i32, WarehouseStoreError> {
        let mut state = self.state();
        let id = next_id(state.courses.len())?;
        state.courses.push((id, course.clone()));
        Ok(id)
    }

    async fn insert_module(&self, module: &ModuleSeed) -> Result<i32, WarehouseStoreError> {
        let mut state = self.state();
        if !has_id(&state.courses, module.course_id) {
            return Err(missing("dim_courses", module.course_id));
        }
        let id = next_id(state.modules.len())?;
        state.modules.push((id, module.clone()));
        Ok(id)
    }

    async fn insert_lesson(&self, lesson: &LessonSeed) -> Result<i32, WarehouseStoreError> {
        let mut state = self.state();
        if !has_id(&state.modules, lesson.module_id) {
            return Err(missing("dim_modules", lesson.module_id));
        }
        if !state.topics.iter().any(|row| row.topic_id == lesson.topic_id) {
            return Err(missing("dim_topics", lesson.topic_id));
        }
        let id = next_id(state.lessons.len())?;
        state.lessons.push((id, lesson.clone()));
        Ok(id)
    }

    async fn insert_learning_element(
        &self,
        element: &LearningElementSeed,
    ) -> Result<i32, WarehouseStoreError> {
        let mut state = self.state();
        if !has_id(&state.lessons, element.lesson_id) {
            return Err(missing("dim_lessons", element.lesson_id));
        }
        if !has_id(&state.element_types, element.element_type_id) {
            return Err(missing("dim_element_types", element.element_type_id));
        }
        let id = next_id(state.elements.len())?;
        state.elements.push((id, element.clone()));
        Ok(id)
    }

    async fn insert_registration(
        &self,
        registration: &RegistrationSeed,
    ) -> Result<i32, WarehouseStoreError> {
        let mut state = self.state();
        if !has_id(&state.students, registration.student_id) {
            return Err(missing("dim_students", registration.student_id));
        }
        if !has_id(&state.courses, registration.course_id) {
            return Err(missing("dim_courses", registration.course_id));
        }
        if state.registrations.iter().any(|(_, row)| {
            row.student_id == registration.student_id && row.course_id == registration.course_id
        }) {
            return Err(WarehouseStoreError::conflict(
                "dim_course_registrations_student_course_key",
            ));
        }
        let id = next_id(state.registrations.len())?;
        state.registrations.push((id, registration.clone()));
        Ok(id)
    }

    async fn insert_calendar_dates(
        &self,
        dates: &[CalendarDate],
    ) -> Result<usize, WarehouseStoreError> {
        let mut state = self.state();
        let duplicate = dates.iter().enumerate().any(|(index, date)| {
            state.dates.iter().any(|row| row.full_date == date.full_date)
                || dates
                    .iter()
                    .skip(index + 1)
                    .any(|other| other.full_date == date.full_date)
        });
        if duplicate {
            return Err(WarehouseStoreError::conflict("dim_dates_pkey"));
        }
        state.dates.extend_from_slice(dates);
        Ok(dates.len())
    }

    async fn course_elements(
        &self,
        course_id: i32,
    ) -> Result<Vec<CourseElement>, WarehouseStoreError> {
        let state = self.state();
        let mut elements = Vec::new();
        for (element_id, element) in &state.elements {
            let Some((_, lesson)) = state
                .lessons
                .iter()
                .find(|(id, _)| *id == element.lesson_id)
            else {
                continue;
            };
            let in_course = state
                .modules
                .iter()
                .any(|(id, module)| *id == lesson.module_id && module.course_id == course_id);
            if !in_course {
                continue;
            }
            let type_name = state
                .element_types
                .iter()
                .find(|(id, _)| *id == element.element_type_id)
                .map(|(_, row)| row.type_name.to_owned())
                .ok_or_else(|| missing("dim_element_types", element.element_type_id))?;
            elements.push(CourseElement {
                element_id: *element_id,
                lesson_id: element.lesson_id,
                module_id: lesson.module_id,
                difficulty_level: element.difficulty_level,
                element_type_name: type_name,
            });
        }
        Ok(elements)
    }

    async fn insert_progress_facts(
        &self,
        facts: &[ProgressFactSeed],
    ) -> Result<usize, WarehouseStoreError> {
        let mut state = self.state();
        for fact in facts {
            state.check_fact(fact)?;
        }
        state.facts.extend_from_slice(facts);
        Ok(facts.len())
    }

    async fn table_counts(&self) -> Result<TableCounts, WarehouseStoreError> {
        let state = self.state();
        Ok(TableCounts {
            element_types: count(state.element_types.len()),
            topics: count(state.topics.len()),
            students: count(state.students.len()),
            courses: count(state.courses.len()),
            modules: count(state.modules.len()),
            lessons: count(state.lessons.len()),
            learning_elements: count(state.elements.len()),
            registrations: count(state.registrations.len()),
            calendar_dates: count(state.dates.len()),
            progress_facts: count(state.facts.len()),
        })
    }
}
