//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and never
//! leave it. Each insert struct borrows from the matching `lms-data` seed.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use lms_data::{
    CalendarDate, CourseSeed, ElementTypeSeed, LearningElementSeed, LessonSeed, ModuleSeed,
    ProgressFactSeed, RegistrationSeed, StudentSeed, TopicSeed,
};

use super::schema::{
    dim_course_registrations, dim_courses, dim_dates, dim_element_types, dim_learning_elements,
    dim_lessons, dim_modules, dim_students, dim_topics, fact_student_progress,
};

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dim_element_types)]
pub(crate) struct NewElementTypeRow<'a> {
    pub type_name: &'a str,
    pub description: &'a str,
}

impl<'a> From<&'a ElementTypeSeed> for NewElementTypeRow<'a> {
    fn from(seed: &'a ElementTypeSeed) -> Self {
        Self {
            type_name: seed.type_name,
            description: seed.description,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dim_topics)]
pub(crate) struct NewTopicRow<'a> {
    pub topic_name: &'a str,
    pub description: &'a str,
    pub parent_topic_id: Option<i32>,
}

impl<'a> NewTopicRow<'a> {
    pub(crate) const fn new(seed: &'a TopicSeed, parent_topic_id: Option<i32>) -> Self {
        Self {
            topic_name: seed.topic_name,
            description: seed.description,
            parent_topic_id,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dim_students)]
pub(crate) struct NewStudentRow<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub registration_date: NaiveDateTime,
    pub last_login: NaiveDateTime,
}

impl<'a> From<&'a StudentSeed> for NewStudentRow<'a> {
    fn from(seed: &'a StudentSeed) -> Self {
        Self {
            first_name: &seed.first_name,
            last_name: &seed.last_name,
            email: &seed.email,
            registration_date: seed.registration_date,
            last_login: seed.last_login,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dim_courses)]
pub(crate) struct NewCourseRow<'a> {
    pub course_name: &'a str,
    pub description: &'a str,
    pub creation_date: NaiveDateTime,
    pub is_active: bool,
}

impl<'a> From<&'a CourseSeed> for NewCourseRow<'a> {
    fn from(seed: &'a CourseSeed) -> Self {
        Self {
            course_name: &seed.course_name,
            description: &seed.description,
            creation_date: seed.creation_date,
            is_active: seed.is_active,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dim_modules)]
pub(crate) struct NewModuleRow<'a> {
    pub course_id: i32,
    pub module_name: &'a str,
    pub module_order: i32,
}

impl<'a> From<&'a ModuleSeed> for NewModuleRow<'a> {
    fn from(seed: &'a ModuleSeed) -> Self {
        Self {
            course_id: seed.course_id,
            module_name: &seed.module_name,
            module_order: seed.module_order,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dim_lessons)]
pub(crate) struct NewLessonRow<'a> {
    pub module_id: i32,
    pub lesson_name: &'a str,
    pub lesson_order: i32,
    pub topic_id: i32,
}

impl<'a> From<&'a LessonSeed> for NewLessonRow<'a> {
    fn from(seed: &'a LessonSeed) -> Self {
        Self {
            module_id: seed.module_id,
            lesson_name: &seed.lesson_name,
            lesson_order: seed.lesson_order,
            topic_id: seed.topic_id,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dim_learning_elements)]
pub(crate) struct NewLearningElementRow<'a> {
    pub lesson_id: i32,
    pub element_type_id: i32,
    pub difficulty_level: i32,
    pub element_order: i32,
    pub title: &'a str,
    pub is_required: bool,
    pub content_url: &'a str,
}

impl<'a> From<&'a LearningElementSeed> for NewLearningElementRow<'a> {
    fn from(seed: &'a LearningElementSeed) -> Self {
        Self {
            lesson_id: seed.lesson_id,
            element_type_id: seed.element_type_id,
            difficulty_level: seed.difficulty_level,
            element_order: seed.element_order,
            title: &seed.title,
            is_required: seed.is_required,
            content_url: &seed.content_url,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dim_course_registrations)]
pub(crate) struct NewRegistrationRow {
    pub student_id: i32,
    pub course_id: i32,
    pub registration_date: NaiveDateTime,
    pub completion_date: Option<NaiveDateTime>,
    pub is_active: bool,
}

impl From<&RegistrationSeed> for NewRegistrationRow {
    fn from(seed: &RegistrationSeed) -> Self {
        Self {
            student_id: seed.student_id,
            course_id: seed.course_id,
            registration_date: seed.registration_date,
            completion_date: seed.completion_date,
            is_active: seed.is_active,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = dim_dates)]
pub(crate) struct NewCalendarDateRow<'a> {
    pub full_date: NaiveDate,
    pub day_of_week: i32,
    pub day_name: &'a str,
    pub day_of_month: i32,
    pub day_of_year: i32,
    pub week_of_year: i32,
    pub month_number: i32,
    pub month_name: &'a str,
    pub quarter: i32,
    pub year: i32,
    pub is_weekend: bool,
}

impl<'a> From<&'a CalendarDate> for NewCalendarDateRow<'a> {
    fn from(date: &'a CalendarDate) -> Self {
        Self {
            full_date: date.full_date,
            day_of_week: date.day_of_week,
            day_name: &date.day_name,
            day_of_month: date.day_of_month,
            day_of_year: date.day_of_year,
            week_of_year: date.week_of_year,
            month_number: date.month_number,
            month_name: &date.month_name,
            quarter: date.quarter,
            year: date.year,
            is_weekend: date.is_weekend,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = fact_student_progress)]
pub(crate) struct NewProgressFactRow {
    pub student_id: i32,
    pub course_id: i32,
    pub module_id: i32,
    pub lesson_id: i32,
    pub element_id: i32,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub duration_seconds: i64,
    pub score: Option<f64>,
    pub is_completed: bool,
    pub is_required: bool,
}

impl From<&ProgressFactSeed> for NewProgressFactRow {
    fn from(fact: &ProgressFactSeed) -> Self {
        Self {
            student_id: fact.student_id,
            course_id: fact.course_id,
            module_id: fact.module_id,
            lesson_id: fact.lesson_id,
            element_id: fact.element_id,
            start_time: fact.start_time,
            end_time: fact.end_time,
            duration_seconds: fact.duration_seconds,
            score: fact.score,
            is_completed: fact.is_completed,
            is_required: fact.is_required,
        }
    }
}

/// A learning element joined through lesson and module with its type name.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct CourseElementRow {
    pub element_id: i32,
    pub lesson_id: i32,
    pub module_id: i32,
    pub difficulty_level: i32,
    pub type_name: String,
}
