//! Planned row types.
//!
//! Planners emit these rows without identities; the store allocates ids on
//! insert and later planners receive those ids as plain `i32` references.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// A synthetic student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentSeed {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// E-mail, unique across the run.
    pub email: String,
    /// Sign-up instant.
    pub registration_date: NaiveDateTime,
    /// Most recent login, never before `registration_date`.
    pub last_login: NaiveDateTime,
}

/// A course ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseSeed {
    /// Course title.
    pub course_name: String,
    /// Course description.
    pub description: String,
    /// Creation instant.
    pub creation_date: NaiveDateTime,
    /// Whether the course is open for enrolment.
    pub is_active: bool,
}

/// A module owned by a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleSeed {
    /// Owning course.
    pub course_id: i32,
    /// Display name.
    pub module_name: String,
    /// 1-based position within the course.
    pub module_order: i32,
}

/// A lesson owned by a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonSeed {
    /// Owning module.
    pub module_id: i32,
    /// Display name.
    pub lesson_name: String,
    /// 1-based position within the module.
    pub lesson_order: i32,
    /// Referenced topic.
    pub topic_id: i32,
}

/// A learning element owned by a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LearningElementSeed {
    /// Owning lesson.
    pub lesson_id: i32,
    /// Referenced element type.
    pub element_type_id: i32,
    /// Difficulty from 1 to 5.
    pub difficulty_level: i32,
    /// 1-based position within the lesson.
    pub element_order: i32,
    /// Display title.
    pub title: String,
    /// Whether the element is mandatory.
    pub is_required: bool,
    /// Location of the element content.
    pub content_url: String,
}

/// A student's enrolment in a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationSeed {
    /// Enrolled student.
    pub student_id: i32,
    /// Course enrolled in.
    pub course_id: i32,
    /// Enrolment instant.
    pub registration_date: NaiveDateTime,
    /// Completion instant, present only for completed enrolments.
    pub completion_date: Option<NaiveDateTime>,
    /// `true` exactly when `completion_date` is absent.
    pub is_active: bool,
}

/// The parts of a persisted registration that progress planning needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnrolledRegistration {
    /// Enrolled student.
    pub student_id: i32,
    /// Course enrolled in.
    pub course_id: i32,
    /// Enrolment instant; progress never starts before it.
    pub registration_date: NaiveDateTime,
}

/// A learning element resolved through lesson and module to its course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseElement {
    /// Element identity.
    pub element_id: i32,
    /// Owning lesson.
    pub lesson_id: i32,
    /// Module owning the lesson.
    pub module_id: i32,
    /// Difficulty from 1 to 5.
    pub difficulty_level: i32,
    /// Name of the element's type.
    pub element_type_name: String,
}

/// A completed interaction with a learning element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressFactSeed {
    /// Student who made progress.
    pub student_id: i32,
    /// Course of the registration.
    pub course_id: i32,
    /// Module of the element.
    pub module_id: i32,
    /// Lesson of the element.
    pub lesson_id: i32,
    /// Element worked on.
    pub element_id: i32,
    /// Start of the interaction.
    pub start_time: NaiveDateTime,
    /// End of the interaction, never before `start_time`.
    pub end_time: NaiveDateTime,
    /// Whole seconds between `start_time` and `end_time`.
    pub duration_seconds: i64,
    /// Score, present only for test elements.
    pub score: Option<f64>,
    /// Always `true` for generated facts.
    pub is_completed: bool,
    /// Independent coin flip, not copied from the element.
    pub is_required: bool,
}

/// One row of the calendar dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDate {
    /// The calendar day.
    pub full_date: NaiveDate,
    /// 1 = Monday through 7 = Sunday.
    pub day_of_week: i32,
    /// English weekday name.
    pub day_name: String,
    /// Day within the month.
    pub day_of_month: i32,
    /// Day within the year.
    pub day_of_year: i32,
    /// ISO week number.
    pub week_of_year: i32,
    /// Month from 1 to 12.
    pub month_number: i32,
    /// English month name.
    pub month_name: String,
    /// Quarter from 1 to 4.
    pub quarter: i32,
    /// Calendar year.
    pub year: i32,
    /// Saturday or Sunday.
    pub is_weekend: bool,
}
