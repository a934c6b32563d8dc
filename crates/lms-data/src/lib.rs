//! Deterministic synthetic data for the learning-management star schema.
//!
//! This crate plans every row the warehouse seeder inserts, without touching
//! storage. It is independent of the warehouse crate so that generation can be
//! reasoned about and tested in isolation.
//!
//! # Overview
//!
//! The crate provides:
//!
//! - The curated catalogue of element types, topics, and courses
//! - An injectable [`GenerationContext`] holding the seeded RNG and "now"
//! - Per-phase planners that respect the schema's referential and temporal
//!   invariants
//! - The calendar dimension derived purely from dates
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use lms_data::{GenerationContext, plan_modules, plan_registrations};
//!
//! let now = NaiveDate::from_ymd_opt(2024, 5, 1)
//!     .and_then(|date| date.and_hms_opt(8, 0, 0))
//!     .expect("valid timestamp");
//! let mut ctx = GenerationContext::new(42, now);
//!
//! let modules = plan_modules(&mut ctx, 1);
//! assert!((3..=5).contains(&modules.len()));
//!
//! let registrations = plan_registrations(&mut ctx, 1, &[1, 2, 3, 4, 5, 6]);
//! assert!(registrations.iter().all(|r| r.is_active == r.completion_date.is_none()));
//! ```

mod calendar;
mod catalogue;
mod context;
mod error;
mod generator;
mod records;

pub use calendar::{CALENDAR_END, CALENDAR_START, calendar_dates, warehouse_calendar};
pub use catalogue::{
    COURSES, CourseTemplate, DEFAULT_STUDENT_COUNT, ELEMENT_TYPES, ElementTypeSeed, HADOOP_SUBTOPICS,
    HADOOP_TOPIC, OTHER_TOPICS, TEST_ELEMENT_TYPE, TopicSeed,
};
pub use context::{GenerationContext, months, years};
pub use error::GenerationError;
pub use generator::{
    generate_course, generate_students, plan_elements, plan_lessons, plan_modules, plan_progress,
    plan_registrations,
};
pub use records::{
    CalendarDate, CourseElement, CourseSeed, EnrolledRegistration, LearningElementSeed, LessonSeed,
    ModuleSeed, ProgressFactSeed, RegistrationSeed, StudentSeed,
};
