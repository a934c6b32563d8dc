//! Row planners for each seeding phase.
//!
//! Planners only decide what to insert; they never touch storage. Ids of
//! previously inserted parents are passed in, so the caller controls the
//! dependency order.

use std::collections::HashSet;

use fake::Fake;
use fake::faker::internet::raw::SafeEmail;
use fake::faker::lorem::raw::Words;
use fake::faker::name::raw::{FirstName, LastName};
use fake::locales::EN;

use crate::catalogue::{CourseTemplate, TEST_ELEMENT_TYPE};
use crate::context::{GenerationContext, months, years};
use crate::error::GenerationError;
use crate::records::{
    CourseElement, CourseSeed, EnrolledRegistration, LearningElementSeed, LessonSeed, ModuleSeed,
    ProgressFactSeed, RegistrationSeed, StudentSeed,
};

/// Maximum number of attempts to draw an unused e-mail for one student.
const MAX_EMAIL_ATTEMPTS: usize = 100;

/// Bounds on modules created per course.
const MIN_MODULES: usize = 3;
const MAX_MODULES: usize = 5;

/// Bounds on lessons created per module.
const MIN_LESSONS: usize = 3;
const MAX_LESSONS: usize = 8;

/// Bounds on learning elements created per lesson.
const MIN_ELEMENTS: usize = 3;
const MAX_ELEMENTS: usize = 10;

/// Upper bound on courses a single student registers for.
const MAX_COURSES_PER_STUDENT: usize = 3;

/// Probability that a registration is already completed (30%).
const COMPLETION_NUMERATOR: u32 = 3;
const COMPLETION_DENOMINATOR: u32 = 10;

const CONTENT_URL_PREFIX: &str = "https://example.com/content/";

/// Generates `count` students with pairwise distinct e-mails.
///
/// Registration dates fall within the last two years and every last login
/// lies between the registration date and now.
///
/// # Errors
///
/// Returns [`GenerationError::EmailGenerationFailed`] when no unused e-mail
/// is found within the retry budget.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use lms_data::{GenerationContext, generate_students};
///
/// let now = NaiveDate::from_ymd_opt(2024, 5, 1)
///     .and_then(|date| date.and_hms_opt(0, 0, 0))
///     .expect("valid timestamp");
/// let mut ctx = GenerationContext::new(2026, now);
/// let students = generate_students(&mut ctx, 5).expect("generated");
///
/// assert_eq!(students.len(), 5);
/// assert!(students.iter().all(|s| s.last_login >= s.registration_date));
/// ```
pub fn generate_students(
    ctx: &mut GenerationContext,
    count: usize,
) -> Result<Vec<StudentSeed>, GenerationError> {
    let mut used_emails = HashSet::with_capacity(count);
    (0..count)
        .map(|_| generate_student(ctx, &mut used_emails))
        .collect()
}

fn generate_student(
    ctx: &mut GenerationContext,
    used_emails: &mut HashSet<String>,
) -> Result<StudentSeed, GenerationError> {
    let first_name: String = FirstName(EN).fake_with_rng(ctx.rng_mut());
    let last_name: String = LastName(EN).fake_with_rng(ctx.rng_mut());
    let email = unique_email(ctx, used_emails)?;
    let registration_date = ctx.datetime_within(years(2));
    let last_login = ctx.datetime_until_now(registration_date);

    Ok(StudentSeed {
        first_name,
        last_name,
        email,
        registration_date,
        last_login,
    })
}

fn unique_email(
    ctx: &mut GenerationContext,
    used_emails: &mut HashSet<String>,
) -> Result<String, GenerationError> {
    for _ in 0..MAX_EMAIL_ATTEMPTS {
        let candidate: String = SafeEmail(EN).fake_with_rng(ctx.rng_mut());
        if used_emails.insert(candidate.clone()) {
            return Ok(candidate);
        }
    }

    Err(GenerationError::EmailGenerationFailed {
        max_attempts: MAX_EMAIL_ATTEMPTS,
    })
}

/// Turns a curated course into a row created between three years and six
/// months ago.
pub fn generate_course(ctx: &mut GenerationContext, template: &CourseTemplate) -> CourseSeed {
    let now = ctx.now();
    let earliest = now.checked_sub_signed(years(3)).unwrap_or(now);
    let latest = now.checked_sub_signed(months(6)).unwrap_or(now);

    CourseSeed {
        course_name: template.course_name.to_owned(),
        description: template.description.to_owned(),
        creation_date: ctx.datetime_between(earliest, latest),
        is_active: template.is_active,
    }
}

/// Plans three to five sequentially ordered modules for a course.
pub fn plan_modules(ctx: &mut GenerationContext, course_id: i32) -> Vec<ModuleSeed> {
    let count = ctx.count_in(MIN_MODULES..=MAX_MODULES);
    orders(count)
        .map(|module_order| ModuleSeed {
            course_id,
            module_name: format!("Module {module_order}"),
            module_order,
        })
        .collect()
}

/// Plans three to eight lessons for a module, each with a uniformly random
/// topic drawn from `topic_ids`.
///
/// # Errors
///
/// Returns [`GenerationError::NoTopics`] when `topic_ids` is empty.
pub fn plan_lessons(
    ctx: &mut GenerationContext,
    module_id: i32,
    topic_ids: &[i32],
) -> Result<Vec<LessonSeed>, GenerationError> {
    if topic_ids.is_empty() {
        return Err(GenerationError::NoTopics);
    }

    let count = ctx.count_in(MIN_LESSONS..=MAX_LESSONS);
    orders(count)
        .map(|lesson_order| {
            let topic_id = *ctx.choose(topic_ids).ok_or(GenerationError::NoTopics)?;
            Ok(LessonSeed {
                module_id,
                lesson_name: format!("Lesson {lesson_order}"),
                lesson_order,
                topic_id,
            })
        })
        .collect()
}

/// Plans three to ten learning elements for a lesson.
///
/// # Errors
///
/// Returns [`GenerationError::NoElementTypes`] when `element_type_ids` is
/// empty.
pub fn plan_elements(
    ctx: &mut GenerationContext,
    lesson_id: i32,
    element_type_ids: &[i32],
) -> Result<Vec<LearningElementSeed>, GenerationError> {
    if element_type_ids.is_empty() {
        return Err(GenerationError::NoElementTypes);
    }

    let count = ctx.count_in(MIN_ELEMENTS..=MAX_ELEMENTS);
    orders(count)
        .map(|element_order| {
            let element_type_id = *ctx
                .choose(element_type_ids)
                .ok_or(GenerationError::NoElementTypes)?;
            let difficulty_level = ctx.difficulty();
            let is_required = ctx.coin_flip();
            let content_url = content_url(ctx);
            Ok(LearningElementSeed {
                lesson_id,
                element_type_id,
                difficulty_level,
                element_order,
                title: format!("Element {element_order}"),
                is_required,
                content_url,
            })
        })
        .collect()
}

fn content_url(ctx: &mut GenerationContext) -> String {
    let words: Vec<String> = Words(EN, 1..4).fake_with_rng(ctx.rng_mut());
    format!("{CONTENT_URL_PREFIX}{}", words.join("/"))
}

/// Plans one to three registrations over distinct courses for a student.
///
/// Registrations fall within the last year; about 30% are completed with a
/// completion date between registration and now.
pub fn plan_registrations(
    ctx: &mut GenerationContext,
    student_id: i32,
    course_ids: &[i32],
) -> Vec<RegistrationSeed> {
    if course_ids.is_empty() {
        return Vec::new();
    }

    let count = ctx.count_in(1..=MAX_COURSES_PER_STUDENT.min(course_ids.len()));
    let selected = ctx.sample(course_ids, count);

    selected
        .into_iter()
        .map(|course_id| {
            let registration_date = ctx.datetime_within(years(1));
            let completion_date = ctx
                .chance(COMPLETION_NUMERATOR, COMPLETION_DENOMINATOR)
                .then(|| ctx.datetime_until_now(registration_date));
            RegistrationSeed {
                student_id,
                course_id,
                registration_date,
                completion_date,
                is_active: completion_date.is_none(),
            }
        })
        .collect()
}

/// Plans completed progress facts for a registration.
///
/// Between half and all of the course's elements (at least one) are sampled
/// without replacement. Each fact starts no earlier than the registration,
/// ends no earlier than it starts, and carries a score only for test
/// elements. A course without elements yields no facts.
pub fn plan_progress(
    ctx: &mut GenerationContext,
    registration: &EnrolledRegistration,
    course_elements: &[CourseElement],
) -> Vec<ProgressFactSeed> {
    let total = course_elements.len();
    if total == 0 {
        return Vec::new();
    }

    let count = ctx.count_in(minimum_completed(total)..=total);
    ctx.sample(course_elements, count)
        .into_iter()
        .map(|element| {
            let start_time = ctx.datetime_until_now(registration.registration_date);
            let end_time = ctx.datetime_until_now(start_time);
            let score = (element.element_type_name == TEST_ELEMENT_TYPE).then(|| ctx.score());
            ProgressFactSeed {
                student_id: registration.student_id,
                course_id: registration.course_id,
                module_id: element.module_id,
                lesson_id: element.lesson_id,
                element_id: element.element_id,
                start_time,
                end_time,
                duration_seconds: end_time.signed_duration_since(start_time).num_seconds(),
                score,
                is_completed: true,
                is_required: ctx.coin_flip(),
            }
        })
        .collect()
}

#[expect(
    clippy::integer_division,
    reason = "half of the element count, rounded down"
)]
fn minimum_completed(total: usize) -> usize {
    (total / 2).max(1)
}

fn orders(count: usize) -> impl Iterator<Item = i32> {
    1..=i32::try_from(count).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{NaiveDate, NaiveDateTime};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::catalogue::COURSES;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .expect("valid fixture timestamp")
    }

    #[fixture]
    fn ctx() -> GenerationContext {
        GenerationContext::new(2026, now())
    }

    fn course_elements(count: i32) -> Vec<CourseElement> {
        let types = ["video", "test"];
        (1..=count)
            .zip(types.iter().cycle())
            .zip((1..=5).cycle())
            .map(|((id, type_name), difficulty_level)| CourseElement {
                element_id: id,
                lesson_id: 100 + difficulty_level,
                module_id: 10,
                difficulty_level,
                element_type_name: (*type_name).to_owned(),
            })
            .collect()
    }

    #[rstest]
    fn students_have_unique_emails(mut ctx: GenerationContext) {
        let students = generate_students(&mut ctx, 100).expect("generated");
        let emails: HashSet<_> = students.iter().map(|s| s.email.as_str()).collect();
        assert_eq!(students.len(), 100);
        assert_eq!(emails.len(), 100);
    }

    #[rstest]
    fn students_log_in_after_registering(mut ctx: GenerationContext) {
        let students = generate_students(&mut ctx, 50).expect("generated");
        for student in &students {
            assert!(student.last_login >= student.registration_date);
            assert!(student.last_login <= now());
            assert!(student.registration_date >= now() - years(2));
        }
    }

    #[test]
    fn student_generation_is_deterministic() {
        let mut first = GenerationContext::new(11, now());
        let mut second = GenerationContext::new(11, now());
        assert_eq!(
            generate_students(&mut first, 10).expect("generated"),
            generate_students(&mut second, 10).expect("generated")
        );
    }

    #[rstest]
    fn courses_are_created_between_three_years_and_six_months_ago(mut ctx: GenerationContext) {
        for template in &COURSES {
            let course = generate_course(&mut ctx, template);
            assert_eq!(course.course_name, template.course_name);
            assert_eq!(course.is_active, template.is_active);
            assert!(course.creation_date >= now() - years(3));
            assert!(course.creation_date <= now() - months(6));
        }
    }

    #[rstest]
    fn modules_are_sequential(mut ctx: GenerationContext) {
        for _ in 0..50 {
            let modules = plan_modules(&mut ctx, 7);
            assert!((MIN_MODULES..=MAX_MODULES).contains(&modules.len()));
            for (index, module) in modules.iter().enumerate() {
                assert_eq!(usize::try_from(module.module_order).ok(), Some(index + 1));
                assert_eq!(module.course_id, 7);
                assert_eq!(module.module_name, format!("Module {}", index + 1));
            }
        }
    }

    #[rstest]
    fn lessons_reference_known_topics(mut ctx: GenerationContext) {
        let topics = [3, 5, 8];
        for _ in 0..50 {
            let lessons = plan_lessons(&mut ctx, 4, &topics).expect("planned");
            assert!((MIN_LESSONS..=MAX_LESSONS).contains(&lessons.len()));
            assert!(lessons.iter().all(|l| topics.contains(&l.topic_id)));
            assert!(lessons.iter().all(|l| l.module_id == 4));
        }
    }

    #[rstest]
    fn lessons_require_topics(mut ctx: GenerationContext) {
        assert_eq!(plan_lessons(&mut ctx, 1, &[]), Err(GenerationError::NoTopics));
    }

    #[rstest]
    fn elements_are_well_formed(mut ctx: GenerationContext) {
        let types = [1, 2, 3, 4, 5, 6, 7];
        for _ in 0..50 {
            let elements = plan_elements(&mut ctx, 9, &types).expect("planned");
            assert!((MIN_ELEMENTS..=MAX_ELEMENTS).contains(&elements.len()));
            for (index, element) in elements.iter().enumerate() {
                assert!(types.contains(&element.element_type_id));
                assert!((1..=5).contains(&element.difficulty_level));
                assert_eq!(usize::try_from(element.element_order).ok(), Some(index + 1));
                assert!(element.content_url.starts_with(CONTENT_URL_PREFIX));
                assert!(element.content_url.len() > CONTENT_URL_PREFIX.len());
            }
        }
    }

    #[rstest]
    fn elements_require_types(mut ctx: GenerationContext) {
        assert_eq!(
            plan_elements(&mut ctx, 1, &[]),
            Err(GenerationError::NoElementTypes)
        );
    }

    #[rstest]
    fn registrations_pick_distinct_courses(mut ctx: GenerationContext) {
        let courses = [1, 2, 3, 4, 5, 6];
        for student_id in 0..100 {
            let registrations = plan_registrations(&mut ctx, student_id, &courses);
            assert!((1..=3).contains(&registrations.len()));
            let distinct: HashSet<_> = registrations.iter().map(|r| r.course_id).collect();
            assert_eq!(distinct.len(), registrations.len());
        }
    }

    #[rstest]
    fn registrations_respect_completion_invariants(mut ctx: GenerationContext) {
        let courses = [1, 2, 3];
        let mut completed = 0;
        for student_id in 0..200 {
            for registration in plan_registrations(&mut ctx, student_id, &courses) {
                assert!(registration.registration_date >= now() - years(1));
                assert_eq!(registration.is_active, registration.completion_date.is_none());
                if let Some(completion) = registration.completion_date {
                    completed += 1;
                    assert!(completion >= registration.registration_date);
                    assert!(completion <= now());
                }
            }
        }
        assert!(completed > 0, "expected some completed registrations");
    }

    #[rstest]
    fn registrations_are_capped_by_course_count(mut ctx: GenerationContext) {
        assert_eq!(plan_registrations(&mut ctx, 1, &[42]).len(), 1);
        assert!(plan_registrations(&mut ctx, 1, &[]).is_empty());
    }

    #[rstest]
    fn progress_respects_temporal_invariants(mut ctx: GenerationContext) {
        let registration = EnrolledRegistration {
            student_id: 3,
            course_id: 2,
            registration_date: now() - months(4),
        };
        let elements = course_elements(20);
        let facts = plan_progress(&mut ctx, &registration, &elements);

        assert!((10..=20).contains(&facts.len()));
        let distinct: HashSet<_> = facts.iter().map(|f| f.element_id).collect();
        assert_eq!(distinct.len(), facts.len());
        for fact in &facts {
            assert!(fact.start_time >= registration.registration_date);
            assert!(fact.end_time >= fact.start_time);
            assert!(fact.end_time <= now());
            assert_eq!(
                fact.duration_seconds,
                (fact.end_time - fact.start_time).num_seconds()
            );
            assert!(fact.is_completed);
            assert_eq!((fact.student_id, fact.course_id), (3, 2));
        }
    }

    #[rstest]
    fn progress_scores_only_tests(mut ctx: GenerationContext) {
        let registration = EnrolledRegistration {
            student_id: 1,
            course_id: 1,
            registration_date: now() - months(2),
        };
        let elements = course_elements(30);
        let facts = plan_progress(&mut ctx, &registration, &elements);
        for fact in &facts {
            let element = elements
                .iter()
                .find(|e| e.element_id == fact.element_id)
                .expect("fact references a course element");
            assert_eq!(fact.score.is_some(), element.element_type_name == "test");
            if let Some(score) = fact.score {
                assert!((0.0..=100.0).contains(&score));
            }
        }
    }

    #[rstest]
    fn progress_needs_at_least_one_element(mut ctx: GenerationContext) {
        let registration = EnrolledRegistration {
            student_id: 1,
            course_id: 1,
            registration_date: now(),
        };
        assert!(plan_progress(&mut ctx, &registration, &[]).is_empty());
        assert_eq!(
            plan_progress(&mut ctx, &registration, &course_elements(1)).len(),
            1
        );
    }

    #[rstest]
    #[case(1, 1)]
    #[case(2, 1)]
    #[case(3, 1)]
    #[case(9, 4)]
    #[case(10, 5)]
    fn minimum_completed_is_half_rounded_down(#[case] total: usize, #[case] expected: usize) {
        assert_eq!(minimum_completed(total), expected);
    }
}
