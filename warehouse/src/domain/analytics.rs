//! Canned analytical queries over the star schema.
//!
//! The SQL is fixed; this module only selects, runs and renders it.

use serde_json::Value;

use crate::domain::ports::{AnalyticsQueryRunner, QueryOutcome};

const MAX_HADOOP_VIDEO_DURATION_SQL: &str = "\
SELECT
    EXTRACT(YEAR FROM dcr.registration_date)::int AS reg_year,
    EXTRACT(MONTH FROM dcr.registration_date)::int AS reg_month,
    dl.lesson_id,
    MAX(fsp.duration_seconds) AS max_duration
FROM fact_student_progress fsp
JOIN dim_learning_elements dle ON fsp.element_id = dle.element_id
JOIN dim_lessons dl ON fsp.lesson_id = dl.lesson_id
JOIN dim_topics dt ON dl.topic_id = dt.topic_id
JOIN dim_course_registrations dcr
    ON fsp.student_id = dcr.student_id AND fsp.course_id = dcr.course_id
WHERE
    fsp.is_completed
    AND dle.difficulty_level > 3
    AND dle.element_type_id = (
        SELECT type_id FROM dim_element_types WHERE type_name = 'video'
    )
    AND LOWER(dt.topic_name) LIKE '%hadoop%'
GROUP BY reg_year, reg_month, dl.lesson_id
ORDER BY reg_year, reg_month, dl.lesson_id";

const POPULAR_TOPICS_LAST_YEAR_SQL: &str = "\
WITH student_topic_counts AS (
    SELECT
        dl.topic_id,
        COUNT(DISTINCT fsp.student_id) AS student_count
    FROM fact_student_progress fsp
    JOIN dim_lessons dl ON fsp.lesson_id = dl.lesson_id
    JOIN dim_course_registrations dcr
        ON fsp.student_id = dcr.student_id AND fsp.course_id = dcr.course_id
    WHERE EXTRACT(YEAR FROM dcr.registration_date) = EXTRACT(YEAR FROM CURRENT_DATE) - 1
    GROUP BY dl.topic_id
),
max_count AS (
    SELECT MAX(student_count) AS max_student_count FROM student_topic_counts
)
SELECT dt.topic_id, dt.topic_name
FROM student_topic_counts stc
JOIN max_count mc ON stc.student_count = mc.max_student_count
JOIN dim_topics dt ON stc.topic_id = dt.topic_id
ORDER BY dt.topic_id";

/// The fixed analytical queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CannedQuery {
    /// Longest completed difficult Hadoop video per lesson, grouped by
    /// registration year and month.
    MaxHadoopVideoDuration,
    /// Topic(s) reached by the most distinct students among last year's
    /// registrations; ties yield several rows.
    PopularTopicsLastYear,
}

impl CannedQuery {
    /// Every canned query, in report order.
    pub const ALL: [Self; 2] = [Self::MaxHadoopVideoDuration, Self::PopularTopicsLastYear];

    /// SQL text of the query.
    #[must_use]
    pub const fn sql(self) -> &'static str {
        match self {
            Self::MaxHadoopVideoDuration => MAX_HADOOP_VIDEO_DURATION_SQL,
            Self::PopularTopicsLastYear => POPULAR_TOPICS_LAST_YEAR_SQL,
        }
    }

    /// Human-readable heading printed above the results.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::MaxHadoopVideoDuration => {
                "Query A: maximum time on Hadoop lessons by registration month"
            }
            Self::PopularTopicsLastYear => "Query B: most popular topics among last year's students",
        }
    }
}

/// Runs canned queries through an [`AnalyticsQueryRunner`].
#[derive(Debug, Clone)]
pub struct AnalyticsService<R> {
    runner: R,
}

impl<R> AnalyticsService<R>
where
    R: AnalyticsQueryRunner,
{
    /// Create a service over `runner`.
    pub const fn new(runner: R) -> Self {
        Self { runner }
    }

    /// Execute one canned query.
    pub fn run(&self, query: CannedQuery) -> QueryOutcome {
        self.runner.execute(query.sql(), &[])
    }

    /// Execute every canned query in order.
    pub fn run_all(&self) -> Vec<(CannedQuery, QueryOutcome)> {
        CannedQuery::ALL
            .into_iter()
            .map(|query| (query, self.run(query)))
            .collect()
    }
}

/// Render an outcome as text: a tab-separated header line followed by one
/// line per row, or the status/error message for non-row outcomes.
#[must_use]
pub fn render_outcome(outcome: &QueryOutcome) -> String {
    match outcome {
        QueryOutcome::Rows(row_set) => {
            let header = row_set.columns.join("\t");
            std::iter::once(header)
                .chain(row_set.rows.iter().map(|row| {
                    row.iter().map(render_value).collect::<Vec<_>>().join("\t")
                }))
                .collect::<Vec<_>>()
                .join("\n")
        }
        QueryOutcome::Status(message) | QueryOutcome::Failed(message) => message.clone(),
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_owned(),
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;
    use crate::domain::ports::{MockAnalyticsQueryRunner, RowSet};

    #[rstest]
    fn query_a_filters_difficult_hadoop_videos() {
        let sql = CannedQuery::MaxHadoopVideoDuration.sql();
        assert!(sql.contains("dle.difficulty_level > 3"));
        assert!(sql.contains("type_name = 'video'"));
        assert!(sql.contains("LOWER(dt.topic_name) LIKE '%hadoop%'"));
        assert!(sql.contains("ORDER BY reg_year, reg_month"));
    }

    #[rstest]
    fn query_b_keeps_ties() {
        let sql = CannedQuery::PopularTopicsLastYear.sql();
        assert!(sql.contains("stc.student_count = mc.max_student_count"));
        assert!(sql.contains("EXTRACT(YEAR FROM CURRENT_DATE) - 1"));
    }

    #[rstest]
    fn service_runs_queries_without_parameters() {
        let mut runner = MockAnalyticsQueryRunner::new();
        runner
            .expect_execute()
            .withf(|sql, params| sql.contains("max_duration") && params.is_empty())
            .times(1)
            .returning(|_, _| QueryOutcome::affected(0));
        let service = AnalyticsService::new(runner);

        assert_eq!(
            service.run(CannedQuery::MaxHadoopVideoDuration),
            QueryOutcome::affected(0)
        );
    }

    #[rstest]
    fn run_all_preserves_order() {
        let mut runner = MockAnalyticsQueryRunner::new();
        runner
            .expect_execute()
            .times(2)
            .returning(|_, _| QueryOutcome::failed("connection refused"));
        let service = AnalyticsService::new(runner);

        let queries: Vec<_> = service.run_all().into_iter().map(|(q, _)| q).collect();
        assert_eq!(queries, CannedQuery::ALL.to_vec());
    }

    #[rstest]
    fn rows_render_tab_separated() {
        let outcome = QueryOutcome::Rows(RowSet {
            columns: vec!["topic_id".to_owned(), "topic_name".to_owned()],
            rows: vec![
                vec![json!(1), json!("Hadoop")],
                vec![json!(7), Value::Null],
            ],
        });
        assert_eq!(
            render_outcome(&outcome),
            "topic_id\ttopic_name\n1\tHadoop\n7\tNULL"
        );
    }

    #[rstest]
    #[case(QueryOutcome::affected(2), "Query executed successfully. Rows affected: 2")]
    #[case(QueryOutcome::failed("boom"), "Error: boom")]
    fn messages_render_verbatim(#[case] outcome: QueryOutcome, #[case] expected: &str) {
        assert_eq!(render_outcome(&outcome), expected);
    }
}
