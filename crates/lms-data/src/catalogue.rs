//! Curated reference data seeded without randomness.

use serde::Serialize;

/// Name of the element type whose progress facts carry a score.
pub const TEST_ELEMENT_TYPE: &str = "test";

/// Default number of synthetic students per run.
pub const DEFAULT_STUDENT_COUNT: usize = 100;

/// A learning element type row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ElementTypeSeed {
    /// Unique type name.
    pub type_name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
}

/// A named topic with its description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TopicSeed {
    /// Topic name, unique within its parent.
    pub topic_name: &'static str,
    /// Human-readable description.
    pub description: &'static str,
}

/// A curated course definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CourseTemplate {
    /// Course title.
    pub course_name: &'static str,
    /// Course description.
    pub description: &'static str,
    /// Whether the course is open for enrolment.
    pub is_active: bool,
}

/// The seven element types, in insertion order.
pub const ELEMENT_TYPES: [ElementTypeSeed; 7] = [
    ElementTypeSeed {
        type_name: "text",
        description: "Text learning material",
    },
    ElementTypeSeed {
        type_name: "image",
        description: "Image",
    },
    ElementTypeSeed {
        type_name: "animation",
        description: "Animation",
    },
    ElementTypeSeed {
        type_name: "video",
        description: "Video",
    },
    ElementTypeSeed {
        type_name: "audio",
        description: "Audio",
    },
    ElementTypeSeed {
        type_name: TEST_ELEMENT_TYPE,
        description: "Test with closed questions",
    },
    ElementTypeSeed {
        type_name: "open_form",
        description: "Open answer form",
    },
];

/// The canonical top-level topic that owns the subtopics below.
pub const HADOOP_TOPIC: TopicSeed = TopicSeed {
    topic_name: "Hadoop",
    description: "Everything about the Hadoop ecosystem",
};

/// Subtopics created under [`HADOOP_TOPIC`].
pub const HADOOP_SUBTOPICS: [TopicSeed; 5] = [
    TopicSeed {
        topic_name: "HDFS",
        description: "Hadoop Distributed File System",
    },
    TopicSeed {
        topic_name: "MapReduce",
        description: "MapReduce programming model",
    },
    TopicSeed {
        topic_name: "YARN",
        description: "Yet Another Resource Negotiator",
    },
    TopicSeed {
        topic_name: "HBase",
        description: "Distributed NoSQL database",
    },
    TopicSeed {
        topic_name: "Hive",
        description: "Data warehouse infrastructure",
    },
];

/// Other top-level topics.
pub const OTHER_TOPICS: [TopicSeed; 5] = [
    TopicSeed {
        topic_name: "Python",
        description: "Python programming language",
    },
    TopicSeed {
        topic_name: "SQL",
        description: "Structured Query Language",
    },
    TopicSeed {
        topic_name: "Machine Learning",
        description: "Machine learning algorithms",
    },
    TopicSeed {
        topic_name: "Data Science",
        description: "Data science techniques",
    },
    TopicSeed {
        topic_name: "Big Data",
        description: "Big data technologies",
    },
];

/// The six curated courses, in insertion order.
pub const COURSES: [CourseTemplate; 6] = [
    CourseTemplate {
        course_name: "Hadoop Fundamentals",
        description: "Getting started with Hadoop",
        is_active: true,
    },
    CourseTemplate {
        course_name: "Advanced Hadoop",
        description: "Advanced Hadoop techniques",
        is_active: true,
    },
    CourseTemplate {
        course_name: "Big Data Analytics",
        description: "Analysing big data",
        is_active: true,
    },
    CourseTemplate {
        course_name: "Data Science with Python",
        description: "Data science in Python",
        is_active: true,
    },
    CourseTemplate {
        course_name: "SQL for Data Analysis",
        description: "SQL for data analysis",
        is_active: true,
    },
    CourseTemplate {
        course_name: "Machine Learning Basics",
        description: "Machine learning fundamentals",
        is_active: false,
    },
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn element_type_names_are_unique() {
        let names: HashSet<_> = ELEMENT_TYPES.iter().map(|t| t.type_name).collect();
        assert_eq!(names.len(), ELEMENT_TYPES.len());
        assert!(names.contains(TEST_ELEMENT_TYPE));
        assert!(names.contains("video"));
    }

    #[test]
    fn top_level_topic_names_are_unique() {
        let names: HashSet<_> = OTHER_TOPICS
            .iter()
            .chain(std::iter::once(&HADOOP_TOPIC))
            .map(|t| t.topic_name)
            .collect();
        assert_eq!(names.len(), OTHER_TOPICS.len() + 1);
    }

    #[test]
    fn only_machine_learning_basics_is_inactive() {
        let inactive: Vec<_> = COURSES
            .iter()
            .filter(|c| !c.is_active)
            .map(|c| c.course_name)
            .collect();
        assert_eq!(inactive, ["Machine Learning Basics"]);
    }
}
