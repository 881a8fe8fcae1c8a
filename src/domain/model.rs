use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Course identifier as it appears in the source JSON. Catalogs in the
/// wild carry both numeric and string ids; equality never crosses the
/// two representations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CourseId {
    Number(i64),
    Text(String),
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CourseId::Number(n) => write!(f, "{}", n),
            CourseId::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    #[serde(rename = "type")]
    pub course_type: String,
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_code: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Course {
    pub fn parsed_code(&self) -> Option<CourseCode> {
        self.course_code.as_deref().and_then(CourseCode::parse)
    }
}

/// Course record plus the three derived fields, serialized after the
/// original keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedCourse {
    #[serde(flatten)]
    pub course: Course,
    pub prerequisites: Vec<String>,
    pub related_courses: Vec<RelatedCourse>,
    pub prerequisite_for: Vec<DependentCourse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedCourse {
    pub id: CourseId,
    pub name: String,
    pub code: String,
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependentCourse {
    pub id: CourseId,
    pub name: String,
    pub code: String,
}

/// Parsed `"<SUBJECT> <digits>"` course code. The digits token needs at
/// least three characters: the first carries the level, the next two the
/// family. Anything else does not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseCode {
    pub subject: String,
    pub level: char,
    pub family: String,
}

impl CourseCode {
    pub fn parse(raw: &str) -> Option<Self> {
        let mut tokens = raw.split_whitespace();
        let (subject, digits) = match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(subject), Some(digits), None) => (subject, digits),
            _ => return None,
        };

        let digit_chars: Vec<char> = digits.chars().collect();
        if digit_chars.len() < 3 {
            return None;
        }

        Some(CourseCode {
            subject: subject.to_string(),
            level: digit_chars[0],
            family: digit_chars[1..3].iter().collect(),
        })
    }

    pub fn same_family(&self, other: &CourseCode) -> bool {
        self.subject == other.subject && self.family == other.family
    }
}

/// Hand-authored mapping from course name to the ordered names of its
/// prerequisites. Iteration is sorted by course name so derived output
/// stays deterministic run to run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrerequisiteTable(BTreeMap<String, Vec<String>>);

impl PrerequisiteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, course: impl Into<String>, requires: Vec<String>) {
        self.0.insert(course.into(), requires);
    }

    pub fn get(&self, course_name: &str) -> &[String] {
        self.0.get(course_name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(name, requires)| (name.as_str(), requires.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Lookup from `"name|type"` to course code, built from a course array.
/// Courses without a code contribute nothing; a later duplicate key
/// overwrites an earlier one.
#[derive(Debug, Clone, Default)]
pub struct CodeMap {
    codes: HashMap<String, String>,
}

impl CodeMap {
    pub fn from_courses(courses: &[Course]) -> Self {
        let mut codes = HashMap::new();
        for course in courses {
            if let Some(code) = &course.course_code {
                codes.insert(Self::key(&course.name, &course.course_type), code.clone());
            }
        }
        Self { codes }
    }

    pub fn lookup(&self, name: &str, course_type: &str) -> Option<&str> {
        self.codes
            .get(&Self::key(name, course_type))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    fn key(name: &str, course_type: &str) -> String {
        format!("{}|{}", name, course_type)
    }
}

/// First cell of one physical roster row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetRow {
    pub value: String,
}

impl SheetRow {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodedRow {
    #[serde(rename = "Course Code")]
    pub code: String,
    #[serde(rename = "Course Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub course_type: String,
    #[serde(rename = "Description")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichmentSummary {
    pub total_courses: usize,
    pub with_prerequisites: usize,
    pub acting_as_prerequisite: usize,
    pub with_related: usize,
}

#[derive(Debug, Clone)]
pub struct EnrichmentResult {
    pub courses: Vec<EnrichedCourse>,
    pub summary: EnrichmentSummary,
}

#[derive(Debug, Clone)]
pub struct CodedSheet {
    pub rows: Vec<CodedRow>,
    pub discarded_rows: usize,
}
