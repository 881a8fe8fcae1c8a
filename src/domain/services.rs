use crate::domain::model::{
    CodeMap, CodedRow, Course, DependentCourse, EnrichedCourse, EnrichmentSummary,
    PrerequisiteTable, RelatedCourse, SheetRow,
};
use std::collections::{HashMap, HashSet};

/// Physical rows per course group in a roster sheet: name, type,
/// description.
pub const ROWS_PER_COURSE: usize = 3;

/// Default cap on related-course summaries per course.
pub const DEFAULT_RELATED_LIMIT: usize = 3;

/// Derives `prerequisites`, `relatedCourses` and `prerequisiteFor` for
/// every course. Output has the same length and order as the input and
/// the operation never fails: unknown names, absent codes and malformed
/// codes all degrade to empty fields.
///
/// When several courses share a name, lookups resolve to the last one.
pub fn enrich(
    courses: &[Course],
    table: &PrerequisiteTable,
    related_limit: usize,
) -> Vec<EnrichedCourse> {
    let by_name: HashMap<&str, &Course> = courses
        .iter()
        .map(|course| (course.name.as_str(), course))
        .collect();

    courses
        .iter()
        .map(|course| EnrichedCourse {
            course: course.clone(),
            prerequisites: table.get(&course.name).to_vec(),
            related_courses: related_courses(course, courses, related_limit),
            prerequisite_for: dependents(course, table, &by_name),
        })
        .collect()
}

fn related_courses(course: &Course, courses: &[Course], limit: usize) -> Vec<RelatedCourse> {
    let code = match course.parsed_code() {
        Some(code) => code,
        None => return Vec::new(),
    };

    courses
        .iter()
        .filter(|other| other.id != course.id)
        .filter_map(|other| {
            let other_code = other.parsed_code()?;
            if !code.same_family(&other_code) {
                return None;
            }
            Some(RelatedCourse {
                id: other.id.clone(),
                name: other.name.clone(),
                code: other.course_code.clone().unwrap_or_default(),
                level: other.level.clone(),
            })
        })
        .take(limit)
        .collect()
}

fn dependents(
    course: &Course,
    table: &PrerequisiteTable,
    by_name: &HashMap<&str, &Course>,
) -> Vec<DependentCourse> {
    table
        .iter()
        .filter(|(_, requires)| requires.iter().any(|name| name == &course.name))
        .filter_map(|(dependent_name, _)| by_name.get(dependent_name).copied())
        .map(|dependent| DependentCourse {
            id: dependent.id.clone(),
            name: dependent.name.clone(),
            code: dependent.course_code.clone().unwrap_or_default(),
        })
        .collect()
}

pub fn summarize(courses: &[EnrichedCourse]) -> EnrichmentSummary {
    EnrichmentSummary {
        total_courses: courses.len(),
        with_prerequisites: courses
            .iter()
            .filter(|c| !c.prerequisites.is_empty())
            .count(),
        acting_as_prerequisite: courses
            .iter()
            .filter(|c| !c.prerequisite_for.is_empty())
            .count(),
        with_related: courses
            .iter()
            .filter(|c| !c.related_courses.is_empty())
            .count(),
    }
}

/// Reshapes a flat roster into one row per course. Rows come in fixed
/// groups of three (name, type, description); an incomplete trailing
/// group is dropped. The code column comes from the map, empty string
/// on a miss.
pub fn assign_codes(rows: &[SheetRow], codes: &CodeMap) -> Vec<CodedRow> {
    rows.chunks_exact(ROWS_PER_COURSE)
        .map(|group| {
            let name = group[0].value.clone();
            let course_type = group[1].value.clone();
            let code = codes
                .lookup(&name, &course_type)
                .unwrap_or_default()
                .to_string();
            CodedRow {
                code,
                name,
                course_type,
                description: group[2].value.clone(),
            }
        })
        .collect()
}

/// Names carried by more than one course, in first-seen order.
pub fn find_duplicate_names(courses: &[Course]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for course in courses {
        if !seen.insert(course.name.as_str()) && !duplicates.contains(&course.name) {
            duplicates.push(course.name.clone());
        }
    }
    duplicates
}
