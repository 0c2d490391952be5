//! Per-class aggregates and class listings.
//!
//! # Invariants
//! - Only STUDENT rows contribute to summaries and student class listings.
//! - Blank class ids never form a class.
//! - The `GERAL` sentinel is summarized but never listed as a class.

use crate::model::record::{round2, Role};
use crate::model::table::RosterTable;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Class id used for rows not attached to a real class.
pub const GENERAL_CLASS: &str = "GERAL";

/// Aggregate of one class's student rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    pub class_id: String,
    /// Course of the first student row seen for the class.
    pub course: String,
    pub students: usize,
    /// Mean of the students' averages, rounded to two decimals.
    pub mean_average: f64,
}

/// Builds one summary per class of student rows, sorted by class id.
/// Students with a blank class id are left out.
///
/// `course` keeps only classes whose first-seen course equals the
/// upper-cased filter.
pub fn class_summaries(table: &RosterTable, course: Option<&str>) -> Vec<ClassSummary> {
    let mut groups: BTreeMap<String, (String, usize, f64)> = BTreeMap::new();
    let students = table
        .records()
        .iter()
        .filter(|r| r.role == Role::Student && !r.class_id.trim().is_empty());
    for record in students {
        let entry = groups
            .entry(record.class_id.clone())
            .or_insert_with(|| (record.course.clone(), 0, 0.0));
        entry.1 += 1;
        entry.2 += record.average;
    }

    let wanted = course.map(|value| value.trim().to_uppercase());
    groups
        .into_iter()
        .map(|(class_id, (course, students, total))| ClassSummary {
            class_id,
            course,
            students,
            mean_average: round2(total / students as f64),
        })
        .filter(|summary| {
            wanted
                .as_deref()
                .map_or(true, |value| summary.course == value)
        })
        .collect()
}

/// Distinct, sorted class ids of student rows.
pub fn student_classes(table: &RosterTable) -> Vec<String> {
    table
        .records()
        .iter()
        .filter(|record| record.role == Role::Student)
        .map(|record| record.class_id.trim().to_string())
        .filter(|class_id| is_real_class(class_id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct, sorted, upper-cased class ids of every row, placeholders
/// included.
pub fn known_classes(table: &RosterTable) -> Vec<String> {
    table
        .records()
        .iter()
        .map(|record| record.class_id.trim().to_uppercase())
        .filter(|class_id| is_real_class(class_id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn is_real_class(class_id: &str) -> bool {
    !class_id.is_empty() && !class_id.eq_ignore_ascii_case(GENERAL_CLASS)
}

#[cfg(test)]
mod tests {
    use super::{class_summaries, known_classes, student_classes};
    use crate::model::column::Column;
    use crate::model::record::{Record, Role};
    use crate::model::table::RosterTable;

    fn row(id: i64, role: Role, class_id: &str, course: &str, average: f64) -> Record {
        let mut record = Record::blank(id);
        record.role = role;
        record.class_id = class_id.to_string();
        record.course = course.to_string();
        record.average = average;
        record
    }

    fn roster() -> RosterTable {
        RosterTable::new(
            Column::ALL.to_vec(),
            vec![
                row(1, Role::Student, "T2", "ADS", 8.0),
                row(2, Role::Student, "T1", "ADS", 7.0),
                row(3, Role::Student, "T1", "GTI", 6.5),
                row(4, Role::Teacher, "T3", "ADS", 0.0),
                row(5, Role::Student, "GERAL", "ADS", 5.0),
                row(6, Role::Placeholder, "t4", "N/A", 0.0),
                row(7, Role::Student, "", "ADS", 9.0),
            ],
        )
    }

    #[test]
    fn summaries_group_students_by_class() {
        let summaries = class_summaries(&roster(), None);
        let classes: Vec<_> = summaries.iter().map(|s| s.class_id.as_str()).collect();
        assert_eq!(classes, ["GERAL", "T1", "T2"]);

        let t1 = &summaries[1];
        assert_eq!(t1.students, 2);
        assert_eq!(t1.course, "ADS");
        assert_eq!(t1.mean_average, 6.75);
    }

    #[test]
    fn summaries_filter_by_course() {
        let summaries = class_summaries(&roster(), Some("gti"));
        assert!(summaries.is_empty());

        let summaries = class_summaries(&roster(), Some("ads"));
        assert_eq!(summaries.len(), 3);
    }

    #[test]
    fn summary_serializes_with_field_names() {
        let summaries = class_summaries(&roster(), None);
        let json = serde_json::to_value(&summaries[2]).expect("serialize summary");
        assert_eq!(json["class_id"], "T2");
        assert_eq!(json["students"], 1);
    }

    #[test]
    fn class_listings_skip_blank_and_general() {
        assert_eq!(student_classes(&roster()), ["T1", "T2"]);
        assert_eq!(known_classes(&roster()), ["T1", "T2", "T3", "T4"]);
    }
}
