//! "My data" card of the signed-in user.

use crate::access::{Capability, Session};
use crate::model::column::Column;

const NOT_AVAILABLE: &str = "N/A";

const IDENTITY_FIELDS: [Column; 8] = [
    Column::Id,
    Column::Name,
    Column::Email,
    Column::Age,
    Column::Role,
    Column::Course,
    Column::ClassId,
    Column::EnrollmentStatus,
];

const GRADE_FIELDS: [Column; 4] = [
    Column::Score1,
    Column::Score2,
    Column::ProjectScore,
    Column::Average,
];

/// Labelled field values of the session user.
///
/// Grade fields are included only for roles that may see their own grades.
/// A blank enrollment status renders as `N/A`.
pub fn profile_card(session: &Session) -> Vec<(Column, String)> {
    let user = session.user();
    let mut fields: Vec<Column> = IDENTITY_FIELDS.to_vec();
    if session.can(Capability::ViewOwnGrades) {
        fields.extend(GRADE_FIELDS);
    }

    fields
        .into_iter()
        .map(|column| {
            let text = user.cell_text(column);
            let text = if column == Column::EnrollmentStatus && text.trim().is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                text
            };
            (column, text)
        })
        .collect()
}
