use crate::models::{Activity, Column};

pub const NOT_APPLICABLE: &str = "N/A";

pub fn is_not_applicable(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case(NOT_APPLICABLE)
}

/// Replaces every "not applicable" cell with an empty value.
pub fn normalize_row(activity: &mut Activity) {
    for column in Column::ALL {
        let cell = activity.field_mut(column);
        if is_not_applicable(cell) {
            cell.clear();
        }
    }
}

pub fn normalize_rows(rows: &mut [Activity]) {
    rows.iter_mut().for_each(normalize_row);
}

/// Display-time coalescing of empty optional cells.
pub fn display_cell(column: Column, value: &str) -> String {
    if value.is_empty() && column.shows_placeholder() {
        NOT_APPLICABLE.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> Vec<Activity> {
        vec![
            Activity {
                code: "1012002".into(),
                third_party: "N/A".into(),
                notes: " n/a ".into(),
                approval_timing: "Pre".into(),
                ..Activity::default()
            },
            Activity {
                code: "6012001".into(),
                name: "N/A Logistics".into(),
                flag: "No".into(),
                ..Activity::default()
            },
        ]
    }

    #[test]
    fn clears_sentinel_in_any_casing() {
        let mut rows = raw();
        normalize_rows(&mut rows);
        assert_eq!(rows[0].third_party, "");
        assert_eq!(rows[0].notes, "");
        assert_eq!(rows[0].approval_timing, "Pre");
        assert_eq!(rows[1].name, "N/A Logistics");
    }

    #[test]
    fn normalization_is_idempotent() {
        let mut once = raw();
        normalize_rows(&mut once);
        let mut twice = once.clone();
        normalize_rows(&mut twice);
        assert_eq!(once, twice);
    }

    #[test]
    fn placeholder_only_for_optional_columns() {
        assert_eq!(display_cell(Column::Notes, ""), "N/A");
        assert_eq!(display_cell(Column::Category, ""), "");
        assert_eq!(display_cell(Column::Notes, "Seasonal"), "Seasonal");
    }
}
