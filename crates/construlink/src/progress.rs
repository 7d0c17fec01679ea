//! Completion percentage of a draft.
//!
//! Every top-level field counts once. A field is filled when it is neither
//! the empty string nor null; lists and the checklist are always filled, so
//! a blank draft already sits at `4 / 22`.

use crate::draft::{Field, ReportDraft};

/// Number of top-level fields in a draft.
pub const TOTAL_FIELDS: usize = Field::ALL.len();

/// Number of fields that count as filled.
pub fn filled_fields(draft: &ReportDraft) -> usize {
    Field::ALL
        .iter()
        .filter(|field| draft.is_filled(**field))
        .count()
}

/// `filled / total * 100`, always within `[0, 100]`.
pub fn progress(draft: &ReportDraft) -> f64 {
    filled_fields(draft) as f64 / TOTAL_FIELDS as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::TextField;
    use crate::reducer::{FormAction, FormStore};
    use chrono::NaiveDate;

    fn text_fields() -> Vec<TextField> {
        Field::ALL
            .iter()
            .filter_map(|f| match f {
                Field::Text(t) => Some(*t),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn blank_draft_counts_list_and_checklist_fields() {
        let draft = ReportDraft::new();
        assert_eq!(filled_fields(&draft), 4);
        let expected = 4.0 / 22.0 * 100.0;
        assert!((progress(&draft) - expected).abs() < 1e-9);
    }

    #[test]
    fn full_draft_is_one_hundred_percent() {
        let mut store = FormStore::new();
        for field in text_fields() {
            store.dispatch(FormAction::set_text(field, "x"));
        }
        store.dispatch(FormAction::set_date(NaiveDate::from_ymd_opt(2024, 1, 2)));
        assert_eq!(filled_fields(store.state()), TOTAL_FIELDS);
        assert!((store.progress() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn progress_tracks_scalar_fields_through_any_sequence() {
        let mut store = FormStore::new();
        let fields = text_fields();
        for (i, field) in fields.iter().enumerate() {
            let value = if i % 3 == 0 { "" } else { "valor" };
            store.dispatch(FormAction::set_text(*field, value));
            let p = store.progress();
            assert!((0.0..=100.0).contains(&p));

            let filled_scalars = fields
                .iter()
                .filter(|f| !store.state().text(**f).is_empty())
                .count();
            let expected = 100.0 * (filled_scalars + 4) as f64 / 22.0;
            assert!((p - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn whitespace_counts_as_filled() {
        let mut store = FormStore::new();
        store.dispatch(FormAction::set_text(TextField::Company, " "));
        assert_eq!(filled_fields(store.state()), 5);
    }
}
