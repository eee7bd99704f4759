use super::model::{Measurement, MeasurementTable, View};

// ---------------------------------------------------------------------------
// Selection: a dropdown choice
// ---------------------------------------------------------------------------

/// Either the "all" sentinel (no constraint) or one exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn only(value: impl Into<String>) -> Self {
        Selection::Only(value.into())
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(v) => v == value,
        }
    }

    /// Text for a dropdown, with `all_label` standing in for the sentinel.
    pub fn label<'a>(&'a self, all_label: &'a str) -> &'a str {
        match self {
            Selection::All => all_label,
            Selection::Only(v) => v,
        }
    }
}

// ---------------------------------------------------------------------------
// Filter predicate
// ---------------------------------------------------------------------------

/// Predicates applied to a view. Absent constraints let every row through.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementFilter {
    pub department: Selection,
    pub category: Selection,
    /// Inclusive `(lo, hi)` bounds on `value`.
    pub value_range: Option<(f64, f64)>,
}

impl MeasurementFilter {
    /// Filter on category alone (what the map page uses).
    pub fn by_category(category: Selection) -> Self {
        MeasurementFilter {
            category,
            ..Default::default()
        }
    }

    pub fn matches(&self, m: &Measurement) -> bool {
        if !self.department.matches(&m.department) {
            return false;
        }
        if !self.category.matches(&m.category) {
            return false;
        }
        match self.value_range {
            Some((lo, hi)) => m.value >= lo && m.value <= hi,
            None => true,
        }
    }
}

/// Return indices of rows in `table` that pass `filter`.
pub fn filtered_indices(table: &MeasurementTable, filter: &MeasurementFilter) -> Vec<usize> {
    table.view().filter(filter).into_indices()
}

impl<'a> View<'a> {
    /// Narrow this view to the rows passing `filter`, keeping source order.
    pub fn filter(&self, filter: &MeasurementFilter) -> View<'a> {
        let table = self.table();
        let indices = self
            .indices()
            .iter()
            .copied()
            .filter(|&idx| table.rows.get(idx).is_some_and(|m| filter.matches(m)))
            .collect();
        View::from_owned(table, indices)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::data::stats::summarize;

    fn table() -> MeasurementTable {
        MeasurementTable::from_rows(vec![
            Measurement::new("X", "A", 1.0, 4.0, -74.0),
            Measurement::new("X", "B", 2.0, 4.1, -74.1),
            Measurement::new("Y", "A", 3.0, 5.0, -75.0),
            Measurement::new("Y", "C", 4.0, 5.1, -75.1),
        ])
    }

    #[test]
    fn test_all_filter_keeps_everything() {
        let t = table();
        assert_eq!(
            filtered_indices(&t, &MeasurementFilter::default()),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn test_category_filter_example() {
        let t = MeasurementTable::from_rows(vec![
            Measurement::new("X", "A", 1.0, 0.0, 0.0),
            Measurement::new("X", "B", 2.0, 0.0, 0.0),
        ]);
        let view = t.view().filter(&MeasurementFilter::by_category(Selection::only("A")));
        assert_eq!(view.indices(), &[0]);
        assert_eq!(summarize(&view).mean_value, Some(1.0));
    }

    #[test]
    fn test_department_filter() {
        let t = table();
        let f = MeasurementFilter {
            department: Selection::only("Y"),
            ..Default::default()
        };
        let view = t.view().filter(&f);
        assert_eq!(view.len(), 2);
        assert!(view.rows().all(|m| m.department == "Y"));
    }

    #[test]
    fn test_range_is_inclusive() {
        let t = table();
        let f = MeasurementFilter {
            value_range: Some((2.0, 3.0)),
            ..Default::default()
        };
        assert_eq!(filtered_indices(&t, &f), vec![1, 2]);
    }

    #[test]
    fn test_combined_predicates_can_be_empty() {
        let t = table();
        let f = MeasurementFilter {
            department: Selection::only("X"),
            category: Selection::only("C"),
            value_range: None,
        };
        let view = t.view().filter(&f);
        assert!(view.is_empty());
        assert_eq!(summarize(&view).mean_value, None);
    }

    #[test]
    fn test_selection_label() {
        assert_eq!(Selection::All.label("Todos"), "Todos");
        assert_eq!(Selection::only("Meta").label("Todos"), "Meta");
        assert!(Selection::All.matches("Meta"));
        assert!(!Selection::only("A").matches("B"));
    }

    fn arb_table() -> impl Strategy<Value = MeasurementTable> {
        prop::collection::vec(
            (
                prop::sample::select(vec!["Boyacá", "Meta", "Valle del Cauca"]),
                prop::sample::select(vec!["A", "B", "C"]),
                0.0f64..100.0,
            ),
            0..60,
        )
        .prop_map(|rows| {
            MeasurementTable::from_rows(
                rows.into_iter()
                    .map(|(d, c, v)| Measurement::new(d, c, v, 4.5, -74.3))
                    .collect(),
            )
        })
    }

    fn arb_selection(values: &'static [&'static str]) -> impl Strategy<Value = Selection> {
        prop_oneof![
            Just(Selection::All),
            prop::sample::select(values.to_vec()).prop_map(Selection::only),
        ]
    }

    fn arb_filter() -> impl Strategy<Value = MeasurementFilter> {
        (
            arb_selection(&["Boyacá", "Meta", "Valle del Cauca"]),
            arb_selection(&["A", "B", "C"]),
            prop::option::of((0.0f64..100.0, 0.0f64..100.0)),
        )
            .prop_map(|(department, category, range)| MeasurementFilter {
                department,
                category,
                value_range: range.map(|(a, b)| (a.min(b), a.max(b))),
            })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_filter_is_idempotent(t in arb_table(), f in arb_filter()) {
            let once = t.view().filter(&f);
            let twice = once.filter(&f);
            prop_assert_eq!(once.indices(), twice.indices());
        }

        #[test]
        fn prop_range_filter_is_exact(t in arb_table(), a in 0.0f64..100.0, b in 0.0f64..100.0) {
            let (lo, hi) = (a.min(b), a.max(b));
            let f = MeasurementFilter { value_range: Some((lo, hi)), ..Default::default() };
            let got = filtered_indices(&t, &f);
            let expected: Vec<usize> = t.rows.iter().enumerate()
                .filter(|(_, m)| m.value >= lo && m.value <= hi)
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(got, expected);
        }

        #[test]
        fn prop_filter_never_mutates_source(t in arb_table(), f in arb_filter()) {
            let before = t.rows.clone();
            let _ = t.view().filter(&f);
            prop_assert_eq!(before, t.rows);
        }
    }
}
