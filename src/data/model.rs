use std::borrow::Cow;
use std::collections::BTreeSet;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// Column names of the source table
// ---------------------------------------------------------------------------

pub const COL_DEPARTMENT: &str = "Departamento";
pub const COL_CATEGORY: &str = "Categoría";
pub const COL_VALUE: &str = "Valor";
pub const COL_LATITUDE: &str = "Latitud";
pub const COL_LONGITUDE: &str = "Longitud";

/// Header spelling accepted in place of [`COL_CATEGORY`].
pub const COL_CATEGORY_ALIAS: &str = "Categoria";

pub const COLUMNS: [&str; 5] = [
    COL_DEPARTMENT,
    COL_CATEGORY,
    COL_VALUE,
    COL_LATITUDE,
    COL_LONGITUDE,
];

// ---------------------------------------------------------------------------
// Measurement – one row of the table
// ---------------------------------------------------------------------------

/// A single air-quality measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub department: String,
    pub category: String,
    pub value: f64,
    pub latitude: f64,
    pub longitude: f64,
}

/// One CSV/JSON row as read from disk.
///
/// Empty cells and JSON `null`s deserialize to `None`; they become NaN on
/// conversion so [`MeasurementTable::from_rows`] drops and counts the row.
#[derive(Debug, Deserialize)]
pub struct MeasurementRecord {
    #[serde(rename = "Departamento")]
    pub department: String,
    #[serde(rename = "Categoría", alias = "Categoria")]
    pub category: String,
    #[serde(rename = "Valor")]
    pub value: Option<f64>,
    #[serde(rename = "Latitud")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitud")]
    pub longitude: Option<f64>,
}

impl From<MeasurementRecord> for Measurement {
    fn from(r: MeasurementRecord) -> Self {
        Measurement {
            department: r.department,
            category: r.category,
            value: r.value.unwrap_or(f64::NAN),
            latitude: r.latitude.unwrap_or(f64::NAN),
            longitude: r.longitude.unwrap_or(f64::NAN),
        }
    }
}

impl Measurement {
    pub fn new(
        department: &str,
        category: &str,
        value: f64,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Measurement {
            department: department.to_string(),
            category: category.to_string(),
            value,
            latitude,
            longitude,
        }
    }

    /// Value and coordinates are all finite numbers.
    pub fn is_finite(&self) -> bool {
        self.value.is_finite() && self.latitude.is_finite() && self.longitude.is_finite()
    }
}

// ---------------------------------------------------------------------------
// MeasurementTable – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed table with pre-computed column indices.
/// Never mutated after construction; every filter produces a [`View`].
#[derive(Debug, Clone, Default)]
pub struct MeasurementTable {
    pub rows: Vec<Measurement>,
    /// Sorted distinct departments.
    pub departments: BTreeSet<String>,
    /// Sorted distinct categories.
    pub categories: BTreeSet<String>,
    /// `(min, max)` of `value`; `None` for an empty table.
    pub value_bounds: Option<(f64, f64)>,
    /// Rows dropped at load time because a numeric field was not finite.
    pub skipped_rows: usize,
}

impl MeasurementTable {
    /// Build the table, dropping rows with non-finite numbers.
    pub fn from_rows(rows: Vec<Measurement>) -> Self {
        let total = rows.len();
        let rows: Vec<Measurement> = rows
            .into_iter()
            .enumerate()
            .filter(|(i, m)| {
                if m.is_finite() {
                    true
                } else {
                    log::warn!("Skipping row {i}: non-finite value or coordinates");
                    false
                }
            })
            .map(|(_, m)| m)
            .collect();
        let skipped_rows = total - rows.len();

        let mut departments = BTreeSet::new();
        let mut categories = BTreeSet::new();
        let mut value_bounds: Option<(f64, f64)> = None;

        for m in &rows {
            departments.insert(m.department.clone());
            categories.insert(m.category.clone());
            value_bounds = Some(match value_bounds {
                None => (m.value, m.value),
                Some((lo, hi)) => (lo.min(m.value), hi.max(m.value)),
            });
        }

        MeasurementTable {
            rows,
            departments,
            categories,
            value_bounds,
            skipped_rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A view over every row.
    pub fn view(&self) -> View<'_> {
        View::all(self)
    }
}

// ---------------------------------------------------------------------------
// View – a derived subset of the table
// ---------------------------------------------------------------------------

/// A subset of a [`MeasurementTable`], held as row indices in source order.
#[derive(Debug, Clone)]
pub struct View<'a> {
    table: &'a MeasurementTable,
    indices: Cow<'a, [usize]>,
}

impl<'a> View<'a> {
    pub fn all(table: &'a MeasurementTable) -> Self {
        View {
            table,
            indices: Cow::Owned((0..table.len()).collect()),
        }
    }

    /// Borrow an index list computed earlier (e.g. cached in the UI state).
    pub fn with_indices(table: &'a MeasurementTable, indices: &'a [usize]) -> Self {
        View {
            table,
            indices: Cow::Borrowed(indices),
        }
    }

    pub(crate) fn from_owned(table: &'a MeasurementTable, indices: Vec<usize>) -> Self {
        View {
            table,
            indices: Cow::Owned(indices),
        }
    }

    pub fn table(&self) -> &'a MeasurementTable {
        self.table
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices.into_owned()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The `i`-th row of the view (not of the table).
    pub fn get(&self, i: usize) -> Option<&'a Measurement> {
        let table = self.table;
        self.indices.get(i).and_then(|&idx| table.rows.get(idx))
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a Measurement> + '_ {
        let table = self.table;
        self.indices.iter().filter_map(move |&idx| table.rows.get(idx))
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        let table: &MeasurementTable = self.table;
        self.indices
            .iter()
            .filter_map(move |&idx| table.rows.get(idx).map(|m| m.value))
    }

    /// Largest value in the view.
    pub fn max_value(&self) -> Option<f64> {
        self.values().reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> MeasurementTable {
        MeasurementTable::from_rows(vec![
            Measurement::new("Antioquia", "B", 0.4, 6.25, -75.56),
            Measurement::new("Cundinamarca", "A", 0.1, 4.71, -74.07),
            Measurement::new("Antioquia", "A", 1.3, 6.20, -75.58),
        ])
    }

    #[test]
    fn test_table_indices() {
        let t = table();
        assert_eq!(t.len(), 3);
        assert_eq!(
            t.departments.iter().collect::<Vec<_>>(),
            ["Antioquia", "Cundinamarca"]
        );
        assert_eq!(t.categories.iter().collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(t.value_bounds, Some((0.1, 1.3)));
        assert_eq!(t.skipped_rows, 0);
    }

    #[test]
    fn test_non_finite_rows_are_skipped() {
        let t = MeasurementTable::from_rows(vec![
            Measurement::new("Meta", "A", f64::NAN, 4.1, -73.6),
            Measurement::new("Meta", "A", 2.0, 4.1, -73.6),
            Measurement::new("Meta", "C", 3.0, f64::INFINITY, -73.6),
        ]);
        assert_eq!(t.len(), 1);
        assert_eq!(t.skipped_rows, 2);
        assert_eq!(t.value_bounds, Some((2.0, 2.0)));
    }

    #[test]
    fn test_empty_table() {
        let t = MeasurementTable::from_rows(Vec::new());
        assert!(t.is_empty());
        assert_eq!(t.value_bounds, None);
        assert!(t.view().is_empty());
        assert_eq!(t.view().max_value(), None);
    }

    #[test]
    fn test_view_with_indices() {
        let t = table();
        let idx = vec![2, 0];
        let v = View::with_indices(&t, &idx);
        assert_eq!(v.len(), 2);
        assert_eq!(v.get(0).map(|m| m.value), Some(1.3));
        assert_eq!(v.values().collect::<Vec<_>>(), vec![1.3, 0.4]);
        assert_eq!(v.max_value(), Some(1.3));
        assert!(v.get(5).is_none());
    }
}
