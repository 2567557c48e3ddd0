use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::error::DatasetError;

/// Status value marking a student who did not pass.
pub const UNSUCCESSFUL_STATUS: &str = "Unsuccessful";

/// Identity columns every results sheet must carry, in display order.
pub const IDENTITY_COLUMNS: [&str; 6] = ["Class", "Semester", "Name", "UID", "Status", "CGPA"];

static NULL_CELL: CellValue = CellValue::Null;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the source sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring what a spreadsheet column can hold.
/// Category filters keep these in `BTreeSet`s, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Null,
}

// Numbers compare by value via `total_cmp`, which makes the order total.
impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellValue::Integer(a), CellValue::Integer(b)) => a.cmp(b),
            (CellValue::Float(a), CellValue::Float(b)) => a.total_cmp(b),
            (CellValue::Integer(a), CellValue::Float(b)) => {
                (*a as f64).total_cmp(b).then(Ordering::Less)
            }
            (CellValue::Float(a), CellValue::Integer(b)) => {
                a.total_cmp(&(*b as f64)).then(Ordering::Greater)
            }
            (CellValue::String(a), CellValue::String(b)) => a.cmp(b),
            // Across kinds: nulls, then numbers, then text.
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    fn kind_rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Integer(_) | CellValue::Float(_) => 1,
            CellValue::String(_) => 2,
        }
    }

    /// Numeric view of the cell. Text, nulls and non-finite floats are absent.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if v.is_finite() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text view used for identifier columns; nulls become empty.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            other => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// CategoryField – the three filterable columns
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryField {
    Class,
    Semester,
    Status,
}

impl CategoryField {
    pub const ALL: [CategoryField; 3] = [
        CategoryField::Class,
        CategoryField::Semester,
        CategoryField::Status,
    ];

    /// Column name in the source sheet.
    pub fn column_name(self) -> &'static str {
        match self {
            CategoryField::Class => "Class",
            CategoryField::Semester => "Semester",
            CategoryField::Status => "Status",
        }
    }
}

impl fmt::Display for CategoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

// ---------------------------------------------------------------------------
// RawTable – decoded sheet before schema validation
// ---------------------------------------------------------------------------

/// Header row plus cell rows, exactly as decoded by a loader.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

// ---------------------------------------------------------------------------
// StudentRecord – one row of the results sheet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct StudentRecord {
    pub class: CellValue,
    pub semester: CellValue,
    pub status: CellValue,
    pub name: String,
    pub uid: String,
    pub cgpa: Option<f64>,
    /// One entry per `ResultsDataset::score_columns`, `None` when missing or non-numeric.
    pub scores: Vec<Option<f64>>,
}

impl StudentRecord {
    pub fn category(&self, field: CategoryField) -> &CellValue {
        match field {
            CategoryField::Class => &self.class,
            CategoryField::Semester => &self.semester,
            CategoryField::Status => &self.status,
        }
    }

    pub fn is_unsuccessful(&self) -> bool {
        matches!(&self.status, CellValue::String(s) if s == UNSUCCESSFUL_STATUS)
    }
}

// ---------------------------------------------------------------------------
// ResultsDataset – the complete loaded sheet
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed category indices.
#[derive(Debug, Clone)]
pub struct ResultsDataset {
    /// All records (rows), in sheet order.
    pub records: Vec<StudentRecord>,
    /// Every non-identity column, in sheet order.
    pub score_columns: Vec<String>,
    /// For each category field the sorted set of distinct values.
    pub unique_values: BTreeMap<CategoryField, BTreeSet<CellValue>>,
}

impl ResultsDataset {
    /// Build category indices from already-typed records.
    pub fn from_records(records: Vec<StudentRecord>, score_columns: Vec<String>) -> Self {
        let mut unique_values: BTreeMap<CategoryField, BTreeSet<CellValue>> = BTreeMap::new();
        for field in CategoryField::ALL {
            let values = unique_values.entry(field).or_default();
            for record in &records {
                values.insert(record.category(field).clone());
            }
        }
        ResultsDataset {
            records,
            score_columns,
            unique_values,
        }
    }

    /// Validate a decoded table against the results schema.
    pub fn from_table(table: RawTable) -> Result<Self, DatasetError> {
        let position = |name: &str| -> Result<usize, DatasetError> {
            table
                .headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        };
        let class_idx = position("Class")?;
        let semester_idx = position("Semester")?;
        let name_idx = position("Name")?;
        let uid_idx = position("UID")?;
        let status_idx = position("Status")?;
        let cgpa_idx = position("CGPA")?;

        let score_cols: Vec<(usize, String)> = table
            .headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !IDENTITY_COLUMNS.contains(&h.as_str()))
            .map(|(i, h)| (i, h.clone()))
            .collect();

        let width = table.headers.len();
        let mut records = Vec::with_capacity(table.rows.len());
        for (row_no, row) in table.rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(DatasetError::RaggedRow {
                    row: row_no + 1,
                    found: row.len(),
                    expected: width,
                });
            }
            // Short rows come from trailing empty cells; treat them as null.
            let cell = |idx: usize| row.get(idx).unwrap_or(&NULL_CELL);

            records.push(StudentRecord {
                class: cell(class_idx).clone(),
                semester: cell(semester_idx).clone(),
                status: cell(status_idx).clone(),
                name: cell(name_idx).to_text(),
                uid: cell(uid_idx).to_text(),
                cgpa: cell(cgpa_idx).as_f64(),
                scores: score_cols.iter().map(|(i, _)| cell(*i).as_f64()).collect(),
            });
        }

        let score_columns = score_cols.into_iter().map(|(_, name)| name).collect();
        Ok(Self::from_records(records, score_columns))
    }

    /// Position of a score column in `StudentRecord::scores`.
    pub fn score_index(&self, column: &str) -> Option<usize> {
        self.score_columns.iter().position(|c| c == column)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn text(s: &str) -> CellValue {
        CellValue::String(s.to_string())
    }

    /// Small table shared by the aggregation tests.
    pub(crate) fn sample_table() -> RawTable {
        let headers = [
            "Class",
            "Semester",
            "Name",
            "UID",
            "Status",
            "CGPA",
            "Math Total",
            "Physics Total",
            "Total Credits",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        let row = |class: &str, sem: i64, name: &str, status: &str, cgpa: f64, math: CellValue, phy: f64| {
            vec![
                text(class),
                CellValue::Integer(sem),
                text(name),
                CellValue::Integer(2023300000 + name.len() as i64),
                text(status),
                CellValue::Float(cgpa),
                math,
                CellValue::Float(phy),
                CellValue::Integer(20),
            ]
        };

        RawTable {
            headers,
            rows: vec![
                row("A", 3, "Asha", "Successful", 8.0, CellValue::Integer(70), 85.0),
                row("B", 3, "Bilal", "Unsuccessful", 9.0, CellValue::Integer(40), 90.0),
                row("A", 4, "Chen", "Unsuccessful", 7.0, CellValue::Integer(45), 80.0),
                row("B", 4, "Dara", "Successful", 8.5, CellValue::Integer(60), 70.0),
                row("A", 3, "Esi", "Successful", 7.5, text("AB"), 65.0),
            ],
        }
    }

    pub(crate) fn sample_dataset() -> ResultsDataset {
        ResultsDataset::from_table(sample_table()).unwrap()
    }

    #[test]
    fn score_columns_exclude_identity_columns() {
        let ds = sample_dataset();
        assert_eq!(
            ds.score_columns,
            vec!["Math Total", "Physics Total", "Total Credits"]
        );
        assert_eq!(ds.len(), 5);
    }

    #[test]
    fn non_numeric_scores_are_absent() {
        let ds = sample_dataset();
        let math = ds.score_index("Math Total").unwrap();
        assert_eq!(ds.records[4].scores[math], None);
        assert_eq!(ds.records[0].scores[math], Some(70.0));
    }

    #[test]
    fn unique_values_cover_every_category() {
        let ds = sample_dataset();
        let classes = &ds.unique_values[&CategoryField::Class];
        assert_eq!(classes.len(), 2);
        let semesters = &ds.unique_values[&CategoryField::Semester];
        assert!(semesters.contains(&CellValue::Integer(3)));
        assert!(semesters.contains(&CellValue::Integer(4)));
    }

    #[test]
    fn numeric_uid_is_kept_as_text() {
        let ds = sample_dataset();
        assert_eq!(ds.records[0].uid, "2023300004");
    }

    #[test]
    fn missing_identity_column_is_rejected() {
        let mut table = sample_table();
        let idx = table.headers.iter().position(|h| h == "CGPA").unwrap();
        table.headers[idx] = "GPA".to_string();
        let err = ResultsDataset::from_table(table).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(ref c) if c == "CGPA"));
    }

    #[test]
    fn ragged_row_is_rejected() {
        let mut table = sample_table();
        table.rows[1].push(CellValue::Null);
        let err = ResultsDataset::from_table(table).unwrap_err();
        assert!(matches!(err, DatasetError::RaggedRow { row: 2, .. }));
    }

    #[test]
    fn short_rows_pad_with_nulls() {
        let mut table = sample_table();
        table.rows[0].truncate(6);
        let ds = ResultsDataset::from_table(table).unwrap();
        assert!(ds.records[0].scores.iter().all(Option::is_none));
    }

    #[test]
    fn unsuccessful_status_is_exact() {
        let ds = sample_dataset();
        let flags: Vec<bool> = ds.records.iter().map(|r| r.is_unsuccessful()).collect();
        assert_eq!(flags, vec![false, true, true, false, false]);
    }

    #[test]
    fn non_finite_floats_are_not_numbers() {
        assert_eq!(CellValue::Float(f64::INFINITY).as_f64(), None);
        assert_eq!(CellValue::Float(f64::NEG_INFINITY).as_f64(), None);
        assert_eq!(CellValue::Float(f64::NAN).as_f64(), None);
        assert_eq!(CellValue::Float(7.5).as_f64(), Some(7.5));
    }

    #[test]
    fn mixed_kinds_order_nulls_numbers_text() {
        let set: BTreeSet<CellValue> =
            [text("A"), CellValue::Integer(4), CellValue::Null, CellValue::Float(3.5)].into();
        let ordered: Vec<CellValue> = set.into_iter().collect();
        assert_eq!(
            ordered,
            vec![CellValue::Null, CellValue::Float(3.5), CellValue::Integer(4), text("A")]
        );
    }

    #[test]
    fn header_only_table_is_empty() {
        let mut table = sample_table();
        table.rows.clear();
        let ds = ResultsDataset::from_table(table).unwrap();
        assert!(ds.is_empty());
        assert!(ds.unique_values.values().all(BTreeSet::is_empty));
    }
}
