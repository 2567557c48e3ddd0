use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const SUBJECTS: [(&str, f64); 5] = [
    ("Engineering Mathematics", 62.0),
    ("Data Structures", 70.0),
    ("Digital Logic", 66.0),
    ("Computer Networks", 58.0),
    ("Economics", 74.0),
];

const CLASSES: [&str; 3] = ["SE-A", "SE-B", "SE-C"];
const SEMESTERS: [i64; 2] = [3, 4];
const STUDENTS_PER_CLASS: usize = 20;
const PASS_MARK: f64 = 50.0;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Map an average mark onto a 10-point CGPA.
fn cgpa_for(average: f64) -> f64 {
    ((average / 10.0).clamp(0.0, 10.0) * 100.0).round() / 100.0
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let mut class_col = Vec::new();
    let mut semester_col = Vec::new();
    let mut name_col = Vec::new();
    let mut uid_col = Vec::new();
    let mut status_col = Vec::new();
    let mut cgpa_col = Vec::new();
    let mut totals: Vec<Vec<Option<f64>>> = vec![Vec::new(); SUBJECTS.len()];
    let mut credits_col = Vec::new();

    let mut uid: i64 = 2023300001;
    for &semester in &SEMESTERS {
        for class in &CLASSES {
            for n in 0..STUDENTS_PER_CLASS {
                // Per-student ability shifts every subject together.
                let ability = rng.gauss(0.0, 8.0);
                let mut marks = Vec::with_capacity(SUBJECTS.len());
                for (i, &(_, mean)) in SUBJECTS.iter().enumerate() {
                    // Occasional absentee: no mark recorded.
                    let mark = if rng.next_f64() < 0.02 {
                        None
                    } else {
                        Some(rng.gauss(mean + ability, 12.0).clamp(0.0, 100.0).round())
                    };
                    totals[i].push(mark);
                    marks.push(mark);
                }

                let present: Vec<f64> = marks.iter().flatten().copied().collect();
                let average = present.iter().sum::<f64>() / present.len().max(1) as f64;
                let failed = marks.iter().any(|m| m.map_or(true, |v| v < PASS_MARK));

                class_col.push(class.to_string());
                semester_col.push(semester);
                name_col.push(format!("Student {:02}{}", n + 1, &class[3..]));
                uid_col.push(uid);
                status_col.push(if failed { "Unsuccessful" } else { "Successful" });
                cgpa_col.push(cgpa_for(average));
                credits_col.push(if failed { 16 } else { 22 });
                uid += 1;
            }
        }
    }

    let mut fields = vec![
        Field::new("Class", DataType::Utf8, false),
        Field::new("Semester", DataType::Int64, false),
        Field::new("Name", DataType::Utf8, false),
        Field::new("UID", DataType::Int64, false),
        Field::new("Status", DataType::Utf8, false),
        Field::new("CGPA", DataType::Float64, false),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(class_col.clone())),
        Arc::new(Int64Array::from(semester_col)),
        Arc::new(StringArray::from(name_col)),
        Arc::new(Int64Array::from(uid_col)),
        Arc::new(StringArray::from(status_col)),
        Arc::new(Float64Array::from(cgpa_col)),
    ];
    for ((subject, _), marks) in SUBJECTS.iter().zip(totals) {
        fields.push(Field::new(format!("{subject} Total"), DataType::Float64, true));
        columns.push(Arc::new(Float64Array::from(marks)));
    }
    fields.push(Field::new("Total Credits", DataType::Int64, false));
    columns.push(Arc::new(Int64Array::from(credits_col)));

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let output_path = "sample_results.parquet";
    let file = std::fs::File::create(output_path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;

    println!("Wrote {} students to {output_path}", class_col.len());
    Ok(())
}
