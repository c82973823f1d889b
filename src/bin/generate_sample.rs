use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const ROWS: usize = 1470;
const CSV_PATH: &str = "sample_employees.csv";
const PARQUET_PATH: &str = "sample_employees.parquet";

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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Integer score in `1..=max`.
    fn score(&mut self, max: u64) -> i64 {
        (self.next_u64() % max) as i64 + 1
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct EmployeeRow {
    age: i64,
    attrition: String,
    department: String,
    distance_from_home: i64,
    education_field: String,
    environment_satisfaction: i64,
    gender: String,
    job_role: String,
    job_satisfaction: i64,
    marital_status: String,
    monthly_income: i64,
    over_time: String,
    performance_rating: i64,
    relationship_satisfaction: i64,
    total_working_years: i64,
    training_times_last_year: i64,
    work_life_balance: i64,
    years_at_company: i64,
}

const DEPARTMENTS: [(&str, &[&str]); 3] = [
    (
        "Sales",
        &["Sales Executive", "Sales Representative", "Manager"],
    ),
    (
        "Research & Development",
        &[
            "Research Scientist",
            "Laboratory Technician",
            "Manufacturing Director",
            "Healthcare Representative",
            "Research Director",
        ],
    ),
    ("Human Resources", &["Human Resources", "Manager"]),
];

const EDUCATION_FIELDS: [&str; 6] = [
    "Life Sciences",
    "Medical",
    "Marketing",
    "Technical Degree",
    "Human Resources",
    "Other",
];

fn generate_row(rng: &mut SimpleRng) -> EmployeeRow {
    let (department, roles) = match rng.next_f64() {
        p if p < 0.30 => DEPARTMENTS[0],
        p if p < 0.95 => DEPARTMENTS[1],
        _ => DEPARTMENTS[2],
    };
    let job_role = rng.pick(roles);

    let age = rng.gauss(37.0, 9.0).round().clamp(18.0, 60.0) as i64;
    let total_working_years = (rng.gauss((age - 18) as f64 * 0.6, 4.0).round() as i64).clamp(0, age - 18);
    let years_at_company = (rng.next_f64() * (total_working_years + 1) as f64) as i64;
    let seniority = if job_role.contains("Director") || job_role == "Manager" { 2.2 } else { 1.0 };
    let monthly_income = (seniority * (2500.0 + 320.0 * total_working_years as f64) + rng.gauss(0.0, 900.0))
        .round()
        .clamp(1009.0, 19999.0) as i64;

    let over_time = rng.chance(0.28);
    let job_satisfaction = rng.score(4);
    let work_life_balance = rng.score(4);

    // Overtime, low pay and low satisfaction all push attrition up.
    let mut p_leave: f64 = 0.08;
    if over_time {
        p_leave += 0.15;
    }
    if monthly_income < 3000 {
        p_leave += 0.10;
    }
    if job_satisfaction == 1 {
        p_leave += 0.07;
    }
    if age < 25 {
        p_leave += 0.08;
    }

    EmployeeRow {
        age,
        attrition: if rng.chance(p_leave) { "Yes" } else { "No" }.to_string(),
        department: department.to_string(),
        distance_from_home: rng.score(29),
        education_field: rng.pick(&EDUCATION_FIELDS).to_string(),
        environment_satisfaction: rng.score(4),
        gender: if rng.chance(0.6) { "Male" } else { "Female" }.to_string(),
        job_role: job_role.to_string(),
        job_satisfaction,
        marital_status: rng.pick(&["Single", "Married", "Married", "Divorced"]).to_string(),
        monthly_income,
        over_time: if over_time { "Yes" } else { "No" }.to_string(),
        performance_rating: if rng.chance(0.15) { 4 } else { 3 },
        relationship_satisfaction: rng.score(4),
        total_working_years,
        training_times_last_year: rng.score(7) - 1,
        work_life_balance,
        years_at_company,
    }
}

fn write_csv(rows: &[EmployeeRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(rows: &[EmployeeRow]) -> Result<()> {
    fn text(rows: &[EmployeeRow], f: impl Fn(&EmployeeRow) -> &str) -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    }
    fn int(rows: &[EmployeeRow], f: impl Fn(&EmployeeRow) -> i64) -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    }

    let columns: Vec<(&str, ArrayRef)> = vec![
        ("Age", int(rows, |r| r.age)),
        ("Attrition", text(rows, |r| r.attrition.as_str())),
        ("Department", text(rows, |r| r.department.as_str())),
        ("DistanceFromHome", int(rows, |r| r.distance_from_home)),
        ("EducationField", text(rows, |r| r.education_field.as_str())),
        ("EnvironmentSatisfaction", int(rows, |r| r.environment_satisfaction)),
        ("Gender", text(rows, |r| r.gender.as_str())),
        ("JobRole", text(rows, |r| r.job_role.as_str())),
        ("JobSatisfaction", int(rows, |r| r.job_satisfaction)),
        ("MaritalStatus", text(rows, |r| r.marital_status.as_str())),
        ("MonthlyIncome", int(rows, |r| r.monthly_income)),
        ("OverTime", text(rows, |r| r.over_time.as_str())),
        ("PerformanceRating", int(rows, |r| r.performance_rating)),
        ("RelationshipSatisfaction", int(rows, |r| r.relationship_satisfaction)),
        ("TotalWorkingYears", int(rows, |r| r.total_working_years)),
        ("TrainingTimesLastYear", int(rows, |r| r.training_times_last_year)),
        ("WorkLifeBalance", int(rows, |r| r.work_life_balance)),
        ("YearsAtCompany", int(rows, |r| r.years_at_company)),
    ];

    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|(name, array)| Field::new(*name, array.data_type().clone(), false))
            .collect::<Vec<_>>(),
    ));
    let batch = RecordBatch::try_new(
        schema.clone(),
        columns.into_iter().map(|(_, array)| array).collect(),
    )
    .context("building record batch")?;

    let file = std::fs::File::create(PARQUET_PATH).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows: Vec<EmployeeRow> = (0..ROWS).map(|_| generate_row(&mut rng)).collect();

    write_csv(&rows)?;
    write_parquet(&rows)?;

    let left = rows.iter().filter(|r| r.attrition == "Yes").count();
    println!(
        "Wrote {} employees ({left} left) to {CSV_PATH} and {PARQUET_PATH}",
        rows.len()
    );
    Ok(())
}
