use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::error::LoadError;

// ---------------------------------------------------------------------------
// CellValue – a single cell of an untyped source column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common dataframe dtypes.
///
/// Required columns are converted into typed [`Employee`] fields; every
/// other column keeps its cells in this form.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64`. Booleans are not numbers here.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Field enums – the columns the dashboard knows by name
// ---------------------------------------------------------------------------

/// Categorical columns of an employee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryField {
    Department,
    JobRole,
    Gender,
    MaritalStatus,
    EducationField,
    OverTime,
    Attrition,
}

impl CategoryField {
    pub const ALL: [CategoryField; 7] = [
        CategoryField::Department,
        CategoryField::JobRole,
        CategoryField::Gender,
        CategoryField::MaritalStatus,
        CategoryField::EducationField,
        CategoryField::OverTime,
        CategoryField::Attrition,
    ];

    /// Column name in the source table.
    pub fn column(self) -> &'static str {
        match self {
            CategoryField::Department => "Department",
            CategoryField::JobRole => "JobRole",
            CategoryField::Gender => "Gender",
            CategoryField::MaritalStatus => "MaritalStatus",
            CategoryField::EducationField => "EducationField",
            CategoryField::OverTime => "OverTime",
            CategoryField::Attrition => "Attrition",
        }
    }
}

/// Numeric columns of an employee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericField {
    Age,
    MonthlyIncome,
    TotalWorkingYears,
    YearsAtCompany,
    TrainingTimesLastYear,
    JobSatisfaction,
    PerformanceRating,
    WorkLifeBalance,
    EnvironmentSatisfaction,
    RelationshipSatisfaction,
}

impl NumericField {
    pub const ALL: [NumericField; 10] = [
        NumericField::Age,
        NumericField::MonthlyIncome,
        NumericField::TotalWorkingYears,
        NumericField::YearsAtCompany,
        NumericField::TrainingTimesLastYear,
        NumericField::JobSatisfaction,
        NumericField::PerformanceRating,
        NumericField::WorkLifeBalance,
        NumericField::EnvironmentSatisfaction,
        NumericField::RelationshipSatisfaction,
    ];

    pub fn column(self) -> &'static str {
        match self {
            NumericField::Age => "Age",
            NumericField::MonthlyIncome => "MonthlyIncome",
            NumericField::TotalWorkingYears => "TotalWorkingYears",
            NumericField::YearsAtCompany => "YearsAtCompany",
            NumericField::TrainingTimesLastYear => "TrainingTimesLastYear",
            NumericField::JobSatisfaction => "JobSatisfaction",
            NumericField::PerformanceRating => "PerformanceRating",
            NumericField::WorkLifeBalance => "WorkLifeBalance",
            NumericField::EnvironmentSatisfaction => "EnvironmentSatisfaction",
            NumericField::RelationshipSatisfaction => "RelationshipSatisfaction",
        }
    }

    fn from_column(name: &str) -> Option<Self> {
        NumericField::ALL.into_iter().find(|f| f.column() == name)
    }
}

/// Every column a source table must provide.
pub fn required_columns() -> impl Iterator<Item = &'static str> {
    CategoryField::ALL
        .into_iter()
        .map(CategoryField::column)
        .chain(NumericField::ALL.into_iter().map(NumericField::column))
}

// ---------------------------------------------------------------------------
// Employee – one row of the source table
// ---------------------------------------------------------------------------

/// A single employee record.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub department: String,
    pub job_role: String,
    pub gender: String,
    pub marital_status: String,
    pub education_field: String,
    pub over_time: String,
    pub attrition: String,

    pub age: i64,
    pub monthly_income: f64,
    pub total_working_years: i64,
    pub years_at_company: i64,
    pub training_times_last_year: i64,
    pub job_satisfaction: i64,
    pub performance_rating: i64,
    pub work_life_balance: i64,
    pub environment_satisfaction: i64,
    pub relationship_satisfaction: i64,

    /// Source columns the dashboard has no typed field for.
    pub extra: BTreeMap<String, CellValue>,
}

impl Employee {
    /// Build a record from one row of named cells.
    ///
    /// Required cells are removed from `cells` and type-checked; whatever
    /// is left becomes [`Employee::extra`].
    pub fn from_cells(row: usize, mut cells: BTreeMap<String, CellValue>) -> Result<Self, LoadError> {
        let mut text = |f: CategoryField| take_text(&mut cells, row, f.column());
        let department = text(CategoryField::Department)?;
        let job_role = text(CategoryField::JobRole)?;
        let gender = text(CategoryField::Gender)?;
        let marital_status = text(CategoryField::MaritalStatus)?;
        let education_field = text(CategoryField::EducationField)?;
        let over_time = text(CategoryField::OverTime)?;
        let attrition = text(CategoryField::Attrition)?;

        let mut int = |f: NumericField| take_integer(&mut cells, row, f.column());
        let age = int(NumericField::Age)?;
        let total_working_years = int(NumericField::TotalWorkingYears)?;
        let years_at_company = int(NumericField::YearsAtCompany)?;
        let training_times_last_year = int(NumericField::TrainingTimesLastYear)?;
        let job_satisfaction = int(NumericField::JobSatisfaction)?;
        let performance_rating = int(NumericField::PerformanceRating)?;
        let work_life_balance = int(NumericField::WorkLifeBalance)?;
        let environment_satisfaction = int(NumericField::EnvironmentSatisfaction)?;
        let relationship_satisfaction = int(NumericField::RelationshipSatisfaction)?;

        let income_col = NumericField::MonthlyIncome.column();
        let monthly_income = match cells.remove(income_col) {
            Some(CellValue::Null) | None => return Err(LoadError::invalid(row, income_col, "missing value")),
            Some(cell) => cell
                .as_f64()
                .filter(|v| v.is_finite())
                .ok_or_else(|| LoadError::invalid(row, income_col, format!("'{cell}' is not a finite number")))?,
        };

        Ok(Employee {
            department,
            job_role,
            gender,
            marital_status,
            education_field,
            over_time,
            attrition,
            age,
            monthly_income,
            total_working_years,
            years_at_company,
            training_times_last_year,
            job_satisfaction,
            performance_rating,
            work_life_balance,
            environment_satisfaction,
            relationship_satisfaction,
            extra: cells,
        })
    }

    pub fn category(&self, field: CategoryField) -> &str {
        match field {
            CategoryField::Department => &self.department,
            CategoryField::JobRole => &self.job_role,
            CategoryField::Gender => &self.gender,
            CategoryField::MaritalStatus => &self.marital_status,
            CategoryField::EducationField => &self.education_field,
            CategoryField::OverTime => &self.over_time,
            CategoryField::Attrition => &self.attrition,
        }
    }

    pub fn numeric(&self, field: NumericField) -> f64 {
        match field {
            NumericField::Age => self.age as f64,
            NumericField::MonthlyIncome => self.monthly_income,
            NumericField::TotalWorkingYears => self.total_working_years as f64,
            NumericField::YearsAtCompany => self.years_at_company as f64,
            NumericField::TrainingTimesLastYear => self.training_times_last_year as f64,
            NumericField::JobSatisfaction => self.job_satisfaction as f64,
            NumericField::PerformanceRating => self.performance_rating as f64,
            NumericField::WorkLifeBalance => self.work_life_balance as f64,
            NumericField::EnvironmentSatisfaction => self.environment_satisfaction as f64,
            NumericField::RelationshipSatisfaction => self.relationship_satisfaction as f64,
        }
    }

    /// Whether the employee has left the organisation.
    pub fn has_left(&self) -> bool {
        self.attrition == "Yes"
    }

    /// Numeric value of any column, typed or extra. `None` for text, bool
    /// and null cells.
    pub fn numeric_column(&self, column: &str) -> Option<f64> {
        match NumericField::from_column(column) {
            Some(f) => Some(self.numeric(f)),
            None => self.extra.get(column).and_then(CellValue::as_f64),
        }
    }

    /// The cell of any column as it would appear in the source table.
    pub fn cell(&self, column: &str) -> CellValue {
        if let Some(f) = CategoryField::ALL.into_iter().find(|f| f.column() == column) {
            return CellValue::String(self.category(f).to_string());
        }
        match NumericField::from_column(column) {
            Some(NumericField::MonthlyIncome) if self.monthly_income.fract() == 0.0 => {
                CellValue::Integer(self.monthly_income as i64)
            }
            Some(NumericField::MonthlyIncome) => CellValue::Float(self.monthly_income),
            Some(f) => CellValue::Integer(self.numeric(f) as i64),
            None => self.extra.get(column).cloned().unwrap_or(CellValue::Null),
        }
    }
}

fn take_text(cells: &mut BTreeMap<String, CellValue>, row: usize, column: &str) -> Result<String, LoadError> {
    match cells.remove(column) {
        Some(CellValue::String(s)) => Ok(s),
        Some(CellValue::Null) | None => Err(LoadError::invalid(row, column, "missing value")),
        // Numeric codes in a categorical column are kept as their text.
        Some(other) => Ok(other.to_string()),
    }
}

fn take_integer(cells: &mut BTreeMap<String, CellValue>, row: usize, column: &str) -> Result<i64, LoadError> {
    match cells.remove(column) {
        Some(CellValue::Integer(i)) => Ok(i),
        Some(CellValue::Float(v)) if v.fract() == 0.0 && v.is_finite() => Ok(v as i64),
        Some(CellValue::Null) | None => Err(LoadError::invalid(row, column, "missing value")),
        Some(other) => Err(LoadError::invalid(
            row,
            column,
            format!("'{other}' is not an integer"),
        )),
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed column indices.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All records in source order.
    pub employees: Vec<Employee>,
    /// Column names in source order.
    pub column_names: Vec<String>,
    /// For each categorical column the sorted set of unique values.
    pub unique_values: BTreeMap<CategoryField, BTreeSet<String>>,
    /// Columns holding only numbers (and nulls), in source order.
    pub numeric_columns: Vec<String>,
}

impl Dataset {
    /// Validate the header and convert raw rows into typed records.
    pub fn from_rows(
        column_names: Vec<String>,
        rows: Vec<BTreeMap<String, CellValue>>,
    ) -> Result<Self, LoadError> {
        let missing: Vec<String> = required_columns()
            .filter(|req| !column_names.iter().any(|c| c == req))
            .map(str::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns(missing));
        }

        let employees = rows
            .into_iter()
            .enumerate()
            .map(|(row, cells)| Employee::from_cells(row, cells))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_employees(column_names, employees))
    }

    /// Build column indices from already typed records.
    pub fn from_employees(column_names: Vec<String>, employees: Vec<Employee>) -> Self {
        let mut unique_values: BTreeMap<CategoryField, BTreeSet<String>> = CategoryField::ALL
            .into_iter()
            .map(|f| (f, BTreeSet::new()))
            .collect();
        for emp in &employees {
            for (field, values) in unique_values.iter_mut() {
                values.insert(emp.category(*field).to_string());
            }
        }

        let numeric_columns = column_names
            .iter()
            .filter(|col| {
                if NumericField::from_column(col).is_some() {
                    return true;
                }
                let mut cells = employees.iter().filter_map(|e| e.extra.get(col.as_str()));
                let mut seen_number = false;
                let all_numeric = cells.all(|cell| match cell {
                    CellValue::Integer(_) | CellValue::Float(_) => {
                        seen_number = true;
                        true
                    }
                    CellValue::Null => true,
                    _ => false,
                });
                all_numeric && seen_number
            })
            .cloned()
            .collect();

        Dataset {
            employees,
            column_names,
            unique_values,
            numeric_columns,
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.employees.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Smallest and largest age, or `None` for an empty dataset.
    pub fn age_range(&self) -> Option<(i64, i64)> {
        let min = self.employees.iter().map(|e| e.age).min()?;
        let max = self.employees.iter().map(|e| e.age).max()?;
        Some((min, max))
    }

    pub fn unique(&self, field: CategoryField) -> &BTreeSet<String> {
        // Every CategoryField is seeded in `from_employees`.
        &self.unique_values[&field]
    }
}

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A record with neutral defaults for everything but the fields the
    /// filter and metric tests care about.
    pub fn employee(department: &str, age: i64, attrition: &str, income: f64) -> Employee {
        Employee {
            department: department.to_string(),
            job_role: "Sales Executive".to_string(),
            gender: "Female".to_string(),
            marital_status: "Single".to_string(),
            education_field: "Marketing".to_string(),
            over_time: "No".to_string(),
            attrition: attrition.to_string(),
            age,
            monthly_income: income,
            total_working_years: 5,
            years_at_company: 3,
            training_times_last_year: 2,
            job_satisfaction: 3,
            performance_rating: 3,
            work_life_balance: 3,
            environment_satisfaction: 2,
            relationship_satisfaction: 4,
            extra: BTreeMap::new(),
        }
    }

    pub fn dataset(employees: Vec<Employee>) -> Dataset {
        let columns = required_columns().map(str::to_string).collect();
        Dataset::from_employees(columns, employees)
    }

    /// The three-record example used throughout the metric tests.
    pub fn three_records() -> Dataset {
        dataset(vec![
            employee("Sales", 25, "Yes", 3000.0),
            employee("Sales", 40, "No", 5000.0),
            employee("Research & Development", 30, "No", 4000.0),
        ])
    }

    /// One source row with every required column populated.
    pub fn raw_row() -> BTreeMap<String, CellValue> {
        let mut row = BTreeMap::new();
        for f in CategoryField::ALL {
            row.insert(f.column().to_string(), CellValue::String(format!("{f:?}-value")));
        }
        for f in NumericField::ALL {
            row.insert(f.column().to_string(), CellValue::Integer(3));
        }
        row
    }
}
