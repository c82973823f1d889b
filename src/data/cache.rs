use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use super::error::LoadError;
use super::loader::load_file;
use super::model::Dataset;

// ---------------------------------------------------------------------------
// DataSource – load-once handle around the fixed input file
// ---------------------------------------------------------------------------

/// The fixed data source, read at most once per handle.
///
/// Construct one in `main` and share it; every [`DataSource::load`] after
/// the first successful one hands out the same `Arc` without touching the
/// file again. A failed load leaves the cache empty.
#[derive(Debug)]
pub struct DataSource {
    path: PathBuf,
    cell: OnceLock<Arc<Dataset>>,
}

impl DataSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cell: OnceLock::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the cached dataset, reading the file on first access.
    pub fn load(&self) -> Result<Arc<Dataset>, LoadError> {
        if let Some(ds) = self.cell.get() {
            return Ok(Arc::clone(ds));
        }

        let dataset = load_file(&self.path)?;
        log::info!(
            "Loaded {} employees with {} columns from {}",
            dataset.len(),
            dataset.column_names.len(),
            self.path.display()
        );
        // If the cell was filled meanwhile, the first value wins.
        Ok(Arc::clone(self.cell.get_or_init(|| Arc::new(dataset))))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn employee_csv() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(
            file,
            "Age,Attrition,Department,Gender,JobRole,MaritalStatus,EducationField,OverTime,\
MonthlyIncome,TotalWorkingYears,YearsAtCompany,TrainingTimesLastYear,JobSatisfaction,\
PerformanceRating,WorkLifeBalance,EnvironmentSatisfaction,RelationshipSatisfaction"
        )
        .unwrap();
        writeln!(
            file,
            "30,No,Sales,Male,Manager,Married,Marketing,No,7000,9,5,2,3,3,3,3,3"
        )
        .unwrap();
        file
    }

    #[test]
    fn second_load_returns_cached_dataset() {
        let file = employee_csv();
        let source = DataSource::new(file.path());
        assert!(!source.cell.get().is_some());

        let first = source.load().unwrap();
        let second = source.load().unwrap();
        assert!(source.cell.get().is_some());
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1);
    }

    #[test]
    fn cached_dataset_survives_source_removal() {
        let file = employee_csv();
        let path = file.path().to_path_buf();
        let source = DataSource::new(&path);
        let first = source.load().unwrap();

        drop(file);
        assert!(!path.exists());

        let again = source.load().unwrap();
        assert!(Arc::ptr_eq(&first, &again));
    }

    #[test]
    fn failed_load_is_not_cached() {
        let source = DataSource::new("/no/such/dir/EA.csv");
        assert!(matches!(source.load(), Err(LoadError::NotFound(_))));
        assert!(!source.cell.get().is_some());
    }
}
