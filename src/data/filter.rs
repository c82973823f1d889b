use std::collections::BTreeSet;

use super::model::{CategoryField, Dataset, Employee};

// ---------------------------------------------------------------------------
// Filter selection: which values are allowed per sidebar control
// ---------------------------------------------------------------------------

/// The user's current sidebar choices.
///
/// An empty set allows nothing. An interval with `min > max` allows nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub departments: BTreeSet<String>,
    pub job_roles: BTreeSet<String>,
    pub genders: BTreeSet<String>,
    /// Inclusive age interval `(min, max)`.
    pub age: (i64, i64),
}

impl FilterSelection {
    /// Everything selected: every value present and the full age range.
    pub fn all(dataset: &Dataset) -> Self {
        Self {
            departments: dataset.unique(CategoryField::Department).clone(),
            job_roles: dataset.unique(CategoryField::JobRole).clone(),
            genders: dataset.unique(CategoryField::Gender).clone(),
            age: dataset.age_range().unwrap_or((0, 0)),
        }
    }

    /// The allowed set behind one of the multi-select controls.
    pub fn values(&self, field: CategoryField) -> Option<&BTreeSet<String>> {
        match field {
            CategoryField::Department => Some(&self.departments),
            CategoryField::JobRole => Some(&self.job_roles),
            CategoryField::Gender => Some(&self.genders),
            _ => None,
        }
    }

    pub fn values_mut(&mut self, field: CategoryField) -> Option<&mut BTreeSet<String>> {
        match field {
            CategoryField::Department => Some(&mut self.departments),
            CategoryField::JobRole => Some(&mut self.job_roles),
            CategoryField::Gender => Some(&mut self.genders),
            _ => None,
        }
    }

    /// Whether one record passes all four predicates.
    pub fn matches(&self, emp: &Employee) -> bool {
        self.departments.contains(&emp.department)
            && self.job_roles.contains(&emp.job_role)
            && self.genders.contains(&emp.gender)
            && self.age.0 <= emp.age
            && emp.age <= self.age.1
    }
}

/// The fields that have a multi-select control in the sidebar.
pub const FILTERABLE: [CategoryField; 3] = [
    CategoryField::Department,
    CategoryField::JobRole,
    CategoryField::Gender,
];

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Records of a dataset that pass a selection, in source order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Rebuild a view from indices computed earlier against `dataset`.
    pub fn from_indices(dataset: &'a Dataset, indices: &[usize]) -> Self {
        let indices = indices
            .iter()
            .copied()
            .filter(|&i| i < dataset.len())
            .collect();
        Self { dataset, indices }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Employee> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.employees[i])
    }
}

/// Apply the selection to the dataset.
pub fn filter<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredView<'a> {
    let indices = dataset
        .employees
        .iter()
        .enumerate()
        .filter(|(_, emp)| selection.matches(emp))
        .map(|(i, _)| i)
        .collect();
    FilteredView { dataset, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{dataset, employee, three_records};

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn full_selection_reproduces_dataset() {
        let ds = three_records();
        let view = filter(&ds, &FilterSelection::all(&ds));
        assert_eq!(view.indices(), &[0, 1, 2]);
        let rows: Vec<_> = view.iter().cloned().collect();
        assert_eq!(rows, ds.employees);
    }

    #[test]
    fn department_and_age_predicates_combine() {
        let ds = three_records();
        let mut sel = FilterSelection::all(&ds);
        sel.departments = set(&["Sales"]);
        sel.age = (20, 45);
        let view = filter(&ds, &sel);
        assert_eq!(view.indices(), &[0, 1]);

        sel.age = (26, 45);
        assert_eq!(filter(&ds, &sel).indices(), &[1]);
    }

    #[test]
    fn age_bounds_are_inclusive() {
        let ds = three_records();
        let mut sel = FilterSelection::all(&ds);
        sel.age = (25, 25);
        assert_eq!(filter(&ds, &sel).indices(), &[0]);
        sel.age = (40, 40);
        assert_eq!(filter(&ds, &sel).indices(), &[1]);
    }

    #[test]
    fn absent_department_yields_empty_view() {
        let ds = three_records();
        let mut sel = FilterSelection::all(&ds);
        sel.departments = set(&["Human Resources"]);
        assert!(filter(&ds, &sel).is_empty());
    }

    #[test]
    fn empty_set_or_inverted_range_admits_nothing() {
        let ds = three_records();
        let mut sel = FilterSelection::all(&ds);
        sel.genders.clear();
        assert!(filter(&ds, &sel).is_empty());

        let mut sel = FilterSelection::all(&ds);
        sel.age = (50, 20);
        assert!(filter(&ds, &sel).is_empty());
    }

    #[test]
    fn view_is_ordered_subset_satisfying_all_predicates() {
        let mut rows = Vec::new();
        for (i, dept) in ["Sales", "Research & Development", "Human Resources"]
            .iter()
            .cycle()
            .take(30)
            .enumerate()
        {
            let mut e = employee(dept, 18 + (i as i64 * 7) % 43, if i % 4 == 0 { "Yes" } else { "No" }, 1000.0);
            e.gender = if i % 3 == 0 { "Male" } else { "Female" }.to_string();
            e.job_role = format!("Role {}", i % 5);
            rows.push(e);
        }
        let ds = dataset(rows);

        let selections = [
            (set(&["Sales"]), set(&["Role 1", "Role 2"]), set(&["Male", "Female"]), (18, 60)),
            (set(&["Sales", "Human Resources"]), set(&["Role 0", "Role 3", "Role 4"]), set(&["Female"]), (30, 45)),
            (set(&[]), set(&["Role 0"]), set(&["Male"]), (18, 60)),
        ];
        for (departments, job_roles, genders, age) in selections {
            let sel = FilterSelection { departments, job_roles, genders, age };
            let view = filter(&ds, &sel);
            assert!(view.indices().windows(2).all(|w| w[0] < w[1]));
            for emp in view.iter() {
                assert!(sel.matches(emp));
            }
            let expected = ds.employees.iter().filter(|e| sel.matches(e)).count();
            assert_eq!(view.len(), expected);
        }
    }

    #[test]
    fn from_indices_drops_out_of_range_rows() {
        let ds = three_records();
        let view = FilteredView::from_indices(&ds, &[0, 2, 9]);
        assert_eq!(view.indices(), &[0, 2]);
    }
}
