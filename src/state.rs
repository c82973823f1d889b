use std::collections::BTreeMap;
use std::sync::Arc;

use eframe::egui::Color32;

use crate::charts::{ChartData, PANELS};
use crate::color::ColorMap;
use crate::data::error::LoadError;
use crate::data::filter::{FilterSelection, FilteredView, filter};
use crate::data::metrics::{Metrics, compute_metrics};
use crate::data::model::{CategoryField, Dataset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None when loading failed).
    pub dataset: Option<Arc<Dataset>>,

    /// Current sidebar choices.
    pub selection: FilterSelection,

    /// Indices of employees passing the current selection (cached).
    pub visible_indices: Vec<usize>,

    /// Headline numbers for the current selection (cached).
    pub metrics: Metrics,

    /// Computed data for each entry of [`PANELS`], same order (cached).
    pub charts: Vec<ChartData>,

    /// One colour map per categorical column, built from the full dataset.
    pub color_maps: BTreeMap<CategoryField, ColorMap>,

    /// Blocking error shown instead of the dashboard.
    pub load_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            selection: FilterSelection::default(),
            visible_indices: Vec::new(),
            metrics: Metrics::default(),
            charts: Vec::new(),
            color_maps: BTreeMap::new(),
            load_error: None,
        }
    }
}

impl AppState {
    /// Build the state from the outcome of the startup load.
    pub fn from_load(result: Result<Arc<Dataset>, LoadError>) -> Self {
        let mut state = Self::default();
        match result {
            Ok(dataset) => state.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                state.load_error = Some(e.to_string());
            }
        }
        state
    }

    /// Ingest a loaded dataset, select everything and compute all panels.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        if dataset.is_empty() {
            log::warn!("Dataset has no employees; every panel will be empty");
        }
        self.selection = FilterSelection::all(&dataset);
        self.color_maps = CategoryField::ALL
            .into_iter()
            .map(|f| (f, ColorMap::new(dataset.unique(f))))
            .collect();
        self.dataset = Some(dataset);
        self.load_error = None;
        self.refilter();
    }

    /// Recompute the view, metrics and every panel after a selection change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let view = filter(ds, &self.selection);
        self.metrics = compute_metrics(&view);
        self.charts = PANELS.iter().map(|p| p.chart.compute(&view)).collect();
        log::debug!(
            "Filter matched {} of {} employees",
            view.len(),
            ds.len()
        );
        self.visible_indices = view.into_indices();
    }

    /// The current filtered view, rebuilt from the cached indices.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.dataset
            .as_deref()
            .map(|ds| FilteredView::from_indices(ds, &self.visible_indices))
    }

    /// Smallest and largest age in the dataset.
    pub fn age_bounds(&self) -> (i64, i64) {
        self.dataset
            .as_deref()
            .and_then(Dataset::age_range)
            .unwrap_or((0, 0))
    }

    /// Toggle a single value in one of the multi-select filters.
    pub fn toggle_filter_value(&mut self, field: CategoryField, value: &str) {
        let Some(selected) = self.selection.values_mut(field) else {
            return;
        };
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select all values of a filter.
    pub fn select_all(&mut self, field: CategoryField) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let all = ds.unique(field).clone();
        if let Some(selected) = self.selection.values_mut(field) {
            *selected = all;
            self.refilter();
        }
    }

    /// Deselect all values of a filter.
    pub fn select_none(&mut self, field: CategoryField) {
        if let Some(selected) = self.selection.values_mut(field) {
            selected.clear();
            self.refilter();
        }
    }

    /// Set the inclusive age interval; a crossed pair is swapped.
    pub fn set_age_range(&mut self, min: i64, max: i64) {
        let range = if min <= max { (min, max) } else { (max, min) };
        if range != self.selection.age {
            self.selection.age = range;
            self.refilter();
        }
    }

    /// Back to "everything selected".
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.selection = FilterSelection::all(ds);
            self.refilter();
        }
    }

    pub fn color_for(&self, field: CategoryField, value: &str) -> Color32 {
        self.color_maps
            .get(&field)
            .map(|cm| cm.color_for(value))
            .unwrap_or(Color32::LIGHT_BLUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{dataset, three_records};

    fn loaded() -> AppState {
        AppState::from_load(Ok(Arc::new(three_records())))
    }

    #[test]
    fn load_selects_everything() {
        let state = loaded();
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.metrics.count, 3);
        assert_eq!(state.charts.len(), PANELS.len());
        assert!(state.load_error.is_none());
    }

    #[test]
    fn empty_dataset_loads_with_empty_panels() {
        let state = AppState::from_load(Ok(Arc::new(dataset(Vec::new()))));
        assert!(state.load_error.is_none());
        assert!(state.visible_indices.is_empty());
        assert_eq!(state.metrics, Metrics::default());
        assert!(state.charts.iter().all(ChartData::is_empty));
    }

    #[test]
    fn load_error_blocks_dashboard() {
        let state = AppState::from_load(Err(LoadError::MissingColumns(vec!["Age".into()])));
        assert!(state.dataset.is_none());
        assert_eq!(state.load_error.as_deref(), Some("missing required columns: Age"));
        assert!(state.view().is_none());
    }

    #[test]
    fn toggling_and_age_range_refilter() {
        let mut state = loaded();
        state.toggle_filter_value(CategoryField::Department, "Research & Development");
        assert_eq!(state.visible_indices, vec![0, 1]);

        state.set_age_range(45, 20);
        assert_eq!(state.selection.age, (20, 45));
        assert_eq!(state.metrics.count, 2);
        assert_eq!(state.metrics.attrition_rate_percent, 50.0);
        assert_eq!(state.metrics.avg_monthly_income, 4000.0);

        state.toggle_filter_value(CategoryField::Department, "Research & Development");
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
    }

    #[test]
    fn select_none_then_all() {
        let mut state = loaded();
        state.select_none(CategoryField::Gender);
        assert!(state.visible_indices.is_empty());
        assert_eq!(state.metrics, Metrics::default());
        assert!(matches!(state.charts.last(), Some(ChartData::Table { rows: 0 })));

        state.select_all(CategoryField::Gender);
        assert_eq!(state.visible_indices.len(), 3);
    }

    #[test]
    fn non_filter_fields_are_ignored() {
        let mut state = loaded();
        state.select_none(CategoryField::Attrition);
        assert_eq!(state.visible_indices.len(), 3);
    }

    #[test]
    fn reset_restores_full_selection() {
        let mut state = loaded();
        state.select_none(CategoryField::JobRole);
        state.set_age_range(30, 31);
        state.reset_filters();
        assert_eq!(state.selection, FilterSelection::all(state.dataset.as_ref().unwrap()));
        assert_eq!(state.age_bounds(), (25, 40));
        assert_eq!(state.visible_indices.len(), 3);
    }
}
