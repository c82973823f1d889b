use std::collections::{BTreeMap, BTreeSet};

use crate::data::filter::FilteredView;
use crate::data::model::{CategoryField, NumericField};
use crate::data::stats::{self, Binning, BoxSummary};

// ---------------------------------------------------------------------------
// Panel descriptors
// ---------------------------------------------------------------------------

/// What a panel shows, independent of any data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartSpec {
    /// Count of records per `x` category, one bar per `color` group.
    GroupedBars { x: CategoryField, color: CategoryField },
    /// Share of records per category.
    Pie { names: CategoryField },
    /// Numeric distribution, stacked by `color` group.
    Histogram {
        x: NumericField,
        binning: Binning,
        color: CategoryField,
    },
    /// Distribution of `y` per `x` category, one box per `color` group.
    BoxPlot {
        x: CategoryField,
        y: NumericField,
        color: CategoryField,
    },
    Scatter {
        x: NumericField,
        y: NumericField,
        color: CategoryField,
    },
    /// Pearson correlations between every numeric column.
    CorrelationHeatmap,
    /// The filtered rows themselves.
    Table,
}

/// One numbered section of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Panel {
    pub number: u8,
    pub title: &'static str,
    pub description: &'static str,
    pub chart: ChartSpec,
}

use CategoryField as C;
use NumericField as N;

pub const PANELS: [Panel; 20] = [
    Panel {
        number: 1,
        title: "Attrition by Department",
        description: "This chart shows how attrition varies across departments.",
        chart: ChartSpec::GroupedBars { x: C::Department, color: C::Attrition },
    },
    Panel {
        number: 2,
        title: "Attrition by Job Role",
        description: "Visualize which job roles have higher attrition.",
        chart: ChartSpec::GroupedBars { x: C::JobRole, color: C::Attrition },
    },
    Panel {
        number: 3,
        title: "Gender Distribution",
        description: "Understand the gender composition of the workforce.",
        chart: ChartSpec::Pie { names: C::Gender },
    },
    Panel {
        number: 4,
        title: "Attrition by Gender",
        description: "Compare attrition rate by gender.",
        chart: ChartSpec::GroupedBars { x: C::Gender, color: C::Attrition },
    },
    Panel {
        number: 5,
        title: "Monthly Income Distribution",
        description: "See how monthly income is distributed among employees.",
        chart: ChartSpec::Histogram {
            x: N::MonthlyIncome,
            binning: Binning::Count(30),
            color: C::Attrition,
        },
    },
    Panel {
        number: 6,
        title: "Education Field vs Attrition",
        description: "Examine how education field relates to attrition.",
        chart: ChartSpec::GroupedBars { x: C::EducationField, color: C::Attrition },
    },
    Panel {
        number: 7,
        title: "Attrition by Marital Status",
        description: "Analyze attrition patterns by marital status.",
        chart: ChartSpec::GroupedBars { x: C::MaritalStatus, color: C::Attrition },
    },
    Panel {
        number: 8,
        title: "Age vs Attrition",
        description: "Observe how age impacts employee attrition.",
        chart: ChartSpec::BoxPlot { x: C::Attrition, y: N::Age, color: C::Attrition },
    },
    Panel {
        number: 9,
        title: "Heatmap of Numeric Correlations",
        description: "Correlation between numeric variables.",
        chart: ChartSpec::CorrelationHeatmap,
    },
    Panel {
        number: 10,
        title: "Total Working Years vs Monthly Income",
        description: "Check if experience correlates with salary.",
        chart: ChartSpec::Scatter {
            x: N::TotalWorkingYears,
            y: N::MonthlyIncome,
            color: C::Attrition,
        },
    },
    Panel {
        number: 11,
        title: "Attrition by Overtime",
        description: "Visualize how overtime status affects attrition.",
        chart: ChartSpec::GroupedBars { x: C::OverTime, color: C::Attrition },
    },
    Panel {
        number: 12,
        title: "Job Satisfaction by Department",
        description: "Job satisfaction scores by department.",
        chart: ChartSpec::BoxPlot {
            x: C::Department,
            y: N::JobSatisfaction,
            color: C::Department,
        },
    },
    Panel {
        number: 13,
        title: "Performance Rating by Job Role",
        description: "Compare employee performance ratings across job roles.",
        chart: ChartSpec::BoxPlot {
            x: C::JobRole,
            y: N::PerformanceRating,
            color: C::Attrition,
        },
    },
    Panel {
        number: 14,
        title: "Work-Life Balance",
        description: "View Work-Life Balance scores.",
        chart: ChartSpec::Histogram {
            x: N::WorkLifeBalance,
            binning: Binning::Auto,
            color: C::Attrition,
        },
    },
    Panel {
        number: 15,
        title: "Years at Company",
        description: "Distribution of years at company.",
        chart: ChartSpec::Histogram {
            x: N::YearsAtCompany,
            binning: Binning::Count(20),
            color: C::Attrition,
        },
    },
    Panel {
        number: 16,
        title: "Training Times Last Year",
        description: "Number of training sessions attended.",
        chart: ChartSpec::Histogram {
            x: N::TrainingTimesLastYear,
            binning: Binning::Auto,
            color: C::Attrition,
        },
    },
    Panel {
        number: 17,
        title: "Environment Satisfaction vs Attrition",
        description: "Check if satisfaction with environment affects attrition.",
        chart: ChartSpec::BoxPlot {
            x: C::Attrition,
            y: N::EnvironmentSatisfaction,
            color: C::Attrition,
        },
    },
    Panel {
        number: 18,
        title: "Relationship Satisfaction",
        description: "Analyze employee satisfaction with workplace relationships.",
        chart: ChartSpec::Histogram {
            x: N::RelationshipSatisfaction,
            binning: Binning::Auto,
            color: C::Attrition,
        },
    },
    Panel {
        number: 19,
        title: "Overtime vs Work-Life Balance",
        description: "Cross analysis of overtime and work-life balance.",
        chart: ChartSpec::BoxPlot {
            x: C::OverTime,
            y: N::WorkLifeBalance,
            color: C::Attrition,
        },
    },
    Panel {
        number: 20,
        title: "Raw Data View",
        description: "Use filters from the sidebar to explore the dataset.",
        chart: ChartSpec::Table,
    },
];

// ---------------------------------------------------------------------------
// Computed chart data
// ---------------------------------------------------------------------------

/// One colour group's values, aligned with the chart's categories or bins.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoxGroup {
    /// Index into the chart's `categories`.
    pub category: usize,
    /// Colour group this box belongs to.
    pub group: String,
    pub summary: BoxSummary,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointSeries {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// Plot-ready data for one panel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    GroupedBars {
        categories: Vec<String>,
        series: Vec<Series>,
    },
    Pie {
        slices: Vec<(String, usize)>,
    },
    Histogram {
        edges: Vec<f64>,
        series: Vec<Series>,
    },
    BoxPlot {
        categories: Vec<String>,
        groups: Vec<String>,
        boxes: Vec<BoxGroup>,
    },
    Scatter {
        series: Vec<PointSeries>,
    },
    Heatmap {
        columns: Vec<String>,
        matrix: Vec<Vec<f64>>,
    },
    Table {
        rows: usize,
    },
}

impl ChartData {
    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match self {
            ChartData::GroupedBars { categories, .. } => categories.is_empty(),
            ChartData::Pie { slices } => slices.is_empty(),
            ChartData::Histogram { edges, .. } => edges.is_empty(),
            ChartData::BoxPlot { boxes, .. } => boxes.is_empty(),
            ChartData::Scatter { series } => series.is_empty(),
            ChartData::Heatmap { columns, .. } => columns.is_empty(),
            ChartData::Table { rows } => *rows == 0,
        }
    }
}

impl ChartSpec {
    /// Turn the view into plot-ready data. Pure; never fails.
    pub fn compute(&self, view: &FilteredView<'_>) -> ChartData {
        match *self {
            ChartSpec::GroupedBars { x, color } => grouped_counts(view, x, color),
            ChartSpec::Pie { names } => {
                let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
                for emp in view.iter() {
                    *counts.entry(emp.category(names)).or_default() += 1;
                }
                ChartData::Pie {
                    slices: counts.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
                }
            }
            ChartSpec::Histogram { x, binning, color } => histogram(view, x, binning, color),
            ChartSpec::BoxPlot { x, y, color } => box_plot(view, x, y, color),
            ChartSpec::Scatter { x, y, color } => {
                let mut groups: BTreeMap<&str, Vec<[f64; 2]>> = BTreeMap::new();
                for emp in view.iter() {
                    groups
                        .entry(emp.category(color))
                        .or_default()
                        .push([emp.numeric(x), emp.numeric(y)]);
                }
                ChartData::Scatter {
                    series: groups
                        .into_iter()
                        .map(|(name, points)| PointSeries { name: name.to_string(), points })
                        .collect(),
                }
            }
            ChartSpec::CorrelationHeatmap => correlation_matrix(view),
            ChartSpec::Table => ChartData::Table { rows: view.len() },
        }
    }
}

/// Sorted distinct values of `field` within the view.
fn distinct(view: &FilteredView<'_>, field: CategoryField) -> Vec<String> {
    view.iter()
        .map(|e| e.category(field))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn position(values: &[String], value: &str) -> usize {
    // Values come from `distinct` over the same view, so the lookup hits.
    values.binary_search_by(|v| v.as_str().cmp(value)).unwrap_or_default()
}

fn grouped_counts(view: &FilteredView<'_>, x: CategoryField, color: CategoryField) -> ChartData {
    let categories = distinct(view, x);
    let groups = distinct(view, color);
    let mut counts = vec![vec![0.0; categories.len()]; groups.len()];
    for emp in view.iter() {
        let g = position(&groups, emp.category(color));
        let c = position(&categories, emp.category(x));
        counts[g][c] += 1.0;
    }
    ChartData::GroupedBars {
        categories,
        series: groups
            .into_iter()
            .zip(counts)
            .map(|(name, values)| Series { name, values })
            .collect(),
    }
}

fn histogram(
    view: &FilteredView<'_>,
    x: NumericField,
    binning: Binning,
    color: CategoryField,
) -> ChartData {
    let all: Vec<f64> = view.iter().map(|e| e.numeric(x)).collect();
    let Some(edges) = stats::bin_edges(&all, binning) else {
        return ChartData::Histogram {
            edges: Vec::new(),
            series: Vec::new(),
        };
    };

    let mut by_group: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for emp in view.iter() {
        by_group.entry(emp.category(color)).or_default().push(emp.numeric(x));
    }
    let series = by_group
        .into_iter()
        .map(|(name, values)| Series {
            name: name.to_string(),
            values: stats::bin_counts(&values, &edges)
                .into_iter()
                .map(|c| c as f64)
                .collect(),
        })
        .collect();

    ChartData::Histogram { edges, series }
}

fn box_plot(
    view: &FilteredView<'_>,
    x: CategoryField,
    y: NumericField,
    color: CategoryField,
) -> ChartData {
    let categories = distinct(view, x);
    let groups = distinct(view, color);

    let mut values: BTreeMap<(usize, &str), Vec<f64>> = BTreeMap::new();
    for emp in view.iter() {
        let c = position(&categories, emp.category(x));
        values.entry((c, emp.category(color))).or_default().push(emp.numeric(y));
    }

    let boxes = values
        .into_iter()
        .filter_map(|((category, group), ys)| {
            stats::box_summary(&ys).map(|summary| BoxGroup {
                category,
                group: group.to_string(),
                summary,
            })
        })
        .collect();

    ChartData::BoxPlot {
        categories,
        groups,
        boxes,
    }
}

fn correlation_matrix(view: &FilteredView<'_>) -> ChartData {
    let columns = view.dataset().numeric_columns.clone();
    let values: Vec<Vec<f64>> = columns
        .iter()
        .map(|col| {
            view.iter()
                .map(|e| e.numeric_column(col).unwrap_or(f64::NAN))
                .collect()
        })
        .collect();

    let matrix = values
        .iter()
        .map(|a| values.iter().map(|b| stats::pearson(a, b)).collect())
        .collect();

    ChartData::Heatmap { columns, matrix }
}
