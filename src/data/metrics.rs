use super::filter::FilteredView;

/// Headline numbers shown above the charts.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Metrics {
    pub count: usize,
    /// Share of employees with `Attrition == "Yes"`, in percent. 0 for an empty view.
    pub attrition_rate_percent: f64,
    /// Mean `MonthlyIncome`. 0 for an empty view.
    pub avg_monthly_income: f64,
}

impl Metrics {
    /// Rate as shown in the metric card, e.g. `"16.12"`.
    pub fn attrition_rate_label(&self) -> String {
        format!("{:.2}", self.attrition_rate_percent)
    }

    /// Income as whole dollars with thousands separators, e.g. `"$6,503"`.
    pub fn avg_income_label(&self) -> String {
        format!("${}", group_thousands(self.avg_monthly_income.round() as i64))
    }
}

pub fn compute_metrics(view: &FilteredView<'_>) -> Metrics {
    if view.is_empty() {
        return Metrics::default();
    }
    let count = view.len();

    let (left, income) = view
        .iter()
        .fold((0usize, 0.0f64), |(left, income), emp| {
            (left + emp.has_left() as usize, income + emp.monthly_income)
        });

    Metrics {
        count,
        attrition_rate_percent: 100.0 * left as f64 / count as f64,
        avg_monthly_income: income / count as f64,
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
