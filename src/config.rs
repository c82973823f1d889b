use std::path::PathBuf;

/// Environment variable that overrides the default data path.
pub const DATA_ENV_VAR: &str = "HR_DASHBOARD_DATA";

/// File read when neither a CLI argument nor the environment names one.
pub const DEFAULT_DATA_FILE: &str = "EA.csv";

/// Startup settings for the dashboard window.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// The fixed tabular source (`.csv`, `.json` or `.parquet`).
    pub data_path: PathBuf,
    /// Initial window size in logical points.
    pub window_size: [f32; 2],
    /// Smallest size the window may be resized to.
    pub min_window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_FILE),
            window_size: [1400.0, 900.0],
            min_window_size: [800.0, 500.0],
        }
    }
}

impl DashboardConfig {
    /// Resolve from the process arguments and environment.
    pub fn from_env() -> Self {
        Self::resolve(std::env::args().nth(1), std::env::var(DATA_ENV_VAR).ok())
    }

    /// The first CLI argument wins over the environment variable, which wins
    /// over [`DEFAULT_DATA_FILE`]. Blank values are ignored.
    pub fn resolve(arg: Option<String>, env: Option<String>) -> Self {
        let data_path = [arg, env]
            .into_iter()
            .flatten()
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        Self {
            data_path,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_beats_environment() {
        let cfg = DashboardConfig::resolve(Some("a.parquet".into()), Some("b.csv".into()));
        assert_eq!(cfg.data_path, PathBuf::from("a.parquet"));
    }

    #[test]
    fn environment_used_without_argument() {
        let cfg = DashboardConfig::resolve(None, Some("/data/hr.json".into()));
        assert_eq!(cfg.data_path, PathBuf::from("/data/hr.json"));
    }

    #[test]
    fn blank_values_fall_back_to_default() {
        let cfg = DashboardConfig::resolve(Some("  ".into()), Some(String::new()));
        assert_eq!(cfg, DashboardConfig::default());
    }
}
