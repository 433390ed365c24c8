//! Builders for statistical-test stages.
//!
//! The tests themselves are computed by the host; these builders only check
//! parameters. Significance must lie strictly between 0 and 1 and standard
//! deviations must be positive.

use common_error::FlowResult;

use super::Stage;

/// One-way ANOVA of `value_name` across groups in `group_name`.
pub fn anova(
    significance: f64,
    group_name: impl Into<String>,
    value_name: impl Into<String>,
) -> FlowResult<Stage> {
    Stage::Anova {
        significance,
        group_name: group_name.into(),
        value_name: value_name.into(),
    }
    .checked()
}

/// Kolmogorov-Smirnov test of `col_name` against a normal distribution.
pub fn kolmogorov_smirnov(
    mean: f64,
    std_dev: f64,
    significance: f64,
    col_name: impl Into<String>,
) -> FlowResult<Stage> {
    Stage::KolmogorovSmirnov {
        mean,
        std_dev,
        significance,
        col_name: col_name.into(),
    }
    .checked()
}

/// Kruskal-Wallis test of `value_name` across groups in `group_name`.
pub fn kruskal_wallis(
    significance: f64,
    group_name: impl Into<String>,
    value_name: impl Into<String>,
) -> FlowResult<Stage> {
    Stage::KruskalWallis {
        significance,
        group_name: group_name.into(),
        value_name: value_name.into(),
    }
    .checked()
}

/// One-sample t test of `col_name` against `mean`.
pub fn t_test_one_sample(
    mean: f64,
    significance: f64,
    col_name: impl Into<String>,
) -> FlowResult<Stage> {
    Stage::TTestOneSample {
        mean,
        significance,
        col_name: col_name.into(),
    }
    .checked()
}

/// Paired two-sided t test of two columns.
pub fn t_test_paired(
    significance: f64,
    left_col: impl Into<String>,
    right_col: impl Into<String>,
) -> FlowResult<Stage> {
    Stage::TTestPaired {
        significance,
        left_col: left_col.into(),
        right_col: right_col.into(),
    }
    .checked()
}

/// One-sample z test of `col_name`.
pub fn z_test_one_sample(
    mean: f64,
    std_dev: f64,
    significance: f64,
    col_name: impl Into<String>,
) -> FlowResult<Stage> {
    Stage::ZTestOneSample {
        mean,
        std_dev,
        significance,
        col_name: col_name.into(),
    }
    .checked()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_tests_build() {
        assert!(anova(0.05, "green", "blue").is_ok());
        assert!(kolmogorov_smirnov(0.01, 2.0, 0.75, "blue").is_ok());
        assert!(kruskal_wallis(0.05, "green", "blue").is_ok());
        assert!(t_test_one_sample(0.0, 0.05, "blue").is_ok());
        assert!(t_test_paired(0.05, "blue", "blue").is_ok());
        assert!(z_test_one_sample(1.0, 0.5, 0.05, "blue").is_ok());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(anova(0.0, "green", "blue").is_err());
        assert!(anova(0.05, "", "blue").is_err());
        assert!(z_test_one_sample(1.0, 0.0, 0.05, "blue").is_err());
        assert!(kolmogorov_smirnov(f64::NAN, 1.0, 0.05, "blue").is_err());
        assert!(t_test_one_sample(0.0, 1.0, "blue").is_err());
    }

    #[test]
    fn test_stats_stages_are_terminal() {
        let stage = t_test_paired(0.05, "blue", "green").unwrap();
        assert!(stage.is_stats());
        assert!(!stage.output());
    }
}
