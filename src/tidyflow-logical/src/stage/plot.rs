//! Builders for plot stages.

use common_error::FlowResult;

use super::Stage;

/// Bar chart of `y_axis` against `x_axis`.
pub fn bar(x_axis: impl Into<String>, y_axis: impl Into<String>) -> FlowResult<Stage> {
    Stage::Bar {
        x_axis: x_axis.into(),
        y_axis: y_axis.into(),
    }
    .checked()
}

/// Box plot of `y_axis` grouped by `x_axis`.
pub fn box_plot(x_axis: impl Into<String>, y_axis: impl Into<String>) -> FlowResult<Stage> {
    Stage::BoxPlot {
        x_axis: x_axis.into(),
        y_axis: y_axis.into(),
    }
    .checked()
}

/// Dot plot counting values of `x_axis`.
pub fn dot(x_axis: impl Into<String>) -> FlowResult<Stage> {
    Stage::Dot {
        x_axis: x_axis.into(),
    }
    .checked()
}

/// Histogram of `column` with at most `bins` bins.
pub fn histogram(column: impl Into<String>, bins: u32) -> FlowResult<Stage> {
    Stage::Histogram {
        column: column.into(),
        bins,
    }
    .checked()
}

/// Scatter plot, optionally colored by a column.
pub fn scatter(
    x_axis: impl Into<String>,
    y_axis: impl Into<String>,
    color: Option<&str>,
) -> FlowResult<Stage> {
    Stage::Scatter {
        x_axis: x_axis.into(),
        y_axis: y_axis.into(),
        color: color.map(str::to_string),
    }
    .checked()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_parameters_checked() {
        for (x, y) in [("left", ""), ("", "right")] {
            assert!(bar(x, y).is_err());
            assert!(box_plot(x, y).is_err());
            assert!(scatter(x, y, None).is_err());
        }
        assert!(scatter("left", "right", Some("")).is_err());
        assert!(dot("").is_err());
        assert!(histogram("", 12).is_err());
        assert!(histogram("left", 0).is_err());
    }

    #[test]
    fn test_plot_stages_are_terminal() {
        let stage = scatter("left", "right", Some("blue")).unwrap();
        assert!(stage.input());
        assert!(!stage.output());
        assert!(stage.is_plot());
    }
}
