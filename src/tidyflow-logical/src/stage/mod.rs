//! Pipeline stages.
//!
//! A [`Stage`] is the persisted description of one pipeline step. The engine
//! decides how to run it; this module owns its metadata (dependencies,
//! published name, input and output) and its parameter validation.

pub mod pipe;
pub mod plot;
pub mod stats;

use serde::{Deserialize, Deserializer, Serialize};

use common_error::{ensure, FlowResult};
use tidyflow_core::is_reserved;
use tidyflow_core::types::serialize_number;

use crate::expr::Expr;

/// Summary computed by the summarize stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SummaryOp {
    /// Number of rows.
    Count,
    /// Largest value.
    Maximum,
    /// Arithmetic mean.
    Mean,
    /// Middle element of the sorted values.
    Median,
    /// Smallest value.
    Minimum,
    /// Population standard deviation.
    StdDev,
    /// Total.
    Sum,
    /// Population variance.
    Variance,
}

impl SummaryOp {
    /// Name used as the suffix of the generated column.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Maximum => "maximum",
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Minimum => "minimum",
            Self::StdDev => "stdDev",
            Self::Sum => "sum",
            Self::Variance => "variance",
        }
    }
}

/// One step of a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Stage {
    // Data stages
    /// Load rows from the host.
    Read { path: String },
    /// Remove columns.
    Drop { columns: Vec<String> },
    /// Keep only the named columns.
    Select { columns: Vec<String> },
    /// Keep rows whose predicate is exactly true.
    Filter { op: Expr },
    /// Mark rows with a group id.
    GroupBy { columns: Vec<String> },
    /// Remove group ids.
    Ungroup {},
    /// Keep the first row for each distinct key.
    Unique { columns: Vec<String> },
    /// Stable multi-key sort.
    Sort { columns: Vec<String>, reverse: bool },
    /// Add or replace a computed column.
    Mutate { new_name: String, op: Expr },
    /// Inner equi-join of two published results.
    Join {
        left_name: String,
        left_col: String,
        right_name: String,
        right_col: String,
    },
    /// Publish the incoming frame under a label.
    Notify { label: String },
    /// Add a summary column.
    Summarize { action: SummaryOp, column: String },

    // Plot stages
    /// Bar chart.
    Bar {
        #[serde(rename = "x_axis")]
        x_axis: String,
        #[serde(rename = "y_axis")]
        y_axis: String,
    },
    /// Box plot.
    #[serde(rename = "box")]
    BoxPlot {
        #[serde(rename = "x_axis")]
        x_axis: String,
        #[serde(rename = "y_axis")]
        y_axis: String,
    },
    /// Dot plot.
    Dot {
        #[serde(rename = "x_axis")]
        x_axis: String,
    },
    /// Histogram.
    Histogram { column: String, bins: u32 },
    /// Scatter plot, optionally colored by a column.
    Scatter {
        #[serde(rename = "x_axis")]
        x_axis: String,
        #[serde(rename = "y_axis")]
        y_axis: String,
        #[serde(deserialize_with = "nullable")]
        color: Option<String>,
    },

    // Statistics stages
    /// One-way analysis of variance.
    #[serde(rename = "ANOVA")]
    Anova {
        #[serde(serialize_with = "serialize_number")]
        significance: f64,
        group_name: String,
        value_name: String,
    },
    /// Kolmogorov-Smirnov test against a normal distribution.
    #[serde(rename = "KolmogorovSmirnov")]
    KolmogorovSmirnov {
        #[serde(serialize_with = "serialize_number")]
        mean: f64,
        #[serde(serialize_with = "serialize_number")]
        std_dev: f64,
        #[serde(serialize_with = "serialize_number")]
        significance: f64,
        col_name: String,
    },
    /// Kruskal-Wallis rank test.
    #[serde(rename = "KruskalWallis")]
    KruskalWallis {
        #[serde(serialize_with = "serialize_number")]
        significance: f64,
        group_name: String,
        value_name: String,
    },
    /// One-sample t test.
    #[serde(rename = "TTestOneSample")]
    TTestOneSample {
        #[serde(serialize_with = "serialize_number")]
        mean: f64,
        #[serde(serialize_with = "serialize_number")]
        significance: f64,
        col_name: String,
    },
    /// Paired two-sided t test.
    #[serde(rename = "TTestPaired")]
    TTestPaired {
        #[serde(serialize_with = "serialize_number")]
        significance: f64,
        left_col: String,
        right_col: String,
    },
    /// One-sample z test.
    #[serde(rename = "ZTestOneSample")]
    ZTestOneSample {
        #[serde(serialize_with = "serialize_number")]
        mean: f64,
        #[serde(serialize_with = "serialize_number")]
        std_dev: f64,
        #[serde(serialize_with = "serialize_number")]
        significance: f64,
        col_name: String,
    },
}

impl Stage {
    /// Every stage name accepted by the JSON protocol.
    pub const NAMES: [&'static str; 23] = [
        "read",
        "drop",
        "select",
        "filter",
        "groupBy",
        "ungroup",
        "unique",
        "sort",
        "mutate",
        "join",
        "notify",
        "summarize",
        "bar",
        "box",
        "dot",
        "histogram",
        "scatter",
        "ANOVA",
        "KolmogorovSmirnov",
        "KruskalWallis",
        "TTestOneSample",
        "TTestPaired",
        "ZTestOneSample",
    ];

    /// Wire name of this stage.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Read { .. } => "read",
            Self::Drop { .. } => "drop",
            Self::Select { .. } => "select",
            Self::Filter { .. } => "filter",
            Self::GroupBy { .. } => "groupBy",
            Self::Ungroup {} => "ungroup",
            Self::Unique { .. } => "unique",
            Self::Sort { .. } => "sort",
            Self::Mutate { .. } => "mutate",
            Self::Join { .. } => "join",
            Self::Notify { .. } => "notify",
            Self::Summarize { .. } => "summarize",
            Self::Bar { .. } => "bar",
            Self::BoxPlot { .. } => "box",
            Self::Dot { .. } => "dot",
            Self::Histogram { .. } => "histogram",
            Self::Scatter { .. } => "scatter",
            Self::Anova { .. } => "ANOVA",
            Self::KolmogorovSmirnov { .. } => "KolmogorovSmirnov",
            Self::KruskalWallis { .. } => "KruskalWallis",
            Self::TTestOneSample { .. } => "TTestOneSample",
            Self::TTestPaired { .. } => "TTestPaired",
            Self::ZTestOneSample { .. } => "ZTestOneSample",
        }
    }

    /// Names of results this stage needs before its pipeline can run.
    ///
    /// Only meaningful on the first stage of a pipeline.
    pub fn requires(&self) -> Vec<String> {
        match self {
            Self::Join {
                left_name,
                right_name,
                ..
            } => vec![left_name.clone(), right_name.clone()],
            _ => Vec::new(),
        }
    }

    /// Name the pipeline's result is published under.
    ///
    /// Only meaningful on the last stage of a pipeline.
    pub fn produces(&self) -> Option<&str> {
        match self {
            Self::Notify { label } => Some(label),
            _ => None,
        }
    }

    /// Whether the stage consumes a dataframe.
    pub const fn input(&self) -> bool {
        !matches!(self, Self::Read { .. } | Self::Join { .. })
    }

    /// Whether the stage produces a dataframe.
    pub const fn output(&self) -> bool {
        !(self.is_plot() || self.is_stats())
    }

    /// Check if this stage builds a chart specification.
    pub const fn is_plot(&self) -> bool {
        matches!(
            self,
            Self::Bar { .. }
                | Self::BoxPlot { .. }
                | Self::Dot { .. }
                | Self::Histogram { .. }
                | Self::Scatter { .. }
        )
    }

    /// Check if this stage runs a statistical test.
    pub const fn is_stats(&self) -> bool {
        matches!(
            self,
            Self::Anova { .. }
                | Self::KolmogorovSmirnov { .. }
                | Self::KruskalWallis { .. }
                | Self::TTestOneSample { .. }
                | Self::TTestPaired { .. }
                | Self::ZTestOneSample { .. }
        )
    }

    /// Check every parameter, as the builders do.
    pub fn validate(&self) -> FlowResult<()> {
        match self {
            Self::Read { path } => check_text("path", path),
            Self::Drop { columns }
            | Self::Select { columns }
            | Self::GroupBy { columns }
            | Self::Unique { columns }
            | Self::Sort { columns, .. } => check_columns(self.name(), columns),
            Self::Filter { op } => op.validate(),
            Self::Ungroup {} => Ok(()),
            Self::Mutate { new_name, op } => {
                check_column("newName", new_name)?;
                op.validate()
            }
            Self::Join {
                left_name,
                left_col,
                right_name,
                right_col,
            } => {
                check_text("leftName", left_name)?;
                check_column("leftCol", left_col)?;
                check_text("rightName", right_name)?;
                check_column("rightCol", right_col)?;
                ensure!(
                    left_name != right_name,
                    InvalidParameter: "join needs two different results, got '{left_name}' twice"
                );
                Ok(())
            }
            Self::Notify { label } => check_text("label", label),
            Self::Summarize { column, .. } => check_column("column", column),
            Self::Bar { x_axis, y_axis } | Self::BoxPlot { x_axis, y_axis } => {
                check_column("x_axis", x_axis)?;
                check_column("y_axis", y_axis)
            }
            Self::Dot { x_axis } => check_column("x_axis", x_axis),
            Self::Histogram { column, bins } => {
                check_column("column", column)?;
                ensure!(*bins > 0, InvalidParameter: "histogram bins must be a positive integer");
                Ok(())
            }
            Self::Scatter {
                x_axis,
                y_axis,
                color,
            } => {
                check_column("x_axis", x_axis)?;
                check_column("y_axis", y_axis)?;
                color
                    .as_deref()
                    .map_or(Ok(()), |c| check_column("color", c))
            }
            Self::Anova {
                significance,
                group_name,
                value_name,
            }
            | Self::KruskalWallis {
                significance,
                group_name,
                value_name,
            } => {
                check_significance(*significance)?;
                check_column("groupName", group_name)?;
                check_column("valueName", value_name)
            }
            Self::KolmogorovSmirnov {
                mean,
                std_dev,
                significance,
                col_name,
            }
            | Self::ZTestOneSample {
                mean,
                std_dev,
                significance,
                col_name,
            } => {
                check_finite("mean", *mean)?;
                check_std_dev(*std_dev)?;
                check_significance(*significance)?;
                check_column("colName", col_name)
            }
            Self::TTestOneSample {
                mean,
                significance,
                col_name,
            } => {
                check_finite("mean", *mean)?;
                check_significance(*significance)?;
                check_column("colName", col_name)
            }
            Self::TTestPaired {
                significance,
                left_col,
                right_col,
            } => {
                check_significance(*significance)?;
                check_column("leftCol", left_col)?;
                check_column("rightCol", right_col)
            }
        }
    }

    /// One-line description: `name: {remaining fields as JSON}`.
    pub fn pretty(&self) -> String {
        let fields = match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(mut map)) => {
                map.remove("name");
                serde_json::Value::Object(map).to_string()
            }
            _ => "{}".to_string(),
        };
        format!("{}: {fields}", self.name())
    }

    /// Validate and return the stage, for use by builders.
    pub(crate) fn checked(self) -> FlowResult<Self> {
        self.validate()?;
        Ok(self)
    }
}

/// Deserialize an optional field that must still be present, possibly as `null`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

fn check_text(what: &str, value: &str) -> FlowResult<()> {
    ensure!(!value.is_empty(), InvalidParameter: "{what} must be a non-empty string");
    Ok(())
}

fn check_column(what: &str, name: &str) -> FlowResult<()> {
    check_text(what, name)?;
    ensure!(!is_reserved(name), InvalidParameter: "{what} cannot use reserved column '{name}'");
    Ok(())
}

fn check_columns(stage: &str, columns: &[String]) -> FlowResult<()> {
    ensure!(!columns.is_empty(), InvalidParameter: "{stage} requires at least one column");
    columns.iter().try_for_each(|c| check_column("columns", c))
}

fn check_finite(what: &str, value: f64) -> FlowResult<()> {
    ensure!(value.is_finite(), InvalidParameter: "{what} must be a finite number");
    Ok(())
}

fn check_significance(value: f64) -> FlowResult<()> {
    ensure!(
        value > 0.0 && value < 1.0,
        InvalidParameter: "significance {value} must lie strictly between 0 and 1"
    );
    Ok(())
}

fn check_std_dev(value: f64) -> FlowResult<()> {
    ensure!(
        value.is_finite() && value > 0.0,
        InvalidParameter: "standard deviation {value} must be positive"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_error::FlowError;
    use crate::expr::{col, lit};
    use serde_json::json;

    #[test]
    fn test_pretty_prints_fields() {
        let stage = Stage::Read {
            path: "colors.csv".into(),
        };
        assert_eq!(stage.pretty(), r#"read: {"path":"colors.csv"}"#);
        assert_eq!(Stage::Ungroup {}.pretty(), "ungroup: {}");
    }

    #[test]
    fn test_metadata() {
        let join = Stage::Join {
            left_name: "alpha".into(),
            left_col: "red".into(),
            right_name: "beta".into(),
            right_col: "green".into(),
        };
        assert_eq!(join.requires(), vec!["alpha", "beta"]);
        assert!(!join.input());
        assert!(join.output());

        let notify = Stage::Notify {
            label: "final".into(),
        };
        assert_eq!(notify.produces(), Some("final"));
        assert!(notify.input());

        let plot = Stage::Dot {
            x_axis: "red".into(),
        };
        assert!(plot.input());
        assert!(!plot.output());
    }

    #[test]
    fn test_serialized_names() {
        let stage = Stage::BoxPlot {
            x_axis: "age".into(),
            y_axis: "height".into(),
        };
        assert_eq!(
            serde_json::to_value(&stage).unwrap(),
            json!({"name": "box", "x_axis": "age", "y_axis": "height"})
        );
        let stage = Stage::Mutate {
            new_name: "finished".into(),
            op: lit(true),
        };
        assert_eq!(
            serde_json::to_value(&stage).unwrap(),
            json!({"name": "mutate", "newName": "finished",
                   "op": {"kind": "constant", "constant": true}})
        );
    }

    #[test]
    fn test_integral_parameters_written_as_integers() {
        let stage = Stage::ZTestOneSample {
            mean: 1.0,
            std_dev: 0.5,
            significance: 0.05,
            col_name: "blue".into(),
        };
        assert_eq!(
            serde_json::to_value(&stage).unwrap(),
            json!({"name": "ZTestOneSample", "mean": 1, "stdDev": 0.5,
                   "significance": 0.05, "colName": "blue"})
        );
    }

    #[test]
    fn test_names_cover_every_variant() {
        let stage = Stage::Filter {
            op: col("red").gt(lit(0)),
        };
        assert!(Stage::NAMES.contains(&stage.name()));
        assert!(Stage::NAMES.contains(&"ZTestOneSample"));
    }

    #[test]
    fn test_join_of_one_result_with_itself_rejected() {
        let stage = Stage::Join {
            left_name: "alpha".into(),
            left_col: "red".into(),
            right_name: "alpha".into(),
            right_col: "green".into(),
        };
        assert!(matches!(
            stage.validate(),
            Err(FlowError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_significance() {
        let stage = Stage::TTestPaired {
            significance: 1.5,
            left_col: "a".into(),
            right_col: "b".into(),
        };
        assert!(matches!(
            stage.validate(),
            Err(FlowError::InvalidParameter(_))
        ));
    }
}
