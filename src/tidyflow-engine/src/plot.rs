//! Chart specifications for plot stages.
//!
//! The engine never draws anything. Each plot stage turns its input frame
//! into a Vega-Lite style specification that the host renders.

use serde_json::{json, Value as JsonValue};

use common_error::{FlowError, FlowResult};
use tidyflow_logical::Stage;

use crate::dataframe::DataFrame;

/// Schema URL stamped on every specification.
pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v4.json";

/// Build the chart specification for a plot stage.
pub fn plot_spec(stage: &Stage, df: &DataFrame) -> FlowResult<JsonValue> {
    let values = JsonValue::Array(df.to_json_rows());
    let spec = match stage {
        Stage::Bar { x_axis, y_axis } => {
            df.require_columns([x_axis.as_str(), y_axis.as_str()])?;
            json!({
                "data": {"values": values},
                "mark": "bar",
                "encoding": {
                    "x": {"field": x_axis, "type": "ordinal"},
                    "y": {"field": y_axis, "type": "quantitative"}
                }
            })
        }
        Stage::BoxPlot { x_axis, y_axis } => {
            df.require_columns([x_axis.as_str(), y_axis.as_str()])?;
            json!({
                "data": {"values": values},
                "mark": {"type": "boxplot", "extent": 1.5},
                "encoding": {
                    "x": {"field": x_axis, "type": "ordinal"},
                    "y": {"field": y_axis, "type": "quantitative", "axis": {"title": y_axis}}
                }
            })
        }
        Stage::Dot { x_axis } => {
            df.require_columns([x_axis.as_str()])?;
            json!({
                "data": {"values": values},
                "mark": {"type": "circle", "opacity": 1},
                "transform": [{
                    "window": [{"op": "rank", "as": "id"}],
                    "groupby": [x_axis]
                }],
                "encoding": {
                    "x": {"field": x_axis, "type": "ordinal"},
                    "y": {"field": "id", "type": "ordinal", "axis": null, "sort": "descending"}
                }
            })
        }
        Stage::Histogram { column, bins } => {
            df.require_columns([column.as_str()])?;
            json!({
                "data": {"values": values},
                "mark": "bar",
                "encoding": {
                    "x": {"bin": {"maxbins": bins}, "field": column, "type": "quantitative"},
                    "y": {"aggregate": "count", "type": "quantitative"},
                    "tooltip": null
                }
            })
        }
        Stage::Scatter {
            x_axis,
            y_axis,
            color,
        } => {
            df.require_columns([x_axis.as_str(), y_axis.as_str()])?;
            let mut spec = json!({
                "data": {"values": values},
                "mark": "point",
                "encoding": {
                    "x": {"field": x_axis, "type": "quantitative"},
                    "y": {"field": y_axis, "type": "quantitative"}
                }
            });
            if let Some(color) = color {
                df.require_columns([color.as_str()])?;
                spec["encoding"]["color"] = json!({"field": color, "type": "nominal"});
            }
            spec
        }
        other => {
            return Err(FlowError::internal(format!(
                "{} is not a plot stage",
                other.name()
            )))
        }
    };
    Ok(with_schema(spec))
}

fn with_schema(mut spec: JsonValue) -> JsonValue {
    if let Some(object) = spec.as_object_mut() {
        object.insert("$schema".to_string(), json!(VEGA_LITE_SCHEMA));
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidyflow_core::testing::number_rows;
    use tidyflow_logical::stage::{plot, pipe};

    fn numbers() -> DataFrame {
        DataFrame::new(number_rows()).unwrap()
    }

    #[test]
    fn test_bar() {
        let df = numbers();
        let spec = plot_spec(&plot::bar("left", "right").unwrap(), &df).unwrap();
        assert_eq!(spec["mark"], "bar");
        assert_eq!(spec["encoding"]["x"]["field"], "left");
        assert_eq!(spec["encoding"]["y"]["field"], "right");
        assert_eq!(spec["data"]["values"], JsonValue::Array(df.to_json_rows()));
        assert_eq!(spec["data"]["values"][3], json!({"left": null, "right": 3}));
        assert_eq!(spec["$schema"], VEGA_LITE_SCHEMA);
    }

    #[test]
    fn test_box() {
        let spec = plot_spec(&plot::box_plot("left", "right").unwrap(), &numbers()).unwrap();
        assert_eq!(spec["mark"]["type"], "boxplot");
        assert_eq!(spec["encoding"]["x"]["field"], "left");
        assert_eq!(spec["encoding"]["y"]["field"], "right");
    }

    #[test]
    fn test_dot() {
        let spec = plot_spec(&plot::dot("left").unwrap(), &numbers()).unwrap();
        assert_eq!(spec["mark"]["type"], "circle");
        assert_eq!(spec["encoding"]["x"]["field"], "left");
        assert_eq!(spec["transform"][0]["groupby"], json!(["left"]));
    }

    #[test]
    fn test_histogram() {
        let spec = plot_spec(&plot::histogram("left", 7).unwrap(), &numbers()).unwrap();
        assert_eq!(spec["mark"], "bar");
        assert_eq!(spec["encoding"]["x"]["field"], "left");
        assert_eq!(spec["encoding"]["x"]["bin"]["maxbins"], 7);
    }

    #[test]
    fn test_scatter_color_is_optional() {
        let plain = plot_spec(&plot::scatter("left", "right", None).unwrap(), &numbers()).unwrap();
        assert_eq!(plain["mark"], "point");
        assert!(plain["encoding"].get("color").is_none());

        let colored =
            plot_spec(&plot::scatter("left", "right", Some("right")).unwrap(), &numbers()).unwrap();
        assert_eq!(colored["encoding"]["color"]["field"], "right");
    }

    #[test]
    fn test_missing_axis_column() {
        let err = plot_spec(&plot::bar("left", "nope").unwrap(), &numbers()).unwrap_err();
        assert!(matches!(err, FlowError::ColumnNotFound(_)));
    }

    #[test]
    fn test_non_plot_stage() {
        let err = plot_spec(&pipe::ungroup().unwrap(), &numbers()).unwrap_err();
        assert!(matches!(err, FlowError::InternalError(_)));
    }
}
