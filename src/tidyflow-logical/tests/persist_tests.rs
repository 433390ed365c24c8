//! Round-trip tests for the JSON document format.

use proptest::prelude::*;
use serde_json::{json, Value as JsonValue};
use tidyflow_core::Value;
use tidyflow_logical::persist::{
    expr_to_json, json_to_expr, json_to_pipeline, json_to_program, json_to_stage,
    pipeline_to_json, program_to_json, stage_to_json,
};
use tidyflow_logical::stage::{pipe, plot, stats};
use tidyflow_logical::*;

fn constant(value: JsonValue) -> JsonValue {
    json!({"kind": "constant", "constant": value})
}

fn assert_stage_round_trip(fixture: JsonValue) {
    let stage = json_to_stage(&fixture).unwrap();
    assert_eq!(stage_to_json(&stage).unwrap(), fixture);
}

#[test]
fn test_restores_every_operation() {
    let child = constant(json!(123));
    for op in UnaryOp::ALL {
        let fixture = json!({"kind": "unary", "op": op.as_str(), "child": child});
        let expr = json_to_expr(&fixture).unwrap();
        assert_eq!(expr, Expr::unary(op, lit(123)));
        assert_eq!(expr_to_json(&expr).unwrap(), fixture);
    }
    for op in BinaryOp::ALL {
        let fixture = json!({"kind": "binary", "op": op.as_str(), "left": child, "right": child});
        let expr = json_to_expr(&fixture).unwrap();
        assert_eq!(expr, Expr::binary(op, lit(123), lit(123)));
        assert_eq!(expr_to_json(&expr).unwrap(), fixture);
    }
    let fixture = json!({"kind": "ternary", "op": "ifElse",
                         "left": child, "middle": child, "right": child});
    let expr = json_to_expr(&fixture).unwrap();
    assert_eq!(expr, Expr::if_else(lit(123), lit(123), lit(123)));
    assert_eq!(expr_to_json(&expr).unwrap(), fixture);
}

#[test]
fn test_restores_constants_and_values() {
    let fixture = constant(json!("something"));
    assert_eq!(json_to_expr(&fixture).unwrap(), lit("something"));
    let fixture = json!({"kind": "value", "value": "blue"});
    assert_eq!(json_to_expr(&fixture).unwrap(), col("blue"));
    let fixture = constant(json!({"datetime": "1983-12-02T07:55:19.000Z"}));
    let expr = json_to_expr(&fixture).unwrap();
    assert!(matches!(
        expr,
        Expr::Constant {
            constant: Value::Datetime(_)
        }
    ));
    assert_eq!(expr_to_json(&expr).unwrap(), fixture);
}

#[test]
fn test_restores_data_stages() {
    let columns = json!(["left", "right"]);
    let op = constant(json!(true));
    for fixture in [
        json!({"kind": "stage", "name": "drop", "columns": columns}),
        json!({"kind": "stage", "name": "filter", "op": op}),
        json!({"kind": "stage", "name": "groupBy", "columns": columns}),
        json!({"kind": "stage", "name": "join", "leftName": "before", "leftCol": "red",
               "rightName": "after", "rightCol": "blue"}),
        json!({"kind": "stage", "name": "mutate", "newName": "finished", "op": op}),
        json!({"kind": "stage", "name": "notify", "label": "signal"}),
        json!({"kind": "stage", "name": "read", "path": "/to/file"}),
        json!({"kind": "stage", "name": "select", "columns": columns}),
        json!({"kind": "stage", "name": "sort", "columns": columns, "reverse": true}),
        json!({"kind": "stage", "name": "summarize", "action": "stdDev", "column": "red"}),
        json!({"kind": "stage", "name": "ungroup"}),
        json!({"kind": "stage", "name": "unique", "columns": columns}),
    ] {
        assert_stage_round_trip(fixture);
    }
}

#[test]
fn test_restores_plot_stages() {
    for fixture in [
        json!({"kind": "stage", "name": "bar", "x_axis": "age", "y_axis": "height"}),
        json!({"kind": "stage", "name": "box", "x_axis": "age", "y_axis": "height"}),
        json!({"kind": "stage", "name": "dot", "x_axis": "age"}),
        json!({"kind": "stage", "name": "histogram", "column": "age", "bins": 17}),
        json!({"kind": "stage", "name": "scatter", "x_axis": "age", "y_axis": "height",
               "color": "vermilion"}),
        json!({"kind": "stage", "name": "scatter", "x_axis": "age", "y_axis": "height",
               "color": null}),
    ] {
        assert_stage_round_trip(fixture);
    }
}

#[test]
fn test_restores_statistics_stages() {
    for fixture in [
        json!({"kind": "stage", "name": "ANOVA", "significance": 0.03,
               "groupName": "red", "valueName": "blue"}),
        json!({"kind": "stage", "name": "KolmogorovSmirnov", "mean": 0.1, "stdDev": 0.3,
               "significance": 0.03, "colName": "red"}),
        json!({"kind": "stage", "name": "KruskalWallis", "significance": 0.03,
               "groupName": "red", "valueName": "blue"}),
        json!({"kind": "stage", "name": "TTestOneSample", "mean": 0.1,
               "significance": 0.03, "colName": "red"}),
        json!({"kind": "stage", "name": "TTestPaired", "significance": 0.03,
               "leftCol": "green", "rightCol": "blue"}),
        json!({"kind": "stage", "name": "ZTestOneSample", "mean": 0.1, "stdDev": 0.04,
               "significance": 0.03, "colName": "red"}),
    ] {
        assert_stage_round_trip(fixture);
    }
}

#[test]
fn test_stage_builders_match_restored_stages() {
    let restored = json_to_stage(&json!({"kind": "stage", "name": "box",
                                         "x_axis": "age", "y_axis": "height"}))
    .unwrap();
    assert_eq!(restored, plot::box_plot("age", "height").unwrap());
    let restored = json_to_stage(&json!({"kind": "stage", "name": "TTestPaired",
                                         "significance": 0.03,
                                         "leftCol": "green", "rightCol": "blue"}))
    .unwrap();
    assert_eq!(restored, stats::t_test_paired(0.03, "green", "blue").unwrap());
}

#[test]
fn test_sort_requires_reverse() {
    let fixture = json!({"kind": "stage", "name": "sort", "columns": ["left"]});
    let err = json_to_stage(&fixture).unwrap_err();
    assert!(err.to_string().contains("reverse"), "{err}");
    assert_stage_round_trip(json!({"kind": "stage", "name": "sort",
                                   "columns": ["left"], "reverse": false}));
}

#[test]
fn test_scatter_requires_color() {
    let fixture = json!({"kind": "stage", "name": "scatter",
                         "x_axis": "age", "y_axis": "height"});
    let err = json_to_stage(&fixture).unwrap_err();
    assert!(err.to_string().contains("color"), "{err}");
    assert_eq!(
        stage_to_json(&plot::scatter("age", "height", None).unwrap()).unwrap(),
        json!({"kind": "stage", "name": "scatter", "x_axis": "age", "y_axis": "height",
               "color": null})
    );
}

#[test]
fn test_datetime_constant_must_be_canonical() {
    let fixture = constant(json!({"datetime": "1983-12-02T07:55:19Z"}));
    assert!(json_to_expr(&fixture).is_err());
    let fixture = json!({"kind": "stage", "name": "filter",
                         "op": {"kind": "binary", "op": "less",
                                "left": {"kind": "value", "value": "when"},
                                "right": constant(json!({"datetime": "1983-12-02"}))}});
    assert!(json_to_stage(&fixture).is_err());
}

#[test]
fn test_stage_rejects_unknown_fields() {
    let fixture = json!({"kind": "stage", "name": "read", "path": "a.csv", "bogus": 1});
    let err = json_to_stage(&fixture).unwrap_err();
    assert!(err.to_string().contains("bogus"), "{err}");
    let fixture = json!({"kind": "stage", "name": "ungroup", "columns": ["red"]});
    assert!(json_to_stage(&fixture).is_err());
    let fixture = json!([[{"kind": "stage", "name": "read", "path": "a.csv", "extra": true}]]);
    assert!(json_to_program(&fixture).is_err());
}

#[test]
fn test_expression_rejects_unknown_fields() {
    let fixture = json!({"kind": "value", "value": "red", "alias": "r"});
    assert!(json_to_expr(&fixture).is_err());
    let nested = json!({"kind": "stage", "name": "filter",
                        "op": {"kind": "unary", "op": "not",
                               "child": {"kind": "constant", "constant": true, "note": 1}}});
    let err = json_to_stage(&nested).unwrap_err();
    assert!(err.to_string().contains("note"), "{err}");
}

#[test]
fn test_pipeline_to_json() {
    let pipeline = PipelineBuilder::start(pipe::read("/path/to/file"))
        .then(pipe::sort(["left"], true))
        .build()
        .unwrap();
    assert_eq!(
        pipeline_to_json(&pipeline).unwrap(),
        json!([
            {"kind": "stage", "name": "read", "path": "/path/to/file"},
            {"kind": "stage", "name": "sort", "columns": ["left"], "reverse": true}
        ])
    );
}

#[test]
fn test_json_to_pipeline_round_trip() {
    let fixture = json!([
        {"kind": "stage", "name": "read", "path": "colors.csv"},
        {"kind": "stage", "name": "sort", "columns": ["name"], "reverse": true}
    ]);
    let pipeline = json_to_pipeline(&fixture).unwrap();
    assert_eq!(pipeline.len(), 2);
    assert_eq!(pipeline_to_json(&pipeline).unwrap(), fixture);
}

#[test]
fn test_program_round_trip() {
    let fixture = json!([
        [{"kind": "stage", "name": "read", "path": "colors.csv"}],
        [{"kind": "stage", "name": "read", "path": "colors.csv"},
         {"kind": "stage", "name": "unique", "columns": ["red"]}],
        [{"kind": "stage", "name": "read", "path": "colors.csv"},
         {"kind": "stage", "name": "notify", "label": "signal"}]
    ]);
    let program = json_to_program(&fixture).unwrap();
    assert_eq!(program.len(), 3);
    assert_eq!(program_to_json(&program).unwrap(), fixture);
}

#[test]
fn test_program_rejects_non_arrays() {
    assert!(json_to_program(&json!({"pipelines": []})).is_err());
    assert!(json_to_program(&json!([{"kind": "stage"}])).is_err());
}

// =========================================================================
// Property tests
// =========================================================================

fn arb_constant() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Missing),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(Value::from),
        (-1000i32..1000).prop_map(|i| Value::Number(f64::from(i) / 4.0)),
        "[a-zA-Z0-9 ]{0,12}".prop_map(Value::Text),
    ]
}

fn arb_expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        arb_constant().prop_map(Expr::constant),
        "[a-z]{1,8}".prop_map(Expr::column),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (prop::sample::select(UnaryOp::ALL.to_vec()), inner.clone())
                .prop_map(|(op, c)| Expr::unary(op, c)),
            (
                prop::sample::select(BinaryOp::ALL.to_vec()),
                inner.clone(),
                inner.clone()
            )
                .prop_map(|(op, l, r)| Expr::binary(op, l, r)),
            (inner.clone(), inner.clone(), inner)
                .prop_map(|(c, t, e)| Expr::if_else(c, t, e)),
        ]
    })
}

proptest! {
    /// Rebuilding an expression from its JSON yields the same tree.
    #[test]
    fn expr_json_roundtrip(expr in arb_expr()) {
        let json = expr_to_json(&expr).unwrap();
        let restored = json_to_expr(&json).unwrap();
        prop_assert_eq!(&restored, &expr);
        prop_assert_eq!(expr_to_json(&restored).unwrap(), json);
    }

    /// Serde and the checked loader agree on every generated expression.
    #[test]
    fn expr_loader_matches_serde(expr in arb_expr()) {
        let json = expr_to_json(&expr).unwrap();
        let via_serde: Expr = serde_json::from_value(json.clone()).unwrap();
        prop_assert_eq!(via_serde, json_to_expr(&json).unwrap());
    }
}
