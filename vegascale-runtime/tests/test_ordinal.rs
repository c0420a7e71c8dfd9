mod util;

#[cfg(test)]
mod test_ordinal {
    use crate::util::check::{chart, scalars};
    use rstest::rstest;
    use serde_json::json;
    use vegascale_common::data::scalar::ScalarValue;
    use vegascale_runtime::chart_state::ChartState;

    const DOMAIN: [&str; 4] = ["petalWidth", "petalLength", "sepalWidth", "sepalLength"];

    fn inversion_chart() -> ChartState {
        chart(json!({
            "scales": [
                {"name": "asc", "type": "ordinal", "domain": DOMAIN, "range": [0, 600]},
                {"name": "desc", "type": "ordinal", "domain": DOMAIN, "range": [600, 0]}
            ]
        }))
    }

    #[test]
    fn test_uniform_points() {
        let state = chart(json!({
            "scales": [
                {"name": "x", "type": "ordinal", "domain": [0, 1], "range": [10, 120]},
                {"name": "y", "type": "ordinal", "domain": [0, 1], "range": [10, 120], "points": true}
            ]
        }));
        let x = state.scale("x").unwrap();
        assert_eq!(x.range_band(), 55.0);
        assert_eq!(x.range_extent(), scalars(&[10, 120]));
        assert_eq!(state.scale("y").unwrap().range(), scalars(&[10, 120]));
    }

    #[test]
    fn test_padding() {
        let state = chart(json!({
            "scales": [
                {"name": "x", "type": "ordinal", "domain": [0, 1, 2], "range": [0, 120], "padding": 0.2},
                {"name": "y", "type": "ordinal", "domain": [0, 1, 2], "range": [0, 120],
                 "points": true, "padding": 1}
            ]
        }));
        let x = state.scale("x").unwrap();
        assert_eq!(x.range_band(), 30.0);
        assert_eq!(x.range(), scalars(&[8, 45, 82]));
        assert_eq!(state.scale("y").unwrap().range(), scalars(&[20, 60, 100]));
    }

    #[test]
    fn test_padding_and_points_via_signal() {
        let mut state = chart(json!({
            "signals": [{"name": "pad", "init": 0}, {"name": "usePoints", "init": false}],
            "scales": [{
                "name": "x", "type": "ordinal", "domain": [0, 1, 2], "range": [0, 120],
                "padding": {"signal": "pad"}, "points": {"signal": "usePoints"}
            }]
        }));
        assert_eq!(state.scale("x").unwrap().range(), scalars(&[0, 40, 80]));

        state.signal("pad").unwrap().value(0.2).fire().unwrap();
        assert_eq!(state.scale("x").unwrap().range(), scalars(&[8, 45, 82]));

        state
            .signal("pad")
            .unwrap()
            .value(1)
            .signal("usePoints")
            .unwrap()
            .value(true)
            .fire()
            .unwrap();
        let x = state.scale("x").unwrap();
        assert_eq!(x.range(), scalars(&[20, 60, 100]));
        assert_eq!(x.range_band(), 0.0);
    }

    #[test]
    fn test_unrounded_bands() {
        let state = chart(json!({
            "scales": [{"name": "x", "type": "ordinal", "domain": [0, 1, 2], "range": [0, 100], "round": false}]
        }));
        let x = state.scale("x").unwrap();
        assert!((x.range_band() - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(x.map(&ScalarValue::from(0)), ScalarValue::from(0));
        assert_eq!(x.map(&ScalarValue::from(9)), ScalarValue::Null);
    }

    #[test]
    fn test_ranges() {
        let state = inversion_chart();
        assert_eq!(state.scale("asc").unwrap().range(), scalars(&[0, 150, 300, 450]));
        assert_eq!(state.scale("desc").unwrap().range(), scalars(&[450, 300, 150, 0]));
    }

    #[rstest(
        value,
        expected,
        case(0.0, "petalWidth"),
        case(1.0, "petalWidth"),
        case(149.0, "petalWidth"),
        case(150.0, "petalLength"),
        case(151.0, "petalLength"),
        case(299.0, "petalLength"),
        case(300.0, "sepalWidth"),
        case(301.0, "sepalWidth"),
        case(449.0, "sepalWidth"),
        case(450.0, "sepalLength"),
        case(451.0, "sepalLength"),
        case(600.0, "sepalLength"),
    )]
    fn test_invert_ascending(value: f64, expected: &str) {
        let state = inversion_chart();
        let asc = state.scale("asc").unwrap();
        assert_eq!(
            asc.invert(&ScalarValue::from(value)),
            Some(ScalarValue::from(expected))
        );
    }

    #[rstest(
        value,
        expected,
        case(600.0, "petalWidth"),
        case(451.0, "petalWidth"),
        case(450.0, "petalWidth"),
        case(449.0, "petalLength"),
        case(301.0, "petalLength"),
        case(300.0, "petalLength"),
        case(299.0, "sepalWidth"),
        case(151.0, "sepalWidth"),
        case(150.0, "sepalWidth"),
        case(149.0, "sepalLength"),
        case(1.0, "sepalLength"),
        case(0.0, "sepalLength"),
    )]
    fn test_invert_descending(value: f64, expected: &str) {
        let state = inversion_chart();
        let desc = state.scale("desc").unwrap();
        assert_eq!(
            desc.invert(&ScalarValue::from(value)),
            Some(ScalarValue::from(expected))
        );
    }

    #[rstest(
        name,
        lo,
        hi,
        expected,
        case("asc", -10.0, -1.0, vec![]),
        case("asc", -1.0, 700.0, vec!["petalWidth", "petalLength", "sepalWidth", "sepalLength"]),
        case("asc", 1.0, 120.0, vec!["petalWidth"]),
        case("asc", 1.0, 150.0, vec!["petalWidth", "petalLength"]),
        case("asc", 449.0, 700.0, vec!["sepalWidth", "sepalLength"]),
        case("desc", -1.0, -10.0, vec![]),
        case("desc", 700.0, -1.0, vec!["sepalLength", "sepalWidth", "petalLength", "petalWidth"]),
        case("desc", 0.0, 120.0, vec!["sepalLength"]),
        case("desc", 599.0, 449.0, vec!["petalLength", "petalWidth"]),
        case("desc", 599.0, 500.0, vec!["petalWidth"]),
        case("desc", 800.0, 700.0, vec!["petalWidth"]),
    )]
    fn test_invert_range(name: &str, lo: f64, hi: f64, expected: Vec<&str>) {
        let state = inversion_chart();
        let scale = state.scale(name).unwrap();
        assert_eq!(
            scale.invert_range(&ScalarValue::from(lo), &ScalarValue::from(hi)),
            Some(scalars(&expected))
        );
    }

    #[test]
    fn test_invert_round_trip() {
        let state = inversion_chart();
        for name in ["asc", "desc"] {
            let scale = state.scale(name).unwrap();
            for value in scale.domain() {
                assert_eq!(scale.invert(&scale.map(value)).as_ref(), Some(value));
            }
        }
    }

    #[test]
    fn test_verbatim_range_cycles() {
        let state = chart(json!({
            "scales": [{"name": "color", "type": "ordinal", "domain": ["a", "b", "c"],
                        "range": ["red", "blue"]}]
        }));
        let color = state.scale("color").unwrap();
        assert_eq!(color.map(&ScalarValue::from("c")), ScalarValue::from("red"));
        assert_eq!(color.invert(&ScalarValue::from(0)), None);
        assert_eq!(color.range_extent(), scalars(&["blue", "red"]));
    }
}
