mod util;

#[cfg(test)]
mod test_domain {
    use crate::util::check::{chart, scalars};
    use crate::util::equality::assert_same_members;
    use rstest::rstest;
    use serde_json::json;
    use vegascale_common::data::scalar::ScalarValue;

    #[test]
    fn test_hardcoded_values() {
        let state = chart(json!({
            "scales": [
                {"name": "x", "type": "ordinal", "domain": ["US", "Canada", "Mexico"], "range": [0, 1]},
                {"name": "y", "type": "linear", "domain": [0, 1, 2, 3, 4, 5], "range": [0, 1]}
            ]
        }));
        assert_eq!(
            state.scale("x").unwrap().domain(),
            scalars(&["US", "Canada", "Mexico"])
        );
        assert_eq!(
            state.scale("y").unwrap().domain(),
            scalars(&[0, 1, 2, 3, 4, 5])
        );
    }

    #[test]
    fn test_array_of_signals() {
        let mut state = chart(json!({
            "signals": [{"name": "s1", "init": 5}, {"name": "s2", "init": 7}],
            "scales": [{
                "name": "x", "type": "ordinal",
                "domain": [1, 2, {"signal": "s1"}, 6, {"signal": "s2"}],
                "range": [0, 1]
            }]
        }));
        let domain = |state: &vegascale_runtime::chart_state::ChartState| {
            state.scale("x").unwrap().domain().to_vec()
        };
        assert_eq!(domain(&state), scalars(&[1, 2, 5, 6, 7]));

        state.signal("s1").unwrap().value(3).fire().unwrap();
        assert_eq!(domain(&state), scalars(&[1, 2, 3, 6, 7]));

        // Ordinal domains hold distinct values
        state.signal("s2").unwrap().value(6).fire().unwrap();
        assert_eq!(domain(&state), scalars(&[1, 2, 3, 6]));
    }

    #[test]
    fn test_array_signal() {
        let mut state = chart(json!({
            "signals": [{"name": "extent", "value": [2, 8]}],
            "scales": [{"name": "x", "zero": false, "domain": {"signal": "extent"}}]
        }));
        assert_eq!(state.scale("x").unwrap().domain(), scalars(&[2, 8]));

        state
            .signal("extent")
            .unwrap()
            .value(vec![3, 12])
            .fire()
            .unwrap();
        assert_eq!(state.scale("x").unwrap().domain(), scalars(&[3, 12]));
    }

    #[test]
    fn test_min_max_hardcoded() {
        let state = chart(json!({
            "scales": [{"name": "y", "type": "linear", "domainMin": 0, "domainMax": 10, "range": [0, 1]}]
        }));
        assert_eq!(state.scale("y").unwrap().domain(), scalars(&[0, 10]));
    }

    #[test]
    fn test_min_max_signals() {
        let mut state = chart(json!({
            "signals": [{"name": "minDomain", "init": 0}, {"name": "maxDomain", "init": 10}],
            "scales": [{
                "name": "y", "type": "linear", "range": [0, 1], "zero": false,
                "domainMin": {"signal": "minDomain"},
                "domainMax": {"signal": "maxDomain"}
            }]
        }));
        assert_eq!(state.scale("y").unwrap().domain(), scalars(&[0, 10]));

        state.signal("minDomain").unwrap().value(5).fire().unwrap();
        assert_eq!(state.scale("y").unwrap().domain(), scalars(&[5, 10]));

        state.signal("maxDomain").unwrap().value(15).fire().unwrap();
        assert_eq!(state.scale("y").unwrap().domain(), scalars(&[5, 15]));
    }

    #[test]
    fn test_min_max_override_domain() {
        let state = chart(json!({
            "scales": [{
                "name": "y", "type": "linear", "range": [0, 1],
                "domain": [5, 15], "domainMin": 0, "domainMax": 10
            }]
        }));
        assert_eq!(state.scale("y").unwrap().domain(), scalars(&[0, 10]));
    }

    #[test]
    fn test_min_max_data_reference() {
        let state = chart(json!({
            "data": [{"name": "limits", "values": [{"v": 3}, {"v": -4}, {"v": 20}]}],
            "scales": [{
                "name": "y", "zero": false, "domain": [0, 10],
                "domainMin": {"data": "limits", "field": "v"}
            }]
        }));
        assert_eq!(state.scale("y").unwrap().domain(), scalars(&[-4, 10]));
    }

    #[test]
    fn test_min_max_win_over_nice() {
        let mut state = chart(json!({
            "signals": [{"name": "hi", "init": 10.5}],
            "scales": [{
                "name": "y", "zero": false, "nice": true,
                "domain": [1.1, 10.9], "domainMax": {"signal": "hi"}
            }]
        }));
        assert_eq!(state.scale("y").unwrap().domain(), scalars(&[1.0, 10.5]));

        // A null signal leaves the resolved endpoint in place
        state
            .signal("hi")
            .unwrap()
            .value(ScalarValue::Null)
            .fire()
            .unwrap();
        assert_eq!(state.scale("y").unwrap().domain(), scalars(&[1, 11]));
    }

    #[test]
    fn test_data_field_initial() {
        let state = chart(json!({
            "data": [{"name": "table", "values": [
                {"x": 1, "y": 28}, {"x": 2, "y": 55}, {"x": 3, "y": 43}, {"x": 2, "y": 91},
                {"x": 5, "y": 15}
            ]}],
            "scales": [
                {"name": "x", "type": "ordinal", "range": "width", "domain": {"data": "table", "field": "x"}},
                {"name": "y", "type": "linear", "range": "height", "zero": false, "domain": {"data": "table", "field": "y"}}
            ]
        }));
        assert_same_members(state.scale("x").unwrap().domain(), &scalars(&[1, 2, 3, 5]));
        assert_eq!(state.scale("y").unwrap().domain(), scalars(&[15, 91]));
    }

    #[rstest(
        sort,
        expected,
        case(json!(true), vec!["A", "B", "C"]),
        case(json!({"field": "value", "op": "average"}), vec!["C", "B", "A"]),
        case(json!({"field": "value", "op": "min"}), vec!["B", "C", "A"]),
        case(json!({"field": "position", "op": "min"}), vec!["B", "A", "C"]),
    )]
    fn test_sorted_domain(sort: serde_json::Value, expected: Vec<&str>) {
        let state = chart(json!({
            "data": [{"name": "table", "values": [
                {"category": "B", "position": 0, "value": 0.1},
                {"category": "B", "position": 1, "value": 0.6},
                {"category": "B", "position": 2, "value": 0.9},
                {"category": "B", "position": 3, "value": 0.4},
                {"category": "A", "position": 4, "value": 0.7},
                {"category": "A", "position": 5, "value": 0.2},
                {"category": "A", "position": 6, "value": 1.1},
                {"category": "A", "position": 7, "value": 0.8},
                {"category": "C", "position": 8, "value": 0.6},
                {"category": "C", "position": 9, "value": 0.1},
                {"category": "C", "position": 10, "value": 0.2},
                {"category": "C", "position": 11, "value": 0.7}
            ]}],
            "scales": [{
                "name": "x", "type": "ordinal", "range": "width",
                "domain": {"data": "table", "field": "category", "sort": sort}
            }]
        }));
        assert_eq!(state.scale("x").unwrap().domain(), scalars(&expected));
    }

    #[rstest(
        name,
        expected,
        case("s1", vec![1.0, 11.0]),
        case("s2", vec![11.0, 1.0]),
        case("s3", vec![0.0, 12.0]),
        case("s4", vec![130.0, 0.0]),
        case("s5", vec![0.0, 0.5]),
    )]
    fn test_nice(name: &str, expected: Vec<f64>) {
        let state = chart(json!({
            "scales": [
                {"name": "s1", "zero": false, "domain": [1.1, 10.9], "nice": true},
                {"name": "s2", "zero": false, "domain": [10.9, 1.1], "nice": true},
                {"name": "s3", "zero": false, "domain": [0.7, 11.001], "nice": true},
                {"name": "s4", "zero": false, "domain": [123.1, 6.7], "nice": true},
                {"name": "s5", "zero": false, "domain": [0, 0.49], "nice": true}
            ]
        }));
        assert_eq!(state.scale(name).unwrap().domain(), scalars(&expected));
    }

    #[test]
    fn test_zero() {
        let state = chart(json!({
            "scales": [
                {"name": "s1", "zero": false, "domain": [10, 120]},
                {"name": "s2", "domain": [10, 120]},
                {"name": "s3", "domain": [-120, -10]},
                {"name": "s4", "type": "log", "domain": [10, 120]}
            ]
        }));
        assert_eq!(state.scale("s1").unwrap().domain(), scalars(&[10, 120]));
        assert_eq!(state.scale("s2").unwrap().domain(), scalars(&[0, 120]));
        assert_eq!(state.scale("s3").unwrap().domain(), scalars(&[-120, 0]));
        assert_eq!(state.scale("s4").unwrap().domain(), scalars(&[10, 120]));
    }

    #[test]
    fn test_signal_controlled_options() {
        let mut state = chart(json!({
            "signals": [{"name": "useZero", "init": false}, {"name": "useNice", "init": false}],
            "scales": [{
                "name": "y", "domain": [1.1, 10.9],
                "zero": {"signal": "useZero"}, "nice": {"signal": "useNice"}
            }]
        }));
        assert_eq!(state.scale("y").unwrap().domain(), scalars(&[1.1, 10.9]));

        state.signal("useNice").unwrap().value(true).fire().unwrap();
        assert_eq!(state.scale("y").unwrap().domain(), scalars(&[1, 11]));

        state.signal("useZero").unwrap().value(true).fire().unwrap();
        assert_eq!(state.scale("y").unwrap().domain(), scalars(&[0, 11]));
    }
}
