use fuzzy_rules::{
    AggregationOp, DefuzzificationOp, FuzzyError, ImplicationOp, Inputs, MamdaniConfig, MamdaniSystem, Trapezoid,
    Triangular, VariableKey,
};

struct Tips {
    fs: MamdaniSystem,
    service: VariableKey,
    food: VariableKey,
    tips: VariableKey,
}

fn tips(config: MamdaniConfig) -> Tips {
    let mut fs = MamdaniSystem::with_config(config);
    let service = fs.add_input("service", 0. ..=10.).unwrap();

    fs.add_term(service, "poor", Triangular::new(-5., 0., 5.).unwrap()).unwrap();
    fs.add_term(service, "good", Triangular::new(0., 5., 10.).unwrap()).unwrap();
    fs.add_term(service, "excellent", Triangular::new(5., 10., 15.).unwrap()).unwrap();

    let food = fs.add_input("food", 0. ..=10.).unwrap();

    fs.add_term(food, "rancid", Trapezoid::new(0., 0., 1., 3.).unwrap()).unwrap();
    fs.add_term(food, "delicious", Trapezoid::new(7., 9., 10., 10.).unwrap()).unwrap();

    let tips = fs.add_output("tips", 0. ..=30.).unwrap();

    fs.add_term(tips, "cheap", Triangular::new(0., 5., 10.).unwrap()).unwrap();
    fs.add_term(tips, "average", Triangular::new(10., 15., 20.).unwrap()).unwrap();
    fs.add_term(tips, "generous", Triangular::new(20., 25., 30.).unwrap()).unwrap();

    for rule in [
        "if (service is poor )  or (food is rancid) then tips is cheap",
        "if ((service is good)) then tips is average",
        "if (service is excellent) or (food is delicious) then (tips is generous)",
    ] {
        let rule = fs.parse_rule(rule).unwrap();

        fs.add_rule(rule).unwrap();
    }

    Tips { fs, service, food, tips }
}

fn tip(t: &Tips, service: f64, food: f64) -> f64 {
    t.fs.calculate(&Inputs::from([(t.service, service), (t.food, food)]))
        .unwrap()
        .get(t.tips)
        .unwrap()
}

#[test]
fn test_symmetric_centroids() {
    let t = tips(MamdaniConfig::default());

    // Only one rule fires at full strength, so the output is that term's peak.
    // Terms off the middle of the universe pick up a small integration error.
    assert!((tip(&t, 5., 5.) - 15.).abs() < 1e-9);
    assert!((tip(&t, 0., 5.) - 5.).abs() < 1e-3);
    assert!((tip(&t, 10., 5.) - 25.).abs() < 1e-3);
}

#[test]
fn test_tip_grows_with_service() {
    let t = tips(MamdaniConfig::default());
    let tips: Vec<f64> = [0., 2.5, 5., 7.5, 10.].into_iter().map(|s| tip(&t, s, 5.)).collect();

    for pair in tips.windows(2) {
        assert!(pair[0] < pair[1], "{tips:?}");
    }
}

#[test]
fn test_bad_food_lowers_the_tip() {
    let t = tips(MamdaniConfig::default());

    assert!(tip(&t, 5., 0.) < tip(&t, 5., 5.));
    assert!(tip(&t, 5., 10.) > tip(&t, 5., 5.));
}

#[test]
fn test_alternative_methods() {
    let config = MamdaniConfig {
        implication: ImplicationOp::Prod,
        aggregation: AggregationOp::Sum,
        ..MamdaniConfig::default()
    };
    let t = tips(config);

    assert!((tip(&t, 5., 5.) - 15.).abs() < 1e-9);

    let result = tip(&t, 3., 8.);

    assert!(result > 5. && result < 25., "{result}");
}

#[test]
fn test_zero_area_is_not_finite() {
    let mut fs = MamdaniSystem::new();
    let service = fs.add_input("service", 0. ..=10.).unwrap();
    let excellent = fs.add_term(service, "excellent", Triangular::new(5., 10., 15.).unwrap()).unwrap();
    let tips = fs.add_output("tips", 0. ..=30.).unwrap();
    let generous = fs.add_term(tips, "generous", Triangular::new(20., 25., 30.).unwrap()).unwrap();
    let rule = fs.rule(service.is(excellent), tips, generous).unwrap();

    fs.add_rule(rule).unwrap();

    let result = fs.calculate(&Inputs::from([(service, 0.)])).unwrap().get(tips).unwrap();

    assert!(result.is_nan());
}

#[test]
fn test_errors() {
    let t = tips(MamdaniConfig::default());

    assert_eq!(
        t.fs.calculate(&Inputs::from([(t.service, 5.)])),
        Err(FuzzyError::InputCount { expected: 2, found: 1 })
    );
    assert_eq!(
        t.fs.calculate(&Inputs::from([(t.service, 5.), (t.tips, 5.)])),
        Err(FuzzyError::MissingInput("food".into()))
    );
    assert_eq!(
        t.fs.calculate(&Inputs::from([(t.service, -1.), (t.food, 5.)])),
        Err(FuzzyError::InputOutOfRange {
            variable: "service".into(),
            value: -1.,
            min: 0.,
            max: 10.
        })
    );

    let mut fs = tips(MamdaniConfig::default()).fs;

    fs.set_defuzzification(DefuzzificationOp::Mom);

    assert!(matches!(
        fs.calculate(&Inputs::from([(t.service, 5.), (t.food, 5.)])),
        Err(FuzzyError::UnsupportedDefuzzification(DefuzzificationOp::Mom))
    ));
}
