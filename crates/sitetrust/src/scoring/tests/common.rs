use crate::scoring::{Parameter, ParameterSet, ScoringConfig, ScoringEngine};

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::new(ScoringConfig::default())
}

pub(super) fn risks(pairs: &[(&str, f64)]) -> ParameterSet {
    ParameterSet::from_risks(pairs.iter().copied()).expect("valid parameter risks")
}

pub(super) fn measured(name: &str, risk: f64, raw: f64) -> Parameter {
    Parameter::new(name, risk)
        .expect("valid parameter risk")
        .with_raw_value(raw)
}

pub(super) fn with_measurements(
    mut set: ParameterSet,
    measurements: Vec<Parameter>,
) -> ParameterSet {
    for parameter in measurements {
        set.insert(parameter).expect("valid parameter");
    }
    set
}

/// Representative scan of a mostly healthy site with a few weak spots.
pub(super) fn typical_scan() -> ParameterSet {
    let set = risks(&[
        ("ssl_expiry_days", 0.8),
        ("missing_csp_header", 1.0),
        ("dkim_absent", 0.0),
        ("hidden_spam_links", 0.0),
        ("response_time_high", 0.6),
        ("privacy_policy_missing", 0.0),
        ("whois_privacy_disabled", 0.4),
    ]);
    with_measurements(
        set,
        vec![
            measured("content_security_policy", 1.0, 0.0),
            measured("x_frame_options", 0.0, 1.0),
            measured("cls_score", 0.5, 0.18),
            measured("lcp", 0.9, 2.9),
            measured("ttfb", 0.0, 0.4),
        ],
    )
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
