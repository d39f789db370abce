use proptest::prelude::*;
use sitetrust::scoring::{
    Parameter, ParameterSet, ScanOutcome, ScoringConfig, ScoringEngine, Verdict,
};

const NAMES: &[&str] = &[
    "ssl_expired",
    "ssl_expiry_days",
    "missing_csp_header",
    "open_ports",
    "minor_header_issue",
    "hidden_spam_links",
    "missing_meta_description",
    "response_time_high",
    "css_validation_issues",
    "dns_misconfig",
    "missing_org_info",
    "gdpr_violation",
    "weak_contact_page",
    "content_security_policy",
    "x_frame_options",
    "cls_score",
    "lcp",
    "ttfb",
    "brand_new_check",
];

fn parameter_set() -> impl Strategy<Value = ParameterSet> {
    prop::collection::vec(
        (
            prop::sample::select(NAMES),
            0.0f64..=1.0,
            prop::option::of(-5.0f64..50.0),
        ),
        0..24,
    )
    .prop_map(|entries| {
        let mut set = ParameterSet::new();
        for (name, risk, raw) in entries {
            let parameter = Parameter::new(name, risk).expect("risk generated in range");
            let parameter = match raw {
                Some(raw) => parameter.with_raw_value(raw),
                None => parameter,
            };
            set.insert(parameter).expect("generated parameter is valid");
        }
        set
    })
}

fn score(parameters: &ParameterSet) -> ScanOutcome {
    ScoringEngine::new(ScoringConfig::default()).score(parameters)
}

proptest! {
    #[test]
    fn outputs_stay_within_bounds(parameters in parameter_set(), trend_drop in -30i32..60) {
        let outcome = ScoringEngine::default().score_with_trend(&parameters, trend_drop);

        prop_assert!(outcome.summary.trust_score <= 100);
        prop_assert!((0.0..=1.0).contains(&outcome.summary.global_risk));
        for risk in outcome.summary.category_risks.values() {
            prop_assert!((0.0..=1.0).contains(risk));
        }
        for decision in &outcome.decisions {
            prop_assert!((0.0..=1.0).contains(&decision.decision_score));
            for contribution in &decision.parameters {
                prop_assert!((0.0..=1.0).contains(&contribution.risk_value));
            }
        }
        prop_assert!(outcome.top_risks.len() <= 5);
        prop_assert_eq!(outcome.findings.len(), parameters.len());
    }

    #[test]
    fn raising_a_risk_never_raises_trust(
        parameters in parameter_set(),
        pick in any::<prop::sample::Index>(),
        bump in 0.0f64..=1.0,
    ) {
        prop_assume!(!parameters.is_empty());
        let target = pick.get(parameters.iter().as_slice()).clone();

        let mut raised = parameters.clone();
        let risk = (target.risk_value + bump).min(1.0);
        raised
            .insert(Parameter { risk_value: risk, ..target })
            .expect("raised risk stays in range");

        let before = score(&parameters).summary;
        let after = score(&raised).summary;
        prop_assert!(after.global_risk >= before.global_risk);
        prop_assert!(after.trust_score <= before.trust_score);
    }

    #[test]
    fn scoring_is_deterministic(parameters in parameter_set()) {
        prop_assert_eq!(score(&parameters), score(&parameters));
    }

    #[test]
    fn positive_critical_flags_force_unsafe(
        parameters in parameter_set(),
        risk in 0.01f64..=1.0,
    ) {
        let mut flagged = parameters;
        flagged
            .insert(Parameter::new("malware_detected", risk).expect("valid risk"))
            .expect("valid parameter");

        let summary = score(&flagged).summary;
        prop_assert_eq!(summary.verdict, Verdict::Unsafe);
        prop_assert!(summary.critical_flags.iter().any(|flag| flag == "malware_detected"));
    }
}

#[test]
fn wire_format_round_trips_through_the_engine() {
    let parameters: ParameterSet = serde_json::from_str(
        r#"{
            "ssl_expiry_days": 0.8,
            "missing_csp_header": 1.0,
            "lcp": { "risk": 0.9, "value": "2.9" },
            "x_frame_options": { "risk": 0.0, "value": 1 }
        }"#,
    )
    .expect("parameters deserialize");

    let outcome = score(&parameters);
    let encoded = serde_json::to_value(&outcome).expect("outcome serializes");

    assert_eq!(encoded["summary"]["verdict"], "SAFE_WITH_CAUTION");
    // security risk 0.8 is inside the critical band even though trust is 76
    assert_eq!(encoded["summary"]["severity"], "CRITICAL");
    assert_eq!(encoded["decisions"][0]["category"], "Stability & Behavior");
    let decoded: ScanOutcome = serde_json::from_value(encoded).expect("outcome deserializes");
    assert_eq!(decoded, outcome);
}
