use std::collections::BTreeMap;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Contract violations raised at the engine's input boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("invalid parameter risk for '{name}': {value} is outside [0, 1]")]
    InvalidParameterRisk { name: String, value: f64 },
    #[error("parameter name must not be empty")]
    EmptyParameterName,
    #[error("normalization threshold must be finite and greater than zero (found {0})")]
    InvalidThreshold(f64),
}

/// Raw observation a collaborator attached to a parameter (seconds, ratios, header text...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl RawValue {
    /// Numeric view of the observation; numeric text is parsed, everything else is `None`.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            RawValue::Number(value) => *value,
            RawValue::Text(text) => text.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

/// One named risk signal for the current scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub risk_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<RawValue>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, risk_value: f64) -> Result<Self, ScoringError> {
        let name = name.into();
        validate(&name, risk_value)?;
        Ok(Self {
            name,
            risk_value,
            raw_value: None,
        })
    }

    pub fn with_raw_value(mut self, raw_value: impl Into<RawValue>) -> Self {
        self.raw_value = Some(raw_value.into());
        self
    }

    pub fn raw_number(&self) -> Option<f64> {
        self.raw_value.as_ref().and_then(RawValue::as_number)
    }
}

fn validate(name: &str, risk_value: f64) -> Result<(), ScoringError> {
    if name.trim().is_empty() {
        return Err(ScoringError::EmptyParameterName);
    }
    if !(0.0..=1.0).contains(&risk_value) {
        return Err(ScoringError::InvalidParameterRisk {
            name: name.to_string(),
            value: risk_value,
        });
    }
    Ok(())
}

/// Validated parameters for one scan, kept in discovery order.
///
/// Re-inserting a known name replaces its value but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterSet {
    entries: Vec<Parameter>,
    index: BTreeMap<String, usize>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from bare `(name, risk)` pairs, failing on the first invalid entry.
    pub fn from_risks<I, K>(risks: I) -> Result<Self, ScoringError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let mut set = Self::new();
        for (name, risk) in risks {
            set.insert(Parameter::new(name, risk)?)?;
        }
        Ok(set)
    }

    pub fn insert(&mut self, parameter: Parameter) -> Result<Option<Parameter>, ScoringError> {
        validate(&parameter.name, parameter.risk_value)?;

        match self.index.get(&parameter.name) {
            Some(&position) => Ok(Some(std::mem::replace(
                &mut self.entries[position],
                parameter,
            ))),
            None => {
                self.index
                    .insert(parameter.name.clone(), self.entries.len());
                self.entries.push(parameter);
                Ok(None)
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.index
            .get(name)
            .map(|&position| &self.entries[position])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Wire form of a single entry: either a bare risk or `{ "risk": .., "value": .. }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ParameterInput {
    Risk(f64),
    Detailed {
        risk: f64,
        #[serde(default)]
        value: Option<RawValue>,
    },
}

#[derive(Serialize)]
struct DetailedOutput<'a> {
    risk: f64,
    value: &'a RawValue,
}

impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for parameter in &self.entries {
            match &parameter.raw_value {
                None => map.serialize_entry(&parameter.name, &parameter.risk_value)?,
                Some(value) => map.serialize_entry(
                    &parameter.name,
                    &DetailedOutput {
                        risk: parameter.risk_value,
                        value,
                    },
                )?,
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ParameterSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ParameterSetVisitor;

        impl<'de> Visitor<'de> for ParameterSetVisitor {
            type Value = ParameterSet;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of parameter names to risk values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut set = ParameterSet::new();
                while let Some((name, input)) = access.next_entry::<String, ParameterInput>()? {
                    let parameter = match input {
                        ParameterInput::Risk(risk) => Parameter::new(name, risk),
                        ParameterInput::Detailed { risk, value } => {
                            Parameter::new(name, risk).map(|parameter| Parameter {
                                raw_value: value,
                                ..parameter
                            })
                        }
                    }
                    .map_err(serde::de::Error::custom)?;
                    set.insert(parameter).map_err(serde::de::Error::custom)?;
                }
                Ok(set)
            }
        }

        deserializer.deserialize_map(ParameterSetVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_risk_outside_unit_interval() {
        let err = Parameter::new("ssl_expired", 1.2).expect_err("risk above one rejected");
        assert_eq!(
            err,
            ScoringError::InvalidParameterRisk {
                name: "ssl_expired".to_string(),
                value: 1.2
            }
        );
        assert!(Parameter::new("ssl_expired", -0.1).is_err());
        assert!(Parameter::new("ssl_expired", f64::NAN).is_err());
        assert_eq!(
            Parameter::new("  ", 0.4),
            Err(ScoringError::EmptyParameterName)
        );
    }

    #[test]
    fn reinsert_keeps_discovery_position() {
        let mut set =
            ParameterSet::from_risks([("dkim_absent", 0.3), ("spf_absent", 0.2)]).expect("valid");
        let previous = set
            .insert(Parameter::new("dkim_absent", 0.9).expect("valid"))
            .expect("insert succeeds");

        assert_eq!(previous.map(|p| p.risk_value), Some(0.3));
        let names: Vec<_> = set.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["dkim_absent", "spf_absent"]);
        assert_eq!(set.get("dkim_absent").map(|p| p.risk_value), Some(0.9));
    }

    #[test]
    fn deserializes_map_in_document_order() {
        let json = r#"{ "zeta": 0.1, "lcp": { "risk": 0.9, "value": 2.9 }, "alpha": 0.0 }"#;
        let set: ParameterSet = serde_json::from_str(json).expect("parameter map parses");

        let names: Vec<_> = set.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["zeta", "lcp", "alpha"]);
        assert_eq!(set.get("lcp").and_then(Parameter::raw_number), Some(2.9));
    }

    #[test]
    fn deserialization_fails_fast_on_invalid_risk() {
        let err = serde_json::from_str::<ParameterSet>(r#"{ "open_ports": 3.0 }"#)
            .expect_err("out of range risk rejected");
        assert!(err.to_string().contains("invalid parameter risk"));
    }

    #[test]
    fn numeric_text_raw_values_are_parsed() {
        assert_eq!(RawValue::from(" 0.25 ").as_number(), Some(0.25));
        assert_eq!(RawValue::from("max-age=0").as_number(), None);
        assert_eq!(RawValue::Number(f64::INFINITY).as_number(), None);
    }
}
