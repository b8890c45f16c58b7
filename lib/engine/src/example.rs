//! Example units and the JSON files that hold them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use snafu::ResultExt;

use formula_parser::{parse_formula, Formula};

use crate::driver::Problem;
use crate::error::*;
use crate::settings::Settings;
use crate::theory::Translation;

/// Example as written in a file: formula sources and raw settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExampleSpec {
    #[serde(default)]
    pub premises: Vec<String>,
    #[serde(default)]
    pub conclusions: Vec<String>,
    #[serde(default)]
    pub settings: Map<String, Value>,
}

/// ```json
/// { "theory": "counterfactual", "examples": { "CF_CM_1": { "premises": [...], "conclusions": [...], "settings": {...} } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExampleFile {
    #[serde(default)]
    pub theory: Option<String>,
    pub examples: BTreeMap<String, ExampleSpec>,
}

impl ExampleFile {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}

/// Example ready to be checked.
#[derive(Debug, Clone)]
pub struct Example {
    pub name: String,
    pub problem: Problem,
}

impl Example {
    pub fn expectation(&self) -> Option<bool> {
        self.problem.settings.expectation
    }
}

impl ExampleSpec {
    pub fn new<P, C>(premises: P, conclusions: C, settings: Map<String, Value>) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            premises: premises.into_iter().map(Into::into).collect(),
            conclusions: conclusions.into_iter().map(Into::into).collect(),
            settings,
        }
    }

    /// Parse the formulas (after translating their symbols) and the settings.
    pub fn compile(&self, name: &str, translation: Option<&Translation>) -> Result<Example> {
        let parse = |sources: &[String]| {
            sources
                .iter()
                .map(|source| {
                    let source = match translation {
                        Some(t) => t.apply(source),
                        None => source.clone(),
                    };
                    parse_formula(&source).context(ParseSnafu { formula: &source })
                })
                .collect::<Result<Vec<Formula>>>()
        };
        let premises = parse(&self.premises)?;
        let conclusions = parse(&self.conclusions)?;
        let settings = Settings::from_map(&self.settings)?;
        Ok(Example {
            name: name.to_string(),
            problem: Problem::new(premises, conclusions, settings),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use test_log::test;

    use super::*;

    #[test]
    fn test_read_file() {
        let text = r#"{
            "theory": "counterfactual",
            "examples": {
                "CF_CM_1": {
                    "premises": ["\\neg A", "(A \\boxright C)"],
                    "conclusions": ["((A \\wedge B) \\boxright C)"],
                    "settings": {"N": 4, "expectation": true}
                }
            }
        }"#;
        let file = ExampleFile::from_json(text).unwrap();
        assert_eq!(file.theory.as_deref(), Some("counterfactual"));
        let example = file.examples["CF_CM_1"].compile("CF_CM_1", None).unwrap();
        assert_eq!(example.problem.premises.len(), 2);
        assert_eq!(example.problem.settings.n, 4);
        assert_eq!(example.expectation(), Some(true));
    }

    #[test]
    fn test_compile_errors() {
        let settings = json!({"N": 2}).as_object().cloned().unwrap();
        let spec = ExampleSpec::new(["(A \\wedge"], Vec::<String>::new(), settings.clone());
        assert!(matches!(spec.compile("bad", None), Err(CheckError::Parse { .. })));

        let mut bad_settings = settings;
        bad_settings.insert("colour".into(), json!("red"));
        let spec = ExampleSpec::new(["A"], ["A"], bad_settings);
        assert!(matches!(spec.compile("bad", None), Err(CheckError::UnknownSetting { .. })));
    }

    #[test]
    fn test_translation_applies_before_parsing() {
        let translation: Translation = [("\\Nec", "\\Box")].into_iter().collect();
        let settings = json!({"N": 1}).as_object().cloned().unwrap();
        let spec = ExampleSpec::new(["\\Nec A"], Vec::<String>::new(), settings);
        let example = spec.compile("translated", Some(&translation)).unwrap();
        assert_eq!(example.problem.premises, vec![Formula::necessarily(Formula::atom('A'))]);
    }
}
