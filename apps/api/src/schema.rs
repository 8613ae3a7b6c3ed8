#![allow(dead_code)]

//! Shared data model for the career-matching flow, plus the runtime
//! validators applied at every external boundary (inbound HTTP body,
//! upstream LLM payload). Both sides of the wire are dynamically shaped,
//! so shapes are checked here rather than trusted.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A single survey answer: free text / radio choice, or checkbox selections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    Multi(Vec<String>),
}

impl Answer {
    /// An empty string or an empty list counts as "not answered".
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Text(s) => s.is_empty(),
            Answer::Multi(items) => items.is_empty(),
        }
    }
}

impl From<&str> for Answer {
    fn from(s: &str) -> Self {
        Answer::Text(s.to_string())
    }
}

impl From<String> for Answer {
    fn from(s: String) -> Self {
        Answer::Text(s)
    }
}

impl From<Vec<String>> for Answer {
    fn from(items: Vec<String>) -> Self {
        Answer::Multi(items)
    }
}

/// Accumulated survey answers keyed by question identifier.
///
/// Insertion order is preserved: the prompt formatter iterates the answers
/// in the order they arrived, and prompt output must be deterministic.
/// Serializes as a JSON object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormResponses {
    entries: Vec<(String, Answer)>,
}

impl FormResponses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites an existing key in place (keeping its original position)
    /// or appends a new one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Answer>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Answer> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Answer)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Serialize for FormResponses {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FormResponses {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ResponsesVisitor;

        impl<'de> Visitor<'de> for ResponsesVisitor {
            type Value = FormResponses;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of question keys to answers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut responses = FormResponses::new();
                while let Some((key, value)) = access.next_entry::<String, Answer>()? {
                    responses.insert(key, value);
                }
                Ok(responses)
            }
        }

        deserializer.deserialize_map(ResponsesVisitor)
    }
}

/// An alternative career path suggested alongside the main recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeCareer {
    pub title: String,
    pub description: String,
}

/// The structured career advice returned by the upstream service.
/// Optional fields absent from the payload stay absent on re-serialization
/// (omitted, never `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerRecommendation {
    pub career_title: String,
    pub explanation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_percentage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_careers: Option<Vec<AlternativeCareer>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<Vec<String>>,
}

/// A single field-level validation failure, with the JSON path that failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Collapses field errors into the `details` object of an error response:
/// `{ "<field>": "<message>", ... }`.
pub fn field_error_details(errors: &[FieldError]) -> Value {
    let mut map = serde_json::Map::new();
    for error in errors {
        map.insert(error.field.clone(), Value::String(error.message.clone()));
    }
    Value::Object(map)
}

/// Validates the inbound request body for `POST /api/career-recommendation`.
///
/// The body must be an object with a `formResponses` object whose values are
/// each a string or an array of strings. This deliberately does NOT check
/// that the 16 survey keys are all present — completeness is owned by the
/// client wizard (see DESIGN.md).
pub fn validate_career_match(body: &Value) -> Result<FormResponses, Vec<FieldError>> {
    let Some(object) = body.as_object() else {
        return Err(vec![FieldError::new("body", "Expected a JSON object")]);
    };

    let Some(raw) = object.get("formResponses") else {
        return Err(vec![FieldError::new("formResponses", "Required")]);
    };

    let Some(responses) = raw.as_object() else {
        return Err(vec![FieldError::new(
            "formResponses",
            "Expected an object mapping question keys to answers",
        )]);
    };

    let mut errors = Vec::new();
    let mut parsed = FormResponses::new();

    for (key, value) in responses {
        match answer_from_value(value) {
            Some(answer) => parsed.insert(key.clone(), answer),
            None => errors.push(FieldError::new(
                format!("formResponses.{key}"),
                "Expected a string or an array of strings",
            )),
        }
    }

    if errors.is_empty() {
        Ok(parsed)
    } else {
        Err(errors)
    }
}

fn answer_from_value(value: &Value) -> Option<Answer> {
    match value {
        Value::String(s) => Some(Answer::Text(s.clone())),
        Value::Array(items) => {
            let strings: Option<Vec<String>> = items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect();
            strings.map(Answer::Multi)
        }
        _ => None,
    }
}

/// Validates the upstream payload against the recommendation schema.
///
/// `careerTitle` and `explanation` are required strings; `matchPercentage`,
/// `alternativeCareers`, and `nextSteps` are optional but type-checked when
/// present (a `null` is a violation, not an absence). Unknown fields are
/// ignored.
pub fn validate_recommendation(payload: &Value) -> Result<CareerRecommendation, Vec<FieldError>> {
    let Some(object) = payload.as_object() else {
        return Err(vec![FieldError::new("body", "Expected a JSON object")]);
    };

    let mut errors = Vec::new();

    let career_title = require_string(object, "careerTitle", &mut errors);
    let explanation = require_string(object, "explanation", &mut errors);

    let match_percentage = match object.get("matchPercentage") {
        None => None,
        Some(value) => match value.as_f64() {
            Some(n) => Some(n),
            None => {
                errors.push(FieldError::new("matchPercentage", "Expected a number"));
                None
            }
        },
    };

    let alternative_careers = match object.get("alternativeCareers") {
        None => None,
        Some(Value::Array(items)) => {
            let mut careers = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                match alternative_from_value(item) {
                    Some(career) => careers.push(career),
                    None => errors.push(FieldError::new(
                        format!("alternativeCareers[{i}]"),
                        "Expected an object with string `title` and `description`",
                    )),
                }
            }
            Some(careers)
        }
        Some(_) => {
            errors.push(FieldError::new("alternativeCareers", "Expected an array"));
            None
        }
    };

    let next_steps = match object.get("nextSteps") {
        None => None,
        Some(Value::Array(items)) => {
            let steps: Option<Vec<String>> = items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect();
            match steps {
                Some(steps) => Some(steps),
                None => {
                    errors.push(FieldError::new("nextSteps", "Expected an array of strings"));
                    None
                }
            }
        }
        Some(_) => {
            errors.push(FieldError::new("nextSteps", "Expected an array of strings"));
            None
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(CareerRecommendation {
        // Both unwraps guarded by the errors check above.
        career_title: career_title.unwrap(),
        explanation: explanation.unwrap(),
        match_percentage,
        alternative_careers,
        next_steps,
    })
}

fn require_string(
    object: &serde_json::Map<String, Value>,
    field: &str,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match object.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(FieldError::new(field, "Expected a string"));
            None
        }
        None => {
            errors.push(FieldError::new(field, "Required"));
            None
        }
    }
}

fn alternative_from_value(value: &Value) -> Option<AlternativeCareer> {
    let object = value.as_object()?;
    Some(AlternativeCareer {
        title: object.get("title")?.as_str()?.to_string(),
        description: object.get("description")?.as_str()?.to_string(),
    })
}
