#![allow(dead_code)]

//! The multi-step survey wizard: a four-state linear flow where steps 1–3
//! collect answers and step 4 shows the result. Navigation is forward-linear
//! with per-step required-field validation; step 4 is reachable only through
//! a successful validated submission.
//!
//! The wizard never talks to the network itself — submissions go through the
//! injected [`RecommendationSource`] seam (see `client.rs`).

pub mod client;
pub mod export;

use std::collections::HashMap;

use thiserror::Error;

use crate::schema::{Answer, CareerRecommendation, FormResponses};
use crate::wizard::client::RecommendationSource;

/// Required-field sets per step. Fixed, not user-configurable.
pub const STEP_ONE_FIELDS: &[&str] = &[
    "math_problem_solving",
    "tech_interests",
    "project_description",
    "problem_solving_style",
    "learning_preference",
    "communication_style",
];

pub const STEP_TWO_FIELDS: &[&str] = &[
    "team_preference",
    "hw_sw_preference",
    "motivations",
    "work_environment",
    "work_life_balance",
];

pub const STEP_THREE_FIELDS: &[&str] = &[
    "tech_experience",
    "experience_level",
    "career_goals",
    "education_level",
    "industries_interest",
];

/// Required fields for an input step; empty for the result step.
pub fn required_fields(step: u8) -> &'static [&'static str] {
    match step {
        1 => STEP_ONE_FIELDS,
        2 => STEP_TWO_FIELDS,
        3 => STEP_THREE_FIELDS,
        _ => &[],
    }
}

/// User-facing wizard failures. Messages are the Italian notices shown in
/// the UI.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WizardError {
    #[error("Compila tutti i campi obbligatori prima di continuare")]
    IncompleteStep,

    #[error("Compila tutti i campi obbligatori prima di inviare")]
    IncompleteSubmission,

    #[error("Una richiesta è già in corso")]
    SubmissionInFlight,

    #[error("Nessun invio fallito da riprovare")]
    NothingToRetry,
}

/// Result sub-state of step 4.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Submission {
    #[default]
    Idle,
    Pending,
    Success(CareerRecommendation),
    Error(String),
}

/// The wizard state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct CareerWizard {
    step: u8,
    responses: FormResponses,
    validation_errors: HashMap<String, bool>,
    submission: Submission,
}

impl Default for CareerWizard {
    fn default() -> Self {
        Self {
            step: 1,
            responses: FormResponses::new(),
            validation_errors: HashMap::new(),
            submission: Submission::Idle,
        }
    }
}

impl CareerWizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn responses(&self) -> &FormResponses {
        &self.responses
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub fn recommendation(&self) -> Option<&CareerRecommendation> {
        match &self.submission {
            Submission::Success(recommendation) => Some(recommendation),
            _ => None,
        }
    }

    /// Whether a key is currently flagged as missing.
    pub fn is_missing(&self, key: &str) -> bool {
        self.validation_errors.get(key).copied().unwrap_or(false)
    }

    pub fn has_flagged_errors(&self) -> bool {
        self.validation_errors.values().any(|&missing| missing)
    }

    /// Overwrites the answer for a key and clears its validation flag.
    pub fn record_answer(&mut self, key: &str, value: impl Into<Answer>) {
        self.responses.insert(key, value);
        if let Some(flag) = self.validation_errors.get_mut(key) {
            *flag = false;
        }
    }

    /// Recomputes the error map for a step's required fields. A value is
    /// missing when it is absent, an empty string, or an empty list.
    /// Returns whether the step is clean.
    pub fn validate_step(&mut self, step: u8) -> bool {
        let mut errors = HashMap::new();
        let mut clean = true;

        for &field in required_fields(step) {
            let empty = match self.responses.get(field) {
                None => true,
                Some(answer) => answer.is_empty(),
            };
            if empty {
                errors.insert(field.to_string(), true);
                clean = false;
            }
        }

        self.validation_errors = errors;
        clean
    }

    /// Moves to the next input step when the current one validates clean.
    /// Step 4 is never entered here — only `submit` reaches the result step.
    pub fn advance(&mut self) -> Result<(), WizardError> {
        if !self.validate_step(self.step) {
            return Err(WizardError::IncompleteStep);
        }
        if self.step < 3 {
            self.step += 1;
        }
        Ok(())
    }

    /// Steps back without validation. Floor at step 1; stepping back from
    /// the result step is not offered (use `reset`).
    pub fn retreat(&mut self) {
        if self.step > 1 && self.step < 4 {
            self.step -= 1;
        }
    }

    /// Submits the collected answers. Requires step 3 clean; not reentrant —
    /// a second call while one is pending is refused.
    pub async fn submit(
        &mut self,
        source: &dyn RecommendationSource,
    ) -> Result<(), WizardError> {
        if self.submission == Submission::Pending {
            return Err(WizardError::SubmissionInFlight);
        }
        if !self.validate_step(3) {
            return Err(WizardError::IncompleteSubmission);
        }
        self.send(source).await;
        Ok(())
    }

    /// Re-sends the retained, already-validated answers after a failed
    /// submission. No re-validation.
    pub async fn retry_after_error(
        &mut self,
        source: &dyn RecommendationSource,
    ) -> Result<(), WizardError> {
        match self.submission {
            Submission::Error(_) => {}
            Submission::Pending => return Err(WizardError::SubmissionInFlight),
            _ => return Err(WizardError::NothingToRetry),
        }
        self.send(source).await;
        Ok(())
    }

    async fn send(&mut self, source: &dyn RecommendationSource) {
        self.step = 4;
        self.submission = Submission::Pending;

        self.submission = match source.recommend(&self.responses).await {
            Ok(recommendation) => Submission::Success(recommendation),
            Err(e) => Submission::Error(e.to_string()),
        };
    }

    /// Start over: unconditionally back to the initial state with all
    /// answers, flags, and any result discarded.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
