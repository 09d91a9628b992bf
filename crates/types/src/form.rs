//! Environment request form and its option sets

use std::fmt;
use std::str::FromStr;

use envreq_errors::ValidationError;
use serde::{Deserialize, Serialize};

use crate::api::EnvRequestPayload;
use crate::request::RequestStatus;

/// Compute size requested for the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InstanceType {
    #[default]
    Small,
    Medium,
    Large,
}

impl InstanceType {
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }
}

impl fmt::Display for InstanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstanceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "instance_type".to_string(),
                value: s.to_string(),
            })
    }
}

impl clap::ValueEnum for InstanceType {
    fn value_variants<'a>() -> &'a [Self] {
        &Self::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()))
    }
}

/// Interactive development environment requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdeOption {
    #[default]
    Jupyter,
    Vscode,
    Sas,
    Studio,
}

impl IdeOption {
    pub const ALL: [Self; 4] = [Self::Jupyter, Self::Vscode, Self::Sas, Self::Studio];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jupyter => "jupyter",
            Self::Vscode => "vscode",
            Self::Sas => "sas",
            Self::Studio => "studio",
        }
    }

    /// Human readable label shown next to the option
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Jupyter => "Jupyter",
            Self::Vscode => "Vscode",
            Self::Sas => "Sas",
            Self::Studio => "Sagemaker Studio",
        }
    }

    /// Whether a successful submission chains into the Jupyter URL exchange
    #[must_use]
    pub fn is_jupyter(self) -> bool {
        matches!(self, Self::Jupyter)
    }
}

impl fmt::Display for IdeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdeOption {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "ide_option".to_string(),
                value: s.to_string(),
            })
    }
}

impl clap::ValueEnum for IdeOption {
    fn value_variants<'a>() -> &'a [Self] {
        &Self::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.as_str()).help(self.label()))
    }
}

/// Container image preinstalled into the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkOption {
    Xgboost,
    Tensorflow,
    Pytorch,
    Custom,
}

impl FrameworkOption {
    pub const ALL: [Self; 4] = [Self::Xgboost, Self::Tensorflow, Self::Pytorch, Self::Custom];

    /// Key sent on the wire
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Xgboost => "xgboost",
            Self::Tensorflow => "tensorflow",
            Self::Pytorch => "pytorch",
            Self::Custom => "custom",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Xgboost => "XGBoost 1.7",
            Self::Tensorflow => "TensorFlow 2.13",
            Self::Pytorch => "PyTorch 2.1",
            Self::Custom => "Custom Container",
        }
    }
}

impl fmt::Display for FrameworkOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FrameworkOption {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "framework_option".to_string(),
                value: s.to_string(),
            })
    }
}

impl clap::ValueEnum for FrameworkOption {
    fn value_variants<'a>() -> &'a [Self] {
        &Self::ALL
    }

    fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
        Some(clap::builder::PossibleValue::new(self.key()).help(self.label()))
    }
}

/// Set of selected container images.
///
/// Keeps selection order so the wire string reads in the order the user
/// picked images. Toggling an image twice restores the previous set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameworkSelection(Vec<FrameworkOption>);

impl FrameworkSelection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership of `option`; returns whether it is now selected.
    pub fn toggle(&mut self, option: FrameworkOption) -> bool {
        if let Some(pos) = self.0.iter().position(|o| *o == option) {
            self.0.remove(pos);
            false
        } else {
            self.0.push(option);
            true
        }
    }

    #[must_use]
    pub fn contains(&self, option: FrameworkOption) -> bool {
        self.0.contains(&option)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = FrameworkOption> + '_ {
        self.0.iter().copied()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Comma-joined keys, e.g. `"xgboost,pytorch"`
    #[must_use]
    pub fn to_wire_string(&self) -> String {
        self.0
            .iter()
            .map(|o| o.key())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromIterator<FrameworkOption> for FrameworkSelection {
    /// Applies each item as a toggle.
    fn from_iter<I: IntoIterator<Item = FrameworkOption>>(iter: I) -> Self {
        let mut selection = Self::new();
        for option in iter {
            selection.toggle(option);
        }
        selection
    }
}

/// The environment request as filled in by the user
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnvironmentRequestForm {
    pub env_name: String,
    pub env_purpose: String,
    pub use_case: String,
    pub data_domain: String,
    pub instance_type: InstanceType,
    pub ide_option: IdeOption,
    pub frameworks: FrameworkSelection,
}

impl EnvironmentRequestForm {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of required fields that are blank
    #[must_use]
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.env_name.trim().is_empty() {
            missing.push("env_name");
        }
        if self.env_purpose.trim().is_empty() {
            missing.push("env_purpose");
        }
        missing
    }

    /// Check the required fields
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingRequiredFields` when the name or
    /// purpose is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let missing = self.missing_required_fields();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingRequiredFields {
                fields: missing.into_iter().map(str::to_string).collect(),
            })
        }
    }

    pub fn toggle_framework(&mut self, option: FrameworkOption) -> bool {
        self.frameworks.toggle(option)
    }

    /// Restore every field to its default
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Body for `POST /env-request`
    #[must_use]
    pub fn to_payload(&self, requested_by: &str) -> EnvRequestPayload {
        EnvRequestPayload {
            env_name: self.env_name.clone(),
            env_purpose: self.env_purpose.clone(),
            use_case: self.use_case.clone(),
            data_domain: self.data_domain.clone(),
            instance_type: self.instance_type,
            ide_option: self.ide_option,
            framework_option: self.frameworks.to_wire_string(),
            requested_by: requested_by.to_string(),
            status: RequestStatus::Submitted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let form = EnvironmentRequestForm::default();
        assert_eq!(form.instance_type, InstanceType::Small);
        assert_eq!(form.ide_option, IdeOption::Jupyter);
        assert!(form.frameworks.is_empty());
        assert!(form.env_name.is_empty());
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut selection = FrameworkSelection::new();
        assert!(selection.toggle(FrameworkOption::Pytorch));
        assert!(selection.contains(FrameworkOption::Pytorch));
        assert!(!selection.toggle(FrameworkOption::Pytorch));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_wire_string_keeps_selection_order() {
        let selection: FrameworkSelection =
            [FrameworkOption::Xgboost, FrameworkOption::Pytorch].into_iter().collect();
        assert_eq!(selection.to_wire_string(), "xgboost,pytorch");
        assert_eq!(FrameworkSelection::new().to_wire_string(), "");
    }

    #[test]
    fn test_validate_whitespace_only_is_missing() {
        let form = EnvironmentRequestForm {
            env_name: "   ".into(),
            env_purpose: "training".into(),
            ..Default::default()
        };
        assert_eq!(
            form.validate(),
            Err(ValidationError::MissingRequiredFields {
                fields: vec!["env_name".into()]
            })
        );
    }

    #[test]
    fn test_validate_empty_purpose_is_missing() {
        let form = EnvironmentRequestForm {
            env_name: "churn-model".into(),
            ..Default::default()
        };
        assert_eq!(form.missing_required_fields(), vec!["env_purpose"]);
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_payload_sends_fields_as_entered() {
        let form = EnvironmentRequestForm {
            env_name: " churn-model ".into(),
            env_purpose: "train ".into(),
            ..Default::default()
        };
        let payload = form.to_payload("anonymous");
        assert_eq!(payload.env_name, " churn-model ");
        assert_eq!(payload.env_purpose, "train ");
        assert_eq!(payload.framework_option, "");
    }

    #[test]
    fn test_parse_options() {
        assert_eq!("Large".parse::<InstanceType>().unwrap(), InstanceType::Large);
        assert_eq!("studio".parse::<IdeOption>().unwrap(), IdeOption::Studio);
        assert!("huge".parse::<InstanceType>().is_err());
        assert_eq!(IdeOption::Studio.label(), "Sagemaker Studio");
    }
}
