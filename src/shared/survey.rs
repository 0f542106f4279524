//! Onboarding Survey Data Structures
//!
//! New users fill in a preference survey once. Multi-choice answers arrive as
//! JSON arrays (older clients send one comma-separated string) and are stored
//! comma-separated.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::shared::ids::optional_id;

/// Separator of stored multi-choice answers
pub const CHOICE_SEPARATOR: char = ',';

#[derive(Deserialize)]
#[serde(untagged)]
enum ChoicesRepr {
    List(Vec<String>),
    Joined(String),
}

/// Deserialize a multi-choice answer given as an array, a comma-separated
/// string or `null`. Use together with `#[serde(default)]`.
pub fn choice_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let choices = match Option::<ChoicesRepr>::deserialize(deserializer)? {
        Some(ChoicesRepr::List(items)) => items,
        Some(ChoicesRepr::Joined(joined)) => split_choices(&joined),
        None => Vec::new(),
    };
    Ok(choices
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect())
}

/// Split a stored multi-choice answer
pub fn split_choices(stored: &str) -> Vec<String> {
    stored
        .split(CHOICE_SEPARATOR)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Join a multi-choice answer for storage; `None` when nothing was chosen
pub fn join_choices(choices: &[String]) -> Option<String> {
    if choices.is_empty() {
        None
    } else {
        Some(choices.join(&CHOICE_SEPARATOR.to_string()))
    }
}

/// A user's survey answers
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SurveyAnswers {
    #[serde(default, deserialize_with = "choice_list")]
    pub interests: Vec<String>,
    #[serde(default, deserialize_with = "choice_list")]
    pub diets: Vec<String>,
    #[serde(default)]
    pub health: Option<String>,
    #[serde(default)]
    pub expect: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age_group: Option<String>,
    #[serde(default)]
    pub monthly_income: Option<String>,
    #[serde(default)]
    pub cultural_identity: Option<String>,
    #[serde(default, deserialize_with = "choice_list")]
    pub psychological_traits: Vec<String>,
    #[serde(default)]
    pub travel_frequency: Option<String>,
    #[serde(default)]
    pub suggestion: Option<String>,
}

/// Body of `/survey/submit`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSurveyRequest {
    #[serde(default, deserialize_with = "optional_id")]
    pub user_id: Option<i64>,
    #[serde(flatten)]
    pub answers: SurveyAnswers,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitSurveyResponse {
    pub success: bool,
    pub message: String,
    pub submission_id: i64,
}

/// How often each answer was given, per question
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SurveyStats {
    pub total: i64,
    pub interest: BTreeMap<String, i64>,
    pub diets: BTreeMap<String, i64>,
    pub expect: BTreeMap<String, i64>,
    pub gender: BTreeMap<String, i64>,
    pub age_group: BTreeMap<String, i64>,
    pub monthly_income: BTreeMap<String, i64>,
    pub cultural_identity: BTreeMap<String, i64>,
    pub psychological_traits: BTreeMap<String, i64>,
    pub travel_frequency: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyStatsResponse {
    pub success: bool,
    pub stats: SurveyStats,
}
