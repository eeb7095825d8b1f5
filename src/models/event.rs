use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::{EventStatus, QuestionType, TeamApplicationStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TeamPreferenceOption {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Extra question asked on the application form of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Question {
    pub id: String,
    pub question: String,
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "multipleChoice")]
    pub kind: QuestionType,
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

/// An event with bilingual name and location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Event {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    #[schema(example = "Sommerakademie")]
    pub name_de: String,
    #[schema(example = "Summer Academy")]
    pub name_en: String,
    pub location_de: String,
    pub location_en: String,
    /// Free-form date string; RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` or `YYYY-MM-DD`
    /// are understood by the ordering check.
    #[schema(example = "2026-07-01T09:00")]
    pub starts_at: String,
    pub ends_at: String,
    pub deadline: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_age: Option<u32>,
    pub status_internal: EventStatus,
    pub status_external: EventStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bahn_card_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages_required: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_station_required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_preference_options: Option<Vec<TeamPreferenceOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_required: Option<bool>,
    pub team_application_required: TeamApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions: Option<BTreeMap<String, Question>>,
    #[serde(rename = "created_at", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "updated_at", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Best-effort parse of the date strings events carry. Offsets are folded
/// into UTC; local date-times and plain dates are taken as written.
pub fn parse_instant(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(instant) = NaiveDateTime::parse_from_str(value, format) {
            return Some(instant);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
