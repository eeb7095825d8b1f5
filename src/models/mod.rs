//! Payload schemas of the records kept in the hosted database.
//!
//! The portal does not own these records; it only checks that a payload
//! matches the schema before the front end sends it on.

pub mod application;
pub mod enums;
pub mod event;
pub mod profile;
pub mod school;
pub mod user_role;

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{AppError, AppResult};

pub use application::Application;
pub use event::Event;
pub use profile::Profile;
pub use school::School;
pub use user_role::UserRoleRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Profile,
    Event,
    Application,
    School,
    UserRole,
}

impl EntityKind {
    pub const ALL: [EntityKind; 5] = [
        EntityKind::Profile,
        EntityKind::Event,
        EntityKind::Application,
        EntityKind::School,
        EntityKind::UserRole,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Profile => "profile",
            EntityKind::Event => "event",
            EntityKind::Application => "application",
            EntityKind::School => "school",
            EntityKind::UserRole => "user-role",
        }
    }

    /// Parses and re-serializes `body`, returning the normalized record.
    pub fn validate(self, body: &[u8]) -> AppResult<serde_json::Value> {
        match self {
            EntityKind::Profile => normalize::<Profile>(body),
            EntityKind::Event => normalize::<Event>(body).and_then(|value| {
                check_event(&value)?;
                Ok(value)
            }),
            EntityKind::Application => normalize::<Application>(body),
            EntityKind::School => normalize::<School>(body),
            EntityKind::UserRole => normalize::<UserRoleRecord>(body),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| AppError::not_found(format!("unknown entity `{s}`")))
    }
}

fn normalize<T: DeserializeOwned + Serialize>(body: &[u8]) -> AppResult<serde_json::Value> {
    let mut de = serde_json::Deserializer::from_slice(body);
    let record: T = serde_path_to_error::deserialize(&mut de).map_err(|err| {
        let path = err.path().to_string();
        let inner = err.into_inner();
        if path.is_empty() || path == "." {
            AppError::bad_request(inner.to_string())
        } else {
            AppError::bad_request(format!("{path}: {inner}"))
        }
    })?;
    de.end()
        .map_err(|err| AppError::bad_request(format!("trailing data: {err}")))?;

    serde_json::to_value(&record).map_err(|err| AppError::internal(err.to_string()))
}

fn check_event(value: &serde_json::Value) -> AppResult<()> {
    let event: Event =
        serde_json::from_value(value.clone()).map_err(|err| AppError::internal(err.to_string()))?;

    // dates the parser does not understand are passed through unchecked
    if let (Some(starts), Some(ends)) = (
        event::parse_instant(&event.starts_at),
        event::parse_instant(&event.ends_at),
    ) {
        if ends < starts {
            return Err(AppError::bad_request("endsAt: must not be before startsAt"));
        }
    }
    for (key, question) in event.questions.iter().flatten() {
        let has_options = question.options.as_ref().is_some_and(|options| !options.is_empty());
        if question.kind.has_options() && !has_options {
            return Err(AppError::bad_request(format!(
                "questions.{key}.options: required for {} questions",
                question.kind.as_str()
            )));
        }
    }
    Ok(())
}
