use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Title {
    Mr,
    Mrs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Grade {
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "11")]
    Eleven,
    #[serde(rename = "12")]
    Twelve,
    #[serde(rename = "13")]
    Thirteen,
    Graduate,
}

/// German federal state; `-` when not applicable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum FederalState {
    Brandenburg,
    Berlin,
    #[serde(rename = "Baden-Württemberg")]
    BadenWuerttemberg,
    Bayern,
    Bremen,
    Hessen,
    Hamburg,
    #[serde(rename = "Mecklenburg-Vorpommern")]
    MecklenburgVorpommern,
    Niedersachsen,
    #[serde(rename = "Nordrhein-Westfalen")]
    NordrheinWestfalen,
    #[serde(rename = "Rheinland-Pfalz")]
    RheinlandPfalz,
    #[serde(rename = "Schleswig-Holstein")]
    SchleswigHolstein,
    Saarland,
    Sachsen,
    #[serde(rename = "Sachsen-Anhalt")]
    SachsenAnhalt,
    #[serde(rename = "Thüringen")]
    Thueringen,
    #[serde(rename = "-")]
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Allergen {
    Gluten,
    Crabs,
    Eggs,
    Fish,
    Peanuts,
    Soy,
    Milk,
    Nuts,
    Celery,
    Mustard,
    Sesame,
    SulphurDioxide,
    Lupine,
    Molluscs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BahnCard {
    None,
    BahnCard25,
    BahnCard50,
    BahnCard100,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TeamApplicationStatus {
    NotOpen,
    Optional,
    Required,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

/// Kind of an event question. Unknown kinds are kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionType {
    Text,
    MultipleChoice,
    Checkbox,
    Number,
    Other(String),
}

impl QuestionType {
    pub fn as_str(&self) -> &str {
        match self {
            QuestionType::Text => "text",
            QuestionType::MultipleChoice => "multipleChoice",
            QuestionType::Checkbox => "checkbox",
            QuestionType::Number => "number",
            QuestionType::Other(kind) => kind,
        }
    }

    /// Whether answers are picked from a fixed option list.
    pub fn has_options(&self) -> bool {
        matches!(self, QuestionType::MultipleChoice | QuestionType::Checkbox)
    }
}

impl From<String> for QuestionType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "text" => QuestionType::Text,
            "multipleChoice" => QuestionType::MultipleChoice,
            "checkbox" => QuestionType::Checkbox,
            "number" => QuestionType::Number,
            _ => QuestionType::Other(value),
        }
    }
}

impl Serialize for QuestionType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for QuestionType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(QuestionType::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(serde_json::to_string(&Grade::Ten).unwrap(), "\"10\"");
        assert_eq!(serde_json::to_string(&FederalState::Thueringen).unwrap(), "\"Thüringen\"");
        assert_eq!(serde_json::to_string(&FederalState::None).unwrap(), "\"-\"");
        assert_eq!(
            serde_json::to_string(&TeamApplicationStatus::NotOpen).unwrap(),
            "\"NOT_OPEN\""
        );
        assert_eq!(
            serde_json::from_str::<QuestionType>("\"multipleChoice\"").unwrap(),
            QuestionType::MultipleChoice
        );
        let date: QuestionType = serde_json::from_str("\"date\"").unwrap();
        assert_eq!(date, QuestionType::Other("date".into()));
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"date\"");
        assert!(!date.has_options());
        assert!(serde_json::from_str::<EventStatus>("\"active\"").is_err());
    }
}
