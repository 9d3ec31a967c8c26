use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

// a single advertised campaign as delivered by the inventory API
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub link_url: String,
    #[serde(with = "create_date")]
    pub create_date: NaiveDate,
    pub order_seq: i64,
}

impl PromotionRecord {
    pub fn date_label(&self) -> String {
        format_date_label(&self.create_date.format(DATE_FORMAT).to_string())
    }
}

/// Turns `2025-03-20` into the open-ended range label `2025.03.20 ~`.
pub fn format_date_label(raw: &str) -> String {
    format!("{} ~", raw.replace('-', "."))
}

/// Parses a `YYYY-MM-DD` date, dropping any time component that follows it.
pub fn parse_create_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let trimmed = raw.trim();
    let date_part = trimmed
        .split(|c| c == 'T' || c == ' ')
        .next()
        .unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT)
}

mod create_date {
    use chrono::NaiveDate;
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::DATE_FORMAT;

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_create_date(&raw)
            .map_err(|e| de::Error::custom(format!("invalid createDate '{raw}': {e}")))
    }
}
