use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::deserializers::{number_or_string, single_or_vec_or_null};

/// One law as listed by the `laws` endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LawSummary {
    /// Stable identifier of the law revision
    pub law_id: String,
    /// Official law number, used as the fallback lookup key
    pub law_num: Option<String>,
    /// Law title
    pub law_name: Option<String>,
    /// Category code the law was listed under
    pub category_cd: String,
}

impl LawSummary {
    pub fn new(law_id: impl Into<String>, category_cd: impl Into<String>) -> Self {
        Self {
            law_id: law_id.into(),
            law_num: None,
            law_name: None,
            category_cd: category_cd.into(),
        }
    }

    pub fn with_law_num(mut self, law_num: impl Into<String>) -> Self {
        self.law_num = Some(law_num.into()).filter(|s: &String| !s.trim().is_empty());
        self
    }

    pub fn with_law_name(mut self, law_name: impl Into<String>) -> Self {
        self.law_name = Some(law_name.into()).filter(|s: &String| !s.trim().is_empty());
        self
    }

    /// Best human-readable label for logs and progress output
    pub fn label(&self) -> &str {
        self.law_name
            .as_deref()
            .or(self.law_num.as_deref())
            .unwrap_or(&self.law_id)
    }
}

/// Which key the detail endpoint answered to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey {
    LawId,
    LawNum,
}

impl LookupKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LawId => "law_id",
            Self::LawNum => "law_num",
        }
    }
}

/// Full law text, kept as the raw JSON the API returned
#[derive(Debug, Clone, PartialEq)]
pub struct LawDetail {
    pub body: serde_json::Value,
    pub lookup: LookupKey,
}

impl LawDetail {
    pub fn new(body: serde_json::Value, lookup: LookupKey) -> Self {
        Self { body, lookup }
    }
}

/// Parsed result of one list request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LawList {
    pub laws: Vec<LawSummary>,
    /// `total_count` as reported by the API, when present
    pub total_count: Option<u64>,
    /// Entries dropped because they carried no usable identifier
    pub dropped: usize,
}

// Raw response structures for the e-Gov v2 `laws` endpoint

#[derive(Debug, Deserialize)]
pub(crate) struct LawListResponse {
    /// Envelope some deployments wrap the whole body in
    #[serde(default)]
    pub laws_response: Option<Box<LawListResponse>>,
    #[serde(default, deserialize_with = "number_or_string")]
    pub total_count: Option<u64>,
    /// `None` only when the key is absent; an explicit null is an empty list.
    /// Entries stay untyped so one odd entry cannot fail the whole list.
    #[serde(default, deserialize_with = "entry_list")]
    pub law_info_list: Option<Vec<Value>>,
}

impl LawListResponse {
    /// The body inside `laws_response` when present, otherwise the body itself
    pub fn unwrap_envelope(self) -> Self {
        match self.laws_response {
            Some(inner) => *inner,
            None => self,
        }
    }
}

fn entry_list<'de, D>(deserializer: D) -> Result<Option<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Some(single_or_vec_or_null(deserializer)?.unwrap_or_default()))
}

/// Flatten one `law_info_list` entry. Older payloads carry the fields flat
/// (snake_case or camelCase), the live API nests them under `law_info` and
/// `revision_info`; flat keys win. `None` when no usable identifier is found.
pub(crate) fn summary_from_entry(entry: &Value, category_cd: &str) -> Option<LawSummary> {
    let law_info = entry.get("law_info");
    let revision_info = entry.get("revision_info");

    let law_id = text_field(entry, &["law_id", "lawId"])
        .or_else(|| law_info.and_then(|info| text_field(info, &["law_id", "lawId"])))?;
    let law_num = text_field(entry, &["law_num", "lawNum"])
        .or_else(|| law_info.and_then(|info| text_field(info, &["law_num", "lawNum"])));
    let law_name = text_field(entry, &["law_name", "lawName"])
        .or_else(|| revision_info.and_then(|rev| text_field(rev, &["law_title", "lawTitle"])));

    Some(LawSummary {
        law_id,
        law_num,
        law_name,
        category_cd: category_cd.to_string(),
    })
}

/// First non-blank value among `keys`. Numbers count as their decimal text,
/// any other JSON type as missing.
fn text_field(object: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match object.get(*key)? {
        Value::String(s) => Some(s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
