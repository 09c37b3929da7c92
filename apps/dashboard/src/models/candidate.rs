use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const FULL_TIME: &str = "full-time";
pub const PART_TIME: &str = "part-time";

/// A single role held by a candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkExperience {
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
}

/// A candidate record as persisted in the submissions document.
///
/// Unknown fields submitted by a client are carried in `extra` and written
/// back untouched. Optional fields read `null` as empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub work_availability: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub work_experiences: Vec<WorkExperience>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Candidate {
    pub fn experience_count(&self) -> usize {
        self.work_experiences.len()
    }

    pub fn is_available(&self, tag: &str) -> bool {
        self.work_availability.iter().any(|t| t == tag)
    }
}

/// Request body for creating a candidate. Server-assigned fields sent by the
/// client (`id`, `created_at`, `reason`) are ignored. Only `name` is checked;
/// the lists accept `null`, a single value, or an array, and array items of
/// the wrong shape are skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCandidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub work_availability: Vec<String>,
    #[serde(default, deserialize_with = "lenient_vec")]
    pub work_experiences: Vec<WorkExperience>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReasonUpdate {
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
}

/// Envelope returned by the create and update endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateResponse {
    pub message: String,
    pub candidate: Candidate,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        single => vec![single],
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extra_fields_survive_round_trip() {
        let raw = json!({
            "id": "1700000000000",
            "name": "Grace Hopper",
            "work_availability": ["part-time"],
            "work_experiences": [{"role": "Rear Admiral", "company": "US Navy"}],
            "created_at": "2023-11-14T22:13:20.000Z",
            "reason": "",
            "location": "Arlington"
        });
        let candidate: Candidate = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(candidate.extra.get("location"), Some(&json!("Arlington")));
        assert_eq!(serde_json::to_value(&candidate).unwrap(), raw);
    }

    #[test]
    fn test_missing_optional_fields_default_to_empty() {
        let candidate: Candidate =
            serde_json::from_value(json!({"id": "1", "name": "Ada"})).unwrap();
        assert!(candidate.work_availability.is_empty());
        assert!(candidate.work_experiences.is_empty());
        assert_eq!(candidate.reason, "");
        assert_eq!(candidate.experience_count(), 0);
    }

    #[test]
    fn test_new_candidate_collects_unknown_fields() {
        let body: NewCandidate = serde_json::from_value(json!({
            "name": "Ada",
            "work_availability": ["full-time"],
            "team": "platform"
        }))
        .unwrap();
        assert_eq!(body.name.as_deref(), Some("Ada"));
        assert_eq!(body.work_availability, vec![FULL_TIME.to_string()]);
        assert_eq!(body.extra.get("team"), Some(&json!("platform")));
    }

    #[test]
    fn test_null_optional_fields_read_as_empty() {
        let candidate: Candidate = serde_json::from_value(json!({
            "id": "1",
            "name": "Ada",
            "work_availability": null,
            "work_experiences": [{"role": null, "company": "Acme"}],
            "created_at": null,
            "reason": null
        }))
        .unwrap();
        assert!(candidate.work_availability.is_empty());
        assert_eq!(candidate.work_experiences[0].role, "");
        assert_eq!(candidate.reason, "");
    }

    #[test]
    fn test_new_candidate_lists_are_lenient() {
        let body: NewCandidate = serde_json::from_value(json!({
            "name": "A",
            "work_availability": "full-time",
            "work_experiences": null
        }))
        .unwrap();
        assert_eq!(body.work_availability, vec![FULL_TIME.to_string()]);
        assert!(body.work_experiences.is_empty());

        let body: NewCandidate = serde_json::from_value(json!({
            "name": "B",
            "work_availability": ["part-time", 7],
            "work_experiences": [{"role": "Dev", "company": "Co"}, "junk"]
        }))
        .unwrap();
        assert_eq!(body.work_availability, vec![PART_TIME.to_string()]);
        assert_eq!(body.work_experiences.len(), 1);
    }

    #[test]
    fn test_reason_update_accepts_null() {
        let update: ReasonUpdate = serde_json::from_value(json!({"reason": null})).unwrap();
        assert_eq!(update.reason, "");
    }
}
