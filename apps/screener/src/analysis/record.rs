use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const FIT_FIELD: &str = "overall_fit_percentage";

/// Outcome tag carried by every entry of a batch report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeStatus {
    Success,
    Failed,
}

impl ResumeStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ResumeStatus::Success => "success",
            ResumeStatus::Failed => "failed",
        }
    }
}

/// One model-produced analysis, kept as a loose JSON object.
///
/// The schema is a contract with whoever renders the report, not with this
/// service. The only field read here is `overall_fit_percentage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisRecord(Map<String, Value>);

impl AnalysisRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Fit score used for ranking. Missing or unreadable values count as 0.
    /// Numeric strings like `"82"` or `"82%"` are accepted.
    pub fn fit_percentage(&self) -> f64 {
        match self.0.get(FIT_FIELD) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s
                .trim()
                .trim_end_matches('%')
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Marks the record as a batch success. `resume_id` is the 1-based submission index.
    pub fn stamp_success(&mut self, filename: &str, resume_id: usize) {
        self.0
            .insert("filename".to_string(), Value::String(filename.to_string()));
        self.0
            .insert("status".to_string(), Value::from(ResumeStatus::Success.as_str()));
        self.0.insert("resume_id".to_string(), Value::from(resume_id));
    }

    pub fn set_rank(&mut self, rank: usize) {
        self.0.insert("rank".to_string(), Value::from(rank));
    }
}

#[cfg(test)]
impl AnalysisRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn rank(&self) -> Option<u64> {
        self.0.get("rank").and_then(Value::as_u64)
    }

    pub fn resume_id(&self) -> Option<u64> {
        self.0.get("resume_id").and_then(Value::as_u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> AnalysisRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_fit_percentage_integer_and_float() {
        assert_eq!(record(json!({FIT_FIELD: 72})).fit_percentage(), 72.0);
        assert_eq!(record(json!({FIT_FIELD: 64.5})).fit_percentage(), 64.5);
    }

    #[test]
    fn test_missing_fit_defaults_to_zero() {
        assert_eq!(record(json!({"candidate_name": "A"})).fit_percentage(), 0.0);
        assert_eq!(record(json!({FIT_FIELD: null})).fit_percentage(), 0.0);
    }

    #[test]
    fn test_fit_percentage_lenient_strings() {
        assert_eq!(record(json!({FIT_FIELD: "81%"})).fit_percentage(), 81.0);
        assert_eq!(record(json!({FIT_FIELD: " 55 "})).fit_percentage(), 55.0);
        assert_eq!(record(json!({FIT_FIELD: "high"})).fit_percentage(), 0.0);
    }

    #[test]
    fn test_stamped_fields_readable() {
        let mut r = record(json!({"candidate_name": "Ada", FIT_FIELD: 90}));
        assert_eq!(r.rank(), None);
        r.stamp_success("ada.pdf", 2);
        r.set_rank(4);
        assert_eq!(r.resume_id(), Some(2));
        assert_eq!(r.rank(), Some(4));
        assert_eq!(r.get("candidate_name").unwrap(), "Ada");
    }

    #[test]
    fn test_stamp_and_rank_serialize_flat() {
        let mut r = record(json!({"candidate_name": "Ada", FIT_FIELD: 90}));
        r.stamp_success("ada.pdf", 3);
        r.set_rank(1);

        let out = serde_json::to_value(&r).unwrap();
        assert_eq!(
            out,
            json!({
                "candidate_name": "Ada",
                FIT_FIELD: 90,
                "filename": "ada.pdf",
                "status": "success",
                "resume_id": 3,
                "rank": 1
            })
        );
        assert_eq!(r.rank(), Some(1));
        assert_eq!(r.resume_id(), Some(3));
    }
}
