use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Input data for the analysis commands
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Dataset {
    /// Timestamp when the dataset was created (ISO 8601 format)
    pub generated_at: DateTime<Utc>,
    /// Random seed used to generate the dataset, absent for recorded data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(flatten)]
    pub data: DatasetData,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DatasetData {
    /// A single sample
    Sample { values: Vec<f64> },
    /// Two independent groups
    TwoSample { x: Vec<f64>, y: Vec<f64> },
    /// Paired predictor and response
    Regression { x: Vec<f64>, y: Vec<f64> },
    /// Many features measured on the same samples; the first
    /// `group_a_size` values of each feature belong to group A
    FeatureMatrix {
        group_a_size: usize,
        features: Vec<Feature>,
    },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Feature {
    pub id: String,
    pub values: Vec<f64>,
}

impl DatasetData {
    pub fn kind(&self) -> &'static str {
        match self {
            DatasetData::Sample { .. } => "sample",
            DatasetData::TwoSample { .. } => "two_sample",
            DatasetData::Regression { .. } => "regression",
            DatasetData::FeatureMatrix { .. } => "feature_matrix",
        }
    }

    pub fn sample(&self) -> anyhow::Result<&[f64]> {
        match self {
            DatasetData::Sample { values } => Ok(values),
            _ => Err(self.kind_mismatch("sample")),
        }
    }

    pub fn two_sample(&self) -> anyhow::Result<(&[f64], &[f64])> {
        match self {
            DatasetData::TwoSample { x, y } => Ok((x, y)),
            _ => Err(self.kind_mismatch("two_sample")),
        }
    }

    pub fn regression(&self) -> anyhow::Result<(&[f64], &[f64])> {
        match self {
            DatasetData::Regression { x, y } => Ok((x, y)),
            _ => Err(self.kind_mismatch("regression")),
        }
    }

    pub fn feature_matrix(&self) -> anyhow::Result<(usize, &[Feature])> {
        match self {
            DatasetData::FeatureMatrix {
                group_a_size,
                features,
            } => Ok((*group_a_size, features)),
            _ => Err(self.kind_mismatch("feature_matrix")),
        }
    }

    fn kind_mismatch(&self, expected: &str) -> anyhow::Error {
        anyhow::anyhow!(
            "Expected a `{expected}` dataset, found `{}`",
            self.kind()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_feature_matrix() {
        let json = r#"{
            "generated_at": "2025-01-01T00:00:00Z",
            "kind": "feature_matrix",
            "group_a_size": 2,
            "features": [
                { "id": "g1", "values": [1.0, 2.0, 3.0, 4.0] },
                { "id": "g2", "values": [0.5, 0.1, 0.2, 0.3] }
            ]
        }"#;
        let dataset: Dataset = serde_json::from_str(json).unwrap();
        assert_eq!(dataset.seed, None);
        let (group_a_size, features) = dataset.data.feature_matrix().unwrap();
        assert_eq!(group_a_size, 2);
        assert_eq!(features[1].id, "g2");
    }

    #[test]
    fn test_kind_tag_is_written() {
        let dataset = Dataset {
            generated_at: Utc::now(),
            seed: Some(3),
            data: DatasetData::TwoSample {
                x: vec![1.0],
                y: vec![2.0],
            },
        };
        let value = serde_json::to_value(&dataset).unwrap();
        assert_eq!(value["kind"], "two_sample");
        assert_eq!(value["seed"], 3);
    }

    #[test]
    fn test_kind_mismatch_is_reported() {
        let data = DatasetData::Sample { values: vec![1.0] };
        let err = data.regression().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Expected a `regression` dataset, found `sample`"
        );
    }
}
