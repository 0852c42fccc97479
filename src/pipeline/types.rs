use serde::{Deserialize, Serialize};

use super::error::ExtractError;

/// One inbound document: raw bytes plus the metadata the client declared.
/// Created on request receipt, consumed once, discarded after processing.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

/// Document classes the pipeline can process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Image,
    Pdf,
}

impl Document {
    pub fn new(filename: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Classify the declared media type. `None` means the document is not
    /// processable and must be rejected before any collaborator runs.
    pub fn kind(&self) -> Option<DocumentKind> {
        if self.media_type.starts_with("image/") {
            Some(DocumentKind::Image)
        } else if self.media_type == "application/pdf" {
            Some(DocumentKind::Pdf)
        } else {
            None
        }
    }
}

/// Structured clinical entities extracted from a single document.
/// Fields the document does not contain are omitted from the JSON output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicalEntities {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnoses: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub medications: Vec<MedicationEntity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lab_values: Vec<LabValueEntity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub signs_symptoms: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub procedures: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ClinicalEntities {
    pub fn is_empty(&self) -> bool {
        self.patient_name.is_none()
            && self.date_of_birth.is_none()
            && self.document_date.is_none()
            && self.diagnoses.is_empty()
            && self.medications.is_empty()
            && self.lab_values.is_empty()
            && self.signs_symptoms.is_empty()
            && self.procedures.is_empty()
            && self.notes.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationEntity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabValueEntity {
    pub test_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_range: Option<String>,
}

/// One item of a batch result stream: the source filename plus either the
/// extracted entities or an error descriptor, never both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedResult {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entities: Option<ClinicalEntities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResultError>,
}

/// Error descriptor attached to a failed batch item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultError {
    pub code: String,
    pub message: String,
}

impl TaggedResult {
    pub fn success(filename: impl Into<String>, entities: ClinicalEntities) -> Self {
        Self {
            filename: filename.into(),
            entities: Some(entities),
            error: None,
        }
    }

    pub fn failure(filename: impl Into<String>, err: &ExtractError) -> Self {
        Self {
            filename: filename.into(),
            entities: None,
            error: Some(ResultError {
                code: err.code().to_string(),
                message: err.to_string(),
            }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.entities.is_some()
    }
}
