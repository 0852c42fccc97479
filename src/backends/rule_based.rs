//! Rule-based entity extraction: labeled-line and pattern matching over
//! recognized text. No network, deterministic, the default backend.

use regex::Regex;

use crate::pipeline::{ClinicalEntities, LabValueEntity, MedicationEntity};

use super::{BackendError, EntityExtractor};

/// Symptom vocabulary scanned for whole-word matches.
const SYMPTOM_KEYWORDS: &[&str] = &[
    "fever",
    "cough",
    "headache",
    "nausea",
    "vomiting",
    "fatigue",
    "dizziness",
    "chest pain",
    "shortness of breath",
    "palpitations",
    "rash",
    "abdominal pain",
];

/// Deterministic extractor built on labeled-line and dose patterns.
pub struct RuleBasedExtractor {
    patient_re: Regex,
    dob_re: Regex,
    date_re: Regex,
    diagnosis_re: Regex,
    medication_re: Regex,
    lab_re: Regex,
    procedure_re: Regex,
    symptom_re: Regex,
}

impl RuleBasedExtractor {
    pub fn new() -> Self {
        let symptom_alternation = SYMPTOM_KEYWORDS.join("|").replace(' ', "[ \t]");
        Self {
            patient_re: Regex::new(r"(?im)^[ \t]*patient(?:[ \t]+name)?[ \t]*[:\-][ \t]*(.+)$")
                .expect("valid pattern"),
            dob_re: Regex::new(
                r"(?im)\b(?:dob|date of birth)[ \t]*[:\-][ \t]*([0-9]{1,2}[/.\-][0-9]{1,2}[/.\-][0-9]{2,4}|[0-9]{4}-[0-9]{2}-[0-9]{2})",
            )
            .expect("valid pattern"),
            date_re: Regex::new(r"(?im)^[ \t]*date[ \t]*[:\-][ \t]*(\S.*)$").expect("valid pattern"),
            diagnosis_re: Regex::new(
                r"(?im)^[ \t]*(?:diagnosis|diagnoses|impression|assessment)[ \t]*[:\-][ \t]*(.+)$",
            )
            .expect("valid pattern"),
            medication_re: Regex::new(
                r"\b([A-Z][a-zA-Z]{2,})[ \t]+(\d+(?:\.\d+)?[ \t]*(?i:mg|mcg|g|ml|units?))(?:[ \t]+((?i:once daily|twice daily|three times daily|every [0-9]+ hours?|daily|nightly|weekly|bid|tid|qid|prn)))?",
            )
            .expect("valid pattern"),
            lab_re: Regex::new(
                r"(?m)^[ \t]*([A-Za-z][A-Za-z0-9 /\-]{0,39}?)[ \t]*[:\-][ \t]*(\d+(?:\.\d+)?)[ \t]*(mg/dL|mmol/L|g/dL|g/L|%|U/L|IU/L|mEq/L|ng/mL|mmHg)(?:[ \t]*\((\d+(?:\.\d+)?[ \t]*[-–][ \t]*\d+(?:\.\d+)?)\))?",
            )
            .expect("valid pattern"),
            procedure_re: Regex::new(
                r"(?im)^[ \t]*(?:procedure|surgery|operation)[ \t]*[:\-][ \t]*(.+)$",
            )
            .expect("valid pattern"),
            symptom_re: Regex::new(&format!(r"(?i)\b(?:{symptom_alternation})\b"))
                .expect("valid pattern"),
        }
    }

    fn first_capture(&self, re: &Regex, text: &str) -> Option<String> {
        re.captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn split_listed(&self, re: &Regex, text: &str) -> Vec<String> {
        let mut items = Vec::new();
        for caps in re.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                for part in m.as_str().split([',', ';']) {
                    let part = part.trim().trim_end_matches('.');
                    if !part.is_empty() && !items.iter().any(|i: &String| i.eq_ignore_ascii_case(part)) {
                        items.push(part.to_string());
                    }
                }
            }
        }
        items
    }

    fn medications(&self, text: &str) -> Vec<MedicationEntity> {
        let mut meds: Vec<MedicationEntity> = Vec::new();
        for caps in self.medication_re.captures_iter(text) {
            let dose_match = match caps.get(2) {
                Some(m) => m,
                None => continue,
            };
            // "110 mg/dL" is a lab value, not a dose
            if text[dose_match.end()..].starts_with('/') {
                continue;
            }
            let name = caps[1].trim().to_string();
            if meds.iter().any(|m| m.name.eq_ignore_ascii_case(&name)) {
                continue;
            }
            meds.push(MedicationEntity {
                name,
                dose: Some(dose_match.as_str().trim().to_string()),
                frequency: caps.get(3).map(|m| m.as_str().trim().to_lowercase()),
                route: None,
            });
        }
        meds
    }

    fn lab_values(&self, text: &str) -> Vec<LabValueEntity> {
        let mut labs: Vec<LabValueEntity> = Vec::new();
        for caps in self.lab_re.captures_iter(text) {
            let test_name = caps[1].trim().to_string();
            // Labeled lines owned by other extractors
            if test_name.eq_ignore_ascii_case("date") || test_name.eq_ignore_ascii_case("dob") {
                continue;
            }
            if labs.iter().any(|l| l.test_name.eq_ignore_ascii_case(&test_name)) {
                continue;
            }
            labs.push(LabValueEntity {
                test_name,
                value: Some(caps[2].to_string()),
                unit: Some(caps[3].to_string()),
                reference_range: caps.get(4).map(|m| m.as_str().trim().to_string()),
            });
        }
        labs
    }

    fn symptoms(&self, text: &str) -> Vec<String> {
        let mut found = Vec::new();
        for m in self.symptom_re.find_iter(text) {
            let normalized = m.as_str().to_lowercase();
            if !found.contains(&normalized) {
                found.push(normalized);
            }
        }
        found
    }
}

impl Default for RuleBasedExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityExtractor for RuleBasedExtractor {
    fn extract_from_text(&self, text: &str) -> Result<ClinicalEntities, BackendError> {
        Ok(ClinicalEntities {
            patient_name: self.first_capture(&self.patient_re, text),
            date_of_birth: self.first_capture(&self.dob_re, text),
            document_date: self.first_capture(&self.date_re, text),
            diagnoses: self.split_listed(&self.diagnosis_re, text),
            medications: self.medications(text),
            lab_values: self.lab_values(text),
            signs_symptoms: self.symptoms(text),
            procedures: self.split_listed(&self.procedure_re, text),
            notes: None,
        })
    }
}
