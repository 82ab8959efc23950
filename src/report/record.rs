use super::schema::{BEARING_NOISE_ACTIVITY, PREVENTIVE_ACTIVITIES, STATUS_DONE};
use super::{is_eligible, NOT_AVAILABLE};
use crate::image::ImageSource;
use serde::Deserialize;
use std::collections::BTreeMap;

fn na() -> String {
    NOT_AVAILABLE.to_string()
}

/// Everything one report prints. Every text field holds [NOT_AVAILABLE] when
/// absent; deserializing fills missing fields the same way.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportRecord {
    pub folio: String,
    pub date: String,
    pub technician: String,
    pub locality: String,
    pub client: Client,
    pub equipment: Equipment,
    pub service: Service,
    pub checklist: Vec<ChecklistEntry>,
    pub other_activities: String,
    pub corrective: CorrectiveNarrative,
    pub noise: NoiseAnalysis,
    /// Reading key (see [schema](super::schema)) → `"value (unit)"`
    pub readings: BTreeMap<String, String>,
    /// Measurement key, e.g. `v_carga_l12` or `i_placa` → value
    pub electrical: BTreeMap<String, String>,
    pub observations: String,
    pub photos: Vec<Photo>,
    pub technician_signature: Signature,
    pub client_signature: Signature,
}

impl Default for ReportRecord {
    fn default() -> Self {
        ReportRecord {
            folio: na(),
            date: na(),
            technician: na(),
            locality: na(),
            client: Client::default(),
            equipment: Equipment::default(),
            service: Service::default(),
            checklist: Vec::new(),
            other_activities: na(),
            corrective: CorrectiveNarrative::default(),
            noise: NoiseAnalysis::default(),
            readings: BTreeMap::new(),
            electrical: BTreeMap::new(),
            observations: na(),
            photos: Vec::new(),
            technician_signature: Signature::default(),
            client_signature: Signature::default(),
        }
    }
}

impl ReportRecord {
    pub fn from_json(json: &str) -> Result<ReportRecord, crate::ReportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The value stored for a reading, or the sentinel
    pub fn reading(&self, key: &str) -> &str {
        self.readings.get(key).map(String::as_str).unwrap_or(NOT_AVAILABLE)
    }

    /// The value stored for an electrical measurement, or the sentinel
    pub fn measurement(&self, key: &str) -> &str {
        self.electrical
            .get(key)
            .map(String::as_str)
            .unwrap_or(NOT_AVAILABLE)
    }

    /// The download name offered for the finished document,
    /// e.g. `REPORTE_PREVENTIVO_Aceros_del_Norte.pdf`
    pub fn suggested_file_name(&self) -> String {
        format!(
            "REPORTE_{}_{}.pdf",
            self.service.kind.to_uppercase(),
            self.client.name.replace(' ', "_")
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Client {
    pub name: String,
    pub contact: String,
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl Default for Client {
    fn default() -> Self {
        Client {
            name: na(),
            contact: na(),
            phone: na(),
            email: na(),
            address: na(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Equipment {
    /// Free text from the equipment catalogue, e.g. "Compresor de tornillo libre de aceite"
    #[serde(rename = "type")]
    pub kind: String,
    pub model: String,
    pub serial: String,
    pub brand: String,
    /// A bare number; the unit depends on the kind of equipment
    pub power: String,
}

impl Default for Equipment {
    fn default() -> Self {
        Equipment {
            kind: na(),
            model: na(),
            serial: na(),
            brand: na(),
            power: na(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Service {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

impl Default for Service {
    fn default() -> Self {
        Service {
            kind: na(),
            description: na(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChecklistEntry {
    pub activity: String,
    #[serde(default = "na")]
    pub status: String,
}

impl ChecklistEntry {
    pub fn new<A: ToString>(activity: A, done: bool) -> ChecklistEntry {
        ChecklistEntry {
            activity: activity.to_string(),
            status: if done { STATUS_DONE.to_string() } else { na() },
        }
    }

    /// The standard preventive checklist. `done[i]` marks activity `i` of
    /// [PREVENTIVE_ACTIVITIES] (missing flags count as not done); the bearing
    /// noise analysis is appended last.
    pub fn standard_catalogue(done: &[bool], noise_analysis: bool) -> Vec<ChecklistEntry> {
        PREVENTIVE_ACTIVITIES
            .iter()
            .enumerate()
            .map(|(i, activity)| ChecklistEntry::new(activity, done.get(i).copied().unwrap_or(false)))
            .chain(std::iter::once(ChecklistEntry::new(
                BEARING_NOISE_ACTIVITY,
                noise_analysis,
            )))
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorrectiveNarrative {
    pub diagnosis: String,
    pub root_cause: String,
    pub activities: String,
    pub parts: String,
    pub condition_found: String,
    pub condition_delivered: String,
}

impl Default for CorrectiveNarrative {
    fn default() -> Self {
        CorrectiveNarrative {
            diagnosis: na(),
            root_cause: na(),
            activities: na(),
            parts: na(),
            condition_found: na(),
            condition_delivered: na(),
        }
    }
}

impl CorrectiveNarrative {
    /// The six narratives in print order
    pub fn blocks(&self) -> [&str; 6] {
        [
            self.diagnosis.as_str(),
            self.root_cause.as_str(),
            self.activities.as_str(),
            self.parts.as_str(),
            self.condition_found.as_str(),
            self.condition_delivered.as_str(),
        ]
    }
}

/// Bearing noise analysis taken during a preventive service
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum NoiseAnalysis {
    #[default]
    None,
    Simple {
        #[serde(default = "na")]
        kind: String,
        #[serde(default = "na")]
        result: String,
        #[serde(default = "na")]
        observations: String,
    },
    Spm {
        #[serde(default)]
        matrix: SpmMatrix,
    },
}

/// Shock pulse readings: row key (e.g. `carga_dbm`) → column key (e.g. `mbrg`) → value
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct SpmMatrix(pub BTreeMap<String, BTreeMap<String, String>>);

impl SpmMatrix {
    pub fn get(&self, row: &str, column: &str) -> &str {
        self.0
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or(NOT_AVAILABLE)
    }

    pub fn set<V: ToString>(&mut self, row: &str, column: &str, value: V) -> &mut Self {
        self.0
            .entry(row.to_string())
            .or_default()
            .insert(column.to_string(), value.to_string());
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub image: ImageSource,
    #[serde(default = "na")]
    pub caption: String,
}

impl Photo {
    pub fn new<S: Into<ImageSource>, C: ToString>(image: S, caption: C) -> Photo {
        Photo {
            image: image.into(),
            caption: caption.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Signature {
    pub name: String,
    pub image: ImageSource,
}

impl Default for Signature {
    fn default() -> Self {
        Signature {
            name: na(),
            image: ImageSource::Missing,
        }
    }
}

/// Joins a reading and its unit as `"value (unit)"`. A missing value gives the
/// sentinel, so the reading is filtered out; a missing unit is left off.
pub fn join_value_unit(value: &str, unit: &str) -> String {
    let value = value.trim();
    let unit = unit.trim();
    match (is_eligible(value), is_eligible(unit)) {
        (false, _) => na(),
        (true, false) => value.to_string(),
        (true, true) => format!("{value} ({unit})"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_to_the_sentinel() {
        let record = ReportRecord::from_json(r#"{"folio": "MXL-7", "client": {"name": "ACME"}}"#)
            .expect("valid record");
        assert_eq!(record.folio, "MXL-7");
        assert_eq!(record.client.name, "ACME");
        assert_eq!(record.client.email, NOT_AVAILABLE);
        assert_eq!(record.equipment.kind, NOT_AVAILABLE);
        assert_eq!(record.corrective.parts, NOT_AVAILABLE);
        assert_eq!(record.reading("dg_1"), NOT_AVAILABLE);
        assert!(matches!(record.noise, NoiseAnalysis::None));
        assert!(record.technician_signature.image.is_missing());
    }

    #[test]
    fn deserializes_variant_payloads() {
        let record = ReportRecord::from_json(
            r#"{
                "equipment": {"type": "Secador refrigerativo", "power": "250"},
                "noise": {"mode": "spm", "matrix": {"carga_dbm": {"mbrg": "32"}}},
                "photos": [{"image": "data:image/png;base64,AAAA", "caption": "Tablero"}],
                "client_signature": {"name": "Ana", "image": "N/A"}
            }"#,
        )
        .expect("valid record");
        assert_eq!(record.equipment.kind, "Secador refrigerativo");
        match &record.noise {
            NoiseAnalysis::Spm { matrix } => {
                assert_eq!(matrix.get("carga_dbm", "mbrg"), "32");
                assert_eq!(matrix.get("carga_dbm", "bg"), NOT_AVAILABLE);
            }
            other => panic!("expected spm analysis, got {other:?}"),
        }
        assert!(matches!(record.photos[0].image, ImageSource::DataUri(_)));
        assert!(record.client_signature.image.is_missing());
    }

    #[test]
    fn value_and_unit_are_joined() {
        assert_eq!(join_value_unit("5", "°C"), "5 (°C)");
        assert_eq!(join_value_unit(" 110 ", ""), "110");
        assert_eq!(join_value_unit("", "psi"), NOT_AVAILABLE);
        assert_eq!(join_value_unit("N/A", "N/A"), NOT_AVAILABLE);
    }

    #[test]
    fn standard_catalogue_marks_done_flags() {
        let entries = ChecklistEntry::standard_catalogue(&[true, false, true], true);
        assert_eq!(entries.len(), 26);
        assert_eq!(entries[0].status, STATUS_DONE);
        assert_eq!(entries[1].status, NOT_AVAILABLE);
        assert_eq!(entries[2].status, STATUS_DONE);
        assert_eq!(entries[24].status, NOT_AVAILABLE);
        assert_eq!(entries[25].activity, BEARING_NOISE_ACTIVITY);
        assert_eq!(entries[25].status, STATUS_DONE);
    }

    #[test]
    fn file_name_uses_service_and_client() {
        let mut record = ReportRecord::default();
        record.service.kind = "Preventivo".into();
        record.client.name = "Aceros del Norte".into();
        assert_eq!(
            record.suggested_file_name(),
            "REPORTE_PREVENTIVO_Aceros_del_Norte.pdf"
        );
    }
}
