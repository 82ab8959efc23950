//! Decides what a record prints.
//!
//! The equipment and service kinds are free text; they are classified once
//! into a [ReportPlan] and nothing downstream looks at the raw strings again.

use super::record::{NoiseAnalysis, Photo, ReportRecord, Signature};
use super::schema::{self, titles, ReadingRow, ThreePhaseRow};
use super::{is_eligible, LayoutConfig, NOT_AVAILABLE};
use log::debug;
use std::borrow::Cow;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EquipmentVariant {
    Standard,
    OilFree,
    Dryer,
}

impl EquipmentVariant {
    pub fn classify(kind: &str) -> EquipmentVariant {
        let kind = kind.to_lowercase();
        if kind.contains("secador") {
            EquipmentVariant::Dryer
        } else if kind.contains("libre de aceite") {
            EquipmentVariant::OilFree
        } else {
            EquipmentVariant::Standard
        }
    }

    /// Compressors are rated in horsepower, dryers by air flow
    pub fn power_unit(&self) -> &'static str {
        match self {
            EquipmentVariant::Dryer => "CFM",
            _ => "HP",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ServiceVariant {
    Preventive,
    Corrective,
    Log,
    Other,
}

impl ServiceVariant {
    pub fn classify(kind: &str) -> ServiceVariant {
        match fold(kind).as_str() {
            "preventivo" => ServiceVariant::Preventive,
            "correctivo" | "diagnostico" | "revision" => ServiceVariant::Corrective,
            "bitacora" => ServiceVariant::Log,
            _ => ServiceVariant::Other,
        }
    }
}

/// Lowercase and strip Spanish accents so "Bitácora" and "bitacora" match
fn fold(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .map(|ch| match ch {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            other => other,
        })
        .collect()
}

/// Title-case a brand name: "ATLAS copco" → "Atlas Copco"
fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// A labelled value sharing a row with others, `ratio` of the row wide
#[derive(Debug, Clone, PartialEq)]
pub struct Cell<'r> {
    pub label: &'static str,
    pub value: Cow<'r, str>,
    pub ratio: f32,
}

impl<'r> Cell<'r> {
    pub fn new<V: Into<Cow<'r, str>>>(label: &'static str, value: V, ratio: f32) -> Cell<'r> {
        Cell {
            label,
            value: value.into(),
            ratio,
        }
    }
}

/// A titled section made of rows of cells
#[derive(Debug, Clone, PartialEq)]
pub struct RowSection<'r> {
    pub title: &'static str,
    pub rows: Vec<Vec<Cell<'r>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadingsTable<'r> {
    pub title: &'static str,
    /// Only eligible rows, in schema order
    pub rows: Vec<(&'static str, &'r str)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ElectricalRow<'r> {
    ThreePhase { label: &'static str, cells: [&'r str; 3] },
    Single { label: &'static str, value: &'r str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpmRow<'r> {
    pub label: &'static str,
    pub cells: [&'r str; 10],
}

#[derive(Debug, Clone, PartialEq)]
pub enum NoisePlan<'r> {
    None,
    Simple {
        kind: &'r str,
        result: &'r str,
        observations: &'r str,
    },
    /// Only rows with at least one reading
    Spm(Vec<SpmRow<'r>>),
}

/// The block printed between the equipment data and the readings
#[derive(Debug, Clone, PartialEq)]
pub enum VariantBlock<'r> {
    Preventive {
        /// Only the activities that were done, in checklist order
        checklist: Vec<(&'r str, &'r str)>,
        other_activities: Option<&'r str>,
        noise: NoisePlan<'r>,
    },
    Corrective {
        blocks: Vec<(&'static str, &'r str)>,
    },
    None,
}

/// Everything a record prints, resolved and filtered
#[derive(Debug, Clone)]
pub struct ReportPlan<'r> {
    pub equipment: EquipmentVariant,
    pub service: ServiceVariant,
    pub client: RowSection<'r>,
    pub service_section: RowSection<'r>,
    pub equipment_section: RowSection<'r>,
    pub variant: VariantBlock<'r>,
    /// Tables with no eligible row are left out
    pub readings: Vec<ReadingsTable<'r>>,
    pub electrical: Vec<ElectricalRow<'r>>,
    pub observations: &'r str,
    pub photos: Vec<&'r Photo>,
    pub signatures: [&'r Signature; 2],
}

impl<'r> ReportPlan<'r> {
    pub fn new(record: &'r ReportRecord, config: &LayoutConfig) -> ReportPlan<'r> {
        let equipment = EquipmentVariant::classify(&record.equipment.kind);
        let service = ServiceVariant::classify(&record.service.kind);
        debug!("planning report: {equipment:?} equipment, {service:?} service");

        let max_photos = match service {
            ServiceVariant::Log => config.photos.max_log_photos,
            _ => config.photos.max_photos,
        };
        let photos: Vec<&Photo> = record
            .photos
            .iter()
            .filter(|photo| !photo.image.is_missing())
            .take(max_photos)
            .collect();

        ReportPlan {
            equipment,
            service,
            client: client_section(record),
            service_section: service_section(record, service),
            equipment_section: equipment_section(record, equipment),
            variant: variant_block(record, service),
            readings: readings_tables(record, equipment),
            electrical: electrical_rows(record, equipment),
            observations: &record.observations,
            photos,
            signatures: [&record.technician_signature, &record.client_signature],
        }
    }
}

fn client_section(record: &ReportRecord) -> RowSection<'_> {
    let client = &record.client;
    RowSection {
        title: titles::CLIENT,
        rows: vec![
            vec![Cell::new("Cliente", client.name.as_str(), 1.0)],
            vec![
                Cell::new("Contacto", client.contact.as_str(), 0.45),
                Cell::new("Teléfono", client.phone.as_str(), 0.22),
                Cell::new("Email", client.email.as_str(), 0.33),
            ],
            vec![Cell::new("Dirección", client.address.as_str(), 1.0)],
        ],
    }
}

fn service_section(record: &ReportRecord, service: ServiceVariant) -> RowSection<'_> {
    let description: Cow<str> = match service {
        ServiceVariant::Log => Cow::Borrowed("Bitácora"),
        _ => Cow::Borrowed(record.service.description.as_str()),
    };
    RowSection {
        title: titles::SERVICE,
        rows: vec![vec![
            Cell::new("Tipo", record.service.kind.as_str(), 0.30),
            Cell::new("Descripción", description, 0.70),
        ]],
    }
}

fn equipment_section(record: &ReportRecord, equipment: EquipmentVariant) -> RowSection<'_> {
    let eq = &record.equipment;
    let brand: Cow<str> = if is_eligible(&eq.brand) {
        Cow::Owned(title_case(eq.brand.trim()))
    } else {
        Cow::Borrowed(NOT_AVAILABLE)
    };
    let power: Cow<str> = if is_eligible(&eq.power) {
        Cow::Owned(format!("{} {}", eq.power.trim(), equipment.power_unit()))
    } else {
        Cow::Borrowed(NOT_AVAILABLE)
    };
    RowSection {
        title: titles::EQUIPMENT,
        rows: vec![
            vec![Cell::new("Tipo", eq.kind.as_str(), 1.0)],
            vec![
                Cell::new("Modelo", eq.model.as_str(), 0.25),
                Cell::new("Serie", eq.serial.as_str(), 0.25),
                Cell::new("Marca", brand, 0.25),
                Cell::new("Potencia", power, 0.25),
            ],
        ],
    }
}

fn variant_block(record: &ReportRecord, service: ServiceVariant) -> VariantBlock<'_> {
    match service {
        ServiceVariant::Preventive => {
            let checklist = record
                .checklist
                .iter()
                .filter(|entry| is_eligible(&entry.status))
                .map(|entry| (entry.activity.as_str(), entry.status.as_str()))
                .collect();
            let other_activities =
                Some(record.other_activities.as_str()).filter(|text| is_eligible(text));
            VariantBlock::Preventive {
                checklist,
                other_activities,
                noise: noise_plan(&record.noise),
            }
        }
        ServiceVariant::Corrective => VariantBlock::Corrective {
            blocks: titles::CORRECTIVE
                .iter()
                .copied()
                .zip(record.corrective.blocks())
                .collect(),
        },
        ServiceVariant::Log | ServiceVariant::Other => VariantBlock::None,
    }
}

fn noise_plan(noise: &NoiseAnalysis) -> NoisePlan<'_> {
    match noise {
        NoiseAnalysis::None => NoisePlan::None,
        NoiseAnalysis::Simple {
            kind,
            result,
            observations,
        } => NoisePlan::Simple {
            kind,
            result,
            observations,
        },
        NoiseAnalysis::Spm { matrix } => {
            let rows: Vec<SpmRow> = schema::SPM_ROWS
                .iter()
                .map(|row| SpmRow {
                    label: row.label,
                    cells: schema::SPM_COLUMNS.map(|column| matrix.get(row.key, column.key)),
                })
                .filter(|row| row.cells.iter().any(|cell| is_eligible(cell)))
                .collect();
            if rows.is_empty() {
                debug!("no shock pulse readings, skipping the noise analysis");
                NoisePlan::None
            } else {
                NoisePlan::Spm(rows)
            }
        }
    }
}

fn readings_table<'r>(
    record: &'r ReportRecord,
    title: &'static str,
    schema: &[ReadingRow],
) -> Option<ReadingsTable<'r>> {
    let rows: Vec<(&'static str, &'r str)> = schema
        .iter()
        .map(|row| (row.label, record.reading(row.key)))
        .filter(|(_, value)| is_eligible(value))
        .collect();
    if rows.is_empty() {
        debug!("no readings for \"{title}\", skipping");
        None
    } else {
        Some(ReadingsTable { title, rows })
    }
}

fn readings_tables(record: &ReportRecord, equipment: EquipmentVariant) -> Vec<ReadingsTable<'_>> {
    let tables = match equipment {
        EquipmentVariant::Dryer => vec![readings_table(
            record,
            titles::DRYER_READINGS,
            &schema::DRYER_READINGS,
        )],
        EquipmentVariant::Standard => vec![readings_table(
            record,
            titles::READINGS,
            &schema::GENERAL_READINGS,
        )],
        EquipmentVariant::OilFree => vec![
            readings_table(record, titles::READINGS, &schema::GENERAL_READINGS),
            readings_table(
                record,
                titles::OIL_FREE_READINGS,
                &schema::OIL_FREE_READINGS,
            ),
        ],
    };
    tables.into_iter().flatten().collect()
}

const NO_ROWS: [ReadingRow; 0] = [];

fn electrical_rows(record: &ReportRecord, equipment: EquipmentVariant) -> Vec<ElectricalRow<'_>> {
    let (three_phase, single): (&[ThreePhaseRow], &[ReadingRow]) = match equipment {
        EquipmentVariant::Dryer => (&schema::DRYER_THREE_PHASE_ROWS[..], &NO_ROWS[..]),
        _ => (
            &schema::THREE_PHASE_ROWS[..],
            &schema::SINGLE_VALUE_ROWS[..],
        ),
    };

    let three_phase = three_phase.iter().filter_map(|row| {
        let [a, b, c] = row.cell_keys();
        let cells = [
            record.measurement(&a),
            record.measurement(&b),
            record.measurement(&c),
        ];
        cells
            .iter()
            .any(|cell| is_eligible(cell))
            .then_some(ElectricalRow::ThreePhase {
                label: row.label,
                cells,
            })
    });
    let single = single.iter().filter_map(|row| {
        let value = record.measurement(row.key);
        is_eligible(value).then_some(ElectricalRow::Single {
            label: row.label,
            value,
        })
    });

    let rows: Vec<ElectricalRow> = three_phase.chain(single).collect();
    if rows.is_empty() {
        debug!("no electrical measurements, skipping");
    }
    rows
}
