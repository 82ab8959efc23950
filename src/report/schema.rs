//! Fixed catalogues: which readings, measurements and activities a report can
//! carry, the keys they are stored under and the labels they are printed with.

/// One line of a key/value readings table
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ReadingRow {
    pub key: &'static str,
    pub label: &'static str,
}

const fn reading(key: &'static str, label: &'static str) -> ReadingRow {
    ReadingRow { key, label }
}

pub const GENERAL_READINGS: [ReadingRow; 10] = [
    reading("dg_1", "Horas totales"),
    reading("dg_2", "Horas de carga"),
    reading("dg_3", "Presión objetivo/descarga"),
    reading("dg_4", "Presión de carga"),
    reading("dg_5", "Presión descarga del paquete"),
    reading("dg_6", "Temperatura ambiente"),
    reading("dg_7", "Temp. descarga del paquete"),
    reading("dg_8", "Temp. descarga del aire-end"),
    reading("dg_9", "Temp. inyección de refrigerante"),
    reading("dg_10", "Caída de presión separador"),
];

pub const OIL_FREE_READINGS: [ReadingRow; 10] = [
    reading("of_1", "Temp. entrada aire 1ra etapa"),
    reading("of_2", "Temp. descarga aire 1ra etapa"),
    reading("of_3", "Presión descarga 1ra etapa"),
    reading("of_4", "Temp. entrada 2da etapa"),
    reading("of_5", "Temp. descarga 2da etapa"),
    reading("of_6", "Presión descarga 2da etapa"),
    reading("of_7", "Temperatura del aceite"),
    reading("of_8", "Presión de aceite"),
    reading("of_9", "Vacío de entrada"),
    reading("of_10", "(otro)"),
];

pub const DRYER_READINGS: [ReadingRow; 9] = [
    reading("sec_1", "Temperatura de aire de entrada"),
    reading("sec_2", "Temperatura de aire de salida"),
    reading("sec_3", "Temperatura del calentador"),
    reading("sec_4", "Temperatura ambiente"),
    reading("sec_5", "Punto de rocío"),
    reading("sec_6", "Tiempo de ciclo"),
    reading("sec_7", "Horas totales"),
    reading("sec_prefiltro", "Condiciones de prefiltro"),
    reading("sec_posfiltro", "Condiciones de pos filtro"),
];

/// Which conductors a three-phase measurement is taken across
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Phases {
    /// L1-2, L2-3, L3-1
    LineToLine,
    /// L1, L2, L3
    LineToNeutral,
}

impl Phases {
    pub fn keys(&self) -> [&'static str; 3] {
        match self {
            Phases::LineToLine => ["l12", "l23", "l31"],
            Phases::LineToNeutral => ["l1", "l2", "l3"],
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ThreePhaseRow {
    pub label: &'static str,
    pub key: &'static str,
    pub phases: Phases,
}

impl ThreePhaseRow {
    /// The measurement keys of the three cells, e.g. `v_carga_l12`
    pub fn cell_keys(&self) -> [String; 3] {
        self.phases.keys().map(|phase| format!("{}_{phase}", self.key))
    }
}

const fn three_phase(label: &'static str, key: &'static str, phases: Phases) -> ThreePhaseRow {
    ThreePhaseRow { label, key, phases }
}

pub const THREE_PHASE_ROWS: [ThreePhaseRow; 6] = [
    three_phase("Voltaje comp. en carga", "v_carga", Phases::LineToLine),
    three_phase("Voltaje comp. en descarga", "v_descarga", Phases::LineToLine),
    three_phase("Voltaje a tierra", "v_tierra", Phases::LineToNeutral),
    three_phase("Corriente comp. en carga", "i_carga", Phases::LineToNeutral),
    three_phase("Corriente comp. en descarga", "i_descarga", Phases::LineToNeutral),
    three_phase("Corriente total del paquete", "i_total", Phases::LineToNeutral),
];

pub const SINGLE_VALUE_ROWS: [ReadingRow; 7] = [
    reading("i_placa", "Corriente de placa"),
    reading("v_busdc", "Voltaje del bus DC"),
    reading("rpm_vfd", "RPM del motor (VFD)"),
    reading("t_igbt_u", "Temp. IGBT U="),
    reading("t_igbt_v", "Temp. IGBT V="),
    reading("t_igbt_w", "Temp. IGBT W="),
    reading("t_rect", "Temp. rectificador"),
];

/// Dryers only report load current and load voltage
pub const DRYER_THREE_PHASE_ROWS: [ThreePhaseRow; 2] = [
    three_phase("Corriente comp. en carga", "i_carga", Phases::LineToNeutral),
    three_phase("Voltaje comp. en carga", "v_carga", Phases::LineToLine),
];

pub const ELECTRICAL_HEADER: [&str; 4] = ["MEDICIÓN", "L1 / L1-2", "L2 / L2-3", "L3 / L3-1"];

pub const SPM_CAPTION: &str = "ANÁLISIS DE RUIDO EN RODAMIENTOS (SPM)";

pub const SPM_ROWS: [ReadingRow; 6] = [
    reading("carga_dbm", "CARGA dBm"),
    reading("carga_dbc", "CARGA dBc"),
    reading("carga_dbi", "CARGA dBi"),
    reading("descarga_dbm", "DESCARGA dBm"),
    reading("descarga_dbc", "DESCARGA dBc"),
    reading("descarga_dbi", "DESCARGA dBi"),
];

pub const SPM_COLUMNS: [ReadingRow; 10] = [
    reading("mbrg", "MBRG"),
    reading("bg", "BG"),
    reading("lpmi_mri", "LPMI-MRI"),
    reading("lpm2_mr2", "LPM2-MR2"),
    reading("hpm1", "HPM1"),
    reading("hpm2", "HPM2"),
    reading("hpf1", "HPF1"),
    reading("hpf2", "HPF2"),
    reading("lpf1", "LPF1"),
    reading("lpf2", "LPF2"),
];

/// The standard preventive maintenance activities, in checklist order
pub const PREVENTIVE_ACTIVITIES: [&str; 25] = [
    "Cambio de filtro de aire",
    "Cambio de filtro de aceite",
    "Cambio de elemento separador",
    "Cambio de filtro panel control",
    "Recuperar nivel de aceite",
    "Cambio de aceite",
    "Cambio de mangueras",
    "Cambio válvula de desfogue",
    "Cambio válvula check descarga",
    "Cambio kit válvula mpcv",
    "Cambio kit, válvula admisión",
    "Cambio válvula paro de aceite",
    "Cambio kit, val. termocontrol",
    "Cambio de bandas",
    "Reapretar conexiones mecánicas",
    "Reapretar conexiones eléctricas",
    "Limpieza línea de barrido",
    "Limpieza trampa de condensados",
    "Limpieza a enfriadores aire/aceite",
    "Revisar funcionamiento de válvulas",
    "Limpieza a platinos de contactores",
    "Lubricación rodamiento de motor",
    "Servicio a motor eléctrico",
    "Limpieza general del equipo",
    "Toma de muestra de aceite para análisis",
];

/// Always listed after [PREVENTIVE_ACTIVITIES]
pub const BEARING_NOISE_ACTIVITY: &str = "Análisis de ruidos en rodamientos (R30)";

pub const STATUS_DONE: &str = "Realizado";

pub const CHECKLIST_HEADER: [&str; 2] = ["Actividad", "Estado"];
pub const OTHER_ACTIVITIES_LABEL: &str = "OTRAS ACTIVIDADES";
pub const NOISE_OBSERVATIONS_LABEL: &str = "Observaciones";

pub mod titles {
    pub const CLIENT: &str = "Datos del cliente";
    pub const SERVICE: &str = "Servicio";
    pub const EQUIPMENT: &str = "Datos del equipo";
    pub const CHECKLIST: &str = "Actividades de mantenimiento preventivo";
    pub const NOISE: &str = "Análisis de ruido";
    pub const READINGS: &str = "Lecturas del equipo";
    pub const DRYER_READINGS: &str = "Lecturas del equipo (Secador)";
    pub const OIL_FREE_READINGS: &str = "Compresor (oil free)";
    pub const ELECTRICAL: &str = "Datos eléctricos";
    pub const OBSERVATIONS: &str = "Observaciones y recomendaciones";
    pub const PHOTOS: &str = "Evidencias fotográficas";
    pub const SIGNATURES: &str = "Firmas";

    /// Narrative blocks of a corrective service, in print order
    pub const CORRECTIVE: [&str; 6] = [
        "Diagnóstico del problema",
        "Causa raíz",
        "Actividades realizadas",
        "Refacciones utilizadas",
        "Condiciones en que se encontró el equipo",
        "Condiciones en que se entrega el equipo",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voltage_rows_are_line_to_line() {
        for row in THREE_PHASE_ROWS {
            let expected = matches!(row.key, "v_carga" | "v_descarga");
            assert_eq!(row.phases == Phases::LineToLine, expected, "{}", row.key);
        }
        assert_eq!(
            THREE_PHASE_ROWS[0].cell_keys(),
            ["v_carga_l12", "v_carga_l23", "v_carga_l31"]
        );
        assert_eq!(THREE_PHASE_ROWS[3].cell_keys()[2], "i_carga_l3");
    }

    #[test]
    fn reading_keys_are_unique() {
        let mut keys: Vec<&str> = GENERAL_READINGS
            .iter()
            .chain(OIL_FREE_READINGS.iter())
            .chain(DRYER_READINGS.iter())
            .map(|r| r.key)
            .collect();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }
}
