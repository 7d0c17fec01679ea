//! The report draft: every field the daily report form collects.
//!
//! Field identifiers are fixed. [`Field::ALL`] lists the 22 top-level fields
//! in form order, and serialized drafts use the same identifiers as keys
//! (`numeroRDO`, `dataRelatorio`, ...), so a draft saved as JSON can be fed
//! back to the CLI unchanged.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Number of positional items in the safety checklist.
pub const CHECKLIST_ITEMS: usize = 4;

/// Positional safety checklist. Items carry no labels in the data.
pub type SafetyChecklist = [bool; CHECKLIST_ITEMS];

/// Date format used by the form's date input and the rendered report.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

// ── List entries ──────────────────────────────────────────────────────

/// One worker on site (`efetivo` entry).
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PersonnelEntry {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "cargo")]
    pub role: String,
    #[serde(rename = "horasTrabalhadas")]
    pub hours_worked: String,
}

impl PersonnelEntry {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        hours_worked: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            hours_worked: hours_worked.into(),
        }
    }
}

/// One piece of equipment on site (`equipamentos` entry).
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct EquipmentEntry {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "quantidade")]
    pub quantity: String,
    #[serde(rename = "condicao")]
    pub condition: String,
}

impl EquipmentEntry {
    pub fn new(
        name: impl Into<String>,
        quantity: impl Into<String>,
        condition: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            condition: condition.into(),
        }
    }
}

/// Reference to an uploaded progress photo.
///
/// The draft carries these but nothing renders or uploads them.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(transparent)]
pub struct ProgressPhoto(pub PathBuf);

// ── Field identifiers ─────────────────────────────────────────────────

/// The 17 free-text fields of the draft.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextField {
    ReportNumber,
    Company,
    Client,
    SiteLocation,
    Management,
    SiteManager,
    WeatherMorning,
    WeatherAfternoon,
    TemperatureMorning,
    TemperatureAfternoon,
    HumidityMorning,
    HumidityAfternoon,
    Activities,
    Incidents,
    InspectionNotes,
    ContractorNotes,
    Signatures,
}

impl TextField {
    /// Serialized identifier of the field.
    pub fn key(self) -> &'static str {
        match self {
            Self::ReportNumber => "numeroRDO",
            Self::Company => "empresa",
            Self::Client => "cliente",
            Self::SiteLocation => "localObra",
            Self::Management => "gerencia",
            Self::SiteManager => "responsavelObra",
            Self::WeatherMorning => "tempoManha",
            Self::WeatherAfternoon => "tempoTarde",
            Self::TemperatureMorning => "temperaturaManha",
            Self::TemperatureAfternoon => "temperaturaTarde",
            Self::HumidityMorning => "umidadeManha",
            Self::HumidityAfternoon => "umidadeTarde",
            Self::Activities => "atividades",
            Self::Incidents => "incidentes",
            Self::InspectionNotes => "observacoesFiscalizacao",
            Self::ContractorNotes => "observacoesContratada",
            Self::Signatures => "assinaturas",
        }
    }

    /// Label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Self::ReportNumber => "Número do RDO",
            Self::Company => "Empresa",
            Self::Client => "Cliente",
            Self::SiteLocation => "Local da Obra",
            Self::Management => "Gerência",
            Self::SiteManager => "Responsável pela Obra",
            Self::WeatherMorning => "Tempo (Manhã)",
            Self::WeatherAfternoon => "Tempo (Tarde)",
            Self::TemperatureMorning => "Temperatura Manhã (°C)",
            Self::TemperatureAfternoon => "Temperatura Tarde (°C)",
            Self::HumidityMorning => "Umidade Manhã (%)",
            Self::HumidityAfternoon => "Umidade Tarde (%)",
            Self::Activities => "Atividades",
            Self::Incidents => "Incidentes",
            Self::InspectionNotes => "Observações da Fiscalização",
            Self::ContractorNotes => "Observações da Contratada",
            Self::Signatures => "Assinaturas",
        }
    }

    /// Whether the field is edited as a multi-line text area.
    pub fn is_multiline(self) -> bool {
        matches!(
            self,
            Self::Activities
                | Self::Incidents
                | Self::InspectionNotes
                | Self::ContractorNotes
                | Self::Signatures
        )
    }
}

/// Any top-level field of the draft.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    Text(TextField),
    ReportDate,
    Personnel,
    Equipment,
    SafetyChecklist,
    ProgressPhotos,
}

impl Field {
    /// All top-level fields, in form order.
    pub const ALL: [Field; 22] = [
        Field::Text(TextField::ReportNumber),
        Field::ReportDate,
        Field::Text(TextField::Company),
        Field::Text(TextField::Client),
        Field::Text(TextField::SiteLocation),
        Field::Text(TextField::Management),
        Field::Text(TextField::SiteManager),
        Field::Text(TextField::WeatherMorning),
        Field::Text(TextField::WeatherAfternoon),
        Field::Text(TextField::TemperatureMorning),
        Field::Text(TextField::TemperatureAfternoon),
        Field::Text(TextField::HumidityMorning),
        Field::Text(TextField::HumidityAfternoon),
        Field::Personnel,
        Field::Equipment,
        Field::Text(TextField::Activities),
        Field::Text(TextField::Incidents),
        Field::SafetyChecklist,
        Field::ProgressPhotos,
        Field::Text(TextField::InspectionNotes),
        Field::Text(TextField::ContractorNotes),
        Field::Text(TextField::Signatures),
    ];

    pub fn key(self) -> &'static str {
        match self {
            Field::Text(t) => t.key(),
            Field::ReportDate => "dataRelatorio",
            Field::Personnel => "efetivo",
            Field::Equipment => "equipamentos",
            Field::SafetyChecklist => "checklistSeguranca",
            Field::ProgressPhotos => "fotosProgresso",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Text(t) => t.label(),
            Field::ReportDate => "Data",
            Field::Personnel => "Efetivo",
            Field::Equipment => "Equipamentos",
            Field::SafetyChecklist => "Checklist de Segurança",
            Field::ProgressPhotos => "Fotos de Progresso",
        }
    }

    /// Look a field up by its serialized identifier.
    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.key() == key)
    }

    /// Whether the field holds an ordered list of entries.
    pub fn is_list(self) -> bool {
        matches!(
            self,
            Field::Personnel | Field::Equipment | Field::ProgressPhotos
        )
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

// ── ReportDraft ───────────────────────────────────────────────────────

/// The in-memory, not-yet-submitted daily report.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ReportDraft {
    #[serde(rename = "numeroRDO")]
    pub report_number: String,
    #[serde(rename = "dataRelatorio")]
    pub report_date: Option<NaiveDate>,
    #[serde(rename = "empresa")]
    pub company: String,
    #[serde(rename = "cliente")]
    pub client: String,
    #[serde(rename = "localObra")]
    pub site_location: String,
    #[serde(rename = "gerencia")]
    pub management: String,
    #[serde(rename = "responsavelObra")]
    pub site_manager: String,
    #[serde(rename = "tempoManha")]
    pub weather_morning: String,
    #[serde(rename = "tempoTarde")]
    pub weather_afternoon: String,
    #[serde(rename = "temperaturaManha")]
    pub temperature_morning: String,
    #[serde(rename = "temperaturaTarde")]
    pub temperature_afternoon: String,
    #[serde(rename = "umidadeManha")]
    pub humidity_morning: String,
    #[serde(rename = "umidadeTarde")]
    pub humidity_afternoon: String,
    #[serde(rename = "efetivo")]
    pub personnel: Vec<PersonnelEntry>,
    #[serde(rename = "equipamentos")]
    pub equipment: Vec<EquipmentEntry>,
    #[serde(rename = "atividades")]
    pub activities: String,
    #[serde(rename = "incidentes")]
    pub incidents: String,
    #[serde(rename = "checklistSeguranca")]
    pub safety_checklist: SafetyChecklist,
    #[serde(rename = "fotosProgresso")]
    pub progress_photos: Vec<ProgressPhoto>,
    #[serde(rename = "observacoesFiscalizacao")]
    pub inspection_notes: String,
    #[serde(rename = "observacoesContratada")]
    pub contractor_notes: String,
    #[serde(rename = "assinaturas")]
    pub signatures: String,
}

impl Default for ReportDraft {
    /// The initial snapshot: empty scalars, one blank personnel and one
    /// blank equipment entry, an unchecked checklist, no photos.
    fn default() -> Self {
        Self {
            report_number: String::new(),
            report_date: None,
            company: String::new(),
            client: String::new(),
            site_location: String::new(),
            management: String::new(),
            site_manager: String::new(),
            weather_morning: String::new(),
            weather_afternoon: String::new(),
            temperature_morning: String::new(),
            temperature_afternoon: String::new(),
            humidity_morning: String::new(),
            humidity_afternoon: String::new(),
            personnel: vec![PersonnelEntry::default()],
            equipment: vec![EquipmentEntry::default()],
            activities: String::new(),
            incidents: String::new(),
            safety_checklist: [false; CHECKLIST_ITEMS],
            progress_photos: Vec::new(),
            inspection_notes: String::new(),
            contractor_notes: String::new(),
            signatures: String::new(),
        }
    }
}

impl ReportDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a draft from JSON. Missing fields take their initial values and
    /// empty personnel/equipment lists are given one blank entry.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut draft: ReportDraft = serde_json::from_str(json)?;
        draft.ensure_list_entries();
        Ok(draft)
    }

    /// Restore the "never empty" invariant on the personnel and equipment
    /// lists.
    pub(crate) fn ensure_list_entries(&mut self) {
        if self.personnel.is_empty() {
            self.personnel.push(PersonnelEntry::default());
        }
        if self.equipment.is_empty() {
            self.equipment.push(EquipmentEntry::default());
        }
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::ReportNumber => &self.report_number,
            TextField::Company => &self.company,
            TextField::Client => &self.client,
            TextField::SiteLocation => &self.site_location,
            TextField::Management => &self.management,
            TextField::SiteManager => &self.site_manager,
            TextField::WeatherMorning => &self.weather_morning,
            TextField::WeatherAfternoon => &self.weather_afternoon,
            TextField::TemperatureMorning => &self.temperature_morning,
            TextField::TemperatureAfternoon => &self.temperature_afternoon,
            TextField::HumidityMorning => &self.humidity_morning,
            TextField::HumidityAfternoon => &self.humidity_afternoon,
            TextField::Activities => &self.activities,
            TextField::Incidents => &self.incidents,
            TextField::InspectionNotes => &self.inspection_notes,
            TextField::ContractorNotes => &self.contractor_notes,
            TextField::Signatures => &self.signatures,
        }
    }

    pub(crate) fn text_mut(&mut self, field: TextField) -> &mut String {
        match field {
            TextField::ReportNumber => &mut self.report_number,
            TextField::Company => &mut self.company,
            TextField::Client => &mut self.client,
            TextField::SiteLocation => &mut self.site_location,
            TextField::Management => &mut self.management,
            TextField::SiteManager => &mut self.site_manager,
            TextField::WeatherMorning => &mut self.weather_morning,
            TextField::WeatherAfternoon => &mut self.weather_afternoon,
            TextField::TemperatureMorning => &mut self.temperature_morning,
            TextField::TemperatureAfternoon => &mut self.temperature_afternoon,
            TextField::HumidityMorning => &mut self.humidity_morning,
            TextField::HumidityAfternoon => &mut self.humidity_afternoon,
            TextField::Activities => &mut self.activities,
            TextField::Incidents => &mut self.incidents,
            TextField::InspectionNotes => &mut self.inspection_notes,
            TextField::ContractorNotes => &mut self.contractor_notes,
            TextField::Signatures => &mut self.signatures,
        }
    }

    /// Whether a field counts as filled: not the empty string and not null.
    ///
    /// Lists and the checklist are never empty-string or null, so they are
    /// always filled.
    pub fn is_filled(&self, field: Field) -> bool {
        match field {
            Field::Text(t) => !self.text(t).is_empty(),
            Field::ReportDate => self.report_date.is_some(),
            Field::Personnel
            | Field::Equipment
            | Field::SafetyChecklist
            | Field::ProgressPhotos => true,
        }
    }

    /// Report date formatted as `dd/mm/yyyy`, or empty when unset.
    pub fn formatted_date(&self) -> String {
        self.report_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_snapshot_has_one_blank_entry_per_list() {
        let draft = ReportDraft::new();
        assert_eq!(draft.personnel, vec![PersonnelEntry::default()]);
        assert_eq!(draft.equipment, vec![EquipmentEntry::default()]);
        assert!(draft.progress_photos.is_empty());
        assert_eq!(draft.safety_checklist, [false; 4]);
        assert!(draft.report_date.is_none());
    }

    #[test]
    fn field_keys_are_unique_and_round_trip() {
        let mut keys: Vec<&str> = Field::ALL.iter().map(|f| f.key()).collect();
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 22);
        assert_eq!(Field::from_key("nope"), None);
    }

    #[test]
    fn serialized_keys_match_field_identifiers() {
        let json = serde_json::to_value(ReportDraft::new()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), Field::ALL.len());
        for field in Field::ALL {
            assert!(obj.contains_key(field.key()), "missing {}", field.key());
        }
        assert_eq!(
            json["efetivo"][0],
            serde_json::json!({"nome": "", "cargo": "", "horasTrabalhadas": ""})
        );
        assert!(json["dataRelatorio"].is_null());
    }

    #[test]
    fn from_json_fills_missing_fields_and_repairs_lists() {
        let draft = ReportDraft::from_json(
            r#"{"numeroRDO": "12", "efetivo": [], "dataRelatorio": "2024-03-05"}"#,
        )
        .unwrap();
        assert_eq!(draft.report_number, "12");
        assert_eq!(draft.personnel.len(), 1);
        assert_eq!(draft.equipment.len(), 1);
        assert_eq!(draft.formatted_date(), "05/03/2024");
        assert_eq!(draft.company, "");
    }

    #[test]
    fn is_filled_treats_lists_as_always_filled() {
        let draft = ReportDraft::new();
        assert!(draft.is_filled(Field::Personnel));
        assert!(draft.is_filled(Field::ProgressPhotos));
        assert!(draft.is_filled(Field::SafetyChecklist));
        assert!(!draft.is_filled(Field::ReportDate));
        assert!(!draft.is_filled(Field::Text(TextField::Company)));
    }

    #[test]
    fn multiline_fields_are_the_long_text_sections() {
        assert!(TextField::Activities.is_multiline());
        assert!(TextField::Signatures.is_multiline());
        assert!(!TextField::Company.is_multiline());
    }
}
