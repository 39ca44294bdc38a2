use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            pub fn new<S: AsRef<str>>(s: S) -> Self {
                Self(s.as_ref().to_owned())
            }
            pub fn random() -> Self {
                Self(Uuid::new_v4().to_string())
            }
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifiant fort d'un salarié
    EmployeeId
);
string_id!(
    /// Identifiant fort d'un gabarit de poste
    ShiftTemplateId
);
string_id!(
    /// Identifiant fort d'une ligne de planning
    ScheduleId
);

/// Horodatage local courant (le planning est exprimé en heure locale du site).
pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Gabarit de poste : horaires théoriques, pause et durée minimale de travail.
///
/// `grace_in_minutes` / `grace_out_minutes` sont des tolérances de pointage,
/// elles n'interviennent pas dans le calcul des chevauchements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftTemplate {
    pub id: ShiftTemplateId,
    pub code: String,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_minutes: u32,
    #[serde(default)]
    pub grace_in_minutes: u32,
    #[serde(default)]
    pub grace_out_minutes: u32,
    #[serde(default)]
    pub is_night_shift: bool,
    pub min_work_minutes: u32,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn default_active() -> bool {
    true
}

/// Origine d'une ligne de planning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleSource {
    Manual,
    Import,
}

impl ScheduleSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleSource::Manual => "MANUAL",
            ScheduleSource::Import => "IMPORT",
        }
    }
}

impl fmt::Display for ScheduleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MANUAL" => Ok(ScheduleSource::Manual),
            "IMPORT" => Ok(ScheduleSource::Import),
            other => Err(format!("unknown schedule source: {other}")),
        }
    }
}

/// Affectation d'un gabarit à un salarié pour une date de travail.
///
/// L'intervalle réel est ancré sur `work_date` mais peut déborder sur le
/// lendemain (poste de nuit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub id: ScheduleId,
    pub employee_id: EmployeeId,
    pub work_date: NaiveDate,
    pub shift_id: ShiftTemplateId,
    pub source: ScheduleSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ScheduleEntry {
    pub fn new(
        employee_id: EmployeeId,
        work_date: NaiveDate,
        shift_id: ShiftTemplateId,
        source: ScheduleSource,
        note: Option<String>,
    ) -> Self {
        let ts = now();
        Self {
            id: ScheduleId::random(),
            employee_id,
            work_date,
            shift_id,
            source,
            note,
            created_at: ts,
            updated_at: ts,
        }
    }
}

/// Jeu de données complet (gabarits + planning), tel que persisté.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Planning {
    #[serde(default)]
    pub templates: Vec<ShiftTemplate>,
    #[serde(default)]
    pub schedules: Vec<ScheduleEntry>,
}

impl Planning {
    pub fn find_template(&self, id: &ShiftTemplateId) -> Option<&ShiftTemplate> {
        self.templates.iter().find(|t| &t.id == id)
    }
    pub fn find_template_mut(&mut self, id: &ShiftTemplateId) -> Option<&mut ShiftTemplate> {
        self.templates.iter_mut().find(|t| &t.id == id)
    }
    pub fn find_template_by_code<'a>(&'a self, code: &str) -> Option<&'a ShiftTemplate> {
        self.templates.iter().find(|t| t.code == code)
    }
    pub fn schedules_of<'a>(
        &'a self,
        employee: &'a EmployeeId,
    ) -> impl Iterator<Item = &'a ScheduleEntry> + 'a {
        self.schedules.iter().filter(move |s| &s.employee_id == employee)
    }
}
