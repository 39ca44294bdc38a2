use crate::model::{EmployeeId, ScheduleId, ScheduleSource, ShiftTemplateId};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Demande d'affectation d'un gabarit sur une plage de dates (bornes incluses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignRangeRequest {
    pub employee_id: EmployeeId,
    pub shift_id: ShiftTemplateId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub source: ScheduleSource,
    #[serde(default)]
    pub note: Option<String>,
    pub overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignRangeResult {
    pub employee_id: EmployeeId,
    pub shift_id: ShiftTemplateId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created: u32,
    pub updated: u32,
}

/// Ligne du planning d'une journée, enrichie des champs du gabarit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayScheduleItem {
    pub schedule_id: ScheduleId,
    pub employee_id: EmployeeId,
    pub work_date: NaiveDate,
    pub shift_id: ShiftTemplateId,
    pub shift_code: String,
    pub shift_name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_minutes: u32,
    pub is_night_shift: bool,
    pub source: ScheduleSource,
    pub note: Option<String>,
}

/// Planning d'une journée, trié par heure de début. Vide si aucune ligne.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySchedule {
    pub(super) items: Vec<DayScheduleItem>,
}

impl DaySchedule {
    pub fn iter(&self) -> std::slice::Iter<'_, DayScheduleItem> {
        self.items.iter()
    }
    pub fn len(&self) -> usize {
        self.items.len()
    }
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for DaySchedule {
    type Item = DayScheduleItem;
    type IntoIter = std::vec::IntoIter<DayScheduleItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a DaySchedule {
    type Item = &'a DayScheduleItem;
    type IntoIter = std::slice::Iter<'a, DayScheduleItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Chevauchement constaté entre deux lignes d'un même salarié.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub employee: EmployeeId,
    pub schedule_a: ScheduleId,
    pub schedule_b: ScheduleId,
    pub overlap_start: NaiveDateTime,
    pub overlap_end: NaiveDateTime,
}

impl Conflict {
    pub fn overlap_minutes(&self) -> i64 {
        (self.overlap_end - self.overlap_start).num_minutes()
    }
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid date range: end date {end} is before start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("shift template not found: {0}")]
    ShiftNotFound(ShiftTemplateId),
    #[error("schedule conflict for employee {employee} on {date}: overlaps schedule {schedule_id}")]
    ScheduleConflict {
        employee: EmployeeId,
        date: NaiveDate,
        schedule_id: ScheduleId,
    },
    #[error("cannot overwrite {date}: {count} schedules already exist on that day")]
    AmbiguousOverwrite { date: NaiveDate, count: usize },
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}
