#![forbid(unsafe_code)]
//! Roulement — affectation de postes (jour/nuit) sur des plages de dates.
//!
//! - Validation des gabarits (pause, travail minimal, passage de minuit).
//! - Affectation atomique par plage, sans chevauchement pour un même salarié,
//!   y compris le débordement d'un poste de nuit sur le lendemain.
//! - Planning journalier enrichi, audit des chevauchements.
//! - Stockage fichier JSON (écriture atomique), import/export CSV.

pub mod interval;
pub mod io;
pub mod model;
pub mod scheduler;
pub mod storage;
pub mod template;

pub use interval::Interval;
pub use model::{
    EmployeeId, Planning, ScheduleEntry, ScheduleId, ScheduleSource, ShiftTemplate,
    ShiftTemplateId,
};
pub use scheduler::{
    AssignRangeRequest, AssignRangeResult, Conflict, DaySchedule, DayScheduleItem, SchedError,
    Scheduler,
};
pub use storage::{JsonStorage, MemoryStore, ScheduleStore, ShiftTemplateLookup, Storage};
pub use template::{
    shift_duration_minutes, validate_times, TemplateDraft, TemplateError, TemplateRegistry,
};
