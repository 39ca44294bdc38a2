mod assignment;
mod conflicts;
mod query;
mod types;
mod util;

pub use types::{
    AssignRangeRequest, AssignRangeResult, Conflict, DaySchedule, DayScheduleItem, SchedError,
};

use crate::model::EmployeeId;
use crate::storage::{ScheduleStore, ShiftTemplateLookup};
use chrono::NaiveDate;

/// Scheduler : moteur d'affectation au-dessus d'un store de planning.
///
/// Le `&mut self` de [`Scheduler::assign_range`] garantit qu'une seule
/// affectation est en cours à la fois sur ce store.
#[derive(Debug, Default)]
pub struct Scheduler<S> {
    store: S,
}

impl<S> Scheduler<S>
where
    S: ShiftTemplateLookup + ScheduleStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }
    pub fn into_store(self) -> S {
        self.store
    }

    /// Affecte un gabarit jour par jour sur `[start_date, end_date]`.
    ///
    /// Tout ou rien : au premier chevauchement, aucune ligne n'est écrite.
    /// Avec `overwrite`, la ligne déjà présente sur un jour est remplacée
    /// (comptée en `updated`) ; plusieurs lignes le même jour sont refusées.
    pub fn assign_range(&mut self, req: &AssignRangeRequest) -> Result<AssignRangeResult, SchedError> {
        assignment::assign_range(&mut self.store, req)
    }

    pub fn day_schedule(
        &self,
        employee: &EmployeeId,
        date: NaiveDate,
    ) -> Result<DaySchedule, SchedError> {
        query::day_schedule(&self.store, employee, date)
    }

    pub fn detect_conflicts(&self, employee: &EmployeeId) -> Result<Vec<Conflict>, SchedError> {
        conflicts::detect_conflicts(&self.store, employee)
    }
}
