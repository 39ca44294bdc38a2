use super::{DaySchedule, DayScheduleItem, SchedError};
use crate::model::EmployeeId;
use crate::storage::{ScheduleStore, ShiftTemplateLookup};
use chrono::NaiveDate;
use tracing::warn;

pub(super) fn day_schedule<S>(
    store: &S,
    employee: &EmployeeId,
    date: NaiveDate,
) -> Result<DaySchedule, SchedError>
where
    S: ShiftTemplateLookup + ScheduleStore,
{
    let mut items = Vec::new();
    for entry in store.find_by_employee_and_date(employee, date)? {
        // jointure interne : une ligne sans gabarit n'apparaît pas
        let Some(shift) = store.find_template(&entry.shift_id)? else {
            warn!(schedule = %entry.id, shift = %entry.shift_id, "schedule references a missing shift template");
            continue;
        };
        items.push(DayScheduleItem {
            schedule_id: entry.id,
            employee_id: entry.employee_id,
            work_date: entry.work_date,
            shift_id: shift.id,
            shift_code: shift.code,
            shift_name: shift.name,
            start_time: shift.start_time,
            end_time: shift.end_time,
            break_minutes: shift.break_minutes,
            is_night_shift: shift.is_night_shift,
            source: entry.source,
            note: entry.note,
        });
    }
    items.sort_by_key(|item| item.start_time);
    Ok(DaySchedule { items })
}
