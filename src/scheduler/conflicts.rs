use super::util::Templates;
use super::{Conflict, SchedError};
use crate::model::EmployeeId;
use crate::storage::{ScheduleStore, ShiftTemplateLookup};

pub(super) fn detect_conflicts<S>(store: &S, employee: &EmployeeId) -> Result<Vec<Conflict>, SchedError>
where
    S: ShiftTemplateLookup + ScheduleStore,
{
    let mut templates = Templates::new(store);
    let mut spans = Vec::new();
    for entry in store.find_by_employee(employee)? {
        let interval = templates.interval_of(&entry)?;
        spans.push((interval, entry.id));
    }
    spans.sort_by_key(|(interval, _)| interval.start);

    let mut out = Vec::new();
    for (idx, (a, a_id)) in spans.iter().enumerate() {
        for (b, b_id) in spans.iter().skip(idx + 1) {
            // triés par début : plus rien ne peut chevaucher `a`
            if b.start >= a.end {
                break;
            }
            if a.overlaps(b) {
                out.push(Conflict {
                    employee: employee.clone(),
                    schedule_a: a_id.clone(),
                    schedule_b: b_id.clone(),
                    overlap_start: a.start.max(b.start),
                    overlap_end: a.end.min(b.end),
                });
            }
        }
    }

    Ok(out)
}
