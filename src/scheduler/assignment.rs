use super::util::{group_by_date, Templates};
use super::{AssignRangeRequest, AssignRangeResult, SchedError};
use crate::interval::Interval;
use crate::model::{now, ScheduleEntry};
use crate::storage::{ScheduleStore, ShiftTemplateLookup};
use chrono::{Days, NaiveDate};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

type ByDate = BTreeMap<NaiveDate, Vec<ScheduleEntry>>;

pub(super) fn assign_range<S>(
    store: &mut S,
    req: &AssignRangeRequest,
) -> Result<AssignRangeResult, SchedError>
where
    S: ShiftTemplateLookup + ScheduleStore,
{
    if req.end_date < req.start_date {
        warn!(start = %req.start_date, end = %req.end_date, "rejected inverted date range");
        return Err(SchedError::InvalidDateRange {
            start: req.start_date,
            end: req.end_date,
        });
    }

    // Rien n'est écrit tant que toute la plage n'a pas été validée.
    let (pending, created, updated) = {
        let mut templates = Templates::new(&*store);
        let shift = templates.get(&req.shift_id)?.clone();
        if !shift.active {
            warn!(code = %shift.code, "assigning an inactive shift template");
        }

        // ±1 jour : un poste de nuit de la veille peut déborder sur la plage
        let from = req
            .start_date
            .checked_sub_days(Days::new(1))
            .unwrap_or(req.start_date);
        let to = req
            .end_date
            .checked_add_days(Days::new(1))
            .unwrap_or(req.end_date);
        let existing = store.find_by_employee_and_date_range(&req.employee_id, from, to)?;
        let mut by_date = group_by_date(existing);

        let mut pending: Vec<ScheduleEntry> = Vec::new();
        let (mut created, mut updated) = (0u32, 0u32);

        for day in req.start_date.iter_days().take_while(|d| *d <= req.end_date) {
            let candidate = Interval::for_template(day, &shift);
            let replace = replaces_existing(&by_date, day, req.overwrite)?;
            check_day(&mut templates, &by_date, req, day, &candidate, replace)?;

            let target = if replace {
                by_date.get_mut(&day).and_then(|entries| entries.first_mut())
            } else {
                None
            };
            match target {
                Some(entry) => {
                    entry.shift_id = req.shift_id.clone();
                    entry.source = req.source;
                    entry.note = req.note.clone();
                    entry.updated_at = now();
                    debug!(%day, schedule = %entry.id, "schedule overwritten");
                    pending.push(entry.clone());
                    updated += 1;
                }
                None => {
                    let entry = ScheduleEntry::new(
                        req.employee_id.clone(),
                        day,
                        req.shift_id.clone(),
                        req.source,
                        req.note.clone(),
                    );
                    debug!(%day, schedule = %entry.id, "schedule created");
                    by_date.entry(day).or_default().push(entry.clone());
                    pending.push(entry);
                    created += 1;
                }
            }
        }
        (pending, created, updated)
    };

    for entry in pending {
        store.save(entry)?;
    }

    info!(
        employee = %req.employee_id,
        shift = %req.shift_id,
        start = %req.start_date,
        end = %req.end_date,
        created,
        updated,
        "shift range assigned"
    );

    Ok(AssignRangeResult {
        employee_id: req.employee_id.clone(),
        shift_id: req.shift_id.clone(),
        start_date: req.start_date,
        end_date: req.end_date,
        created,
        updated,
    })
}

/// Une seule ligne existante peut être écrasée ; au-delà le choix serait arbitraire.
fn replaces_existing(by_date: &ByDate, day: NaiveDate, overwrite: bool) -> Result<bool, SchedError> {
    if !overwrite {
        return Ok(false);
    }
    match by_date.get(&day).map_or(0, Vec::len) {
        0 => Ok(false),
        1 => Ok(true),
        count => Err(SchedError::AmbiguousOverwrite { date: day, count }),
    }
}

fn check_day<L: ShiftTemplateLookup>(
    templates: &mut Templates<'_, L>,
    by_date: &ByDate,
    req: &AssignRangeRequest,
    day: NaiveDate,
    candidate: &Interval,
    replace: bool,
) -> Result<(), SchedError> {
    let conflict = |entry: &ScheduleEntry| SchedError::ScheduleConflict {
        employee: req.employee_id.clone(),
        date: day,
        schedule_id: entry.id.clone(),
    };

    // la ligne écrasée ne compte pas contre sa remplaçante
    let same_day = by_date.get(&day).map(Vec::as_slice).unwrap_or_default();
    for entry in same_day.iter().skip(usize::from(replace)) {
        if templates.interval_of(entry)?.overlaps(candidate) {
            return Err(conflict(entry));
        }
    }

    if let Some(prev) = day.pred_opt() {
        for entry in by_date.get(&prev).into_iter().flatten() {
            let interval = templates.interval_of(entry)?;
            if !interval.reaches_into(day) {
                continue;
            }
            if interval.overlaps(candidate) {
                return Err(conflict(entry));
            }
        }
    }

    // Débordement vers le lendemain : inutile si ce jour sera lui-même écrasé plus loin.
    if let Some(next) = day.succ_opt() {
        let rewritten_later = req.overwrite && next <= req.end_date;
        if candidate.reaches_into(next) && !rewritten_later {
            for entry in by_date.get(&next).into_iter().flatten() {
                if templates.interval_of(entry)?.overlaps(candidate) {
                    return Err(conflict(entry));
                }
            }
        }
    }

    Ok(())
}
