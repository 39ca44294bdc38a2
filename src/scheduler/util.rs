use super::SchedError;
use crate::interval::Interval;
use crate::model::{ScheduleEntry, ShiftTemplate, ShiftTemplateId};
use crate::storage::ShiftTemplateLookup;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Cache des gabarits résolus pendant un appel.
pub(super) struct Templates<'s, L> {
    lookup: &'s L,
    seen: HashMap<ShiftTemplateId, ShiftTemplate>,
}

impl<'s, L: ShiftTemplateLookup> Templates<'s, L> {
    pub(super) fn new(lookup: &'s L) -> Self {
        Self {
            lookup,
            seen: HashMap::new(),
        }
    }

    pub(super) fn get(&mut self, id: &ShiftTemplateId) -> Result<&ShiftTemplate, SchedError> {
        if !self.seen.contains_key(id) {
            let template = self
                .lookup
                .find_template(id)?
                .ok_or_else(|| SchedError::ShiftNotFound(id.clone()))?;
            return Ok(self.seen.entry(id.clone()).or_insert(template));
        }
        Ok(&self.seen[id])
    }

    pub(super) fn interval_of(&mut self, entry: &ScheduleEntry) -> Result<Interval, SchedError> {
        let template = self.get(&entry.shift_id)?;
        Ok(Interval::for_template(entry.work_date, template))
    }
}

pub(super) fn group_by_date(entries: Vec<ScheduleEntry>) -> BTreeMap<NaiveDate, Vec<ScheduleEntry>> {
    let mut by_date: BTreeMap<NaiveDate, Vec<ScheduleEntry>> = BTreeMap::new();
    for entry in entries {
        by_date.entry(entry.work_date).or_default().push(entry);
    }
    by_date
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Planning;
    use crate::template::{TemplateDraft, TemplateRegistry};
    use chrono::NaiveTime;
    use std::cell::Cell;

    struct Counting {
        planning: Planning,
        calls: Cell<u32>,
    }

    impl ShiftTemplateLookup for Counting {
        fn find_template(&self, id: &ShiftTemplateId) -> anyhow::Result<Option<ShiftTemplate>> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.planning.find_template(id).cloned())
        }
    }

    fn with_night_template() -> (Counting, ShiftTemplateId) {
        let mut planning = Planning::default();
        let template = TemplateRegistry::new(&mut planning)
            .create(&TemplateDraft {
                code: "NUIT".into(),
                name: "Nuit".into(),
                start_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
                break_minutes: 0,
                grace_in_minutes: 0,
                grace_out_minutes: 0,
                is_night_shift: true,
                min_work_minutes: 420,
                active: true,
            })
            .unwrap();
        let lookup = Counting {
            planning,
            calls: Cell::new(0),
        };
        (lookup, template.id)
    }

    #[test]
    fn template_is_resolved_once_per_call() {
        let (lookup, id) = with_night_template();
        let mut templates = Templates::new(&lookup);
        assert_eq!(templates.get(&id).unwrap().code, "NUIT");
        assert_eq!(templates.get(&id).unwrap().code, "NUIT");
        assert_eq!(lookup.calls.get(), 1);
    }

    #[test]
    fn missing_template_is_not_cached() {
        let (lookup, _) = with_night_template();
        let ghost = ShiftTemplateId::new("ghost");
        let mut templates = Templates::new(&lookup);
        assert!(matches!(templates.get(&ghost), Err(SchedError::ShiftNotFound(ref id)) if *id == ghost));
        assert!(templates.get(&ghost).is_err());
        assert_eq!(lookup.calls.get(), 2);
    }
}
