#![allow(dead_code)]
use chrono::{NaiveDate, NaiveTime};
use roulement::{
    AssignRangeRequest, EmployeeId, MemoryStore, Planning, ScheduleSource, Scheduler,
    ShiftTemplateId, TemplateDraft, TemplateRegistry,
};

pub fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn draft(code: &str, start: NaiveTime, end: NaiveTime, night: bool) -> TemplateDraft {
    TemplateDraft {
        code: code.into(),
        name: format!("Poste {code}"),
        start_time: start,
        end_time: end,
        break_minutes: 0,
        grace_in_minutes: 5,
        grace_out_minutes: 5,
        is_night_shift: night,
        min_work_minutes: 0,
        active: true,
    }
}

/// Planning avec les gabarits usuels : JOUR 09-18, NUIT 22-06, MATIN 05-13.
pub struct Fixture {
    pub scheduler: Scheduler<MemoryStore>,
    pub day: ShiftTemplateId,
    pub night: ShiftTemplateId,
    pub early: ShiftTemplateId,
}

pub fn fixture() -> Fixture {
    let mut planning = Planning::default();
    let mut registry = TemplateRegistry::new(&mut planning);
    let day = registry.create(&draft("JOUR", t(9, 0), t(18, 0), false)).unwrap().id;
    let night = registry.create(&draft("NUIT", t(22, 0), t(6, 0), true)).unwrap().id;
    let early = registry.create(&draft("MATIN", t(5, 0), t(13, 0), false)).unwrap().id;
    Fixture {
        scheduler: Scheduler::new(MemoryStore::new(planning)),
        day,
        night,
        early,
    }
}

pub fn alice() -> EmployeeId {
    EmployeeId::new("alice")
}

pub fn request(
    shift: &ShiftTemplateId,
    start: NaiveDate,
    end: NaiveDate,
    overwrite: bool,
) -> AssignRangeRequest {
    AssignRangeRequest {
        employee_id: alice(),
        shift_id: shift.clone(),
        start_date: start,
        end_date: end,
        source: ScheduleSource::Manual,
        note: None,
        overwrite,
    }
}
