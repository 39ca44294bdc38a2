#![forbid(unsafe_code)]
mod common;

use common::{alice, d, fixture, request, t};
use roulement::{EmployeeId, ScheduleEntry, ScheduleSource, ScheduleStore, ShiftTemplateId};

#[test]
fn day_schedule_is_enriched_and_sorted() {
    let mut f = fixture();
    f.scheduler
        .assign_range(&request(&f.night, d(2024, 1, 10), d(2024, 1, 10), false))
        .unwrap();
    let mut req = request(&f.early, d(2024, 1, 10), d(2024, 1, 10), false);
    req.note = Some("renfort".into());
    f.scheduler.assign_range(&req).unwrap();

    let day = f.scheduler.day_schedule(&alice(), d(2024, 1, 10)).unwrap();
    assert_eq!(day.len(), 2);
    let codes: Vec<_> = day.iter().map(|i| i.shift_code.as_str()).collect();
    assert_eq!(codes, ["MATIN", "NUIT"]);

    let night = day.iter().nth(1).unwrap();
    assert_eq!(night.shift_name, "Poste NUIT");
    assert_eq!(night.start_time, t(22, 0));
    assert_eq!(night.end_time, t(6, 0));
    assert!(night.is_night_shift);
    assert_eq!(night.source, ScheduleSource::Manual);
    assert_eq!(day.iter().next().unwrap().note.as_deref(), Some("renfort"));

    // la séquence peut être parcourue plusieurs fois
    assert_eq!(day.iter().count(), (&day).into_iter().count());
}

#[test]
fn night_spillover_stays_on_its_work_date() {
    let mut f = fixture();
    f.scheduler
        .assign_range(&request(&f.night, d(2024, 1, 10), d(2024, 1, 10), false))
        .unwrap();
    assert!(f
        .scheduler
        .day_schedule(&alice(), d(2024, 1, 11))
        .unwrap()
        .is_empty());
}

#[test]
fn other_employees_are_not_listed() {
    let mut f = fixture();
    let mut req = request(&f.day, d(2024, 1, 10), d(2024, 1, 10), false);
    req.employee_id = EmployeeId::new("bob");
    f.scheduler.assign_range(&req).unwrap();

    assert!(f
        .scheduler
        .day_schedule(&alice(), d(2024, 1, 10))
        .unwrap()
        .is_empty());
}

#[test]
fn entries_without_template_are_skipped() {
    let mut f = fixture();
    f.scheduler
        .store_mut()
        .save(ScheduleEntry::new(
            alice(),
            d(2024, 1, 10),
            ShiftTemplateId::new("ghost"),
            ScheduleSource::Import,
            None,
        ))
        .unwrap();
    f.scheduler
        .assign_range(&request(&f.day, d(2024, 1, 10), d(2024, 1, 10), false))
        .unwrap_err();

    let day = f.scheduler.day_schedule(&alice(), d(2024, 1, 10)).unwrap();
    assert!(day.is_empty());
}
