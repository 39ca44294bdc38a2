use crate::model::{EmployeeId, ScheduleSource, ShiftTemplate};
use crate::scheduler::{AssignRangeRequest, DaySchedule};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::path::Path;

/// Import d'affectations: header `employee_id,shift_code,start_date,end_date[,note]`
///
/// Chaque ligne devient une demande de source `IMPORT`, dans l'ordre du fichier.
pub fn import_assignments_csv<P: AsRef<Path>>(
    path: P,
    templates: &[ShiftTemplate],
    overwrite: bool,
) -> anyhow::Result<Vec<AssignRangeRequest>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let row = line + 2;
        let employee = rec.get(0).context("missing employee_id")?.trim();
        let code = rec.get(1).context("missing shift_code")?.trim();
        if employee.is_empty() || code.is_empty() {
            bail!("invalid assignment row {row} (empty)");
        }
        let shift = templates
            .iter()
            .find(|t| t.code == code)
            .with_context(|| format!("unknown shift code {code} on row {row}"))?;
        let start_date = parse_date(rec.get(2).context("missing start_date")?)
            .with_context(|| format!("invalid start_date on row {row}"))?;
        let end_date = parse_date(rec.get(3).context("missing end_date")?)
            .with_context(|| format!("invalid end_date on row {row}"))?;
        let note = rec
            .get(4)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        out.push(AssignRangeRequest {
            employee_id: EmployeeId::new(employee),
            shift_id: shift.id.clone(),
            start_date,
            end_date,
            source: ScheduleSource::Import,
            note,
            overwrite,
        });
    }
    Ok(out)
}

pub fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date: {}", raw.trim()))
}

/// Export CSV d'un planning journalier: header
/// `schedule_id,employee_id,work_date,shift_code,shift_name,start_time,end_time,break_minutes,night,source,note`
pub fn export_day_schedule_csv<P: AsRef<Path>>(path: P, day: &DaySchedule) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "schedule_id",
        "employee_id",
        "work_date",
        "shift_code",
        "shift_name",
        "start_time",
        "end_time",
        "break_minutes",
        "night",
        "source",
        "note",
    ])?;
    for item in day {
        let work_date = item.work_date.to_string();
        let start = item.start_time.format("%H:%M").to_string();
        let end = item.end_time.format("%H:%M").to_string();
        let break_minutes = item.break_minutes.to_string();
        w.write_record([
            item.schedule_id.as_str(),
            item.employee_id.as_str(),
            work_date.as_str(),
            item.shift_code.as_str(),
            item.shift_name.as_str(),
            start.as_str(),
            end.as_str(),
            break_minutes.as_str(),
            if item.is_night_shift { "true" } else { "false" },
            item.source.as_str(),
            item.note.as_deref().unwrap_or(""),
        ])?;
    }
    w.flush()?;
    Ok(())
}
