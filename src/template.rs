use crate::model::{now, Planning, ShiftTemplate, ShiftTemplateId};
use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("invalid time range: end must be after start for a day shift")]
    InvalidTimeRange,
    #[error("break of {break_minutes} min exceeds shift duration of {duration} min")]
    BreakExceedsDuration { break_minutes: u32, duration: u32 },
    #[error("minimum work of {min_work_minutes} min exceeds net duration of {net} min")]
    MinWorkExceedsNet { min_work_minutes: u32, net: u32 },
    #[error("shift code already exists: {0}")]
    DuplicateCode(String),
    #[error("shift template not found: {0}")]
    UnknownTemplate(ShiftTemplateId),
    #[error("{0} cannot be empty")]
    Blank(&'static str),
}

/// Durée d'un poste en minutes, en passant par minuit quand `end <= start`.
///
/// Le drapeau nuit n'intervient pas ici : il ne fait qu'autoriser le passage
/// de minuit dans [`validate_times`].
pub fn shift_duration_minutes(start: NaiveTime, end: NaiveTime) -> u32 {
    let duration = if end > start {
        end - start
    } else {
        (end - start) + Duration::days(1)
    };
    // toujours dans [0, 1440]
    duration.num_minutes() as u32
}

/// Vérifie la cohérence horaires / pause / travail minimal d'un gabarit.
pub fn validate_times(
    start: NaiveTime,
    end: NaiveTime,
    is_night_shift: bool,
    break_minutes: u32,
    min_work_minutes: u32,
) -> Result<(), TemplateError> {
    if !is_night_shift && end <= start {
        return Err(TemplateError::InvalidTimeRange);
    }
    let duration = shift_duration_minutes(start, end);
    if break_minutes > duration {
        return Err(TemplateError::BreakExceedsDuration {
            break_minutes,
            duration,
        });
    }
    let net = duration - break_minutes;
    if min_work_minutes > net {
        return Err(TemplateError::MinWorkExceedsNet {
            min_work_minutes,
            net,
        });
    }
    Ok(())
}

/// Données saisies pour créer ou modifier un gabarit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDraft {
    pub code: String,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub break_minutes: u32,
    #[serde(default)]
    pub grace_in_minutes: u32,
    #[serde(default)]
    pub grace_out_minutes: u32,
    #[serde(default)]
    pub is_night_shift: bool,
    pub min_work_minutes: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl TemplateDraft {
    fn validate(&self) -> Result<(), TemplateError> {
        if self.code.trim().is_empty() {
            return Err(TemplateError::Blank("shift code"));
        }
        if self.name.trim().is_empty() {
            return Err(TemplateError::Blank("shift name"));
        }
        validate_times(
            self.start_time,
            self.end_time,
            self.is_night_shift,
            self.break_minutes,
            self.min_work_minutes,
        )
    }

    fn apply_to(&self, template: &mut ShiftTemplate) {
        template.code = self.code.trim().to_string();
        template.name = self.name.trim().to_string();
        template.start_time = self.start_time;
        template.end_time = self.end_time;
        template.break_minutes = self.break_minutes;
        template.grace_in_minutes = self.grace_in_minutes;
        template.grace_out_minutes = self.grace_out_minutes;
        template.is_night_shift = self.is_night_shift;
        template.min_work_minutes = self.min_work_minutes;
        template.active = self.active;
    }
}

/// Gestion des gabarits d'un [`Planning`] (codes uniques, horaires validés).
#[derive(Debug)]
pub struct TemplateRegistry<'a> {
    planning: &'a mut Planning,
}

impl<'a> TemplateRegistry<'a> {
    pub fn new(planning: &'a mut Planning) -> Self {
        Self { planning }
    }

    pub fn create(&mut self, draft: &TemplateDraft) -> Result<ShiftTemplate, TemplateError> {
        let code = draft.code.trim();
        if self.planning.find_template_by_code(code).is_some() {
            return Err(TemplateError::DuplicateCode(code.to_string()));
        }
        draft.validate()?;

        let ts = now();
        let mut template = ShiftTemplate {
            id: ShiftTemplateId::random(),
            code: String::new(),
            name: String::new(),
            start_time: draft.start_time,
            end_time: draft.end_time,
            break_minutes: 0,
            grace_in_minutes: 0,
            grace_out_minutes: 0,
            is_night_shift: false,
            min_work_minutes: 0,
            active: true,
            created_at: ts,
            updated_at: ts,
        };
        draft.apply_to(&mut template);
        tracing::debug!(code = %template.code, id = %template.id, "shift template created");
        self.planning.templates.push(template.clone());
        Ok(template)
    }

    pub fn update(
        &mut self,
        id: &ShiftTemplateId,
        draft: &TemplateDraft,
    ) -> Result<ShiftTemplate, TemplateError> {
        if self.planning.find_template(id).is_none() {
            return Err(TemplateError::UnknownTemplate(id.clone()));
        }
        let code = draft.code.trim();
        if self
            .planning
            .templates
            .iter()
            .any(|t| t.code == code && &t.id != id)
        {
            return Err(TemplateError::DuplicateCode(code.to_string()));
        }
        draft.validate()?;

        let template = self
            .planning
            .find_template_mut(id)
            .ok_or_else(|| TemplateError::UnknownTemplate(id.clone()))?;
        draft.apply_to(template);
        template.updated_at = now();
        Ok(template.clone())
    }

    pub fn set_active(
        &mut self,
        id: &ShiftTemplateId,
        active: bool,
    ) -> Result<ShiftTemplate, TemplateError> {
        let template = self
            .planning
            .find_template_mut(id)
            .ok_or_else(|| TemplateError::UnknownTemplate(id.clone()))?;
        template.active = active;
        template.updated_at = now();
        Ok(template.clone())
    }

    /// Suppression logique : le gabarit reste résolvable par les plannings existants.
    pub fn deactivate(&mut self, id: &ShiftTemplateId) -> Result<(), TemplateError> {
        self.set_active(id, false).map(|_| ())
    }

    pub fn get(&self, id: &ShiftTemplateId) -> Result<&ShiftTemplate, TemplateError> {
        self.planning
            .find_template(id)
            .ok_or_else(|| TemplateError::UnknownTemplate(id.clone()))
    }

    /// Filtre sur l'état actif et sur une sous-chaîne (insensible à la casse) du code ou du nom.
    pub fn list(&self, active: Option<bool>, q: Option<&str>) -> Vec<&ShiftTemplate> {
        let needle = q
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        let mut out: Vec<&ShiftTemplate> = self
            .planning
            .templates
            .iter()
            .filter(|t| active.map_or(true, |a| t.active == a))
            .filter(|t| {
                needle.as_deref().map_or(true, |n| {
                    t.code.to_lowercase().contains(n) || t.name.to_lowercase().contains(n)
                })
            })
            .collect();
        out.sort_by(|a, b| a.code.cmp(&b.code));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn office_hours_are_valid() {
        assert_eq!(shift_duration_minutes(t(9, 0), t(18, 0)), 540);
        assert!(validate_times(t(9, 0), t(18, 0), false, 60, 400).is_ok());
    }

    #[test]
    fn day_shift_must_end_after_start() {
        assert_eq!(
            validate_times(t(18, 0), t(9, 0), false, 0, 0),
            Err(TemplateError::InvalidTimeRange)
        );
        assert_eq!(
            validate_times(t(9, 0), t(9, 0), false, 0, 0),
            Err(TemplateError::InvalidTimeRange)
        );
    }

    #[test]
    fn non_night_rule_holds_for_every_quarter_hour() {
        let start = t(12, 0);
        for quarter in 0..96 {
            let end = t(quarter / 4, (quarter % 4) * 15);
            let res = validate_times(start, end, false, 0, 0);
            assert_eq!(res.is_err(), end <= start, "end = {end}");
        }
    }

    #[test]
    fn night_duration_wraps_midnight() {
        for hour in 1..24 {
            let start = t(hour, 0);
            for end_hour in 0..=hour {
                let end = if end_hour == hour { start } else { t(end_hour, 30) };
                let expected = (24 * 60 - hour * 60) + end.num_seconds_from_midnight() / 60;
                assert_eq!(shift_duration_minutes(start, end), expected);
                assert!(validate_times(start, end, true, 0, 0).is_ok());
            }
        }
        assert_eq!(shift_duration_minutes(t(22, 0), t(6, 0)), 480);
    }

    #[test]
    fn seconds_are_kept_when_choosing_the_branch() {
        let start = NaiveTime::from_hms_opt(9, 0, 30).unwrap();
        let end = NaiveTime::from_hms_opt(9, 0, 45).unwrap();
        assert_eq!(shift_duration_minutes(start, end), 0);
        assert_eq!(
            validate_times(start, end, false, 600, 0),
            Err(TemplateError::BreakExceedsDuration {
                break_minutes: 600,
                duration: 0
            })
        );
        assert!(validate_times(start, end, false, 0, 0).is_ok());

        let night_end = NaiveTime::from_hms_opt(9, 0, 15).unwrap();
        assert_eq!(shift_duration_minutes(start, night_end), 24 * 60 - 1);
    }

    #[test]
    fn break_and_min_work_are_bounded() {
        assert_eq!(
            validate_times(t(22, 0), t(6, 0), true, 481, 0),
            Err(TemplateError::BreakExceedsDuration {
                break_minutes: 481,
                duration: 480
            })
        );
        assert_eq!(
            validate_times(t(9, 0), t(18, 0), false, 60, 481),
            Err(TemplateError::MinWorkExceedsNet {
                min_work_minutes: 481,
                net: 480
            })
        );
        assert!(validate_times(t(9, 0), t(18, 0), false, 60, 480).is_ok());
    }
}
