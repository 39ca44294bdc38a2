use crate::model::{now, EmployeeId, Planning, ScheduleEntry, ShiftTemplate, ShiftTemplateId};
use anyhow::Context;
use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Résolution en lecture seule des gabarits de poste.
pub trait ShiftTemplateLookup {
    fn find_template(&self, id: &ShiftTemplateId) -> anyhow::Result<Option<ShiftTemplate>>;
}

/// Accès aux lignes de planning.
pub trait ScheduleStore {
    /// Lignes du salarié dont la date de travail est dans `[from, to]`.
    fn find_by_employee_and_date_range(
        &self,
        employee: &EmployeeId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<ScheduleEntry>>;

    fn find_by_employee_and_date(
        &self,
        employee: &EmployeeId,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<ScheduleEntry>> {
        self.find_by_employee_and_date_range(employee, date, date)
    }

    fn find_by_employee(&self, employee: &EmployeeId) -> anyhow::Result<Vec<ScheduleEntry>>;

    /// Insère ou remplace (par identifiant) et renvoie la ligne persistée.
    fn save(&mut self, entry: ScheduleEntry) -> anyhow::Result<ScheduleEntry>;
}

/// Store en mémoire au-dessus d'un [`Planning`].
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    planning: Planning,
}

impl MemoryStore {
    pub fn new(planning: Planning) -> Self {
        Self { planning }
    }
    pub fn planning(&self) -> &Planning {
        &self.planning
    }
    pub fn planning_mut(&mut self) -> &mut Planning {
        &mut self.planning
    }
    pub fn into_planning(self) -> Planning {
        self.planning
    }
}

impl ShiftTemplateLookup for MemoryStore {
    fn find_template(&self, id: &ShiftTemplateId) -> anyhow::Result<Option<ShiftTemplate>> {
        Ok(self.planning.find_template(id).cloned())
    }
}

impl ScheduleStore for MemoryStore {
    fn find_by_employee_and_date_range(
        &self,
        employee: &EmployeeId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> anyhow::Result<Vec<ScheduleEntry>> {
        Ok(self
            .planning
            .schedules_of(employee)
            .filter(|s| s.work_date >= from && s.work_date <= to)
            .cloned()
            .collect())
    }

    fn find_by_employee(&self, employee: &EmployeeId) -> anyhow::Result<Vec<ScheduleEntry>> {
        Ok(self.planning.schedules_of(employee).cloned().collect())
    }

    fn save(&mut self, mut entry: ScheduleEntry) -> anyhow::Result<ScheduleEntry> {
        match self.planning.schedules.iter_mut().find(|s| s.id == entry.id) {
            Some(existing) => {
                entry.created_at = existing.created_at;
                entry.updated_at = now();
                *existing = entry.clone();
            }
            None => self.planning.schedules.push(entry.clone()),
        }
        Ok(entry)
    }
}

pub trait Storage {
    /// Charge un planning depuis un support.
    fn load(&self) -> anyhow::Result<Planning>;
    /// Sauvegarde de manière atomique.
    fn save(&self, planning: &Planning) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Un fichier absent donne un planning vide ; un fichier illisible reste une erreur.
    pub fn load_or_default(&self) -> anyhow::Result<Planning> {
        if self.path.exists() {
            self.load()
        } else {
            Ok(Planning::default())
        }
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Planning> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let planning: Planning = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(planning)
    }

    fn save(&self, planning: &Planning) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(planning)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
