#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveTime};
use clap::{ArgAction, Args, Parser, Subcommand};
use roulement::{
    io,
    model::{EmployeeId, Planning, ScheduleSource, ShiftTemplate, ShiftTemplateId},
    scheduler::{AssignRangeRequest, Scheduler},
    storage::{JsonStorage, MemoryStore, Storage},
    template::{TemplateDraft, TemplateRegistry},
};
use std::collections::BTreeSet;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI d'affectation de postes (planning JSON local)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du planning
    #[arg(
        long,
        global = true,
        env = "ROULEMENT_PLANNING",
        default_value = "planning.json"
    )]
    planning: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Args, Debug)]
struct TemplateArgs {
    #[arg(long)]
    code: String,
    #[arg(long)]
    name: String,
    /// HH:MM
    #[arg(long, value_parser = parse_time)]
    start: NaiveTime,
    /// HH:MM (<= start pour un poste de nuit)
    #[arg(long, value_parser = parse_time)]
    end: NaiveTime,
    #[arg(long, default_value_t = 0)]
    break_minutes: u32,
    #[arg(long, default_value_t = 0)]
    grace_in: u32,
    #[arg(long, default_value_t = 0)]
    grace_out: u32,
    #[arg(long)]
    night: bool,
    #[arg(long)]
    min_work: u32,
    /// Crée le gabarit désactivé
    #[arg(long)]
    inactive: bool,
}

impl TemplateArgs {
    fn draft(self) -> TemplateDraft {
        TemplateDraft {
            code: self.code,
            name: self.name,
            start_time: self.start,
            end_time: self.end,
            break_minutes: self.break_minutes,
            grace_in_minutes: self.grace_in,
            grace_out_minutes: self.grace_out,
            is_night_shift: self.night,
            min_work_minutes: self.min_work,
            active: !self.inactive,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Créer un gabarit de poste
    TemplateAdd(TemplateArgs),

    /// Modifier un gabarit (par code ou identifiant)
    TemplateUpdate {
        #[arg(long)]
        shift: String,
        #[command(flatten)]
        args: TemplateArgs,
    },

    /// Activer / désactiver un gabarit
    TemplateActive {
        #[arg(long)]
        shift: String,
        #[arg(long, action = ArgAction::Set)]
        active: bool,
    },

    /// Lister les gabarits
    TemplateList {
        #[arg(long)]
        active: Option<bool>,
        /// Filtre sur le code ou le nom
        #[arg(long)]
        q: Option<String>,
    },

    /// Affecter un gabarit sur une plage de dates
    Assign {
        #[arg(long)]
        employee: String,
        /// Code ou identifiant du gabarit
        #[arg(long)]
        shift: String,
        /// YYYY-MM-DD
        #[arg(long)]
        start: NaiveDate,
        /// YYYY-MM-DD
        #[arg(long)]
        end: NaiveDate,
        #[arg(long, default_value = "MANUAL")]
        source: ScheduleSource,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        overwrite: bool,
    },

    /// Importer des affectations depuis un CSV
    Import {
        #[arg(long)]
        csv: String,
        #[arg(long)]
        overwrite: bool,
    },

    /// Planning d'un salarié pour une journée
    Day {
        #[arg(long)]
        employee: String,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Vérifier les chevauchements
    Check {
        /// Tous les salariés si absent
        #[arg(long)]
        employee: Option<String>,
    },
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|e| format!("invalid time {raw}: {e}"))
}

fn resolve_shift(planning: &Planning, key: &str) -> Result<ShiftTemplateId> {
    let key = key.trim();
    planning
        .find_template_by_code(key)
        .or_else(|| planning.find_template(&ShiftTemplateId::new(key)))
        .map(|t| t.id.clone())
        .ok_or_else(|| anyhow::anyhow!("unknown shift: {}", key))
}

fn print_template(t: &ShiftTemplate) {
    println!(
        "{} | {} | {} | {}-{}{} | break {} | min {} | {}",
        t.id,
        t.code,
        t.name,
        t.start_time.format("%H:%M"),
        t.end_time.format("%H:%M"),
        if t.is_night_shift { " (nuit)" } else { "" },
        t.break_minutes,
        t.min_work_minutes,
        if t.active { "active" } else { "inactive" }
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.planning)?;
    let mut planning = storage.load_or_default()?;

    let code = match cli.cmd {
        Commands::TemplateAdd(args) => {
            let template = TemplateRegistry::new(&mut planning).create(&args.draft())?;
            storage.save(&planning)?;
            print_template(&template);
            0
        }
        Commands::TemplateUpdate { shift, args } => {
            let id = resolve_shift(&planning, &shift)?;
            let template = TemplateRegistry::new(&mut planning).update(&id, &args.draft())?;
            storage.save(&planning)?;
            print_template(&template);
            0
        }
        Commands::TemplateActive { shift, active } => {
            let id = resolve_shift(&planning, &shift)?;
            let template = TemplateRegistry::new(&mut planning).set_active(&id, active)?;
            storage.save(&planning)?;
            print_template(&template);
            0
        }
        Commands::TemplateList { active, q } => {
            let registry = TemplateRegistry::new(&mut planning);
            for t in registry.list(active, q.as_deref()) {
                print_template(t);
            }
            0
        }
        Commands::Assign {
            employee,
            shift,
            start,
            end,
            source,
            note,
            overwrite,
        } => {
            let req = AssignRangeRequest {
                employee_id: EmployeeId::new(employee),
                shift_id: resolve_shift(&planning, &shift)?,
                start_date: start,
                end_date: end,
                source,
                note,
                overwrite,
            };
            let mut scheduler = Scheduler::new(MemoryStore::new(planning));
            let result = scheduler.assign_range(&req)?;
            storage.save(scheduler.into_store().planning())?;
            println!(
                "{} {} → {} | created {} | updated {}",
                result.employee_id, result.start_date, result.end_date, result.created, result.updated
            );
            0
        }
        Commands::Import { csv, overwrite } => {
            let requests = io::import_assignments_csv(&csv, &planning.templates, overwrite)?;
            let mut scheduler = Scheduler::new(MemoryStore::new(planning));
            let (mut created, mut updated) = (0u32, 0u32);
            for (idx, req) in requests.iter().enumerate() {
                // une ligne en échec annule tout l'import : rien n'est sauvegardé
                let result = scheduler
                    .assign_range(req)
                    .with_context(|| format!("row {}", idx + 2))?;
                created += result.created;
                updated += result.updated;
            }
            storage.save(scheduler.into_store().planning())?;
            println!(
                "imported {} row(s) | created {} | updated {}",
                requests.len(),
                created,
                updated
            );
            0
        }
        Commands::Day {
            employee,
            date,
            out_csv,
        } => {
            let scheduler = Scheduler::new(MemoryStore::new(planning));
            let day = scheduler.day_schedule(&EmployeeId::new(employee), date)?;
            if let Some(path) = out_csv {
                io::export_day_schedule_csv(path, &day)?;
            }
            for item in &day {
                println!(
                    "{} | {} {} | {}-{}{} | {}{}",
                    item.schedule_id,
                    item.shift_code,
                    item.shift_name,
                    item.start_time.format("%H:%M"),
                    item.end_time.format("%H:%M"),
                    if item.is_night_shift { " (nuit)" } else { "" },
                    item.source,
                    item.note
                        .as_deref()
                        .map(|n| format!(" | {n}"))
                        .unwrap_or_default()
                );
            }
            0
        }
        Commands::Check { employee } => {
            let employees: BTreeSet<EmployeeId> = match employee {
                Some(e) => BTreeSet::from([EmployeeId::new(e)]),
                None => planning
                    .schedules
                    .iter()
                    .map(|s| s.employee_id.clone())
                    .collect(),
            };
            let scheduler = Scheduler::new(MemoryStore::new(planning));
            let mut found = 0usize;
            for employee in &employees {
                for c in scheduler.detect_conflicts(employee)? {
                    found += 1;
                    eprintln!(
                        "{} | {} ⟷ {} | {} → {} ({} min)",
                        c.employee,
                        c.schedule_a,
                        c.schedule_b,
                        c.overlap_start,
                        c.overlap_end,
                        c.overlap_minutes()
                    );
                }
            }
            if found == 0 {
                println!("OK: no conflicts");
                0
            } else {
                eprintln!("Found {} conflict(s)", found);
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
    };

    std::process::exit(code);
}
