use care_core::behavior_api::{self, DaySummary, NewBehavior};
use care_core::config::{self, Config};
use care_core::error::AppError;
use care_core::model::{Animal, AnimalStatus, BehaviorRecord, CareTask, Role, TaskStatus, User};
use care_core::roster;
use care_core::schedule::ScheduleInput;
use care_core::task_api::{self, NewTask, TaskEdit};
use care_core::vet_api;
use clap::Parser;
use std::str::FromStr;
use tabled::{Table, Tabled};

mod cli;
use cli::{AnimalCommand, BehaviorCommand, Cli, Command, TaskCommand, UserCommand, VetCommand};

fn status_label(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Pending => "pending",
        TaskStatus::Completed => "completed",
    }
}

fn animal_status_label(status: AnimalStatus) -> &'static str {
    match status {
        AnimalStatus::Healthy => "healthy",
        AnimalStatus::NeedsAttention => "needs_attention",
        AnimalStatus::UnderTreatment => "under_treatment",
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Caretaker => "caretaker",
        Role::Admin => "admin",
        Role::Veterinarian => "veterinarian",
    }
}

fn parse_arg<T: FromStr<Err = String>>(value: &str) -> Result<T, AppError> {
    value.parse::<T>().map_err(AppError::invalid_input)
}

fn resolve_actor(cli_actor: Option<&str>, config: &Config) -> Result<String, AppError> {
    if let Some(actor) = cli_actor
        && !actor.trim().is_empty()
    {
        return Ok(actor.trim().to_string());
    }
    if let Some(actor) = config.default_actor.as_deref()
        && !actor.trim().is_empty()
    {
        return Ok(actor.trim().to_string());
    }
    Err(AppError::invalid_input(
        "acting user is required (--actor or default_actor in config)",
    ))
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string(value).map_err(|err| AppError::invalid_data(err.to_string()))
}

#[derive(Tabled)]
struct TaskRow {
    id: String,
    #[tabled(rename = "type")]
    task_type: &'static str,
    animal: String,
    assignee: String,
    status: String,
    date: String,
    times: String,
    repeats: String,
}

impl TaskRow {
    fn from_task(task: &CareTask) -> Self {
        let status = if task.completion_verified {
            format!("{} (verified)", status_label(task.status))
        } else {
            status_label(task.status).to_string()
        };
        let repeats = match (task.schedule.is_recurring, task.schedule.recurrence_pattern) {
            (true, Some(pattern)) => format!(
                "{} until {}",
                pattern.label(),
                task.schedule.end_date.as_deref().unwrap_or("-")
            ),
            _ => "-".to_string(),
        };

        Self {
            id: task.id.clone(),
            task_type: task.task_type.label(),
            animal: task.animal_id.clone(),
            assignee: task.assigned_to.clone(),
            status,
            date: task
                .schedule
                .schedule_date
                .clone()
                .unwrap_or_else(|| "-".to_string()),
            times: task.schedule.schedule_times.join(","),
            repeats,
        }
    }
}

#[derive(Tabled)]
struct AnimalRow {
    id: String,
    name: String,
    species: String,
    status: &'static str,
}

#[derive(Tabled)]
struct UserRow {
    id: String,
    name: String,
    role: &'static str,
}

#[derive(Tabled)]
struct BehaviorRow {
    id: String,
    eating: &'static str,
    movement: &'static str,
    mood: &'static str,
    critical: bool,
    recorded_at: String,
}

impl BehaviorRow {
    fn from_record(record: &BehaviorRecord) -> Self {
        Self {
            id: record.id.clone(),
            eating: record.eating.label(),
            movement: record.movement.label(),
            mood: record.mood.label(),
            critical: record.is_critical(),
            recorded_at: record.recorded_at.clone(),
        }
    }
}

#[derive(Tabled)]
struct SummaryRow {
    date: String,
    total: u32,
    #[tabled(rename = "eating n/l/0")]
    eating: String,
    #[tabled(rename = "movement a/l/l")]
    movement: String,
    #[tabled(rename = "mood c/ag/an")]
    mood: String,
}

impl SummaryRow {
    fn from_summary(day: &DaySummary) -> Self {
        Self {
            date: day.date.clone(),
            total: day.total,
            eating: format!(
                "{}/{}/{}",
                day.eating.normal, day.eating.low, day.eating.none
            ),
            movement: format!(
                "{}/{}/{}",
                day.movement.active, day.movement.lazy, day.movement.limping
            ),
            mood: format!("{}/{}/{}", day.mood.calm, day.mood.aggressive, day.mood.anxious),
        }
    }
}

fn print_tasks(tasks: &[CareTask], json: bool) -> Result<(), AppError> {
    if json {
        println!("{}", to_json(&tasks)?);
    } else {
        let rows: Vec<TaskRow> = tasks.iter().map(TaskRow::from_task).collect();
        println!("{}", Table::new(rows));
    }
    Ok(())
}

fn print_task(task: &CareTask, json: bool, headline: &str) -> Result<(), AppError> {
    if json {
        println!("{}", to_json(task)?);
    } else {
        println!("{headline}: {} ({})", task.task_type.label(), task.id);
    }
    Ok(())
}

fn schedule_from_flags(
    date: Option<String>,
    times: Vec<String>,
    repeat: Option<String>,
    until: Option<String>,
) -> Result<ScheduleInput, AppError> {
    let recurrence_pattern = match repeat.as_deref() {
        Some(value) => Some(parse_arg(value)?),
        None => None,
    };

    Ok(ScheduleInput {
        schedule_date: date,
        schedule_times: times,
        is_recurring: recurrence_pattern.is_some(),
        recurrence_pattern,
        end_date: until,
    })
}

fn run_animal(command: AnimalCommand, json: bool) -> Result<(), AppError> {
    match command {
        AnimalCommand::Add { name, species } => {
            let animal = roster::add_animal(&name, &species)?;
            if json {
                println!("{}", to_json(&animal)?);
            } else {
                println!("Registered animal: {} ({})", animal.name, animal.id);
            }
        }
        AnimalCommand::List => {
            let animals = roster::list_animals()?;
            if json {
                println!("{}", to_json(&animals)?);
            } else {
                let rows: Vec<AnimalRow> = animals
                    .iter()
                    .map(|animal: &Animal| AnimalRow {
                        id: animal.id.clone(),
                        name: animal.name.clone(),
                        species: animal.species.clone(),
                        status: animal_status_label(animal.status),
                    })
                    .collect();
                println!("{}", Table::new(rows));
            }
        }
        AnimalCommand::Show { id } => {
            let animal = roster::get_animal(&id)?;
            if json {
                println!("{}", to_json(&animal)?);
            } else {
                println!(
                    "{} | {} | {} | {}",
                    animal.id,
                    animal.name,
                    animal.species,
                    animal_status_label(animal.status)
                );
            }
        }
        AnimalCommand::ClearAttention { id } => {
            let animal = roster::clear_attention(&id)?;
            if json {
                println!("{}", to_json(&animal)?);
            } else {
                println!("Cleared attention flag: {} ({})", animal.name, animal.id);
            }
        }
    }
    Ok(())
}

fn run_user(command: UserCommand, json: bool) -> Result<(), AppError> {
    match command {
        UserCommand::Add { name, role } => {
            let role = parse_arg(&role)?;
            let user = roster::add_user(&name, role)?;
            if json {
                println!("{}", to_json(&user)?);
            } else {
                println!("Registered user: {} ({})", user.name, user.id);
            }
        }
        UserCommand::List => {
            let users = roster::list_users()?;
            if json {
                println!("{}", to_json(&users)?);
            } else {
                let rows: Vec<UserRow> = users
                    .iter()
                    .map(|user: &User| UserRow {
                        id: user.id.clone(),
                        name: user.name.clone(),
                        role: role_label(user.role),
                    })
                    .collect();
                println!("{}", Table::new(rows));
            }
        }
    }
    Ok(())
}

fn run_task(command: TaskCommand, json: bool, actor: Option<&str>, config: &Config) -> Result<(), AppError> {
    match command {
        TaskCommand::Add {
            task_type,
            animal,
            assignee,
            date,
            times,
            repeat,
            until,
        } => {
            let actor = resolve_actor(actor, config)?;
            let new_task = NewTask {
                task_type: parse_arg(&task_type)?,
                assigned_to: assignee,
                animal_id: animal,
                schedule: schedule_from_flags(date, times, repeat, until)?,
            };
            let task = task_api::add_task(&actor, &new_task)?;
            print_task(&task, json, "Added task")?;
        }
        TaskCommand::Edit {
            id,
            task_type,
            animal,
            assignee,
            date,
            times,
            repeat,
            until,
        } => {
            let actor = resolve_actor(actor, config)?;
            let replace_schedule =
                date.is_some() || !times.is_empty() || repeat.is_some() || until.is_some();
            let edit = TaskEdit {
                task_type: match task_type.as_deref() {
                    Some(value) => Some(parse_arg(value)?),
                    None => None,
                },
                assigned_to: assignee,
                animal_id: animal,
                schedule: if replace_schedule {
                    Some(schedule_from_flags(date, times, repeat, until)?)
                } else {
                    None
                },
            };
            let task = task_api::edit_task(&actor, &id, &edit)?;
            print_task(&task, json, "Updated task")?;
        }
        TaskCommand::Delete { id } => {
            let actor = resolve_actor(actor, config)?;
            let task = task_api::delete_task(&actor, &id)?;
            print_task(&task, json, "Deleted task")?;
        }
        TaskCommand::Show { id } => {
            let task = task_api::get_task(&id)?;
            if json {
                println!("{}", to_json(&task)?);
            } else {
                let row = TaskRow::from_task(&task);
                println!(
                    "{} | {} | {} | {} | {} | {} {} | {}",
                    row.id,
                    row.task_type,
                    row.animal,
                    row.assignee,
                    row.status,
                    row.date,
                    row.times,
                    row.repeats
                );
                if let Some(proof) = task.image_proof.as_deref() {
                    println!("proof: {proof}");
                }
                if let Some(completed_at) = task.completed_at.as_deref() {
                    println!("completed_at: {completed_at}");
                }
            }
        }
        TaskCommand::List { day, assignee } => {
            let mut tasks = match day.as_deref() {
                Some(day) => task_api::list_for_day(day)?,
                None => task_api::list_tasks()?,
            };
            if let Some(assignee) = assignee.as_deref() {
                if day.is_none() {
                    tasks = task_api::list_for_assignee(assignee)?;
                } else {
                    tasks.retain(|task| task.assigned_to == assignee);
                }
            }
            print_tasks(&tasks, json)?;
        }
        TaskCommand::Done { id } => {
            let actor = resolve_actor(actor, config)?;
            let task = task_api::mark_complete(&actor, &id)?;
            print_task(&task, json, "Completed task")?;
        }
        TaskCommand::Reopen { id } => {
            let actor = resolve_actor(actor, config)?;
            let task = task_api::mark_pending(&actor, &id)?;
            print_task(&task, json, "Reopened task")?;
        }
        TaskCommand::Proof { id, url } => {
            let actor = resolve_actor(actor, config)?;
            let task = task_api::submit_proof(&actor, &id, &url)?;
            print_task(&task, json, "Recorded proof for task")?;
        }
        TaskCommand::Verify { id } => {
            let actor = resolve_actor(actor, config)?;
            let task = task_api::verify(&actor, &id)?;
            print_task(&task, json, "Verified task")?;
        }
        TaskCommand::Unverify { id } => {
            let actor = resolve_actor(actor, config)?;
            let task = task_api::unverify(&actor, &id)?;
            print_task(&task, json, "Withdrew verification for task")?;
        }
    }
    Ok(())
}

fn run_behavior(
    command: BehaviorCommand,
    json: bool,
    actor: Option<&str>,
    config: &Config,
) -> Result<(), AppError> {
    match command {
        BehaviorCommand::Add {
            animal,
            eating,
            movement,
            mood,
            notes,
            video,
        } => {
            let actor = resolve_actor(actor, config)?;
            let new_behavior = NewBehavior {
                animal_id: animal,
                recorded_by: actor,
                eating: parse_arg(&eating)?,
                movement: parse_arg(&movement)?,
                mood: parse_arg(&mood)?,
                notes: notes.unwrap_or_default(),
                video_proof: video,
            };
            let recorded = behavior_api::record_behavior(&new_behavior)?;
            if json {
                let payload = serde_json::json!({
                    "record": recorded.record,
                    "critical": recorded.critical,
                });
                println!("{payload}");
            } else {
                println!("Recorded behavior: {}", recorded.record.id);
                if recorded.critical {
                    println!(
                        "CRITICAL: {} flagged needs_attention - consider `sheltercare vet assign`",
                        recorded.record.animal_id
                    );
                }
            }
        }
        BehaviorCommand::List { animal } => {
            let records: Vec<BehaviorRecord> = behavior_api::list_behaviors(&animal)?;
            if json {
                println!("{}", to_json(&records)?);
            } else {
                let rows: Vec<BehaviorRow> = records.iter().map(BehaviorRow::from_record).collect();
                println!("{}", Table::new(rows));
            }
        }
        BehaviorCommand::Summary { days } => {
            let summary = behavior_api::summary(days)?;
            if json {
                println!("{}", to_json(&summary)?);
            } else {
                let rows: Vec<SummaryRow> =
                    summary.iter().map(SummaryRow::from_summary).collect();
                println!("{}", Table::new(rows));
            }
        }
    }
    Ok(())
}

fn run_vet(command: VetCommand, json: bool) -> Result<(), AppError> {
    match command {
        VetCommand::Assign {
            animal,
            vet,
            reason,
        } => {
            // Reassignment is legitimate; the workflow never blocks it.
            // Surfacing that a previous assignment existed is this
            // caller's job.
            let previous = vet_api::current_assignment(&animal)?;
            let assignment = vet_api::assign_vet(&animal, &vet, &reason)?;
            if json {
                println!("{}", to_json(&assignment)?);
            } else {
                match previous {
                    Some(previous) if previous.vet_id != assignment.vet_id => println!(
                        "Reassigned {}: {} -> {} ({})",
                        assignment.animal_id, previous.vet_id, assignment.vet_id, assignment.id
                    ),
                    _ => println!(
                        "Assigned {} to {} ({})",
                        assignment.vet_id, assignment.animal_id, assignment.id
                    ),
                }
            }
        }
        VetCommand::Current { animal_id } => {
            let current = vet_api::current_assignment(&animal_id)?;
            if json {
                println!("{}", to_json(&current)?);
            } else {
                match current {
                    Some(assignment) => println!(
                        "{} | {} | {} | {}",
                        assignment.id, assignment.vet_id, assignment.reason, assignment.assigned_at
                    ),
                    None => println!("No veterinarian assigned"),
                }
            }
        }
        VetCommand::List => {
            let vets: Vec<User> = vet_api::list_vets()?;
            if json {
                println!("{}", to_json(&vets)?);
            } else {
                let rows: Vec<UserRow> = vets
                    .iter()
                    .map(|user| UserRow {
                        id: user.id.clone(),
                        name: user.name.clone(),
                        role: role_label(user.role),
                    })
                    .collect();
                println!("{}", Table::new(rows));
            }
        }
    }
    Ok(())
}

fn run_command(cli: Cli, config: &Config) -> Result<(), AppError> {
    let actor = cli.actor.as_deref();
    match cli.command {
        Command::Animal { animal } => run_animal(animal, cli.json),
        Command::User { user } => run_user(user, cli.json),
        Command::Task { task } => run_task(task, cli.json, actor, config),
        Command::Behavior { behavior } => run_behavior(behavior, cli.json, actor, config),
        Command::Vet { vet } => run_vet(vet, cli.json),
    }
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if err.use_stderr() {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                std::process::exit(1);
            }
            // --help and --version render on stdout and exit cleanly.
            err.exit();
        }
    };

    let loaded = config::load_config_with_fallback();
    if let Some(err) = loaded.error.as_ref() {
        eprintln!("WARNING: {err}");
    }

    if let Err(err) = run_command(cli, &loaded.config) {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
