use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Acting user id (falls back to default_actor from the config file)
    #[arg(long, global = true, value_name = "USER_ID")]
    pub actor: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the animal roster
    Animal {
        #[command(subcommand)]
        animal: AnimalCommand,
    },
    /// Manage staff accounts
    User {
        #[command(subcommand)]
        user: UserCommand,
    },
    /// Schedule and track care tasks
    Task {
        #[command(subcommand)]
        task: TaskCommand,
    },
    /// Record and summarize behavior observations
    Behavior {
        #[command(subcommand)]
        behavior: BehaviorCommand,
    },
    /// Veterinarian assignments
    Vet {
        #[command(subcommand)]
        vet: VetCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum AnimalCommand {
    /// Register an animal
    ///
    /// Example: sheltercare animal add Clover --species goat
    Add {
        name: String,
        #[arg(long)]
        species: String,
    },
    /// List all animals
    List,
    /// Show one animal
    Show { id: String },
    /// Clear a needs-attention flag after manual review
    ///
    /// Example: sheltercare animal clear-attention animal-1
    ClearAttention { id: String },
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Register a staff member
    ///
    /// Example: sheltercare user add "Dr. Osei" --role vet
    Add {
        name: String,
        /// caretaker, admin or veterinarian
        #[arg(long)]
        role: String,
    },
    /// List all staff
    List,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Create a care task
    ///
    /// Example: sheltercare task add --type feeding --animal animal-1 \
    ///   --assignee user-1 --date 2024-06-01 --time 08:00 --time 18:00
    /// Example: ... --repeat weekly --until 2024-06-30
    Add {
        #[arg(long = "type")]
        task_type: String,
        #[arg(long)]
        animal: String,
        #[arg(long)]
        assignee: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long = "time")]
        times: Vec<String>,
        /// daily, weekly or monthly
        #[arg(long)]
        repeat: Option<String>,
        #[arg(long)]
        until: Option<String>,
    },
    /// Edit a task's type, assignment or schedule
    ///
    /// Passing any schedule flag replaces the whole schedule.
    Edit {
        id: String,
        #[arg(long = "type")]
        task_type: Option<String>,
        #[arg(long)]
        animal: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long = "time")]
        times: Vec<String>,
        #[arg(long)]
        repeat: Option<String>,
        #[arg(long)]
        until: Option<String>,
    },
    /// Delete a task (admin only)
    Delete { id: String },
    /// Show one task
    Show { id: String },
    /// List tasks, optionally for one day or one assignee
    ///
    /// Example: sheltercare task list --day 2024-06-08
    List {
        #[arg(long)]
        day: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
    },
    /// Mark a task completed (toggle path, no proof involved)
    Done { id: String },
    /// Reopen a completed task
    Reopen { id: String },
    /// Attach a completion photo URL
    ///
    /// Example: sheltercare task proof task-1 https://cdn.example/p.jpg
    Proof { id: String, url: String },
    /// Affirm the completion proof (admin only)
    Verify { id: String },
    /// Withdraw a proof verification (admin only)
    Unverify { id: String },
}

#[derive(Subcommand, Debug)]
pub enum BehaviorCommand {
    /// Record a behavior observation (the actor is the recorder)
    ///
    /// Example: sheltercare behavior add --animal animal-1 \
    ///   --eating none --movement active --mood calm --actor user-1
    Add {
        #[arg(long)]
        animal: String,
        #[arg(long)]
        eating: String,
        #[arg(long)]
        movement: String,
        #[arg(long)]
        mood: String,
        #[arg(long)]
        notes: Option<String>,
        /// URL of an uploaded video clip
        #[arg(long)]
        video: Option<String>,
    },
    /// List one animal's observations, newest last
    List {
        #[arg(long)]
        animal: String,
    },
    /// Per-day counts over the trailing N days
    Summary {
        #[arg(long, default_value_t = care_core::behavior_api::DEFAULT_SUMMARY_DAYS)]
        days: u32,
    },
}

#[derive(Subcommand, Debug)]
pub enum VetCommand {
    /// Assign (or reassign) a veterinarian to an animal
    ///
    /// Example: sheltercare vet assign --animal animal-1 --vet vet-1 \
    ///   --reason limping
    Assign {
        #[arg(long)]
        animal: String,
        #[arg(long)]
        vet: String,
        #[arg(long)]
        reason: String,
    },
    /// Show the animal's current assignment, if any
    Current { animal_id: String },
    /// List users holding the veterinarian role
    List,
}
