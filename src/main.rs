mod app;
mod domain;
mod input;
mod persistence;
mod store;

use anyhow::{Context, Result};
use app::{App, FormMode, SaveError};
use clap::{Parser, Subcommand};
use domain::{format_timestamp, TaskId, TaskRecord};
use input::FieldArgs;
use persistence::{
    ensure_dir, get_data_dir, init_local_dir, load_settings, save_settings, settings_file,
    FileBlobStore, Settings,
};
use std::path::PathBuf;
use store::StoreError;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "geotask")]
#[command(about = "A personal task tracker with dated, geolocated tasks", long_about = None)]
struct Cli {
    /// Data directory (defaults to $GEOTASK_DIR, a local .geotask, or ~/.geotask)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .geotask directory in the current directory
    Init,
    /// List all tasks
    List,
    /// Show one task
    Show { id: TaskId },
    /// Create a task; unset fields keep the new-task defaults
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Edit a task; unset fields keep their current values
    Edit {
        id: TaskId,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete a task
    Delete { id: TaskId },
}

fn main() -> Result<()> {
    install_tracing();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let current_dir = std::env::current_dir().context("Could not determine current directory")?;
            let dir = init_local_dir(&current_dir)?;
            save_settings(settings_file(&dir), &Settings::default())?;
            println!("Initialized task directory: {}", dir.display());
            Ok(())
        }
        Some(command) => {
            let mut app = open_app(cli.dir)?;
            run(&mut app, command)
        }
        None => {
            let app = open_app(cli.dir)?;
            print_list(app.tasks());
            Ok(())
        }
    }
}

fn install_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn open_app(dir: Option<PathBuf>) -> Result<App<FileBlobStore>> {
    let dir = match dir {
        Some(dir) => dir,
        None => get_data_dir()?,
    };
    ensure_dir(&dir)?;
    tracing::debug!(dir = %dir.display(), "using data directory");

    let settings = load_settings(settings_file(&dir))?;
    App::open(FileBlobStore::new(&dir), settings.storage_key, settings.validation)
        .context("Failed to load tasks")
}

fn run(app: &mut App<FileBlobStore>, command: Commands) -> Result<()> {
    let updates = app.cache.subscribe();

    match command {
        Commands::Init => anyhow::bail!("init does not run against an open task store"),
        Commands::List => print_list(app.tasks()),
        Commands::Show { id } => {
            let task = app.store.get(id).ok_or(StoreError::NotFound(id))?;
            print_task(&task);
        }
        Commands::Add { fields } => {
            let mut session = app.start_create();
            session.apply_all(fields.into_edits())?;
            report_save(app.save(&mut session))?;
        }
        Commands::Edit { id, fields } => {
            let mut session = app.start_edit(id)?;
            session.apply_all(fields.into_edits())?;
            report_save(app.save(&mut session))?;
        }
        Commands::Delete { id } => {
            let removed = app.delete(id)?;
            println!("Deleted {} ({})", removed.name, removed.id);
        }
    }

    if let Some(tasks) = updates.try_iter().last() {
        println!("{} task(s) stored", tasks.len());
    }
    Ok(())
}

fn report_save(result: Result<app::SaveOutcome, SaveError>) -> Result<()> {
    match result {
        Ok(outcome) => {
            let verb = match outcome.mode {
                FormMode::Create => "Created",
                FormMode::Edit(_) => "Updated",
            };
            println!("{} {}", verb, outcome.record.id);
            print_task(&outcome.record);
            Ok(())
        }
        Err(SaveError::Store(err)) => {
            Err(anyhow::Error::new(err).context("The change was not saved"))
        }
        Err(err) => Err(err.into()),
    }
}

fn print_list(tasks: &[TaskRecord]) {
    if tasks.is_empty() {
        println!("No tasks yet.");
        return;
    }
    for task in tasks {
        let mark = if task.status.is_open() { " " } else { "x" };
        println!(
            "[{}] {}  {:<24}  {:<8} due {}",
            mark,
            task.id,
            task.name,
            task.priority,
            format_timestamp(&task.due_date)
        );
    }
}

fn print_task(task: &TaskRecord) {
    println!("Name:        {}", task.name);
    println!("Description: {}", task.description);
    println!("Status:      {}", task.status);
    println!("Priority:    {}", task.priority);
    println!("Start:       {}", format_timestamp(&task.start_date));
    println!("Due:         {}", format_timestamp(&task.due_date));
    println!(
        "Location:    {}, {}",
        task.location.latitude, task.location.longitude
    );
}
