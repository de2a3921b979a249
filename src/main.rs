use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use deskboard::{
    api::{ApiClient, DocumentsApi, EmployeesApi, RemoteResource},
    config::Config,
    metrics::DashboardStats,
    models::{
        AccessLevel, Document, DocumentEdit, DocumentFacets, Employee, EmployeeFacets, EmployeeStatus,
        NewDocument, NewEmployee, Upload,
    },
    sync::{Filterable, ResourceSync, SyncOutcome},
    tui::{ui::truncate, App},
};

mod cli;

use cli::{Cli, Commands, DeleteArgs, DocumentCommand, EmployeeCommand};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Tui));

    // Set default log level to INFO if not specified
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "deskboard=info");
    }
    init_logging(!interactive);

    let config = Config::from_env()?.with_api_url(cli.api_url.clone());
    config.validate()?;

    let result = match cli.command {
        None | Some(Commands::Tui) => run_tui(&config).await,
        Some(Commands::Documents { action }) => run_documents(&config, action).await,
        Some(Commands::Employees { action }) => run_employees(&config, action).await,
        Some(Commands::Stats) => run_stats(&config).await,
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

/// Log to `deskboard.log`, and also to stderr outside the TUI
fn init_logging(to_stderr: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let file_appender = tracing_appender::rolling::never(".", "deskboard.log");

    tracing_subscriber::registry()
        .with(to_stderr.then(|| {
            fmt::layer()
                .with_writer(io::stderr)
                .with_filter(EnvFilter::from_default_env())
        }))
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();
}

async fn run_tui(config: &Config) -> Result<()> {
    info!("Launching TUI interface");
    let mut app = App::new(config)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    app.shutdown();
    result
}

/// Turn a sync outcome into the command's exit status
fn settle(outcome: SyncOutcome) -> Result<()> {
    match outcome {
        SyncOutcome::Failed { message, .. } => Err(anyhow!(message)),
        SyncOutcome::Busy => Err(anyhow!("Another request is still in progress")),
        _ => Ok(()),
    }
}

async fn loaded<R>(remote: R) -> Result<ResourceSync<R>>
where
    R: RemoteResource,
    R::Record: Filterable,
{
    let mut sync = ResourceSync::new(remote);
    settle(sync.load().await)?;
    Ok(sync)
}

async fn run_documents(config: &Config, action: DocumentCommand) -> Result<()> {
    let api = DocumentsApi::new(ApiClient::new(config)?);

    match action {
        DocumentCommand::List { search, status } => {
            let mut sync = loaded(api).await?;
            let mirror = sync.mirror_mut();
            mirror.set_query(search.unwrap_or_default());
            mirror.set_facets(DocumentFacets { status });
            print_documents(mirror.filtered());
            Ok(())
        }
        DocumentCommand::Add {
            name,
            description,
            file,
        } => {
            let upload = Upload::from_path(Path::new(&file))
                .await
                .with_context(|| format!("Failed to read {}", file))?;
            let mut sync = ResourceSync::new(api);
            settle(
                sync.create(NewDocument {
                    name,
                    description,
                    file: upload,
                })
                .await,
            )?;
            if let Some(doc) = sync.mirror().items().last() {
                println!("Document uploaded successfully! (id {})", doc.id);
            }
            Ok(())
        }
        DocumentCommand::Edit { id, name, description } => {
            let mut sync = loaded(api).await?;
            if sync.mirror().get(id).is_none() {
                return Err(anyhow!("Document {} not found", id));
            }
            settle(sync.edit(id, DocumentEdit { name, description }).await)?;
            println!("Document {} updated", id);
            Ok(())
        }
        DocumentCommand::Delete(args) => {
            let mut sync = loaded(api).await?;
            let label = sync
                .mirror()
                .get(args.id)
                .map(|doc| format!("document \"{}\"", doc.name))
                .ok_or_else(|| anyhow!("Document {} not found", args.id))?;
            delete(&mut sync, &args, &label).await
        }
    }
}

async fn run_employees(config: &Config, action: EmployeeCommand) -> Result<()> {
    let api = EmployeesApi::new(ApiClient::new(config)?);

    match action {
        EmployeeCommand::List { search, status, access } => {
            let mut sync = loaded(api).await?;
            let mirror = sync.mirror_mut();
            mirror.set_query(search.unwrap_or_default());
            mirror.set_facets(EmployeeFacets {
                status: status.as_deref().map(EmployeeStatus::parse),
                access: access.as_deref().map(AccessLevel::parse),
            });
            print_employees(mirror.filtered());
            Ok(())
        }
        EmployeeCommand::Add {
            name,
            email,
            status,
            access,
        } => {
            if name.trim().is_empty() || !email.contains('@') {
                return Err(anyhow!("A name and a valid email address are required"));
            }
            let mut sync = ResourceSync::new(api);
            settle(
                sync.create(NewEmployee {
                    name: name.trim().to_string(),
                    email: email.trim().to_string(),
                    status: EmployeeStatus::parse(&status),
                    access: AccessLevel::parse(&access),
                })
                .await,
            )?;
            if let Some(employee) = sync.mirror().items().last() {
                println!("User added successfully! (id {})", employee.id);
            }
            Ok(())
        }
        EmployeeCommand::Edit {
            id,
            name,
            email,
            status,
            access,
        } => {
            let mut sync = loaded(api).await?;
            let mut record = sync
                .mirror()
                .get(id)
                .cloned()
                .ok_or_else(|| anyhow!("Employee {} not found", id))?;
            if let Some(name) = name {
                record.name = name;
            }
            if let Some(email) = email {
                record.email = email;
            }
            if let Some(status) = status {
                record.status = EmployeeStatus::parse(&status);
            }
            if let Some(access) = access {
                record.access = AccessLevel::parse(&access);
            }
            settle(sync.edit(id, record).await)?;
            println!("Employee {} updated", id);
            Ok(())
        }
        EmployeeCommand::Delete(args) => {
            let mut sync = loaded(api).await?;
            let label = sync
                .mirror()
                .get(args.id)
                .map(|employee| format!("employee \"{}\"", employee.name))
                .ok_or_else(|| anyhow!("Employee {} not found", args.id))?;
            delete(&mut sync, &args, &label).await
        }
    }
}

/// Confirm (unless `--yes`) and delete a record from a loaded collection
async fn delete<R>(sync: &mut ResourceSync<R>, args: &DeleteArgs, label: &str) -> Result<()>
where
    R: RemoteResource,
    R::Record: Filterable,
{
    let mirror = sync.mirror_mut();
    mirror.request_delete(args.id);
    if !args.yes && !confirm(&format!("Are you sure you want to delete {}?", label))? {
        mirror.cancel_delete();
        println!("Kept {}", label);
        return Ok(());
    }
    let confirmation = mirror
        .confirm_delete()
        .ok_or_else(|| anyhow!("Nothing to delete"))?;
    settle(sync.delete(confirmation).await)?;
    println!("Deleted {}", label);
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn run_stats(config: &Config) -> Result<()> {
    let client = ApiClient::new(config)?;
    let documents = loaded(DocumentsApi::new(client.clone())).await?;
    let employees = loaded(EmployeesApi::new(client)).await?;

    let stats = DashboardStats::from_records(documents.mirror().items(), employees.mirror().items());
    println!("Total documents:   {}", stats.total_documents);
    println!(
        "Active documents:  {} ({}% of all)",
        stats.active_documents,
        stats.active_percentage()
    );
    println!("Total employees:   {}", stats.total_employees);
    for (status, count) in &stats.employees_by_status {
        println!("  status {:<10} {}", status, count);
    }
    for (access, count) in &stats.employees_by_access {
        println!("  access {:<10} {}", access, count);
    }
    Ok(())
}

fn print_documents<'a>(documents: impl Iterator<Item = &'a Document>) {
    println!("{:<6} {:<28} {:<36} {:<10} {}", "ID", "NAME", "DESCRIPTION", "SIZE", "STATUS");
    let mut count = 0;
    for doc in documents {
        println!(
            "{:<6} {:<28} {:<36} {:<10} {}",
            doc.id,
            truncate(&doc.name, 28),
            truncate(&doc.description, 36),
            doc.size_display(),
            doc.status_display()
        );
        count += 1;
    }
    println!("{} document(s)", count);
}

fn print_employees<'a>(employees: impl Iterator<Item = &'a Employee>) {
    println!("{:<6} {:<24} {:<32} {:<10} {}", "ID", "NAME", "EMAIL", "STATUS", "ACCESS");
    let mut count = 0;
    for employee in employees {
        println!(
            "{:<6} {:<24} {:<32} {:<10} {}",
            employee.id,
            truncate(&employee.name, 24),
            truncate(&employee.email, 32),
            employee.status.display(),
            employee.access.display()
        );
        count += 1;
    }
    println!("{} employee(s)", count);
}
