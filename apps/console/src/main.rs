mod render;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    defaults::Handoff, load_settings, ClientError, Directory, EntityWorkspace, FetchOutcome,
    FormSchema,
};
use shared::{
    domain::{EmployeeRecordId, UserId},
    protocol::{Employee, User},
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "staffdesk", about = "Manage directory users and employees")]
struct Cli {
    /// Overrides `api_base_url` from directory.toml and the environment.
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(subcommand)]
    Users(UserCommand),
    #[command(subcommand)]
    Employees(EmployeeCommand),
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,
    #[arg(long)]
    page_size: Option<u32>,
    #[arg(long)]
    search: Option<String>,
    /// `name`, `phone` or `pin` for users; `name` or `id` for employees.
    #[arg(long)]
    search_field: Option<String>,
}

impl ListArgs {
    fn filters(&self) -> Vec<(&'static str, String)> {
        let mut filters = Vec::new();
        if let Some(field) = &self.search_field {
            filters.push(("searchField", field.clone()));
        }
        if let Some(search) = &self.search {
            filters.push(("search", search.clone()));
        }
        filters
    }
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        district: Option<String>,
    },
    Show {
        id: i64,
    },
    Add(UserFields),
    Edit {
        id: i64,
        #[command(flatten)]
        fields: UserFields,
    },
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct UserFields {
    #[arg(long)]
    firstname: Option<String>,
    #[arg(long)]
    lastname: Option<String>,
    #[arg(long)]
    gender: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    address_line1: Option<String>,
    #[arg(long)]
    address_line2: Option<String>,
    #[arg(long)]
    pin: Option<String>,
    #[arg(long)]
    district: Option<String>,
    #[arg(long)]
    state: Option<String>,
}

impl UserFields {
    fn into_pairs(self) -> Vec<(&'static str, String)> {
        [
            ("firstname", self.firstname),
            ("lastname", self.lastname),
            ("gender", self.gender),
            ("phone", self.phone),
            ("address_line1", self.address_line1),
            ("address_line2", self.address_line2),
            ("pin", self.pin),
            ("district", self.district),
            ("state", self.state),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .collect()
    }
}

#[derive(Subcommand, Debug)]
enum EmployeeCommand {
    List {
        #[command(flatten)]
        list: ListArgs,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        profile: Option<String>,
    },
    Show {
        id: i64,
    },
    Add {
        #[command(flatten)]
        fields: EmployeeFields,
        /// Candidate name carried over from the user form.
        #[arg(long)]
        handoff: Option<String>,
    },
    Edit {
        id: i64,
        #[command(flatten)]
        fields: EmployeeFields,
    },
    Delete {
        id: i64,
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug)]
struct EmployeeFields {
    #[arg(long)]
    employee_name: Option<String>,
    #[arg(long)]
    employee_id: Option<String>,
    #[arg(long)]
    department: Option<String>,
    #[arg(long)]
    profile: Option<String>,
}

impl EmployeeFields {
    fn into_pairs(self) -> Vec<(&'static str, String)> {
        [
            ("employee_name", self.employee_name),
            ("employee_id", self.employee_id),
            ("department", self.department),
            ("profile", self.profile),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|value| (name, value)))
        .collect()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings()?;
    if let Some(api_url) = cli.api_url {
        settings.api_base_url = api_url;
    }
    debug!(api = %settings.api_base_url, page_size = settings.page_size, "settings loaded");
    let directory = Directory::http(&settings).context("failed to set up directory client")?;
    let mut events = directory.subscribe();

    let result = match cli.command {
        Command::Users(command) => run_users(&directory, command).await,
        Command::Employees(command) => run_employees(&directory, command).await,
    };
    render::drain_notices(&mut events);
    result
}

async fn run_users(directory: &Directory, command: UserCommand) -> Result<()> {
    let users: &EntityWorkspace<User> = directory.users();
    match command {
        UserCommand::List {
            list,
            gender,
            district,
        } => {
            let mut filters = list.filters();
            filters.extend(gender.map(|gender| ("gender", gender)));
            filters.extend(district.map(|district| ("district", district)));
            show_page(users, &list, filters, render::user_row).await
        }
        UserCommand::Show { id } => {
            let user = users.fetch_record(UserId(id)).await?;
            println!("{}", render::user_detail(&user));
            Ok(())
        }
        UserCommand::Add(fields) => {
            directory.open_users().await?;
            let saved = fill_and_submit(users, fields.into_pairs()).await?;
            println!("{}", render::user_row(&saved));
            Ok(())
        }
        UserCommand::Edit { id, fields } => {
            directory.open_users().await?;
            let record = users.fetch_record(UserId(id)).await?;
            users.edit_record(&record).await;
            let saved = fill_and_submit(users, fields.into_pairs()).await?;
            println!("{}", render::user_row(&saved));
            Ok(())
        }
        UserCommand::Delete { id, yes } => confirm_and_delete(users, UserId(id), yes).await,
    }
}

async fn run_employees(directory: &Directory, command: EmployeeCommand) -> Result<()> {
    let employees: &EntityWorkspace<Employee> = directory.employees();
    match command {
        EmployeeCommand::List {
            list,
            department,
            profile,
        } => {
            let mut filters = list.filters();
            filters.extend(department.map(|department| ("department", department)));
            filters.extend(profile.map(|profile| ("profile", profile)));
            show_page(employees, &list, filters, render::employee_row).await
        }
        EmployeeCommand::Show { id } => {
            let employee = employees.fetch_record(EmployeeRecordId(id)).await?;
            println!("{}", render::employee_detail(&employee));
            Ok(())
        }
        EmployeeCommand::Add { fields, handoff } => {
            directory.open_employees(handoff.map(Handoff::new)).await?;
            let saved = fill_and_submit(employees, fields.into_pairs()).await?;
            println!("{}", render::employee_row(&saved));
            Ok(())
        }
        EmployeeCommand::Edit { id, fields } => {
            directory.open_employees(None).await?;
            let record = employees.fetch_record(EmployeeRecordId(id)).await?;
            employees.edit_record(&record).await;
            let saved = fill_and_submit(employees, fields.into_pairs()).await?;
            println!("{}", render::employee_row(&saved));
            Ok(())
        }
        EmployeeCommand::Delete { id, yes } => {
            confirm_and_delete(employees, EmployeeRecordId(id), yes).await
        }
    }
}

async fn show_page<E: FormSchema>(
    workspace: &EntityWorkspace<E>,
    list: &ListArgs,
    filters: Vec<(&'static str, String)>,
    row: fn(&E) -> String,
) -> Result<()> {
    let filters: Vec<(&str, &str)> = filters
        .iter()
        .map(|(key, value)| (*key, value.as_str()))
        .collect();
    let outcome = workspace
        .set_view(list.page_size, &filters, list.page)
        .await?;
    if outcome == FetchOutcome::Unchanged {
        workspace.refresh().await?;
    }

    let snapshot = workspace.store().snapshot().await;
    for record in &snapshot.records {
        println!("{}", row(record));
    }
    println!("{}", render::pager_line(&workspace.pager().await));
    Ok(())
}

async fn fill_and_submit<E: FormSchema>(
    workspace: &EntityWorkspace<E>,
    fields: Vec<(&'static str, String)>,
) -> Result<E> {
    for (name, value) in fields {
        workspace.set_field_by_name(name, value).await?;
    }
    match workspace.submit().await {
        Ok(saved) => Ok(saved),
        Err(ClientError::Validation(errors)) => {
            eprintln!("{} form has errors:", E::KIND);
            render::print_field_errors(&errors);
            bail!("{} not saved", E::KIND)
        }
        Err(err) => Err(err.into()),
    }
}

async fn confirm_and_delete<E: FormSchema>(
    workspace: &EntityWorkspace<E>,
    id: E::Id,
    yes: bool,
) -> Result<()> {
    workspace.request_delete(id).await;
    if !yes {
        workspace.cancel_delete().await;
        bail!("refusing to delete {} {id} without --yes", E::KIND);
    }
    workspace.confirm_delete().await?;
    Ok(())
}
