// File: services/clinic_cli/src/main.rs
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use clinic_api::{ApiClient, FileSessionStore, SessionContext};
use clinic_booking::{ClinicContext, StatusFilter};
use clinic_common::{
    config_error, logging, AppointmentStatus, ClinicError, HttpStatusCode, SharedBackend,
    SortOrder,
};
use clinic_config::load_config;
use clinic_slots::{CalendarDate, TimeSlot};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, warn};

mod commands;

#[derive(Parser)]
#[command(name = "clinic-cli")]
#[command(about = "Book and manage clinic appointments")]
struct Cli {
    /// Log at debug level regardless of configuration
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// Create a patient account
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Show who is signed in
    Whoami,
    /// List the clinic's services
    Services,
    /// Show bookable start times for a day (YYYY-MM-DD)
    Slots {
        #[arg(long)]
        date: CalendarDate,
    },
    /// Book an appointment for yourself
    Book {
        #[arg(long)]
        service: i64,
        #[arg(long)]
        date: CalendarDate,
        /// Start time, HH:MM
        #[arg(long)]
        time: TimeSlot,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List your appointments
    Mine {
        /// asc or desc
        #[arg(long, default_value = "asc")]
        order: SortOrder,
        /// TODOS, ACTIVAS or a status name
        #[arg(long, default_value = "TODOS")]
        status: StatusFilter,
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// Cancel one of your appointments
    Cancel { id: i64 },
    /// Administrator commands
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand)]
enum AdminCommand {
    /// Search all appointments
    List {
        /// Zero-based page
        #[arg(long, default_value = "0")]
        page: u32,
        #[arg(long, default_value = "10")]
        size: u32,
        #[arg(long)]
        status: Option<AppointmentStatus>,
        /// Free text matched against patient and service
        #[arg(long)]
        q: Option<String>,
        #[arg(long)]
        service: Option<i64>,
        /// Lower bound, YYYY-MM-DDTHH:MM
        #[arg(long, value_parser = parse_bound)]
        from: Option<NaiveDateTime>,
        /// Upper bound, YYYY-MM-DDTHH:MM
        #[arg(long, value_parser = parse_bound)]
        until: Option<NaiveDateTime>,
    },
    /// Book an appointment on behalf of a patient
    Book {
        #[arg(long)]
        patient: i64,
        #[arg(long)]
        service: i64,
        #[arg(long)]
        date: CalendarDate,
        #[arg(long)]
        time: TimeSlot,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Edit an appointment
    Edit {
        id: i64,
        #[arg(long)]
        date: Option<CalendarDate>,
        #[arg(long)]
        time: Option<TimeSlot>,
        #[arg(long)]
        service: Option<i64>,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        status: Option<AppointmentStatus>,
    },
    /// Move an appointment to another status
    Status { id: i64, status: AppointmentStatus },
    /// List registered patients
    Patients,
}

fn parse_bound(raw: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M")
        .map_err(|e| format!("expected YYYY-MM-DDTHH:MM: {}", e))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            logging::log_error(&err, &format!("Command failed ({})", err.status_code()));
            eprintln!("{}", err.user_message());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ClinicError> {
    let config = load_config().map_err(|e| config_error(format!("Failed to load config: {}", e)))?;

    if cli.verbose {
        logging::init_from_str("debug");
    } else {
        logging::init_from_str(&config.logging.level);
    }

    let store = Arc::new(FileSessionStore::new(&config.session.store_path));
    let session = Arc::new(SessionContext::new(store));
    if let Err(err) = session.load() {
        warn!("Could not read the stored session, continuing signed out: {}", err);
    }

    let client = ApiClient::new(&config.api, session.clone())?;
    debug!("Using backend at {}", client.base_url());
    let backend: SharedBackend = Arc::new(client);
    let ctx = ClinicContext::from_config(&config, backend, session)?;

    match cli.command {
        Command::Login { email, password } => commands::login(&ctx, &email, &password).await,
        Command::Logout => commands::logout(&ctx),
        Command::Register {
            first_name,
            last_name,
            email,
            password,
            phone,
        } => {
            commands::register(&ctx, first_name, last_name, email, password, phone).await
        }
        Command::Whoami => commands::whoami(&ctx),
        Command::Services => commands::services(&ctx).await,
        Command::Slots { date } => commands::slots(ctx, date).await,
        Command::Book {
            service,
            date,
            time,
            notes,
        } => commands::book(ctx, service, date, time, notes).await,
        Command::Mine {
            order,
            status,
            page,
        } => commands::mine(ctx, order, status, page).await,
        Command::Cancel { id } => commands::cancel(ctx, id).await,
        Command::Admin(admin) => match admin {
            AdminCommand::List {
                page,
                size,
                status,
                q,
                service,
                from,
                until,
            } => {
                let filters = commands::ListFilters {
                    page,
                    size,
                    status,
                    text: q.unwrap_or_default(),
                    service_id: service,
                    from,
                    until,
                };
                commands::admin_list(ctx, filters).await
            }
            AdminCommand::Book {
                patient,
                service,
                date,
                time,
                notes,
            } => commands::admin_book(ctx, patient, service, date, time, notes).await,
            AdminCommand::Edit {
                id,
                date,
                time,
                service,
                notes,
                status,
            } => {
                let changes = commands::EditChanges {
                    date,
                    time,
                    service_id: service,
                    notes,
                    status,
                };
                commands::admin_edit(ctx, id, changes).await
            }
            AdminCommand::Status { id, status } => commands::admin_status(ctx, id, status).await,
            AdminCommand::Patients => commands::admin_patients(&ctx).await,
        },
    }
}
