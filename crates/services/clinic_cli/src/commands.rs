// File: services/clinic_cli/src/commands.rs
//! One handler per subcommand. Each opens the matching workflow, drives it
//! and prints the outcome to stdout.

use chrono::{NaiveDateTime, Timelike};
use clinic_booking::{
    auth, guard, AdminBookingForm, AdminEdit, AdminPanel, BookingForm, ClinicContext,
    GuardDecision, MyAppointments, Route, RouteAccess, StatusFilter,
};
use clinic_common::{
    validation_error, AppointmentStatus, CatalogService, ClinicError, Patient, RegisterRequest,
    SortOrder,
};
use clinic_slots::{CalendarDate, TimeSlot};
use tracing::info;

pub struct ListFilters {
    pub page: u32,
    pub size: u32,
    pub status: Option<AppointmentStatus>,
    pub text: String,
    pub service_id: Option<i64>,
    pub from: Option<NaiveDateTime>,
    pub until: Option<NaiveDateTime>,
}

pub struct EditChanges {
    pub date: Option<CalendarDate>,
    pub time: Option<TimeSlot>,
    pub service_id: Option<i64>,
    pub notes: Option<String>,
    pub status: Option<AppointmentStatus>,
}

pub async fn login(ctx: &ClinicContext, email: &str, password: &str) -> Result<(), ClinicError> {
    let session = auth::login(ctx, email, password).await?;
    println!("Signed in as {} ({})", session.email, session.role);
    Ok(())
}

pub fn logout(ctx: &ClinicContext) -> Result<(), ClinicError> {
    auth::logout(ctx)?;
    println!("Signed out");
    Ok(())
}

pub async fn register(
    ctx: &ClinicContext,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    phone: Option<String>,
) -> Result<(), ClinicError> {
    let request = RegisterRequest {
        first_name,
        last_name,
        email,
        password,
        phone,
    };
    auth::register(ctx, request).await?;
    println!("Account created. Sign in with `clinic-cli login`.");
    Ok(())
}

/// Prints the signed-in user and the pages their role may open.
pub fn whoami(ctx: &ClinicContext) -> Result<(), ClinicError> {
    let Some(session) = ctx.session.current() else {
        println!("Not signed in");
        return Ok(());
    };
    let capabilities = session.capabilities();
    println!("{} ({})", session.email, session.role);
    println!(
        "book for self: {}, administer: {}",
        capabilities.can_book_for_self, capabilities.can_administer
    );

    let state = ctx.session.state();
    let open: Vec<&str> = Route::ALL
        .iter()
        .filter(|route| route.access() != RouteAccess::Public)
        .filter(|route| guard(&state, &route.access()) == GuardDecision::Allow)
        .map(|route| route.path())
        .collect();
    println!("pages: {}", open.join(", "));
    Ok(())
}

pub async fn services(ctx: &ClinicContext) -> Result<(), ClinicError> {
    ctx.require(Route::Book)?;
    let services = ctx.backend.list_services().await?;
    for service in services {
        println!(
            "{:>4}  {:<30} {:>8.2}  {} min",
            service.id, service.name, service.cost, service.duration_minutes
        );
    }
    Ok(())
}

/// Administrators see the whole day with occupancy; patients see what they
/// can still book.
pub async fn slots(ctx: ClinicContext, date: CalendarDate) -> Result<(), ClinicError> {
    let session = ctx.require(Route::Book)?;
    if session.capabilities().can_administer {
        let mut form = AdminBookingForm::open(ctx)?;
        form.set_date(date).await;
        let options = form.slot_options();
        if options.is_empty() {
            println!("No slots left on {}", date);
        }
        for option in options {
            println!("{}", option.display_label());
        }
        return Ok(());
    }

    let mut form = BookingForm::open(ctx)?;
    form.set_date(date)?;
    if let Some(warning) = form.warning() {
        println!("{}", warning);
    }
    let slots = form.available_slots();
    if slots.is_empty() {
        println!("No slots left on {}", date);
    }
    for slot in slots {
        println!("{}", slot);
    }
    Ok(())
}

pub async fn book(
    ctx: ClinicContext,
    service_id: i64,
    date: CalendarDate,
    time: TimeSlot,
    notes: String,
) -> Result<(), ClinicError> {
    let mut form = BookingForm::open(ctx)?;
    form.select_service(service_id);
    form.set_date(date)?;
    form.set_time(time);
    form.set_notes(notes);
    let created = form.submit().await?;
    println!(
        "Booked appointment {} at {} ({})",
        created.id, created.scheduled_at, created.status
    );
    Ok(())
}

pub async fn mine(
    ctx: ClinicContext,
    order: SortOrder,
    filter: StatusFilter,
    page: u32,
) -> Result<(), ClinicError> {
    let mut view = MyAppointments::open(ctx)?;
    view.set_order(order).await;
    view.state().loaded()?;
    view.set_filter(filter);
    if page != 1 && !view.go_to(page) {
        return Err(validation_error(format!(
            "Página fuera de rango: {} de {}",
            page,
            view.total_pages()
        )));
    }

    let items = view.page_items();
    if items.is_empty() {
        println!("No appointments");
    }
    for appointment in items {
        let service = appointment
            .service
            .as_ref()
            .map(|service| service.name.as_str())
            .unwrap_or("-");
        println!(
            "{:>5}  {}  {:<11} {}",
            appointment.id,
            when(appointment.schedule(), &appointment.scheduled_at),
            appointment.status,
            service
        );
    }
    println!(
        "Page {} of {} {:?}",
        view.page(),
        view.total_pages(),
        view.page_numbers()
    );
    Ok(())
}

pub async fn cancel(ctx: ClinicContext, appointment_id: i64) -> Result<(), ClinicError> {
    let mut view = MyAppointments::open(ctx)?;
    view.reload().await;
    view.state().loaded()?;
    view.cancel(appointment_id).await?;
    println!("Cancelled appointment {}", appointment_id);
    Ok(())
}

pub async fn admin_list(ctx: ClinicContext, filters: ListFilters) -> Result<(), ClinicError> {
    let mut panel = AdminPanel::open(ctx)?;
    panel.set_page_size(filters.size)?;
    panel.set_status(filters.status);
    panel.set_text(filters.text);
    panel.set_service(filters.service_id);
    panel.set_range(filters.from, filters.until);
    panel.reload().await;
    if filters.page > 0 {
        if !panel.go_to(filters.page) {
            return Err(validation_error(format!(
                "Página fuera de rango: {} de {}",
                filters.page,
                panel.total_pages()
            )));
        }
        panel.reload().await;
    }

    if let Some(service_id) = panel.filters().service_id {
        panel.reload_services().await;
        let name = panel
            .services()
            .value()
            .and_then(|services| services.iter().find(|s| s.id == service_id))
            .map(|service| service.name.clone())
            .unwrap_or_else(|| format!("#{}", service_id));
        println!("Service: {}", name);
    }

    let page = panel.results().loaded()?;
    for row in &page.content {
        println!(
            "{:>5}  {}  {:<11} {:<25} {}",
            row.id,
            when(row.schedule(), &row.scheduled_at),
            row.status,
            row.patient_name,
            row.service_name
        );
    }
    println!(
        "Page {} of {} ({} appointments) {:?}",
        panel.page(),
        panel.total_pages(),
        page.total_elements,
        panel.page_numbers()
    );
    Ok(())
}

pub async fn admin_book(
    ctx: ClinicContext,
    patient_id: i64,
    service_id: i64,
    date: CalendarDate,
    time: TimeSlot,
    notes: String,
) -> Result<(), ClinicError> {
    let mut form = AdminBookingForm::open(ctx)?;
    form.set_date(date).await;
    form.select_patient(patient_id);
    form.select_service(service_id);
    form.set_time(time);
    form.set_notes(notes);
    let created = form.submit().await?;
    println!(
        "Booked appointment {} for {} at {}",
        created.id, created.patient_name, created.scheduled_at
    );
    Ok(())
}

pub async fn admin_edit(
    ctx: ClinicContext,
    appointment_id: i64,
    changes: EditChanges,
) -> Result<(), ClinicError> {
    let mut edit = AdminEdit::open(ctx, appointment_id)?;
    edit.reload().await;
    edit.appointment().loaded()?;

    let form = edit
        .form_mut()
        .ok_or_else(|| validation_error("Cita no encontrada"))?;
    if changes.date.is_some() || changes.time.is_some() {
        let current = form.scheduled_at;
        let date = changes
            .date
            .or_else(|| current.map(|at| CalendarDate::new(at.date())));
        let time = changes
            .time
            .or_else(|| current.and_then(|at| TimeSlot::new(at.hour(), at.minute())));
        match (date, time) {
            (Some(date), Some(time)) => form.scheduled_at = Some(date.at(time)),
            _ => return Err(validation_error("Indica la fecha y la hora")),
        }
    }
    if let Some(service_id) = changes.service_id {
        form.service_id = Some(service_id);
    }
    if let Some(notes) = changes.notes {
        form.notes = notes;
    }
    if let Some(status) = changes.status {
        form.status = status;
    }

    let saved = edit.save().await?;
    println!(
        "Updated appointment {}: {} ({})",
        saved.id, saved.scheduled_at, saved.status
    );
    Ok(())
}

pub async fn admin_status(
    ctx: ClinicContext,
    appointment_id: i64,
    status: AppointmentStatus,
) -> Result<(), ClinicError> {
    let mut panel = AdminPanel::open(ctx)?;
    panel.change_status(appointment_id, status).await?;
    info!("Status change for {} confirmed", appointment_id);
    println!("Appointment {} is now {}", appointment_id, status);
    Ok(())
}

pub async fn admin_patients(ctx: &ClinicContext) -> Result<(), ClinicError> {
    ctx.require(Route::AdminBook)?;
    let patients = ctx.backend.list_patients().await?;
    for patient in &patients {
        println!("{}", patient_row(patient));
    }
    Ok(())
}

fn patient_row(patient: &Patient) -> String {
    format!("{:>5}  {}", patient.id, patient.display_name())
}

fn when(schedule: Option<(CalendarDate, TimeSlot)>, raw: &str) -> String {
    match schedule {
        Some((date, time)) => format!("{} {}", date, time),
        None => raw.to_string(),
    }
}
