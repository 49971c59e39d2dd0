//! Test fixtures for the booking workflows
//!
//! An in-memory backend that records every call, plus helpers to build a
//! workflow context at a fixed instant.

#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use clinic_api::{Role, Session, SessionContext};
use clinic_booking::ClinicContext;
use clinic_common::{
    AdminAppointment, AdminAppointmentService, AdminAppointmentUpdate, AdminNewAppointment,
    AdminSearchQuery, Appointment, AppointmentService, AppointmentStatus, AuthService, BoxFuture,
    CatalogService, ClinicError, ClinicService, FixedClock, LoginRequest, LoginResponse,
    NewAppointment, Page, Patient, RegisterRequest, SharedBackend, SortOrder,
};
use clinic_slots::SlotPolicy;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
pub struct FakeBackend {
    pub services: Mutex<Vec<ClinicService>>,
    pub patients: Mutex<Vec<Patient>>,
    pub my_appointments: Mutex<Vec<Appointment>>,
    pub admin_rows: Mutex<Vec<AdminAppointment>>,
    pub login_role: Mutex<Option<String>>,
    pub login_rejection: Mutex<Option<String>>,
    pub fail_searches: AtomicBool,
    pub unreachable: AtomicBool,

    pub created: Mutex<Vec<NewAppointment>>,
    pub admin_created: Mutex<Vec<AdminNewAppointment>>,
    pub registered: Mutex<Vec<RegisterRequest>>,
    pub cancelled: Mutex<Vec<i64>>,
    pub status_changes: Mutex<Vec<(i64, AppointmentStatus)>>,
    pub updates: Mutex<Vec<(i64, AdminAppointmentUpdate)>>,
    pub searches: Mutex<Vec<AdminSearchQuery>>,
    pub orders: Mutex<Vec<SortOrder>>,
}

impl FakeBackend {
    fn check_reachable(&self) -> Result<(), ClinicError> {
        if self.unreachable.load(Ordering::SeqCst) {
            Err(ClinicError::HttpError("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

impl AuthService for FakeBackend {
    fn login(&self, request: LoginRequest) -> BoxFuture<'_, LoginResponse, ClinicError> {
        Box::pin(async move {
            self.check_reachable()?;
            if let Some(message) = self.login_rejection.lock().unwrap().clone() {
                return Err(ClinicError::ApiError {
                    status: 400,
                    message,
                });
            }
            let role = self
                .login_role
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| "PACIENTE".to_string());
            Ok(LoginResponse {
                token: format!("token-for-{}", request.email),
                email: request.email,
                role,
            })
        })
    }

    fn register(&self, request: RegisterRequest) -> BoxFuture<'_, (), ClinicError> {
        Box::pin(async move {
            self.check_reachable()?;
            self.registered.lock().unwrap().push(request);
            Ok(())
        })
    }
}

impl CatalogService for FakeBackend {
    fn list_services(&self) -> BoxFuture<'_, Vec<ClinicService>, ClinicError> {
        Box::pin(async move {
            self.check_reachable()?;
            Ok(self.services.lock().unwrap().clone())
        })
    }

    fn list_patients(&self) -> BoxFuture<'_, Vec<Patient>, ClinicError> {
        Box::pin(async move {
            self.check_reachable()?;
            Ok(self.patients.lock().unwrap().clone())
        })
    }
}

impl AppointmentService for FakeBackend {
    fn create_appointment(
        &self,
        request: NewAppointment,
    ) -> BoxFuture<'_, Appointment, ClinicError> {
        Box::pin(async move {
            self.check_reachable()?;
            let created = Appointment {
                id: 100 + self.created.lock().unwrap().len() as i64,
                scheduled_at: request.scheduled_at.clone(),
                status: AppointmentStatus::Pending,
                notes: Some(request.notes.clone()),
                service: None,
            };
            self.created.lock().unwrap().push(request);
            Ok(created)
        })
    }

    fn my_appointments(&self, order: SortOrder) -> BoxFuture<'_, Vec<Appointment>, ClinicError> {
        Box::pin(async move {
            self.check_reachable()?;
            self.orders.lock().unwrap().push(order);
            let mut list = self.my_appointments.lock().unwrap().clone();
            list.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at));
            if order == SortOrder::Desc {
                list.reverse();
            }
            Ok(list)
        })
    }

    fn cancel_appointment(&self, appointment_id: i64) -> BoxFuture<'_, (), ClinicError> {
        Box::pin(async move {
            self.check_reachable()?;
            self.cancelled.lock().unwrap().push(appointment_id);
            for appointment in self.my_appointments.lock().unwrap().iter_mut() {
                if appointment.id == appointment_id {
                    appointment.status = AppointmentStatus::Cancelled;
                }
            }
            Ok(())
        })
    }
}

impl AdminAppointmentService for FakeBackend {
    fn search_appointments(
        &self,
        query: AdminSearchQuery,
    ) -> BoxFuture<'_, Page<AdminAppointment>, ClinicError> {
        Box::pin(async move {
            self.check_reachable()?;
            self.searches.lock().unwrap().push(query.clone());
            if self.fail_searches.load(Ordering::SeqCst) {
                return Err(ClinicError::ApiError {
                    status: 500,
                    message: "Error al cargar".to_string(),
                });
            }

            let day = query.from.as_ref().map(|from| from[..10].to_string());
            let matching: Vec<AdminAppointment> = self
                .admin_rows
                .lock()
                .unwrap()
                .iter()
                .filter(|row| day.as_ref().map_or(true, |d| row.scheduled_at.starts_with(d)))
                .filter(|row| query.status.map_or(true, |s| row.status == s))
                .cloned()
                .collect();

            let size = query.size.max(1) as usize;
            let total_pages = matching.len().div_ceil(size) as u32;
            let content = matching
                .iter()
                .skip(query.page as usize * size)
                .take(size)
                .cloned()
                .collect();
            Ok(Page {
                content,
                total_pages,
                total_elements: matching.len() as u64,
                number: query.page,
                size: query.size,
            })
        })
    }

    fn change_status(
        &self,
        appointment_id: i64,
        status: AppointmentStatus,
    ) -> BoxFuture<'_, (), ClinicError> {
        Box::pin(async move {
            self.check_reachable()?;
            self.status_changes
                .lock()
                .unwrap()
                .push((appointment_id, status));
            Ok(())
        })
    }

    fn update_appointment(
        &self,
        appointment_id: i64,
        update: AdminAppointmentUpdate,
    ) -> BoxFuture<'_, AdminAppointment, ClinicError> {
        Box::pin(async move {
            self.check_reachable()?;
            let mut rows = self.admin_rows.lock().unwrap();
            let row = rows
                .iter_mut()
                .find(|row| row.id == appointment_id)
                .ok_or_else(|| ClinicError::ApiError {
                    status: 404,
                    message: "Cita no encontrada".to_string(),
                })?;
            if let Some(at) = &update.scheduled_at {
                row.scheduled_at = at.clone();
            }
            row.status = update.status;
            row.notes = Some(update.notes.clone());
            let saved = row.clone();
            drop(rows);
            self.updates.lock().unwrap().push((appointment_id, update));
            Ok(saved)
        })
    }

    fn book_for_patient(
        &self,
        request: AdminNewAppointment,
    ) -> BoxFuture<'_, AdminAppointment, ClinicError> {
        Box::pin(async move {
            self.check_reachable()?;
            let row = AdminAppointment {
                id: 500 + self.admin_created.lock().unwrap().len() as i64,
                scheduled_at: request.scheduled_at.clone(),
                status: AppointmentStatus::Pending,
                notes: Some(request.notes.clone()),
                patient_name: format!("Paciente {}", request.patient_id),
                service_name: format!("Servicio {}", request.service_id),
            };
            self.admin_rows.lock().unwrap().push(row.clone());
            self.admin_created.lock().unwrap().push(request);
            Ok(row)
        })
    }
}

/// Monday 2025-05-05 at the given time.
pub fn monday_at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 5, 5)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

pub fn session_for(role: Role) -> Session {
    Session {
        token: "test-token".to_string(),
        email: "user@clinic.test".to_string(),
        role,
    }
}

/// A context at `now`, signed in with `role` when given.
pub fn create_context(
    backend: Arc<FakeBackend>,
    role: Option<Role>,
    now: NaiveDateTime,
) -> ClinicContext {
    let session = Arc::new(SessionContext::in_memory());
    session.load().unwrap();
    if let Some(role) = role {
        session.establish(session_for(role)).unwrap();
    }
    let shared: SharedBackend = backend;
    ClinicContext::new(
        shared,
        session,
        Arc::new(FixedClock(now)),
        SlotPolicy::default(),
        3,
    )
}

pub fn create_service(id: i64, name: &str) -> ClinicService {
    ClinicService {
        id,
        name: name.to_string(),
        cost: 30.0,
        duration_minutes: 30,
    }
}

pub fn create_patient(id: i64, first_name: &str) -> Patient {
    Patient {
        id,
        first_name: first_name.to_string(),
        last_name: "Ruiz".to_string(),
        email: format!("{}@clinic.test", first_name.to_lowercase()),
    }
}

pub fn create_appointment(id: i64, at: &str, status: AppointmentStatus) -> Appointment {
    Appointment {
        id,
        scheduled_at: at.to_string(),
        status,
        notes: None,
        service: Some(create_service(1, "Consulta")),
    }
}

pub fn create_admin_row(id: i64, at: &str, status: AppointmentStatus) -> AdminAppointment {
    AdminAppointment {
        id,
        scheduled_at: at.to_string(),
        status,
        notes: None,
        patient_name: "Ana Ruiz".to_string(),
        service_name: "Consulta".to_string(),
    }
}
