use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{
    CompanyRepository, CompanyUserRepository, EmailService, Notifier,
    RequestRepository, ScheduleRepository, SystemConfigRepository, TicketApi,
};
use crate::domain::services::report_service::ReportService;
use crate::scheduler::ScheduleEngine;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub company_repo: Arc<dyn CompanyRepository>,
    pub user_repo: Arc<dyn CompanyUserRepository>,
    pub schedule_repo: Arc<dyn ScheduleRepository>,
    pub request_repo: Arc<dyn RequestRepository>,
    pub config_repo: Arc<dyn SystemConfigRepository>,
    pub ticket_api: Arc<dyn TicketApi>,
    pub email_service: Arc<dyn EmailService>,
    pub notifier: Arc<dyn Notifier>,
    pub report_service: Arc<ReportService>,
    pub schedule_engine: Arc<ScheduleEngine>,
    pub templates: Arc<Tera>,
}
