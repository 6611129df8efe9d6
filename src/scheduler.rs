use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Datelike, Duration as ChronoDuration, NaiveDate, Utc};
use cron::Schedule;
use tokio::time::{interval, Duration};
use tracing::{debug, error, info, warn};

use crate::domain::models::request::ReportRequest;
use crate::domain::models::schedule::{ReportSchedule, ReportType};
use crate::domain::ports::{
    CompanyRepository, CompanyUserRepository, RequestRepository, ScheduleRepository,
};
use crate::domain::services::report_service::ReportService;
use crate::error::AppError;

struct CronTrigger {
    schedule_id: String,
    schedule: Schedule,
    next_fire: DateTime<Utc>,
}

/// Owns the registry of cron triggers for active report schedules and
/// fires the report pipeline when they come due. All trigger mutation goes
/// through this object; there is no ambient scheduler state.
pub struct ScheduleEngine {
    schedule_repo: Arc<dyn ScheduleRepository>,
    company_repo: Arc<dyn CompanyRepository>,
    user_repo: Arc<dyn CompanyUserRepository>,
    request_repo: Arc<dyn RequestRepository>,
    report_service: Arc<ReportService>,
    tick_secs: u64,
    triggers: Mutex<HashMap<String, CronTrigger>>,
}

/// Validates a 5-field cron expression (minute hour day month day_of_week)
/// and turns it into a schedule. The cron crate wants a seconds field, so
/// one is prepended.
pub fn parse_cron(expr: &str) -> Result<Schedule, AppError> {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    if fields.len() != 5 {
        return Err(AppError::InvalidCron(expr.to_string()));
    }
    Schedule::from_str(&format!("0 {}", fields.join(" ")))
        .map_err(|_| AppError::InvalidCron(expr.to_string()))
}

impl ScheduleEngine {
    pub fn new(
        schedule_repo: Arc<dyn ScheduleRepository>,
        company_repo: Arc<dyn CompanyRepository>,
        user_repo: Arc<dyn CompanyUserRepository>,
        request_repo: Arc<dyn RequestRepository>,
        report_service: Arc<ReportService>,
        tick_secs: u64,
    ) -> Self {
        Self {
            schedule_repo,
            company_repo,
            user_repo,
            request_repo,
            report_service,
            tick_secs,
            triggers: Mutex::new(HashMap::new()),
        }
    }

    fn trigger_key(schedule_id: &str) -> String {
        format!("schedule_{}", schedule_id)
    }

    /// Loads every active schedule and (re)registers its trigger. A
    /// schedule with a malformed cron expression is logged and skipped,
    /// never aborting the rest.
    pub async fn load_all(&self) -> Result<usize, AppError> {
        let schedules = self.schedule_repo.list_active().await?;
        let mut registered = 0;

        for schedule in &schedules {
            match self.register(schedule) {
                Ok(true) => registered += 1,
                Ok(false) => {}
                Err(e) => {
                    error!(schedule_id = %schedule.id, error = %e, "Failed to load schedule");
                }
            }
        }

        info!(registered, total = schedules.len(), "Loaded schedule triggers");
        Ok(registered)
    }

    /// Registers or replaces the trigger for an active schedule with a
    /// cron expression; removes any existing trigger otherwise.
    pub fn upsert(&self, schedule: &ReportSchedule) {
        if schedule.is_active && schedule.cron_expression.is_some() {
            if let Err(e) = self.register(schedule) {
                error!(schedule_id = %schedule.id, error = %e, "Failed to register schedule trigger");
            }
        } else {
            self.remove(&schedule.id);
        }
    }

    pub fn remove(&self, schedule_id: &str) {
        let mut triggers = self.triggers.lock().unwrap_or_else(|p| p.into_inner());
        triggers.remove(&Self::trigger_key(schedule_id));
    }

    pub fn has_trigger(&self, schedule_id: &str) -> bool {
        let triggers = self.triggers.lock().unwrap_or_else(|p| p.into_inner());
        triggers.contains_key(&Self::trigger_key(schedule_id))
    }

    fn register(&self, schedule: &ReportSchedule) -> Result<bool, AppError> {
        let Some(expr) = schedule.cron_expression.as_deref() else {
            return Ok(false);
        };
        let cron_schedule = parse_cron(expr)?;

        let Some(next_fire) = cron_schedule.upcoming(Utc).next() else {
            warn!(schedule_id = %schedule.id, "Cron expression yields no upcoming fire time");
            return Ok(false);
        };

        debug!(schedule_id = %schedule.id, cron = expr, next = %next_fire, "Registered schedule trigger");
        let mut triggers = self.triggers.lock().unwrap_or_else(|p| p.into_inner());
        triggers.insert(
            Self::trigger_key(&schedule.id),
            CronTrigger {
                schedule_id: schedule.id.clone(),
                schedule: cron_schedule,
                next_fire,
            },
        );
        Ok(true)
    }

    /// Timer loop: each tick collects due triggers, advances their next
    /// fire time, and runs every fire as its own task so slow reports
    /// cannot delay each other.
    pub async fn run(self: Arc<Self>) {
        info!(tick_secs = self.tick_secs, "Schedule engine started");

        let mut tick = interval(Duration::from_secs(self.tick_secs));
        loop {
            tick.tick().await;
            for schedule_id in self.collect_due(Utc::now()) {
                let engine = self.clone();
                tokio::spawn(async move {
                    if let Err(e) = engine.fire(&schedule_id).await {
                        error!(schedule_id = %schedule_id, error = %e, "Scheduled report failed to start");
                    }
                });
            }
        }
    }

    fn collect_due(&self, now: DateTime<Utc>) -> Vec<String> {
        let mut triggers = self.triggers.lock().unwrap_or_else(|p| p.into_inner());
        let mut due = Vec::new();

        for trigger in triggers.values_mut() {
            if trigger.next_fire <= now {
                due.push(trigger.schedule_id.clone());
                trigger.next_fire = trigger
                    .schedule
                    .after(&now)
                    .next()
                    .unwrap_or(DateTime::<Utc>::MAX_UTC);
            }
        }

        due
    }

    /// Fires one schedule: resolves the date range for its report type,
    /// picks the recipients, creates the request record, and hands it to
    /// the orchestrator. A missing or inactive schedule is a silent no-op
    /// (it may have been deleted between the tick and this call).
    pub async fn fire(&self, schedule_id: &str) -> Result<(), AppError> {
        let Some(schedule) = self.schedule_repo.find_by_id(schedule_id).await? else {
            debug!(schedule_id, "Fired schedule no longer exists");
            return Ok(());
        };
        if !schedule.is_active {
            debug!(schedule_id, "Fired schedule is inactive");
            return Ok(());
        }

        let Some(company) = self.company_repo.find_by_id(&schedule.company_id).await? else {
            warn!(schedule_id, company_id = %schedule.company_id, "Schedule points at a missing company");
            return Ok(());
        };

        let today = Utc::now().date_naive();
        let (date_start, date_end) = compute_range(
            schedule.report_type,
            schedule.date_start.as_deref(),
            schedule.date_end.as_deref(),
            today,
        );

        let recipients = match schedule.recipients.as_deref().filter(|r| !r.trim().is_empty()) {
            Some(stored) => Some(stored.to_string()),
            None => {
                let users = self.user_repo.list_report_recipients(&schedule.company_id).await?;
                let emails: Vec<String> = users.into_iter().map(|u| u.email).collect();
                if emails.is_empty() { None } else { Some(emails.join(",")) }
            }
        };

        let request = ReportRequest::new(
            schedule.company_id.clone(),
            date_start.clone(),
            Some(date_end.clone()),
            recipients.clone(),
            "scheduled",
        );
        let request = self.request_repo.create(&request).await?;

        self.schedule_repo.record_run(&schedule.id).await?;

        info!(
            schedule_id,
            request_id = %request.id,
            company = %company.name,
            date_start,
            date_end,
            "Running scheduled report"
        );

        self.report_service
            .run(&request.id, &company, &date_start, Some(&date_end), recipients.as_deref())
            .await;

        Ok(())
    }
}

/// Resolves the concrete reporting window for a report type at fire time.
/// The end bound carries a 23:59:59 suffix so the final day is fully
/// covered once it goes through end-of-day parsing.
pub fn compute_range(
    report_type: ReportType,
    date_start: Option<&str>,
    date_end: Option<&str>,
    today: NaiveDate,
) -> (String, String) {
    let (start, end) = match report_type {
        ReportType::Monthly => {
            let month_end = today.with_day(1).unwrap_or(today) - ChronoDuration::days(1);
            (month_end.with_day(1).unwrap_or(month_end), month_end)
        }
        ReportType::Weekly => {
            // The most recently completed Monday-to-Sunday week.
            let end = today - ChronoDuration::days(today.weekday().num_days_from_monday() as i64 + 1);
            (end - ChronoDuration::days(6), end)
        }
        ReportType::Daily => {
            let yesterday = today - ChronoDuration::days(1);
            (yesterday, yesterday)
        }
        ReportType::Custom => {
            let start = date_start
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                .unwrap_or(today - ChronoDuration::days(30));
            let end = date_end
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                .unwrap_or(today);
            (start, end)
        }
    };

    (
        start.format("%Y-%m-%d").to_string(),
        format!("{} 23:59:59", end.format("%Y-%m-%d")),
    )
}
