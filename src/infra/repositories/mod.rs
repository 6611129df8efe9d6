pub mod sqlite_company_repo;
pub mod sqlite_config_repo;
pub mod sqlite_request_repo;
pub mod sqlite_schedule_repo;
pub mod sqlite_user_repo;
