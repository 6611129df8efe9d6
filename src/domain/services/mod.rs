pub mod dates;
pub mod format;
pub mod naming;
pub mod report_service;
pub mod tabulate;
