pub mod http_ticket_api;
