pub mod clock_entry;
pub mod project;
pub mod query_ticket;
pub mod user;
pub mod worker;
