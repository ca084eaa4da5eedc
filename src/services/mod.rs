pub mod lookup;
pub mod projects;
pub mod queries;
pub mod time_clock;
pub mod users;
pub mod workers;
