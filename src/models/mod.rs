pub mod elevator;
pub mod event;
pub mod location;
pub mod technician;
pub mod ticket;
