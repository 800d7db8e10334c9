pub mod played_day_repository;

pub use played_day_repository::PlayedDayRepository;
