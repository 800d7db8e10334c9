pub use super::played_days::Entity as PlayedDays;
