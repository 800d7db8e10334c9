pub mod clue_matcher;
pub mod config;
pub mod daily_tracker;
pub mod game_events;
pub mod hint_rules;
pub mod hint_visibility;
pub mod input_tracker;
pub mod puzzle_feed;
pub mod round;
pub mod scheduler;
pub mod starting_letters;
pub mod win_condition;
pub mod word_validation;

// Re-export main components
pub use clue_matcher::*;
pub use config::*;
pub use daily_tracker::*;
pub use game_events::*;
pub use hint_rules::*;
pub use hint_visibility::*;
pub use input_tracker::*;
pub use puzzle_feed::*;
pub use round::*;
pub use scheduler::*;
pub use starting_letters::*;
pub use win_condition::*;
pub use word_validation::*;
