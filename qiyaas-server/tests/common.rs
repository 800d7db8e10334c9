#![allow(dead_code)]

use migration::{Migrator, MigratorTrait};
use qiyaas_core::{DailyTracker, WordValidator};
use qiyaas_persistence::{connection::connect_to_memory_database, repositories::PlayedDayRepository};
use qiyaas_server::{PlayedTracker, create_routes, puzzle_schedule::PuzzleSchedule};
use std::sync::Arc;
use warp::Filter;

pub const SCHEDULE_JSON: &str = r#"[
    {"date": "2025-12-07", "clues": [
        {"type": "NOUN", "word": "HONEY", "rule": "alphabet_rule", "number": 8, "length_category": "short", "word_length": 5},
        {"type": "VERB", "word": "ARRIVE", "rule": "length_rule", "number": 6, "length_category": "medium", "word_length": 6},
        {"type": "ADJECTIVE", "word": "SMART", "rule": "number_rule", "number": 6, "length_category": "short", "word_length": 5}
    ]},
    {"date": "2025-12-08", "clues": [
        {"type": "NOUN", "word": "BEE", "rule": "alphabet_rule", "number": 2, "length_category": "short", "word_length": 3},
        {"type": "VERB", "word": "ARRIVE", "rule": "length_rule", "number": 6, "length_category": "medium", "word_length": 6},
        {"type": "ADJECTIVE", "word": "SMART", "rule": "number_rule", "number": 6, "length_category": "short", "word_length": 5}
    ]}
]"#;

pub fn create_test_schedule() -> Arc<PuzzleSchedule> {
    Arc::new(PuzzleSchedule::from_json(SCHEDULE_JSON).expect("schedule should parse"))
}

pub fn create_test_validator() -> Arc<WordValidator> {
    Arc::new(WordValidator::from_word_list("honey\narrive\nsmart\nbee"))
}

pub async fn create_test_tracker() -> Arc<PlayedTracker> {
    let db = connect_to_memory_database().await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    Arc::new(DailyTracker::new(PlayedDayRepository::new(db)))
}

pub async fn create_test_routes()
-> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    create_routes(
        create_test_schedule(),
        create_test_validator(),
        create_test_tracker().await,
    )
}
