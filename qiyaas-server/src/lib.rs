use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::Filter;
use warp::http::StatusCode;

use crate::puzzle_schedule::PuzzleSchedule;
use qiyaas_core::{DailyTracker, WordCheck, WordValidator, normalize_word, puzzle_number, today_key};
use qiyaas_persistence::repositories::PlayedDayRepository;
use qiyaas_types::Puzzle;

pub mod config;
pub mod feed_client;
pub mod puzzle_generator;
pub mod puzzle_schedule;

pub type PlayedTracker = DailyTracker<PlayedDayRepository>;

#[derive(Deserialize)]
struct ValidateRequest {
    word: String,
}

#[derive(Serialize)]
struct ValidateResponse {
    word: String,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Serialize)]
struct PuzzleResponse<'a> {
    #[serde(flatten)]
    puzzle: &'a Puzzle,
    puzzle_number: Option<i64>,
}

#[derive(Serialize)]
struct PlayedResponse {
    date: String,
    played: bool,
}

pub fn create_routes(
    schedule: Arc<PuzzleSchedule>,
    validator: Arc<WordValidator>,
    tracker: Arc<PlayedTracker>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let schedule_filter = warp::any().map({
        let schedule = schedule.clone();
        move || schedule.clone()
    });

    let validator_filter = warp::any().map({
        let validator = validator.clone();
        move || validator.clone()
    });

    let tracker_filter = warp::any().map({
        let tracker = tracker.clone();
        move || tracker.clone()
    });

    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    // Today's puzzle, by the server's local date
    let today_puzzle = warp::path("puzzle")
        .and(warp::path::end())
        .and(warp::get())
        .and(schedule_filter.clone())
        .map(|schedule: Arc<PuzzleSchedule>| puzzle_reply(&schedule, &today_key()));

    let dated_puzzle = warp::path!("puzzle" / String)
        .and(warp::get())
        .and(schedule_filter.clone())
        .map(|date: String, schedule: Arc<PuzzleSchedule>| puzzle_reply(&schedule, &date));

    let validate = warp::path("validate")
        .and(warp::post())
        .and(warp::body::content_length_limit(1024))
        .and(warp::body::json())
        .and(validator_filter.clone())
        .map(handle_validate_request);

    let played_status = warp::path!("played" / String)
        .and(warp::get())
        .and(tracker_filter.clone())
        .and_then(handle_played_status_request);

    let mark_played = warp::path!("played" / String)
        .and(warp::post())
        .and(tracker_filter.clone())
        .and_then(handle_mark_played_request);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type", "accept"])
        .allow_methods(vec!["GET", "POST"]);

    health
        .or(today_puzzle)
        .or(dated_puzzle)
        .or(validate)
        .or(played_status)
        .or(mark_played)
        .with(cors)
        .with(warp::log("qiyaas"))
}

fn error_reply(message: String, status: StatusCode) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(
        warp::reply::json(&serde_json::json!({ "error": message })),
        status,
    )
}

fn is_date_key(date: &str) -> bool {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

fn puzzle_reply(schedule: &PuzzleSchedule, date: &str) -> warp::reply::WithStatus<warp::reply::Json> {
    if !is_date_key(date) {
        return error_reply(
            format!("Invalid date {:?}, expected YYYY-MM-DD", date),
            StatusCode::BAD_REQUEST,
        );
    }

    match schedule.get(date) {
        Some(puzzle) => warp::reply::with_status(
            warp::reply::json(&PuzzleResponse {
                puzzle,
                puzzle_number: puzzle_number(date),
            }),
            StatusCode::OK,
        ),
        None => {
            tracing::warn!("No puzzle scheduled for {}", date);
            error_reply(
                format!("No puzzle scheduled for {}", date),
                StatusCode::NOT_FOUND,
            )
        }
    }
}

fn handle_validate_request(
    request: ValidateRequest,
    validator: Arc<WordValidator>,
) -> warp::reply::Json {
    let check = validator.validate(&request.word);
    let message = match &check {
        WordCheck::Valid => None,
        WordCheck::NotInDictionary => Some("Not a valid word".to_string()),
        WordCheck::Incomplete { message } => Some(message.clone()),
    };

    warp::reply::json(&ValidateResponse {
        word: normalize_word(&request.word),
        valid: check.is_valid(),
        message,
    })
}

async fn handle_played_status_request(
    date: String,
    tracker: Arc<PlayedTracker>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if !is_date_key(&date) {
        return Ok(error_reply(
            format!("Invalid date {:?}, expected YYYY-MM-DD", date),
            StatusCode::BAD_REQUEST,
        ));
    }

    let played = tracker.has_played_on(&date).await;
    Ok(warp::reply::with_status(
        warp::reply::json(&PlayedResponse { date, played }),
        StatusCode::OK,
    ))
}

async fn handle_mark_played_request(
    date: String,
    tracker: Arc<PlayedTracker>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if !is_date_key(&date) {
        return Ok(error_reply(
            format!("Invalid date {:?}, expected YYYY-MM-DD", date),
            StatusCode::BAD_REQUEST,
        ));
    }

    tracker.mark_played_on(&date).await;
    let played = tracker.has_played_on(&date).await;
    Ok(warp::reply::with_status(
        warp::reply::json(&PlayedResponse { date, played }),
        StatusCode::OK,
    ))
}
