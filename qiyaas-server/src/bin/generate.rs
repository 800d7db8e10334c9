use chrono::Local;
use tracing::{error, info, warn};

use qiyaas_server::config::Config;
use qiyaas_server::puzzle_generator::{PuzzleGenerator, UsedWords, WordPool};
use qiyaas_server::puzzle_schedule::PuzzleSchedule;

fn main() {
    tracing_subscriber::fmt::init();

    let config = match Config::new() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let pool = match WordPool::load(&config.word_pool_path) {
        Ok(pool) => pool,
        Err(e) => {
            error!("{}", e);
            error!("Set WORD_POOL_PATH to a tagged word file.");
            std::process::exit(1);
        }
    };
    let mut used = match UsedWords::load(&config.used_words_path) {
        Ok(used) => used,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };
    let mut schedule = match PuzzleSchedule::load(&config.schedule_path) {
        Ok(schedule) => schedule,
        Err(e) => {
            warn!("{}; starting a new schedule", e);
            PuzzleSchedule::default()
        }
    };

    let today = Local::now().date_naive();
    let scheduled = schedule.dates().map(str::to_string).collect();
    let generator = PuzzleGenerator::new(pool);

    let puzzles = match generator.generate_days(today, config.generate_days, &scheduled, &mut used) {
        Ok(puzzles) => puzzles,
        Err(e) => {
            error!("Puzzle generation failed: {}", e);
            std::process::exit(1);
        }
    };

    let added = puzzles
        .into_iter()
        .map(|puzzle| schedule.insert(puzzle))
        .filter(|inserted| *inserted)
        .count();

    if let Err(e) = schedule.save(&config.schedule_path) {
        error!("{}", e);
        std::process::exit(1);
    }
    // Only record words once the puzzles using them are saved
    if let Err(e) = used.save(&config.used_words_path) {
        error!("{}", e);
        std::process::exit(1);
    }

    info!("Added {} puzzles, {} words used so far", added, used.len());
}
