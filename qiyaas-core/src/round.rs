use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::Duration;

use qiyaas_types::{
    ClueView, GameError, GameMessage, GameOutcome, KeyStatus, LetterKind, Puzzle, RoundId,
    RoundView, SubmitOutcome,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    AdditionalLetters, ClueMatcher, DeferredQueue, GameConfig, GameEvent, GameEventBus,
    GameEventHandler, HighlightedHint, HintPhase, HintVisibility, InputTracker,
    KeyboardProjection, LifeLossReason, MatchUpdate, StartingLetterGuard,
    StartingLetterSelection, TaskToken, WinMonitor, WordValidator, active_clues,
    get_solved_clues, highlight_hint, hint_text, letter_set, letters_match_clues, outcome,
};

/// Word lengths that complete themselves once every letter is available
const AUTO_COMPLETE_LENGTHS: std::ops::RangeInclusive<usize> = 3..=4;

/// Work the round defers until its clock passes the due time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundTask {
    StartingLetterCheck { generation: u64 },
    KeyboardFlush,
    Hint(HintPhase),
    RevealAnswers,
}

/// One player's session on one puzzle.
///
/// Owns every piece of mutable state (inputs, lives, guard flags, pending
/// tasks) and is the only writer. Deferred work runs from `advance`.
pub struct Round {
    id: RoundId,
    puzzle: Puzzle,
    config: GameConfig,
    validator: Arc<WordValidator>,
    selection: StartingLetterSelection,
    additional: AdditionalLetters,
    started: bool,
    lives: u8,
    inputs: InputTracker,
    matcher: ClueMatcher,
    guard: StartingLetterGuard,
    win_monitor: WinMonitor,
    hints: HintVisibility,
    tasks: DeferredQueue<RoundTask>,
    keyboard_flush: Option<TaskToken>,
    keyboard: KeyboardProjection,
    key_statuses: BTreeMap<char, KeyStatus>,
    message: Option<GameMessage>,
    torn_down: bool,
    pub event_bus: GameEventBus,
}

impl Round {
    pub fn new(puzzle: Puzzle, validator: Arc<WordValidator>, config: GameConfig) -> Self {
        let mut hints = HintVisibility::new(puzzle.clues.len());
        hints.sync_identity(&puzzle.identity());

        Self {
            id: Uuid::new_v4(),
            selection: StartingLetterSelection::new(&config),
            additional: AdditionalLetters::default(),
            started: false,
            lives: config.max_lives,
            inputs: InputTracker::new(),
            matcher: ClueMatcher::new(),
            guard: StartingLetterGuard::new(),
            win_monitor: WinMonitor::new(),
            hints,
            tasks: DeferredQueue::new(),
            keyboard_flush: None,
            keyboard: KeyboardProjection::new(),
            key_statuses: BTreeMap::new(),
            message: None,
            torn_down: false,
            event_bus: GameEventBus::new(),
            puzzle,
            config,
            validator,
        }
    }

    pub fn add_event_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.event_bus.add_handler(handler);
    }

    // Starting letters

    pub fn select_starting_letter(&mut self, letter: char) -> Result<(), GameError> {
        self.ensure_open()?;
        if self.started {
            return Err(GameError::AlreadyStarted);
        }

        let result = self.selection.push(letter);
        if let Err(e) = &result {
            self.reject(e);
        }
        result
    }

    pub fn remove_starting_letter(&mut self) -> Option<char> {
        if self.started || self.torn_down {
            return None;
        }
        self.selection.pop()
    }

    /// Confirm the starting letters and begin solving
    pub fn start(&mut self) -> Result<(), GameError> {
        self.ensure_open()?;
        if self.started {
            return Err(GameError::AlreadyStarted);
        }
        if !self.selection.is_complete() {
            let error = GameError::StartingLettersIncomplete {
                required: self.config.starting_letter_count,
            };
            self.reject(&error);
            return Err(error);
        }

        self.started = true;
        let starting_letters = self.selection.as_string();
        info!(
            "Round {} started on {} with {}",
            self.id, self.puzzle.date, starting_letters
        );
        self.publish(GameEvent::RoundStarted {
            round_id: self.id,
            date: self.puzzle.date.clone(),
            starting_letters,
        });

        self.apply_available_letters();
        Ok(())
    }

    /// Add the one extra vowel or consonant. Returns how many positions it filled.
    pub fn add_additional_letter(&mut self, kind: LetterKind, letter: char) -> Result<usize, GameError> {
        self.ensure_open()?;
        if !self.started {
            return Err(GameError::NotStarted);
        }

        let letter = match self.additional.check(kind, letter, &self.selection) {
            Ok(letter) => letter,
            Err(e) => {
                self.reject(&e);
                return Err(e);
            }
        };

        self.additional.set(kind, letter);
        let positions_filled = self.apply_available_letters();
        debug!("Additional {} {} filled {} positions", kind.as_str(), letter, positions_filled);

        self.publish(GameEvent::AdditionalLetterAdded {
            round_id: self.id,
            kind,
            letter,
            positions_filled,
        });
        Ok(positions_filled)
    }

    /// Starting letters followed by additional letters, in the order chosen
    pub fn available_letters(&self) -> String {
        self.selection
            .as_string()
            .chars()
            .chain(self.additional.letters())
            .collect()
    }

    fn apply_available_letters(&mut self) -> usize {
        let letters = self.available_letters();
        let available = letter_set(&letters);

        let positions_filled = match self.matcher.update(&self.puzzle, &letters) {
            MatchUpdate::NewRound { clues } => {
                self.inputs.initialize(&clues, &available);
                self.inputs
                    .clues()
                    .iter()
                    .map(|state| state.entries().len())
                    .sum()
            }
            MatchUpdate::Extended { .. } => self.inputs.extend_prefill(&available),
            MatchUpdate::Unchanged => 0,
        };

        // A fallback puzzle has no words to match against
        if self.guard.observe(&letters) && !self.puzzle.is_fallback() {
            let matches = letters_match_clues(&letters, &active_clues(&self.puzzle, &letters));
            if self.guard.should_penalize(matches) {
                let generation = self.guard.generation();
                self.tasks.schedule(
                    self.config.starting_letter_settle,
                    RoundTask::StartingLetterCheck { generation },
                );
            }
        }

        self.auto_complete_short_words();
        self.schedule_keyboard_flush();
        positions_filled
    }

    // Letter input

    pub fn enter_letter(&mut self, clue: usize, position: usize, letter: char) -> bool {
        if !self.is_playable() {
            return false;
        }

        let changed = self.inputs.set_letter(clue, position, letter);
        if changed {
            self.publish(GameEvent::LetterEntered {
                round_id: self.id,
                clue,
                position,
                letter: letter.to_ascii_uppercase(),
            });
            self.schedule_keyboard_flush();
        }
        changed
    }

    /// Where typing in `clue` lands next: the first empty position after
    /// `after`, wrapping back to an earlier gap when the tail is full
    pub fn next_input_position(&self, clue: usize, after: Option<usize>) -> Option<usize> {
        let state = self.inputs.clue(clue)?;
        state
            .find_next_empty_position(after)
            .or_else(|| after.and_then(|position| state.find_previous_empty_position(position)))
    }

    /// Type into the first empty position of a clue; returns where it landed
    pub fn type_letter(&mut self, clue: usize, letter: char) -> Option<usize> {
        let position = self.next_input_position(clue, None)?;
        self.enter_letter(clue, position, letter).then_some(position)
    }

    pub fn clear_letter(&mut self, clue: usize, position: usize) -> bool {
        if !self.is_playable() {
            return false;
        }

        let changed = self.inputs.clear_letter(clue, position);
        if changed {
            self.schedule_keyboard_flush();
        }
        changed
    }

    /// Check a filled clue word against the dictionary, then the target
    pub fn submit_word(&mut self, clue: usize) -> SubmitOutcome {
        if !self.is_playable() {
            return SubmitOutcome::Ignored;
        }
        let Some(state) = self.inputs.clue(clue) else {
            warn!("Submit for unknown clue {}", clue);
            return SubmitOutcome::Ignored;
        };
        if state.is_complete() {
            return SubmitOutcome::Ignored;
        }
        let Some(guess) = state.assembled_word() else {
            let text = self.config.messages.word_not_complete.clone();
            self.show_message(GameMessage::info(text));
            return SubmitOutcome::Ignored;
        };
        let target = state.word();
        let correct = state.correct_positions();

        let outcome = if !self.validator.validate(&guess).is_valid() {
            debug!("{} is not in the dictionary", guess);
            if let Some(state) = self.inputs.clue_mut(clue) {
                state.reset_unlocked();
            }
            let text = self.config.messages.word_not_valid.clone();
            self.show_message(GameMessage::info(text));
            SubmitOutcome::NotAWord
        } else {
            self.inputs.record_guessed_word(&guess);

            if guess == target {
                self.inputs.verify_all(clue);
                let text = self.config.messages.word_correct.clone();
                self.show_message(GameMessage::success(text));
                SubmitOutcome::Solved
            } else {
                if let Some(state) = self.inputs.clue_mut(clue) {
                    for &position in &correct {
                        state.verify_position(position);
                    }
                    state.reset_unlocked();
                }
                let text = self.config.messages.word_incorrect.clone();
                self.show_message(GameMessage::error(text));

                if correct.is_empty() {
                    SubmitOutcome::Incorrect
                } else {
                    SubmitOutcome::PartiallyCorrect {
                        verified_positions: correct.into_iter().collect(),
                    }
                }
            }
        };

        info!("Round {} clue {} guess {} -> {:?}", self.id, clue, guess, outcome);
        self.publish(GameEvent::WordSubmitted {
            round_id: self.id,
            clue,
            outcome: outcome.clone(),
        });

        if outcome.costs_life() {
            self.lose_life(LifeLossReason::WrongGuess);
        }
        if outcome == SubmitOutcome::Solved {
            self.publish(GameEvent::ClueSolved {
                round_id: self.id,
                clue,
                auto_completed: false,
            });
            self.check_win();
        }

        self.schedule_keyboard_flush();
        outcome
    }

    /// Short words made only of available letters cannot be edited, so they solve themselves
    fn auto_complete_short_words(&mut self) {
        let available = letter_set(&self.available_letters());
        let covered = get_solved_clues(&self.puzzle, &available);

        let mut completed = Vec::new();
        for clue in covered {
            let Some(state) = self.inputs.clue(clue) else {
                continue;
            };
            if state.is_complete() || !AUTO_COMPLETE_LENGTHS.contains(&state.word_length()) {
                continue;
            }
            self.inputs.verify_all(clue);
            completed.push(clue);
        }

        for clue in completed {
            info!("Round {} clue {} auto-completed", self.id, clue);
            self.publish(GameEvent::ClueSolved {
                round_id: self.id,
                clue,
                auto_completed: true,
            });
        }
        self.check_win();
    }

    // Lives and outcome

    fn lose_life(&mut self, reason: LifeLossReason) {
        if self.lives == 0 {
            return;
        }
        self.lives -= 1;
        info!("Round {} lost a life ({:?}), {} left", self.id, reason, self.lives);
        self.publish(GameEvent::LifeLost {
            round_id: self.id,
            reason,
            lives_remaining: self.lives,
        });

        if self.lives == 0 {
            self.tasks
                .cancel_where(|task| matches!(task, RoundTask::StartingLetterCheck { .. }));
            let text = self.config.messages.game_loss.clone();
            self.show_message(GameMessage::info(text));
            info!("Round {} lost", self.id);
            self.publish(GameEvent::RoundLost { round_id: self.id });
            self.tasks
                .schedule(self.config.loss_reveal_delay, RoundTask::RevealAnswers);
        }
    }

    fn check_win(&mut self) {
        let solved = self.solved_clues();
        let is_game_over = self.lives == 0;
        if self.win_monitor.check(&self.puzzle, &solved, is_game_over) {
            let text = self.config.messages.game_win.clone();
            self.show_message(GameMessage::success(text));
            info!("Round {} won with {} lives", self.id, self.lives);
            self.publish(GameEvent::RoundWon {
                round_id: self.id,
                lives_remaining: self.lives,
            });
        }
    }

    /// Clues with every position verified
    pub fn solved_clues(&self) -> BTreeSet<usize> {
        self.inputs.completed_clues()
    }

    pub fn outcome(&self) -> GameOutcome {
        outcome(
            self.lives,
            self.solved_clues().len(),
            self.puzzle.non_empty_clue_count(),
        )
    }

    // Hints

    pub fn toggle_hint(&mut self, clue: usize) -> bool {
        if self.torn_down {
            return false;
        }
        let Some(phase) = self.hints.toggle(clue) else {
            return false;
        };

        let (delay, visible) = match phase {
            HintPhase::FadeIn { .. } => (self.config.hint_fade_in, true),
            HintPhase::Unrender { .. } => (self.config.hint_fade_out, false),
        };
        self.tasks.schedule(delay, RoundTask::Hint(phase));
        self.publish(GameEvent::HintToggled {
            round_id: self.id,
            clue,
            visible,
        });
        true
    }

    pub fn set_hints_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.tasks
                .cancel_where(|task| matches!(task, RoundTask::Hint(_)));
        }
        self.hints.set_enabled(enabled);
    }

    /// Hint line for a clue with emphasis once that clue is solved
    pub fn hint_for(&self, clue: usize) -> Option<HighlightedHint> {
        let puzzle_clue = self.puzzle.clue(clue)?;
        let text = hint_text(puzzle_clue.number)?;
        let solved = self.inputs.clue(clue).is_some_and(|state| state.is_complete());
        Some(highlight_hint(&text, puzzle_clue.rule, solved))
    }

    pub fn hints(&self) -> &HintVisibility {
        &self.hints
    }

    // Deferred work

    /// Move the round clock forward and run whatever came due
    pub fn advance(&mut self, elapsed: Duration) {
        if self.torn_down {
            return;
        }
        for task in self.tasks.advance(elapsed) {
            self.run_task(task);
        }
    }

    fn run_task(&mut self, task: RoundTask) {
        match task {
            RoundTask::StartingLetterCheck { generation } => {
                if generation != self.guard.generation() || self.outcome().is_terminal() {
                    debug!("Skipping stale starting letter check");
                    return;
                }
                let letters = self.available_letters();
                let matches = letters_match_clues(&letters, &active_clues(&self.puzzle, &letters));
                if self.guard.should_penalize(matches) {
                    self.guard.mark_penalized();
                    let text = self.config.messages.no_starting_letters_match.clone();
                    self.show_message(GameMessage::error(text));
                    self.lose_life(LifeLossReason::NoStartingLetterMatch);
                }
            }
            RoundTask::KeyboardFlush => {
                self.keyboard_flush = None;
                self.keyboard = self.inputs.flatten_for_keyboard();
                self.key_statuses = self.inputs.key_statuses(&letter_set(&self.available_letters()));
                self.publish(GameEvent::KeyboardUpdated {
                    round_id: self.id,
                    statuses: self.key_statuses.clone(),
                });
            }
            RoundTask::Hint(phase) => {
                self.hints.apply(phase);
            }
            RoundTask::RevealAnswers => {
                let clues = self.inputs.reveal_unsolved();
                info!("Round {} revealed {} unsolved clues", self.id, clues.len());
                self.publish(GameEvent::AnswersRevealed {
                    round_id: self.id,
                    clues,
                });
                self.schedule_keyboard_flush();
            }
        }
    }

    /// Restart the keyboard debounce window
    fn schedule_keyboard_flush(&mut self) {
        if let Some(token) = self.keyboard_flush.take() {
            self.tasks.cancel(token);
        }
        let token = self
            .tasks
            .schedule(self.config.keyboard_debounce, RoundTask::KeyboardFlush);
        self.keyboard_flush = Some(token);
    }

    /// Cancel every pending task; the round accepts nothing afterwards
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let cancelled_tasks = self.tasks.cancel_all();
        self.keyboard_flush = None;
        self.torn_down = true;
        info!("Round {} torn down, {} tasks cancelled", self.id, cancelled_tasks);
        self.publish(GameEvent::RoundTornDown {
            round_id: self.id,
            cancelled_tasks,
        });
    }

    // Queries

    pub fn id(&self) -> RoundId {
        self.id
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn message(&self) -> Option<&GameMessage> {
        self.message.as_ref()
    }

    pub fn inputs(&self) -> &InputTracker {
        &self.inputs
    }

    /// Last debounced keyboard projection
    pub fn keyboard_projection(&self) -> &KeyboardProjection {
        &self.keyboard
    }

    pub fn verified_projection(&self) -> KeyboardProjection {
        self.inputs.flatten_verified()
    }

    /// Last debounced keyboard colouring
    pub fn key_statuses(&self) -> &BTreeMap<char, KeyStatus> {
        &self.key_statuses
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.pending()
    }

    /// Client-safe snapshot; target letters only appear once typed, verified
    /// or revealed after a loss
    pub fn view(&self) -> RoundView {
        let clues = self
            .puzzle
            .clues
            .iter()
            .enumerate()
            .map(|(index, clue)| {
                let state = self.inputs.clue(index);
                let word_length = clue.normalized_word().chars().count();
                ClueView {
                    word_type: clue.word_type,
                    number: clue.number,
                    word_length,
                    letters: (0..word_length)
                        .map(|position| state.and_then(|s| s.entry(position)))
                        .collect(),
                    verified_positions: state
                        .map(|s| s.verified_positions().iter().copied().collect())
                        .unwrap_or_default(),
                    revealed_positions: state
                        .map(|s| s.revealed_positions().iter().copied().collect())
                        .unwrap_or_default(),
                    is_complete: state.is_some_and(|s| s.is_complete()),
                }
            })
            .collect();

        RoundView {
            id: self.id,
            date: self.puzzle.date.clone(),
            lives: self.lives,
            max_lives: self.config.max_lives,
            outcome: self.outcome(),
            starting_letters: self.available_letters(),
            has_started: self.started,
            hints_enabled: self.hints.is_enabled(),
            clues,
            message: self.message.clone(),
        }
    }

    // Helpers

    fn is_playable(&self) -> bool {
        self.started && !self.torn_down && !self.outcome().is_terminal()
    }

    fn ensure_open(&self) -> Result<(), GameError> {
        if self.torn_down || self.outcome().is_terminal() {
            return Err(GameError::RoundOver);
        }
        Ok(())
    }

    fn reject(&mut self, error: &GameError) {
        debug!("Round {} rejected action: {}", self.id, error);
        if let Some(text) = self.config.messages.for_error(error) {
            self.show_message(GameMessage::error(text));
        }
    }

    fn show_message(&mut self, message: GameMessage) {
        self.message = Some(message.clone());
        self.publish(GameEvent::MessageShown {
            round_id: self.id,
            message,
        });
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    fn publish(&mut self, event: GameEvent) {
        self.event_bus.publish(event);
    }
}

impl std::fmt::Debug for Round {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Round")
            .field("id", &self.id)
            .field("date", &self.puzzle.date)
            .field("lives", &self.lives)
            .field("started", &self.started)
            .field("torn_down", &self.torn_down)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qiyaas_types::{PuzzleClue, RuleKind, WordType};

    fn round() -> Round {
        let puzzle = Puzzle::new(
            "2025-12-07",
            vec![
                PuzzleClue::new(WordType::Noun, "honey", RuleKind::AlphabetRule, 8),
                PuzzleClue::new(WordType::Verb, "arrive", RuleKind::LengthRule, 6),
                PuzzleClue::new(WordType::Adjective, "smart", RuleKind::NumberRule, 6),
            ],
        );
        let validator = WordValidator::from_word_list("honey\narrive\nsmart\nmoney\nstart");
        Round::new(puzzle, Arc::new(validator), GameConfig::default())
    }

    #[test]
    fn test_cannot_start_without_four_letters() {
        let mut round = round();
        round.select_starting_letter('A').unwrap();

        assert_eq!(
            round.start(),
            Err(GameError::StartingLettersIncomplete { required: 4 })
        );
        assert_eq!(
            round.message().map(|m| m.text.as_str()),
            Some("Please select 4 starting letters first!")
        );
        assert!(!round.has_started());
    }

    #[test]
    fn test_selection_locked_after_start() {
        let mut round = round();
        for letter in "ARST".chars() {
            round.select_starting_letter(letter).unwrap();
        }
        round.start().unwrap();

        assert_eq!(round.select_starting_letter('M'), Err(GameError::AlreadyStarted));
        assert_eq!(round.remove_starting_letter(), None);
        assert_eq!(round.start(), Err(GameError::AlreadyStarted));
    }

    #[test]
    fn test_keyboard_flush_is_debounced() {
        let mut round = round();
        for letter in "ERST".chars() {
            round.select_starting_letter(letter).unwrap();
        }
        round.start().unwrap();
        round.advance(Duration::from_millis(50));

        round.enter_letter(0, 0, 'H');
        round.advance(Duration::from_millis(30));
        round.enter_letter(0, 1, 'O');
        round.advance(Duration::from_millis(30));
        // Second letter restarted the window
        assert!(!round.keyboard_projection().contains_key("clue0-pos0"));

        round.advance(Duration::from_millis(20));
        assert_eq!(round.keyboard_projection().get("clue0-pos0"), Some(&'H'));
        assert_eq!(round.keyboard_projection().get("clue0-pos1"), Some(&'O'));
    }

    #[test]
    fn test_hint_for_emphasizes_after_solve() {
        let mut round = round();
        for letter in "ERST".chars() {
            round.select_starting_letter(letter).unwrap();
        }
        round.start().unwrap();

        let hint = round.hint_for(0).unwrap();
        assert_eq!(hint.text(), "= H , E");
        assert_eq!(hint.emphasis, None);

        for (position, letter) in "HONEY".chars().enumerate() {
            round.enter_letter(0, position, letter);
        }
        assert_eq!(round.submit_word(0), SubmitOutcome::Solved);
        assert_eq!(
            round.hint_for(0).unwrap().emphasis,
            Some(crate::HintPart::Alphabet)
        );
    }
}
