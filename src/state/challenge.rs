//! Pure win/loss attempt transitions applied to a [`ChallengeEntity`].
//!
//! Nothing in here touches storage: callers read an entity, run [`apply`] and
//! persist the returned copy with a conditional write on the previous revision.

use std::time::SystemTime;

use thiserror::Error;

use crate::dao::models::ChallengeEntity;

/// Derived state of the attempt in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptPhase {
    /// Fewer losses than allowed; wins and losses are accepted.
    InProgress,
    /// Loss limit reached; a reset (or a raised limit) leaves this phase.
    AttemptOver,
}

/// Mutation requested against a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerCommand {
    RecordWin,
    RecordLoss,
    ResetAttempt,
}

/// Rejection raised when a command does not apply to the current phase.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum TrackerError {
    #[error("Challenge is already over (max losses reached)")]
    AttemptAlreadyOver,
}

/// Outcome of a successful command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Entity to persist, with its revision bumped.
    pub next: ChallengeEntity,
    /// True when this command ended the attempt by reaching the loss limit.
    pub attempt_ended: bool,
}

impl ChallengeEntity {
    /// Phase derived from the loss counters.
    pub fn phase(&self) -> AttemptPhase {
        if self.current_losses >= self.max_losses {
            AttemptPhase::AttemptOver
        } else {
            AttemptPhase::InProgress
        }
    }

    /// Copy with `updated_at` refreshed and the revision bumped.
    pub fn touched(&self, now: SystemTime) -> Self {
        let mut next = self.clone();
        next.updated_at = now;
        next.revision = self.revision.wrapping_add(1);
        next
    }

    fn record_best_run(&mut self, wins: u32, losses: u32) {
        if is_better_run(wins, losses, self.best_wins, self.best_losses) {
            self.best_wins = wins;
            self.best_losses = losses;
        }
    }
}

/// A finished run beats the best one with strictly more wins, or as many wins and fewer losses.
pub fn is_better_run(wins: u32, losses: u32, best_wins: u32, best_losses: u32) -> bool {
    wins > best_wins || (wins == best_wins && losses < best_losses)
}

/// Compute the entity produced by `command`, leaving `current` untouched.
pub fn apply(
    current: &ChallengeEntity,
    command: TrackerCommand,
    now: SystemTime,
) -> Result<Transition, TrackerError> {
    let phase = current.phase();
    let mut next = current.touched(now);
    let mut attempt_ended = false;

    match command {
        TrackerCommand::RecordWin => {
            if phase == AttemptPhase::AttemptOver {
                return Err(TrackerError::AttemptAlreadyOver);
            }
            next.current_wins = next.current_wins.saturating_add(1);
        }
        TrackerCommand::RecordLoss => {
            if phase == AttemptPhase::AttemptOver {
                return Err(TrackerError::AttemptAlreadyOver);
            }
            let losses = next.current_losses + 1;
            next.current_losses = losses;
            if losses >= next.max_losses {
                next.record_best_run(next.current_wins, losses);
                // Reopened by a raised loss limit: already counted once.
                if !next.attempt_closed {
                    next.total_attempts = next.total_attempts.saturating_add(1);
                    next.attempt_closed = true;
                }
                attempt_ended = true;
            }
        }
        TrackerCommand::ResetAttempt => {
            // An attempt that ended on a loss was counted at that loss.
            let has_progress = next.current_wins > 0 || next.current_losses > 0;
            if has_progress && !next.attempt_closed {
                next.record_best_run(next.current_wins, next.current_losses);
                next.total_attempts = next.total_attempts.saturating_add(1);
            }
            next.current_wins = 0;
            next.current_losses = 0;
            next.attempt_closed = false;
        }
    }

    Ok(Transition {
        next,
        attempt_ended,
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use uuid::Uuid;

    use super::*;

    fn twenty_win() -> ChallengeEntity {
        ChallengeEntity::new(Uuid::new_v4(), "20 Win".into(), 20, 3)
    }

    fn run(challenge: &mut ChallengeEntity, command: TrackerCommand) -> Result<bool, TrackerError> {
        let transition = apply(challenge, command, SystemTime::now())?;
        *challenge = transition.next;
        Ok(transition.attempt_ended)
    }

    fn repeat(challenge: &mut ChallengeEntity, command: TrackerCommand, times: usize) {
        for _ in 0..times {
            run(challenge, command).unwrap();
        }
    }

    #[test]
    fn new_challenge_starts_zeroed_and_active() {
        let challenge = twenty_win();
        assert_eq!(challenge.current_wins, 0);
        assert_eq!(challenge.current_losses, 0);
        assert_eq!((challenge.best_wins, challenge.best_losses), (0, 0));
        assert_eq!(challenge.total_attempts, 0);
        assert!(challenge.is_active);
        assert_eq!(challenge.phase(), AttemptPhase::InProgress);
    }

    #[test]
    fn third_loss_ends_attempt_and_fourth_is_rejected() {
        let mut challenge = twenty_win();

        assert!(!run(&mut challenge, TrackerCommand::RecordLoss).unwrap());
        assert!(!run(&mut challenge, TrackerCommand::RecordLoss).unwrap());
        assert!(run(&mut challenge, TrackerCommand::RecordLoss).unwrap());

        assert_eq!(challenge.current_losses, 3);
        assert_eq!((challenge.best_wins, challenge.best_losses), (0, 0));
        assert_eq!(challenge.total_attempts, 1);
        assert_eq!(challenge.phase(), AttemptPhase::AttemptOver);

        let before = challenge.clone();
        assert_eq!(
            run(&mut challenge, TrackerCommand::RecordLoss),
            Err(TrackerError::AttemptAlreadyOver)
        );
        assert_eq!(
            run(&mut challenge, TrackerCommand::RecordWin),
            Err(TrackerError::AttemptAlreadyOver)
        );
        assert_eq!(challenge, before);
    }

    #[test]
    fn reset_after_ended_attempt_does_not_count_it_twice() {
        let mut challenge = twenty_win();
        repeat(&mut challenge, TrackerCommand::RecordWin, 5);
        repeat(&mut challenge, TrackerCommand::RecordLoss, 3);

        assert_eq!((challenge.best_wins, challenge.best_losses), (5, 3));
        assert_eq!(challenge.total_attempts, 1);

        run(&mut challenge, TrackerCommand::ResetAttempt).unwrap();
        assert_eq!((challenge.current_wins, challenge.current_losses), (0, 0));
        assert_eq!((challenge.best_wins, challenge.best_losses), (5, 3));
        assert_eq!(challenge.total_attempts, 1);
        assert_eq!(challenge.phase(), AttemptPhase::InProgress);
    }

    #[test]
    fn reset_with_progress_captures_best_and_counts_attempt() {
        let mut challenge = twenty_win();
        repeat(&mut challenge, TrackerCommand::RecordWin, 2);

        run(&mut challenge, TrackerCommand::ResetAttempt).unwrap();
        assert_eq!((challenge.best_wins, challenge.best_losses), (2, 0));
        assert_eq!(challenge.total_attempts, 1);
        assert_eq!((challenge.current_wins, challenge.current_losses), (0, 0));
    }

    #[test]
    fn second_reset_is_a_noop_for_history() {
        let mut challenge = twenty_win();
        repeat(&mut challenge, TrackerCommand::RecordWin, 1);
        run(&mut challenge, TrackerCommand::RecordLoss).unwrap();

        run(&mut challenge, TrackerCommand::ResetAttempt).unwrap();
        let after_first = challenge.clone();
        run(&mut challenge, TrackerCommand::ResetAttempt).unwrap();

        assert_eq!(challenge.best_wins, after_first.best_wins);
        assert_eq!(challenge.best_losses, after_first.best_losses);
        assert_eq!(challenge.total_attempts, after_first.total_attempts);
    }

    #[test]
    fn reaching_win_goal_has_no_effect() {
        let mut challenge = ChallengeEntity::new(Uuid::new_v4(), "quick".into(), 2, 1);
        repeat(&mut challenge, TrackerCommand::RecordWin, 4);

        assert_eq!(challenge.current_wins, 4);
        assert_eq!(challenge.total_attempts, 0);
        assert_eq!(challenge.phase(), AttemptPhase::InProgress);
    }

    #[test]
    fn best_run_prefers_wins_then_fewer_losses() {
        assert!(is_better_run(3, 3, 2, 0));
        assert!(is_better_run(2, 1, 2, 3));
        assert!(!is_better_run(2, 3, 2, 3));
        assert!(!is_better_run(1, 0, 2, 3));
        // Fresh best of (0, 0) is never beaten by a winless run.
        assert!(!is_better_run(0, 3, 0, 0));
    }

    #[test]
    fn every_transition_bumps_revision_and_timestamp() {
        let challenge = twenty_win();
        let later = challenge.updated_at + Duration::from_secs(5);

        let transition = apply(&challenge, TrackerCommand::RecordWin, later).unwrap();
        assert_eq!(transition.next.revision, challenge.revision + 1);
        assert_eq!(transition.next.updated_at, later);
        assert_eq!(transition.next.created_at, challenge.created_at);
    }

    #[test]
    fn lowered_loss_limit_puts_attempt_over() {
        let mut challenge = twenty_win();
        repeat(&mut challenge, TrackerCommand::RecordLoss, 2);
        challenge.max_losses = 1;

        assert_eq!(challenge.phase(), AttemptPhase::AttemptOver);
        assert_eq!(
            apply(&challenge, TrackerCommand::RecordWin, SystemTime::now()),
            Err(TrackerError::AttemptAlreadyOver)
        );
    }

    #[test]
    fn reset_counts_attempt_ended_by_lowered_limit() {
        let mut challenge = twenty_win();
        repeat(&mut challenge, TrackerCommand::RecordWin, 4);
        run(&mut challenge, TrackerCommand::RecordLoss).unwrap();
        challenge.max_losses = 1;
        assert_eq!(challenge.phase(), AttemptPhase::AttemptOver);

        run(&mut challenge, TrackerCommand::ResetAttempt).unwrap();
        assert_eq!(challenge.total_attempts, 1);
        assert_eq!((challenge.best_wins, challenge.best_losses), (4, 1));
        assert!(!challenge.attempt_closed);
    }

    #[test]
    fn raised_limit_does_not_recount_ended_attempt() {
        let mut challenge = twenty_win();
        repeat(&mut challenge, TrackerCommand::RecordLoss, 3);
        assert!(challenge.attempt_closed);
        challenge.max_losses = 5;
        assert_eq!(challenge.phase(), AttemptPhase::InProgress);

        run(&mut challenge, TrackerCommand::ResetAttempt).unwrap();
        assert_eq!(challenge.total_attempts, 1);
        assert!(!challenge.attempt_closed);
    }

    #[test]
    fn reopened_attempt_ending_again_is_counted_once() {
        let mut challenge = twenty_win();
        repeat(&mut challenge, TrackerCommand::RecordLoss, 3);
        challenge.max_losses = 5;

        repeat(&mut challenge, TrackerCommand::RecordWin, 2);
        run(&mut challenge, TrackerCommand::RecordLoss).unwrap();
        assert!(run(&mut challenge, TrackerCommand::RecordLoss).unwrap());

        assert_eq!(challenge.total_attempts, 1);
        assert_eq!((challenge.best_wins, challenge.best_losses), (2, 5));

        run(&mut challenge, TrackerCommand::ResetAttempt).unwrap();
        assert_eq!(challenge.total_attempts, 1);
    }

    #[test]
    fn invariants_hold_over_mixed_sequences() {
        let commands = [
            TrackerCommand::RecordWin,
            TrackerCommand::RecordLoss,
            TrackerCommand::ResetAttempt,
        ];

        // Deterministic walk over many pseudo-random command sequences.
        let mut seed: u64 = 0x5eed;
        for _ in 0..200 {
            let mut challenge = ChallengeEntity::new(Uuid::new_v4(), "walk".into(), 5, 3);
            let mut ended_attempts = 0;

            for _ in 0..40 {
                seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                let command = commands[(seed >> 33) as usize % commands.len()];
                let before = challenge.clone();

                match apply(&challenge, command, SystemTime::now()) {
                    Ok(transition) => {
                        let next = &transition.next;
                        let counted = next.total_attempts - before.total_attempts;
                        assert!(counted <= 1);
                        if transition.attempt_ended {
                            assert_eq!(counted, 1);
                        }
                        if command == TrackerCommand::ResetAttempt
                            && before.current_wins == 0
                            && before.current_losses == 0
                        {
                            assert_eq!(counted, 0);
                        }
                        assert!(!is_better_run(
                            before.best_wins,
                            before.best_losses,
                            next.best_wins,
                            next.best_losses
                        ));
                        ended_attempts += counted;
                        challenge = transition.next;
                    }
                    Err(TrackerError::AttemptAlreadyOver) => {
                        assert_eq!(before.phase(), AttemptPhase::AttemptOver);
                        assert_ne!(command, TrackerCommand::ResetAttempt);
                    }
                }

                assert!(challenge.current_losses <= challenge.max_losses);
            }

            assert_eq!(challenge.total_attempts, ended_attempts);
        }
    }
}
