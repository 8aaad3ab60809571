//! Score accumulation and the animated score readout.

use std::time::Duration;

use bevy::ecs::message::{MessageReader, MessageWriter};
use bevy::prelude::*;
use rand::Rng;

use crate::events::{HitEvent, ScoreChanged};
use crate::resources::Scoreboard;

/// Text shown before the first point is scored.
pub const SCORE_PLACEHOLDER: &str = "No points.";

/// How long a new total takes to resolve out of scrambled digits.
pub const SCORE_REVEAL_SECS: f32 = 0.2;

/// Add every hit to the [`Scoreboard`] and announce the new total.
pub fn accumulate_score(
    mut hits: MessageReader<HitEvent>,
    mut scoreboard: ResMut<Scoreboard>,
    mut changes: MessageWriter<ScoreChanged>,
) {
    for hit in hits.read() {
        let total = scoreboard.add_points(hit.points, hit.perfect);
        info!(
            "+{} points{} (total {total})",
            hit.award(),
            if hit.perfect { " perfect" } else { "" }
        );
        changes.write(ScoreChanged { total });
    }
}

/// Animated text readout of the score.
///
/// A new total is revealed left to right over [`SCORE_REVEAL_SECS`]; the
/// characters not yet revealed show random digits.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use rotary_turret::systems::score::{ScoreDisplay, SCORE_PLACEHOLDER};
///
/// let mut display = ScoreDisplay::default();
/// assert_eq!(display.text(), SCORE_PLACEHOLDER);
/// display.show_total(30, Duration::ZERO);
/// assert_eq!(display.text(), "30");
/// ```
#[derive(Component, Reflect, Clone, Debug)]
#[reflect(Component)]
pub struct ScoreDisplay {
    text: String,
    target: String,
    reveal: Option<Timer>,
}

impl Default for ScoreDisplay {
    fn default() -> Self {
        Self {
            text: SCORE_PLACEHOLDER.to_string(),
            target: SCORE_PLACEHOLDER.to_string(),
            reveal: None,
        }
    }
}

impl ScoreDisplay {
    /// Text to show this frame.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Text the display is resolving to.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn is_revealing(&self) -> bool {
        self.reveal.is_some()
    }

    /// Starts revealing `total`, replacing any reveal in flight.
    pub fn show_total(&mut self, total: u64, duration: Duration) {
        self.target = total.to_string();
        if duration.is_zero() {
            self.text = self.target.clone();
            self.reveal = None;
        } else {
            self.reveal = Some(Timer::new(duration, TimerMode::Once));
        }
    }

    /// Advances the reveal; returns `true` when the text changed.
    pub fn tick<R: Rng + ?Sized>(&mut self, delta: Duration, rng: &mut R) -> bool {
        let Some(timer) = self.reveal.as_mut() else {
            return false;
        };
        timer.tick(delta);
        if timer.is_finished() {
            self.text = self.target.clone();
            self.reveal = None;
        } else {
            self.text = scramble_text(&self.target, timer.fraction(), rng);
        }
        true
    }
}

/// `target` with its first `progress` share revealed and the rest replaced by random digits.
pub fn scramble_text<R: Rng + ?Sized>(target: &str, progress: f32, rng: &mut R) -> String {
    let len = target.chars().count();
    let revealed = ((len as f32) * progress.clamp(0.0, 1.0)).floor() as usize;
    target
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if i < revealed {
                c
            } else {
                char::from(b'0' + rng.random_range(0..10u8))
            }
        })
        .collect()
}

/// Start a reveal on every score display when the total changes, and advance reveals.
pub fn animate_score_display(
    time: Res<Time>,
    mut changes: MessageReader<ScoreChanged>,
    mut displays: Query<&mut ScoreDisplay>,
) {
    let latest = changes.read().last().map(|change| change.total);
    let reveal = Duration::from_secs_f32(SCORE_REVEAL_SECS);
    let mut rng = rand::rng();

    for mut display in displays.iter_mut() {
        if let Some(total) = latest {
            display.show_total(total, reveal);
        }
        if display.is_revealing() {
            display.tick(time.delta(), &mut rng);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_scramble_reveals_prefix() {
        let mut rng = StdRng::seed_from_u64(7);
        let text = scramble_text("1240", 0.5, &mut rng);
        assert_eq!(text.len(), 4);
        assert!(text.starts_with("12"));
        assert!(text.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_scramble_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(scramble_text("30", 1.0, &mut rng), "30");
        let start = scramble_text("abc", 0.0, &mut rng);
        assert!(start.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_display_reveal_finishes_on_target() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut display = ScoreDisplay::default();
        display.show_total(120, Duration::from_secs_f32(0.2));
        assert_eq!(display.text(), SCORE_PLACEHOLDER);
        assert_eq!(display.target(), "120");

        assert!(display.tick(Duration::from_secs_f32(0.1), &mut rng));
        assert_eq!(display.text().len(), 3);
        assert!(display.is_revealing());

        assert!(display.tick(Duration::from_secs_f32(0.15), &mut rng));
        assert_eq!(display.text(), "120");
        assert!(!display.is_revealing());
        assert!(!display.tick(Duration::from_secs_f32(0.1), &mut rng));
    }
}
