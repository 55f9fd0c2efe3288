//! Text command surface.
//!
//! A thin dispatcher for typed or transcribed instructions ("split at 5s",
//! "ripple delete clip 2"). Parsing is forgiving about case and
//! whitespace but never guesses: text that does not match a known form
//! reports `NotRecognized` and leaves the timeline alone.

use crate::timeline::Timeline;

/// A recognized instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Split every lane at the given time in seconds.
    SplitAt(f64),
    /// Remove the Nth clip, 1-based in ascending start order.
    DeleteClip { ordinal: usize, ripple: bool },
}

/// What dispatching a piece of text did.
#[derive(Clone, Debug, PartialEq)]
pub enum CommandOutcome {
    /// The text parsed and the operation ran (possibly as a tolerated no-op).
    Applied(Command),
    /// The text matched no known instruction; nothing happened.
    NotRecognized,
}

/// Parse one instruction. `None` for anything unrecognized.
pub fn parse_command(text: &str) -> Option<Command> {
    let lowered = text.trim().to_lowercase();
    let tokens: Vec<&str> = lowered.split_whitespace().collect();
    match tokens.as_slice() {
        ["split", "at", time] => Some(Command::SplitAt(parse_seconds(time)?)),
        ["delete", "clip", ordinal] => Some(Command::DeleteClip {
            ordinal: parse_ordinal(ordinal)?,
            ripple: false,
        }),
        ["ripple", "delete", "clip", ordinal] => Some(Command::DeleteClip {
            ordinal: parse_ordinal(ordinal)?,
            ripple: true,
        }),
        _ => None,
    }
}

/// Accepts "5", "5s", "2.5s", "5sec", "5secs".
fn parse_seconds(token: &str) -> Option<f64> {
    let trimmed = token
        .strip_suffix("secs")
        .or_else(|| token.strip_suffix("sec"))
        .or_else(|| token.strip_suffix('s'))
        .unwrap_or(token);
    let value: f64 = trimmed.parse().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value)
    } else {
        None
    }
}

fn parse_ordinal(token: &str) -> Option<usize> {
    let value: usize = token.parse().ok()?;
    if value >= 1 {
        Some(value)
    } else {
        None
    }
}

/// Parse and execute one instruction against the timeline.
pub fn apply_command(timeline: &mut Timeline, text: &str) -> CommandOutcome {
    let command = match parse_command(text) {
        Some(command) => command,
        None => {
            tracing::debug!(text, "Command not recognized");
            return CommandOutcome::NotRecognized;
        }
    };
    match &command {
        Command::SplitAt(time) => {
            timeline.split_clip_at(*time);
        }
        Command::DeleteClip { ordinal, ripple } => {
            // Ordinals address whatever is on screen right now: 1-based,
            // ascending start. A stale ordinal is absorbed like a stale id.
            let target = timeline
                .clips_sorted()
                .get(ordinal - 1)
                .map(|clip| clip.id.clone());
            if let Some(id) = target {
                timeline.remove_clip(&id, *ripple);
            }
        }
    }
    tracing::debug!(?command, "Command applied");
    CommandOutcome::Applied(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_split_with_and_without_suffix() {
        assert_eq!(parse_command("split at 5s"), Some(Command::SplitAt(5.0)));
        assert_eq!(parse_command("split at 2.5"), Some(Command::SplitAt(2.5)));
        assert_eq!(parse_command("Split At 3sec"), Some(Command::SplitAt(3.0)));
    }

    #[test]
    fn parses_delete_variants() {
        assert_eq!(
            parse_command("delete clip 2"),
            Some(Command::DeleteClip { ordinal: 2, ripple: false })
        );
        assert_eq!(
            parse_command("ripple delete clip 1"),
            Some(Command::DeleteClip { ordinal: 1, ripple: true })
        );
    }

    #[test]
    fn rejects_garbage_and_malformed_forms() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("make it pop"), None);
        assert_eq!(parse_command("split at banana"), None);
        assert_eq!(parse_command("split at -2s"), None);
        assert_eq!(parse_command("delete clip 0"), None);
        assert_eq!(parse_command("delete clip two"), None);
    }

    #[test]
    fn split_command_cuts_the_timeline() {
        let mut timeline = Timeline::new();
        timeline.add_clip(0.0, 10.0, 0, None, None).unwrap();
        let outcome = apply_command(&mut timeline, "split at 5s");
        assert_eq!(outcome, CommandOutcome::Applied(Command::SplitAt(5.0)));
        assert_eq!(timeline.clip_count(), 2);
    }

    #[test]
    fn delete_command_resolves_ordinal_by_start_order() {
        let mut timeline = Timeline::new();
        let late = timeline.add_clip(5.0, 6.0, 0, None, None).unwrap();
        let early = timeline.add_clip(0.0, 1.0, 0, None, None).unwrap();

        apply_command(&mut timeline, "delete clip 1");
        assert!(timeline.clip(&early).is_none());
        assert!(timeline.clip(&late).is_some());
    }

    #[test]
    fn ripple_delete_command_closes_the_gap() {
        let mut timeline = Timeline::new();
        timeline.add_clip(0.0, 1.0, 0, None, None).unwrap();
        let sibling = timeline.add_clip(1.0, 2.0, 0, None, None).unwrap();

        apply_command(&mut timeline, "ripple delete clip 1");
        let clip = timeline.clip(&sibling).unwrap();
        assert!((clip.start - 0.0).abs() < 1e-9);
        assert!((clip.end - 1.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_ordinal_applies_as_noop() {
        let mut timeline = Timeline::new();
        timeline.add_clip(0.0, 1.0, 0, None, None).unwrap();
        let outcome = apply_command(&mut timeline, "delete clip 9");
        assert!(matches!(outcome, CommandOutcome::Applied(_)));
        assert_eq!(timeline.clip_count(), 1);
    }

    #[test]
    fn unrecognized_text_changes_nothing() {
        let mut timeline = Timeline::new();
        timeline.add_clip(0.0, 1.0, 0, None, None).unwrap();
        let outcome = apply_command(&mut timeline, "do the thing");
        assert_eq!(outcome, CommandOutcome::NotRecognized);
        assert_eq!(timeline.clip_count(), 1);
    }
}
