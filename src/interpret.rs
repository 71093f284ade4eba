//! Flavor text for a finished roll
//!
//! The table never waits on this. A host asks for a reading after a roll
//! settles; whatever goes wrong, the player sees a placeholder line instead.

use thiserror::Error;

/// Why an interpreter could not produce a reading
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InterpretError {
    #[error("no interpreter is configured")]
    Unconfigured,

    #[error("interpreter unavailable: {0}")]
    Unavailable(String),

    #[error("interpreter timed out")]
    Timeout,
}

/// Turns face values into a one-sentence reading
pub trait RollInterpreter {
    fn interpret(&self, values: &[u8]) -> Result<String, InterpretError>;
}

/// Shown when no interpreter is configured
pub const UNCONFIGURED_TEXT: &str = "No oracle is listening.";
/// Shown when the interpreter fails or times out
pub const SILENT_TEXT: &str = "The spirits are silent for now...";
/// Shown when the interpreter answers with nothing
pub const CLOUDED_TEXT: &str = "Fate is clouded...";

/// Overall tone of a roll, by average pips per die
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fortune {
    /// Averaging 2 or less per die
    Misfortune,
    Neutral,
    /// Averaging 5 or more per die
    Triumph,
}

impl Fortune {
    pub fn of(values: &[u8]) -> Self {
        if values.is_empty() {
            return Fortune::Neutral;
        }
        let total: u32 = values.iter().map(|&v| u32::from(v)).sum();
        let dice = values.len() as u32;
        // Compare total against n * threshold to stay in integers
        if total <= dice * 2 {
            Fortune::Misfortune
        } else if total >= dice * 5 {
            Fortune::Triumph
        } else {
            Fortune::Neutral
        }
    }
}

/// Prompt handed to a language-model interpreter
pub fn build_prompt(values: &[u8]) -> String {
    let total: u32 = values.iter().map(|&v| u32::from(v)).sum();
    let listed = values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let tone = match Fortune::of(values) {
        Fortune::Misfortune => "The roll is poor: stress failure or bad luck.",
        Fortune::Triumph => "The roll is excellent: stress a great victory or luck.",
        Fortune::Neutral => "The roll is middling: keep the omen ambiguous.",
    };

    format!(
        "You are a fantasy dungeon master reading omens.\n\
         The player rolled {count} dice: {listed}. Total: {total}.\n\
         Give a single playful, slightly mystical, RPG-flavored sentence of fate for this roll.\n\
         {tone}\n\
         Reply with the sentence only.",
        count = values.len(),
    )
}

/// Ask `interpreter` for a reading, substituting a placeholder on any failure
pub fn interpret_or_placeholder(interpreter: Option<&dyn RollInterpreter>, values: &[u8]) -> String {
    let Some(interpreter) = interpreter else {
        return UNCONFIGURED_TEXT.to_string();
    };

    match interpreter.interpret(values) {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                CLOUDED_TEXT.to_string()
            } else {
                text.to_string()
            }
        }
        Err(InterpretError::Unconfigured) => UNCONFIGURED_TEXT.to_string(),
        Err(e) => {
            log::error!("Roll interpretation failed: {e}");
            SILENT_TEXT.to_string()
        }
    }
}

/// Offline interpreter with one stock line per fortune
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedInterpreter;

impl RollInterpreter for CannedInterpreter {
    fn interpret(&self, values: &[u8]) -> Result<String, InterpretError> {
        let line = match Fortune::of(values) {
            Fortune::Misfortune => "The dice grumble; tread carefully today.",
            Fortune::Neutral => "The path ahead is neither kind nor cruel.",
            Fortune::Triumph => "The dice roar; fortune rides at your side!",
        };
        Ok(line.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing(InterpretError);

    impl RollInterpreter for Failing {
        fn interpret(&self, _values: &[u8]) -> Result<String, InterpretError> {
            Err(self.0.clone())
        }
    }

    struct Echo(&'static str);

    impl RollInterpreter for Echo {
        fn interpret(&self, _values: &[u8]) -> Result<String, InterpretError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_fortune_thresholds() {
        assert_eq!(Fortune::of(&[1, 2]), Fortune::Misfortune);
        assert_eq!(Fortune::of(&[2, 2, 2]), Fortune::Misfortune);
        assert_eq!(Fortune::of(&[3, 4]), Fortune::Neutral);
        assert_eq!(Fortune::of(&[5, 5]), Fortune::Triumph);
        assert_eq!(Fortune::of(&[6, 4]), Fortune::Triumph);
        assert_eq!(Fortune::of(&[]), Fortune::Neutral);
    }

    #[test]
    fn test_prompt_mentions_roll() {
        let prompt = build_prompt(&[6, 5, 6]);
        assert!(prompt.contains("3 dice"));
        assert!(prompt.contains("6, 5, 6"));
        assert!(prompt.contains("Total: 17"));
        assert!(prompt.contains("great victory"));
    }

    #[test]
    fn test_placeholder_when_unconfigured() {
        assert_eq!(interpret_or_placeholder(None, &[3]), UNCONFIGURED_TEXT);
        let unconfigured = Failing(InterpretError::Unconfigured);
        assert_eq!(interpret_or_placeholder(Some(&unconfigured), &[3]), UNCONFIGURED_TEXT);
    }

    #[test]
    fn test_placeholder_on_failure() {
        let down = Failing(InterpretError::Unavailable("503".into()));
        assert_eq!(interpret_or_placeholder(Some(&down), &[3]), SILENT_TEXT);
        let slow = Failing(InterpretError::Timeout);
        assert_eq!(interpret_or_placeholder(Some(&slow), &[3]), SILENT_TEXT);
    }

    #[test]
    fn test_answer_is_trimmed() {
        assert_eq!(
            interpret_or_placeholder(Some(&Echo("  A fine omen.\n")), &[4]),
            "A fine omen."
        );
        assert_eq!(interpret_or_placeholder(Some(&Echo("   ")), &[4]), CLOUDED_TEXT);
    }

    #[test]
    fn test_canned_interpreter_follows_fortune() {
        let canned = CannedInterpreter;
        let low = interpret_or_placeholder(Some(&canned), &[1, 1]);
        let high = interpret_or_placeholder(Some(&canned), &[6, 6]);
        assert_ne!(low, high);
        assert!(high.contains("fortune"));
    }
}
