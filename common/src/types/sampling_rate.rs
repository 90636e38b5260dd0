use std::time::Duration;

use serde::{Deserialize, Serialize};

const GAME_PERIOD_MICROS: u64 = 20_000;
const UI_PERIOD_MICROS: u64 = 60_000;
const NORMAL_PERIOD_MICROS: u64 = 200_000;

/// Requested (not guaranteed) delivery rate of hardware callbacks.
///
/// ```
/// use common::SamplingRate;
/// use std::time::Duration;
///
/// assert_eq!(SamplingRate::Ui.period(), Duration::from_millis(60));
/// assert_eq!(SamplingRate::Custom { period_micros: 5_000 }.period(), Duration::from_millis(5));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingRate {
    Fastest,
    Game,
    #[default]
    Ui,
    Normal,
    Custom {
        period_micros: u64,
    },
}

impl SamplingRate {
    pub fn period(&self) -> Duration {
        let micros = match self {
            SamplingRate::Fastest => 0,
            SamplingRate::Game => GAME_PERIOD_MICROS,
            SamplingRate::Ui => UI_PERIOD_MICROS,
            SamplingRate::Normal => NORMAL_PERIOD_MICROS,
            SamplingRate::Custom { period_micros } => *period_micros,
        };
        Duration::from_micros(micros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_ui() {
        assert_eq!(SamplingRate::default(), SamplingRate::Ui);
    }

    #[test]
    fn test_periods_are_ordered() {
        assert!(SamplingRate::Fastest.period() < SamplingRate::Game.period());
        assert!(SamplingRate::Game.period() < SamplingRate::Ui.period());
        assert!(SamplingRate::Ui.period() < SamplingRate::Normal.period());
    }

    #[test]
    fn test_deserialize() {
        let rate: SamplingRate = serde_json::from_str("\"game\"").unwrap();
        assert_eq!(rate, SamplingRate::Game);

        let rate: SamplingRate =
            serde_json::from_str(r#"{"custom": {"period_micros": 1000}}"#).unwrap();
        assert_eq!(rate.period(), Duration::from_millis(1));
    }
}
