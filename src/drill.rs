use crate::{
    config::{Config, MAX_COMBO},
    error::{DrillError, Result, TrackerError},
    keymap::{KeyMap, KeyMapping},
    session::SessionTally,
    tracker::FailureTracker,
};
use rand::Rng;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// The keys shown in one trial: the text to type and the spoken words for it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Combo {
    pub text: String,
    pub words: Vec<String>,
}

impl Combo {
    pub fn from_mappings<'a>(mappings: impl IntoIterator<Item = &'a KeyMapping>) -> Self {
        let (text, words) = mappings
            .into_iter()
            .fold((String::new(), Vec::new()), |(mut text, mut words), m| {
                text.push_str(&m.symbol);
                words.push(m.spoken.clone());
                (text, words)
            });
        Self { text, words }
    }

    /// Number of mappings in the combo
    pub fn keys(&self) -> usize {
        self.words.len()
    }

    /// Number of characters the user has to type
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Settings for combo generation and retry selection
#[derive(Debug, Clone, PartialEq)]
pub struct DrillConfig {
    pub combo: usize,
    pub capital_percentage: u8,
    pub alphabetical: bool,
    pub repetitions: u32,
    pub retry_chance: f64,
    pub retry_low: f64,
    pub retry_high: f64,
}

impl From<&Config> for DrillConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            combo: cfg.combo,
            capital_percentage: cfg.capital_percentage,
            alphabetical: cfg.alphabetical,
            repetitions: cfg.repetitions,
            retry_chance: cfg.retry_chance,
            retry_low: cfg.retry_low,
            retry_high: cfg.retry_high,
        }
    }
}

impl Default for DrillConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Builds fresh combos from a key map
#[derive(Debug, Clone)]
pub struct ComboGenerator {
    keymap: KeyMap,
    combo: usize,
    capital_percentage: u8,
    alphabetical: bool,
    next_index: usize,
}

impl ComboGenerator {
    pub fn new(keymap: KeyMap, config: &DrillConfig) -> Result<Self> {
        if keymap.is_empty() {
            return Err(DrillError::EmptyKeyMap);
        }
        if !(1..=MAX_COMBO).contains(&config.combo) {
            return Err(DrillError::InvalidSetting(format!(
                "combo length must be within 1..={MAX_COMBO}, got {}",
                config.combo
            )));
        }
        Ok(Self {
            keymap,
            combo: config.combo,
            capital_percentage: config.capital_percentage,
            alphabetical: config.alphabetical,
            next_index: 0,
        })
    }

    /// Pick `combo` mappings, walking the map in order when alphabetical.
    /// Each pick is uppercased with `capital_percentage` odds.
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Combo {
        let mut picks = Vec::new();
        for _ in 0..self.combo {
            let idx = if self.alphabetical {
                let idx = self.next_index;
                self.next_index = (self.next_index + 1) % self.keymap.len();
                idx
            } else {
                rng.gen_range(0..self.keymap.len())
            };
            let Some(mapping) = self.keymap.get(idx) else {
                continue;
            };
            if rng.gen_range(0..=100u8) < self.capital_percentage {
                picks.push(mapping.to_uppercase());
            } else {
                picks.push(mapping.clone());
            }
        }
        Combo::from_mappings(&picks)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trial {
    pub combo: Combo,
    /// Replay of a previously failed combo
    pub retry: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrialReport {
    pub passed: bool,
    pub expected: String,
    pub typed: String,
    /// Tracker weight of the combo after recording the outcome
    pub weight: u32,
}

/// A practice session: fresh combos, replays of failed ones, and the tally
#[derive(Debug)]
pub struct Drill<R: Rng> {
    config: DrillConfig,
    generator: ComboGenerator,
    tracker: FailureTracker<Combo>,
    tally: SessionTally,
    rng: R,
}

impl<R: Rng> Drill<R> {
    pub fn new(config: DrillConfig, keymap: KeyMap, rng: R) -> Result<Self> {
        for (name, p) in [
            ("retry_chance", config.retry_chance),
            ("retry_low", config.retry_low),
            ("retry_high", config.retry_high),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(DrillError::InvalidSetting(format!(
                    "{name} must be within [0, 1], got {p}"
                )));
            }
        }
        let tracker = FailureTracker::new(config.repetitions)?;
        let generator = ComboGenerator::new(keymap, &config)?;
        Ok(Self {
            config,
            generator,
            tracker,
            tally: SessionTally::default(),
            rng,
        })
    }

    /// Choose the next combo. Outside alphabetical mode a failed combo is
    /// replayed with `retry_chance` odds while any are tracked.
    pub fn next_trial(&mut self) -> Trial {
        if !self.config.alphabetical
            && !self.tracker.is_empty()
            && self.rng.gen_bool(self.config.retry_chance)
        {
            match self.tracker.sample_with(
                &mut self.rng,
                self.config.retry_low,
                self.config.retry_high,
            ) {
                Ok(Some(combo)) => {
                    debug!(combo = %combo, "replaying failed combo");
                    return Trial { combo, retry: true };
                }
                Ok(None) => {}
                Err(e @ TrackerError::SamplingExhausted { .. }) => {
                    warn!(error = %e, "no failed combo accepted, drawing a fresh one");
                }
                Err(e) => warn!(error = %e, "retry selection failed"),
            }
        }

        Trial {
            combo: self.generator.generate(&mut self.rng),
            retry: false,
        }
    }

    /// Score what was typed for `combo` and feed the outcome to the tracker
    pub fn record(&mut self, combo: &Combo, typed: &str, elapsed: Duration) -> TrialReport {
        let passed = typed == combo.text;
        if passed {
            self.tracker.unfail(combo);
        } else {
            self.tracker.fail(combo.clone());
        }
        self.tally.record(passed, elapsed, combo.keys());

        TrialReport {
            passed,
            expected: combo.text.clone(),
            typed: typed.to_string(),
            weight: self.tracker.weight_of(combo),
        }
    }

    pub fn tally(&self) -> &SessionTally {
        &self.tally
    }

    pub fn tracker(&self) -> &FailureTracker<Combo> {
        &self.tracker
    }

    pub fn config(&self) -> &DrillConfig {
        &self.config
    }
}
