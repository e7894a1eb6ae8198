use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    queue,
    style::{Print, Stylize},
    terminal::{disable_raw_mode, enable_raw_mode},
    tty::IsTty,
};
use keydrill::{
    config::{Config, ConfigStore, FileConfigStore},
    drill::{Combo, Drill, DrillConfig, Trial, TrialReport},
    keymap::{KeyMap, MapStyle},
    runtime::{CrosstermEventSource, DrillEventSource, KeyRead, Runner},
    session::SessionTally,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{
    error::Error,
    io::{self, stdin, Write},
    path::PathBuf,
    time::{Duration, Instant},
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;

const TICK_RATE_MS: u64 = 100;
const WORDS_COLUMN: usize = 40;

/// terminal drill for key names that brings back the combos you get wrong
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Shows short combos of keys with their spoken names. Type them as fast as you can, with a speech recognition engine or a physical keyboard. Combos you get wrong come back more often until you get them right."
)]
pub struct Cli {
    /// use the built-in Dragonfly-style mappings instead of a Talon user directory
    #[clap(long)]
    dragonfly: bool,

    /// walk the key map in order instead of picking at random
    #[clap(long)]
    alphabetical: bool,

    /// include punctuation and symbols
    #[clap(long)]
    symbols: bool,

    /// number of keys per combo
    combo: Option<usize>,

    /// percentage of keys shown as capitals
    capitals: Option<u8>,

    /// seed for the random generator (defaults to system entropy)
    seed: Option<u64>,

    /// weight added to a combo each time it is failed
    #[clap(long)]
    repetitions: Option<u32>,

    /// chance that a trial replays a failed combo
    #[clap(long)]
    retry_chance: Option<f64>,

    /// acceptance threshold for the most failed combo when replaying
    #[clap(long)]
    retry_low: Option<f64>,

    /// other end of the replay threshold range
    #[clap(long)]
    retry_high: Option<f64>,

    /// config file to read (and write with --write-config)
    #[clap(long)]
    config: Option<PathBuf>,

    /// save the effective settings to the config file
    #[clap(long)]
    write_config: bool,

    /// log tracker activity to stderr
    #[clap(long)]
    debug: bool,
}

impl Cli {
    /// Overlay command-line values on a loaded config
    fn apply(&self, mut cfg: Config) -> Config {
        if self.dragonfly {
            cfg.style = MapStyle::Dragonfly;
        }
        cfg.alphabetical |= self.alphabetical;
        cfg.symbols |= self.symbols;
        if let Some(combo) = self.combo {
            cfg.combo = combo;
        }
        if let Some(capitals) = self.capitals {
            cfg.capital_percentage = capitals;
        }
        if let Some(repetitions) = self.repetitions {
            cfg.repetitions = repetitions;
        }
        if let Some(p) = self.retry_chance {
            cfg.retry_chance = p;
        }
        if let Some(p) = self.retry_low {
            cfg.retry_low = p;
        }
        if let Some(p) = self.retry_high {
            cfg.retry_high = p;
        }
        cfg
    }

    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

fn init_tracing(debug: bool) {
    let default = if debug { "keydrill=debug" } else { "keydrill=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let store = cli.config_store();
    let config = cli.apply(store.load());
    if let Err(e) = config.validate() {
        Cli::command().error(ErrorKind::InvalidValue, e).exit();
    }
    if cli.write_config {
        store.save(&config)?;
        info!(path = %store.path().display(), "saved config");
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let keymap = KeyMap::load(&config.key_map_sources());
    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut drill = Drill::new(DrillConfig::from(&config), keymap, rng)?;
    info!(style = %config.style, combo = config.combo, "starting drill");

    println!(
        "Press the {} shown keys as fast as you can, using either a speech recognition engine or a physical keyboard! (Esc to quit)",
        config.combo
    );
    println!();

    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );
    let mut stdout = io::stdout();

    let raw_mode = RawModeGuard::enable()?;
    let result = run_drill(&mut drill, &runner, &mut stdout);
    raw_mode.restore()?;
    result?;

    print_summary(drill.tally());
    Ok(())
}

/// Keeps the terminal in raw mode until dropped, including on panic
struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self { active: true })
    }

    fn restore(mut self) -> io::Result<()> {
        self.active = false;
        disable_raw_mode()
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.active {
            if let Err(e) = disable_raw_mode() {
                warn!(error = %e, "failed to leave raw mode");
            }
        }
    }
}

fn run_drill<R: Rng, E: DrillEventSource, W: Write>(
    drill: &mut Drill<R>,
    runner: &Runner<E>,
    out: &mut W,
) -> io::Result<()> {
    loop {
        let Trial { combo, retry } = drill.next_trial();
        render_prompt(out, &combo, retry)?;

        let started = Instant::now();
        let read = runner.read_keys(combo.char_count(), None, |c| {
            if let Err(e) = echo(out, c) {
                warn!(error = %e, key = %c, "failed to echo key");
            }
        });
        let typed = match read {
            KeyRead::Typed(typed) => typed,
            KeyRead::Quit => {
                queue!(out, Print("\r\n"))?;
                out.flush()?;
                return Ok(());
            }
        };

        let report = drill.record(&combo, &typed, started.elapsed());
        render_report(out, &report, drill.tally())?;
    }
}

fn echo<W: Write>(out: &mut W, c: char) -> io::Result<()> {
    queue!(out, Print(c))?;
    out.flush()
}

fn render_prompt<W: Write>(out: &mut W, combo: &Combo, retry: bool) -> io::Result<()> {
    let pad = WORDS_COLUMN.saturating_sub(combo.text.width()).max(1);
    let words = combo.words.join("  ");
    queue!(out, Print(&combo.text), Print(" ".repeat(pad)), Print(words))?;
    if retry {
        queue!(out, Print("   (again)".dark_grey()))?;
    }
    queue!(out, Print("\r\n"))?;
    out.flush()
}

fn render_report<W: Write>(
    out: &mut W,
    report: &TrialReport,
    tally: &SessionTally,
) -> io::Result<()> {
    queue!(out, Print("\r\n"))?;
    if report.passed {
        let line = format!(
            "Correct.{}Tally: {} correct = {:.1}% WER. Speed: {:.2} s/key",
            " ".repeat(WORDS_COLUMN - "Correct.".len()),
            tally.correct,
            tally.word_error_rate().unwrap_or(0.0),
            tally.averaged_speed.unwrap_or(0.0),
        );
        queue!(out, Print(line.green()))?;
    } else {
        let line = format!(
            "### WRONG! ###### {:?} {:?} ############ Tally: {} correct, {} wrong. ###",
            report.expected, report.typed, tally.correct, tally.wrong,
        );
        queue!(out, Print(line.red()))?;
    }
    queue!(out, Print("\r\n\r\n"))?;
    out.flush()
}

fn print_summary(tally: &SessionTally) {
    match tally.word_error_rate() {
        Some(wer) => println!(
            "{} correct, {} wrong ({:.1}% WER), {:.2} s/key",
            tally.correct,
            tally.wrong,
            wer,
            tally.averaged_speed.unwrap_or(0.0)
        ),
        None => println!("No trials completed."),
    }
}
