use alloc::vec::Vec;
use core::num::Saturating;
use core::time::Duration;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SessionState {
    Exploring,
    InPuzzle,
    Paused,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Exploring
    }
}

/// Which single screen the presentation layer should show. Exactly one is
/// ever visible; the enum makes two simultaneous screens unrepresentable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    Overworld,
    PauseMenu,
    SlidingTiles,
    SpinningDiscs,
    Door,
}

/// Pages of the pause menu, cycled with the paging commands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PausePage {
    Minimap,
    Clues,
    Settings,
}

impl PausePage {
    pub const fn next(self) -> Self {
        match self {
            Self::Minimap => Self::Clues,
            Self::Clues => Self::Settings,
            Self::Settings => Self::Minimap,
        }
    }

    pub const fn prev(self) -> Self {
        match self {
            Self::Minimap => Self::Settings,
            Self::Clues => Self::Minimap,
            Self::Settings => Self::Clues,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleKind {
    SlidingTiles,
    SpinningDiscs,
    Door,
}

/// Puzzle station the player is stepping into. The maze wires each station
/// to the clue slot it awards; the final door awards none.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleRequest {
    SlidingTiles { clue_slot: usize },
    SpinningDiscs { clue_slot: usize },
    Door,
}

/// Typed command table between any input surface and the session. The input
/// mapper translates physical keys and on-screen buttons into these; the
/// session makes no assumption about devices.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    TogglePause,
    PauseNextPage,
    PausePrevPage,
    EnterPuzzle(PuzzleRequest),
    ExitPuzzle,
    SlideTile(u8),
    SpinRing(Ring),
    EditGuess { slot: usize, symbol: Symbol },
    SubmitGuess,
}

/// Opaque cue identifiers handed to the audio/scene-transition services.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cue {
    Paused,
    Resumed,
    Victory,
    Defeat,
}

/// One-way notifications for the presentation layer, drained once per frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Signal {
    ScreenChanged { state: SessionState, screen: Screen },
    ClueRevealed { slot: usize, symbol: Symbol },
    PuzzleSolved(PuzzleKind),
    AudioCue(Cue),
    TimerRatio(f32),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum CommandOutcome {
    NoChange,
    Updated,
}

impl CommandOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Updated => true,
        }
    }
}

/// Puzzle engines live for the whole session, so progress made on a board or
/// disc set is kept when the player backs out and returns later. Engines are
/// created lazily the first time their station is entered.
#[derive(Clone, Debug, Default, PartialEq)]
struct Stations {
    tiles: Option<TilePuzzle>,
    discs: Option<DiscPuzzle>,
    door: DoorPuzzle,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Active {
    kind: PuzzleKind,
    clue_slot: Option<usize>,
}

/// Top-level controller. Exclusively owns the secret, the clue journal, the
/// session timer, and the current screen; puzzle engines only hand outcomes
/// upward and never reach into session internals.
#[derive(Clone, Debug)]
pub struct Session {
    config: SessionConfig,
    secret: SecretCode,
    journal: ClueJournal,
    state: SessionState,
    screen: Screen,
    pause_page: PausePage,
    elapsed: Duration,
    stations: Stations,
    active: Option<Active>,
    move_count: Saturating<u32>,
    signals: Vec<Signal>,
    rng: SmallRng,
}

impl Session {
    /// Starts a fresh session: validates the configuration, seeds the
    /// session generator, and draws the one secret this run is played
    /// against. A defective configuration is fatal for the whole feature.
    pub fn new(config: SessionConfig, seed: u64) -> Result<Self> {
        use rand::prelude::*;

        if let Err(defect) = config.validate() {
            log::error!("session configuration rejected: {}", defect);
            return Err(defect);
        }

        let mut rng = SmallRng::seed_from_u64(seed);
        let secret = RandomSecretGenerator::new(rng.random()).generate();

        let mut session = Self {
            config,
            secret,
            journal: ClueJournal::new(),
            state: SessionState::Exploring,
            screen: Screen::Overworld,
            pause_page: PausePage::Minimap,
            elapsed: Duration::ZERO,
            stations: Stations::default(),
            active: None,
            move_count: Saturating(0),
            signals: Vec::new(),
            rng,
        };
        session.announce_screen();
        Ok(session)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn pause_page(&self) -> PausePage {
        self.pause_page
    }

    pub fn secret(&self) -> &SecretCode {
        &self.secret
    }

    pub fn journal(&self) -> &ClueJournal {
        &self.journal
    }

    /// Clue imagery for the pause-menu clues page.
    pub fn clues(&self) -> [Option<Symbol>; CODE_LENGTH] {
        self.journal.clue_view(&self.secret)
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn timer_ratio(&self) -> f32 {
        self.elapsed.as_secs_f32() / self.config.time_limit.as_secs_f32()
    }

    pub fn move_count(&self) -> u32 {
        self.move_count.0
    }

    pub fn tiles(&self) -> Option<&TilePuzzle> {
        self.stations.tiles.as_ref()
    }

    pub fn discs(&self) -> Option<&DiscPuzzle> {
        self.stations.discs.as_ref()
    }

    pub fn door(&self) -> &DoorPuzzle {
        &self.stations.door
    }

    /// Hands the signals queued since the last drain to the frontend.
    pub fn take_signals(&mut self) -> Vec<Signal> {
        core::mem::take(&mut self.signals)
    }

    /// Routes one input command. Commands that do not apply to the current
    /// screen are absorbed without touching any state; once the session has
    /// been won or lost no further commands are accepted.
    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome> {
        if self.state.is_terminal() {
            return Err(GameError::SessionOver);
        }

        use Command::*;
        match command {
            TogglePause => Ok(self.toggle_pause()),
            PauseNextPage => Ok(self.turn_page(PausePage::next)),
            PausePrevPage => Ok(self.turn_page(PausePage::prev)),
            EnterPuzzle(request) => self.enter_puzzle(request),
            ExitPuzzle => Ok(self.exit_puzzle()),
            SlideTile(tile) => Ok(self.slide_tile(tile)),
            SpinRing(ring) => Ok(self.spin_ring(ring)),
            EditGuess { slot, symbol } => self.edit_guess(slot, symbol),
            SubmitGuess => Ok(self.submit_guess()),
        }
    }

    /// One cooperative frame step. Advances the session timer and the active
    /// puzzle's animations; freezes entirely while paused or after the
    /// session has ended.
    pub fn update(&mut self, dt: Duration) {
        if self.state.is_terminal() || matches!(self.state, SessionState::Paused) {
            return;
        }

        if let Some(active) = self.active {
            if active.kind == PuzzleKind::SlidingTiles {
                if let Some(engine) = self.stations.tiles.as_mut() {
                    engine.update(dt);
                }
            }
        }

        self.elapsed += dt;
        if self.elapsed >= self.config.time_limit {
            self.elapsed = self.config.time_limit;
            self.signals.push(Signal::TimerRatio(1.0));
            log::debug!("session timer expired");
            self.active = None;
            self.transition(SessionState::Lost, Screen::Overworld);
            self.signals.push(Signal::AudioCue(Cue::Defeat));
        } else {
            let ratio = self.timer_ratio();
            self.signals.push(Signal::TimerRatio(ratio));
        }
    }

    /// Marks a clue slot revealed and publishes its symbol for display.
    /// Revealing an already revealed slot changes nothing.
    pub fn reveal_clue(&mut self, slot: usize) -> Result<MarkOutcome> {
        let outcome = self.journal.reveal(slot)?;
        if outcome.has_update() {
            let symbol = self.secret.symbols()[slot];
            log::debug!("clue {} revealed: {:?}", slot, symbol);
            self.signals.push(Signal::ClueRevealed { slot, symbol });
        }
        Ok(outcome)
    }

    fn toggle_pause(&mut self) -> CommandOutcome {
        match self.state {
            SessionState::Exploring => {
                self.pause_page = PausePage::Minimap;
                self.transition(SessionState::Paused, Screen::PauseMenu);
                self.signals.push(Signal::AudioCue(Cue::Paused));
                CommandOutcome::Updated
            }
            SessionState::Paused => {
                self.transition(SessionState::Exploring, Screen::Overworld);
                self.signals.push(Signal::AudioCue(Cue::Resumed));
                CommandOutcome::Updated
            }
            // pausing inside a puzzle backs out to the maze instead
            SessionState::InPuzzle => self.exit_puzzle(),
            SessionState::Won | SessionState::Lost => CommandOutcome::NoChange,
        }
    }

    fn turn_page(&mut self, turn: fn(PausePage) -> PausePage) -> CommandOutcome {
        if !matches!(self.state, SessionState::Paused) {
            return CommandOutcome::NoChange;
        }

        self.pause_page = turn(self.pause_page);
        CommandOutcome::Updated
    }

    fn enter_puzzle(&mut self, request: PuzzleRequest) -> Result<CommandOutcome> {
        use rand::prelude::*;

        if !matches!(self.state, SessionState::Exploring) {
            return Ok(CommandOutcome::NoChange);
        }

        let (kind, clue_slot, screen) = match request {
            PuzzleRequest::SlidingTiles { clue_slot } => {
                let clue_slot = validate_slot(clue_slot)?;
                if self.stations.tiles.is_none() {
                    let seed = self.rng.random();
                    self.stations.tiles = Some(TilePuzzle::new(self.config.tiles, seed)?);
                }
                (PuzzleKind::SlidingTiles, Some(clue_slot), Screen::SlidingTiles)
            }
            PuzzleRequest::SpinningDiscs { clue_slot } => {
                let clue_slot = validate_slot(clue_slot)?;
                if self.stations.discs.is_none() {
                    let seed = self.rng.random();
                    self.stations.discs = Some(DiscPuzzle::new(self.config.discs, seed)?);
                }
                (PuzzleKind::SpinningDiscs, Some(clue_slot), Screen::SpinningDiscs)
            }
            PuzzleRequest::Door => (PuzzleKind::Door, None, Screen::Door),
        };

        self.active = Some(Active { kind, clue_slot });
        self.transition(SessionState::InPuzzle, screen);
        Ok(CommandOutcome::Updated)
    }

    fn exit_puzzle(&mut self) -> CommandOutcome {
        if !matches!(self.state, SessionState::InPuzzle) {
            return CommandOutcome::NoChange;
        }

        // leaving the door always wipes the in-progress guess; accepted
        // board and disc mutations are kept
        self.stations.door.clear();
        self.active = None;
        self.transition(SessionState::Exploring, Screen::Overworld);
        CommandOutcome::Updated
    }

    fn slide_tile(&mut self, tile: u8) -> CommandOutcome {
        let Some(active) = self.active else {
            return CommandOutcome::NoChange;
        };
        if active.kind != PuzzleKind::SlidingTiles {
            return CommandOutcome::NoChange;
        }
        let Some(engine) = self.stations.tiles.as_mut() else {
            return CommandOutcome::NoChange;
        };

        let outcome = engine.slide(tile);
        if outcome.has_update() {
            self.move_count += 1;
        }

        match outcome {
            SlideOutcome::Rejected => CommandOutcome::NoChange,
            SlideOutcome::Moved => CommandOutcome::Updated,
            SlideOutcome::Solved => {
                self.complete_puzzle(PuzzleKind::SlidingTiles, active.clue_slot);
                CommandOutcome::Updated
            }
        }
    }

    fn spin_ring(&mut self, ring: Ring) -> CommandOutcome {
        let Some(active) = self.active else {
            return CommandOutcome::NoChange;
        };
        if active.kind != PuzzleKind::SpinningDiscs {
            return CommandOutcome::NoChange;
        }
        let Some(engine) = self.stations.discs.as_mut() else {
            return CommandOutcome::NoChange;
        };

        let outcome = engine.spin(ring);
        self.move_count += 1;
        if outcome.is_solved() {
            self.complete_puzzle(PuzzleKind::SpinningDiscs, active.clue_slot);
        }

        CommandOutcome::Updated
    }

    fn edit_guess(&mut self, slot: usize, symbol: Symbol) -> Result<CommandOutcome> {
        let slot = validate_slot(slot)?;
        let Some(active) = self.active else {
            return Ok(CommandOutcome::NoChange);
        };
        if active.kind != PuzzleKind::Door {
            return Ok(CommandOutcome::NoChange);
        }

        self.stations.door.edit(slot, symbol)?;
        Ok(CommandOutcome::Updated)
    }

    fn submit_guess(&mut self) -> CommandOutcome {
        let Some(active) = self.active else {
            return CommandOutcome::NoChange;
        };
        if active.kind != PuzzleKind::Door {
            return CommandOutcome::NoChange;
        }

        match self.stations.door.submit(&self.secret) {
            SubmitOutcome::Incomplete => {
                // screen stays open and the guess is left as typed
                log::debug!("door answer is incomplete");
                CommandOutcome::NoChange
            }
            SubmitOutcome::Wrong => {
                log::debug!("door answer is wrong");
                self.stations.door.clear();
                self.active = None;
                self.transition(SessionState::Lost, Screen::Overworld);
                self.signals.push(Signal::AudioCue(Cue::Defeat));
                CommandOutcome::Updated
            }
            SubmitOutcome::Correct => {
                self.stations.door.clear();
                self.active = None;
                self.transition(SessionState::Won, Screen::Overworld);
                self.signals.push(Signal::AudioCue(Cue::Victory));
                CommandOutcome::Updated
            }
        }
    }

    fn complete_puzzle(&mut self, kind: PuzzleKind, clue_slot: Option<usize>) {
        self.signals.push(Signal::PuzzleSolved(kind));
        if let Some(slot) = clue_slot {
            // slot bounds were checked when the station was entered
            let _ = self.reveal_clue(slot);
        }
        self.active = None;
        self.transition(SessionState::Exploring, Screen::Overworld);
    }

    fn transition(&mut self, state: SessionState, screen: Screen) {
        self.state = state;
        self.screen = screen;
        self.announce_screen();
    }

    fn announce_screen(&mut self) {
        self.signals.push(Signal::ScreenChanged {
            state: self.state,
            screen: self.screen,
        });
    }
}
