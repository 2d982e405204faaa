//! Play command implementation.

use super::CliError;
use std::io::{self, BufRead, Write};
use std::path::Path;
use tracing::{debug, info};
use warden::game::{Command, Orders, Ruleset, TurnState};
use warden::protocol::TurnReader;
use warden::replay::Recording;

/// Execute the play command.
///
/// # Errors
///
/// Returns an error if the rules cannot be loaded, the referee's input is
/// malformed, or the recording cannot be saved.
pub(crate) fn execute(rules: Option<&Path>, save: Option<&Path>) -> Result<(), CliError> {
    let rules = match rules {
        Some(path) => Ruleset::load(path)?,
        None => Ruleset::default(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let recording = run(stdin.lock(), stdout.lock(), rules)?;

    if let Some(path) = save {
        recording.save(path)?;
        info!(path = %path.display(), turns = recording.turns.len(), "recording saved");
    }
    Ok(())
}

/// Play until the input ends, answering every turn on `output`.
///
/// Returns the recording of everything read.
pub(crate) fn run<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    rules: Ruleset,
) -> Result<Recording, CliError> {
    let mut reader = TurnReader::new(input);
    let setup = reader.read_setup()?;
    info!(
        base_x = setup.base_x,
        base_y = setup.base_y,
        heroes = setup.heroes_per_player,
        "match started"
    );

    let mut state = TurnState::new(setup, rules);
    let mut recording = Recording::new(setup, rules);

    while let Some(turn) = reader.read_turn()? {
        state.apply(&turn);
        log_threats(&state);

        for command in plan_turn(&mut state) {
            writeln!(output, "{command}")?;
        }
        output.flush()?;

        recording.push(turn);
    }

    info!(turns = state.turn(), "input ended");
    Ok(recording)
}

/// Label shown in the viewer for heroes with nothing to do.
const IDLE_MESSAGE: &str = "idle";

/// One command per hero.
///
/// This is where a strategy plugs in; without one every hero waits.
fn plan_turn(state: &mut TurnState) -> Vec<Command> {
    let heroes = state.heroes_per_player();
    let orders = Orders::new(state);
    (0..heroes).map(|_| orders.wait(IDLE_MESSAGE)).collect()
}

fn log_threats(state: &TurnState) {
    for monster in state.threats_to_my_base() {
        debug!(
            turn = state.turn(),
            id = monster.id,
            distance = monster.distance_from_my_base(),
            turns_before_hit = ?monster.turns_before_hit(),
            can_hit = monster.can_hit_my_base(),
            shield = monster.shield_life,
            "threat"
        );
    }
}
