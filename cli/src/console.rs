//! Human input as action and target providers.
//!
//! Anything the player types that does not map to a menu entry becomes a
//! [`SelectionError`]; the turn is skipped rather than retried.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use skirmish::encounter::ActorView;
use skirmish::{ActionProvider, PlayerAction, TargetProvider, TurnView};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("no more input")]
    Closed,
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("{choice} is not between 1 and {max}")]
    OutOfRange { choice: usize, max: usize },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Read one 1-based menu choice and return it 0-based.
pub fn read_choice(input: &mut impl BufRead, max: usize) -> Result<usize, SelectionError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(SelectionError::Closed);
    }
    let trimmed = line.trim();
    let choice: usize = trimmed
        .parse()
        .map_err(|_| SelectionError::NotANumber(trimmed.to_string()))?;
    if choice == 0 || choice > max {
        return Err(SelectionError::OutOfRange { choice, max });
    }
    Ok(choice - 1)
}

fn prompt(text: &str) {
    print!("{}", text);
    // a failed flush only delays the prompt
    let _ = io::stdout().flush();
}

fn describe(o: &ActorView) -> String {
    format!(
        "{} HP {}/{} [{}]{}",
        o.name,
        o.hp,
        o.max_hp,
        o.element,
        if o.burning > 0 { " (burning)" } else { "" }
    )
}

/// Action and target prompts reading from the same input.
pub fn console<R: BufRead>(input: R) -> (ConsoleActions<R>, ConsoleTargets<R>) {
    let input = Rc::new(RefCell::new(input));
    (
        ConsoleActions {
            input: Rc::clone(&input),
            echoed: 0,
        },
        ConsoleTargets { input },
    )
}

/// Prompts for the player's action, echoing the journal lines written since
/// the previous prompt.
pub struct ConsoleActions<R> {
    input: Rc<RefCell<R>>,
    echoed: usize,
}

impl<R: BufRead> ConsoleActions<R> {
    /// Journal lines already shown to the player.
    pub fn echoed(&self) -> usize {
        self.echoed
    }

    fn choose(&self, view: &TurnView<'_>) -> Result<PlayerAction, SelectionError> {
        println!("1) attack  2) drink potion  3) shield attack  4) swap weapon");
        prompt("> ");
        let mut input = self.input.borrow_mut();
        match read_choice(&mut *input, 4)? {
            0 => Ok(PlayerAction::Attack),
            1 => Ok(PlayerAction::Heal),
            2 => Ok(PlayerAction::ShieldAttack),
            _ => {
                for (i, w) in view.inventory.iter().enumerate() {
                    println!("{}) {} ({})", i + 1, w.name, w.damage);
                }
                prompt("weapon> ");
                let slot = read_choice(&mut *input, view.inventory.len())?;
                Ok(PlayerAction::SwapWeapon(slot))
            }
        }
    }
}

impl<R: BufRead> ActionProvider for ConsoleActions<R> {
    fn next_action(&mut self, view: &TurnView<'_>) -> PlayerAction {
        for line in view.recent {
            println!("{}", line);
        }
        self.echoed += view.recent.len();

        let p = &view.player;
        println!(
            "-- round {} | {} lvl {} | potions {} | {} ({})",
            view.round,
            describe(p),
            p.level,
            p.potions,
            p.weapon.name,
            p.weapon.damage
        );
        for o in &view.opponents {
            println!("   vs {}", describe(o));
        }

        self.choose(view).unwrap_or_else(|e| {
            println!("invalid selection ({}), turn skipped", e);
            tracing::debug!(error = %e, "selection failed");
            PlayerAction::Pass
        })
    }
}

/// Asks which opponent to hit when more than one is standing.
pub struct ConsoleTargets<R> {
    input: Rc<RefCell<R>>,
}

impl<R: BufRead> TargetProvider for ConsoleTargets<R> {
    fn pick_target(&mut self, view: &TurnView<'_>) -> Option<usize> {
        if view.opponents.len() == 1 {
            return Some(0);
        }
        for (i, o) in view.opponents.iter().enumerate() {
            println!("{}) {}", i + 1, describe(o));
        }
        prompt("target> ");
        match read_choice(&mut *self.input.borrow_mut(), view.opponents.len()) {
            Ok(i) => Some(i),
            Err(e) => {
                println!("invalid selection ({}), turn skipped", e);
                None
            }
        }
    }
}
