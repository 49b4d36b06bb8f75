//! The statlab mini-games.
//!
//! Each game is a plain state struct: it owns its level list, a [`Progress`]
//! cursor and the current parameter values. Input methods mutate the state
//! and readouts are computed from it on demand, so a readout always reflects
//! the latest input. Front ends drive the games through the [`Game`] trait
//! (level text, gate, completion, advancing) and, for slider-driven games,
//! the [`Tunable`] trait.
//!
//! Games that synthesize data draw it from a [`GameSeed`]; one seed always
//! yields the same data for a given level.
//!
//! # Example
//!
//! ```
//! use statlab_games::{Advance, Game, Tunable, group_guesser::{self, GroupGuesser, GroupParam}};
//!
//! let mut game = GroupGuesser::new(group_guesser::builtin_levels()).unwrap();
//! assert!(!game.gate_open());
//!
//! game.set(GroupParam::MeanDiff, 30.0).unwrap();
//! assert!(game.gate_open());
//! let outcome = game.complete_level().unwrap();
//! assert_eq!(outcome.title, "The Separation");
//! assert_eq!(game.advance().unwrap(), Advance::Next(1));
//! ```

pub use self::{catalog::*, game::*, param::*, progress::*, seed::*};

mod catalog;
mod game;
mod param;
mod progress;
mod seed;

pub mod chi_square;
pub mod cluster_commander;
pub mod factorial_flux;
pub mod group_guesser;
pub mod mirror_match;
pub mod variance_explorer;
