mod again;
pub mod defs;
mod die;
mod mapping;
mod markov;
mod operators;
pub mod ops;
mod outcome;
mod pool;
mod util;

use std::rc::Rc;

pub use again::{contains_again, replace_agains, Again, AgainEnd, Item, Resolve};
pub use die::{Die, DieWithTruth, Repeat, Repl, Which};
pub use mapping::OutcomeMap;
pub use markov::AbsorbingChain;
pub use outcome::Outcome;
pub use pool::{Pool, Tie};
pub use util::{Error, Map, Result, Weight};

type Ptr<T> = Rc<T>;

/// Default number of times [`Die::explode`] rerolls a selected outcome.
pub const DEFAULT_EXPLODE_DEPTH: u32 = 9;
/// Default cap on reachable states for [`AbsorbingChain`].
pub const MAX_CHAIN_STATES: usize = 4096;
