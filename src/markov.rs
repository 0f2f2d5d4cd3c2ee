use std::collections::{HashMap, VecDeque};

use bon::Builder;
use num::{BigInt, BigRational, Integer, One, Zero};
use tracing::{debug, trace};

use crate::mapping::OutcomeMap;
use crate::util::accumulate;
use crate::{Die, Error, Map, Outcome, Result, Weight, MAX_CHAIN_STATES};

/// Absorption probabilities of a finite Markov chain over outcomes.
///
/// Each state's transition is a die over next states. A state is absorbing
/// when its transition keeps all of its mass on itself; an empty transition
/// discards the mass that reaches it.
#[derive(Clone, Copy, Debug, Builder)]
pub struct AbsorbingChain {
    #[builder(default = MAX_CHAIN_STATES)]
    max_states: usize,
}

impl Default for AbsorbingChain {
    fn default() -> Self {
        Self::builder().build()
    }
}

struct Chain {
    states: Vec<Outcome>,
    index: HashMap<Outcome, usize>,
    transitions: Vec<Die>,
    absorbing: Vec<bool>,
}

impl AbsorbingChain {
    /// Distribution over absorbing states reached from `initial`.
    pub fn solve<F>(&self, initial: &Die, transition: F) -> Result<Die>
    where
        F: Fn(&Outcome) -> Result<Die>,
    {
        let chain = self.explore(initial, &transition)?;
        let transient: Vec<usize> = (0..chain.states.len())
            .filter(|&i| !chain.absorbing[i])
            .collect();
        let absorbing: Vec<usize> = (0..chain.states.len())
            .filter(|&i| chain.absorbing[i])
            .collect();
        debug!(
            transient = transient.len(),
            absorbing = absorbing.len(),
            "solving absorbing chain"
        );

        let absorbed = absorption_matrix(&chain, &transient, &absorbing)?;
        let row_of: HashMap<usize, usize> =
            transient.iter().enumerate().map(|(r, &s)| (s, r)).collect();
        let col_of: HashMap<usize, usize> =
            absorbing.iter().enumerate().map(|(c, &s)| (s, c)).collect();

        let mut probabilities = vec![BigRational::zero(); absorbing.len()];
        let denom = to_rational(initial.denominator());
        for (outcome, weight) in initial {
            if weight.is_zero() {
                continue;
            }
            let p = to_rational(weight) / &denom;
            let state = chain.index[outcome];
            match row_of.get(&state) {
                Some(&row) => {
                    for (col, x) in absorbed[row].iter().enumerate() {
                        probabilities[col] += &p * x;
                    }
                }
                None => probabilities[col_of[&state]] += &p,
            }
        }

        let lcm = probabilities
            .iter()
            .filter(|p| !p.is_zero())
            .fold(BigInt::one(), |acc, p| acc.lcm(p.denom()));
        let mut map = Map::new();
        for (col, p) in probabilities.iter().enumerate() {
            if p.is_zero() {
                continue;
            }
            let weight = (p * BigRational::from_integer(lcm.clone())).to_integer();
            if let Some(weight) = weight.to_biguint() {
                accumulate(&mut map, chain.states[absorbing[col]].clone(), weight);
            }
        }
        Ok(Die::from_map(OutcomeMap::new(map)))
    }

    /// Breadth-first search over states reachable with positive weight.
    fn explore<F>(&self, initial: &Die, transition: &F) -> Result<Chain>
    where
        F: Fn(&Outcome) -> Result<Die>,
    {
        let mut chain = Chain {
            states: Vec::new(),
            index: HashMap::new(),
            transitions: Vec::new(),
            absorbing: Vec::new(),
        };
        let mut queue = VecDeque::new();
        for (outcome, weight) in initial {
            if !weight.is_zero() && !chain.index.contains_key(outcome) {
                chain.index.insert(outcome.clone(), chain.states.len());
                chain.states.push(outcome.clone());
                queue.push_back(outcome.clone());
            }
        }

        while let Some(state) = queue.pop_front() {
            let next = transition(&state)?;
            let absorbing = !next.denominator().is_zero()
                && next.quantity(&state) == *next.denominator();
            trace!(%state, absorbing, "chain state");
            if !absorbing {
                for (outcome, weight) in &next {
                    if weight.is_zero() || chain.index.contains_key(outcome) {
                        continue;
                    }
                    if chain.states.len() >= self.max_states {
                        return Err(Error::TooManyStates(self.max_states));
                    }
                    chain.index.insert(outcome.clone(), chain.states.len());
                    chain.states.push(outcome.clone());
                    queue.push_back(outcome.clone());
                }
            }
            chain.transitions.push(next);
            chain.absorbing.push(absorbing);
        }
        Ok(chain)
    }
}

fn to_rational(x: &Weight) -> BigRational {
    BigRational::from_integer(BigInt::from(x.clone()))
}

/// Solves `(I - Q) X = R` by Gauss-Jordan elimination. Row `r` of the result
/// holds the absorption probabilities starting from `transient[r]`.
fn absorption_matrix(
    chain: &Chain,
    transient: &[usize],
    absorbing: &[usize],
) -> Result<Vec<Vec<BigRational>>> {
    let n = transient.len();
    let m = absorbing.len();
    let row_of: HashMap<usize, usize> =
        transient.iter().enumerate().map(|(r, &s)| (s, r)).collect();
    let col_of: HashMap<usize, usize> =
        absorbing.iter().enumerate().map(|(c, &s)| (s, c)).collect();

    // Augmented matrix [I - Q | R].
    let mut rows = vec![vec![BigRational::zero(); n + m]; n];
    for (r, &state) in transient.iter().enumerate() {
        rows[r][r] = BigRational::one();
        let next = &chain.transitions[state];
        if next.denominator().is_zero() {
            continue;
        }
        let denom = to_rational(next.denominator());
        for (outcome, weight) in next {
            if weight.is_zero() {
                continue;
            }
            let p = to_rational(weight) / &denom;
            let target = chain.index[outcome];
            match row_of.get(&target) {
                Some(&c) => rows[r][c] -= p,
                None => rows[r][n + col_of[&target]] += p,
            }
        }
    }

    for i in 0..n {
        let pivot = (i..n)
            .find(|&j| !rows[j][i].is_zero())
            .ok_or_else(|| Error::NonAbsorbing(chain.states[transient[i]].clone()))?;
        if pivot != i {
            rows.swap(i, pivot);
        }

        let scale = rows[i][i].clone();
        for x in rows[i].iter_mut() {
            *x /= &scale;
        }
        for j in 0..n {
            if j == i || rows[j][i].is_zero() {
                continue;
            }
            let factor = rows[j][i].clone();
            for k in i..n + m {
                let delta = &factor * &rows[i][k];
                rows[j][k] -= delta;
            }
        }
    }

    Ok(rows.into_iter().map(|row| row[n..].to_vec()).collect())
}
