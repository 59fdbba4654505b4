//! Permutation: a bijection on `[0, size)` written in cycle notation.
//!
//! The cycle decomposition is the source of truth; forward and inverse
//! lookup tables are derived from it so that [`Permutation::permute`] and
//! [`Permutation::invert`] are O(1).

use std::fmt;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};

/// A permutation of an [`Alphabet`] expressed as disjoint cycles.
///
/// Symbols absent from every cycle map to themselves.
#[derive(Debug, Clone)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    cycles: Vec<Vec<usize>>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Creates the identity permutation (no cycles).
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        let forward: Vec<usize> = (0..alphabet.size()).collect();
        Permutation {
            inverse: forward.clone(),
            forward,
            alphabet,
            cycles: Vec::new(),
        }
    }

    /// Parses cycle text of the form `"(cccc) (cc) ..."`.
    ///
    /// Whitespace between and inside cycles is ignored.
    ///
    /// # Errors
    /// - [`EnigmaError::Configuration`] for unbalanced or nested parentheses,
    ///   text outside a cycle, or a symbol used in more than one place.
    /// - [`EnigmaError::SymbolNotFound`] for a symbol outside the alphabet.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma::{Alphabet, Permutation};
    ///
    /// let alpha = Arc::new(Alphabet::new("ABCD").unwrap());
    /// let perm = Permutation::parse("(BACD)", alpha).unwrap();
    /// assert_eq!(perm.permute_char('B').unwrap(), 'A');
    /// assert_eq!(perm.invert_char('B').unwrap(), 'D');
    /// ```
    pub fn parse(text: &str, alphabet: Arc<Alphabet>) -> Result<Self> {
        let mut perm = Permutation::identity(alphabet);
        let mut current: Option<String> = None;
        for c in text.chars().filter(|c| !c.is_whitespace()) {
            match c {
                '(' if current.is_some() => {
                    return Err(EnigmaError::config(format!("nested '(' in cycles \"{text}\"")));
                }
                '(' => current = Some(String::new()),
                ')' => match current.take() {
                    Some(cycle) => perm.add_disjoint_cycle(&cycle)?,
                    None => {
                        return Err(EnigmaError::config(format!(
                            "unmatched ')' in cycles \"{text}\""
                        )));
                    }
                },
                c => match current.as_mut() {
                    Some(cycle) => cycle.push(c),
                    None => {
                        return Err(EnigmaError::config(format!(
                            "character '{c}' outside parentheses in cycles \"{text}\""
                        )));
                    }
                },
            }
        }
        if current.is_some() {
            return Err(EnigmaError::config(format!("unclosed '(' in cycles \"{text}\"")));
        }
        Ok(perm)
    }

    /// Appends the cycle `c0 -> c1 -> ... -> cm -> c0`, where `cycle` is
    /// `c0c1...cm`.
    ///
    /// Disjointness against existing cycles is not checked. A symbol already
    /// present in an earlier cycle keeps its earlier mapping.
    ///
    /// # Errors
    /// Returns [`EnigmaError::SymbolNotFound`] for a symbol outside the
    /// alphabet; the permutation is left unchanged.
    pub fn add_cycle(&mut self, cycle: &str) -> Result<()> {
        let indices = cycle
            .chars()
            .map(|c| self.alphabet.to_int(c))
            .collect::<Result<Vec<usize>>>()?;
        if !indices.is_empty() {
            self.cycles.push(indices);
            self.rebuild();
        }
        Ok(())
    }

    /// Like [`add_cycle`](Self::add_cycle) but rejects symbols that are
    /// already mapped by another cycle (or repeated within this one).
    fn add_disjoint_cycle(&mut self, cycle: &str) -> Result<()> {
        let mut seen: Vec<char> = Vec::with_capacity(cycle.len());
        for c in cycle.chars() {
            let index = self.alphabet.to_int(c)?;
            if seen.contains(&c) || self.cycles.iter().any(|cy| cy.contains(&index)) {
                return Err(EnigmaError::config(format!(
                    "character '{c}' appears in more than one cycle position"
                )));
            }
            seen.push(c);
        }
        self.add_cycle(cycle)
    }

    /// Recomputes the lookup tables from the cycle list.
    fn rebuild(&mut self) {
        let size = self.size();
        let mut forward: Vec<Option<usize>> = vec![None; size];
        let mut inverse: Vec<Option<usize>> = vec![None; size];
        for cycle in &self.cycles {
            let len = cycle.len();
            for (pos, &from) in cycle.iter().enumerate() {
                if forward[from].is_none() {
                    forward[from] = Some(cycle[(pos + 1) % len]);
                }
                if inverse[from].is_none() {
                    inverse[from] = Some(cycle[(pos + len - 1) % len]);
                }
            }
        }
        self.forward = forward
            .into_iter()
            .enumerate()
            .map(|(i, to)| to.unwrap_or(i))
            .collect();
        self.inverse = inverse
            .into_iter()
            .enumerate()
            .map(|(i, to)| to.unwrap_or(i))
            .collect();
    }

    /// Returns `p` modulo the size of this permutation, always in `[0, size)`.
    pub fn wrap(&self, p: isize) -> usize {
        p.rem_euclid(self.size() as isize) as usize
    }

    /// Returns the size of the alphabet permuted.
    pub fn size(&self) -> usize {
        self.alphabet.size()
    }

    /// Applies this permutation to `p` modulo the alphabet size.
    pub fn permute(&self, p: isize) -> usize {
        self.forward[self.wrap(p)]
    }

    /// Applies the inverse of this permutation to `c` modulo the alphabet size.
    pub fn invert(&self, c: isize) -> usize {
        self.inverse[self.wrap(c)]
    }

    /// Applies this permutation to the symbol `p`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::SymbolNotFound`] if `p` is not in the alphabet.
    pub fn permute_char(&self, p: char) -> Result<char> {
        let index = self.alphabet.to_int(p)?;
        self.alphabet.to_char(self.forward[index])
    }

    /// Applies the inverse of this permutation to the symbol `c`.
    ///
    /// # Errors
    /// Returns [`EnigmaError::SymbolNotFound`] if `c` is not in the alphabet.
    pub fn invert_char(&self, c: char) -> Result<char> {
        let index = self.alphabet.to_int(c)?;
        self.alphabet.to_char(self.inverse[index])
    }

    /// Returns true iff every symbol appears in some cycle, i.e. the total
    /// cycle length equals the alphabet size. An explicit 1-cycle such as
    /// `(S)` counts as covered.
    pub fn is_derangement(&self) -> bool {
        self.cycles.iter().map(Vec::len).sum::<usize>() == self.size()
    }

    /// Returns true iff applying this permutation twice is the identity,
    /// i.e. every cycle has length one or two.
    pub fn is_involution(&self) -> bool {
        self.forward
            .iter()
            .enumerate()
            .all(|(i, &to)| self.forward[to] == i)
    }

    /// Returns the alphabet this permutation acts on.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Returns the cycles as index sequences, in insertion order.
    pub fn cycles(&self) -> &[Vec<usize>] {
        &self.cycles
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols = self.alphabet.symbols();
        for (n, cycle) in self.cycles.iter().enumerate() {
            if n > 0 {
                write!(f, " ")?;
            }
            write!(f, "(")?;
            for &i in cycle {
                write!(f, "{}", symbols[i])?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}
