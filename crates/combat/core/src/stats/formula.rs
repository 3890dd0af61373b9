//! Derived-stat formulas.
//!
//! A formula is a linear combination of other stats:
//!
//! ```text
//! value = constant + Σ coefficient_i × resolve(input_i)
//! ```
//!
//! Coefficients are content data. Only the evaluation mechanism lives here;
//! the inputs are resolved by [`super::StatResolver`], which owns cycle
//! detection.

use super::id::StatId;

/// One weighted input of a [`Formula`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormulaTerm {
    pub input: StatId,
    pub coefficient: f64,
}

impl FormulaTerm {
    pub fn new(input: impl Into<StatId>, coefficient: f64) -> Self {
        Self {
            input: input.into(),
            coefficient,
        }
    }
}

/// Formula for a derived stat, e.g. `attack = strength × 1.0 + level × 0.5`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Formula {
    #[cfg_attr(feature = "serde", serde(default))]
    pub constant: f64,
    pub terms: Vec<FormulaTerm>,
}

impl Formula {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a weighted input (builder pattern).
    pub fn term(mut self, input: impl Into<StatId>, coefficient: f64) -> Self {
        self.terms.push(FormulaTerm::new(input, coefficient));
        self
    }

    /// Set the constant offset (builder pattern).
    pub fn constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    pub fn inputs(&self) -> impl Iterator<Item = &StatId> {
        self.terms.iter().map(|term| &term.input)
    }

    /// Evaluate with a caller-supplied input lookup.
    ///
    /// The first lookup error aborts evaluation.
    pub fn evaluate<E, F>(&self, mut lookup: F) -> Result<f64, E>
    where
        F: FnMut(&StatId) -> Result<f64, E>,
    {
        let mut total = self.constant;
        for term in &self.terms {
            total += term.coefficient * lookup(&term.input)?;
        }
        Ok(total)
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.constant.is_finite() && self.terms.iter().all(|t| t.coefficient.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_linear_combination() {
        let formula = Formula::new()
            .term("strength", 1.5)
            .term("level", 2.0)
            .constant(3.0);

        let value = formula
            .evaluate::<(), _>(|input| match input.as_str() {
                "strength" => Ok(10.0),
                "level" => Ok(4.0),
                _ => Err(()),
            })
            .unwrap();

        assert_eq!(value, 3.0 + 15.0 + 8.0);
    }

    #[test]
    fn lookup_error_propagates() {
        let formula = Formula::new().term("missing", 1.0);
        assert_eq!(formula.evaluate(|_| Err("nope")), Err("nope"));
    }
}
