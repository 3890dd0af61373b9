//! Declared stats and their derivation rules.

use std::collections::{BTreeMap, HashMap};

use super::formula::Formula;
use super::id::StatId;
use super::modifier::StatBounds;
use crate::error::ConfigError;

/// Whether a stat is stored on the actor or computed from other stats.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatKind {
    /// Stored on the actor; `default` is used when the actor has no entry.
    Base { default: f64 },

    /// Computed from other stats. An actor entry for a derived stat is added
    /// on top of the formula result.
    Derived(Formula),
}

/// A declared stat.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatDef {
    pub id: StatId,
    pub kind: StatKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bounds: StatBounds,
}

impl StatDef {
    pub fn base(id: impl Into<StatId>, default: f64) -> Self {
        Self {
            id: id.into(),
            kind: StatKind::Base { default },
            bounds: StatBounds::UNBOUNDED,
        }
    }

    pub fn derived(id: impl Into<StatId>, formula: Formula) -> Self {
        Self {
            id: id.into(),
            kind: StatKind::Derived(formula),
            bounds: StatBounds::UNBOUNDED,
        }
    }

    /// Set clamp bounds (builder pattern).
    pub fn bounded(mut self, bounds: StatBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn formula(&self) -> Option<&Formula> {
        match &self.kind {
            StatKind::Derived(formula) => Some(formula),
            StatKind::Base { .. } => None,
        }
    }

    pub fn is_derived(&self) -> bool {
        matches!(self.kind, StatKind::Derived(_))
    }
}

/// Validated set of stat declarations.
///
/// Construction rejects duplicate ids, inverted bounds, formulas reading
/// undeclared stats and formula cycles, so a cycle found at resolve time can
/// only come from a catalog built around these checks.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StatCatalog {
    defs: BTreeMap<StatId, StatDef>,
}

impl StatCatalog {
    pub fn new(defs: impl IntoIterator<Item = StatDef>) -> Result<Self, ConfigError> {
        let mut map = BTreeMap::new();
        for def in defs {
            if !def.bounds.is_valid() {
                return Err(ConfigError::InvalidBounds {
                    stat: def.id.clone(),
                    min: def.bounds.min,
                    max: def.bounds.max,
                });
            }
            if let Some(formula) = def.formula() {
                if !formula.is_finite() {
                    return Err(ConfigError::InvalidConfig(
                        "formula coefficients must be finite",
                    ));
                }
            }
            if map.contains_key(&def.id) {
                return Err(ConfigError::DuplicateStat(def.id));
            }
            map.insert(def.id.clone(), def);
        }

        let catalog = Self { defs: map };
        catalog.check_inputs()?;
        catalog.check_cycles()?;
        Ok(catalog)
    }

    pub fn get(&self, stat: &str) -> Option<&StatDef> {
        self.defs.get(stat)
    }

    pub fn contains(&self, stat: &str) -> bool {
        self.defs.contains_key(stat)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatDef> {
        self.defs.values()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    fn check_inputs(&self) -> Result<(), ConfigError> {
        for def in self.defs.values() {
            let Some(formula) = def.formula() else {
                continue;
            };
            if let Some(input) = formula.inputs().find(|i| !self.contains(i.as_str())) {
                return Err(ConfigError::UnknownFormulaInput {
                    stat: def.id.clone(),
                    input: input.clone(),
                });
            }
        }
        Ok(())
    }

    /// Depth-first walk over formula inputs; a grey node reached twice is a cycle.
    fn check_cycles(&self) -> Result<(), ConfigError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Visiting,
            Done,
        }

        fn visit<'a>(
            catalog: &'a StatCatalog,
            stat: &'a StatId,
            marks: &mut HashMap<&'a StatId, Mark>,
            path: &mut Vec<&'a StatId>,
        ) -> Result<(), ConfigError> {
            match marks.get(stat) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::Visiting) => {
                    let start = path.iter().position(|s| *s == stat).unwrap_or(0);
                    let mut cycle: Vec<StatId> =
                        path[start..].iter().map(|s| (*s).clone()).collect();
                    cycle.push(stat.clone());
                    return Err(ConfigError::FormulaCycle { path: cycle });
                }
                None => {}
            }

            marks.insert(stat, Mark::Visiting);
            path.push(stat);
            if let Some(formula) = catalog.defs.get(stat).and_then(StatDef::formula) {
                for input in formula.inputs() {
                    visit(catalog, input, marks, path)?;
                }
            }
            path.pop();
            marks.insert(stat, Mark::Done);
            Ok(())
        }

        let mut marks = HashMap::new();
        let mut path = Vec::new();
        for stat in self.defs.keys() {
            visit(self, stat, &mut marks, &mut path)?;
        }
        Ok(())
    }
}
