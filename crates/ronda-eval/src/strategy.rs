//! Declarative strategy specifications.

use std::fmt;

use ronda_store::TableKey;
use ronda_traits::{Condition, Result};

use crate::{ConstantScorer, Inputs, Scorer};

/// Builds one condition from a strategy's inputs.
pub type ConditionFn = Box<dyn Fn(&Inputs<'_>) -> Result<Condition> + Send + Sync>;

/// A labelled condition builder.
pub struct ConditionStep {
    label: String,
    build: ConditionFn,
}

impl ConditionStep {
    /// Label used in logs and as the built condition's label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Build the condition.
    ///
    /// # Errors
    ///
    /// Propagates the builder's error.
    pub fn build(&self, inputs: &Inputs<'_>) -> Result<Condition> {
        (self.build)(inputs).map(|c| c.with_label(self.label.clone()))
    }
}

impl fmt::Debug for ConditionStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ConditionStep").field(&self.label).finish()
    }
}

/// A named, versioned screening strategy.
///
/// A strategy declares the tables it reads, an ordered list of condition
/// builders that are ANDed together, and a scorer for the symbols that pass.
/// It holds no data; evaluating it against the same snapshot and date always
/// gives the same result.
///
/// # Example
///
/// ```
/// use ronda_align::CompareOp;
/// use ronda_eval::{ConstantScorer, StrategySpec};
/// use ronda_predicates::threshold;
/// use ronda_store::TableKey;
///
/// let spec = StrategySpec::new("cheap", "1.0.0")
///     .describe("Close below 20")
///     .require([TableKey::Close])
///     .condition("close < 20", |inputs| {
///         threshold(inputs.table(TableKey::Close)?, CompareOp::Lt, 20.0)
///     })
///     .score_with(ConstantScorer::new(1.0));
///
/// assert_eq!(spec.name(), "cheap");
/// assert_eq!(spec.steps().len(), 1);
/// ```
pub struct StrategySpec {
    name: String,
    version: String,
    description: String,
    required: Vec<TableKey>,
    steps: Vec<ConditionStep>,
    scorer: Box<dyn Scorer>,
}

impl StrategySpec {
    /// Start a strategy with no tables, no conditions and a constant scorer.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            description: String::new(),
            required: Vec::new(),
            steps: Vec::new(),
            scorer: Box::new(ConstantScorer::default()),
        }
    }

    /// Set the description.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Declare tables the strategy reads. Duplicates are ignored.
    #[must_use]
    pub fn require(mut self, keys: impl IntoIterator<Item = TableKey>) -> Self {
        for key in keys {
            if !self.required.contains(&key) {
                self.required.push(key);
            }
        }
        self
    }

    /// Append a condition builder.
    #[must_use]
    pub fn condition<F>(mut self, label: impl Into<String>, build: F) -> Self
    where
        F: Fn(&Inputs<'_>) -> Result<Condition> + Send + Sync + 'static,
    {
        self.steps.push(ConditionStep {
            label: label.into(),
            build: Box::new(build),
        });
        self
    }

    /// Replace the scorer.
    #[must_use]
    pub fn score_with(mut self, scorer: impl Scorer + 'static) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    /// Strategy name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Strategy version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Declared tables.
    pub fn required(&self) -> &[TableKey] {
        &self.required
    }

    /// Ordered condition builders.
    pub fn steps(&self) -> &[ConditionStep] {
        &self.steps
    }

    /// The scorer.
    pub fn scorer(&self) -> &dyn Scorer {
        self.scorer.as_ref()
    }
}

impl fmt::Debug for StrategySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StrategySpec")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("required", &self.required)
            .field("steps", &self.steps)
            .field("scorer", &self.scorer)
            .finish()
    }
}
