//! Transfer Plan Entity

use crate::domain::value_objects::TransferStrategyKind;

/// Chosen strategy, ordered sources, and at most one fallback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferPlan {
    pub strategy: TransferStrategyKind,
    /// Project-relative sources; the artifact directory comes first
    pub sources: Vec<String>,
    /// Strategy to use if `strategy` fails; consumed at most once
    pub fallback: Option<TransferStrategyKind>,
}

impl TransferPlan {
    pub fn new(strategy: TransferStrategyKind, sources: Vec<String>) -> Self {
        let fallback = match strategy {
            TransferStrategyKind::DeltaSync => Some(TransferStrategyKind::Archive),
            TransferStrategyKind::Archive => None,
        };
        Self {
            strategy,
            sources,
            fallback,
        }
    }

    /// The plan to run after the primary strategy failed
    ///
    /// The returned plan never has a fallback of its own.
    pub fn fallback_plan(&self) -> Option<TransferPlan> {
        self.fallback.map(|strategy| TransferPlan {
            strategy,
            sources: self.sources.clone(),
            fallback: None,
        })
    }

    /// Primary artifact directory (first source)
    pub fn artifact(&self) -> Option<&str> {
        self.sources.first().map(String::as_str)
    }
}
