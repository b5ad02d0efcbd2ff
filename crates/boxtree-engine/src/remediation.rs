//! Remediation plans: ordered lists of transformations to apply to a
//! document.
//!
//! A plan is data, not code. Each step names one of a fixed set of actions
//! and its block indices:
//!
//! ```json
//! [
//!   {"action": "single-row-table", "first_block": 3, "block_count": 3},
//!   {"action": "heading", "first_block": 0, "block_count": 2},
//!   {"action": "decorative-image", "block": 5, "inline": 0}
//! ]
//! ```

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::TreeError;
use crate::transform::{self, Vocabulary};
use crate::tree::BoxNode;
use crate::walker::TreeWalker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum Remediation {
    /// A layout table with one row whose cells are really consecutive blocks.
    SingleRowTable { first_block: usize, block_count: usize },
    /// Blocks that are visually, but not structurally, a heading.
    Heading { first_block: usize, block_count: usize },
    /// An image that carries no information.
    DecorativeImage {
        block: usize,
        #[serde(default)]
        inline: Option<usize>,
    },
}

impl Remediation {
    /// Run the transformation on `walker`, returning the new root.
    pub fn apply(&self, walker: &mut TreeWalker, vocabulary: &Vocabulary) -> Result<BoxNode, TreeError> {
        match *self {
            Remediation::SingleRowTable {
                first_block,
                block_count,
            } => transform::transform_single_row_table(walker, vocabulary, first_block, block_count),
            Remediation::Heading {
                first_block,
                block_count,
            } => transform::markup_heading(walker, vocabulary, first_block, block_count),
            Remediation::DecorativeImage { block, inline } => {
                transform::remove_image(walker, vocabulary, block, inline)
            }
        }
    }
}

/// What `apply_plan` does when a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failing step.
    #[default]
    Abort,
    /// Record the failure and carry on from the last good root.
    Skip,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("remediation step {index} ({remediation:?}) failed: {source}")]
pub struct PlanError {
    pub index: usize,
    pub remediation: Remediation,
    pub source: TreeError,
}

/// Outcome of a plan run.
#[derive(Debug)]
pub struct PlanReport {
    /// Root after the last step that succeeded.
    pub root: BoxNode,
    /// Indices of the steps that were applied.
    pub applied: Vec<usize>,
    pub failures: Vec<PlanError>,
}

impl PlanReport {
    /// The final root, or the first failure.
    pub fn into_result(self) -> Result<BoxNode, PlanError> {
        match self.failures.into_iter().next() {
            Some(failure) => Err(failure),
            None => Ok(self.root),
        }
    }
}

/// Apply `plan` to `root` step by step.
///
/// Every step runs on a fresh walker over the root left by the previous
/// successful step, so a failing step never leaves partial writes behind.
pub fn apply_plan(
    root: BoxNode,
    plan: &[Remediation],
    vocabulary: &Vocabulary,
    policy: FailurePolicy,
) -> PlanReport {
    let mut report = PlanReport {
        root,
        applied: Vec::new(),
        failures: Vec::new(),
    };
    for (index, remediation) in plan.iter().enumerate() {
        let mut walker = TreeWalker::new(report.root.clone());
        match remediation.apply(&mut walker, vocabulary) {
            Ok(root) => {
                info!("step {index} applied");
                report.root = root;
                report.applied.push(index);
            }
            Err(source) => {
                warn!("step {index} failed: {source}");
                report.failures.push(PlanError {
                    index,
                    remediation: *remediation,
                    source,
                });
                if policy == FailurePolicy::Abort {
                    break;
                }
            }
        }
    }
    report
}
