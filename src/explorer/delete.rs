//! Delete coordination shared by the context-menu and bulk delete actions.
//!
//! A batch moves through
//! `Idle -> Probing -> (AwaitingConfirmation | ready) -> Deleting -> Idle`.
//! Directories are probed one at a time; if any of them is not provably
//! empty the whole batch waits for the confirmation phrase. Nothing is
//! deleted before that decision. Deletions then run one after another and
//! stop at the first failure without undoing earlier ones.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use super::effect::{Effect, Request};
use crate::error::StorageError;
use crate::models::EntryKey;
use crate::storage::RemotePath;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOrigin {
    ContextMenu,
    Bulk,
}

/// A delete waiting on probes or on the user's confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub path: RemotePath,
    pub targets: Vec<EntryKey>,
    pub origin: DeleteOrigin,
    pub confirmation_required: bool,
}

impl PendingDelete {
    fn directories(&self) -> impl Iterator<Item = &EntryKey> {
        self.targets.iter().filter(|t| t.is_dir)
    }

    /// Files go out as one batched call placed where the first file sits in
    /// target order; directories follow target order.
    fn steps(&self) -> VecDeque<DeleteStep> {
        let files: Vec<String> = self
            .targets
            .iter()
            .filter(|t| !t.is_dir)
            .map(|t| t.name.clone())
            .collect();

        let mut steps = VecDeque::new();
        let mut files = Some(files).filter(|f| !f.is_empty());
        for target in &self.targets {
            if target.is_dir {
                steps.push_back(DeleteStep::Directory(target.name.clone()));
            } else if let Some(names) = files.take() {
                steps.push_back(DeleteStep::Files(names));
            }
        }
        steps
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteStep {
    Files(Vec<String>),
    Directory(String),
}

impl DeleteStep {
    fn request(&self, path: &RemotePath) -> Effect {
        match self {
            DeleteStep::Files(names) => Request::DeleteFiles {
                path: path.clone(),
                names: names.clone(),
            },
            DeleteStep::Directory(name) => Request::DeleteDirectory {
                path: path.clone(),
                name: name.clone(),
                confirmed: true,
            },
        }
        .into()
    }

    fn len(&self) -> usize {
        match self {
            DeleteStep::Files(names) => names.len(),
            DeleteStep::Directory(_) => 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeletePhase {
    #[default]
    Idle,
    Probing {
        pending: PendingDelete,
        /// Index among the batch's directories of the probe in flight.
        next: usize,
    },
    AwaitingConfirmation(PendingDelete),
    Deleting {
        path: RemotePath,
        current: DeleteStep,
        remaining: VecDeque<DeleteStep>,
        deleted: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    Accepted(Effect),
    /// The typed phrase was wrong; the batch was dropped untouched.
    Mismatch,
    NothingPending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Continue(Effect),
    Finished {
        deleted: usize,
        failure: Option<StorageError>,
    },
    Ignored,
}

#[derive(Debug, Clone)]
pub struct DeleteCoordinator {
    phase: DeletePhase,
    phrase: String,
    always_confirm_bulk: bool,
}

impl DeleteCoordinator {
    pub fn new(phrase: &str, always_confirm_bulk: bool) -> Self {
        Self {
            phase: DeletePhase::Idle,
            phrase: phrase.to_string(),
            always_confirm_bulk,
        }
    }

    pub fn phase(&self) -> &DeletePhase {
        &self.phase
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == DeletePhase::Idle
    }

    pub fn awaiting_confirmation(&self) -> Option<&PendingDelete> {
        match &self.phase {
            DeletePhase::AwaitingConfirmation(pending) => Some(pending),
            _ => None,
        }
    }

    /// Starts a batch. Returns the first request to run, or `None` when the
    /// batch went straight to confirmation or was refused.
    pub fn request(
        &mut self,
        path: RemotePath,
        targets: Vec<EntryKey>,
        origin: DeleteOrigin,
    ) -> Option<Effect> {
        if !self.is_idle() {
            warn!("Delete requested while another batch is active; ignoring");
            return None;
        }
        if targets.is_empty() {
            return None;
        }

        let pending = PendingDelete {
            path,
            targets,
            origin,
            confirmation_required: origin == DeleteOrigin::Bulk && self.always_confirm_bulk,
        };
        info!(
            "Delete requested for {} item(s) in {} ({:?})",
            pending.targets.len(),
            pending.path,
            origin
        );
        self.probe_from(pending, 0)
    }

    /// Feeds the result of the probe in flight. Any error counts as "not
    /// provably empty".
    pub fn probe_finished(
        &mut self,
        probed: &RemotePath,
        children: Result<usize, StorageError>,
    ) -> Option<Effect> {
        let (mut pending, next) = match std::mem::take(&mut self.phase) {
            DeletePhase::Probing { pending, next } => (pending, next),
            other => {
                debug!("Probe result for {} arrived outside probing; dropped", probed);
                self.phase = other;
                return None;
            }
        };

        let empty = match children {
            Ok(0) => true,
            Ok(count) => {
                debug!("{} has {} children", probed, count);
                false
            }
            Err(err) => {
                warn!("Emptiness probe of {} failed: {}; assuming not empty", probed, err);
                false
            }
        };
        pending.confirmation_required |= !empty;
        self.probe_from(pending, next + 1)
    }

    /// Probes the directory at `index`, or decides once all are probed.
    fn probe_from(&mut self, pending: PendingDelete, index: usize) -> Option<Effect> {
        let probe_path = pending
            .directories()
            .nth(index)
            .map(|dir| pending.path.descend(&dir.name));

        match probe_path {
            Some(Ok(path)) => {
                debug!("Probing {} for emptiness", path);
                self.phase = DeletePhase::Probing {
                    pending,
                    next: index,
                };
                Some(Request::Probe { path }.into())
            }
            Some(Err(err)) => {
                warn!("Cannot probe directory: {}; assuming not empty", err);
                let mut pending = pending;
                pending.confirmation_required = true;
                self.probe_from(pending, index + 1)
            }
            None if pending.confirmation_required => {
                info!("Delete in {} awaits confirmation", pending.path);
                self.phase = DeletePhase::AwaitingConfirmation(pending);
                None
            }
            None => self.start_deleting(&pending),
        }
    }

    /// Checks the typed phrase against the required one. Only an exact
    /// match proceeds; anything else drops the batch.
    pub fn confirm(&mut self, input: &str) -> ConfirmOutcome {
        let pending = match std::mem::take(&mut self.phase) {
            DeletePhase::AwaitingConfirmation(pending) => pending,
            other => {
                self.phase = other;
                return ConfirmOutcome::NothingPending;
            }
        };

        if input != self.phrase {
            info!("Confirmation phrase mismatch; delete cancelled");
            return ConfirmOutcome::Mismatch;
        }
        match self.start_deleting(&pending) {
            Some(effect) => ConfirmOutcome::Accepted(effect),
            None => ConfirmOutcome::NothingPending,
        }
    }

    /// Dismisses a batch that is waiting for confirmation.
    pub fn cancel(&mut self) -> bool {
        if self.awaiting_confirmation().is_some() {
            info!("Delete cancelled by user");
            self.phase = DeletePhase::Idle;
            true
        } else {
            false
        }
    }

    fn start_deleting(&mut self, pending: &PendingDelete) -> Option<Effect> {
        let mut remaining = pending.steps();
        let current = remaining.pop_front()?;
        let effect = current.request(&pending.path);
        self.phase = DeletePhase::Deleting {
            path: pending.path.clone(),
            current,
            remaining,
            deleted: 0,
        };
        Some(effect)
    }

    /// Feeds the result of the delete request in flight.
    pub fn step_finished(&mut self, result: Result<(), StorageError>) -> StepOutcome {
        let (path, current, mut remaining, deleted) = match std::mem::take(&mut self.phase) {
            DeletePhase::Deleting {
                path,
                current,
                remaining,
                deleted,
            } => (path, current, remaining, deleted),
            other => {
                self.phase = other;
                return StepOutcome::Ignored;
            }
        };

        if let Err(err) = result {
            warn!("Delete of {:?} in {} failed: {}; stopping batch", current, path, err);
            return StepOutcome::Finished {
                deleted,
                failure: Some(err),
            };
        }

        let deleted = deleted + current.len();
        match remaining.pop_front() {
            Some(next) => {
                let effect = next.request(&path);
                self.phase = DeletePhase::Deleting {
                    path,
                    current: next,
                    remaining,
                    deleted,
                };
                StepOutcome::Continue(effect)
            }
            None => {
                info!("Delete batch in {} finished ({} item(s))", path, deleted);
                StepOutcome::Finished {
                    deleted,
                    failure: None,
                }
            }
        }
    }
}
