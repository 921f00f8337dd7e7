use std::sync::{Mutex, MutexGuard};

use crate::config::FetchOrdering;
use crate::domain::environment::Environment;
use crate::domain::ticket::Ticket;

#[derive(Debug, Default)]
struct Slot {
    tickets: Vec<Ticket>,
    busy: bool,
    issued: u64,
    applied: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionSnapshot {
    pub tickets: Vec<Ticket>,
    pub busy: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub dev: PartitionSnapshot,
    pub prod: PartitionSnapshot,
}

impl BoardSnapshot {
    pub fn partition(&self, environment: Environment) -> &PartitionSnapshot {
        match environment {
            Environment::Dev => &self.dev,
            Environment::Prod => &self.prod,
        }
    }
}

/// Last-fetched tickets and busy flag per environment.
#[derive(Debug, Default)]
pub struct EnvironmentStore {
    dev: Mutex<Slot>,
    prod: Mutex<Slot>,
}

impl EnvironmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            dev: self.partition(Environment::Dev),
            prod: self.partition(Environment::Prod),
        }
    }

    pub fn partition(&self, environment: Environment) -> PartitionSnapshot {
        let slot = self.slot(environment);
        PartitionSnapshot {
            tickets: slot.tickets.clone(),
            busy: slot.busy,
        }
    }

    fn slot(&self, environment: Environment) -> MutexGuard<'_, Slot> {
        let slot = match environment {
            Environment::Dev => &self.dev,
            Environment::Prod => &self.prod,
        };
        // Slot updates are single assignments; a poisoned guard still holds a consistent slot.
        slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(super) fn begin_fetch(&self, environment: Environment) -> u64 {
        let mut slot = self.slot(environment);
        slot.busy = true;
        slot.issued += 1;
        slot.issued
    }

    /// Replaces the whole sequence unless `ordering` says the payload is stale.
    pub(super) fn apply(
        &self,
        environment: Environment,
        sequence: u64,
        tickets: Vec<Ticket>,
        ordering: FetchOrdering,
    ) -> bool {
        let mut slot = self.slot(environment);
        if ordering == FetchOrdering::LatestRequest && sequence < slot.applied {
            return false;
        }
        slot.tickets = tickets;
        slot.applied = sequence;
        true
    }

    pub(super) fn settle(&self, environment: Environment) {
        self.slot(environment).busy = false;
    }
}
