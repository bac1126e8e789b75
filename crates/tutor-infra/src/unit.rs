//! Transactional unit of work.
//!
//! A [`SqlUnit`] collects pending inserts, updates and removals of one
//! aggregate type and flushes them through that type's [`DataMapper`] inside a
//! single transaction. Inserts run first, then updates, then deletes. Any
//! failure, cancellation or timeout rolls the whole transaction back.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sea_orm::{DatabaseTransaction, DbConn, IsolationLevel, TransactionTrait};
use tokio_util::sync::CancellationToken;

use tutor_core::domain::{Account, Aggregate, Identified};
use tutor_core::error::UnitError;
use tutor_core::ports::{UnitOfWork, UnitState, Uniter};

use crate::database::{AccountDataMapper, DataMapper};

/// Settings applied to every unit handed out by a [`SqlUniter`].
#[derive(Debug, Clone, Default)]
pub struct UnitConfig {
    /// Upper bound on flushing the pending sets. `None` waits indefinitely.
    pub save_timeout: Option<Duration>,
    /// Isolation level of the save transaction. `None` uses the database
    /// default.
    pub isolation: Option<IsolationLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Addition,
    Alteration,
    Removal,
}

/// Unit of work backed by one SeaORM transaction per save.
pub struct SqlUnit<A: Aggregate> {
    db: DbConn,
    mapper: Arc<dyn DataMapper<A>>,
    config: UnitConfig,
    additions: Vec<A>,
    alterations: Vec<A>,
    removals: Vec<A>,
    state: UnitState,
}

impl<A: Aggregate> SqlUnit<A> {
    pub fn new(db: DbConn, mapper: Arc<dyn DataMapper<A>>, config: UnitConfig) -> Self {
        Self {
            db,
            mapper,
            config,
            additions: Vec::new(),
            alterations: Vec::new(),
            removals: Vec::new(),
            state: UnitState::Open,
        }
    }

    /// Aggregates waiting to be inserted.
    pub fn additions(&self) -> &[A] {
        &self.additions
    }

    /// Aggregates waiting to be updated.
    pub fn alterations(&self) -> &[A] {
        &self.alterations
    }

    /// Aggregates waiting to be deleted.
    pub fn removals(&self) -> &[A] {
        &self.removals
    }

    fn pending(&self, kind: Pending) -> &[A] {
        match kind {
            Pending::Addition => &self.additions,
            Pending::Alteration => &self.alterations,
            Pending::Removal => &self.removals,
        }
    }

    fn pending_mut(&mut self, kind: Pending) -> &mut Vec<A> {
        match kind {
            Pending::Addition => &mut self.additions,
            Pending::Alteration => &mut self.alterations,
            Pending::Removal => &mut self.removals,
        }
    }

    fn ensure_open(&self) -> Result<(), UnitError> {
        match self.state {
            UnitState::Open => Ok(()),
            closed => Err(UnitError::Closed(closed)),
        }
    }

    /// Track `aggregate` in exactly one pending set. Re-registering in the
    /// same set replaces the earlier state.
    fn register(&mut self, kind: Pending, aggregate: A) -> Result<(), UnitError> {
        self.ensure_open()?;

        let id = aggregate.identity();
        let elsewhere = [Pending::Addition, Pending::Alteration, Pending::Removal]
            .into_iter()
            .filter(|other| *other != kind)
            .any(|other| self.pending(other).iter().any(|a| a.identity() == id));
        if elsewhere {
            return Err(UnitError::AlreadyRegistered { id });
        }

        let set = self.pending_mut(kind);
        match set.iter_mut().find(|a| a.identity() == id) {
            Some(slot) => *slot = aggregate,
            None => set.push(aggregate),
        }
        Ok(())
    }

    #[tracing::instrument(
        name = "unit_save",
        skip_all,
        fields(
            kind = A::KIND,
            additions = self.additions.len(),
            alterations = self.alterations.len(),
            removals = self.removals.len(),
        )
    )]
    async fn commit(&self, cancel: &CancellationToken) -> Result<(), UnitError> {
        let txn = self
            .db
            .begin_with_config(self.config.isolation, None)
            .await
            .map_err(|e| UnitError::Storage(e.to_string()))?;

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(UnitError::Cancelled),
            result = self.flush_within_deadline(&txn) => result,
        };

        match outcome {
            Ok(()) => txn
                .commit()
                .await
                .map_err(|e| UnitError::Storage(e.to_string())),
            Err(err) => {
                if let Err(rollback) = txn.rollback().await {
                    tracing::error!(error = %rollback, "Rollback failed");
                }
                Err(err)
            }
        }
    }

    async fn flush_within_deadline(&self, txn: &DatabaseTransaction) -> Result<(), UnitError> {
        match self.config.save_timeout {
            Some(limit) => tokio::time::timeout(limit, self.flush(txn))
                .await
                .map_err(|_| UnitError::TimedOut(limit))?,
            None => self.flush(txn).await,
        }
    }

    async fn flush(&self, txn: &DatabaseTransaction) -> Result<(), UnitError> {
        if !self.additions.is_empty() {
            self.mapper.insert(txn, &self.additions).await?;
        }
        if !self.alterations.is_empty() {
            self.mapper.update(txn, &self.alterations).await?;
        }
        if !self.removals.is_empty() {
            self.mapper.delete(txn, &self.removals).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl<A: Aggregate> UnitOfWork<A> for SqlUnit<A> {
    fn add(&mut self, aggregate: A) -> Result<(), UnitError> {
        self.register(Pending::Addition, aggregate)
    }

    fn alter(&mut self, aggregate: A) -> Result<(), UnitError> {
        self.register(Pending::Alteration, aggregate)
    }

    fn remove(&mut self, aggregate: A) -> Result<(), UnitError> {
        self.register(Pending::Removal, aggregate)
    }

    async fn save(&mut self, cancel: &CancellationToken) -> Result<(), UnitError> {
        self.ensure_open()?;

        match self.commit(cancel).await {
            Ok(()) => {
                self.additions.clear();
                self.alterations.clear();
                self.removals.clear();
                self.state = UnitState::Saved;
                tracing::info!(kind = A::KIND, "Unit of work saved");
                Ok(())
            }
            Err(err) => {
                self.state = UnitState::Failed;
                tracing::warn!(kind = A::KIND, error = %err, "Unit of work rolled back");
                Err(err)
            }
        }
    }

    fn state(&self) -> UnitState {
        self.state
    }
}

/// Factory for [`SqlUnit`]s sharing one pool, mapper and configuration.
pub struct SqlUniter<A: Aggregate> {
    db: DbConn,
    mapper: Arc<dyn DataMapper<A>>,
    config: UnitConfig,
}

impl<A: Aggregate> SqlUniter<A> {
    pub fn new(db: DbConn, mapper: Arc<dyn DataMapper<A>>, config: UnitConfig) -> Self {
        Self { db, mapper, config }
    }
}

impl SqlUniter<Account> {
    /// Uniter wired with the [`AccountDataMapper`].
    pub fn accounts(db: DbConn, config: UnitConfig) -> Self {
        Self::new(db, Arc::new(AccountDataMapper::new()), config)
    }
}

impl<A: Aggregate> Uniter<A> for SqlUniter<A> {
    type Unit = SqlUnit<A>;

    fn unit(&self) -> SqlUnit<A> {
        SqlUnit::new(self.db.clone(), Arc::clone(&self.mapper), self.config.clone())
    }
}
