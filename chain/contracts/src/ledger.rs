//! Ledger storage
//!
//! Balance table keyed by (asset kind, holder), the aggregate
//! unit-of-account total and the operation counters.
//!
//! Mutations can be staged: [`LedgerStore::begin`] opens a checkpoint and
//! every mutation made while any checkpoint is open is recorded in an undo
//! journal. [`LedgerStore::rollback`] replays the journal backwards to the
//! checkpoint, which also reverts whatever nested calls did inside the
//! window. Checkpoints nest and must be closed in LIFO order.

use std::collections::HashMap;

use tracing::warn;
use vault_types::asset::AssetKind;
use vault_types::ids::HolderId;
use vault_types::numeric::{NativeAmount, UoaAmount};

use crate::errors::LedgerError;

/// Handle for an open staging window.
#[must_use = "a checkpoint must be committed or rolled back"]
#[derive(Debug, PartialEq, Eq)]
pub struct Checkpoint {
    mark: usize,
    depth: usize,
}

#[derive(Debug, Clone)]
enum Undo {
    Balance {
        asset: AssetKind,
        holder: HolderId,
        previous: Option<NativeAmount>,
    },
    AggregateTotal(UoaAmount),
    DepositCount(u64),
    WithdrawalCount(u64),
}

#[derive(Debug, Default)]
pub struct LedgerStore {
    balances: HashMap<(AssetKind, HolderId), NativeAmount>,
    aggregate_total: UoaAmount,
    deposit_count: u64,
    withdrawal_count: u64,
    journal: Vec<Undo>,
    open: usize,
}

impl LedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `holder` in `asset`; zero when never touched.
    pub fn balance(&self, asset: AssetKind, holder: &HolderId) -> NativeAmount {
        self.balances.get(&(asset, *holder)).copied().unwrap_or(0)
    }

    pub fn aggregate_total(&self) -> UoaAmount {
        self.aggregate_total
    }

    pub fn deposit_count(&self) -> u64 {
        self.deposit_count
    }

    pub fn withdrawal_count(&self) -> u64 {
        self.withdrawal_count
    }

    pub fn is_staging(&self) -> bool {
        self.open > 0
    }

    // ── Mutations ──────────────────────────────────────────────

    pub fn credit(
        &mut self,
        asset: AssetKind,
        holder: HolderId,
        amount: NativeAmount,
    ) -> Result<NativeAmount, LedgerError> {
        let current = self.balance(asset, &holder);
        let updated = current.checked_add(amount).ok_or(LedgerError::MathOverflow)?;
        self.set_balance(asset, holder, updated);
        Ok(updated)
    }

    pub fn debit(
        &mut self,
        asset: AssetKind,
        holder: HolderId,
        amount: NativeAmount,
    ) -> Result<NativeAmount, LedgerError> {
        let current = self.balance(asset, &holder);
        let updated = current
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                holder,
                asset,
                requested: amount,
                available: current,
            })?;
        self.set_balance(asset, holder, updated);
        Ok(updated)
    }

    pub fn add_to_total(&mut self, value: UoaAmount) -> Result<UoaAmount, LedgerError> {
        let updated = self
            .aggregate_total
            .checked_add(value)
            .ok_or(LedgerError::MathOverflow)?;
        self.set_total(updated);
        Ok(updated)
    }

    /// Decrease the aggregate total, stopping at zero.
    ///
    /// Volatile value is recomputed at withdrawal time, so after a price rise
    /// a withdrawal can be worth more than what its deposit contributed.
    pub fn sub_from_total(&mut self, value: UoaAmount) -> UoaAmount {
        let updated = match self.aggregate_total.checked_sub(value) {
            Some(v) => v,
            None => {
                warn!(
                    total = self.aggregate_total,
                    value, "Withdrawal value exceeds aggregate total, clamping to zero"
                );
                0
            }
        };
        self.set_total(updated);
        updated
    }

    pub fn record_deposit(&mut self) -> Result<u64, LedgerError> {
        let updated = self
            .deposit_count
            .checked_add(1)
            .ok_or(LedgerError::MathOverflow)?;
        if self.open > 0 {
            self.journal.push(Undo::DepositCount(self.deposit_count));
        }
        self.deposit_count = updated;
        Ok(updated)
    }

    pub fn record_withdrawal(&mut self) -> Result<u64, LedgerError> {
        let updated = self
            .withdrawal_count
            .checked_add(1)
            .ok_or(LedgerError::MathOverflow)?;
        if self.open > 0 {
            self.journal.push(Undo::WithdrawalCount(self.withdrawal_count));
        }
        self.withdrawal_count = updated;
        Ok(updated)
    }

    // ── Staging ────────────────────────────────────────────────

    pub fn begin(&mut self) -> Checkpoint {
        self.open += 1;
        Checkpoint {
            mark: self.journal.len(),
            depth: self.open,
        }
    }

    /// Keep every mutation since `checkpoint`.
    pub fn commit(&mut self, checkpoint: Checkpoint) {
        self.close(&checkpoint);
    }

    /// Undo every mutation since `checkpoint`, newest first.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        while self.journal.len() > checkpoint.mark {
            match self.journal.pop() {
                Some(Undo::Balance {
                    asset,
                    holder,
                    previous,
                }) => match previous {
                    Some(amount) => {
                        self.balances.insert((asset, holder), amount);
                    }
                    None => {
                        self.balances.remove(&(asset, holder));
                    }
                },
                Some(Undo::AggregateTotal(total)) => self.aggregate_total = total,
                Some(Undo::DepositCount(count)) => self.deposit_count = count,
                Some(Undo::WithdrawalCount(count)) => self.withdrawal_count = count,
                None => break,
            }
        }
        self.close(&checkpoint);
    }

    fn close(&mut self, checkpoint: &Checkpoint) {
        debug_assert_eq!(
            checkpoint.depth, self.open,
            "checkpoints must be closed innermost first"
        );
        self.open = checkpoint.depth.saturating_sub(1);
        if self.open == 0 {
            self.journal.clear();
        }
    }

    fn set_balance(&mut self, asset: AssetKind, holder: HolderId, amount: NativeAmount) {
        let previous = self.balances.insert((asset, holder), amount);
        if self.open > 0 {
            self.journal.push(Undo::Balance {
                asset,
                holder,
                previous,
            });
        }
    }

    fn set_total(&mut self, total: UoaAmount) {
        if self.open > 0 {
            self.journal.push(Undo::AggregateTotal(self.aggregate_total));
        }
        self.aggregate_total = total;
    }
}
