//! Withdrawal protocol
//!
//! Both withdrawal paths run under the vault's reentrancy lock and follow
//! checks-effects-interactions: the ledger is debited, counted and the
//! aggregate decremented before value leaves custody. If the payout fails
//! the staged effects are rolled back and the holder keeps the balance.

use tracing::{info, warn};
use uuid::Uuid;
use vault_types::asset::AssetKind;
use vault_types::ids::HolderId;
use vault_types::numeric::{NativeAmount, UoaAmount};

use crate::errors::LedgerError;
use crate::events::{LedgerEvent, Withdrawn};
use crate::transfer::ValueReceiver;
use crate::vault::Vault;

impl Vault {
    /// Withdraw native volatile value and hand it to `receiver`.
    ///
    /// The withdrawal is valued at the current oracle price. `receiver` runs
    /// after the debit with the lock still held, so any call it makes back
    /// into a withdrawal path fails with [`LedgerError::Reentrancy`].
    pub fn withdraw_volatile<R>(
        &mut self,
        holder: HolderId,
        amount: NativeAmount,
        now: i64,
        receiver: &mut R,
    ) -> Result<LedgerEvent, LedgerError>
    where
        R: ValueReceiver + ?Sized,
    {
        let asset = AssetKind::Volatile;
        self.with_reentrancy_lock(|vault| {
            vault.ensure_operations_active()?;
            vault.limits.check_withdrawal_amount(asset, amount)?;
            let price = vault.oracle.read_price(now)?;
            let value = vault.converter.to_unit_of_account(amount, &price)?;

            vault.settle_withdrawal(holder, asset, amount, value, |vault| {
                receiver
                    .receive(vault, holder, amount)
                    .map_err(LedgerError::from)
            })
        })
    }

    /// Withdraw stable tokens to `holder`.
    ///
    /// The raw amount is compared to the threshold as its own
    /// unit-of-account value, without consulting the oracle.
    pub fn withdraw_stable(
        &mut self,
        holder: HolderId,
        amount: NativeAmount,
    ) -> Result<LedgerEvent, LedgerError> {
        let asset = AssetKind::Stable;
        self.with_reentrancy_lock(|vault| {
            vault.ensure_operations_active()?;
            vault.limits.check_withdrawal_amount(asset, amount)?;
            let value = amount;

            vault.settle_withdrawal(holder, asset, amount, value, |vault| {
                vault
                    .stable_token
                    .transfer(holder, amount)
                    .map_err(LedgerError::from)
            })
        })
    }

    /// Whether a withdrawal is currently in flight.
    pub fn is_withdrawal_in_progress(&self) -> bool {
        self.reentrancy_guard.is_locked()
    }

    /// Run `op` holding the reentrancy lock; the lock is released on every
    /// exit path.
    fn with_reentrancy_lock<T>(
        &mut self,
        op: impl FnOnce(&mut Self) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        if !self.reentrancy_guard.acquire() {
            warn!("Re-entrant withdrawal rejected");
            return Err(LedgerError::Reentrancy);
        }
        let result = op(self);
        self.reentrancy_guard.release();
        result
    }

    /// Limit check, staged debit, payout, commit.
    fn settle_withdrawal(
        &mut self,
        holder: HolderId,
        asset: AssetKind,
        amount: NativeAmount,
        value: UoaAmount,
        payout: impl FnOnce(&mut Self) -> Result<(), LedgerError>,
    ) -> Result<LedgerEvent, LedgerError> {
        let balance = self.ledger.balance(asset, &holder);
        self.limits
            .check_withdrawal(holder, asset, amount, value, balance)?;

        let aggregate_total = self.two_phase_apply(
            |ledger| {
                ledger.debit(asset, holder, amount)?;
                ledger.record_withdrawal()?;
                Ok(ledger.sub_from_total(value))
            },
            payout,
        )?;

        info!(
            %holder,
            %asset,
            amount = %self.display_amount(asset, amount),
            value = %self.display_value(value),
            aggregate_total,
            "Withdrawal committed"
        );
        Ok(self.emit(LedgerEvent::Withdrawn(Withdrawn {
            event_id: Uuid::now_v7(),
            holder,
            asset,
            amount,
            value,
            aggregate_total,
        })))
    }
}
