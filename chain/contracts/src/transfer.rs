//! External value movement
//!
//! The vault never moves value itself. Stable tokens go through a
//! [`FungibleAsset`] (pull into custody on deposit, push out on withdrawal);
//! native volatile value goes out through a [`ValueReceiver`], which runs
//! recipient code and may call back into the vault.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use vault_types::ids::HolderId;
use vault_types::numeric::NativeAmount;

use crate::errors::TransferError;
use crate::vault::Vault;

/// Allowance-based fungible token contract.
pub trait FungibleAsset: fmt::Debug {
    fn asset_id(&self) -> String;

    /// Pull `amount` from `from` into the vault's custody, spending the
    /// allowance `from` granted the vault.
    fn transfer_from(&mut self, from: HolderId, amount: NativeAmount) -> Result<(), TransferError>;

    /// Push `amount` out of custody to `to`.
    fn transfer(&mut self, to: HolderId, amount: NativeAmount) -> Result<(), TransferError>;
}

/// Recipient of native volatile value.
///
/// Receives the vault itself so that recipient code can call back in, as a
/// contract receiving native value could.
pub trait ValueReceiver {
    fn receive(
        &mut self,
        vault: &mut Vault,
        holder: HolderId,
        amount: NativeAmount,
    ) -> Result<(), TransferError>;
}

impl<F> ValueReceiver for F
where
    F: FnMut(&mut Vault, HolderId, NativeAmount) -> Result<(), TransferError>,
{
    fn receive(
        &mut self,
        vault: &mut Vault,
        holder: HolderId,
        amount: NativeAmount,
    ) -> Result<(), TransferError> {
        self(vault, holder, amount)
    }
}

/// Receiver that accepts every payout and tallies it per holder.
#[derive(Debug, Clone, Default)]
pub struct NativeWallet {
    received: HashMap<HolderId, NativeAmount>,
}

impl NativeWallet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn received(&self, holder: &HolderId) -> NativeAmount {
        self.received.get(holder).copied().unwrap_or(0)
    }
}

impl ValueReceiver for NativeWallet {
    fn receive(
        &mut self,
        _vault: &mut Vault,
        holder: HolderId,
        amount: NativeAmount,
    ) -> Result<(), TransferError> {
        let entry = self.received.entry(holder).or_insert(0);
        *entry = entry.checked_add(amount).ok_or_else(|| TransferError::Rejected {
            reason: "wallet balance overflow".to_string(),
        })?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct TokenBook {
    balances: HashMap<HolderId, NativeAmount>,
    /// Amount each holder has approved the vault to pull
    allowances: HashMap<HolderId, NativeAmount>,
    custody: NativeAmount,
    blocked: HashSet<HolderId>,
}

/// In-memory allowance token.
///
/// Clones share one book, so a test can keep a handle to inspect balances
/// while the vault owns another.
#[derive(Debug, Clone)]
pub struct MemoryToken {
    symbol: String,
    book: Arc<Mutex<TokenBook>>,
}

impl MemoryToken {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            book: Arc::new(Mutex::new(TokenBook::default())),
        }
    }

    fn book(&self) -> MutexGuard<'_, TokenBook> {
        self.book.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn mint(&self, to: HolderId, amount: NativeAmount) {
        let mut book = self.book();
        let balance = book.balances.entry(to).or_insert(0);
        *balance = balance.saturating_add(amount);
    }

    /// Set the amount `owner` allows the vault to pull.
    pub fn approve(&self, owner: HolderId, amount: NativeAmount) {
        self.book().allowances.insert(owner, amount);
    }

    pub fn balance_of(&self, holder: &HolderId) -> NativeAmount {
        self.book().balances.get(holder).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &HolderId) -> NativeAmount {
        self.book().allowances.get(owner).copied().unwrap_or(0)
    }

    /// Tokens currently held by the vault.
    pub fn custody_balance(&self) -> NativeAmount {
        self.book().custody
    }

    /// Reject every future payout to `holder`.
    pub fn block(&self, holder: HolderId) {
        self.book().blocked.insert(holder);
    }

    pub fn unblock(&self, holder: &HolderId) {
        self.book().blocked.remove(holder);
    }
}

impl FungibleAsset for MemoryToken {
    fn asset_id(&self) -> String {
        self.symbol.clone()
    }

    fn transfer_from(&mut self, from: HolderId, amount: NativeAmount) -> Result<(), TransferError> {
        let mut book = self.book();
        let approved = book.allowances.get(&from).copied().unwrap_or(0);
        if approved < amount {
            return Err(TransferError::InsufficientAllowance {
                required: amount,
                approved,
            });
        }
        let available = book.balances.get(&from).copied().unwrap_or(0);
        if available < amount {
            return Err(TransferError::InsufficientFunds {
                required: amount,
                available,
            });
        }
        let custody = book
            .custody
            .checked_add(amount)
            .ok_or_else(|| TransferError::Rejected {
                reason: "custody balance overflow".to_string(),
            })?;

        book.allowances.insert(from, approved - amount);
        book.balances.insert(from, available - amount);
        book.custody = custody;
        Ok(())
    }

    fn transfer(&mut self, to: HolderId, amount: NativeAmount) -> Result<(), TransferError> {
        let mut book = self.book();
        if book.blocked.contains(&to) {
            return Err(TransferError::Rejected {
                reason: format!("recipient {to} is blocked"),
            });
        }
        if book.custody < amount {
            return Err(TransferError::InsufficientFunds {
                required: amount,
                available: book.custody,
            });
        }
        book.custody -= amount;
        let balance = book.balances.entry(to).or_insert(0);
        *balance = balance.saturating_add(amount);
        Ok(())
    }
}
