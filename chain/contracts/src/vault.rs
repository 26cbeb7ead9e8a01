//! Vault: custody ledger for a volatile native asset and a pegged stable asset
//!
//! Owns the ledger, the oracle adapter and the limit policy, and implements
//! the deposit protocol, queries and administrative operations. Withdrawals
//! live in [`crate::withdrawal`].
//!
//! Every state-changing operation either commits fully or leaves the vault
//! exactly as it found it. Effects that precede an external call are staged
//! in the ledger's undo journal and rolled back if the call fails.

use tracing::{debug, info, warn};
use uuid::Uuid;
use vault_types::asset::AssetKind;
use vault_types::ids::{FeedId, HolderId};
use vault_types::numeric::{to_display_decimal, NativeAmount, UoaAmount};

use crate::config::{Precisions, VaultConfig};
use crate::conversion::UnitConverter;
use crate::errors::{ConfigError, LedgerError};
use crate::events::{Deposited, LedgerEvent, PauseChanged, PriceSourceRotated};
use crate::ledger::LedgerStore;
use crate::limits::LimitPolicy;
use crate::oracle::{PriceOracleAdapter, PriceSource};
use crate::security::{AccessControl, AccessGuard, Capability, ReentrancyGuard, Role};
use crate::transfer::FungibleAsset;

/// Core vault contract managing custody of both assets.
///
/// All deposit and withdrawal operations check:
/// 1. Reentrancy guard (withdrawals take it, deposits refuse while it is held)
/// 2. Operations active (not paused)
/// 3. Limit policy, with the oracle consulted for the volatile asset
///
/// Administrative mutations are also refused while a withdrawal is in flight.
#[derive(Debug)]
pub struct Vault {
    pub(crate) ledger: LedgerStore,
    pub(crate) oracle: PriceOracleAdapter,
    pub(crate) converter: UnitConverter,
    pub(crate) limits: LimitPolicy,
    pub(crate) stable_token: Box<dyn FungibleAsset>,
    access: Box<dyn AccessGuard>,
    pub(crate) reentrancy_guard: ReentrancyGuard,
    precisions: Precisions,
    /// Emitted events log (append-only)
    events: Vec<LedgerEvent>,
}

impl Vault {
    /// Create a vault whose access control grants `config.admin` the admin role.
    pub fn new(
        config: VaultConfig,
        price_source: Box<dyn PriceSource>,
        stable_token: Box<dyn FungibleAsset>,
    ) -> Result<Self, ConfigError> {
        let access = Box::new(AccessControl::new(config.admin.clone()));
        Self::with_access_guard(config, price_source, stable_token, access)
    }

    /// Create a vault with an externally supplied access guard.
    pub fn with_access_guard(
        config: VaultConfig,
        price_source: Box<dyn PriceSource>,
        stable_token: Box<dyn FungibleAsset>,
        access: Box<dyn AccessGuard>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if stable_token.asset_id().trim().is_empty() {
            return Err(ConfigError::InvalidCollaborator(
                "stable asset has no identifier".to_string(),
            ));
        }

        let converter = UnitConverter::from_precisions(&config.precisions)?;
        let oracle = PriceOracleAdapter::new(
            price_source,
            config.heartbeat_secs,
            config.precisions.oracle,
        )?;

        info!(
            feed = %oracle.feed_id(),
            stable = %stable_token.asset_id(),
            cap = config.cap,
            threshold = config.withdrawal_threshold,
            decimal_factor = converter.decimal_factor(),
            "Vault initialized"
        );

        Ok(Self {
            ledger: LedgerStore::new(),
            oracle,
            converter,
            limits: LimitPolicy::from_config(&config),
            stable_token,
            access,
            reentrancy_guard: ReentrancyGuard::new(),
            precisions: config.precisions,
            events: Vec::new(),
        })
    }

    // ───────────────────────── Deposit ─────────────────────────

    /// Record native value that arrived with the call.
    ///
    /// There is nothing to pull: the value is already held, so rejecting the
    /// deposit means rejecting the whole call.
    pub fn deposit_volatile(
        &mut self,
        holder: HolderId,
        attached_value: NativeAmount,
        now: i64,
    ) -> Result<LedgerEvent, LedgerError> {
        let asset = AssetKind::Volatile;
        self.ensure_not_settling()?;
        self.ensure_operations_active()?;
        self.limits.check_deposit_amount(asset, attached_value)?;

        let price = self.oracle.read_price(now)?;
        let value = self.converter.to_unit_of_account(attached_value, &price)?;
        self.limits
            .check_deposit_value(asset, value, self.ledger.aggregate_total())?;
        debug!(%holder, amount = attached_value, value, price = price.price, "Volatile deposit accepted");

        let total = self.two_phase_apply(
            |ledger| stage_deposit(ledger, asset, holder, attached_value, value),
            |_| Ok(()),
        )?;
        Ok(self.record_deposit_event(holder, asset, attached_value, value, total))
    }

    /// Pull `amount` stable tokens from `holder` under a prior allowance.
    ///
    /// The raw amount is taken as its own unit-of-account value. The ledger
    /// is credited before the pull; a failed pull rolls the credit back.
    pub fn deposit_stable(
        &mut self,
        holder: HolderId,
        amount: NativeAmount,
    ) -> Result<LedgerEvent, LedgerError> {
        let asset = AssetKind::Stable;
        self.ensure_not_settling()?;
        self.ensure_operations_active()?;
        self.limits.check_deposit_amount(asset, amount)?;
        let value = amount;
        self.limits
            .check_deposit_value(asset, value, self.ledger.aggregate_total())?;

        let total = self.two_phase_apply(
            |ledger| stage_deposit(ledger, asset, holder, amount, value),
            |vault| {
                vault
                    .stable_token
                    .transfer_from(holder, amount)
                    .map_err(LedgerError::from)
            },
        )?;
        Ok(self.record_deposit_event(holder, asset, amount, value, total))
    }

    // ───────────────────────── Queries ─────────────────────────

    /// Recorded balance of `holder` in `asset`, native base units.
    pub fn balance_of(&self, holder: &HolderId, asset: AssetKind) -> NativeAmount {
        self.ledger.balance(asset, holder)
    }

    /// Current unit-of-account value of everything `holder` has deposited.
    ///
    /// The volatile balance is priced at the live oracle reading, so unlike
    /// [`Vault::contract_total`] this moves with the market. Fails if the
    /// oracle cannot be read and the holder has a volatile balance.
    pub fn vault_total(&self, holder: &HolderId, now: i64) -> Result<UoaAmount, LedgerError> {
        let volatile = self.balance_of(holder, AssetKind::Volatile);
        let stable = self.balance_of(holder, AssetKind::Stable);
        let volatile_value = if volatile == 0 {
            0
        } else {
            let price = self.oracle.read_price(now)?;
            self.converter.to_unit_of_account(volatile, &price)?
        };
        volatile_value
            .checked_add(stable)
            .ok_or(LedgerError::MathOverflow)
    }

    /// Running aggregate total across all holders, valued at record time.
    pub fn contract_total(&self) -> UoaAmount {
        self.ledger.aggregate_total()
    }

    pub fn deposit_count(&self) -> u64 {
        self.ledger.deposit_count()
    }

    pub fn withdrawal_count(&self) -> u64 {
        self.ledger.withdrawal_count()
    }

    pub fn price_feed(&self) -> FeedId {
        self.oracle.feed_id()
    }

    pub fn cap(&self) -> UoaAmount {
        self.limits.cap()
    }

    pub fn threshold(&self) -> UoaAmount {
        self.limits.threshold()
    }

    pub fn min_volatile_deposit(&self) -> NativeAmount {
        self.limits.min_volatile_deposit()
    }

    pub fn decimal_factor(&self) -> u128 {
        self.converter.decimal_factor()
    }

    pub fn heartbeat(&self) -> i64 {
        self.oracle.heartbeat()
    }

    pub fn stable_asset_id(&self) -> String {
        self.stable_token.asset_id()
    }

    pub fn is_paused(&self) -> bool {
        !self.access.operations_active()
    }

    // ───────────────────────── Administration ─────────────────────────

    /// Swap the price source. The candidate must produce a valid reading at
    /// `now` or the current source stays in place.
    pub fn rotate_price_source(
        &mut self,
        caller: &str,
        source: Box<dyn PriceSource>,
        now: i64,
    ) -> Result<LedgerEvent, LedgerError> {
        self.ensure_not_settling()?;
        self.authorize(caller, Capability::RotatePriceSource)?;
        let current = source.feed_id();
        let previous = self.oracle.set_feed(source, now).map_err(|e| {
            warn!(caller, candidate = %current, error = %e, "Price source rotation rejected");
            e
        })?;

        info!(caller, %previous, %current, "Price source rotated");
        Ok(self.emit(LedgerEvent::PriceSourceRotated(PriceSourceRotated {
            previous,
            current,
            rotated_by: caller.to_string(),
            rotated_at: now,
        })))
    }

    /// Halt deposits and withdrawals.
    pub fn pause(&mut self, caller: &str) -> Result<LedgerEvent, LedgerError> {
        self.set_paused(caller, true)
    }

    /// Resume deposits and withdrawals.
    pub fn resume(&mut self, caller: &str) -> Result<LedgerEvent, LedgerError> {
        self.set_paused(caller, false)
    }

    pub fn grant_role(&mut self, caller: &str, target: &str, role: Role) -> Result<(), LedgerError> {
        self.ensure_not_settling()?;
        self.authorize(caller, Capability::ManageRoles)?;
        if !self.access.assign_role(target, role) {
            return Err(LedgerError::Unauthorized {
                caller: caller.to_string(),
            });
        }
        info!(caller, target, ?role, "Role granted");
        Ok(())
    }

    pub fn revoke_role(&mut self, caller: &str, target: &str) -> Result<(), LedgerError> {
        self.ensure_not_settling()?;
        self.authorize(caller, Capability::ManageRoles)?;
        if !self.access.remove_role(target) {
            return Err(LedgerError::Unauthorized {
                caller: caller.to_string(),
            });
        }
        info!(caller, target, "Role revoked");
        Ok(())
    }

    // ───────────────────────── Events ─────────────────────────

    /// Get all emitted events.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: LedgerEvent) -> LedgerEvent {
        self.events.push(event.clone());
        event
    }

    // ───────────────────────── Internal ─────────────────────────

    /// Apply ledger `effects`, then run `interact` against the whole vault.
    ///
    /// Commits when both succeed. Otherwise every ledger mutation and event
    /// since the start is undone. Only ledger state is journaled; deposits
    /// and administrative calls refuse to run inside `interact`.
    pub(crate) fn two_phase_apply<T>(
        &mut self,
        effects: impl FnOnce(&mut LedgerStore) -> Result<T, LedgerError>,
        interact: impl FnOnce(&mut Self) -> Result<(), LedgerError>,
    ) -> Result<T, LedgerError> {
        let checkpoint = self.ledger.begin();
        let events_mark = self.events.len();

        let outcome = match effects(&mut self.ledger) {
            Ok(staged) => interact(self).map(|()| staged),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(staged) => {
                self.ledger.commit(checkpoint);
                Ok(staged)
            }
            Err(e) => {
                self.ledger.rollback(checkpoint);
                self.events.truncate(events_mark);
                warn!(error = %e, "Operation rolled back");
                Err(e)
            }
        }
    }

    /// Refuse calls whose effects the undo journal cannot revert.
    pub(crate) fn ensure_not_settling(&self) -> Result<(), LedgerError> {
        if self.reentrancy_guard.is_locked() || self.ledger.is_staging() {
            warn!("Call rejected while a withdrawal is settling");
            return Err(LedgerError::Reentrancy);
        }
        Ok(())
    }

    pub(crate) fn ensure_operations_active(&self) -> Result<(), LedgerError> {
        if !self.access.operations_active() {
            return Err(LedgerError::Paused);
        }
        Ok(())
    }

    pub(crate) fn display_amount(&self, asset: AssetKind, raw: NativeAmount) -> String {
        let decimals = match asset {
            AssetKind::Volatile => self.precisions.volatile,
            AssetKind::Stable => self.precisions.stable,
        };
        to_display_decimal(raw, u32::from(decimals))
            .map(|d| d.to_string())
            .unwrap_or_else(|| raw.to_string())
    }

    /// The unit of account shares the stable asset's precision.
    pub(crate) fn display_value(&self, value: UoaAmount) -> String {
        self.display_amount(AssetKind::Stable, value)
    }

    fn authorize(&self, caller: &str, capability: Capability) -> Result<(), LedgerError> {
        if !self.access.is_authorized(caller, capability) {
            warn!(caller, ?capability, "Unauthorized administrative call");
            return Err(LedgerError::Unauthorized {
                caller: caller.to_string(),
            });
        }
        Ok(())
    }

    fn set_paused(&mut self, caller: &str, paused: bool) -> Result<LedgerEvent, LedgerError> {
        self.ensure_not_settling()?;
        self.authorize(caller, Capability::Pause)?;
        self.access.set_paused(paused);
        info!(caller, paused, "Pause state changed");
        Ok(self.emit(LedgerEvent::PauseChanged(PauseChanged {
            paused,
            changed_by: caller.to_string(),
        })))
    }

    fn record_deposit_event(
        &mut self,
        holder: HolderId,
        asset: AssetKind,
        amount: NativeAmount,
        value: UoaAmount,
        aggregate_total: UoaAmount,
    ) -> LedgerEvent {
        info!(
            %holder,
            %asset,
            amount = %self.display_amount(asset, amount),
            value = %self.display_value(value),
            aggregate_total,
            "Deposit committed"
        );
        self.emit(LedgerEvent::Deposited(Deposited {
            event_id: Uuid::now_v7(),
            holder,
            asset,
            amount,
            value,
            aggregate_total,
        }))
    }
}

/// Credit, count and add to the aggregate. Returns the new aggregate total.
fn stage_deposit(
    ledger: &mut LedgerStore,
    asset: AssetKind,
    holder: HolderId,
    amount: NativeAmount,
    value: UoaAmount,
) -> Result<UoaAmount, LedgerError> {
    ledger.credit(asset, holder, amount)?;
    ledger.record_deposit()?;
    ledger.add_to_total(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{OracleError, TransferError};
    use crate::oracle::PushPriceFeed;
    use crate::transfer::MemoryToken;

    const NOW: i64 = 1_700_000_000;
    const ETH: u128 = 1_000_000_000_000_000_000;
    const USDC: u128 = 1_000_000;
    const PRICE: i128 = 2_000_00000000;

    fn setup_vault() -> (Vault, PushPriceFeed, MemoryToken) {
        let feed = PushPriceFeed::with_price(FeedId::new("ETH/USD"), 8, PRICE, NOW);
        let token = MemoryToken::new("USDC");
        let vault = Vault::new(
            VaultConfig::default(),
            Box::new(feed.clone()),
            Box::new(token.clone()),
        )
        .unwrap();
        (vault, feed, token)
    }

    fn funded(token: &MemoryToken, amount: u128) -> HolderId {
        let holder = HolderId::new();
        token.mint(holder, amount);
        token.approve(holder, amount);
        holder
    }

    // ─── Construction ───

    #[test]
    fn test_new_vault_is_empty() {
        let (vault, _, _) = setup_vault();
        assert_eq!(vault.contract_total(), 0);
        assert_eq!(vault.deposit_count(), 0);
        assert_eq!(vault.withdrawal_count(), 0);
        assert_eq!(vault.decimal_factor(), 10u128.pow(20));
        assert_eq!(vault.price_feed(), FeedId::new("ETH/USD"));
        assert!(!vault.is_paused());
    }

    #[test]
    fn test_invalid_config_prevents_construction() {
        let feed = PushPriceFeed::new(FeedId::new("ETH/USD"), 8);
        let config = VaultConfig {
            cap: 0,
            ..VaultConfig::default()
        };
        let result = Vault::new(config, Box::new(feed), Box::new(MemoryToken::new("USDC")));
        assert_eq!(result.unwrap_err(), ConfigError::InvalidCap);
    }

    #[test]
    fn test_unnamed_stable_token_rejected() {
        let feed = PushPriceFeed::new(FeedId::new("ETH/USD"), 8);
        let result = Vault::new(
            VaultConfig::default(),
            Box::new(feed),
            Box::new(MemoryToken::new("")),
        );
        assert!(matches!(result, Err(ConfigError::InvalidCollaborator(_))));
    }

    #[test]
    fn test_construction_does_not_read_oracle() {
        let feed = PushPriceFeed::new(FeedId::new("ETH/USD"), 8);
        let result = Vault::new(
            VaultConfig::default(),
            Box::new(feed),
            Box::new(MemoryToken::new("USDC")),
        );
        assert!(result.is_ok());
    }

    // ─── Volatile deposits ───

    #[test]
    fn test_volatile_deposit_credits_and_values() {
        let (mut vault, _, _) = setup_vault();
        let holder = HolderId::new();
        let event = vault.deposit_volatile(holder, ETH, NOW).unwrap();

        assert_eq!(vault.balance_of(&holder, AssetKind::Volatile), ETH);
        assert_eq!(vault.contract_total(), 2_000 * USDC);
        assert_eq!(vault.deposit_count(), 1);
        match event {
            LedgerEvent::Deposited(d) => {
                assert_eq!(d.value, 2_000 * USDC);
                assert_eq!(d.aggregate_total, 2_000 * USDC);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn test_volatile_deposit_below_minimum() {
        let (mut vault, _, _) = setup_vault();
        let holder = HolderId::new();
        let result = vault.deposit_volatile(holder, vault.min_volatile_deposit() - 1, NOW);
        assert!(matches!(result, Err(LedgerError::BelowMinimum { .. })));
        assert_eq!(vault.deposit_count(), 0);
    }

    #[test]
    fn test_volatile_deposit_zero() {
        let (mut vault, _, _) = setup_vault();
        assert_eq!(
            vault.deposit_volatile(HolderId::new(), 0, NOW),
            Err(LedgerError::ZeroAmount {
                asset: AssetKind::Volatile
            })
        );
    }

    #[test]
    fn test_volatile_deposit_stale_price_rejected() {
        let (mut vault, _, _) = setup_vault();
        let holder = HolderId::new();
        let result = vault.deposit_volatile(holder, ETH, NOW + 3601);
        assert!(matches!(
            result,
            Err(LedgerError::Oracle(OracleError::PriceStale { .. }))
        ));
        assert_eq!(vault.balance_of(&holder, AssetKind::Volatile), 0);
        assert_eq!(vault.contract_total(), 0);
        assert!(vault.events().is_empty());
    }

    #[test]
    fn test_volatile_deposit_negative_price_rejected() {
        let (mut vault, feed, _) = setup_vault();
        feed.publish(-1, NOW);
        let result = vault.deposit_volatile(HolderId::new(), ETH, NOW);
        assert!(matches!(
            result,
            Err(LedgerError::Oracle(OracleError::OracleInvalid { price: -1 }))
        ));
        assert_eq!(vault.contract_total(), 0);
    }

    #[test]
    fn test_deposit_past_cap_rejected() {
        let (mut vault, _, _) = setup_vault();
        let holder = HolderId::new();
        // cap is 1,000,000 USDC = 500 ETH at $2,000
        vault.deposit_volatile(holder, 500 * ETH, NOW).unwrap();
        let result = vault.deposit_volatile(holder, ETH, NOW);
        assert!(matches!(result, Err(LedgerError::CapExceeded { .. })));
        assert_eq!(vault.balance_of(&holder, AssetKind::Volatile), 500 * ETH);
        assert_eq!(vault.contract_total(), vault.cap());
    }

    // ─── Stable deposits ───

    #[test]
    fn test_stable_deposit_pulls_tokens() {
        let (mut vault, _, token) = setup_vault();
        let holder = funded(&token, 500 * USDC);
        vault.deposit_stable(holder, 500 * USDC).unwrap();

        assert_eq!(vault.balance_of(&holder, AssetKind::Stable), 500 * USDC);
        assert_eq!(vault.contract_total(), 500 * USDC);
        assert_eq!(token.custody_balance(), 500 * USDC);
        assert_eq!(token.balance_of(&holder), 0);
    }

    #[test]
    fn test_stable_deposit_without_allowance_rolls_back() {
        let (mut vault, _, token) = setup_vault();
        let holder = HolderId::new();
        token.mint(holder, 100 * USDC);

        let result = vault.deposit_stable(holder, 100 * USDC);
        assert!(matches!(
            result,
            Err(LedgerError::TransferFailed(
                TransferError::InsufficientAllowance { .. }
            ))
        ));
        assert_eq!(vault.balance_of(&holder, AssetKind::Stable), 0);
        assert_eq!(vault.contract_total(), 0);
        assert_eq!(vault.deposit_count(), 0);
        assert!(vault.events().is_empty());
        assert_eq!(token.balance_of(&holder), 100 * USDC);
    }

    #[test]
    fn test_stable_deposit_ignores_oracle() {
        let (mut vault, feed, token) = setup_vault();
        feed.clear();
        let holder = funded(&token, 10 * USDC);
        assert!(vault.deposit_stable(holder, 10 * USDC).is_ok());
    }

    #[test]
    fn test_deposit_refused_inside_payout() {
        let (mut vault, _, token) = setup_vault();
        let holder = funded(&token, 10 * USDC);
        vault.deposit_volatile(holder, ETH, NOW).unwrap();

        let mut nested = None;
        let mut recipient =
            |vault: &mut Vault, payee: HolderId, _: NativeAmount| -> Result<(), TransferError> {
                nested = Some(vault.deposit_stable(payee, 10 * USDC));
                Ok(())
            };
        vault
            .withdraw_volatile(holder, ETH, NOW, &mut recipient)
            .unwrap();

        assert_eq!(nested, Some(Err(LedgerError::Reentrancy)));
        assert_eq!(vault.balance_of(&holder, AssetKind::Stable), 0);
        assert_eq!(token.balance_of(&holder), 10 * USDC);
        assert_eq!(token.custody_balance(), 0);

        // refusal ends with the payout
        assert!(vault.deposit_stable(holder, 10 * USDC).is_ok());
    }

    // ─── Queries ───

    #[test]
    fn test_vault_total_marks_volatile_to_market() {
        let (mut vault, feed, token) = setup_vault();
        let holder = funded(&token, 100 * USDC);
        vault.deposit_volatile(holder, ETH, NOW).unwrap();
        vault.deposit_stable(holder, 100 * USDC).unwrap();
        assert_eq!(vault.vault_total(&holder, NOW), Ok(2_100 * USDC));

        feed.publish(3_000_00000000, NOW + 10);
        assert_eq!(vault.vault_total(&holder, NOW + 10), Ok(3_100 * USDC));
        // recorded aggregate does not move with the price
        assert_eq!(vault.contract_total(), 2_100 * USDC);
    }

    #[test]
    fn test_vault_total_stable_only_skips_oracle() {
        let (mut vault, feed, token) = setup_vault();
        let holder = funded(&token, 5 * USDC);
        vault.deposit_stable(holder, 5 * USDC).unwrap();
        feed.clear();
        assert_eq!(vault.vault_total(&holder, NOW), Ok(5 * USDC));
    }

    // ─── Administration ───

    #[test]
    fn test_pause_blocks_deposits() {
        let (mut vault, _, _) = setup_vault();
        vault.pause("admin").unwrap();
        assert!(vault.is_paused());
        assert_eq!(
            vault.deposit_volatile(HolderId::new(), ETH, NOW),
            Err(LedgerError::Paused)
        );
        vault.resume("admin").unwrap();
        assert!(vault.deposit_volatile(HolderId::new(), ETH, NOW).is_ok());
    }

    #[test]
    fn test_pause_requires_capability() {
        let (mut vault, _, _) = setup_vault();
        assert!(matches!(
            vault.pause("mallory"),
            Err(LedgerError::Unauthorized { .. })
        ));
        assert!(!vault.is_paused());
    }

    #[test]
    fn test_operator_can_pause_but_not_rotate() {
        let (mut vault, _, _) = setup_vault();
        vault.grant_role("admin", "ops", Role::Operator).unwrap();
        vault.pause("ops").unwrap();

        let candidate = PushPriceFeed::with_price(FeedId::new("ETH/USD-v2"), 8, PRICE, NOW);
        assert!(matches!(
            vault.rotate_price_source("ops", Box::new(candidate), NOW),
            Err(LedgerError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_revoked_operator_loses_pause() {
        let (mut vault, _, _) = setup_vault();
        vault.grant_role("admin", "ops", Role::Operator).unwrap();
        vault.revoke_role("admin", "ops").unwrap();
        assert!(vault.pause("ops").is_err());
    }

    #[test]
    fn test_rotate_price_source() {
        let (mut vault, _, _) = setup_vault();
        let candidate = PushPriceFeed::with_price(FeedId::new("ETH/USD-v2"), 8, PRICE, NOW);
        let event = vault
            .rotate_price_source("admin", Box::new(candidate), NOW)
            .unwrap();
        assert_eq!(vault.price_feed(), FeedId::new("ETH/USD-v2"));
        assert!(matches!(event, LedgerEvent::PriceSourceRotated(_)));
    }

    #[test]
    fn test_rotate_to_invalid_source_keeps_current() {
        let (mut vault, _, _) = setup_vault();
        let candidate = PushPriceFeed::with_price(FeedId::new("ETH/USD-v2"), 8, 0, NOW);
        let result = vault.rotate_price_source("admin", Box::new(candidate), NOW);
        assert!(matches!(
            result,
            Err(LedgerError::Oracle(OracleError::FeedInvalid { .. }))
        ));
        assert_eq!(vault.price_feed(), FeedId::new("ETH/USD"));
        assert!(vault.events().is_empty());
    }

    #[test]
    fn test_drain_events() {
        let (mut vault, _, _) = setup_vault();
        vault.deposit_volatile(HolderId::new(), ETH, NOW).unwrap();
        vault.pause("admin").unwrap();
        let events = vault.drain_events();
        assert_eq!(events.len(), 2);
        assert!(vault.events().is_empty());
    }
}
