//! Shared security primitives for the vault
//!
//! Reentrancy guard, role-based access control and the pause switch. The
//! vault owns one instance of each; nothing here is global.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Reentrancy guard preventing nested calls into protected functions.
///
/// A vault operation acquires the guard before touching state and releases
/// it on completion. Any nested call attempt fails.
#[derive(Debug, Clone)]
pub struct ReentrancyGuard {
    locked: bool,
}

impl ReentrancyGuard {
    /// Create a new unlocked guard.
    pub fn new() -> Self {
        Self { locked: false }
    }

    /// Acquire the guard. Returns `false` if already locked.
    pub fn acquire(&mut self) -> bool {
        if self.locked {
            return false;
        }
        self.locked = true;
        true
    }

    pub fn release(&mut self) {
        self.locked = false;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }
}

impl Default for ReentrancyGuard {
    fn default() -> Self {
        Self::new()
    }
}

/// Administrative actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Swap the vault's price source
    RotatePriceSource,
    /// Halt or resume deposits and withdrawals
    Pause,
    /// Grant and revoke roles
    ManageRoles,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full administrative control
    Admin,
    /// Incident response: may pause and resume
    Operator,
    /// Regular depositor, no administrative rights
    Holder,
}

impl Role {
    pub fn grants(&self, capability: Capability) -> bool {
        match self {
            Role::Admin => true,
            Role::Operator => capability == Capability::Pause,
            Role::Holder => false,
        }
    }
}

/// Authorization and operations-active gate consulted by the vault.
pub trait AccessGuard: fmt::Debug {
    fn is_authorized(&self, caller: &str, capability: Capability) -> bool;

    /// Whether deposits and withdrawals may proceed.
    fn operations_active(&self) -> bool;

    fn set_paused(&mut self, paused: bool);

    /// Returns `false` if the assignment is refused.
    fn assign_role(&mut self, target: &str, role: Role) -> bool;

    /// Returns `false` if the removal is refused.
    fn remove_role(&mut self, target: &str) -> bool;
}

/// Role-based access control manager.
///
/// Maps callers (identified by string) to their assigned role. The primary
/// admin set at construction cannot be demoted or removed.
#[derive(Debug, Clone)]
pub struct AccessControl {
    roles: HashMap<String, Role>,
    admin: String,
    pause: PauseGuard,
}

impl AccessControl {
    /// Create access control with an initial admin.
    pub fn new(admin: impl Into<String>) -> Self {
        let admin_str = admin.into();
        let mut roles = HashMap::new();
        roles.insert(admin_str.clone(), Role::Admin);
        Self {
            roles,
            admin: admin_str,
            pause: PauseGuard::new(),
        }
    }

    pub fn role_of(&self, caller: &str) -> Option<Role> {
        self.roles.get(caller).copied()
    }

    pub fn has_role(&self, caller: &str, role: Role) -> bool {
        self.role_of(caller) == Some(role)
    }

    pub fn is_admin(&self, caller: &str) -> bool {
        self.has_role(caller, Role::Admin)
    }

    /// Get the primary admin identifier.
    pub fn admin(&self) -> &str {
        &self.admin
    }
}

impl AccessGuard for AccessControl {
    fn is_authorized(&self, caller: &str, capability: Capability) -> bool {
        self.role_of(caller).is_some_and(|r| r.grants(capability))
    }

    fn operations_active(&self) -> bool {
        !self.pause.is_paused()
    }

    fn set_paused(&mut self, paused: bool) {
        if paused {
            self.pause.pause();
        } else {
            self.pause.unpause();
        }
    }

    fn assign_role(&mut self, target: &str, role: Role) -> bool {
        if target == self.admin && role != Role::Admin {
            return false;
        }
        self.roles.insert(target.to_string(), role);
        true
    }

    fn remove_role(&mut self, target: &str) -> bool {
        if target == self.admin {
            return false;
        }
        self.roles.remove(target).is_some()
    }
}

/// Composable pause modifier.
///
/// When paused, protected operations must be rejected.
#[derive(Debug, Clone)]
pub struct PauseGuard {
    paused: bool,
}

impl PauseGuard {
    /// Create a new unpaused guard.
    pub fn new() -> Self {
        Self { paused: false }
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

impl Default for PauseGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- ReentrancyGuard tests ---

    #[test]
    fn test_reentrancy_guard_acquire_release() {
        let mut guard = ReentrancyGuard::new();
        assert!(!guard.is_locked());
        assert!(guard.acquire());
        assert!(guard.is_locked());
        guard.release();
        assert!(!guard.is_locked());
    }

    #[test]
    fn test_reentrancy_guard_double_acquire_fails() {
        let mut guard = ReentrancyGuard::new();
        assert!(guard.acquire());
        assert!(!guard.acquire(), "Second acquire must fail");
    }

    // --- Role tests ---

    #[test]
    fn test_role_capabilities() {
        for cap in [
            Capability::RotatePriceSource,
            Capability::Pause,
            Capability::ManageRoles,
        ] {
            assert!(Role::Admin.grants(cap));
            assert!(!Role::Holder.grants(cap));
        }
        assert!(Role::Operator.grants(Capability::Pause));
        assert!(!Role::Operator.grants(Capability::RotatePriceSource));
        assert!(!Role::Operator.grants(Capability::ManageRoles));
    }

    // --- AccessControl tests ---

    #[test]
    fn test_access_control_admin() {
        let ac = AccessControl::new("alice");
        assert!(ac.is_admin("alice"));
        assert!(!ac.is_admin("bob"));
        assert_eq!(ac.admin(), "alice");
    }

    #[test]
    fn test_unknown_caller_unauthorized() {
        let ac = AccessControl::new("alice");
        assert!(!ac.is_authorized("mallory", Capability::Pause));
    }

    #[test]
    fn test_operator_can_pause_only() {
        let mut ac = AccessControl::new("alice");
        assert!(ac.assign_role("bob", Role::Operator));
        assert!(ac.is_authorized("bob", Capability::Pause));
        assert!(!ac.is_authorized("bob", Capability::ManageRoles));
    }

    #[test]
    fn test_remove_role() {
        let mut ac = AccessControl::new("alice");
        ac.assign_role("bob", Role::Operator);
        assert!(ac.remove_role("bob"));
        assert_eq!(ac.role_of("bob"), None);
        assert!(!ac.remove_role("bob"), "nothing left to remove");
    }

    #[test]
    fn test_primary_admin_protected() {
        let mut ac = AccessControl::new("alice");
        assert!(!ac.remove_role("alice"));
        assert!(!ac.assign_role("alice", Role::Holder));
        assert!(ac.is_admin("alice"));
    }

    #[test]
    fn test_pause_toggles_operations() {
        let mut ac = AccessControl::new("alice");
        assert!(ac.operations_active());
        ac.set_paused(true);
        assert!(!ac.operations_active());
        ac.set_paused(false);
        assert!(ac.operations_active());
    }

    // --- PauseGuard tests ---

    #[test]
    fn test_pause_guard() {
        let mut pg = PauseGuard::new();
        assert!(!pg.is_paused());
        pg.pause();
        assert!(pg.is_paused());
        pg.unpause();
        assert!(!pg.is_paused());
    }
}
