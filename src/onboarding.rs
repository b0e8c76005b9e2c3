// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! First-run balance setup. A missing snapshot means onboarding is pending.

use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::{BalanceSnapshot, check_magnitude, updated_by};
use crate::store::SnapshotStore;

pub fn needs_setup<S: SnapshotStore>(store: &S, owner: &str) -> Result<bool> {
    Ok(store.get(owner)?.is_none())
}

fn ensure_pending<S: SnapshotStore>(store: &S, owner: &str) -> Result<()> {
    if !needs_setup(store, owner)? {
        return Err(Error::validation(
            "balances are already set up; use `balance adjust` to change them",
        ));
    }
    Ok(())
}

/// Starts tracking from explicit balances. At least one must be given.
pub fn setup_balances<S: SnapshotStore>(
    store: &S,
    owner: &str,
    online: Option<Decimal>,
    cash: Option<Decimal>,
) -> Result<BalanceSnapshot> {
    if online.is_none() && cash.is_none() {
        return Err(Error::validation("enter at least one balance amount"));
    }
    for (value, what) in [(online, "online balance"), (cash, "cash balance")] {
        check_magnitude(value.unwrap_or(Decimal::ZERO), what)?;
    }
    ensure_pending(store, owner)?;
    let snapshot = BalanceSnapshot::new(
        online.unwrap_or(Decimal::ZERO),
        cash.unwrap_or(Decimal::ZERO),
        updated_by::INITIAL_SETUP,
    );
    store.put(owner, &snapshot)?;
    tracing::info!(owner, online = %snapshot.online, cash = %snapshot.cash, "initial balances set");
    Ok(snapshot)
}

/// Starts tracking from zero.
pub fn skip_setup<S: SnapshotStore>(store: &S, owner: &str) -> Result<BalanceSnapshot> {
    ensure_pending(store, owner)?;
    let snapshot = BalanceSnapshot::new(Decimal::ZERO, Decimal::ZERO, updated_by::SKIPPED_SETUP);
    store.put(owner, &snapshot)?;
    tracing::info!(owner, "initial setup skipped; starting from zero");
    Ok(snapshot)
}
