//! Guild permission bits and the management filter.
//!
//! The bit values are Discord's own assignments and must match them exactly.

use super::TenantMembership;

/// `MANAGE_GUILD`: the operator may change the guild's settings.
pub const MANAGE_GUILD: u64 = 0x20;

/// Base invite mask, kept exactly as requested from the provider.
const INVITE_BASE: u64 = 0x1F40;

/// `VIEW_CHANNEL`. Already inside the base mask; OR-ing it in is a no-op.
const INVITE_EXTRA: u64 = 0x0400;

/// Permission set requested when inviting the bot into a guild (8000).
pub const INVITE_PERMISSIONS: u64 = INVITE_BASE | INVITE_EXTRA;

/// True when the bitmask carries the guild management bit.
pub fn can_manage(permissions: u64) -> bool {
    permissions & MANAGE_GUILD != 0
}

/// Keep only the memberships the operator may manage, in their original order.
pub fn manageable(memberships: &[TenantMembership]) -> Vec<TenantMembership> {
    memberships
        .iter()
        .filter(|m| can_manage(m.permissions))
        .cloned()
        .collect()
}
