//! Facts about the host user.

/// Real uid of the invoking user, mapped onto the guest's default account.
#[must_use]
pub fn current_uid() -> u32 {
    nix::unistd::getuid().as_raw()
}
