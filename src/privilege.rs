/// Capability of the current execution context with regards to protected storage.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ExecutionContext {
    /// May erase and program the bootloader region.
    Privileged,
    /// Restricted mode, must never touch protected storage.
    Unprivileged,
}

impl ExecutionContext {
    pub const fn from_unprivileged(unprivileged: bool) -> Self {
        if unprivileged {
            ExecutionContext::Unprivileged
        } else {
            ExecutionContext::Privileged
        }
    }

    pub const fn may_modify_protected_storage(self) -> bool {
        matches!(self, ExecutionContext::Privileged)
    }
}
