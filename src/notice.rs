//! Abstract user-facing notices.
//!
//! Rendering (dialogs, icons, translation) is left to the [`Device`](crate::Device).

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Notice {
    /// The installed bootloader failed the trust policy. The device halts.
    UnknownBootloader,
    /// The bootloader region is about to be rewritten; power loss now may brick the device.
    UpdateInProgress,
    /// The rewritten region verified. The device halts and should be reconnected.
    UpdateFinished,
    /// Every rewrite attempt failed verification. The device halts.
    UpdateBroken,
}

impl Notice {
    pub const fn severity(&self) -> Severity {
        match self {
            Notice::UnknownBootloader | Notice::UpdateBroken => Severity::Error,
            Notice::UpdateInProgress => Severity::Warning,
            Notice::UpdateFinished => Severity::Info,
        }
    }

    /// Text lines of the notice: a title pair followed by an instruction pair.
    pub const fn lines(&self) -> [&'static str; 4] {
        match self {
            Notice::UnknownBootloader => [
                "Unknown bootloader",
                "detected.",
                "Unplug your device",
                "contact our support.",
            ],
            Notice::UpdateInProgress => ["Updating bootloader", "", "DO NOT UNPLUG", "YOUR DEVICE!"],
            Notice::UpdateFinished => [
                "Update finished",
                "successfully.",
                "Please reconnect",
                "the device.",
            ],
            Notice::UpdateBroken => [
                "Bootloader update",
                "broken.",
                "Unplug your device",
                "contact our support.",
            ],
        }
    }

    /// Whether the device halts right after showing this notice.
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Notice::UpdateInProgress)
    }
}
