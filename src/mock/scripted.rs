use std::vec::Vec;

use crate::{Error, Fingerprint, integrity::Fingerprinter, storage::BootloaderStorage};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Call {
    WriteUnlock,
    WriteLock,
    Unlock,
    Lock,
    Erase(u32),
    Program(u32, u32),
    Fingerprint,
}

/// Storage recording every driver call, with scripted fingerprints.
///
/// Before the first completed erase+program cycle the region measures as
/// `installed`; after cycle `n` it measures as `rewritten[n - 1]`, repeating the
/// last entry once the script runs out.
pub struct ScriptedStorage {
    pub calls: Vec<Call>,
    installed: Option<Fingerprint>,
    rewritten: Vec<Option<Fingerprint>>,
    /// Every driver call reports a failure, without affecting the script.
    pub fail_all: bool,
}

impl ScriptedStorage {
    pub fn new(installed: Option<Fingerprint>, rewritten: &[Option<Fingerprint>]) -> Self {
        ScriptedStorage {
            calls: Vec::new(),
            installed,
            rewritten: rewritten.to_vec(),
            fail_all: false,
        }
    }

    pub fn count(&self, f: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| f(c)).count()
    }

    /// Completed erase+program cycles.
    pub fn cycles(&self) -> usize {
        self.count(|c| *c == Call::Lock)
    }

    /// Calls that lift protection or modify storage.
    pub fn writes(&self) -> usize {
        self.count(|c| matches!(c, Call::WriteUnlock | Call::Erase(_) | Call::Program(..)))
    }

    fn push(&mut self, call: Call) -> Result<(), Error> {
        self.calls.push(call);
        if self.fail_all {
            Err(Error::Flash)
        } else {
            Ok(())
        }
    }
}

impl BootloaderStorage for ScriptedStorage {
    async fn write_unlock(&mut self) -> Result<(), Error> {
        self.push(Call::WriteUnlock)
    }

    async fn write_lock(&mut self) -> Result<(), Error> {
        self.push(Call::WriteLock)
    }

    async fn unlock(&mut self) -> Result<(), Error> {
        self.push(Call::Unlock)
    }

    async fn lock(&mut self) -> Result<(), Error> {
        self.push(Call::Lock)
    }

    async fn erase_sector(&mut self, sector: u32) -> Result<(), Error> {
        self.push(Call::Erase(sector))
    }

    async fn program_word(&mut self, address: u32, word: u32) -> Result<(), Error> {
        self.push(Call::Program(address, word))
    }
}

impl Fingerprinter for ScriptedStorage {
    async fn fingerprint(&mut self) -> Option<Fingerprint> {
        self.calls.push(Call::Fingerprint);
        match self.cycles() {
            0 => self.installed,
            n => self
                .rewritten
                .get(n - 1)
                .or(self.rewritten.last())
                .copied()
                .flatten(),
        }
    }
}
