// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host machine configuration read by the core.

/// Formats a short description of a memory address for the trace output.
pub type MemInfoFn = Box<dyn Fn(u16) -> String + Send>;

/// The kind of machine the core is embedded in.
///
/// The machine selects the reset behavior: sbc09 ROMs execute `ORCC #$FF`
/// as their very first instruction and expect a zeroed condition code
/// register on entry, every other machine starts with the E flag set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Machine {
    #[default]
    Generic,
    Sbc09,
}

/// Configuration of the emulated machine.
pub struct Config {
    pub machine: Machine,
    /// Emit a trace line for every executed instruction.
    pub trace: bool,
    /// Optional memory annotation hook used by the trace output.
    pub mem_info: Option<MemInfoFn>,
}

impl Config {
    pub fn new(machine: Machine) -> Self {
        Self {
            machine,
            trace: false,
            mem_info: None,
        }
    }

    pub(crate) fn mem_info_for(&self, addr: u16) -> String {
        match &self.mem_info {
            Some(f) => f(addr),
            None => ">>mem info not active<<".to_owned(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Machine::Generic)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("machine", &self.machine)
            .field("trace", &self.trace)
            .field("mem_info", &self.mem_info.is_some())
            .finish()
    }
}
