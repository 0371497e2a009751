// SPDX-License-Identifier: Apache-2.0

use core::fmt;

use bitflags::bitflags;

bitflags! {
    /// Set of held input buttons.
    ///
    /// The bit layout matches the hardware input register, so a sampled
    /// register value can be compared against a configured mask directly.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Buttons: u32 {
        const A      = 1 << 0;
        const B      = 1 << 1;
        const SELECT = 1 << 2;
        const START  = 1 << 3;
        const RIGHT  = 1 << 4;
        const LEFT   = 1 << 5;
        const UP     = 1 << 6;
        const DOWN   = 1 << 7;
        const R      = 1 << 8;
        const L      = 1 << 9;
        const X      = 1 << 10;
        const Y      = 1 << 11;
    }
}

/// Names accepted in a `buttons` array, in lookup order.
///
/// Position `i > 0` maps to bit `i - 1`; `None` maps to the empty set.
pub const BUTTON_NAMES: [&str; 13] = [
    "None", "A", "B", "Select", "Start", "Right", "Left", "Up", "Down", "R", "L", "X", "Y",
];

const BUTTON_TABLE: [(&str, Buttons); 13] = [
    (BUTTON_NAMES[0], Buttons::empty()),
    (BUTTON_NAMES[1], Buttons::A),
    (BUTTON_NAMES[2], Buttons::B),
    (BUTTON_NAMES[3], Buttons::SELECT),
    (BUTTON_NAMES[4], Buttons::START),
    (BUTTON_NAMES[5], Buttons::RIGHT),
    (BUTTON_NAMES[6], Buttons::LEFT),
    (BUTTON_NAMES[7], Buttons::UP),
    (BUTTON_NAMES[8], Buttons::DOWN),
    (BUTTON_NAMES[9], Buttons::R),
    (BUTTON_NAMES[10], Buttons::L),
    (BUTTON_NAMES[11], Buttons::X),
    (BUTTON_NAMES[12], Buttons::Y),
];

/// How a button name from the document is compared against the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonMatch {
    /// A candidate matches the first table name it starts with, so `"Rx"`
    /// reads as `R` and `"Nonesuch"` as `None`. Existing configuration
    /// files may rely on this.
    Prefix,
    /// A candidate must equal a table name.
    Exact,
}

impl Default for ButtonMatch {
    fn default() -> Self {
        if cfg!(feature = "exact-buttons") {
            ButtonMatch::Exact
        } else {
            ButtonMatch::Prefix
        }
    }
}

/// Looks up a button name using the default matching mode.
pub fn decode_button(text: impl AsRef<[u8]>) -> Option<Buttons> {
    decode_button_with(text, ButtonMatch::default())
}

/// Looks up a button name. The first table entry that matches wins.
pub fn decode_button_with(text: impl AsRef<[u8]>, mode: ButtonMatch) -> Option<Buttons> {
    let text = text.as_ref();
    BUTTON_TABLE
        .iter()
        .find(|(name, _)| match mode {
            ButtonMatch::Prefix => text.starts_with(name.as_bytes()),
            ButtonMatch::Exact => text == name.as_bytes(),
        })
        .map(|&(_, flag)| flag)
}

/// Renders the mask with table names, e.g. `R|Start`, or `None` when empty.
impl fmt::Display for Buttons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str(BUTTON_NAMES[0]);
        }
        let mut separator = "";
        for (name, flag) in &BUTTON_TABLE[1..] {
            if self.contains(*flag) {
                write!(f, "{separator}{name}")?;
                separator = "|";
            }
        }
        Ok(())
    }
}
