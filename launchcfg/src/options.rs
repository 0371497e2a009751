// SPDX-License-Identifier: Apache-2.0

use crate::buttons::ButtonMatch;

/// Runtime knobs for [`crate::parse_config_with`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// How `buttons` elements are looked up. Defaults to the crate-wide
    /// mode chosen by the `exact-buttons` feature.
    pub button_match: ButtonMatch,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_button_match(mut self, button_match: ButtonMatch) -> Self {
        self.button_match = button_match;
        self
    }
}
