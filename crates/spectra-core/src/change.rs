// SPDX-License-Identifier: MIT
//
// Change events and the recompute policy.
//
// Every palette mutation is described by a `Change` bitmask. A single
// event may carry several kinds at once (selecting another swatch moves
// hue, saturation and value together). The widget maps the mask through
// a fixed table onto the work it has to do:
//
//   SATURATION | VALUE  →  rebuild the spectrum table      O(N)
//   SELECTION  | HUE    →  move the cursor from the hue    O(1)
//
// Resizes are not change events; they go straight to the minimap.

use bitflags::bitflags;

bitflags! {
    /// Kinds of palette mutation, combinable into one event.
    ///
    /// ```
    /// use spectra_core::change::Change;
    ///
    /// let ev = Change::VALUE_CHANGED | Change::SELECTION_CHANGED;
    /// assert!(ev.includes(Change::HUE_CHANGED | Change::SELECTION_CHANGED));
    /// assert!(!ev.includes(Change::SATURATION_CHANGED));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Change: u8 {
        const HUE_CHANGED        = 1 << 0;
        const SATURATION_CHANGED = 1 << 1;
        const VALUE_CHANGED      = 1 << 2;
        const SELECTION_CHANGED  = 1 << 3;
    }
}

impl Change {
    /// Whether this event shares at least one kind with `any`.
    #[inline]
    #[must_use]
    pub const fn includes(self, any: Self) -> bool {
        self.intersects(any)
    }
}

/// The work a change event calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Recompute {
    /// Re-evaluate every entry of the spectrum table.
    pub rebuild_table: bool,
    /// Re-derive the cursor from the current hue.
    pub sync_cursor: bool,
}

impl Recompute {
    /// Apply the policy table to `change`.
    #[must_use]
    pub const fn for_change(change: Change) -> Self {
        Self {
            rebuild_table: change.includes(Change::SATURATION_CHANGED.union(Change::VALUE_CHANGED)),
            sync_cursor: change.includes(Change::SELECTION_CHANGED.union(Change::HUE_CHANGED)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn includes_any_of() {
        let ev = Change::HUE_CHANGED;
        assert!(ev.includes(Change::HUE_CHANGED));
        assert!(ev.includes(Change::HUE_CHANGED | Change::VALUE_CHANGED));
        assert!(!ev.includes(Change::VALUE_CHANGED));
        assert!(!ev.includes(Change::empty()));
        assert!(!Change::empty().includes(Change::all()));
    }

    #[test]
    fn policy_table() {
        let cases = [
            (Change::HUE_CHANGED, false, true),
            (Change::SELECTION_CHANGED, false, true),
            (Change::SATURATION_CHANGED, true, false),
            (Change::VALUE_CHANGED, true, false),
            (Change::VALUE_CHANGED | Change::HUE_CHANGED, true, true),
            (Change::all(), true, true),
            (Change::empty(), false, false),
        ];
        for (change, rebuild_table, sync_cursor) in cases {
            assert_eq!(
                Recompute::for_change(change),
                Recompute { rebuild_table, sync_cursor },
                "{change:?}"
            );
        }
    }
}
