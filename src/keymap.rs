//! Physical-Key and Modifier Resolution
//!
//! Works on server-independent snapshots of the keyboard and modifier
//! mappings, fetched once per call by the connection scope. Keysym to
//! keycode lookup mirrors Xlib's `XKeysymToKeycode` scan order; the
//! modifier search mirrors its `keysyms_per_keycode` column indexing,
//! extended with discovered level-shift masks so three- and four-level
//! layouts work without hardcoding their names.

use crate::keysym::{Keysym, XK_ISO_LEVEL3_SHIFT, XK_MODE_SWITCH};
use tracing::trace;

/// X11 keycode (layout-dependent physical key position)
pub type Keycode = u8;

/// Shift modifier bit, as used in core event `state` fields
pub const SHIFT_MASK: u16 = 1 << 0;

/// First modifier-map row that can carry a level shift (Mod1)
const MOD1_INDEX: usize = 3;
/// Rows in the modifier map (Shift, Lock, Control, Mod1..Mod5)
const MODIFIER_ROWS: usize = 8;

/// One fully resolved keypress: the sole artifact the resolution phase
/// hands to the injection phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedKeypress {
    /// Physical key code to press
    pub keycode: Keycode,
    /// Modifier bits that must be held for the keycode to produce the
    /// intended symbol
    pub state: u16,
}

impl ResolvedKeypress {
    /// True when the shift modifier must be held for this keypress
    pub fn needs_shift(&self) -> bool {
        self.state & SHIFT_MASK != 0
    }
}

/// Snapshot of the server's keyboard mapping
///
/// Row per keycode, `keysyms_per_keycode` columns per row. Column
/// positions correspond to modifier combinations (plain, shift, then
/// the layout's extra levels).
#[derive(Debug, Clone)]
pub struct KeyboardMap {
    min_keycode: Keycode,
    keysyms_per_keycode: usize,
    keysyms: Vec<Keysym>,
}

impl KeyboardMap {
    /// Build a keyboard map from a `GetKeyboardMapping` reply
    pub fn new(min_keycode: Keycode, keysyms_per_keycode: usize, keysyms: Vec<Keysym>) -> Self {
        Self {
            min_keycode,
            keysyms_per_keycode,
            keysyms,
        }
    }

    /// Keysym list a keycode can produce, indexed by modifier level
    pub fn keysyms_for(&self, keycode: Keycode) -> &[Keysym] {
        if keycode < self.min_keycode || self.keysyms_per_keycode == 0 {
            return &[];
        }
        let row = (keycode - self.min_keycode) as usize;
        let start = row * self.keysyms_per_keycode;
        let end = start + self.keysyms_per_keycode;
        if end > self.keysyms.len() {
            return &[];
        }
        &self.keysyms[start..end]
    }

    /// First keycode bound to a keysym under the active layout
    ///
    /// Column-major scan, matching `XKeysymToKeycode`: a plain binding
    /// on any key wins over a shifted binding on a lower keycode.
    pub fn keycode_for(&self, sym: Keysym) -> Option<Keycode> {
        if self.keysyms_per_keycode == 0 {
            return None;
        }
        let rows = self.keysyms.len() / self.keysyms_per_keycode;
        for column in 0..self.keysyms_per_keycode {
            for row in 0..rows {
                if self.keysyms[row * self.keysyms_per_keycode + column] == sym {
                    return Some(self.min_keycode + row as Keycode);
                }
            }
        }
        None
    }
}

/// Snapshot of the server's modifier mapping
///
/// Eight rows (Shift, Lock, Control, Mod1..Mod5), each listing the
/// keycodes attached to that modifier bit.
#[derive(Debug, Clone)]
pub struct ModifierMap {
    keycodes_per_modifier: usize,
    keycodes: Vec<Keycode>,
}

impl ModifierMap {
    /// Build a modifier map from a `GetModifierMapping` reply
    pub fn new(keycodes_per_modifier: usize, keycodes: Vec<Keycode>) -> Self {
        Self {
            keycodes_per_modifier,
            keycodes,
        }
    }

    /// Keycodes attached to one modifier row (0 = Shift .. 7 = Mod5)
    pub fn row(&self, index: usize) -> &[Keycode] {
        let start = index * self.keycodes_per_modifier;
        let end = start + self.keycodes_per_modifier;
        if index >= MODIFIER_ROWS || end > self.keycodes.len() {
            return &[];
        }
        &self.keycodes[start..end]
    }
}

/// Modifier bits that make `keycode` produce `sym`
///
/// The candidate list starts `[none, shift]` and is extended with any
/// level-shift masks the layout defines (Mode_switch, ISO_Level3_Shift)
/// OR'd over the existing candidates. The smallest matching column
/// wins, so "no modifier" is always preferred over "shift" and the
/// extra levels come last.
///
/// Returns 0 when no candidate matches. That is deliberate best-effort
/// behavior inherited from the original engine: a wrong character in
/// the target is preferred over aborting the whole string, because
/// later characters may still resolve correctly.
pub fn modifier_mask_for(
    kbmap: &KeyboardMap,
    modmap: &ModifierMap,
    keycode: Keycode,
    sym: Keysym,
) -> u16 {
    let syms = kbmap.keysyms_for(keycode);
    if syms.is_empty() {
        return 0;
    }

    let mut masks: Vec<u16> = vec![0, SHIFT_MASK];
    for level_sym in [XK_MODE_SWITCH, XK_ISO_LEVEL3_SHIFT] {
        let mask = level_shift_mask(kbmap, modmap, level_sym);
        // The two symbols may land on the same modifier; only extend
        // the candidates with masks not already tried.
        if mask != 0 && !masks.contains(&mask) {
            let extended: Vec<u16> = masks.iter().map(|m| m | mask).collect();
            masks.extend(extended);
        }
    }

    let limit = masks.len().min(syms.len());
    match syms[..limit].iter().position(|&s| s == sym) {
        Some(column) => masks[column],
        None => {
            trace!(keycode, keysym = sym, "no modifier combination matched, using none");
            0
        }
    }
}

/// Modifier mask of the row a level-shift keysym is attached to
///
/// Scans Mod1..Mod5 for a keycode whose symbol list contains `sym`.
/// Returns 0 when the layout does not bind the symbol to a modifier.
fn level_shift_mask(kbmap: &KeyboardMap, modmap: &ModifierMap, sym: Keysym) -> u16 {
    for index in MOD1_INDEX..MODIFIER_ROWS {
        for &keycode in modmap.row(index) {
            if keycode == 0 {
                continue;
            }
            if kbmap.keysyms_for(keycode).contains(&sym) {
                return 1 << index;
            }
        }
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    // Two-column map: keycode 10 is 'a'/'A', keycode 11 is '1'/'!',
    // keycode 20 is Mode_switch, keycode 21 carries 'q' on level 3.
    fn two_level_map() -> KeyboardMap {
        let mut keysyms = vec![0; 4 * 30];
        let mut bind = |keycode: usize, column: usize, sym: Keysym| {
            keysyms[(keycode - 8) * 4 + column] = sym;
        };
        bind(10, 0, 'a' as u32);
        bind(10, 1, 'A' as u32);
        bind(11, 0, '1' as u32);
        bind(11, 1, '!' as u32);
        bind(20, 0, XK_MODE_SWITCH);
        bind(21, 0, 'q' as u32);
        bind(21, 1, 'Q' as u32);
        bind(21, 2, '@' as u32);
        KeyboardMap::new(8, 4, keysyms)
    }

    fn empty_modmap() -> ModifierMap {
        ModifierMap::new(2, vec![0; 16])
    }

    fn mode_switch_on_mod5() -> ModifierMap {
        let mut keycodes = vec![0; 16];
        keycodes[7 * 2] = 20; // Mod5 row, first slot
        ModifierMap::new(2, keycodes)
    }

    #[test]
    fn test_keycode_lookup() {
        let map = two_level_map();
        assert_eq!(map.keycode_for('a' as u32), Some(10));
        assert_eq!(map.keycode_for('A' as u32), Some(10));
        assert_eq!(map.keycode_for('!' as u32), Some(11));
        assert_eq!(map.keycode_for(0x20ac), None);
    }

    #[test]
    fn test_keycode_lookup_prefers_plain_binding() {
        // 'x' bound plain on 25 and shifted on 12: plain binding wins
        // even though 12 is the lower keycode.
        let mut keysyms = vec![0; 4 * 30];
        keysyms[(12 - 8) * 4 + 1] = 'x' as u32;
        keysyms[(25 - 8) * 4] = 'x' as u32;
        let map = KeyboardMap::new(8, 4, keysyms);
        assert_eq!(map.keycode_for('x' as u32), Some(25));
    }

    #[test]
    fn test_keysyms_for_out_of_range() {
        let map = two_level_map();
        assert!(map.keysyms_for(7).is_empty());
        assert!(map.keysyms_for(200).is_empty());
    }

    #[test]
    fn test_unshifted_letter_has_no_modifier() {
        let map = two_level_map();
        let state = modifier_mask_for(&map, &empty_modmap(), 10, 'a' as u32);
        assert_eq!(state, 0);
    }

    #[test]
    fn test_shifted_letter_needs_shift() {
        let map = two_level_map();
        let state = modifier_mask_for(&map, &empty_modmap(), 10, 'A' as u32);
        assert_eq!(state, SHIFT_MASK);
    }

    #[test]
    fn test_shifted_punctuation_needs_shift() {
        let map = two_level_map();
        let state = modifier_mask_for(&map, &empty_modmap(), 11, '!' as u32);
        assert_eq!(state, SHIFT_MASK);
    }

    #[test]
    fn test_level_shift_discovery() {
        let map = two_level_map();
        let modmap = mode_switch_on_mod5();
        assert_eq!(level_shift_mask(&map, &modmap, XK_MODE_SWITCH), 1 << 7);
        assert_eq!(level_shift_mask(&map, &modmap, XK_ISO_LEVEL3_SHIFT), 0);
    }

    #[test]
    fn test_third_level_symbol_uses_discovered_mask() {
        let map = two_level_map();
        let modmap = mode_switch_on_mod5();
        // Candidates become [0, Shift, Mod5, Shift|Mod5]; '@' sits in
        // column 2 of keycode 21.
        let state = modifier_mask_for(&map, &modmap, 21, '@' as u32);
        assert_eq!(state, 1 << 7);
    }

    #[test]
    fn test_no_match_returns_no_modifiers() {
        let map = two_level_map();
        // 'z' is not on keycode 10 at all: best-effort fallback.
        let state = modifier_mask_for(&map, &empty_modmap(), 10, 'z' as u32);
        assert_eq!(state, 0);
    }

    #[test]
    fn test_extra_levels_ignored_without_modmap_binding() {
        let map = two_level_map();
        // Mode_switch keysym exists on keycode 20 but no modifier row
        // carries keycode 20, so only [0, Shift] are candidates and the
        // level-3 '@' cannot match.
        let state = modifier_mask_for(&map, &empty_modmap(), 21, '@' as u32);
        assert_eq!(state, 0);
    }

    #[test]
    fn test_modifier_row_bounds() {
        let modmap = ModifierMap::new(2, vec![0; 16]);
        assert_eq!(modmap.row(0).len(), 2);
        assert_eq!(modmap.row(7).len(), 2);
        assert!(modmap.row(8).is_empty());
    }
}
