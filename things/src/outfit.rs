use crate::error::ThingError;

/// Highest palette code, 19 hues times 7 shades minus one.
pub const MAX_PALETTE_CODE: u8 = 132;

/// Player colors for an outfit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutfitData {
    pub head: u8,
    pub body: u8,
    pub legs: u8,
    pub feet: u8,
    /// Bit `n` unlocks pattern y row `n + 1`.
    pub addons: u8,
}

impl OutfitData {
    pub fn new(head: u8, body: u8, legs: u8, feet: u8, addons: u8) -> Result<Self, ThingError> {
        if let Some(code) = [head, body, legs, feet]
            .into_iter()
            .find(|code| *code > MAX_PALETTE_CODE)
        {
            return Err(ThingError::InvalidPaletteCode { code });
        }

        Ok(Self {
            head,
            body,
            legs,
            feet,
            addons,
        })
    }

    /// Row 0 is the base outfit and always drawn.
    pub fn has_addon_row(&self, pattern_y: u8) -> bool {
        match pattern_y {
            0 => true,
            y if y <= 8 => self.addons & (1 << (y - 1)) != 0,
            _ => false,
        }
    }
}
