//! Binary code modulation plane extraction
//!
//! HUB75 panels take one bit per color channel per clock, for two rows
//! at once (the top and bottom half share column drivers). Brightness
//! depth comes from scanning several bit planes per row pair and
//! holding the display enable proportionally to the plane weight.
//!
//! Data word layout per column, matching the shift register order:
//! bit 0 = R1, 1 = G1, 2 = B1 (top row), bit 3 = R2, 4 = G2, 5 = B2
//! (bottom row).

/// Number of bit planes scanned per row pair. Four planes of the RGB565
/// channel MSBs give 16 brightness levels per channel.
pub const BCM_PLANES: usize = 4;

/// Extract one channel bit for the given plane from a packed pixel.
///
/// Plane 0 is the least significant of the planes scanned; plane
/// `BCM_PLANES - 1` maps to each channel's most significant bit.
fn channel_bits(px: u16, plane: usize) -> u8 {
    let r5 = (px >> 11) & 0x1F;
    let g6 = (px >> 5) & 0x3F;
    let b5 = px & 0x1F;

    // Take the top BCM_PLANES bits of each channel
    let r = (r5 >> (1 + plane)) & 1;
    let g = (g6 >> (2 + plane)) & 1;
    let b = (b5 >> (1 + plane)) & 1;

    (r | (g << 1) | (b << 2)) as u8
}

/// Build the column data words for one row pair and plane.
///
/// `top` and `bottom` are the packed pixel rows for `y` and
/// `y + height/2`; `out` receives one 6-bit word per column.
pub fn row_plane_words(top: &[u16], bottom: &[u16], plane: usize, out: &mut [u8]) {
    for (i, word) in out.iter_mut().enumerate() {
        let t = channel_bits(top[i], plane);
        let b = channel_bits(bottom[i], plane);
        *word = t | (b << 3);
    }
}

/// Display-enable hold time weight for a plane, in arbitrary units.
pub const fn plane_weight(plane: usize) -> u32 {
    1 << plane
}
