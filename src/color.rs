//! Packed color codec.
//!
//! Colors are `u32` values with R in the least-significant byte, then G,
//! B and A. Clustering works on the expanded form, four `f64` channels.

/// Four channel values `[r, g, b, a]`, 0-255 for colors that came from a
/// packed value. Means computed during clustering may be fractional.
pub type ColorVector = [f64; 4];

/// Splits a packed color into its raw channel bytes `[r, g, b, a]`.
#[inline]
#[must_use]
pub fn expand_bytes(color: u32) -> [u8; 4] {
    color.to_le_bytes()
}

/// Expands a packed color into channel values.
///
/// # Examples
///
/// ```
/// use aprender_palette::color::expand;
///
/// assert_eq!(expand(0x1122_3344), [68.0, 51.0, 34.0, 17.0]);
/// ```
#[inline]
#[must_use]
pub fn expand(color: u32) -> ColorVector {
    let [r, g, b, a] = expand_bytes(color);
    [f64::from(r), f64::from(g), f64::from(b), f64::from(a)]
}

/// Packs channel values back into a color.
///
/// Channels are not clamped. Each one is truncated toward zero and wrapped
/// to 32 bits before shifting, so a value above 255 spills into the next
/// channel and a negative value sets high bits. NaN and infinite channels
/// (left by clusters that received no colors) contribute 0.
///
/// # Examples
///
/// ```
/// use aprender_palette::color::compress;
///
/// assert_eq!(compress(&[68.0, 51.0, 34.0, 17.0]), 0x1122_3344);
/// assert_eq!(compress(&[127.5, 0.0, 0.0, 0.0]), 127);
/// ```
#[must_use]
pub fn compress(vector: &ColorVector) -> u32 {
    let r = channel_bits(vector[0]);
    let g = channel_bits(vector[1]) << 8;
    let b = channel_bits(vector[2]) << 16;
    let a = channel_bits(vector[3]) << 24;
    r | g | b | a
}

#[inline]
fn channel_bits(value: f64) -> u32 {
    if value.is_finite() {
        // Saturating cast, then keep the low 32 bits.
        value.trunc() as i64 as u32
    } else {
        0
    }
}

/// Squared Euclidean distance over all four channels.
#[inline]
#[must_use]
pub fn distance_squared(a: &ColorVector, b: &ColorVector) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    let da = a[3] - b[3];
    dr * dr + dg * dg + db * db + da * da
}
