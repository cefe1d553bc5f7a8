//! Outfit palette codes to colors.
//!
//! A palette code picks one of 19 hues in one of 7 saturation/intensity shades.
//! Hue 0 of every shade is a gray.

const HSI_STEPS: u32 = 19;
const HSI_VALUES: u32 = 7;

/// (saturation, intensity) per shade.
const HSI_SHADES: [(f64, f64); HSI_VALUES as usize] = [
    (0.25, 1.0),
    (0.25, 0.75),
    (0.5, 0.75),
    (0.667, 0.75),
    (1.0, 1.0),
    (1.0, 0.75),
    (1.0, 0.5),
];

/// 0xRRGGBB of a palette code. Codes past the palette are read as 0.
pub fn hsi_to_rgb(code: u8) -> u32 {
    let code = code as u32;
    let code = if code >= HSI_STEPS * HSI_VALUES {
        0
    } else {
        code
    };

    let (hue, saturation, intensity) = if code % HSI_STEPS == 0 {
        (
            0.,
            0.,
            1. - code as f64 / HSI_STEPS as f64 / HSI_VALUES as f64,
        )
    } else {
        let (saturation, intensity) = HSI_SHADES[(code / HSI_STEPS) as usize];

        (
            (code % HSI_STEPS) as f64 * (1. / 18.),
            saturation,
            intensity,
        )
    };

    if intensity == 0. {
        return 0;
    }

    if saturation == 0. {
        let gray = channel(intensity);
        return pack_rgb(gray, gray, gray);
    }

    let low = intensity * (1. - saturation);
    let sector = hue * 6.;

    let (r, g, b) = if hue < 1. / 6. {
        (intensity, low + (intensity - low) * sector, low)
    } else if hue < 2. / 6. {
        (intensity - (intensity - low) * (sector - 1.), intensity, low)
    } else if hue < 3. / 6. {
        (low, intensity, low + (intensity - low) * (sector - 2.))
    } else if hue < 4. / 6. {
        (low, intensity - (intensity - low) * (sector - 3.), intensity)
    } else if hue < 5. / 6. {
        (low + (intensity - low) * (sector - 4.), low, intensity)
    } else {
        (intensity, low, intensity - (intensity - low) * (sector - 5.))
    };

    pack_rgb(channel(r), channel(g), channel(b))
}

/// [`hsi_to_rgb`] with full alpha.
pub fn hsi_to_argb(code: u8) -> u32 {
    to_argb(hsi_to_rgb(code), 0xFF)
}

pub fn to_argb(rgb: u32, alpha: u8) -> u32 {
    ((alpha as u32) << 24) | (rgb & 0x00FF_FFFF)
}

/// Per channel factors in `0..=1` to multiply a pixel by, red first.
pub fn rgb_multipliers(argb: u32) -> [f32; 3] {
    [16, 8, 0].map(|shift| ((argb >> shift) & 0xFF) as f32 / 255.)
}

/// ARGB to the byte order of an RGBA pixel.
pub fn argb_to_rgba(argb: u32) -> [u8; 4] {
    let [a, r, g, b] = argb.to_be_bytes();
    [r, g, b, a]
}

fn channel(value: f64) -> u8 {
    // truncates
    (value * 255.) as u8
}

fn pack_rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}
