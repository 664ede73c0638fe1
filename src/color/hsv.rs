//! Integer HSV conversion
//!
//! Hue is kept in degrees (0-359) instead of the 0-255 circle used by
//! `smart_leds::hsv`, so a gain round trip does not lose hue resolution.

use super::Rgb;

/// Hue in degrees, saturation and value on 0-255
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Hsv {
    pub hue: u16,
    pub sat: u8,
    pub val: u8,
}

/// Convert RGB to HSV
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rgb2hsv(rgb: Rgb) -> Hsv {
    let (r, g, b) = (i32::from(rgb.r), i32::from(rgb.g), i32::from(rgb.b));
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);

    if max == 0 {
        return Hsv::default();
    }

    let delta = max - min;
    let sat = (255 * delta / max) as u8;
    if sat == 0 {
        return Hsv {
            hue: 0,
            sat: 0,
            val: max as u8,
        };
    }

    let hue = if max == r {
        // start from 360 so the intermediate never goes negative
        let h = 360 + 60 * (g - b) / delta;
        if h > 359 { h - 360 } else { h }
    } else if max == g {
        120 + 60 * (b - r) / delta
    } else {
        240 + 60 * (r - g) / delta
    };

    Hsv {
        hue: hue as u16,
        sat,
        val: max as u8,
    }
}

/// Convert HSV back to RGB
#[allow(clippy::cast_possible_truncation)]
pub fn hsv2rgb(hsv: Hsv) -> Rgb {
    let value = u32::from(hsv.val);
    let sat = u32::from(hsv.sat);
    if sat == 0 {
        return Rgb {
            r: hsv.val,
            g: hsv.val,
            b: hsv.val,
        };
    }

    let hue = u32::from(hsv.hue % 360);
    let region = hue / 60;
    let remainder = (hue - region * 60) * 256 / 60;

    let p = ((value * (255 - sat)) >> 8) as u8;
    let q = ((value * (255 - ((sat * remainder) >> 8))) >> 8) as u8;
    let t = ((value * (255 - ((sat * (255 - remainder)) >> 8))) >> 8) as u8;
    let v = hsv.val;

    let (r, g, b) = match region {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };
    Rgb { r, g, b }
}
