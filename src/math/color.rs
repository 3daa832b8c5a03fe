//! sRGB to CIE L*a*b* conversion
//!
//! Uses the D65 reference white and the 2° observer. Euclidean distance in
//! L*a*b* approximates perceived color difference far better than distance
//! in gamma-encoded RGB, which is what makes tile matching look right.

use image::RgbImage;
use ndarray::Array2;

/// D65 reference white (2° observer)
const WHITE_POINT: [f64; 3] = [0.950_47, 1.0, 1.088_83];

/// Linear RGB to XYZ matrix for the sRGB primaries
const RGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.412_453, 0.357_580, 0.180_423],
    [0.212_671, 0.715_160, 0.072_169],
    [0.019_334, 0.119_193, 0.950_227],
];

const LAB_EPSILON: f64 = 0.008_856;
const LAB_KAPPA_SLOPE: f64 = 7.787;
const LAB_OFFSET: f64 = 16.0 / 116.0;

/// A color in CIE L*a*b* space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Lab {
    /// Lightness, 0 (black) to 100 (white)
    pub l: f64,
    /// Green (negative) to red (positive)
    pub a: f64,
    /// Blue (negative) to yellow (positive)
    pub b: f64,
}

impl Lab {
    /// Create a color from its three components
    pub const fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Squared Euclidean distance, cheaper when only ordering matters
    pub fn distance_squared(&self, other: &Self) -> f64 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl.mul_add(dl, da.mul_add(da, db * db))
    }

    /// Euclidean distance (CIE76 delta E)
    pub fn distance(&self, other: &Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// Undo the sRGB transfer curve for a channel in `[0, 1]`
pub fn srgb_to_linear(channel: f64) -> f64 {
    if channel > 0.040_45 {
        ((channel + 0.055) / 1.055).powf(2.4)
    } else {
        channel / 12.92
    }
}

fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        LAB_KAPPA_SLOPE.mul_add(t, LAB_OFFSET)
    }
}

fn linear_rgb_to_lab(linear: [f64; 3]) -> Lab {
    let mut xyz = [0.0; 3];
    for (component, (row, white)) in xyz
        .iter_mut()
        .zip(RGB_TO_XYZ.iter().zip(WHITE_POINT.iter()))
    {
        let value = row[0].mul_add(linear[0], row[1].mul_add(linear[1], row[2] * linear[2]));
        *component = lab_f(value / white);
    }
    let [fx, fy, fz] = xyz;
    Lab {
        l: 116.0f64.mul_add(fy, -16.0),
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Convert an 8-bit sRGB color to L*a*b*
pub fn srgb_to_lab(rgb: [u8; 3]) -> Lab {
    linear_rgb_to_lab(rgb.map(|c| srgb_to_linear(f64::from(c) / 255.0)))
}

/// Convert every pixel of an image to L*a*b* in one pass
///
/// The returned array is indexed `[row, col]`. Channel linearization goes
/// through a 256-entry table so large images stay cheap.
pub fn image_to_lab(image: &RgbImage) -> Array2<Lab> {
    let mut table = [0.0; 256];
    for (value, slot) in table.iter_mut().enumerate() {
        *slot = srgb_to_linear(value as f64 / 255.0);
    }
    let linearize = |c: u8| table.get(usize::from(c)).copied().unwrap_or_default();

    let (width, height) = image.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(row, col)| {
        let pixel = image.get_pixel(col as u32, row as u32);
        linear_rgb_to_lab([linearize(pixel[0]), linearize(pixel[1]), linearize(pixel[2])])
    })
}
