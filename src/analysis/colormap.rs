// src/analysis/colormap.rs

/// 8-bit RGB display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

impl Rgb {
  pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

  const fn from_u32(hex: u32) -> Self {
    Rgb {
      r: ((hex >> 16) & 0xff) as u8,
      g: ((hex >> 8) & 0xff) as u8,
      b: (hex & 0xff) as u8,
    }
  }

  /// Parses "#RRGGBB".
  pub fn from_hex(text: &str) -> Option<Self> {
    let digits = text.strip_prefix('#')?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
      return None;
    }
    u32::from_str_radix(digits, 16).ok().map(Rgb::from_u32)
  }

  pub fn to_hex(self) -> String {
    format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
  }

  /// Components in [0, 1], as cairo expects them.
  pub fn to_f64(self) -> (f64, f64, f64) {
    (
      self.r as f64 / 255.0,
      self.g as f64 / 255.0,
      self.b as f64 / 255.0,
    )
  }
}

// Evenly spaced control points, sampled from the matplotlib definitions.
const CIVIDIS: &[u32] = &[
  0x00224e, 0x123570, 0x3b496c, 0x575d6d, 0x707173, 0x8a8678, 0xa59c74, 0xc3b369, 0xe1cc55,
  0xfee838,
];
const VIRIDIS: &[u32] = &[
  0x440154, 0x472d7b, 0x3b528b, 0x2c728e, 0x21918c, 0x28ae80, 0x5ec962, 0xaddc30, 0xfde725,
];
const PLASMA: &[u32] = &[
  0x0d0887, 0x46039f, 0x7201a8, 0x9c179e, 0xbd3786, 0xd8576b, 0xed7953, 0xfb9f3a, 0xfdca26,
  0xf0f921,
];
const INFERNO: &[u32] = &[
  0x000004, 0x1b0c41, 0x4a0c6b, 0x781c6d, 0xa52c60, 0xcf4446, 0xed6925, 0xfb9b06, 0xf7d13d,
  0xfcffa4,
];
const MAGMA: &[u32] = &[
  0x000004, 0x180f3d, 0x440f76, 0x721f81, 0x9e2f7f, 0xcd4071, 0xf1605d, 0xfd9668, 0xfeca8d,
  0xfcfdbf,
];
const COOLWARM: &[u32] = &[
  0x3b4cc0, 0x6282ea, 0x8db0fe, 0xb8d0f9, 0xdddcdc, 0xf5c4ac, 0xf39b7a, 0xde604d, 0xb40426,
];
const RDBU: &[u32] = &[
  0x67001f, 0xb2182b, 0xd6604d, 0xf4a582, 0xfddbc7, 0xf7f7f7, 0xd1e5f0, 0x92c5de, 0x4393c3,
  0x2166ac, 0x053061,
];
const SPECTRAL: &[u32] = &[
  0x9e0142, 0xd53e4f, 0xf46d43, 0xfdae61, 0xfee08b, 0xffffbf, 0xe6f598, 0xabdda4, 0x66c2a5,
  0x3288bd, 0x5e4fa2,
];
const JET: &[u32] = &[
  0x000080, 0x0000ff, 0x0080ff, 0x00ffff, 0x80ff80, 0xffff00, 0xff8000, 0xff0000, 0x800000,
];
const GRAY: &[u32] = &[0x000000, 0xffffff];

const CATALOGUE: [(&str, &[u32]); 10] = [
  ("cividis", CIVIDIS),
  ("viridis", VIRIDIS),
  ("plasma", PLASMA),
  ("inferno", INFERNO),
  ("magma", MAGMA),
  ("coolwarm", COOLWARM),
  ("RdBu", RDBU),
  ("Spectral", SPECTRAL),
  ("jet", JET),
  ("gray", GRAY),
];

pub const DEFAULT_COLORMAP: &str = "cividis";

/// A piecewise-linear colormap over [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colormap {
  stops: &'static [u32],
  reversed: bool,
}

impl Colormap {
  /// Looks up a catalogue entry; a `_r` suffix reverses it.
  pub fn by_name(name: &str) -> Option<Self> {
    let (base, reversed) = match name.strip_suffix("_r") {
      Some(base) => (base, true),
      None => (name, false),
    };
    CATALOGUE
      .iter()
      .find(|(n, _)| *n == base)
      .map(|(_, stops)| Colormap { stops, reversed })
  }

  /// Unknown names fall back to the default map.
  pub fn by_name_or_default(name: &str) -> Self {
    Self::by_name(name).unwrap_or(Colormap {
      stops: CIVIDIS,
      reversed: false,
    })
  }

  /// All selectable names, each followed by its reversed variant.
  pub fn names() -> Vec<String> {
    CATALOGUE
      .iter()
      .flat_map(|(n, _)| [n.to_string(), format!("{}_r", n)])
      .collect()
  }

  /// Color at `t`, clamped to [0, 1]. NaN maps to the low end.
  pub fn at(&self, t: f64) -> Rgb {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let t = if self.reversed { 1.0 - t } else { t };

    let segments = self.stops.len() - 1;
    let pos = t * segments as f64;
    let i = (pos.floor() as usize).min(segments - 1);
    let f = pos - i as f64;

    let lo = Rgb::from_u32(self.stops[i]);
    let hi = Rgb::from_u32(self.stops[i + 1]);
    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
    Rgb {
      r: mix(lo.r, hi.r),
      g: mix(lo.g, hi.g),
      b: mix(lo.b, hi.b),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn endpoints_hit_the_first_and_last_stop() {
    let cm = Colormap::by_name("viridis").unwrap();
    assert_eq!(cm.at(0.0).to_hex(), "#440154");
    assert_eq!(cm.at(1.0).to_hex(), "#fde725");
    assert_eq!(cm.at(-3.0), cm.at(0.0));
    assert_eq!(cm.at(7.0), cm.at(1.0));
  }

  #[test]
  fn reversed_variant_swaps_ends() {
    let cm = Colormap::by_name("cividis").unwrap();
    let rev = Colormap::by_name("cividis_r").unwrap();
    assert_eq!(cm.at(0.0), rev.at(1.0));
    assert_eq!(cm.at(0.25), rev.at(0.75));
  }

  #[test]
  fn gray_is_linear() {
    let cm = Colormap::by_name("gray").unwrap();
    assert_eq!(cm.at(0.5).to_hex(), "#808080");
  }

  #[test]
  fn catalogue_names_resolve() {
    let names = Colormap::names();
    assert_eq!(names.len(), 20);
    assert!(names.iter().all(|n| Colormap::by_name(n).is_some()));
    assert!(Colormap::by_name("rainbow").is_none());
    assert_eq!(
      Colormap::by_name_or_default("rainbow"),
      Colormap::by_name(DEFAULT_COLORMAP).unwrap()
    );
  }

  #[test]
  fn hex_round_trip() {
    let c = Rgb::from_hex("#FF0D0D").unwrap();
    assert_eq!(c, Rgb { r: 255, g: 13, b: 13 });
    assert_eq!(c.to_hex(), "#ff0d0d");
    assert!(Rgb::from_hex("FF0D0D").is_none());
    assert!(Rgb::from_hex("#FF0D0").is_none());
  }
}
