//! Parsing web color notation and interpolating between two colors
mod named;
use crate::error::ColorParseError;
use std::fmt;
use std::str::FromStr;

/// An RGB color with 8-bit channels
///
/// Displays as `#rrggbb` with lowercase, zero-padded hex digits.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const fn new(red: u8, green: u8, blue: u8) -> Rgb {
        Rgb { red, green, blue }
    }

    /// Returns the color `percent` of the way from `self` to `other`.
    ///
    /// `percent` is clamped to `[0, 1]`; NaN is treated as 0.
    pub fn lerp(self, other: Rgb, percent: f64) -> Rgb {
        let p = if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, 1.0)
        };
        let channel = |a: u8, b: u8| {
            let a = f64::from(a);
            clamp_channel(p.mul_add(f64::from(b) - a, a))
        };
        Rgb {
            red: channel(self.red, other.red),
            green: channel(self.green, other.green),
            blue: channel(self.blue, other.blue),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    /// Accepts hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), CSS color
    /// names, `rgb()`/`rgba()`, and `hsl()`/`hsla()`.  Any alpha component is
    /// validated and then discarded.
    fn from_str(s: &str) -> Result<Rgb, ColorParseError> {
        let lower = s.trim().to_ascii_lowercase();
        let parsed = if let Some(hex) = lower.strip_prefix('#') {
            parse_hex(hex)
        } else if let Some(args) = functional_args(&lower, "rgb") {
            parse_rgb_args(&args)
        } else if let Some(args) = functional_args(&lower, "hsl") {
            parse_hsl_args(&args)
        } else {
            named::lookup(&lower)
        };
        parsed.ok_or_else(|| ColorParseError::new(s))
    }
}

/// The two endpoints of a heatmap gradient, resolved once up front
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ColorScale {
    pub min: Rgb,
    pub max: Rgb,
}

impl ColorScale {
    pub fn new(min: Rgb, max: Rgb) -> ColorScale {
        ColorScale { min, max }
    }

    pub fn parse(min_color: &str, max_color: &str) -> Result<ColorScale, ColorParseError> {
        Ok(ColorScale {
            min: min_color.parse()?,
            max: max_color.parse()?,
        })
    }

    pub fn at(&self, percent: f64) -> Rgb {
        self.min.lerp(self.max, percent)
    }
}

/// Computes the color `percent` of the way from `min_color` to `max_color`
/// and returns it as a `#rrggbb` string.
pub fn interpolate(
    min_color: &str,
    max_color: &str,
    percent: f64,
) -> Result<String, ColorParseError> {
    Ok(ColorScale::parse(min_color, max_color)?
        .at(percent)
        .to_string())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_channel(value: f64) -> u8 {
    // Clamped into u8 range first, so the cast cannot wrap
    value.round().clamp(0.0, 255.0) as u8
}

fn parse_hex(digits: &str) -> Option<Rgb> {
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        3 | 4 => {
            let mut nibbles = digits.chars().filter_map(|c| c.to_digit(16));
            let mut next = || {
                nibbles
                    .next()
                    .and_then(|n| u8::try_from(n * 0x11).ok())
            };
            Some(Rgb::new(next()?, next()?, next()?))
        }
        6 | 8 => {
            let byte = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
            Some(Rgb::new(byte(0)?, byte(2)?, byte(4)?))
        }
        _ => None,
    }
}

/// If `s` is `{name}(...)` or `{name}a(...)`, returns the arguments between
/// the parentheses, split on commas, slashes, and whitespace.
fn functional_args<'a>(s: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let rest = s.strip_prefix(name)?;
    let rest = rest.strip_prefix('a').unwrap_or(rest);
    let inner = rest.trim_start().strip_prefix('(')?.strip_suffix(')')?;
    Some(
        inner
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|a| !a.is_empty())
            .collect(),
    )
}

fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn parse_percentage(s: &str) -> Option<f64> {
    parse_number(s.strip_suffix('%')?).map(|n| n / 100.0)
}

fn parse_alpha(args: &[&str]) -> Option<()> {
    match args {
        [] => Some(()),
        [a] => parse_percentage(a).or_else(|| parse_number(a)).map(|_| ()),
        _ => None,
    }
}

fn parse_rgb_args(args: &[&str]) -> Option<Rgb> {
    let [r, g, b, rest @ ..] = args else {
        return None;
    };
    parse_alpha(rest)?;
    let channel = |s: &str| {
        parse_percentage(s)
            .map(|p| p * 255.0)
            .or_else(|| parse_number(s))
            .map(clamp_channel)
    };
    Some(Rgb::new(channel(r)?, channel(g)?, channel(b)?))
}

fn parse_hsl_args(args: &[&str]) -> Option<Rgb> {
    let [h, s, l, rest @ ..] = args else {
        return None;
    };
    parse_alpha(rest)?;
    let hue = parse_number(h.strip_suffix("deg").unwrap_or(h))?;
    let sat = parse_percentage(s)?.clamp(0.0, 1.0);
    let light = parse_percentage(l)?.clamp(0.0, 1.0);
    Some(hsl_to_rgb(hue, sat, light))
}

fn hsl_to_rgb(hue: f64, sat: f64, light: f64) -> Rgb {
    let h = hue.rem_euclid(360.0) / 60.0;
    let chroma = (1.0 - 2.0f64.mul_add(light, -1.0).abs()) * sat;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h {
        h if h < 1.0 => (chroma, x, 0.0),
        h if h < 2.0 => (x, chroma, 0.0),
        h if h < 3.0 => (0.0, chroma, x),
        h if h < 4.0 => (0.0, x, chroma),
        h if h < 5.0 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = light - chroma / 2.0;
    Rgb::new(
        clamp_channel((r + m) * 255.0),
        clamp_channel((g + m) * 255.0),
        clamp_channel((b + m) * 255.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_hex_color(s: &str) -> bool {
        s.len() == 7
            && s.starts_with('#')
            && s[1..]
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!("#d6e685".parse::<Rgb>(), Ok(Rgb::new(0xd6, 0xe6, 0x85)));
        assert_eq!("#1E6823".parse::<Rgb>(), Ok(Rgb::new(0x1e, 0x68, 0x23)));
        assert_eq!("#fff".parse::<Rgb>(), Ok(Rgb::new(0xff, 0xff, 0xff)));
        assert_eq!("#0a38".parse::<Rgb>(), Ok(Rgb::new(0x00, 0xaa, 0x33)));
        assert_eq!("#11223344".parse::<Rgb>(), Ok(Rgb::new(0x11, 0x22, 0x33)));
        assert_eq!("  #eeeeee  ".parse::<Rgb>(), Ok(Rgb::new(0xee, 0xee, 0xee)));
    }

    #[test]
    fn test_parse_functional() {
        assert_eq!("rgb(5, 10, 255)".parse::<Rgb>(), Ok(Rgb::new(5, 10, 255)));
        assert_eq!("rgba(5,10,255,0.5)".parse::<Rgb>(), Ok(Rgb::new(5, 10, 255)));
        assert_eq!("rgb(100% 0% 50% / 20%)".parse::<Rgb>(), Ok(Rgb::new(255, 0, 128)));
        assert_eq!("RGB(300, -4, 7)".parse::<Rgb>(), Ok(Rgb::new(255, 0, 7)));
        assert_eq!("hsl(120, 100%, 25%)".parse::<Rgb>(), Ok(Rgb::new(0, 128, 0)));
        assert_eq!("hsla(0deg, 100%, 50%, 1)".parse::<Rgb>(), Ok(Rgb::new(255, 0, 0)));
        assert_eq!("hsl(240, 0%, 100%)".parse::<Rgb>(), Ok(Rgb::new(255, 255, 255)));
    }

    #[test]
    fn test_parse_named() {
        assert_eq!("Teal".parse::<Rgb>(), Ok(Rgb::new(0x00, 0x80, 0x80)));
        assert_eq!("transparent".parse::<Rgb>(), Ok(Rgb::new(0, 0, 0)));
    }

    #[test]
    fn test_parse_errors() {
        for bad in [
            "",
            "#",
            "#12345",
            "#ggg",
            "bluish",
            "rgb(1, 2)",
            "rgb(1, 2, 3, 4, 5)",
            "rgb(a, b, c)",
            "rgb(1, 2, 3",
            "hsl(10, 20, 30)",
        ] {
            let r = bad.parse::<Rgb>();
            assert_eq!(r, Err(ColorParseError::new(bad)), "input: {bad:?}");
        }
    }

    #[test]
    fn test_display_pads_channels() {
        assert_eq!(Rgb::new(5, 0, 10).to_string(), "#05000a");
        assert_eq!(Rgb::new(255, 255, 255).to_string(), "#ffffff");
    }

    #[test]
    fn test_interpolate_midpoint() {
        assert_eq!(
            interpolate("#d6e685", "#1e6823", 0.5).as_deref(),
            Ok("#7aa754")
        );
    }

    #[test]
    fn test_interpolate_endpoints() {
        for (min, max) in [
            ("#d6e685", "#1e6823"),
            ("black", "white"),
            ("rgb(1, 2, 3)", "#fedcba"),
        ] {
            let lo = min.parse::<Rgb>().unwrap().to_string();
            let hi = max.parse::<Rgb>().unwrap().to_string();
            assert_eq!(interpolate(min, max, 0.0), Ok(lo));
            assert_eq!(interpolate(min, max, 1.0), Ok(hi));
        }
    }

    #[test]
    fn test_interpolate_same_color() {
        for p in [0.0, 0.1, 0.33, 0.5, 0.9, 1.0] {
            assert_eq!(interpolate("navy", "#000080", p).as_deref(), Ok("#000080"));
        }
    }

    #[test]
    fn test_interpolate_clamps_percent() {
        assert_eq!(interpolate("#000", "#fff", -3.0).as_deref(), Ok("#000000"));
        assert_eq!(interpolate("#000", "#fff", 7.5).as_deref(), Ok("#ffffff"));
        assert_eq!(
            interpolate("#000", "#fff", f64::NAN).as_deref(),
            Ok("#000000")
        );
    }

    #[test]
    fn test_interpolate_always_six_digits() {
        for i in 0..=100 {
            let p = f64::from(i) / 100.0;
            let s = interpolate("#000000", "#0f0f0f", p).unwrap();
            assert!(is_hex_color(&s), "malformed color {s:?} at {p}");
        }
    }

    #[test]
    fn test_interpolate_reports_bad_endpoint() {
        let e = interpolate("#d6e685", "greenish", 0.5).unwrap_err();
        assert_eq!(e.input(), "greenish");
        let e = interpolate("#d6e68", "#1e6823", 0.5).unwrap_err();
        assert_eq!(e.input(), "#d6e68");
    }
}
