// ratio.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const FALLBACK: Dimensions = Dimensions {
    width: 1024,
    height: 1024,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ratio {
    #[default]
    Portrait9x16,
    Landscape16x9,
    Square,
    Portrait3x4,
    Landscape4x3,
}

impl Ratio {
    pub const ALL: [Ratio; 5] = [
        Ratio::Portrait9x16,
        Ratio::Landscape16x9,
        Ratio::Square,
        Ratio::Portrait3x4,
        Ratio::Landscape4x3,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Ratio::Portrait9x16 => "9:16",
            Ratio::Landscape16x9 => "16:9",
            Ratio::Square => "1:1",
            Ratio::Portrait3x4 => "3:4",
            Ratio::Landscape4x3 => "4:3",
        }
    }

    /// Size used when no long side was chosen.
    pub fn default_dimensions(self) -> Dimensions {
        let (width, height) = match self {
            Ratio::Portrait9x16 => (768, 1365),
            Ratio::Landscape16x9 => (1365, 768),
            Ratio::Square => (1024, 1024),
            Ratio::Portrait3x4 => (900, 1200),
            Ratio::Landscape4x3 => (1200, 900),
        };
        Dimensions { width, height }
    }

    pub fn dimensions(self, long_side: Option<u32>) -> Dimensions {
        let Some(long) = long_side.filter(|long| *long > 0) else {
            return self.default_dimensions();
        };
        match self {
            Ratio::Portrait9x16 => Dimensions {
                width: scale(long, 9, 16),
                height: long,
            },
            Ratio::Landscape16x9 => Dimensions {
                width: long,
                height: scale(long, 9, 16),
            },
            Ratio::Square => Dimensions {
                width: long,
                height: long,
            },
            Ratio::Portrait3x4 => Dimensions {
                width: scale(long, 3, 4),
                height: long,
            },
            Ratio::Landscape4x3 => Dimensions {
                width: long,
                height: scale(long, 3, 4),
            },
        }
    }
}

// round-half-up of long * num / den
fn scale(long: u32, num: u64, den: u64) -> u32 {
    ((u64::from(long) * num + den / 2) / den) as u32
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Ratio {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ratio::ALL
            .into_iter()
            .find(|ratio| ratio.tag() == s.trim())
            .ok_or_else(|| format!("Unknown aspect ratio '{}'", s.trim()))
    }
}

impl TryFrom<String> for Ratio {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ratio> for String {
    fn from(ratio: Ratio) -> Self {
        ratio.tag().to_string()
    }
}

/// Maps a raw ratio tag to pixels. Unknown tags always give 1024x1024.
pub fn ratio_to_pixels(tag: &str, long_side: Option<u32>) -> Dimensions {
    match tag.parse::<Ratio>() {
        Ok(ratio) => ratio.dimensions(long_side),
        Err(_) => FALLBACK,
    }
}

/// The resolution selector: either the ratio's default size or an explicit long side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Resolution {
    #[default]
    Auto,
    LongSide(u32),
}

impl Resolution {
    pub fn long_side(self) -> Option<u32> {
        match self {
            Resolution::Auto => None,
            Resolution::LongSide(long) => Some(long),
        }
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Resolution::Auto);
        }
        s.parse::<u32>()
            .ok()
            .filter(|long| *long > 0)
            .map(Resolution::LongSide)
            .ok_or_else(|| format!("Invalid resolution '{}'", s))
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Auto => f.write_str("auto"),
            Resolution::LongSide(long) => write!(f, "{}", long),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    #[test]
    fn defaults_without_long_side() {
        assert_eq!(ratio_to_pixels("9:16", None), dims(768, 1365));
        assert_eq!(ratio_to_pixels("16:9", None), dims(1365, 768));
        assert_eq!(ratio_to_pixels("1:1", None), dims(1024, 1024));
        assert_eq!(ratio_to_pixels("3:4", None), dims(900, 1200));
        assert_eq!(ratio_to_pixels("4:3", None), dims(1200, 900));
    }

    #[test]
    fn long_side_is_kept_exactly() {
        for long in [1, 7, 512, 1000, 1536, 2048, 4097] {
            for ratio in Ratio::ALL {
                let d = ratio.dimensions(Some(long));
                assert_eq!(d.width.max(d.height), long, "{} at {}", ratio, long);
            }
        }
    }

    #[test]
    fn short_side_rounds_to_nearest() {
        assert_eq!(ratio_to_pixels("9:16", Some(1000)), dims(563, 1000));
        assert_eq!(ratio_to_pixels("16:9", Some(1536)), dims(1536, 864));
        assert_eq!(ratio_to_pixels("3:4", Some(1001)), dims(751, 1001));
        assert_eq!(ratio_to_pixels("4:3", Some(2048)), dims(2048, 1536));
        // 9/16 * 8 = 4.5 rounds up
        assert_eq!(ratio_to_pixels("9:16", Some(8)), dims(5, 8));
    }

    #[test]
    fn proportion_is_preserved() {
        for long in [640u32, 1024, 1365, 2000] {
            let d = ratio_to_pixels("16:9", Some(long));
            let expected = f64::from(long) * 9.0 / 16.0;
            assert!((f64::from(d.height) - expected).abs() <= 0.5);
        }
    }

    #[test]
    fn unknown_tag_falls_back_to_square() {
        assert_eq!(ratio_to_pixels("2:1", None), dims(1024, 1024));
        assert_eq!(ratio_to_pixels("2:1", Some(2048)), dims(1024, 1024));
        assert_eq!(ratio_to_pixels("", Some(300)), dims(1024, 1024));
    }

    #[test]
    fn zero_long_side_uses_defaults() {
        assert_eq!(ratio_to_pixels("3:4", Some(0)), dims(900, 1200));
    }

    #[test]
    fn resolution_parses_auto_and_numbers() {
        assert_eq!("auto".parse::<Resolution>(), Ok(Resolution::Auto));
        assert_eq!("1536".parse::<Resolution>(), Ok(Resolution::LongSide(1536)));
        assert!("wide".parse::<Resolution>().is_err());
        assert!("0".parse::<Resolution>().is_err());
    }

    #[test]
    fn ratio_serializes_as_tag() {
        assert_eq!(serde_json::to_string(&Ratio::Square).unwrap(), "\"1:1\"");
        let parsed: Ratio = serde_json::from_str("\"4:3\"").unwrap();
        assert_eq!(parsed, Ratio::Landscape4x3);
        assert_eq!(Ratio::default(), Ratio::Portrait9x16);
    }
}
