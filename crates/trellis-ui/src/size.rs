//! Component sizes
//!
//! A size is either undefined (the component takes whatever its content
//! needs) or a value with a unit. Percentages are relative to the closest
//! ancestor that defines the same axis.

use std::fmt;
use std::str::FromStr;

/// Size unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Pixels,
    Points,
    Picas,
    Em,
    Rem,
    Ex,
    Mm,
    Cm,
    Inch,
    Percentage,
}

impl Unit {
    /// CSS symbol for the unit
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Pixels => "px",
            Unit::Points => "pt",
            Unit::Picas => "pc",
            Unit::Em => "em",
            Unit::Rem => "rem",
            Unit::Ex => "ex",
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::Inch => "in",
            Unit::Percentage => "%",
        }
    }

    /// Look up a unit by its CSS symbol
    pub fn from_symbol(symbol: &str) -> Option<Unit> {
        let unit = match symbol {
            "px" => Unit::Pixels,
            "pt" => Unit::Points,
            "pc" => Unit::Picas,
            "em" => Unit::Em,
            "rem" => Unit::Rem,
            "ex" => Unit::Ex,
            "mm" => Unit::Mm,
            "cm" => Unit::Cm,
            "in" => Unit::Inch,
            "%" => Unit::Percentage,
            _ => return None,
        };
        Some(unit)
    }
}

/// Size axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Width,
    Height,
}

impl Axis {
    pub fn name(self) -> &'static str {
        match self {
            Axis::Width => "width",
            Axis::Height => "height",
        }
    }
}

/// Size on one axis
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Size {
    #[default]
    Undefined,
    Defined { value: f32, unit: Unit },
}

impl Size {
    /// 100%
    pub const FULL: Size = Size::Defined { value: 100.0, unit: Unit::Percentage };

    /// Create a size; negative values mean undefined
    pub fn new(value: f32, unit: Unit) -> Self {
        if value < 0.0 {
            Size::Undefined
        } else {
            Size::Defined { value, unit }
        }
    }

    pub fn px(value: f32) -> Self {
        Self::new(value, Unit::Pixels)
    }

    pub fn percent(value: f32) -> Self {
        Self::new(value, Unit::Percentage)
    }

    #[inline]
    pub fn is_undefined(self) -> bool {
        matches!(self, Size::Undefined)
    }

    #[inline]
    pub fn is_defined(self) -> bool {
        !self.is_undefined()
    }

    /// A positive percentage
    #[inline]
    pub fn is_relative(self) -> bool {
        matches!(self, Size::Defined { value, unit: Unit::Percentage } if value > 0.0)
    }

    pub fn unit(self) -> Option<Unit> {
        match self {
            Size::Undefined => None,
            Size::Defined { unit, .. } => Some(unit),
        }
    }

    pub fn value(self) -> Option<f32> {
        match self {
            Size::Undefined => None,
            Size::Defined { value, .. } => Some(value),
        }
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Size::Undefined => Ok(()),
            Size::Defined { value, unit } => write!(f, "{}{}", value, unit.symbol()),
        }
    }
}

/// Size string parsing error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SizeParseError {
    #[error("invalid size value in {0:?}")]
    InvalidValue(String),
    #[error("unknown size unit {unit:?} in {input:?}")]
    UnknownUnit { input: String, unit: String },
}

impl FromStr for Size {
    type Err = SizeParseError;

    /// Parses CSS-like sizes: `"100%"`, `"12.5px"`, `"3em"`, `"40"` (pixels).
    /// Empty strings and negative values yield [`Size::Undefined`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Size::Undefined);
        }

        let split = trimmed
            .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-'))
            .unwrap_or(trimmed.len());
        let (number, symbol) = trimmed.split_at(split);

        let value: f32 = number
            .parse()
            .map_err(|_| SizeParseError::InvalidValue(s.to_string()))?;

        let unit = if symbol.is_empty() {
            Unit::Pixels
        } else {
            Unit::from_symbol(symbol).ok_or_else(|| SizeParseError::UnknownUnit {
                input: s.to_string(),
                unit: symbol.to_string(),
            })?
        };

        Ok(Size::new(value, unit))
    }
}
