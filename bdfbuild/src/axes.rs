//! The variable axes the converter knows how to draw.
//!
//! Axis values are in the converter's own units (mostly 0..1), not user
//! coordinates; the converter scales them by 100 when it writes the designspace.

use std::{fmt, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use write_fonts::types::Tag;

use crate::Error;

/// A position in the design space, in the order the axes were given
pub type Location = IndexMap<Axis, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Axis {
    ElementSize,
    Roundness,
    Bleed,
    ElementSpacing,
    ElementJitter,
}

pub const ALL_AXES: [Axis; 5] = [
    Axis::ElementSize,
    Axis::Roundness,
    Axis::Bleed,
    Axis::ElementSpacing,
    Axis::ElementJitter,
];

impl Axis {
    pub fn as_str(self) -> &'static str {
        match self {
            Axis::ElementSize => "ESIZ",
            Axis::Roundness => "ROND",
            Axis::Bleed => "BLED",
            Axis::ElementSpacing => "XESP",
            Axis::ElementJitter => "EJIT",
        }
    }

    pub fn tag(self) -> Tag {
        match self {
            Axis::ElementSize => Tag::new(b"ESIZ"),
            Axis::Roundness => Tag::new(b"ROND"),
            Axis::Bleed => Tag::new(b"BLED"),
            Axis::ElementSpacing => Tag::new(b"XESP"),
            Axis::ElementJitter => Tag::new(b"EJIT"),
        }
    }

    /// The human readable name written to the designspace
    pub fn name(self) -> &'static str {
        match self {
            Axis::ElementSize => "Element Size",
            Axis::Roundness => "Roundness",
            Axis::Bleed => "Bleed",
            Axis::ElementSpacing => "Horizontal Element Spacing",
            Axis::ElementJitter => "Element Jitter",
        }
    }

    pub fn default_limits(self) -> AxisLimits {
        match self {
            Axis::ElementSize => AxisLimits::new(0.1, 1.0),
            Axis::Roundness => AxisLimits::new(0.0, 1.0),
            Axis::Bleed => AxisLimits::new(0.0, 1.0),
            Axis::ElementSpacing => AxisLimits::new(0.5, 1.0),
            Axis::ElementJitter => AxisLimits::new(0.0, 0.1),
        }
    }

    /// The default location when the limits are not overridden.
    ///
    /// Overriding the limits moves the default to the new maximum.
    pub fn default_value(self) -> f64 {
        match self {
            Axis::ElementSize | Axis::ElementSpacing => 1.0,
            Axis::Roundness | Axis::Bleed | Axis::ElementJitter => 0.0,
        }
    }
}

impl FromStr for Axis {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_AXES
            .into_iter()
            .find(|axis| axis.as_str() == s)
            .ok_or_else(|| Error::UnknownAxis(s.to_string()))
    }
}

impl TryFrom<String> for Axis {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Axis> for String {
    fn from(value: Axis) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisLimits {
    pub min: f64,
    pub max: f64,
}

impl AxisLimits {
    pub fn new(min: f64, max: f64) -> AxisLimits {
        AxisLimits { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// The limits in effect for an axis given the configured overrides.
pub fn effective_limits(axis: Axis, overrides: &IndexMap<Axis, AxisLimits>) -> AxisLimits {
    overrides
        .get(&axis)
        .copied()
        .unwrap_or_else(|| axis.default_limits())
}

/// A named instance of the variable font
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Instance {
    pub name: String,
    #[serde(default)]
    pub location: Location,
}

impl Instance {
    /// `[style-name][,[axis]=[value]][,...]`
    pub fn flag_value(&self) -> String {
        if self.location.is_empty() {
            return self.name.clone();
        }
        format!("{},{}", self.name, format_location(&self.location))
    }
}

/// Numbers the way the converter's float parsing expects them, no trailing `.0`
pub(crate) fn number(value: f64) -> String {
    format!("{value}")
}

/// `ESIZ,ROND`
pub fn format_axes(axes: &[Axis]) -> String {
    axes.iter()
        .map(|axis| axis.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// `ESIZ=1,ROND=0.5`
pub fn format_location(location: &Location) -> String {
    location
        .iter()
        .map(|(axis, value)| format!("{axis}={}", number(*value)))
        .collect::<Vec<_>>()
        .join(",")
}

/// `XESP=0.25-1.2`
pub fn format_limits(limits: &IndexMap<Axis, AxisLimits>) -> String {
    limits
        .iter()
        .map(|(axis, limits)| format!("{axis}={}-{}", number(limits.min), number(limits.max)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a location in the converter's syntax, e.g. `ESIZ=1,ROND`.
///
/// A bare axis tag means zero; empty segments are ignored.
pub fn parse_location(s: &str) -> Result<Location, Error> {
    let mut location = Location::new();
    for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (tag, value) = match part.split_once('=') {
            Some((tag, value)) => (tag.trim(), Some(value.trim())),
            None => (part, None),
        };
        let axis: Axis = tag.parse()?;
        let value = match value {
            Some(value) => value.parse::<f64>().map_err(|_| Error::InvalidAxisValue {
                axis: tag.to_string(),
                value: value.to_string(),
            })?,
            None => 0.0,
        };
        location.insert(axis, value);
    }
    Ok(location)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ESIZ", Axis::ElementSize)]
    #[case("ROND", Axis::Roundness)]
    #[case("BLED", Axis::Bleed)]
    #[case("XESP", Axis::ElementSpacing)]
    #[case("EJIT", Axis::ElementJitter)]
    fn tags_parse(#[case] tag: &str, #[case] expected: Axis) {
        let axis: Axis = tag.parse().unwrap();
        assert_eq!(expected, axis);
        assert_eq!(Tag::from_str(tag).unwrap(), axis.tag());
        assert_eq!(tag, axis.to_string());
    }

    #[rstest]
    #[case("wght")]
    #[case("esiz")]
    #[case("")]
    fn unknown_tags_rejected(#[case] tag: &str) {
        assert!(matches!(tag.parse::<Axis>(), Err(Error::UnknownAxis(t)) if t == tag));
    }

    #[test]
    fn defaults_within_limits() {
        for axis in ALL_AXES {
            assert!(
                axis.default_limits().contains(axis.default_value()),
                "{axis}"
            );
        }
    }

    #[test]
    fn parse_bare_and_valued() {
        let location = parse_location("ESIZ=0.5, ROND,,XESP=1").unwrap();
        assert_eq!(
            vec![
                (Axis::ElementSize, 0.5),
                (Axis::Roundness, 0.0),
                (Axis::ElementSpacing, 1.0)
            ],
            location.into_iter().collect::<Vec<_>>()
        );
    }

    #[test]
    fn parse_bad_value() {
        let err = parse_location("ESIZ=big").unwrap_err();
        assert!(
            matches!(&err, Error::InvalidAxisValue { axis, value } if axis == "ESIZ" && value == "big"),
            "{err}"
        );
    }

    #[test]
    fn format_location_keeps_order() {
        let location = parse_location("ROND=0.25,ESIZ=1").unwrap();
        assert_eq!("ROND=0.25,ESIZ=1", format_location(&location));
    }

    #[test]
    fn format_limits_and_axes() {
        let mut limits = IndexMap::new();
        limits.insert(Axis::ElementSpacing, AxisLimits::new(0.25, 1.2));
        limits.insert(Axis::ElementSize, AxisLimits::new(0.5, 1.0));
        assert_eq!("XESP=0.25-1.2,ESIZ=0.5-1", format_limits(&limits));
        assert_eq!(
            "ESIZ,XESP",
            format_axes(&[Axis::ElementSize, Axis::ElementSpacing])
        );
        assert_eq!(
            AxisLimits::new(0.25, 1.2),
            effective_limits(Axis::ElementSpacing, &limits)
        );
        assert_eq!(
            Axis::Bleed.default_limits(),
            effective_limits(Axis::Bleed, &limits)
        );
    }

    #[test]
    fn instance_flag() {
        let instance = Instance {
            name: "Light".to_string(),
            location: parse_location("ESIZ=0.5,ROND=0").unwrap(),
        };
        assert_eq!("Light,ESIZ=0.5,ROND=0", instance.flag_value());

        let bare = Instance {
            name: "Regular".to_string(),
            location: Location::new(),
        };
        assert_eq!("Regular", bare.flag_value());
    }

    #[test]
    fn axis_keys_from_yaml() {
        let location: Location = serde_yaml::from_str("ROND: 0.5\nESIZ: 1\n").unwrap();
        assert_eq!("ROND=0.5,ESIZ=1", format_location(&location));
        assert!(serde_yaml::from_str::<Location>("wdth: 100\n").is_err());
    }
}
