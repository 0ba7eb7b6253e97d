//! Font metadata shared by every font in the family, forwarded as converter flags

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::axes::number;

/// Overrides for what the converter would otherwise read from the BDF file.
///
/// Unset fields are not passed at all so the converter's own defaults apply.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FontMetadata {
    pub family_name: String,
    pub font_version: Option<String>,

    pub copyright: Option<String>,
    pub designer: Option<String>,
    pub designer_url: Option<String>,
    pub manufacturer: Option<String>,
    pub manufacturer_url: Option<String>,
    pub license: Option<String>,
    pub license_url: Option<String>,

    // pixels
    pub ascent: Option<i32>,
    pub descent: Option<i32>,
    pub cap_height: Option<i32>,
    pub x_height: Option<i32>,

    pub underline_position: Option<f64>,
    pub underline_thickness: Option<f64>,
    pub strikeout_position: Option<f64>,
    pub strikeout_thickness: Option<f64>,

    pub superscript_scale_x: Option<f64>,
    pub superscript_scale_y: Option<f64>,
    pub superscript_offset_x: Option<f64>,
    pub superscript_offset_y: Option<f64>,
    pub subscript_scale_x: Option<f64>,
    pub subscript_scale_y: Option<f64>,
    pub subscript_offset_x: Option<f64>,
    pub subscript_offset_y: Option<f64>,

    /// e.g. `0x0-0x2000,0x20ee`
    pub codepoint_subset: Option<String>,
    pub notdef_codepoint: Option<u32>,
    pub glyph_scale_x: Option<f64>,
    pub glyph_scale_y: Option<f64>,
    pub glyph_offset_x: Option<f64>,
    pub glyph_offset_y: Option<f64>,
    pub random_seed: Option<u64>,
    pub units_per_em: Option<u32>,
    pub double_strike: bool,
}

/// Collects `--name=value` flags.
///
/// Values are glued to their flag so one starting with `-` isn't read as an option.
#[derive(Default)]
pub(crate) struct FlagWriter {
    args: Vec<String>,
}

impl FlagWriter {
    pub(crate) fn value(&mut self, name: &str, value: impl Display) {
        self.args.push(format!("--{name}={value}"));
    }

    pub(crate) fn text(&mut self, name: &str, value: &Option<String>) {
        if let Some(value) = value {
            self.value(name, value);
        }
    }

    fn int<T: Display>(&mut self, name: &str, value: Option<T>) {
        if let Some(value) = value {
            self.value(name, value);
        }
    }

    fn float(&mut self, name: &str, value: Option<f64>) {
        if let Some(value) = value {
            self.value(name, number(value));
        }
    }

    pub(crate) fn switch(&mut self, name: &str, on: bool) {
        if on {
            self.args.push(format!("--{name}"));
        }
    }

    pub(crate) fn finish(self) -> Vec<String> {
        self.args
    }
}

impl FontMetadata {
    /// The converter flags for everything but the family name.
    ///
    /// Order follows the converter's own `--help` so command lines are stable.
    pub fn flags(&self) -> Vec<String> {
        let mut w = FlagWriter::default();
        w.text("font-version", &self.font_version);

        w.text("copyright", &self.copyright);
        w.text("designer", &self.designer);
        w.text("designer-url", &self.designer_url);
        w.text("manufacturer", &self.manufacturer);
        w.text("manufacturer-url", &self.manufacturer_url);
        w.text("license", &self.license);
        w.text("license-url", &self.license_url);

        w.int("ascent", self.ascent);
        w.int("descent", self.descent);
        w.int("cap-height", self.cap_height);
        w.int("x-height", self.x_height);

        w.float("underline-position", self.underline_position);
        w.float("underline-thickness", self.underline_thickness);
        w.float("strikeout-position", self.strikeout_position);
        w.float("strikeout-thickness", self.strikeout_thickness);

        w.float("superscript-scale-x", self.superscript_scale_x);
        w.float("superscript-scale-y", self.superscript_scale_y);
        w.float("superscript-offset-x", self.superscript_offset_x);
        w.float("superscript-offset-y", self.superscript_offset_y);
        w.float("subscript-scale-x", self.subscript_scale_x);
        w.float("subscript-scale-y", self.subscript_scale_y);
        w.float("subscript-offset-x", self.subscript_offset_x);
        w.float("subscript-offset-y", self.subscript_offset_y);

        w.text("codepoint-subset", &self.codepoint_subset);
        // the converter reads this with int(x, 0)
        w.text(
            "notdef-codepoint",
            &self.notdef_codepoint.map(|cp| format!("{cp:#x}")),
        );
        w.float("glyph-scale-x", self.glyph_scale_x);
        w.float("glyph-scale-y", self.glyph_scale_y);
        w.float("glyph-offset-x", self.glyph_offset_x);
        w.float("glyph-offset-y", self.glyph_offset_y);
        w.int("random-seed", self.random_seed);
        w.int("units-per-em", self.units_per_em);
        w.switch("double-strike", self.double_strike);
        w.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_metadata_no_flags() {
        let metadata = FontMetadata {
            family_name: "Pixel".to_string(),
            ..Default::default()
        };
        assert!(metadata.flags().is_empty());
    }

    #[test]
    fn flags_in_converter_order() {
        let metadata = FontMetadata {
            family_name: "Pixel".to_string(),
            designer: Some("Jo Doe".to_string()),
            license: Some("SIL Open Font License, Version 1.1".to_string()),
            strikeout_position: Some(3.0),
            strikeout_thickness: Some(1.0),
            underline_position: Some(-1.5),
            notdef_codepoint: Some(0xfffd),
            double_strike: true,
            ..Default::default()
        };
        assert_eq!(
            vec![
                "--designer=Jo Doe",
                "--license=SIL Open Font License, Version 1.1",
                "--underline-position=-1.5",
                "--strikeout-position=3",
                "--strikeout-thickness=1",
                "--notdef-codepoint=0xfffd",
                "--double-strike",
            ],
            metadata.flags()
        );
    }

    #[test]
    fn yaml_rejects_unknown_keys() {
        let yaml = "family_name: Pixel\ndesigner_name: nope\n";
        assert!(serde_yaml::from_str::<FontMetadata>(yaml).is_err());
    }

    #[test]
    fn yaml_partial() {
        let yaml = "family_name: Pixel Sans\nunits_per_em: 1000\nsubscript_offset_y: -2\n";
        let metadata: FontMetadata = serde_yaml::from_str(yaml).unwrap();
        assert_eq!("Pixel Sans", metadata.family_name);
        assert_eq!(
            vec!["--subscript-offset-y=-2", "--units-per-em=1000"],
            metadata.flags()
        );
    }

    #[test]
    fn leading_dash_stays_with_its_flag() {
        let metadata = FontMetadata {
            family_name: "Pixel".to_string(),
            font_version: Some("-beta".to_string()),
            copyright: Some("--- no rights reserved".to_string()),
            ..Default::default()
        };
        assert_eq!(
            vec!["--font-version=-beta", "--copyright=--- no rights reserved"],
            metadata.flags()
        );
    }
}
