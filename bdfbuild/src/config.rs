//! The project file describing a font family build

use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    axes::{effective_limits, Axis, AxisLimits, Instance, Location},
    metadata::FontMetadata,
    Error,
};

/// Looked for in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "bdfbuild.yml";

/// Everything needed to build a family.
///
/// Paths are relative to the directory holding the project file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Interpreter used to create the virtual environment
    pub python: String,
    pub venv_dir: PathBuf,
    pub requirements: PathBuf,
    /// The BDF to UFO conversion script
    pub converter: PathBuf,
    /// Program and leading arguments of the font builder
    pub builder: Vec<String>,
    pub source_dir: PathBuf,
    pub build_dir: PathBuf,
    pub publish_dir: PathBuf,

    pub metadata: FontMetadata,
    pub variable_axes: Vec<Axis>,
    pub axes_limits: IndexMap<Axis, AxisLimits>,
    pub instances: Vec<Instance>,
    pub static_axes: Location,

    pub fonts: Vec<FontSource>,
}

/// One BDF file to build, typically one per weight
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FontSource {
    /// Relative to the source directory
    pub source: PathBuf,
    pub style_name: String,
    /// Passed to the converter verbatim, after everything else
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        ProjectConfig {
            python: "python3".to_string(),
            venv_dir: PathBuf::from("venv"),
            requirements: PathBuf::from("requirements.txt"),
            converter: PathBuf::from("scripts/bdf2ufo.py"),
            builder: vec!["gftools".to_string(), "builder".to_string()],
            source_dir: PathBuf::from("sources"),
            build_dir: PathBuf::from("build"),
            publish_dir: PathBuf::from("fonts/bdf"),
            metadata: Default::default(),
            variable_axes: Vec::new(),
            axes_limits: IndexMap::new(),
            instances: Vec::new(),
            static_axes: Location::new(),
            fonts: Vec::new(),
        }
    }
}

impl ProjectConfig {
    /// Read and validate a project file
    pub fn load(path: &Path) -> Result<ProjectConfig, Error> {
        if !path.is_file() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let yml = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: ProjectConfig = serde_yaml::from_str(&yml)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the converter would choke on, before anything runs
    pub fn validate(&self) -> Result<(), Error> {
        if self.metadata.family_name.trim().is_empty() {
            return Err(invalid("metadata.family_name must be set"));
        }
        if self.fonts.is_empty() {
            return Err(invalid("no fonts to build"));
        }
        if self.builder.is_empty() {
            return Err(invalid("builder needs at least a program name"));
        }
        for font in &self.fonts {
            if font.style_name.trim().is_empty() {
                return Err(invalid(format!(
                    "{} has no style_name",
                    font.source.display()
                )));
            }
        }

        let mut seen = HashSet::new();
        for axis in &self.variable_axes {
            if !seen.insert(axis) {
                return Err(invalid(format!("{axis} is listed twice in variable_axes")));
            }
        }

        for (axis, limits) in &self.axes_limits {
            // the converter splits `min-max` on '-', so no sign is allowed
            for bound in [limits.min, limits.max] {
                if !bound.is_finite() || bound.is_sign_negative() {
                    return Err(invalid(format!(
                        "{axis} limit {bound} must be a finite number >= 0"
                    )));
                }
            }
            if limits.min > limits.max {
                return Err(invalid(format!(
                    "{axis} limits are inverted, {} > {}",
                    limits.min, limits.max
                )));
            }
        }

        if !self.instances.is_empty() && self.variable_axes.is_empty() {
            return Err(invalid(
                "can't create variable font instances without variable font axes",
            ));
        }
        for instance in &self.instances {
            // the name is the first comma separated field of the flag
            if instance.name.trim().is_empty() || instance.name.contains(',') {
                return Err(invalid(format!(
                    "instance name '{}' must be non-empty and contain no ','",
                    instance.name
                )));
            }
            if let Some(axis) = instance
                .location
                .keys()
                .find(|axis| !self.variable_axes.contains(axis))
            {
                return Err(invalid(format!(
                    "instance '{}' uses {axis} which is not a variable axis",
                    instance.name
                )));
            }
            self.warn_out_of_range(&format!("instance '{}'", instance.name), &instance.location);
        }
        self.warn_out_of_range("static_axes", &self.static_axes);

        Ok(())
    }

    fn warn_out_of_range(&self, what: &str, location: &Location) {
        for (axis, value) in location {
            let limits = effective_limits(*axis, &self.axes_limits);
            if !limits.contains(*value) {
                warn!(
                    "{what}: {axis}={value} is outside {}..{}",
                    limits.min, limits.max
                );
            }
        }
    }
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::InvalidConfig(msg.into())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::axes::parse_location;
    use tempfile::tempdir;

    pub(crate) fn testdata_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("resources/testdata")
    }

    fn minimal() -> ProjectConfig {
        ProjectConfig {
            metadata: FontMetadata {
                family_name: "Pixel".to_string(),
                ..Default::default()
            },
            fonts: vec![FontSource {
                source: PathBuf::from("Pixel-Regular.bdf"),
                style_name: "Regular".to_string(),
                extra_args: Vec::new(),
            }],
            ..Default::default()
        }
    }

    fn assert_invalid(config: &ProjectConfig, fragment: &str) {
        match config.validate() {
            Err(Error::InvalidConfig(msg)) => {
                assert!(msg.contains(fragment), "'{msg}' lacks '{fragment}'")
            }
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn load_sample_project() {
        let config = ProjectConfig::load(&testdata_dir().join("bdfbuild.yml")).unwrap();
        assert_eq!("Pixel Sans", config.metadata.family_name);
        assert_eq!(2, config.fonts.len());
        assert_eq!(
            vec!["Regular", "Bold"],
            config
                .fonts
                .iter()
                .map(|f| f.style_name.as_str())
                .collect::<Vec<_>>()
        );
        assert_eq!(
            vec![Axis::ElementSize, Axis::Roundness],
            config.variable_axes
        );
        assert_eq!(PathBuf::from("fonts/bdf"), config.publish_dir);
        assert_eq!(vec!["gftools", "builder"], config.builder);
    }

    #[test]
    fn missing_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(DEFAULT_CONFIG_FILE);
        assert!(matches!(
            ProjectConfig::load(&path),
            Err(Error::ConfigNotFound(p)) if p == path
        ));
    }

    #[test]
    fn unknown_axis_in_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(
            &path,
            "metadata:\n  family_name: Pixel\nvariable_axes: [wght]\nfonts:\n  - source: a.bdf\n    style_name: Regular\n",
        )
        .unwrap();
        let err = ProjectConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::YamlSerError(_)), "{err}");
        assert!(err.to_string().contains("wght"), "{err}");
    }

    #[test]
    fn minimal_is_valid() {
        minimal().validate().unwrap();
    }

    #[test]
    fn needs_family_and_fonts() {
        let mut config = minimal();
        config.metadata.family_name = " ".to_string();
        assert_invalid(&config, "family_name");

        let mut config = minimal();
        config.fonts.clear();
        assert_invalid(&config, "no fonts");

        let mut config = minimal();
        config.fonts[0].style_name.clear();
        assert_invalid(&config, "style_name");

        let mut config = minimal();
        config.builder.clear();
        assert_invalid(&config, "builder");
    }

    #[test]
    fn instances_need_axes() {
        let mut config = minimal();
        config.instances.push(Instance {
            name: "Light".to_string(),
            location: Location::new(),
        });
        assert_invalid(&config, "without variable font axes");

        config.variable_axes.push(Axis::ElementSize);
        config.validate().unwrap();

        config.instances[0].location = parse_location("ROND=1").unwrap();
        assert_invalid(&config, "ROND");
    }

    #[test]
    fn duplicate_axes() {
        let mut config = minimal();
        config.variable_axes = vec![Axis::Bleed, Axis::Roundness, Axis::Bleed];
        assert_invalid(&config, "twice");
    }

    #[test]
    fn inverted_limits() {
        let mut config = minimal();
        config
            .axes_limits
            .insert(Axis::ElementSpacing, AxisLimits::new(1.2, 0.25));
        assert_invalid(&config, "inverted");
    }

    #[test]
    fn signed_or_nan_limits() {
        let mut config = minimal();
        config
            .axes_limits
            .insert(Axis::ElementSpacing, AxisLimits::new(-0.5, 1.0));
        assert_invalid(&config, "XESP limit -0.5");

        let mut config = minimal();
        config
            .axes_limits
            .insert(Axis::Bleed, AxisLimits::new(f64::NAN, 1.0));
        assert_invalid(&config, "BLED limit NaN");

        let mut config = minimal();
        config
            .axes_limits
            .insert(Axis::Bleed, AxisLimits::new(0.0, f64::INFINITY));
        assert_invalid(&config, "BLED limit inf");

        let mut config = minimal();
        config
            .axes_limits
            .insert(Axis::Bleed, AxisLimits::new(-0.0, 1.0));
        assert_invalid(&config, "BLED limit");

        let mut config = minimal();
        config
            .axes_limits
            .insert(Axis::Bleed, AxisLimits::new(0.0, 1.0));
        config.validate().unwrap();
    }

    #[test]
    fn instance_names_fit_the_flag() {
        let mut config = minimal();
        config.variable_axes.push(Axis::Roundness);
        config.instances.push(Instance {
            name: "Semi, Round".to_string(),
            location: parse_location("ROND=1").unwrap(),
        });
        assert_invalid(&config, "'Semi, Round'");

        config.instances[0].name = " ".to_string();
        assert_invalid(&config, "non-empty");

        config.instances[0].name = "Semi Round".to_string();
        config.validate().unwrap();
    }

    #[test]
    fn out_of_range_is_only_a_warning() {
        let mut config = minimal();
        config.static_axes = parse_location("ESIZ=4").unwrap();
        config.validate().unwrap();
    }
}
