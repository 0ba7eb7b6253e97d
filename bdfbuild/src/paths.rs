//! Where things live for a build

use std::path::{Path, PathBuf};

use crate::config::{FontSource, ProjectConfig};

#[derive(Debug, Clone)]
pub struct Paths {
    root: PathBuf,
    venv_dir: PathBuf,
    requirements: PathBuf,
    converter: PathBuf,
    source_dir: PathBuf,
    build_dir: PathBuf,
    publish_dir: PathBuf,
}

impl Paths {
    pub fn new(root: &Path, config: &ProjectConfig) -> Paths {
        let root = root.to_path_buf();
        Paths {
            venv_dir: root.join(&config.venv_dir),
            requirements: root.join(&config.requirements),
            converter: root.join(&config.converter),
            source_dir: root.join(&config.source_dir),
            build_dir: root.join(&config.build_dir),
            publish_dir: root.join(&config.publish_dir),
            root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn venv_dir(&self) -> &Path {
        &self.venv_dir
    }

    pub fn requirements(&self) -> &Path {
        &self.requirements
    }

    pub fn converter(&self) -> &Path {
        &self.converter
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    pub fn publish_dir(&self) -> &Path {
        &self.publish_dir
    }

    pub fn source_file(&self, font: &FontSource) -> PathBuf {
        self.source_dir.join(&font.source)
    }

    /// The builder config the converter writes next to the masters
    pub fn builder_config(&self, family_name: &str, style_name: &str) -> PathBuf {
        self.build_dir
            .join(format!("{}-config.yaml", file_name(family_name, style_name)))
    }

    pub fn designspace(&self, family_name: &str, style_name: &str) -> PathBuf {
        self.build_dir
            .join(format!("{}.designspace", file_name(family_name, style_name)))
    }
}

/// `Pixel Sans` + `Semi Bold` => `PixelSans-SemiBold`
pub fn file_name(family_name: &str, style_name: &str) -> String {
    format!(
        "{}-{}",
        family_name.replace(' ', ""),
        style_name.replace(' ', "")
    )
}
