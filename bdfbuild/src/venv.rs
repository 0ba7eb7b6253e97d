//! The Python virtual environment the external tools run in

use std::{
    env,
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
};

use filetime::FileTime;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    process::{Invocation, Runner},
    Error,
};

/// Remembers what the environment was populated from, inside the venv itself
const STATE_FILE: &str = "bdfbuild-state.yml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenvStatus {
    /// Fresh venv, dependencies installed
    Created,
    /// Existing venv, dependencies reinstalled because requirements changed
    Updated,
    /// Existing venv, nothing to do
    UpToDate,
}

#[derive(Debug, Clone)]
pub struct Venv {
    dir: PathBuf,
}

/// The state of the requirements file at install time
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
struct RequirementsState {
    #[serde(with = "file_time_serde")]
    mtime: FileTime,
    size: u64,
}

/// What the state file records
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum InstallState {
    /// pip was started and has not finished
    Pending,
    Installed(RequirementsState),
}

impl RequirementsState {
    fn of(path: &Path) -> Result<RequirementsState, io::Error> {
        let metadata = path.metadata()?;
        Ok(RequirementsState {
            mtime: FileTime::from_last_modification_time(&metadata),
            size: metadata.len(),
        })
    }
}

impl Venv {
    pub fn new(dir: impl Into<PathBuf>) -> Venv {
        Venv { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// We only look for the directory, same as `[ -d venv ]`
    pub fn exists(&self) -> bool {
        self.dir.is_dir()
    }

    pub fn bin_dir(&self) -> PathBuf {
        if cfg!(windows) {
            self.dir.join("Scripts")
        } else {
            self.dir.join("bin")
        }
    }

    pub fn python(&self) -> PathBuf {
        self.bin_dir().join(exe_name("python"))
    }

    /// Prefer a program installed into the venv, fall back to PATH lookup
    pub fn resolve(&self, program: &str) -> PathBuf {
        let candidate = self.bin_dir().join(exe_name(program));
        if candidate.is_file() {
            candidate
        } else {
            PathBuf::from(program)
        }
    }

    /// What `source venv/bin/activate` would have done to the environment
    pub fn env(&self) -> Result<Vec<(OsString, OsString)>, Error> {
        let mut paths = vec![self.bin_dir()];
        if let Some(path) = env::var_os("PATH") {
            paths.extend(env::split_paths(&path));
        }
        let path = env::join_paths(paths).map_err(|e| {
            Error::InvalidConfig(format!("venv {} can't go on PATH: {e}", self.dir.display()))
        })?;
        Ok(vec![
            ("VIRTUAL_ENV".into(), self.dir.clone().into_os_string()),
            ("PATH".into(), path),
        ])
    }

    pub fn create_invocation(&self, python: &str) -> Invocation {
        Invocation::new(python)
            .args(["-m", "venv"])
            .arg(&self.dir)
    }

    pub fn install_invocation(&self, requirements: &Path) -> Result<Invocation, Error> {
        Ok(Invocation::new(self.python())
            .args(["-m", "pip", "install", "-r"])
            .arg(requirements)
            .envs(self.env()?))
    }

    /// Create the venv on first use and keep its dependencies current.
    pub fn ensure(
        &self,
        runner: &mut dyn Runner,
        python: &str,
        requirements: &Path,
    ) -> Result<VenvStatus, Error> {
        if self.dir.exists() && !self.dir.is_dir() {
            return Err(Error::ExpectedDirectory(self.dir.clone()));
        }

        let status = if self.exists() {
            if !self.requirements_changed(requirements) {
                debug!("{} is up to date", self.dir.display());
                return Ok(VenvStatus::UpToDate);
            }
            info!("Requirements changed, updating {}", self.dir.display());
            VenvStatus::Updated
        } else {
            info!("Creating virtual environment {}", self.dir.display());
            runner.run(&self.create_invocation(python))?;
            VenvStatus::Created
        };

        if !requirements.is_file() {
            warn!(
                "No {}, not installing any dependencies",
                requirements.display()
            );
            return Ok(status);
        }
        info!("Installing dependencies from {}", requirements.display());
        self.save_state(InstallState::Pending)?;
        runner.run(&self.install_invocation(requirements)?)?;
        let installed =
            RequirementsState::of(requirements).map_err(|e| Error::io(requirements, e))?;
        self.save_state(InstallState::Installed(installed))?;
        Ok(status)
    }

    fn state_file(&self) -> PathBuf {
        self.dir.join(STATE_FILE)
    }

    pub(crate) fn requirements_changed(&self, requirements: &Path) -> bool {
        let Ok(current) = RequirementsState::of(requirements) else {
            // nothing to install from
            return false;
        };
        let state_file = self.state_file();
        if !state_file.is_file() {
            // a venv made by hand or by an older shell script; trust it
            debug!("No {}, assuming dependencies are installed", STATE_FILE);
            return false;
        }
        let prior = fs::read_to_string(&state_file)
            .map_err(|e| e.to_string())
            .and_then(|yml| {
                serde_yaml::from_str::<InstallState>(&yml).map_err(|e| e.to_string())
            });
        match prior {
            Ok(InstallState::Installed(prior)) => prior != current,
            Ok(InstallState::Pending) => {
                info!("Last install into {} did not finish", self.dir.display());
                true
            }
            Err(err) => {
                warn!("Unable to read {}: {err}", state_file.display());
                true
            }
        }
    }

    fn save_state(&self, state: InstallState) -> Result<(), Error> {
        if !self.exists() {
            // the runner did not actually create it
            return Ok(());
        }
        let state_file = self.state_file();
        fs::write(&state_file, serde_yaml::to_string(&state)?)
            .map_err(|e| Error::io(state_file, e))
    }
}

/// How to start python and friends for the conversion and build steps
#[derive(Debug, Clone)]
pub struct Toolchain {
    python: PathBuf,
    env: Vec<(OsString, OsString)>,
    venv: Option<Venv>,
}

impl Toolchain {
    /// Run everything from inside the venv
    pub fn from_venv(venv: &Venv) -> Result<Toolchain, Error> {
        Ok(Toolchain {
            python: venv.python(),
            env: venv.env()?,
            venv: Some(venv.clone()),
        })
    }

    /// Run with whatever is already on PATH
    pub fn ambient(python: &str) -> Toolchain {
        Toolchain {
            python: PathBuf::from(python),
            env: Vec::new(),
            venv: None,
        }
    }

    pub fn python(&self) -> &Path {
        &self.python
    }

    pub fn env(&self) -> &[(OsString, OsString)] {
        &self.env
    }

    /// An invocation of `program` with this toolchain's environment applied
    pub fn invocation(&self, program: &str) -> Invocation {
        let program = match &self.venv {
            Some(venv) => venv.resolve(program),
            None => PathBuf::from(program),
        };
        Invocation::new(program).envs(self.env.iter().cloned())
    }

    pub fn python_invocation(&self) -> Invocation {
        Invocation::new(&self.python).envs(self.env.iter().cloned())
    }
}

fn exe_name(program: &str) -> String {
    if cfg!(windows) && Path::new(program).extension().is_none() {
        format!("{program}.exe")
    } else {
        program.to_string()
    }
}

mod file_time_serde {
    use filetime::FileTime;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize, Serialize)]
    struct Helper(i64, u32);

    pub(super) fn serialize<S>(item: &FileTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Helper(item.unix_seconds(), item.nanoseconds()).serialize(serializer)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<FileTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let helper = Helper::deserialize(deserializer)?;
        Ok(FileTime::from_unix_time(helper.0, helper.1))
    }
}
