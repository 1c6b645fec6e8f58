//! Configuration models and loaders for the rocket staging workspace.
//!
//! Scenario files describe one launch environment and an ordered list of stages. A
//! file ending in `.toml` is parsed as TOML, anything else as YAML. Stage catalogs
//! may also be split across a directory of TOML files, one stage per file.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use staging_core::constants::EARTH_MEAN_RADIUS_M;
use thiserror::Error;

/// Launch site description.
#[derive(Debug, Deserialize, Clone)]
pub struct EnvironmentConfig {
    pub rail_length_m: f64,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub elevation_m: f64,
    /// `[year, month, day, hour]` in UTC.
    pub date: LaunchDate,
    #[serde(default)]
    pub atmospheric_model: AtmosphericModelConfig,
}

/// Launch date as written in manifests: `[year, month, day, hour]`.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct LaunchDate(pub i32, pub u32, pub u32, pub u32);

/// Atmosphere selection forwarded untouched to the flight engine.
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AtmosphericModelConfig {
    #[default]
    StandardAtmosphere,
    Forecast {
        source: String,
    },
}

/// Solid motor parameters.
#[derive(Debug, Deserialize, Clone)]
pub struct MotorConfig {
    pub thrust_source: PathBuf,
    pub burn_out_s: f64,
    pub grain_number: u32,
    pub grain_separation_m: f64,
    pub grain_density_kg_m3: f64,
    pub grain_outer_radius_m: f64,
    pub grain_initial_inner_radius_m: f64,
    pub grain_initial_height_m: f64,
    pub nozzle_radius_m: f64,
    pub throat_radius_m: f64,
    #[serde(default)]
    pub interpolation: InterpolationConfig,
}

/// Thrust-curve interpolation requested from the engine.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationConfig {
    #[default]
    Linear,
    Spline,
    Akima,
}

/// Rocket body, aerodynamic surfaces, and recovery devices.
#[derive(Debug, Deserialize, Clone)]
pub struct RocketConfig {
    pub radius_m: f64,
    /// Mass without propellant.
    pub mass_kg: f64,
    pub inertia_i_kg_m2: f64,
    pub inertia_z_kg_m2: f64,
    pub distance_rocket_nozzle_m: f64,
    pub distance_rocket_propellant_m: f64,
    pub power_off_drag: PathBuf,
    pub power_on_drag: PathBuf,
    #[serde(default)]
    pub rail_buttons: Option<[f64; 2]>,
    #[serde(default)]
    pub nose: Option<NoseConfig>,
    #[serde(default)]
    pub fins: Vec<FinSetConfig>,
    #[serde(default)]
    pub tail: Option<TailConfig>,
    #[serde(default)]
    pub parachutes: Vec<ParachuteConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NoseConfig {
    pub length_m: f64,
    pub kind: NoseKindConfig,
    pub distance_to_cm_m: f64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoseKindConfig {
    VonKarman,
    Ogive,
    Conical,
    Lvhaack,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FinSetConfig {
    pub count: u32,
    pub span_m: f64,
    pub root_chord_m: f64,
    pub tip_chord_m: f64,
    pub distance_to_cm_m: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TailConfig {
    pub top_radius_m: f64,
    pub bottom_radius_m: f64,
    pub length_m: f64,
    pub distance_to_cm_m: f64,
}

/// Recovery device configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ParachuteConfig {
    pub name: String,
    pub cd_s_m2: f64,
    pub trigger: TriggerConfig,
    pub sampling_rate_hz: f64,
    pub lag_s: f64,
    /// `[mean, standard deviation, time correlation]` of the pressure signal noise.
    #[serde(default)]
    pub noise: [f64; 3],
}

/// Deployment rule in scenario manifests.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TriggerConfig {
    Descending,
    DescendingBelow { altitude_m: f64 },
}

/// One flight: a motor, a rocket, launch angles, and the engine output to replay.
#[derive(Debug, Deserialize, Clone)]
pub struct StageConfig {
    pub name: String,
    #[serde(default = "default_inclination_deg")]
    pub inclination_deg: f64,
    #[serde(default)]
    pub heading_deg: f64,
    pub trajectory: PathBuf,
    pub motor: MotorConfig,
    pub rocket: RocketConfig,
}

fn default_inclination_deg() -> f64 {
    85.0
}

/// Stage-separation parameters.
#[derive(Debug, Deserialize, Clone)]
pub struct StagingConfig {
    #[serde(default = "default_ignition_delay_s")]
    pub ignition_delay_s: f64,
    #[serde(default = "default_earth_radius_m")]
    pub earth_radius_m: f64,
    #[serde(default)]
    pub longitude_base: LongitudeBaseConfig,
    #[serde(default)]
    pub launch_attitude: LaunchAttitudeConfig,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            ignition_delay_s: default_ignition_delay_s(),
            earth_radius_m: default_earth_radius_m(),
            longitude_base: LongitudeBaseConfig::default(),
            launch_attitude: LaunchAttitudeConfig::default(),
        }
    }
}

fn default_ignition_delay_s() -> f64 {
    4.0
}

fn default_earth_radius_m() -> f64 {
    EARTH_MEAN_RADIUS_M
}

/// Which stage-1 coordinate the stage-2 longitude offset is added to.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LongitudeBaseConfig {
    #[default]
    Longitude,
    Latitude,
}

/// How the stage-2 launch inclination is derived from the stage-1 state.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LaunchAttitudeConfig {
    #[default]
    BodyAxis,
    AngularRateW1,
}

/// Top-level scenario manifest.
#[derive(Debug, Deserialize, Clone)]
pub struct ScenarioConfig {
    pub name: String,
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub stages: Vec<StageConfig>,
    /// Extra stage catalogs (files or directories) appended after `stages`.
    #[serde(default)]
    pub include: Vec<PathBuf>,
    #[serde(default)]
    pub staging: Option<StagingConfig>,
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("scenario `{path}` defines no stages")]
    EmptyScenario { path: PathBuf },
}

/// Load a scenario manifest, merge included stage catalogs, and resolve relative
/// paths against the directory of the file that declared them.
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<ScenarioConfig, ConfigError> {
    let path = path.as_ref();
    let mut scenario: ScenarioConfig = load_record(path)?;
    let base = parent_dir(path);

    for stage in &mut scenario.stages {
        resolve_stage_paths(stage, &base);
    }

    let includes = std::mem::take(&mut scenario.include);
    for include in includes {
        let include = resolve(&base, &include);
        let include_base = if include.is_dir() {
            include.clone()
        } else {
            parent_dir(&include)
        };
        let mut stages: Vec<StageConfig> = load_records(&include)?;
        for stage in &mut stages {
            resolve_stage_paths(stage, &include_base);
        }
        scenario.stages.extend(stages);
    }

    if scenario.stages.is_empty() {
        return Err(ConfigError::EmptyScenario {
            path: path.to_path_buf(),
        });
    }
    Ok(scenario)
}

/// Load stage configurations from a YAML list, a single TOML file, or a directory of TOML files.
pub fn load_stage_configs<P: AsRef<Path>>(path: P) -> Result<Vec<StageConfig>, ConfigError> {
    let path = path.as_ref();
    let base = if path.is_dir() {
        path.to_path_buf()
    } else {
        parent_dir(path)
    };
    let mut stages: Vec<StageConfig> = load_records(path)?;
    for stage in &mut stages {
        resolve_stage_paths(stage, &base);
    }
    Ok(stages)
}

fn load_record<T, P>(path: P) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if is_toml(path) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_toml(path))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

fn is_toml(path: &Path) -> bool {
    path.extension().map(|ext| ext == "toml").unwrap_or(false)
}

fn parent_dir(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn resolve_stage_paths(stage: &mut StageConfig, base: &Path) {
    stage.trajectory = resolve(base, &stage.trajectory);
    stage.motor.thrust_source = resolve(base, &stage.motor.thrust_source);
    stage.rocket.power_off_drag = resolve(base, &stage.rocket.power_off_drag);
    stage.rocket.power_on_drag = resolve(base, &stage.rocket.power_on_drag);
}
