//! Turn a parsed scenario manifest into runnable flights.

use staging_config::{
    AtmosphericModelConfig, EnvironmentConfig, LaunchAttitudeConfig, LaunchDate,
    LongitudeBaseConfig, ScenarioConfig, StagingConfig,
};
use thiserror::Error;

use crate::engine::RecordedEngine;
use crate::environment::{AtmosphericModel, Environment, EnvironmentError, launch_date};
use crate::facade::vehicle::{self, VehicleError};
use crate::stages::handoff::{HandoffConfig, LaunchAttitudeSource, LongitudeBase};
use crate::stages::{StageSetup, StagedFlightConfig, UpperStage};

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("invalid environment: {0}")]
    Environment(#[from] EnvironmentError),
    #[error("stage `{stage}`: {source}")]
    Vehicle {
        stage: String,
        #[source]
        source: VehicleError,
    },
    #[error("stage name `{0}` is used more than once")]
    DuplicateStage(String),
    #[error("a staged flight needs exactly two stages, scenario `{name}` has {count}")]
    NotTwoStage { name: String, count: usize },
}

/// Runnable scenario: flights sharing one launch site plus the recorded engine output.
#[derive(Debug, Clone)]
pub struct ScenarioPlan {
    pub name: String,
    pub engine: RecordedEngine,
    pub stages: Vec<StageSetup>,
    pub handoff: HandoffConfig,
}

impl ScenarioPlan {
    /// Split into booster and upper stage. The upper stage's site is derived at separation.
    pub fn into_staged(self) -> Result<(RecordedEngine, StagedFlightConfig), ScenarioError> {
        let count = self.stages.len();
        let mut stages = self.stages.into_iter();
        let (Some(booster), Some(upper), None) = (stages.next(), stages.next(), stages.next())
        else {
            return Err(ScenarioError::NotTwoStage {
                name: self.name,
                count,
            });
        };
        let config = StagedFlightConfig {
            booster,
            upper: UpperStage {
                name: upper.name,
                rocket: upper.rocket,
                heading_deg: upper.heading_deg,
            },
            handoff: self.handoff,
        };
        Ok((self.engine, config))
    }
}

pub fn environment_from_config(config: &EnvironmentConfig) -> Result<Environment, EnvironmentError> {
    let LaunchDate(year, month, day, hour) = config.date;
    let environment = Environment {
        rail_length_m: config.rail_length_m,
        latitude_deg: config.latitude_deg,
        longitude_deg: config.longitude_deg,
        elevation_m: config.elevation_m,
        date: launch_date(year, month, day, hour)?,
        atmospheric_model: match &config.atmospheric_model {
            AtmosphericModelConfig::StandardAtmosphere => AtmosphericModel::StandardAtmosphere,
            AtmosphericModelConfig::Forecast { source } => AtmosphericModel::Forecast {
                source: source.clone(),
            },
        },
    };
    environment.validate()?;
    Ok(environment)
}

pub fn handoff_from_config(config: &StagingConfig) -> HandoffConfig {
    HandoffConfig {
        ignition_delay_s: config.ignition_delay_s,
        earth_radius_m: config.earth_radius_m,
        longitude_base: match config.longitude_base {
            LongitudeBaseConfig::Longitude => LongitudeBase::Longitude,
            LongitudeBaseConfig::Latitude => LongitudeBase::Latitude,
        },
        launch_attitude: match config.launch_attitude {
            LaunchAttitudeConfig::BodyAxis => LaunchAttitudeSource::BodyAxis,
            LaunchAttitudeConfig::AngularRateW1 => LaunchAttitudeSource::AngularRateW1,
        },
    }
}

/// Validate every stage and register its recorded trajectory with the engine.
pub fn plan_scenario(config: &ScenarioConfig) -> Result<ScenarioPlan, ScenarioError> {
    let environment = environment_from_config(&config.environment)?;
    let mut engine = RecordedEngine::new();
    let mut stages = Vec::with_capacity(config.stages.len());

    for stage in &config.stages {
        if engine.recording(&stage.name).is_some() {
            return Err(ScenarioError::DuplicateStage(stage.name.clone()));
        }
        let rocket = vehicle::from_config(stage).map_err(|source| ScenarioError::Vehicle {
            stage: stage.name.clone(),
            source,
        })?;
        engine = engine.with_recording(stage.name.clone(), stage.trajectory.clone());
        stages.push(StageSetup {
            name: stage.name.clone(),
            rocket,
            environment: environment.clone(),
            inclination_deg: stage.inclination_deg,
            heading_deg: stage.heading_deg,
            initial_solution: None,
        });
    }

    let handoff = config
        .staging
        .as_ref()
        .map(handoff_from_config)
        .unwrap_or_default();

    Ok(ScenarioPlan {
        name: config.name.clone(),
        engine,
        stages,
        handoff,
    })
}
