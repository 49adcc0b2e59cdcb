//! Configuration validation logic.

use std::f64::consts::PI;

use kn_models::InitialModel;

use crate::schema::{Configuration, ControlDef, Hydro, MeshDef, RelativisticHydro};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid model: {message}")]
    Model { message: String },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, value, "must be finite"))
    }
}

pub fn validate_config(config: &Configuration) -> Result<(), ValidationError> {
    match &config.hydro {
        Hydro::Relativistic(h) => validate_hydro(h)?,
    }
    config.model.validate().map_err(|e| ValidationError::Model {
        message: e.to_string(),
    })?;
    validate_mesh(&config.mesh)?;
    validate_control(&config.control)?;
    Ok(())
}

fn validate_hydro(h: &RelativisticHydro) -> Result<(), ValidationError> {
    if !(h.gamma_law_index > 1.0 && h.gamma_law_index <= 2.0) {
        return Err(invalid(
            "hydro.relativistic.gamma_law_index",
            h.gamma_law_index,
            "must lie in (1, 2]",
        ));
    }
    if !(1.0..=2.0).contains(&h.plm_theta) {
        return Err(invalid(
            "hydro.relativistic.plm_theta",
            h.plm_theta,
            "must lie in [1, 2]",
        ));
    }
    positive("hydro.relativistic.cfl_number", h.cfl_number)?;
    positive("hydro.relativistic.density_floor", h.density_floor)?;
    positive("hydro.relativistic.pressure_floor", h.pressure_floor)?;
    Ok(())
}

fn validate_mesh(m: &MeshDef) -> Result<(), ValidationError> {
    positive("mesh.inner_radius", m.inner_radius)?;
    positive("mesh.outer_radius", m.outer_radius)?;
    positive("mesh.reference_radius", m.reference_radius)?;
    if m.inner_radius >= m.outer_radius {
        return Err(invalid(
            "mesh.inner_radius",
            m.inner_radius,
            "must be smaller than mesh.outer_radius",
        ));
    }
    finite("mesh.inner_excision_speed", m.inner_excision_speed)?;
    if m.inner_excision_speed < 0.0 {
        return Err(invalid(
            "mesh.inner_excision_speed",
            m.inner_excision_speed,
            "must be non-negative",
        ));
    }
    finite("mesh.outer_excision_speed", m.outer_excision_speed)?;
    if let Some(delay) = m.excision_delay {
        if !(delay.is_finite() && delay >= 0.0) {
            return Err(invalid("mesh.excision_delay", delay, "must be non-negative"));
        }
    }
    if m.num_polar_zones == 0 {
        return Err(invalid("mesh.num_polar_zones", 0, "must be at least 1"));
    }
    if m.block_size == 0 {
        return Err(invalid("mesh.block_size", 0, "must be at least 1"));
    }
    if !(0.0..=PI).contains(&m.polar_angle) {
        return Err(invalid("mesh.polar_angle", m.polar_angle, "must lie in [0, pi]"));
    }
    Ok(())
}

fn validate_control(c: &ControlDef) -> Result<(), ValidationError> {
    finite("control.start_time", c.start_time)?;
    finite("control.final_time", c.final_time)?;
    if c.final_time < c.start_time {
        return Err(invalid(
            "control.final_time",
            c.final_time,
            "must not precede control.start_time",
        ));
    }
    positive("control.checkpoint_interval", c.checkpoint_interval)?;
    if let Some(interval) = c.products_interval {
        positive("control.products_interval", interval)?;
    }
    if c.fold == 0 {
        return Err(invalid("control.fold", 0, "must be at least 1"));
    }
    if c.num_threads == Some(0) {
        return Err(invalid("control.num_threads", 0, "must be at least 1 when set"));
    }
    if c.output_directory.as_os_str().is_empty() {
        return Err(invalid("control.output_directory", "\"\"", "must not be empty"));
    }
    Ok(())
}
