//! Material handles attached to regions.
//!
//! The scattering physics lives in the trajectory engine; regions only carry a
//! shared handle to whatever model the engine supplies.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Bulk material description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Mass density in kg/m^3.
    pub density: f64,
}

impl Material {
    pub fn new(name: impl Into<String>, density: f64) -> Self {
        Self { name: name.into(), density }
    }

    /// The empty material. Electrons travel through it without interacting.
    pub fn null() -> Self {
        Self { name: "Null".to_string(), density: 0.0 }
    }

    pub fn is_null(&self) -> bool {
        self.density == 0.0
    }
}

/// Scattering model of a region, supplied by the physics engine.
pub trait ScatterModel: Send + Sync + fmt::Debug {
    fn material(&self) -> &Material;
}

/// Shared, read-only handle; many regions may reference one model.
pub type ModelHandle = Arc<dyn ScatterModel>;

/// Scatter model that only records its material.
#[derive(Clone, Debug, PartialEq)]
pub struct BasicMaterialModel {
    material: Material,
}

impl BasicMaterialModel {
    pub fn new(material: Material) -> Self {
        Self { material }
    }

    pub fn shared(material: Material) -> ModelHandle {
        Arc::new(Self::new(material))
    }

    pub fn null() -> ModelHandle {
        Self::shared(Material::null())
    }
}

impl ScatterModel for BasicMaterialModel {
    fn material(&self) -> &Material {
        &self.material
    }
}
