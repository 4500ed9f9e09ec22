// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometric representation contexts

use crate::file::IfcFile;
use crate::geometry::builder::{axis2_placement_2d, axis2_placement_3d, direction};
use ifc_author_model::{AttributeValue, EntityId, IfcType, ModelError, Result};
use nalgebra::{Point2, Point3};
use std::fmt;
use std::str::FromStr;

/// Default precision of a root context
pub const DEFAULT_PRECISION: f64 = 1e-5;

/// Context type of a representation context
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ContextType {
    #[default]
    Model,
    Plan,
}

impl ContextType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextType::Model => "Model",
            ContextType::Plan => "Plan",
        }
    }

    fn dimension(&self) -> i64 {
        match self {
            ContextType::Model => 3,
            ContextType::Plan => 2,
        }
    }
}

/// IfcGeometricProjectionEnum
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetView {
    GraphView,
    SketchView,
    ModelView,
    PlanView,
    ReflectedPlanView,
    SectionView,
    ElevationView,
    UserDefined,
    NotDefined,
}

impl TargetView {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetView::GraphView => "GRAPH_VIEW",
            TargetView::SketchView => "SKETCH_VIEW",
            TargetView::ModelView => "MODEL_VIEW",
            TargetView::PlanView => "PLAN_VIEW",
            TargetView::ReflectedPlanView => "REFLECTED_PLAN_VIEW",
            TargetView::SectionView => "SECTION_VIEW",
            TargetView::ElevationView => "ELEVATION_VIEW",
            TargetView::UserDefined => "USERDEFINED",
            TargetView::NotDefined => "NOTDEFINED",
        }
    }
}

impl FromStr for TargetView {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self> {
        let view = match s.to_ascii_uppercase().as_str() {
            "GRAPH_VIEW" => TargetView::GraphView,
            "SKETCH_VIEW" => TargetView::SketchView,
            "MODEL_VIEW" => TargetView::ModelView,
            "PLAN_VIEW" => TargetView::PlanView,
            "REFLECTED_PLAN_VIEW" => TargetView::ReflectedPlanView,
            "SECTION_VIEW" => TargetView::SectionView,
            "ELEVATION_VIEW" => TargetView::ElevationView,
            "USERDEFINED" => TargetView::UserDefined,
            "NOTDEFINED" => TargetView::NotDefined,
            other => {
                return Err(ModelError::invalid_argument(format!(
                    "unknown target view {}",
                    other
                )))
            }
        };
        Ok(view)
    }
}

impl fmt::Display for TargetView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of [`add_context`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContextSettings {
    pub context_type: ContextType,
    /// e.g. `Body`, `Axis`
    pub context_identifier: Option<String>,
    pub target_view: Option<TargetView>,
    /// Parent context; a sub-context is created when set
    pub parent: Option<EntityId>,
}

impl ContextSettings {
    /// Root 3D model context
    pub fn model() -> Self {
        Self::default()
    }

    /// `Body` sub-context of `parent` for the model view
    pub fn body(parent: EntityId) -> Self {
        Self {
            context_type: ContextType::Model,
            context_identifier: Some("Body".to_string()),
            target_view: Some(TargetView::ModelView),
            parent: Some(parent),
        }
    }
}

/// Create a representation context or sub-context
pub fn add_context(file: &mut IfcFile, settings: &ContextSettings) -> Result<EntityId> {
    match settings.parent {
        Some(parent) => add_sub_context(file, settings, parent),
        None => add_root_context(file, settings),
    }
}

fn add_root_context(file: &mut IfcFile, settings: &ContextSettings) -> Result<EntityId> {
    let project = file
        .by_type(&IfcType::IfcProject)
        .first()
        .map(|p| p.id)
        .ok_or_else(|| ModelError::invalid_argument("a root context requires an IfcProject"))?;

    let world = match settings.context_type {
        ContextType::Model => axis2_placement_3d(file, Point3::origin(), None, None)?,
        ContextType::Plan => axis2_placement_2d(file, Point2::origin()),
    };
    let true_north = direction(file, &[0.0, 1.0])?;

    let context = file.create(IfcType::IfcGeometricRepresentationContext)?;
    if let Some(identifier) = &settings.context_identifier {
        file.set(context, "ContextIdentifier", identifier.as_str())?;
    }
    file.set(context, "ContextType", settings.context_type.as_str())?;
    file.set(
        context,
        "CoordinateSpaceDimension",
        settings.context_type.dimension(),
    )?;
    file.set(context, "Precision", DEFAULT_PRECISION)?;
    file.set(context, "WorldCoordinateSystem", world)?;
    file.set(context, "TrueNorth", true_north)?;

    let mut contexts = file
        .entity(project)?
        .get_refs(7)
        .unwrap_or_default();
    contexts.push(context);
    file.set(project, "RepresentationContexts", AttributeValue::refs(contexts))?;

    log::debug!("Added {} context {}", settings.context_type.as_str(), context);
    Ok(context)
}

fn add_sub_context(
    file: &mut IfcFile,
    settings: &ContextSettings,
    parent: EntityId,
) -> Result<EntityId> {
    let parent_type = &file.entity(parent)?.ifc_type;
    if *parent_type != IfcType::IfcGeometricRepresentationContext {
        return Err(ModelError::type_mismatch(
            parent,
            IfcType::IfcGeometricRepresentationContext.name(),
            parent_type,
        ));
    }
    let identifier = settings
        .context_identifier
        .as_deref()
        .ok_or_else(|| ModelError::invalid_argument("a sub-context needs an identifier"))?;
    let target_view = settings.target_view.unwrap_or(TargetView::NotDefined);

    let context = file.create(IfcType::IfcGeometricRepresentationSubContext)?;
    file.set(context, "ContextIdentifier", identifier)?;
    file.set(context, "ContextType", settings.context_type.as_str())?;
    file.set(context, "ParentContext", parent)?;
    file.set(
        context,
        "TargetView",
        AttributeValue::enumeration(target_view.as_str()),
    )?;

    log::debug!("Added {} sub-context {} of {}", identifier, context, parent);
    Ok(context)
}

/// Check that `id` can hold shape representations
pub fn ensure_context(file: &IfcFile, id: EntityId) -> Result<()> {
    let entity = file.entity(id)?;
    match entity.ifc_type {
        IfcType::IfcGeometricRepresentationContext
        | IfcType::IfcGeometricRepresentationSubContext => Ok(()),
        _ => Err(ModelError::type_mismatch(
            id,
            "IFCGEOMETRICREPRESENTATIONCONTEXT",
            &entity.ifc_type,
        )),
    }
}
