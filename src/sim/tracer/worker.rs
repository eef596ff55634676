//! Tracing of one ray through a scene.

use std::sync::Arc;

use anyhow::Result;

use crate::sim::dataset::{CollisionType, Record};
use crate::sim::framework::TraceContext;
use crate::sim::scene::{Geometry, Scene};

use super::ray::Ray;

/// Lifecycle of a worker. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Created,
    Scheduled,
    Running,
    Completed,
}

/// How a trace ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceOutcome {
    /// Left the scene without hitting anything
    Escaped,
    /// Hit the terrain
    Absorbed,
    /// Ran out of hops; the last position is recorded
    HopLimit,
    /// A layer could not be modeled
    Aborted,
}

/// Owns one ray and traces it hop by hop until it terminates.
pub struct Worker {
    ray: Ray,
    scene: Arc<Scene>,
    context: Arc<TraceContext>,
    state: WorkerState,
}

impl Worker {
    pub fn new(ray: Ray, scene: Arc<Scene>, context: Arc<TraceContext>) -> Self {
        Self {
            ray,
            scene,
            context,
            state: WorkerState::Created,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    pub fn ray(&self) -> &Ray {
        &self.ray
    }

    pub(crate) fn schedule(&mut self) {
        self.state = WorkerState::Scheduled;
    }

    /// Traces the ray and counts the trace, whatever its outcome.
    ///
    /// Errors only if recording to the dataset fails.
    pub fn run(&mut self) -> Result<TraceOutcome> {
        self.state = WorkerState::Running;
        let outcome = self.trace();
        self.context.counter.increment();
        self.state = WorkerState::Completed;
        outcome
    }

    fn trace(&mut self) -> Result<TraceOutcome> {
        let context = &self.context;
        let mut last_hit = None;

        for _ in 0..context.max_hops {
            let Some(hit) = self
                .scene
                .intersect(self.ray.origin, self.ray.direction, last_hit)
            else {
                context
                    .dataset
                    .record(Record::from_ray(&self.ray, CollisionType::None))?;
                return Ok(TraceOutcome::Escaped);
            };

            self.ray.advance_to(hit.point);
            last_hit = Some(hit.index);

            match self.scene.get(hit.index) {
                Some(Geometry::Ionosphere(layer)) => {
                    match context.engine.interact(&mut self.ray, layer) {
                        Ok(record) => context.dataset.record(record)?,
                        Err(err) => {
                            tracing::warn!(
                                ray = self.ray.ray_number,
                                altitude = layer.altitude,
                                "Trace aborted: {}",
                                err
                            );
                            let record = Record::from_ray(&self.ray, CollisionType::Ionosphere)
                                .with_layer(
                                    self.ray.previous_refractive_index.powi(2),
                                    layer.electron_number_density(),
                                    layer.plasma_frequency(),
                                );
                            context.dataset.record(record)?;
                            return Ok(TraceOutcome::Aborted);
                        }
                    }
                }
                // Facets rise above the sphere away from their node, so a launch point
                // can lie below the ground facet. Ground is only solid from above.
                Some(Geometry::Terrain(terrain))
                    if self.ray.vertical_component(terrain.plane.normal) > 0. => {}
                Some(Geometry::Terrain(_)) | None => {
                    context
                        .dataset
                        .record(Record::from_ray(&self.ray, CollisionType::Terrain))?;
                    return Ok(TraceOutcome::Absorbed);
                }
            }
        }

        tracing::debug!(ray = self.ray.ray_number, "Hop limit reached");
        context
            .dataset
            .record(Record::from_ray(&self.ray, CollisionType::None))?;
        Ok(TraceOutcome::HopLimit)
    }
}
