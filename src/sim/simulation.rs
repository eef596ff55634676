//! Scenario driver: builds the scene, launches rays and collects the results.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::config::{AppConfig, ScenarioConfig};
use crate::geom::plane::Plane;
use crate::geom::rotation::{Axis, axis_rotation, rotate_point, rotate_vector};
use crate::io::ExportFormat;
use crate::sim::constants::BEACON_CLEARANCE;
use crate::sim::dataset::Dataset;
use crate::sim::engine::InteractionEngine;
use crate::sim::engine::refraction::RefractiveModel;
use crate::sim::framework::TraceContext;
use crate::sim::scene::{Grid, Ionosphere, Scene, Terrain};
use crate::sim::sweep::Sweep;
use crate::sim::tracer::ray::Ray;
use crate::sim::tracer::scheduler::{Scheduler, TraceStats};
use crate::sim::tracer::worker::Worker;
use crate::{Point, Vector};

/// Outcome of a finished run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub elapsed: Duration,
    /// Completed traces
    pub tracings: usize,
    /// Records written
    pub records: usize,
    pub stats: TraceStats,
    /// Output files in write order
    pub files: Vec<PathBuf>,
}

impl RunSummary {
    pub fn tracings_per_sec(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0. {
            self.tracings as f64 / secs
        } else {
            0.
        }
    }
}

pub struct Simulation {
    app: AppConfig,
    scenario: ScenarioConfig,
    engine: InteractionEngine,
    output: PathBuf,
    scene: Arc<Scene>,
    rng: StdRng,
}

impl Simulation {
    /// Prepares a run writing to `output`.
    ///
    /// With `magnetic_field` the AHDR model (and the configured field, if any)
    /// supplies the recorded refractive indices.
    pub fn new(
        app: AppConfig,
        scenario: ScenarioConfig,
        output: impl Into<PathBuf>,
        magnetic_field: bool,
    ) -> Self {
        let engine = if magnetic_field {
            let field = app.magnetic_field.as_ref().map(|f| f.field());
            if field.is_none() {
                tracing::warn!("Magnetic field requested but not configured, using AHDR without field");
            }
            InteractionEngine::new(RefractiveModel::Ahdr, field)
        } else {
            InteractionEngine::default()
        };
        let rng = match app.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            app,
            scenario,
            engine,
            output: output.into(),
            scene: Arc::new(Scene::new()),
            rng,
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Builds the terrain and ionosphere patches of one iteration.
    ///
    /// Peak densities are redrawn from their variability on every call.
    pub fn create_scene(&mut self) -> Result<()> {
        let step = self.app.angular_step_size;
        let radius = self.scenario.radius;
        let sun = self.scenario.sun_direction();
        let ionosphere = &self.scenario.ionosphere;

        let mut peaks = Vec::with_capacity(ionosphere.layers.len());
        for layer in &ionosphere.layers {
            let std_dev = ionosphere.electron_density_variability * layer.peak_density;
            let normal = Normal::new(layer.peak_density, std_dev)
                .context("Invalid electron density distribution")?;
            peaks.push((normal.sample(&mut self.rng).max(0.), layer));
        }

        let grid = Grid::new(step);
        let cells = grid.cells();
        let mut scene = Scene::with_grid(grid);
        for (cell, normal) in &cells {
            if let Some(plane) = patch(*normal, radius, step) {
                scene.add(Terrain::new(plane).with_cell(*cell));
            }
        }
        for altitude in ionosphere.altitude.values() {
            for (cell, normal) in &cells {
                let Some(plane) = patch(*normal, radius + altitude, step) else {
                    continue;
                };
                let mut layer = Ionosphere::new(plane, altitude, ionosphere.altitude.step)
                    .with_cell(*cell)
                    .with_sun_direction(sun);
                for (peak, config) in &peaks {
                    layer.superimpose_electron_number_density(
                        *peak,
                        config.peak_altitude,
                        config.neutral_scale_height,
                    );
                }
                scene.add(layer);
            }
        }

        tracing::info!(patches = scene.len(), "Scene created");
        self.scene = Arc::new(scene);
        Ok(())
    }

    /// Drops all patches of the current iteration.
    pub fn flush_scene(&mut self) {
        self.scene = Arc::new(Scene::new());
    }

    /// Expands beacons and sweeps into rays, numbered from `*ray_counter + 1`.
    pub fn launch_rays(&self, ray_counter: &mut usize) -> Vec<Ray> {
        let sweep = Sweep {
            azimuth: self.app.azimuth,
            frequency: self.app.frequencies,
            elevation: self.app.sza,
        };
        let launches = sweep.launches();
        let mut rays = Vec::with_capacity(launches.len() * self.app.beacons.len());

        for (id, beacon) in self.app.beacons.iter().enumerate() {
            let rotation = axis_rotation(Axis::X, beacon.latitude_offset.to_radians())
                .dot(&axis_rotation(Axis::Z, beacon.longitude_offset.to_radians()));
            let height = self.scenario.radius + BEACON_CLEARANCE + beacon.altitude;
            let position = rotate_point(&rotation, Point::new(0., height, 0.));

            for launch in &launches {
                let theta = launch.elevation.to_radians();
                let azimuth = launch.azimuth.to_radians();
                let local = rotate_vector(
                    &axis_rotation(Axis::Y, azimuth),
                    Vector::new(theta.sin(), theta.cos(), 0.),
                );

                *ray_counter += 1;
                let direction = rotate_vector(&rotation, local);
                let Some(mut ray) = Ray::new(*ray_counter, position, direction, launch.frequency)
                else {
                    tracing::warn!(ray = *ray_counter, "Skipping ray without direction");
                    continue;
                };
                ray.origin_beacon_id = id + 1;
                ray.original_angle = theta;
                ray.original_azimuth = azimuth;
                ray.signal_power = beacon
                    .antenna
                    .signal_power_at(launch.azimuth, launch.elevation);
                rays.push(ray);
            }
        }
        rays
    }

    /// Runs all iterations and writes the dataset.
    pub fn run(mut self) -> Result<RunSummary> {
        let start = Instant::now();
        let format = ExportFormat::from_path(&self.output)?;
        let dataset = Dataset::new(
            format.exporter(),
            self.output.clone(),
            self.app.dataset_flush_threshold,
        );
        let context = TraceContext::new(self.engine.clone(), dataset)
            .with_max_hops(self.app.max_hops)
            .into_shared();
        let mut scheduler = Scheduler::new(self.app.parallelism)?;

        tracing::info!(parallelism = scheduler.parallelism(), "Starting simulation");
        tracing::info!(
            beacons = self.app.beacons.len(),
            fmin = self.app.frequencies.min,
            fstep = self.app.frequencies.step,
            fmax = self.app.frequencies.max,
            "Scanning frequencies [Hz]"
        );

        let mut ray_counter = 0;
        let mut stats = TraceStats::default();
        for iteration in 0..self.app.iterations {
            tracing::info!("Iteration {} of {}", iteration + 1, self.app.iterations);
            self.create_scene()?;

            for ray in self.launch_rays(&mut ray_counter) {
                scheduler.submit(Worker::new(ray, Arc::clone(&self.scene), Arc::clone(&context)));
            }
            tracing::info!(workers = scheduler.pending(), "Workers queued");

            stats += scheduler.wait()?;
            self.flush_scene();
        }

        context.dataset.final_flush()?;

        let summary = RunSummary {
            elapsed: start.elapsed(),
            tracings: context.counter.get(),
            records: context.dataset.flushed(),
            stats,
            files: context.dataset.files(),
        };
        tracing::warn!(
            "Elapsed: {:.2} sec. {} tracings done. {:.2} tracings/sec",
            summary.elapsed.as_secs_f64(),
            summary.tracings,
            summary.tracings_per_sec()
        );
        tracing::warn!("Results stored at: {}", self.output.display());
        tracing::debug!(?stats, "Trace outcomes");
        Ok(summary)
    }
}

/// Square patch of side `step * r` tangent to the sphere of radius `r`.
fn patch(normal: Vector, r: f64, step: f64) -> Option<Plane> {
    let center = Point::new(0., 0., 0.) + normal * r;
    Plane::new(normal, center, step * r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests::{APP, SCENARIO};
    use crate::sim::dataset::CollisionType;
    use crate::sim::scene::Geometry;
    use crate::sim::sweep::Range;

    fn configs(app_json: &str) -> (AppConfig, ScenarioConfig) {
        let mut app: AppConfig = serde_json::from_str(app_json).unwrap();
        app.angular_step_size = 0.5;
        app.seed = Some(7);
        let mut scenario: ScenarioConfig = serde_json::from_str(SCENARIO).unwrap();
        scenario.ionosphere.altitude = Range::new(100e3, 10e3, 120e3);
        (app, scenario)
    }

    #[test]
    fn test_create_and_flush_scene() {
        let (app, scenario) = configs(APP);
        let mut sim = Simulation::new(app, scenario, "out.csv", false);
        sim.create_scene().unwrap();

        let grid = Grid::new(0.5).len();
        assert_eq!(sim.scene().len(), grid * 4);
        let terrain = sim
            .scene()
            .geometries()
            .iter()
            .filter(|g| matches!(g, Geometry::Terrain(_)))
            .count();
        assert_eq!(terrain, grid);

        // The patch under the sun at the layer peak carries the peak density
        let overhead = sim.scene().geometries().iter().find_map(|g| match g {
            Geometry::Ionosphere(io) if io.altitude == 120e3 && io.solar_zenith_angle < 1e-9 => Some(io),
            _ => None,
        });
        assert!(overhead.unwrap().electron_number_density() > 0.);

        sim.flush_scene();
        assert!(sim.scene().is_empty());
    }

    #[test]
    fn test_launch_rays() {
        let (app, scenario) = configs(APP);
        let radius = scenario.radius;
        let sim = Simulation::new(app, scenario, "out.csv", false);
        let mut counter = 0;
        let rays = sim.launch_rays(&mut counter);

        // 4 azimuths x 3 frequencies x 7 angles x 1 beacon
        assert_eq!(rays.len(), 84);
        assert_eq!(counter, 84);
        assert_eq!(rays[0].ray_number, 1);
        assert!(rays[0].origin.is_close(&Point::new(0., radius + 2., 0.)));
        assert!(rays[0].direction.is_close(&Vector::new(0., 1., 0.)));
        assert_eq!(rays[0].origin_beacon_id, 1);
        assert_eq!(rays[0].signal_power, 1.);
        assert!(rays.iter().all(|r| r.direction.dy >= -1e-12));

        // Numbers continue across iterations
        let again = sim.launch_rays(&mut counter);
        assert_eq!(again[0].ray_number, 85);
    }

    #[test]
    fn test_each_shell_is_crossed_once() {
        let (mut app, mut scenario) = configs(APP);
        app.angular_step_size = 0.05;
        app.frequencies = Range::single(5e6);
        app.azimuth = Range::new(0., 45., 45.);
        app.sza = Range::new(20., 20., 60.);
        let mut beacon = app.beacons[0].clone();
        beacon.latitude_offset = 10.;
        beacon.longitude_offset = 37.;
        app.beacons.push(beacon);
        // Vacuum: rays go straight through every shell
        scenario.ionosphere.layers.clear();
        let radius = scenario.radius;

        let mut sim = Simulation::new(app, scenario, "out.csv", false);
        sim.create_scene().unwrap();
        let (context, sink) = crate::sim::tracer::worker::tests::context(20);
        let rays = sim.launch_rays(&mut 0);
        assert_eq!(rays.len(), 12);
        for ray in rays {
            let mut worker = Worker::new(ray, Arc::clone(&sim.scene), Arc::clone(&context));
            worker.run().unwrap();
        }
        context.dataset.final_flush().unwrap();

        let records = sink.lock();
        for ray_number in 1..=12 {
            let shells: Vec<i64> = records
                .iter()
                .filter(|r| r.ray_number == ray_number && r.collision_type == CollisionType::Ionosphere)
                .map(|r| {
                    let altitude = Vector::from_a_point(r.position).length() - radius;
                    (altitude / 10e3).round() as i64
                })
                .collect();
            assert_eq!(shells, vec![10, 11, 12], "ray {}", ray_number);
        }
    }

    #[test]
    fn test_run_writes_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("data.csv");
        let (mut app, scenario) = configs(APP);
        app.iterations = 2;
        app.frequencies = Range::single(5e6);
        app.azimuth = Range::single(0.);
        app.sza = Range::new(0., 30., 30.);

        let summary = Simulation::new(app, scenario, &output, false).run().unwrap();
        assert_eq!(summary.tracings, 4);
        assert_eq!(summary.stats.total(), 4);
        assert!(summary.records >= 4);
        assert_eq!(summary.files, vec![output.clone()]);

        let text = std::fs::read_to_string(&output).unwrap();
        let mut numbers: Vec<usize> = text
            .lines()
            .skip(1)
            .map(|l| l.split(',').next().unwrap().parse().unwrap())
            .collect();
        numbers.sort_unstable();
        numbers.dedup();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_unsupported_output_fails_before_tracing() {
        let (app, scenario) = configs(APP);
        let err = Simulation::new(app, scenario, "out.xlsx", false).run().unwrap_err();
        assert!(err.to_string().contains("unsupported output format"));
    }
}
