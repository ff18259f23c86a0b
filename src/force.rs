//! # Force Simulation
//! Iterative force-directed layout behind a small capability trait.
//!
//! [`ForceSimulation`] is the seam: callers hand over node count, links and force
//! parameters and receive positions through a per-tick callback. [`DecayingForceLayout`]
//! is the built-in primitive: an explicit step per tick with velocity decay, not a
//! Verlet integrator. It follows the conventions of the usual browser
//! force-layout library (cooling schedule, velocity decay, phyllotaxis seeding,
//! link bias) so that settled graphs look the way operators expect.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Spring between two node indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimLink {
    pub source: usize,
    pub target: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Forces {
    /// Rest length of every link spring.
    pub link_distance: f64,
    /// Pairwise many-body strength; negative repels.
    pub charge_strength: f64,
    /// Centering target.
    pub center: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationInput {
    pub node_count: usize,
    pub links: Vec<SimLink>,
    pub forces: Forces,
}

/// Callback fired after every tick with the tick index and current positions.
/// Returning `Break` stops the run.
pub type TickFn<'a> = dyn FnMut(usize, &[Point]) -> ControlFlow<()> + 'a;

pub trait ForceSimulation {
    /// Run until cooled or until `on_tick` breaks. Returns the number of ticks delivered.
    fn run(&mut self, input: &SimulationInput, on_tick: &mut TickFn<'_>) -> usize;
}

/// Cooling and integration parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayingForceLayout {
    pub alpha: f64,
    pub alpha_min: f64,
    pub alpha_decay: f64,
    pub alpha_target: f64,
    /// Fraction of velocity lost per tick.
    pub velocity_decay: f64,
    /// Radius multiplier for phyllotaxis seeding.
    pub initial_radius: f64,
    /// Hard stop regardless of alpha.
    pub max_ticks: usize,
}

impl Default for DecayingForceLayout {
    fn default() -> Self {
        let alpha_min = 0.001;
        Self {
            alpha: 1.0,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            alpha_target: 0.0,
            velocity_decay: 0.4,
            initial_radius: 10.0,
            max_ticks: 1_000,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Body {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
}

/// Linear congruential source for jiggle; fixed seed keeps runs reproducible.
struct Lcg(u64);

impl Lcg {
    const A: u64 = 1_664_525;
    const C: u64 = 1_013_904_223;
    const M: u64 = 4_294_967_296;

    fn next(&mut self) -> f64 {
        self.0 = (Self::A.wrapping_mul(self.0).wrapping_add(Self::C)) % Self::M;
        self.0 as f64 / Self::M as f64
    }

    /// Tiny nonzero nudge used to separate coincident points.
    fn jiggle(&mut self) -> f64 {
        (self.next() - 0.5) * 1e-6
    }
}

fn phyllotaxis(n: usize, radius: f64) -> Vec<Body> {
    let angle = std::f64::consts::PI * (3.0 - 5f64.sqrt());
    (0..n)
        .map(|i| {
            let r = radius * (0.5 + i as f64).sqrt();
            let a = i as f64 * angle;
            Body {
                x: r * a.cos(),
                y: r * a.sin(),
                ..Body::default()
            }
        })
        .collect()
}

impl DecayingForceLayout {
    fn apply_links(&self, bodies: &mut [Body], links: &[SimLink], distance: f64, alpha: f64, rng: &mut Lcg) {
        let mut degree = vec![0usize; bodies.len()];
        for l in links {
            degree[l.source] += 1;
            degree[l.target] += 1;
        }

        for l in links {
            let (s, t) = (bodies[l.source], bodies[l.target]);
            let mut x = t.x + t.vx - s.x - s.vx;
            let mut y = t.y + t.vy - s.y - s.vy;
            if x == 0.0 {
                x = rng.jiggle();
            }
            if y == 0.0 {
                y = rng.jiggle();
            }
            let len = (x * x + y * y).sqrt();
            let (ds, dt) = (degree[l.source] as f64, degree[l.target] as f64);
            let strength = 1.0 / ds.min(dt);
            let bias = ds / (ds + dt);
            let k = (len - distance) / len * alpha * strength;
            x *= k;
            y *= k;

            bodies[l.target].vx -= x * bias;
            bodies[l.target].vy -= y * bias;
            bodies[l.source].vx += x * (1.0 - bias);
            bodies[l.source].vy += y * (1.0 - bias);
        }
    }

    fn apply_charge(&self, bodies: &mut [Body], strength: f64, alpha: f64, rng: &mut Lcg) {
        let n = bodies.len();
        for i in 0..n {
            for j in 0..n {
                if i == j {
                    continue;
                }
                let mut x = bodies[j].x - bodies[i].x;
                let mut y = bodies[j].y - bodies[i].y;
                let mut l = x * x + y * y;
                if x == 0.0 {
                    x = rng.jiggle();
                    l += x * x;
                }
                if y == 0.0 {
                    y = rng.jiggle();
                    l += y * y;
                }
                if l < 1.0 {
                    l = l.sqrt();
                }
                bodies[i].vx += x * strength * alpha / l;
                bodies[i].vy += y * strength * alpha / l;
            }
        }
    }

    fn apply_center(&self, bodies: &mut [Body], center: Point) {
        if bodies.is_empty() {
            return;
        }
        let n = bodies.len() as f64;
        let sx = bodies.iter().map(|b| b.x).sum::<f64>() / n - center.x;
        let sy = bodies.iter().map(|b| b.y).sum::<f64>() / n - center.y;
        for b in bodies.iter_mut() {
            b.x -= sx;
            b.y -= sy;
        }
    }
}

impl ForceSimulation for DecayingForceLayout {
    fn run(&mut self, input: &SimulationInput, on_tick: &mut TickFn<'_>) -> usize {
        let forces = input.forces;
        let links: Vec<SimLink> = input
            .links
            .iter()
            .copied()
            .filter(|l| l.source < input.node_count && l.target < input.node_count)
            .collect();

        let mut bodies = phyllotaxis(input.node_count, self.initial_radius);
        let mut rng = Lcg(1);
        let mut alpha = self.alpha;
        let retain = 1.0 - self.velocity_decay;
        let mut positions = Vec::with_capacity(bodies.len());

        let mut tick = 0;
        while alpha >= self.alpha_min && tick < self.max_ticks {
            alpha += (self.alpha_target - alpha) * self.alpha_decay;

            self.apply_links(&mut bodies, &links, forces.link_distance, alpha, &mut rng);
            self.apply_charge(&mut bodies, forces.charge_strength, alpha, &mut rng);
            self.apply_center(&mut bodies, forces.center);

            for b in bodies.iter_mut() {
                b.vx *= retain;
                b.vy *= retain;
                b.x += b.vx;
                b.y += b.vy;
            }

            positions.clear();
            positions.extend(bodies.iter().map(|b| Point::new(b.x, b.y)));
            tick += 1;
            if on_tick(tick - 1, &positions).is_break() {
                break;
            }
        }
        tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(n: usize, links: Vec<SimLink>) -> SimulationInput {
        SimulationInput {
            node_count: n,
            links,
            forces: Forces {
                link_distance: 150.0,
                charge_strength: -400.0,
                center: Point::new(400.0, 225.0),
            },
        }
    }

    fn settle(input: &SimulationInput) -> (usize, Vec<Point>) {
        let mut last = Vec::new();
        let ticks = DecayingForceLayout::default().run(input, &mut |_, p| {
            last = p.to_vec();
            ControlFlow::Continue(())
        });
        (ticks, last)
    }

    #[test]
    fn cools_in_about_three_hundred_ticks() {
        let (ticks, _) = settle(&input(3, vec![]));
        assert!((295..=305).contains(&ticks), "ticks = {ticks}");
    }

    #[test]
    fn unlinked_nodes_repel_and_center() {
        let (_, pts) = settle(&input(4, vec![]));
        for i in 0..pts.len() {
            for j in (i + 1)..pts.len() {
                let d = ((pts[i].x - pts[j].x).powi(2) + (pts[i].y - pts[j].y).powi(2)).sqrt();
                assert!(d > 10.0, "nodes {i} and {j} too close: {d}");
            }
        }
        let cx = pts.iter().map(|p| p.x).sum::<f64>() / pts.len() as f64;
        let cy = pts.iter().map(|p| p.y).sum::<f64>() / pts.len() as f64;
        assert!((cx - 400.0).abs() < 1.0);
        assert!((cy - 225.0).abs() < 1.0);
    }

    #[test]
    fn runs_are_reproducible() {
        let inp = input(3, vec![SimLink { source: 0, target: 2 }]);
        assert_eq!(settle(&inp).1, settle(&inp).1);
    }

    #[test]
    fn break_stops_early() {
        let mut seen = 0;
        let ticks = DecayingForceLayout::default().run(&input(2, vec![]), &mut |i, _| {
            seen += 1;
            if i == 4 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(ticks, 5);
        assert_eq!(seen, 5);
    }

    #[test]
    fn empty_input_still_ticks_without_positions() {
        let (ticks, pts) = settle(&input(0, vec![]));
        assert!(ticks > 0);
        assert!(pts.is_empty());
    }

    #[test]
    fn out_of_range_links_are_ignored() {
        let (_, pts) = settle(&input(2, vec![SimLink { source: 0, target: 9 }]));
        assert_eq!(pts.len(), 2);
        assert!(pts.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }
}
