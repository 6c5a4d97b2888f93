//! Constrained random points in a rectangle (bounded rejection sampling).
//!
//! Model
//! - Draw `x ∈ [r, W − r)`, `y ∈ [r, H − r)`, then snap each coordinate down to
//!   the grid `q` (`floor(v / q) · q`). Snapping happens after the edge offset.
//! - With uniqueness on (implied by `r > 0` or `q > 0`), a candidate is
//!   rejected if it equals an accepted point or lies closer than `r` to one.
//!   Exact equality is sound because both sides went through the same snap.
//! - Every draw costs one unit of the `k · N` budget, accepted or not. Running
//!   out is not an error: the run simply returns fewer than `N` points.
//! - When `2r` exceeds the width or height the draw range is empty; the whole
//!   budget is charged and no point is accepted.
//!
//! The generator is passed in by the caller, so a seeded `StdRng` makes a run
//! reproducible.

use geo::Geometry;
use nalgebra::Vector2;
use rand::Rng;

use crate::engine::Context;
use crate::error::{Error, Result};

/// Sampler configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SampleCfg {
    /// Target number of points `N`.
    pub count: usize,
    pub width: f64,
    pub height: f64,
    /// Grid interval `q`; 0 disables snapping.
    pub quantum: f64,
    /// Minimum pairwise distance `r`; 0 disables the check.
    pub min_distance: f64,
    pub unique: bool,
    /// Budget multiplier `k`: at most `k · N` draws.
    pub retry_factor: usize,
}

impl Default for SampleCfg {
    fn default() -> Self {
        Self {
            count: 0,
            width: 1.0,
            height: 1.0,
            quantum: 0.0,
            min_distance: 0.0,
            unique: false,
            retry_factor: 10,
        }
    }
}

impl SampleCfg {
    #[inline]
    pub fn uniqueness(&self) -> bool {
        self.unique || self.quantum != 0.0 || self.min_distance != 0.0
    }

    fn validate(&self) -> Result<()> {
        let fields = [
            ("width", self.width),
            ("height", self.height),
            ("quantum", self.quantum),
            ("min_distance", self.min_distance),
        ];
        for (name, v) in fields {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// Outcome of one sampling run.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleRun {
    /// Accepted points in acceptance order; never longer than `count`.
    pub points: Vec<Vector2<f64>>,
    /// Draws consumed from the budget.
    pub draws: usize,
}

impl SampleRun {
    #[inline]
    pub fn is_short(&self, cfg: &SampleCfg) -> bool {
        self.points.len() < cfg.count
    }
}

#[inline]
fn snap(v: f64, q: f64) -> f64 {
    if q == 0.0 {
        v
    } else {
        (v / q).floor() * q
    }
}

/// Run the rejection sampler and return the accepted points.
pub fn sample_points<R: Rng + ?Sized>(cfg: &SampleCfg, rng: &mut R) -> Result<SampleRun> {
    cfg.validate()?;
    let r = cfg.min_distance;
    let r2 = r * r;
    let unique = cfg.uniqueness();
    let span_x = cfg.width - 2.0 * r;
    let span_y = cfg.height - 2.0 * r;

    let budget = cfg.retry_factor.saturating_mul(cfg.count);
    // `[r, W - r)` must fit inside the rectangle; otherwise nothing is drawable.
    let drawable = span_x >= 0.0 && span_y >= 0.0 && cfg.width > 0.0 && cfg.height > 0.0;
    let mut points: Vec<Vector2<f64>> = Vec::with_capacity(cfg.count);
    let mut remaining = if drawable { budget } else { 0 };
    let mut draws = budget - remaining;
    while points.len() < cfg.count && remaining > 0 {
        remaining -= 1;
        draws += 1;
        let x = snap(r + rng.gen::<f64>() * span_x, cfg.quantum);
        let y = snap(r + rng.gen::<f64>() * span_y, cfg.quantum);
        let p = Vector2::new(x, y);
        let accept = !unique
            || points
                .iter()
                .all(|q| *q != p && (p - q).norm_squared() >= r2);
        if accept {
            points.push(p);
        }
    }

    if points.len() < cfg.count {
        tracing::warn!(
            accepted = points.len(),
            target = cfg.count,
            draws,
            "sampling budget exhausted"
        );
    } else {
        tracing::debug!(accepted = points.len(), draws, "sampling done");
    }
    Ok(SampleRun { points, draws })
}

/// Sample points and assemble them into one geometry collection through the
/// engine context.
pub fn sample<R: Rng + ?Sized>(
    ctx: &Context,
    cfg: &SampleCfg,
    rng: &mut R,
) -> Result<Geometry<f64>> {
    let run = sample_points(cfg, rng)?;
    let members = run
        .points
        .iter()
        .map(|p| ctx.create_point(p.x, p.y))
        .collect::<Result<Vec<_>>>()?;
    Ok(ctx.create_collection(members))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineCfg, GeomRef, GeometryTree};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cfg(count: usize, w: f64, h: f64) -> SampleCfg {
        SampleCfg {
            count,
            width: w,
            height: h,
            ..SampleCfg::default()
        }
    }

    #[test]
    fn integer_grid_unique_points() {
        let c = SampleCfg {
            quantum: 1.0,
            unique: true,
            ..cfg(5, 10.0, 10.0)
        };
        let mut rng = StdRng::seed_from_u64(7);
        let run = sample_points(&c, &mut rng).unwrap();
        assert_eq!(run.points.len(), 5);
        for (i, p) in run.points.iter().enumerate() {
            assert_eq!(p.x.fract(), 0.0);
            assert_eq!(p.y.fract(), 0.0);
            assert!((0.0..10.0).contains(&p.x));
            assert!((0.0..10.0).contains(&p.y));
            for q in &run.points[i + 1..] {
                assert_ne!(p, q);
            }
        }
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let c = SampleCfg {
            quantum: 0.5,
            min_distance: 0.5,
            ..cfg(20, 8.0, 6.0)
        };
        let a = sample_points(&c, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = sample_points(&c, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn backstop_terminates_short() {
        let c = SampleCfg {
            min_distance: 0.5,
            ..cfg(100, 1.0, 1.0)
        };
        let mut rng = StdRng::seed_from_u64(1);
        let run = sample_points(&c, &mut rng).unwrap();
        assert!(run.points.len() < 100);
        assert!(!run.points.is_empty());
        assert_eq!(run.draws, 1000);
        assert!(run.is_short(&c));
    }

    #[test]
    fn minimum_distance_holds_pairwise() {
        let c = SampleCfg {
            min_distance: 1.5,
            ..cfg(30, 20.0, 20.0)
        };
        let run = sample_points(&c, &mut StdRng::seed_from_u64(3)).unwrap();
        for (i, p) in run.points.iter().enumerate() {
            assert!(p.x >= 1.5 && p.x < 18.5);
            assert!(p.y >= 1.5 && p.y < 18.5);
            for q in &run.points[i + 1..] {
                assert!((p - q).norm() >= 1.5);
            }
        }
    }

    #[test]
    fn snapping_follows_the_edge_offset() {
        // x is drawn in [2.5, 7.5) and then floored to whole numbers,
        // so 2 is reachable even though it lies inside the margin.
        let c = SampleCfg {
            quantum: 1.0,
            min_distance: 2.5,
            retry_factor: 200,
            ..cfg(4, 10.0, 10.0)
        };
        let run = sample_points(&c, &mut StdRng::seed_from_u64(11)).unwrap();
        for p in &run.points {
            assert!((2.0..=7.0).contains(&p.x), "x = {}", p.x);
            assert!((2.0..=7.0).contains(&p.y), "y = {}", p.y);
        }
    }

    #[test]
    fn distance_wider_than_rectangle_accepts_nothing() {
        let c = SampleCfg {
            min_distance: 2.0,
            ..cfg(3, 1.0, 1.0)
        };
        let run = sample_points(&c, &mut StdRng::seed_from_u64(1)).unwrap();
        assert!(run.points.is_empty());
        assert_eq!(run.draws, 30);

        // only one axis too narrow
        let tall = SampleCfg {
            min_distance: 0.6,
            ..cfg(4, 1.0, 5.0)
        };
        let run = sample_points(&tall, &mut StdRng::seed_from_u64(2)).unwrap();
        for p in &run.points {
            assert!((0.0..1.0).contains(&p.x) && (0.0..5.0).contains(&p.y));
        }
        assert!(run.points.is_empty());
    }

    #[test]
    fn without_uniqueness_every_draw_is_accepted() {
        let c = cfg(50, 1.0, 1.0);
        let run = sample_points(&c, &mut StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(run.points.len(), 50);
        assert_eq!(run.draws, 50);
    }

    #[test]
    fn zero_count_gives_empty_collection() {
        let ctx = Context::init(EngineCfg::default()).unwrap();
        let g = sample(&ctx, &cfg(0, 10.0, 10.0), &mut StdRng::seed_from_u64(0)).unwrap();
        let view = GeomRef::from(&g);
        assert_eq!(view.num_members(), 0);
    }

    #[test]
    fn collection_holds_every_point() {
        let ctx = Context::init(EngineCfg::default()).unwrap();
        let g = sample(&ctx, &cfg(12, 3.0, 4.0), &mut StdRng::seed_from_u64(9)).unwrap();
        let view = GeomRef::from(&g);
        assert_eq!(view.num_members(), 12);
        assert!(view.x_max().unwrap() < 3.0);
        assert!(view.y_max().unwrap() < 4.0);
    }

    #[test]
    fn rejects_negative_or_nan_parameters() {
        let mut rng = StdRng::seed_from_u64(0);
        let neg = SampleCfg {
            min_distance: -1.0,
            ..cfg(3, 1.0, 1.0)
        };
        assert!(matches!(
            sample_points(&neg, &mut rng),
            Err(Error::InvalidConfig(_))
        ));
        let nan = cfg(3, f64::NAN, 1.0);
        assert!(sample_points(&nan, &mut rng).is_err());
    }
}
