//! Sample a few point clouds and print each convex hull as WKT.
//!
//! Usage:
//!   cargo run -p wktkit --example sample_hull -- [seed]
//!
//! Prints the accepted count, the bounds and the hull for three rectangle
//! shapes, so the sampler and hull can be eyeballed together.

use rand::{rngs::StdRng, SeedableRng};
use wktkit::codec::Codec;
use wktkit::prelude::*;

fn main() -> Result<()> {
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(2025);
    let ctx = Context::init(EngineCfg::default())?;
    let text = Codec::new(Format::Text, &ctx)?.ok_or(Error::Disabled {
        direction: wktkit::Direction::Writer,
    })?;
    let mut rng = StdRng::seed_from_u64(seed);

    for (w, h) in [(10.0, 10.0), (40.0, 5.0), (3.0, 3.0)] {
        let cfg = SampleCfg {
            count: 25,
            width: w,
            height: h,
            quantum: 0.5,
            min_distance: 0.5,
            ..SampleCfg::default()
        };
        let pts = sample(&ctx, &cfg, &mut rng)?;
        let view = GeomRef::from(&pts);
        let b = wktkit::bounds::extract(&view)?;
        let hull = ctx.convex_hull(&pts)?;
        println!(
            "{w}x{h}: n={} bounds=[{} {} {} {}]",
            view.num_members(),
            b.xmin,
            b.xmax,
            b.ymin,
            b.ymax
        );
        println!("  {}", String::from_utf8_lossy(&text.encode(&hull)?));
    }
    Ok(())
}
