//! Benchmarks repeated and scaled placements through the software backends.
use brunch::Bench;

use nsmotif_bitmap::PixelStore;
use nsmotif_plot::{BackendKind, BitmapFlags, PlotConfig, PlotError};

struct Placement {
    backend: BackendKind,
    tile: u32,
    masked: bool,
    flags: BitmapFlags,
    /// Requested size of the first tile.
    size: i32,
}

impl Placement {
    fn name(&self) -> String {
        format!(
            "tiling({:?}, {}px, masked={}, {:?}, {})",
            self.backend, self.tile, self.masked, self.flags, self.size
        )
    }

    fn prepare(self) -> Result<impl FnMut(), PlotError> {
        let config = PlotConfig {
            backend: self.backend,
            width: 1024,
            height: 768,
            ..PlotConfig::default()
        };

        let mut store = PixelStore::new(self.tile, self.tile, false)?;
        for (idx, px) in store.pixels_mut().iter_mut().enumerate() {
            let hole = self.masked && idx % 5 == 0;
            *px = if hole { [0; 4] } else { [idx as u8, 0x40, 0x80, 0xff] };
        }
        store.modified();

        let mut plotter = config
            .build_plotter()
            .map_err(|source| PlotError::Backend {
                backend: format!("{:?}", self.backend),
                source,
            })?;
        let (flags, size) = (self.flags, self.size);

        Ok(move || {
            plotter
                .bitmap(&store, -3, -7, size, size, 0, flags)
                .unwrap();
        })
    }
}

fn main() {
    let tests = [
        Placement {
            backend: BackendKind::Stencil,
            tile: 32,
            masked: false,
            flags: BitmapFlags::REPEAT_X | BitmapFlags::REPEAT_Y,
            size: 32,
        },
        Placement {
            backend: BackendKind::Stencil,
            tile: 32,
            masked: true,
            flags: BitmapFlags::REPEAT_X | BitmapFlags::REPEAT_Y,
            size: 32,
        },
        Placement {
            backend: BackendKind::Blend,
            tile: 32,
            masked: true,
            flags: BitmapFlags::REPEAT_X | BitmapFlags::REPEAT_Y,
            size: 32,
        },
        Placement {
            backend: BackendKind::Stencil,
            tile: 64,
            masked: true,
            flags: BitmapFlags::empty(),
            size: 700,
        },
        Placement {
            backend: BackendKind::Blend,
            tile: 64,
            masked: false,
            flags: BitmapFlags::empty(),
            size: 700,
        },
    ];

    let mut benches = brunch::Benches::default();
    benches.extend(tests.map(|placement| {
        Bench::new(format!("plot::tiling::main::{}", placement.name()))
            .run(placement.prepare().expect("Failed to setup benchmark"))
    }));
    benches.finish();
}
