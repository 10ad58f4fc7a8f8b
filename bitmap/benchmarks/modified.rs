//! Benchmarks the mask derivation of freshly written stores.
use brunch::Bench;

use nsmotif_bitmap::{BitmapError, PixelStore};

struct Derive {
    width: u32,
    height: u32,
    opaque: bool,
    /// Every n-th pixel is transparent, none if zero.
    holes: usize,
}

impl Derive {
    fn name(&self) -> String {
        format!(
            "modified({}x{}, opaque={}, holes={})",
            self.width, self.height, self.opaque, self.holes
        )
    }

    fn prepare(self) -> Result<impl FnMut(), BitmapError> {
        let mut store = PixelStore::new(self.width, self.height, self.opaque)?;
        let holes = self.holes;

        Ok(move || {
            for (idx, px) in store.pixels_mut().iter_mut().enumerate() {
                let hole = holes != 0 && idx % holes == 0;
                *px = if hole { [0; 4] } else { [0x80, 0x40, 0x20, 0xff] };
            }

            store.modified();
        })
    }
}

fn main() {
    let tests = [
        Derive {
            width: 512,
            height: 512,
            opaque: true,
            holes: 0,
        },
        Derive {
            width: 512,
            height: 512,
            opaque: false,
            holes: 0,
        },
        Derive {
            width: 512,
            height: 512,
            opaque: false,
            holes: 7,
        },
        Derive {
            width: 509,
            height: 512,
            opaque: false,
            holes: 3,
        },
    ];

    let mut benches = brunch::Benches::default();
    benches.extend(tests.map(|derive| {
        Bench::new(format!("bitmap::modified::main::{}", derive.name()))
            .run(derive.prepare().expect("Failed to setup benchmark"))
    }));
    benches.finish();
}
