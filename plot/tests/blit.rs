use nsmotif_bitmap::{PixelStore, Rgba};
use nsmotif_plot::{
    BackendError, BitmapFlags, BlendBackend, BlitBackend, PlotError, Plotter, StencilBackend,
    MAX_PIXMAP_DIMENSION,
};

const PAPER: Rgba = [0xf0, 0xf0, 0xf0, 0xff];
const BLACK: Rgba = [0, 0, 0, 0xff];
const WHITE: Rgba = [0xff, 0xff, 0xff, 0xff];

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn store(width: u32, height: u32, pixel: impl Fn(u32, u32) -> Rgba) -> PixelStore {
    let mut store = PixelStore::new(width, height, false).unwrap();
    for y in 0..height {
        for x in 0..width {
            store.pixels_mut()[(y * width + x) as usize] = pixel(x, y);
        }
    }

    store.modified();
    store
}

/// A horizontal ramp, each column distinct.
fn ramp(width: u32) -> PixelStore {
    store(width, 1, |x, _| [x as u8 * 10, 0x20, 0x40, 0xff])
}

fn stencil_plotter(width: u32, height: u32) -> Plotter<StencilBackend> {
    Plotter::new(StencilBackend::new(width, height, PAPER).unwrap())
}

fn row<B: BlitBackend>(plotter: &Plotter<B>, y: i32, width: i32) -> Vec<Option<Rgba>> {
    (0..width).map(|x| plotter.backend().read_pixel(x, y)).collect()
}

#[test]
fn tiling_phase_is_anchored_to_placement() {
    init();
    let image = ramp(4);

    let mut near = stencil_plotter(40, 1);
    near.clip(0, 0, 40, 1);
    near.bitmap(&image, 5, 0, 4, 1, 0, BitmapFlags::REPEAT_X).unwrap();

    let mut far = stencil_plotter(40, 1);
    far.clip(-100, 0, 40, 1);
    far.bitmap(&image, 5, 0, 4, 1, 0, BitmapFlags::REPEAT_X).unwrap();

    assert_eq!(row(&near, 0, 40), row(&far, 0, 40));

    // Column `x` shows source column `(x - 5) mod 4`.
    for x in 0..40 {
        let expected = image.pixel((x - 5i32).rem_euclid(4) as u32, 0);
        assert_eq!(near.backend().read_pixel(x, 0), Some(expected), "at {}", x);
    }
}

#[test]
fn edge_tile_is_truncated() {
    init();
    let image = ramp(10);
    let mut plotter = stencil_plotter(30, 1);
    plotter.clip(0, 0, 25, 1);

    let copies = plotter
        .bitmap(&image, 0, 0, 10, 1, 0, BitmapFlags::REPEAT_X)
        .unwrap();
    assert_eq!(copies, 3);

    assert_eq!(plotter.backend().read_pixel(24, 0), Some(image.pixel(4, 0)));
    assert_eq!(plotter.backend().read_pixel(25, 0), Some(PAPER));
}

#[test]
fn masked_tiles_keep_the_background() {
    init();
    // A 3x3 sprite with a transparent centre.
    let sprite = store(3, 3, |x, y| if (x, y) == (1, 1) { [0; 4] } else { BLACK });
    let mut plotter = stencil_plotter(9, 9);

    let copies = plotter
        .bitmap(
            &sprite,
            0,
            0,
            3,
            3,
            0,
            BitmapFlags::REPEAT_X | BitmapFlags::REPEAT_Y,
        )
        .unwrap();
    assert_eq!(copies, 9);

    for y in 0..9 {
        for x in 0..9 {
            let hole = x % 3 == 1 && y % 3 == 1;
            let expected = if hole { PAPER } else { BLACK };
            assert_eq!(plotter.backend().read_pixel(x, y), Some(expected), "at {},{}", x, y);
        }
    }
}

#[test]
fn clip_is_restored_after_masked_blit() {
    init();
    let sprite = store(2, 2, |x, _| if x == 0 { [0; 4] } else { BLACK });
    let solid = store(4, 4, |_, _| WHITE);
    let mut plotter = stencil_plotter(8, 8);
    plotter.clip(0, 0, 6, 6);

    plotter
        .bitmap(&sprite, 0, 0, 2, 2, 0, BitmapFlags::empty())
        .unwrap();
    assert_eq!(plotter.backend().read_pixel(0, 0), Some(PAPER));
    assert_eq!(plotter.backend().read_pixel(1, 0), Some(BLACK));

    // Drawn through the ambient clip, not the stencil left behind by the sprite.
    plotter
        .bitmap(&solid, 3, 3, 4, 4, 0, BitmapFlags::empty())
        .unwrap();
    assert_eq!(plotter.backend().read_pixel(3, 3), Some(WHITE));
    assert_eq!(plotter.backend().read_pixel(5, 5), Some(WHITE));
    assert_eq!(plotter.backend().read_pixel(6, 6), Some(PAPER));
}

#[test]
fn scaling_is_identical_on_both_backends() {
    init();
    let checker = store(2, 2, |x, y| if (x + y) % 2 == 0 { BLACK } else { WHITE });

    let mut stencil = stencil_plotter(6, 6);
    let mut blend = Plotter::new(BlendBackend::new(6, 6, PAPER).unwrap());

    for plotter in [&mut stencil as &mut dyn ScaledPlot, &mut blend] {
        assert_eq!(plotter.plot(&checker, 1, 1, 4, 4), 1);
    }

    for y in 0..6 {
        for x in 0..6 {
            let inside = (1..5).contains(&x) && (1..5).contains(&y);
            let expected = if !inside {
                PAPER
            } else if ((x - 1) / 2 + (y - 1) / 2) % 2 == 0 {
                BLACK
            } else {
                WHITE
            };

            assert_eq!(stencil.backend().read_pixel(x, y), Some(expected));
            assert_eq!(blend.backend().read_pixel(x, y), Some(expected));
        }
    }
}

/// Object safe view on plotters of any backend.
trait ScaledPlot {
    fn plot(&mut self, store: &PixelStore, x: i32, y: i32, width: i32, height: i32) -> usize;
}

impl<B: BlitBackend> ScaledPlot for Plotter<B> {
    fn plot(&mut self, store: &PixelStore, x: i32, y: i32, width: i32, height: i32) -> usize {
        self.bitmap(store, x, y, width, height, 0, BitmapFlags::empty())
            .unwrap()
    }
}

#[test]
fn clipped_scale_samples_the_visible_window() {
    init();
    let image = store(2, 2, |x, y| [x as u8 * 100, y as u8 * 100, 0, 0xff]);
    let mut plotter = stencil_plotter(8, 8);
    plotter.clip(3, 3, 8, 8);

    plotter
        .bitmap(&image, 0, 0, 8, 8, 0, BitmapFlags::empty())
        .unwrap();

    assert_eq!(plotter.backend().read_pixel(2, 2), Some(PAPER));
    assert_eq!(plotter.backend().read_pixel(3, 3), Some(image.pixel(0, 0)));
    assert_eq!(plotter.backend().read_pixel(4, 3), Some(image.pixel(1, 0)));
    assert_eq!(plotter.backend().read_pixel(7, 7), Some(image.pixel(1, 1)));
}

#[test]
fn scaled_stencil_follows_the_sampling() {
    init();
    let sprite = store(2, 1, |x, _| if x == 0 { [0; 4] } else { BLACK });
    let mut plotter = stencil_plotter(4, 2);

    plotter
        .bitmap(&sprite, 0, 0, 4, 2, 0, BitmapFlags::empty())
        .unwrap();

    assert_eq!(
        row(&plotter, 1, 4),
        [Some(PAPER), Some(PAPER), Some(BLACK), Some(BLACK)]
    );
}

#[test]
fn exhausted_backend_skips_blit() {
    init();
    let huge = store(MAX_PIXMAP_DIMENSION + 1, 1, |x, _| {
        if x == 0 {
            [0; 4]
        } else {
            BLACK
        }
    });
    let small = store(2, 2, |_, _| WHITE);
    let mut plotter = stencil_plotter(8, 8);
    plotter.clip(1, 1, 7, 7);

    // Visible within the clip, so the pixmap has to be created.
    let err = plotter
        .bitmap(&huge, 0, 1, MAX_PIXMAP_DIMENSION as i32 + 1, 1, 0, BitmapFlags::empty())
        .unwrap_err();
    assert!(matches!(
        err,
        PlotError::Backend {
            source: BackendError::SurfaceAllocation {
                width,
                height: 1,
            },
            ..
        } if width == MAX_PIXMAP_DIMENSION + 1
    ));
    assert_eq!(plotter.backend().pixmap_count(), 0);

    // Later blits are unaffected and still clipped.
    plotter
        .bitmap(&small, 0, 0, 2, 2, 0, BitmapFlags::empty())
        .unwrap();
    assert_eq!(plotter.backend().read_pixel(0, 0), Some(PAPER));
    assert_eq!(plotter.backend().read_pixel(1, 1), Some(WHITE));
}

#[test]
fn destroy_frees_the_pixmap() {
    init();
    let image = ramp(3);
    let mut plotter = stencil_plotter(4, 4);
    plotter
        .bitmap(&image, 0, 0, 3, 1, 0, BitmapFlags::empty())
        .unwrap();
    assert_eq!(plotter.backend().pixmap_count(), 1);

    plotter.destroy_bitmap(Some(image));
    plotter.destroy_bitmap(None);
    assert_eq!(plotter.backend().pixmap_count(), 0);
}
