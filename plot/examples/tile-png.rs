use nsmotif_bitmap::PixelStore;
use nsmotif_plot::{BitmapFlags, Plotter, StencilBackend};

const SZ_W: u32 = 320;
const SZ_H: u32 = 200;

/// Tiles a ring shaped sprite across a band of the window and saves the result.
///
/// The ring's hole and corners are transparent, so the background shows through the stencil.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut sprite = PixelStore::new(24, 24, false)?;
    for y in 0..24u32 {
        for x in 0..24u32 {
            let (dx, dy) = (x as i32 - 12, y as i32 - 12);
            let dist = dx * dx + dy * dy;
            let ring = (36..=121).contains(&dist);

            sprite.pixels_mut()[(y * 24 + x) as usize] = if ring {
                [0x20, (x * 10) as u8, (y * 10) as u8, 0xff]
            } else {
                [0, 0, 0, 0x40]
            };
        }
    }
    sprite.modified();

    let mut plotter = Plotter::new(StencilBackend::new(SZ_W, SZ_H, [0xf0, 0xf0, 0xe0, 0xff])?);

    // A band with the placement anchored left of it, the pattern continues into it.
    plotter.clip(10, 20, 310, 120);
    plotter.bitmap(&sprite, -5, 30, 24, 24, 0, BitmapFlags::REPEAT_X | BitmapFlags::REPEAT_Y)?;

    // A magnified copy below it.
    plotter.clip(0, 0, SZ_W as i32, SZ_H as i32);
    plotter.bitmap(&sprite, 120, 125, 72, 72, 0, BitmapFlags::empty())?;

    let backend = plotter.into_backend();
    let order = backend.order();
    let container: Vec<u8> = backend
        .window()
        .as_slice()
        .iter()
        .flat_map(|&word| order.unpack(word))
        .collect();

    if std::env::var_os("NSMOTIF_SKIP_IO").is_none() {
        let image = image::ImageBuffer::<image::Rgba<u8>, _>::from_raw(SZ_W, SZ_H, container)
            .ok_or("window size does not match its pixels")?;

        let output = concat!(env!("CARGO_MANIFEST_DIR"), "/../tile.png");
        image.save(output)?;
    }

    Ok(())
}
