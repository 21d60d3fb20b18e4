//! Print the glow palette extracted from icon files
//!
//! Usage: cargo run --example palette -- <icon.png>...

use ferrous_indicator::{BacklightConfig, BacklightStyle, FileIconLoader, IconBitmapLoader, Palette};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("usage: palette <icon.png>...");
        std::process::exit(2);
    }

    let config = BacklightConfig::default();
    let loader = paths.iter().fold(FileIconLoader::new(), |loader, path| {
        loader.with_file(path.as_str(), path.as_str())
    });

    for path in &paths {
        let bitmap = loader.load_icon(path, config.dominant_color_icon_size)?;
        println!("{} ({}x{})", path, bitmap.width(), bitmap.height());

        match Palette::from_bitmap(&bitmap, config.dominant_color_icon_size) {
            Ok(palette) => {
                println!("   lighter:  {}", palette.lighter);
                println!("   original: {}", palette.original);
                println!("   darker:   {}", palette.darker);
                println!("   style:    {}", BacklightStyle::from_palette(&palette));
            }
            Err(e) => {
                println!("   no dominant color ({e})");
                println!("   style:    {}", BacklightStyle::fallback());
            }
        }
    }

    Ok(())
}
