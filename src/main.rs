use hallway_gallery::{GalleryConfig, flow};

fn main() -> anyhow::Result<()> {
    flow::run(GalleryConfig::default())
}
