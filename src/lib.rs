// Watermarker Library
//
// Overlays a text or image watermark onto raster images. The engine lives in
// `watermark`; `plugin` adapts it to a build pipeline's schema and record
// registries; `config` and `logging` carry the ambient setup for the CLI.

pub mod config;
pub mod logging;
pub mod plugin;
pub mod watermark;
