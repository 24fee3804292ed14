// Adapters layer: concrete implementations for external processes.
// Storage backends live next to their configuration under src/config.

pub mod ffmpeg;
