pub mod mermaid;

// Re-export key types for easier usage
pub use mermaid::{
    Charset, DiagramError, DiagramOptions, DiagramRenderer, FencedBlock, ParseRenderModeError,
    RenderMode, render_mermaid_blocks,
};
