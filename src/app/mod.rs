// Application layer - Use case interactors

pub mod analyze_interactor;
pub mod container;
pub mod preview_interactor;

// Re-export interactors
pub use analyze_interactor::AnalyzeInteractor;
pub use container::{AppContainer, DefaultAppContainer};
pub use preview_interactor::{select_clip, PreviewInteractor, PreviewReport, PreviewRequest};
