pub mod batch_ctx;
pub mod generation_flow;

pub use batch_ctx::BatchCtx;
pub use generation_flow::GenerationFlow;
