//! Guest messaging handlers.

mod assembly;
mod respond_to_guest;

pub use assembly::{PipelinePorts, PipelineTuning};
pub use respond_to_guest::{
    PipelineComponents, PipelineOutcome, PipelineSettings, RespondToGuestCommand,
    RespondToGuestHandler,
};
