mod entry;
mod instruction;
mod render;

pub use entry::EntryPoint;
pub use instruction::VoiceResponse;
pub use render::{RenderError, render};

#[cfg(test)]
pub(crate) use instruction::Instruction;
