use super::entry::EntryPoint;

/// One call-control directive returned to the telephony provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Speak text to the caller.
    Say(String),
    /// Silence for `length_secs` seconds.
    Pause { length_secs: u32 },
    /// Collect up to `num_digits` key presses while speaking `prompt`,
    /// then post them to `action`.
    Gather {
        num_digits: u32,
        action: EntryPoint,
        prompt: String,
    },
    /// Record a voice message. The provider posts to `action` when the
    /// recording ends and to `transcribe_callback` once the text is ready.
    Record {
        action: EntryPoint,
        timeout_secs: u32,
        transcribe: bool,
        transcribe_callback: EntryPoint,
    },
    /// Continue the call at another entry point.
    Redirect(EntryPoint),
    Hangup,
    /// Ring a client endpoint, reporting the result to `action`.
    Dial { action: EntryPoint, client: String },
}

impl Instruction {
    /// The entry point this instruction posts to once the caller acts,
    /// if any. Redirects are fallthroughs and are not counted here.
    pub fn primary_target(&self) -> Option<EntryPoint> {
        match self {
            Instruction::Gather { action, .. }
            | Instruction::Record { action, .. }
            | Instruction::Dial { action, .. } => Some(*action),
            _ => None,
        }
    }
}

/// An ordered instruction sequence. Building one never fails and never
/// touches I/O; the chainable methods only append.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoiceResponse {
    instructions: Vec<Instruction>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(mut self, text: impl Into<String>) -> Self {
        self.instructions.push(Instruction::Say(text.into()));
        self
    }

    /// One-second pause, the provider's default length.
    pub fn pause(mut self) -> Self {
        self.instructions.push(Instruction::Pause { length_secs: 1 });
        self
    }

    pub fn gather(mut self, num_digits: u32, action: EntryPoint, prompt: impl Into<String>) -> Self {
        self.instructions.push(Instruction::Gather {
            num_digits,
            action,
            prompt: prompt.into(),
        });
        self
    }

    pub fn record(mut self, action: EntryPoint, timeout_secs: u32, transcribe_callback: EntryPoint) -> Self {
        self.instructions.push(Instruction::Record {
            action,
            timeout_secs,
            transcribe: true,
            transcribe_callback,
        });
        self
    }

    pub fn redirect(mut self, target: EntryPoint) -> Self {
        self.instructions.push(Instruction::Redirect(target));
        self
    }

    pub fn hangup(mut self) -> Self {
        self.instructions.push(Instruction::Hangup);
        self
    }

    pub fn dial(mut self, action: EntryPoint, client: impl Into<String>) -> Self {
        self.instructions.push(Instruction::Dial {
            action,
            client: client.into(),
        });
        self
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Target reached when the caller supplies input (or the recording or
    /// dial attempt ends).
    pub fn next_primary(&self) -> Option<EntryPoint> {
        self.instructions.iter().find_map(Instruction::primary_target)
    }

    /// Target reached when a gather times out without input.
    pub fn next_fallthrough(&self) -> Option<EntryPoint> {
        self.instructions.iter().rev().find_map(|i| match i {
            Instruction::Redirect(target) => Some(*target),
            _ => None,
        })
    }

    pub fn ends_call(&self) -> bool {
        matches!(self.instructions.last(), Some(Instruction::Hangup))
    }
}
