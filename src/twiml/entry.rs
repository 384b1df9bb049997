use std::fmt;

/// The webhook endpoints of the callback flow.
///
/// Every state is reachable only through the URI embedded in a previous
/// response, so the path of each variant is part of the wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    Incoming,
    DialOutcome,
    MenuChoice,
    CapturePhoneNumber,
    FinishCall,
    CaptureTranscript,
}

impl EntryPoint {
    pub const ALL: [EntryPoint; 6] = [
        EntryPoint::Incoming,
        EntryPoint::DialOutcome,
        EntryPoint::MenuChoice,
        EntryPoint::CapturePhoneNumber,
        EntryPoint::FinishCall,
        EntryPoint::CaptureTranscript,
    ];

    /// Relative callback URI the provider posts to.
    pub fn path(self) -> &'static str {
        match self {
            EntryPoint::Incoming => "/voice/incoming",
            EntryPoint::DialOutcome => "/voice/dial-outcome",
            EntryPoint::MenuChoice => "/voice/menu-choice",
            EntryPoint::CapturePhoneNumber => "/voice/capture-phone-number",
            EntryPoint::FinishCall => "/voice/finish-call",
            EntryPoint::CaptureTranscript => "/voice/capture-transcript",
        }
    }

    /// Whether the provider expects a TwiML document back.
    /// The transcription callback is out-of-band and gets no body.
    pub fn is_caller_facing(self) -> bool {
        !matches!(self, EntryPoint::CaptureTranscript)
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryPoint::Incoming => write!(f, "INCOMING"),
            EntryPoint::DialOutcome => write!(f, "DIAL_OUTCOME"),
            EntryPoint::MenuChoice => write!(f, "MENU_CHOICE"),
            EntryPoint::CapturePhoneNumber => write!(f, "CAPTURE_PHONE_NUMBER"),
            EntryPoint::FinishCall => write!(f, "FINISH_CALL"),
            EntryPoint::CaptureTranscript => write!(f, "CAPTURE_TRANSCRIPT"),
        }
    }
}
