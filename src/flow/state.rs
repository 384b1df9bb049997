use serde::Deserialize;

use crate::twiml::{EntryPoint, VoiceResponse};

/// Dial outcomes that mean nobody picked up.
pub const BAD_DIAL_STATUSES: [&str; 4] = ["busy", "no-answer", "canceled", "failed"];

/// Exact length a captured phone number must have.
pub const PHONE_NUMBER_DIGITS: usize = 10;

/// Seconds of silence that end the voicemail recording.
pub const RECORDING_TIMEOUT_SECS: u32 = 5;

/// Dial target nobody answers, so every call lands on the callback offer.
pub const DEFAULT_DIAL_CLIENT: &str = "NON-EXISTANT-CLIENT";

const UNAVAILABLE_PROMPT: &str = "The person you are trying to reach is unavailable. If you would like to receive a callback, press 1. If not, press 2 or hang up.";
const MENU_PROMPT: &str = "If you would like to receive a callback, press 1. If not, press 2 or hang up.";
const INVALID_CHOICE: &str = "Sorry, I don't understand that choice.";
const PHONE_PROMPT: &str = "Please enter your 10 digit phone number";
const VOICEMAIL_PROMPT: &str = "Please let us know what you are calling about by leaving a message after the beep.";
const CALLBACK_REQUESTED: &str = "Your callback has been requested. Goodbye.";
const GOODBYE: &str = "Goodbye!";

/// Form fields the provider posts to every webhook. Which ones are
/// populated depends on the entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CallbackForm {
    #[serde(rename = "CallSid", default)]
    pub call_sid: String,
    #[serde(rename = "DialCallStatus", default)]
    pub dial_call_status: String,
    #[serde(rename = "Digits", default)]
    pub digits: String,
    #[serde(rename = "TranscriptionText", default)]
    pub transcription_text: String,
}

/// A write the engine asks the callback store to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEffect {
    CreateCallback {
        call_sid: String,
        phone_number: String,
    },
    AddTranscript {
        call_sid: String,
        transcript: String,
    },
}

/// The result of handling one webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub response: VoiceResponse,
    pub effect: Option<StoreEffect>,
}

impl Step {
    fn respond(response: VoiceResponse) -> Self {
        Self {
            response,
            effect: None,
        }
    }

    #[cfg(test)]
    pub fn next_primary(&self) -> Option<EntryPoint> {
        self.response.next_primary()
    }

    #[cfg(test)]
    pub fn next_fallthrough(&self) -> Option<EntryPoint> {
        self.response.next_fallthrough()
    }
}

/// The missed-call state machine. Every transition is a pure function of
/// the entry point hit and the fields posted to it; continuation lives in
/// the URIs of the returned instructions.
#[derive(Debug, Clone)]
pub struct CallFlow {
    dial_client: String,
}

impl Default for CallFlow {
    fn default() -> Self {
        Self::new(DEFAULT_DIAL_CLIENT)
    }
}

impl CallFlow {
    pub fn new(dial_client: impl Into<String>) -> Self {
        Self {
            dial_client: dial_client.into(),
        }
    }

    /// Compute the response (and store write, if any) for a webhook.
    ///
    /// - `Incoming` dials the agent and reports to `DialOutcome`.
    /// - `DialOutcome` offers the callback menu only for a bad dial status.
    /// - `MenuChoice` loops until the caller presses 1 or 2.
    /// - `CapturePhoneNumber` needs exactly ten digits; anything else goes
    ///   back through `MenuChoice`.
    /// - `FinishCall` and `CaptureTranscript` close the flow.
    pub fn step(&self, entry: EntryPoint, form: &CallbackForm) -> Step {
        match entry {
            EntryPoint::Incoming => self.incoming(),
            EntryPoint::DialOutcome => Self::dial_outcome(&form.dial_call_status),
            EntryPoint::MenuChoice => Self::menu_choice(&form.digits),
            EntryPoint::CapturePhoneNumber => Self::capture_phone_number(form),
            EntryPoint::FinishCall => Self::finish_call(),
            EntryPoint::CaptureTranscript => Self::capture_transcript(form),
        }
    }

    fn incoming(&self) -> Step {
        Step::respond(VoiceResponse::new().dial(EntryPoint::DialOutcome, self.dial_client.as_str()))
    }

    fn dial_outcome(status: &str) -> Step {
        if !is_bad_dial_status(status) {
            return Step::respond(VoiceResponse::new());
        }
        Step::respond(
            VoiceResponse::new()
                .gather(1, EntryPoint::MenuChoice, UNAVAILABLE_PROMPT)
                .redirect(EntryPoint::MenuChoice),
        )
    }

    fn menu_choice(digits: &str) -> Step {
        let response = match digits {
            "1" => VoiceResponse::new()
                .gather(PHONE_NUMBER_DIGITS as u32, EntryPoint::CapturePhoneNumber, PHONE_PROMPT)
                .redirect(EntryPoint::MenuChoice),
            "2" => VoiceResponse::new().say(GOODBYE).hangup(),
            _ => VoiceResponse::new()
                .say(INVALID_CHOICE)
                .pause()
                .gather(1, EntryPoint::MenuChoice, MENU_PROMPT)
                .redirect(EntryPoint::MenuChoice),
        };
        Step::respond(response)
    }

    fn capture_phone_number(form: &CallbackForm) -> Step {
        let count = form.digits.chars().count();
        if count != PHONE_NUMBER_DIGITS {
            // Malformed numbers restart from the menu, not from capture.
            return Step::respond(
                VoiceResponse::new()
                    .say(format!("You entered {count} digits."))
                    .pause()
                    .gather(PHONE_NUMBER_DIGITS as u32, EntryPoint::MenuChoice, PHONE_PROMPT)
                    .redirect(EntryPoint::MenuChoice),
            );
        }

        // The goodbye is queued right behind the recording, not after the
        // transcript arrives.
        Step {
            response: VoiceResponse::new()
                .say(VOICEMAIL_PROMPT)
                .pause()
                .record(
                    EntryPoint::FinishCall,
                    RECORDING_TIMEOUT_SECS,
                    EntryPoint::CaptureTranscript,
                )
                .say(CALLBACK_REQUESTED)
                .hangup(),
            effect: Some(StoreEffect::CreateCallback {
                call_sid: form.call_sid.clone(),
                phone_number: form.digits.clone(),
            }),
        }
    }

    fn finish_call() -> Step {
        Step::respond(VoiceResponse::new().say(CALLBACK_REQUESTED).hangup())
    }

    fn capture_transcript(form: &CallbackForm) -> Step {
        Step {
            response: VoiceResponse::new(),
            effect: Some(StoreEffect::AddTranscript {
                call_sid: form.call_sid.clone(),
                transcript: form.transcription_text.clone(),
            }),
        }
    }
}

/// Set membership, so unknown statuses count as a normal end of call.
pub fn is_bad_dial_status(status: &str) -> bool {
    BAD_DIAL_STATUSES.contains(&status)
}
