//! TwiML serialization for [`VoiceResponse`].

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use thiserror::Error;

use super::instruction::{Instruction, VoiceResponse};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write TwiML: {0}")]
    Xml(String),

    #[error("rendered TwiML is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Render a response as a TwiML document.
pub fn render(response: &VoiceResponse) -> Result<String, RenderError> {
    let mut writer = Writer::new(Vec::new());
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    emit(&mut writer, Event::Start(BytesStart::new("Response")))?;
    for instruction in response.instructions() {
        write_instruction(&mut writer, instruction)?;
    }
    emit(&mut writer, Event::End(BytesEnd::new("Response")))?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_instruction(
    writer: &mut Writer<Vec<u8>>,
    instruction: &Instruction,
) -> Result<(), RenderError> {
    match instruction {
        Instruction::Say(text) => write_say(writer, text),
        Instruction::Pause { length_secs } => {
            let length = length_secs.to_string();
            emit(
                writer,
                Event::Empty(BytesStart::new("Pause").with_attributes([("length", length.as_str())])),
            )
        }
        Instruction::Gather {
            num_digits,
            action,
            prompt,
        } => {
            let digits = num_digits.to_string();
            emit(
                writer,
                Event::Start(BytesStart::new("Gather").with_attributes([
                    ("numDigits", digits.as_str()),
                    ("action", action.path()),
                ])),
            )?;
            write_say(writer, prompt)?;
            emit(writer, Event::End(BytesEnd::new("Gather")))
        }
        Instruction::Record {
            action,
            timeout_secs,
            transcribe,
            transcribe_callback,
        } => {
            let timeout = timeout_secs.to_string();
            emit(
                writer,
                Event::Empty(BytesStart::new("Record").with_attributes([
                    ("action", action.path()),
                    ("timeout", timeout.as_str()),
                    ("transcribe", if *transcribe { "true" } else { "false" }),
                    ("transcribeCallback", transcribe_callback.path()),
                ])),
            )
        }
        Instruction::Redirect(target) => {
            emit(writer, Event::Start(BytesStart::new("Redirect")))?;
            emit(writer, Event::Text(BytesText::new(target.path())))?;
            emit(writer, Event::End(BytesEnd::new("Redirect")))
        }
        Instruction::Hangup => emit(writer, Event::Empty(BytesStart::new("Hangup"))),
        Instruction::Dial { action, client } => {
            emit(
                writer,
                Event::Start(BytesStart::new("Dial").with_attributes([("action", action.path())])),
            )?;
            emit(writer, Event::Start(BytesStart::new("Client")))?;
            emit(writer, Event::Text(BytesText::new(client)))?;
            emit(writer, Event::End(BytesEnd::new("Client")))?;
            emit(writer, Event::End(BytesEnd::new("Dial")))
        }
    }
}

fn write_say(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<(), RenderError> {
    emit(writer, Event::Start(BytesStart::new("Say")))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new("Say")))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), RenderError> {
    writer
        .write_event(event)
        .map_err(|e| RenderError::Xml(e.to_string()))
}
