//! Saída de terminal do ringback — TwiML colorida para `demo` e `render`.
//!
//! Usa a crate `console` para estilização com cores.

use console::Style;

use crate::twiml::{EntryPoint, VoiceResponse};

/// Imprime cada passo do fluxo de chamada no terminal.
pub struct StepPrinter {
    // Estilo ciano para o nome do entry point.
    cyan: Style,
    // Estilo cinza para o documento TwiML.
    dim: Style,
    // Estilo verde para o próximo alvo.
    green: Style,
    // Estilo amarelo para o alvo de fallthrough.
    yellow: Style,
}

impl Default for StepPrinter {
    fn default() -> Self {
        Self {
            cyan: Style::new().cyan().bold(),
            dim: Style::new().dim(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
        }
    }
}

impl StepPrinter {
    /// Exibe o entry point chamado, o que o caller enviou e o TwiML retornado.
    pub fn step(&self, entry: EntryPoint, input: &str, response: &VoiceResponse, xml: &str) {
        if input.is_empty() {
            println!("{} {}", self.cyan.apply_to("▶"), self.cyan.apply_to(entry));
        } else {
            println!(
                "{} {} ({input})",
                self.cyan.apply_to("▶"),
                self.cyan.apply_to(entry)
            );
        }
        if !entry.is_caller_facing() {
            println!("  {}", self.dim.apply_to("(no content)"));
        } else if response.is_empty() {
            println!("  {} {}", self.dim.apply_to(xml), self.yellow.apply_to("(call ends)"));
        } else {
            println!("  {}", self.dim.apply_to(xml));
        }
        if let Some(next) = response.next_primary() {
            println!("  {} {}", self.green.apply_to("→"), next.path());
        }
        if let Some(fallthrough) = response.next_fallthrough() {
            println!("  {} {}", self.yellow.apply_to("↻"), fallthrough.path());
        }
        if response.ends_call() {
            println!("  {} hang up", self.green.apply_to("✓"));
        }
    }
}
