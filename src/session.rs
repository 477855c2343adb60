//! Listen → translate → speak loop

use std::io::Write;

use crate::console::{report_recognition, report_synthesis, write_prompt};
use crate::speech::{
    CancellationDetails, Recognizer, SynthesisOutcome, Synthesizer, SynthesizerFactory,
};
use crate::Result;

/// Recognized text that ends the loop
pub const EXIT_PHRASE: &str = "Exit.";

/// Phase of a loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for an utterance to be recognized and translated
    Listening,
    /// Speaking the translation
    Speaking,
    /// Exit phrase was heard
    Finished,
}

/// What a finished loop did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSummary {
    /// Completed listen/speak cycles, including the exit cycle
    pub iterations: usize,
}

/// Drives recognition and synthesis until the exit phrase is recognized
pub struct TranslationLoop<R, F, W> {
    recognizer: R,
    synthesizers: F,
    out: W,
    state: LoopState,
}

impl<R, F, W> TranslationLoop<R, F, W>
where
    R: Recognizer,
    F: SynthesizerFactory,
    W: Write,
{
    /// Wire a recognizer and synthesizer factory to an output stream
    #[must_use]
    pub const fn new(recognizer: R, synthesizers: F, out: W) -> Self {
        Self {
            recognizer,
            synthesizers,
            out,
            state: LoopState::Listening,
        }
    }

    /// Current phase
    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// Run until the raw recognized text equals [`EXIT_PHRASE`]
    ///
    /// The exit cycle still speaks its translation.
    ///
    /// # Errors
    ///
    /// Returns error if writing to the console fails
    #[allow(clippy::future_not_send)]
    pub async fn run(&mut self) -> Result<LoopSummary> {
        let mut iterations = 0;

        while self.state != LoopState::Finished {
            iterations += 1;
            let exit = self.step(iterations).await?;
            self.state = if exit {
                LoopState::Finished
            } else {
                LoopState::Listening
            };
        }

        tracing::info!(iterations, "exit phrase recognized");
        Ok(LoopSummary { iterations })
    }

    /// One listen/speak cycle; returns whether the exit phrase was heard
    #[allow(clippy::future_not_send)]
    async fn step(&mut self, iteration: usize) -> Result<bool> {
        self.state = LoopState::Listening;
        write_prompt(&mut self.out)?;

        let outcome = self.recognizer.recognize_once().await;
        tracing::debug!(iteration, reason = ?outcome.reason, "recognition finished");

        let text = report_recognition(&mut self.out, &outcome)?;
        let exit = outcome.text == EXIT_PHRASE;

        self.state = LoopState::Speaking;
        let spoken = match self.synthesizers.open() {
            Ok(mut session) => session.speak(&text).await,
            Err(e) => {
                tracing::warn!(error = %e, "failed to open synthesis session");
                SynthesisOutcome::canceled(CancellationDetails::from_error(&e))
            }
        };
        report_synthesis(&mut self.out, &spoken, &text)?;
        self.out.flush()?;

        Ok(exit)
    }

    /// Give back the output stream
    #[must_use]
    pub fn into_output(self) -> W {
        self.out
    }
}
