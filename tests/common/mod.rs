//! Shared test utilities
//!
//! Fake speech adapters that replay scripted outcomes and record what the
//! loop asked of them.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use voice_translator::speech::{
    CancellationDetails, CancellationErrorCode, CancellationReason, RecognitionOutcome,
    Recognizer, SynthesisOutcome, Synthesizer, SynthesizerFactory,
};
use voice_translator::{Error, Result};

/// Recognized text with a single German translation
#[must_use]
pub fn translated(text: &str, translation: &str) -> RecognitionOutcome {
    RecognitionOutcome::translated(text, vec![("de".to_string(), translation.to_string())])
}

/// Error cancellation with the given code
#[must_use]
pub fn error_details(code: CancellationErrorCode, details: &str) -> CancellationDetails {
    CancellationDetails {
        reason: CancellationReason::Error,
        error_code: code,
        error_details: details.to_string(),
    }
}

/// Recognizer replaying a fixed list of outcomes
pub struct ScriptedRecognizer {
    outcomes: VecDeque<RecognitionOutcome>,
    calls: Rc<RefCell<usize>>,
}

impl ScriptedRecognizer {
    pub fn new(outcomes: Vec<RecognitionOutcome>) -> Self {
        Self {
            outcomes: outcomes.into(),
            calls: Rc::new(RefCell::new(0)),
        }
    }

    /// Shared handle to the number of `recognize_once` calls
    pub fn calls(&self) -> Rc<RefCell<usize>> {
        Rc::clone(&self.calls)
    }
}

#[async_trait(?Send)]
impl Recognizer for ScriptedRecognizer {
    async fn recognize_once(&mut self) -> RecognitionOutcome {
        *self.calls.borrow_mut() += 1;
        self.outcomes
            .pop_front()
            .expect("recognizer script exhausted before exit phrase")
    }
}

/// What the fake synthesizer sessions saw
#[derive(Debug, Default)]
pub struct SessionLog {
    pub opened: usize,
    pub released: usize,
    pub max_open: usize,
    pub spoken: Vec<String>,
}

impl SessionLog {
    pub const fn open_now(&self) -> usize {
        self.opened - self.released
    }
}

/// Factory handing out recording sessions
pub struct RecordingFactory {
    log: Rc<RefCell<SessionLog>>,
    outcome: SynthesisOutcome,
    fail_open: bool,
    hang: bool,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::with_outcome(SynthesisOutcome::completed())
    }

    pub fn with_outcome(outcome: SynthesisOutcome) -> Self {
        Self {
            log: Rc::new(RefCell::new(SessionLog::default())),
            outcome,
            fail_open: false,
            hang: false,
        }
    }

    /// Factory whose sessions can never be opened
    pub fn failing() -> Self {
        Self {
            fail_open: true,
            ..Self::new()
        }
    }

    /// Factory whose sessions never finish speaking
    pub fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::new()
        }
    }

    pub fn log(&self) -> Rc<RefCell<SessionLog>> {
        Rc::clone(&self.log)
    }
}

impl SynthesizerFactory for RecordingFactory {
    type Session = RecordingSession;

    fn open(&self) -> Result<Self::Session> {
        if self.fail_open {
            return Err(Error::Audio("no output device available".to_string()));
        }

        let mut log = self.log.borrow_mut();
        log.opened += 1;
        log.max_open = log.max_open.max(log.open_now());
        drop(log);

        Ok(RecordingSession {
            log: Rc::clone(&self.log),
            outcome: self.outcome.clone(),
            hang: self.hang,
        })
    }
}

/// Session recording spoken text and its own release
pub struct RecordingSession {
    log: Rc<RefCell<SessionLog>>,
    outcome: SynthesisOutcome,
    hang: bool,
}

#[async_trait(?Send)]
impl Synthesizer for RecordingSession {
    async fn speak(&mut self, text: &str) -> SynthesisOutcome {
        self.log.borrow_mut().spoken.push(text.to_string());
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.outcome.clone()
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        self.log.borrow_mut().released += 1;
    }
}
