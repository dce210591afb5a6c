//! Read-aloud support.
//!
//! At most one utterance is active at a time: starting a new one cancels the
//! one in flight. The "currently reading" highlight is cleared when an
//! utterance completes, but only if that utterance is still the latest one.
//! A completion arriving late from a cancelled utterance is ignored.

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// Completion callback for one utterance.
pub type OnEnd = Box<dyn FnOnce() + Send + 'static>;

/// Platform speech synthesis.
pub trait SpeechEngine {
    /// Start speaking `text`. `on_end` runs when the utterance finishes or is cancelled.
    fn speak(&mut self, text: &str, on_end: OnEnd);

    /// Stop whatever is being spoken.
    fn cancel(&mut self);
}

#[derive(Debug, Default)]
struct ReadingState {
    reading_id: Option<String>,
    generation: u64,
}

/// Drives a [`SpeechEngine`] and tracks which sentence is being read.
pub struct Narrator<E: SpeechEngine> {
    engine: E,
    state: Arc<Mutex<ReadingState>>,
}

impl<E: SpeechEngine> Narrator<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            state: Arc::new(Mutex::new(ReadingState::default())),
        }
    }

    /// Id of the sentence currently highlighted as being read.
    pub fn reading_id(&self) -> Option<String> {
        self.state.lock().reading_id.clone()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Read one sentence and highlight it until the utterance ends.
    pub fn read_sentence(&mut self, sentence_id: &str, text: &str) {
        self.speak(text, Some(sentence_id.to_string()));
    }

    /// Read arbitrary text (the whole composition) without a highlight.
    pub fn read_text(&mut self, text: &str) {
        self.speak(text, None);
    }

    /// Stop reading and clear the highlight.
    pub fn stop(&mut self) {
        {
            let mut state = self.state.lock();
            state.generation += 1;
            state.reading_id = None;
        }
        self.engine.cancel();
    }

    fn speak(&mut self, text: &str, reading_id: Option<String>) {
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.reading_id = reading_id;
            state.generation
        };
        // The engine may fire the cancelled utterance's callback synchronously,
        // so the lock must not be held here.
        self.engine.cancel();

        let state = Arc::clone(&self.state);
        self.engine.speak(
            text,
            Box::new(move || {
                let mut state = state.lock();
                if state.generation == generation {
                    state.reading_id = None;
                } else {
                    debug!(generation, current = state.generation, "Ignoring stale utterance end");
                }
            }),
        );
        debug!(generation, chars = text.len(), "Utterance started");
    }
}

impl<E: SpeechEngine> Drop for Narrator<E> {
    fn drop(&mut self) {
        self.engine.cancel();
    }
}

/// Engine that speaks nothing and completes immediately.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentEngine;

impl SpeechEngine for SilentEngine {
    fn speak(&mut self, _text: &str, on_end: OnEnd) {
        on_end();
    }

    fn cancel(&mut self) {}
}
