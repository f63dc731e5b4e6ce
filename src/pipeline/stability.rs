use std::collections::VecDeque;

/// Recent top decodes, used to hold back flickering reads.
///
/// A string is stable once it has been the top decode of each of the last
/// `window` frames; frames without a decode count as misses.
#[derive(Debug, Clone)]
pub struct StabilityState {
    window: usize,
    history: VecDeque<Option<String>>,
    last_emitted: Option<String>,
}

impl StabilityState {
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            window,
            history: VecDeque::with_capacity(window),
            last_emitted: None,
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Record one frame's top decode; true when `top` is now stable
    pub fn record(&mut self, top: Option<&str>) -> bool {
        if self.history.len() == self.window {
            self.history.pop_front();
        }
        self.history.push_back(top.map(str::to_owned));

        let Some(text) = top else {
            return false;
        };
        self.history.len() == self.window
            && self.history.iter().all(|entry| entry.as_deref() == Some(text))
    }

    /// True the first time a stable string should reach the callback.
    ///
    /// The same string does not fire again until another string has been
    /// emitted or the state is reset.
    pub fn should_emit(&mut self, text: &str) -> bool {
        if self.last_emitted.as_deref() == Some(text) {
            return false;
        }
        self.last_emitted = Some(text.to_owned());
        true
    }

    /// Number of frames currently remembered
    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.last_emitted = None;
    }
}
