use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::coords::ClientSize;
use crate::input::KeyStateQuery;

use super::message::{KeySet, MessageSource, RawMessage};

/// One scripted step.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Step {
    /// Delivered as a message.
    Message(RawMessage),
    /// `peek` reports an empty queue once; `wait` skips it.
    Idle,
    /// Live key state changes; not delivered.
    Hold(u8),
    Release(u8),
}

#[derive(Debug, Default)]
struct Script {
    steps: VecDeque<Step>,
    held: KeySet,
    delivered: usize,
}

impl Script {
    /// Applies key-state steps and pops the next deliverable one.
    fn next(&mut self, skip_idle: bool) -> Option<Step> {
        while let Some(step) = self.steps.pop_front() {
            match step {
                Step::Hold(code) => self.held.insert(code),
                Step::Release(code) => self.held.remove(code),
                Step::Idle if skip_idle => {}
                other => return Some(other),
            }
        }
        None
    }
}

/// Cloneable handle for appending steps while a loop is running (e.g. from an
/// idle callback).
#[derive(Debug, Clone)]
pub struct ScriptHandle(Rc<RefCell<Script>>);

impl ScriptHandle {
    pub fn push(&self, step: Step) {
        self.0.borrow_mut().steps.push_back(step);
    }

    pub fn push_message(&self, msg: RawMessage) {
        self.push(Step::Message(msg));
    }

    pub fn quit(&self) {
        self.push_message(RawMessage::Quit);
    }

    pub fn pending(&self) -> usize {
        self.0.borrow().steps.len()
    }

    /// Scripted messages handed to the loop so far. The `Quit` returned once the
    /// script runs dry is not counted.
    pub fn delivered(&self) -> usize {
        self.0.borrow().delivered
    }
}

/// In-memory message source driven by a script.
///
/// Once the script is exhausted both `peek` and `wait` return `Quit`, so a loop
/// over a finite script always terminates.
#[derive(Debug)]
pub struct ScriptedSource {
    script: Rc<RefCell<Script>>,
    size: ClientSize,
    title: String,
}

impl ScriptedSource {
    pub fn new(title: &str, size: ClientSize) -> Self {
        Self {
            script: Rc::default(),
            size,
            title: title.to_string(),
        }
    }

    pub fn handle(&self) -> ScriptHandle {
        ScriptHandle(Rc::clone(&self.script))
    }

    pub fn message(self, msg: RawMessage) -> Self {
        self.handle().push_message(msg);
        self
    }

    pub fn idle(self) -> Self {
        self.handle().push(Step::Idle);
        self
    }

    pub fn idles(self, n: usize) -> Self {
        (0..n).fold(self, |s, _| s.idle())
    }

    pub fn hold(self, code: u8) -> Self {
        self.handle().push(Step::Hold(code));
        self
    }

    pub fn release(self, code: u8) -> Self {
        self.handle().push(Step::Release(code));
        self
    }

    fn take(&mut self, skip_idle: bool) -> Option<RawMessage> {
        let mut script = self.script.borrow_mut();
        match script.next(skip_idle) {
            Some(Step::Message(msg)) => {
                script.delivered += 1;
                Some(msg)
            }
            Some(_) => None,
            None => Some(RawMessage::Quit),
        }
    }
}

impl KeyStateQuery for ScriptedSource {
    fn is_key_down(&self, code: u8) -> bool {
        self.script.borrow().held.contains(code)
    }
}

impl MessageSource for ScriptedSource {
    fn peek(&mut self) -> Option<RawMessage> {
        self.take(false)
    }

    fn wait(&mut self) -> RawMessage {
        self.take(true).unwrap_or(RawMessage::Quit)
    }

    fn post_quit(&mut self) {
        self.handle().quit();
    }

    fn client_size(&self) -> ClientSize {
        self.size
    }

    fn title(&self) -> String {
        self.title.clone()
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }
}
