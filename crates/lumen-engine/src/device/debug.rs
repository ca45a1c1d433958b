//! Named GPU event sections and markers for capture tools.

use std::ops::{Deref, DerefMut};

/// Something GPU work can be annotated on.
pub trait EventAnnotation {
    /// Whether annotations are currently being recorded.
    fn is_capturing(&self) -> bool;

    fn begin_event(&mut self, name: &str);

    fn end_event(&mut self);

    fn set_marker(&mut self, name: &str);
}

impl EventAnnotation for wgpu::CommandEncoder {
    fn is_capturing(&self) -> bool {
        true
    }

    fn begin_event(&mut self, name: &str) {
        self.push_debug_group(name);
    }

    fn end_event(&mut self) {
        self.pop_debug_group();
    }

    fn set_marker(&mut self, name: &str) {
        self.insert_debug_marker(name);
    }
}

/// Brackets work between a begin and an end event.
///
/// The end event is emitted on drop. Dereferences to the annotated target so work
/// can be recorded inside the section.
pub struct EventSection<'a, A: EventAnnotation + ?Sized> {
    target: &'a mut A,
    open: bool,
}

impl<'a, A: EventAnnotation + ?Sized> EventSection<'a, A> {
    pub fn begin(target: &'a mut A, name: &str) -> Self {
        Self::begin_if(true, target, name)
    }

    /// Opens the section only when `enabled` and the target is capturing.
    pub fn begin_if(enabled: bool, target: &'a mut A, name: &str) -> Self {
        let open = enabled && target.is_capturing();
        if open {
            target.begin_event(name);
        }
        Self { target, open }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}

impl<A: EventAnnotation + ?Sized> Deref for EventSection<'_, A> {
    type Target = A;

    fn deref(&self) -> &A {
        self.target
    }
}

impl<A: EventAnnotation + ?Sized> DerefMut for EventSection<'_, A> {
    fn deref_mut(&mut self) -> &mut A {
        self.target
    }
}

impl<A: EventAnnotation + ?Sized> Drop for EventSection<'_, A> {
    fn drop(&mut self) {
        if self.open {
            self.target.end_event();
        }
    }
}

/// Emits a single instantaneous marker.
pub fn marker<A: EventAnnotation + ?Sized>(target: &mut A, name: &str) {
    if target.is_capturing() {
        target.set_marker(name);
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Annotation {
    Begin(String),
    End,
    Marker(String),
}

/// In-memory annotation target; records what a capture tool would see.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    pub capturing: bool,
    pub annotations: Vec<Annotation>,
}

impl EventRecorder {
    pub fn capturing() -> Self {
        Self {
            capturing: true,
            annotations: Vec::new(),
        }
    }
}

impl EventAnnotation for EventRecorder {
    fn is_capturing(&self) -> bool {
        self.capturing
    }

    fn begin_event(&mut self, name: &str) {
        self.annotations.push(Annotation::Begin(name.to_string()));
    }

    fn end_event(&mut self) {
        self.annotations.push(Annotation::End);
    }

    fn set_marker(&mut self, name: &str) {
        self.annotations.push(Annotation::Marker(name.to_string()));
    }
}
