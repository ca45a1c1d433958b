use std::rc::{Rc, Weak};

use anyhow::Result;

use crate::coords::ClientSize;
use crate::input::{self, InputHandler, InputSymbol, KeyTransition, LateralModifiers};

use super::message::{Disposition, MessageSource, RawMessage};
use super::region::ClientRegion;

type IdleFn = Box<dyn FnMut() -> Result<()>>;
type ResizeFn = Box<dyn FnMut(ClientSize) -> Result<()>>;
type HookFn = Box<dyn FnMut(&RawMessage)>;

/// Optional callback slots. All are released when the message loop exits.
#[derive(Default)]
struct Callbacks {
    idle: Option<IdleFn>,
    resize: Option<ResizeFn>,
    hook: Option<HookFn>,
    input: Option<Box<dyn InputHandler>>,
}

impl Callbacks {
    fn any(&self) -> bool {
        self.idle.is_some() || self.resize.is_some() || self.hook.is_some() || self.input.is_some()
    }
}

/// A native window and the message loop that drives it.
///
/// Messages come from a [`MessageSource`]; each is offered to the raw-message hook
/// first, then translated into the resize / input callbacks. When no message is
/// pending and the window is active and rendering, the idle callback runs. The
/// application renders its frames there.
pub struct Window<S: MessageSource> {
    source: S,
    region: Rc<ClientRegion>,

    running: bool,
    active: bool,
    rendering: bool,

    lateral: LateralModifiers,
    callbacks: Callbacks,
}

impl<S: MessageSource> Window<S> {
    /// Wraps an already-open message source.
    ///
    /// The window starts inactive; the platform reports activation through
    /// [`RawMessage::Activate`].
    pub fn with_source(source: S) -> Self {
        let region = Rc::new(ClientRegion::new(source.client_size()));
        Self {
            source,
            region,
            running: false,
            active: false,
            rendering: false,
            lateral: LateralModifiers::default(),
            callbacks: Callbacks::default(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Client region size, not the outer window size.
    pub fn client_region_size(&self) -> ClientSize {
        self.region.size()
    }

    /// Non-owning handle to the client region, for presenters bound to this window.
    pub fn client_region(&self) -> Weak<ClientRegion> {
        Rc::downgrade(&self.region)
    }

    pub fn title(&self) -> String {
        self.source.title()
    }

    pub fn set_title(&mut self, title: &str) {
        self.source.set_title(title);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_rendering(&self) -> bool {
        self.rendering
    }

    pub fn set_rendering(&mut self, rendering: bool) {
        self.rendering = rendering;
    }

    /// Current Ctrl/Shift/Alt side flags.
    pub fn lateral_modifiers(&self) -> LateralModifiers {
        self.lateral
    }

    /// Called when no message is pending. An error ends the message loop.
    pub fn set_message_idle<F>(&mut self, idle: F)
    where
        F: FnMut() -> Result<()> + 'static,
    {
        self.callbacks.idle = Some(Box::new(idle));
    }

    /// Called with the new client size after the cached size is updated.
    pub fn set_resize_handler<F>(&mut self, on_resize: F)
    where
        F: FnMut(ClientSize) -> Result<()> + 'static,
    {
        self.callbacks.resize = Some(Box::new(on_resize));
    }

    /// Sees every message before it is translated. It observes only; dispatch
    /// continues regardless.
    pub fn set_raw_message_hook<F>(&mut self, hook: F)
    where
        F: FnMut(&RawMessage) + 'static,
    {
        self.callbacks.hook = Some(Box::new(hook));
    }

    pub fn set_input_handler<H>(&mut self, handler: H)
    where
        H: InputHandler + 'static,
    {
        self.callbacks.input = Some(Box::new(handler));
    }

    pub fn clear_message_idle(&mut self) {
        self.callbacks.idle = None;
    }

    pub fn clear_resize_handler(&mut self) {
        self.callbacks.resize = None;
    }

    pub fn clear_raw_message_hook(&mut self) {
        self.callbacks.hook = None;
    }

    pub fn clear_input_handler(&mut self) {
        self.callbacks.input = None;
    }

    /// True while any callback slot is occupied.
    pub fn has_callbacks(&self) -> bool {
        self.callbacks.any()
    }

    /// Runs the message loop until a quit signal arrives or a callback fails.
    ///
    /// While active and rendering the loop polls and renders on idle; otherwise it
    /// blocks for the next message. All callbacks are released on exit, on both the
    /// success and the error path.
    pub fn run(&mut self) -> Result<()> {
        self.running = true;
        self.rendering = true;
        log::info!("message loop started");

        let outcome = self.pump();

        self.running = false;
        self.callbacks = Callbacks::default();
        log::info!("message loop exited; callbacks released");

        outcome
    }

    fn pump(&mut self) -> Result<()> {
        while self.running {
            let msg = if self.active && self.rendering {
                self.source.peek()
            } else {
                Some(self.source.wait())
            };

            match msg {
                Some(RawMessage::Quit) => self.running = false,
                Some(msg) => {
                    self.dispatch(msg)?;
                }
                None => self.on_idle()?,
            }
        }
        Ok(())
    }

    fn on_idle(&mut self) -> Result<()> {
        match self.callbacks.idle.as_mut() {
            Some(idle) => idle(),
            None => Ok(()),
        }
    }

    /// Routes one message: raw hook first, then the semantic callbacks.
    pub fn dispatch(&mut self, msg: RawMessage) -> Result<Disposition> {
        if let Some(hook) = self.callbacks.hook.as_mut() {
            hook(&msg);
        }

        match msg {
            RawMessage::KeyDown(code) => self.on_key(code, KeyTransition::Down),
            RawMessage::KeyUp(code) => self.on_key(code, KeyTransition::Up),

            RawMessage::MouseDown { button, x, y } => {
                let y = self.flip_y(y);
                if let Some(h) = self.callbacks.input.as_mut() {
                    h.on_mouse_down(input::translate(button), x, y);
                }
            }

            RawMessage::MouseUp { button, x, y } => {
                let y = self.flip_y(y);
                if let Some(h) = self.callbacks.input.as_mut() {
                    h.on_mouse_up(input::translate(button), x, y);
                }
            }

            RawMessage::MouseWheel { x, y, delta } => {
                let y = self.flip_y(y);
                if let Some(h) = self.callbacks.input.as_mut() {
                    h.on_mouse_wheel(InputSymbol::MouseWheel, x, y, delta);
                }
            }

            RawMessage::MouseMove { x, y } => {
                let y = self.flip_y(y);
                if let Some(h) = self.callbacks.input.as_mut() {
                    h.on_mouse_move(InputSymbol::MouseMove, x, y);
                }
            }

            RawMessage::Activate(active) => {
                log::debug!("window {}", if active { "activated" } else { "deactivated" });
                self.active = active;
                if !active {
                    self.lateral.clear();
                }
            }

            // Releases that happen while unfocused never arrive.
            RawMessage::Focus(false) => self.lateral.clear(),
            RawMessage::Focus(true) => {}

            RawMessage::Size(size) => {
                self.region.set(size);
                if let Some(on_resize) = self.callbacks.resize.as_mut() {
                    on_resize(size)?;
                }
            }

            // The whole surface is repainted every frame.
            RawMessage::Paint | RawMessage::EraseBackground => return Ok(Disposition::Suppressed),

            RawMessage::Close => self.source.post_quit(),

            RawMessage::Quit => self.running = false,
        }

        Ok(Disposition::Default)
    }

    fn on_key(&mut self, code: u8, transition: KeyTransition) {
        let code = self.lateral.resolve(code, transition, &self.source);
        let key = input::translate(code);

        if let Some(h) = self.callbacks.input.as_mut() {
            match transition {
                KeyTransition::Down => h.on_key_down(key),
                KeyTransition::Up => h.on_key_up(key),
            }
        }
    }

    /// Top-left origin to bottom-left origin, against the current client height.
    #[inline]
    fn flip_y(&self, y: i32) -> i32 {
        self.region.size().height as i32 - y
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};

    use anyhow::anyhow;

    use super::*;
    use crate::input::{InputEvent, InputLog, vk};
    use crate::window::ScriptedSource;

    const SIZE: ClientSize = ClientSize::new(800, 600);

    fn window(source: ScriptedSource) -> (Window<ScriptedSource>, Rc<RefCell<InputLog>>) {
        let log = Rc::new(RefCell::new(InputLog::default()));
        let mut w = Window::with_source(source);
        w.set_input_handler(Rc::clone(&log));
        (w, log)
    }

    #[test]
    fn mouse_origin_is_bottom_left() {
        let (mut w, log) = window(ScriptedSource::new("t", SIZE));
        w.dispatch(RawMessage::MouseDown { button: vk::LBUTTON, x: 0, y: 0 }).unwrap();
        w.dispatch(RawMessage::MouseWheel { x: 10, y: 100, delta: -120 }).unwrap();

        assert_eq!(
            log.borrow().events,
            vec![
                InputEvent::MouseDown { button: InputSymbol::MouseLeft, x: 0, y: 600 },
                InputEvent::MouseWheel { x: 10, y: 500, delta: -120 },
            ]
        );
    }

    #[test]
    fn left_ctrl_round_trip_through_live_state() {
        let source = ScriptedSource::new("t", SIZE)
            .hold(vk::LCONTROL)
            .message(RawMessage::KeyDown(vk::CONTROL))
            .release(vk::LCONTROL)
            .message(RawMessage::KeyUp(vk::CONTROL));
        let (mut w, log) = window(source);

        w.run().unwrap();

        assert_eq!(
            log.borrow().events,
            vec![
                InputEvent::KeyDown(InputSymbol::LeftCtrl),
                InputEvent::KeyUp(InputSymbol::LeftCtrl),
            ]
        );
        assert!(!w.lateral_modifiers().any_held());
    }

    #[test]
    fn paint_and_erase_are_suppressed() {
        let (mut w, _) = window(ScriptedSource::new("t", SIZE));
        assert_eq!(w.dispatch(RawMessage::Paint).unwrap(), Disposition::Suppressed);
        assert_eq!(w.dispatch(RawMessage::EraseBackground).unwrap(), Disposition::Suppressed);
        assert_eq!(w.dispatch(RawMessage::MouseMove { x: 1, y: 1 }).unwrap(), Disposition::Default);
    }

    #[test]
    fn close_posts_quit() {
        let source = ScriptedSource::new("t", SIZE).message(RawMessage::KeyDown(b'A'));
        let handle = source.handle();
        let (mut w, _) = window(source);

        w.dispatch(RawMessage::Close).unwrap();
        assert_eq!(handle.pending(), 2);
        assert_eq!(w.source_mut().peek(), Some(RawMessage::KeyDown(b'A')));
        assert_eq!(w.source_mut().peek(), Some(RawMessage::Quit));
    }

    #[test]
    fn close_ends_run_through_posted_quit() {
        let source = ScriptedSource::new("t", SIZE)
            .message(RawMessage::Activate(true))
            .message(RawMessage::Close);
        let handle = source.handle();
        let (mut w, _) = window(source);
        let ticks = Rc::new(Cell::new(0));

        let t = Rc::clone(&ticks);
        w.set_message_idle(move || {
            t.set(t.get() + 1);
            Ok(())
        });

        w.run().unwrap();
        assert!(!w.is_running());
        assert_eq!(ticks.get(), 0);
        // Activate, Close and the Quit that Close posted.
        assert_eq!(handle.delivered(), 3);
        assert_eq!(handle.pending(), 0);
        assert!(!w.has_callbacks());
    }

    #[test]
    fn focus_loss_forgets_held_sides() {
        let source = ScriptedSource::new("t", SIZE).hold(vk::RCONTROL);
        let (mut w, log) = window(source);

        w.dispatch(RawMessage::KeyDown(vk::CONTROL)).unwrap();
        assert!(w.lateral_modifiers().any_held());
        w.dispatch(RawMessage::Focus(false)).unwrap();
        assert!(!w.lateral_modifiers().any_held());

        w.dispatch(RawMessage::KeyDown(vk::CONTROL)).unwrap();
        w.dispatch(RawMessage::Activate(false)).unwrap();
        assert!(!w.lateral_modifiers().any_held());

        assert_eq!(
            log.borrow().events,
            vec![InputEvent::KeyDown(InputSymbol::RightCtrl); 2]
        );
    }

    #[test]
    fn resize_updates_size_before_callback() {
        let (mut w, _) = window(ScriptedSource::new("t", SIZE));
        let region = w.client_region();
        let seen = Rc::new(Cell::new(None));

        let (s, r) = (Rc::clone(&seen), region.clone());
        w.set_resize_handler(move |size| {
            s.set(r.upgrade().map(|r| (size, r.size())));
            Ok(())
        });

        let new = ClientSize::new(640, 480);
        w.dispatch(RawMessage::Size(new)).unwrap();

        assert_eq!(seen.get(), Some((new, new)));
        assert_eq!(w.client_region_size(), new);
    }

    #[test]
    fn hook_sees_message_first() {
        let (mut w, _) = window(ScriptedSource::new("t", SIZE));
        let order = Rc::new(RefCell::new(Vec::new()));

        let o = Rc::clone(&order);
        w.set_raw_message_hook(move |m| o.borrow_mut().push(format!("hook {m:?}")));
        let o = Rc::clone(&order);
        w.set_resize_handler(move |_| {
            o.borrow_mut().push("resize".to_string());
            Ok(())
        });

        w.dispatch(RawMessage::Size(ClientSize::new(1, 1))).unwrap();
        assert_eq!(order.borrow().len(), 2);
        assert!(order.borrow()[0].starts_with("hook"));
        assert_eq!(order.borrow()[1], "resize");
    }

    #[test]
    fn idle_runs_only_while_active() {
        let source = ScriptedSource::new("t", SIZE)
            .idles(2)
            .message(RawMessage::Activate(true))
            .idles(3)
            .message(RawMessage::Activate(false))
            .idles(4);
        let (mut w, _) = window(source);
        let ticks = Rc::new(Cell::new(0));

        let t = Rc::clone(&ticks);
        w.set_message_idle(move || {
            t.set(t.get() + 1);
            Ok(())
        });

        w.run().unwrap();
        assert_eq!(ticks.get(), 3);
        assert!(!w.is_running());
    }

    #[test]
    fn callbacks_released_after_run() {
        let (mut w, _) = window(ScriptedSource::new("t", SIZE));
        w.set_message_idle(|| Ok(()));
        w.set_raw_message_hook(|_| {});
        assert!(w.has_callbacks());

        w.run().unwrap();
        assert!(!w.has_callbacks());
    }

    #[test]
    fn failing_idle_ends_loop_and_releases_callbacks() {
        let source = ScriptedSource::new("t", SIZE)
            .message(RawMessage::Activate(true))
            .idles(5);
        let handle = source.handle();
        let (mut w, _) = window(source);
        w.set_message_idle(|| Err(anyhow!("frame failed")));

        assert!(w.run().is_err());
        assert!(!w.has_callbacks());
        assert_eq!(handle.pending(), 4);
    }

    #[test]
    fn quit_from_idle_stops_loop() {
        let source = ScriptedSource::new("t", SIZE)
            .message(RawMessage::Activate(true))
            .idle();
        let handle = source.handle();
        let (mut w, log) = window(source);

        let h = handle.clone();
        w.set_message_idle(move || {
            h.quit();
            h.push_message(RawMessage::KeyDown(b'A'));
            Ok(())
        });

        w.run().unwrap();
        assert_eq!(handle.pending(), 1);
        assert!(log.borrow().events.is_empty());
    }
}
