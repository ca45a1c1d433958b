use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lumen_engine::coords::{ClientSize, Viewport};
use lumen_engine::device::debug::{Annotation, EventRecorder, EventSection, marker};
use lumen_engine::device::{DeviceState, GpuConfig, GraphicsDevice, HeadlessBackend, LossReason};
use lumen_engine::input::{InputEvent, InputLog, InputSymbol, vk};
use lumen_engine::window::{RawMessage, ScriptedSource, Window};

type Shared = Rc<RefCell<GraphicsDevice<HeadlessBackend>>>;

fn bind(window: &Window<ScriptedSource>) -> Shared {
    let gd = GraphicsDevice::new(HeadlessBackend::new(), window, GpuConfig::default()).unwrap();
    Rc::new(RefCell::new(gd))
}

fn rebuild_on_resize(window: &mut Window<ScriptedSource>, gd: &Shared) {
    let gd = Rc::clone(gd);
    window.set_resize_handler(move |_| {
        gd.borrow_mut().rebuild_window_resources()?;
        Ok(())
    });
}

#[test]
fn resize_rebuilds_viewport_without_loss() {
    let mut window = Window::with_source(ScriptedSource::new("lifecycle", ClientSize::new(800, 600)));
    let gd = bind(&window);
    assert_eq!(gd.borrow().viewport(), Viewport::new(0.0, 0.0, 800.0, 600.0));

    let losses = Rc::new(Cell::new(0));
    let l = Rc::clone(&losses);
    gd.borrow_mut().on_device_lost(move |_| l.set(l.get() + 1));
    rebuild_on_resize(&mut window, &gd);

    window.dispatch(RawMessage::Size(ClientSize::new(640, 480))).unwrap();

    let gd = gd.borrow();
    assert_eq!(gd.viewport(), Viewport::new(0.0, 0.0, 640.0, 480.0));
    assert_eq!(gd.render_target().map(|t| t.size), Some(ClientSize::new(640, 480)));
    assert_eq!(gd.recoveries(), 0);
    assert_eq!(losses.get(), 0);
}

#[test]
fn run_loop_presents_and_absorbs_loss() {
    let source = ScriptedSource::new("lifecycle", ClientSize::new(800, 600))
        .message(RawMessage::Activate(true))
        .idles(3)
        .message(RawMessage::Size(ClientSize::new(1024, 768)))
        .idles(2);
    let mut window = Window::with_source(source);
    let gd = bind(&window);
    gd.borrow_mut().backend_mut().fail_next_present(LossReason::Removed);

    rebuild_on_resize(&mut window, &gd);
    let d = Rc::clone(&gd);
    window.set_message_idle(move || {
        d.borrow_mut().present()?;
        Ok(())
    });

    window.run().unwrap();
    assert!(!window.has_callbacks());

    let gd = gd.borrow();
    assert_eq!(gd.state(), DeviceState::Ready);
    assert_eq!(gd.recoveries(), 1);
    assert_eq!(gd.backend().stats().presents, 4);
    assert_eq!(gd.viewport(), Viewport::new(0.0, 0.0, 1024.0, 768.0));
}

#[test]
fn input_reaches_handler_normalised() {
    let source = ScriptedSource::new("input", ClientSize::new(800, 600))
        .hold(vk::RSHIFT)
        .message(RawMessage::KeyDown(vk::SHIFT))
        .message(RawMessage::MouseDown { button: vk::LBUTTON, x: 10, y: 20 })
        .release(vk::RSHIFT)
        .message(RawMessage::KeyUp(vk::SHIFT))
        .message(RawMessage::KeyDown(b'Z'))
        .message(RawMessage::KeyDown(0xFF));
    let mut window = Window::with_source(source);
    let log = Rc::new(RefCell::new(InputLog::default()));
    window.set_input_handler(Rc::clone(&log));

    window.run().unwrap();

    assert_eq!(
        log.borrow().events,
        vec![
            InputEvent::KeyDown(InputSymbol::RightShift),
            InputEvent::MouseDown { button: InputSymbol::MouseLeft, x: 10, y: 580 },
            InputEvent::KeyUp(InputSymbol::RightShift),
            InputEvent::KeyDown(InputSymbol::Z),
            InputEvent::KeyDown(InputSymbol::Invalid),
        ]
    );
    assert!(!window.lateral_modifiers().any_held());
}

#[test]
fn hook_observes_every_dispatched_message() {
    let source = ScriptedSource::new("hook", ClientSize::new(320, 240))
        .message(RawMessage::Activate(true))
        .message(RawMessage::Paint)
        .message(RawMessage::Close)
        .message(RawMessage::KeyDown(b'A'));
    let mut window = Window::with_source(source);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    window.set_raw_message_hook(move |m| s.borrow_mut().push(*m));

    window.run().unwrap();

    assert_eq!(
        *seen.borrow(),
        [
            RawMessage::Activate(true),
            RawMessage::Paint,
            RawMessage::Close,
            RawMessage::KeyDown(b'A'),
        ]
    );
}

#[test]
fn frame_sections_follow_device_config() {
    let window = Window::with_source(ScriptedSource::new("markers", ClientSize::new(64, 64)));
    let config = GpuConfig {
        debug_markers: true,
        ..GpuConfig::default()
    };
    let gd = GraphicsDevice::new(HeadlessBackend::new(), &window, config).unwrap();

    let mut rec = EventRecorder::capturing();
    {
        let mut frame = EventSection::begin_if(gd.markers_enabled(), &mut rec, "frame");
        marker(&mut *frame, "clear");
    }

    assert_eq!(
        rec.annotations,
        [
            Annotation::Begin("frame".to_string()),
            Annotation::Marker("clear".to_string()),
            Annotation::End,
        ]
    );
}
