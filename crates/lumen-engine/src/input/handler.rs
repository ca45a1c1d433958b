use super::types::InputSymbol;

/// Receiver for translated input.
///
/// Pointer coordinates are client-area pixels with a bottom-left origin (+Y up).
/// All methods default to no-ops so implementors only override what they consume.
pub trait InputHandler {
    fn on_key_down(&mut self, key: InputSymbol) {
        let _ = key;
    }

    fn on_key_up(&mut self, key: InputSymbol) {
        let _ = key;
    }

    fn on_mouse_down(&mut self, button: InputSymbol, x: i32, y: i32) {
        let _ = (button, x, y);
    }

    fn on_mouse_up(&mut self, button: InputSymbol, x: i32, y: i32) {
        let _ = (button, x, y);
    }

    /// `delta` is in platform wheel units (120 per notch).
    fn on_mouse_wheel(&mut self, symbol: InputSymbol, x: i32, y: i32, delta: i32) {
        let _ = (symbol, x, y, delta);
    }

    fn on_mouse_move(&mut self, symbol: InputSymbol, x: i32, y: i32) {
        let _ = (symbol, x, y);
    }
}

/// One recorded handler invocation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum InputEvent {
    KeyDown(InputSymbol),
    KeyUp(InputSymbol),
    MouseDown { button: InputSymbol, x: i32, y: i32 },
    MouseUp { button: InputSymbol, x: i32, y: i32 },
    MouseWheel { x: i32, y: i32, delta: i32 },
    MouseMove { x: i32, y: i32 },
}

/// Handler that appends every invocation to a list, in arrival order.
#[derive(Debug, Default)]
pub struct InputLog {
    pub events: Vec<InputEvent>,
}

impl InputHandler for InputLog {
    fn on_key_down(&mut self, key: InputSymbol) {
        self.events.push(InputEvent::KeyDown(key));
    }

    fn on_key_up(&mut self, key: InputSymbol) {
        self.events.push(InputEvent::KeyUp(key));
    }

    fn on_mouse_down(&mut self, button: InputSymbol, x: i32, y: i32) {
        self.events.push(InputEvent::MouseDown { button, x, y });
    }

    fn on_mouse_up(&mut self, button: InputSymbol, x: i32, y: i32) {
        self.events.push(InputEvent::MouseUp { button, x, y });
    }

    fn on_mouse_wheel(&mut self, _symbol: InputSymbol, x: i32, y: i32, delta: i32) {
        self.events.push(InputEvent::MouseWheel { x, y, delta });
    }

    fn on_mouse_move(&mut self, _symbol: InputSymbol, x: i32, y: i32) {
        self.events.push(InputEvent::MouseMove { x, y });
    }
}

/// Shared handles forward to the inner handler, so the owner can keep reading
/// what the window dispatched.
impl<H: InputHandler + ?Sized> InputHandler for std::rc::Rc<std::cell::RefCell<H>> {
    fn on_key_down(&mut self, key: InputSymbol) {
        self.borrow_mut().on_key_down(key);
    }

    fn on_key_up(&mut self, key: InputSymbol) {
        self.borrow_mut().on_key_up(key);
    }

    fn on_mouse_down(&mut self, button: InputSymbol, x: i32, y: i32) {
        self.borrow_mut().on_mouse_down(button, x, y);
    }

    fn on_mouse_up(&mut self, button: InputSymbol, x: i32, y: i32) {
        self.borrow_mut().on_mouse_up(button, x, y);
    }

    fn on_mouse_wheel(&mut self, symbol: InputSymbol, x: i32, y: i32, delta: i32) {
        self.borrow_mut().on_mouse_wheel(symbol, x, y, delta);
    }

    fn on_mouse_move(&mut self, symbol: InputSymbol, x: i32, y: i32) {
        self.borrow_mut().on_mouse_move(symbol, x, y);
    }
}
