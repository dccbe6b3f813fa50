#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    Window(WindowEvent),
    InputDevice(InputEvent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    GainFocus,
    LostFocus,
    /// The window has been resized to the given size in points.
    Resized(u32, u32),
    /// The user asked the window to close.
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u8),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The cursor has moved, in points relative to the top-left corner of
    /// the client area.
    MouseMoved { position: (f32, f32) },
    MousePressed { button: MouseButton },
    MouseReleased { button: MouseButton },
    MouseWheel { delta: (f32, f32) },
}
