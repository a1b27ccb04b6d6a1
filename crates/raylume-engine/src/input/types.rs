/// Keys the viewer binds. Anything else arrives as `Unknown` with the
/// platform key code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    // fly camera
    W,
    A,
    S,
    D,
    Space,
    Shift,

    // viewer commands
    Escape,
    R,
    F1,
    F5,

    Unknown(u32),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other(u16),
}

/// Window input reduced to what the viewer consumes. Positions are in
/// logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum InputEvent {
    Key { key: Key, pressed: bool, repeat: bool },
    Button { button: MouseButton, pressed: bool },
    PointerMoved { x: f32, y: f32 },
    PointerLeft,
    Focused(bool),
}
