use super::super::super::events::{Event, InputEvent, MouseButton, WindowEvent};

pub fn from_event(source: glutin::Event) -> Option<Event> {
    match source {
        glutin::Event::WindowEvent { event, .. } => from_window_event(&event),
        _ => None,
    }
}

fn from_window_event(source: &glutin::WindowEvent) -> Option<Event> {
    match *source {
        glutin::WindowEvent::CloseRequested => Some(Event::Window(WindowEvent::Closed)),

        glutin::WindowEvent::Focused(v) => {
            if v {
                Some(Event::Window(WindowEvent::GainFocus))
            } else {
                Some(Event::Window(WindowEvent::LostFocus))
            }
        }

        glutin::WindowEvent::Resized(glutin::dpi::LogicalSize { width, height }) => Some(
            Event::Window(WindowEvent::Resized(width as u32, height as u32)),
        ),

        glutin::WindowEvent::CursorMoved { position, .. } => {
            Some(Event::InputDevice(InputEvent::MouseMoved {
                position: (position.x as f32, position.y as f32),
            }))
        }

        glutin::WindowEvent::MouseWheel { delta, .. } => match delta {
            glutin::MouseScrollDelta::LineDelta(x, y) => {
                Some(Event::InputDevice(InputEvent::MouseWheel { delta: (x, y) }))
            }
            glutin::MouseScrollDelta::PixelDelta(pos) => {
                Some(Event::InputDevice(InputEvent::MouseWheel {
                    delta: (pos.x as f32, pos.y as f32),
                }))
            }
        },

        glutin::WindowEvent::MouseInput {
            state: glutin::ElementState::Pressed,
            button,
            ..
        } => Some(Event::InputDevice(InputEvent::MousePressed {
            button: from_mouse_button(button),
        })),

        glutin::WindowEvent::MouseInput {
            state: glutin::ElementState::Released,
            button,
            ..
        } => Some(Event::InputDevice(InputEvent::MouseReleased {
            button: from_mouse_button(button),
        })),

        _ => None,
    }
}

fn from_mouse_button(button: glutin::MouseButton) -> MouseButton {
    match button {
        glutin::MouseButton::Left => MouseButton::Left,
        glutin::MouseButton::Right => MouseButton::Right,
        glutin::MouseButton::Middle => MouseButton::Middle,
        glutin::MouseButton::Other(v) => MouseButton::Other(v),
    }
}
