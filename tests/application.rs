extern crate glquad;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glquad::math::{self, Matrix4, Vector3};
use glquad::prelude::*;
use glquad::video::backends::headless::{Command, HeadlessVisitor};
use glquad::video::renderer::SurfaceRect;

struct Quad {
    va: VertexArray,
    _vb: VertexBuffer,
    ib: IndexBuffer,
    shader: Shader,
    texture: Texture,
    renderer: Renderer,
    pulse: ColorPulse,
    frames: Rc<RefCell<Vec<FrameInfo>>>,
    events: Rc<RefCell<Vec<Event>>>,
    exited: Rc<Cell<bool>>,
}

impl Quad {
    fn new(video: &SharedVisitor) -> Result<Self> {
        let vertices: [f32; 16] = [
            -0.5, -0.5, 0.0, 0.0, //
            0.5, -0.5, 1.0, 0.0, //
            0.5, 0.5, 1.0, 1.0, //
            -0.5, 0.5, 0.0, 1.0,
        ];

        let vb = VertexBuffer::from_slice(video, &vertices)?;
        let mut layout = VertexBufferLayout::new();
        layout.push::<f32>(2).push::<f32>(2);

        let mut va = VertexArray::new(video)?;
        va.add_buffer(&vb, &layout)?;
        let ib = IndexBuffer::new(video, &[0u32, 1, 2, 2, 3, 0])?;

        let mut shader = Shader::from_file(video, "tests/resources/basic.shader")?;
        let texture = Texture::from_file(video, "tests/resources/pixels.png")?;
        shader.bind()?;
        shader.set_uniform_1i("u_Texture", 0)?;

        va.unbind()?;
        vb.unbind()?;
        ib.unbind()?;
        shader.unbind()?;

        Ok(Quad {
            va,
            _vb: vb,
            ib,
            shader,
            texture,
            renderer: Renderer::new(video),
            pulse: ColorPulse::new(0.05),
            frames: Rc::new(RefCell::new(Vec::new())),
            events: Rc::new(RefCell::new(Vec::new())),
            exited: Rc::new(Cell::new(false)),
        })
    }
}

impl Application for Quad {
    fn on_update(&mut self, info: &FrameInfo) -> Result<()> {
        self.frames.borrow_mut().push(*info);
        self.renderer.clear()?;

        let (width, height) = info.framebuffer;
        let model = Matrix4::from_translation(Vector3::new(0.25, 0.0, 0.0));
        let mvp = math::mvp(&math::projection(width, height), &Matrix4::from_scale(1.0), &model);

        self.texture.bind(0)?;
        self.shader.bind()?;
        self.shader
            .set_uniform_4f("u_Color", self.pulse.value(), 0.3, 0.8, 1.0)?;
        self.shader.set_uniform_mat4f("u_MVP", &mvp)?;
        self.renderer.draw(&self.va, &self.ib, &self.shader)?;

        self.pulse.advance();
        Ok(())
    }

    fn on_event(&mut self, event: &Event) -> Result<()> {
        self.events.borrow_mut().push(*event);
        Ok(())
    }

    fn on_exit(&mut self) {
        self.exited.set(true);
    }
}

fn setup(close_after: u64) -> (Rc<HeadlessVisitor>, Engine) {
    let headless = Rc::new(HeadlessVisitor::new());
    let video: SharedVisitor = headless.clone();

    let mut params = WindowParams::default();
    params.size = (400, 200);
    let window = Window::headless(&params, Some(close_after));
    (headless, Engine::with(window, video).unwrap())
}

#[test]
fn runs_until_closed() {
    let (headless, engine) = setup(3);
    let quad = Quad::new(engine.video()).unwrap();
    let frames = quad.frames.clone();
    let events = quad.events.clone();
    let exited = quad.exited.clone();

    assert_eq!(
        headless.commands()[0],
        Command::Viewport(SurfaceRect::new(0, 0, 400, 200))
    );

    engine.run(quad).unwrap();

    let frames = frames.borrow();
    assert_eq!(frames.len(), 3);
    assert_eq!(
        frames.iter().map(|v| v.index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert!(frames.iter().all(|v| v.framebuffer == (400, 200)));
    assert_eq!(*events.borrow(), vec![Event::Window(WindowEvent::Closed)]);
    assert!(exited.get());

    // Every GPU object of the scene is gone once the engine returns.
    assert_eq!(headless.alive(), 0);
}

#[test]
fn draws_the_quad_every_frame() {
    let (headless, engine) = setup(3);
    let quad = Quad::new(engine.video()).unwrap();
    let (va, ib, program, texture) = (quad.va.id(), quad.ib.id(), quad.shader.id(), quad.texture.id());

    assert_eq!(headless.bindings().vertex_array, None);
    assert_eq!(headless.bindings().program, None);
    headless.take_commands();

    engine.run(quad).unwrap();

    let calls = headless.draw_calls();
    assert_eq!(calls.len(), 3);
    for call in calls {
        assert_eq!(call.count, 6);
        assert_eq!(call.format, IndexFormat::U32);
        assert_eq!(call.offset, 0);
        assert_eq!(call.vertex_array, Some(va));
        assert_eq!(call.index_buffer, Some(ib));
        assert_eq!(call.program, Some(program));
    }

    let commands = headless.commands();
    assert!(commands.contains(&Command::BindTexture(0, Some(texture))));

    let reds: Vec<f32> = commands
        .iter()
        .filter_map(|v| match *v {
            Command::BindUniform {
                variable: UniformVariable::Vector4f(color),
                ..
            } => Some(color[0]),
            _ => None,
        })
        .collect();

    assert_eq!(reds.len(), 3);
    for (red, expected) in reds.iter().zip(&[0.0, 0.05, 0.1]) {
        assert!((red - expected).abs() < 1e-6);
    }

    // u_Color and u_MVP are resolved on their first use only.
    let lookups = commands
        .iter()
        .filter(|v| match **v {
            Command::UniformLocation { .. } => true,
            _ => false,
        })
        .count();

    assert_eq!(lookups, 2);
}

struct Failing {
    exited: Rc<Cell<bool>>,
}

impl Application for Failing {
    fn on_update(&mut self, info: &FrameInfo) -> Result<()> {
        if info.index == 1 {
            bail_out()?;
        }

        Ok(())
    }

    fn on_exit(&mut self) {
        self.exited.set(true);
    }
}

fn bail_out() -> Result<()> {
    Err(glquad::errors::Error::from(std::io::Error::new(
        std::io::ErrorKind::Other,
        "frame failed",
    )))
}

#[test]
fn update_errors_end_the_loop() {
    let (_, engine) = setup(10);
    let exited = Rc::new(Cell::new(false));
    let app = Failing {
        exited: exited.clone(),
    };

    let err = engine.run(app).unwrap_err();
    assert!(format!("{}", err).contains("frame failed"));
    assert!(exited.get());
}

#[test]
fn settings_file() {
    let settings = Settings::load("tests/resources/settings.json").unwrap();
    assert_eq!(settings.window.title, "settings fixture");
    assert_eq!(settings.window.size, (800, 600));
    assert_eq!(settings.window.vsync, false);
    assert_eq!(settings.window.gl_version, (4, 4));
    assert_eq!(settings.window.multisample, 0);
    assert_eq!(settings.clear_color, [0.2, 0.3, 0.3, 1.0]);
    assert!(settings.ui);

    assert!(Settings::load("tests/resources/_missing_.json").is_err());
    assert_eq!(
        Settings::load_or_default("tests/resources/_missing_.json").unwrap(),
        Settings::default()
    );
}
