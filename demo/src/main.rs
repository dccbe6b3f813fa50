//! Draws a textured quad whose red channel pulses over time. The debug UI
//! moves the quad around and shows the frame rate.
//!
//! Usage: `glquad [settings.json]`. Without an argument, `glquad.json` in
//! the working directory is used if present.

#[macro_use]
extern crate log;

use std::env;
use std::process;

use glquad::math::{self, Matrix4, SquareMatrix, Vector3};
use glquad::prelude::*;
use glquad::video::renderer::BlendFactor;
use glquad_imgui::ImGuiLayer;

const SHADER: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/res/shaders/basic.shader");
const TEXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/res/textures/checker.png");

#[rustfmt::skip]
const VERTICES: [f32; 16] = [
    // position    texcoord
    -0.5, -0.5,    0.0, 0.0,
     0.5, -0.5,    1.0, 0.0,
     0.5,  0.5,    1.0, 1.0,
    -0.5,  0.5,    0.0, 1.0,
];

const INDICES: [u32; 6] = [0, 1, 2, 2, 3, 0];

struct QuadScene {
    ui: Option<ImGuiLayer>,
    renderer: Renderer,
    shader: Shader,
    texture: Texture,
    va: VertexArray,
    _vb: VertexBuffer,
    ib: IndexBuffer,
    pulse: ColorPulse,
    translation: [f32; 3],
}

impl QuadScene {
    fn new(engine: &Engine, settings: &Settings) -> Result<Self> {
        let video = engine.video();

        let vb = VertexBuffer::from_slice(video, &VERTICES)?;
        let mut layout = VertexBufferLayout::new();
        layout.push::<f32>(2).push::<f32>(2);

        let mut va = VertexArray::new(video)?;
        va.add_buffer(&vb, &layout)?;
        let ib = IndexBuffer::new(video, &INDICES)?;

        let mut shader = Shader::from_file(video, SHADER)?;
        let texture = Texture::from_file(video, TEXTURE)?;
        shader.bind()?;
        shader.set_uniform_4f("u_Color", 0.2, 0.5, 0.8, 1.0)?;
        shader.set_uniform_1i("u_Texture", 0)?;

        // Everything is bound again right before it is drawn.
        va.unbind()?;
        vb.unbind()?;
        ib.unbind()?;
        shader.unbind()?;

        let ui = if settings.ui {
            Some(ImGuiLayer::new(video)?)
        } else {
            None
        };

        let mut renderer = Renderer::new(video);
        renderer.set_clear_color(settings.clear_color);

        Ok(QuadScene {
            ui,
            renderer,
            shader,
            texture,
            va,
            _vb: vb,
            ib,
            pulse: ColorPulse::default(),
            translation: [0.0; 3],
        })
    }
}

impl Application for QuadScene {
    fn on_update(&mut self, info: &FrameInfo) -> Result<()> {
        self.renderer.clear()?;
        self.renderer.set_blend(Some((
            BlendFactor::SourceAlpha,
            BlendFactor::OneMinusSourceAlpha,
        )))?;

        let (width, height) = info.framebuffer;
        let [x, y, z] = self.translation;
        let projection = math::projection(width, height);
        let model = Matrix4::from_translation(Vector3::new(x, y, z));
        let mvp = math::mvp(&projection, &Matrix4::identity(), &model);

        self.texture.bind(0)?;
        self.shader.bind()?;
        self.shader
            .set_uniform_4f("u_Color", self.pulse.value(), 0.5, 0.8, 1.0)?;
        self.shader.set_uniform_mat4f("u_MVP", &mvp)?;
        self.renderer.draw(&self.va, &self.ib, &self.shader)?;
        self.pulse.advance();

        if let Some(ui) = self.ui.as_mut() {
            let translation = &mut self.translation;
            ui.frame(info, |ui| {
                ui.window("glquad").build(|| {
                    ui.slider_config("Translation", -1.0, 1.0)
                        .build_array(&mut translation[..]);
                    ui.text(format!(
                        "{:.3} ms/frame ({:.1} fps)",
                        1000.0 / info.fps.max(1e-3),
                        info.fps
                    ));
                });
            })?;
        }

        Ok(())
    }

    fn on_event(&mut self, event: &Event) -> Result<()> {
        if let Some(ui) = self.ui.as_mut() {
            ui.handle_event(event);
        }

        Ok(())
    }

    fn on_exit(&mut self) {
        info!("Quad scene finished at translation {:?}.", self.translation);
    }
}

fn run() -> Result<()> {
    let settings = match env::args().nth(1) {
        Some(path) => Settings::load(path)?,
        None => Settings::load_or_default("glquad.json")?,
    };

    let engine = Engine::new(&settings)?;
    let scene = QuadScene::new(&engine, &settings)?;
    engine.run(scene)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        error!("{}", err);
        eprintln!("error: {}", err);
        for cause in err.iter_causes() {
            eprintln!("  caused by: {}", cause);
        }

        process::exit(1);
    }
}
