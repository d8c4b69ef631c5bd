mod playfield;

use anyhow::Result;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use tetris_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use tetris_engine::device::{Gpu, GpuInit};
use tetris_engine::logging::{init_logging, LoggingConfig};
use tetris_engine::render::{Renderer, RendererConfig, WgpuBackend};
use tetris_engine::window::{Runtime, RuntimeConfig};

use playfield::Playfield;

const WINDOW_WIDTH: u32 = 720;
const WINDOW_HEIGHT: u32 = 480;

#[derive(Default)]
struct TetrisApp {
    renderer: Option<Renderer<WgpuBackend>>,
    playfield: Playfield,
}

impl App for TetrisApp {
    fn on_start(&mut self, gpu: &Gpu<'_>, window: &WindowCtx<'_>) -> Result<()> {
        let backend = WgpuBackend::new(gpu.device(), gpu.queue(), gpu.surface_format());
        let config = RendererConfig {
            viewport_width: WINDOW_WIDTH,
            viewport_height: WINDOW_HEIGHT,
            ..RendererConfig::default()
        };

        let renderer = Renderer::new(backend, config)?;
        anyhow::ensure!(
            self.playfield.quad_count() <= renderer.max_quad_count() as usize,
            "playfield needs {} quads, renderer holds {}",
            self.playfield.quad_count(),
            renderer.max_quad_count()
        );

        self.renderer = Some(renderer);
        log::info!("window {:?} ready, logical size {:?}", window.id, window.logical_size());
        Ok(())
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::Escape) =>
            {
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<AppControl> {
        let Some(renderer) = self.renderer.as_mut() else {
            return Ok(AppControl::Exit);
        };

        let playfield = &self.playfield;

        ctx.render(|target| {
            renderer.begin_drawing(target)?;
            playfield.draw(renderer);
            let stats = renderer.end_drawing(target)?;
            log::trace!("frame: {stats:?}");
            Ok(())
        })
    }

    fn on_exit(&mut self) {
        if let Some(renderer) = self.renderer.take() {
            renderer.destroy();
        }
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Tetris".to_string(),
        size: winit::dpi::LogicalSize::new(f64::from(WINDOW_WIDTH), f64::from(WINDOW_HEIGHT)),
        resizable: false,
    };

    Runtime::run(config, GpuInit::default(), TetrisApp::default())
}
