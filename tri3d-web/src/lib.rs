/// TRI3D Web - WASM bindings for the TRI3D pipeline
///
/// The pipeline runs in Rust and hands its output to JavaScript as plain typed
/// arrays. Shader setup, buffer objects and draw calls stay on the JavaScript
/// side, which uploads `positions()`, `colors()` and `indices()` each frame and
/// draws them as `LINES` (wireframe) or `TRIANGLES` (solid).
use tri3d_core::{
    parse_mesh, CubeObject, FrameBuffers, MeshObject, Nudge, Pose, RenderConfig, RenderContext,
    RenderMode, SceneObject,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WebRenderer {
    object: Box<dyn SceneObject>,
    context: RenderContext,
    buffers: FrameBuffers,
    translate_step: f32,
    last_frame: Option<f64>,
}

#[wasm_bindgen]
impl WebRenderer {
    /// A renderer showing the built-in cube.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32) -> WebRenderer {
        let object = CubeObject::new(1.0).with_pose(Pose::at(0.0, 0.0, 3.0));
        Self::with_object(Box::new(object), &RenderConfig::default(), width, height)
    }

    /// A renderer for mesh text (`v`/`f` records), e.g. fetched by the page.
    pub fn from_obj(source: &str, width: u32, height: u32) -> Result<WebRenderer, JsValue> {
        let mesh = parse_mesh(source).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let object = MeshObject::from_mesh("mesh", mesh).with_pose(Pose::at(0.0, 0.0, 3.0));
        Ok(Self::with_object(
            Box::new(object),
            &RenderConfig::default(),
            width,
            height,
        ))
    }

    /// Recompute the projection after the canvas changed size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
    }

    /// Handle a key from a `keydown` event. Returns whether it was used.
    pub fn key_down(&mut self, key: &str) -> bool {
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => match Nudge::from_key(c) {
                Some(nudge) => {
                    nudge.apply(self.object.pose_mut(), self.translate_step);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    pub fn set_solid(&mut self, solid: bool) {
        self.context.mode = if solid {
            RenderMode::Solid
        } else {
            RenderMode::Wireframe
        };
    }

    pub fn solid(&self) -> bool {
        self.context.mode == RenderMode::Solid
    }

    /// Render a frame timed with `performance.now()`.
    ///
    /// Returns the number of indices to draw.
    pub fn frame(&mut self) -> Result<u32, JsValue> {
        let now = web_sys::window()
            .and_then(|window| window.performance())
            .ok_or_else(|| JsValue::from_str("performance timer unavailable"))?
            .now();
        let elapsed = match self.last_frame.replace(now) {
            Some(last) => ((now - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.render(elapsed)
    }

    /// Render a frame `elapsed` seconds after the previous one.
    ///
    /// Returns the number of indices to draw.
    pub fn render(&mut self, elapsed: f32) -> Result<u32, JsValue> {
        self.render_frame(elapsed)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn positions(&self) -> Vec<f32> {
        self.buffers.positions().to_vec()
    }

    pub fn colors(&self) -> Vec<f32> {
        self.buffers.colors().to_vec()
    }

    pub fn indices(&self) -> Vec<u32> {
        self.buffers.indices().to_vec()
    }
}

impl WebRenderer {
    fn with_object(
        object: Box<dyn SceneObject>,
        config: &RenderConfig,
        width: u32,
        height: u32,
    ) -> Self {
        let mut context = RenderContext::new(config, 1.0);
        context.resize(width, height);
        Self {
            object,
            context,
            buffers: FrameBuffers::with_capacity(config.max_vertices),
            translate_step: config.translate_step,
            last_frame: None,
        }
    }

    fn render_frame(&mut self, elapsed: f32) -> Result<u32, tri3d_core::EmitError> {
        self.buffers.reset();
        let stats = self
            .object
            .render(&self.context, elapsed, &mut self.buffers)?;
        tracing::trace!(?stats, "rendered frame");
        Ok(self.buffers.index_count() as u32)
    }
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "v 0 0 -3\nv 0 1 -3\nv 1 0 -3\nf 1 2 3\n";

    #[test]
    fn test_cube_frame() {
        let mut renderer = WebRenderer::new(800, 600);
        let indices = renderer.render_frame(0.0).unwrap();

        assert_eq!(indices, 12);
        assert_eq!(renderer.positions().len(), 18);
        assert_eq!(renderer.colors().len(), 24);
    }

    #[test]
    fn test_solid_mode() {
        let mut renderer = WebRenderer::new(800, 600);
        renderer.set_solid(true);
        assert!(renderer.solid());
        assert_eq!(renderer.render_frame(0.0).unwrap(), 6);
    }

    #[test]
    fn test_obj_source_and_keys() {
        let Ok(mut renderer) = WebRenderer::from_obj(TRIANGLE, 640, 480) else {
            panic!("failed to parse mesh");
        };
        assert!(renderer.key_down("w"));
        assert!(renderer.key_down("D"));
        assert!(!renderer.key_down("ArrowUp"));

        let pose = renderer.object.pose();
        assert!((pose.z - 3.2).abs() < 1e-5);
        assert!((pose.x - 0.2).abs() < 1e-5);

        // Translated to z = 0.2 in front of the eye.
        assert_eq!(renderer.render_frame(0.0).unwrap(), 6);
    }
}
