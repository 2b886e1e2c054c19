/// Orrery Web - WASM bindings for a JavaScript renderer
///
/// Exposes mesh parsing and per-frame scene stepping. The JavaScript side owns
/// the WebGL/WebGPU context and uploads the flat arrays and matrices returned
/// here as vertex buffers and uniforms.
use nalgebra::Matrix4;
use orrery_core::{
    is_valid_aspect, parse_obj, ConfigError, FrameOutput, InputSnapshot, Mesh, Scene, SceneConfig,
    SceneState,
};
use wasm_bindgen::prelude::*;

fn js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn checked_aspect(aspect: f32) -> Result<f32, ConfigError> {
    if is_valid_aspect(aspect) {
        Ok(aspect)
    } else {
        Err(ConfigError::Invalid {
            field: "aspect",
            reason: "must be finite and positive",
        })
    }
}

/// A parsed mesh, ready to upload as a non-indexed triangle list
#[wasm_bindgen]
pub struct WebMesh {
    mesh: Mesh,
}

#[wasm_bindgen]
impl WebMesh {
    /// Parse OBJ text
    pub fn parse(text: &str) -> Result<WebMesh, JsValue> {
        let mesh = parse_obj(text).map_err(js_error)?;
        Ok(WebMesh { mesh })
    }

    #[wasm_bindgen(getter, js_name = vertexCount)]
    pub fn vertex_count(&self) -> usize {
        self.mesh.len()
    }

    pub fn positions(&self) -> Vec<f32> {
        self.mesh.flat_positions()
    }

    pub fn uvs(&self) -> Vec<f32> {
        self.mesh.flat_uvs()
    }

    pub fn normals(&self) -> Vec<f32> {
        self.mesh.flat_normals()
    }
}

/// Scene state stepped from JavaScript once per animation frame
#[wasm_bindgen]
pub struct WebScene {
    scene: Scene,
    state: SceneState,
    last: Option<FrameOutput>,
}

#[wasm_bindgen]
impl WebScene {
    /// Create the default scene. `config` may hold a RON scene description.
    #[wasm_bindgen(constructor)]
    pub fn new(aspect: f32, config: Option<String>) -> Result<WebScene, JsValue> {
        Self::build(aspect, config.as_deref()).map_err(js_error)
    }

    /// Advance one frame. `input_bits` packs the active signals (see
    /// `InputSignal::bit`). Returns false once quit was requested.
    pub fn step(&mut self, input_bits: u32) -> bool {
        let input = InputSnapshot::from_bits(input_bits);
        let (state, frame) = self.scene.step(self.state.clone(), &input);
        self.state = state;
        self.last = Some(frame);
        self.state.running
    }

    /// Rejects zero, negative and non-finite ratios, keeping the previous one
    #[wasm_bindgen(js_name = setAspect)]
    pub fn set_aspect(&mut self, aspect: f32) -> Result<(), JsValue> {
        self.state.camera.aspect = checked_aspect(aspect).map_err(js_error)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = starMvp)]
    pub fn star_mvp(&self) -> Vec<f32> {
        self.matrix(|frame| &frame.star.mvp)
    }

    #[wasm_bindgen(js_name = orbiterMvp)]
    pub fn orbiter_mvp(&self) -> Vec<f32> {
        self.matrix(|frame| &frame.orbiter.mvp)
    }

    #[wasm_bindgen(js_name = projectileMvp)]
    pub fn projectile_mvp(&self) -> Vec<f32> {
        self.matrix(|frame| &frame.projectile.mvp)
    }

    #[wasm_bindgen(js_name = drawOrbiter)]
    pub fn draw_orbiter(&self) -> bool {
        self.last.as_ref().map_or(true, FrameOutput::draw_orbiter)
    }

    #[wasm_bindgen(js_name = drawProjectile)]
    pub fn draw_projectile(&self) -> bool {
        self.last.as_ref().map_or(false, FrameOutput::draw_projectile)
    }

    #[wasm_bindgen(getter)]
    pub fn frame(&self) -> u64 {
        self.state.frame
    }
}

impl WebScene {
    fn build(aspect: f32, config: Option<&str>) -> Result<Self, ConfigError> {
        let aspect = checked_aspect(aspect)?;
        let config = match config {
            Some(text) => SceneConfig::from_ron(text)?,
            None => SceneConfig::default(),
        };
        let scene = Scene::new(&config);
        let mut state = scene.initial_state();
        state.camera.aspect = aspect;

        Ok(WebScene {
            scene,
            state,
            last: None,
        })
    }

    /// Column-major copy of a matrix from the last frame; identity before
    /// the first step.
    fn matrix(&self, select: impl Fn(&FrameOutput) -> &Matrix4<f32>) -> Vec<f32> {
        match &self.last {
            Some(frame) => select(frame).as_slice().to_vec(),
            None => Matrix4::<f32>::identity().as_slice().to_vec(),
        }
    }
}
