//! The scene manager.
//!
//! [`SceneManager`] owns everything the demo draws: the model-view stack, the
//! follow camera, the player, the light and material tables and the props.
//! It never touches the GPU. Each frame [`SceneManager::build_frame`] walks the
//! scene with the transform stack and records a [`Frame`]: the projection, the
//! eye-space light, and one model-view matrix per draw. The renderer uploads
//! and draws that.

use cgmath::{Deg, Matrix3, Matrix4, Point3, SquareMatrix, Vector3};
use serde::Deserialize;

use crate::{
    camera::{Camera, Projection},
    config::{CameraConfig, Config},
    data_structures::{instance::InstanceRaw, model_view::ModelViewStack},
    error::SceneError,
    movement::{move_forward, move_right},
    pipelines::light::{Light, LightUniform, Material},
    player::Player,
};

/// Every object in the demo is drawn with the single loaded mesh.
pub const CUBE_MESH: usize = 0;

/// A textured cube placed in the world.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Prop {
    pub texture: usize,
    pub material: usize,
    pub translation: [f32; 3],
    /// Degrees about +Y.
    pub rotation_y: f32,
    pub scale: [f32; 3],
}

impl Default for Prop {
    fn default() -> Self {
        Self {
            texture: 0,
            material: 0,
            translation: [0.0; 3],
            rotation_y: 0.0,
            scale: [1.0; 3],
        }
    }
}

impl Prop {
    /// The ground plane followed by a few crates along the track.
    pub fn default_layout() -> Vec<Prop> {
        let ground = Prop {
            translation: [-5.0, -0.1, -100.0],
            scale: [20.0, 0.1, 200.0],
            ..Default::default()
        };
        let crates = [
            ([-3.0, 0.5, -12.0], 0.0),
            ([4.0, 0.5, -20.0], 30.0),
            ([-8.0, 0.5, -35.0], 45.0),
            ([2.0, 1.0, -50.0], 10.0),
        ]
        .into_iter()
        .map(|(translation, rotation_y)| Prop {
            texture: 1,
            translation,
            rotation_y,
            scale: [translation[1]; 3],
            ..Default::default()
        });
        std::iter::once(ground).chain(crates).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCall {
    pub mesh: usize,
    pub texture: usize,
    pub material: usize,
    pub modelview: Matrix4<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyboxDraw {
    pub mesh: usize,
    pub modelview: Matrix4<f32>,
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub projection: Matrix4<f32>,
    pub clear_colour: wgpu::Color,
    pub skybox: SkyboxDraw,
    pub light: LightUniform,
    pub draws: Vec<DrawCall>,
}

impl Frame {
    /// Instance rows in draw order: the skybox at row 0, then one row per draw.
    pub fn instance_rows(&self) -> Vec<InstanceRaw> {
        std::iter::once(&self.skybox.modelview)
            .chain(self.draws.iter().map(|draw| &draw.modelview))
            .map(InstanceRaw::from_modelview)
            .collect()
    }
}

#[derive(Debug)]
pub struct SceneManager {
    mv_stack: ModelViewStack,
    camera: Camera,
    camera_config: CameraConfig,
    projection: Projection,
    player: Player,
    player_texture: usize,
    player_material: usize,
    lights: Vec<Light>,
    light_eye_position: [f32; 4],
    materials: Vec<Material>,
    props: Vec<Prop>,
    skybox_scale: f32,
    clear_colour: wgpu::Color,
}

impl SceneManager {
    /// Set up the scene described by `config`.
    ///
    /// Texture and material references are checked against the configured
    /// tables, so every later draw refers to something that exists.
    pub fn new(config: &Config) -> Result<Self, SceneError> {
        if config.lights.is_empty() {
            return Err(SceneError::NoLights);
        }
        let texture_count = config.assets.textures.len();
        let material_count = config.materials.len();
        let references = config
            .props
            .iter()
            .map(|prop| (prop.texture, prop.material))
            .chain(std::iter::once((config.player.texture, config.player.material)));
        for (texture, material) in references {
            if texture >= texture_count {
                return Err(SceneError::UnknownTexture(texture));
            }
            if material >= material_count {
                return Err(SceneError::UnknownMaterial(material));
            }
        }

        let [r, g, b, a] = config.clear_colour;
        let camera = &config.camera;
        Ok(Self {
            mv_stack: ModelViewStack::new(),
            camera: Camera::default(),
            camera_config: camera.clone(),
            projection: Projection::new(
                config.window.width,
                config.window.height,
                Deg(camera.fovy),
                camera.znear,
                camera.zfar,
            ),
            player: Player::new(config.player.start.into(), Deg(config.player.rotation)),
            player_texture: config.player.texture,
            player_material: config.player.material,
            lights: config.lights.clone(),
            light_eye_position: config.lights[0].position,
            materials: config.materials.clone(),
            props: config.props.clone(),
            skybox_scale: config.skybox_scale,
            clear_colour: wgpu::Color { r, g, b, a },
        })
    }

    /// Start a frame: collapse the stack to the camera's view matrix and
    /// return the projection.
    pub fn init_rendering(&mut self) -> Matrix4<f32> {
        self.mv_stack.reset(Matrix4::identity());
        self.init_camera();
        self.projection.calc_matrix()
    }

    /// Place the camera behind and above the player and load its view matrix
    /// into the top of the stack.
    pub fn init_camera(&mut self) {
        self.camera.follow(
            self.player.position(),
            self.player.rotation(),
            self.camera_config.follow_distance,
            self.camera_config.follow_height,
        );
        self.mv_stack.set_top(self.camera.view_matrix());
    }

    pub fn clear_colour(&self) -> wgpu::Color {
        self.clear_colour
    }

    /// Record the skybox transform: the view's rotation only, so the box stays
    /// centred on the eye, scaled to sit just beyond the near plane.
    pub fn render_skybox(&mut self) -> SkyboxDraw {
        let scale = self.skybox_scale;
        self.mv_stack.scoped(|stack| {
            let top = stack.top();
            let rotation_only =
                Matrix3::from_cols(top.x.truncate(), top.y.truncate(), top.z.truncate());
            stack.set_top(Matrix4::from(rotation_only));
            stack.scale(Vector3::new(scale, scale, scale));
            SkyboxDraw {
                mesh: CUBE_MESH,
                modelview: *stack.top(),
            }
        })
    }

    /// Transform the first light into eye space with the current top of the
    /// stack and return its uniform.
    pub fn set_lights(&mut self) -> LightUniform {
        let light = &self.lights[0];
        let eye = *self.mv_stack.top() * cgmath::Vector4::from(light.position);
        self.light_eye_position = eye.into();
        LightUniform::new(light, self.light_eye_position)
    }

    /// Record one draw per prop and one for the player.
    pub fn render_objects(&mut self) -> Vec<DrawCall> {
        let mut draws = Vec::with_capacity(self.props.len() + 1);
        for prop in &self.props {
            let modelview = self.mv_stack.scoped(|stack| {
                stack.translate(prop.translation.into());
                stack.rotate(Vector3::unit_y(), Deg(prop.rotation_y));
                stack.scale(prop.scale.into());
                *stack.top()
            });
            draws.push(DrawCall {
                mesh: CUBE_MESH,
                texture: prop.texture,
                material: prop.material,
                modelview,
            });
        }

        let position = self.player.position();
        let rotation = self.player.rotation();
        let modelview = self.mv_stack.scoped(|stack| {
            stack.translate(Vector3::new(position.x, position.y, position.z));
            stack.rotate(Vector3::unit_y(), rotation);
            stack.rotate(Vector3::unit_x(), Deg(180.0));
            stack.rotate(Vector3::unit_z(), Deg(180.0));
            *stack.top()
        });
        draws.push(DrawCall {
            mesh: CUBE_MESH,
            texture: self.player_texture,
            material: self.player_material,
            modelview,
        });
        draws
    }

    pub fn build_frame(&mut self) -> Frame {
        let projection = self.init_rendering();
        let skybox = self.render_skybox();
        let light = self.set_lights();
        let draws = self.render_objects();
        debug_assert_eq!(self.mv_stack.depth(), 1, "unbalanced model-view stack");
        Frame {
            projection,
            clear_colour: self.clear_colour,
            skybox,
            light,
            draws,
        }
    }

    /// Turn the player. Positive deltas turn left.
    pub fn update_player_r(&mut self, delta: f32) {
        self.player.set_rotation(self.player.rotation() - Deg(delta));
    }

    pub fn move_player_forward(&mut self, d: f32) {
        let moved = move_forward(self.player.position(), self.player.rotation(), d);
        self.player.set_position(moved);
    }

    pub fn move_player_right(&mut self, d: f32) {
        let moved = move_right(self.player.position(), self.player.rotation(), d);
        self.player.set_position(moved);
    }

    pub fn move_player_up(&mut self, d: f32) {
        let p = self.player.position();
        self.player.set_position(Point3::new(p.x, p.y + d, p.z));
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Eye-space position of the first light as of the last `set_lights`.
    pub fn light_eye_position(&self) -> [f32; 4] {
        self.light_eye_position
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn props(&self) -> &[Prop] {
        &self.props
    }

    pub fn stack_depth(&self) -> usize {
        self.mv_stack.depth()
    }
}
