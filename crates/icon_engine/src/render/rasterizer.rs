//! Triangle rasterization
//!
//! Scan-converts world-space meshes into a [`RenderTarget`] using edge
//! functions evaluated at pixel centres. Every fragment is depth tested and
//! shaded with the context's lighting rig. There is no backface culling, so
//! open meshes render from both sides.

use crate::foundation::math::{Mat4, Point3, Vec3};
use crate::render::lighting::LightingEnvironment;
use crate::render::material::Material;
use crate::render::mesh::Mesh;
use crate::render::target::RenderTarget;

/// Counters for one draw
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrawStats {
    /// Triangles submitted
    pub triangles: usize,
    /// Fragments that passed the depth test
    pub fragments: usize,
}

impl std::ops::AddAssign for DrawStats {
    fn add_assign(&mut self, rhs: Self) {
        self.triangles += rhs.triangles;
        self.fragments += rhs.fragments;
    }
}

struct ScreenVertex {
    x: f32,
    y: f32,
    z: f32,
    normal: Vec3,
}

/// Signed doubled area of (a, b, p); positive when p lies left of a→b on screen
fn edge(ax: f32, ay: f32, bx: f32, by: f32, px: f32, py: f32) -> f32 {
    (bx - ax) * (py - ay) - (by - ay) * (px - ax)
}

/// Software rasterizer drawing into one target
pub struct Rasterizer<'a> {
    target: &'a mut RenderTarget,
    view_projection: Mat4,
    view_direction: Vec3,
    lighting: &'a LightingEnvironment,
}

impl<'a> Rasterizer<'a> {
    /// Create a rasterizer for a target
    ///
    /// # Arguments
    /// * `target` - Colour and depth buffers to draw into
    /// * `view_projection` - World-to-clip transform of the camera
    /// * `view_direction` - Direction the camera looks along, used to orient normals
    /// * `lighting` - Lighting rig applied to every fragment
    pub fn new(
        target: &'a mut RenderTarget,
        view_projection: Mat4,
        view_direction: Vec3,
        lighting: &'a LightingEnvironment,
    ) -> Self {
        Self {
            target,
            view_projection,
            view_direction,
            lighting,
        }
    }

    /// Draw a mesh placed in the world by `world`
    ///
    /// The mesh must already be validated; triangles referencing missing
    /// vertices are skipped.
    pub fn draw_mesh(&mut self, mesh: &Mesh, world: &Mat4, material: &Material) -> DrawStats {
        let clip_from_local = self.view_projection * world;
        let normal_matrix = world
            .fixed_view::<3, 3>(0, 0)
            .into_owned()
            .try_inverse()
            .map_or_else(|| world.fixed_view::<3, 3>(0, 0).into_owned(), |m| m.transpose());

        let (width, height) = (self.target.width() as f32, self.target.height() as f32);
        let projected: Vec<ScreenVertex> = mesh
            .vertices
            .iter()
            .map(|v| {
                let ndc = clip_from_local.transform_point(&Point3::from(v.position_vec()));
                ScreenVertex {
                    x: (ndc.x + 1.0) * 0.5 * width,
                    y: (1.0 - ndc.y) * 0.5 * height,
                    z: ndc.z,
                    normal: normal_matrix * Vec3::from(v.normal),
                }
            })
            .collect();

        let world_positions: Vec<Vec3> = mesh
            .vertices
            .iter()
            .map(|v| world.transform_point(&Point3::from(v.position_vec())).coords)
            .collect();

        let mut stats = DrawStats::default();
        for tri in mesh.indices.chunks_exact(3) {
            let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let (Some(a), Some(b), Some(c)) = (projected.get(i0), projected.get(i1), projected.get(i2)) else {
                continue;
            };
            let face_normal = (world_positions[i1] - world_positions[i0])
                .cross(&(world_positions[i2] - world_positions[i0]));

            stats.triangles += 1;
            stats.fragments += self.fill_triangle([a, b, c], &face_normal, material);
        }
        stats
    }

    fn fill_triangle(&mut self, v: [&ScreenVertex; 3], face_normal: &Vec3, material: &Material) -> usize {
        let area = edge(v[0].x, v[0].y, v[1].x, v[1].y, v[2].x, v[2].y);
        if area.abs() <= f32::EPSILON || !area.is_finite() {
            return 0;
        }

        let min_x = v.iter().map(|p| p.x).fold(f32::INFINITY, f32::min).floor().max(0.0);
        let max_x = v.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max).ceil().min(self.target.width() as f32);
        let min_y = v.iter().map(|p| p.y).fold(f32::INFINITY, f32::min).floor().max(0.0);
        let max_y = v.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max).ceil().min(self.target.height() as f32);
        if min_x >= max_x || min_y >= max_y {
            return 0;
        }

        let mut written = 0;
        for py in (min_y as u32)..(max_y as u32) {
            for px in (min_x as u32)..(max_x as u32) {
                let (sx, sy) = (px as f32 + 0.5, py as f32 + 0.5);
                let b0 = edge(v[1].x, v[1].y, v[2].x, v[2].y, sx, sy) / area;
                let b1 = edge(v[2].x, v[2].y, v[0].x, v[0].y, sx, sy) / area;
                let b2 = edge(v[0].x, v[0].y, v[1].x, v[1].y, sx, sy) / area;
                if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
                    continue;
                }

                let depth = b0 * v[0].z + b1 * v[1].z + b2 * v[2].z;
                if !(0.0..=1.0).contains(&depth) {
                    continue;
                }

                let normal = v[0].normal * b0 + v[1].normal * b1 + v[2].normal * b2;
                let color = self.shade(&normal, face_normal, material);
                if self.target.write_fragment(px, py, depth, color) {
                    written += 1;
                }
            }
        }
        written
    }

    fn shade(&self, normal: &Vec3, face_normal: &Vec3, material: &Material) -> [u8; 4] {
        let mut n = if normal.norm_squared() > 1e-12 { *normal } else { *face_normal };
        n = n.try_normalize(1e-12).unwrap_or_else(|| -self.view_direction);
        if n.dot(&self.view_direction) > 0.0 {
            n = -n;
        }

        let light = self.lighting.irradiance(&n);
        let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            to_byte(material.base_color[0] * light.x),
            to_byte(material.base_color[1] * light.y),
            to_byte(material.base_color[2] * light.z),
            to_byte(material.alpha),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::utils;
    use crate::render::camera::Camera;
    use crate::render::mesh::Vertex;

    fn front_camera() -> Camera {
        Camera {
            position: Vec3::new(0.0, 0.0, 5.0),
            half_height: 1.0,
            far: 10.0,
            ..Camera::default()
        }
    }

    fn draw(mesh: &Mesh, material: &Material, size: u32) -> (RenderTarget, DrawStats) {
        let camera = front_camera();
        let lighting = LightingEnvironment::icon_key_light();
        let mut target = RenderTarget::new(size, size);
        let stats = Rasterizer::new(
            &mut target,
            camera.view_projection_matrix(1.0),
            camera.rotation * utils::forward_axis(),
            &lighting,
        )
        .draw_mesh(mesh, &Mat4::identity(), material);
        (target, stats)
    }

    #[test]
    fn test_cube_covers_center_not_corners() {
        let mesh = Mesh::cuboid(Vec3::new(0.5, 0.5, 0.5));
        let (target, stats) = draw(&mesh, &Material::new(), 16);

        assert_eq!(stats.triangles, 12);
        assert!(stats.fragments > 0);
        let center = target.color()[8 * 16 + 8];
        assert_eq!(center[3], 255);
        assert_eq!(target.color()[0], [0, 0, 0, 0]);
    }

    #[test]
    fn test_nearer_triangle_wins() {
        let quad = |z: f32, n: [f32; 3]| {
            vec![
                Vertex::new([-1.0, -1.0, z], n),
                Vertex::new([1.0, -1.0, z], n),
                Vertex::new([1.0, 1.0, z], n),
                Vertex::new([-1.0, 1.0, z], n),
            ]
        };
        let mut vertices = quad(-1.0, [0.0, 0.0, 1.0]);
        vertices.extend(quad(1.0, [0.0, 0.0, 1.0]));
        let mesh = Mesh::new(vertices, vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);

        let camera = front_camera();
        let lighting = LightingEnvironment::icon_key_light();
        let mut target = RenderTarget::new(8, 8);
        let mut rasterizer = Rasterizer::new(
            &mut target,
            camera.view_projection_matrix(1.0),
            utils::forward_axis(),
            &lighting,
        );
        rasterizer.draw_mesh(&mesh, &Mat4::identity(), &Material::new());

        let expected_depth = (5.0 - 1.0 - camera.near) / (camera.far - camera.near);
        assert!((target.depth()[4 * 8 + 4] - expected_depth).abs() < 1e-5);
    }

    #[test]
    fn test_material_color_and_alpha() {
        let mesh = Mesh::cuboid(Vec3::new(0.5, 0.5, 0.5));
        let material = Material::new().with_color(1.0, 0.0, 0.0).with_alpha(0.5);
        let (target, _) = draw(&mesh, &material, 8);

        let center = target.color()[4 * 8 + 4];
        assert!(center[0] > 0);
        assert_eq!(center[1], 0);
        assert_eq!(center[2], 0);
        assert_eq!(center[3], 128);
    }

    #[test]
    fn test_geometry_beyond_far_plane_is_clipped() {
        let mesh = Mesh::cuboid(Vec3::new(0.5, 0.5, 0.5));
        let camera = Camera { far: 2.0, ..front_camera() };
        let lighting = LightingEnvironment::icon_key_light();
        let mut target = RenderTarget::new(8, 8);
        let stats = Rasterizer::new(
            &mut target,
            camera.view_projection_matrix(1.0),
            utils::forward_axis(),
            &lighting,
        )
        .draw_mesh(&mesh, &Mat4::identity(), &Material::new());
        assert_eq!(stats.fragments, 0);
    }

    #[test]
    fn test_zero_normals_fall_back_to_face_normal() {
        let mesh = Mesh::new(
            vec![
                Vertex::new([-1.0, -1.0, 0.0], [0.0; 3]),
                Vertex::new([1.0, -1.0, 0.0], [0.0; 3]),
                Vertex::new([0.0, 1.0, 0.0], [0.0; 3]),
            ],
            vec![0, 1, 2],
        );
        let (target, stats) = draw(&mesh, &Material::new(), 8);
        assert!(stats.fragments > 0);
        let lit = target.color().iter().find(|c| c[3] > 0).copied().unwrap();
        // Ambient alone would be 64; the key light adds to a camera-facing surface
        assert!(lit[0] >= 64);
    }
}
