/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
use std::io::Write;
use trirender_core::{DisplayList, DrawTarget, Transform};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Light reaching every surface regardless of orientation
const AMBIENT: f32 = 0.2;
const DIFFUSE: f32 = 0.8;

/// A vertex after projection to character cells
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScreenVertex {
    x: f32,
    y: f32,
    depth: f32,
    intensity: f32,
}

/// Software rasterizer that draws lit triangles into a character grid.
///
/// Drawing goes to a back buffer; [`DrawTarget::present`] swaps it with the
/// front buffer, which is what [`AsciiRenderer::draw`] writes out.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    back: Vec<char>,
    front: Vec<char>,
    projection: Matrix4<f32>,
    model_view: Matrix4<f32>,
    mvp: Matrix4<f32>,
    normal_matrix: Matrix3<f32>,
    pending: Vec<ScreenVertex>,
    in_triangles: bool,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            back: vec![' '; size],
            front: vec![' '; size],
            projection: Matrix4::identity(),
            model_view: Matrix4::identity(),
            mvp: Matrix4::identity(),
            normal_matrix: Matrix3::identity(),
            pending: Vec::with_capacity(3),
            in_triangles: false,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reallocate both buffers for a new terminal size
    pub fn resize(&mut self, width: usize, height: usize) {
        let size = width * height;
        self.width = width;
        self.height = height;
        self.depth_buffer = vec![f32::INFINITY; size];
        self.back = vec![' '; size];
        self.front = vec![' '; size];
    }

    /// The last presented frame, row-major
    pub fn front(&self) -> &[char] {
        &self.front
    }

    fn update_matrices(&mut self) {
        self.mvp = Transform::mvp_matrix(&self.model_view, &self.projection);
        // Normals use the inverse transpose of the model-view's linear part
        let linear: Matrix3<f32> = self.model_view.fixed_view::<3, 3>(0, 0).into_owned();
        self.normal_matrix = linear
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix3::identity);
    }

    fn project(&self, normal: &Vector3<f32>, position: &Point3<f32>) -> ScreenVertex {
        let ndc = self.mvp.transform_point(position);

        let n = self.normal_matrix * normal;
        let facing = match n.try_normalize(f32::EPSILON) {
            // Two-sided lighting with a headlight along +Z
            Some(n) => n.z.abs(),
            None => 0.0,
        };

        ScreenVertex {
            x: (ndc.x + 1.0) * 0.5 * self.width as f32,
            y: (1.0 - ndc.y) * 0.5 * self.height as f32,
            depth: ndc.z,
            intensity: (AMBIENT + DIFFUSE * facing).min(1.0),
        }
    }

    fn rasterize_triangle(&mut self, v0: ScreenVertex, v1: ScreenVertex, v2: ScreenVertex) {
        if self.width == 0 || self.height == 0 {
            return;
        }

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor();
        let max_x = v0.x.max(v1.x).max(v2.x).ceil();
        let min_y = v0.y.min(v1.y).min(v2.y).floor();
        let max_y = v0.y.max(v1.y).max(v2.y).ceil();
        if !(min_x.is_finite() && max_x.is_finite() && min_y.is_finite() && max_y.is_finite()) {
            return;
        }

        // Clip to screen bounds
        let min_x = (min_x as i64).max(0);
        let max_x = (max_x as i64).min(self.width as i64 - 1);
        let min_y = (min_y as i64).max(0);
        let max_y = (max_y as i64).min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), (px, py))
                else {
                    return;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth;
                if !(-1.0..=1.0).contains(&depth) {
                    continue;
                }

                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    let intensity = w0 * v0.intensity + w1 * v1.intensity + w2 * v2.intensity;
                    self.depth_buffer[idx] = depth;
                    self.back[idx] = shade(intensity);
                }
            }
        }
    }

    /// Write the front buffer starting at the top-left corner
    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            writer.queue(MoveTo(0, y as u16))?;
            let row = &self.front[y * self.width..(y + 1) * self.width];
            for &c in row {
                let color = color_for(c);
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(c))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl DrawTarget for AsciiRenderer {
    fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.back.fill(' ');
    }

    fn set_projection(&mut self, projection: &Matrix4<f32>) {
        self.projection = *projection;
        self.update_matrices();
    }

    fn set_model_view(&mut self, model_view: &Matrix4<f32>) {
        self.model_view = *model_view;
        self.update_matrices();
    }

    fn begin_triangles(&mut self) {
        self.pending.clear();
        self.in_triangles = true;
    }

    fn submit(&mut self, normal: &Vector3<f32>, position: &Point3<f32>) {
        if !self.in_triangles {
            log::trace!("vertex submitted outside a triangle scope");
            return;
        }
        let vertex = self.project(normal, position);
        self.pending.push(vertex);
        if self.pending.len() == 3 {
            let (v0, v1, v2) = (self.pending[0], self.pending[1], self.pending[2]);
            self.pending.clear();
            self.rasterize_triangle(v0, v1, v2);
        }
    }

    fn end_triangles(&mut self) {
        // An incomplete trailing triangle is dropped
        self.pending.clear();
        self.in_triangles = false;
    }

    fn call_list(&mut self, list: &DisplayList) {
        for triangle in list.triangles() {
            let v0 = self.project(&triangle[0].normal, &triangle[0].position);
            let v1 = self.project(&triangle[1].normal, &triangle[1].position);
            let v2 = self.project(&triangle[2].normal, &triangle[2].position);
            self.rasterize_triangle(v0, v1, v2);
        }
    }

    fn present(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
    }
}

/// Map a light intensity in [0, 1] onto the luminosity ramp
fn shade(intensity: f32) -> char {
    let last = LUMINOSITY_RAMP.len() - 1;
    let index = (intensity.clamp(0.0, 1.0) * last as f32) as usize;
    LUMINOSITY_RAMP[index.min(last)]
}

/// Color based on character intensity
fn color_for(c: char) -> Color {
    match c {
        ' ' | '.' | ':' => Color::DarkGrey,
        '-' | '=' => Color::Grey,
        '+' | '*' => Color::White,
        '#' | '%' | '@' => Color::Cyan,
        _ => Color::White,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
