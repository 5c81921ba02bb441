/// ASCII rasterizer for emitted frame buffers
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use tri3d_core::emit::{COLOR_STRIDE, POSITION_STRIDE};
use tri3d_core::{FrameBuffers, RenderMode};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Brightest intensity the pipeline produces
const MAX_INTENSITY: f32 = 0.8;

/// ASCII renderer that draws projected triangles as terminal characters
///
/// Primitives are painted in the order they were emitted; there's no depth
/// test.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            char_buffer: vec![' '; width * height],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.char_buffer = vec![' '; width * height];
    }

    pub fn clear(&mut self) {
        self.char_buffer.fill(' ');
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    /// Rasterize the contents of `buffers`.
    pub fn render_buffers(&mut self, buffers: &FrameBuffers, mode: RenderMode) {
        match mode {
            RenderMode::Wireframe => {
                for edge in buffers.indices().chunks_exact(2) {
                    let (a, b) = (edge[0] as usize, edge[1] as usize);
                    let character = shade_char(buffers, a);
                    self.draw_line(self.to_screen(buffers, a), self.to_screen(buffers, b), character);
                }
            }
            RenderMode::Solid => {
                for triangle in buffers.indices().chunks_exact(3) {
                    let [a, b, c] = [triangle[0], triangle[1], triangle[2]].map(|i| i as usize);
                    let character = shade_char(buffers, a);
                    let coords = [a, b, c].map(|i| self.to_screen(buffers, i));
                    self.rasterize_triangle(&coords, character);
                }
            }
        }
    }

    /// Map a vertex from normalized device coordinates to character cells.
    fn to_screen(&self, buffers: &FrameBuffers, vertex: usize) -> (f32, f32) {
        let p = &buffers.positions()[vertex * POSITION_STRIDE..];
        let x = (p[0] + 1.0) * 0.5 * self.width as f32;
        let y = (1.0 - p[1]) * 0.5 * self.height as f32;
        (x, y)
    }

    fn plot(&mut self, x: i32, y: i32, character: char) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.char_buffer[y as usize * self.width + x as usize] = character;
        }
    }

    /// Bresenham line between two screen positions.
    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), character: char) {
        if !(from.0.is_finite() && from.1.is_finite() && to.0.is_finite() && to.1.is_finite()) {
            return;
        }

        // Keep far-off endpoints from turning into endless loops.
        let limit = 4.0 * (self.width + self.height) as f32;
        let clamp = |v: f32| v.clamp(-limit, limit).floor() as i32;
        let (mut x0, mut y0) = (clamp(from.0), clamp(from.1));
        let (x1, y1) = (clamp(to.0), clamp(to.1));

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, character);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32); 3], character: char) {
        let [v0, v1, v2] = *coords;
        if coords.iter().any(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return;
        }

        // Bounding box, clipped to screen bounds
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);
                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, p) {
                    // Either winding is accepted; culling already happened.
                    let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0)
                        || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
                    if inside {
                        self.plot(x, y, character);
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.char_at(x, y);

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Pick a ramp character from a vertex's light intensity (its green channel).
fn shade_char(buffers: &FrameBuffers, vertex: usize) -> char {
    let intensity = buffers
        .colors()
        .get(vertex * COLOR_STRIDE + 1)
        .copied()
        .unwrap_or(0.0);
    let t = (intensity / MAX_INTENSITY).clamp(0.0, 1.0);
    let index = (t * (LUMINOSITY_RAMP.len() - 1) as f32).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
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

#[cfg(test)]
mod tests {
    use super::*;
    use tri3d_core::Vec3;

    fn buffers(mode: RenderMode, intensity: f32) -> FrameBuffers {
        let mut buffers = FrameBuffers::with_capacity(3);
        buffers
            .push_triangle(
                &[
                    Vec3::new(-0.5, -0.5, 0.5),
                    Vec3::new(0.5, -0.5, 0.5),
                    Vec3::new(-0.5, 0.5, 0.5),
                ],
                [1.0, intensity, intensity, 1.0],
                mode,
            )
            .unwrap();
        buffers
    }

    fn lit_cells(renderer: &AsciiRenderer) -> usize {
        (0..renderer.height())
            .flat_map(|y| (0..renderer.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| renderer.char_at(x, y) != ' ')
            .count()
    }

    #[test]
    fn test_wireframe_draws_edges_only() {
        let mut renderer = AsciiRenderer::new(40, 20);
        renderer.render_buffers(&buffers(RenderMode::Wireframe, 0.8), RenderMode::Wireframe);

        // Corners of the triangle are on screen, its interior stays empty.
        assert_eq!(renderer.char_at(10, 15), '@');
        assert_eq!(renderer.char_at(30, 15), '@');
        assert_eq!(renderer.char_at(10, 5), '@');
        assert_eq!(renderer.char_at(14, 12), ' ');
    }

    #[test]
    fn test_solid_fills_interior() {
        let mut renderer = AsciiRenderer::new(40, 20);
        renderer.render_buffers(&buffers(RenderMode::Solid, 0.0), RenderMode::Solid);

        assert_eq!(renderer.char_at(14, 12), '.');
        assert_eq!(renderer.char_at(35, 2), ' ');
        assert!(lit_cells(&renderer) > 50);
    }

    #[test]
    fn test_clear() {
        let mut renderer = AsciiRenderer::new(10, 10);
        renderer.render_buffers(&buffers(RenderMode::Solid, 0.4), RenderMode::Solid);
        renderer.clear();
        assert_eq!(lit_cells(&renderer), 0);
    }

    #[test]
    fn test_barycentric_degenerate() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }
}
