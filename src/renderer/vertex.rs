//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements
pub mod colors {
    /// `0xRRGGBB` plus alpha to normalized RGBA
    pub const fn hex(rgb: u32, alpha: f32) -> [f32; 4] {
        [
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
            alpha,
        ]
    }

    /// Same color with a different alpha
    pub const fn with_alpha(color: [f32; 4], alpha: f32) -> [f32; 4] {
        [color[0], color[1], color[2], alpha]
    }

    pub const BACKGROUND_TOP: [f32; 4] = hex(0x0a0a1a, 1.0);
    pub const BACKGROUND_BOTTOM: [f32; 4] = hex(0x1a1a3a, 1.0);
    pub const STAR: [f32; 4] = hex(0xffffff, 1.0);

    pub const PLAYER: [f32; 4] = hex(0x4facfe, 1.0);
    pub const COCKPIT: [f32; 4] = hex(0xa9e4ff, 1.0);
    pub const THRUSTER: [f32; 4] = hex(0xff9a00, 1.0);

    pub const BULLET: [f32; 4] = hex(0x00f2fe, 1.0);
    pub const BULLET_GLOW: [f32; 4] = hex(0x00f2fe, 0.3);

    pub const ENEMY_CRIMSON: [f32; 4] = hex(0xff416c, 1.0);
    pub const ENEMY_AMBER: [f32; 4] = hex(0xff9a00, 1.0);
    pub const ENEMY_EMERALD: [f32; 4] = hex(0x00ff88, 1.0);
    pub const ENEMY_HIGHLIGHT: [f32; 4] = hex(0xffffff, 0.7);

    pub const POWERUP_LIFE: [f32; 4] = hex(0xff416c, 1.0);
    pub const POWERUP_RAPID_FIRE: [f32; 4] = hex(0x4facfe, 1.0);
    pub const POWERUP_BONUS: [f32; 4] = hex(0x00ff88, 1.0);
    pub const POWERUP_GLYPH: [f32; 4] = hex(0xffffff, 1.0);

    pub const PICKUP_SPARK: [f32; 4] = hex(0xffff00, 1.0);
}
