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
    const fn rgb(r: u8, g: u8, b: u8) -> [f32; 4] {
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
    }

    pub const SNOW: [f32; 4] = rgb(0xff, 0xff, 0xff);
    pub const TRACK_EDGE: [f32; 4] = rgb(0xcb, 0xd5, 0xe1);
    pub const PLAYER: [f32; 4] = rgb(0xef, 0x44, 0x44);
    pub const PLAYER_HEAD: [f32; 4] = rgb(0x1e, 0x29, 0x3b);
    pub const SKIS: [f32; 4] = rgb(0x33, 0x41, 0x55);
    pub const TOILET: [f32; 4] = rgb(0x3b, 0x82, 0xf6);
    pub const TOILET_SEAT: [f32; 4] = rgb(0xff, 0xff, 0xff);
    pub const LABEL: [f32; 4] = rgb(0x00, 0x00, 0x00);
    pub const EXPLOSION: [f32; 4] = rgb(0xfa, 0xcc, 0x15);
    pub const BLOOD: [f32; 4] = rgb(0xdc, 0x26, 0x26);
    pub const TREE: [f32; 4] = rgb(0x16, 0x65, 0x34);
    pub const TRUNK: [f32; 4] = rgb(0x45, 0x1a, 0x03);
    pub const ROCK: [f32; 4] = rgb(0x64, 0x74, 0x8b);
    pub const SPEED_LINE: [f32; 4] = [100.0 / 255.0, 150.0 / 255.0, 1.0, 0.3];
}
