use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::render::ShapeVertex;

/// Initial vertex capacity; grows by doubling when a frame needs more
const INITIAL_VERTEX_CAPACITY: u64 = 16 * 1024;

/// Screen parameters passed to the shape shader (16 bytes, aligned to 16)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ScreenParams {
    pub width: f32,
    pub height: f32,
    pub _padding: [f32; 2],
}

/// Vertex buffer for the frame's tessellated shapes plus the screen uniform
pub struct ShapeBuffers {
    pub vertex_buffer: Buffer,
    pub screen_buffer: Buffer,
    /// Capacity of `vertex_buffer` in vertices
    capacity: u64,
    /// Vertices written this frame
    vertex_count: u32,
}

impl ShapeBuffers {
    pub fn new(device: &Device) -> Self {
        let screen_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("screen-params-buffer"),
            size: std::mem::size_of::<ScreenParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            vertex_buffer: create_vertex_buffer(device, INITIAL_VERTEX_CAPACITY),
            screen_buffer,
            capacity: INITIAL_VERTEX_CAPACITY,
            vertex_count: 0,
        }
    }

    /// Upload this frame's vertices, reallocating if they no longer fit
    pub fn upload(&mut self, device: &Device, queue: &Queue, vertices: &[ShapeVertex]) {
        let needed = vertices.len() as u64;
        if needed > self.capacity {
            let mut capacity = self.capacity;
            while capacity < needed {
                capacity *= 2;
            }
            log::debug!("Growing vertex buffer to {} vertices", capacity);
            self.vertex_buffer = create_vertex_buffer(device, capacity);
            self.capacity = capacity;
        }

        if !vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }
        self.vertex_count = vertices.len() as u32;
    }

    pub fn update_screen(&self, queue: &Queue, width: u32, height: u32) {
        let params = ScreenParams {
            width: width as f32,
            height: height as f32,
            _padding: [0.0, 0.0],
        };
        queue.write_buffer(&self.screen_buffer, 0, bytemuck::bytes_of(&params));
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Byte length of the vertices written this frame
    pub fn used_bytes(&self) -> u64 {
        self.vertex_count as u64 * std::mem::size_of::<ShapeVertex>() as u64
    }
}

fn create_vertex_buffer(device: &Device, capacity: u64) -> Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("shape-vertex-buffer"),
        size: capacity * std::mem::size_of::<ShapeVertex>() as u64,
        usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
