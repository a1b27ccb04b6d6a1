//! Storage buffers holding the flattened scene.

use std::borrow::Cow;

use bytemuck::Pod;
use wgpu::util::DeviceExt;

use crate::trace::SceneBuffers;

/// Bytes to upload for `data`; an empty slice becomes one zeroed element so
/// the binding stays valid.
pub fn storage_bytes<T: Pod>(data: &[T]) -> Cow<'_, [u8]> {
    if data.is_empty() {
        Cow::Owned(vec![0u8; std::mem::size_of::<T>()])
    } else {
        Cow::Borrowed(bytemuck::cast_slice(data))
    }
}

/// A read-only storage buffer and the number of real elements in it.
pub struct StorageBuffer {
    pub buffer: wgpu::Buffer,
    pub len: usize,
}

impl StorageBuffer {
    pub fn new<T: Pod>(device: &wgpu::Device, label: &str, data: &[T]) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: &storage_bytes(data),
            usage: wgpu::BufferUsages::STORAGE,
        });

        Self {
            buffer,
            len: data.len(),
        }
    }
}

/// The five scene buffers plus the surface lookup, replaced wholesale on
/// every upload.
pub struct SceneStorage {
    pub spheres: StorageBuffer,
    pub triangles: StorageBuffer,
    pub models: StorageBuffer,
    pub bounds: StorageBuffer,
    pub surfaces: StorageBuffer,
    pub surface_ids: StorageBuffer,
}

impl SceneStorage {
    pub fn upload(device: &wgpu::Device, scene: &SceneBuffers) -> Self {
        let storage = Self {
            spheres: StorageBuffer::new(device, "raylume spheres", &scene.spheres),
            triangles: StorageBuffer::new(device, "raylume triangles", &scene.triangles),
            models: StorageBuffer::new(device, "raylume models", &scene.models),
            bounds: StorageBuffer::new(device, "raylume bounds", &scene.bounds),
            surfaces: StorageBuffer::new(device, "raylume surfaces", &scene.surfaces),
            surface_ids: StorageBuffer::new(device, "raylume surface ids", &scene.surface_ids),
        };

        log::debug!(
            "uploaded scene: {} spheres, {} triangles, {} models, {} surfaces",
            storage.spheres.len,
            storage.triangles.len,
            storage.models.len,
            storage.surfaces.len,
        );

        storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{GpuModel, GpuSphere, GpuTriangle};
    use glam::Vec3;

    #[test]
    fn empty_arrays_get_one_zeroed_element() {
        let bytes = storage_bytes::<GpuTriangle>(&[]);
        assert_eq!(bytes.len(), 48);
        assert!(bytes.iter().all(|&b| b == 0));

        assert_eq!(storage_bytes::<GpuModel>(&[]).len(), 8);
    }

    #[test]
    fn non_empty_arrays_are_borrowed_verbatim() {
        let spheres = [GpuSphere::new(Vec3::ZERO, 1.0), GpuSphere::new(Vec3::X, 2.0)];
        let bytes = storage_bytes(&spheres);
        assert!(matches!(bytes, Cow::Borrowed(_)));
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[12..16], &1.0f32.to_ne_bytes());
    }
}
