use std::ops::Deref;

use log::{error, trace, warn};
use shaderbind_hal::{
    sampler::TextureUnit,
    uniforms::{UniformBinding, UniformKind, UniformSlot},
    Device,
};

use crate::{
    settings::{IndexPolicy, SyncSettings},
    value::{UniformData, UniformValue},
    UniformError,
};

/// The packed constant bytes of a table, shared by all of its uniforms.
#[derive(Debug, Default)]
pub(crate) struct ConstantStorage {
    pub bytes: Vec<u8>,
    pub dirty: bool,
}

impl ConstantStorage {
    pub fn zeroed(len: usize) -> Self {
        Self {
            bytes: vec![0; len],
            dirty: false,
        }
    }

    fn write(&mut self, offset: usize, bytes: &[u8]) {
        self.bytes[offset..offset + bytes.len()].copy_from_slice(bytes);
        self.dirty = true;
    }
}

/// A single shader constant: its cached value, where it goes on the device,
/// and the program it belongs to.
///
/// Uniforms are owned by a [`ConstantTable`](crate::ConstantTable), and are written
/// through [`UniformMut`], which borrows the uniform together with the table storage.
#[derive(Debug)]
pub struct Uniform<D: Device> {
    name: String,
    program: D::Program,
    binding: UniformBinding,
    data: UniformData<D::Texture>,
    needs_update: bool,
}

impl<D: Device> Uniform<D> {
    /// Creates a numeric uniform of `count` zeroed elements placed at `offset`.
    ///
    /// Texture uniforms must be created with [`Uniform::new_texture`]. Passing
    /// [`UniformKind::Texture`] here is a programming error.
    pub(crate) fn new_constant(
        name: impl Into<String>,
        program: D::Program,
        kind: UniformKind,
        count: usize,
        offset: usize,
    ) -> Self {
        let name = name.into();
        if kind == UniformKind::Texture {
            error!("Texture uniform `{name}` cannot be created as a constant");
            debug_assert!(false, "texture uniform `{name}` created as a constant");
        }

        Self {
            name,
            program,
            binding: UniformBinding::Constant { offset },
            data: UniformData::zeroed(kind, count),
            needs_update: false,
        }
    }

    pub(crate) fn new_texture(
        name: impl Into<String>,
        program: D::Program,
        unit: TextureUnit,
    ) -> Self {
        Self {
            name: name.into(),
            program,
            binding: UniformBinding::Texture(unit),
            data: UniformData::Texture(None),
            needs_update: false,
        }
    }

    pub(crate) fn from_slot(program: D::Program, slot: &UniformSlot) -> Self {
        match slot.binding {
            UniformBinding::Constant { offset } => {
                Self::new_constant(slot.name, program, slot.kind, slot.count, offset)
            }
            UniformBinding::Texture(unit) => Self::new_texture(slot.name, program, unit),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn program(&self) -> D::Program {
        self.program
    }

    pub fn kind(&self) -> UniformKind {
        self.data.kind()
    }

    pub fn count(&self) -> usize {
        self.data.len()
    }

    pub fn binding(&self) -> UniformBinding {
        self.binding
    }

    /// True if the last write happened while the program was not bound,
    /// and the value has not reached the device yet.
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Returns the cached value at `index`.
    ///
    /// `None` if `T` is not the kind of this uniform, or `index` is out of range.
    /// Never touches the device.
    pub fn value<T: UniformValue>(&self, index: usize) -> Option<T> {
        T::cached(&self.data)?.get(index).copied()
    }

    pub fn values<T: UniformValue>(&self) -> Option<&[T]> {
        T::cached(&self.data)
    }

    /// Returns the cached texture, `None` if this is not a texture uniform.
    pub fn texture(&self) -> Option<Option<D::Texture>> {
        match &self.data {
            UniformData::Texture(texture) => Some(*texture),
            _ => None,
        }
    }

    fn mismatch(&self, actual: UniformKind) -> UniformError {
        UniformError::TypeMismatch {
            name: self.name.clone(),
            expected: self.kind(),
            actual,
        }
    }
}

fn resolve_index(
    policy: IndexPolicy,
    name: &str,
    index: usize,
    count: usize,
) -> Result<usize, UniformError> {
    if index < count {
        return Ok(index);
    }

    match policy {
        IndexPolicy::Ignore => Err(UniformError::IndexOutOfRange {
            name: name.to_owned(),
            index,
            count,
        }),
        IndexPolicy::Clamp => Ok(count - 1),
        IndexPolicy::Panic => {
            panic!("index {index} is out of range for uniform `{name}` with {count} elements")
        }
    }
}

/// Write access to a uniform and the constant storage of its table.
pub struct UniformMut<'a, D: Device> {
    pub(crate) uniform: &'a mut Uniform<D>,
    pub(crate) storage: &'a mut ConstantStorage,
    pub(crate) settings: &'a SyncSettings,
}

impl<'a, D: Device> Deref for UniformMut<'a, D> {
    type Target = Uniform<D>;

    fn deref(&self) -> &Self::Target {
        self.uniform
    }
}

impl<'a, D: Device> UniformMut<'a, D> {
    /// Writes `value` at `index`.
    ///
    /// Writes with a type that does not match the uniform kind are ignored.
    /// If the owning program is bound, the whole cached array is copied into
    /// the constant buffer and the table is marked dirty. Otherwise the write
    /// is deferred until [`update`](Self::update).
    pub fn set_value<T: UniformValue>(&mut self, device: &D, value: T, index: usize) {
        match self.try_set_value(device, value, index) {
            Ok(()) => {}
            Err(e @ UniformError::TypeMismatch { .. }) => trace!("Ignoring write: {e}"),
            Err(e) => warn!("Ignoring write: {e}"),
        }
    }

    pub fn try_set_value<T: UniformValue>(
        &mut self,
        device: &D,
        value: T,
        index: usize,
    ) -> Result<(), UniformError> {
        let policy = self.settings.index_policy;
        let uniform = &mut *self.uniform;

        let values = match T::cached_mut(&mut uniform.data) {
            Some(values) => values,
            None => return Err(uniform.mismatch(T::KIND)),
        };
        let index = resolve_index(policy, &uniform.name, index, values.len())?;
        values[index] = value;

        self.sync(device);
        Ok(())
    }

    /// Replaces the cached texture. The texture is bound right away if
    /// the owning program is bound, otherwise on the next [`update`](Self::update).
    pub fn set_texture(&mut self, device: &mut D, texture: D::Texture) {
        if let Err(e) = self.try_set_texture(device, texture) {
            trace!("Ignoring texture write: {e}");
        }
    }

    pub fn try_set_texture(
        &mut self,
        device: &mut D,
        texture: D::Texture,
    ) -> Result<(), UniformError> {
        let uniform = &mut *self.uniform;
        let unit = match uniform.binding {
            UniformBinding::Texture(unit) => unit,
            UniformBinding::Constant { .. } => {
                return Err(uniform.mismatch(UniformKind::Texture));
            }
        };
        match &mut uniform.data {
            UniformData::Texture(cached) => *cached = Some(texture),
            _ => return Err(uniform.mismatch(UniformKind::Texture)),
        }

        if device.is_bound(uniform.program) {
            device.bind_texture(unit, texture);
            uniform.needs_update = false;
        } else {
            uniform.needs_update = true;
        }

        Ok(())
    }

    /// Pushes the cached state to the device. Called for every uniform after
    /// the owning program has been bound, before any draw that uses it.
    ///
    /// Does nothing while the owning program is not bound. Textures are bound
    /// again on every call since the device does not keep texture bindings
    /// across program switches. Numeric values are copied only if a write was deferred.
    pub fn update(&mut self, device: &mut D) {
        if !device.is_bound(self.uniform.program) {
            return;
        }

        match (self.uniform.texture(), self.uniform.binding) {
            (Some(texture), UniformBinding::Texture(unit)) => {
                if let Some(texture) = texture {
                    device.bind_texture(unit, texture);
                }
                self.uniform.needs_update = false;
            }
            _ => {
                if self.uniform.needs_update {
                    self.copy_to_storage();
                    self.uniform.needs_update = false;
                }
            }
        }
    }

    pub(crate) fn sync(&mut self, device: &D) {
        if device.is_bound(self.uniform.program) {
            self.copy_to_storage();
            self.uniform.needs_update = false;
        } else {
            self.uniform.needs_update = true;
        }
    }

    /// Copies the whole cached array, not only the element that changed.
    fn copy_to_storage(&mut self) {
        if let UniformBinding::Constant { offset } = self.uniform.binding {
            self.storage.write(offset, self.uniform.data.bytes());
        }
    }

    pub(crate) fn data_mut(&mut self) -> &mut UniformData<D::Texture> {
        &mut self.uniform.data
    }
}
