use std::collections::HashMap;

use bytemuck::Pod;
use log::trace;
use shaderbind_hal::{
    shader::ShaderStage,
    uniforms::{UniformBinding, UniformKind, UniformSlot, Uniforms},
    Device,
};

use crate::{
    settings::SyncSettings,
    uniform::{ConstantStorage, Uniform, UniformMut},
    LayoutError,
};

/// Pre-resolved position of a uniform inside its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformHandle(pub(crate) usize);

/// The uniforms of one program stage, and the packed buffer they are copied into.
///
/// Uniform writes land in the buffer only while the owning program is bound.
/// The buffer reaches the device on [`flush`](ConstantTable::flush), which is
/// a no-op unless some uniform wrote to it since the last flush.
#[derive(Debug)]
pub struct ConstantTable<D: Device> {
    stage: ShaderStage,
    uniforms: Vec<Uniform<D>>,
    names: HashMap<String, UniformHandle>,
    storage: ConstantStorage,
    settings: SyncSettings,
}

/// Checks the layout and returns the size of the buffer it needs.
fn validate(slots: &[UniformSlot]) -> Result<usize, LayoutError> {
    let mut ranges = Vec::with_capacity(slots.len());

    for (i, slot) in slots.iter().enumerate() {
        let name = slot.name.to_owned();
        if slot.count == 0 {
            return Err(LayoutError::ZeroCount(name));
        }
        if slots[..i].iter().any(|other| other.name == slot.name) {
            return Err(LayoutError::DuplicateName(name));
        }

        match (slot.kind, slot.binding) {
            (UniformKind::Texture, UniformBinding::Constant { .. }) => {
                return Err(LayoutError::TextureInConstantSlot(name));
            }
            (UniformKind::Texture, UniformBinding::Texture(_)) if slot.count != 1 => {
                return Err(LayoutError::TextureArray {
                    name,
                    count: slot.count,
                });
            }
            (UniformKind::Texture, UniformBinding::Texture(_)) => {}
            (_, UniformBinding::Texture(_)) => {
                return Err(LayoutError::ConstantInTextureSlot(name));
            }
            (_, UniformBinding::Constant { offset }) => {
                let end = slot
                    .size()
                    .and_then(|size| offset.checked_add(size))
                    .ok_or(LayoutError::OutOfRange(name))?;
                ranges.push((offset..end, slot.name));
            }
        }
    }

    ranges.sort_by_key(|(range, _)| range.start);
    for pair in ranges.windows(2) {
        let (first, second) = (&pair[0], &pair[1]);
        if second.0.start < first.0.end {
            return Err(LayoutError::Overlap {
                first: first.1.to_owned(),
                second: second.1.to_owned(),
            });
        }
    }

    Ok(ranges.iter().map(|(range, _)| range.end).max().unwrap_or(0))
}

impl<D: Device> ConstantTable<D> {
    /// Allocates uniforms for every slot of a link-time layout.
    ///
    /// The buffer is zeroed and sized to the end of the last constant.
    /// For a packed layout that is the sum of the constant sizes.
    pub fn from_layout(
        program: D::Program,
        stage: ShaderStage,
        slots: &[UniformSlot],
        settings: SyncSettings,
    ) -> Result<Self, LayoutError> {
        let len = validate(slots)?;

        let uniforms: Vec<_> = slots
            .iter()
            .map(|slot| Uniform::from_slot(program, slot))
            .collect();
        let names = slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (slot.name.to_owned(), UniformHandle(i)))
            .collect();

        Ok(Self {
            stage,
            uniforms,
            names,
            storage: ConstantStorage::zeroed(len),
            settings,
        })
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn len(&self) -> usize {
        self.uniforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uniforms.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<UniformHandle> {
        self.names.get(name).copied()
    }

    pub fn uniform(&self, handle: UniformHandle) -> Option<&Uniform<D>> {
        self.uniforms.get(handle.0)
    }

    pub fn uniform_mut(&mut self, handle: UniformHandle) -> Option<UniformMut<'_, D>> {
        Some(UniformMut {
            uniform: self.uniforms.get_mut(handle.0)?,
            storage: &mut self.storage,
            settings: &self.settings,
        })
    }

    pub fn get(&self, name: &str) -> Option<&Uniform<D>> {
        self.uniform(self.find(name)?)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<UniformMut<'_, D>> {
        let handle = self.find(name)?;
        self.uniform_mut(handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = (UniformHandle, &Uniform<D>)> {
        self.uniforms
            .iter()
            .enumerate()
            .map(|(i, uniform)| (UniformHandle(i), uniform))
    }

    /// The packed constant bytes, as they will be sent on the next flush.
    pub fn bytes(&self) -> &[u8] {
        &self.storage.bytes
    }

    pub fn is_dirty(&self) -> bool {
        self.storage.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.storage.dirty = true;
    }

    /// Sends the buffer to the device if it changed since the last flush.
    /// Must be called after the uniform writes of a draw call, and before the draw.
    pub fn flush(&mut self, device: &mut D) -> bool {
        if !self.storage.dirty {
            return false;
        }

        self.storage.dirty = false;
        if self.storage.bytes.is_empty() {
            return false;
        }

        trace!("Flushing {} constant bytes of {:?} stage", self.storage.bytes.len(), self.stage);
        device.bind_constant_buffer(self.stage, &self.storage.bytes);
        true
    }

    /// Runs [`UniformMut::update`] for every uniform of the table.
    pub fn update(&mut self, device: &mut D) {
        for uniform in &mut self.uniforms {
            UniformMut {
                uniform,
                storage: &mut self.storage,
                settings: &self.settings,
            }
            .update(device);
        }
    }

    /// Writes every constant described by the layout of `T` from a plain struct.
    ///
    /// Fields are matched by name. Fields the table doesn't know, or with a kind
    /// different from the table's, are skipped. Element counts may differ, in which
    /// case the shorter of the two is copied.
    pub fn write<T: Uniforms + Pod>(&mut self, device: &D, value: &T) {
        let bytes = bytemuck::bytes_of(value);
        let stage = self.stage;

        for slot in T::LAYOUT {
            let UniformBinding::Constant { offset } = slot.binding else {
                continue;
            };

            let Some(mut uniform) = self.get_mut(slot.name) else {
                trace!("Skipping `{}`, not defined in {:?} stage", slot.name, stage);
                continue;
            };

            if uniform.kind() != slot.kind {
                trace!(
                    "Skipping `{}`, expected {:?} but got {:?}",
                    slot.name,
                    uniform.kind(),
                    slot.kind
                );
                continue;
            }

            let target = uniform.data_mut().bytes_mut();
            let len = target.len().min(slot.size().unwrap_or(usize::MAX));
            let source = match offset.checked_add(len).and_then(|end| bytes.get(offset..end)) {
                Some(source) => source,
                None => {
                    trace!(
                        "Skipping `{}`, it lies outside of the {} bytes of the struct",
                        slot.name,
                        bytes.len()
                    );
                    continue;
                }
            };
            target[..len].copy_from_slice(source);

            uniform.sync(device);
        }
    }
}
