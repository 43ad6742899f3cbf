//! CPU-side shader constants, and the rules for when they reach the GPU.
//!
//! Every uniform keeps a cached copy of its value. A write goes into the packed
//! constant buffer of its table only while the owning program is the one bound
//! on the device; otherwise it waits for [`ShaderProgram::activate`]. Tables are
//! sent to the device on [`ShaderProgram::flush`], at most once per draw call.

pub use error::{LayoutError, UniformError};
pub use headless::{DeviceCall, HeadlessDevice};
pub use program::{ProgramUniform, ShaderProgram};
pub use settings::{IndexPolicy, SyncSettings};
pub use table::{ConstantTable, UniformHandle};
pub use uniform::{Uniform, UniformMut};
pub use value::{UniformData, UniformValue};

mod error;
mod headless;
mod program;
mod settings;
mod table;
mod uniform;
mod value;
