use enum_map::Enum;

/// ShaderStage selects one of the per-stage constant tables of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub const ALL: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Fragment];
}
