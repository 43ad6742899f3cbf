use serde::Deserialize;
use shaderbind_hal::shader::ShaderStage;
use smart_default::SmartDefault;

/// Where the constant buffer of each stage is attached.
///
/// Every program is expected to declare its constants as uniform blocks
/// with these names. A program lacking one of them simply has no constants
/// for that stage.
#[derive(SmartDefault, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GlSettings {
    #[default("VertexConstants")]
    pub vertex_block: String,
    #[default("FragmentConstants")]
    pub fragment_block: String,
    #[default(0)]
    pub vertex_binding: u32,
    #[default(1)]
    pub fragment_binding: u32,
}

impl GlSettings {
    /// The uniform block name and binding point of a stage.
    pub fn block(&self, stage: ShaderStage) -> (&str, u32) {
        match stage {
            ShaderStage::Vertex => (&self.vertex_block, self.vertex_binding),
            ShaderStage::Fragment => (&self.fragment_block, self.fragment_binding),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_blocks() {
        let settings = GlSettings::default();
        assert_eq!(settings.block(ShaderStage::Vertex), ("VertexConstants", 0));
        assert_eq!(settings.block(ShaderStage::Fragment), ("FragmentConstants", 1));
    }

    #[test]
    fn test_partial_deserialize() {
        let settings: GlSettings =
            serde_json::from_str(r#"{ "fragment_block": "Material", "fragment_binding": 4 }"#)
                .unwrap();
        assert_eq!(settings.block(ShaderStage::Vertex), ("VertexConstants", 0));
        assert_eq!(settings.block(ShaderStage::Fragment), ("Material", 4));
    }
}
