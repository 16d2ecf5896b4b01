use anyhow::{Context, Result};
use mqo_format::ParseMode;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct MqoMeta {
    pub(crate) mode: ParseMode,
    pub(crate) copy_textures: bool,
}

impl Default for MqoMeta {
    fn default() -> Self {
        Self {
            mode: ParseMode::Lenient,
            copy_textures: true,
        }
    }
}

impl MqoMeta {
    pub(crate) fn parse(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let meta: Self = toml::from_str(&data)
            .with_context(|| format!("Invalid meta file: {}", path.display()))?;
        Ok(meta)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_meta() -> Result<()> {
        let meta: MqoMeta = toml::from_str("mode = \"strict\"\ncopy_textures = false\n")?;
        assert_eq!(
            meta,
            MqoMeta {
                mode: ParseMode::Strict,
                copy_textures: false,
            }
        );

        let meta: MqoMeta = toml::from_str("copy_textures = false")?;
        assert_eq!(meta.mode, ParseMode::Lenient);

        let meta: MqoMeta = toml::from_str("")?;
        assert_eq!(meta, MqoMeta::default());

        assert!(toml::from_str::<MqoMeta>("mode = \"pedantic\"").is_err());

        Ok(())
    }
}
